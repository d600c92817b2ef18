use std::fs;

use image::{DynamicImage, Rgba, RgbaImage};
use quakewave_basemap::{load_terrain, Basemap};
use quakewave_core::{Surface, Terrain};

fn half_land(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgba([0, 0, 0, 255])
        } else {
            Rgba([40, 90, 160, 255])
        }
    }))
}

#[test]
fn basemap_is_resized_before_classification() {
    let basemap = Basemap::from_image(&half_land(8, 4), 40, 20).expect("basemap");
    let terrain = basemap.terrain();
    assert_eq!((terrain.width(), terrain.height()), (40, 20));
    assert_eq!(basemap.pixels().dimensions(), (40, 20));
    assert_eq!(terrain.surface_at(5, 10), Some(Surface::Land));
    assert_eq!(terrain.surface_at(35, 10), Some(Surface::Water));
    assert_eq!(terrain.classify(10.0, 3.0), Terrain::Land);
    assert_eq!(terrain.classify(30.5, 3.0), Terrain::Water);
}

#[test]
fn png_files_load_from_disk() {
    let dir = std::env::temp_dir().join(format!("quakewave-basemap-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join("map.png");
    half_land(16, 8).save(&path).expect("png written");

    let terrain = load_terrain(&path, 16, 8).expect("terrain loads");
    assert_eq!(terrain.surface_at(0, 0), Some(Surface::Land));
    assert_eq!(terrain.surface_at(15, 7), Some(Surface::Water));

    fs::remove_dir_all(&dir).expect("temp dir removed");
}

#[test]
fn missing_files_report_their_path() {
    let error = load_terrain(std::path::Path::new("/nonexistent/map.png"), 4, 4)
        .expect_err("missing file");
    assert!(format!("{error:#}").contains("/nonexistent/map.png"));
}

#[test]
fn open_water_has_no_land() {
    let basemap = Basemap::open_water(12, 6).expect("basemap");
    assert!((0..12).all(|column| basemap.terrain().surface_at(column, 3) == Some(Surface::Water)));
}

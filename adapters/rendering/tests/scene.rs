use std::fs;

use glam::Vec2;
use image::RgbaImage;
use quakewave_core::{Mood, QuakeId, RawEvent, ScreenPoint, Surface, TerrainGrid};
use quakewave_rendering::{
    rasterize, FrameRecorder, RenderingBackend, Scene, EPICENTER_COLOR, WAVE_COLOR,
};
use quakewave_system_waves::{WaveEvent, WaveTuning};

fn event(id: u32, x: f32, magnitude: f32, terrain: &TerrainGrid) -> WaveEvent {
    WaveEvent::admit(
        QuakeId::new(id),
        &RawEvent::new(i64::from(id), Some(magnitude), 0.0, 0.0),
        ScreenPoint::new(x, 20.0),
        terrain,
        &WaveTuning::default(),
        Mood::NEUTRAL,
    )
}

#[test]
fn scene_highlights_only_the_most_recent_event() {
    let terrain = TerrainGrid::uniform(80, 40, Surface::Water).expect("terrain");
    let mut older = event(0, 20.0, 4.0, &terrain);
    older.demote();
    let newer = event(1, 60.0, 2.0, &terrain);

    let scene = Scene::from_live_events(&[older, newer], 80, 40);

    assert_eq!(scene.markers.len(), 2);
    assert!(!scene.markers[0].highlighted);
    assert_eq!(scene.markers[0].color, EPICENTER_COLOR);
    assert!(scene.markers[1].highlighted);
    assert_ne!(scene.markers[1].color, EPICENTER_COLOR);
    assert_eq!(scene.markers[1].center, Vec2::new(60.0, 20.0));
    assert_eq!(scene.markers[1].diameter, 8.0);

    assert_eq!(scene.waves.len(), 4);
    assert!(scene.waves.iter().all(|wave| wave.color == WAVE_COLOR));
    assert_eq!(scene.waves[0].diameter, 2.0);
}

#[test]
fn hidden_waves_are_left_out() {
    let terrain = TerrainGrid::uniform(80, 40, Surface::Water).expect("terrain");
    let on_edge = event(0, 0.0, 3.0, &terrain);
    let scene = Scene::from_live_events(&[on_edge], 80, 40);
    assert_eq!(scene.markers.len(), 1);
    assert_eq!(scene.waves.len(), 0);
}

#[test]
fn rasterised_markers_cover_their_epicenter() {
    let terrain = TerrainGrid::uniform(40, 40, Surface::Land).expect("terrain");
    let scene = Scene::from_live_events(&[event(0, 20.0, 5.0, &terrain)], 40, 40);
    let backdrop = RgbaImage::from_pixel(40, 40, image::Rgba([0, 0, 0, 255]));

    let frame = rasterize(&scene, Some(&backdrop));
    assert_ne!(*frame.get_pixel(20, 20), image::Rgba([0, 0, 0, 255]));
    assert_eq!(*frame.get_pixel(0, 39), image::Rgba([0, 0, 0, 255]));
}

#[test]
fn recorder_writes_numbered_frames() {
    let directory = std::env::temp_dir().join(format!("quakewave-frames-{}", std::process::id()));
    let mut recorder = FrameRecorder::new(&directory, None).expect("recorder");
    let scene = Scene::from_live_events(&[], 16, 8);

    recorder.present(&scene).expect("first frame");
    recorder.present(&scene).expect("second frame");

    assert_eq!(recorder.frames(), 2);
    assert!(directory.join("frame_000000.png").is_file());
    let reloaded = image::open(directory.join("frame_000001.png")).expect("frame decodes");
    assert_eq!((reloaded.width(), reloaded.height()), (16, 8));

    fs::remove_dir_all(&directory).expect("frames removed");
}

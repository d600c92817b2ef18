use std::{path::PathBuf, str::FromStr, time::Duration};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use quakewave_core::{CalendarDate, DateRange, ModeTrigger, ScreenPoint};

/// Replays recorded earthquakes as waves travelling across a world map.
#[derive(Parser, Debug)]
#[command(name = "quakewave", version, about, long_about = None)]
pub(crate) struct Args {
    /// TOML configuration file; every field is optional
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,

    /// Mode entered at start-up
    #[arg(long, value_enum, default_value_t = ModeArg::Realtime)]
    pub(crate) mode: ModeArg,

    /// First day of a free-range replay (YYYY-MM-DD)
    #[arg(long, required_if_eq("mode", "free-range"))]
    pub(crate) start: Option<CalendarDate>,

    /// Last day of a free-range replay (YYYY-MM-DD); defaults to --start
    #[arg(long)]
    pub(crate) end: Option<CalendarDate>,

    /// Number of frames to simulate
    #[arg(long, default_value_t = 600)]
    pub(crate) frames: u64,

    /// Frames per second of the simulated clock
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=1_000))]
    pub(crate) fps: u32,

    /// Sleep between frames so the replay runs at wall-clock speed
    #[arg(long)]
    pub(crate) paced: bool,

    /// Seed for land randomness; drawn from entropy when omitted
    #[arg(long)]
    pub(crate) seed: Option<u64>,

    /// Basemap image overriding the configured one
    #[arg(long)]
    pub(crate) map: Option<PathBuf>,

    /// Backup dataset overriding the configured one
    #[arg(long)]
    pub(crate) backup: Option<PathBuf>,

    /// Directory receiving one PNG per frame
    #[arg(long)]
    pub(crate) record_dir: Option<PathBuf>,

    /// Pointer gesture replayed in interactive mode, as X,Y,HOLD_MS
    #[arg(long = "tap", value_name = "X,Y,HOLD_MS")]
    pub(crate) taps: Vec<Tap>,
}

impl Args {
    /// Trigger for the mode requested on the command line.
    pub(crate) fn trigger(&self) -> Result<ModeTrigger> {
        Ok(match self.mode {
            ModeArg::Realtime => ModeTrigger::Realtime,
            ModeArg::PastMonth => ModeTrigger::PastMonth,
            ModeArg::Interactive => ModeTrigger::Interactive,
            ModeArg::Backup => ModeTrigger::Backup,
            ModeArg::FreeRange => {
                let start = self.start.context("--start is required in free-range mode")?;
                let end = self.end.unwrap_or(start);
                let range = DateRange::new(start, end).context("invalid free range")?;
                ModeTrigger::FreeRange { range }
            }
        })
    }

    /// Simulated time between consecutive frames.
    pub(crate) fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.fps
    }
}

/// Modes selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum ModeArg {
    Realtime,
    PastMonth,
    FreeRange,
    Interactive,
    Backup,
}

/// Scripted pointer gesture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Tap {
    pub(crate) pointer: ScreenPoint,
    pub(crate) hold: Duration,
}

impl FromStr for Tap {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        let fields: Vec<&str> = value.split(',').map(str::trim).collect();
        let [x, y, hold_ms] = fields.as_slice() else {
            bail!("expected X,Y,HOLD_MS but got '{value}'");
        };
        let x: f32 = x.parse().with_context(|| format!("invalid x in '{value}'"))?;
        let y: f32 = y.parse().with_context(|| format!("invalid y in '{value}'"))?;
        let hold_ms: u64 = hold_ms
            .parse()
            .with_context(|| format!("invalid hold duration in '{value}'"))?;
        Ok(Self {
            pointer: ScreenPoint::new(x, y),
            hold: Duration::from_millis(hold_ms),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taps_parse_from_triples() {
        let tap: Tap = "120.5, 40, 750".parse().expect("tap parses");
        assert_eq!(tap.pointer, ScreenPoint::new(120.5, 40.0));
        assert_eq!(tap.hold, Duration::from_millis(750));
        assert!("1,2".parse::<Tap>().is_err());
        assert!("a,2,3".parse::<Tap>().is_err());
    }

    #[test]
    fn free_range_defaults_its_end_to_the_start() {
        let args = Args::parse_from(["quakewave", "--mode", "free-range", "--start", "2011-03-11"]);
        let ModeTrigger::FreeRange { range } = args.trigger().expect("trigger") else {
            panic!("expected a free range");
        };
        assert_eq!(range.start(), range.end());
        assert_eq!(range.span_millis(), 86_400_000);
    }

    #[test]
    fn reversed_ranges_are_rejected() {
        let args = Args::parse_from([
            "quakewave",
            "--mode",
            "free-range",
            "--start",
            "2020-02-01",
            "--end",
            "2020-01-01",
        ]);
        assert!(args.trigger().is_err());
    }

    #[test]
    fn free_range_requires_a_start() {
        assert!(Args::try_parse_from(["quakewave", "--mode", "free-range"]).is_err());
        assert!(Args::try_parse_from(["quakewave", "--start", "1899-12-31"]).is_err());
    }

    #[test]
    fn args_are_well_formed() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}

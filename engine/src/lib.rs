#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative simulation state for Quakewave.
//!
//! The engine owns the terrain, the active mode and the live set of admitted
//! events. Every mutation arrives as a [`Command`] through [`apply`], and every
//! observable change is reported back as an [`Event`]. Switching modes replaces
//! the whole per-mode state at once, so nothing from a previous mode survives
//! the switch.

use std::time::Duration;

use quakewave_core::{
    Command, Event, FailureReason, FeedError, FeedPurpose, FeedQuery, FeedTicket, Mode,
    ModeTrigger, Mood, Projection, QuakeId, RawEvent, ScreenPoint, TerrainGrid, WELCOME_BANNER,
};
use quakewave_system_interactive::{Config as InteractiveConfig, Interactive};
use quakewave_system_playback::{range_speed_divisor, PlaybackError, PlaybackScheduler};
use quakewave_system_waves::{WaveEvent, WaveSimulation, WaveTuning};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use tracing::{debug, info, warn};

const GENERATION_SEED_MIX: u64 = 0x9e37_79b9_7f4a_7c15;

/// Playback pacing for every scheduled mode.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Speed divisor applied to the realtime feed.
    pub realtime_divisor: f64,
    /// Speed divisor applied to the past-month feed.
    pub past_month_divisor: f64,
    /// Speed divisor applied to the backup dataset.
    pub backup_divisor: f64,
    /// Wall-clock milliseconds a free date range should take to replay.
    pub free_range_replay_millis: f64,
    /// Seconds between realtime feed refreshes.
    pub refresh_interval_secs: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            realtime_divisor: 60.0,
            past_month_divisor: 20_000.0,
            backup_divisor: 20_000.0,
            free_range_replay_millis: 5_000.0,
            refresh_interval_secs: 300,
        }
    }
}

impl PlaybackConfig {
    /// Speed divisor used when entering the mode selected by `trigger`.
    ///
    /// Interactive mode has no scheduler and reports `None`. Divisors that are
    /// not strictly positive fall back to real-time pacing.
    #[must_use]
    pub fn divisor_for(&self, trigger: &ModeTrigger) -> Option<f64> {
        let configured = match trigger {
            ModeTrigger::Realtime => self.realtime_divisor,
            ModeTrigger::PastMonth => self.past_month_divisor,
            ModeTrigger::Backup => self.backup_divisor,
            ModeTrigger::FreeRange { range } => {
                range_speed_divisor(range.span_millis(), self.free_range_replay_millis)
            }
            ModeTrigger::Interactive => return None,
        };
        if configured.is_finite() && configured > 0.0 {
            Some(configured)
        } else {
            warn!(
                mode = %trigger.mode(),
                configured,
                "speed divisor must be positive; replaying in real time"
            );
            Some(1.0)
        }
    }

    /// Interval between realtime refreshes.
    #[must_use]
    pub const fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

/// Configuration parameters required to construct the engine.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EngineConfig {
    /// Pacing of scheduled modes.
    pub playback: PlaybackConfig,
    /// Constants of the wave motion model.
    pub waves: WaveTuning,
    /// Gesture mapping of interactive mode.
    pub interactive: InteractiveConfig,
    /// Seed from which every mode's land randomness is derived.
    pub seed: u64,
}

/// Lifecycle of the active mode.
#[derive(Clone, Debug, PartialEq)]
pub enum Phase {
    /// No mode has been selected yet.
    Idle,
    /// The initial feed was requested and has not arrived.
    Loading,
    /// Frames advance the simulation.
    Running,
    /// Playback could not start; ticking is suspended until the next switch.
    Error(FailureReason),
}

#[derive(Clone, Copy, Debug)]
struct RefreshTimer {
    last_requested: Duration,
    in_flight: bool,
}

#[derive(Debug)]
struct EngineState {
    mode: Option<Mode>,
    phase: Phase,
    speed_divisor: Option<f64>,
    scheduler: Option<PlaybackScheduler>,
    refresh: Option<RefreshTimer>,
    live: Vec<WaveEvent>,
    mood: Mood,
    rng: ChaCha8Rng,
    next_id: u32,
    exhausted_reported: bool,
}

impl EngineState {
    fn idle(seed: u64) -> Self {
        Self {
            mode: None,
            phase: Phase::Idle,
            speed_divisor: None,
            scheduler: None,
            refresh: None,
            live: Vec::new(),
            mood: Mood::NEUTRAL,
            rng: ChaCha8Rng::seed_from_u64(seed),
            next_id: 0,
            exhausted_reported: false,
        }
    }

    fn entering(mode: Mode, speed_divisor: Option<f64>, seed: u64, generation: u64) -> Self {
        let phase = if mode.is_scheduled() {
            Phase::Loading
        } else {
            Phase::Running
        };
        Self {
            mode: Some(mode),
            phase,
            speed_divisor,
            rng: ChaCha8Rng::seed_from_u64(seed ^ generation.wrapping_mul(GENERATION_SEED_MIX)),
            ..Self::idle(seed)
        }
    }
}

/// Represents the authoritative Quakewave simulation.
#[derive(Debug)]
pub struct SimulationEngine {
    banner: &'static str,
    terrain: TerrainGrid,
    projection: Projection,
    waves: WaveSimulation,
    interactive: Interactive,
    playback: PlaybackConfig,
    seed: u64,
    generation: u64,
    now: Duration,
    state: EngineState,
}

impl SimulationEngine {
    /// Creates an idle engine over the provided terrain.
    ///
    /// The screen shares the terrain's dimensions, so the projection maps the
    /// world onto exactly `terrain.width()` by `terrain.height()` pixels.
    #[must_use]
    pub fn new(terrain: TerrainGrid, config: EngineConfig) -> Self {
        let projection = Projection::new(terrain.width(), terrain.height());
        Self {
            banner: WELCOME_BANNER,
            terrain,
            projection,
            waves: WaveSimulation::new(config.waves),
            interactive: Interactive::new(config.interactive),
            playback: config.playback,
            seed: config.seed,
            generation: 0,
            now: Duration::ZERO,
            state: EngineState::idle(config.seed),
        }
    }

    /// Advances the engine by one frame at wall-clock time `now`.
    pub fn tick(&mut self, now: Duration, out_events: &mut Vec<Event>) {
        apply(self, Command::Tick { now }, out_events);
    }

    /// Events currently animated, oldest first.
    #[must_use]
    pub fn live_events(&self) -> &[WaveEvent] {
        &self.state.live
    }

    fn switch_mode(&mut self, trigger: ModeTrigger, out_events: &mut Vec<Event>) {
        self.generation = self.generation.wrapping_add(1);
        let mode = trigger.mode();
        let divisor = self.playback.divisor_for(&trigger);
        self.state = EngineState::entering(mode, divisor, self.seed, self.generation);
        info!(%mode, generation = self.generation, "switched mode");
        out_events.push(Event::ModeChanged { mode });

        if let Some(query) = trigger.feed_query() {
            out_events.push(Event::FeedRequested {
                ticket: FeedTicket::new(self.generation, FeedPurpose::Initial),
                query,
            });
        }
    }

    fn deliver_feed(
        &mut self,
        ticket: FeedTicket,
        outcome: Result<Vec<RawEvent>, FeedError>,
        out_events: &mut Vec<Event>,
    ) {
        if ticket.generation() != self.generation {
            debug!(
                ticket = ticket.generation(),
                current = self.generation,
                "discarding feed from superseded mode"
            );
            out_events.push(Event::FeedDiscarded { ticket });
            return;
        }

        let loading = self.state.phase == Phase::Loading;
        let running = self.state.phase == Phase::Running;
        match ticket.purpose() {
            FeedPurpose::Initial if loading => self.start_playback(outcome, out_events),
            FeedPurpose::Refresh if running => self.merge_refresh(outcome, out_events),
            _ => out_events.push(Event::FeedDiscarded { ticket }),
        }
    }

    fn start_playback(
        &mut self,
        outcome: Result<Vec<RawEvent>, FeedError>,
        out_events: &mut Vec<Event>,
    ) {
        let events = match outcome {
            Ok(events) => events,
            Err(error) => {
                self.fail(FailureReason::from(error), out_events);
                return;
            }
        };

        let divisor = self.state.speed_divisor.unwrap_or(1.0);
        match PlaybackScheduler::new(events, divisor, self.now) {
            Ok(scheduler) => {
                let events = scheduler.total_events();
                info!(events, divisor, "playback started");
                if self.state.mode == Some(Mode::Realtime) {
                    self.state.refresh = Some(RefreshTimer {
                        last_requested: self.now,
                        in_flight: false,
                    });
                }
                self.state.scheduler = Some(scheduler);
                self.state.phase = Phase::Running;
                out_events.push(Event::PlaybackStarted { events });
            }
            Err(PlaybackError::EmptyFeed) => self.fail(FailureReason::EmptyFeed, out_events),
            Err(error @ PlaybackError::InvalidSpeedDivisor(_)) => {
                self.fail(FailureReason::FeedUnavailable(error.to_string()), out_events);
            }
        }
    }

    fn merge_refresh(
        &mut self,
        outcome: Result<Vec<RawEvent>, FeedError>,
        out_events: &mut Vec<Event>,
    ) {
        if let Some(refresh) = self.state.refresh.as_mut() {
            refresh.in_flight = false;
        }
        let Some(scheduler) = self.state.scheduler.as_mut() else {
            return;
        };
        match outcome {
            Ok(events) => {
                let appended = scheduler.extend(events);
                if appended > 0 {
                    self.state.exhausted_reported = false;
                }
                debug!(appended, "realtime feed refreshed");
                out_events.push(Event::FeedRefreshed { appended });
            }
            Err(error) => warn!(%error, "realtime refresh failed; keeping current queue"),
        }
    }

    fn fail(&mut self, reason: FailureReason, out_events: &mut Vec<Event>) {
        warn!(%reason, "playback failed");
        self.state.phase = Phase::Error(reason.clone());
        self.state.scheduler = None;
        self.state.refresh = None;
        out_events.push(Event::PlaybackFailed { reason });
    }

    fn advance(&mut self, now: Duration, out_events: &mut Vec<Event>) {
        self.now = now;
        if self.state.phase != Phase::Running {
            return;
        }

        if let Some(scheduler) = self.state.scheduler.as_mut() {
            let admitted = scheduler.poll(now);
            let exhausted = scheduler.is_exhausted();
            if let Some(raw) = admitted {
                self.admit(&raw, out_events);
            }
            if exhausted && !self.state.exhausted_reported {
                self.state.exhausted_reported = true;
                out_events.push(Event::PlaybackExhausted);
            }
        }

        if let Some(refresh) = self.state.refresh.as_mut() {
            let due = now.saturating_sub(refresh.last_requested) >= self.playback.refresh_interval();
            if due && !refresh.in_flight {
                refresh.in_flight = true;
                refresh.last_requested = now;
                out_events.push(Event::FeedRequested {
                    ticket: FeedTicket::new(self.generation, FeedPurpose::Refresh),
                    query: FeedQuery::Live,
                });
            }
        }

        let state = &mut self.state;
        for event in &mut state.live {
            self.waves
                .tick(event, &self.terrain, state.mood, &mut state.rng);
        }
        out_events.push(Event::TimeAdvanced { now });
    }

    fn admit(&mut self, raw: &RawEvent, out_events: &mut Vec<Event>) {
        let id = QuakeId::new(self.state.next_id);
        self.state.next_id = self.state.next_id.wrapping_add(1);
        let epicenter = self.projection.project(raw.longitude(), raw.latitude());

        if let Some(previous) = self.state.live.last_mut() {
            previous.demote();
        }
        self.state.live.push(WaveEvent::admit(
            id,
            raw,
            epicenter,
            &self.terrain,
            self.waves.tuning(),
            self.state.mood,
        ));
        out_events.push(Event::EventAdmitted {
            id,
            timestamp_ms: raw.timestamp_ms(),
        });
    }

    fn synthesize(
        &mut self,
        pointer_down: Duration,
        pointer_up: Duration,
        pointer: ScreenPoint,
        out_events: &mut Vec<Event>,
    ) {
        if self.state.mode != Some(Mode::Interactive) {
            out_events.push(Event::SynthesisRejected {
                mode: self.state.mode,
            });
            return;
        }
        let raw = self
            .interactive
            .synthesize(pointer_down, pointer_up, pointer, &self.projection);
        self.admit(&raw, out_events);
    }

    fn set_mood(&mut self, mood: Mood, out_events: &mut Vec<Event>) {
        if self.state.mode != Some(Mode::Interactive) {
            out_events.push(Event::MoodRejected {
                mode: self.state.mode,
            });
            return;
        }
        self.state.mood = mood;
        out_events.push(Event::MoodChanged { mood });
    }
}

/// Applies the provided command to the engine, mutating state deterministically.
pub fn apply(engine: &mut SimulationEngine, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SwitchMode { trigger } => engine.switch_mode(trigger, out_events),
        Command::Tick { now } => engine.advance(now, out_events),
        Command::DeliverFeed { ticket, outcome } => engine.deliver_feed(ticket, outcome, out_events),
        Command::SynthesizeEvent {
            pointer_down,
            pointer_up,
            pointer,
        } => engine.synthesize(pointer_down, pointer_up, pointer, out_events),
        Command::SetMood { mood } => engine.set_mood(mood, out_events),
    }
}

/// Query functions that provide read-only access to the engine state.
pub mod query {
    use quakewave_core::{FailureReason, Mode, Mood, Projection, TerrainGrid};
    use quakewave_system_waves::WaveEvent;

    use super::{Phase, SimulationEngine};

    /// Retrieves the welcome banner that adapters may display.
    #[must_use]
    pub fn welcome_banner(engine: &SimulationEngine) -> &'static str {
        engine.banner
    }

    /// Active mode, if one has been selected.
    #[must_use]
    pub fn mode(engine: &SimulationEngine) -> Option<Mode> {
        engine.state.mode
    }

    /// Lifecycle of the active mode.
    #[must_use]
    pub fn phase(engine: &SimulationEngine) -> &Phase {
        &engine.state.phase
    }

    /// Reason the active mode failed, if it did.
    #[must_use]
    pub fn failure(engine: &SimulationEngine) -> Option<&FailureReason> {
        match &engine.state.phase {
            Phase::Error(reason) => Some(reason),
            _ => None,
        }
    }

    /// Events currently animated, oldest first.
    #[must_use]
    pub fn live_events(engine: &SimulationEngine) -> &[WaveEvent] {
        engine.live_events()
    }

    /// The most recently admitted live event.
    #[must_use]
    pub fn most_recent(engine: &SimulationEngine) -> Option<&WaveEvent> {
        engine
            .state
            .live
            .iter()
            .rev()
            .find(|event| event.is_most_recent())
    }

    /// Mood applied to admissions and motion.
    #[must_use]
    pub fn mood(engine: &SimulationEngine) -> Mood {
        engine.state.mood
    }

    /// Terrain the waves travel over.
    #[must_use]
    pub fn terrain(engine: &SimulationEngine) -> &TerrainGrid {
        &engine.terrain
    }

    /// Projection from geographic to screen coordinates.
    #[must_use]
    pub fn projection(engine: &SimulationEngine) -> &Projection {
        &engine.projection
    }

    /// Counter bumped on every mode switch.
    #[must_use]
    pub fn generation(engine: &SimulationEngine) -> u64 {
        engine.generation
    }

    /// Admitted and total queued event counts of the active scheduler.
    #[must_use]
    pub fn playback_progress(engine: &SimulationEngine) -> Option<(usize, usize)> {
        engine
            .state
            .scheduler
            .as_ref()
            .map(|scheduler| (scheduler.clock().next_feed_index(), scheduler.total_events()))
    }
}

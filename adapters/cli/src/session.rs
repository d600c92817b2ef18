use std::{
    thread,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use quakewave_core::{Command, Event, ModeTrigger};
use quakewave_engine::{apply, query, Phase, SimulationEngine};
use quakewave_feed::FeedWorker;
use quakewave_rendering::{RenderingBackend, Scene};
use tracing::{debug, info, warn};

use crate::args::Tap;

/// Counters reported once the session ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct SessionSummary {
    pub(crate) frames: u64,
    pub(crate) admitted: u64,
    pub(crate) live: usize,
}

/// Drives the engine frame by frame, relaying feed traffic through the worker.
pub(crate) struct Session<B> {
    engine: SimulationEngine,
    worker: FeedWorker,
    backend: B,
    frame_interval: Duration,
    feed_timeout: Duration,
    paced: bool,
    events: Vec<Event>,
    summary: SessionSummary,
}

impl<B> Session<B>
where
    B: RenderingBackend,
{
    pub(crate) fn new(
        engine: SimulationEngine,
        worker: FeedWorker,
        backend: B,
        frame_interval: Duration,
        feed_timeout: Duration,
        paced: bool,
    ) -> Self {
        Self {
            engine,
            worker,
            backend,
            frame_interval,
            feed_timeout,
            paced,
            events: Vec::new(),
            summary: SessionSummary::default(),
        }
    }

    /// Enters `trigger` and simulates `frames` frames, replaying `taps` evenly.
    pub(crate) fn run(
        mut self,
        trigger: ModeTrigger,
        frames: u64,
        taps: &[Tap],
    ) -> Result<SessionSummary> {
        self.submit(Command::SwitchMode { trigger })?;
        let started = Instant::now();

        for frame in 0..frames {
            let now = self
                .frame_interval
                .saturating_mul(u32::try_from(frame).unwrap_or(u32::MAX));
            self.collect_replies()?;

            for tap in taps_due(taps, frame, frames) {
                self.submit(Command::SynthesizeEvent {
                    pointer_down: now.saturating_sub(tap.hold),
                    pointer_up: now,
                    pointer: tap.pointer,
                })?;
            }

            self.submit(Command::Tick { now })?;
            let scene = Scene::from_live_events(
                query::live_events(&self.engine),
                query::terrain(&self.engine).width(),
                query::terrain(&self.engine).height(),
            )
            .with_mode(query::mode(&self.engine))
            .with_failure(query::failure(&self.engine));
            self.backend
                .present(&scene)
                .with_context(|| format!("failed to present frame {frame}"))?;
            self.summary.frames += 1;

            if self.paced {
                let target = started + now + self.frame_interval;
                thread::sleep(target.saturating_duration_since(Instant::now()));
            }
        }

        self.summary.live = query::live_events(&self.engine).len();
        Ok(self.summary)
    }

    /// Delivers finished fetches; while the initial feed is outstanding the
    /// clock is held until it arrives or the feed times out.
    fn collect_replies(&mut self) -> Result<()> {
        while let Some(reply) = self.worker.try_recv() {
            self.submit(reply.into_command())?;
        }
        if query::phase(&self.engine) == &Phase::Loading {
            debug!("waiting for initial feed");
            match self.worker.recv_timeout(self.feed_timeout) {
                Some(reply) => self.submit(reply.into_command())?,
                None => warn!(timeout = ?self.feed_timeout, "initial feed did not arrive in time"),
            }
        }
        Ok(())
    }

    fn submit(&mut self, command: Command) -> Result<()> {
        apply(&mut self.engine, command, &mut self.events);
        for event in std::mem::take(&mut self.events) {
            self.handle(event)?;
        }
        Ok(())
    }

    fn handle(&mut self, event: Event) -> Result<()> {
        match event {
            Event::FeedRequested { ticket, query } => {
                if let Err(error) = self.worker.request(ticket, query) {
                    self.submit(Command::DeliverFeed {
                        ticket,
                        outcome: Err(error),
                    })?;
                }
            }
            Event::EventAdmitted { id, timestamp_ms } => {
                self.summary.admitted += 1;
                debug!(id = id.get(), timestamp_ms, "event admitted");
            }
            Event::PlaybackFailed { reason } => warn!(%reason, "playback failed"),
            Event::PlaybackStarted { events } => info!(events, "playback started"),
            Event::PlaybackExhausted => info!("every queued event has been admitted"),
            Event::SynthesisRejected { mode } | Event::MoodRejected { mode } => {
                warn!(?mode, "request ignored outside interactive mode");
            }
            Event::ModeChanged { .. }
            | Event::FeedDiscarded { .. }
            | Event::FeedRefreshed { .. }
            | Event::TimeAdvanced { .. }
            | Event::MoodChanged { .. } => {}
        }
        Ok(())
    }
}

/// Taps released on `frame`, spread evenly over the session.
fn taps_due(taps: &[Tap], frame: u64, frames: u64) -> impl Iterator<Item = &Tap> {
    let slots = taps.len() as u64 + 1;
    taps.iter()
        .enumerate()
        .filter(move |(index, _)| (*index as u64 + 1) * frames / slots == frame)
        .map(|(_, tap)| tap)
}

//! The affection score tracker.

use heartline_core::config::ScoreConfig;
use tokio::sync::broadcast;
use tracing::{debug, info};

use super::band::Band;
use super::events::ScoreEvent;

const EVENT_CAPACITY: usize = 64;

/// Single bounded affection score.
///
/// `0 <= current <= max` holds after every operation. Observers register
/// with [`ScoreTracker::subscribe`]; dropping the returned receiver ends the
/// registration.
#[derive(Debug)]
pub struct ScoreTracker {
    config: ScoreConfig,
    current: i32,
    events: broadcast::Sender<ScoreEvent>,
}

impl ScoreTracker {
    /// Creates a tracker at the configured starting value.
    #[must_use]
    pub fn new(config: ScoreConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let current = config.starting.clamp(0, config.max);
        Self {
            config,
            current,
            events,
        }
    }

    /// Registers an observer.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ScoreEvent> {
        self.events.subscribe()
    }

    /// Raises the score by `delta`, capped at `max`. Non-positive deltas are
    /// ignored.
    pub fn add(&mut self, delta: i32) {
        if delta <= 0 {
            return;
        }
        let old = self.current;
        self.current = old.saturating_add(delta).min(self.config.max);
        self.emit(ScoreEvent::Changed {
            old,
            new: self.current,
        });
        self.report_band_change(old);
    }

    /// Lowers the score by `delta`, floored at zero. Non-positive deltas are
    /// ignored. Reaching zero reports depletion instead of a band change.
    pub fn subtract(&mut self, delta: i32) {
        if delta <= 0 {
            return;
        }
        let old = self.current;
        self.current = old.saturating_sub(delta).max(0);
        self.emit(ScoreEvent::Changed {
            old,
            new: self.current,
        });
        if self.current == 0 {
            self.report_depleted();
        } else {
            self.report_band_change(old);
        }
    }

    /// Overwrites the score, clamped to `[0, max]`. Used when loading saves.
    pub fn set(&mut self, value: i32) {
        let old = self.current;
        self.current = value.clamp(0, self.config.max);
        self.emit(ScoreEvent::Changed {
            old,
            new: self.current,
        });
        if self.current == 0 {
            self.report_depleted();
        } else {
            self.report_band_change(old);
        }
    }

    /// Returns to the starting value.
    pub fn reset(&mut self) {
        let old = self.current;
        self.current = self.config.starting.clamp(0, self.config.max);
        self.emit(ScoreEvent::Changed {
            old,
            new: self.current,
        });
    }

    #[must_use]
    pub fn current(&self) -> i32 {
        self.current
    }

    #[must_use]
    pub fn max(&self) -> i32 {
        self.config.max
    }

    #[must_use]
    pub fn band(&self) -> Band {
        Band::from_score(self.current, &self.config)
    }

    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.current == 0
    }

    /// Current score as a fraction of `max`, for progress bars.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        Self::fraction_of(self.current, &self.config)
    }

    /// `score` as a fraction of the configured `max`, for observers that only
    /// see score events.
    #[must_use]
    pub fn fraction_of(score: i32, config: &ScoreConfig) -> f64 {
        if config.max <= 0 {
            return 0.0;
        }
        f64::from(score) / f64::from(config.max)
    }

    fn report_band_change(&self, old: i32) {
        let before = Band::from_score(old, &self.config);
        let after = self.band();
        if before != after {
            info!(from = %before, to = %after, score = self.current, "affection band crossed");
            self.emit(ScoreEvent::BandCrossed { band: after });
        }
    }

    fn report_depleted(&self) {
        info!("affection depleted");
        self.emit(ScoreEvent::Depleted);
    }

    fn emit(&self, event: ScoreEvent) {
        // No observers is not an error.
        if self.events.send(event).is_err() {
            debug!(?event, "score event had no observers");
        }
    }
}

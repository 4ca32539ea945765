//! # Carousel Controller
//!
//! Auto-advancing slide index for the project showcase.
//!
//! The controller owns no timer. The host calls [`Carousel::tick`] roughly
//! every [`REFRESH_RATE`] and passes the current monotonic time; progress is
//! derived from elapsed time since the slide started (minus paused spans),
//! so late or skipped ticks never slow the rotation down.
//!
//! Every index change goes through one guard: while a transition is
//! settling (for [`SETTLE_DELAY`]) further changes are dropped, whether they
//! come from the timer or from the visitor.

use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use log::debug;

/// How long each slide stays up before auto-advancing.
pub const SLIDE_DURATION: Duration = Duration::from_millis(6000);
/// Suggested tick period for the host loop.
pub const REFRESH_RATE: Duration = Duration::from_millis(50);
/// Length of the visual transition; index changes are refused meanwhile.
pub const SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Upper bound reported while an advance is pending, keeping progress < 100.
const PROGRESS_CEILING: f64 = 99.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselPhase {
    Running,
    Paused,
    Transitioning,
}

#[derive(Debug, Clone)]
pub struct Carousel {
    len: NonZeroUsize,
    index: usize,
    /// Progress accumulated before the current running span began.
    banked: f64,
    /// Start of the current running span. Meaningless while paused.
    span_start: Instant,
    progress: f64,
    paused: bool,
    settle_until: Option<Instant>,
}

impl Carousel {
    pub fn new(len: NonZeroUsize, now: Instant) -> Self {
        Self {
            len,
            index: 0,
            banked: 0.0,
            span_start: now,
            progress: 0.0,
            paused: false,
            settle_until: None,
        }
    }

    /// Builds a carousel over `len` items; `None` when there is nothing to show.
    pub fn with_len(len: usize, now: Instant) -> Option<Self> {
        NonZeroUsize::new(len).map(|len| Self::new(len, now))
    }

    pub fn len(&self) -> usize {
        self.len.get()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Progress through the current slide, in `[0, 100)`.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_transitioning(&self, now: Instant) -> bool {
        self.settle_until.is_some_and(|until| now < until)
    }

    pub fn phase(&self, now: Instant) -> CarouselPhase {
        if self.is_transitioning(now) {
            CarouselPhase::Transitioning
        } else if self.paused {
            CarouselPhase::Paused
        } else {
            CarouselPhase::Running
        }
    }

    fn running_progress(&self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.span_start);
        self.banked + elapsed.as_secs_f64() / SLIDE_DURATION.as_secs_f64() * 100.0
    }

    /// Advances progress to `now`. Returns `true` if the slide changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.settle_until.is_some_and(|until| now >= until) {
            self.settle_until = None;
        }
        if self.paused {
            return false;
        }

        let progress = self.running_progress(now);
        if progress < 100.0 {
            self.progress = progress;
            return false;
        }

        let next = (self.index + 1) % self.len.get();
        if self.change_slide(next, now) {
            debug!("Carousel auto-advanced to {}", next);
            true
        } else {
            self.progress = PROGRESS_CEILING;
            false
        }
    }

    pub fn next(&mut self, now: Instant) -> bool {
        self.change_slide((self.index + 1) % self.len.get(), now)
    }

    pub fn previous(&mut self, now: Instant) -> bool {
        let n = self.len.get();
        self.change_slide((self.index + n - 1) % n, now)
    }

    /// Jumps to `index`. Out-of-range targets are refused.
    pub fn jump_to(&mut self, index: usize, now: Instant) -> bool {
        if index >= self.len.get() {
            return false;
        }
        self.change_slide(index, now)
    }

    fn change_slide(&mut self, index: usize, now: Instant) -> bool {
        if self.is_transitioning(now) {
            debug!("Carousel change to {} dropped: transition settling", index);
            return false;
        }
        self.index = index;
        self.banked = 0.0;
        self.span_start = now;
        self.progress = 0.0;
        self.settle_until = Some(now + SETTLE_DELAY);
        true
    }

    /// Pointer entered the showcase: freeze progress.
    pub fn pointer_enter(&mut self, now: Instant) {
        if self.paused {
            return;
        }
        self.banked = self.running_progress(now).min(PROGRESS_CEILING);
        self.progress = self.banked;
        self.paused = true;
    }

    /// Pointer left the showcase: resume from the frozen progress.
    pub fn pointer_leave(&mut self, now: Instant) {
        if !self.paused {
            return;
        }
        self.span_start = now;
        self.paused = false;
    }
}

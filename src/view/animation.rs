use std::time::{Duration, Instant};

use crate::config::ViewConfig;

/// Timing and geometry for item transitions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSpec {
    pub enter_offset: f32,
    pub enter_duration: Duration,
    pub exit_duration: Duration,
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self::from(&ViewConfig::default())
    }
}

impl From<&ViewConfig> for AnimationSpec {
    fn from(config: &ViewConfig) -> Self {
        Self {
            enter_offset: config.enter_offset,
            enter_duration: Duration::from_millis(config.enter_duration_ms),
            exit_duration: Duration::from_millis(config.exit_duration_ms),
        }
    }
}

/// Interpolated presentation of an item at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualStyle {
    pub opacity: f32,
    /// Downward offset in pixels.
    pub offset_y: f32,
}

impl VisualStyle {
    pub const SETTLED: Self = Self {
        opacity: 1.0,
        offset_y: 0.0,
    };

    pub fn hidden(offset_y: f32) -> Self {
        Self {
            opacity: 0.0,
            offset_y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Entering,
    Settled,
    Exiting,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Entering => "entering",
            Phase::Settled => "settled",
            Phase::Exiting => "exiting",
        }
    }
}

/// Phase of one item plus the instant it entered that phase.
#[derive(Debug, Clone, Copy)]
pub struct Lifecycle {
    phase: Phase,
    since: Instant,
    from: VisualStyle,
}

impl Lifecycle {
    pub fn entering(now: Instant) -> Self {
        Self {
            phase: Phase::Entering,
            since: now,
            from: VisualStyle::SETTLED,
        }
    }

    pub fn settled(now: Instant) -> Self {
        Self {
            phase: Phase::Settled,
            since: now,
            from: VisualStyle::SETTLED,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Starts the exit transition from wherever the item currently is.
    /// Calling it on an item that is already exiting does nothing.
    pub fn begin_exit(&mut self, now: Instant, spec: &AnimationSpec) {
        if self.phase == Phase::Exiting {
            return;
        }
        self.from = self.style_at(now, spec);
        self.phase = Phase::Exiting;
        self.since = now;
    }

    /// Moves time forward. Returns `false` once an exiting item has fully
    /// faded and should be dropped.
    pub fn advance(&mut self, now: Instant, spec: &AnimationSpec) -> bool {
        match self.phase {
            Phase::Entering => {
                if elapsed(self.since, now) >= spec.enter_duration {
                    self.phase = Phase::Settled;
                    self.since = now;
                }
                true
            }
            Phase::Settled => true,
            Phase::Exiting => elapsed(self.since, now) < spec.exit_duration,
        }
    }

    pub fn style_at(&self, now: Instant, spec: &AnimationSpec) -> VisualStyle {
        match self.phase {
            Phase::Settled => VisualStyle::SETTLED,
            Phase::Entering => {
                let t = ease_out_cubic(progress(self.since, now, spec.enter_duration));
                VisualStyle {
                    opacity: t,
                    offset_y: spec.enter_offset * (1.0 - t),
                }
            }
            Phase::Exiting => {
                let t = progress(self.since, now, spec.exit_duration);
                VisualStyle {
                    opacity: self.from.opacity * (1.0 - t),
                    offset_y: self.from.offset_y,
                }
            }
        }
    }
}

fn elapsed(since: Instant, now: Instant) -> Duration {
    now.saturating_duration_since(since)
}

fn progress(since: Instant, now: Instant, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }
    (elapsed(since, now).as_secs_f32() / duration.as_secs_f32()).clamp(0.0, 1.0)
}

fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

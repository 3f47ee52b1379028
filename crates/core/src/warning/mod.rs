//! Countdown shown while playback approaches the hardest part of a chart.
//!
//! The warning becomes visible for the section immediately before the peak
//! section and fades in linearly over a fraction of the time left in that
//! section.

use crate::{ChartCursor, CursorPosition, NpsSample, WarningConfig};

/// Index of the first sample whose rate is within `epsilon` of the chart's
/// maximum.
pub fn peak_index(samples: &[NpsSample], epsilon: f32) -> Option<usize> {
    let highest = samples
        .iter()
        .map(|sample| sample.nps)
        .fold(f32::NEG_INFINITY, f32::max);
    samples
        .iter()
        .position(|sample| (sample.nps - highest).abs() < epsilon)
}

/// Linear 0 to 1 opacity ramp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeIn {
    pub start: f32,
    pub duration: f32,
}

impl FadeIn {
    pub fn new(start: f32, duration: f32) -> Self {
        Self { start, duration }
    }

    pub fn alpha(&self, time: f32) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((time - self.start) / self.duration).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Countdown {
    /// Time until the peak section starts.
    pub seconds_remaining: f32,
    pub alpha: f32,
    /// Set on the update that made the warning visible.
    pub appeared: bool,
}

impl Countdown {
    pub fn message(&self) -> String {
        format!(
            "You're about to reach the peak difficulty in {:.1} seconds!",
            self.seconds_remaining
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WarningState {
    Hidden,
    Visible(Countdown),
}

impl WarningState {
    pub fn is_visible(&self) -> bool {
        matches!(self, WarningState::Visible(_))
    }
}

/// Tracks the peak warning across successive playback times.
#[derive(Debug, Clone)]
pub struct PeakWarning<'a> {
    cursor: ChartCursor<'a>,
    peak: Option<usize>,
    fade_ratio: f32,
    fade: Option<FadeIn>,
}

impl<'a> PeakWarning<'a> {
    pub fn new(samples: &'a [NpsSample], config: &WarningConfig) -> Self {
        let peak = if config.peak_warning {
            peak_index(samples, config.peak_epsilon)
        } else {
            None
        };
        Self {
            cursor: ChartCursor::new(samples),
            peak,
            fade_ratio: config.fade_ratio,
            fade: None,
        }
    }

    /// Index of the hardest section, `None` when the warning is disabled.
    pub fn peak(&self) -> Option<usize> {
        self.peak
    }

    pub fn update(&mut self, time: f32) -> WarningState {
        let Some(peak) = self.peak else {
            return WarningState::Hidden;
        };

        let section = match self.cursor.advance(time) {
            CursorPosition::Tracking { section, .. } if section + 1 == peak => section,
            _ => {
                self.fade = None;
                return WarningState::Hidden;
            }
        };

        let seconds_remaining = self.cursor.samples()[section].to_time - time;
        let appeared = self.fade.is_none();
        let fade_ratio = self.fade_ratio;
        let fade = *self
            .fade
            .get_or_insert_with(|| FadeIn::new(time, seconds_remaining * fade_ratio));
        if appeared {
            tracing::debug!(section, peak, seconds_remaining, "peak warning shown");
        }

        WarningState::Visible(Countdown {
            seconds_remaining,
            alpha: fade.alpha(time),
            appeared,
        })
    }
}

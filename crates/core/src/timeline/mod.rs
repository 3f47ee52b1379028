use serde::{Deserialize, Serialize};

use crate::{GraphLayout, GraphPoint, NpsSample};

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PlaybackClock {
    pub time_seconds: f32,
}

impl PlaybackClock {
    pub fn reset(&mut self) {
        self.time_seconds = 0.0;
    }

    pub fn advance(&mut self, delta: f32) {
        self.time_seconds = (self.time_seconds + delta).max(0.0);
    }

    pub fn seek(&mut self, time_seconds: f32) {
        self.time_seconds = time_seconds.max(0.0);
    }
}

/// Where the progress marker sits on the chart at a given song time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum CursorPosition {
    /// The chart has no samples.
    Idle,
    /// Between the points of `section` and `section + 1`, `progress` of the way
    /// through the section's time window.
    Tracking { section: usize, progress: f32 },
    /// Playback reached the trailing silence; the marker stops moving.
    Finished,
}

impl CursorPosition {
    pub fn section(&self) -> Option<usize> {
        match self {
            CursorPosition::Tracking { section, .. } => Some(*section),
            _ => None,
        }
    }

    /// Interpolated marker position on `layout`, or `None` when the cursor is
    /// not tracking or the section is not visible.
    pub fn point(&self, layout: &GraphLayout) -> Option<GraphPoint> {
        let CursorPosition::Tracking { section, progress } = *self else {
            return None;
        };
        let from = layout.point(section)?;
        let to = layout.point(section + 1)?;
        Some(from.lerp(to, progress))
    }
}

/// Maps song time onto a precomputed NPS chart.
#[derive(Debug, Clone, Copy)]
pub struct ChartCursor<'a> {
    samples: &'a [NpsSample],
}

impl<'a> ChartCursor<'a> {
    pub fn new(samples: &'a [NpsSample]) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &'a [NpsSample] {
        self.samples
    }

    /// Index of the section containing `time`. A time on the boundary between
    /// two sections belongs to the earlier one. Times past the end of the
    /// chart return `samples.len()`.
    pub fn section_at(&self, time: f32) -> usize {
        self.samples.partition_point(|sample| sample.to_time < time)
    }

    pub fn advance(&self, time: f32) -> CursorPosition {
        if self.samples.is_empty() {
            return CursorPosition::Idle;
        }

        let section = self.section_at(time);
        if section + 1 >= self.samples.len() {
            return CursorPosition::Finished;
        }

        let sample = &self.samples[section];
        let width = sample.duration();
        let progress = if width > 0.0 {
            ((time - sample.from_time) / width).clamp(0.0, 1.0)
        } else {
            0.0
        };
        CursorPosition::Tracking { section, progress }
    }
}

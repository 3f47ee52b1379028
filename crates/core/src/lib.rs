//! Core library for the Song Chart visualiser.
//!
//! A beatmap's note times are folded into a coarse notes-per-second chart
//! ([`nps`]), laid out as a line graph ([`graph`]) and tracked during playback
//! by a cursor ([`timeline`]) and an optional warning that announces the
//! hardest section ([`warning`]). Everything here is plain data and pure
//! functions; hosting the chart in a game or window is left to the caller.

pub mod beatmap;
pub mod config;
pub mod error;
pub mod graph;
pub mod nps;
pub mod timeline;
pub mod warning;

pub use beatmap::{Beatmap, BeatmapLine, NoteColor, NoteEvent, NoteKind};
pub use config::{BucketingConfig, ChartConfig, GraphConfig, WarningConfig};
pub use error::{ChartError, Result};
pub use graph::{AxisTick, GraphLayout, GraphLink, GraphPoint};
pub use nps::{bucket_notes, NpsBucketer, NpsSample, NOTES_PER_BUCKET};
pub use timeline::{ChartCursor, CursorPosition, PlaybackClock};
pub use warning::{peak_index, Countdown, FadeIn, PeakWarning, WarningState};

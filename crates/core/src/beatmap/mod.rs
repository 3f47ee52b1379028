use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{ChartError, NpsBucketer, NpsSample, Result};

/// Saber colour attached to a note. `None` marks notes that cannot be hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteColor {
    Red,
    Blue,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteKind {
    Note { color: NoteColor },
    Bomb,
    Obstacle,
}

impl NoteKind {
    /// Whether a player has to hit this object, i.e. whether it counts
    /// towards the chart's density.
    pub fn is_countable(&self) -> bool {
        matches!(self, NoteKind::Note { color } if *color != NoteColor::None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    pub time: f32,
    pub kind: NoteKind,
}

impl NoteEvent {
    pub fn note(time: f32, color: NoteColor) -> Self {
        Self {
            time,
            kind: NoteKind::Note { color },
        }
    }

    pub fn bomb(time: f32) -> Self {
        Self {
            time,
            kind: NoteKind::Bomb,
        }
    }
}

/// A lane of beatmap objects in authoring order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BeatmapLine {
    #[serde(default)]
    pub events: Vec<NoteEvent>,
}

impl BeatmapLine {
    pub fn new(events: Vec<NoteEvent>) -> Self {
        Self { events }
    }
}

/// Difficulty beatmap together with the length of its audio track.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Beatmap {
    /// Length of the audio in seconds; negative when unknown.
    pub song_duration: f32,
    #[serde(default)]
    pub lines: Vec<BeatmapLine>,
}

impl Beatmap {
    pub fn new(song_duration: f32, lines: Vec<BeatmapLine>) -> Self {
        Self {
            song_duration,
            lines,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let beatmap = Self::from_json_str(&contents)?;
        tracing::debug!(
            path = %path.display(),
            lines = beatmap.lines.len(),
            song_duration = beatmap.song_duration,
            "loaded beatmap"
        );
        Ok(beatmap)
    }

    pub fn has_known_duration(&self) -> bool {
        self.song_duration >= 0.0
    }

    /// Times of every countable note, line by line. Simultaneous notes keep
    /// this order once sorted, which makes chart output reproducible.
    pub fn countable_times(&self) -> Vec<f32> {
        self.lines
            .iter()
            .flat_map(|line| line.events.iter())
            .filter(|event| event.kind.is_countable())
            .map(|event| event.time)
            .collect()
    }

    pub fn nps_sections(&self, bucketer: &NpsBucketer) -> Result<Vec<NpsSample>> {
        if !self.has_known_duration() {
            return Err(ChartError::UnknownDuration(self.song_duration));
        }

        let notes = self.countable_times();
        let sections = bucketer.bucket(&notes, self.song_duration);
        tracing::debug!(
            notes = notes.len(),
            sections = sections.len(),
            "bucketed beatmap"
        );
        Ok(sections)
    }
}

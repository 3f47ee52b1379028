use serde::{Deserialize, Serialize};

/// Number of consecutive notes folded into one chart sample.
pub const NOTES_PER_BUCKET: usize = 25;

/// Notes-per-second rate attributed to the window `[from_time, to_time)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NpsSample {
    pub nps: f32,
    pub from_time: f32,
    pub to_time: f32,
}

impl NpsSample {
    pub fn new(nps: f32, from_time: f32, to_time: f32) -> Self {
        Self {
            nps,
            from_time,
            to_time,
        }
    }

    /// Zero-rate sample used for the lead-in before the first note and the
    /// lead-out after the last one.
    pub fn silence(from_time: f32, to_time: f32) -> Self {
        Self::new(0.0, from_time, to_time)
    }

    pub fn duration(&self) -> f32 {
        self.to_time - self.from_time
    }
}

/// Converts a beatmap's note times into a chart-friendly series of
/// [`NpsSample`]s.
///
/// Notes are grouped by count rather than by time: every
/// [`notes_per_bucket`](Self::notes_per_bucket) notes close a bucket whose rate
/// is the note count over the time it spans. The final bucket is usually
/// short, so its rate is normalised against the notes preceding it instead of
/// being measured over a handful of notes. Buckets that span no time at all
/// (simultaneous notes on a boundary) are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NpsBucketer {
    notes_per_bucket: usize,
}

impl Default for NpsBucketer {
    fn default() -> Self {
        Self {
            notes_per_bucket: NOTES_PER_BUCKET,
        }
    }
}

impl NpsBucketer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a bucketer with a custom bucket size. Sizes below one are
    /// treated as one.
    pub fn with_notes_per_bucket(notes_per_bucket: usize) -> Self {
        Self {
            notes_per_bucket: notes_per_bucket.max(1),
        }
    }

    pub fn notes_per_bucket(&self) -> usize {
        self.notes_per_bucket
    }

    /// Buckets `notes` (seconds, any order) into NPS samples covering
    /// `[0, song_duration)`.
    ///
    /// An empty note list yields an empty chart. Otherwise the result starts
    /// with a silent sample ending at the first note and finishes with a
    /// silent sample running from the last bucket boundary to
    /// `song_duration`.
    pub fn bucket(&self, notes: &[f32], song_duration: f32) -> Vec<NpsSample> {
        if notes.is_empty() {
            return Vec::new();
        }

        // `sort_by` is stable, so simultaneous notes keep the caller's order.
        let mut sorted = notes.to_vec();
        sorted.sort_by(f32::total_cmp);

        let per_bucket = self.notes_per_bucket;
        let total = sorted.len();
        let first_time = sorted[0];

        let mut samples = Vec::with_capacity(total / per_bucket + 3);
        samples.push(NpsSample::silence(0.0, first_time));

        let mut bucket_count = 0usize;
        let mut starting_time = first_time;
        for (index, &end_time) in sorted.iter().enumerate() {
            bucket_count += 1;
            if bucket_count < per_bucket && index + 1 != total {
                continue;
            }

            let nps = if bucket_count >= per_bucket {
                bucket_count as f32 / (end_time - starting_time)
            } else if total < per_bucket {
                bucket_count as f32 / (end_time - first_time)
            } else {
                // Short tail: rate of the last `per_bucket` notes ending here.
                let window_start = sorted[index + 1 - per_bucket];
                per_bucket as f32 / (end_time - window_start)
            };

            if nps.is_infinite() {
                tracing::trace!(
                    from = starting_time,
                    to = end_time,
                    notes = bucket_count,
                    "skipping zero-width bucket"
                );
            } else {
                samples.push(NpsSample::new(nps, starting_time, end_time));
            }

            bucket_count = 0;
            starting_time = end_time;
        }

        samples.push(NpsSample::silence(starting_time, song_duration));
        samples
    }
}

/// Buckets `notes` with the default bucket size of [`NOTES_PER_BUCKET`].
pub fn bucket_notes(notes: &[f32], song_duration: f32) -> Vec<NpsSample> {
    NpsBucketer::default().bucket(notes, song_duration)
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    fn seconds(range: std::ops::RangeInclusive<u32>) -> Vec<f32> {
        range.map(|t| t as f32).collect()
    }

    fn assert_well_formed(samples: &[NpsSample], song_duration: f32) {
        let first = samples.first().expect("chart should not be empty");
        let last = samples.last().expect("chart should not be empty");
        assert_eq!(first.from_time, 0.0);
        assert_eq!(first.nps, 0.0);
        assert_eq!(last.to_time, song_duration);
        assert_eq!(last.nps, 0.0);

        for pair in samples.windows(2) {
            assert_eq!(pair[0].to_time, pair[1].from_time, "gap in {samples:?}");
        }
        assert!(samples.iter().all(|sample| sample.nps.is_finite()));
    }

    #[test]
    fn empty_notes_produce_empty_chart() {
        assert!(bucket_notes(&[], 120.0).is_empty());
        assert!(bucket_notes(&[], 0.0).is_empty());
    }

    #[test]
    fn exactly_one_full_bucket() {
        let samples = bucket_notes(&seconds(1..=25), 30.0);

        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0], NpsSample::silence(0.0, 1.0));
        assert_approx_eq!(samples[1].nps, 25.0 / 24.0);
        assert_eq!(samples[1].from_time, 1.0);
        assert_eq!(samples[1].to_time, 25.0);
        assert_eq!(samples[2], NpsSample::silence(25.0, 30.0));
    }

    #[test]
    fn short_song_uses_whole_note_span() {
        let samples = bucket_notes(&[1.0, 2.0, 3.0], 10.0);

        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0], NpsSample::silence(0.0, 1.0));
        assert_approx_eq!(samples[1].nps, 1.5);
        assert_eq!((samples[1].from_time, samples[1].to_time), (1.0, 3.0));
        assert_eq!(samples[2], NpsSample::silence(3.0, 10.0));
    }

    #[test]
    fn short_tail_is_normalised_against_previous_notes() {
        let samples = bucket_notes(&seconds(0..=29), 35.0);

        assert_eq!(samples.len(), 4);
        assert_eq!(samples[0], NpsSample::silence(0.0, 0.0));

        assert_approx_eq!(samples[1].nps, 25.0 / 24.0);
        assert_eq!((samples[1].from_time, samples[1].to_time), (0.0, 24.0));

        // The last 25 notes run from t=5 to t=29.
        assert_approx_eq!(samples[2].nps, 25.0 / (29.0 - 5.0));
        assert_eq!((samples[2].from_time, samples[2].to_time), (24.0, 29.0));

        assert_eq!(samples[3], NpsSample::silence(29.0, 35.0));
    }

    #[test]
    fn tail_normalisation_avoids_spikes() {
        // 25 slow notes followed by two notes in quick succession.
        let mut notes: Vec<f32> = (0..25).map(|i| i as f32 * 2.0).collect();
        notes.extend([48.5, 49.0]);

        let samples = bucket_notes(&notes, 60.0);
        let tail = samples[samples.len() - 2];

        assert_eq!((tail.from_time, tail.to_time), (48.0, 49.0));
        assert_approx_eq!(tail.nps, 25.0 / (49.0 - notes[2]));
        assert!(tail.nps < 1.0);
    }

    #[test]
    fn sorts_unordered_input() {
        let mut notes = seconds(1..=25);
        notes.reverse();
        notes.swap(3, 17);

        assert_eq!(bucket_notes(&notes, 30.0), bucket_notes(&seconds(1..=25), 30.0));
    }

    #[test]
    fn drops_zero_width_buckets() {
        let mut notes = seconds(0..=24);
        notes.extend(std::iter::repeat(24.0).take(25));
        notes.push(30.0);

        let samples = bucket_notes(&notes, 40.0);

        assert_well_formed(&samples, 40.0);
        assert_eq!(samples.len(), 4);
        assert_eq!((samples[1].from_time, samples[1].to_time), (0.0, 24.0));
        assert_eq!((samples[2].from_time, samples[2].to_time), (24.0, 30.0));
        assert_approx_eq!(samples[2].nps, 25.0 / 6.0);
    }

    #[test]
    fn single_note_only_has_silence() {
        let samples = bucket_notes(&[5.0], 10.0);
        assert_eq!(
            samples,
            vec![NpsSample::silence(0.0, 5.0), NpsSample::silence(5.0, 10.0)]
        );
    }

    #[test]
    fn simultaneous_notes_in_short_song() {
        let samples = bucket_notes(&[2.0, 2.0, 2.0], 4.0);
        assert_eq!(
            samples,
            vec![NpsSample::silence(0.0, 2.0), NpsSample::silence(2.0, 4.0)]
        );
    }

    #[test]
    fn irregular_maps_stay_contiguous() {
        let mut notes = Vec::new();
        let mut time = 0.75_f32;
        for i in 0..213u32 {
            time += 0.05 + (i % 7) as f32 * 0.11;
            notes.push(time);
            if i % 11 == 0 {
                notes.push(time);
            }
        }

        let duration = time + 4.0;
        let samples = bucket_notes(&notes, duration);
        assert_well_formed(&samples, duration);
        assert!(samples[1..samples.len() - 1].iter().all(|s| s.nps > 0.0));
    }

    #[test]
    fn repeated_calls_are_identical() {
        let notes = vec![3.5, 1.25, 9.0, 1.25, 7.75, 2.0, 4.5];
        let bucketer = NpsBucketer::with_notes_per_bucket(3);

        let first = bucketer.bucket(&notes, 12.0);
        let second = bucketer.bucket(&notes, 12.0);
        assert_eq!(first, second);
        assert_well_formed(&first, 12.0);
    }

    #[test]
    fn custom_bucket_size() {
        let bucketer = NpsBucketer::with_notes_per_bucket(4);
        let samples = bucketer.bucket(&seconds(1..=8), 10.0);

        assert_eq!(samples.len(), 4);
        assert_approx_eq!(samples[1].nps, 4.0 / 3.0);
        assert_eq!((samples[2].from_time, samples[2].to_time), (4.0, 8.0));
        assert_approx_eq!(samples[2].nps, 1.0);
    }

    #[test]
    fn zero_bucket_size_is_clamped() {
        assert_eq!(NpsBucketer::with_notes_per_bucket(0).notes_per_bucket(), 1);
    }
}

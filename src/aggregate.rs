//! Per-track aggregation of step-indexed samples.

use std::collections::BTreeMap;

use tracing::debug;

use crate::utils::warn_once;

/// Step-ordered samples for each track.
///
/// Tracks iterate in ascending numeric id. Within a track, samples are sorted
/// ascending by step with a stable sort, so samples sharing a step keep their
/// input order. Built once and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct PerTrackSeries<T> {
    tracks: BTreeMap<i64, Vec<(i64, T)>>,
}

impl<T> Default for PerTrackSeries<T> {
    fn default() -> Self {
        Self {
            tracks: BTreeMap::new(),
        }
    }
}

impl<T> PerTrackSeries<T> {
    /// Group `(track_id, step, value)` samples by track and sort each group
    /// by step.
    pub fn from_samples<I>(samples: I) -> Self
    where
        I: IntoIterator<Item = (i64, i64, T)>,
    {
        let mut tracks: BTreeMap<i64, Vec<(i64, T)>> = BTreeMap::new();
        for (track_id, step, value) in samples {
            tracks.entry(track_id).or_default().push((step, value));
        }

        for (track_id, entries) in tracks.iter_mut() {
            entries.sort_by_key(|(step, _)| *step);
            if entries.windows(2).any(|w| w[0].0 == w[1].0) {
                warn_once(&format!(
                    "track {} has repeated steps; keeping them in input order",
                    track_id
                ));
            }
        }

        let series = Self { tracks };
        debug!(
            tracks = series.len(),
            samples = series.total_samples(),
            "aggregated per-track series"
        );
        series
    }

    /// Samples for one track, sorted by step.
    pub fn get(&self, track_id: i64) -> Option<&[(i64, T)]> {
        self.tracks.get(&track_id).map(Vec::as_slice)
    }

    /// Track ids in ascending order.
    pub fn track_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.tracks.keys().copied()
    }

    /// `(track_id, samples)` in ascending track order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, &[(i64, T)])> {
        self.tracks.iter().map(|(id, v)| (*id, v.as_slice()))
    }

    /// Number of tracks.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Number of samples across all tracks.
    pub fn total_samples(&self) -> usize {
        self.tracks.values().map(Vec::len).sum()
    }

    /// Project every value, keeping tracks and step order.
    pub fn map_values<U, F>(&self, mut f: F) -> PerTrackSeries<U>
    where
        F: FnMut(&T) -> U,
    {
        PerTrackSeries {
            tracks: self
                .tracks
                .iter()
                .map(|(id, entries)| {
                    let mapped = entries.iter().map(|(step, v)| (*step, f(v))).collect();
                    (*id, mapped)
                })
                .collect(),
        }
    }
}

impl<T> FromIterator<(i64, i64, T)> for PerTrackSeries<T> {
    fn from_iter<I: IntoIterator<Item = (i64, i64, T)>>(iter: I) -> Self {
        Self::from_samples(iter)
    }
}

impl<T> IntoIterator for PerTrackSeries<T> {
    type Item = (i64, Vec<(i64, T)>);
    type IntoIter = std::collections::btree_map::IntoIter<i64, Vec<(i64, T)>>;

    fn into_iter(self) -> Self::IntoIter {
        self.tracks.into_iter()
    }
}

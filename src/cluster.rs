//! Adaptive 1-D k-means over a channel histogram.
//!
//! K is not fixed up front. Starting from a single seed, centroids are settled
//! with weighted Lloyd iterations, then every group large enough to judge is run
//! through a normality test. Groups that look multimodal are split around their
//! neighbors, and the process repeats until a round adds no centroids.

use std::collections::BTreeSet;

use crate::histogram::Histogram;
use crate::normality::normal_test;

/// Default p-value threshold for the normality test.
pub const DEFAULT_ALPHA: f64 = 0.001;

/// Default minimum number of levels a group needs before it may split.
pub const DEFAULT_MIN_GROUP_SIZE: usize = 80;

/// Neighbor spacing required to place two distinct new centroids.
const MIN_SPLIT_ROOM: u32 = 3;

/// Rounded means can trade ties indefinitely; settling stops after this many rounds.
const MAX_SETTLE_ROUNDS: usize = 1024;

/// Sorted, distinct quantization levels for one channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CentroidSet {
    values: Vec<u32>,
}

impl CentroidSet {
    /// Build from arbitrary values; sorts and drops duplicates.
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        let set: BTreeSet<u32> = values.into_iter().collect();
        Self {
            values: set.into_iter().collect(),
        }
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.values.iter().copied()
    }

    /// Index of the centroid closest to `value`. Ties go to the lower index.
    pub fn nearest_index(&self, value: u32) -> Option<usize> {
        if self.values.is_empty() {
            return None;
        }
        Some(nearest_index(&self.values, value))
    }

    /// Centroid closest to `value`. Ties go to the smaller centroid.
    pub fn nearest(&self, value: u32) -> Option<u32> {
        self.nearest_index(value).map(|i| self.values[i])
    }
}

impl From<CentroidSet> for Vec<u32> {
    fn from(set: CentroidSet) -> Self {
        set.values
    }
}

/// Nearest entry of a sorted, non-empty slice; the lower index wins ties.
fn nearest_index(sorted: &[u32], value: u32) -> usize {
    let above = sorted.partition_point(|&c| c < value);
    if above == 0 {
        return 0;
    }
    if above == sorted.len() {
        return sorted.len() - 1;
    }
    let below = above - 1;
    if sorted[above] - value < value - sorted[below] {
        above
    } else {
        below
    }
}

/// Tuning for [`cluster_with`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterParams {
    /// p-value below which a group is treated as multimodal.
    pub alpha: f64,
    /// Groups spanning fewer levels than this never split.
    pub min_group_size: usize,
    /// Right boundary used when splitting the highest centroid.
    /// Defaults to the histogram's top level and is clamped to it.
    pub upper_bound: Option<u32>,
    /// Starting centroid. Defaults to `levels / 2`.
    pub seed: Option<u32>,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            min_group_size: DEFAULT_MIN_GROUP_SIZE,
            upper_bound: None,
            seed: None,
        }
    }
}

impl ClusterParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn min_group_size(mut self, n: usize) -> Self {
        self.min_group_size = n;
        self
    }

    pub fn upper_bound(mut self, bound: u32) -> Self {
        self.upper_bound = Some(bound);
        self
    }

    pub fn seed(mut self, level: u32) -> Self {
        self.seed = Some(level);
        self
    }
}

/// Cluster a histogram with the given threshold and minimum group size.
pub fn cluster(histogram: &Histogram, alpha: f64, min_group_size: usize) -> CentroidSet {
    let params = ClusterParams::new()
        .alpha(alpha)
        .min_group_size(min_group_size);
    cluster_with(histogram, &params)
}

/// Cluster a histogram into an adaptively sized set of centroids.
///
/// Every returned centroid lies in `0..levels`. The result is the settled centroid
/// vector of the last round, so one more settle pass leaves it unchanged.
pub fn cluster_with(histogram: &Histogram, params: &ClusterParams) -> CentroidSet {
    let top = histogram.top_level();
    let upper = params.upper_bound.map_or(top, |b| b.min(top));
    let seed = params
        .seed
        .map_or(histogram.levels() as u32 / 2, |s| s.min(top));

    let mut centroids = vec![seed];
    let mut round = 0usize;

    loop {
        let (settled, groups) = settle(centroids, histogram);
        let candidates = split_groups(&settled, &groups, histogram, params, upper);
        round += 1;
        log::debug!(
            "round {round}: {} centroids settled, {} proposed",
            settled.len(),
            candidates.len()
        );

        if candidates.len() <= settled.len() {
            return CentroidSet { values: settled };
        }
        centroids = candidates.into_iter().collect();
    }
}

/// Run weighted Lloyd iterations until the centroid vector stops changing.
///
/// Returns the settled centroids with the level groups assigned to them.
pub(crate) fn settle(mut centroids: Vec<u32>, histogram: &Histogram) -> (Vec<u32>, Vec<Vec<u32>>) {
    for iteration in 0..MAX_SETTLE_ROUNDS {
        let groups = assign(&centroids, histogram);
        let updated = recenter(&centroids, &groups, histogram);
        if updated == centroids {
            log::trace!("settled after {iteration} iterations: {centroids:?}");
            return (centroids, groups);
        }
        centroids = updated;
    }

    log::warn!(
        "centroids did not settle within {MAX_SETTLE_ROUNDS} iterations: {centroids:?}"
    );
    let groups = assign(&centroids, histogram);
    (centroids, groups)
}

/// Group every populated level under its nearest centroid.
fn assign(centroids: &[u32], histogram: &Histogram) -> Vec<Vec<u32>> {
    let mut groups = vec![Vec::new(); centroids.len()];
    for level in histogram.nonzero_levels() {
        groups[nearest_index(centroids, level)].push(level);
    }
    groups
}

/// Move each centroid to the rounded count-weighted mean of its group.
/// Centroids whose group carries no weight keep their value.
fn recenter(centroids: &[u32], groups: &[Vec<u32>], histogram: &Histogram) -> Vec<u32> {
    centroids
        .iter()
        .zip(groups)
        .map(|(&centroid, group)| {
            let mut weight = 0u64;
            let mut moment = 0u64;
            for &level in group {
                let count = histogram.count(level) as u64;
                weight += count;
                moment += level as u64 * count;
            }
            if weight == 0 {
                centroid
            } else {
                // round(moment / weight), halves rounded up
                ((2 * moment + weight) / (2 * weight)) as u32
            }
        })
        .collect()
}

/// Propose the next centroid set: multimodal groups with room split in two,
/// everything else carries over unchanged.
fn split_groups(
    centroids: &[u32],
    groups: &[Vec<u32>],
    histogram: &Histogram,
    params: &ClusterParams,
    upper: u32,
) -> BTreeSet<u32> {
    let mut next = BTreeSet::new();

    for (i, group) in groups.iter().enumerate() {
        let centroid = centroids[i];
        if group.len() < params.min_group_size || !is_multimodal(group, histogram, params.alpha)
        {
            next.insert(centroid);
            continue;
        }

        let left = if i == 0 { 0 } else { centroids[i - 1] };
        let right = centroids.get(i + 1).copied().unwrap_or(upper);
        if right.saturating_sub(left) >= MIN_SPLIT_ROOM {
            next.insert((centroid + left) / 2);
            next.insert((centroid + right) / 2);
        } else {
            next.insert(centroid);
        }
    }

    next
}

/// Whether the group's counts reject normality at `alpha`.
fn is_multimodal(group: &[u32], histogram: &Histogram, alpha: f64) -> bool {
    let sample: Vec<f64> = group
        .iter()
        .map(|&level| histogram.count(level) as f64)
        .collect();
    normal_test(&sample).is_some_and(|t| t.p_value < alpha)
}

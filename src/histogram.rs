use crate::error::CartoonError;

/// Pixel counts per intensity level for one channel.
///
/// Index is the intensity level, value is the number of pixels at that level.
/// The level count is fixed at construction (256 for 8-bit channels, 180 for
/// 8-bit hue).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    counts: Vec<u32>,
}

impl Histogram {
    /// Wrap a prebuilt count array. Rejects an empty array.
    pub fn new(counts: Vec<u32>) -> Result<Self, CartoonError> {
        if counts.is_empty() {
            return Err(CartoonError::EmptyHistogram);
        }
        Ok(Self { counts })
    }

    /// Count one channel of an interleaved pixel buffer into `levels` bins.
    ///
    /// Every value of that channel must be below `levels`. Counts saturate at
    /// `u32::MAX`.
    pub fn from_channel(
        pixels: &[u8],
        channels: usize,
        channel: usize,
        levels: usize,
    ) -> Result<Self, CartoonError> {
        if channels == 0 {
            return Err(CartoonError::ZeroChannels);
        }
        if channel >= channels {
            return Err(CartoonError::ChannelMismatch {
                channels,
                tables: channel + 1,
            });
        }
        if levels == 0 {
            return Err(CartoonError::EmptyHistogram);
        }

        let mut counts = vec![0u32; levels];
        for pixel in pixels.chunks_exact(channels) {
            let value = pixel[channel];
            let slot = counts
                .get_mut(value as usize)
                .ok_or(CartoonError::LevelOutOfRange {
                    value: value as u32,
                    levels,
                })?;
            *slot = slot.saturating_add(1);
        }

        Ok(Self { counts })
    }

    /// Number of discrete levels (histogram length).
    pub fn levels(&self) -> usize {
        self.counts.len()
    }

    /// Highest valid level, `levels() - 1`.
    pub fn top_level(&self) -> u32 {
        (self.counts.len() - 1) as u32
    }

    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// Count at `level`, zero when out of range.
    pub fn count(&self, level: u32) -> u32 {
        self.counts.get(level as usize).copied().unwrap_or(0)
    }

    /// Total number of samples.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    /// Levels with a nonzero count, ascending.
    pub fn nonzero_levels(&self) -> impl Iterator<Item = u32> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, c)| **c > 0)
            .map(|(level, _)| level as u32)
    }
}

/// Build one histogram per channel of an interleaved buffer.
///
/// `levels[k]` is the level count for channel `k`; its length is the channel count.
pub fn channel_histograms(pixels: &[u8], levels: &[usize]) -> Result<Vec<Histogram>, CartoonError> {
    let channels = levels.len();
    if channels == 0 {
        return Err(CartoonError::ZeroChannels);
    }
    if pixels.len() % channels != 0 {
        return Err(CartoonError::DimensionMismatch {
            len: pixels.len(),
            width: pixels.len() / channels,
            height: 1,
            channels,
        });
    }

    levels
        .iter()
        .enumerate()
        .map(|(channel, &n)| Histogram::from_channel(pixels, channels, channel, n))
        .collect()
}

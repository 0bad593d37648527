use crate::cluster::CentroidSet;
use crate::error::CartoonError;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Remaps interleaved 8-bit pixels channel by channel to their nearest centroid.
///
/// Each channel gets a 256-entry lookup table built once from its centroid set,
/// so remapping is a single table read per sample. Centroids above 255 are
/// clipped to 255.
#[derive(Debug, Clone)]
pub struct ChannelQuantizer {
    tables: Vec<[u8; 256]>,
}

impl ChannelQuantizer {
    /// Build lookup tables for one centroid set per channel.
    pub fn new(centroids: &[CentroidSet]) -> Result<Self, CartoonError> {
        let tables = centroids
            .iter()
            .enumerate()
            .map(|(channel, set)| {
                build_table(set).ok_or(CartoonError::EmptyCentroidSet { channel })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { tables })
    }

    /// Number of channels this quantizer expects.
    pub fn channels(&self) -> usize {
        self.tables.len()
    }

    /// Quantize a `width * height * channels` interleaved buffer into a new buffer.
    pub fn apply(
        &self,
        pixels: &[u8],
        width: usize,
        height: usize,
        channels: usize,
    ) -> Result<Vec<u8>, CartoonError> {
        validate_layout(pixels.len(), width, height, channels)?;
        let mut out = pixels.to_vec();
        self.apply_in_place(&mut out, channels)?;
        Ok(out)
    }

    /// Quantize an interleaved buffer in place.
    pub fn apply_in_place(&self, pixels: &mut [u8], channels: usize) -> Result<(), CartoonError> {
        if channels == 0 {
            return Err(CartoonError::ZeroChannels);
        }
        if channels != self.tables.len() {
            return Err(CartoonError::ChannelMismatch {
                channels,
                tables: self.tables.len(),
            });
        }
        if pixels.len() % channels != 0 {
            return Err(CartoonError::DimensionMismatch {
                len: pixels.len(),
                width: pixels.len() / channels,
                height: 1,
                channels,
            });
        }

        #[cfg(feature = "parallel")]
        pixels
            .par_chunks_mut(channels * PIXELS_PER_TASK)
            .for_each(|run| self.remap_run(run, channels));

        #[cfg(not(feature = "parallel"))]
        self.remap_run(pixels, channels);

        Ok(())
    }

    fn remap_run(&self, run: &mut [u8], channels: usize) {
        for pixel in run.chunks_exact_mut(channels) {
            for (value, table) in pixel.iter_mut().zip(&self.tables) {
                *value = table[*value as usize];
            }
        }
    }
}

/// Pixels handed to each rayon task.
#[cfg(feature = "parallel")]
const PIXELS_PER_TASK: usize = 4096;

/// Nearest-centroid table for every byte value; `None` when the set is empty.
fn build_table(set: &CentroidSet) -> Option<[u8; 256]> {
    let mut table = [0u8; 256];
    for (value, slot) in table.iter_mut().enumerate() {
        let centroid = set.nearest(value as u32)?;
        *slot = centroid.min(u8::MAX as u32) as u8;
    }
    Some(table)
}

fn validate_layout(
    len: usize,
    width: usize,
    height: usize,
    channels: usize,
) -> Result<(), CartoonError> {
    if width == 0 || height == 0 {
        return Err(CartoonError::ZeroDimension);
    }
    if channels == 0 {
        return Err(CartoonError::ZeroChannels);
    }
    let expected = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(channels));
    if expected != Some(len) {
        return Err(CartoonError::DimensionMismatch {
            len,
            width,
            height,
            channels,
        });
    }
    Ok(())
}

/// Replace every sample of an interleaved `width * height * channels` buffer with
/// the nearest centroid of its channel.
///
/// `centroids` must hold exactly one set per channel. Ties resolve to the smaller
/// centroid, matching the clustering assignment.
pub fn quantize(
    pixels: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    centroids: &[CentroidSet],
) -> Result<Vec<u8>, CartoonError> {
    validate_layout(pixels.len(), width, height, channels)?;
    if centroids.len() != channels {
        return Err(CartoonError::ChannelMismatch {
            channels,
            tables: centroids.len(),
        });
    }
    ChannelQuantizer::new(centroids)?.apply(pixels, width, height, channels)
}

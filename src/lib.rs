#![forbid(unsafe_code)]

pub mod cluster;
pub mod error;
pub mod histogram;
pub mod hsv;
pub mod normality;
pub mod quantize;

pub use cluster::{CentroidSet, ClusterParams, cluster, cluster_with};
pub use error::CartoonError;
pub use histogram::Histogram;
pub use hsv::ColorSpace;
pub use imgref::{ImgRef, ImgVec};
pub use quantize::{ChannelQuantizer, quantize};
pub use rgb::RGB8;

/// Configuration for [`cartoonize`].
#[derive(Debug, Clone)]
pub struct CartoonConfig {
    /// p-value threshold for the normality test (0..1, exclusive).
    /// Lower values split less eagerly and give fewer bands.
    pub alpha: f64,
    /// Groups spanning fewer histogram levels than this never split.
    pub min_group_size: usize,
    /// Color space the channels are clustered in.
    pub color_space: ColorSpace,
    /// Right boundary for splitting the highest centroid of each channel.
    /// If None, each channel uses its own top level.
    pub upper_bound: Option<u32>,
    /// Starting centroid for every channel, clamped to each channel's top level.
    /// If None, each channel starts at half its level count.
    pub seed: Option<u32>,
}

impl Default for CartoonConfig {
    fn default() -> Self {
        Self {
            alpha: cluster::DEFAULT_ALPHA,
            min_group_size: cluster::DEFAULT_MIN_GROUP_SIZE,
            color_space: ColorSpace::Rgb,
            upper_bound: None,
            seed: None,
        }
    }
}

impl CartoonConfig {
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

    pub fn color_space(mut self, space: ColorSpace) -> Self {
        self.color_space = space;
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

    fn cluster_params(&self) -> ClusterParams {
        ClusterParams {
            alpha: self.alpha,
            min_group_size: self.min_group_size,
            upper_bound: self.upper_bound,
            seed: self.seed,
        }
    }
}

/// Cartoonization result.
#[derive(Debug)]
pub struct CartoonResult {
    pixels: Vec<RGB8>,
    centroids: Vec<CentroidSet>,
}

impl CartoonResult {
    /// Quantized pixels, row-major, same dimensions as the input.
    pub fn pixels(&self) -> &[RGB8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<RGB8> {
        self.pixels
    }

    /// Per-channel centroids, in the configured color space's channel order.
    pub fn centroids(&self) -> &[CentroidSet] {
        &self.centroids
    }

    /// Total number of bands across all channels.
    pub fn band_count(&self) -> usize {
        self.centroids.iter().map(CentroidSet::len).sum()
    }
}

/// Flatten an RGB image into a small number of bands per channel.
///
/// Each channel is clustered independently from its own histogram, then every
/// pixel is snapped to its channel's nearest centroid.
pub fn cartoonize(
    pixels: &[RGB8],
    width: usize,
    height: usize,
    config: &CartoonConfig,
) -> Result<CartoonResult, CartoonError> {
    validate_inputs(pixels.len(), width, height, config)?;

    let space = config.color_space;

    // 1. Interleave into the working color space
    let mut channels: Vec<u8> = pixels.iter().flat_map(|&p| space.encode(p)).collect();

    // 2. One histogram per channel
    let histograms = histogram::channel_histograms(&channels, &space.levels())?;

    // 3. Adaptive clustering per channel
    let params = config.cluster_params();
    let centroids = cluster_channels(&histograms, &params);
    log::debug!(
        "{:?} centroids for {width}x{height}: {:?}",
        space,
        centroids.iter().map(CentroidSet::as_slice).collect::<Vec<_>>()
    );

    // 4. Snap every sample to its channel's nearest centroid
    let quantizer = ChannelQuantizer::new(&centroids)?;
    let channel_count = space.levels().len();
    if quantizer.channels() != channel_count {
        return Err(CartoonError::ChannelMismatch {
            channels: channel_count,
            tables: quantizer.channels(),
        });
    }
    quantizer.apply_in_place(&mut channels, channel_count)?;

    let pixels = channels
        .chunks_exact(channel_count)
        .map(|c| space.decode([c[0], c[1], c[2]]))
        .collect();

    Ok(CartoonResult { pixels, centroids })
}

/// [`cartoonize`] for an `imgref` image. Honors the image stride.
pub fn cartoonize_img(
    img: ImgRef<'_, RGB8>,
    config: &CartoonConfig,
) -> Result<ImgVec<RGB8>, CartoonError> {
    let (width, height) = (img.width(), img.height());
    let pixels: Vec<RGB8> = img.rows().flatten().copied().collect();
    let result = cartoonize(&pixels, width, height, config)?;
    Ok(ImgVec::new(result.into_pixels(), width, height))
}

#[cfg(feature = "parallel")]
fn cluster_channels(histograms: &[Histogram], params: &ClusterParams) -> Vec<CentroidSet> {
    use rayon::prelude::*;
    histograms
        .par_iter()
        .map(|h| cluster_with(h, params))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn cluster_channels(histograms: &[Histogram], params: &ClusterParams) -> Vec<CentroidSet> {
    histograms.iter().map(|h| cluster_with(h, params)).collect()
}

fn validate_inputs(
    pixel_count: usize,
    width: usize,
    height: usize,
    config: &CartoonConfig,
) -> Result<(), CartoonError> {
    if width == 0 || height == 0 {
        return Err(CartoonError::ZeroDimension);
    }
    if width.checked_mul(height) != Some(pixel_count) {
        return Err(CartoonError::DimensionMismatch {
            len: pixel_count,
            width,
            height,
            channels: 1,
        });
    }
    if !(config.alpha > 0.0 && config.alpha < 1.0) {
        return Err(CartoonError::InvalidAlpha(config.alpha));
    }
    Ok(())
}

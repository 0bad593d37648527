use thiserror::Error;

#[derive(Debug, Error)]
pub enum CartoonError {
    #[error("image dimensions cannot be zero")]
    ZeroDimension,

    #[error("pixel layout must have at least one channel")]
    ZeroChannels,

    #[error(
        "pixel buffer length {len} does not match dimensions {width}x{height}x{channels}"
    )]
    DimensionMismatch {
        len: usize,
        width: usize,
        height: usize,
        channels: usize,
    },

    #[error("pixel data has {channels} channels but the centroid table has {tables}")]
    ChannelMismatch { channels: usize, tables: usize },

    #[error("histogram must have at least one level")]
    EmptyHistogram,

    #[error("value {value} does not fit a histogram of {levels} levels")]
    LevelOutOfRange { value: u32, levels: usize },

    #[error("centroid set for channel {channel} is empty")]
    EmptyCentroidSet { channel: usize },

    #[error("alpha must be a finite value in (0, 1), got {0}")]
    InvalidAlpha(f64),
}

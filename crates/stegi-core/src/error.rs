use thiserror::Error;

#[derive(Error, Debug)]
pub enum StegiError {
    /// Represents an array that is not laid out as rows × columns × channels,
    /// for example a plain grayscale image or a channel count no image can be built from
    #[error("Invalid array shape {0:?}, expected rows × columns × channels")]
    InvalidShape(Vec<usize>),

    /// Represents a channel mask that selects more channels than the image has
    #[error("Invalid channel mask {mask:b} for an image with {channels} channels")]
    InvalidMask { mask: u32, channels: usize },

    /// Represents an unreadable input image. For example, a broken PNG file
    #[error("Image media is invalid")]
    InvalidImageMedia,

    /// Represents an output file whose extension maps to no known image format
    #[error("Output format is not supported: {0}")]
    UnsupportedOutputFormat(String),

    /// Represents a failure when encoding an image file.
    #[error("Image encoding error")]
    ImageEncodingError,

    /// Represents a failure to write target file.
    #[error("Write error: {source}")]
    WriteError { source: std::io::Error },

    /// Represents a failure to hand an image over to the system viewer.
    #[error("Viewer error: {source}")]
    ViewerError { source: std::io::Error },

    /// Represents all other cases of `std::io::Error`.
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error("No input image set")]
    InputNotSet,
}

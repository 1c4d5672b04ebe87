use std::fmt::Display;

#[derive(Debug)]
pub enum Error {
    PPMFileDoesNotContainRequiredToken(&'static str),
    ParsingOfTokenFailed(&'static str),
    UnsupportedFormat(String),
    InvalidImageSize,
    MismatchOfSizeBetweenHeaderAndValues,
    ChannelExceedsMaxIntensity(u16, u16),
    IndexOutOfPalette(u64, usize),
    PaletteTooLarge(usize),
    MissingResizedRows(u32, u32),
    InvalidArgument {
        operation: &'static str,
        value: String,
    },
    UnableToOpenInputFileForReading(String, std::io::Error),
    UnableToOpenOutputFileForWriting(String, std::io::Error),
    FailedToReadImageData(std::io::Error),
    FailedToWriteImageData(std::io::Error),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PPMFileDoesNotContainRequiredToken(token_name) => {
                write!(f, "Expected token '{}' not found in image file", token_name)
            }
            Self::ParsingOfTokenFailed(token_name) => {
                write!(f, "Parsing of token '{}' failed", token_name)
            }
            Self::UnsupportedFormat(tag) => {
                write!(f, "Unsupported image format '{}'", tag)
            }
            Self::InvalidImageSize => {
                write!(
                    f,
                    "Invalid image size. Width, height and max intensity must be positive and max intensity at most 65535."
                )
            }
            Self::MismatchOfSizeBetweenHeaderAndValues => {
                write!(
                    f,
                    "Number of pixels does not match the size provided in header"
                )
            }
            Self::ChannelExceedsMaxIntensity(value, max_intensity) => {
                write!(
                    f,
                    "Color channel value {} exceeds max intensity {}",
                    value, max_intensity
                )
            }
            Self::IndexOutOfPalette(index, palette_size) => {
                write!(
                    f,
                    "Pixel index {} is out of range for a palette of {} colors",
                    index, palette_size
                )
            }
            Self::PaletteTooLarge(palette_size) => {
                write!(
                    f,
                    "Palette of {} colors is too large to be addressed by a 4 byte index",
                    palette_size
                )
            }
            Self::MissingResizedRows(first_row, last_row) => {
                write!(
                    f,
                    "Resize worker did not deliver rows {} to {}",
                    first_row, last_row
                )
            }
            Self::InvalidArgument { operation, value } => {
                write!(f, "Invalid argument for {}: {}", operation, value)
            }
            Self::UnableToOpenInputFileForReading(path, error) => {
                write!(
                    f,
                    "Unable to open input file '{}' for reading: {}",
                    path, error
                )
            }
            Self::UnableToOpenOutputFileForWriting(path, error) => {
                write!(
                    f,
                    "Unable to open output file '{}' for writing: {}",
                    path, error
                )
            }
            Self::FailedToReadImageData(error) => {
                write!(f, "Failed to read image data: {}", error)
            }
            Self::FailedToWriteImageData(error) => {
                write!(f, "Failed to write image data: {}", error)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnableToOpenInputFileForReading(_, error)
            | Self::UnableToOpenOutputFileForWriting(_, error)
            | Self::FailedToReadImageData(error)
            | Self::FailedToWriteImageData(error) => Some(error),
            _ => None,
        }
    }
}

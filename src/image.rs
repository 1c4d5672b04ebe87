use std::fmt::Display;

use crate::color::{Channel, Color, MAX_INTENSITY_FOR_1B};
use crate::error::Error;
use crate::Result;

pub mod palette;
pub mod reader;
pub mod storage;
pub mod transformer;
pub mod writer;

use storage::{ColorStream, PixelLayout, Pixels};

pub trait ImageReader {
    fn read_image(&mut self) -> Result<Image>;
}

pub trait ImageWriter {
    fn write_image(&mut self) -> Result<()>;
}

/// Raster of a single channel width.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap<T> {
    width: u32,
    height: u32,
    max_intensity: u16,
    pixels: Pixels<T>,
}

impl<T: Channel> Bitmap<T> {
    pub fn new(width: u32, height: u32, max_intensity: u16, pixels: Pixels<T>) -> Result<Self> {
        if width == 0 || height == 0 || max_intensity == 0 {
            return Err(Error::InvalidImageSize);
        }
        if pixel_count(width, height)? != pixels.len() {
            return Err(Error::MismatchOfSizeBetweenHeaderAndValues);
        }
        let max_channel = pixels
            .colors()
            .map(|color| color.max_channel().to_u64())
            .max()
            .unwrap_or(0);
        if max_channel > max_intensity as u64 {
            return Err(Error::ChannelExceedsMaxIntensity(
                max_channel as u16,
                max_intensity,
            ));
        }
        Ok(Self {
            width,
            height,
            max_intensity,
            pixels,
        })
    }

    pub fn from_colors<I>(
        width: u32,
        height: u32,
        max_intensity: u16,
        layout: PixelLayout,
        colors: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = Color<T>>,
    {
        Self::new(
            width,
            height,
            max_intensity,
            Pixels::collect_with_layout(layout, colors),
        )
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn max_intensity(&self) -> u16 {
        self.max_intensity
    }

    pub fn pixels(&self) -> &Pixels<T> {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut Pixels<T> {
        &mut self.pixels
    }

    pub fn layout(&self) -> PixelLayout {
        self.pixels.layout()
    }

    pub fn to_layout(&self, layout: PixelLayout) -> Self {
        Self {
            pixels: self.pixels.to_layout(layout),
            ..*self
        }
    }

    pub fn color_at(&self, column_index: u32, row_index: u32) -> Color<T> {
        let index = row_index as usize * self.width as usize + column_index as usize;
        self.pixels.color_at(index)
    }
}

/// An image as read from disk, channel width chosen by its max intensity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Image {
    Small(Bitmap<u8>),
    Large(Bitmap<u16>),
}

impl Image {
    pub fn width(&self) -> u32 {
        match self {
            Self::Small(bitmap) => bitmap.width(),
            Self::Large(bitmap) => bitmap.width(),
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            Self::Small(bitmap) => bitmap.height(),
            Self::Large(bitmap) => bitmap.height(),
        }
    }

    pub fn max_intensity(&self) -> u16 {
        match self {
            Self::Small(bitmap) => bitmap.max_intensity(),
            Self::Large(bitmap) => bitmap.max_intensity(),
        }
    }

    pub fn pixel_count(&self) -> usize {
        match self {
            Self::Small(bitmap) => bitmap.pixels().len(),
            Self::Large(bitmap) => bitmap.pixels().len(),
        }
    }

    pub fn layout(&self) -> PixelLayout {
        match self {
            Self::Small(bitmap) => bitmap.layout(),
            Self::Large(bitmap) => bitmap.layout(),
        }
    }

    pub fn to_layout(&self, layout: PixelLayout) -> Self {
        match self {
            Self::Small(bitmap) => Self::Small(bitmap.to_layout(layout)),
            Self::Large(bitmap) => Self::Large(bitmap.to_layout(layout)),
        }
    }

    pub fn pixel_format(&self) -> PixelFormat {
        PixelFormat::for_max_intensity(self.max_intensity())
    }

    pub fn info(&self) -> ImageInfo {
        ImageInfo {
            width: self.width(),
            height: self.height(),
            max_intensity: self.max_intensity(),
            pixel_format: self.pixel_format(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    /// 3 bytes per pixel
    Small,
    /// 6 bytes per pixel
    Large,
}

impl PixelFormat {
    pub fn for_max_intensity(max_intensity: u16) -> Self {
        if max_intensity <= MAX_INTENSITY_FOR_1B {
            Self::Small
        } else {
            Self::Large
        }
    }

    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::Small => 3 * u8::BYTES,
            Self::Large => 3 * u16::BYTES,
        }
    }
}

impl Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Small => write!(
                f,
                "{} bytes per pixel (8-bit color depth)",
                self.bytes_per_pixel()
            ),
            Self::Large => write!(
                f,
                "{} bytes per pixel (16-bit color depth)",
                self.bytes_per_pixel()
            ),
        }
    }
}

/// Metadata reported by the `info` operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub max_intensity: u16,
    pub pixel_format: PixelFormat,
}

impl Display for ImageInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Width: {} px", self.width)?;
        writeln!(f, "Height: {} px", self.height)?;
        writeln!(f, "Max Color Value: {}", self.max_intensity)?;
        write!(f, "Pixel Format: {}", self.pixel_format)
    }
}

pub(crate) fn pixel_count(width: u32, height: u32) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .ok_or(Error::InvalidImageSize)
}

#[cfg(test)]
mod test {
    use super::storage::PixelLayout;
    use super::{Bitmap, Image, PixelFormat};
    use crate::color::Color;
    use crate::error::Error;

    fn small_bitmap(layout: PixelLayout) -> Bitmap<u8> {
        Bitmap::from_colors(
            2,
            2,
            255,
            layout,
            vec![
                Color::new(255, 0, 0),
                Color::new(0, 255, 0),
                Color::new(0, 0, 255),
                Color::new(255, 255, 0),
            ],
        )
        .expect("bitmap should be valid")
    }

    #[test]
    fn color_at_is_row_major() {
        let bitmap = small_bitmap(PixelLayout::Planar);
        assert_eq!(bitmap.color_at(0, 1), Color::new(0, 0, 255));
        assert_eq!(bitmap.color_at(1, 0), Color::new(0, 255, 0));
    }

    #[test]
    fn reject_pixel_count_mismatch() {
        let result = Bitmap::from_colors(
            3,
            2,
            255,
            PixelLayout::Interleaved,
            vec![Color::new(0_u8, 0, 0)],
        );
        assert!(matches!(
            result,
            Err(Error::MismatchOfSizeBetweenHeaderAndValues)
        ));
    }

    #[test]
    fn reject_channel_above_max_intensity() {
        let result = Bitmap::from_colors(
            1,
            1,
            100,
            PixelLayout::Interleaved,
            vec![Color::new(0_u8, 101, 0)],
        );
        assert!(matches!(
            result,
            Err(Error::ChannelExceedsMaxIntensity(101, 100))
        ));
    }

    #[test]
    fn reject_zero_dimensions() {
        let result = Bitmap::<u8>::from_colors(0, 2, 255, PixelLayout::Interleaved, vec![]);
        assert!(matches!(result, Err(Error::InvalidImageSize)));
    }

    #[test]
    fn layouts_compare_equal_after_conversion() {
        let interleaved = Image::Small(small_bitmap(PixelLayout::Interleaved));
        let planar = Image::Small(small_bitmap(PixelLayout::Planar));
        assert_eq!(interleaved.to_layout(PixelLayout::Planar), planar);
    }

    #[test]
    fn info_reports_small_pixel_format() {
        let image = Image::Small(small_bitmap(PixelLayout::Interleaved));
        let info = image.info();
        assert_eq!(info.pixel_format, PixelFormat::Small);
        let text = info.to_string();
        assert!(text.contains("Width: 2 px"));
        assert!(text.contains("3 bytes per pixel (8-bit color depth)"));
    }

    #[test]
    fn large_pixel_format_for_16_bit_intensity() {
        assert_eq!(PixelFormat::for_max_intensity(256), PixelFormat::Large);
        assert_eq!(
            PixelFormat::for_max_intensity(65535).to_string(),
            "6 bytes per pixel (16-bit color depth)"
        );
    }
}

use std::io::Read;

use super::super::storage::PixelLayout;
use super::super::{pixel_count, Bitmap, Image, ImageReader};
use super::{read_color, HeaderTokenizer, MAX_PREALLOCATED_ITEMS};
use crate::color::{Channel, MAX_INTENSITY_FOR_1B};
use crate::error::Error;

pub const PPM_MAGIC_NUMBER: &str = "P6";

const P6_HEADER_TOKEN_NAME: &str = "P6 Header";
const WIDTH_HEADER_TOKEN_NAME: &str = "Width Header";
const HEIGHT_HEADER_TOKEN_NAME: &str = "Height Header";
const MAX_VALUE_HEADER_TOKEN_NAME: &str = "Max Value Header";

/// Reads binary (`P6`) portable pixmaps.
pub struct PPMImageReader<T: Read> {
    reader: T,
    layout: PixelLayout,
}

impl<T: Read> PPMImageReader<T> {
    pub fn new(reader: T, layout: PixelLayout) -> Self {
        Self { reader, layout }
    }
}

impl<T: Read> ImageReader for PPMImageReader<T> {
    fn read_image(&mut self) -> crate::Result<Image> {
        let header = {
            let mut tokenizer = HeaderTokenizer::new(&mut self.reader);
            PPMHeader::parse(&mut tokenizer)?
        };
        log::debug!(
            "PPM header: {}x{} with max value {}",
            header.width,
            header.height,
            header.max_intensity
        );
        if header.max_intensity <= MAX_INTENSITY_FOR_1B {
            self.read_bitmap(&header).map(Image::Small)
        } else {
            self.read_bitmap(&header).map(Image::Large)
        }
    }
}

impl<T: Read> PPMImageReader<T> {
    fn read_bitmap<C: Channel>(&mut self, header: &PPMHeader) -> crate::Result<Bitmap<C>> {
        let number_of_pixels = pixel_count(header.width, header.height)?;
        let mut colors = Vec::with_capacity(number_of_pixels.min(MAX_PREALLOCATED_ITEMS));
        for _ in 0..number_of_pixels {
            colors.push(read_color::<C, _>(&mut self.reader, header.max_intensity)?);
        }
        Bitmap::from_colors(
            header.width,
            header.height,
            header.max_intensity,
            self.layout,
            colors,
        )
    }
}

struct PPMHeader {
    width: u32,
    height: u32,
    max_intensity: u16,
}

impl PPMHeader {
    fn parse<R: Read>(tokenizer: &mut HeaderTokenizer<'_, R>) -> crate::Result<Self> {
        let magic_number = tokenizer.expect_token(P6_HEADER_TOKEN_NAME)?;
        Self::check_magic_number(&magic_number)?;
        let width: u32 = tokenizer.parse_token(WIDTH_HEADER_TOKEN_NAME)?;
        let height: u32 = tokenizer.parse_token(HEIGHT_HEADER_TOKEN_NAME)?;
        let max_intensity: u32 = tokenizer.parse_token(MAX_VALUE_HEADER_TOKEN_NAME)?;
        Self::check_dimensions(width, height, max_intensity)?;
        Ok(Self {
            width,
            height,
            max_intensity: max_intensity as u16,
        })
    }

    fn check_magic_number(magic_number: &str) -> crate::Result<()> {
        if magic_number != PPM_MAGIC_NUMBER {
            return Err(Error::UnsupportedFormat(magic_number.to_owned()));
        }
        Ok(())
    }

    fn check_dimensions(width: u32, height: u32, max_intensity: u32) -> crate::Result<()> {
        if width == 0 || height == 0 || max_intensity == 0 || max_intensity > u16::MAX as u32 {
            return Err(Error::InvalidImageSize);
        }
        Ok(())
    }
}

use std::io::Read;

use super::super::palette::IndexWidth;
use super::super::storage::PixelLayout;
use super::super::{pixel_count, Bitmap, Image, ImageReader};
use super::{
    map_payload_error, read_color, HeaderTokenizer, MAX_PREALLOCATED_ITEMS,
};
use crate::color::{Channel, Color, MAX_INTENSITY_FOR_1B};
use crate::error::Error;

pub const CPPM_MAGIC_NUMBER: &str = "C6";

const C6_HEADER_TOKEN_NAME: &str = "C6 Header";
const WIDTH_HEADER_TOKEN_NAME: &str = "Width Header";
const HEIGHT_HEADER_TOKEN_NAME: &str = "Height Header";
const MAX_VALUE_HEADER_TOKEN_NAME: &str = "Max Value Header";
const PALETTE_SIZE_HEADER_TOKEN_NAME: &str = "Palette Size Header";

/// Decodes the palette indexed format written by
/// [`CppmImageWriter`](crate::image::writer::cppm::CppmImageWriter).
pub struct CppmImageReader<T: Read> {
    reader: T,
    layout: PixelLayout,
}

impl<T: Read> CppmImageReader<T> {
    pub fn new(reader: T, layout: PixelLayout) -> Self {
        Self { reader, layout }
    }

    fn read_bitmap<C: Channel>(&mut self, header: &CppmHeader) -> crate::Result<Bitmap<C>> {
        let mut palette: Vec<Color<C>> =
            Vec::with_capacity(header.palette_size.min(MAX_PREALLOCATED_ITEMS));
        for _ in 0..header.palette_size {
            palette.push(read_color(&mut self.reader, header.max_intensity)?);
        }
        let index_width = IndexWidth::for_palette_size(header.palette_size)?;
        let number_of_pixels = pixel_count(header.width, header.height)?;
        let mut colors = Vec::with_capacity(number_of_pixels.min(MAX_PREALLOCATED_ITEMS));
        for _ in 0..number_of_pixels {
            let index = index_width
                .read_index(&mut self.reader)
                .map_err(map_payload_error)?;
            let color = usize::try_from(index)
                .ok()
                .and_then(|i| palette.get(i))
                .ok_or(Error::IndexOutOfPalette(index, palette.len()))?;
            colors.push(*color);
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

impl<T: Read> ImageReader for CppmImageReader<T> {
    fn read_image(&mut self) -> crate::Result<Image> {
        let header = {
            let mut tokenizer = HeaderTokenizer::new(&mut self.reader);
            CppmHeader::parse(&mut tokenizer)?
        };
        log::debug!(
            "CPPM header: {}x{}, max value {}, {} palette colors",
            header.width,
            header.height,
            header.max_intensity,
            header.palette_size
        );
        if header.max_intensity <= MAX_INTENSITY_FOR_1B {
            self.read_bitmap(&header).map(Image::Small)
        } else {
            self.read_bitmap(&header).map(Image::Large)
        }
    }
}

struct CppmHeader {
    width: u32,
    height: u32,
    max_intensity: u16,
    palette_size: usize,
}

impl CppmHeader {
    fn parse<R: Read>(tokenizer: &mut HeaderTokenizer<'_, R>) -> crate::Result<Self> {
        let magic_number = tokenizer.expect_token(C6_HEADER_TOKEN_NAME)?;
        if magic_number != CPPM_MAGIC_NUMBER {
            return Err(Error::UnsupportedFormat(magic_number));
        }
        let width: u32 = tokenizer.parse_token(WIDTH_HEADER_TOKEN_NAME)?;
        let height: u32 = tokenizer.parse_token(HEIGHT_HEADER_TOKEN_NAME)?;
        let max_intensity: u32 = tokenizer.parse_token(MAX_VALUE_HEADER_TOKEN_NAME)?;
        let palette_size: usize = tokenizer.parse_token(PALETTE_SIZE_HEADER_TOKEN_NAME)?;
        if width == 0
            || height == 0
            || max_intensity == 0
            || max_intensity > u16::MAX as u32
            || palette_size == 0
        {
            return Err(Error::InvalidImageSize);
        }
        Ok(Self {
            width,
            height,
            max_intensity: max_intensity as u16,
            palette_size,
        })
    }
}

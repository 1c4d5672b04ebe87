use std::io::{self, Write};

use super::super::palette::{IndexWidth, Palette};
use super::super::storage::ColorStream;
use super::super::{Bitmap, Image, ImageWriter};
use crate::color::Channel;
use crate::error::Error;
use crate::image::reader::cppm::CPPM_MAGIC_NUMBER;
use crate::logger;

/// Writes an image as a palette followed by one fixed width index per pixel.
///
/// ```text
/// C6 <width> <height> <max value> <palette size>\n
/// palette size * (red, green, blue)   1 or 2 bytes per channel
/// width * height * index              1, 2 or 4 bytes per index
/// ```
///
/// Multi-byte values are little-endian.
pub struct CppmImageWriter<'a, T: Write> {
    writer: T,
    image: &'a Image,
}

impl<'a, T: Write> CppmImageWriter<'a, T> {
    pub fn new(writer: T, image: &'a Image) -> Self {
        Self { writer, image }
    }

    fn write_bitmap<C: Channel>(&mut self, bitmap: &Bitmap<C>) -> crate::Result<()> {
        let palette = Palette::from_stream(bitmap.pixels());
        let index_width = palette.index_width()?;
        log::debug!(
            "Palette holds {} colors, using {} byte indices",
            palette.len(),
            index_width.bytes()
        );
        self.write_header(bitmap, palette.len())
            .and_then(|_| self.write_palette(&palette))
            .and_then(|_| self.write_indices(bitmap, &palette, index_width))
            .and_then(|_| self.writer.flush())
            .map_err(Error::FailedToWriteImageData)
    }

    fn write_header<C: Channel>(&mut self, bitmap: &Bitmap<C>, palette_size: usize) -> io::Result<()> {
        let header = format!(
            "{} {} {} {} {}\n",
            CPPM_MAGIC_NUMBER,
            bitmap.width(),
            bitmap.height(),
            bitmap.max_intensity(),
            palette_size
        );
        logger::log_bytes("CPPM header", header.as_bytes());
        self.writer.write_all(header.as_bytes())
    }

    fn write_palette<C: Channel>(&mut self, palette: &Palette<C>) -> io::Result<()> {
        let mut content = Vec::with_capacity(palette.len() * 3 * C::BYTES);
        for color in palette.colors() {
            color.write_to(&mut content)?;
        }
        logger::log_bytes("CPPM palette", &content);
        self.writer.write_all(&content)
    }

    fn write_indices<C: Channel>(
        &mut self,
        bitmap: &Bitmap<C>,
        palette: &Palette<C>,
        index_width: IndexWidth,
    ) -> io::Result<()> {
        for color in bitmap.pixels().colors() {
            let index = palette.index_of(&color).ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("color {:?} missing from palette", color),
                )
            })?;
            index_width.write_index(&mut self.writer, index)?;
        }
        Ok(())
    }
}

impl<T: Write> ImageWriter for CppmImageWriter<'_, T> {
    fn write_image(&mut self) -> crate::Result<()> {
        log::info!(
            "Writing CPPM image {}x{}",
            self.image.width(),
            self.image.height()
        );
        let image = self.image;
        match image {
            Image::Small(bitmap) => self.write_bitmap(bitmap),
            Image::Large(bitmap) => self.write_bitmap(bitmap),
        }
    }
}

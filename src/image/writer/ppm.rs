use std::io::{self, Write};

use super::super::storage::ColorStream;
use super::super::{Bitmap, Image, ImageWriter};
use crate::color::Channel;
use crate::error::Error;
use crate::image::reader::ppm::PPM_MAGIC_NUMBER;

pub struct PPMImageWriter<'a, T: Write> {
    writer: T,
    image: &'a Image,
}

impl<'a, T: Write> PPMImageWriter<'a, T> {
    pub fn new(writer: T, image: &'a Image) -> Self {
        Self { writer, image }
    }

    fn write_bitmap<C: Channel>(writer: &mut T, bitmap: &Bitmap<C>) -> io::Result<()> {
        write!(
            writer,
            "{}\n{} {} {}\n",
            PPM_MAGIC_NUMBER,
            bitmap.width(),
            bitmap.height(),
            bitmap.max_intensity()
        )?;
        for color in bitmap.pixels().colors() {
            color.write_to(writer)?;
        }
        writer.flush()
    }
}

impl<T: Write> ImageWriter for PPMImageWriter<'_, T> {
    fn write_image(&mut self) -> crate::Result<()> {
        log::info!(
            "Writing PPM image {}x{}",
            self.image.width(),
            self.image.height()
        );
        match self.image {
            Image::Small(bitmap) => Self::write_bitmap(&mut self.writer, bitmap),
            Image::Large(bitmap) => Self::write_bitmap(&mut self.writer, bitmap),
        }
        .map_err(Error::FailedToWriteImageData)
    }
}

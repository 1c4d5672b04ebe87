use std::ops::Range;
use std::sync::{mpsc, Arc};

use threadpool::ThreadPool;

use super::super::{pixel_count, Bitmap, Image};
use crate::color::{Channel, Color};
use crate::error::Error;
use crate::Result;

/// Position in the source that an output coordinate is sampled from.
///
/// Both ends of the axis map onto each other. A single output pixel samples
/// the first source pixel.
fn source_position(target: u32, source_size: u32, output_size: u32) -> f64 {
    if output_size <= 1 {
        return 0.0;
    }
    (target as u64 * (source_size as u64 - 1)) as f64 / (output_size - 1) as f64
}

struct SamplePoint {
    low: u32,
    high: u32,
    weight: f64,
}

impl SamplePoint {
    fn new(target: u32, source_size: u32, output_size: u32) -> Self {
        let position = source_position(target, source_size, output_size);
        let last = source_size - 1;
        let floor = position.floor();
        SamplePoint {
            low: (floor as u32).min(last),
            high: (position.ceil() as u32).min(last),
            weight: position - floor,
        }
    }
}

fn interpolate(low: f64, high: f64, weight: f64) -> f64 {
    low * (1.0 - weight) + high * weight
}

fn interpolate_color<T: Channel>(source: &Bitmap<T>, x: &SamplePoint, y: &SamplePoint) -> Color<T> {
    let top_left = source.color_at(x.low, y.low);
    let top_right = source.color_at(x.high, y.low);
    let bottom_left = source.color_at(x.low, y.high);
    let bottom_right = source.color_at(x.high, y.high);
    let max_intensity = source.max_intensity() as f64;
    let channel = |axis: usize| {
        let sample = |color: &Color<T>| color.channel(axis).to_u64() as f64;
        let top = interpolate(sample(&top_left), sample(&top_right), x.weight);
        let bottom = interpolate(sample(&bottom_left), sample(&bottom_right), x.weight);
        let value = interpolate(top, bottom, y.weight).clamp(0.0, max_intensity);
        T::from_u64_saturating(value as u64)
    };
    Color::new(channel(0), channel(1), channel(2))
}

fn resize_rows<T: Channel>(
    source: &Bitmap<T>,
    width: u32,
    height: u32,
    rows: Range<u32>,
) -> Vec<Color<T>> {
    let columns: Vec<SamplePoint> = (0..width)
        .map(|column| SamplePoint::new(column, source.width(), width))
        .collect();
    rows.flat_map(|row| {
        let y = SamplePoint::new(row, source.height(), height);
        columns
            .iter()
            .map(move |x| interpolate_color(source, x, &y))
    })
    .collect()
}

/// Bilinear resize. Output rows are split into one band per pool thread; the
/// bands are stitched back in row order, so the result does not depend on the
/// number of threads.
pub struct Resizer<'a> {
    threadpool: &'a ThreadPool,
}

impl<'a> Resizer<'a> {
    pub fn new(threadpool: &'a ThreadPool) -> Self {
        Resizer { threadpool }
    }

    pub fn resize(&self, image: Image, width: u32, height: u32) -> Result<Image> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidArgument {
                operation: "resize",
                value: format!("{}x{}", width, height),
            });
        }
        log::info!(
            "Resizing image from {}x{} to {}x{}",
            image.width(),
            image.height(),
            width,
            height
        );
        match image {
            Image::Small(bitmap) => self.resize_bitmap(bitmap, width, height).map(Image::Small),
            Image::Large(bitmap) => self.resize_bitmap(bitmap, width, height).map(Image::Large),
        }
    }

    fn bands(&self, height: u32) -> Vec<Range<u32>> {
        let band_count = self.threadpool.max_count().clamp(1, height as usize) as u32;
        let band_height = height.div_ceil(band_count);
        (0..height)
            .step_by(band_height as usize)
            .map(|start| start..(start + band_height).min(height))
            .collect()
    }

    fn resize_bitmap<T: Channel>(
        &self,
        source: Bitmap<T>,
        width: u32,
        height: u32,
    ) -> Result<Bitmap<T>> {
        let layout = source.layout();
        let max_intensity = source.max_intensity();
        let source = Arc::new(source);
        let bands = self.bands(height);
        let (sender, receiver) = mpsc::channel();
        for (band_index, rows) in bands.iter().cloned().enumerate() {
            let source = Arc::clone(&source);
            let sender = sender.clone();
            self.threadpool.execute(move || {
                let colors = resize_rows(&source, width, height, rows);
                // the receiver outlives every job unless resizing already failed
                let _ = sender.send((band_index, colors));
            });
        }
        drop(sender);

        let mut resized_bands: Vec<Option<Vec<Color<T>>>> = vec![None; bands.len()];
        for (band_index, colors) in receiver {
            resized_bands[band_index] = Some(colors);
        }
        log::debug!("Collected {} resized row bands", bands.len());

        let mut colors = Vec::with_capacity(pixel_count(width, height)?);
        for (rows, band) in bands.iter().zip(resized_bands) {
            let band = band.ok_or(Error::MissingResizedRows(rows.start, rows.end - 1))?;
            colors.extend(band);
        }
        Bitmap::from_colors(width, height, max_intensity, layout, colors)
    }
}

#[cfg(test)]
mod test {
    use threadpool::ThreadPool;

    use super::Resizer;
    use crate::color::Color;
    use crate::error::Error;
    use crate::image::storage::PixelLayout;
    use crate::image::{Bitmap, Image};

    fn gradient_image(width: u32, height: u32, layout: PixelLayout) -> Image {
        let colors: Vec<Color<u16>> = (0..height)
            .flat_map(|row| {
                (0..width).map(move |column| {
                    Color::new((column * 100) as u16, (row * 50) as u16, 1000)
                })
            })
            .collect();
        Image::Large(Bitmap::from_colors(width, height, 1000, layout, colors).unwrap())
    }

    #[test]
    fn identity_resize_keeps_pixels() {
        let threadpool = ThreadPool::new(2);
        let image = gradient_image(5, 4, PixelLayout::Interleaved);
        let resized = Resizer::new(&threadpool)
            .resize(image.clone(), 5, 4)
            .unwrap();
        assert_eq!(resized, image);
    }

    #[test]
    fn upscale_interpolates_between_neighbours() {
        let threadpool = ThreadPool::new(1);
        let image = Image::Small(
            Bitmap::from_colors(
                2,
                1,
                255,
                PixelLayout::Planar,
                vec![Color::new(0_u8, 100, 255), Color::new(100, 0, 255)],
            )
            .unwrap(),
        );
        let Image::Small(bitmap) = Resizer::new(&threadpool).resize(image, 3, 2).unwrap() else {
            panic!("resize must keep the channel width");
        };
        assert_eq!(bitmap.width(), 3);
        assert_eq!(bitmap.height(), 2);
        assert_eq!(bitmap.layout(), PixelLayout::Planar);
        assert_eq!(bitmap.color_at(0, 0), Color::new(0, 100, 255));
        assert_eq!(bitmap.color_at(1, 0), Color::new(50, 50, 255));
        assert_eq!(bitmap.color_at(2, 1), Color::new(100, 0, 255));
    }

    #[test]
    fn single_pixel_output_samples_top_left() {
        let threadpool = ThreadPool::new(3);
        let image = gradient_image(4, 4, PixelLayout::Interleaved);
        let resized = Resizer::new(&threadpool).resize(image, 1, 1).unwrap();
        let Image::Large(bitmap) = resized else {
            panic!("resize must keep the channel width");
        };
        assert_eq!(bitmap.color_at(0, 0), Color::new(0, 0, 1000));
    }

    #[test]
    fn result_does_not_depend_on_thread_count() {
        let image = gradient_image(7, 5, PixelLayout::Interleaved);
        let single = ThreadPool::new(1);
        let many = ThreadPool::new(4);
        let expected = Resizer::new(&single).resize(image.clone(), 13, 9).unwrap();
        let actual = Resizer::new(&many).resize(image, 13, 9).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn layouts_resize_identically() {
        let threadpool = ThreadPool::new(2);
        let resizer = Resizer::new(&threadpool);
        let interleaved = resizer
            .resize(gradient_image(6, 3, PixelLayout::Interleaved), 4, 7)
            .unwrap();
        let planar = resizer
            .resize(gradient_image(6, 3, PixelLayout::Planar), 4, 7)
            .unwrap();
        assert_eq!(interleaved.to_layout(PixelLayout::Planar), planar);
    }

    #[test]
    fn more_threads_than_rows() {
        let threadpool = ThreadPool::new(8);
        let image = gradient_image(3, 3, PixelLayout::Planar);
        let resized = Resizer::new(&threadpool).resize(image, 2, 2).unwrap();
        assert_eq!(resized.pixel_count(), 4);
    }

    #[test]
    fn reject_zero_target_size() {
        let threadpool = ThreadPool::new(1);
        let image = gradient_image(2, 2, PixelLayout::Interleaved);
        assert!(matches!(
            Resizer::new(&threadpool).resize(image, 0, 2),
            Err(Error::InvalidArgument { operation: "resize", .. })
        ));
    }
}

use super::super::storage::ColorStream;
use super::super::{Bitmap, Image};
use crate::color::{Channel, Color, MAX_INTENSITY_FOR_1B};
use crate::error::Error;
use crate::Result;

fn rescale_channel<S: Channel, D: Channel>(value: S, old_max: u16, new_max: u16) -> D {
    D::from_u64_saturating(value.to_u64() * new_max as u64 / old_max as u64)
}

/// Maps every channel from `[0, old max]` onto `[0, new_max]`, rounding down.
pub fn rescale<S: Channel, D: Channel>(source: &Bitmap<S>, new_max: u16) -> Result<Bitmap<D>> {
    let old_max = source.max_intensity();
    let colors = source
        .pixels()
        .colors()
        .map(|color: Color<S>| color.map(|value| rescale_channel::<S, D>(value, old_max, new_max)));
    Bitmap::from_colors(
        source.width(),
        source.height(),
        new_max,
        source.layout(),
        colors,
    )
}

fn rescale_image<S: Channel>(source: &Bitmap<S>, new_max: u16) -> Result<Image> {
    if new_max <= MAX_INTENSITY_FOR_1B {
        rescale::<S, u8>(source, new_max).map(Image::Small)
    } else {
        rescale::<S, u16>(source, new_max).map(Image::Large)
    }
}

impl Image {
    /// The channel width of the result follows `new_max`.
    pub fn with_max_level(&self, new_max: u16) -> Result<Image> {
        if new_max == 0 {
            return Err(Error::InvalidArgument {
                operation: "maxlevel",
                value: new_max.to_string(),
            });
        }
        log::info!(
            "Rescaling intensity from {} to {}",
            self.max_intensity(),
            new_max
        );
        match self {
            Image::Small(bitmap) => rescale_image(bitmap, new_max),
            Image::Large(bitmap) => rescale_image(bitmap, new_max),
        }
    }
}

use clap::builder::PossibleValue;
use clap::ValueEnum;

use crate::color::{Channel, Color};

/// Index based access to the colors of an image, independent of how the
/// channels are laid out in memory.
pub trait ColorStream<T: Channel> {
    fn len(&self) -> usize;

    fn color_at(&self, index: usize) -> Color<T>;

    fn set_color_at(&mut self, index: usize, color: Color<T>);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn colors(&self) -> impl Iterator<Item = Color<T>> + '_ {
        (0..self.len()).map(move |index| self.color_at(index))
    }

    fn fill(&mut self, color: Color<T>) {
        for index in 0..self.len() {
            self.set_color_at(index, color);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelLayout {
    /// one record per pixel (array of structures)
    Interleaved,
    /// one array per channel (structure of arrays)
    Planar,
}

impl ValueEnum for PixelLayout {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Interleaved, Self::Planar]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        match self {
            Self::Interleaved => Some(PossibleValue::new("aos").help("Array of structures")),
            Self::Planar => Some(PossibleValue::new("soa").help("Structure of arrays")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterleavedPixels<T> {
    colors: Vec<Color<T>>,
}

impl<T: Channel> ColorStream<T> for InterleavedPixels<T> {
    fn len(&self) -> usize {
        self.colors.len()
    }

    fn color_at(&self, index: usize) -> Color<T> {
        self.colors[index]
    }

    fn set_color_at(&mut self, index: usize, color: Color<T>) {
        self.colors[index] = color;
    }
}

impl<T> FromIterator<Color<T>> for InterleavedPixels<T> {
    fn from_iter<I: IntoIterator<Item = Color<T>>>(iter: I) -> Self {
        Self {
            colors: iter.into_iter().collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlanarPixels<T> {
    red: Vec<T>,
    green: Vec<T>,
    blue: Vec<T>,
}

impl<T: Channel> ColorStream<T> for PlanarPixels<T> {
    fn len(&self) -> usize {
        self.red.len()
    }

    fn color_at(&self, index: usize) -> Color<T> {
        Color::new(self.red[index], self.green[index], self.blue[index])
    }

    fn set_color_at(&mut self, index: usize, color: Color<T>) {
        self.red[index] = color.red;
        self.green[index] = color.green;
        self.blue[index] = color.blue;
    }
}

impl<T> FromIterator<Color<T>> for PlanarPixels<T> {
    fn from_iter<I: IntoIterator<Item = Color<T>>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let capacity = iter.size_hint().0;
        let mut red = Vec::with_capacity(capacity);
        let mut green = Vec::with_capacity(capacity);
        let mut blue = Vec::with_capacity(capacity);
        for color in iter {
            red.push(color.red);
            green.push(color.green);
            blue.push(color.blue);
        }
        Self { red, green, blue }
    }
}

/// Pixel storage with the layout picked at runtime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Pixels<T> {
    Interleaved(InterleavedPixels<T>),
    Planar(PlanarPixels<T>),
}

impl<T: Channel> Pixels<T> {
    pub fn collect_with_layout<I>(layout: PixelLayout, colors: I) -> Self
    where
        I: IntoIterator<Item = Color<T>>,
    {
        match layout {
            PixelLayout::Interleaved => Self::Interleaved(colors.into_iter().collect()),
            PixelLayout::Planar => Self::Planar(colors.into_iter().collect()),
        }
    }

    pub fn layout(&self) -> PixelLayout {
        match self {
            Self::Interleaved(_) => PixelLayout::Interleaved,
            Self::Planar(_) => PixelLayout::Planar,
        }
    }

    pub fn to_layout(&self, layout: PixelLayout) -> Self {
        if self.layout() == layout {
            return self.clone();
        }
        Self::collect_with_layout(layout, self.colors())
    }
}

impl<T: Channel> ColorStream<T> for Pixels<T> {
    fn len(&self) -> usize {
        match self {
            Self::Interleaved(pixels) => pixels.len(),
            Self::Planar(pixels) => pixels.len(),
        }
    }

    fn color_at(&self, index: usize) -> Color<T> {
        match self {
            Self::Interleaved(pixels) => pixels.color_at(index),
            Self::Planar(pixels) => pixels.color_at(index),
        }
    }

    fn set_color_at(&mut self, index: usize, color: Color<T>) {
        match self {
            Self::Interleaved(pixels) => pixels.set_color_at(index, color),
            Self::Planar(pixels) => pixels.set_color_at(index, color),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{ColorStream, InterleavedPixels, PixelLayout, Pixels, PlanarPixels};
    use crate::color::Color;

    fn test_colors() -> Vec<Color<u8>> {
        vec![
            Color::new(1, 2, 3),
            Color::new(4, 5, 6),
            Color::new(7, 8, 9),
        ]
    }

    #[test]
    fn planar_pixels_split_channels() {
        let pixels: PlanarPixels<u8> = test_colors().into_iter().collect();
        assert_eq!(pixels.red, vec![1, 4, 7]);
        assert_eq!(pixels.green, vec![2, 5, 8]);
        assert_eq!(pixels.blue, vec![3, 6, 9]);
        assert_eq!(pixels.color_at(1), Color::new(4, 5, 6));
    }

    #[test]
    fn both_layouts_store_the_same_colors() {
        let interleaved: InterleavedPixels<u8> = test_colors().into_iter().collect();
        let planar: PlanarPixels<u8> = test_colors().into_iter().collect();
        assert_eq!(interleaved.len(), planar.len());
        assert!(interleaved.colors().eq(planar.colors()));
    }

    #[test]
    fn set_color_in_planar_layout() {
        let mut pixels = Pixels::collect_with_layout(PixelLayout::Planar, test_colors());
        pixels.set_color_at(2, Color::new(0, 0, 0));
        assert_eq!(pixels.color_at(2), Color::new(0, 0, 0));
        assert_eq!(pixels.color_at(0), Color::new(1, 2, 3));
    }

    #[test]
    fn convert_between_layouts() {
        let interleaved = Pixels::collect_with_layout(PixelLayout::Interleaved, test_colors());
        let planar = interleaved.to_layout(PixelLayout::Planar);
        assert_eq!(planar.layout(), PixelLayout::Planar);
        assert!(planar.colors().eq(test_colors().into_iter()));
    }

    #[test]
    fn fill_every_pixel() {
        let mut pixels = Pixels::collect_with_layout(PixelLayout::Interleaved, test_colors());
        pixels.fill(Color::black());
        assert!(pixels.colors().all(|color| color == Color::black()));
    }
}

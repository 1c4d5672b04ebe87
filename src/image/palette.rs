use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use super::storage::ColorStream;
use crate::color::{Channel, Color};
use crate::error::Error;
use crate::Result;

pub const MAX_PALETTE_SIZE_1B: u64 = 1 << 8;
pub const MAX_PALETTE_SIZE_2B: u64 = 1 << 16;
pub const MAX_PALETTE_SIZE_4B: u64 = 1 << 32;

/// Unique colors of an image in order of first occurrence.
#[derive(Clone, Debug, Default)]
pub struct Palette<T> {
    colors: Vec<Color<T>>,
    indices: HashMap<Color<T>, usize>,
}

impl<T: Channel> Palette<T> {
    pub fn from_stream<S: ColorStream<T>>(pixels: &S) -> Self {
        let mut palette = Palette {
            colors: Vec::new(),
            indices: HashMap::new(),
        };
        for color in pixels.colors() {
            palette.insert(color);
        }
        palette
    }

    fn insert(&mut self, color: Color<T>) {
        let next_index = self.colors.len();
        if let Entry::Vacant(entry) = self.indices.entry(color) {
            entry.insert(next_index);
            self.colors.push(color);
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Color<T>] {
        &self.colors
    }

    pub fn index_of(&self, color: &Color<T>) -> Option<usize> {
        self.indices.get(color).copied()
    }

    pub fn color_at(&self, index: usize) -> Option<Color<T>> {
        self.colors.get(index).copied()
    }

    pub fn index_width(&self) -> Result<IndexWidth> {
        IndexWidth::for_palette_size(self.len())
    }
}

/// Byte width of a palette index in the CPPM pixel stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexWidth {
    OneByte,
    TwoBytes,
    FourBytes,
}

impl IndexWidth {
    pub fn for_palette_size(palette_size: usize) -> Result<Self> {
        let size = palette_size as u64;
        if size <= MAX_PALETTE_SIZE_1B {
            Ok(Self::OneByte)
        } else if size <= MAX_PALETTE_SIZE_2B {
            Ok(Self::TwoBytes)
        } else if size <= MAX_PALETTE_SIZE_4B {
            Ok(Self::FourBytes)
        } else {
            Err(Error::PaletteTooLarge(palette_size))
        }
    }

    pub fn bytes(&self) -> usize {
        match self {
            Self::OneByte => 1,
            Self::TwoBytes => 2,
            Self::FourBytes => 4,
        }
    }

    /// The caller guarantees that `index` fits, which holds for every index
    /// of the palette this width was selected for.
    pub fn write_index<W: Write>(&self, writer: &mut W, index: usize) -> io::Result<()> {
        match self {
            Self::OneByte => writer.write_u8(index as u8),
            Self::TwoBytes => writer.write_u16::<LittleEndian>(index as u16),
            Self::FourBytes => writer.write_u32::<LittleEndian>(index as u32),
        }
    }

    pub fn read_index<R: Read>(&self, reader: &mut R) -> io::Result<u64> {
        match self {
            Self::OneByte => reader.read_u8().map(u64::from),
            Self::TwoBytes => reader.read_u16::<LittleEndian>().map(u64::from),
            Self::FourBytes => reader.read_u32::<LittleEndian>().map(u64::from),
        }
    }
}

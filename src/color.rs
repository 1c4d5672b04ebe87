use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

/// Number of channels of a [`Color`], the dimension of the k-d tree.
pub const CHANNEL_COUNT: usize = 3;

/// Largest max intensity that still fits into one byte per channel.
pub const MAX_INTENSITY_FOR_1B: u16 = u8::MAX as u16;

/// Unsigned integer type of one color channel.
///
/// Samples are stored in little-endian byte order whenever they take more
/// than one byte.
pub trait Channel: Copy + Default + Eq + Ord + Hash + Debug + Display + Send + Sync + 'static {
    const BYTES: usize;

    fn to_u64(self) -> u64;

    /// Converts an intensity, saturating at the largest value of the type.
    fn from_u64_saturating(value: u64) -> Self;

    fn write_to<W: Write>(self, writer: &mut W) -> io::Result<()>;

    fn read_from<R: Read>(reader: &mut R) -> io::Result<Self>;
}

impl Channel for u8 {
    const BYTES: usize = 1;

    fn to_u64(self) -> u64 {
        self as u64
    }

    fn from_u64_saturating(value: u64) -> Self {
        value.min(u8::MAX as u64) as u8
    }

    fn write_to<W: Write>(self, writer: &mut W) -> io::Result<()> {
        writer.write_u8(self)
    }

    fn read_from<R: Read>(reader: &mut R) -> io::Result<Self> {
        reader.read_u8()
    }
}

impl Channel for u16 {
    const BYTES: usize = 2;

    fn to_u64(self) -> u64 {
        self as u64
    }

    fn from_u64_saturating(value: u64) -> Self {
        value.min(u16::MAX as u64) as u16
    }

    fn write_to<W: Write>(self, writer: &mut W) -> io::Result<()> {
        writer.write_u16::<LittleEndian>(self)
    }

    fn read_from<R: Read>(reader: &mut R) -> io::Result<Self> {
        reader.read_u16::<LittleEndian>()
    }
}

/// An RGB triplet. The derived order is lexicographic on red, green, blue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Color<T> {
    pub red: T,
    pub green: T,
    pub blue: T,
}

impl<T: Channel> Color<T> {
    pub fn new(red: T, green: T, blue: T) -> Self {
        Color { red, green, blue }
    }

    pub fn black() -> Self {
        Self::default()
    }

    /// Channel by axis index, 0 = red, 1 = green, 2 = blue.
    pub fn channel(&self, axis: usize) -> T {
        match axis % CHANNEL_COUNT {
            0 => self.red,
            1 => self.green,
            _ => self.blue,
        }
    }

    pub fn max_channel(&self) -> T {
        self.red.max(self.green).max(self.blue)
    }

    pub fn squared_distance(&self, other: &Self) -> u64 {
        (0..CHANNEL_COUNT)
            .map(|axis| {
                let difference = self.channel(axis).to_u64().abs_diff(other.channel(axis).to_u64());
                difference * difference
            })
            .sum()
    }

    pub fn map<U, F>(self, mut f: F) -> Color<U>
    where
        F: FnMut(T) -> U,
    {
        Color {
            red: f(self.red),
            green: f(self.green),
            blue: f(self.blue),
        }
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        self.red.write_to(writer)?;
        self.green.write_to(writer)?;
        self.blue.write_to(writer)
    }

    pub fn read_from<R: Read>(reader: &mut R) -> io::Result<Self> {
        let red = T::read_from(reader)?;
        let green = T::read_from(reader)?;
        let blue = T::read_from(reader)?;
        Ok(Color { red, green, blue })
    }
}

use std::{
    fmt::Display,
    fs::{File, OpenOptions},
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};

pub use cli::CLIParser;
pub use error::Error;
use image::{
    reader::ppm::PPMImageReader,
    storage::PixelLayout,
    transformer::resize::Resizer,
    writer::{cppm::CppmImageWriter, ppm::PPMImageWriter},
    Image, ImageInfo, ImageReader, ImageWriter,
};
use threadpool::ThreadPool;

mod cli;
pub mod color;
mod error;
pub mod image;
mod logger;

pub type Result<T> = std::result::Result<T, error::Error>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Info,
    Compress,
    MaxLevel(u16),
    Resize { width: u32, height: u32 },
    CutFreq(u64),
}

pub struct Arguments {
    input_file: PathBuf,
    output_file: PathBuf,
    operation: Operation,
    layout: PixelLayout,
    number_of_threads: usize,
}

/// What a successful run produced.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Info { input_file: PathBuf, info: ImageInfo },
    Written(PathBuf),
}

impl Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info { input_file, info } => {
                writeln!(f, "Metadata for image: {}", input_file.display())?;
                writeln!(f, "--------------------------------")?;
                write!(f, "{}", info)
            }
            Self::Written(output_file) => {
                write!(f, "Output written to {}", output_file.display())
            }
        }
    }
}

fn open_input_file(file_path: &Path) -> Result<File> {
    File::open(file_path).map_err(|e| {
        Error::UnableToOpenInputFileForReading(file_path.display().to_string(), e)
    })
}

fn open_output_file(file_path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(file_path)
        .map_err(|e| {
            Error::UnableToOpenOutputFileForWriting(file_path.display().to_string(), e)
        })
}

fn read_input_image(arguments: &Arguments) -> Result<Image> {
    let input_file = open_input_file(&arguments.input_file)?;
    log::info!("Reading {}", arguments.input_file.display());
    PPMImageReader::new(BufReader::new(input_file), arguments.layout).read_image()
}

fn write_ppm_image(file_path: &Path, image: &Image) -> Result<Outcome> {
    let output_file = open_output_file(file_path)?;
    PPMImageWriter::new(BufWriter::new(output_file), image).write_image()?;
    Ok(Outcome::Written(file_path.to_path_buf()))
}

fn write_cppm_image(file_path: &Path, image: &Image) -> Result<Outcome> {
    let output_file = open_output_file(file_path)?;
    CppmImageWriter::new(BufWriter::new(output_file), image).write_image()?;
    Ok(Outcome::Written(file_path.to_path_buf()))
}

/// Reads the input image, applies the requested operation and writes the
/// result. `info` only reads.
pub fn run(arguments: &Arguments) -> Result<Outcome> {
    let image = read_input_image(arguments)?;
    let output_file = &arguments.output_file;
    match arguments.operation {
        Operation::Info => Ok(Outcome::Info {
            input_file: arguments.input_file.clone(),
            info: image.info(),
        }),
        Operation::Compress => write_cppm_image(output_file, &image),
        Operation::MaxLevel(level) => write_ppm_image(output_file, &image.with_max_level(level)?),
        Operation::Resize { width, height } => {
            let threadpool = ThreadPool::new(arguments.number_of_threads);
            let resized = Resizer::new(&threadpool).resize(image, width, height)?;
            write_ppm_image(output_file, &resized)
        }
        Operation::CutFreq(count) => {
            let mut image = image;
            let replaced = image.cut_frequencies(count);
            log::info!("Replaced {} colors", replaced);
            write_ppm_image(output_file, &image)
        }
    }
}

use crate::image::storage::PixelLayout;
use crate::{Arguments, Operation};
use clap::{
    arg, builder::RangedU64ValueParser, crate_authors, crate_description, crate_name,
    crate_version, value_parser, Arg, ArgMatches, Command,
};
use std::ffi::OsString;
use std::path::PathBuf;
use std::{io, thread};

const INFO_OPERATION: &str = "info";
const COMPRESS_OPERATION: &str = "compress";
const MAXLEVEL_OPERATION: &str = "maxlevel";
const RESIZE_OPERATION: &str = "resize";
const CUTFREQ_OPERATION: &str = "cutfreq";

pub struct CLIParser {
    command: Command,
}

impl CLIParser {
    pub fn new() -> Self {
        let command = Self::create_base_command();
        let command = Self::register_arguments(command);
        let command = Self::register_operations(command);
        CLIParser { command }
    }

    pub fn parse<I, T>(&mut self, itr: I) -> Arguments
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self
            .command
            .try_get_matches_from_mut(itr)
            .unwrap_or_else(|e| e.exit());
        Self::extract_arguments(&matches)
    }

    fn register_arguments(command: Command) -> Command {
        let command = Self::register_input_file_argument(command);
        let command = Self::register_output_file_argument(command);
        let command = Self::register_layout_argument(command);
        Self::register_threads_argument(command)
    }

    fn register_operations(command: Command) -> Command {
        command
            .subcommand_required(true)
            .subcommand_value_name("OPERATION")
            .subcommand(Self::create_info_operation())
            .subcommand(Self::create_compress_operation())
            .subcommand(Self::create_maxlevel_operation())
            .subcommand(Self::create_resize_operation())
            .subcommand(Self::create_cutfreq_operation())
    }

    fn register_input_file_argument(command: Command) -> Command {
        command.arg(Self::create_input_file_argument())
    }

    fn register_output_file_argument(command: Command) -> Command {
        command.arg(Self::create_output_file_argument())
    }

    fn register_layout_argument(command: Command) -> Command {
        command.arg(Self::create_layout_argument())
    }

    fn register_threads_argument(command: Command) -> Command {
        command.arg(Self::create_threads_argument())
    }

    fn create_base_command() -> Command {
        Command::new(crate_name!())
            .version(crate_version!())
            .author(crate_authors!())
            .about(crate_description!())
    }

    fn create_input_file_argument() -> Arg {
        Arg::new("input_file")
            .help("Path to PPM input file")
            .value_parser(value_parser!(PathBuf))
            .required(true)
    }

    fn create_output_file_argument() -> Arg {
        Arg::new("output_file")
            .help("Path to PPM or CPPM output file")
            .value_parser(value_parser!(PathBuf))
            .required(true)
    }

    fn create_layout_argument() -> Arg {
        arg!(-l --layout <LAYOUT> "Memory layout of the pixels")
            .default_value("aos")
            .value_parser(value_parser!(PixelLayout))
    }

    fn create_threads_argument() -> Arg {
        arg!(-t --threads <THREADS> "Number of Threads")
            .default_value(get_number_of_threads().unwrap_or(1).to_string())
            .required(false)
            .value_parser(RangedU64ValueParser::<usize>::new().range(1..))
    }

    fn create_info_operation() -> Command {
        Command::new(INFO_OPERATION).about("Print the metadata of the input image")
    }

    fn create_compress_operation() -> Command {
        Command::new(COMPRESS_OPERATION)
            .about("Write the image in the palette indexed CPPM format")
    }

    fn create_maxlevel_operation() -> Command {
        Command::new(MAXLEVEL_OPERATION)
            .about("Rescale the intensity of every channel to a new max value")
            .arg(
                Arg::new("level")
                    .help("New max intensity")
                    .value_parser(value_parser!(u16).range(1..))
                    .required(true),
            )
    }

    fn create_resize_operation() -> Command {
        Command::new(RESIZE_OPERATION)
            .about("Resize the image by bilinear interpolation")
            .arg(
                Arg::new("width")
                    .help("New width in pixels")
                    .value_parser(value_parser!(u32).range(1..))
                    .required(true),
            )
            .arg(
                Arg::new("height")
                    .help("New height in pixels")
                    .value_parser(value_parser!(u32).range(1..))
                    .required(true),
            )
    }

    fn create_cutfreq_operation() -> Command {
        Command::new(CUTFREQ_OPERATION)
            .about("Replace the least frequent colors by their nearest remaining color")
            .arg(
                Arg::new("count")
                    .help("Number of colors to remove")
                    .value_parser(value_parser!(u64).range(1..))
                    .required(true),
            )
    }

    fn extract_arguments(matches: &ArgMatches) -> Arguments {
        Arguments {
            input_file: Self::extract_input_file_argument(matches),
            output_file: Self::extract_output_file_argument(matches),
            operation: Self::extract_operation(matches),
            layout: Self::extract_layout_argument(matches),
            number_of_threads: Self::extract_threads_argument(matches),
        }
    }

    fn extract_input_file_argument(matches: &ArgMatches) -> PathBuf {
        matches
            .get_one::<PathBuf>("input_file")
            .expect("Required argument input_file not provided")
            .clone()
    }

    fn extract_output_file_argument(matches: &ArgMatches) -> PathBuf {
        matches
            .get_one::<PathBuf>("output_file")
            .expect("Required argument output_file not provided")
            .clone()
    }

    fn extract_layout_argument(matches: &ArgMatches) -> PixelLayout {
        matches
            .get_one::<PixelLayout>("layout")
            .expect("Pixel layout must be provided, but was unset.")
            .to_owned()
    }

    fn extract_threads_argument(matches: &ArgMatches) -> usize {
        matches
            .get_one::<usize>("threads")
            .expect("Required argument threads not provided")
            .to_owned()
    }

    fn extract_operation(matches: &ArgMatches) -> Operation {
        match matches.subcommand() {
            Some((INFO_OPERATION, _)) => Operation::Info,
            Some((COMPRESS_OPERATION, _)) => Operation::Compress,
            Some((MAXLEVEL_OPERATION, operation)) => Operation::MaxLevel(
                *operation
                    .get_one::<u16>("level")
                    .expect("Required argument level not provided"),
            ),
            Some((RESIZE_OPERATION, operation)) => Operation::Resize {
                width: *operation
                    .get_one::<u32>("width")
                    .expect("Required argument width not provided"),
                height: *operation
                    .get_one::<u32>("height")
                    .expect("Required argument height not provided"),
            },
            Some((CUTFREQ_OPERATION, operation)) => Operation::CutFreq(
                *operation
                    .get_one::<u64>("count")
                    .expect("Required argument count not provided"),
            ),
            _ => unreachable!("an operation is required by the command definition"),
        }
    }
}

impl Default for CLIParser {
    fn default() -> Self {
        Self::new()
    }
}

fn get_number_of_threads() -> io::Result<usize> {
    Ok(thread::available_parallelism()?.get())
}

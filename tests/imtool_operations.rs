use imtool::{run, CLIParser, Error, Outcome};
use std::path::{Path, PathBuf};
use std::{env, fs};

const SMALL_IMAGE: &[u8] = &[
    255, 0, 0, //
    0, 255, 0, //
    0, 0, 255, //
    255, 255, 0,
];

fn get_test_directory_path() -> PathBuf {
    let mut path = env::temp_dir();
    path.push(format!("imtool-tests-{}", std::process::id()));
    fs::create_dir_all(&path).expect("Creation of test directory failed");
    path
}

fn get_test_file_path(file_name: &str) -> PathBuf {
    let mut path = get_test_directory_path();
    path.push(file_name);
    path
}

fn write_ppm(file_name: &str, width: u32, height: u32, max: u16, samples: &[u8]) -> PathBuf {
    let path = get_test_file_path(file_name);
    let mut content = format!("P6\n# test image\n{} {}\n{}\n", width, height, max).into_bytes();
    content.extend_from_slice(samples);
    fs::write(&path, content).expect("Writing of input file failed");
    path
}

fn cleanup(path: &Path) {
    if path.exists() && path.is_file() {
        fs::remove_file(path).expect("Deletion of output file failed");
    }
}

fn run_with(input: &PathBuf, output: &PathBuf, operation: &[&str]) -> imtool::Result<Outcome> {
    let mut arguments = vec![
        "test",
        input.to_str().unwrap(),
        output.to_str().unwrap(),
    ];
    arguments.extend_from_slice(operation);
    let mut cli_parser = CLIParser::new();
    run(&cli_parser.parse(arguments))
}

#[test]
fn test_info_reports_metadata() {
    let input = write_ppm("info_input.ppm", 2, 2, 255, SMALL_IMAGE);
    let output = get_test_file_path("info_output.ppm");
    cleanup(&output);
    let outcome = run_with(&input, &output, &["info"]).expect("Info failed");
    let report = outcome.to_string();
    assert!(report.contains("Width: 2 px"));
    assert!(report.contains("Height: 2 px"));
    assert!(report.contains("Max Color Value: 255"));
    assert!(report.contains("Pixel Format: 3 bytes per pixel (8-bit color depth)"));
    assert!(!output.exists(), "Info must not create an output file");
}

#[test]
fn test_compress_four_color_image() {
    for layout in ["aos", "soa"] {
        let input = write_ppm("compress_input.ppm", 2, 2, 255, SMALL_IMAGE);
        let output = get_test_file_path(&format!("compress_output_{}.cppm", layout));
        cleanup(&output);
        let arguments = vec![
            "test",
            "--layout",
            layout,
            input.to_str().unwrap(),
            output.to_str().unwrap(),
            "compress",
        ];
        let outcome = run(&CLIParser::new().parse(arguments)).expect("Compression failed");
        assert_eq!(outcome, Outcome::Written(output.clone()));

        let mut expected = b"C6 2 2 255 4\n".to_vec();
        expected.extend_from_slice(SMALL_IMAGE);
        expected.extend_from_slice(&[0, 1, 2, 3]);
        assert_eq!(fs::read(&output).unwrap(), expected);
        assert_eq!(expected.len(), 29);
    }
}

#[test]
fn test_cutfreq_replaces_least_frequent_color() {
    let input = write_ppm("cutfreq_input.ppm", 2, 2, 255, SMALL_IMAGE);
    let mut results = Vec::new();
    for layout in ["aos", "soa"] {
        let output = get_test_file_path(&format!("cutfreq_output_{}.ppm", layout));
        cleanup(&output);
        let mut cli_parser = CLIParser::new();
        let arguments = cli_parser.parse(vec![
            "test",
            "--layout",
            layout,
            input.to_str().unwrap(),
            output.to_str().unwrap(),
            "cutfreq",
            "1",
        ]);
        run(&arguments).expect("Cutfreq failed");
        results.push(fs::read(&output).unwrap());
    }
    let mut expected = b"P6\n2 2 255\n".to_vec();
    expected.extend_from_slice(&[255, 0, 0, 0, 255, 0, 0, 255, 0, 255, 255, 0]);
    assert_eq!(results[0], expected);
    assert_eq!(results[1], expected);
}

#[test]
fn test_maxlevel_widens_channels() {
    let input = write_ppm("maxlevel_input.ppm", 2, 2, 255, SMALL_IMAGE);
    let output = get_test_file_path("maxlevel_output.ppm");
    cleanup(&output);
    run_with(&input, &output, &["maxlevel", "65535"]).expect("Maxlevel failed");
    let content = fs::read(&output).unwrap();
    let header = b"P6\n2 2 65535\n";
    assert_eq!(&content[..header.len()], header);
    assert_eq!(content.len(), header.len() + 4 * 6);
    assert_eq!(&content[header.len()..header.len() + 6], &[255, 255, 0, 0, 0, 0]);
}

#[test]
fn test_resize_changes_dimensions() {
    let input = write_ppm("resize_input.ppm", 2, 2, 255, SMALL_IMAGE);
    let output = get_test_file_path("resize_output.ppm");
    cleanup(&output);
    let mut cli_parser = CLIParser::new();
    let arguments = cli_parser.parse(vec![
        "test",
        "--threads",
        "3",
        input.to_str().unwrap(),
        output.to_str().unwrap(),
        "resize",
        "4",
        "3",
    ]);
    run(&arguments).expect("Resize failed");
    let content = fs::read(&output).unwrap();
    let header = b"P6\n4 3 255\n";
    assert_eq!(&content[..header.len()], header);
    assert_eq!(content.len(), header.len() + 12 * 3);
    assert_eq!(&content[header.len()..header.len() + 3], &[255, 0, 0]);
    assert_eq!(&content[content.len() - 3..], &[255, 255, 0]);
}

#[test]
fn test_missing_input_file_is_reported() {
    let input = get_test_file_path("does_not_exist.ppm");
    let output = get_test_file_path("missing_output.ppm");
    let result = run_with(&input, &output, &["info"]);
    assert!(matches!(
        result,
        Err(Error::UnableToOpenInputFileForReading(_, _))
    ));
}

#[test]
fn test_truncated_input_is_rejected() {
    let input = write_ppm("truncated_input.ppm", 2, 2, 255, &SMALL_IMAGE[..7]);
    let output = get_test_file_path("truncated_output.cppm");
    let result = run_with(&input, &output, &["compress"]);
    assert!(matches!(
        result,
        Err(Error::MismatchOfSizeBetweenHeaderAndValues)
    ));
}

#[cfg(target_pointer_width = "64")]
#[test]
fn test_huge_header_with_truncated_payload_is_rejected() {
    let input = write_ppm("huge_input.ppm", u32::MAX, u32::MAX, 255, &[0, 0, 0]);
    let output = get_test_file_path("huge_output.ppm");
    let result = run_with(&input, &output, &["info"]);
    assert!(matches!(
        result,
        Err(Error::MismatchOfSizeBetweenHeaderAndValues)
    ));
}

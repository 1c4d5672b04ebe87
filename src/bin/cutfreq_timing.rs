use std::time::{Duration, Instant};

use imtool::color::Color;
use imtool::image::storage::PixelLayout;
use imtool::image::Bitmap;

const IMAGE_WIDTH: u32 = 1920;
const IMAGE_HEIGHT: u32 = 1080;
const IMAGE_SIZE: usize = IMAGE_WIDTH as usize * IMAGE_HEIGHT as usize;
const COLORS_TO_REMOVE: u64 = 5000;

fn create_test_colors() -> Vec<Color<u8>> {
    (0..IMAGE_SIZE)
        .map(|index| {
            let x = (index % IMAGE_WIDTH as usize) as u32;
            let y = (index / IMAGE_WIDTH as usize) as u32;
            Color::new(
                (x % 256) as u8,
                (y % 256) as u8,
                ((x / 64 + y / 64) * 8 % 256) as u8,
            )
        })
        .collect()
}

fn create_test_image(colors: &[Color<u8>], layout: PixelLayout) -> Bitmap<u8> {
    Bitmap::from_colors(
        IMAGE_WIDTH,
        IMAGE_HEIGHT,
        255,
        layout,
        colors.iter().copied(),
    )
    .expect("test image dimensions match its colors")
}

/// Sample standard deviation of the round durations.
fn round_deviation_in_micros(mean: &Duration, rounds: &[Duration]) -> u64 {
    if rounds.len() < 2 {
        return 0;
    }
    let mean_micros = mean.as_micros() as f64;
    let squared_deviations: f64 = rounds
        .iter()
        .map(|round| (round.as_micros() as f64 - mean_micros).powi(2))
        .sum();
    (squared_deviations / (rounds.len() - 1) as f64).sqrt().round() as u64
}

const NUMBER_OF_ROUNDS: u32 = 5;

fn measure(colors: &[Color<u8>], layout: PixelLayout) {
    println!("Starting cutfreq with layout {:?}", layout);
    let mut durations: Vec<Duration> = Vec::new();

    for round in 1..=NUMBER_OF_ROUNDS {
        let mut image = create_test_image(colors, layout);
        let start = Instant::now();
        let replaced = image.cut_frequencies(COLORS_TO_REMOVE);
        let duration = start.elapsed();

        println!(
            "Finished round {} after {} microseconds, replaced {} colors",
            round,
            duration.as_micros(),
            replaced,
        );
        durations.push(duration);
    }

    let min_duration = durations.iter().min().unwrap();
    let max_duration = durations.iter().max().unwrap();
    let avg_duration = durations.iter().sum::<Duration>() / NUMBER_OF_ROUNDS;
    let std_deviation = round_deviation_in_micros(&avg_duration, &durations);

    println!(
        "{:?} Min: {}, Max: {}, Average: {}, Std Deviation: {}",
        layout,
        min_duration.as_micros(),
        max_duration.as_micros(),
        avg_duration.as_micros(),
        std_deviation,
    );
}

fn main() {
    println!("Creating test image");
    let colors = create_test_colors();
    measure(&colors, PixelLayout::Interleaved);
    measure(&colors, PixelLayout::Planar);
}

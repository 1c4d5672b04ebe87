use std::cmp::Ordering;
use std::collections::HashMap;

use super::super::storage::ColorStream;
use super::super::{Bitmap, Image};
use super::kd_tree::KdTree;
use crate::color::{Channel, Color};

pub type FrequencyTable<T> = HashMap<Color<T>, usize>;
pub type ReplacementMap<T> = HashMap<Color<T>, Color<T>>;

pub fn count_frequencies<T: Channel, S: ColorStream<T>>(pixels: &S) -> FrequencyTable<T> {
    let mut frequencies = FrequencyTable::new();
    for color in pixels.colors() {
        *frequencies.entry(color).or_insert(0) += 1;
    }
    frequencies
}

/// Least frequent first. Equal frequencies are ordered by descending blue,
/// then green, then red.
fn compare_removal_priority<T: Channel>(
    (a, a_frequency): &(Color<T>, usize),
    (b, b_frequency): &(Color<T>, usize),
) -> Ordering {
    a_frequency
        .cmp(b_frequency)
        .then_with(|| b.blue.cmp(&a.blue))
        .then_with(|| b.green.cmp(&a.green))
        .then_with(|| b.red.cmp(&a.red))
}

/// Splits the distinct colors into the `count` colors to remove and the
/// colors to keep.
pub fn rank_colors_for_removal<T: Channel>(
    frequencies: &FrequencyTable<T>,
    count: usize,
) -> (Vec<Color<T>>, Vec<Color<T>>) {
    let mut ranked: Vec<(Color<T>, usize)> = frequencies
        .iter()
        .map(|(color, frequency)| (*color, *frequency))
        .collect();
    ranked.sort_unstable_by(compare_removal_priority);
    let mut colors: Vec<Color<T>> = ranked.into_iter().map(|(color, _)| color).collect();
    let keep = colors.split_off(count.min(colors.len()));
    (colors, keep)
}

pub fn find_replacements<T: Channel>(
    colors_to_remove: &[Color<T>],
    colors_to_keep: Vec<Color<T>>,
) -> ReplacementMap<T> {
    let tree = KdTree::build(colors_to_keep);
    colors_to_remove
        .iter()
        .filter_map(|color| tree.nearest(color).map(|nearest| (*color, nearest)))
        .collect()
}

/// Replaces the `count` least frequent colors by their nearest remaining
/// color. Returns the number of distinct colors that were replaced.
///
/// When nothing would remain to compare against (`count` reaches the number
/// of pixels or the number of distinct colors) every pixel becomes black.
pub fn cut_frequencies<T: Channel, S: ColorStream<T>>(pixels: &mut S, count: u64) -> usize {
    if count == 0 {
        return 0;
    }
    let frequencies = count_frequencies(pixels);
    let distinct_colors = frequencies.len();
    if count >= pixels.len() as u64 || count >= distinct_colors as u64 {
        log::info!(
            "Removing {} of {} colors leaves none, filling image with black",
            count,
            distinct_colors
        );
        pixels.fill(Color::black());
        return distinct_colors;
    }

    let (colors_to_remove, colors_to_keep) =
        rank_colors_for_removal(&frequencies, count as usize);
    log::debug!(
        "Removing {} colors, keeping {}",
        colors_to_remove.len(),
        colors_to_keep.len()
    );
    let replacements = find_replacements(&colors_to_remove, colors_to_keep);
    for index in 0..pixels.len() {
        if let Some(replacement) = replacements.get(&pixels.color_at(index)) {
            pixels.set_color_at(index, *replacement);
        }
    }
    replacements.len()
}

impl<T: Channel> Bitmap<T> {
    pub fn cut_frequencies(&mut self, count: u64) -> usize {
        cut_frequencies(self.pixels_mut(), count)
    }
}

impl Image {
    pub fn cut_frequencies(&mut self, count: u64) -> usize {
        match self {
            Image::Small(bitmap) => bitmap.cut_frequencies(count),
            Image::Large(bitmap) => bitmap.cut_frequencies(count),
        }
    }
}

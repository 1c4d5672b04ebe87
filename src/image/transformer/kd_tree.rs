use crate::color::{Channel, Color, CHANNEL_COUNT};

/// Balanced 3-d tree over colors, stored implicitly in one array.
///
/// Every range `[left, right)` has its splitting color at the midpoint
/// `left + (right - left) / 2`; colors before it are not greater on the
/// splitting axis, colors after it are not smaller. The axis cycles with the
/// depth of the range.
pub struct KdTree<T> {
    points: Vec<Color<T>>,
}

struct NearestSearch<T> {
    target: Color<T>,
    nearest: Option<Color<T>>,
    min_distance: u64,
}

impl<T: Channel> KdTree<T> {
    pub fn build(mut points: Vec<Color<T>>) -> Self {
        Self::partition(&mut points, 0);
        Self { points }
    }

    fn partition(points: &mut [Color<T>], depth: usize) {
        if points.len() <= 1 {
            return;
        }
        let axis = depth % CHANNEL_COUNT;
        let mid = points.len() / 2;
        points.select_nth_unstable_by(mid, |a, b| a.channel(axis).cmp(&b.channel(axis)));
        let (lower, upper) = points.split_at_mut(mid);
        Self::partition(lower, depth + 1);
        Self::partition(&mut upper[1..], depth + 1);
    }

    /// Closest color by squared distance. On equal distances the color
    /// visited first wins.
    pub fn nearest(&self, target: &Color<T>) -> Option<Color<T>> {
        let mut search = NearestSearch {
            target: *target,
            nearest: None,
            min_distance: u64::MAX,
        };
        Self::search(&self.points, 0, &mut search);
        search.nearest
    }

    fn search(points: &[Color<T>], depth: usize, search: &mut NearestSearch<T>) {
        if points.is_empty() {
            return;
        }
        let axis = depth % CHANNEL_COUNT;
        let mid = points.len() / 2;
        let pivot = &points[mid];

        let distance = search.target.squared_distance(pivot);
        if search.nearest.is_none() || distance < search.min_distance {
            search.min_distance = distance;
            search.nearest = Some(*pivot);
        }

        let difference =
            search.target.channel(axis).to_u64() as i64 - pivot.channel(axis).to_u64() as i64;
        let (lower, upper) = (&points[..mid], &points[mid + 1..]);
        let (near, far) = if difference <= 0 {
            (lower, upper)
        } else {
            (upper, lower)
        };
        Self::search(near, depth + 1, search);
        if ((difference * difference) as u64) < search.min_distance {
            Self::search(far, depth + 1, search);
        }
    }
}

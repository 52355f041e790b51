use super::circle::{CirclePixels, CIRCLE_SIZE};

/// Number of contiguous circle pixels that must agree for a corner.
pub const ARC_LENGTH: usize = 9;

/// Circle positions checked by the rejection test: top, right, bottom and left.
pub const COMPASS_POSITIONS: [usize; 4] = [0, 4, 8, 12];

// compass samples that must agree before the full test runs
const MIN_COMPASS_HITS: usize = 3;

/// Returns true if `a` is brighter than `b` by more than `threshold`.
///
/// The comparison is strict and computed in 64 bits, so it holds for any pair
/// of `i32` intensities.
#[inline]
pub fn is_brighter(a: i32, b: i32, threshold: i32) -> bool {
    i64::from(a) - i64::from(b) > i64::from(threshold)
}

/// Returns true if `a` is darker than `b` by more than `threshold`.
#[inline]
pub fn is_darker(a: i32, b: i32, threshold: i32) -> bool {
    i64::from(b) - i64::from(a) > i64::from(threshold)
}

/// Cheap pre-filter on the four compass positions of the circle.
///
/// Returns true when fewer than 3 of the top, right, bottom and left samples are
/// brighter than `p` by more than `threshold`, and fewer than 3 of them are
/// darker. Such a candidate is reported as a non-corner without running the full
/// segment test.
///
/// A 9 pixel arc only has to cover 2 compass positions, so this filter can
/// discard candidates that [`is_corner_unfiltered`] accepts. It never accepts a
/// candidate on its own.
#[inline]
pub fn is_trivially_excluded(p: i32, circle: &CirclePixels, threshold: i32) -> bool {
    let count_hits = |pred: fn(i32, i32, i32) -> bool| {
        COMPASS_POSITIONS
            .iter()
            .filter(|&&i| pred(circle[i], p, threshold))
            .count()
    };

    if count_hits(is_brighter) >= MIN_COMPASS_HITS {
        return false;
    }

    count_hits(is_darker) < MIN_COMPASS_HITS
}

/// Segment test classification of a candidate pixel.
///
/// Runs [`is_trivially_excluded`] first, then looks for [`ARC_LENGTH`] contiguous
/// circle pixels (wrapping from position 15 to 0) that are all brighter, or all
/// darker, than `p` by more than `threshold`.
///
/// # Arguments
///
/// * `p` - The intensity of the candidate pixel.
/// * `circle` - The 16 intensities on the circle around the candidate.
/// * `threshold` - The minimum intensity difference.
///
/// # Returns
///
/// True if the candidate is a corner.
///
/// # Examples
///
/// ```
/// use fastcorner_imgproc::features::is_corner;
///
/// let mut circle = [50; 16];
/// assert!(!is_corner(50, &circle, 20));
///
/// circle = [200; 16];
/// assert!(is_corner(50, &circle, 20));
/// ```
#[inline]
pub fn is_corner(p: i32, circle: &CirclePixels, threshold: i32) -> bool {
    if is_trivially_excluded(p, circle, threshold) {
        return false;
    }

    is_corner_unfiltered(p, circle, threshold)
}

/// Segment test classification without the compass pre-filter.
///
/// Same criterion as [`is_corner`], evaluated on every starting position of the
/// circle.
pub fn is_corner_unfiltered(p: i32, circle: &CirclePixels, threshold: i32) -> bool {
    for start in 0..CIRCLE_SIZE {
        let mut brighter = true;
        let mut darker = true;

        for step in 0..ARC_LENGTH {
            let pixel = circle[(start + step) % CIRCLE_SIZE];

            if !is_brighter(pixel, p, threshold) {
                brighter = false;
            }
            if !is_darker(pixel, p, threshold) {
                darker = false;
            }
            if !brighter && !darker {
                break;
            }
        }

        if brighter || darker {
            return true;
        }
    }

    false
}

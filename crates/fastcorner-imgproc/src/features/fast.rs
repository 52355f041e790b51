use fastcorner_image::{Image, ImageError};
use rayon::prelude::*;

use super::circle::{CircleOffsets, CirclePixels, CIRCLE_RADIUS};
use super::segment::{is_corner, is_corner_unfiltered};

/// Default intensity threshold for 8-bit images.
pub const DEFAULT_THRESHOLD: i32 = 20;

/// An error type for the FAST detector.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum FastError {
    /// The intensity threshold is negative.
    #[error("Threshold must be non-negative, got {0}")]
    NegativeThreshold(i32),

    /// Error coming from the image layer.
    #[error(transparent)]
    Image(#[from] ImageError),
}

/// How the rows of the image are scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// Scan the rows one after the other on the current thread.
    #[default]
    Serial,

    /// Scan the rows on the global rayon thread pool.
    ///
    /// The corners come out in the same order as [`ExecutionMode::Serial`].
    ParallelRows,
}

/// Parameters of the [`FastDetector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FastDetectorConfig {
    /// Minimum intensity difference between the candidate and its circle pixels.
    pub threshold: i32,
    /// Run the compass pre-filter before the full segment test.
    pub fast_rejection: bool,
    /// Row scheduling of the scan.
    pub execution: ExecutionMode,
}

impl Default for FastDetectorConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            fast_rejection: true,
            execution: ExecutionMode::Serial,
        }
    }
}

type Classifier = fn(i32, &CirclePixels, i32) -> bool;

/// FAST segment test corner detector.
///
/// # Examples
///
/// ```
/// use fastcorner_image::Image;
/// use fastcorner_imgproc::features::{ExecutionMode, FastDetector, FastDetectorConfig};
///
/// let img = Image::<u8, 1>::from_size_val([32, 32].into(), 128).unwrap();
///
/// let detector = FastDetector::new(FastDetectorConfig {
///     threshold: 30,
///     execution: ExecutionMode::ParallelRows,
///     ..Default::default()
/// })
/// .unwrap();
///
/// assert!(detector.detect(&img).is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct FastDetector {
    config: FastDetectorConfig,
}

impl FastDetector {
    /// Create a new detector.
    ///
    /// # Errors
    ///
    /// Returns [`FastError::NegativeThreshold`] if the configured threshold is negative.
    pub fn new(config: FastDetectorConfig) -> Result<Self, FastError> {
        if config.threshold < 0 {
            return Err(FastError::NegativeThreshold(config.threshold));
        }
        Ok(Self { config })
    }

    /// The configuration of the detector.
    pub fn config(&self) -> &FastDetectorConfig {
        &self.config
    }

    /// Detect the corners of a single channel intensity image.
    ///
    /// # Returns
    ///
    /// The `[x, y]` coordinates of the corners in row-major discovery order.
    pub fn detect<T>(&self, src: &Image<T, 1>) -> Vec<[usize; 2]>
    where
        T: Copy + Into<i32> + Send + Sync,
    {
        let classify: Classifier = if self.config.fast_rejection {
            is_corner
        } else {
            is_corner_unfiltered
        };

        let corners = match self.config.execution {
            ExecutionMode::Serial => scan_serial(src, self.config.threshold, classify),
            ExecutionMode::ParallelRows => scan_par_rows(src, self.config.threshold, classify),
        };

        log::debug!(
            "fast: {} corners in {} (threshold {}, {:?})",
            corners.len(),
            src.size(),
            self.config.threshold,
            self.config.execution
        );

        corners
    }
}

/// Fast feature detector
///
/// Scans every pixel at least [`CIRCLE_RADIUS`] pixels away from the borders in
/// row-major order and keeps the ones accepted by [`is_corner`]. After a corner
/// the next 3 columns of the same row are skipped.
///
/// # Arguments
///
/// * `src` - The source image as a single channel intensity image.
/// * `threshold` - The threshold for the fast feature detector.
///
/// # Returns
///
/// A vector containing the `[x, y]` coordinates of the detected corners. Images
/// smaller than 7x7 have no candidates and give an empty vector.
///
/// # Errors
///
/// Returns [`FastError::NegativeThreshold`] if `threshold` is negative.
pub fn fast_feature_detector<T>(
    src: &Image<T, 1>,
    threshold: i32,
) -> Result<Vec<[usize; 2]>, FastError>
where
    T: Copy + Into<i32> + Send + Sync,
{
    let detector = FastDetector::new(FastDetectorConfig {
        threshold,
        ..Default::default()
    })?;
    Ok(detector.detect(src))
}

/// Row-parallel version of [`fast_feature_detector`] with identical output.
///
/// # Errors
///
/// Returns [`FastError::NegativeThreshold`] if `threshold` is negative.
pub fn fast_feature_detector_par<T>(
    src: &Image<T, 1>,
    threshold: i32,
) -> Result<Vec<[usize; 2]>, FastError>
where
    T: Copy + Into<i32> + Send + Sync,
{
    let detector = FastDetector::new(FastDetectorConfig {
        threshold,
        execution: ExecutionMode::ParallelRows,
        ..Default::default()
    })?;
    Ok(detector.detect(src))
}

/// Flatten corners into the interleaved `x0, y0, x1, y1, ...` layout.
///
/// # Examples
///
/// ```
/// use fastcorner_imgproc::features::interleave_corners;
///
/// assert_eq!(interleave_corners(&[[3, 4], [8, 4]]), vec![3, 4, 8, 4]);
/// ```
pub fn interleave_corners(corners: &[[usize; 2]]) -> Vec<usize> {
    corners.iter().flatten().copied().collect()
}

// range of candidate rows, empty when the image cannot hold a full circle
fn candidate_rows(rows: usize, cols: usize) -> std::ops::Range<usize> {
    let min_size = 2 * CIRCLE_RADIUS + 1;
    if rows < min_size || cols < min_size {
        return 0..0;
    }
    CIRCLE_RADIUS..rows - CIRCLE_RADIUS
}

fn scan_serial<T>(src: &Image<T, 1>, threshold: i32, classify: Classifier) -> Vec<[usize; 2]>
where
    T: Copy + Into<i32>,
{
    let offsets = CircleOffsets::new(src.cols());
    candidate_rows(src.rows(), src.cols())
        .flat_map(|row| scan_row(src.as_slice(), row, &offsets, threshold, classify))
        .collect()
}

fn scan_par_rows<T>(src: &Image<T, 1>, threshold: i32, classify: Classifier) -> Vec<[usize; 2]>
where
    T: Copy + Into<i32> + Send + Sync,
{
    let offsets = CircleOffsets::new(src.cols());
    candidate_rows(src.rows(), src.cols())
        .into_par_iter()
        .flat_map_iter(|row| scan_row(src.as_slice(), row, &offsets, threshold, classify))
        .collect()
}

// The column skip only lives inside one row so rows can be scanned independently.
fn scan_row<T>(
    src: &[T],
    row: usize,
    offsets: &CircleOffsets,
    threshold: i32,
    classify: Classifier,
) -> Vec<[usize; 2]>
where
    T: Copy + Into<i32>,
{
    let cols = offsets.width();
    let row_start_idx = row * cols;
    let mut row_corners = Vec::new();

    let mut col = CIRCLE_RADIUS;
    while col < cols - CIRCLE_RADIUS {
        let idx = row_start_idx + col;
        let circle = offsets.gather(src, idx);

        if classify(src[idx].into(), &circle, threshold) {
            row_corners.push([col, row]);
            // skip the neighbours covered by the circle
            col += CIRCLE_RADIUS;
        }
        col += 1;
    }

    row_corners
}

#[cfg(test)]
mod tests {
    use super::*;
    use fastcorner_image::Image;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn from_fn(cols: usize, rows: usize, f: impl Fn(usize, usize) -> u8) -> Image<u8, 1> {
        let data = (0..rows)
            .flat_map(|y| (0..cols).map(move |x| (x, y)))
            .map(|(x, y)| f(x, y))
            .collect();
        // sizes in these tests always match the buffer
        Image::new([cols, rows].into(), data).unwrap()
    }

    fn random_image(cols: usize, rows: usize, seed: u64) -> Image<u8, 1> {
        let mut rng = StdRng::seed_from_u64(seed);
        // blocky noise so that segment arcs actually occur
        let blocks: Vec<u8> = (0..(cols / 2 + 1) * (rows / 2 + 1))
            .map(|_| {
                if rng.random_bool(0.5) {
                    rng.random_range(150..=255)
                } else {
                    rng.random_range(0..=60)
                }
            })
            .collect();
        from_fn(cols, rows, |x, y| blocks[(y / 2) * (cols / 2 + 1) + x / 2])
    }

    fn unfiltered() -> FastDetector {
        FastDetector {
            config: FastDetectorConfig {
                fast_rejection: false,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_fast_feature_detector() -> Result<(), FastError> {
        #[rustfmt::skip]
        let img = Image::<u8, 1>::new(
            [7, 7].into(),
            vec![
                50,  50,  50,  50,  50,  50,  50,
                50,  50,  50,  50,  50,  50,  50,
                50,  50,  50, 200,  50,  50,  50,
                50,  50, 200, 200, 200,  50,  50,
                50,  50,  50, 200,  50,  50,  50,
                50,  50,  50,  50,  50,  50,  50,
                50,  50,  50,  50,  50,  50,  50,
            ],
        )?;
        let expected_keypoints = vec![[3, 3]];
        let keypoints = fast_feature_detector(&img, 100)?;
        assert_eq!(keypoints, expected_keypoints);
        Ok(())
    }

    #[test]
    fn test_fast_feature_detector_up() -> Result<(), FastError> {
        #[rustfmt::skip]
        let img = Image::<u8, 1>::new(
            [7, 7].into(),
            vec![
                50,  50,  50,  50,  50,  50,  50,
                50,  50,  50,  50,  50,  50,  50,
                50,  50,  50,  50,  50,  50,  50,
                50,  50,  50, 200,  50,  50,  50,
               200, 200, 200, 200, 200, 200, 200,
               200, 200, 200, 200, 200, 200, 200,
               200, 200, 200, 200, 200, 200, 200,
            ],
        )?;
        assert_eq!(fast_feature_detector(&img, 100)?, vec![[3, 3]]);
        Ok(())
    }

    #[test]
    fn test_fast_feature_detector_left() -> Result<(), FastError> {
        #[rustfmt::skip]
        let img = Image::<u8, 1>::new(
            [7, 7].into(),
            vec![
               200, 200, 200,  50,  50,  50,  50,
               200, 200, 200,  50,  50,  50,  50,
               200, 200, 200,  50,  50,  50,  50,
               200, 200, 200, 200,  50,  50,  50,
               200, 200, 200,  50,  50,  50,  50,
               200, 200, 200,  50,  50,  50,  50,
               200, 200, 200,  50,  50,  50,  50,
            ],
        )?;
        assert_eq!(fast_feature_detector(&img, 100)?, vec![[3, 3]]);
        Ok(())
    }

    #[test]
    fn test_centered_square() -> Result<(), FastError> {
        // 7x7 square of 200 over columns and rows 2..=8
        let img = from_fn(10, 10, |x, y| {
            if (2..=8).contains(&x) && (2..=8).contains(&y) {
                200
            } else {
                100
            }
        });

        // no candidate sees three darker compass points
        assert!(fast_feature_detector(&img, 20)?.is_empty());
        assert_eq!(unfiltered().detect(&img), vec![[3, 3]]);
        Ok(())
    }

    #[test]
    fn test_single_bright_pixel() -> Result<(), FastError> {
        let img = from_fn(12, 12, |x, y| if (x, y) == (6, 5) { 200 } else { 50 });
        assert_eq!(fast_feature_detector(&img, 20)?, vec![[6, 5]]);
        // not bright enough for a larger threshold
        assert!(fast_feature_detector(&img, 150)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_bright_disk_boundary() -> Result<(), FastError> {
        // disk of radius 7 centered at (16, 16)
        let dist2 = |x: usize, y: usize| (x as i64 - 16).pow(2) + (y as i64 - 16).pow(2);
        let img = from_fn(33, 33, |x, y| if dist2(x, y) <= 49 { 200 } else { 50 });

        let corners = fast_feature_detector(&img, 20)?;
        assert_eq!(corners, vec![[16, 9], [9, 16], [23, 16], [16, 23]]);

        let corners = unfiltered().detect(&img);
        assert_eq!(corners.len(), 12);
        assert!(!corners.contains(&[16, 16]));
        // circle pixels are at most sqrt(10) away from the candidate
        for [x, y] in corners {
            let d = (dist2(x, y) as f64).sqrt();
            assert!(d >= 7.0 - 10f64.sqrt() && d <= 7.0 + 10f64.sqrt());
        }
        Ok(())
    }

    #[test]
    fn test_column_skip_after_corner() -> Result<(), FastError> {
        // bright dots on every even column of row 4
        let img = from_fn(16, 9, |x, y| if y == 4 && x % 2 == 0 { 200 } else { 50 });
        let corners = fast_feature_detector(&img, 20)?;
        assert_eq!(corners, vec![[4, 4], [8, 4], [12, 4]]);
        assert_eq!(interleave_corners(&corners), vec![4, 4, 8, 4, 12, 4]);
        Ok(())
    }

    #[test]
    fn test_wedge_row_order() -> Result<(), FastError> {
        let img = from_fn(16, 9, |x, y| {
            if y >= 4 && (x as i32 - 8).abs() <= y as i32 - 4 {
                200
            } else {
                50
            }
        });
        assert_eq!(fast_feature_detector(&img, 20)?, vec![[8, 4], [7, 5]]);
        Ok(())
    }

    #[test]
    fn test_uniform_image() -> Result<(), FastError> {
        let img = Image::<u8, 1>::from_size_val([40, 30].into(), 77)?;
        for threshold in [0, 1, 20, 255] {
            assert!(fast_feature_detector(&img, threshold)?.is_empty());
        }
        Ok(())
    }

    #[test]
    fn test_small_images() -> Result<(), FastError> {
        for (cols, rows) in [(0, 0), (1, 1), (6, 20), (20, 6), (3, 3)] {
            let img = Image::<i32, 1>::from_size_val([cols, rows].into(), 0)?;
            assert!(fast_feature_detector(&img, 20)?.is_empty());
            assert!(fast_feature_detector_par(&img, 20)?.is_empty());
        }

        // 7x7 has exactly one candidate
        let img = from_fn(7, 7, |x, y| if (x, y) == (3, 3) { 255 } else { 0 });
        assert_eq!(fast_feature_detector(&img, 20)?, vec![[3, 3]]);
        Ok(())
    }

    #[test]
    fn test_negative_threshold() {
        let img = Image::<u8, 1>::from_size_val([8, 8].into(), 0).unwrap();
        assert_eq!(
            fast_feature_detector(&img, -1),
            Err(FastError::NegativeThreshold(-1))
        );
        assert!(FastDetector::new(FastDetectorConfig {
            threshold: -5,
            ..Default::default()
        })
        .is_err());
    }

    #[test]
    fn test_wide_intensities() -> Result<(), FastError> {
        let img = Image::<i32, 1>::new(
            [7, 7].into(),
            (0..49)
                .map(|i| if i == 24 { i32::MIN } else { i32::MAX })
                .collect(),
        )?;
        assert_eq!(fast_feature_detector(&img, 1000)?, vec![[3, 3]]);
        Ok(())
    }

    #[test]
    fn test_corners_inside_border() -> Result<(), FastError> {
        for seed in 0..4 {
            let img = random_image(41, 29, seed);
            for [x, y] in fast_feature_detector(&img, 20)? {
                assert!((3..=41 - 4).contains(&x));
                assert!((3..=29 - 4).contains(&y));
            }
        }
        Ok(())
    }

    #[test]
    fn test_deterministic() -> Result<(), FastError> {
        let img = random_image(64, 48, 11);
        let first = fast_feature_detector(&img, 25)?;
        for _ in 0..3 {
            assert_eq!(fast_feature_detector(&img, 25)?, first);
        }
        Ok(())
    }

    #[test]
    fn test_row_major_order() -> Result<(), FastError> {
        let img = random_image(64, 48, 3);
        let corners = fast_feature_detector(&img, 20)?;
        for pair in corners.windows(2) {
            let ([x0, y0], [x1, y1]) = (pair[0], pair[1]);
            assert!(y0 < y1 || (y0 == y1 && x1 >= x0 + 4));
        }
        Ok(())
    }

    #[test]
    fn test_parallel_matches_serial() -> Result<(), FastError> {
        for seed in 0..4 {
            let img = random_image(97, 61, seed);
            let serial = fast_feature_detector(&img, 20)?;
            let parallel = fast_feature_detector_par(&img, 20)?;
            assert_eq!(serial, parallel);

            let detector = FastDetector::new(FastDetectorConfig {
                fast_rejection: false,
                execution: ExecutionMode::ParallelRows,
                ..Default::default()
            })?;
            assert_eq!(detector.detect(&img), unfiltered().detect(&img));
        }
        Ok(())
    }

    #[test]
    fn test_threshold_monotonicity() -> Result<(), FastError> {
        for seed in 0..4 {
            let img = random_image(80, 60, seed);
            let mut previous = usize::MAX;
            for threshold in (0..=200).step_by(10) {
                let count = fast_feature_detector(&img, threshold)?.len();
                assert!(count <= previous, "threshold {threshold}");
                previous = count;
            }
        }
        Ok(())
    }

    #[test]
    fn test_generic_pixel_types() -> Result<(), FastError> {
        let img_u8 = random_image(40, 40, 5);
        let img_u16: Image<u16, 1> = img_u8.cast()?;
        let img_i32: Image<i32, 1> = img_u8.cast()?;
        let expected = fast_feature_detector(&img_u8, 20)?;
        assert_eq!(fast_feature_detector(&img_u16, 20)?, expected);
        assert_eq!(fast_feature_detector(&img_i32, 20)?, expected);
        Ok(())
    }
}

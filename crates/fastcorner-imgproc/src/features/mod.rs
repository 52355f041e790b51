//! Feature detection and keypoint extraction.
//!
//! # Available Detectors
//!
//! - **FAST**: Features from Accelerated Segment Test. A pixel is a corner when
//!   9 contiguous pixels of the 16 on the radius 3 Bresenham circle around it are
//!   all brighter, or all darker, than the pixel by more than a threshold.
//!
//! ```text
//!       15 00 01
//!    14          02
//! 13                03
//! 12       []       04
//! 11                05
//!    10          06
//!       09 08 07
//! ```
//!
//! # Examples
//!
//! ```
//! use fastcorner_image::Image;
//! use fastcorner_imgproc::features::{FastDetector, FastDetectorConfig};
//!
//! let mut img = Image::<u8, 1>::from_size_val([12, 12].into(), 50).unwrap();
//! img.as_slice_mut()[5 * 12 + 6] = 200;
//!
//! let detector = FastDetector::new(FastDetectorConfig::default()).unwrap();
//! assert_eq!(detector.detect(&img), vec![[6, 5]]);
//! ```

mod circle;
pub use circle::*;

mod segment;
pub use segment::*;

mod fast;
pub use fast::*;

/// Number of pixels on the segment test circle.
pub const CIRCLE_SIZE: usize = 16;

/// Radius of the Bresenham circle in pixels.
///
/// Candidates closer than this to any image border are never tested.
pub const CIRCLE_RADIUS: usize = 3;

/// The intensities sampled on the circle around one candidate pixel.
///
/// Index `i` holds the pixel at circle position `i`, position 0 being straight
/// above the candidate and the positions running clockwise. Index 15 is adjacent
/// to index 0.
pub type CirclePixels = [i32; CIRCLE_SIZE];

// (col, row) step from circle position i to position i + 1, starting at (0, -3).
const CIRCLE_STEPS: [(isize, isize); CIRCLE_SIZE - 1] = [
    (1, 0),
    (1, 1),
    (1, 1),
    (0, 1),
    (0, 1),
    (-1, 1),
    (-1, 1),
    (-1, 0),
    (-1, 0),
    (-1, -1),
    (-1, -1),
    (0, -1),
    (0, -1),
    (1, -1),
    (1, -1),
];

/// Positions of the circle relative to the candidate as `(col, row)` pairs.
///
/// The points are generated by stepping clockwise from the top position, the
/// same walk [`CircleOffsets::new`] performs on linear indices.
pub fn circle_points() -> [(isize, isize); CIRCLE_SIZE] {
    let mut points = [(0, 0); CIRCLE_SIZE];
    points[0] = (0, -(CIRCLE_RADIUS as isize));
    for (i, (dx, dy)) in CIRCLE_STEPS.iter().enumerate() {
        let (x, y) = points[i];
        points[i + 1] = (x + dx, y + dy);
    }
    points
}

/// Linear buffer offsets of the 16 circle positions for a given row width.
///
/// The table only depends on the width, so it is built once per image and shared
/// by every candidate of the scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CircleOffsets {
    width: usize,
    offsets: [isize; CIRCLE_SIZE],
}

impl CircleOffsets {
    /// Build the offset table for images with `width` pixels per row.
    ///
    /// # Examples
    ///
    /// ```
    /// use fastcorner_imgproc::features::CircleOffsets;
    ///
    /// let offsets = CircleOffsets::new(10);
    /// assert_eq!(offsets.as_array()[0], -30);
    /// assert_eq!(offsets.as_array()[4], 3);
    /// ```
    pub fn new(width: usize) -> Self {
        let w = width as isize;
        let mut offsets = [0; CIRCLE_SIZE];
        offsets[0] = -w - w - w;
        for (i, (dx, dy)) in CIRCLE_STEPS.iter().enumerate() {
            offsets[i + 1] = offsets[i] + dy * w + dx;
        }

        Self { width, offsets }
    }

    /// The row width the table was built for.
    pub fn width(&self) -> usize {
        self.width
    }

    /// The offsets ordered by circle position.
    pub fn as_array(&self) -> &[isize; CIRCLE_SIZE] {
        &self.offsets
    }

    /// Gather the circle intensities around the pixel at linear index `center`.
    ///
    /// The caller guarantees `center` lies at least [`CIRCLE_RADIUS`] pixels away
    /// from every border of a `width` wide row-major buffer. Indexing outside the
    /// buffer is a contract violation and panics.
    #[inline]
    pub fn gather<T>(&self, src: &[T], center: usize) -> CirclePixels
    where
        T: Copy + Into<i32>,
    {
        let mut pixels = [0; CIRCLE_SIZE];
        for (pixel, offset) in pixels.iter_mut().zip(self.offsets.iter()) {
            *pixel = src[center.wrapping_add_signed(*offset)].into();
        }
        pixels
    }
}

use fastcorner_image::Image;

/// Helper function to set a pixel's color, ignoring coordinates outside the image.
#[inline]
fn set_pixel<const C: usize>(img: &mut Image<u8, C>, x: i64, y: i64, color: [u8; C]) {
    if x < 0 || x >= img.cols() as i64 || y < 0 || y >= img.rows() as i64 {
        return;
    }
    let start = (y as usize * img.cols() + x as usize) * C;
    img.as_slice_mut()[start..start + C].copy_from_slice(&color);
}

/// Draws a filled square of side `2 * radius + 1` centered at a point.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `center` - The center of the square as (x, y).
/// * `color` - The color of the square as an array of `C` elements.
/// * `radius` - Half the side of the square; 0 paints the single pixel.
pub fn draw_point<const C: usize>(
    img: &mut Image<u8, C>,
    center: (i64, i64),
    color: [u8; C],
    radius: usize,
) {
    let (cx, cy) = center;
    let r = radius as i64;
    for y in cy - r..=cy + r {
        for x in cx - r..=cx + r {
            set_pixel(img, x, y, color);
        }
    }
}

/// Paints a marker on every detected corner inplace.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `corners` - The `[x, y]` corner coordinates.
/// * `color` - The marker color.
/// * `radius` - The marker half size, see [`draw_point`]. Markers are clipped
///   to the image.
///
/// # Example
///
/// ```
/// use fastcorner_image::Image;
/// use fastcorner_imgproc::draw::draw_corners;
///
/// let mut img = Image::<u8, 3>::from_size_val([4, 4].into(), 0).unwrap();
/// draw_corners(&mut img, &[[1, 2]], [255, 0, 0], 0);
///
/// assert_eq!(img.get([2, 1, 0]), Some(&255));
/// assert_eq!(img.get([2, 1, 1]), Some(&0));
/// ```
pub fn draw_corners<const C: usize>(
    img: &mut Image<u8, C>,
    corners: &[[usize; 2]],
    color: [u8; C],
    radius: usize,
) {
    for &[x, y] in corners {
        draw_point(img, (x as i64, y as i64), color, radius);
    }
}

use std::{fs, fs::File, path::Path};

use fastcorner_image::{Image, ImageSize};
use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};

use crate::error::IoError;

/// Read a PNG image as a three channel (rgb8) image.
///
/// Palette and low bit depth images are expanded, 16 bit samples are reduced to
/// 8 bits, grayscale is replicated over the three channels and alpha is dropped.
///
/// # Arguments
///
/// * `file_path` - The path to the PNG file.
///
/// # Returns
///
/// A RGB image with three channels (rgb8).
pub fn read_image_png_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let (buf, size, color_type) = read_png_impl(file_path)?;

    let rgb = match color_type {
        ColorType::Rgb => buf,
        ColorType::Rgba => buf
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect(),
        ColorType::Grayscale => buf.iter().flat_map(|&v| [v, v, v]).collect(),
        ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .flat_map(|px| [px[0], px[0], px[0]])
            .collect(),
        other => return Err(IoError::UnsupportedColorType(format!("{other:?}"))),
    };

    Ok(Image::new(size, rgb)?)
}

/// Read a PNG image with a single channel (mono8).
///
/// # Arguments
///
/// * `file_path` - The path to the PNG file.
///
/// # Returns
///
/// A grayscale image with a single channel (mono8).
///
/// # Errors
///
/// Color images are rejected with [`IoError::UnsupportedColorType`]; read them
/// with [`read_image_png_rgb8`] and convert them to grayscale instead.
pub fn read_image_png_mono8(file_path: impl AsRef<Path>) -> Result<Image<u8, 1>, IoError> {
    let (buf, size, color_type) = read_png_impl(file_path)?;

    let gray = match color_type {
        ColorType::Grayscale => buf,
        ColorType::GrayscaleAlpha => buf.chunks_exact(2).map(|px| px[0]).collect(),
        other => return Err(IoError::UnsupportedColorType(format!("{other:?}"))),
    };

    Ok(Image::new(size, gray)?)
}

// utility function to read the png file normalized to 8 bit samples
fn read_png_impl(file_path: impl AsRef<Path>) -> Result<(Vec<u8>, ImageSize, ColorType), IoError> {
    // verify the file exists
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    // verify the file extension
    if !file_path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
    {
        return Err(IoError::InvalidFileExtension(file_path.to_path_buf()));
    }

    let file = fs::File::open(file_path)?;
    let mut decoder = Decoder::new(file);
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);

    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::PngDecodeError(e.to_string()))?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::PngDecodeError(e.to_string()))?;
    buf.truncate(info.buffer_size());

    if info.bit_depth != BitDepth::Eight {
        return Err(IoError::PngDecodeError(format!(
            "unexpected bit depth {:?} after normalization",
            info.bit_depth
        )));
    }

    let size = ImageSize {
        width: info.width as usize,
        height: info.height as usize,
    };
    log::debug!(
        "decoded {} ({}, {:?})",
        file_path.display(),
        size,
        info.color_type
    );

    Ok((buf, size, info.color_type))
}

/// Writes the given PNG _(rgb8)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the PNG image.
/// - `image` - The image containing the PNG image data.
pub fn write_image_png_rgb8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 3>,
) -> Result<(), IoError> {
    write_png_impl(
        file_path,
        image.as_slice(),
        image.size(),
        BitDepth::Eight,
        ColorType::Rgb,
    )
}

/// Writes the given PNG _(grayscale 8-bit)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the PNG image.
/// - `image` - The image containing the PNG image data.
pub fn write_image_png_gray8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 1>,
) -> Result<(), IoError> {
    write_png_impl(
        file_path,
        image.as_slice(),
        image.size(),
        BitDepth::Eight,
        ColorType::Grayscale,
    )
}

fn write_png_impl(
    file_path: impl AsRef<Path>,
    image_data: &[u8],
    image_size: ImageSize,
    // Make sure you set `depth` correctly
    depth: BitDepth,
    color_type: ColorType,
) -> Result<(), IoError> {
    let file_path = file_path.as_ref();
    let file = File::create(file_path)?;

    let mut encoder = Encoder::new(file, image_size.width as u32, image_size.height as u32);
    encoder.set_color(color_type);
    encoder.set_depth(depth);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    writer
        .write_image_data(image_data)
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;

    log::debug!("encoded {} ({})", file_path.display(), image_size);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IoError;

    #[test]
    fn read_write_png_rgb8() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("corners-rgb8.png");

        let image = Image::<u8, 3>::new([3, 2].into(), (0..18).map(|v| v * 10).collect())?;
        write_image_png_rgb8(&file_path, &image)?;

        let image_back = read_image_png_rgb8(&file_path)?;
        assert_eq!(image_back.size(), image.size());
        assert_eq!(image_back.as_slice(), image.as_slice());

        Ok(())
    }

    #[test]
    fn read_write_png_gray8() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("corners-gray8.png");

        let image = Image::<u8, 1>::new([2, 2].into(), vec![0, 50, 100, 255])?;
        write_image_png_gray8(&file_path, &image)?;

        let mono = read_image_png_mono8(&file_path)?;
        assert_eq!(mono.as_slice(), image.as_slice());

        let rgb = read_image_png_rgb8(&file_path)?;
        assert_eq!(
            rgb.as_slice(),
            &[0, 0, 0, 50, 50, 50, 100, 100, 100, 255, 255, 255]
        );

        Ok(())
    }

    #[test]
    fn read_png_mono8_rejects_color() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("color.png");

        let image = Image::<u8, 3>::from_size_val([2, 2].into(), 7)?;
        write_image_png_rgb8(&file_path, &image)?;

        assert!(matches!(
            read_image_png_mono8(&file_path),
            Err(IoError::UnsupportedColorType(_))
        ));

        Ok(())
    }

    #[test]
    fn read_png_missing_file() {
        assert!(matches!(
            read_image_png_rgb8("does/not/exist.png"),
            Err(IoError::FileDoesNotExist(_))
        ));
    }

    #[test]
    fn read_png_wrong_extension() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("image.jpg");
        std::fs::write(&file_path, b"not a png")?;

        assert!(matches!(
            read_image_png_rgb8(&file_path),
            Err(IoError::InvalidFileExtension(_))
        ));

        Ok(())
    }
}

use std::fs;
use std::path::Path;

use image::{DynamicImage, GenericImageView, ImageFormat, RgbImage};
use log::{error, warn};
use png::{Decoder, Transformations};
use ndarray::{ArrayD, ArrayView3, ArrayViewD, Ix3, IxDyn};

use crate::error::StegiError;
use crate::result::Result;

/// decoded image samples, indexed by (row, column, channel)
pub type ImageArray = ArrayD<u8>;

/// decodes an image file of any format the `image` crate understands
///
/// Grayscale images end up 2-dimensional, everything else as rows × columns × channels
/// with 2 (gray + alpha), 3 (RGB) or 4 (RGBA) channels. Wider samples are reduced to 8 bits.
///
/// A truncated PNG still decodes, the rows that are missing stay black.
pub fn open(path: &Path) -> Result<ImageArray> {
    match image::open(path) {
        Ok(img) => from_image(img),
        Err(e) => open_truncated_png(path).ok_or_else(|| {
            error!("Error decoding image {path:?}: {e}");
            StegiError::InvalidImageMedia
        })?,
    }
}

/// Decodes the rows of a PNG up to the point where its data ends.
///
/// Returns `None` for anything that is not a PNG with a readable header.
fn open_truncated_png(path: &Path) -> Option<Result<ImageArray>> {
    let data = fs::read(path).ok()?;
    if image::guess_format(&data).ok()? != ImageFormat::Png {
        return None;
    }

    let mut decoder = Decoder::new(data.as_slice());
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
    let mut reader = decoder.read_info().ok()?;
    if reader.info().interlaced {
        return None;
    }

    let (rows, cols) = (reader.info().height as usize, reader.info().width as usize);
    let channels = reader.output_color_type().0.samples();
    let line = cols * channels;
    let mut samples = vec![0; rows * line];
    let mut decoded = 0;
    for target in samples.chunks_exact_mut(line) {
        match reader.next_row() {
            Ok(Some(row)) => {
                let len = line.min(row.data().len());
                target[..len].copy_from_slice(&row.data()[..len]);
                decoded += 1;
            }
            Ok(None) | Err(_) => break,
        }
    }
    if decoded < rows {
        warn!("Image {path:?} is truncated, decoded {decoded} of {rows} rows");
    }

    let shape = match channels {
        1 => vec![rows, cols],
        _ => vec![rows, cols, channels],
    };
    Some(ArrayD::from_shape_vec(IxDyn(&shape), samples).map_err(|e| {
        error!("Decoded samples do not fit shape {shape:?}: {e}");
        StegiError::InvalidShape(shape)
    }))
}

pub fn from_image(img: DynamicImage) -> Result<ImageArray> {
    let (rows, cols) = (img.height() as usize, img.width() as usize);
    let (shape, raw) = match img.color().channel_count() {
        1 => (vec![rows, cols], img.into_luma8().into_raw()),
        2 => (vec![rows, cols, 2], img.into_luma_alpha8().into_raw()),
        3 => (vec![rows, cols, 3], img.into_rgb8().into_raw()),
        _ => (vec![rows, cols, 4], img.into_rgba8().into_raw()),
    };

    ArrayD::from_shape_vec(IxDyn(&shape), raw).map_err(|e| {
        error!("Decoded samples do not fit shape {shape:?}: {e}");
        StegiError::InvalidShape(shape)
    })
}

/// views an array as rows × columns × channels or fails with `InvalidShape`
pub fn as_pixels(array: ArrayViewD<'_, u8>) -> Result<ArrayView3<'_, u8>> {
    let shape = array.shape().to_vec();
    array
        .into_dimensionality::<Ix3>()
        .map_err(|_| StegiError::InvalidShape(shape))
}

/// number of channels of a rows × columns × channels array
pub fn channel_count(array: &ImageArray) -> Result<usize> {
    match array.shape() {
        [_, _, channels] => Ok(*channels),
        shape => Err(StegiError::InvalidShape(shape.to_vec())),
    }
}

/// Builds a displayable RGB image.
///
/// 3 channels are taken as they are, a 4th (alpha) channel is dropped.
/// 1 or 2 channels are treated as gray (+ alpha) and channel 0 is replicated.
pub fn to_rgb_image(array: ArrayView3<'_, u8>) -> Result<RgbImage> {
    let (rows, cols, channels) = array.dim();
    let invalid = || StegiError::InvalidShape(vec![rows, cols, channels]);
    let gray = match channels {
        1 | 2 => true,
        3 | 4 => false,
        _ => return Err(invalid()),
    };
    let width = u32::try_from(cols).map_err(|_| invalid())?;
    let height = u32::try_from(rows).map_err(|_| invalid())?;

    Ok(RgbImage::from_fn(width, height, |x, y| {
        let (row, col) = (y as usize, x as usize);
        if gray {
            let v = array[[row, col, 0]];
            image::Rgb([v, v, v])
        } else {
            image::Rgb([
                array[[row, col, 0]],
                array[[row, col, 1]],
                array[[row, col, 2]],
            ])
        }
    }))
}

//! Materialization of extracted bit-planes, either as an image or as a packed bit stream.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};
use image::{ImageError, ImageFormat, RgbImage};
use log::{debug, error};
use ndarray::{Array2, ArrayD, ArrayView3, ArrayViewD, Axis, ShapeBuilder};

use crate::error::StegiError;
use crate::media::{as_pixels, to_rgb_image, Viewer};
use crate::result::Result;

/// Flattening order of the active-pixel grid before packing
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum BitOrder {
    /// row after row, left to right
    #[default]
    RowMajor,
    /// column after column, top to bottom
    ColumnMajor,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OutputOptions {
    pub keep_color: bool,
    pub raw_binary: bool,
    pub order: BitOrder,
}

/// Flags the samples that are lit.
///
/// Without `keep_color` there is one flag per pixel (rows × columns), set when any channel
/// is non-zero.
/// With `keep_color` every sample is flagged on its own (rows × columns × channels).
pub fn active_flags(array: ArrayView3<'_, u8>, keep_color: bool) -> ArrayD<bool> {
    if keep_color {
        array.mapv(|v| v != 0).into_dyn()
    } else {
        array
            .map_axis(Axis(2), |pixel| pixel.iter().any(|&v| v != 0))
            .into_dyn()
    }
}

/// packs flags MSB first, 8 per byte, the last byte is padded with zeros
pub fn pack_bits<'a>(flags: impl IntoIterator<Item = &'a bool>) -> io::Result<Vec<u8>> {
    let mut writer = BitWriter::endian(Vec::new(), BigEndian);
    for &flag in flags {
        writer.write_bit(flag)?;
    }
    writer.byte_align()?;

    Ok(writer.into_writer())
}

/// reads back `count` flags that were packed with `pack_bits`
pub fn unpack_bits(bytes: &[u8], count: usize) -> io::Result<Vec<bool>> {
    let mut reader = BitReader::endian(bytes, BigEndian);
    (0..count).map(|_| reader.read_bit()).collect()
}

/// Rebuilds a rows × columns grid from a packed stream, the dimensions must be known
pub fn unpack_grid(
    bytes: &[u8],
    rows: usize,
    cols: usize,
    order: BitOrder,
) -> io::Result<Array2<bool>> {
    let flags = unpack_bits(bytes, rows * cols)?;
    let grid = match order {
        BitOrder::RowMajor => Array2::from_shape_vec((rows, cols), flags),
        BitOrder::ColumnMajor => Array2::from_shape_vec((rows, cols).f(), flags),
    };

    grid.map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// packs the active flags of an extracted array in the given order
pub fn pack_active_bits(
    array: ArrayView3<'_, u8>,
    keep_color: bool,
    order: BitOrder,
) -> io::Result<Vec<u8>> {
    let flags = active_flags(array, keep_color);
    match order {
        BitOrder::RowMajor => pack_bits(flags.iter()),
        // reversed axes iterate with the first index running fastest
        BitOrder::ColumnMajor => pack_bits(flags.t().iter()),
    }
}

/// writes the packed bit stream of an extracted array into `writer`
pub fn write_raw<W: Write>(
    array: ArrayView3<'_, u8>,
    options: &OutputOptions,
    mut writer: W,
) -> Result<()> {
    let data = pack_active_bits(array, options.keep_color, options.order)?;
    writer
        .write_all(&data)
        .and_then(|_| writer.flush())
        .map_err(|source| StegiError::WriteError { source })
}

/// Materializes an extracted array into `out_file`.
///
/// Raw mode writes the packed bit stream, otherwise an RGB image is saved
/// in the format that belongs to the file extension.
pub fn save_one(array: ArrayViewD<'_, u8>, options: &OutputOptions, out_file: &Path) -> Result<()> {
    let array = as_pixels(array)?;
    if options.raw_binary {
        let file = File::create(out_file).map_err(|source| {
            error!("Error creating file {out_file:?}: {source}");
            StegiError::WriteError { source }
        })?;
        write_raw(array, options, file)?;
    } else {
        save_image(&to_rgb_image(array)?, out_file)?;
    }
    debug!("Written {out_file:?}");

    Ok(())
}

/// Materializes an extracted array.
///
/// Without `out_file` raw data goes to stdout and images are shown in `viewer`.
pub fn process_one(
    array: ArrayViewD<'_, u8>,
    options: &OutputOptions,
    out_file: Option<&Path>,
    viewer: &dyn Viewer,
) -> Result<()> {
    if let Some(out_file) = out_file {
        return save_one(array, options, out_file);
    }

    let array = as_pixels(array)?;
    if options.raw_binary {
        write_raw(array, options, io::stdout().lock())
    } else {
        viewer.show(&to_rgb_image(array)?)
    }
}

fn save_image(image: &RgbImage, out_file: &Path) -> Result<()> {
    let format = ImageFormat::from_path(out_file).map_err(|_| {
        StegiError::UnsupportedOutputFormat(out_file.to_string_lossy().into_owned())
    })?;

    image
        .save_with_format(out_file, format)
        .map_err(|e| match e {
            ImageError::IoError(source) => {
                error!("Error writing image {out_file:?}: {source}");
                StegiError::WriteError { source }
            }
            ImageError::Unsupported(_) => {
                StegiError::UnsupportedOutputFormat(out_file.to_string_lossy().into_owned())
            }
            e => {
                error!("Error saving image {out_file:?}: {e}");
                StegiError::ImageEncodingError
            }
        })
}

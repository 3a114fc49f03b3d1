//! Bit-plane extraction.
//!
//! Every selected channel is reduced to a single bit-plane and blown up to full intensity,
//! every other channel is blacked out. Without `keep_color` the result is collapsed further
//! into a strict black and white picture.

use log::warn;
use ndarray::Axis;

use crate::error::StegiError;
use crate::media::ImageArray;
use crate::result::Result;

/// An extraction that was refused, carrying back the untouched input.
#[derive(Debug)]
pub struct Rejected {
    pub error: StegiError,
    pub array: ImageArray,
}

impl From<Rejected> for StegiError {
    fn from(rejected: Rejected) -> Self {
        rejected.error
    }
}

/// Decides what happens with a rejected extraction
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ValidationPolicy {
    /// log a warning and continue with the unchanged input
    #[default]
    Lenient,
    /// fail with the validation error
    Strict,
}

impl ValidationPolicy {
    pub fn resolve(
        self,
        extracted: std::result::Result<ImageArray, Rejected>,
    ) -> Result<ImageArray> {
        match (extracted, self) {
            (Ok(array), _) => Ok(array),
            (Err(rejected), ValidationPolicy::Strict) => Err(rejected.error),
            (Err(rejected), ValidationPolicy::Lenient) => {
                warn!("{}, continuing with the unchanged image", rejected.error);
                Ok(rejected.array)
            }
        }
    }
}

/// number of bits needed to represent `mask`
pub fn bit_length(mask: u32) -> usize {
    (u32::BITS - mask.leading_zeros()) as usize
}

/// true if bit `channel` is set in `channel_mask`
pub fn is_selected(channel_mask: u32, channel: usize) -> bool {
    u32::try_from(channel)
        .ok()
        .and_then(|n| 1u32.checked_shl(n))
        .map_or(false, |bit| channel_mask & bit != 0)
}

/// Extracts the bits selected by `plane_mask` from the channels selected by `channel_mask`.
///
/// The array is taken over and transformed in place. Selected channels end up 0 or 255,
/// unselected channels 0. Unless `keep_color` is set, any pixel that is not entirely black
/// afterwards turns entirely white.
///
/// Arrays that are not rows × columns × channels and channel masks wider than the
/// channel count are rejected, the array is handed back unchanged.
pub fn get_channel_bits(
    mut array: ImageArray,
    channel_mask: u32,
    plane_mask: u8,
    keep_color: bool,
) -> std::result::Result<ImageArray, Rejected> {
    if array.ndim() != 3 {
        let error = StegiError::InvalidShape(array.shape().to_vec());
        return Err(Rejected { error, array });
    }
    let channels = array.shape()[2];
    if bit_length(channel_mask) > channels {
        let error = StegiError::InvalidMask {
            mask: channel_mask,
            channels,
        };
        return Err(Rejected { error, array });
    }

    for (channel, mut plane) in array.axis_iter_mut(Axis(2)).enumerate() {
        if is_selected(channel_mask, channel) {
            plane.mapv_inplace(|v| if v & plane_mask != 0 { u8::MAX } else { 0 });
        } else {
            plane.fill(0);
        }
    }

    if !keep_color {
        for mut pixel in array.lanes_mut(Axis(2)) {
            if pixel.iter().any(|&v| v != 0) {
                pixel.fill(u8::MAX);
            }
        }
    }

    Ok(array)
}

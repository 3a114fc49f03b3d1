//! Brute force over every channel / bit-plane combination.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, error, info};

use crate::commands::ProcessOptions;
use crate::error::StegiError;
use crate::media::{channel_count, ImageArray};
use crate::output::save_one;
use crate::planes::get_channel_bits;
use crate::result::Result;

/// output folder used when a sweep is requested without one
pub const DEFAULT_SWEEP_DIR: &str = "out";

/// bit-planes of an 8 bit channel
pub const PLANE_COUNT: usize = 8;

/// emitted after each written combination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepProgress {
    pub done: usize,
    pub total: usize,
    pub file: PathBuf,
}

/// Selectors `0..channels` pick a single channel, `channels` itself picks all of them
pub fn channel_mask_for_selector(selector: usize, channels: usize) -> u32 {
    let shift = |n: usize| u32::try_from(n).ok().and_then(|n| 1u32.checked_shl(n));
    if selector < channels {
        shift(selector).unwrap_or(0)
    } else {
        shift(channels).map_or(u32::MAX, |bit| bit - 1)
    }
}

/// e.g. `0_00000001.bmp` or `3_10000000.bin`
pub fn sweep_file_name(selector: usize, plane_mask: u8, raw_binary: bool) -> String {
    let ext = if raw_binary { "bin" } else { "bmp" };
    format!("{selector}_{plane_mask:08b}.{ext}")
}

/// Writes one output per (channel selector, bit-plane) pair into `out_dir`,
/// `(channels + 1) * 8` files in total. Each pair is extracted from its own copy of `source`.
pub fn sweep(
    source: &ImageArray,
    out_dir: &Path,
    options: &ProcessOptions,
    mut progress: impl FnMut(SweepProgress),
) -> Result<()> {
    let channels = channel_count(source)?;
    fs::create_dir_all(out_dir).map_err(|e| {
        error!("Error creating output folder {out_dir:?}: {e}");
        StegiError::WriteError { source: e }
    })?;

    let output = options.output_options();
    let total = (channels + 1) * PLANE_COUNT;
    info!("Sweeping {total} combinations into {out_dir:?}");

    for selector in 0..=channels {
        let channel_mask = channel_mask_for_selector(selector, channels);
        for bit in 0..PLANE_COUNT {
            let plane_mask = 1u8 << bit;
            let extracted = options.validation.resolve(get_channel_bits(
                source.clone(),
                channel_mask,
                plane_mask,
                options.keep_color,
            ))?;

            let file = out_dir.join(sweep_file_name(selector, plane_mask, options.raw_binary));
            save_one(extracted.view(), &output, &file)?;

            let done = selector * PLANE_COUNT + bit + 1;
            debug!(
                "Done: {done}/{total} channel mask {channel_mask:b} plane mask {plane_mask:08b}"
            );
            progress(SweepProgress { done, total, file });
        }
    }

    Ok(())
}

use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::media::{self, SystemViewer, Viewer};
use crate::output::{process_one, BitOrder, OutputOptions};
use crate::planes::{get_channel_bits, ValidationPolicy};
use crate::result::Result;
use crate::sweep::{sweep, SweepProgress, DEFAULT_SWEEP_DIR};

/// Everything that controls one run, passed down explicitly
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessOptions {
    /// bit `n` selects channel `n`
    pub channel_mask: u32,
    /// bit(s) extracted from every selected channel
    pub plane_mask: u8,
    /// skip the black and white collapse
    pub keep_color: bool,
    /// output file, or the output folder when `all_masks` is set
    pub out_file: Option<PathBuf>,
    /// ignore the masks and sweep every combination
    pub all_masks: bool,
    /// pack the active pixels into a bit stream instead of rendering an image
    pub raw_binary: bool,
    pub order: BitOrder,
    pub validation: ValidationPolicy,
}

impl ProcessOptions {
    pub fn output_options(&self) -> OutputOptions {
        OutputOptions {
            keep_color: self.keep_color,
            raw_binary: self.raw_binary,
            order: self.order,
        }
    }

    /// the folder a sweep writes into
    pub fn sweep_dir(&self) -> PathBuf {
        self.out_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SWEEP_DIR))
    }
}

/// decodes `filename` and extracts either the requested planes or all of them
pub fn process(
    filename: &Path,
    options: &ProcessOptions,
    progress: impl FnMut(SweepProgress),
) -> Result<()> {
    process_with_viewer(filename, options, &SystemViewer, progress)
}

pub fn process_with_viewer(
    filename: &Path,
    options: &ProcessOptions,
    viewer: &dyn Viewer,
    progress: impl FnMut(SweepProgress),
) -> Result<()> {
    let array = media::open(filename)?;
    debug!("Decoded {filename:?} into {:?}", array.shape());

    if options.all_masks {
        return sweep(&array, &options.sweep_dir(), options, progress);
    }

    info!(
        "Extracting plane mask {:08b} from channel mask {:b}",
        options.plane_mask, options.channel_mask
    );
    let extracted = options.validation.resolve(get_channel_bits(
        array,
        options.channel_mask,
        options.plane_mask,
        options.keep_color,
    ))?;

    process_one(
        extracted.view(),
        &options.output_options(),
        options.out_file.as_deref(),
        viewer,
    )
}

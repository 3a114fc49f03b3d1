use std::path::{Path, PathBuf};

use crate::commands::{process_with_viewer, ProcessOptions};
use crate::media::{SystemViewer, Viewer};
use crate::output::BitOrder;
use crate::planes::ValidationPolicy;
use crate::sweep::SweepProgress;
use crate::StegiError;

pub fn prepare() -> SolveApi {
    SolveApi::default()
}

#[derive(Default, Debug)]
pub struct SolveApi {
    image: Option<PathBuf>,
    options: ProcessOptions,
    viewer: Option<Box<dyn Viewer>>,
}

impl SolveApi {
    /// Use the given options as they are
    pub fn with_options(mut self, options: ProcessOptions) -> Self {
        self.options = options;
        self
    }

    /// This is the image the bit-planes are extracted from
    pub fn from_image(mut self, image: impl AsRef<Path>) -> Self {
        self.image = Some(image.as_ref().to_path_buf());
        self
    }

    pub fn with_channel_mask(mut self, channel_mask: u32) -> Self {
        self.options.channel_mask = channel_mask;
        self
    }

    pub fn with_plane_mask(mut self, plane_mask: u8) -> Self {
        self.options.plane_mask = plane_mask;
        self
    }

    /// Keep the per channel colors instead of collapsing to black and white
    pub fn keep_color(mut self, keep_color: bool) -> Self {
        self.options.keep_color = keep_color;
        self
    }

    /// Output file, or output folder for a sweep
    pub fn into_output(mut self, output: impl AsRef<Path>) -> Self {
        self.options.out_file = Some(output.as_ref().to_path_buf());
        self
    }

    /// Set the output, if `None` is passed images are shown and raw data goes to stdout
    pub fn use_output(mut self, output: Option<PathBuf>) -> Self {
        self.options.out_file = output;
        self
    }

    /// Sweep all channel and bit-plane combinations
    pub fn all_masks(mut self, all_masks: bool) -> Self {
        self.options.all_masks = all_masks;
        self
    }

    /// Pack the extracted bits instead of rendering an image
    pub fn raw_binary(mut self, raw_binary: bool) -> Self {
        self.options.raw_binary = raw_binary;
        self
    }

    pub fn with_bit_order(mut self, order: BitOrder) -> Self {
        self.options.order = order;
        self
    }

    pub fn with_validation(mut self, validation: ValidationPolicy) -> Self {
        self.options.validation = validation;
        self
    }

    /// Replaces the system image viewer
    pub fn with_viewer(mut self, viewer: impl Viewer + 'static) -> Self {
        self.viewer = Some(Box::new(viewer));
        self
    }

    pub fn options(&self) -> &ProcessOptions {
        &self.options
    }

    /// Execute the extraction and blocks until it is finished
    pub fn execute(self) -> Result<(), StegiError> {
        self.execute_with_progress(|_| {})
    }

    /// Same as `execute`, reporting every finished sweep combination to `progress`
    pub fn execute_with_progress(
        self,
        progress: impl FnMut(SweepProgress),
    ) -> Result<(), StegiError> {
        let Some(image) = self.image else {
            return Err(StegiError::InputNotSet);
        };
        let viewer = self.viewer.unwrap_or_else(|| Box::new(SystemViewer));

        process_with_viewer(&image, &self.options, viewer.as_ref(), progress)
    }
}

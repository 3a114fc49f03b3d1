use std::fmt::Debug;
use std::path::Path;
use std::process::Command;

use image::{ImageFormat, RgbImage};
use log::{debug, error};

use crate::error::StegiError;
use crate::result::Result;

/// Shows an image to the user, used whenever no output file is given
pub trait Viewer: Debug {
    fn show(&self, image: &RgbImage) -> Result<()>;
}

/// Hands the image over to the platform's default image viewer.
///
/// The image is written to a temporary PNG that is left behind,
/// the viewer is started detached and may read it at any time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemViewer;

impl Viewer for SystemViewer {
    fn show(&self, image: &RgbImage) -> Result<()> {
        let mut file = tempfile::Builder::new()
            .prefix("stegi-")
            .suffix(".png")
            .tempfile()
            .map_err(|source| StegiError::ViewerError { source })?;

        image
            .write_to(file.as_file_mut(), ImageFormat::Png)
            .map_err(|e| {
                error!("Error writing preview image: {e}");
                StegiError::ImageEncodingError
            })?;

        let (_, path) = file
            .keep()
            .map_err(|e| StegiError::ViewerError { source: e.error })?;
        debug!("Opening {path:?} in the system viewer");

        opener(&path).spawn().map_err(|source| {
            error!("Error starting the image viewer for {path:?}: {source}");
            StegiError::ViewerError { source }
        })?;

        Ok(())
    }
}

#[cfg(target_os = "macos")]
fn opener(path: &Path) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(path);
    cmd
}

#[cfg(target_os = "windows")]
fn opener(path: &Path) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", ""]).arg(path);
    cmd
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn opener(path: &Path) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(path);
    cmd
}

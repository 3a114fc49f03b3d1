pub mod image_array;
pub mod viewer;

pub use image_array::*;
pub use viewer::{SystemViewer, Viewer};

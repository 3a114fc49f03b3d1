//! # Stegi Core API
//!
//! Stegsolve style bit-plane analysis for raster images. An image is decoded into a
//! rows × columns × channels array, then
//! - [`get_channel_bits`][planes] keeps one bit-plane of the selected channels
//! - [`process_one`][output] renders the result as an image or packs it into raw bits
//! - [`process`][process] ties both together and can sweep every combination
//!
//! # Usage Examples
//!
//! ## Sweep all bit-planes of an image
//!
//! ```rust
//! use tempfile::tempdir;
//!
//! let temp_dir = tempdir().expect("Failed to create temporary directory");
//! let carrier = temp_dir.path().join("carrier.png");
//! image::RgbImage::from_fn(8, 8, |x, y| image::Rgb([x as u8, y as u8, (x * y) as u8]))
//!     .save(&carrier)
//!     .expect("Failed to write carrier image");
//!
//! stegi_core::api::solve::prepare()
//!     .from_image(&carrier)
//!     .all_masks(true)                      // 4 channel selectors × 8 planes
//!     .into_output(temp_dir.path().join("planes"))
//!     .execute()
//!     .expect("Failed to sweep the image");
//!
//! assert_eq!(temp_dir.path().join("planes").read_dir().unwrap().count(), 32);
//! ```
//!
//! [planes]: ./planes/fn.get_channel_bits.html
//! [output]: ./output/fn.process_one.html
//! [process]: ./commands/fn.process.html

#![warn(clippy::redundant_else)]

pub mod api;
pub mod commands;
pub mod error;
pub mod media;
pub mod output;
pub mod planes;
pub mod result;
pub mod sweep;

pub use crate::commands::{process, ProcessOptions};
pub use crate::error::StegiError;
pub use crate::media::ImageArray;
pub use crate::output::{process_one, BitOrder, OutputOptions};
pub use crate::planes::{get_channel_bits, Rejected, ValidationPolicy};
pub use crate::result::Result;
pub use crate::sweep::SweepProgress;

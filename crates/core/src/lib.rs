#![deny(unsafe_code)]
//! Core pipeline for the stillshade image viewer.
//!
//! Draws a color/depth image pair on a fullscreen quad while keeping the
//! window's depth buffer populated for outside observers, and decides how
//! the window tracks its image (native size or fitted preview) and where
//! dropped files land. The windowing host and the image codec stay behind
//! the `WindowHost` and `ImageDecoder` traits; everything GPU-facing goes
//! through glow.

pub mod decode;
pub mod drop_zone;
pub mod error;
pub mod fit;
pub mod host;
pub mod render;
pub mod renderer;

pub use decode::{DecodedImage, ImageDecoder};
pub use drop_zone::{route_drop, DropTarget};
pub use error::ViewerError;
pub use fit::{fit_preview, FitState};
pub use host::{Key, WindowHost};
pub use renderer::{ControlState, FitRenderer};

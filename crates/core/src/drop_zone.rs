//! Drop routing: which texture slot a dropped file replaces, if any.
//!
//! Routing is a pure decision over the drop payload and the cursor's last
//! known position; rejected drops leave the viewer untouched.

use std::path::PathBuf;

use glam::Vec2;

use crate::error::ViewerError;

/// Marker a dropped file's name must contain (case-insensitive) to be
/// accepted. Matching the name rather than parsing the extension keeps the
/// check forgiving about suffixes like `.png.bak`.
pub const IMAGE_MARKER: &str = "png";

/// The texture slot a dropped file is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// Upper half of the window: replace the color image.
    Color,
    /// Lower half (or exactly the midline): replace the depth image.
    Depth,
}

/// Decides what a file drop should do.
///
/// Exactly one file whose name contains [`IMAGE_MARKER`] is accepted. The
/// cursor's vertical position picks the slot: strictly above the window's
/// midline routes to [`DropTarget::Color`], everything else to
/// [`DropTarget::Depth`].
///
/// # Errors
///
/// Returns [`ViewerError::InputRejected`] for multi-file drops, empty
/// drops, and files without the marker in their name.
pub fn route_drop(
    paths: &[PathBuf],
    cursor: Vec2,
    window_height: u32,
) -> Result<DropTarget, ViewerError> {
    if paths.len() != 1 {
        return Err(ViewerError::InputRejected(format!(
            "one file at a time ({} dropped)",
            paths.len()
        )));
    }

    let name = paths[0]
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if !name.contains(IMAGE_MARKER) {
        return Err(ViewerError::InputRejected(format!(
            "only PNG files are supported, got {}",
            paths[0].display()
        )));
    }

    if cursor.y < window_height as f32 / 2.0 {
        Ok(DropTarget::Color)
    } else {
        Ok(DropTarget::Depth)
    }
}

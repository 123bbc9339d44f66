//! Window-fit math and sizing-mode state.
//!
//! A window can track its image at native resolution or as a fitted
//! preview that stays comfortably within the screen. [`fit_preview`] is the
//! pure sizing rule; [`FitState`] layers the toggle bookkeeping on top.

use glam::UVec2;

/// Fraction of each screen axis a fitted preview may occupy.
const FIT_FRACTION: f64 = 0.8;

/// Computes the preview size for an image on a given screen.
///
/// Images that already fit on both axes pass through unchanged. Anything
/// larger is scaled down, preserving aspect ratio, so that neither axis
/// exceeds 80% of the screen: the width-driven candidate wins when its
/// scaled height stays within the height bound, otherwise the fit is
/// height-driven. Results truncate toward zero.
///
/// Intermediate math runs in f64 with the integer products formed before
/// dividing, so exact ratios (a 3840x2160 image on a 1920x1080 screen)
/// come out exact instead of one pixel short.
pub fn fit_preview(image: UVec2, screen: UVec2) -> UVec2 {
    if image.x <= screen.x && image.y <= screen.y {
        return image;
    }

    let w = image.x as f64;
    let h = image.y as f64;
    let max_w = (FIT_FRACTION * screen.x as f64).floor();
    let max_h = (FIT_FRACTION * screen.y as f64).floor();

    let candidate_h = (h * max_w / w).floor();
    if candidate_h <= max_h {
        UVec2::new(max_w as u32, candidate_h as u32)
    } else {
        let candidate_w = (w * max_h / h).floor();
        UVec2::new(candidate_w as u32, max_h as u32)
    }
}

/// Sizing-mode state: which size the window is tracking and why.
///
/// `preview` records the requested mode; `full_size` records whether the
/// window currently sits at the image's native resolution, which is what
/// the toggle inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitState {
    screen: UVec2,
    image: UVec2,
    preview: bool,
    full_size: bool,
}

impl FitState {
    /// Creates the state for a screen and the initially loaded image.
    ///
    /// Both mode flags start false: the window is at its host-chosen
    /// startup size, which is neither fitted nor native.
    pub fn new(screen: UVec2, image: UVec2) -> Self {
        Self {
            screen,
            image,
            preview: false,
            full_size: false,
        }
    }

    /// Applies a sizing mode and returns the window size to request.
    ///
    /// Preview mode yields the fitted size; native mode yields the image
    /// dimensions and marks the window full-size.
    pub fn apply(&mut self, preview: bool) -> UVec2 {
        self.preview = preview;
        if preview {
            self.full_size = false;
            fit_preview(self.image, self.screen)
        } else {
            self.full_size = true;
            self.image
        }
    }

    /// Flips between native and preview sizing and returns the new size.
    ///
    /// A window at native size goes to the fitted preview; a window in any
    /// other state goes to native.
    pub fn toggle(&mut self) -> UVec2 {
        let to_preview = self.full_size;
        self.apply(to_preview)
    }

    /// Records the dimensions of a newly loaded image.
    pub fn set_image(&mut self, image: UVec2) {
        self.image = image;
    }

    /// Dimensions of the currently tracked image.
    pub fn image(&self) -> UVec2 {
        self.image
    }

    /// Screen dimensions the fits are computed against.
    pub fn screen(&self) -> UVec2 {
        self.screen
    }

    /// True when the last applied mode was preview.
    pub fn is_preview(&self) -> bool {
        self.preview
    }

    /// True when the window sits at the image's native resolution.
    pub fn is_full_size(&self) -> bool {
        self.full_size
    }
}

//! Error types for the stillshade core.

use thiserror::Error;

/// Errors produced by the viewer pipeline.
///
/// Only the shader variants abort startup; drop rejections, decode
/// failures, and attachment problems are reported to the caller and the
/// viewer keeps its last-good state.
#[derive(Debug, Clone, Error)]
pub enum ViewerError {
    /// A shader stage failed to compile.
    #[error("{stage} shader failed to compile:\n{log}")]
    Compile {
        /// The stage that failed ("vertex" or "fragment").
        stage: &'static str,
        /// Numbered source followed by the driver's info log.
        log: String,
    },

    /// The shader program failed to link.
    #[error("shader program failed to link:\n{0}")]
    Link(String),

    /// A GPU object could not be created, or framebuffer attachment
    /// state could not be established.
    #[error("attachment error: {0}")]
    Attachment(String),

    /// A file drop was rejected before any state changed.
    #[error("drop rejected: {0}")]
    InputRejected(String),

    /// Image bytes could not be decoded, or decoded pixels failed
    /// validation against their stated dimensions.
    #[error("image decode failed: {0}")]
    Decode(String),

    /// An image file could not be read from disk.
    #[error("image read failed: {0}")]
    Io(String),
}

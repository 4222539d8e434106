//! Error types for pipeline setup.

use gstreamer::glib;
use thiserror::Error;

/// Fatal errors raised while setting up or starting the pipeline.
///
/// Errors reported on the bus once playback runs are not part of this type,
/// they end the run through [`crate::Termination::Error`].
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("GStreamer init error: {0}")]
    Init(#[from] glib::Error),

    /// The element type is not registered (plugin missing or not installed)
    #[error("Failed to create element '{name}': factory '{factory}' not found")]
    MissingElement { factory: String, name: String },

    #[error("Failed to add elements to pipeline: {0}")]
    Assemble(glib::BoolError),

    #[error("Failed to link {chain} elements")]
    Link { chain: &'static str },

    #[error("GStreamer state change error: {0}")]
    StateChange(#[from] gstreamer::StateChangeError),

    #[error("Pipeline has no bus")]
    NoBus,
}

//! RTSP player built on GStreamer.
//!
//! Connects to an RTSP source and renders its streams locally:
//! - H264 video: `rtph264depay ! avdec_h264 ! videoconvert ! autovideosink`
//! - A-law audio: `rtppcmadepay ! alawdec ! audioconvert ! audioresample ! autoaudiosink`
//!
//! The source pads only appear after SDP negotiation, so both depayloaders are
//! linked from `pad-added` handlers (see [`pad_linker`]).

pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod factory;
pub mod media;
pub mod pad_linker;
pub mod pipeline;

pub use config::{ConfigError, PlayerConfig};
pub use controller::{PlaybackController, Termination};
pub use error::PlayerError;
pub use media::MediaSubsystem;
pub use pad_linker::{DepayLinker, LinkOutcome, MediaKind, PadAddedHandler};
pub use pipeline::PlayerPipeline;

//! Dynamic linking of `rtspsrc` pads.
//!
//! `rtspsrc` only creates its source pads once the RTSP session has been set
//! up, one per negotiated stream. Each [`PadAddedHandler`] subscribed to the
//! source sees every new pad and decides on its own whether the pad is
//! relevant, so several handlers can share one source.

use gstreamer::glib;
use gstreamer::prelude::*;
use std::fmt;

/// Media type prefix of RTP payload caps
pub const RTP_CAPS_PREFIX: &str = "application/x-rtp";

/// Kind of stream a depayloader consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Audio,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Video => f.write_str("video"),
            MediaKind::Audio => f.write_str("audio"),
        }
    }
}

/// Result of offering a new pad to a handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// The pad now feeds the depayloader
    Linked,
    /// The depayloader already has an upstream pad, nothing was attempted
    AlreadyLinked,
    /// The pad does not carry RTP, it belongs to someone else
    NotRtp(String),
    /// The link was attempted and refused
    Failed(gstreamer::PadLinkError),
    /// The depayloader (or its sink pad) no longer exists
    NoTarget,
}

/// Observer for pads appearing on a source element.
pub trait PadAddedHandler: Send + Sync + 'static {
    /// Called for every new pad on the source the handler is subscribed to.
    fn on_pad_added(&self, pad: &gstreamer::Pad) -> LinkOutcome;
}

/// Subscribe `handler` to the `pad-added` signal of `source`.
pub fn subscribe<H: PadAddedHandler>(
    source: &gstreamer::Element,
    handler: H,
) -> glib::SignalHandlerId {
    source.connect_pad_added(move |_src, pad| {
        handler.on_pad_added(pad);
    })
}

/// Whether a caps structure name denotes an RTP payload
pub fn is_rtp_media_type(media_type: &str) -> bool {
    media_type.starts_with(RTP_CAPS_PREFIX)
}

/// Links RTP pads to the sink pad of one depayloader, at most once.
///
/// The depayloader is held weakly: the closure lives on the source, and both
/// elements are owned by the pipeline.
pub struct DepayLinker {
    kind: MediaKind,
    depay: glib::WeakRef<gstreamer::Element>,
}

impl DepayLinker {
    pub fn new(kind: MediaKind, depay: &gstreamer::Element) -> Self {
        Self {
            kind,
            depay: depay.downgrade(),
        }
    }
}

impl PadAddedHandler for DepayLinker {
    fn on_pad_added(&self, pad: &gstreamer::Pad) -> LinkOutcome {
        log::info!("New {} pad candidate: {}", self.kind, pad.name());

        let Some(depay) = self.depay.upgrade() else {
            log::warn!("{} depayloader is gone, ignoring pad {}", self.kind, pad.name());
            return LinkOutcome::NoTarget;
        };
        let Some(sink_pad) = depay.static_pad("sink") else {
            log::warn!("{} has no sink pad", depay.name());
            return LinkOutcome::NoTarget;
        };

        if sink_pad.is_linked() {
            log::info!("{} pad already linked.", self.kind);
            return LinkOutcome::AlreadyLinked;
        }

        let caps = pad.query_caps(None);
        let media_type = caps
            .structure(0)
            .map(|s| s.name().as_str().to_string())
            .unwrap_or_default();

        if !is_rtp_media_type(&media_type) {
            log::debug!(
                "Skipping {} pad {} with type '{}'",
                self.kind,
                pad.name(),
                media_type
            );
            return LinkOutcome::NotRtp(media_type);
        }

        match pad.link(&sink_pad) {
            Ok(_) => {
                log::info!("RTP {} pads linked successfully.", self.kind);
                LinkOutcome::Linked
            }
            Err(e) => {
                log::error!("Failed to link RTP {} pad: {:?}", self.kind, e);
                LinkOutcome::Failed(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rtp_media_type() {
        assert!(is_rtp_media_type("application/x-rtp"));
        assert!(!is_rtp_media_type("video/x-h264"));
        assert!(!is_rtp_media_type("audio/x-alaw"));
        assert!(!is_rtp_media_type(""));
    }

    #[test]
    fn test_media_kind_display() {
        assert_eq!(MediaKind::Video.to_string(), "video");
        assert_eq!(MediaKind::Audio.to_string(), "audio");
    }

    #[test]
    fn test_dropped_depayloader() {
        gstreamer::init().unwrap();

        let depay = gstreamer::Bin::with_name("depay-video").upcast::<gstreamer::Element>();
        let linker = DepayLinker::new(MediaKind::Video, &depay);
        drop(depay);

        let pad = gstreamer::Pad::builder(gstreamer::PadDirection::Src)
            .name("recv_rtp_src_0")
            .build();
        assert_eq!(linker.on_pad_added(&pad), LinkOutcome::NoTarget);
    }

    #[test]
    fn test_depayloader_without_sink_pad() {
        gstreamer::init().unwrap();

        // A bare bin has no static pads
        let depay = gstreamer::Bin::with_name("depay-audio").upcast::<gstreamer::Element>();
        let linker = DepayLinker::new(MediaKind::Audio, &depay);

        let pad = gstreamer::Pad::builder(gstreamer::PadDirection::Src)
            .name("recv_rtp_src_1")
            .build();
        assert_eq!(linker.on_pad_added(&pad), LinkOutcome::NoTarget);
    }
}

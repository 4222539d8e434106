use crate::error::PlayerError;
use gstreamer::prelude::*;

/// Bus messages the controller waits for
const WATCHED_MESSAGES: [gstreamer::MessageType; 3] = [
    gstreamer::MessageType::StateChanged,
    gstreamer::MessageType::Error,
    gstreamer::MessageType::Eos,
];

/// Why playback stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    EndOfStream,
    Error {
        /// Name of the element that posted the error
        source: String,
        message: String,
        debug: Option<String>,
    },
}

/// Drives the pipeline state and dispatches its bus messages.
///
/// The pipeline is set back to `Null` exactly once, by [`PlaybackController::shutdown`]
/// or on drop, whatever ended the run.
pub struct PlaybackController {
    pipeline: gstreamer::Pipeline,
    bus: gstreamer::Bus,
    stopped: bool,
}

impl PlaybackController {
    pub fn new(pipeline: gstreamer::Pipeline) -> Result<Self, PlayerError> {
        let bus = pipeline.bus().ok_or(PlayerError::NoBus)?;
        Ok(Self {
            pipeline,
            bus,
            stopped: false,
        })
    }

    pub fn pipeline(&self) -> &gstreamer::Pipeline {
        &self.pipeline
    }

    pub fn play(&self) -> Result<(), PlayerError> {
        self.pipeline
            .set_state(gstreamer::State::Playing)
            .inspect_err(|_| log::error!("Failed to set pipeline state to playing"))?;
        Ok(())
    }

    /// Block on the bus until an error or end-of-stream arrives.
    pub fn run(&self) -> Termination {
        loop {
            let Some(msg) = self
                .bus
                .timed_pop_filtered(gstreamer::ClockTime::NONE, &WATCHED_MESSAGES)
            else {
                continue;
            };

            if let Some(termination) = self.dispatch(&msg) {
                return termination;
            }
        }
    }

    fn dispatch(&self, msg: &gstreamer::Message) -> Option<Termination> {
        use gstreamer::MessageView;

        match msg.view() {
            MessageView::Error(err) => {
                let source = msg
                    .src()
                    .map(|s| s.name().to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                let message = err.error().message().to_string();
                let debug = err.debug().map(|d| d.to_string());

                log::error!("Error received from element {}: {}", source, message);
                log::error!(
                    "Debugging information: {}",
                    debug.as_deref().unwrap_or("none")
                );

                Some(Termination::Error {
                    source,
                    message,
                    debug,
                })
            }
            MessageView::Eos(_) => {
                log::info!("End-Of-Stream reached.");
                Some(Termination::EndOfStream)
            }
            MessageView::StateChanged(state) => {
                if msg
                    .src()
                    .map(|s| s == self.pipeline.upcast_ref::<gstreamer::Object>())
                    .unwrap_or(false)
                {
                    log::info!(
                        "Pipeline state changed from {} to {}",
                        state_name(state.old()),
                        state_name(state.current())
                    );
                }
                None
            }
            _ => None,
        }
    }

    /// Set the pipeline to `Null`. Only the first call has an effect.
    pub fn shutdown(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;

        match self.pipeline.set_state(gstreamer::State::Null) {
            Ok(_) => log::info!("Pipeline stopped"),
            Err(e) => log::error!("Failed to set pipeline state to null: {}", e),
        }
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// GStreamer's name for a state, as printed by `gst_element_state_get_name`
pub fn state_name(state: gstreamer::State) -> &'static str {
    match state {
        gstreamer::State::VoidPending => "VOID_PENDING",
        gstreamer::State::Null => "NULL",
        gstreamer::State::Ready => "READY",
        gstreamer::State::Paused => "PAUSED",
        gstreamer::State::Playing => "PLAYING",
        _ => "UNKNOWN",
    }
}

/// Make [`PlaybackController::run`] return through its end-of-stream branch.
///
/// The message goes straight onto the bus instead of waiting for every sink
/// to drain, so this also works before `rtspsrc` exposed any pad or while one
/// chain has no upstream at all.
pub fn request_stop(pipeline: &gstreamer::Pipeline) {
    let Some(bus) = pipeline.bus() else {
        log::warn!("Pipeline has no bus, cannot request stop");
        return;
    };
    let msg = gstreamer::message::Eos::builder().src(pipeline).build();
    if let Err(e) = bus.post(msg) {
        log::warn!("Failed to post end-of-stream message: {}", e);
    }
}

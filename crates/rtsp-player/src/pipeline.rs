use crate::config::PlayerConfig;
use crate::error::PlayerError;
use crate::factory::make_element;
use crate::pad_linker::{subscribe, DepayLinker, MediaKind};
use gstreamer::glib;
use gstreamer::prelude::*;

pub const PIPELINE_NAME: &str = "rtsp-pipeline";

/// `rtph264depay ! avdec_h264 ! videoconvert ! <video sink>`
pub struct VideoChain {
    pub depay: gstreamer::Element,
    pub decode: gstreamer::Element,
    pub convert: gstreamer::Element,
    pub sink: gstreamer::Element,
}

impl VideoChain {
    fn new(sink_factory: &str) -> Result<Self, PlayerError> {
        Ok(Self {
            depay: make_element("rtph264depay", "depay-video")?,
            decode: make_element("avdec_h264", "decode-video")?,
            convert: make_element("videoconvert", "convert-video")?,
            sink: make_element(sink_factory, "sink-video")?,
        })
    }

    fn elements(&self) -> [&gstreamer::Element; 4] {
        [&self.depay, &self.decode, &self.convert, &self.sink]
    }
}

/// `rtppcmadepay ! alawdec ! audioconvert ! audioresample ! <audio sink>`
pub struct AudioChain {
    pub depay: gstreamer::Element,
    pub decode: gstreamer::Element,
    pub convert: gstreamer::Element,
    pub resample: gstreamer::Element,
    pub sink: gstreamer::Element,
}

impl AudioChain {
    fn new(sink_factory: &str) -> Result<Self, PlayerError> {
        Ok(Self {
            depay: make_element("rtppcmadepay", "depay-audio")?,
            decode: make_element("alawdec", "decode-audio")?,
            convert: make_element("audioconvert", "convert-audio")?,
            resample: make_element("audioresample", "resample-audio")?,
            sink: make_element(sink_factory, "sink-audio")?,
        })
    }

    fn elements(&self) -> [&gstreamer::Element; 5] {
        [
            &self.depay,
            &self.decode,
            &self.convert,
            &self.resample,
            &self.sink,
        ]
    }
}

/// The assembled pipeline, before any pad of the source exists.
///
/// ```text
/// rtspsrc name=src
///   src. ! rtph264depay ! avdec_h264 ! videoconvert ! autovideosink
///   src. ! rtppcmadepay ! alawdec ! audioconvert ! audioresample ! autoaudiosink
/// ```
pub struct PlayerPipeline {
    pipeline: gstreamer::Pipeline,
    source: gstreamer::Element,
    video: VideoChain,
    audio: AudioChain,
}

impl PlayerPipeline {
    /// Create every element, add them to one pipeline and link both chains.
    ///
    /// The source pads are linked later, see [`PlayerPipeline::connect_depayloaders`].
    pub fn build(url: &str, config: &PlayerConfig) -> Result<Self, PlayerError> {
        let pipeline = gstreamer::Pipeline::with_name(PIPELINE_NAME);

        let source = make_element("rtspsrc", "src")?;
        let video = VideoChain::new(&config.video_sink)?;
        let audio = AudioChain::new(&config.audio_sink)?;

        source.set_property("location", url);
        source.set_property("latency", config.latency);

        pipeline
            .add(&source)
            .and_then(|_| pipeline.add_many(video.elements()))
            .and_then(|_| pipeline.add_many(audio.elements()))
            .map_err(PlayerError::Assemble)?;

        link_chain("video", &video.elements())?;
        link_chain("audio", &audio.elements())?;

        log::debug!(
            "Assembled '{}' for {} (latency {} ms)",
            PIPELINE_NAME,
            url,
            config.latency
        );

        Ok(Self {
            pipeline,
            source,
            video,
            audio,
        })
    }

    /// Subscribe one linker per depayloader to the source's new pads.
    pub fn connect_depayloaders(&self) -> [glib::SignalHandlerId; 2] {
        [
            subscribe(
                &self.source,
                DepayLinker::new(MediaKind::Video, &self.video.depay),
            ),
            subscribe(
                &self.source,
                DepayLinker::new(MediaKind::Audio, &self.audio.depay),
            ),
        ]
    }

    pub fn pipeline(&self) -> &gstreamer::Pipeline {
        &self.pipeline
    }

    /// Release the element handles, keeping only the pipeline that owns them.
    pub fn into_pipeline(self) -> gstreamer::Pipeline {
        self.pipeline
    }
}

/// Link `elements` in order, failing the whole chain on the first refused link.
fn link_chain(chain: &'static str, elements: &[&gstreamer::Element]) -> Result<(), PlayerError> {
    gstreamer::Element::link_many(elements).map_err(|e| {
        log::error!("Failed to link {} elements: {}", chain, e);
        PlayerError::Link { chain }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::is_available;

    const FACTORIES: [&str; 10] = [
        "rtspsrc",
        "rtph264depay",
        "avdec_h264",
        "videoconvert",
        "fakesink",
        "rtppcmadepay",
        "alawdec",
        "audioconvert",
        "audioresample",
        "fakesink",
    ];

    fn test_config() -> PlayerConfig {
        PlayerConfig {
            video_sink: "fakesink".to_string(),
            audio_sink: "fakesink".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_sink_factory() {
        gstreamer::init().unwrap();

        let config = PlayerConfig {
            video_sink: "no-such-video-sink".to_string(),
            ..Default::default()
        };
        let result = PlayerPipeline::build("rtsp://127.0.0.1:8554/test", &config);
        assert!(matches!(
            result,
            Err(PlayerError::MissingElement { .. })
        ));
    }

    #[test]
    fn test_link_chain_refused() {
        gstreamer::init().unwrap();
        if !is_available("identity") || !is_available("fakesrc") {
            return;
        }

        // fakesrc has no sink pad, so nothing can link into it
        let convert = make_element("identity", "convert-video").unwrap();
        let sink = make_element("fakesrc", "sink-video").unwrap();
        let pipeline = gstreamer::Pipeline::with_name(PIPELINE_NAME);
        pipeline.add_many([&convert, &sink]).unwrap();

        let result = link_chain("video", &[&convert, &sink]);
        assert!(matches!(result, Err(PlayerError::Link { chain: "video" })));
    }

    #[test]
    fn test_link_chain() {
        gstreamer::init().unwrap();
        if !is_available("identity") || !is_available("fakesink") {
            return;
        }

        let depay = make_element("identity", "depay-audio").unwrap();
        let convert = make_element("identity", "convert-audio").unwrap();
        let sink = make_element("fakesink", "sink-audio").unwrap();
        let pipeline = gstreamer::Pipeline::with_name(PIPELINE_NAME);
        pipeline.add_many([&depay, &convert, &sink]).unwrap();

        link_chain("audio", &[&depay, &convert, &sink]).unwrap();
        assert!(depay.static_pad("src").unwrap().is_linked());
        assert!(convert.static_pad("src").unwrap().is_linked());
    }

    #[test]
    fn test_build_rejects_unlinkable_sink() {
        gstreamer::init().unwrap();
        if !FACTORIES.iter().all(|f| is_available(f)) || !is_available("fakesrc") {
            return;
        }

        let config = PlayerConfig {
            video_sink: "fakesrc".to_string(),
            ..test_config()
        };
        let result = PlayerPipeline::build("rtsp://127.0.0.1:8554/test", &config);
        assert!(matches!(result, Err(PlayerError::Link { chain: "video" })));
    }

    #[test]
    fn test_build_links_static_chains() {
        gstreamer::init().unwrap();
        if !FACTORIES.iter().all(|f| is_available(f)) {
            return;
        }

        let player = PlayerPipeline::build("rtsp://127.0.0.1:8554/test", &test_config()).unwrap();

        assert_eq!(player.pipeline().name().as_str(), PIPELINE_NAME);
        assert_eq!(
            player.source.property::<Option<String>>("location").as_deref(),
            Some("rtsp://127.0.0.1:8554/test")
        );
        assert_eq!(player.source.property::<u32>("latency"), 200);
        assert_eq!(player.pipeline().children().len(), 10);

        // Chains are linked internally, depayloaders wait for the source
        let video_depay_src = player.video.depay.static_pad("src").unwrap();
        assert!(video_depay_src.is_linked());
        let audio_resample_src = player.audio.resample.static_pad("src").unwrap();
        assert!(audio_resample_src.is_linked());
        assert!(!player.video.depay.static_pad("sink").unwrap().is_linked());
        assert!(!player.audio.depay.static_pad("sink").unwrap().is_linked());

        let _handlers = player.connect_depayloaders();
        let pipeline = player.into_pipeline();
        assert_eq!(pipeline.current_state(), gstreamer::State::Null);
    }
}

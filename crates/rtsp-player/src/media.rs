use crate::error::PlayerError;

/// Process-wide GStreamer initialization, released when dropped.
///
/// Create it once in `main`, after argument parsing, and keep it alive until
/// every pipeline has been torn down.
pub struct MediaSubsystem {
    _private: (),
}

impl MediaSubsystem {
    /// Initialize GStreamer.
    ///
    /// # Safety
    ///
    /// Dropping the guard calls [`gstreamer::deinit`]. All GStreamer objects
    /// created while it is held must be dropped before the guard, and
    /// GStreamer must not be used again in this process afterwards.
    pub unsafe fn acquire() -> Result<Self, PlayerError> {
        gstreamer::init()?;
        log::debug!("Initialized {}", gstreamer::version_string());
        Ok(Self { _private: () })
    }
}

impl Drop for MediaSubsystem {
    fn drop(&mut self) {
        log::debug!("Deinitializing GStreamer");
        // SAFETY: upheld by the contract of `acquire`.
        unsafe { gstreamer::deinit() };
    }
}

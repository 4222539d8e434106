use crate::error::PlayerError;

/// Create an element instance of type `factory` named `name`.
///
/// Fails with [`PlayerError::MissingElement`] when no such factory is
/// registered. There is no retry, a missing type means a plugin is not
/// installed.
pub fn make_element(factory: &str, name: &str) -> Result<gstreamer::Element, PlayerError> {
    gstreamer::ElementFactory::make(factory)
        .name(name)
        .build()
        .map_err(|_| {
            log::error!("Failed to create element '{}' of type '{}'", name, factory);
            PlayerError::MissingElement {
                factory: factory.to_string(),
                name: name.to_string(),
            }
        })
}

/// Whether an element type is registered
pub fn is_available(factory: &str) -> bool {
    gstreamer::ElementFactory::find(factory).is_some()
}

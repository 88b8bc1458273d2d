use std::path::PathBuf;

/// Socket paths of the storage-writer endpoints.
///
/// The writers themselves are external collaborators; all this layer
/// requires is that each path be an addressable stream endpoint accepting
/// one tagged message per connection. Injected at construction rather than
/// hard-coded so tests and non-standard deployments can relocate them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    /// USB mass-storage writer.
    pub mass_storage: PathBuf,
    /// Main SD-card writer.
    pub sd_card: PathBuf,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            mass_storage: PathBuf::from("/var/run/usb_mass.sock"),
            sd_card: PathBuf::from("/var/run/main_sd.sock"),
        }
    }
}

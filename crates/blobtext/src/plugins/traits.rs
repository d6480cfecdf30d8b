//! Base plugin trait definition.

use crate::Result;

/// Lifecycle and identity shared by every plugin.
///
/// # Thread Safety
///
/// Plugins are shared across worker threads and must be `Send + Sync`.
pub trait Plugin: Send + Sync {
    /// Unique kebab-case name, e.g. `"plain-text"`.
    fn name(&self) -> &str;

    fn version(&self) -> String;

    /// Called once when the plugin is registered.
    ///
    /// # Errors
    ///
    /// A failing plugin is not registered.
    fn initialize(&self) -> Result<()>;

    /// Called when the plugin is removed or the owning extractor shuts down.
    fn shutdown(&self) -> Result<()>;

    fn description(&self) -> &str {
        ""
    }
}

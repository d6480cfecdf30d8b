//! Format parser registration and lookup.
//!
//! Each extractor owns its registry; there is no process-wide instance. The
//! registry is filled before extraction starts and only read afterwards, so
//! it is shared behind an `Arc` without locking.

use crate::plugins::FormatParser;
use crate::{BlobtextError, Result};
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Validate a plugin name before registration.
///
/// # Rules
///
/// - Name cannot be empty
/// - Name cannot contain whitespace
fn validate_plugin_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(BlobtextError::validation("Plugin name cannot be empty"));
    }

    if name.contains(char::is_whitespace) {
        return Err(BlobtextError::validation(format!(
            "Plugin name '{}' cannot contain whitespace",
            name
        )));
    }

    Ok(())
}

/// Registry of format parsers keyed by MIME type and priority.
pub struct FormatParserRegistry {
    parsers: HashMap<String, BTreeMap<i32, Arc<dyn FormatParser>>>,
    name_index: IndexMap<String, (Arc<dyn FormatParser>, Vec<(String, i32)>)>,
}

impl FormatParserRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            parsers: HashMap::new(),
            name_index: IndexMap::new(),
        }
    }

    /// Create a registry holding every built-in parser enabled by crate features.
    pub fn with_defaults() -> Result<Self> {
        let mut registry = Self::new();
        crate::extractors::register_default_parsers(&mut registry)?;
        Ok(registry)
    }

    /// Register a parser for all MIME types it supports.
    ///
    /// Registering a name twice replaces the earlier parser.
    ///
    /// # Returns
    ///
    /// - `Ok(())` if registration succeeded
    /// - `Err(...)` if the name is invalid or initialization failed
    pub fn register(&mut self, parser: Arc<dyn FormatParser>) -> Result<()> {
        let name = parser.name().to_string();
        let priority = parser.priority();

        validate_plugin_name(&name)?;

        parser.initialize()?;

        if self.name_index.contains_key(&name) {
            self.remove(&name)?;
        }

        let mut index_entries = Vec::new();
        for mime_type in parser.supported_mime_types() {
            self.parsers
                .entry(mime_type.to_string())
                .or_default()
                .insert(priority, Arc::clone(&parser));
            index_entries.push((mime_type.to_string(), priority));
        }

        self.name_index.insert(name, (parser, index_entries));

        Ok(())
    }

    /// Get the highest priority parser for a MIME type.
    ///
    /// Exact registrations win over `type/*` wildcards.
    ///
    /// # Errors
    ///
    /// `BlobtextError::UnsupportedFormat` if nothing handles the type.
    pub fn get(&self, mime_type: &str) -> Result<Arc<dyn FormatParser>> {
        if let Some(priority_map) = self.parsers.get(mime_type)
            && let Some((_priority, parser)) = priority_map.iter().next_back()
        {
            return Ok(Arc::clone(parser));
        }

        let mut best_match: Option<(i32, Arc<dyn FormatParser>)> = None;

        for (registered_mime, priority_map) in &self.parsers {
            if let Some(prefix) = registered_mime.strip_suffix('*')
                && registered_mime.ends_with("/*")
                && mime_type.starts_with(prefix)
                && let Some((&priority, parser)) = priority_map.iter().next_back()
            {
                let better = best_match.as_ref().is_none_or(|(current, _)| priority > *current);
                if better {
                    best_match = Some((priority, Arc::clone(parser)));
                }
            }
        }

        if let Some((_priority, parser)) = best_match {
            return Ok(parser);
        }

        Err(BlobtextError::UnsupportedFormat(mime_type.to_string()))
    }

    /// Names of registered parsers in registration order.
    pub fn list(&self) -> Vec<String> {
        self.name_index.keys().cloned().collect()
    }

    /// Remove a parser, calling its `shutdown` first.
    pub fn remove(&mut self, name: &str) -> Result<()> {
        let Some((parser, index_entries)) = self.name_index.shift_remove(name) else {
            return Ok(());
        };

        for (mime_type, priority) in index_entries {
            if let Some(priority_map) = self.parsers.get_mut(&mime_type) {
                if priority_map
                    .get(&priority)
                    .is_some_and(|registered| Arc::ptr_eq(registered, &parser))
                {
                    priority_map.remove(&priority);
                }

                if priority_map.is_empty() {
                    self.parsers.remove(&mime_type);
                }
            }
        }

        parser.shutdown()
    }

    /// Shut down every registered parser, keeping them registered.
    ///
    /// All parsers are visited even if one fails; the first error is returned.
    pub fn shutdown_all(&self) -> Result<()> {
        let mut first_error = None;
        for (parser, _) in self.name_index.values() {
            if let Err(e) = parser.shutdown()
                && first_error.is_none()
            {
                first_error = Some(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl Default for FormatParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::ExtractionContext;
    use crate::plugins::Plugin;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockParser {
        name: &'static str,
        mime_types: &'static [&'static str],
        priority: i32,
        shutdowns: Arc<AtomicUsize>,
    }

    impl MockParser {
        fn new(name: &'static str, mime_types: &'static [&'static str], priority: i32) -> Self {
            Self {
                name,
                mime_types,
                priority,
                shutdowns: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl Plugin for MockParser {
        fn name(&self) -> &str {
            self.name
        }

        fn version(&self) -> String {
            "1.0.0".to_string()
        }

        fn initialize(&self) -> Result<()> {
            Ok(())
        }

        fn shutdown(&self) -> Result<()> {
            self.shutdowns.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    impl FormatParser for MockParser {
        fn parse(&self, _content: &[u8], _mime_type: &str, ctx: &mut ExtractionContext<'_>) -> Result<()> {
            ctx.out().push_str(self.name)
        }

        fn supported_mime_types(&self) -> &[&str] {
            self.mime_types
        }

        fn priority(&self) -> i32 {
            self.priority
        }
    }

    struct FailingInit;

    impl Plugin for FailingInit {
        fn name(&self) -> &str {
            "failing-init"
        }

        fn version(&self) -> String {
            "1.0.0".to_string()
        }

        fn initialize(&self) -> Result<()> {
            Err(BlobtextError::Plugin {
                message: "missing model".to_string(),
                plugin_name: "failing-init".to_string(),
            })
        }

        fn shutdown(&self) -> Result<()> {
            Ok(())
        }
    }

    impl FormatParser for FailingInit {
        fn parse(&self, _content: &[u8], _mime_type: &str, _ctx: &mut ExtractionContext<'_>) -> Result<()> {
            Ok(())
        }

        fn supported_mime_types(&self) -> &[&str] {
            &["text/plain"]
        }
    }

    #[test]
    fn test_priority_selection() {
        let mut registry = FormatParserRegistry::new();
        registry
            .register(Arc::new(MockParser::new("low", &["text/plain"], 10)))
            .unwrap();
        registry
            .register(Arc::new(MockParser::new("high", &["text/plain"], 90)))
            .unwrap();

        assert_eq!(registry.get("text/plain").unwrap().name(), "high");
    }

    #[test]
    fn test_wildcard_lookup() {
        let mut registry = FormatParserRegistry::new();
        registry
            .register(Arc::new(MockParser::new("any-image", &["image/*"], 50)))
            .unwrap();
        registry
            .register(Arc::new(MockParser::new("exact-svg", &["image/svg+xml"], 10)))
            .unwrap();

        assert_eq!(registry.get("image/png").unwrap().name(), "any-image");
        assert_eq!(registry.get("image/svg+xml").unwrap().name(), "exact-svg");
    }

    #[test]
    fn test_unsupported_mime() {
        let registry = FormatParserRegistry::new();
        let err = registry.get("application/octet-stream").err().unwrap();
        assert!(matches!(err, BlobtextError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_invalid_names_rejected() {
        let mut registry = FormatParserRegistry::new();
        assert!(registry.register(Arc::new(MockParser::new("", &["a/b"], 1))).is_err());
        assert!(
            registry
                .register(Arc::new(MockParser::new("has space", &["a/b"], 1)))
                .is_err()
        );
        assert!(registry.list().is_empty());
    }

    #[test]
    fn test_failed_initialize_not_registered() {
        let mut registry = FormatParserRegistry::new();
        assert!(registry.register(Arc::new(FailingInit)).is_err());
        assert!(registry.get("text/plain").is_err());
    }

    #[test]
    fn test_remove_calls_shutdown() {
        let mut registry = FormatParserRegistry::new();
        let parser = MockParser::new("removable", &["text/plain", "text/csv"], 50);
        let shutdowns = Arc::clone(&parser.shutdowns);
        registry.register(Arc::new(parser)).unwrap();

        registry.remove("removable").unwrap();
        assert_eq!(shutdowns.load(Ordering::SeqCst), 1);
        assert!(registry.get("text/csv").is_err());
        assert!(registry.list().is_empty());

        registry.remove("never-registered").unwrap();
    }

    #[test]
    fn test_reregister_replaces() {
        let mut registry = FormatParserRegistry::new();
        let first = MockParser::new("dup", &["text/plain"], 50);
        let first_shutdowns = Arc::clone(&first.shutdowns);
        registry.register(Arc::new(first)).unwrap();
        registry.register(Arc::new(MockParser::new("dup", &["text/csv"], 50))).unwrap();

        assert_eq!(first_shutdowns.load(Ordering::SeqCst), 1);
        assert!(registry.get("text/plain").is_err());
        assert_eq!(registry.list(), vec!["dup".to_string()]);
    }

    #[test]
    fn test_shutdown_all_keeps_registrations() {
        let mut registry = FormatParserRegistry::new();
        let parser = MockParser::new("kept", &["text/plain"], 50);
        let shutdowns = Arc::clone(&parser.shutdowns);
        registry.register(Arc::new(parser)).unwrap();

        registry.shutdown_all().unwrap();
        assert_eq!(shutdowns.load(Ordering::SeqCst), 1);
        assert_eq!(registry.list(), vec!["kept".to_string()]);
    }

    #[test]
    fn test_with_defaults_covers_plain_text() {
        let registry = FormatParserRegistry::with_defaults().unwrap();
        assert!(registry.get("text/plain").is_ok());
        assert!(registry.get("text/x-unknown-subtype").is_ok());
        assert!(registry.get("application/octet-stream").is_err());
    }
}

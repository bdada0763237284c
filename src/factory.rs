//! Custom span factories keyed by tag name.
//!
//! Built-in tags map onto the closed [`SpanKind`] set. Applications add their
//! own tags by registering a [`SpanFactory`]; the tag handler consults the
//! registry before its built-in rules.
//!
//! # Example
//!
//! ```
//! use htmlspan::factory::FactoryRegistry;
//! use htmlspan::model::{Attributes, CustomSpan, SpanKind};
//! use std::sync::Arc;
//!
//! let mut registry = FactoryRegistry::new();
//! registry.register(
//!     "spoiler",
//!     Arc::new(|tag: &str, attrs: &Attributes| {
//!         Some(SpanKind::Custom(CustomSpan::new(tag).with_attributes(attrs.clone())))
//!     }),
//! );
//! assert!(registry.contains("SPOILER"));
//! ```

use crate::model::{Attributes, SpanKind};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Creates the span for a registered tag.
///
/// Returning `None` declines the tag, which then gets the built-in treatment.
pub trait SpanFactory: Send + Sync {
    /// Build the span kind for a start tag.
    fn create(&self, tag: &str, attributes: &Attributes) -> Option<SpanKind>;
}

impl<F> SpanFactory for F
where
    F: Fn(&str, &Attributes) -> Option<SpanKind> + Send + Sync,
{
    fn create(&self, tag: &str, attributes: &Attributes) -> Option<SpanKind> {
        self(tag, attributes)
    }
}

/// Registry mapping lowercase tag names to factories.
#[derive(Clone, Default)]
pub struct FactoryRegistry {
    factories: HashMap<String, Arc<dyn SpanFactory>>,
}

impl FactoryRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory, replacing any previous one for the same tag.
    pub fn register(&mut self, tag: impl Into<String>, factory: Arc<dyn SpanFactory>) {
        let tag = tag.into().to_ascii_lowercase();
        if self.factories.insert(tag.clone(), factory).is_some() {
            log::debug!("replaced span factory for <{}>", tag);
        }
    }

    /// Remove the factory for a tag.
    pub fn unregister(&mut self, tag: &str) -> Option<Arc<dyn SpanFactory>> {
        self.factories.remove(&tag.to_ascii_lowercase())
    }

    /// Get the factory for a tag.
    pub fn get(&self, tag: &str) -> Option<&Arc<dyn SpanFactory>> {
        self.factories.get(&tag.to_ascii_lowercase())
    }

    /// Check if a tag has a factory.
    pub fn contains(&self, tag: &str) -> bool {
        self.factories.contains_key(&tag.to_ascii_lowercase())
    }

    /// Ask the registered factory (if any) for the tag's span.
    pub fn create(&self, tag: &str, attributes: &Attributes) -> Option<SpanKind> {
        self.get(tag).and_then(|f| f.create(tag, attributes))
    }

    /// Registered tag names, sorted.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.factories.keys().map(|s| s.as_str()).collect();
        tags.sort_unstable();
        tags
    }

    /// Number of registered factories.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Check if no factories are registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for FactoryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}

//! Conversion configuration.

use crate::error::{Error, Result};
use crate::factory::{FactoryRegistry, SpanFactory};
use std::sync::Arc;

/// Default list indent in device-independent units.
pub const DEFAULT_LIST_INDENT: f32 = 24.0;

/// Options shared by the tag handler and the span normalizer.
///
/// Built once by the caller and reused across conversions.
#[derive(Debug, Clone)]
pub struct Configuration {
    /// Indent added per list nesting level
    pub list_indent_width: f32,

    /// Strip trailing line breaks left behind by block elements
    pub trim_trailing_blank_lines: bool,

    /// How tables are presented
    pub table_mode: TableMode,

    /// Factories for application-defined tags
    pub factories: FactoryRegistry,
}

impl Configuration {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-level list indent.
    pub fn with_list_indent(mut self, width: f32) -> Self {
        self.list_indent_width = width;
        self
    }

    /// Enable or disable trailing blank-line trimming.
    pub fn with_trim_trailing_blank_lines(mut self, trim: bool) -> Self {
        self.trim_trailing_blank_lines = trim;
        self
    }

    /// Keep trailing blank lines as the converter produced them.
    pub fn keep_trailing_blank_lines(mut self) -> Self {
        self.trim_trailing_blank_lines = false;
        self
    }

    /// Set table mode.
    pub fn with_table_mode(mut self, mode: TableMode) -> Self {
        self.table_mode = mode;
        self
    }

    /// Collapse tables into a clickable link with the given text.
    pub fn with_table_link(mut self, text: impl Into<String>) -> Self {
        self.table_mode = TableMode::Link { text: text.into() };
        self
    }

    /// Register a factory for a custom tag.
    pub fn with_factory(
        mut self,
        tag: impl Into<String>,
        factory: impl SpanFactory + 'static,
    ) -> Self {
        self.factories.register(tag, Arc::new(factory));
        self
    }

    /// Check that the configuration can be used.
    pub fn validate(&self) -> Result<()> {
        if !self.list_indent_width.is_finite() {
            return Err(Error::InvalidConfiguration(format!(
                "list indent must be finite, got {}",
                self.list_indent_width
            )));
        }
        if self.list_indent_width < 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "list indent must not be negative, got {}",
                self.list_indent_width
            )));
        }
        if let TableMode::Link { text } = &self.table_mode {
            if text.trim().is_empty() {
                return Err(Error::InvalidConfiguration(
                    "table link text must not be empty".into(),
                ));
            }
        }
        Ok(())
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            list_indent_width: DEFAULT_LIST_INDENT,
            trim_trailing_blank_lines: true,
            table_mode: TableMode::Inline,
            factories: FactoryRegistry::new(),
        }
    }
}

/// How tables are presented.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TableMode {
    /// Lay out cells inline, one row per line
    #[default]
    Inline,
    /// Replace each table with a clickable link carrying its markup
    Link {
        /// Link text shown in place of the table
        text: String,
    },
}

//! POM header/footer templates
//!
//! Templates are handlebars text rendered in strict mode against
//! [`PomContext`]. Every template is test-rendered when parsed, so a
//! placeholder outside the context is rejected at config load time, never
//! in the middle of a run. Values are inserted verbatim (no HTML escaping).

use crate::{ConfigError, ConfigResult};
use handlebars::{no_escape, Handlebars};
use serde::Serialize;
use std::fmt;

/// Values available to header/footer templates
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PomContext<'a> {
    pub group_id: &'a str,
    pub artifact_id: &'a str,
    pub version: &'a str,
    pub name: &'a str,
    pub scope: &'a str,
}

const SAMPLE_CONTEXT: PomContext<'static> = PomContext {
    group_id: "com.example",
    artifact_id: "example",
    version: "1.0.0",
    name: "Example",
    scope: "compile",
};

/// Parsed template, registered under the config key it came from
#[derive(Debug, Clone)]
pub struct Template {
    field: String,
    source: String,
    registry: Handlebars<'static>,
}

impl Template {
    /// Parse a template; `field` names the config key in errors
    pub fn parse(field: &str, source: &str) -> ConfigResult<Self> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(no_escape);
        registry
            .register_template_string(field, source)
            .map_err(|e| ConfigError::invalid(field, e.to_string()))?;

        let template = Self {
            field: field.to_string(),
            source: source.to_string(),
            registry,
        };
        template.render(&SAMPLE_CONTEXT)?;
        Ok(template)
    }

    pub fn render(&self, context: &PomContext<'_>) -> ConfigResult<String> {
        self.registry
            .render(&self.field, context)
            .map_err(|e| ConfigError::invalid(self.field.as_str(), e.to_string()))
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl PartialEq for Template {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field && self.source == other.source
    }
}

impl Eq for Template {}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

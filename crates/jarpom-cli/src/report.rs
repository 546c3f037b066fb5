//! JSON report (`--json`)

use chrono::{SecondsFormat, Utc};
use jarpom_resolve::{DependencyRecord, Exclusion, Manifest, Scope};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Metadata {
    pub generated_at: String,
    pub jarpom_version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub metadata: Metadata,
    pub scope: Scope,
    pub dependencies: &'a [DependencyRecord],
    pub exclusions: &'a [Exclusion],
}

impl<'a> Report<'a> {
    pub fn new(manifest: &'a Manifest, scope: Scope, exclusions: &'a [Exclusion]) -> Self {
        Self {
            metadata: Metadata {
                generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
                jarpom_version: env!("CARGO_PKG_VERSION"),
            },
            scope,
            dependencies: &manifest.dependencies,
            exclusions,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

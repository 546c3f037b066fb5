//! jarpom artifact resolution engine
//!
//! Turns an ordered list of jar paths into a deduplicated dependency
//! manifest. Each jar's filename carries its short name and version; the
//! owning Maven group is looked up through a three-tier chain (prefix rules,
//! local repository, remote search) and duplicates are folded with a
//! priority-then-version policy.

pub mod artifact;
pub mod checksum;
pub mod engine;
pub mod identity;
pub mod manifest;
pub mod rules;
pub mod version;

pub use artifact::{ArtifactPath, ParsedArtifact};
pub use engine::{DedupEngine, Exclusion, ExclusionReason, ManifestState, ResolveOutcome};
pub use identity::{
    FixedInterval, GroupResolution, GroupResolver, IdentityResolver, LocalRepository,
    MavenCentralSearch, RateLimiter, SearchClientError, SearchService, Tier, Unthrottled,
};
pub use manifest::{DependencyRecord, Manifest, ManifestEntry, Scope};
pub use rules::{GroupRule, ResolutionRules, SuffixRule};
pub use version::VersionKey;

use std::path::PathBuf;

/// Resolution errors
///
/// Every variant is fatal for the run. Artifacts that merely cannot be
/// resolved are reported through [`Exclusion`] instead.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("Malformed artifact name: {path} (expected <name>-<version>.jar)")]
    MalformedArtifactName { path: PathBuf },

    #[error("Search service request failed for {path}: {source}")]
    TransportFailure {
        path: PathBuf,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid search response for {path}: {reason}")]
    InvalidSearchResponse { path: PathBuf, reason: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ResolveError {
    /// Create a malformed artifact name error
    pub fn malformed(path: impl Into<PathBuf>) -> Self {
        Self::MalformedArtifactName { path: path.into() }
    }

    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ResolveError>;

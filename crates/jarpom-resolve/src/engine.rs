//! Deduplication of jar paths into one manifest entry per short name
//!
//! Paths are folded strictly in input order through an explicit
//! [`ManifestState`]. A later path replaces an existing entry only when its
//! priority is at least the entry's priority *and* its version key is
//! greater. Entries whose group has a pinned version never change again.

use crate::artifact::ArtifactPath;
use crate::identity::{GroupResolution, GroupResolver};
use crate::manifest::{Manifest, ManifestEntry, Scope};
use crate::rules::ResolutionRules;
use crate::version::VersionKey;
use crate::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Why a path did not make it into the manifest
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ExclusionReason {
    /// No tier found a group for a new short name
    Unresolvable,
    /// A newer version was found but its group could not be resolved
    UpgradeUnresolved,
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionReason::Unresolvable => write!(f, "group id not found"),
            ExclusionReason::UpgradeUnresolved => {
                write!(f, "group id not found for newer version, kept previous entry")
            }
        }
    }
}

/// Non-fatal drop reported alongside the manifest
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Exclusion {
    pub short_name: String,
    pub path: PathBuf,
    pub reason: ExclusionReason,
}

/// Accumulator threaded through the fold
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManifestState {
    entries: BTreeMap<String, ManifestEntry>,
    exclusions: Vec<Exclusion>,
}

impl ManifestState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, short_name: &str) -> Option<&ManifestEntry> {
        self.entries.get(short_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn exclusions(&self) -> &[Exclusion] {
        &self.exclusions
    }

    pub fn into_outcome(self) -> ResolveOutcome {
        ResolveOutcome {
            entries: self.entries,
            exclusions: self.exclusions,
        }
    }

    fn exclude(&mut self, short_name: &str, path: &ArtifactPath, reason: ExclusionReason) {
        warn!(
            artifact = short_name,
            path = %path,
            "{} --> excluded from POM",
            reason
        );
        self.exclusions.push(Exclusion {
            short_name: short_name.to_string(),
            path: path.path().to_path_buf(),
            reason,
        });
    }
}

/// Final result of a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolveOutcome {
    /// Short name -> winning entry
    pub entries: BTreeMap<String, ManifestEntry>,
    pub exclusions: Vec<Exclusion>,
}

impl ResolveOutcome {
    pub fn manifest(&self, scope: Scope) -> Manifest {
        Manifest::assemble(&self.entries, scope)
    }
}

/// Folds jar paths into a manifest
pub struct DedupEngine<'r, R> {
    rules: &'r ResolutionRules,
    resolver: R,
}

impl<'r, R: GroupResolver> DedupEngine<'r, R> {
    pub fn new(rules: &'r ResolutionRules, resolver: R) -> Self {
        Self { rules, resolver }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Fold every path, in order
    pub fn resolve_all<I>(&mut self, paths: I) -> Result<ResolveOutcome>
    where
        I: IntoIterator,
        I::Item: Into<ArtifactPath>,
    {
        paths
            .into_iter()
            .try_fold(ManifestState::new(), |state, path| {
                let path: ArtifactPath = path.into();
                self.step(state, &path)
            })
            .map(ManifestState::into_outcome)
    }

    /// Fold a single path into the state
    pub fn step(&mut self, mut state: ManifestState, path: &ArtifactPath) -> Result<ManifestState> {
        let parsed = path.parse()?;
        let priority = self.rules.priority_of(path);
        let name = parsed.short_name.as_str();

        let Some(current) = state.entries.get(name) else {
            match self.resolver.resolve(&parsed, path)? {
                GroupResolution::Resolved { group, tier } => {
                    let entry = ManifestEntry {
                        priority,
                        artifact_id: self.rules.rewrite_suffix(name),
                        version: self.rules.pinned_version_or(&parsed.version, &group),
                        group_id: group,
                    };
                    info!(
                        artifact = name,
                        group = %entry.group_id,
                        version = %entry.version,
                        %tier,
                        "added"
                    );
                    state.entries.insert(name.to_string(), entry);
                }
                GroupResolution::Unresolved => {
                    state.exclude(name, path, ExclusionReason::Unresolvable);
                }
            }
            return Ok(state);
        };

        if self.rules.is_pinned(&current.group_id) {
            debug!(
                artifact = name,
                group = %current.group_id,
                "group is pinned, ignoring {}",
                path
            );
            return Ok(state);
        }

        if priority < current.priority {
            debug!(
                artifact = name,
                priority,
                current = current.priority,
                "lower priority, ignoring {}",
                path
            );
            return Ok(state);
        }

        if VersionKey::parse(&parsed.version) <= VersionKey::parse(&current.version) {
            debug!(
                artifact = name,
                version = %parsed.version,
                current = %current.version,
                "not newer, ignoring {}",
                path
            );
            return Ok(state);
        }

        match self.resolver.resolve(&parsed, path)? {
            GroupResolution::Resolved { group, tier } => {
                let version = self.rules.pinned_version_or(&parsed.version, &group);
                if let Some(entry) = state.entries.get_mut(name) {
                    info!(
                        artifact = name,
                        group = %group,
                        from = %entry.version,
                        to = %version,
                        %tier,
                        "upgraded"
                    );
                    entry.priority = priority;
                    entry.group_id = group;
                    entry.version = version;
                }
            }
            GroupResolution::Unresolved => {
                state.exclude(name, path, ExclusionReason::UpgradeUnresolved);
            }
        }

        Ok(state)
    }
}

//! Manifest entries and the sorted dependency list built from them

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Winning (group, artifact, version) for one short name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Priority class of the path that produced this entry
    pub priority: i64,
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl ManifestEntry {
    /// `group_id.artifact_id`, the manifest sort key
    pub fn coordinate(&self) -> String {
        format!("{}.{}", self.group_id, self.artifact_id)
    }
}

/// Maven dependency scope
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    #[default]
    Compile,
    Provided,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Compile => write!(f, "compile"),
            Scope::Provided => write!(f, "provided"),
        }
    }
}

/// One dependency as handed to rendering
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DependencyRecord {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub scope: Scope,
}

/// Dependencies sorted by `group_id.artifact_id`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Manifest {
    pub dependencies: Vec<DependencyRecord>,
}

impl Manifest {
    /// Sort entries and tag them all with `scope`
    pub fn assemble(entries: &BTreeMap<String, ManifestEntry>, scope: Scope) -> Self {
        let mut sorted: Vec<&ManifestEntry> = entries.values().collect();
        sorted.sort_by_cached_key(|entry| entry.coordinate());

        let dependencies = sorted
            .into_iter()
            .map(|entry| DependencyRecord {
                group_id: entry.group_id.clone(),
                artifact_id: entry.artifact_id.clone(),
                version: entry.version.clone(),
                scope,
            })
            .collect();

        Self { dependencies }
    }

    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DependencyRecord> {
        self.dependencies.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(group: &str, artifact: &str, version: &str) -> ManifestEntry {
        ManifestEntry {
            priority: 0,
            group_id: group.to_string(),
            artifact_id: artifact.to_string(),
            version: version.to_string(),
        }
    }

    #[test]
    fn test_assemble_sorts_by_coordinate() {
        let mut entries = BTreeMap::new();
        entries.insert(
            "zookeeper".to_string(),
            entry("org.apache.zookeeper", "zookeeper", "3.4.14"),
        );
        entries.insert("guava".to_string(), entry("com.google.guava", "guava", "14.0.1"));
        entries.insert("spark-sql".to_string(), entry("org.apache.spark", "spark-sql", "3.2.0"));
        entries.insert("spark-core".to_string(), entry("org.apache.spark", "spark-core", "3.2.0"));

        let manifest = Manifest::assemble(&entries, Scope::Provided);
        let order: Vec<&str> = manifest.iter().map(|d| d.artifact_id.as_str()).collect();

        assert_eq!(order, vec!["guava", "spark-core", "spark-sql", "zookeeper"]);
        assert!(manifest.iter().all(|d| d.scope == Scope::Provided));
    }

    #[test]
    fn test_sort_key_includes_separator() {
        // "a.b" + "." + "c" sorts against "a" + "." + "b-c" on the joined string
        let mut entries = BTreeMap::new();
        entries.insert("c".to_string(), entry("a.b", "c", "1"));
        entries.insert("b-c".to_string(), entry("a", "b-c", "1"));

        let manifest = Manifest::assemble(&entries, Scope::Compile);
        let groups: Vec<&str> = manifest.iter().map(|d| d.group_id.as_str()).collect();
        assert_eq!(groups, vec!["a", "a.b"]);
    }

    #[test]
    fn test_empty_manifest() {
        let manifest = Manifest::assemble(&BTreeMap::new(), Scope::Compile);
        assert!(manifest.is_empty());
        assert_eq!(manifest.len(), 0);
    }

    #[test]
    fn test_scope_serialization() {
        assert_eq!(serde_json::to_string(&Scope::Provided).unwrap(), "\"provided\"");
        assert_eq!(Scope::default(), Scope::Compile);
    }
}

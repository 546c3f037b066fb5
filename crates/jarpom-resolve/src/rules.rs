//! Static resolution rules: prefix groups, pinned versions, suffix rewrites
//! and source-directory priorities

use crate::artifact::ArtifactPath;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Short-name prefix that implies a group without any lookup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct GroupRule {
    pub prefix: String,
    pub group: String,
}

impl GroupRule {
    pub fn new(prefix: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            group: group.into(),
        }
    }
}

/// Literal artifact-id suffix replacement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SuffixRule {
    pub suffix: String,
    pub replacement: String,
}

impl SuffixRule {
    pub fn new(suffix: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            replacement: replacement.into(),
        }
    }
}

/// Group of the first rule whose prefix starts `short_name`
pub fn group_for_prefix<'r>(rules: &'r [GroupRule], short_name: &str) -> Option<&'r str> {
    rules
        .iter()
        .find(|rule| short_name.starts_with(&rule.prefix))
        .map(|rule| rule.group.as_str())
}

/// Rules consulted by the resolver and the dedup engine
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolutionRules {
    /// Prefix rules, checked in order
    pub group_rules: Vec<GroupRule>,
    /// Groups whose version is forced to a literal
    pub static_group_version: BTreeMap<String, String>,
    /// Suffix rewrites; only the first rule is ever applied
    pub artifact_suffix: Vec<SuffixRule>,
    /// Directory name -> priority class
    pub priorities: HashMap<String, i64>,
    /// Priority for paths under no listed directory
    pub default_priority: i64,
}

impl ResolutionRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group_rule(mut self, prefix: &str, group: &str) -> Self {
        self.group_rules.push(GroupRule::new(prefix, group));
        self
    }

    pub fn with_pinned_version(mut self, group: &str, version: &str) -> Self {
        self.static_group_version
            .insert(group.to_string(), version.to_string());
        self
    }

    pub fn with_suffix_rule(mut self, suffix: &str, replacement: &str) -> Self {
        self.artifact_suffix.push(SuffixRule::new(suffix, replacement));
        self
    }

    pub fn with_priority(mut self, directory: &str, priority: i64) -> Self {
        self.priorities.insert(directory.to_string(), priority);
        self
    }

    /// Group implied by the first matching prefix rule
    pub fn group_for_prefix(&self, short_name: &str) -> Option<&str> {
        group_for_prefix(&self.group_rules, short_name)
    }

    /// Whether entries in this group are frozen once created
    pub fn is_pinned(&self, group: &str) -> bool {
        self.static_group_version.contains_key(group)
    }

    /// Pinned version for the group, or the parsed one
    pub fn pinned_version_or(&self, version: &str, group: &str) -> String {
        self.static_group_version
            .get(group)
            .cloned()
            .unwrap_or_else(|| version.to_string())
    }

    /// Artifact id for a short name.
    ///
    /// Only the first configured rule is consulted. Later rules never apply,
    /// even when the first one does not match.
    pub fn rewrite_suffix(&self, short_name: &str) -> String {
        let Some(rule) = self.artifact_suffix.first() else {
            return short_name.to_string();
        };

        match short_name.strip_suffix(&rule.suffix) {
            Some(stem) if !rule.suffix.is_empty() => format!("{}{}", stem, rule.replacement),
            _ => short_name.to_string(),
        }
    }

    /// Priority class from the nearest directory listed in the table
    pub fn priority_of(&self, artifact: &ArtifactPath) -> i64 {
        artifact
            .directories()
            .find_map(|dir| self.priorities.get(dir).copied())
            .unwrap_or(self.default_priority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_for_prefix_first_match() {
        let rules = ResolutionRules::new()
            .with_group_rule("spark-", "org.apache.spark")
            .with_group_rule("hadoop-", "org.apache.hadoop");

        assert_eq!(rules.group_for_prefix("spark-core"), Some("org.apache.spark"));
        assert_eq!(rules.group_for_prefix("hadoop-common"), Some("org.apache.hadoop"));
        assert_eq!(rules.group_for_prefix("foo-spark-core"), None);
    }

    #[test]
    fn test_pinned_version() {
        let rules =
            ResolutionRules::new().with_pinned_version("org.apache.spark", "${spark.version}");

        assert!(rules.is_pinned("org.apache.spark"));
        assert_eq!(rules.pinned_version_or("3.2.0", "org.apache.spark"), "${spark.version}");
        assert_eq!(rules.pinned_version_or("1.0", "com.google.guava"), "1.0");
    }

    #[test]
    fn test_suffix_rewrite() {
        let rules = ResolutionRules::new().with_suffix_rule("_2.12", "_${scala.binary.version}");

        assert_eq!(
            rules.rewrite_suffix("zookeeper_2.12"),
            "zookeeper_${scala.binary.version}"
        );
        assert_eq!(rules.rewrite_suffix("zookeeper"), "zookeeper");
        // literal match, '.' is not a wildcard
        assert_eq!(rules.rewrite_suffix("zookeeper_2x12"), "zookeeper_2x12");
    }

    #[test]
    fn test_only_first_suffix_rule_applies() {
        let rules = ResolutionRules::new()
            .with_suffix_rule("_2.12", "_${scala.binary.version}")
            .with_suffix_rule("_2.13", "_${scala.binary.version}");

        assert_eq!(rules.rewrite_suffix("cats-core_2.13"), "cats-core_2.13");
    }

    #[test]
    fn test_priority_of_nearest_directory() {
        let rules = ResolutionRules::new()
            .with_priority("jars", 10)
            .with_priority("spark", 1);

        assert_eq!(rules.priority_of(&ArtifactPath::new("/opt/spark/jars/a-1.jar")), 10);
        assert_eq!(rules.priority_of(&ArtifactPath::new("/opt/spark/lib/a-1.jar")), 1);
        assert_eq!(rules.priority_of(&ArtifactPath::new("/tmp/a-1.jar")), 0);
    }
}

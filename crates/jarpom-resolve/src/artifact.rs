//! Jar paths and filename parsing

use crate::{ResolveError, Result};
use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static JAR_NAME: OnceLock<Regex> = OnceLock::new();

fn jar_name_pattern() -> &'static Regex {
    JAR_NAME.get_or_init(|| {
        Regex::new(r"^([\w\-\.]+?)-((?:\d+\.)*\d+(?:[-\.]\S+)?)\.jar$")
            .expect("jar name pattern is valid")
    })
}

/// Short name and version encoded in a jar filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedArtifact {
    pub short_name: String,
    pub version: String,
}

impl ParsedArtifact {
    /// Parse `<short-name>-<version>.jar`
    ///
    /// The name is the shortest prefix that leaves a valid version behind,
    /// so `spark-core_2.12-3.1.0.jar` yields `spark-core_2.12` and `3.1.0`.
    pub fn parse(filename: &str) -> Result<Self> {
        let captures = jar_name_pattern()
            .captures(filename)
            .ok_or_else(|| ResolveError::malformed(filename))?;

        Ok(Self {
            short_name: captures[1].to_string(),
            version: captures[2].to_string(),
        })
    }
}

/// A jar path from the input list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactPath {
    path: PathBuf,
}

impl ArtifactPath {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Final path segment, if it is valid UTF-8
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|name| name.to_str())
    }

    /// Directory segments, nearest to the file first
    pub fn directories(&self) -> impl Iterator<Item = &str> {
        self.path
            .parent()
            .into_iter()
            .flat_map(|parent| parent.iter().rev())
            .filter_map(|segment| segment.to_str())
    }

    /// Parse the filename; errors carry the full path
    pub fn parse(&self) -> Result<ParsedArtifact> {
        let file_name = self
            .file_name()
            .ok_or_else(|| ResolveError::malformed(&self.path))?;

        ParsedArtifact::parse(file_name).map_err(|_| ResolveError::malformed(&self.path))
    }
}

impl From<&str> for ArtifactPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<PathBuf> for ArtifactPath {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}

impl fmt::Display for ArtifactPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("spark-core-3.2.0.jar", "spark-core", "3.2.0")]
    #[case("foo-spark-core-3.1.0.jar", "foo-spark-core", "3.1.0")]
    #[case("zookeeper_2.12-3.4.14.jar", "zookeeper_2.12", "3.4.14")]
    #[case("guava-14.0.1.jar", "guava", "14.0.1")]
    #[case("jersey-client-2.30-SNAPSHOT.jar", "jersey-client", "2.30-SNAPSHOT")]
    #[case("netty-all-4.1.68.Final.jar", "netty-all", "4.1.68.Final")]
    #[case("jline-2.jar", "jline", "2")]
    #[case("javax.inject-1.jar", "javax.inject", "1")]
    fn test_parse_filename(#[case] filename: &str, #[case] name: &str, #[case] version: &str) {
        let parsed = ParsedArtifact::parse(filename).unwrap();
        assert_eq!(parsed.short_name, name);
        assert_eq!(parsed.version, version);
    }

    #[rstest]
    #[case("spark-core.jar")]
    #[case("spark-core-3.2.0.zip")]
    #[case("3.2.0.jar")]
    #[case("spark core-3.2.0.jar")]
    #[case("")]
    fn test_parse_malformed(#[case] filename: &str) {
        let err = ParsedArtifact::parse(filename).unwrap_err();
        assert!(matches!(err, ResolveError::MalformedArtifactName { .. }));
    }

    #[test]
    fn test_artifact_path_error_names_full_path() {
        let artifact = ArtifactPath::new("/opt/spark/jars/not-a-jar.txt");
        let err = artifact.parse().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Malformed artifact name: /opt/spark/jars/not-a-jar.txt (expected <name>-<version>.jar)"
        );
    }

    #[test]
    fn test_directories_nearest_first() {
        let artifact = ArtifactPath::new("/opt/spark/jars/guava-14.0.1.jar");
        let dirs: Vec<&str> = artifact.directories().collect();
        assert_eq!(dirs, vec!["jars", "spark", "opt", "/"]);
    }
}

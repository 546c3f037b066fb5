use crate::checksum;
use crate::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Local Maven repository laid out as `<group path>/<artifact>/<version>/<file>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalRepository {
    root: PathBuf,
}

impl LocalRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `~/.m2/repository`, if a home directory exists
    pub fn default_location() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".m2").join("repository"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Group of the first same-named file whose SHA-1 matches
    ///
    /// Files are visited in sorted order. A missing root or an unreadable
    /// candidate is not an error.
    pub fn find_group(&self, file_name: &str, sha1: &str) -> Result<Option<String>> {
        self.find_group_with(file_name, sha1, checksum::sha1_file)
    }

    fn find_group_with<H>(&self, file_name: &str, sha1: &str, hash: H) -> Result<Option<String>>
    where
        H: Fn(&Path) -> Result<String>,
    {
        if !self.root.is_dir() {
            debug!(root = %self.root.display(), "local repository not found, skipping");
            return Ok(None);
        }

        let candidates = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    trace!(error = %e, "skipping unreadable repository entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file() && entry.file_name() == file_name);

        for candidate in candidates {
            let candidate_sha1 = match hash(candidate.path()) {
                Ok(digest) => digest,
                Err(e) => {
                    debug!(error = %e, "skipping unreadable repository file");
                    continue;
                }
            };
            if candidate_sha1 != sha1 {
                continue;
            }
            if let Some(group) = self.group_of(candidate.path()) {
                return Ok(Some(group));
            }
        }

        Ok(None)
    }

    /// Segments between the root and `<artifact>/<version>/<file>`, dot-joined
    fn group_of(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let segments = relative
            .iter()
            .map(|segment| segment.to_str())
            .collect::<Option<Vec<_>>>()?;

        if segments.len() < 4 {
            return None;
        }

        Some(segments[..segments.len() - 3].join("."))
    }
}

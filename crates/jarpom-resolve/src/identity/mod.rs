//! Group identity resolution
//!
//! A jar's Maven group is found by trying, in order:
//! 1. prefix rules (no I/O)
//! 2. the local Maven repository, matched by SHA-1
//! 3. the remote search service, queried by SHA-1 behind a rate limiter
//!
//! The first tier that answers wins. Tiers that find nothing fall through;
//! only failures of the remote transport abort resolution.

mod local_repo;
mod search;
mod throttle;

pub use local_repo::LocalRepository;
pub use search::{parse_search_response, MavenCentralSearch, SearchClientError, SearchService};
pub use throttle::{FixedInterval, RateLimiter, Unthrottled};

use crate::artifact::{ArtifactPath, ParsedArtifact};
use crate::checksum;
use crate::rules::{self, GroupRule};
use crate::Result;
use std::fmt;
use tracing::debug;

/// Tier that produced a group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Prefix,
    LocalRepository,
    RemoteSearch,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Prefix => write!(f, "prefix rule"),
            Tier::LocalRepository => write!(f, "local repository"),
            Tier::RemoteSearch => write!(f, "remote search"),
        }
    }
}

/// Outcome of a group lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupResolution {
    Resolved { group: String, tier: Tier },
    Unresolved,
}

impl GroupResolution {
    pub fn resolved(group: impl Into<String>, tier: Tier) -> Self {
        Self::Resolved {
            group: group.into(),
            tier,
        }
    }

}

/// Anything that can find the owning group of a jar
pub trait GroupResolver {
    fn resolve(
        &mut self,
        artifact: &ParsedArtifact,
        path: &ArtifactPath,
    ) -> Result<GroupResolution>;
}

/// Three-tier resolver: prefix rules, local repository, remote search
pub struct IdentityResolver<'r> {
    group_rules: &'r [GroupRule],
    local: Option<LocalRepository>,
    search: Option<Box<dyn SearchService>>,
    limiter: Box<dyn RateLimiter>,
}

impl<'r> IdentityResolver<'r> {
    /// Resolver with only prefix rules enabled
    pub fn new(group_rules: &'r [GroupRule]) -> Self {
        Self {
            group_rules,
            local: None,
            search: None,
            limiter: Box::new(Unthrottled),
        }
    }

    pub fn with_local_repository(mut self, local: LocalRepository) -> Self {
        self.local = Some(local);
        self
    }

    pub fn with_search(
        mut self,
        search: impl SearchService + 'static,
        limiter: impl RateLimiter + 'static,
    ) -> Self {
        self.search = Some(Box::new(search));
        self.limiter = Box::new(limiter);
        self
    }
}

impl GroupResolver for IdentityResolver<'_> {
    fn resolve(
        &mut self,
        artifact: &ParsedArtifact,
        path: &ArtifactPath,
    ) -> Result<GroupResolution> {
        if let Some(group) = rules::group_for_prefix(self.group_rules, &artifact.short_name) {
            debug!(artifact = %artifact.short_name, group, "group from prefix rule");
            return Ok(GroupResolution::resolved(group, Tier::Prefix));
        }

        if self.local.is_none() && self.search.is_none() {
            return Ok(GroupResolution::Unresolved);
        }

        // Shared by both remaining tiers
        let sha1 = checksum::sha1_file(path.path())?;

        if let (Some(local), Some(file_name)) = (&self.local, path.file_name()) {
            if let Some(group) = local.find_group(file_name, &sha1)? {
                debug!(artifact = %artifact.short_name, %group, "group from local repository");
                return Ok(GroupResolution::resolved(group, Tier::LocalRepository));
            }
        }

        if let Some(search) = &self.search {
            self.limiter.acquire();
            if let Some(group) = search.find_group(&sha1, path.path())? {
                debug!(artifact = %artifact.short_name, %group, "group from remote search");
                return Ok(GroupResolution::resolved(group, Tier::RemoteSearch));
            }
        }

        Ok(GroupResolution::Unresolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ResolveError;
    use std::cell::RefCell;
    use std::fs;
    use std::path::Path;
    use std::rc::Rc;
    use tempfile::TempDir;

    /// Search fake answering from a fixed table, recording every query
    struct FakeSearch {
        answer: Option<String>,
        queries: Rc<RefCell<Vec<String>>>,
    }

    impl SearchService for FakeSearch {
        fn find_group(&self, sha1: &str, _path: &Path) -> Result<Option<String>> {
            self.queries.borrow_mut().push(sha1.to_string());
            Ok(self.answer.clone())
        }
    }

    struct FailingSearch;

    impl SearchService for FailingSearch {
        fn find_group(&self, _sha1: &str, path: &Path) -> Result<Option<String>> {
            Err(ResolveError::InvalidSearchResponse {
                path: path.to_path_buf(),
                reason: "boom".to_string(),
            })
        }
    }

    struct CountingLimiter(Rc<RefCell<usize>>);

    impl RateLimiter for CountingLimiter {
        fn acquire(&mut self) {
            *self.0.borrow_mut() += 1;
        }
    }

    fn fake_search(answer: Option<&str>) -> (FakeSearch, Rc<RefCell<Vec<String>>>) {
        let queries = Rc::new(RefCell::new(Vec::new()));
        let search = FakeSearch {
            answer: answer.map(str::to_string),
            queries: Rc::clone(&queries),
        };
        (search, queries)
    }

    fn write_jar(dir: &Path, name: &str, content: &str) -> ArtifactPath {
        fs::create_dir_all(dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        ArtifactPath::new(path)
    }

    #[test]
    fn test_prefix_rule_needs_no_file() {
        let rules = [GroupRule::new("spark-", "org.apache.spark")];
        let mut resolver = IdentityResolver::new(&rules);
        let path = ArtifactPath::new("/does/not/exist/spark-core-3.2.0.jar");
        let parsed = path.parse().unwrap();

        let resolution = resolver.resolve(&parsed, &path).unwrap();
        assert_eq!(
            resolution,
            GroupResolution::resolved("org.apache.spark", Tier::Prefix)
        );
    }

    #[test]
    fn test_no_tiers_left_is_unresolved() {
        let mut resolver = IdentityResolver::new(&[]);
        let path = ArtifactPath::new("/does/not/exist/guava-14.0.1.jar");
        let parsed = path.parse().unwrap();

        assert_eq!(
            resolver.resolve(&parsed, &path).unwrap(),
            GroupResolution::Unresolved
        );
    }

    #[test]
    fn test_local_repository_short_circuits_search() {
        let temp_dir = TempDir::new().unwrap();
        let repo = temp_dir.path().join("repository");
        write_jar(&repo.join("com/google/guava/guava/14.0.1"), "guava-14.0.1.jar", "guava");
        let jar = write_jar(&temp_dir.path().join("jars"), "guava-14.0.1.jar", "guava");

        let (search, queries) = fake_search(Some("wrong.group"));
        let mut resolver = IdentityResolver::new(&[])
            .with_local_repository(LocalRepository::new(&repo))
            .with_search(search, Unthrottled);

        let resolution = resolver.resolve(&jar.parse().unwrap(), &jar).unwrap();
        assert_eq!(
            resolution,
            GroupResolution::resolved("com.google.guava", Tier::LocalRepository)
        );
        assert!(queries.borrow().is_empty());
    }

    #[test]
    fn test_falls_through_to_search_with_sha1() {
        let temp_dir = TempDir::new().unwrap();
        let repo = temp_dir.path().join("repository");
        write_jar(&repo.join("com/google/guava/guava/14.0.1"), "guava-14.0.1.jar", "other");
        let jar = write_jar(&temp_dir.path().join("jars"), "guava-14.0.1.jar", "abc");

        let (search, queries) = fake_search(Some("com.google.guava"));
        let calls = Rc::new(RefCell::new(0));
        let mut resolver = IdentityResolver::new(&[])
            .with_local_repository(LocalRepository::new(&repo))
            .with_search(search, CountingLimiter(Rc::clone(&calls)));

        let resolution = resolver.resolve(&jar.parse().unwrap(), &jar).unwrap();
        assert_eq!(
            resolution,
            GroupResolution::resolved("com.google.guava", Tier::RemoteSearch)
        );
        assert_eq!(
            *queries.borrow(),
            vec!["a9993e364706816aba3e25717850c26c9cd0d89d".to_string()]
        );
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn test_empty_search_result_is_unresolved() {
        let temp_dir = TempDir::new().unwrap();
        let jar = write_jar(temp_dir.path(), "mystery-1.0.jar", "???");

        let (search, _) = fake_search(None);
        let mut resolver = IdentityResolver::new(&[]).with_search(search, Unthrottled);

        assert_eq!(
            resolver.resolve(&jar.parse().unwrap(), &jar).unwrap(),
            GroupResolution::Unresolved
        );
    }

    #[test]
    fn test_search_failure_propagates() {
        let temp_dir = TempDir::new().unwrap();
        let jar = write_jar(temp_dir.path(), "mystery-1.0.jar", "???");

        let mut resolver = IdentityResolver::new(&[]).with_search(FailingSearch, Unthrottled);

        let err = resolver.resolve(&jar.parse().unwrap(), &jar).unwrap_err();
        assert!(matches!(err, ResolveError::InvalidSearchResponse { .. }));
    }
}

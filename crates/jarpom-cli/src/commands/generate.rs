//! Generate command: jar list -> POM

use crate::render;
use crate::report::Report;
use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use jarpom_config::{ConfigLoader, Settings};
use jarpom_resolve::{
    ArtifactPath, DedupEngine, FixedInterval, IdentityResolver, LocalRepository,
    MavenCentralSearch, ManifestState, Scope,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Arguments for the generate command
#[derive(Debug, Clone)]
pub struct GenerateArgs {
    pub input_file: PathBuf,
    pub provided: bool,
    /// Complete POM destination; `None` prints only the dependency block
    pub output_file: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub offline: bool,
    pub json: bool,
    pub quiet: bool,
}

/// Run the generate command
pub fn run(args: GenerateArgs) -> Result<()> {
    let jars = read_jar_list(&args.input_file)?;

    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    let loaded = ConfigLoader::new()
        .load(args.config.as_deref(), &cwd)
        .context("Failed to load configuration")?;
    for source in &loaded.sources {
        debug!("Using config {}", source.display());
    }

    let mut settings = loaded.settings;
    if args.offline {
        settings.search.enabled = false;
    }

    let resolver = build_resolver(&settings)?;
    let mut engine = DedupEngine::new(&settings.rules, resolver);

    let spinner = if args.quiet {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.green} {msg}")
                .context("Invalid progress template")?,
        );
        pb.enable_steady_tick(Duration::from_millis(80));
        Some(pb)
    };

    let total = jars.len();
    let mut state = ManifestState::new();
    for (index, jar) in jars.iter().enumerate() {
        if let Some(ref pb) = spinner {
            pb.set_message(format!("[{}/{}] {}", index + 1, total, jar));
        }
        let path = ArtifactPath::new(jar);
        state = match engine.step(state, &path) {
            Ok(state) => state,
            Err(e) => {
                if let Some(ref pb) = spinner {
                    pb.finish_and_clear();
                }
                return Err(e).with_context(|| format!("Failed to resolve {}", jar));
            }
        };
    }
    if let Some(ref pb) = spinner {
        pb.finish_and_clear();
    }

    let outcome = state.into_outcome();
    let scope = if args.provided {
        Scope::Provided
    } else {
        Scope::Compile
    };
    let manifest = outcome.manifest(scope);
    info!(
        dependencies = manifest.len(),
        excluded = outcome.exclusions.len(),
        "resolved {} jar paths",
        total
    );

    let text = if args.json {
        let mut json = Report::new(&manifest, scope, &outcome.exclusions)
            .to_json()
            .context("Failed to serialize report")?;
        json.push('\n');
        json
    } else if args.output_file.is_some() {
        render::document(&settings.pom, &manifest, scope)?
    } else {
        format!("{}\n", render::dependency_block(&manifest))
    };

    match &args.output_file {
        Some(path) => {
            fs::write(path, text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            if !args.quiet {
                eprintln!(
                    "Wrote {} dependencies to {} ({} excluded)",
                    manifest.len(),
                    path.display(),
                    outcome.exclusions.len()
                );
            }
        }
        None => print!("{}", text),
    }

    Ok(())
}

/// Non-blank, trimmed lines of the input file
fn read_jar_list(path: &Path) -> Result<Vec<String>> {
    if !path.is_file() {
        bail!("Input file not found: {}", path.display());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file {}", path.display()))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Identity resolver with the tiers enabled by `settings`
fn build_resolver(settings: &Settings) -> Result<IdentityResolver<'_>> {
    let mut resolver = IdentityResolver::new(&settings.rules.group_rules);

    if let Some(root) = &settings.local_repository {
        if root.is_dir() {
            resolver = resolver.with_local_repository(LocalRepository::new(root));
        } else {
            debug!("Local repository {} not found, skipping", root.display());
        }
    }

    if settings.search.enabled {
        let search = MavenCentralSearch::new(&settings.search.url, settings.search.timeout())
            .context("Failed to set up search client")?;
        resolver = resolver.with_search(search, FixedInterval::new(settings.search.interval()));
    } else {
        debug!("Search service disabled");
    }

    Ok(resolver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_jar_list_skips_blank_lines() {
        let temp_dir = TempDir::new().unwrap();
        let list = temp_dir.path().join("jars.txt");
        fs::write(&list, "libA/spark-core-3.1.0.jar\n\n   \n  libB/guava-14.0.1.jar  \n").unwrap();

        assert_eq!(
            read_jar_list(&list).unwrap(),
            vec!["libA/spark-core-3.1.0.jar", "libB/guava-14.0.1.jar"]
        );
    }

    #[test]
    fn test_read_jar_list_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope.txt");

        let err = read_jar_list(&missing).unwrap_err();
        assert!(err.to_string().contains("nope.txt"));
    }

    #[test]
    fn test_build_resolver_offline_without_repository() {
        let mut settings = Settings::default();
        settings.local_repository = None;
        settings.search.enabled = false;
        assert!(build_resolver(&settings).is_ok());
    }
}

//! Effective settings after all configuration layers are applied

use crate::file::ConfigFile;
use crate::template::{PomContext, Template};
use crate::ConfigResult;
use jarpom_resolve::{LocalRepository, MavenCentralSearch, ResolutionRules, Scope};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Remote search service settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    pub url: String,
    pub timeout_secs: u64,
    /// Minimum spacing between two queries
    pub interval_ms: u64,
    pub enabled: bool,
}

impl SearchSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            url: MavenCentralSearch::DEFAULT_URL.to_string(),
            timeout_secs: 30,
            interval_ms: 1000,
            enabled: true,
        }
    }
}

/// Coordinates and templates of the generated POM
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PomSettings {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub name: String,
    /// Custom header; `None` uses the built-in one for the scope
    pub header: Option<Template>,
    /// Custom footer; `None` uses the built-in one for the scope
    pub footer: Option<Template>,
}

impl PomSettings {
    pub fn context<'a>(&'a self, scope: &'a str) -> PomContext<'a> {
        PomContext {
            group_id: &self.group_id,
            artifact_id: &self.artifact_id,
            version: &self.version,
            name: &self.name,
            scope,
        }
    }

    /// Rendered header for a scope
    pub fn render_header(&self, scope: Scope) -> ConfigResult<String> {
        let scope_name = scope.to_string();
        let context = self.context(&scope_name);
        match &self.header {
            Some(template) => template.render(&context),
            None => Template::parse("pom.header", &default_header(scope))?.render(&context),
        }
    }

    /// Rendered footer for a scope
    pub fn render_footer(&self, scope: Scope) -> ConfigResult<String> {
        let scope_name = scope.to_string();
        let context = self.context(&scope_name);
        match &self.footer {
            Some(template) => template.render(&context),
            None => Template::parse("pom.footer", &default_footer(scope))?.render(&context),
        }
    }
}

impl Default for PomSettings {
    fn default() -> Self {
        Self {
            group_id: "com.example".to_string(),
            artifact_id: "spark-parent".to_string(),
            version: "1.0.0".to_string(),
            name: "Spark parent".to_string(),
            header: None,
            footer: None,
        }
    }
}

const PROJECT_OPEN: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="http://maven.apache.org/POM/4.0.0 http://maven.apache.org/xsd/maven-4.0.0.xsd">
   <modelVersion>4.0.0</modelVersion>
   <groupId>{{group_id}}</groupId>
   <artifactId>{{artifact_id}}</artifactId>
   <version>{{version}}</version>
   <packaging>pom</packaging>
   <name>{{name}}</name>"#;

/// Built-in header; provided dependencies go under `<dependencyManagement>`
pub fn default_header(scope: Scope) -> String {
    match scope {
        Scope::Compile => format!("{}\n   <dependencies>", PROJECT_OPEN),
        Scope::Provided => format!(
            "{}\n   <dependencyManagement>\n      <dependencies>",
            PROJECT_OPEN
        ),
    }
}

/// Built-in footer matching [`default_header`]
pub fn default_footer(scope: Scope) -> String {
    match scope {
        Scope::Compile => "   </dependencies>\n</project>".to_string(),
        Scope::Provided => {
            "      </dependencies>\n   </dependencyManagement>\n</project>".to_string()
        }
    }
}

/// Fully layered settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub rules: ResolutionRules,
    /// `None` disables the local repository tier
    pub local_repository: Option<PathBuf>,
    pub search: SearchSettings,
    pub pom: PomSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rules: ResolutionRules::new()
                .with_group_rule("spark-", "org.apache.spark")
                .with_group_rule("hadoop-", "org.apache.hadoop"),
            local_repository: LocalRepository::default_location(),
            search: SearchSettings::default(),
            pom: PomSettings::default(),
        }
    }
}

impl Settings {
    /// Overlay a config file; whatever the file sets replaces the current value
    pub fn apply(&mut self, file: ConfigFile) -> ConfigResult<()> {
        if let Some(path) = file.local_repository {
            self.local_repository = Some(expand_home(&path));
        }
        if let Some(priority) = file.default_priority {
            self.rules.default_priority = priority;
        }
        if let Some(rules) = file.group_rules {
            self.rules.group_rules = rules;
        }
        if let Some(pins) = file.static_group_version {
            self.rules.static_group_version = pins;
        }
        if let Some(suffixes) = file.artifact_suffix {
            self.rules.artifact_suffix = suffixes;
        }
        if let Some(priorities) = file.priorities {
            self.rules.priorities = priorities;
        }

        if let Some(search) = file.search {
            if let Some(url) = search.url {
                self.search.url = url;
            }
            if let Some(timeout) = search.timeout_secs {
                self.search.timeout_secs = timeout;
            }
            if let Some(interval) = search.interval_ms {
                self.search.interval_ms = interval;
            }
            if let Some(enabled) = search.enabled {
                self.search.enabled = enabled;
            }
        }

        if let Some(pom) = file.pom {
            if let Some(group_id) = pom.group_id {
                self.pom.group_id = group_id;
            }
            if let Some(artifact_id) = pom.artifact_id {
                self.pom.artifact_id = artifact_id;
            }
            if let Some(version) = pom.version {
                self.pom.version = version;
            }
            if let Some(name) = pom.name {
                self.pom.name = name;
            }
            if let Some(header) = pom.header {
                self.pom.header = Some(Template::parse("pom.header", &header)?);
            }
            if let Some(footer) = pom.footer {
                self.pom.footer = Some(Template::parse("pom.footer", &footer)?);
            }
        }

        Ok(())
    }
}

/// Expand a leading `~/` to the home directory
pub fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(
            settings.rules.group_for_prefix("spark-core"),
            Some("org.apache.spark")
        );
        assert_eq!(
            settings.rules.group_for_prefix("hadoop-common"),
            Some("org.apache.hadoop")
        );
        assert!(settings.search.enabled);
        assert_eq!(settings.search.interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_apply_replaces_lists() {
        let file = ConfigFile::from_str(
            r#"
[[group_rules]]
prefix = "kafka-"
group = "org.apache.kafka"
"#,
        )
        .unwrap();

        let mut settings = Settings::default();
        settings.apply(file).unwrap();

        assert_eq!(settings.rules.group_for_prefix("spark-core"), None);
        assert_eq!(
            settings.rules.group_for_prefix("kafka-clients"),
            Some("org.apache.kafka")
        );
    }

    #[test]
    fn test_apply_keeps_unset_values() {
        let file = ConfigFile::from_str("[search]\nenabled = false\n").unwrap();

        let mut settings = Settings::default();
        settings.apply(file).unwrap();

        assert!(!settings.search.enabled);
        assert_eq!(settings.search.url, MavenCentralSearch::DEFAULT_URL);
        assert_eq!(settings.rules.group_rules.len(), 2);
    }

    #[test]
    fn test_default_header_compile() {
        let pom = PomSettings::default();
        let header = pom.render_header(Scope::Compile).unwrap();
        assert!(header.contains("<groupId>com.example</groupId>"));
        assert!(header.ends_with("\n   <dependencies>"));
        assert_eq!(
            pom.render_footer(Scope::Compile).unwrap(),
            "   </dependencies>\n</project>"
        );
    }

    #[test]
    fn test_default_header_provided() {
        let pom = PomSettings::default();
        let header = pom.render_header(Scope::Provided).unwrap();
        assert!(header.ends_with("   <dependencyManagement>\n      <dependencies>"));
        assert!(pom
            .render_footer(Scope::Provided)
            .unwrap()
            .starts_with("      </dependencies>"));
    }

    #[test]
    fn test_custom_header_sees_scope() {
        let mut pom = PomSettings::default();
        pom.header = Some(Template::parse("pom.header", "<!-- {{scope}} -->").unwrap());
        assert_eq!(pom.render_header(Scope::Provided).unwrap(), "<!-- provided -->");
    }
}

//! POM text output

use anyhow::{Context, Result};
use jarpom_config::PomSettings;
use jarpom_resolve::{DependencyRecord, Manifest, Scope};

/// One `<dependency>` element, indented for its scope
fn render_dependency(dep: &DependencyRecord) -> String {
    match dep.scope {
        Scope::Compile => format!(
            "      <dependency>\n         <groupId>{}</groupId>\n         <artifactId>{}</artifactId>\n         <version>{}</version>\n      </dependency>",
            dep.group_id, dep.artifact_id, dep.version
        ),
        Scope::Provided => format!(
            "         <dependency>\n            <groupId>{}</groupId>\n            <artifactId>{}</artifactId>\n            <version>{}</version>\n            <scope>provided</scope>\n         </dependency>",
            dep.group_id, dep.artifact_id, dep.version
        ),
    }
}

/// Dependency elements joined by newlines, without a trailing newline
pub fn dependency_block(manifest: &Manifest) -> String {
    manifest
        .iter()
        .map(render_dependency)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Header, dependency block and footer, one per line
pub fn document(pom: &PomSettings, manifest: &Manifest, scope: Scope) -> Result<String> {
    let header = pom
        .render_header(scope)
        .context("Failed to render POM header")?;
    let footer = pom
        .render_footer(scope)
        .context("Failed to render POM footer")?;

    Ok(format!(
        "{}\n{}\n{}\n",
        header,
        dependency_block(manifest),
        footer
    ))
}

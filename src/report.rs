use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::metrics::ComprehensiveAnalysis;
use crate::models::release::ReleaseNote;

/// Raw release-notes dump, one section per release in list order.
pub fn release_notes_markdown(releases: &[ReleaseNote]) -> String {
    let sections: Vec<String> = releases
        .iter()
        .map(|release| {
            let contributor_count = release.contributors.len();
            let reaction_count: u32 = release.reactions.iter().map(|r| r.total_count).sum();

            let mut section = format!(
                "# {}\n\n",
                release.name.as_deref().unwrap_or(&release.tag_name)
            );
            let _ = writeln!(section, "**Tag:** {}", release.tag_name);
            let _ = writeln!(
                section,
                "**Created:** {}",
                release.created_at.format("%-m/%-d/%Y")
            );
            let _ = writeln!(section, "**URL:** {}", release.url);
            let _ = writeln!(section, "**Contributors:** {}", contributor_count);
            let _ = writeln!(section, "**Reactions:** {}\n", reaction_count);
            let _ = writeln!(
                section,
                "{}\n",
                release.body.as_deref().unwrap_or("No description provided.")
            );
            section.push_str("---\n");
            section
        })
        .collect();

    sections.join("\n")
}

/// Writes all report files for one repository under the output directory,
/// named `{owner}-{repo}-{kind}.{ext}`.
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn write_release_notes(
        &self,
        owner: &str,
        repo: &str,
        releases: &[ReleaseNote],
    ) -> Result<()> {
        fs::create_dir_all(&self.output_dir)?;

        let json_path = self.path(owner, repo, "releases", "json");
        fs::write(&json_path, serde_json::to_string_pretty(releases)?)?;

        let md_path = self.path(owner, repo, "releases", "md");
        fs::write(&md_path, release_notes_markdown(releases))?;

        tracing::info!(
            "Release notes saved to:\n- {}\n- {}",
            json_path.display(),
            md_path.display()
        );
        Ok(())
    }

    pub fn write_feature_story(&self, owner: &str, repo: &str, markdown: &str) -> Result<()> {
        self.write_markdown(owner, repo, "feature-story", markdown)
    }

    pub fn write_ratings(&self, owner: &str, repo: &str, markdown: &str) -> Result<()> {
        self.write_markdown(owner, repo, "ratings", markdown)
    }

    pub fn write_analysis(
        &self,
        owner: &str,
        repo: &str,
        analysis: &ComprehensiveAnalysis,
    ) -> Result<()> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.path(owner, repo, "analysis", "json");
        fs::write(&path, serde_json::to_string_pretty(analysis)?)?;
        tracing::info!("Comprehensive analysis saved to: {}", path.display());
        Ok(())
    }

    fn write_markdown(&self, owner: &str, repo: &str, kind: &str, markdown: &str) -> Result<()> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.path(owner, repo, kind, "md");
        fs::write(&path, markdown)?;
        tracing::info!("{} saved to: {}", kind, path.display());
        Ok(())
    }

    fn path(&self, owner: &str, repo: &str, kind: &str, ext: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}-{}-{}.{}", owner, repo, kind, ext))
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

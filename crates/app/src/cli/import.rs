//! Postman import and export subcommands.

use std::path::PathBuf;

use anyhow::Context;
use tracing::info;
use wirepad_application::ports::ProjectStore;
use wirepad_infrastructure::{
    ExportOptions, ImportConfig, ImportFormat, PostmanExporter, PostmanImporter,
};

use super::store;
use crate::render;

/// Import a Postman collection or environment
#[derive(Debug, clap::Args)]
pub struct Import {
    /// Postman collection (v2.0/v2.1) or environment JSON file
    pub source: PathBuf,

    /// Project file to write
    #[arg(short, long)]
    pub output: PathBuf,

    /// Add the imported sections to an existing project instead of replacing it
    #[arg(long)]
    pub append: bool,

    /// Only show what would be imported
    #[arg(long)]
    pub preview: bool,

    /// Folder depth after which folders are flattened
    #[arg(long, default_value_t = ImportConfig::default().max_depth)]
    pub max_depth: usize,

    /// Fail instead of importing when an item produces an error entry
    #[arg(long)]
    pub strict: bool,
}

impl Import {
    pub(super) async fn run(self) -> anyhow::Result<()> {
        let importer = PostmanImporter::with_config(ImportConfig {
            max_depth: self.max_depth,
            skip_on_error: !self.strict,
            ..ImportConfig::default()
        });
        let content = importer
            .read_file(&self.source)
            .await
            .with_context(|| format!("Failed to read {}", self.source.display()))?;

        if self.preview {
            let preview = importer.preview(&content)?;
            println!(
                "{} '{}': {} requests, {} sections, {} variables ({})",
                preview.format,
                preview.name,
                preview.request_count,
                preview.section_count,
                preview.variable_count,
                preview.stats
            );
            print!("{}", render::warnings(&preview.warnings));
            return Ok(());
        }

        let report = importer.import(&content)?;
        let store = store();
        let project = if self.append {
            let mut existing = store
                .load(&self.output)
                .await
                .with_context(|| format!("Failed to open {}", self.output.display()))?;
            existing.sections.extend(report.project.sections);
            existing
        } else {
            if self.output.exists() {
                info!(path = %self.output.display(), "replacing existing project file");
            }
            report.project
        };
        store.save(&project, &self.output).await?;

        println!(
            "Imported into '{}' ({} requests, {} sections): {}",
            project.label,
            project.request_count(),
            project.section_count(),
            report.stats
        );
        print!("{}", render::warnings(&report.warnings));
        Ok(())
    }
}

/// Export a project as a Postman v2.1 collection
#[derive(Debug, clap::Args)]
pub struct Export {
    /// Project file
    pub file: PathBuf,

    /// Collection file to write
    #[arg(short, long)]
    pub output: PathBuf,

    /// Write compact JSON
    #[arg(long)]
    pub compact: bool,
}

impl Export {
    pub(super) async fn run(self) -> anyhow::Result<()> {
        let project = store()
            .load(&self.file)
            .await
            .with_context(|| format!("Failed to open {}", self.file.display()))?;
        let report = PostmanExporter::export(
            &project,
            &ExportOptions {
                pretty_print: !self.compact,
            },
        )?;

        tokio::fs::write(&self.output, report.content.as_bytes())
            .await
            .with_context(|| format!("Failed to write {}", self.output.display()))?;

        println!(
            "Exported '{}' as {} to {}: {}",
            project.label,
            ImportFormat::PostmanCollectionV21,
            self.output.display(),
            report.stats
        );
        print!("{}", render::warnings(&report.warnings));
        Ok(())
    }
}

//! Per-archive license resolution: registry search, then POM, then the JAR itself.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use crate::analyzer::jar::resolve_from_archive;
use crate::identity::extract_identity;
use crate::license::archiver::LicenseArchive;
use crate::license::heuristic::LicenseMatcher;
use crate::models::{license_display, ArchiveIdentity, LicenseSource, ResultRow};
use crate::registry::maven::resolve_from_descriptor;
use crate::registry::search::resolve_namespace;
use crate::registry::MavenCentral;

/// Drives the fallback chain for every JAR of a directory, one at a time.
pub struct Inspector {
    central: MavenCentral,
    archive: LicenseArchive,
    matcher: Box<dyn LicenseMatcher>,
}

impl Inspector {
    /// `matcher` reads license designations out of archive text; see
    /// [`PatternMatcher`](crate::license::heuristic::PatternMatcher).
    pub fn new(
        central: MavenCentral,
        archive: LicenseArchive,
        matcher: Box<dyn LicenseMatcher>,
    ) -> Self {
        Self {
            central,
            archive,
            matcher,
        }
    }

    /// Resolve every `<name>-<version>.jar` in `dir`.
    ///
    /// Files that do not follow the naming convention are skipped. Only a
    /// failure to list the directory is an error; every listed archive gets
    /// exactly one row.
    pub async fn inspect_directory(&self, dir: &Path, quiet: bool) -> Result<Vec<ResultRow>> {
        let filenames = jar_file_names(dir)?;

        let pb = if quiet {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new(filenames.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template(
                        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                    )?
                    .progress_chars("#>-"),
            );
            pb
        };

        let mut rows = Vec::new();
        for filename in filenames {
            pb.inc(1);
            let Some(id) = extract_identity(&filename) else {
                debug!(%filename, "not a versioned jar name, skipping");
                continue;
            };

            pb.set_message(id.to_string());
            let row = self.inspect(&filename, &id).await;

            let outcome = match row.source {
                LicenseSource::Descriptor => "license found in POM".green(),
                LicenseSource::Archive => "license found in JAR".yellow(),
                LicenseSource::None => "no license found".red(),
            };
            progress_line(
                &pb,
                quiet,
                format!("  {} {} {}", "→".cyan(), id, outcome),
            );
            for path in self.archive.take_written() {
                progress_line(
                    &pb,
                    quiet,
                    format!("    File was written in: {}", path.display()),
                );
            }

            rows.push(row);
        }

        pb.finish_and_clear();
        Ok(rows)
    }

    /// Resolve a single archive. Never fails: an unresolved license is
    /// reported with the sentinel.
    pub async fn inspect(&self, filename: &str, id: &ArchiveIdentity) -> ResultRow {
        let group_id = resolve_namespace(&self.central, id)
            .await
            .found("registry search");
        if group_id.is_none() {
            debug!(%id, "no groupId, descriptor and archive are skipped");
        }
        let group_id = group_id.as_deref();

        let descriptor = resolve_from_descriptor(&self.central, &self.archive, group_id, id)
            .await
            .found("descriptor")
            .filter(|names| !names.is_empty());

        let (licenses, source) = match descriptor {
            Some(names) => (names, LicenseSource::Descriptor),
            None => {
                let from_jar = resolve_from_archive(
                    &self.central,
                    &self.archive,
                    self.matcher.as_ref(),
                    group_id,
                    id,
                )
                .await
                .found("archive")
                .filter(|names| !names.is_empty());

                match from_jar {
                    Some(names) => (names, LicenseSource::Archive),
                    None => (Vec::new(), LicenseSource::None),
                }
            }
        };

        debug!(%id, %source, "license resolved");

        ResultRow {
            archive: filename.to_string(),
            artifact: id.name.clone(),
            version: id.version.clone(),
            license: license_display(&licenses),
            source,
        }
    }
}

/// Names of the `*.jar` entries of `dir`, sorted for a stable report.
pub fn jar_file_names(dir: &Path) -> Result<Vec<String>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to read directory {}", dir.display()))?;
        if let Some(name) = entry.file_name().to_str() {
            if name.ends_with(".jar") {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

fn progress_line(pb: &ProgressBar, quiet: bool, line: String) {
    if quiet {
        return;
    }
    if pb.is_hidden() {
        eprintln!("{line}");
    } else {
        pb.println(line);
    }
}

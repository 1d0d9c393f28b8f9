use serde::{Deserialize, Serialize};

/// Display value used whenever no license could be resolved.
pub const NO_LICENSE_FOUND: &str = "!!! No Licence Found !!!";

/// Artifact coordinates recovered from a `<name>-<version>.jar` filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveIdentity {
    pub name: String,
    pub version: String,
}

impl ArchiveIdentity {
    /// `<name>-<version>`, the key used for text found inside the archive.
    pub fn key(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }
}

impl std::fmt::Display for ArchiveIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.name, self.version)
    }
}

/// One line of the final report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub archive: String,
    pub artifact: String,
    pub version: String,
    pub license: String,
    pub source: LicenseSource,
}

/// Where the license of a row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseSource {
    Descriptor,
    Archive,
    None,
}

impl std::fmt::Display for LicenseSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LicenseSource::Descriptor => write!(f, "descriptor"),
            LicenseSource::Archive => write!(f, "archive"),
            LicenseSource::None => write!(f, "none"),
        }
    }
}

/// Outcome of asking one source for a piece of data.
///
/// `Missing` means the source answered and had nothing; `Failed` means the
/// source could not be read at all. Callers fall back on both, but only the
/// latter is worth a warning.
#[derive(Debug)]
pub enum Lookup<T> {
    Found(T),
    Missing,
    Failed(anyhow::Error),
}

impl<T> Lookup<T> {
    /// Collapse into an `Option`, logging a failure with `what` as context.
    pub fn found(self, what: &str) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::Missing => {
                tracing::debug!(source = what, "nothing found");
                None
            }
            Lookup::Failed(err) => {
                tracing::warn!(source = what, error = %format!("{err:#}"), "lookup failed");
                None
            }
        }
    }
}

/// Join license names for display, substituting the sentinel for an empty list.
pub fn license_display(licenses: &[String]) -> String {
    if licenses.is_empty() {
        NO_LICENSE_FOUND.to_string()
    } else {
        licenses.join(", ")
    }
}

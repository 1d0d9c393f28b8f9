use std::io::{Cursor, Read};

use anyhow::{Context, Result};
use zip::result::ZipError;
use zip::ZipArchive;

use crate::license::archiver::LicenseArchive;
use crate::license::heuristic::{license_file_display, LicenseMatcher};
use crate::models::{ArchiveIdentity, Lookup, NO_LICENSE_FOUND};
use crate::registry::MavenCentral;

const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

/// License-bearing text found inside a JAR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JarLicenseText {
    /// First entry whose path contains `LICENSE` (any case).
    LicenseFile { path: String, text: String },
    /// No license file, but a manifest.
    Manifest(String),
}

/// Download the published JAR and derive a license from its contents.
///
/// A license file wins over the manifest. The license file is saved under
/// `<name>-<version>`; a URL found in the manifest is downloaded and saved
/// under the artifact name.
pub async fn resolve_from_archive(
    central: &MavenCentral,
    archive: &LicenseArchive,
    matcher: &dyn LicenseMatcher,
    group_id: Option<&str>,
    id: &ArchiveIdentity,
) -> Lookup<Vec<String>> {
    let Some(group_id) = group_id else {
        return Lookup::Missing;
    };

    let jar_url = central.artifact_url(group_id, id, "jar");
    let fetched = match central.fetcher().get(&jar_url).await {
        Ok(fetched) => fetched,
        Err(err) => return Lookup::Failed(err.into()),
    };

    let found = match read_license_text(&fetched.body)
        .with_context(|| format!("Unreadable archive at {jar_url}"))
    {
        Ok(found) => found,
        Err(err) => return Lookup::Failed(err),
    };

    match found {
        Some(JarLicenseText::LicenseFile { path, text }) => {
            tracing::debug!(%id, entry = %path, "license file in archive");
            archive.record(&id.key(), &text);
            Lookup::Found(vec![license_file_display(matcher, &text)])
        }
        Some(JarLicenseText::Manifest(text)) => match matcher.manifest_license(&text) {
            Some(manifest) => {
                archive
                    .capture_url(central.fetcher(), &id.name, &manifest.value)
                    .await;
                Lookup::Found(vec![manifest.display()])
            }
            None => Lookup::Found(vec![NO_LICENSE_FOUND.to_string()]),
        },
        None => Lookup::Missing,
    }
}

/// Scan the entry names of a JAR in listing order for license text.
///
/// Only the chosen entry is decompressed.
pub fn read_license_text(bytes: &[u8]) -> Result<Option<JarLicenseText>> {
    let mut jar = ZipArchive::new(Cursor::new(bytes))?;

    let license_entry = (0..jar.len()).find(|&index| {
        jar.name_for_index(index)
            .is_some_and(|name| !name.ends_with('/') && name.to_uppercase().contains("LICENSE"))
    });
    if let Some(index) = license_entry {
        let mut entry = jar.by_index(index)?;
        let path = entry.name().to_string();
        let text = read_lossy(&mut entry)?;
        return Ok(Some(JarLicenseText::LicenseFile { path, text }));
    }

    let manifest = match jar.by_name(MANIFEST_PATH) {
        Ok(mut entry) => Some(JarLicenseText::Manifest(read_lossy(&mut entry)?)),
        Err(ZipError::FileNotFound) => None,
        Err(err) => return Err(err.into()),
    };
    Ok(manifest)
}

fn read_lossy(entry: &mut impl Read) -> std::io::Result<String> {
    let mut raw = Vec::new();
    entry.read_to_end(&mut raw)?;
    Ok(String::from_utf8_lossy(&raw).into_owned())
}

//! Maven Central access: namespace search and POM license lookup.
//!
//! - [`search`] maps an artifact name and version to its groupId.
//! - [`maven`] reads `<licenses>` from the published POM.
//!
//! Both return a [`Lookup`](crate::models::Lookup) so callers can tell an
//! unreachable registry apart from an artifact that simply declares nothing.

pub mod maven;
pub mod search;

use crate::fetch::Fetcher;
use crate::models::ArchiveIdentity;

pub const DEFAULT_SEARCH_URL: &str = "https://search.maven.org/solrsearch/select";
pub const DEFAULT_REPOSITORY_URL: &str = "https://repo1.maven.org/maven2";

/// Endpoints of a Maven-layout registry plus the fetcher used to reach them.
#[derive(Debug, Clone)]
pub struct MavenCentral {
    fetcher: Fetcher,
    search_url: String,
    repository_url: String,
}

impl MavenCentral {
    pub fn new(
        fetcher: Fetcher,
        search_url: impl Into<String>,
        repository_url: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            search_url: search_url.into(),
            repository_url: repository_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    pub fn search_url(&self) -> &str {
        &self.search_url
    }

    /// `<repo>/<group/path>/<name>/<version>/<name>-<version>.<extension>`
    pub fn artifact_url(&self, group_id: &str, id: &ArchiveIdentity, extension: &str) -> String {
        let group_path = group_id.replace('.', "/");
        format!(
            "{}/{}/{}/{}/{}-{}.{}",
            self.repository_url, group_path, id.name, id.version, id.name, id.version, extension
        )
    }
}

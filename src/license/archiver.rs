use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use anyhow::{Context, Result};
use regex::Regex;
use tracing::{debug, info, warn};

use crate::fetch::Fetcher;

fn url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"(?i)^(?:http|ftp)s?://",
            r"(?:(?:[A-Z0-9](?:[A-Z0-9-]*[A-Z0-9])?\.)+(?:[A-Z]{2,6}\.?|[A-Z0-9-]{2,}\.?)",
            r"|localhost",
            r"|\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}",
            r"|\[?[A-F0-9]*:[A-F0-9:]+\]?)",
            r"(?::\d+)?",
            r"(?:/?|[/?]\S+)$",
        ))
        .expect("valid url regex")
    })
}

/// Whether `candidate` looks like an absolute http(s)/ftp(s) URL worth fetching.
pub fn is_valid_url(candidate: &str) -> bool {
    url_re().is_match(candidate.trim())
}

/// Folder of `<key>.licence` files holding license texts seen during a run.
///
/// Clones share the list of files written by [`record`](Self::record).
#[derive(Debug, Clone)]
pub struct LicenseArchive {
    dir: PathBuf,
    written: Arc<Mutex<Vec<PathBuf>>>,
}

impl LicenseArchive {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Arc::default(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file written for `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.licence"))
    }

    /// Write `content` followed by a generation timestamp, replacing any
    /// earlier file for the same key.
    pub fn store(&self, key: &str, content: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;

        let path = self.path_for(key);
        let generated = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let body = format!("{content}\n\nGenerated: {generated}\n");
        std::fs::write(&path, body)
            .with_context(|| format!("Failed to write license text to {}", path.display()))?;

        Ok(path)
    }

    /// [`store`](Self::store), logging the outcome instead of returning an error.
    pub fn record(&self, key: &str, content: &str) -> Option<PathBuf> {
        match self.store(key, content) {
            Ok(path) => {
                info!(path = %path.display(), "license text written");
                self.written
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .push(path.clone());
                Some(path)
            }
            Err(err) => {
                warn!(key, error = %format!("{err:#}"), "could not save license text");
                None
            }
        }
    }

    /// Files recorded since the last call, oldest first.
    pub fn take_written(&self) -> Vec<PathBuf> {
        std::mem::take(
            &mut *self
                .written
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        )
    }

    /// Download the text behind `url` and record it under `key`.
    ///
    /// Strings that do not look like a URL are ignored without a request.
    pub async fn capture_url(&self, fetcher: &Fetcher, key: &str, url: &str) -> Option<PathBuf> {
        if !is_valid_url(url) {
            debug!(key, url, "not a fetchable license url");
            return None;
        }

        match fetcher.get(url.trim()).await {
            Ok(fetched) => self.record(key, &fetched.text()),
            Err(err) => {
                warn!(key, error = %err, "license text unavailable");
                None
            }
        }
    }
}

use anyhow::Context;
use reqwest::Url;
use serde::Deserialize;

use super::MavenCentral;
use crate::models::{ArchiveIdentity, Lookup};

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    response: SearchBody,
}

#[derive(Debug, Default, Deserialize)]
struct SearchBody {
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

#[derive(Debug, Deserialize)]
struct SearchDoc {
    g: Option<String>,
}

/// Find the groupId of an exact artifact name + version on the search endpoint.
pub async fn resolve_namespace(central: &MavenCentral, id: &ArchiveIdentity) -> Lookup<String> {
    let query = format!("a:{} AND v:{}", id.name, id.version);
    let url = match Url::parse_with_params(
        central.search_url(),
        &[("q", query.as_str()), ("rows", "1"), ("wt", "json")],
    ) {
        Ok(url) => url,
        Err(err) => return Lookup::Failed(anyhow::Error::new(err).context("invalid search url")),
    };

    let fetched = match central.fetcher().get(url.as_str()).await {
        Ok(fetched) => fetched,
        Err(err) => return Lookup::Failed(err.into()),
    };

    let parsed = match fetched
        .json::<SearchResponse>()
        .with_context(|| format!("Unexpected search response for {id}"))
    {
        Ok(parsed) => parsed,
        Err(err) => return Lookup::Failed(err),
    };

    match parsed.response.docs.into_iter().next().and_then(|doc| doc.g) {
        Some(group) if !group.is_empty() => Lookup::Found(group),
        _ => Lookup::Missing,
    }
}

use anyhow::{bail, Context, Result};
use quick_xml::events::Event;
use quick_xml::Reader;

use super::MavenCentral;
use crate::license::archiver::LicenseArchive;
use crate::models::{ArchiveIdentity, Lookup};

/// License declarations of a POM.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PomLicenses {
    /// Every `<licenses><license><name>` in document order.
    pub names: Vec<String>,
    /// The first `<licenses><license><url>`.
    pub url: Option<String>,
}

/// Read the license names declared in the artifact's POM.
///
/// A declared license URL is downloaded into `archive` under the artifact
/// name on the way; that download never affects the returned lookup.
pub async fn resolve_from_descriptor(
    central: &MavenCentral,
    archive: &LicenseArchive,
    group_id: Option<&str>,
    id: &ArchiveIdentity,
) -> Lookup<Vec<String>> {
    let Some(group_id) = group_id else {
        return Lookup::Missing;
    };

    let pom_url = central.artifact_url(group_id, id, "pom");
    let fetched = match central.fetcher().get(&pom_url).await {
        Ok(fetched) => fetched,
        Err(err) => return Lookup::Failed(err.into()),
    };

    let pom = match extract_licenses_from_pom(&fetched.text())
        .with_context(|| format!("Malformed POM at {pom_url}"))
    {
        Ok(pom) => pom,
        Err(err) => return Lookup::Failed(err),
    };

    if let Some(url) = &pom.url {
        archive.capture_url(central.fetcher(), &id.name, url).await;
    }

    if pom.names.is_empty() {
        Lookup::Missing
    } else {
        Lookup::Found(pom.names)
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Capture {
    Name,
    Url,
}

/// Collect `licenses/license/{name,url}` from a POM.
///
/// Elements are matched on their local name, so the POM namespace (or any
/// prefix bound to it) is ignored. A body that is not a complete `<project>`
/// document is an error.
pub fn extract_licenses_from_pom(xml: &str) -> Result<PomLicenses> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut stack: Vec<String> = Vec::new();
    let mut capture: Option<Capture> = None;
    let mut text = String::new();
    let mut found = PomLicenses::default();
    let mut root: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                let tag = String::from_utf8_lossy(e.name().local_name().as_ref()).into_owned();
                root.get_or_insert_with(|| tag.clone());
                stack.push(tag);
                capture = match stack_tail(&stack) {
                    ["licenses", "license", "name"] => Some(Capture::Name),
                    ["licenses", "license", "url"] => Some(Capture::Url),
                    _ => None,
                };
                text.clear();
            }
            Event::Text(ref e) if capture.is_some() => {
                text.push_str(&e.unescape()?);
            }
            Event::CData(ref e) if capture.is_some() => {
                text.push_str(&String::from_utf8_lossy(e));
            }
            Event::End(_) => {
                match capture.take() {
                    Some(Capture::Name) if !text.trim().is_empty() => {
                        found.names.push(text.trim().to_string());
                    }
                    Some(Capture::Url) if found.url.is_none() && !text.trim().is_empty() => {
                        found.url = Some(text.trim().to_string());
                    }
                    _ => {}
                }
                stack.pop();
            }
            Event::Empty(ref e) => {
                root.get_or_insert_with(|| {
                    String::from_utf8_lossy(e.name().local_name().as_ref()).into_owned()
                });
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    match root.as_deref() {
        None => bail!("no root element"),
        Some("project") => {}
        Some(other) => bail!("root element is <{other}>, expected <project>"),
    }
    if let Some(open) = stack.last() {
        bail!("document ends inside <{open}>");
    }

    Ok(found)
}

fn stack_tail(stack: &[String]) -> [&str; 3] {
    match stack {
        [.., a, b, c] => [a.as_str(), b.as_str(), c.as_str()],
        _ => ["", "", ""],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::tests::quick_policy;
    use crate::fetch::Fetcher;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_extract_license_from_pom() {
        let pom = r#"<?xml version="1.0"?>
<project>
  <licenses>
    <license>
      <name>Apache License, Version 2.0</name>
      <url>https://www.apache.org/licenses/LICENSE-2.0</url>
    </license>
  </licenses>
</project>"#;
        let found = extract_licenses_from_pom(pom).unwrap();
        assert_eq!(found.names, vec!["Apache License, Version 2.0".to_string()]);
        assert_eq!(
            found.url.as_deref(),
            Some("https://www.apache.org/licenses/LICENSE-2.0")
        );
    }

    #[test]
    fn test_extract_multiple_licenses_with_namespace() {
        let pom = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0"
         xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <name>not a license</name>
  <licenses>
    <license>
      <name>Eclipse Public License - v 2.0</name>
      <url>https://www.eclipse.org/legal/epl-2.0/</url>
    </license>
    <license>
      <name>GNU General Public License, version 2 with the GNU Classpath Exception</name>
      <url>https://www.gnu.org/software/classpath/license.html</url>
    </license>
  </licenses>
</project>"#;
        let found = extract_licenses_from_pom(pom).unwrap();
        assert_eq!(
            found.names,
            vec![
                "Eclipse Public License - v 2.0".to_string(),
                "GNU General Public License, version 2 with the GNU Classpath Exception"
                    .to_string(),
            ]
        );
        assert_eq!(
            found.url.as_deref(),
            Some("https://www.eclipse.org/legal/epl-2.0/")
        );
    }

    #[test]
    fn test_extract_prefixed_elements_and_entities() {
        let pom = r#"<pom:project xmlns:pom="http://maven.apache.org/POM/4.0.0">
  <pom:licenses><pom:license><pom:name>BSD &amp; MIT</pom:name></pom:license></pom:licenses>
</pom:project>"#;
        let found = extract_licenses_from_pom(pom).unwrap();
        assert_eq!(found.names, vec!["BSD & MIT".to_string()]);
        assert_eq!(found.url, None);
    }

    #[test]
    fn test_extract_without_licenses() {
        let pom = "<project><developers><developer><name>Jane</name></developer></developers></project>";
        assert_eq!(extract_licenses_from_pom(pom).unwrap(), PomLicenses::default());
    }

    #[test]
    fn test_extract_malformed_pom() {
        let pom = "<project><licenses><license><name>MIT</license></licenses></project>";
        assert!(extract_licenses_from_pom(pom).is_err());
    }

    #[test]
    fn test_extract_truncated_pom() {
        let pom = "<project><licenses><license><name>MIT</name></license>";
        let err = extract_licenses_from_pom(pom).unwrap_err();
        assert!(err.to_string().contains("<licenses>"));
    }

    #[test]
    fn test_extract_rejects_bodies_that_are_not_a_pom() {
        assert!(extract_licenses_from_pom("this is not xml at all").is_err());
        assert!(extract_licenses_from_pom("").is_err());
        assert!(
            extract_licenses_from_pom("<html><body>Service Unavailable</body></html>").is_err()
        );
        assert_eq!(
            extract_licenses_from_pom("<project/>").unwrap(),
            PomLicenses::default()
        );
    }

    fn identity() -> ArchiveIdentity {
        ArchiveIdentity {
            name: "foo".to_string(),
            version: "1.2.3".to_string(),
        }
    }

    fn central(server: &MockServer) -> MavenCentral {
        MavenCentral::new(
            Fetcher::new(quick_policy()).unwrap(),
            format!("{}/solrsearch/select", server.uri()),
            format!("{}/maven2", server.uri()),
        )
    }

    #[tokio::test]
    async fn test_resolve_from_descriptor_saves_license_url() {
        let server = MockServer::start().await;
        let pom = format!(
            "<project><licenses><license><name>MIT</name><url>{}/mit.txt</url></license></licenses></project>",
            server.uri()
        );
        Mock::given(method("GET"))
            .and(path("/maven2/com/example/foo/1.2.3/foo-1.2.3.pom"))
            .respond_with(ResponseTemplate::new(200).set_body_string(pom))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/mit.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("MIT License text"))
            .expect(1)
            .mount(&server)
            .await;

        let tmp = TempDir::new().unwrap();
        let archive = LicenseArchive::new(tmp.path());
        let lookup =
            resolve_from_descriptor(&central(&server), &archive, Some("com.example"), &identity())
                .await;

        assert!(matches!(lookup, Lookup::Found(ref names) if names == &["MIT".to_string()]));
        let saved = std::fs::read_to_string(archive.path_for("foo")).unwrap();
        assert!(saved.starts_with("MIT License text\n\n"));
    }

    #[tokio::test]
    async fn test_resolve_from_descriptor_without_group_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let tmp = TempDir::new().unwrap();
        let archive = LicenseArchive::new(tmp.path());
        let lookup = resolve_from_descriptor(&central(&server), &archive, None, &identity()).await;
        assert!(matches!(lookup, Lookup::Missing));
    }

    #[tokio::test]
    async fn test_resolve_from_descriptor_malformed_is_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<project><licenses></project>"))
            .mount(&server)
            .await;

        let tmp = TempDir::new().unwrap();
        let archive = LicenseArchive::new(tmp.path());
        let lookup =
            resolve_from_descriptor(&central(&server), &archive, Some("com.example"), &identity())
                .await;
        assert!(matches!(lookup, Lookup::Failed(_)));
    }

    #[tokio::test]
    async fn test_resolve_from_descriptor_error_page_is_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("Service Unavailable"))
            .expect(1)
            .mount(&server)
            .await;

        let tmp = TempDir::new().unwrap();
        let archive = LicenseArchive::new(tmp.path());
        let lookup =
            resolve_from_descriptor(&central(&server), &archive, Some("com.example"), &identity())
                .await;
        assert!(matches!(lookup, Lookup::Failed(_)));
    }

    #[tokio::test]
    async fn test_resolve_from_descriptor_not_published() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(3)
            .mount(&server)
            .await;

        let tmp = TempDir::new().unwrap();
        let archive = LicenseArchive::new(tmp.path());
        let lookup =
            resolve_from_descriptor(&central(&server), &archive, Some("com.example"), &identity())
                .await;
        assert!(matches!(lookup, Lookup::Failed(_)));
    }
}

use std::sync::OnceLock;

use regex::Regex;

use crate::models::ArchiveIdentity;

/// `<name>-<major>.<minor>[.<patch>][-<tag>].jar`
///
/// The name group is greedy and the version group is anchored at the end of
/// the filename, so a hyphenated name such as `commons-lang3` keeps every
/// segment that cannot be read as part of the trailing version.
fn jar_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(.+)-(\d+\.\d+(?:\.\d+)?(?:-[\w\d]+)?)\.jar$").expect("valid jar name regex")
    })
}

/// Split a JAR filename into artifact name and version.
///
/// Returns `None` for anything that does not follow the versioned naming
/// convention; such files are not reported.
pub fn extract_identity(filename: &str) -> Option<ArchiveIdentity> {
    let caps = jar_name_re().captures(filename)?;
    Some(ArchiveIdentity {
        name: caps[1].to_string(),
        version: caps[2].to_string(),
    })
}

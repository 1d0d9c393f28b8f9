use std::sync::OnceLock;

use regex::Regex;

use crate::models::NO_LICENSE_FOUND;

/// A `...License: value` line found in a JAR manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestLicense {
    pub label: String,
    pub value: String,
}

impl ManifestLicense {
    /// Label and value as a single display string.
    pub fn display(&self) -> String {
        format!("{} {}", self.label, self.value)
    }
}

/// Extracts a license designation from free text found inside an archive.
pub trait LicenseMatcher: Send + Sync {
    /// Designation from the contents of a `LICENSE*` file.
    fn license_file_label(&self, text: &str) -> Option<String>;

    /// License header from the contents of `META-INF/MANIFEST.MF`.
    fn manifest_license(&self, text: &str) -> Option<ManifestLicense>;
}

/// Line-oriented regex matcher. It does not know about SPDX identifiers; it
/// reports whatever text sits around the word `License`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PatternMatcher;

fn license_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)(^.*License)(:?\s*.*)").expect("valid license line regex"))
}

fn manifest_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)(.*License):(\s*.*)").expect("valid manifest regex"))
}

impl LicenseMatcher for PatternMatcher {
    fn license_file_label(&self, text: &str) -> Option<String> {
        let caps = license_line_re().captures(text)?;
        let label = format!("{} {}", caps[1].trim(), caps[2].trim());
        Some(label.trim().to_string())
    }

    fn manifest_license(&self, text: &str) -> Option<ManifestLicense> {
        let caps = manifest_line_re().captures(text)?;
        Some(ManifestLicense {
            label: caps[1].trim().to_string(),
            value: caps[2].trim().to_string(),
        })
    }
}

/// License-file designation, or the sentinel when nothing matches.
pub fn license_file_display(matcher: &dyn LicenseMatcher, text: &str) -> String {
    matcher
        .license_file_label(text)
        .unwrap_or_else(|| NO_LICENSE_FOUND.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_license_file_first_line() {
        let text = "Apache License 2.0\n\nLicensed under the Apache License...";
        assert_eq!(
            PatternMatcher.license_file_label(text),
            Some("Apache License 2.0".to_string())
        );
    }

    #[test]
    fn test_license_file_centered_header_spans_lines() {
        let text = "\n                                 Apache License\n                           Version 2.0, January 2004\n";
        assert_eq!(
            PatternMatcher.license_file_label(text),
            Some("Apache License Version 2.0, January 2004".to_string())
        );
    }

    #[test]
    fn test_license_file_with_colon() {
        // the suffix keeps its colon
        let text = "Project License: MIT";
        assert_eq!(
            PatternMatcher.license_file_label(text).as_deref(),
            Some("Project License : MIT")
        );
    }

    #[test]
    fn test_license_file_bare_header_has_no_trailing_space() {
        assert_eq!(
            PatternMatcher.license_file_label("The MIT License").as_deref(),
            Some("The MIT License")
        );
    }

    #[test]
    fn test_license_file_without_match() {
        let text = "Permission is hereby granted, free of charge";
        assert_eq!(PatternMatcher.license_file_label(text), None);
        assert_eq!(license_file_display(&PatternMatcher, text), NO_LICENSE_FOUND);
    }

    #[test]
    fn test_manifest_bundle_license() {
        let text = "Manifest-Version: 1.0\r\nBundle-License: http://opensource.org/licenses/MIT\r\nBundle-Name: foo\r\n";
        let found = PatternMatcher.manifest_license(text).unwrap();
        assert_eq!(found.label, "Bundle-License");
        assert_eq!(found.value, "http://opensource.org/licenses/MIT");
        assert_eq!(found.display(), "Bundle-License http://opensource.org/licenses/MIT");
    }

    #[test]
    fn test_manifest_single_line() {
        let found = PatternMatcher
            .manifest_license("Bundle-License: http://opensource.org/licenses/MIT")
            .unwrap();
        assert_eq!(
            (found.label.as_str(), found.value.as_str()),
            ("Bundle-License", "http://opensource.org/licenses/MIT")
        );
    }

    #[test]
    fn test_manifest_without_license_header() {
        let text = "Manifest-Version: 1.0\nCreated-By: Maven\n";
        assert_eq!(PatternMatcher.manifest_license(text), None);
    }
}

use regex::Regex;

/// Extracts categorized bullet points from a release body.
///
/// Each category is scanned in its own independent pass over the body, so
/// headings of one category never capture bullets belonging to another as
/// long as they sit on distinct lines. An absent body always yields empty
/// results.
pub struct SectionExtractor {
    feature_heading: Regex,
    feature_bullet_heading: Regex,
    feature_exit: Regex,
    breaking_heading: Regex,
    deprecation_heading: Regex,
    deprecation_bullet_heading: Regex,
    plus_heading: Regex,
    subheading: Regex,
    heading: Regex,
    bullet: Regex,
    version: Regex,
}

impl SectionExtractor {
    pub fn new() -> Self {
        Self {
            feature_heading: Regex::new(
                r"(?i)^###?\s+(?:New Features|Features|Major Changes|Improvements|Enhancements|Changes|Plus|Added)",
            )
            .unwrap(),
            feature_bullet_heading: Regex::new(
                r"(?i)^[-*]\s+(?:New Features|Features|Major Changes|Improvements|Enhancements|Changes|Plus|Added)",
            )
            .unwrap(),
            feature_exit: Regex::new(
                r"(?i)^###?\s+(?:Breaking Changes|Deprecations|Bug Fixes|Removed|Fixed)",
            )
            .unwrap(),
            breaking_heading: Regex::new(
                r"(?i)^###?\s+(?:Breaking Changes|BREAKING CHANGES|Breaking|Important Changes)",
            )
            .unwrap(),
            deprecation_heading: Regex::new(r"(?i)^###?\s+(?:Deprecations|Removed|Deprecated)")
                .unwrap(),
            deprecation_bullet_heading: Regex::new(r"(?i)^[-*]\s+(?:Deprecations|Removed|Deprecated)")
                .unwrap(),
            plus_heading: Regex::new(r"(?i)^Plus\s+(?:changes|everything|features)").unwrap(),
            subheading: Regex::new(r"^###").unwrap(),
            heading: Regex::new(r"^##").unwrap(),
            bullet: Regex::new(r"^[-*]\s+").unwrap(),
            version: Regex::new(r"v?(\d+(?:\.\d+)?(?:\.\d+)?)").unwrap(),
        }
    }

    /// Pulls the numeric version out of a tag name, handling v1.0.0, 1.0.0,
    /// v1.0, 1.0, v1 and 1. Falls back to the raw tag when nothing matches.
    pub fn extract_version(&self, tag_name: &str) -> String {
        self.version
            .captures(tag_name)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| tag_name.to_string())
    }

    fn clean_bullet(&self, line: &str) -> String {
        let trimmed = line.trim_start();
        let without_marker = trimmed
            .strip_prefix('-')
            .or_else(|| trimmed.strip_prefix('*'))
            .unwrap_or(trimmed);
        without_marker.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    pub fn features(&self, body: Option<&str>) -> Vec<String> {
        let Some(body) = body else {
            return Vec::new();
        };

        let mut features = Vec::new();
        let mut in_section = false;

        for line in body.lines() {
            if self.feature_heading.is_match(line) || self.feature_bullet_heading.is_match(line) {
                in_section = true;
                continue;
            }

            if self.feature_exit.is_match(line) {
                in_section = false;
                continue;
            }

            if in_section && self.bullet.is_match(line) {
                let feature = self.clean_bullet(line);
                let lower = feature.to_lowercase();

                // Skip lines that are just links, bug fixes or removals.
                if !lower.contains("bugfix")
                    && !lower.contains("fix bug")
                    && !lower.contains("fixed bug")
                    && !feature.starts_with("http")
                    && !lower.contains("deprecated")
                    && !lower.contains("removed")
                    && !feature.is_empty()
                {
                    features.push(feature);
                }
            }
        }

        features
    }

    pub fn breaking_changes(&self, body: Option<&str>) -> Vec<String> {
        let Some(body) = body else {
            return Vec::new();
        };

        let mut changes = Vec::new();
        let mut in_section = false;

        for line in body.lines() {
            if self.breaking_heading.is_match(line) {
                in_section = true;
                continue;
            }

            if in_section && self.subheading.is_match(line) {
                in_section = false;
                continue;
            }

            if in_section && self.bullet.is_match(line) {
                let change = self.clean_bullet(line);
                if !change.is_empty() {
                    changes.push(change);
                }
            }
        }

        changes
    }

    pub fn deprecations(&self, body: Option<&str>) -> Vec<String> {
        let Some(body) = body else {
            return Vec::new();
        };

        let mut deprecations = Vec::new();
        let mut in_section = false;

        for line in body.lines() {
            if self.deprecation_heading.is_match(line)
                || self.deprecation_bullet_heading.is_match(line)
            {
                in_section = true;
                continue;
            }

            if in_section && self.subheading.is_match(line) {
                in_section = false;
                continue;
            }

            if in_section && self.bullet.is_match(line) {
                let deprecation = self.clean_bullet(line);
                if !deprecation.is_empty() {
                    deprecations.push(deprecation);
                }
            }
        }

        deprecations
    }

    /// "Plus changes since ..." trailers, common in pre-release notes.
    pub fn plus_changes(&self, body: Option<&str>) -> Vec<String> {
        let Some(body) = body else {
            return Vec::new();
        };

        let mut changes = Vec::new();
        let mut in_section = false;

        for line in body.lines() {
            if self.plus_heading.is_match(line) {
                in_section = true;
                continue;
            }

            if in_section && self.heading.is_match(line) {
                in_section = false;
                continue;
            }

            if in_section && self.bullet.is_match(line) {
                let change = self.clean_bullet(line);
                if !change.is_empty() {
                    changes.push(change);
                }
            }
        }

        changes
    }
}

impl Default for SectionExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_body_yields_empty() {
        let extractor = SectionExtractor::new();
        assert!(extractor.features(None).is_empty());
        assert!(extractor.breaking_changes(None).is_empty());
        assert!(extractor.deprecations(None).is_empty());
        assert!(extractor.plus_changes(None).is_empty());
    }

    #[test]
    fn test_breaking_change_not_counted_as_feature() {
        let extractor = SectionExtractor::new();
        let body = "### Breaking Changes\n- Removed legacy API\n";
        assert_eq!(
            extractor.breaking_changes(Some(body)),
            vec!["Removed legacy API"]
        );
        assert!(extractor.features(Some(body)).is_empty());
    }

    #[test]
    fn test_feature_section_filters_fixes_and_links() {
        let extractor = SectionExtractor::new();
        let body = "\
## Features
- Add streaming uploads
- Bugfix for resume handling
- fixed bug in retry loop
- https://example.com/changelog
- Deprecated old client
";
        assert_eq!(extractor.features(Some(body)), vec!["Add streaming uploads"]);
    }

    #[test]
    fn test_feature_section_exits_on_bugfix_heading() {
        let extractor = SectionExtractor::new();
        let body = "\
### Improvements
- Faster indexing
### Bug Fixes
- Crash on empty config
";
        assert_eq!(extractor.features(Some(body)), vec!["Faster indexing"]);
    }

    #[test]
    fn test_bullet_cleaning_collapses_whitespace() {
        let extractor = SectionExtractor::new();
        let body = "### Features\n-   Add   tabbed    layout  \n";
        assert_eq!(extractor.features(Some(body)), vec!["Add tabbed layout"]);
    }

    #[test]
    fn test_deprecations_section() {
        let extractor = SectionExtractor::new();
        let body = "\
### Deprecated
- Old config format
### Features
- New config format
";
        assert_eq!(extractor.deprecations(Some(body)), vec!["Old config format"]);
    }

    #[test]
    fn test_plus_changes_section() {
        let extractor = SectionExtractor::new();
        let body = "\
Plus everything from the beta:
- Dark mode
- Keyboard shortcuts
## Other
- ignored
";
        assert_eq!(
            extractor.plus_changes(Some(body)),
            vec!["Dark mode", "Keyboard shortcuts"]
        );
    }

    #[test]
    fn test_extract_version_variants() {
        let extractor = SectionExtractor::new();
        assert_eq!(extractor.extract_version("v1.2.3"), "1.2.3");
        assert_eq!(extractor.extract_version("1.2.3"), "1.2.3");
        assert_eq!(extractor.extract_version("v2.0"), "2.0");
        assert_eq!(extractor.extract_version("release-3"), "3");
        assert_eq!(extractor.extract_version("nightly"), "nightly");
    }
}

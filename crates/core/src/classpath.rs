//! Classpath header extraction.
//!
//! A unit declares its classpath as a comma-separated list of entries
//! relative to its own root. Extraction turns that list into the set of
//! content locations that actually exist in the unit's backing store:
//!
//! - `.` (the unit's primary root) is skipped; the unit resolves it natively
//! - entries with no backing location are dropped, not reported as errors
//! - directories are used as-is, anything else becomes an archive root

use std::collections::BTreeSet;
use tracing::{debug, warn};
use unitloader_api::{ContentLocation, ExtractIssue, UnitSource};
use url::Url;

/// Token naming the unit's own primary root.
pub const OWN_ROOT_TOKEN: &str = ".";

/// Outcome of extracting one classpath header.
#[derive(Debug, Default, Clone)]
pub struct Extraction {
    /// Resolved, de-duplicated locations
    pub locations: BTreeSet<ContentLocation>,
    /// Tokens that contributed nothing, and why
    pub issues: Vec<ExtractIssue>,
    /// Number of `.` and empty tokens skipped
    pub skipped: usize,
}

pub struct ClasspathExtractor;

impl ClasspathExtractor {
    /// Resolved content locations of `unit`'s declared classpath.
    pub fn extract(unit: &dyn UnitSource) -> BTreeSet<ContentLocation> {
        Self::extract_detailed(unit).locations
    }

    /// Like [`ClasspathExtractor::extract`], keeping the per-token issues.
    /// A unit without a header behaves as if it declared `.`.
    pub fn extract_detailed(unit: &dyn UnitSource) -> Extraction {
        let header = unit.classpath_header();
        let header = header.as_deref().unwrap_or(OWN_ROOT_TOKEN);
        debug!("Extracting classpath of {}: {}", unit.id(), header);
        Self::extract_header(header, |entry| unit.entry_location(entry))
    }

    /// Extract `header` against an arbitrary entry lookup.
    pub fn extract_header(header: &str, lookup: impl Fn(&str) -> Option<String>) -> Extraction {
        let mut result = Extraction::default();

        for token in header.split(',').map(clean_token) {
            if token.is_empty() || token == OWN_ROOT_TOKEN {
                result.skipped += 1;
                continue;
            }

            let Some(raw) = lookup(token) else {
                debug!("Dropping classpath entry '{}': no backing location", token);
                result.issues.push(ExtractIssue::EntryUnresolved {
                    token: token.to_string(),
                });
                continue;
            };

            match Self::normalize(token, &raw) {
                Ok(location) => {
                    result.locations.insert(location);
                }
                Err(issue) => {
                    warn!("{}", issue);
                    result.issues.push(issue);
                }
            }
        }

        result
    }

    /// Turn a raw backing location into a content location. A raw location
    /// ending in `/` is a directory; anything else is an archive.
    pub fn normalize(token: &str, raw: &str) -> Result<ContentLocation, ExtractIssue> {
        let malformed = |reason: String| ExtractIssue::MalformedLocation {
            token: token.to_string(),
            raw: raw.to_string(),
            reason,
        };

        let url = Url::parse(raw).map_err(|e| malformed(e.to_string()))?;
        if url.path().ends_with('/') {
            Ok(ContentLocation::directory(url))
        } else {
            ContentLocation::archive(url).map_err(|e| malformed(e.to_string()))
        }
    }
}

/// Strip surrounding whitespace and any `;`-separated parameters.
fn clean_token(token: &str) -> &str {
    token.split(';').next().unwrap_or_default().trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(entries: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |entry: &str| map.get(entry).cloned()
    }

    fn archive_root(raw: &str) -> ContentLocation {
        ContentLocation::archive(Url::parse(raw).unwrap()).unwrap()
    }

    #[test]
    fn test_extraction() {
        let lookup = lookup_from(&[
            (".", "file:///unit/"),
            ("foo.jar", "file:///unit/foo.jar"),
            ("cp/bar.jar", "file:///unit/cp/bar.jar"),
        ]);

        let result = ClasspathExtractor::extract_header(".,foo.jar,cp/bar.jar", lookup);

        assert_eq!(result.locations.len(), 2);
        assert!(result.locations.contains(&archive_root("file:///unit/foo.jar")));
        assert!(result.locations.contains(&archive_root("file:///unit/cp/bar.jar")));
        assert_eq!(result.skipped, 1);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_extraction_with_missing_entry() {
        let lookup = lookup_from(&[
            (".", "file:///unit/"),
            ("cp/bar.jar", "file:///unit/cp/bar.jar"),
        ]);

        let result = ClasspathExtractor::extract_header(".,foo.jar,cp/bar.jar", lookup);

        assert_eq!(result.locations.len(), 1);
        assert!(result.locations.contains(&archive_root("file:///unit/cp/bar.jar")));
        assert_eq!(
            result.issues,
            vec![ExtractIssue::EntryUnresolved {
                token: "foo.jar".to_string()
            }]
        );
    }

    #[test]
    fn test_archive_root_uri_form() {
        let location = ClasspathExtractor::normalize("foo.jar", "file:///unit/foo.jar").unwrap();
        assert_eq!(location.to_string(), "archive:file:///unit/foo.jar!/");
    }

    #[test]
    fn test_directory_entry_used_as_is() {
        let lookup = lookup_from(&[("WEB-INF/classes", "file:///unit/WEB-INF/classes/")]);
        let result = ClasspathExtractor::extract_header("WEB-INF/classes", lookup);

        let location = result.locations.iter().next().unwrap();
        assert!(!location.is_archive());
        assert_eq!(location.to_string(), "file:///unit/WEB-INF/classes/");
    }

    #[test]
    fn test_duplicate_locations_collapse() {
        let lookup = |_: &str| Some("file:///unit/shared.jar".to_string());
        let result = ClasspathExtractor::extract_header("a.jar,b.jar,a.jar", lookup);
        assert_eq!(result.locations.len(), 1);
    }

    #[test]
    fn test_malformed_location_is_skipped() {
        let lookup = lookup_from(&[
            ("bad.jar", "not a url"),
            ("good.jar", "file:///unit/good.jar"),
        ]);
        let result = ClasspathExtractor::extract_header("bad.jar,good.jar", lookup);

        assert_eq!(result.locations.len(), 1);
        assert!(matches!(
            result.issues.as_slice(),
            [ExtractIssue::MalformedLocation { token, .. }] if token == "bad.jar"
        ));
    }

    #[test]
    fn test_token_hygiene() {
        let lookup = lookup_from(&[
            ("a.jar", "file:///unit/a.jar"),
            ("b.jar", "file:///unit/b.jar"),
        ]);
        let result =
            ClasspathExtractor::extract_header(" . , a.jar ,,b.jar;optional=true,", lookup);

        assert_eq!(result.locations.len(), 2);
        assert_eq!(result.skipped, 3);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_size_bound_holds_for_every_subset() {
        let tokens = [".", "a.jar", "b.jar", "lib/c.jar", "classes"];
        let header = tokens.join(",");

        // Every subset of resolvable entries
        for mask in 0u32..(1 << tokens.len()) {
            let present: Vec<&str> = tokens
                .iter()
                .enumerate()
                .filter(|(i, t)| mask & (1 << i) != 0 && **t != ".")
                .map(|(_, t)| *t)
                .collect();
            let lookup = |entry: &str| {
                present
                    .iter()
                    .any(|p| *p == entry)
                    .then(|| format!("file:///unit/{}", entry))
            };

            let result = ClasspathExtractor::extract_header(&header, lookup);
            let missing = tokens.len() - present.len();
            assert!(result.locations.len() <= tokens.len() - missing);
            assert_eq!(result.locations.len(), present.len());
        }
    }
}

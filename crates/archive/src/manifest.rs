//! Minimal reader for the main section of `META-INF/MANIFEST.MF`.

use std::collections::HashMap;

pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

/// Attribute carrying a unit's declared classpath.
pub const CLASSPATH_ATTRIBUTE: &str = "Bundle-ClassPath";

/// Parse the main attributes of a manifest.
///
/// Attribute names are matched case-insensitively by [`Manifest::get`].
/// Continuation lines (starting with a single space) are joined to the
/// previous value. The main section ends at the first blank line.
#[derive(Debug, Default, Clone)]
pub struct Manifest {
    attributes: HashMap<String, String>,
}

impl Manifest {
    pub fn parse(text: &str) -> Self {
        let mut attributes = HashMap::new();
        let mut current: Option<(String, String)> = None;

        for line in text.lines() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.is_empty() {
                break;
            }
            if let Some(rest) = line.strip_prefix(' ') {
                if let Some((_, value)) = current.as_mut() {
                    value.push_str(rest);
                }
                continue;
            }
            if let Some((name, value)) = current.take() {
                attributes.insert(name.to_ascii_lowercase(), value);
            }
            match line.split_once(':') {
                Some((name, value)) => {
                    let value = value.strip_prefix(' ').unwrap_or(value);
                    current = Some((name.trim().to_string(), value.to_string()));
                }
                None => tracing::debug!("Ignoring malformed manifest line: {}", line),
            }
        }
        if let Some((name, value)) = current.take() {
            attributes.insert(name.to_ascii_lowercase(), value);
        }

        Self { attributes }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn classpath(&self) -> Option<&str> {
        self.get(CLASSPATH_ATTRIBUTE)
    }
}

//! Exclusion of test-framework objects.

use sd_core::ObjectName;

/// Skips objects whose schema or name contains one of the configured
/// fragments, compared case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct ObjectFilter {
    fragments: Vec<String>,
}

impl ObjectFilter {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            fragments: patterns
                .into_iter()
                .map(|p| p.as_ref().trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// A filter that keeps everything.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_excluded(&self, name: &ObjectName) -> bool {
        let schema = name.schema().unwrap_or_default().to_lowercase();
        let object = name.name().to_lowercase();
        self.fragments
            .iter()
            .any(|f| schema.contains(f.as_str()) || object.contains(f.as_str()))
    }
}

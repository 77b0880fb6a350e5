//! Allow-list of (form, office) pairs, loaded from a `form,officeDescription` text file.
//!
//! Keys are normalised with [`filter_key`] both when loading and when matching,
//! so matching ignores case and surrounding whitespace.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::contract::OfficeFilter;

#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("failed to read filter configuration {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// `lowercase(trim(form)) + "|" + lowercase(trim(office))`
pub fn filter_key(form_name: &str, office_description: &str) -> String {
    format!(
        "{}|{}",
        form_name.trim().to_lowercase(),
        office_description.trim().to_lowercase()
    )
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    keys: HashSet<String>,
}

impl FilterSet {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, FilterError> {
        let path = path.as_ref();
        info!(config_path = ?path, "Reading filter configuration");
        let content = fs::read_to_string(path).map_err(|source| FilterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let set = Self::parse(&content);
        info!(config_path = ?path, entries = set.len(), "Filter configuration loaded");
        Ok(set)
    }

    /// Builds the set from file contents. Every line that does not split into
    /// exactly two comma-separated tokens (blank lines included) is skipped
    /// with a warning. Empty tokens are kept: `I-130,` is the key `i-130|`.
    pub fn parse(content: &str) -> Self {
        let mut keys = HashSet::new();
        for (idx, line) in content.lines().enumerate() {
            let tokens: Vec<&str> = line.split(',').collect();
            match tokens.as_slice() {
                [form, office] => {
                    keys.insert(filter_key(form, office));
                }
                _ => {
                    warn!(line_number = idx + 1, line = %line, "Invalid filter configuration line, skipping");
                }
            }
        }
        FilterSet { keys }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, form_name: &str, office_description: &str) -> bool {
        self.keys.contains(&filter_key(form_name, office_description))
    }
}

impl OfficeFilter for FilterSet {
    fn is_empty(&self) -> bool {
        FilterSet::is_empty(self)
    }

    fn contains(&self, form_name: &str, office_description: &str) -> bool {
        FilterSet::contains(self, form_name, office_description)
    }
}

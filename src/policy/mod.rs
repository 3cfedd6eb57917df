//! The options a redirect target is checked against.

use regex::Regex;
use serde::{Deserialize, Serialize};

#[cfg(test)]
mod test;

mod path_match;

pub use self::path_match::PathMatch;

/// Describes which redirect targets are acceptable.
///
/// Every option is disabled by default, which means only relative references
/// (`/a/b/c`) are accepted. Absolute URLs need their host to be declared in
/// [`Policy::whitelist`] or covered by one of [`Policy::subdomains`].
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Policy {
    /// Both the path and its dot-segment-free form must match this pattern.
    pub path_match: Option<PathMatch>,
    /// Rejects relative references.
    pub require_absolute: bool,
    /// Rejects absolute URLs whose scheme isn't `https`.
    pub require_ssl: bool,
    /// Hosts accepted as-is.
    pub whitelist: Vec<String>,
    /// Host suffixes, each starting with a `.`.
    pub subdomains: Vec<String>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("subdomain {0:?} must start with `.`")]
    InvalidSubdomain(String),
    #[error("invalid path_match pattern: {0}")]
    InvalidPathMatch(String),
}

impl Policy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path_match(mut self, pattern: Regex) -> Self {
        self.path_match = Some(PathMatch::from(pattern));
        self
    }

    pub fn require_absolute(mut self, require_absolute: bool) -> Self {
        self.require_absolute = require_absolute;
        self
    }

    pub fn require_ssl(mut self, require_ssl: bool) -> Self {
        self.require_ssl = require_ssl;
        self
    }

    pub fn with_whitelist<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.whitelist = hosts.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_subdomains<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subdomains = suffixes.into_iter().map(Into::into).collect();
        self
    }

    /// Checks that every subdomain suffix starts with a dot.
    ///
    /// A suffix such as `test.com` would also accept `eviltest.com`, so this
    /// is treated as a configuration mistake rather than silently fixed.
    pub fn validate(&self) -> Result<(), PolicyError> {
        match self
            .subdomains
            .iter()
            .find(|suffix| !suffix.starts_with('.'))
        {
            Some(suffix) => Err(PolicyError::InvalidSubdomain(suffix.to_owned())),
            None => Ok(()),
        }
    }
}

use std::fmt;

use regex::Regex;
use serde::{
    de::{self, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};

use super::PolicyError;

/// A pattern the path of a redirect target has to match.
///
/// Matching is a search, not a full match: anchor the pattern (`^/admin/`) to
/// constrain a prefix.
#[derive(Debug, Clone)]
pub struct PathMatch(pub Regex);

impl PathMatch {
    pub fn is_match(&self, path: &str) -> bool {
        self.0.is_match(path)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Regex> for PathMatch {
    fn from(pattern: Regex) -> Self {
        Self(pattern)
    }
}

impl std::str::FromStr for PathMatch {
    type Err = PolicyError;

    fn from_str(pattern: &str) -> Result<Self, Self::Err> {
        Regex::new(pattern)
            .map(Self)
            .map_err(|err| PolicyError::InvalidPathMatch(err.to_string()))
    }
}

// Two patterns are equal when their sources are, which is all a policy
// comparison needs.
impl PartialEq for PathMatch {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for PathMatch {}

struct PathMatchVisitor;

impl<'de> Visitor<'de> for PathMatchVisitor {
    type Value = PathMatch;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a regular expression")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        value.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for PathMatch {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(PathMatchVisitor)
    }
}

impl Serialize for PathMatch {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Which NCES directory a search targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Common Core of Data public school search.
    Public,
    /// Private School Universe Survey search.
    Private,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Public => "public",
            SourceType::Private => "private",
        }
    }

    /// Sources to try, in order, for a resolution starting on `self`.
    ///
    /// A public search falls back to the private directory once; a private
    /// search has nowhere left to go.
    pub fn attempt_order(self) -> &'static [SourceType] {
        match self {
            SourceType::Public => &[SourceType::Public, SourceType::Private],
            SourceType::Private => &[SourceType::Private],
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "public" => Ok(SourceType::Public),
            "private" => Ok(SourceType::Private),
            _ => Err(format!("Unknown source type: {}", s)),
        }
    }
}

/// Optional location hints used to pick one school among same-named results.
///
/// Blank strings are stored as `None`, so `Some` always carries text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationHints {
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

impl LocationHints {
    pub fn new(city: Option<&str>, state: Option<&str>, zip: Option<&str>) -> Self {
        Self {
            city: normalize(city),
            state: normalize(state),
            zip: normalize(zip),
        }
    }
}

fn normalize(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// One resolution attempt against a single source.
///
/// Never mutated: switching source builds a new query via [`for_source`](Self::for_source).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub name: String,
    pub hints: LocationHints,
    pub source: SourceType,
}

impl SearchQuery {
    pub fn new(name: &str, hints: LocationHints, source: SourceType) -> Result<Self, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidQuery("school name must not be empty".into()));
        }
        Ok(Self {
            name: name.to_string(),
            hints,
            source,
        })
    }

    /// Same name and hints, aimed at another source.
    pub fn for_source(&self, source: SourceType) -> Self {
        Self {
            name: self.name.clone(),
            hints: self.hints.clone(),
            source,
        }
    }
}

/// NCES school identifier as printed on a school's detail page.
///
/// Twelve digits for public schools, eight characters for private ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NcesId(String);

impl NcesId {
    /// Wraps a raw identifier, returning `None` when it is blank.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            None
        } else {
            Some(Self(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NcesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of a completed resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resolution {
    Found { id: NcesId, source: SourceType },
    NotFound,
}

impl Resolution {
    pub fn id(&self) -> Option<&NcesId> {
        match self {
            Resolution::Found { id, .. } => Some(id),
            Resolution::NotFound => None,
        }
    }
}

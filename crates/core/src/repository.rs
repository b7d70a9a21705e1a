//! Plugin repositories and artifact coordinates
//!
//! The two built-in repositories mirror the ones every Foodshare Android
//! module declares: Google's Maven host and Maven Central, in that order.
//! Resolution is a static model over group namespaces, not a network
//! resolver: an artifact resolves when at least one declared repository
//! hosts its group.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Group prefixes served by the vendor repository only.
const VENDOR_GROUP_PREFIXES: &[&str] = &["com.google.", "com.android.", "androidx."];

/// A built-in package repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepositoryRef {
    /// Google's Maven repository (Android and Play Services artifacts)
    Google,
    /// Maven Central (general-purpose artifacts)
    MavenCentral,
}

impl RepositoryRef {
    /// The repository's base URL
    pub fn url(&self) -> &'static str {
        match self {
            Self::Google => "https://maven.google.com",
            Self::MavenCentral => "https://repo1.maven.org/maven2",
        }
    }

    /// Whether this repository hosts artifacts in the given group
    pub fn hosts(&self, group: &str) -> bool {
        let vendor = VENDOR_GROUP_PREFIXES
            .iter()
            .any(|prefix| group.starts_with(prefix));
        match self {
            Self::Google => vendor,
            Self::MavenCentral => !vendor,
        }
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Google => write!(f, "google"),
            Self::MavenCentral => write!(f, "maven-central"),
        }
    }
}

/// An artifact coordinate (`group:name:version`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Group identifier (`com.google.gms`)
    pub group: String,
    /// Artifact name (`google-services`)
    pub name: String,
    /// Version string (`4.4.0`)
    pub version: String,
}

impl Coordinate {
    /// Create a coordinate from its three parts
    pub fn new(group: impl Into<String>, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            version: version.into(),
        }
    }
}

impl FromStr for Coordinate {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        let mut parts = raw.split(':');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(group), Some(name), Some(version), None)
                if !group.is_empty() && !name.is_empty() && !version.is_empty() =>
            {
                Ok(Self::new(group, name, version))
            }
            _ => Err(Error::invalid_coordinate(raw)),
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.version)
    }
}

/// Find the first declared repository that hosts the coordinate's group.
///
/// An empty repository list and a group no declared repository serves are
/// both fatal: a missing classpath artifact aborts configuration before any
/// task runs.
pub fn resolve(coordinate: &Coordinate, repositories: &[RepositoryRef]) -> Result<RepositoryRef> {
    if repositories.is_empty() {
        return Err(Error::no_repositories());
    }
    repositories
        .iter()
        .copied()
        .find(|repo| repo.hosts(&coordinate.group))
        .ok_or_else(|| Error::unresolvable_artifact(&coordinate.to_string()))
}

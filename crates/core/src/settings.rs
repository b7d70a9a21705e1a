//! Build settings schema and loading
//!
//! Settings default to the literal declarations of the Android root build
//! script; a `.buildcfg.toml` file may tune them but cannot introduce new
//! effect kinds.

use crate::error::Result;
use crate::repository::{Coordinate, RepositoryRef};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root settings schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BuildSettings {
    /// Buildscript (plugin-resolution) settings
    #[serde(default)]
    pub buildscript: BuildscriptSettings,

    /// Output directory layout settings
    #[serde(default)]
    pub layout: LayoutSettings,

    /// Cross-module evaluation ordering settings
    #[serde(default)]
    pub evaluation: EvaluationSettings,

    /// Task registration settings
    #[serde(default)]
    pub tasks: TaskSettings,
}

/// Plugin-resolution repositories and classpath coordinates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildscriptSettings {
    /// Repositories, in resolution order
    #[serde(default = "default_repositories")]
    pub repositories: Vec<RepositoryRef>,

    /// Classpath coordinates (`group:name:version`)
    #[serde(default = "default_classpath")]
    pub classpath: Vec<String>,
}

impl Default for BuildscriptSettings {
    fn default() -> Self {
        Self {
            repositories: default_repositories(),
            classpath: default_classpath(),
        }
    }
}

impl BuildscriptSettings {
    /// Parse the classpath entries into coordinates
    pub fn coordinates(&self) -> Result<Vec<Coordinate>> {
        self.classpath.iter().map(|raw| raw.parse()).collect()
    }
}

/// Output directory layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutSettings {
    /// Redirect of the root output directory, relative to the default one
    #[serde(default = "default_build_dir_redirect")]
    pub build_dir_redirect: String,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            build_dir_redirect: default_build_dir_redirect(),
        }
    }
}

/// Evaluation ordering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationSettings {
    /// Module every sub-module's configuration must wait for
    #[serde(default = "default_depends_on")]
    pub depends_on: String,
}

impl Default for EvaluationSettings {
    fn default() -> Self {
        Self {
            depends_on: default_depends_on(),
        }
    }
}

/// Task registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSettings {
    /// Register the `clean` task for the redirected output directory
    #[serde(default = "default_true")]
    pub clean: bool,
}

impl Default for TaskSettings {
    fn default() -> Self {
        Self { clean: true }
    }
}

fn default_repositories() -> Vec<RepositoryRef> {
    vec![RepositoryRef::Google, RepositoryRef::MavenCentral]
}

fn default_classpath() -> Vec<String> {
    vec!["com.google.gms:google-services:4.4.0".to_string()]
}

fn default_build_dir_redirect() -> String {
    "../../build".to_string()
}

fn default_depends_on() -> String {
    ":app".to_string()
}

fn default_true() -> bool {
    true
}

impl BuildSettings {
    /// Load settings from an explicit path, a standard location, or defaults.
    ///
    /// An explicitly given path must exist; the standard locations are
    /// optional and absence means pure defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let settings_path = match path {
            Some(p) => {
                if !p.is_file() {
                    return Err(crate::Error::settings_not_found(p));
                }
                Some(p.to_path_buf())
            }
            None => find_settings_file(),
        };

        match settings_path {
            Some(p) => load_settings_file(&p),
            None => Ok(Self::default()),
        }
    }
}

/// Find a settings file in the standard locations
fn find_settings_file() -> Option<PathBuf> {
    let candidates = [".buildcfg.toml", "buildcfg.toml"];
    candidates
        .into_iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
}

/// Read and parse a TOML settings file
fn load_settings_file(path: &Path) -> Result<BuildSettings> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::Error::settings(format!("Failed to read {}: {}", path.display(), e))
    })?;
    Ok(toml::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_script_literals() {
        let settings = BuildSettings::default();
        assert_eq!(
            settings.buildscript.repositories,
            vec![RepositoryRef::Google, RepositoryRef::MavenCentral]
        );
        assert_eq!(
            settings.buildscript.classpath,
            vec!["com.google.gms:google-services:4.4.0"]
        );
        assert_eq!(settings.layout.build_dir_redirect, "../../build");
        assert_eq!(settings.evaluation.depends_on, ":app");
        assert!(settings.tasks.clean);
    }

    #[test]
    fn test_coordinates_parse() {
        let coords = BuildSettings::default().buildscript.coordinates().unwrap();
        assert_eq!(coords.len(), 1);
        assert_eq!(coords[0].group, "com.google.gms");
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let settings: BuildSettings = toml::from_str(
            r#"
            [evaluation]
            depends_on = ":core"
            "#,
        )
        .unwrap();
        assert_eq!(settings.evaluation.depends_on, ":core");
        assert_eq!(settings.layout.build_dir_redirect, "../../build");
        assert_eq!(settings.buildscript.repositories.len(), 2);
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let err = BuildSettings::load(Some(Path::new("/nonexistent/buildcfg.toml"))).unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::SettingsNotFound);
    }

    #[test]
    fn test_load_parses_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("buildcfg.toml");
        std::fs::write(&path, "[tasks]\nclean = false\n").unwrap();
        let settings = BuildSettings::load(Some(&path)).unwrap();
        assert!(!settings.tasks.clean);
    }
}

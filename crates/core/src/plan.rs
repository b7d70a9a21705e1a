//! Effect planning
//!
//! `plan` is a pure function from a project tree and settings to an ordered
//! list of effects. Nothing is mutated here; [`crate::apply`] executes the
//! effects. Splitting the two keeps the configuration testable and lets the
//! CLI print a plan without touching anything.

use crate::error::{Error, Result};
use crate::paths;
use crate::project::{module_path, ProjectTree, ROOT_PATH};
use crate::repository::{self, Coordinate, RepositoryRef};
use crate::settings::BuildSettings;
use crate::tasks::TaskKind;
use serde::Serialize;
use std::path::PathBuf;

/// One desired configuration effect
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    /// Make a classpath coordinate available to plugin resolution
    AddClasspath {
        /// The artifact coordinate
        coordinate: Coordinate,
        /// Repository the coordinate resolves from
        resolved_from: RepositoryRef,
    },
    /// Register a repository on a module
    AddRepository {
        /// Gradle path of the module
        module: String,
        /// Repository to register
        repository: RepositoryRef,
    },
    /// Redirect a module's build output directory
    SetOutputDir {
        /// Gradle path of the module
        module: String,
        /// Absolute output directory
        path: PathBuf,
    },
    /// Require `prerequisite`'s configuration to complete before `module`'s
    EvaluateAfter {
        /// Gradle path of the dependent module
        module: String,
        /// Gradle path of the prerequisite module
        prerequisite: String,
    },
    /// Register (or replace) a named task
    RegisterTask {
        /// Task name
        name: String,
        /// What the task does
        kind: TaskKind,
    },
}

/// The ordered effect list for one configuration pass
#[derive(Debug, Clone, Serialize)]
pub struct ConfigPlan {
    /// Effects in application order
    pub effects: Vec<Effect>,
}

impl ConfigPlan {
    /// The redirected root output directory, if the plan sets one
    pub fn root_output_dir(&self) -> Option<&PathBuf> {
        self.effects.iter().find_map(|e| match e {
            Effect::SetOutputDir { module, path } if module == ROOT_PATH => Some(path),
            _ => None,
        })
    }
}

/// Compute the effect list for `tree` under `settings`.
///
/// Effect order follows the build script: classpath, repositories, output
/// directories (root strictly before sub-modules, which derive from the new
/// root path), evaluation ordering, tasks. Fatal checks happen here, before
/// anything is applied: every classpath coordinate must resolve from the
/// declared repositories and the evaluation target must exist in the tree.
pub fn plan(tree: &ProjectTree, settings: &BuildSettings) -> Result<ConfigPlan> {
    let mut effects = Vec::new();

    // Buildscript classpath, checked against the declared repositories.
    for coordinate in settings.buildscript.coordinates()? {
        let resolved_from = repository::resolve(&coordinate, &settings.buildscript.repositories)?;
        effects.push(Effect::AddClasspath {
            coordinate,
            resolved_from,
        });
    }

    // Repositories for the root and every sub-module, in declaration order.
    for path in tree.module_paths() {
        for &repo in &settings.buildscript.repositories {
            effects.push(Effect::AddRepository {
                module: path.clone(),
                repository: repo,
            });
        }
    }

    // Root output redirect, fully resolved before sub-module paths derive
    // from it. The redirect is relative to the default location under the
    // project directory, never to a previously applied redirect, so
    // replanning the same tree lands on the same path.
    let default_root = paths::absolutize(&tree.root().dir().join("build"))?;
    let new_root = paths::normalize(&default_root.join(&settings.layout.build_dir_redirect));
    effects.push(Effect::SetOutputDir {
        module: ROOT_PATH.to_string(),
        path: new_root.clone(),
    });
    for sub in tree.submodules() {
        effects.push(Effect::SetOutputDir {
            module: module_path(sub.name()),
            path: new_root.join(sub.name()),
        });
    }

    // Every sub-module's configuration waits on the named module.
    let target = settings.evaluation.depends_on.as_str();
    if !tree.contains(target) {
        return Err(Error::unresolved_module(target)
            .with_context("While declaring evaluation ordering for sub-modules"));
    }
    for sub in tree.submodules() {
        let path = module_path(sub.name());
        if path != target {
            effects.push(Effect::EvaluateAfter {
                module: path,
                prerequisite: target.to_string(),
            });
        }
    }

    if settings.tasks.clean {
        effects.push(Effect::RegisterTask {
            name: "clean".to_string(),
            kind: TaskKind::Delete(new_root),
        });
    }

    Ok(ConfigPlan { effects })
}

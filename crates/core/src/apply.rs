//! Plan application
//!
//! Executes a [`ConfigPlan`] against a mutable project tree, in plan order,
//! single-threaded. Output directories are set during application, before
//! any task could read them; tasks are only registered here, never run.

use crate::error::Result;
use crate::ordering::EvaluationGraph;
use crate::plan::{plan, ConfigPlan, Effect};
use crate::project::{ProjectTree, ROOT_PATH};
use crate::repository::{Coordinate, RepositoryRef};
use crate::settings::BuildSettings;
use crate::tasks::{Task, TaskRegistry};
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

/// Everything a configuration pass produces besides tree mutations
#[derive(Debug, Default)]
pub struct ConfigOutcome {
    /// Classpath coordinates available to plugin resolution
    pub classpath: Vec<(Coordinate, RepositoryRef)>,
    /// Evaluation ordering constraints
    pub graph: EvaluationGraph,
    /// Registered tasks
    pub tasks: TaskRegistry,
    /// Summary for reporting
    pub report: ConfigReport,
}

/// Summary of one configuration pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigReport {
    /// Modules configured (root included)
    pub modules: usize,
    /// Repository registrations applied (deduplicated)
    pub repositories_registered: usize,
    /// Redirected root output directory
    pub root_output_dir: Option<PathBuf>,
    /// Ordering constraints recorded
    pub ordering_edges: usize,
    /// Names of registered tasks
    pub tasks: Vec<String>,
}

/// Apply `config_plan` to `tree`.
///
/// Repository registration is idempotent; applying the same plan twice
/// leaves the tree in the same state as applying it once.
pub fn apply(tree: &mut ProjectTree, config_plan: &ConfigPlan) -> Result<ConfigOutcome> {
    let mut outcome = ConfigOutcome {
        graph: EvaluationGraph::with_modules(tree.module_paths()),
        ..Default::default()
    };
    outcome.report.modules = tree.module_paths().len();

    for effect in &config_plan.effects {
        debug!(?effect, "applying effect");
        match effect {
            Effect::AddClasspath {
                coordinate,
                resolved_from,
            } => {
                outcome
                    .classpath
                    .push((coordinate.clone(), *resolved_from));
            }
            Effect::AddRepository { module, repository } => {
                let project = if module == ROOT_PATH {
                    tree.root_mut()
                } else {
                    tree.submodule_mut(module)
                        .ok_or_else(|| crate::Error::unresolved_module(module))?
                };
                if project.add_repository(*repository) {
                    outcome.report.repositories_registered += 1;
                }
            }
            Effect::SetOutputDir { module, path } => {
                if module == ROOT_PATH {
                    tree.root_mut().set_output_dir(path.clone());
                    outcome.report.root_output_dir = Some(path.clone());
                } else {
                    tree.submodule_mut(module)
                        .ok_or_else(|| crate::Error::unresolved_module(module))?
                        .set_output_dir(path.clone());
                }
            }
            Effect::EvaluateAfter {
                module,
                prerequisite,
            } => {
                outcome.graph.evaluate_after(module, prerequisite)?;
            }
            Effect::RegisterTask { name, kind } => {
                outcome.tasks.register(Task {
                    name: name.clone(),
                    kind: kind.clone(),
                });
                outcome.report.tasks.push(name.clone());
            }
        }
    }

    outcome.report.ordering_edges = outcome.graph.edge_count();
    Ok(outcome)
}

/// Plan and apply in one pass: the whole configuration step.
pub fn configure(tree: &mut ProjectTree, settings: &BuildSettings) -> Result<ConfigOutcome> {
    let config_plan = plan(tree, settings)?;
    apply(tree, &config_plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::Project;
    use std::path::Path;

    fn tree() -> ProjectTree {
        let mut tree = ProjectTree::new(Project::new("android", "/work/app/android"));
        tree.add_submodule(Project::new("app", "/work/app/android/app"))
            .unwrap();
        tree.add_submodule(Project::new("payments", "/work/app/android/payments"))
            .unwrap();
        tree
    }

    #[test]
    fn test_submodule_repositories_equal_root() {
        let mut tree = tree();
        let outcome = configure(&mut tree, &BuildSettings::default()).unwrap();
        // Three modules, two repositories each, nothing double-counted.
        assert_eq!(outcome.report.repositories_registered, 6);

        let root_repos = tree.root().repositories().to_vec();
        assert_eq!(
            root_repos,
            vec![RepositoryRef::Google, RepositoryRef::MavenCentral]
        );
        for sub in tree.submodules() {
            assert_eq!(sub.repositories(), root_repos.as_slice());
        }
    }

    #[test]
    fn test_output_dirs_redirected() {
        let mut tree = tree();
        configure(&mut tree, &BuildSettings::default()).unwrap();

        assert_eq!(tree.root().output_dir(), Path::new("/work/app/build"));
        assert_eq!(
            tree.submodule(":app").unwrap().output_dir(),
            Path::new("/work/app/build/app")
        );
        assert_eq!(
            tree.submodule(":payments").unwrap().output_dir(),
            Path::new("/work/app/build/payments")
        );
    }

    #[test]
    fn test_ordering_edges_recorded() {
        let mut tree = tree();
        let outcome = configure(&mut tree, &BuildSettings::default()).unwrap();
        assert!(outcome.graph.is_prerequisite(":app", ":payments"));
        assert_eq!(outcome.report.ordering_edges, 1);
    }

    #[test]
    fn test_clean_task_registered() {
        let mut tree = tree();
        let outcome = configure(&mut tree, &BuildSettings::default()).unwrap();
        let task = outcome.tasks.get("clean").unwrap();
        assert_eq!(
            task.kind,
            crate::tasks::TaskKind::Delete(PathBuf::from("/work/app/build"))
        );
    }

    #[test]
    fn test_classpath_recorded_with_source_repository() {
        let mut tree = tree();
        let outcome = configure(&mut tree, &BuildSettings::default()).unwrap();
        assert_eq!(outcome.classpath.len(), 1);
        assert_eq!(outcome.classpath[0].1, RepositoryRef::Google);
    }

    #[test]
    fn test_configure_twice_is_idempotent() {
        let mut once = tree();
        configure(&mut once, &BuildSettings::default()).unwrap();

        let mut twice = tree();
        configure(&mut twice, &BuildSettings::default()).unwrap();
        let first_output = twice.root().output_dir().to_path_buf();
        let outcome = configure(&mut twice, &BuildSettings::default()).unwrap();

        assert_eq!(twice.root().output_dir(), first_output);
        assert_eq!(once.root().output_dir(), twice.root().output_dir());
        for (a, b) in once.submodules().iter().zip(twice.submodules()) {
            assert_eq!(a.repositories(), b.repositories());
            assert_eq!(a.output_dir(), b.output_dir());
        }
        assert_eq!(outcome.report.ordering_edges, 1);
        // Every repository was already registered on the first pass.
        assert_eq!(outcome.report.repositories_registered, 0);
    }

    #[test]
    fn test_fatal_plan_error_leaves_tree_untouched() {
        let mut settings = BuildSettings::default();
        settings.buildscript.repositories = vec![RepositoryRef::MavenCentral];

        let mut tree = tree();
        assert!(configure(&mut tree, &settings).is_err());
        // No partial application: default output dir and empty repo lists.
        assert_eq!(
            tree.root().output_dir(),
            Path::new("/work/app/android/build")
        );
        assert!(tree.root().repositories().is_empty());
    }
}

//! Named task registry
//!
//! Tasks are data: a name and a tagged kind. Registration replaces any
//! existing task of the same name. Execution happens on demand, never
//! during configuration.

use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, info};

/// What a task does when run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum TaskKind {
    /// Recursively delete a directory if it exists
    Delete(PathBuf),
}

/// A named, on-demand action
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    /// Task name (`clean`)
    pub name: String,
    /// What the task does
    pub kind: TaskKind,
}

/// Registry of named tasks
#[derive(Debug, Clone, Default)]
pub struct TaskRegistry {
    tasks: BTreeMap<String, Task>,
}

impl TaskRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task, replacing any existing task of the same name.
    ///
    /// Returns the replaced task, if there was one.
    pub fn register(&mut self, task: Task) -> Option<Task> {
        debug!(task = %task.name, "registering task");
        self.tasks.insert(task.name.clone(), task)
    }

    /// Look up a task by name
    pub fn get(&self, name: &str) -> Option<&Task> {
        self.tasks.get(name)
    }

    /// Registered task names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tasks.keys().map(String::as_str)
    }

    /// Run a registered task by name.
    ///
    /// Failure affects this invocation only; the registry and any
    /// configuration-time state are left untouched.
    pub fn run(&self, name: &str) -> Result<()> {
        let task = self.get(name).ok_or_else(|| Error::unknown_task(name))?;
        match &task.kind {
            TaskKind::Delete(path) => {
                info!(task = %name, path = %path.display(), "deleting directory");
                match std::fs::remove_dir_all(path) {
                    Ok(()) => Ok(()),
                    // Nothing to delete is success, not an error.
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                    Err(e) => Err(Error::task_failed(name, e.to_string()).with_source(e)),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn delete_task(path: impl Into<PathBuf>) -> Task {
        Task {
            name: "clean".to_string(),
            kind: TaskKind::Delete(path.into()),
        }
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = TaskRegistry::new();
        assert!(registry.register(delete_task("/tmp/a")).is_none());
        let replaced = registry.register(delete_task("/tmp/b")).unwrap();
        assert_eq!(replaced.kind, TaskKind::Delete(PathBuf::from("/tmp/a")));
        assert_eq!(
            registry.get("clean").unwrap().kind,
            TaskKind::Delete(PathBuf::from("/tmp/b"))
        );
    }

    #[test]
    fn test_run_unknown_task_fails() {
        let registry = TaskRegistry::new();
        let err = registry.run("clean").unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::UnknownTask);
    }

    #[test]
    fn test_delete_missing_directory_is_noop() {
        let temp = tempfile::tempdir().unwrap();
        let target = temp.path().join("build");
        let mut registry = TaskRegistry::new();
        registry.register(delete_task(&target));

        registry.run("clean").unwrap();
        assert!(!target.exists());
    }

    #[test]
    fn test_delete_removes_directory_and_contents() {
        let temp = tempfile::tempdir().unwrap();
        let target = temp.path().join("build");
        fs::create_dir_all(target.join("app/outputs")).unwrap();
        fs::write(target.join("app/outputs/app.apk"), b"apk").unwrap();

        let mut registry = TaskRegistry::new();
        registry.register(delete_task(&target));
        registry.run("clean").unwrap();

        assert!(!target.exists());
        assert!(temp.path().exists());
    }
}

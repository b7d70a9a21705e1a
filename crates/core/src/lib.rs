//! Build configuration model for the Foodshare Android project
//!
//! This crate reproduces the observable effects of the Android module's root
//! Gradle configuration as an explicit, testable model:
//!
//! - **Repositories**: google + mavenCentral registered for the root and
//!   every sub-module
//! - **Buildscript classpath**: the Google Services plugin coordinate,
//!   checked against the declared repositories
//! - **Output layout**: build output redirected two levels above the module
//!   root, with per-sub-module directories derived from the new root
//! - **Evaluation ordering**: every sub-module configured after `:app`
//! - **Tasks**: a replaceable `clean` task deleting the redirected output
//!
//! Configuration is split into a pure planning step that produces a list of
//! [`plan::Effect`]s and an application step that mutates the
//! [`project::ProjectTree`]. All configuration-time errors are fatal; the
//! first error halts before any task runs.
//!
//! # Example
//!
//! ```rust,no_run
//! use buildcfg_core::project::ProjectTree;
//! use buildcfg_core::settings::BuildSettings;
//!
//! let mut tree = ProjectTree::discover("android").expect("not an Android project");
//! let settings = BuildSettings::default();
//! let outcome = buildcfg_core::apply::configure(&mut tree, &settings)
//!     .expect("configuration failed");
//! outcome.tasks.run("clean").expect("clean failed");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod apply;
pub mod error;
pub mod ordering;
pub mod paths;
pub mod plan;
pub mod project;
pub mod repository;
pub mod settings;
pub mod tasks;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::apply::{configure, ConfigOutcome, ConfigReport};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::ordering::EvaluationGraph;
    pub use crate::plan::{plan, ConfigPlan, Effect};
    pub use crate::project::{Project, ProjectTree};
    pub use crate::repository::{Coordinate, RepositoryRef};
    pub use crate::settings::BuildSettings;
    pub use crate::tasks::{Task, TaskKind, TaskRegistry};
}

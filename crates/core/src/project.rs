//! Project tree model
//!
//! A [`Project`] is a named build unit with a configurable output directory
//! and repository list. The host (CLI discovery or tests) creates the tree;
//! configuration only mutates attributes, it never creates or destroys
//! projects.

use crate::error::{Error, ErrorCode, Result};
use crate::paths;
use crate::repository::RepositoryRef;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Gradle build file names that mark a directory as a module
const BUILD_FILES: &[&str] = &["build.gradle.kts", "build.gradle"];

/// A single build unit (root or sub-module)
#[derive(Debug, Clone)]
pub struct Project {
    name: String,
    dir: PathBuf,
    output_dir: PathBuf,
    repositories: Vec<RepositoryRef>,
}

impl Project {
    /// Create a project rooted at `dir` with the default output directory
    /// (`<dir>/build`).
    pub fn new(name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let output_dir = dir.join("build");
        Self {
            name: name.into(),
            dir,
            output_dir,
            repositories: Vec::new(),
        }
    }

    /// The project's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The project's source directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The current build output directory
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Redirect the build output directory
    pub fn set_output_dir(&mut self, path: impl Into<PathBuf>) {
        self.output_dir = path.into();
    }

    /// The registered repositories, in registration order
    pub fn repositories(&self) -> &[RepositoryRef] {
        &self.repositories
    }

    /// Register a repository. Registering the same repository twice neither
    /// duplicates the entry nor changes resolution order.
    ///
    /// Returns `true` if the repository was newly registered.
    pub fn add_repository(&mut self, repository: RepositoryRef) -> bool {
        if self.repositories.contains(&repository) {
            false
        } else {
            self.repositories.push(repository);
            true
        }
    }
}

/// The root project and its direct sub-modules
#[derive(Debug, Clone)]
pub struct ProjectTree {
    root: Project,
    submodules: Vec<Project>,
}

impl ProjectTree {
    /// Create a tree with no sub-modules
    pub fn new(root: Project) -> Self {
        Self {
            root,
            submodules: Vec::new(),
        }
    }

    /// Build a tree by scanning `root_dir` for Gradle modules.
    ///
    /// The root directory itself must contain a build file; every direct
    /// child directory with a build file becomes a sub-module. Sub-modules
    /// are ordered by name so repeated scans produce identical trees.
    pub fn discover(root_dir: impl AsRef<Path>) -> Result<Self> {
        let root_dir = paths::absolutize(root_dir.as_ref())?;
        if !has_build_file(&root_dir) {
            return Err(Error::new(
                ErrorCode::InvalidPath,
                format!("No Gradle build file in {}", root_dir.display()),
            )
            .with_suggestion("Point at the android/ directory of the project"));
        }

        let root_name = root_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "root".to_string());
        let mut tree = Self::new(Project::new(root_name, &root_dir));

        let mut dirs: Vec<PathBuf> = WalkDir::new(&root_dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|entry| entry.file_type().is_dir() && has_build_file(entry.path()))
            .map(|entry| entry.into_path())
            .collect();
        dirs.sort();

        for dir in dirs {
            let name = dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            tree.add_submodule(Project::new(name, dir))?;
        }
        Ok(tree)
    }

    /// The root project
    pub fn root(&self) -> &Project {
        &self.root
    }

    /// Mutable access to the root project
    pub fn root_mut(&mut self) -> &mut Project {
        &mut self.root
    }

    /// The direct sub-modules, in name order
    pub fn submodules(&self) -> &[Project] {
        &self.submodules
    }

    /// Register a sub-module under the root
    pub fn add_submodule(&mut self, project: Project) -> Result<()> {
        if self.submodules.iter().any(|p| p.name() == project.name()) {
            return Err(Error::duplicate_module(&module_path(project.name())));
        }
        self.submodules.push(project);
        Ok(())
    }

    /// Look up a sub-module by Gradle path (`:app`)
    pub fn submodule(&self, path: &str) -> Option<&Project> {
        let name = path.strip_prefix(':').unwrap_or(path);
        self.submodules.iter().find(|p| p.name() == name)
    }

    /// Mutable lookup by Gradle path
    pub fn submodule_mut(&mut self, path: &str) -> Option<&mut Project> {
        let name = path.strip_prefix(':').unwrap_or(path);
        self.submodules.iter_mut().find(|p| p.name() == name)
    }

    /// Whether a module path refers to the root or an existing sub-module
    pub fn contains(&self, path: &str) -> bool {
        path == ROOT_PATH || self.submodule(path).is_some()
    }

    /// Gradle paths of every module, root first
    pub fn module_paths(&self) -> Vec<String> {
        let mut paths = vec![ROOT_PATH.to_string()];
        paths.extend(self.submodules.iter().map(|p| module_path(p.name())));
        paths
    }

    /// Iterate over every project, root first
    pub fn iter(&self) -> impl Iterator<Item = &Project> {
        std::iter::once(&self.root).chain(self.submodules.iter())
    }
}

/// Gradle path of the root project
pub const ROOT_PATH: &str = ":";

/// Gradle path for a sub-module name (`app` → `:app`)
pub fn module_path(name: &str) -> String {
    format!(":{name}")
}

fn has_build_file(dir: &Path) -> bool {
    BUILD_FILES.iter().any(|f| dir.join(f).is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn gradle_module(root: &Path, name: &str) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("build.gradle.kts"), "// module").unwrap();
    }

    #[test]
    fn test_default_output_dir() {
        let project = Project::new("app", "/work/android/app");
        assert_eq!(project.output_dir(), Path::new("/work/android/app/build"));
    }

    #[test]
    fn test_add_repository_is_idempotent() {
        let mut project = Project::new("app", "/work/android/app");
        assert!(project.add_repository(RepositoryRef::Google));
        assert!(project.add_repository(RepositoryRef::MavenCentral));
        assert!(!project.add_repository(RepositoryRef::Google));
        assert_eq!(
            project.repositories(),
            &[RepositoryRef::Google, RepositoryRef::MavenCentral]
        );
    }

    #[test]
    fn test_discover_finds_direct_submodules() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path().join("android");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("build.gradle.kts"), "// root").unwrap();
        gradle_module(&root, "app");
        gradle_module(&root, "feature_home");
        // A plain directory without a build file is not a module.
        fs::create_dir_all(root.join("gradle")).unwrap();

        let tree = ProjectTree::discover(&root).unwrap();
        let names: Vec<&str> = tree.submodules().iter().map(Project::name).collect();
        assert_eq!(names, vec!["app", "feature_home"]);
        assert!(tree.contains(":app"));
        assert!(!tree.contains(":gradle"));
    }

    #[test]
    fn test_discover_rejects_non_module_root() {
        let temp = tempfile::tempdir().unwrap();
        let err = ProjectTree::discover(temp.path()).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidPath);
    }

    #[test]
    fn test_duplicate_submodule_rejected() {
        let mut tree = ProjectTree::new(Project::new("android", "/work/android"));
        tree.add_submodule(Project::new("app", "/work/android/app"))
            .unwrap();
        let err = tree
            .add_submodule(Project::new("app", "/work/android/app"))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateModule);
    }

    #[test]
    fn test_module_paths_root_first() {
        let mut tree = ProjectTree::new(Project::new("android", "/work/android"));
        tree.add_submodule(Project::new("app", "/work/android/app"))
            .unwrap();
        assert_eq!(tree.module_paths(), vec![":".to_string(), ":app".to_string()]);
    }
}

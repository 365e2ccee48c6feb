//! Directory-backed catalog of task definitions.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

use super::{TaskDefinition, load_task};
use crate::error::{Result, TaskError};

const TASK_EXTENSIONS: &[&str] = &["yml", "yaml"];

/// An index of the task definitions found in one directory.
///
/// Task names are file stems: `tasks/start.yml` is the task `start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskCatalog {
    dir: Utf8PathBuf,
    entries: Vec<(String, Utf8PathBuf)>,
}

impl TaskCatalog {
    /// Index every `*.yml` and `*.yaml` file in `dir`, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns `TaskError::NotFound` when the directory does not exist and
    /// `TaskError::ReadFailed` when it cannot be listed.
    pub fn open(dir: impl Into<Utf8PathBuf>) -> Result<Self> {
        let dir_path = dir.into();
        let handle = Dir::open_ambient_dir(&dir_path, ambient_authority())
            .map_err(|e| listing_error(&dir_path, &e))?;
        let listing = handle
            .entries()
            .map_err(|e| listing_error(&dir_path, &e))?;

        let mut entries = Vec::new();
        for entry in listing {
            let dir_entry = entry.map_err(|e| listing_error(&dir_path, &e))?;
            let is_file = dir_entry
                .file_type()
                .map_err(|e| listing_error(&dir_path, &e))?
                .is_file();
            if !is_file {
                continue;
            }
            let file_name = dir_entry
                .file_name()
                .map_err(|e| listing_error(&dir_path, &e))?;
            if let Some(name) = task_name(&file_name) {
                entries.push((name, dir_path.join(&file_name)));
            }
        }
        entries.sort();

        Ok(Self {
            dir: dir_path,
            entries,
        })
    }

    /// Return the catalog directory.
    #[must_use]
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    /// Return task names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Return the definition file backing `name`.
    #[must_use]
    pub fn path_of(&self, name: &str) -> Option<&Utf8Path> {
        self.entries
            .iter()
            .find(|(entry_name, _)| entry_name == name)
            .map(|(_, path)| path.as_path())
    }

    /// Load the definition for `name`.
    ///
    /// # Errors
    ///
    /// Returns `TaskError::UnknownTask` when the catalog has no such task,
    /// and any error from [`load_task`].
    pub fn load(&self, name: &str) -> Result<TaskDefinition> {
        let path = self.path_of(name).ok_or_else(|| TaskError::UnknownTask {
            name: String::from(name),
            dir: self.dir.clone(),
        })?;
        load_task(path)
    }

    /// Load every definition in name order.
    ///
    /// # Errors
    ///
    /// Fails on the first definition that cannot be loaded.
    pub fn load_all(&self) -> Result<Vec<(String, TaskDefinition)>> {
        self.entries
            .iter()
            .map(|(name, path)| load_task(path).map(|definition| (name.clone(), definition)))
            .collect()
    }
}

/// Turn a task reference into a definition path.
///
/// References that look like paths (a separator or a task-file extension)
/// are used as given. Anything else is a task name under `tasks_dir`,
/// matching the first existing `<name>.yml` or `<name>.yaml` the way
/// [`TaskCatalog::open`] indexes them. A name with no file on disk maps to
/// `<name>.yml` so the load error names a concrete path.
#[must_use]
pub fn locate_task(reference: &str, tasks_dir: &Utf8Path) -> Utf8PathBuf {
    let candidate = Utf8Path::new(reference);
    let looks_like_path = reference.contains(std::path::MAIN_SEPARATOR)
        || reference.contains('/')
        || candidate
            .extension()
            .is_some_and(|ext| TASK_EXTENSIONS.contains(&ext));

    if looks_like_path {
        return candidate.to_owned();
    }

    let mut paths = TASK_EXTENSIONS
        .iter()
        .map(|ext| tasks_dir.join(format!("{reference}.{ext}")));
    let fallback = tasks_dir.join(format!("{reference}.yml"));
    paths.find(|path| path.is_file()).unwrap_or(fallback)
}

fn task_name(file_name: &str) -> Option<String> {
    let path = Utf8Path::new(file_name);
    let ext = path.extension()?;
    if !TASK_EXTENSIONS.contains(&ext) {
        return None;
    }
    path.file_stem().map(String::from)
}

fn listing_error(dir: &Utf8Path, error: &io::Error) -> TaskError {
    if error.kind() == io::ErrorKind::NotFound {
        TaskError::NotFound {
            path: dir.to_owned(),
        }
    } else {
        TaskError::ReadFailed {
            path: dir.to_owned(),
            message: error.to_string(),
        }
    }
}

//! Filesystem content store.
//!
//! Each immediate subdirectory of the content root is one course:
//!
//! ```text
//! <root>/<data_dir>/course.json
//! <root>/<data_dir>/about/<key>.html
//! <root>/<data_dir>/info/<key>.html
//! <root>/<data_dir>/images/...
//! ```
//!
//! The catalogue is loaded once when the store is opened. Resource reads go
//! through a `cap_std` directory handle, so paths cannot escape the course's
//! data directory.

mod manifest;

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::ports::{
    CatalogEntry, CourseResources, CourseStore, CourseStoreError, ResourceError, ResourcePath,
};
use crate::domain::{Course, CourseId};

pub use manifest::{CourseManifest, MANIFEST_FILE};

/// Errors raised while opening the content root.
#[derive(Debug, Error)]
pub enum ContentStoreError {
    /// The root directory could not be opened or listed.
    #[error("failed to read content root {path}: {source}")]
    Root {
        /// Content root that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Content store backed by a directory tree.
#[derive(Debug)]
pub struct FsCourseStore {
    root: Dir,
    entries: Vec<CatalogEntry>,
    by_id: BTreeMap<CourseId, Course>,
}

impl FsCourseStore {
    /// Open `path` and load every course manifest beneath it.
    ///
    /// Directories whose manifest is missing or malformed are kept as
    /// [`CatalogEntry::Errored`] and logged; only an unreadable root fails.
    pub fn open(path: &Path) -> Result<Self, ContentStoreError> {
        let root = Dir::open_ambient_dir(path, ambient_authority()).map_err(|source| {
            ContentStoreError::Root {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let dirs = course_dirs(&root).map_err(|source| ContentStoreError::Root {
            path: path.to_path_buf(),
            source,
        })?;

        let mut entries = Vec::with_capacity(dirs.len());
        let mut by_id = BTreeMap::new();
        for data_dir in dirs {
            match load_course(&root, &data_dir) {
                Ok(course) => {
                    if let Some(previous) = by_id.insert(course.id().clone(), course.clone()) {
                        warn!(
                            course = %course.id(),
                            data_dir = %data_dir,
                            shadowed = previous.data_dir(),
                            "duplicate course id; later directory wins"
                        );
                        entries.retain(|entry| {
                            !matches!(entry, CatalogEntry::Course(c) if c.id() == course.id())
                        });
                    }
                    entries.push(CatalogEntry::Course(course));
                }
                Err(reason) => {
                    warn!(data_dir = %data_dir, reason = %reason, "failed to load course");
                    entries.push(CatalogEntry::Errored { data_dir, reason });
                }
            }
        }
        info!(
            root = %path.display(),
            courses = by_id.len(),
            errored = entries.len() - by_id.len(),
            "content store loaded"
        );
        Ok(Self {
            root,
            entries,
            by_id,
        })
    }

    /// Number of courses that loaded.
    #[must_use]
    pub fn course_count(&self) -> usize {
        self.by_id.len()
    }
}

fn course_dirs(root: &Dir) -> io::Result<Vec<String>> {
    let mut dirs = Vec::new();
    for entry in root.entries()? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) if !name.starts_with('.') => dirs.push(name),
            Ok(_) => {}
            Err(name) => warn!(?name, "skipping non UTF-8 course directory"),
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn load_course(root: &Dir, data_dir: &str) -> Result<Course, String> {
    let path = Path::new(data_dir).join(MANIFEST_FILE);
    let raw = root
        .read_to_string(&path)
        .map_err(|err| format!("cannot read {MANIFEST_FILE}: {err}"))?;
    let manifest: CourseManifest = serde_json::from_str(&raw)
        .map_err(|err| format!("malformed {MANIFEST_FILE}: {err}"))?;
    manifest
        .into_course(data_dir)
        .map_err(|err| format!("invalid course id: {err}"))
}

fn map_io_error(path: &ResourcePath, err: &io::Error) -> ResourceError {
    if err.kind() == io::ErrorKind::NotFound {
        ResourceError::not_found(path.as_str())
    } else {
        ResourceError::io(path.as_str(), err.to_string())
    }
}

#[async_trait]
impl CourseStore for FsCourseStore {
    async fn get_course(&self, id: &CourseId) -> Result<Option<Course>, CourseStoreError> {
        Ok(self.by_id.get(id).cloned())
    }

    async fn list_courses(&self) -> Result<Vec<CatalogEntry>, CourseStoreError> {
        Ok(self.entries.clone())
    }
}

#[async_trait]
impl CourseResources for FsCourseStore {
    async fn read(&self, course: &Course, path: &ResourcePath) -> Result<Vec<u8>, ResourceError> {
        let course_dir = self
            .root
            .open_dir(course.data_dir())
            .map_err(|err| map_io_error(path, &err))?;
        course_dir
            .read(path.as_str())
            .map_err(|err| map_io_error(path, &err))
    }
}

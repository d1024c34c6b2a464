use std::fs;
use std::path::{Path, PathBuf};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::errors::*;

/// Invokes a handler on the watcher thread whenever a single file is modified or
/// (re)created. The parent directory is watched, so editors that save by renaming a
/// temporary file are noticed too. Watching stops when the `FileWatcher` is dropped.
pub struct FileWatcher {
    path: PathBuf,
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    pub fn new<P, F>(path: P, handler: F) -> Result<FileWatcher>
    where
        P: AsRef<Path>,
        F: Fn() + Send + 'static,
    {
        let path = fs::canonicalize(path.as_ref())
            .map_err(|err| Error::Io(format!("{}: {}", path.as_ref().display(), err)))?;

        let parent = path
            .parent()
            .map(|v| v.to_path_buf())
            .ok_or_else(|| Error::Watch(format!("{} has no parent directory", path.display())))?;

        let file = path.clone();
        let mut watcher = notify::recommended_watcher(move |res: ::std::result::Result<Event, notify::Error>| {
            match res {
                Ok(event) => {
                    if is_change_of(&event, &file) {
                        handler();
                    }
                }
                Err(err) => warn!("File watcher of {} failed, {}", file.display(), err),
            }
        })?;

        watcher.watch(&parent, RecursiveMode::NonRecursive)?;

        Ok(FileWatcher {
            path,
            _watcher: watcher,
        })
    }

    /// Canonical path of the watched file.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ::std::fmt::Debug for FileWatcher {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        write!(f, "FileWatcher({})", self.path.display())
    }
}

/// Returns true if `event` modifies or creates `file`.
pub fn is_change_of(event: &Event, file: &Path) -> bool {
    match event.kind {
        EventKind::Modify(_) | EventKind::Create(_) => {}
        _ => return false,
    }

    event.paths.iter().any(|v| {
        v == file
            || fs::canonicalize(v)
                .map(|v| v == file)
                .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, DataChange, ModifyKind, RemoveKind};

    #[test]
    fn filter() {
        let file = Path::new("/shaders/sprite.fs");

        let modify = Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content))).add_path(file.into());
        assert!(is_change_of(&modify, file));

        let create = Event::new(EventKind::Create(CreateKind::File)).add_path(file.into());
        assert!(is_change_of(&create, file));

        let remove = Event::new(EventKind::Remove(RemoveKind::File)).add_path(file.into());
        assert!(!is_change_of(&remove, file));

        let access = Event::new(EventKind::Access(AccessKind::Any)).add_path(file.into());
        assert!(!is_change_of(&access, file));

        let sibling =
            Event::new(EventKind::Modify(ModifyKind::Any)).add_path(PathBuf::from("/shaders/sprite.vs"));
        assert!(!is_change_of(&sibling, file));
    }
}

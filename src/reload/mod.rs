//! Coordinates hot reloads between file watcher threads and the thread owning the GL
//! context.
//!
//! Reload targets never leave their thread. Instead, each target is registered in a
//! thread-local registry under a stable id, and watchers post `(id, generation)` pairs
//! into a `TaskQueue`. When the queue is executed, the id is resolved back into the
//! target. Requests whose target is gone, or whose generation has been superseded by a
//! newer `AutoReload`, are dropped.

pub mod watcher;

pub use self::watcher::FileWatcher;

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::*;
use crate::sched::TaskQueue;

/// Something that could be rebuilt in place.
pub trait Reload {
    /// Rebuilds the target. The previous state must be kept intact on failure.
    fn reload(&mut self) -> Result<()>;

    /// Invoked after a successful `reload`, with no borrow of the target held.
    fn reloaded_callback(&self) -> Option<Rc<dyn Fn()>> {
        None
    }
}

pub type ReloadTarget = Weak<RefCell<dyn Reload>>;

struct Entry {
    generation: usize,
    target: ReloadTarget,
}

thread_local! {
    static REGISTRY: RefCell<HashMap<usize, Entry>> = RefCell::new(HashMap::new());
}

static UIDS: AtomicUsize = AtomicUsize::new(1);
static GENERATIONS: AtomicUsize = AtomicUsize::new(1);

/// Allocates a stable id for a reload target.
pub fn next_uid() -> usize {
    UIDS.fetch_add(1, Ordering::Relaxed)
}

/// Reloads the target registered as `uid` on the current thread, if it still exists and
/// `generation` is the latest one. Returns true if the target has been reloaded.
pub fn dispatch(uid: usize, generation: usize) -> bool {
    let target = REGISTRY.with(|registry| {
        let mut registry = registry.borrow_mut();
        let target = match registry.get(&uid) {
            Some(entry) if entry.generation == generation => entry.target.upgrade(),
            _ => return None,
        };

        if target.is_none() {
            registry.remove(&uid);
        }

        target
    });

    let target = match target {
        Some(v) => v,
        None => {
            debug!("Dropped stale reload request of target {} ({}).", uid, generation);
            return false;
        }
    };

    let callback = {
        let mut target = match target.try_borrow_mut() {
            Ok(v) => v,
            Err(_) => {
                warn!("Reload target {} is busy, request discarded.", uid);
                return false;
            }
        };

        if let Err(err) = target.reload() {
            warn!("Failed to reload target {}, {}", uid, err);
            return false;
        }

        target.reloaded_callback()
    };

    info!("Target {} has been reloaded.", uid);
    if let Some(callback) = callback {
        callback();
    }

    true
}

/// Posts reload requests of one target into a `TaskQueue`. While a request is pending,
/// further triggers are coalesced into it.
#[derive(Clone)]
pub struct ReloadTrigger {
    uid: usize,
    generation: usize,
    pending: Arc<AtomicBool>,
    queue: TaskQueue,
}

impl ReloadTrigger {
    pub fn fire(&self) {
        if self.pending.swap(true, Ordering::AcqRel) {
            return;
        }

        debug!("Queued reload request of target {}.", self.uid);

        let uid = self.uid;
        let generation = self.generation;
        let pending = self.pending.clone();
        self.queue.push(move || {
            pending.store(false, Ordering::Release);
            dispatch(uid, generation);
        });
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }
}

impl ::std::fmt::Debug for ReloadTrigger {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        write!(f, "ReloadTrigger({}, {})", self.uid, self.generation)
    }
}

/// Registration of a reload target on the current thread, along with the file watchers
/// that trigger it. Dropping it stops watching and unregisters the target.
pub struct AutoReload {
    uid: usize,
    generation: usize,
    trigger: ReloadTrigger,
    watchers: Vec<FileWatcher>,
}

impl AutoReload {
    /// Registers `target` as `uid`, superseding any previous registration of the same id.
    pub fn new(uid: usize, target: ReloadTarget, queue: TaskQueue) -> AutoReload {
        let generation = GENERATIONS.fetch_add(1, Ordering::Relaxed);

        REGISTRY.with(|registry| {
            registry
                .borrow_mut()
                .insert(uid, Entry { generation, target });
        });

        AutoReload {
            uid,
            generation,
            trigger: ReloadTrigger {
                uid,
                generation,
                pending: Arc::new(AtomicBool::new(false)),
                queue,
            },
            watchers: Vec::new(),
        }
    }

    /// Fires a reload request whenever `path` changes.
    pub fn watch<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let trigger = self.trigger.clone();
        let watcher = FileWatcher::new(path, move || trigger.fire())?;
        self.watchers.push(watcher);
        Ok(())
    }

    #[inline]
    pub fn trigger(&self) -> ReloadTrigger {
        self.trigger.clone()
    }

    #[inline]
    pub fn uid(&self) -> usize {
        self.uid
    }

    #[inline]
    pub fn generation(&self) -> usize {
        self.generation
    }

    #[inline]
    pub fn watchers(&self) -> &[FileWatcher] {
        &self.watchers
    }
}

impl Drop for AutoReload {
    fn drop(&mut self) {
        let (uid, generation) = (self.uid, self.generation);

        // The registry might be gone already during thread teardown.
        let _ = REGISTRY.try_with(|registry| {
            if let Ok(mut registry) = registry.try_borrow_mut() {
                let current = registry.get(&uid).map(|v| v.generation);
                if current == Some(generation) {
                    registry.remove(&uid);
                }
            }
        });
    }
}

impl ::std::fmt::Debug for AutoReload {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        f.debug_struct("AutoReload")
            .field("uid", &self.uid)
            .field("generation", &self.generation)
            .field("watchers", &self.watchers)
            .finish()
    }
}

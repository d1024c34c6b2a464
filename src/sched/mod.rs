//! A FIFO of closures that could be pushed from any thread, and executed on the thread
//! that owns the GL context.
//!
//! The global queue returned by `main_thread` is where file watchers post shader rebuild
//! requests. Applications are expected to drain it once per frame:
//!
//! ```rust,ignore
//! loop {
//!     gloss::sched::main_thread().execute();
//!     // draw...
//! }
//! ```

mod unwind;

pub use self::unwind::halt_unwinding;

use std::sync::Arc;

use crossbeam_deque::{Injector, Steal};

pub type Task = Box<dyn FnOnce() + Send>;

#[derive(Clone, Default)]
pub struct TaskQueue {
    tasks: Arc<Injector<Task>>,
}

impl TaskQueue {
    pub fn new() -> Self {
        TaskQueue {
            tasks: Arc::new(Injector::new()),
        }
    }

    /// Enqueues `func`, this never blocks.
    pub fn push<F>(&self, func: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.tasks.push(Box::new(func));
    }

    /// Runs the tasks that were queued when this method was called, in the order they were
    /// pushed. Tasks pushed while executing are left to the next call. A panicking task is
    /// logged and does not prevent the others from running.
    ///
    /// Returns the number of executed tasks.
    pub fn execute(&self) -> usize {
        let mut remains = self.tasks.len();
        let mut executed = 0;

        while remains > 0 {
            match self.tasks.steal() {
                Steal::Success(task) => {
                    remains -= 1;
                    executed += 1;

                    if let Err(payload) = halt_unwinding(task) {
                        error!("Task panicked: {}", unwind::describe_panic(&payload));
                    }
                }
                Steal::Retry => continue,
                Steal::Empty => break,
            }
        }

        executed
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl ::std::fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        write!(f, "TaskQueue({})", self.len())
    }
}

lazy_static! {
    static ref MAIN_THREAD: TaskQueue = TaskQueue::new();
}

/// The queue drained by the thread owning the GL context.
#[inline]
pub fn main_thread() -> &'static TaskQueue {
    &MAIN_THREAD
}

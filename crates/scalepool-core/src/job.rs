//! The tagged `Job` variant queued by the pool.
//!
//! Replaces the C union `work_item` (`adaptive_tpool.c`'s
//! `typedef union work_item { user_function uf; scaling_command sc; }`) with
//! an explicit sum type, per the remedy in `spec.md` §9 ("Opaque-pointer
//! polymorphism over queue items"). The C `tfunc f; void* arg;` pair becomes
//! a single owned `FnOnce` closure — the function pointer and its opaque
//! argument handle are one Rust value instead of two raw pointers threaded
//! through manual lifetime bookkeeping.

/// A scaling command pushed to the front of the job queue by the adapter's
/// decision (§4.4) or a direct `Pool::scale` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleCommand {
    /// Spawn one additional worker.
    Clone,
    /// The popping worker should exit its loop.
    Terminate,
}

/// A user-submitted unit of work: an opaque closure, run to completion on
/// whichever worker pops it.
pub type UserJob = Box<dyn FnOnce() + Send + 'static>;

/// One entry in the job queue.
pub enum Job {
    /// Opaque work submitted via `Pool::submit`.
    User(UserJob),
    /// An in-band roster-mutation command.
    Scale(ScaleCommand),
}

impl Job {
    /// Construct a user job from any `FnOnce() + Send` closure.
    pub fn user<F>(f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Job::User(Box::new(f))
    }

    pub fn scale(cmd: ScaleCommand) -> Self {
        Job::Scale(cmd)
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Job::User(_))
    }
}

impl std::fmt::Debug for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Job::User(_) => f.write_str("Job::User(..)"),
            Job::Scale(cmd) => write!(f, "Job::Scale({cmd:?})"),
        }
    }
}

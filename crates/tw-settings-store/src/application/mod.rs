//! Application layer: the policies the store applies around storage.
//!
//! - **`scheduler`** – the synchronous debounce gate in front of every
//!   commit, and the [`Clock`](scheduler::Clock) abstraction it reads.
//! - **`status`**    – the last load and save outcome, as shown to operators.
//!
//! Nothing here touches the filesystem.  The scheduler is handed the commit
//! as a closure and only decides whether to run it.

pub mod scheduler;
pub mod status;

//! recallsync Sync - Optimistic mutation pipeline
//!
//! Provides:
//! - Write-through mutations with optimistic cache patches
//! - Exact rollback under concurrent mutations via per-key snapshot stacks
//! - Post-commit invalidation fan-out
//! - Background refetch of invalidated keys
//!
//! ## Modules
//!
//! - [`coordinator`] - [`MutationCoordinator`], the single write path
//! - [`snapshot`] - Per-key pending-mutation snapshot stacks
//! - [`refetch`] - Worker draining the cache's refetch queue
//!
//! ## Write Flow
//!
//! 1. Capture a snapshot of every touched key and push a pending frame
//! 2. Apply the optimistic patch (`Fetching` status, synthesized value)
//! 3. Call the remote gateway - the only suspension point
//! 4. On success: commit the confirmed value, then invalidate derived keys
//! 5. On failure: restore the snapshot that was live when this mutation
//!    began, and propagate the typed error; derived keys stay untouched

pub mod coordinator;
pub mod refetch;
pub mod snapshot;

pub use coordinator::{MutationCoordinator, MutationOutcome};
pub use refetch::RefetchWorker;
pub use snapshot::{PendingFrame, Settled, SnapshotStacks};

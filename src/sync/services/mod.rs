//! Application services for task sync orchestration.

mod reconciler;
mod report;

pub use reconciler::{Reconciler, ReconcilerConfig};
pub use report::{ActionError, SyncError, SyncReport, SyncResult};

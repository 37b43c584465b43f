pub mod diff;
pub mod lists;
pub mod sync;

pub use diff::{difference, to_trakt_item, trakt_kind, Difference};
pub use lists::{orphaned_lists, selected_list_ids};
pub use sync::{ListReport, SyncOptions, SyncOrchestrator, SyncResult};

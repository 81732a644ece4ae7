pub mod controller;
pub mod logging;
pub mod options;
pub mod snapshot;

pub use controller::{BackendController, CommandError, CommandResult};
pub use options::BackendOptions;
pub use snapshot::{DirectorySnapshot, DocumentSnapshot, FileSnapshot, NotificationSnapshot, RecentSnapshot};

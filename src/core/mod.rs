pub mod connectivity;
pub mod dedup;
pub mod engine;
pub mod journal;
pub mod log;
pub mod roster;
pub mod store;
pub mod sync;

pub use connectivity::{ConnectivityMonitor, ConnectivityStatus, Transition};
pub use engine::{Command, Engine, EngineOptions, Outcome};
pub use journal::{Journal, NullJournal};
pub use roster::{RawIdentifier, RosterIndex, RosterRow, normalize_identifier};
pub use store::SessionContext;
pub use sync::{DrainReport, Reconciler, SyncQueue};

//! High-level operations behind the CLI commands
//!
//! - `CreateOperation`: extract stubs from a device and register them
//! - `AddOperation`: resolve a stub, register it, sync the manifest
//! - `RemoveOperation`: unregister a stub and drop it from the manifest
//! - `ListOperation`: group installed stubs by firmware family
//!
//! Operations borrow the registry and source through their traits and never
//! print; the command layer renders their outcomes.

pub mod add;
pub mod create;
pub mod list;
pub mod remove;

pub use add::{AddOperation, AddOptions, AddOutcome};
pub use create::{CreateOperation, CreateOptions, CreateOutcome};
pub use list::{ListOperation, ListReport, ListScope};
pub use remove::RemoveOperation;

//! Game record types shared across the PlayVault launch core.
//!
//! The library collaborator (catalog, settings, IPC layer) owns and mutates
//! these records; the launch core only reads them.

mod types;

pub use types::GameRecord;

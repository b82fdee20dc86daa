//! Process launching for PlayVault.
//!
//! Turns a stored game record into a running, tracked process: the
//! [`Supervisor`] resolves an executable via `playvault-discovery`, passes
//! it through the [`validate`] security gate, spawns the game detached from
//! the launcher's own lifecycle, and supervises it until exit or
//! [`Supervisor::stop`].

mod error;
mod supervisor;
mod validate;

pub use error::LaunchError;
pub use supervisor::{SKIP_SPLASH_ENV, Supervisor};
pub use validate::{ValidationError, validate};

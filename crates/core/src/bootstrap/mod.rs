//! Credential bootstrap rendezvous.
//!
//! On startup an external generator may have to produce the client
//! certificate and key before any TLS context can be built. It runs as a
//! separate task; the main flow blocks on a one-shot signal until the
//! generator reports completion, then loads the credentials.

mod config;
mod task;

pub use config::BootstrapConfig;
pub use task::{spawn_bootstrap, BootstrapError, BootstrapSignal};

//! Shared foundations for the Confab dispatcher.
//!
//! Defines the domain types exchanged between the transport, the routing
//! pipeline, and the persistence layer, plus configuration, the error
//! taxonomy, and the logging bootstrap.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::ConfabConfig;
pub use error::{ConfabError, Result};
pub use types::*;

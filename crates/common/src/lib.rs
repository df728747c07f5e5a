//! Types shared by the AIP SDK crates

mod error;
mod secret;

pub use error::{Error, Result};
pub use secret::Secret;

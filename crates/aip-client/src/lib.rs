//! Authenticated client for the AIP cloud API family
//!
//! `AipClient` is what endpoint wrappers hold. Each call runs through the
//! `Authenticator` hooks:
//! 1. `before_request()` refreshes the bearer token when due, feeding the
//!    auth-mode machine on the way
//! 2. `attach_auth()` adds either the `access_token` parameter or the
//!    BCE-Auth-V1 signature headers
//! 3. The transport sends the request
//! 4. `after_response()` feeds the IAM outcome of a speculative signed call
//!    back into the machine and asks for a replay if the guess was wrong
//!
//! Callers only ever see the parsed JSON body or an `Error` that renders as
//! the general-error object.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
mod telemetry;

pub use auth::{AppliedAuth, Authenticator, ResponseAction};
pub use client::AipClient;
pub use config::ClientConfig;
pub use error::{Error, Result};

#[cfg(test)]
mod testing;

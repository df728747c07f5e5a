//! Credential resolution for the AIP cloud API family
//!
//! A key pair handed to the SDK may be a developer API key (OAuth2 client
//! credentials, bearer token in the query string) or a cloud access key
//! (BCE-Auth-V1 request signing). Nothing in the key says which, so the
//! client finds out by behaviour and remembers the answer.
//!
//! Discovery flow:
//! 1. `token::exchange()` trades the key pair for a bearer token (Signal A)
//! 2. `signal::scopes_grant_access()` checks the granted scopes (Signal B)
//! 3. The first signed call's response feeds `signal::is_iam_rejection()` (Signal C)
//! 4. Each signal goes through `mode::advance()` until a terminal mode is reached
//! 5. `TokenCache` keeps the bearer token until a day before it expires

pub mod cache;
pub mod constants;
pub mod credential;
pub mod error;
pub mod mode;
pub mod signal;
pub mod token;

pub use cache::{TokenCache, TokenSnapshot};
pub use constants::*;
pub use credential::Credential;
pub use error::{Error, Result};
pub use mode::{AuthMode, SigningStrategy, advance};
pub use signal::{is_iam_rejection, scopes_grant_access};
pub use token::{TokenGrant, exchange, parse_token_response};

//! Authentication types.
//!
//! A [`Session`] is produced by [`Client::login`](crate::Client::login) and
//! supplies the bearer token for every authenticated call.

mod credentials;
mod session;
mod tokens;

pub use credentials::Credentials;
pub use session::Session;
pub use tokens::{AccessToken, RefreshToken};

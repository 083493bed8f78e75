//! XRPC client implementation.
//!
//! This module provides the HTTP plumbing for AT Protocol XRPC calls and the
//! request/response shapes of the three endpoints the post pipeline uses.

mod client;
mod endpoints;

pub use client::decode_response;
pub(crate) use client::XrpcClient;
pub use endpoints::{CREATE_RECORD, CREATE_SESSION, POST_COLLECTION, UPLOAD_BLOB};
pub(crate) use endpoints::*;

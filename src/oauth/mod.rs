//! OAuth 1.0a out-of-band authorization
//!
//! # Module Layout
//!
//! - [`handshake`] -- handshake context and the two signed provider calls
//! - [`types`]     -- consumer, request token and access credential types

pub mod handshake;
pub mod types;

pub use handshake::{Endpoints, OAuthHandshake, OOB_CALLBACK};
pub use types::{AccessCredentials, ConsumerCredentials, RequestToken};

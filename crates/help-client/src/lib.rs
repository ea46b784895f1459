//! Steam help-site client for package removal.
//!
//! Sends the same request the "remove this product from my account" wizard
//! sends, authenticated with the browser session cookies, and applies a
//! strict reading of the reply: only `"success": true` counts.

pub mod client;
pub mod types;

pub use client::{Client, ClientError, DEFAULT_ENDPOINT};
pub use types::{Credentials, SuccessFlag};

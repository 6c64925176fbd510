// exported modules
pub mod error;
pub mod model;

// client impls
pub mod client;

// re-exports
pub use client::{ping, ApiClient, ClientContext};
pub use error::*;
pub use model::*;

// internal modules
mod http;

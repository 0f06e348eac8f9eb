#[allow(clippy::module_inception)]
mod client;
pub mod error;

pub use client::ApiClient;
pub use error::{ClientError, Result as ClientResult};

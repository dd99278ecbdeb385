//! API layer: REST client for the ecomentor backend, push gateway, uniform service failures.

mod client;
mod error;
pub mod insight;
pub mod push;
pub mod service;

pub use client::ApiClient;
pub use error::ApiError;
pub use push::{PushError, PushGateway, PushMessage, PushPriority, PushTicket, RetryPolicy};
pub use service::{ServiceFailure, ServiceResult};

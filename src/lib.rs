pub mod client;
pub mod configuration;
pub mod credential_store;
pub mod credentials;
pub mod error;
pub mod observability;
pub mod project;
pub mod sort_order;
pub mod task;
pub mod utils;

pub use client::{RequestMethod, TickTickClient};
pub use configuration::Settings;
pub use error::{ApiError, ApiResult, TickTickError};

pub mod api;
pub mod base64;

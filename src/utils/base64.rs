use base64::Engine;

pub fn encode_base64(data: &str) -> String {
    base64::engine::general_purpose::STANDARD.encode(data)
}

/// Value of an `Authorization` header for HTTP Basic authentication
pub fn basic_auth_header_value(username: &str, password: &str) -> String {
    format!("Basic {}", encode_base64(&format!("{username}:{password}")))
}

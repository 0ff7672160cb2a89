pub mod encoding;
pub mod http;

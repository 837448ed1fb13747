pub mod facilities;
pub mod request_body;

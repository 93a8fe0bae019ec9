pub mod client_ip;
pub mod code_generator;
pub mod datetime;
pub mod jwt;
pub mod password;

pub use client_ip::client_ip;
pub use code_generator::{TICKET_CODE_PREFIX, generate_ticket_code, is_valid_ticket_code};
pub use datetime::parse_expires_at;
pub use jwt::*;
pub use password::*;

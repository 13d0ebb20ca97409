pub mod password;
pub mod rules;
pub mod token;

pub use token::{issue_token, verify_token, Claims, TokenError};

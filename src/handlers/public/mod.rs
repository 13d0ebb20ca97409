// Endpoints reachable without a token. Token acquisition only.
pub mod token;

pub use token::token_post;

pub mod auth;
pub mod extract;
pub mod oauth;
pub mod token;

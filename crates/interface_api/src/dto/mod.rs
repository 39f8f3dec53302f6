//! Request/response bodies

pub mod auth;
pub mod claims;
pub mod limits;
pub mod users;

pub mod auth;
pub mod location;
pub mod weekly;

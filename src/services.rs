pub mod auth;
pub mod location_service;
pub mod weekly_service;

pub mod auth;
pub mod locations;
pub mod pages;
pub mod weekly;

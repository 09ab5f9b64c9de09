pub mod user_repo;
pub use user_repo::UserRepository;
pub mod location_repo;
pub use location_repo::LocationRepository;
pub mod weekly_repo;
pub use weekly_repo::WeeklyRepository;

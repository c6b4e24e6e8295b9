pub mod repository;
pub mod sections;
pub mod types;

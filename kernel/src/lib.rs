pub mod availability;
pub mod model;
pub mod report;
pub mod repository;

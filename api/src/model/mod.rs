pub mod auth;
pub mod booking;
pub mod report;
pub mod room;
pub mod user;

pub mod auth;
pub mod booking;
pub mod health;
pub mod image;
pub mod room;
pub mod user;

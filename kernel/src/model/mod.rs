pub mod auth;
pub mod booking;
pub mod id;
pub mod interval;
pub mod role;
pub mod room;
pub mod user;

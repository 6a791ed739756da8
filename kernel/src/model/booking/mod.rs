use crate::model::{
    id::{BookingId, RoomId, UserId},
    interval::Interval,
};

pub mod event;

#[derive(Debug, Clone)]
pub struct Booking {
    pub booking_id: BookingId,
    pub booked_by: UserId,
    pub username: String,
    pub interval: Interval,
    pub title: String,
    pub description: Option<String>,
    pub attendee_count: i32,
    pub room: BookingRoom,
}

impl Booking {
    pub fn room_id(&self) -> RoomId {
        self.room.room_id
    }
}

#[derive(Debug, Clone)]
pub struct BookingRoom {
    pub room_id: RoomId,
    pub name: String,
    pub capacity: i32,
}

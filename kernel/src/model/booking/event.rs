use crate::model::{
    id::{BookingId, RoomId, UserId},
    interval::Interval,
};
use derive_new::new;

#[derive(new)]
pub struct CreateBooking {
    pub booked_by: UserId,
    pub room_id: RoomId,
    pub interval: Interval,
    pub title: String,
    pub description: Option<String>,
    pub attendee_count: i32,
}

#[derive(new)]
pub struct UpdateBooking {
    pub booking_id: BookingId,
    pub room_id: RoomId,
    pub interval: Interval,
    pub title: String,
    pub description: Option<String>,
    pub attendee_count: i32,
}

#[derive(new)]
pub struct DeleteBooking {
    pub booking_id: BookingId,
}

use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::model::{
    booking::{Booking, BookingRoom},
    id::{BookingId, RoomId, UserId},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[garde(skip)]
    pub room_id: RoomId,
    #[garde(skip)]
    pub start_time: DateTime<Utc>,
    #[garde(skip)]
    pub end_time: DateTime<Utc>,
    #[garde(length(min = 1))]
    pub title: String,
    #[garde(skip)]
    pub description: Option<String>,
    #[garde(range(min = 1))]
    pub attendee_count: i32,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingRequest {
    #[garde(skip)]
    pub start_time: DateTime<Utc>,
    #[garde(skip)]
    pub end_time: DateTime<Utc>,
    #[garde(length(min = 1))]
    pub title: String,
    #[garde(skip)]
    pub description: Option<String>,
    #[garde(range(min = 1))]
    pub attendee_count: i32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCreatedResponse {
    pub booking_id: BookingId,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingsResponse {
    pub items: Vec<BookingResponse>,
}

impl From<Vec<Booking>> for BookingsResponse {
    fn from(value: Vec<Booking>) -> Self {
        Self {
            items: value.into_iter().map(BookingResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub booking_id: BookingId,
    pub booked_by: UserId,
    pub username: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub title: String,
    pub description: Option<String>,
    pub attendee_count: i32,
    pub room: BookingRoomResponse,
}

impl From<Booking> for BookingResponse {
    fn from(value: Booking) -> Self {
        let Booking {
            booking_id,
            booked_by,
            username,
            interval,
            title,
            description,
            attendee_count,
            room,
        } = value;
        Self {
            booking_id,
            booked_by,
            username,
            start_time: interval.start(),
            end_time: interval.end(),
            title,
            description,
            attendee_count,
            room: room.into(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRoomResponse {
    pub room_id: RoomId,
    pub name: String,
    pub capacity: i32,
}

impl From<BookingRoom> for BookingRoomResponse {
    fn from(value: BookingRoom) -> Self {
        let BookingRoom {
            room_id,
            name,
            capacity,
        } = value;
        Self {
            room_id,
            name,
            capacity,
        }
    }
}

// 空き確認系のクエリ。開始と終了の時刻をそのまま受ける
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRangeQuery {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomAvailabilityResponse {
    pub is_available: bool,
    pub conflicting_bookings: Vec<BookingResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use kernel::model::interval::Interval;

    #[test]
    fn booking_response_flattens_interval_to_start_and_end() {
        let start = Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 6, 2, 10, 0, 0).unwrap();
        let booking = Booking {
            booking_id: BookingId::new(1),
            booked_by: UserId::new(7),
            username: "anan".into(),
            interval: Interval::new(start, end).unwrap(),
            title: "standup".into(),
            description: None,
            attendee_count: 5,
            room: BookingRoom {
                room_id: RoomId::new(3),
                name: "Sky Room".into(),
                capacity: 12,
            },
        };

        let res = BookingResponse::from(booking);
        assert_eq!(res.start_time, start);
        assert_eq!(res.end_time, end);
        assert_eq!(res.room.room_id, RoomId::new(3));

        let json = serde_json::to_value(&res).unwrap();
        assert!(json.get("startTime").is_some());
        assert!(json.get("attendeeCount").is_some());
    }
}

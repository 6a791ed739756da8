use kernel::model::{
    booking::{Booking, BookingRoom},
    id::{BookingId, RoomId, UserId},
    interval::Interval,
};
use shared::error::AppError;
use sqlx::types::chrono::{DateTime, Utc};

// 予約一覧の取得に使う型。部屋とユーザーを結合した形で受け取る
#[derive(sqlx::FromRow)]
pub struct BookingRow {
    pub booking_id: BookingId,
    pub user_id: UserId,
    pub username: String,
    pub room_id: RoomId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub title: String,
    pub description: Option<String>,
    pub attendee_count: i32,
    pub room_name: String,
    pub capacity: i32,
}

impl TryFrom<BookingRow> for Booking {
    type Error = AppError;

    fn try_from(value: BookingRow) -> Result<Self, Self::Error> {
        let BookingRow {
            booking_id,
            user_id,
            username,
            room_id,
            start_time,
            end_time,
            title,
            description,
            attendee_count,
            room_name,
            capacity,
        } = value;
        // start_time < end_time はデータベースの CHECK 制約で保証しているが、
        // 区間型の不変条件はここでも通す
        let interval = Interval::new(start_time, end_time)
            .map_err(|_| AppError::ConversionEntityError(format!(
                "予約（{booking_id}）の時間帯が不正です。"
            )))?;
        Ok(Booking {
            booking_id,
            booked_by: user_id,
            username,
            interval,
            title,
            description,
            attendee_count,
            room: BookingRoom {
                room_id,
                name: room_name,
                capacity,
            },
        })
    }
}

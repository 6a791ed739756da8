use crate::model::{
    booking::{
        event::{CreateBooking, DeleteBooking, UpdateBooking},
        Booking,
    },
    id::{BookingId, RoomId, UserId},
    interval::Interval,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::error::AppResult;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    // 予約を作成する。既存予約との時間帯重複があれば BookingConflict を返す
    async fn create(&self, event: CreateBooking) -> AppResult<BookingId>;
    // 予約内容を更新する。自分自身を除いた重複チェックを行う
    async fn update(&self, event: UpdateBooking) -> AppResult<()>;
    async fn delete(&self, event: DeleteBooking) -> AppResult<()>;
    async fn find_all(&self) -> AppResult<Vec<Booking>>;
    async fn find_by_id(&self, booking_id: BookingId) -> AppResult<Option<Booking>>;
    async fn find_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Booking>>;
    // 指定した部屋の予約一覧を取得する
    async fn find_by_room_id(&self, room_id: RoomId) -> AppResult<Vec<Booking>>;
    // 指定区間と重複する予約を全部屋横断で取得する
    async fn find_overlapping(&self, range: &Interval) -> AppResult<Vec<Booking>>;
    // 指定期間に完全に収まる予約を取得する（レポート用）
    async fn find_within_period(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<Booking>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability;
    use crate::model::booking::BookingRoom;
    use chrono::TimeZone;
    use shared::error::AppError;
    use std::sync::Mutex;

    // 重複チェックの契約をトレイト越しに確認するためのインメモリ実装
    #[derive(Default)]
    struct InMemoryBookingRepository {
        bookings: Mutex<Vec<Booking>>,
    }

    #[async_trait]
    impl BookingRepository for InMemoryBookingRepository {
        async fn create(&self, event: CreateBooking) -> AppResult<BookingId> {
            let mut bookings = self.bookings.lock().unwrap();
            let same_room: Vec<Booking> = bookings
                .iter()
                .filter(|b| b.room_id() == event.room_id)
                .cloned()
                .collect();
            if availability::find_conflict(&same_room, &event.interval, None).is_some() {
                return Err(AppError::BookingConflict(
                    "指定の時間帯は既に予約されています。".into(),
                ));
            }
            let booking_id = BookingId::new(bookings.len() as i64 + 1);
            bookings.push(Booking {
                booking_id,
                booked_by: event.booked_by,
                username: "tester".into(),
                interval: event.interval,
                title: event.title,
                description: event.description,
                attendee_count: event.attendee_count,
                room: BookingRoom {
                    room_id: event.room_id,
                    name: "会議室".into(),
                    capacity: 10,
                },
            });
            Ok(booking_id)
        }

        async fn update(&self, event: UpdateBooking) -> AppResult<()> {
            let mut bookings = self.bookings.lock().unwrap();
            let same_room: Vec<Booking> = bookings
                .iter()
                .filter(|b| b.room_id() == event.room_id)
                .cloned()
                .collect();
            if availability::find_conflict(&same_room, &event.interval, Some(event.booking_id))
                .is_some()
            {
                return Err(AppError::BookingConflict(
                    "指定の時間帯は既に予約されています。".into(),
                ));
            }
            let target = bookings
                .iter_mut()
                .find(|b| b.booking_id == event.booking_id)
                .ok_or_else(|| AppError::EntityNotFound("予約が見つかりません。".into()))?;
            target.interval = event.interval;
            target.title = event.title;
            Ok(())
        }

        async fn delete(&self, event: DeleteBooking) -> AppResult<()> {
            let mut bookings = self.bookings.lock().unwrap();
            bookings.retain(|b| b.booking_id != event.booking_id);
            Ok(())
        }

        async fn find_all(&self) -> AppResult<Vec<Booking>> {
            Ok(self.bookings.lock().unwrap().clone())
        }

        async fn find_by_id(&self, booking_id: BookingId) -> AppResult<Option<Booking>> {
            Ok(self
                .bookings
                .lock()
                .unwrap()
                .iter()
                .find(|b| b.booking_id == booking_id)
                .cloned())
        }

        async fn find_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Booking>> {
            Ok(self
                .bookings
                .lock()
                .unwrap()
                .iter()
                .filter(|b| b.booked_by == user_id)
                .cloned()
                .collect())
        }

        async fn find_by_room_id(&self, room_id: RoomId) -> AppResult<Vec<Booking>> {
            Ok(self
                .bookings
                .lock()
                .unwrap()
                .iter()
                .filter(|b| b.room_id() == room_id)
                .cloned()
                .collect())
        }

        async fn find_overlapping(&self, range: &Interval) -> AppResult<Vec<Booking>> {
            Ok(self
                .bookings
                .lock()
                .unwrap()
                .iter()
                .filter(|b| b.interval.overlaps(range))
                .cloned()
                .collect())
        }

        async fn find_within_period(
            &self,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> AppResult<Vec<Booking>> {
            Ok(self
                .bookings
                .lock()
                .unwrap()
                .iter()
                .filter(|b| b.interval.start() >= start && b.interval.end() <= end)
                .cloned()
                .collect())
        }
    }

    fn interval(start_hour: u32, end_hour: u32) -> Interval {
        Interval::new(
            Utc.with_ymd_and_hms(2025, 6, 2, start_hour, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 2, end_hour, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn create_rejects_overlap_in_same_room() {
        let repo = InMemoryBookingRepository::default();
        repo.create(CreateBooking::new(
            UserId::new(1),
            RoomId::new(1),
            interval(9, 10),
            "定例".into(),
            None,
            3,
        ))
        .await
        .unwrap();

        let res = repo
            .create(CreateBooking::new(
                UserId::new(2),
                RoomId::new(1),
                interval(9, 11),
                "打ち合わせ".into(),
                None,
                2,
            ))
            .await;
        assert!(matches!(res, Err(AppError::BookingConflict(_))));

        // 別の部屋なら同じ時間帯でも予約できる
        repo.create(CreateBooking::new(
            UserId::new(2),
            RoomId::new(2),
            interval(9, 11),
            "打ち合わせ".into(),
            None,
            2,
        ))
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn update_excludes_own_booking_from_conflict_check() {
        let repo = InMemoryBookingRepository::default();
        let booking_id = repo
            .create(CreateBooking::new(
                UserId::new(1),
                RoomId::new(1),
                interval(9, 10),
                "定例".into(),
                None,
                3,
            ))
            .await
            .unwrap();

        // 自分自身との重複は許容される（時間延長）
        repo.update(UpdateBooking::new(
            booking_id,
            RoomId::new(1),
            interval(9, 11),
            "定例（延長）".into(),
            None,
            3,
        ))
        .await
        .unwrap();

        // 他の予約との重複は拒否される
        repo.create(CreateBooking::new(
            UserId::new(2),
            RoomId::new(1),
            interval(13, 14),
            "面談".into(),
            None,
            2,
        ))
        .await
        .unwrap();
        let res = repo
            .update(UpdateBooking::new(
                booking_id,
                RoomId::new(1),
                interval(10, 14),
                "定例".into(),
                None,
                3,
            ))
            .await;
        assert!(matches!(res, Err(AppError::BookingConflict(_))));
    }
}

use async_trait::async_trait;
use derive_new::new;
use sqlx::{Postgres, Transaction};

use crate::database::{model::booking::BookingRow, ConnectionPool};
use chrono::{DateTime, Utc};
use kernel::availability;
use kernel::model::{
    booking::{
        event::{CreateBooking, DeleteBooking, UpdateBooking},
        Booking,
    },
    id::{BookingId, RoomId, UserId},
    interval::Interval,
};
use kernel::repository::booking::BookingRepository;
use shared::error::{AppError, AppResult};

const SELECT_BOOKING_COLUMNS: &str = r#"
    SELECT
        b.booking_id,
        b.user_id,
        u.username,
        b.room_id,
        b.start_time,
        b.end_time,
        b.title,
        b.description,
        b.attendee_count,
        r.name AS room_name,
        r.capacity
    FROM bookings AS b
    INNER JOIN users AS u ON u.user_id = b.user_id
    INNER JOIN rooms AS r ON r.room_id = b.room_id
"#;

#[derive(new)]
pub struct BookingRepositoryImpl {
    db: ConnectionPool,
}

impl BookingRepositoryImpl {
    // 書き込み時の重複チェックは check-then-act の競合を避けるため
    // SERIALIZABLE トランザクションの中で行う
    async fn set_transaction_serializable(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> AppResult<()> {
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        Ok(())
    }

    async fn find_by_room_id_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        room_id: RoomId,
    ) -> AppResult<Vec<Booking>> {
        let rows: Vec<BookingRow> =
            sqlx::query_as(&format!("{SELECT_BOOKING_COLUMNS} WHERE b.room_id = $1"))
                .bind(room_id)
                .fetch_all(&mut **tx)
                .await
                .map_err(AppError::SpecificOperationError)?;
        rows.into_iter().map(Booking::try_from).collect()
    }
}

#[async_trait]
impl BookingRepository for BookingRepositoryImpl {
    async fn create(&self, event: CreateBooking) -> AppResult<BookingId> {
        let mut tx = self.db.begin().await?;
        self.set_transaction_serializable(&mut tx).await?;

        // 部屋の存在確認
        let room_exists: Option<RoomId> =
            sqlx::query_scalar("SELECT room_id FROM rooms WHERE room_id = $1")
                .bind(event.room_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(AppError::SpecificOperationError)?;
        if room_exists.is_none() {
            return Err(AppError::EntityNotFound(format!(
                "部屋（{}）が見つかりませんでした。",
                event.room_id
            )));
        }

        // 希望時間帯が既存予約と重なっていないか確認
        let existing = self.find_by_room_id_in_tx(&mut tx, event.room_id).await?;
        if let Some(conflict) = availability::find_conflict(&existing, &event.interval, None) {
            return Err(AppError::BookingConflict(format!(
                "部屋（{}）の指定時間帯には既存の予約（{}）があります。",
                event.room_id, conflict.booking_id
            )));
        }

        let booking_id: BookingId = sqlx::query_scalar(
            r#"
                INSERT INTO bookings
                    (user_id, room_id, start_time, end_time, title, description, attendee_count)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING booking_id
            "#,
        )
        .bind(event.booked_by)
        .bind(event.room_id)
        .bind(event.interval.start())
        .bind(event.interval.end())
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.attendee_count)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)?;
        Ok(booking_id)
    }

    async fn update(&self, event: UpdateBooking) -> AppResult<()> {
        let mut tx = self.db.begin().await?;
        self.set_transaction_serializable(&mut tx).await?;

        // 更新対象自身は除外して重複チェックする
        let existing = self.find_by_room_id_in_tx(&mut tx, event.room_id).await?;
        if let Some(conflict) =
            availability::find_conflict(&existing, &event.interval, Some(event.booking_id))
        {
            return Err(AppError::BookingConflict(format!(
                "部屋（{}）の指定時間帯には既存の予約（{}）があります。",
                event.room_id, conflict.booking_id
            )));
        }

        let res = sqlx::query(
            r#"
                UPDATE bookings
                SET start_time = $1,
                    end_time = $2,
                    title = $3,
                    description = $4,
                    attendee_count = $5
                WHERE booking_id = $6
            "#,
        )
        .bind(event.interval.start())
        .bind(event.interval.end())
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.attendee_count)
        .bind(event.booking_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;
        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "予約（{}）が見つかりませんでした。",
                event.booking_id
            )));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;
        Ok(())
    }

    async fn delete(&self, event: DeleteBooking) -> AppResult<()> {
        let res = sqlx::query("DELETE FROM bookings WHERE booking_id = $1")
            .bind(event.booking_id)
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;
        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "予約（{}）が見つかりませんでした。",
                event.booking_id
            )));
        }
        Ok(())
    }

    async fn find_all(&self) -> AppResult<Vec<Booking>> {
        let rows: Vec<BookingRow> =
            sqlx::query_as(&format!("{SELECT_BOOKING_COLUMNS} ORDER BY b.start_time"))
                .fetch_all(self.db.inner_ref())
                .await
                .map_err(AppError::SpecificOperationError)?;
        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn find_by_id(&self, booking_id: BookingId) -> AppResult<Option<Booking>> {
        let row: Option<BookingRow> =
            sqlx::query_as(&format!("{SELECT_BOOKING_COLUMNS} WHERE b.booking_id = $1"))
                .bind(booking_id)
                .fetch_optional(self.db.inner_ref())
                .await
                .map_err(AppError::SpecificOperationError)?;
        row.map(Booking::try_from).transpose()
    }

    async fn find_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Booking>> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            "{SELECT_BOOKING_COLUMNS} WHERE b.user_id = $1 ORDER BY b.start_time"
        ))
        .bind(user_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn find_by_room_id(&self, room_id: RoomId) -> AppResult<Vec<Booking>> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            "{SELECT_BOOKING_COLUMNS} WHERE b.room_id = $1 ORDER BY b.start_time"
        ))
        .bind(room_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn find_overlapping(&self, range: &Interval) -> AppResult<Vec<Booking>> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            "{SELECT_BOOKING_COLUMNS} WHERE b.start_time < $2 AND $1 < b.end_time"
        ))
        .bind(range.start())
        .bind(range.end())
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn find_within_period(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<Booking>> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            "{SELECT_BOOKING_COLUMNS} WHERE b.start_time >= $1 AND b.end_time <= $2"
        ))
        .bind(start)
        .bind(end)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        rows.into_iter().map(Booking::try_from).collect()
    }
}

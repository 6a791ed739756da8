use async_trait::async_trait;
use derive_new::new;

use crate::database::{model::room::RoomRow, ConnectionPool};
use kernel::model::{
    id::RoomId,
    room::{
        event::{CreateRoom, DeleteRoom, UpdateRoom},
        Room,
    },
};
use kernel::repository::room::RoomRepository;
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct RoomRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl RoomRepository for RoomRepositoryImpl {
    async fn create(&self, event: CreateRoom) -> AppResult<RoomId> {
        let room_id: RoomId = sqlx::query_scalar(
            r#"
                INSERT INTO rooms (name, description, capacity, image_url)
                VALUES ($1, $2, $3, $4)
                RETURNING room_id
            "#,
        )
        .bind(&event.name)
        .bind(&event.description)
        .bind(event.capacity)
        .bind(&event.image_url)
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        Ok(room_id)
    }

    async fn find_all(&self) -> AppResult<Vec<Room>> {
        let rows: Vec<RoomRow> = sqlx::query_as(
            r#"
                SELECT room_id, name, description, capacity, image_url
                FROM rooms
                ORDER BY room_id
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        Ok(rows.into_iter().map(Room::from).collect())
    }

    async fn find_by_id(&self, room_id: RoomId) -> AppResult<Option<Room>> {
        let row: Option<RoomRow> = sqlx::query_as(
            r#"
                SELECT room_id, name, description, capacity, image_url
                FROM rooms
                WHERE room_id = $1
            "#,
        )
        .bind(room_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        Ok(row.map(Room::from))
    }

    async fn update(&self, event: UpdateRoom) -> AppResult<()> {
        let res = sqlx::query(
            r#"
                UPDATE rooms
                SET name = $1,
                    description = $2,
                    capacity = $3,
                    image_url = $4
                WHERE room_id = $5
            "#,
        )
        .bind(&event.name)
        .bind(&event.description)
        .bind(event.capacity)
        .bind(&event.image_url)
        .bind(event.room_id)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "部屋（{}）が見つかりませんでした。",
                event.room_id
            )));
        }
        Ok(())
    }

    async fn delete(&self, event: DeleteRoom) -> AppResult<()> {
        let res = sqlx::query("DELETE FROM rooms WHERE room_id = $1")
            .bind(event.room_id)
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;
        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "部屋（{}）が見つかりませんでした。",
                event.room_id
            )));
        }
        Ok(())
    }
}

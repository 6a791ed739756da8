use kernel::model::{id::RoomId, room::Room};

#[derive(sqlx::FromRow)]
pub struct RoomRow {
    pub room_id: RoomId,
    pub name: String,
    pub description: String,
    pub capacity: i32,
    pub image_url: Option<String>,
}

impl From<RoomRow> for Room {
    fn from(value: RoomRow) -> Self {
        let RoomRow {
            room_id,
            name,
            description,
            capacity,
            image_url,
        } = value;
        Room {
            room_id,
            name,
            description,
            capacity,
            image_url,
        }
    }
}

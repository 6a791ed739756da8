use crate::model::id::RoomId;

pub mod event;

#[derive(Debug, Clone)]
pub struct Room {
    pub room_id: RoomId,
    pub name: String,
    pub description: String,
    pub capacity: i32,
    pub image_url: Option<String>,
}

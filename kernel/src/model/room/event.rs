use crate::model::id::RoomId;
use derive_new::new;

#[derive(new)]
pub struct CreateRoom {
    pub name: String,
    pub description: String,
    pub capacity: i32,
    pub image_url: Option<String>,
}

#[derive(new)]
pub struct UpdateRoom {
    pub room_id: RoomId,
    pub name: String,
    pub description: String,
    pub capacity: i32,
    pub image_url: Option<String>,
}

#[derive(new)]
pub struct DeleteRoom {
    pub room_id: RoomId,
}

use axum::extract::Multipart;
use garde::Validate;
use kernel::model::{id::RoomId, room::Room};
use serde::Serialize;
use shared::error::{AppError, AppResult};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomsResponse {
    pub items: Vec<RoomResponse>,
}

impl From<Vec<Room>> for RoomsResponse {
    fn from(value: Vec<Room>) -> Self {
        Self {
            items: value.into_iter().map(RoomResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomResponse {
    pub room_id: RoomId,
    pub name: String,
    pub description: String,
    pub capacity: i32,
    pub image_url: Option<String>,
}

impl From<Room> for RoomResponse {
    fn from(value: Room) -> Self {
        let Room {
            room_id,
            name,
            description,
            capacity,
            image_url,
        } = value;
        Self {
            room_id,
            name,
            description,
            capacity,
            image_url,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomCreatedResponse {
    pub room_id: RoomId,
}

pub struct UploadedImage {
    pub filename: String,
    pub content: Vec<u8>,
}

/// 部屋の作成・更新フォーム。multipart/form-data から組み立てる。
#[derive(Validate)]
pub struct RoomForm {
    #[garde(length(min = 1))]
    pub name: String,
    #[garde(skip)]
    pub description: String,
    #[garde(range(min = 1))]
    pub capacity: i32,
    #[garde(skip)]
    pub image: Option<UploadedImage>,
}

impl RoomForm {
    pub async fn from_multipart(mut multipart: Multipart) -> AppResult<Self> {
        let mut name = None;
        let mut description = None;
        let mut capacity = None;
        let mut image = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::UnprocessableEntity(e.to_string()))?
        {
            match field.name() {
                Some("name") => {
                    name = Some(read_text(field).await?);
                }
                Some("description") => {
                    description = Some(read_text(field).await?);
                }
                Some("capacity") => {
                    let raw = read_text(field).await?;
                    capacity = Some(raw.parse::<i32>().map_err(|_| {
                        AppError::UnprocessableEntity(format!("収容人数が数値ではありません：{raw}"))
                    })?);
                }
                Some("image") => {
                    // 画像以外のファイルは黙って読み飛ばす
                    let is_image = field
                        .content_type()
                        .map(|ct| ct.starts_with("image/"))
                        .unwrap_or(false);
                    if !is_image {
                        continue;
                    }
                    let filename = field.file_name().unwrap_or("image.bin").to_string();
                    let content = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::UnprocessableEntity(e.to_string()))?
                        .to_vec();
                    image = Some(UploadedImage { filename, content });
                }
                _ => {}
            }
        }

        let form = Self {
            name: name
                .ok_or_else(|| AppError::UnprocessableEntity("name は必須です。".into()))?,
            description: description.unwrap_or_default(),
            capacity: capacity
                .ok_or_else(|| AppError::UnprocessableEntity("capacity は必須です。".into()))?,
            image,
        };
        form.validate()?;
        Ok(form)
    }
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::UnprocessableEntity(e.to_string()))
}

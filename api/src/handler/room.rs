use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use kernel::availability;
use kernel::model::{
    id::RoomId,
    interval::Interval,
    room::event::{CreateRoom, DeleteRoom, UpdateRoom},
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::AuthorizedUser,
    model::{
        booking::{BookingResponse, RoomAvailabilityResponse, TimeRangeQuery},
        room::{RoomCreatedResponse, RoomForm, RoomResponse, RoomsResponse},
    },
};

pub async fn register_room(
    _user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<RoomCreatedResponse>)> {
    let form = RoomForm::from_multipart(multipart).await?;

    let image_url = match form.image {
        Some(image) => Some(
            registry
                .image_storage()
                .save(&image.filename, image.content)
                .await?,
        ),
        None => None,
    };

    let event = CreateRoom::new(form.name, form.description, form.capacity, image_url);
    let room_id = registry.room_repository().create(event).await?;
    Ok((StatusCode::CREATED, Json(RoomCreatedResponse { room_id })))
}

pub async fn show_room_list(
    State(registry): State<AppRegistry>,
) -> AppResult<Json<RoomsResponse>> {
    registry
        .room_repository()
        .find_all()
        .await
        .map(RoomsResponse::from)
        .map(Json)
}

pub async fn show_room(
    Path(room_id): Path<RoomId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<RoomResponse>> {
    registry
        .room_repository()
        .find_by_id(room_id)
        .await
        .and_then(|room| match room {
            Some(room) => Ok(Json(room.into())),
            None => Err(AppError::EntityNotFound(format!(
                "部屋（{room_id}）が見つかりませんでした。"
            ))),
        })
}

pub async fn update_room(
    _user: AuthorizedUser,
    Path(room_id): Path<RoomId>,
    State(registry): State<AppRegistry>,
    multipart: Multipart,
) -> AppResult<StatusCode> {
    let form = RoomForm::from_multipart(multipart).await?;

    let current = registry
        .room_repository()
        .find_by_id(room_id)
        .await?
        .ok_or_else(|| {
            AppError::EntityNotFound(format!("部屋（{room_id}）が見つかりませんでした。"))
        })?;

    // 新しい画像が来たときだけ差し替える。古い画像はその場で削除する
    let image_url = match form.image {
        Some(image) => {
            if let Some(old) = &current.image_url {
                registry.image_storage().delete(old).await?;
            }
            Some(
                registry
                    .image_storage()
                    .save(&image.filename, image.content)
                    .await?,
            )
        }
        None => current.image_url,
    };

    let event = UpdateRoom::new(room_id, form.name, form.description, form.capacity, image_url);
    registry
        .room_repository()
        .update(event)
        .await
        .map(|_| StatusCode::OK)
}

pub async fn delete_room(
    _user: AuthorizedUser,
    Path(room_id): Path<RoomId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    let room = registry
        .room_repository()
        .find_by_id(room_id)
        .await?
        .ok_or_else(|| {
            AppError::EntityNotFound(format!("部屋（{room_id}）が見つかりませんでした。"))
        })?;

    // 部屋を消すときは紐づく画像 blob も一緒に解放する
    if let Some(image_url) = &room.image_url {
        registry.image_storage().delete(image_url).await?;
    }

    registry
        .room_repository()
        .delete(DeleteRoom::new(room_id))
        .await
        .map(|_| StatusCode::NO_CONTENT)
}

// 認証なしで使える単一部屋の空き確認
pub async fn check_room_availability(
    Path(room_id): Path<RoomId>,
    Query(query): Query<TimeRangeQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<RoomAvailabilityResponse>> {
    let range = Interval::new(query.start_time, query.end_time)?;

    let bookings = registry.booking_repository().find_by_room_id(room_id).await?;
    let conflicting: Vec<BookingResponse> = availability::find_conflicts(&bookings, &range)
        .into_iter()
        .cloned()
        .map(BookingResponse::from)
        .collect();

    Ok(Json(RoomAvailabilityResponse {
        is_available: conflicting.is_empty(),
        conflicting_bookings: conflicting,
    }))
}

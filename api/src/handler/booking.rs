use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::availability;
use kernel::model::{
    booking::event::{CreateBooking, DeleteBooking, UpdateBooking},
    id::BookingId,
    interval::Interval,
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::AuthorizedUser,
    model::{
        booking::{
            BookingCreatedResponse, BookingResponse, BookingsResponse, CreateBookingRequest,
            TimeRangeQuery, UpdateBookingRequest,
        },
        room::RoomsResponse,
    },
};

pub async fn create_booking(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<BookingCreatedResponse>)> {
    req.validate()?;
    let interval = Interval::new(req.start_time, req.end_time)?;

    let event = CreateBooking::new(
        user.id(),
        req.room_id,
        interval,
        req.title,
        req.description,
        req.attendee_count,
    );
    let booking_id = registry.booking_repository().create(event).await?;
    Ok((
        StatusCode::CREATED,
        Json(BookingCreatedResponse { booking_id }),
    ))
}

pub async fn show_booking_list(
    _user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingsResponse>> {
    registry
        .booking_repository()
        .find_all()
        .await
        .map(BookingsResponse::from)
        .map(Json)
}

pub async fn show_booking(
    user: AuthorizedUser,
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingResponse>> {
    let booking = registry
        .booking_repository()
        .find_by_id(booking_id)
        .await?
        .ok_or_else(|| {
            AppError::EntityNotFound(format!("予約（{booking_id}）が見つかりませんでした。"))
        })?;

    // 自分の予約だけ参照できる
    if booking.booked_by != user.id() {
        return Err(AppError::ForbiddenOperation);
    }
    Ok(Json(booking.into()))
}

pub async fn update_booking(
    user: AuthorizedUser,
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateBookingRequest>,
) -> AppResult<StatusCode> {
    req.validate()?;
    let interval = Interval::new(req.start_time, req.end_time)?;

    let booking = registry
        .booking_repository()
        .find_by_id(booking_id)
        .await?
        .ok_or_else(|| {
            AppError::EntityNotFound(format!("予約（{booking_id}）が見つかりませんでした。"))
        })?;
    if booking.booked_by != user.id() {
        return Err(AppError::ForbiddenOperation);
    }

    let event = UpdateBooking::new(
        booking_id,
        booking.room_id(),
        interval,
        req.title,
        req.description,
        req.attendee_count,
    );
    registry
        .booking_repository()
        .update(event)
        .await
        .map(|_| StatusCode::OK)
}

pub async fn delete_booking(
    user: AuthorizedUser,
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    let booking = registry
        .booking_repository()
        .find_by_id(booking_id)
        .await?
        .ok_or_else(|| {
            AppError::EntityNotFound(format!("予約（{booking_id}）が見つかりませんでした。"))
        })?;

    // 持ち主か管理者だけが削除できる
    if booking.booked_by != user.id() && !user.is_admin() {
        return Err(AppError::ForbiddenOperation);
    }

    registry
        .booking_repository()
        .delete(DeleteBooking::new(booking_id))
        .await
        .map(|_| StatusCode::OK)
}

pub async fn show_my_bookings(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingsResponse>> {
    registry
        .booking_repository()
        .find_by_user_id(user.id())
        .await
        .map(BookingsResponse::from)
        .map(Json)
}

// 指定時間帯に重複予約がひとつもない部屋の一覧
pub async fn show_available_rooms(
    _user: AuthorizedUser,
    Query(query): Query<TimeRangeQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<RoomsResponse>> {
    let range = Interval::new(query.start_time, query.end_time)?;

    let rooms = registry.room_repository().find_all().await?;
    let bookings = registry.booking_repository().find_overlapping(&range).await?;
    let available = availability::rooms_without_conflict(&rooms, &bookings, &range);

    Ok(Json(RoomsResponse::from(available)))
}

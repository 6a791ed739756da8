use axum::{extract::State, http::StatusCode, Json};
use garde::Validate;
use registry::AppRegistry;
use shared::error::AppResult;

use crate::{
    extractor::AuthorizedUser,
    model::user::{
        ChangePasswordRequest, ChangePasswordRequestWithUserId, UpdateProfileRequest,
        UpdateProfileRequestWithUserId, UserResponse,
    },
};

pub async fn get_current_user(user: AuthorizedUser) -> Json<UserResponse> {
    Json(UserResponse::from(user.user))
}

pub async fn update_profile(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateProfileRequest>,
) -> AppResult<StatusCode> {
    req.validate()?;

    let update = UpdateProfileRequestWithUserId::new(user.id(), req);
    registry
        .user_repository()
        .update_profile(update.into())
        .await
        .map(|_| StatusCode::OK)
}

pub async fn change_password(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    req.validate()?;

    let update = ChangePasswordRequestWithUserId::new(user.id(), req);
    registry
        .user_repository()
        .update_password(update.into())
        .await
        .map(|_| StatusCode::OK)
}

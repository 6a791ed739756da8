use crate::model::{
    id::UserId,
    user::{
        event::{CreateUser, UpdateProfile, UpdateUserPassword},
        User,
    },
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, event: CreateUser) -> AppResult<User>;
    async fn find_current_user(&self, user_id: UserId) -> AppResult<Option<User>>;
    async fn find_all(&self) -> AppResult<Vec<User>>;
    async fn update_profile(&self, event: UpdateProfile) -> AppResult<()>;
    // 現在のパスワードを検証してから更新し、password_changed フラグを立てる
    async fn update_password(&self, event: UpdateUserPassword) -> AppResult<()>;
}

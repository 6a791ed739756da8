use std::sync::Arc;

use async_trait::async_trait;
use derive_new::new;
use uuid::Uuid;

use crate::{
    database::ConnectionPool,
    redis::{model::AuthorizationKey, RedisClient},
};
use kernel::model::{
    auth::{event::CreateToken, AccessToken},
    id::UserId,
};
use kernel::repository::auth::AuthRepository;
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct AuthRepositoryImpl {
    db: ConnectionPool,
    kv: Arc<RedisClient>,
    ttl: u64,
}

#[async_trait]
impl AuthRepository for AuthRepositoryImpl {
    async fn fetch_user_id_from_token(
        &self,
        access_token: &AccessToken,
    ) -> AppResult<Option<UserId>> {
        let key = AuthorizationKey::from(access_token);
        let value = self.kv.get(key.inner_ref()).await?;
        value
            .map(|raw| {
                raw.parse::<UserId>()
                    .map_err(|e| AppError::ConversionEntityError(e.to_string()))
            })
            .transpose()
    }

    async fn verify_user(&self, username: &str, password: &str) -> AppResult<UserId> {
        let row: Option<(UserId, String)> =
            sqlx::query_as("SELECT user_id, password_hash FROM users WHERE username = $1")
                .bind(username)
                .fetch_optional(self.db.inner_ref())
                .await
                .map_err(AppError::SpecificOperationError)?;
        // ユーザーが存在しない場合もパスワード不一致と同じ応答にする
        let (user_id, password_hash) = row.ok_or(AppError::UnauthenticatedError)?;

        let valid = bcrypt::verify(password, &password_hash)
            .map_err(|e| AppError::HashError(e.into()))?;
        if !valid {
            return Err(AppError::UnauthenticatedError);
        }
        Ok(user_id)
    }

    async fn create_token(&self, event: CreateToken) -> AppResult<AccessToken> {
        let token = AccessToken(format!(
            "{}{}",
            Uuid::new_v4().simple(),
            Uuid::new_v4().simple()
        ));
        let key = AuthorizationKey::from(&token);
        self.kv
            .set_ex(key.inner_ref(), &event.user_id.to_string(), self.ttl)
            .await?;
        Ok(token)
    }

    async fn delete_token(&self, access_token: AccessToken) -> AppResult<()> {
        let key = AuthorizationKey::from(&access_token);
        self.kv.delete(key.inner_ref()).await
    }
}

use async_trait::async_trait;
use derive_new::new;

use crate::database::{model::user::UserRow, ConnectionPool};
use kernel::model::{
    id::UserId,
    user::{
        event::{CreateUser, UpdateProfile, UpdateUserPassword},
        User,
    },
};
use kernel::repository::user::UserRepository;
use shared::error::{AppError, AppResult};

const SELECT_USER_COLUMNS: &str = r#"
    SELECT
        user_id,
        username,
        email,
        first_name,
        last_name,
        nickname,
        phone,
        role,
        password_changed
    FROM users
"#;

#[derive(new)]
pub struct UserRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn create(&self, event: CreateUser) -> AppResult<User> {
        // 同名ユーザー・同一メールの存在チェック
        let duplicated: Option<UserId> = sqlx::query_scalar(
            "SELECT user_id FROM users WHERE username = $1 OR email = $2",
        )
        .bind(&event.username)
        .bind(&event.email)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        if duplicated.is_some() {
            return Err(AppError::UnprocessableEntity(
                "同じユーザー名またはメールアドレスが既に登録されています。".into(),
            ));
        }

        let hashed = bcrypt::hash(&event.password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::HashError(e.into()))?;

        let row: UserRow = sqlx::query_as(
            r#"
                INSERT INTO users (username, password_hash, email, first_name, last_name, role)
                VALUES ($1, $2, $3, $4, $5, 'User')
                RETURNING
                    user_id, username, email, first_name, last_name,
                    nickname, phone, role, password_changed
            "#,
        )
        .bind(&event.username)
        .bind(&hashed)
        .bind(&event.email)
        .bind(&event.first_name)
        .bind(&event.last_name)
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        User::try_from(row)
    }

    async fn find_current_user(&self, user_id: UserId) -> AppResult<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("{SELECT_USER_COLUMNS} WHERE user_id = $1"))
                .bind(user_id)
                .fetch_optional(self.db.inner_ref())
                .await
                .map_err(AppError::SpecificOperationError)?;
        row.map(User::try_from).transpose()
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        let rows: Vec<UserRow> =
            sqlx::query_as(&format!("{SELECT_USER_COLUMNS} ORDER BY user_id"))
                .fetch_all(self.db.inner_ref())
                .await
                .map_err(AppError::SpecificOperationError)?;
        rows.into_iter().map(User::try_from).collect()
    }

    async fn update_profile(&self, event: UpdateProfile) -> AppResult<()> {
        let res = sqlx::query(
            r#"
                UPDATE users
                SET email = $1,
                    first_name = $2,
                    last_name = $3,
                    nickname = $4,
                    phone = $5
                WHERE user_id = $6
            "#,
        )
        .bind(&event.email)
        .bind(&event.first_name)
        .bind(&event.last_name)
        .bind(&event.nickname)
        .bind(&event.phone)
        .bind(event.user_id)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "ユーザー（{}）が見つかりませんでした。",
                event.user_id
            )));
        }
        Ok(())
    }

    async fn update_password(&self, event: UpdateUserPassword) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let current_hash: String =
            sqlx::query_scalar("SELECT password_hash FROM users WHERE user_id = $1")
                .bind(event.user_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(AppError::SpecificOperationError)?
                .ok_or_else(|| {
                    AppError::EntityNotFound(format!(
                        "ユーザー（{}）が見つかりませんでした。",
                        event.user_id
                    ))
                })?;

        let verified = bcrypt::verify(&event.current_password, &current_hash)
            .map_err(|e| AppError::HashError(e.into()))?;
        if !verified {
            return Err(AppError::UnprocessableEntity(
                "現在のパスワードが正しくありません。".into(),
            ));
        }

        let new_hash = bcrypt::hash(&event.new_password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::HashError(e.into()))?;
        sqlx::query(
            "UPDATE users SET password_hash = $1, password_changed = TRUE WHERE user_id = $2",
        )
        .bind(&new_hash)
        .bind(event.user_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)?;
        Ok(())
    }
}

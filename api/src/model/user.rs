use derive_new::new;
use garde::Validate;
use kernel::model::{
    id::UserId,
    role::Role,
    user::{
        event::{UpdateProfile, UpdateUserPassword},
        User,
    },
};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub enum RoleName {
    Admin,
    User,
}

impl From<Role> for RoleName {
    fn from(value: Role) -> Self {
        match value {
            Role::Admin => Self::Admin,
            Role::User => Self::User,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user_id: UserId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub nickname: Option<String>,
    pub phone: Option<String>,
    pub role: RoleName,
    pub password_changed: bool,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        let User {
            user_id,
            username,
            email,
            first_name,
            last_name,
            nickname,
            phone,
            role,
            password_changed,
        } = value;
        Self {
            user_id,
            username,
            email,
            first_name,
            last_name,
            nickname,
            phone,
            role: role.into(),
            password_changed,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[garde(email)]
    pub email: String,
    #[garde(length(min = 1))]
    pub first_name: String,
    #[garde(length(min = 1))]
    pub last_name: String,
    #[garde(skip)]
    pub nickname: Option<String>,
    #[garde(skip)]
    pub phone: Option<String>,
}

#[derive(new)]
pub struct UpdateProfileRequestWithUserId(UserId, UpdateProfileRequest);

impl From<UpdateProfileRequestWithUserId> for UpdateProfile {
    fn from(value: UpdateProfileRequestWithUserId) -> Self {
        let UpdateProfileRequestWithUserId(user_id, request) = value;
        UpdateProfile {
            user_id,
            email: request.email,
            first_name: request.first_name,
            last_name: request.last_name,
            nickname: request.nickname,
            phone: request.phone,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[garde(skip)]
    pub current_password: String,
    #[garde(length(min = 8))]
    pub new_password: String,
}

#[derive(new)]
pub struct ChangePasswordRequestWithUserId(UserId, ChangePasswordRequest);

impl From<ChangePasswordRequestWithUserId> for UpdateUserPassword {
    fn from(value: ChangePasswordRequestWithUserId) -> Self {
        let ChangePasswordRequestWithUserId(user_id, request) = value;
        UpdateUserPassword {
            user_id,
            current_password: request.current_password,
            new_password: request.new_password,
        }
    }
}

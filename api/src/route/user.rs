use axum::{
    routing::{get, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::user::{change_password, get_current_user, update_profile};

pub fn build_user_routers() -> Router<AppRegistry> {
    let user_routers = Router::new()
        .route("/me", get(get_current_user))
        .route("/me", put(update_profile))
        .route("/me/password", put(change_password));

    Router::new().nest("/users", user_routers)
}

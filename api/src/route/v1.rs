use axum::Router;
use registry::AppRegistry;

use super::{
    auth::build_auth_routers, booking::build_booking_routers, health::build_health_check_routers,
    report::build_report_routers, room::build_room_routers, user::build_user_routers,
};

pub fn routes() -> Router<AppRegistry> {
    let router = Router::new()
        .merge(build_health_check_routers())
        .merge(build_auth_routers())
        .merge(build_user_routers())
        .merge(build_room_routers())
        .merge(build_booking_routers())
        .merge(build_report_routers());

    Router::new().nest("/api/v1", router)
}

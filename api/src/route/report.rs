use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::report::{
    available_rooms_report, monthly_summary_report, room_usage_report, user_bookings_report,
};

pub fn build_report_routers() -> Router<AppRegistry> {
    let report_routers = Router::new()
        .route("/room-usage", get(room_usage_report))
        .route("/user-bookings", get(user_bookings_report))
        .route("/available-rooms", get(available_rooms_report))
        .route("/monthly-summary", get(monthly_summary_report));

    Router::new().nest("/reports", report_routers)
}

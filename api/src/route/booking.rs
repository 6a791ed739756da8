use axum::{
    routing::{delete, get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::booking::{
    create_booking, delete_booking, show_booking, show_booking_list, show_my_bookings,
    update_booking,
};

pub fn build_booking_routers() -> Router<AppRegistry> {
    let booking_routers = Router::new()
        .route("/", post(create_booking))
        .route("/", get(show_booking_list))
        .route("/me", get(show_my_bookings))
        .route("/{booking_id}", get(show_booking))
        .route("/{booking_id}", put(update_booking))
        .route("/{booking_id}", delete(delete_booking));

    Router::new().nest("/bookings", booking_routers)
}

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use kernel::availability;
use kernel::model::interval::Interval;
use kernel::report;
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::AuthorizedUser,
    model::report::{
        MonthlySummaryQuery, MonthlySummaryResponse, ReportPeriodQuery,
        RoomAvailabilityReportResponse, RoomUsageResponse, UserBookingCountResponse,
    },
};

// 日付指定のレポートは「開始日の 0 時」から「終了日の最後の瞬間」までを対象にする
fn period_window(start_date: NaiveDate, end_date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let end_of_day = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap();
    (
        start_date.and_time(NaiveTime::MIN).and_utc(),
        end_date.and_time(end_of_day).and_utc(),
    )
}

pub async fn room_usage_report(
    _user: AuthorizedUser,
    Query(query): Query<ReportPeriodQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Vec<RoomUsageResponse>>> {
    let (start, end) = period_window(query.start_date, query.end_date);

    let rooms = registry.room_repository().find_all().await?;
    let bookings = registry
        .booking_repository()
        .find_within_period(start, end)
        .await?;

    let usage = report::room_usage(&rooms, &bookings)
        .into_iter()
        .map(RoomUsageResponse::from)
        .collect();
    Ok(Json(usage))
}

pub async fn user_bookings_report(
    _user: AuthorizedUser,
    Query(query): Query<ReportPeriodQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Vec<UserBookingCountResponse>>> {
    let (start, end) = period_window(query.start_date, query.end_date);

    let users = registry.user_repository().find_all().await?;
    let bookings = registry
        .booking_repository()
        .find_within_period(start, end)
        .await?;

    let counts = report::user_booking_counts(&users, &bookings)
        .into_iter()
        .map(UserBookingCountResponse::from)
        .collect();
    Ok(Json(counts))
}

pub async fn available_rooms_report(
    _user: AuthorizedUser,
    Query(query): Query<ReportPeriodQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Vec<RoomAvailabilityReportResponse>>> {
    if query.start_date > query.end_date {
        return Err(AppError::InvalidDateRangeError);
    }

    // 走査の対象日は [開始日, 終了日) の半開区間
    let range_start = query.start_date.and_time(NaiveTime::MIN).and_utc();
    let range_end = query.end_date.and_time(NaiveTime::MIN).and_utc();

    let rooms = registry.room_repository().find_all().await?;
    let bookings = if range_start < range_end {
        let range = Interval::new(range_start, range_end)?;
        registry.booking_repository().find_overlapping(&range).await?
    } else {
        Vec::new()
    };

    let scanned = availability::scan_availability(&rooms, &bookings, range_start, range_end)
        .into_iter()
        .map(RoomAvailabilityReportResponse::from)
        .collect();
    Ok(Json(scanned))
}

pub async fn monthly_summary_report(
    _user: AuthorizedUser,
    Query(query): Query<MonthlySummaryQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<MonthlySummaryResponse>> {
    let (start, end) = report::month_window(query.year, query.month)?;

    let bookings = registry
        .booking_repository()
        .find_within_period(start, end)
        .await?;

    Ok(Json(MonthlySummaryResponse::from(report::monthly_summary(
        &bookings,
    ))))
}

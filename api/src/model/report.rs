use std::collections::BTreeMap;

use chrono::NaiveDate;
use kernel::availability::{DayAvailability, FreeSlot, RoomAvailability};
use kernel::model::id::{RoomId, UserId};
use kernel::report::{MonthlySummary, RankedCount, RoomUsage, UserBookingCount};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPeriodQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomUsageResponse {
    pub room_id: RoomId,
    pub room_name: String,
    pub booking_count: u64,
    pub total_attendees: i64,
}

impl From<RoomUsage> for RoomUsageResponse {
    fn from(value: RoomUsage) -> Self {
        let RoomUsage {
            room_id,
            room_name,
            booking_count,
            total_attendees,
        } = value;
        Self {
            room_id,
            room_name,
            booking_count,
            total_attendees,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBookingCountResponse {
    pub user_id: UserId,
    pub user_name: String,
    pub booking_count: u64,
}

impl From<UserBookingCount> for UserBookingCountResponse {
    fn from(value: UserBookingCount) -> Self {
        let UserBookingCount {
            user_id,
            user_name,
            booking_count,
        } = value;
        Self {
            user_id,
            user_name,
            booking_count,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeSlotResponse {
    pub start: chrono::DateTime<chrono::Utc>,
    pub end: chrono::DateTime<chrono::Utc>,
}

impl From<FreeSlot> for FreeSlotResponse {
    fn from(value: FreeSlot) -> Self {
        Self {
            start: value.start,
            end: value.end,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayAvailabilityResponse {
    pub date: NaiveDate,
    pub is_available: bool,
    // 予約が 1 件もない日はフィールドごと出さない
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_slots: Option<Vec<FreeSlotResponse>>,
}

impl From<DayAvailability> for DayAvailabilityResponse {
    fn from(value: DayAvailability) -> Self {
        let DayAvailability {
            date,
            is_available,
            free_slots,
        } = value;
        Self {
            date,
            is_available,
            free_slots: free_slots
                .map(|slots| slots.into_iter().map(FreeSlotResponse::from).collect()),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomAvailabilityReportResponse {
    pub room_id: RoomId,
    pub room_name: String,
    pub availability: Vec<DayAvailabilityResponse>,
}

impl From<RoomAvailability> for RoomAvailabilityReportResponse {
    fn from(value: RoomAvailability) -> Self {
        let RoomAvailability {
            room_id,
            room_name,
            availability,
        } = value;
        Self {
            room_id,
            room_name,
            availability: availability
                .into_iter()
                .map(DayAvailabilityResponse::from)
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummaryQuery {
    pub year: i32,
    pub month: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedRoomResponse {
    pub name: String,
    pub count: u64,
    pub percentage: f64,
}

impl From<RankedCount> for RankedRoomResponse {
    fn from(value: RankedCount) -> Self {
        let RankedCount {
            name,
            count,
            percentage,
        } = value;
        Self {
            name,
            count,
            percentage,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummaryResponse {
    pub total_bookings: u64,
    pub total_attendees: i64,
    pub room_usage: BTreeMap<String, u64>,
    pub top_booked_rooms: Vec<RankedRoomResponse>,
}

impl From<MonthlySummary> for MonthlySummaryResponse {
    fn from(value: MonthlySummary) -> Self {
        let MonthlySummary {
            total_bookings,
            total_attendees,
            room_usage,
            top_booked_rooms,
        } = value;
        Self {
            total_bookings,
            total_attendees,
            room_usage: room_usage.into_iter().collect(),
            top_booked_rooms: top_booked_rooms
                .into_iter()
                .map(RankedRoomResponse::from)
                .collect(),
        }
    }
}

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use shared::error::{AppError, AppResult};

use crate::model::{
    booking::Booking,
    id::{RoomId, UserId},
    room::Room,
    user::User,
};

#[derive(Debug, Clone)]
pub struct RoomUsage {
    pub room_id: RoomId,
    pub room_name: String,
    pub booking_count: u64,
    pub total_attendees: i64,
}

/// 部屋ごとの予約件数と延べ参加人数。予約が 0 件の部屋も一覧に含める。
pub fn room_usage(rooms: &[Room], bookings: &[Booking]) -> Vec<RoomUsage> {
    rooms
        .iter()
        .map(|room| {
            let mut booking_count = 0;
            let mut total_attendees = 0;
            for b in bookings.iter().filter(|b| b.room_id() == room.room_id) {
                booking_count += 1;
                total_attendees += i64::from(b.attendee_count);
            }
            RoomUsage {
                room_id: room.room_id,
                room_name: room.name.clone(),
                booking_count,
                total_attendees,
            }
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct UserBookingCount {
    pub user_id: UserId,
    pub user_name: String,
    pub booking_count: u64,
}

/// ユーザーごとの予約件数。予約が 0 件のユーザーも一覧に含める。
pub fn user_booking_counts(users: &[User], bookings: &[Booking]) -> Vec<UserBookingCount> {
    users
        .iter()
        .map(|user| UserBookingCount {
            user_id: user.user_id,
            user_name: user.full_name(),
            booking_count: bookings.iter().filter(|b| b.booked_by == user.user_id).count() as u64,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedCount {
    pub name: String,
    pub count: u64,
    pub percentage: f64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 件数の多い順に上位 N-1 件を並べ、残りを「Others」1 件に畳み込む。
/// 同数のときは入力順を保つ（安定ソート）。合計が 0 のときは全件 0% とする。
pub fn top_n_rollup(counts: &[(String, u64)], n: usize) -> Vec<RankedCount> {
    let total: u64 = counts.iter().map(|(_, c)| c).sum();
    let percentage_of = |count: u64| {
        if total == 0 {
            0.0
        } else {
            round2(count as f64 / total as f64 * 100.0)
        }
    };

    let mut sorted: Vec<(String, u64)> = counts.to_vec();
    sorted.sort_by(|a, b| b.1.cmp(&a.1));

    if sorted.len() <= n {
        return sorted
            .into_iter()
            .map(|(name, count)| RankedCount {
                name,
                count,
                percentage: percentage_of(count),
            })
            .collect();
    }

    let others_count: u64 = sorted[n - 1..].iter().map(|(_, c)| c).sum();
    let mut ranked: Vec<RankedCount> = sorted
        .into_iter()
        .take(n - 1)
        .map(|(name, count)| RankedCount {
            name,
            count,
            percentage: percentage_of(count),
        })
        .collect();
    ranked.push(RankedCount {
        name: "Others".into(),
        count: others_count,
        percentage: percentage_of(others_count),
    });
    ranked
}

#[derive(Debug, Clone)]
pub struct MonthlySummary {
    pub total_bookings: u64,
    pub total_attendees: i64,
    pub room_usage: Vec<(String, u64)>,
    pub top_booked_rooms: Vec<RankedCount>,
}

const TOP_BOOKED_ROOMS: usize = 5;

/// 月初から月末（その日の最後の瞬間）までの集計窓。
pub fn month_window(year: i32, month: u32) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(AppError::InvalidDateRangeError)?;
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or(AppError::InvalidDateRangeError)?;
    let last = first_of_next.pred_opt().ok_or(AppError::InvalidDateRangeError)?;

    let end_of_day = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap();
    Ok((
        first.and_time(NaiveTime::MIN).and_utc(),
        last.and_time(end_of_day).and_utc(),
    ))
}

/// 月次サマリー。対象月の予約（窓に完全に収まるもの）を渡す前提。
/// 部屋名ごとの件数は最初に現れた順で数え、上位 5 件をロールアップする。
pub fn monthly_summary(bookings: &[Booking]) -> MonthlySummary {
    let total_bookings = bookings.len() as u64;
    let total_attendees = bookings.iter().map(|b| i64::from(b.attendee_count)).sum();

    let mut room_usage: Vec<(String, u64)> = Vec::new();
    for b in bookings {
        match room_usage.iter_mut().find(|(name, _)| *name == b.room.name) {
            Some((_, count)) => *count += 1,
            None => room_usage.push((b.room.name.clone(), 1)),
        }
    }

    let top_booked_rooms = top_n_rollup(&room_usage, TOP_BOOKED_ROOMS);

    MonthlySummary {
        total_bookings,
        total_attendees,
        room_usage,
        top_booked_rooms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        booking::BookingRoom,
        id::BookingId,
        interval::Interval,
        role::Role,
    };
    use chrono::TimeZone;

    fn booking(id: i64, room_id: i64, user_id: i64, attendees: i32) -> Booking {
        let start = Utc.with_ymd_and_hms(2025, 6, 2, 9 + id as u32, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 6, 2, 10 + id as u32, 0, 0).unwrap();
        Booking {
            booking_id: BookingId::new(id),
            booked_by: UserId::new(user_id),
            username: "tester".into(),
            interval: Interval::new(start, end).unwrap(),
            title: "meeting".into(),
            description: None,
            attendee_count: attendees,
            room: BookingRoom {
                room_id: RoomId::new(room_id),
                name: format!("Room {room_id}"),
                capacity: 10,
            },
        }
    }

    fn room(id: i64) -> Room {
        Room {
            room_id: RoomId::new(id),
            name: format!("Room {id}"),
            description: "".into(),
            capacity: 10,
            image_url: None,
        }
    }

    fn user(id: i64, first: &str) -> User {
        User {
            user_id: UserId::new(id),
            username: first.to_lowercase(),
            email: format!("{}@example.com", first.to_lowercase()),
            first_name: first.into(),
            last_name: "Tan".into(),
            nickname: None,
            phone: None,
            role: Role::User,
            password_changed: false,
        }
    }

    #[test]
    fn room_usage_counts_and_sums_per_room() {
        let rooms = vec![room(1), room(2)];
        let bookings = vec![booking(1, 1, 1, 4), booking(2, 1, 2, 6), booking(3, 2, 1, 2)];
        let usage = room_usage(&rooms, &bookings);
        assert_eq!(usage[0].booking_count, 2);
        assert_eq!(usage[0].total_attendees, 10);
        assert_eq!(usage[1].booking_count, 1);
        assert_eq!(usage[1].total_attendees, 2);
    }

    #[test]
    fn rooms_without_bookings_appear_with_zero() {
        let rooms = vec![room(1)];
        let usage = room_usage(&rooms, &[]);
        assert_eq!(usage.len(), 1);
        assert_eq!(usage[0].booking_count, 0);
        assert_eq!(usage[0].total_attendees, 0);
    }

    #[test]
    fn user_counts_cover_all_users() {
        let users = vec![user(1, "Anan"), user(2, "Busaba")];
        let bookings = vec![booking(1, 1, 1, 4), booking(2, 1, 1, 6)];
        let counts = user_booking_counts(&users, &bookings);
        assert_eq!(counts[0].user_name, "Anan Tan");
        assert_eq!(counts[0].booking_count, 2);
        assert_eq!(counts[1].booking_count, 0);
    }

    #[test]
    fn top_n_rolls_the_tail_into_others() {
        let counts = vec![
            ("A".to_string(), 50),
            ("B".to_string(), 30),
            ("C".to_string(), 15),
            ("D".to_string(), 5),
        ];
        let ranked = top_n_rollup(&counts, 3);
        assert_eq!(
            ranked,
            vec![
                RankedCount { name: "A".into(), count: 50, percentage: 50.0 },
                RankedCount { name: "B".into(), count: 30, percentage: 30.0 },
                RankedCount { name: "Others".into(), count: 20, percentage: 20.0 },
            ]
        );
    }

    #[test]
    fn top_n_without_overflow_has_no_others_entry() {
        let counts = vec![("A".to_string(), 2), ("B".to_string(), 1)];
        let ranked = top_n_rollup(&counts, 5);
        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|r| r.name != "Others"));
        assert_eq!(ranked[0].percentage, 66.67);
    }

    #[test]
    fn ties_keep_input_order() {
        let counts = vec![
            ("First".to_string(), 3),
            ("Second".to_string(), 3),
            ("Third".to_string(), 3),
        ];
        let ranked = top_n_rollup(&counts, 5);
        let names: Vec<&str> = ranked.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn zero_total_does_not_divide_by_zero() {
        let counts = vec![("A".to_string(), 0)];
        let ranked = top_n_rollup(&counts, 3);
        assert_eq!(ranked[0].percentage, 0.0);
    }

    #[test]
    fn empty_month_yields_zeroed_summary() {
        let summary = monthly_summary(&[]);
        assert_eq!(summary.total_bookings, 0);
        assert_eq!(summary.total_attendees, 0);
        assert!(summary.room_usage.is_empty());
        assert!(summary.top_booked_rooms.is_empty());
    }

    #[test]
    fn monthly_summary_totals_and_top_rooms() {
        let bookings = vec![booking(1, 1, 1, 4), booking(2, 2, 1, 6), booking(3, 1, 2, 2)];
        let summary = monthly_summary(&bookings);
        assert_eq!(summary.total_bookings, 3);
        assert_eq!(summary.total_attendees, 12);
        assert_eq!(summary.room_usage, vec![("Room 1".to_string(), 2), ("Room 2".to_string(), 1)]);
        assert_eq!(summary.top_booked_rooms[0].name, "Room 1");
        assert_eq!(summary.top_booked_rooms[0].count, 2);
    }

    #[test]
    fn month_window_spans_first_to_last_instant() {
        let (start, end) = month_window(2025, 6).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap());
        assert_eq!(
            end,
            Utc.with_ymd_and_hms(2025, 6, 30, 23, 59, 59).unwrap()
                + chrono::Duration::milliseconds(999)
        );
        assert!(month_window(2025, 13).is_err());

        let (_, december_end) = month_window(2025, 12).unwrap();
        assert_eq!(december_end.date_naive(), NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }
}

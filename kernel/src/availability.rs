use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::model::{
    booking::Booking,
    id::BookingId,
    interval::Interval,
    room::Room,
};

/// 指定した部屋の既存予約の中から、候補区間と重複する最初の予約を返す。
/// 更新時は自分自身と衝突判定しないよう `exclude` に予約 ID を渡す。
pub fn find_conflict<'a>(
    bookings: &'a [Booking],
    candidate: &Interval,
    exclude: Option<BookingId>,
) -> Option<&'a Booking> {
    bookings
        .iter()
        .filter(|b| exclude != Some(b.booking_id))
        .find(|b| b.interval.overlaps(candidate))
}

/// 候補区間と重複する予約をすべて返す。単一部屋の空き確認で使う。
pub fn find_conflicts<'a>(bookings: &'a [Booking], range: &Interval) -> Vec<&'a Booking> {
    bookings.iter().filter(|b| b.interval.overlaps(range)).collect()
}

/// 指定区間に重複予約がひとつもない部屋の一覧を返す。
/// 部屋ごとに衝突判定へ委譲するだけで、日単位の走査は行わない。
pub fn rooms_without_conflict(rooms: &[Room], bookings: &[Booking], range: &Interval) -> Vec<Room> {
    rooms
        .iter()
        .filter(|room| {
            let room_bookings: Vec<Booking> = bookings
                .iter()
                .filter(|b| b.room_id() == room.room_id)
                .cloned()
                .collect();
            find_conflict(&room_bookings, range, None).is_none()
        })
        .cloned()
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub is_available: bool,
    // 予約が 1 件もない日は None（日全体が空き）
    pub free_slots: Option<Vec<FreeSlot>>,
}

#[derive(Debug, Clone)]
pub struct RoomAvailability {
    pub room_id: crate::model::id::RoomId,
    pub room_name: String,
    pub availability: Vec<DayAvailability>,
}

/// 1 日の窓。始端は 0 時、終端は 23:59:59.999 の「その日の最後の瞬間」。
/// 終端だけ閉区間なのは日境界の特例で、他の区間演算の半開規約とは別扱い。
pub fn day_window(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = day.and_time(NaiveTime::MIN).and_utc();
    let end_of_day = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap();
    let end = day.and_time(end_of_day).and_utc();
    (start, end)
}

// 予約がその日にかかっているかどうか。窓との重なりに加え、
// 開始日がその日に一致する予約も拾う（深夜 0 時をまたぐ予約の扱いを揃えるため）。
fn intersects_day(
    interval: &Interval,
    day: NaiveDate,
    day_start: DateTime<Utc>,
    day_end: DateTime<Utc>,
) -> bool {
    (interval.start() <= day_end && interval.end() > day_start)
        || interval.start().date_naive() == day
}

/// その日の予約の隙間（空き時間帯）を左から右へ 1 回の走査で求める。
/// 入力はソートせずに受け取り、内部でコピーしてから並べ替える。
pub fn free_slots(
    intervals: &[Interval],
    day_start: DateTime<Utc>,
    day_end: DateTime<Utc>,
) -> Vec<FreeSlot> {
    let mut sorted: Vec<Interval> = intervals.to_vec();
    sorted.sort_by_key(|iv| iv.start());

    let mut slots = Vec::new();
    let mut cursor = day_start;
    for iv in &sorted {
        // cursor と同時刻に始まる予約から長さ 0 の枠を作らないよう、厳密な比較にする
        if iv.start() > cursor {
            slots.push(FreeSlot {
                start: cursor,
                end: iv.start(),
            });
        }
        cursor = cursor.max(iv.end());
    }
    if cursor < day_end {
        slots.push(FreeSlot {
            start: cursor,
            end: day_end,
        });
    }
    slots
}

/// 部屋ごと・日ごとの空き状況レポートを組み立てる。
/// 入力の予約一覧は一切変更しない（同じ入力なら何度呼んでも同じ結果になる）。
pub fn scan_availability(
    rooms: &[Room],
    bookings: &[Booking],
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
) -> Vec<RoomAvailability> {
    rooms
        .iter()
        .map(|room| {
            let room_bookings: Vec<&Booking> = bookings
                .iter()
                .filter(|b| b.room_id() == room.room_id)
                .collect();

            let mut availability = Vec::new();
            let mut day = range_start.date_naive();
            loop {
                let (day_start, day_end) = day_window(day);
                // 初日は走査範囲の開始時刻、それ以降は 0 時を基準に範囲内か判定する
                let iter_instant = if day == range_start.date_naive() {
                    range_start
                } else {
                    day_start
                };
                if iter_instant >= range_end {
                    break;
                }

                let day_intervals: Vec<Interval> = room_bookings
                    .iter()
                    .filter(|b| intersects_day(&b.interval, day, day_start, day_end))
                    .map(|b| b.interval)
                    .collect();

                if day_intervals.is_empty() {
                    availability.push(DayAvailability {
                        date: day,
                        is_available: true,
                        free_slots: None,
                    });
                } else {
                    let slots = free_slots(&day_intervals, day_start, day_end);
                    availability.push(DayAvailability {
                        date: day,
                        is_available: !slots.is_empty(),
                        free_slots: Some(slots),
                    });
                }

                day = match day.succ_opt() {
                    Some(next) => next,
                    None => break,
                };
            }

            RoomAvailability {
                room_id: room.room_id,
                room_name: room.name.clone(),
                availability,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        booking::BookingRoom,
        id::{RoomId, UserId},
    };
    use chrono::TimeZone;

    fn at(day: u32, hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, day, hour, min, 0).unwrap()
    }

    fn booking(id: i64, room_id: i64, start: DateTime<Utc>, end: DateTime<Utc>) -> Booking {
        Booking {
            booking_id: BookingId::new(id),
            booked_by: UserId::new(1),
            username: "tester".into(),
            interval: Interval::new(start, end).unwrap(),
            title: "meeting".into(),
            description: None,
            attendee_count: 3,
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

    #[test]
    fn detects_overlapping_booking() {
        let existing = vec![booking(1, 1, at(2, 9, 0), at(2, 10, 0))];
        let candidate = Interval::new(at(2, 9, 30), at(2, 10, 30)).unwrap();
        let hit = find_conflict(&existing, &candidate, None);
        assert_eq!(hit.map(|b| b.booking_id), Some(BookingId::new(1)));
    }

    #[test]
    fn touching_candidate_is_not_a_conflict() {
        let existing = vec![booking(1, 1, at(2, 9, 0), at(2, 10, 0))];
        let candidate = Interval::new(at(2, 10, 0), at(2, 11, 0)).unwrap();
        assert!(find_conflict(&existing, &candidate, None).is_none());
    }

    #[test]
    fn excluded_booking_does_not_conflict_with_itself() {
        let existing = vec![booking(1, 1, at(2, 9, 0), at(2, 10, 0))];
        let candidate = Interval::new(at(2, 9, 0), at(2, 10, 0)).unwrap();
        assert!(find_conflict(&existing, &candidate, Some(BookingId::new(1))).is_none());
        assert!(find_conflict(&existing, &candidate, None).is_some());
    }

    #[test]
    fn free_slots_between_two_bookings() {
        let (day_start, day_end) = day_window(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
        let intervals = vec![
            Interval::new(at(2, 9, 0), at(2, 10, 0)).unwrap(),
            Interval::new(at(2, 14, 0), at(2, 15, 0)).unwrap(),
        ];
        let slots = free_slots(&intervals, day_start, day_end);
        assert_eq!(
            slots,
            vec![
                FreeSlot { start: day_start, end: at(2, 9, 0) },
                FreeSlot { start: at(2, 10, 0), end: at(2, 14, 0) },
                FreeSlot { start: at(2, 15, 0), end: day_end },
            ]
        );
    }

    #[test]
    fn no_zero_length_slot_when_booking_starts_at_cursor() {
        let (day_start, day_end) = day_window(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
        let intervals = vec![
            Interval::new(day_start, at(2, 10, 0)).unwrap(),
            Interval::new(at(2, 10, 0), at(2, 12, 0)).unwrap(),
        ];
        let slots = free_slots(&intervals, day_start, day_end);
        assert_eq!(
            slots,
            vec![FreeSlot { start: at(2, 12, 0), end: day_end }]
        );
    }

    #[test]
    fn unsorted_input_is_not_mutated_and_scan_is_idempotent() {
        let rooms = vec![room(1)];
        let bookings = vec![
            booking(2, 1, at(2, 14, 0), at(2, 15, 0)),
            booking(1, 1, at(2, 9, 0), at(2, 10, 0)),
        ];
        let before: Vec<BookingId> = bookings.iter().map(|b| b.booking_id).collect();

        let first = scan_availability(&rooms, &bookings, at(2, 0, 0), at(3, 0, 0));
        let second = scan_availability(&rooms, &bookings, at(2, 0, 0), at(3, 0, 0));

        let after: Vec<BookingId> = bookings.iter().map(|b| b.booking_id).collect();
        assert_eq!(before, after);
        assert_eq!(
            first[0].availability[0].free_slots,
            second[0].availability[0].free_slots
        );
        let slots = first[0].availability[0].free_slots.as_ref().unwrap();
        assert_eq!(slots.len(), 3);
        assert_eq!(slots[1].start, at(2, 10, 0));
        assert_eq!(slots[1].end, at(2, 14, 0));
    }

    #[test]
    fn day_without_bookings_is_fully_available() {
        let rooms = vec![room(1)];
        let bookings = vec![booking(1, 1, at(2, 9, 0), at(2, 10, 0))];
        let report = scan_availability(&rooms, &bookings, at(2, 0, 0), at(4, 0, 0));
        assert_eq!(report[0].availability.len(), 2);
        let day2 = &report[0].availability[1];
        assert_eq!(day2.date, NaiveDate::from_ymd_opt(2025, 6, 3).unwrap());
        assert!(day2.is_available);
        assert!(day2.free_slots.is_none());
    }

    #[test]
    fn fully_booked_day_has_no_free_slots() {
        let (day_start, day_end) = day_window(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
        let intervals = vec![Interval::new(day_start, day_end).unwrap()];
        // 23:59:59.999 ちょうどに終わる予約でも末尾の空き枠は出さない
        assert!(free_slots(&intervals, day_start, day_end).is_empty());
    }

    #[test]
    fn fleet_check_returns_rooms_without_overlap() {
        let rooms = vec![room(1), room(2)];
        let bookings = vec![booking(1, 1, at(2, 9, 0), at(2, 10, 0))];
        let range = Interval::new(at(2, 9, 30), at(2, 11, 0)).unwrap();
        let free = rooms_without_conflict(&rooms, &bookings, &range);
        assert_eq!(free.len(), 1);
        assert_eq!(free[0].room_id, RoomId::new(2));

        // 境界で接するだけなら両方空いている
        let range = Interval::new(at(2, 10, 0), at(2, 11, 0)).unwrap();
        assert_eq!(rooms_without_conflict(&rooms, &bookings, &range).len(), 2);
    }
}

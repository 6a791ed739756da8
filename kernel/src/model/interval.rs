use chrono::{DateTime, Utc};
use shared::error::{AppError, AppResult};

/// 半開区間 `[start, end)` の時間帯。予約の時間枠を表す値型。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Interval {
    /// `start >= end` の区間は作らせない。
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<Self> {
        if start >= end {
            return Err(AppError::UnprocessableEntity(format!(
                "開始時刻（{start}）は終了時刻（{end}）より前である必要があります。"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// 2 つの半開区間が 1 瞬でも重なるかどうか。
    /// 境界で接しているだけの場合（end == start）は重ならない扱い。
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, hour, min, 0).unwrap()
    }

    #[test]
    fn rejects_inverted_interval() {
        assert!(Interval::new(at(10, 0), at(9, 0)).is_err());
        assert!(Interval::new(at(10, 0), at(10, 0)).is_err());
    }

    #[test]
    fn overlap_is_symmetric() {
        let a = Interval::new(at(9, 0), at(11, 0)).unwrap();
        let b = Interval::new(at(10, 0), at(12, 0)).unwrap();
        assert_eq!(a.overlaps(&b), b.overlaps(&a));
        assert!(a.overlaps(&b));
    }

    #[test]
    fn interval_overlaps_itself() {
        let a = Interval::new(at(9, 0), at(10, 0)).unwrap();
        assert!(a.overlaps(&a));
    }

    #[test]
    fn touching_intervals_do_not_overlap() {
        let a = Interval::new(at(9, 0), at(10, 0)).unwrap();
        let b = Interval::new(at(10, 0), at(11, 0)).unwrap();
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn contains_includes_start_excludes_end() {
        let a = Interval::new(at(9, 0), at(10, 0)).unwrap();
        assert!(a.contains(at(9, 0)));
        assert!(a.contains(at(9, 59)));
        assert!(!a.contains(at(10, 0)));
    }
}

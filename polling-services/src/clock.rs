use chrono::{DateTime, Local, LocalResult, NaiveDateTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use shared::Clock;

/// Which zone "local" means for week boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    System,
    Named(Tz),
}

/// Wall clock in a configurable zone, optionally pinned to a fixed instant
#[derive(Debug, Clone, Copy)]
pub struct WallClock {
    zone: Zone,
    pinned: Option<NaiveDateTime>,
}

impl WallClock {
    pub fn new(zone: Option<Tz>) -> Self {
        Self {
            zone: zone.map_or(Zone::System, Zone::Named),
            pinned: None,
        }
    }

    /// Freeze `now()` at `local`, keeping the zone for UTC conversion
    pub fn pinned_at(self, local: NaiveDateTime) -> Self {
        Self {
            pinned: Some(local),
            ..self
        }
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }
}

impl Clock for WallClock {
    fn now(&self) -> NaiveDateTime {
        if let Some(pinned) = self.pinned {
            return pinned;
        }
        match self.zone {
            Zone::System => Local::now().naive_local(),
            Zone::Named(tz) => Utc::now().with_timezone(&tz).naive_local(),
        }
    }

    fn to_utc(&self, local: NaiveDateTime) -> DateTime<Utc> {
        match self.zone {
            Zone::System => resolve_local(&Local, local),
            Zone::Named(tz) => resolve_local(&tz, local),
        }
    }
}

/// Map a wall-clock time to UTC, taking the earlier instant on DST overlaps
/// and the first valid instant after a DST gap.
fn resolve_local<Z: TimeZone>(tz: &Z, local: NaiveDateTime) -> DateTime<Utc> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => local
            .checked_add_signed(TimeDelta::hours(1))
            .and_then(|shifted| tz.from_local_datetime(&shifted).earliest())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&local)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_named_zone_conversion() {
        let clock = WallClock::new(Some(chrono_tz::America::Chicago));
        let utc = clock.to_utc(local(2025, 1, 6, 0, 0));
        assert_eq!(utc, Utc.with_ymd_and_hms(2025, 1, 6, 6, 0, 0).unwrap());
    }

    #[test]
    fn test_dst_gap_moves_forward() {
        // 02:30 does not exist in Chicago on 2025-03-09
        let clock = WallClock::new(Some(chrono_tz::America::Chicago));
        let utc = clock.to_utc(local(2025, 3, 9, 2, 30));
        assert_eq!(utc, Utc.with_ymd_and_hms(2025, 3, 9, 8, 30, 0).unwrap());
    }

    #[test]
    fn test_dst_overlap_takes_earliest() {
        // 01:30 happens twice in Chicago on 2025-11-02
        let clock = WallClock::new(Some(chrono_tz::America::Chicago));
        let utc = clock.to_utc(local(2025, 11, 2, 1, 30));
        assert_eq!(utc, Utc.with_ymd_and_hms(2025, 11, 2, 6, 30, 0).unwrap());
    }

    #[test]
    fn test_pinned_clock() {
        let now = local(2025, 1, 1, 9, 0);
        let clock = WallClock::new(Some(chrono_tz::UTC)).pinned_at(now);
        assert_eq!(clock.now(), now);
        assert_eq!(clock.zone(), Zone::Named(chrono_tz::UTC));
    }
}

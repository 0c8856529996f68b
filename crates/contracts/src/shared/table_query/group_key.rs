use chrono::NaiveDate;

/// Bucket key for schedule-date grouping.
///
/// Rows without a usable date land in the `Unscheduled` bucket. The derived
/// ordering is the one ordering rule of the system: dated buckets ascending,
/// `Unscheduled` always last. Both the bucketed pagination layer and the
/// print composer order groups through this type, so the server page and the
/// printed page can never disagree about where the undated bucket sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupKey {
    Scheduled(NaiveDate),
    Unscheduled,
}

impl GroupKey {
    pub fn from_date(date: Option<NaiveDate>) -> Self {
        match date {
            Some(d) => GroupKey::Scheduled(d),
            None => GroupKey::Unscheduled,
        }
    }

    /// Lenient parse from the stored `YYYY-MM-DD` form. A missing or
    /// malformed value falls into the unscheduled bucket rather than
    /// failing the request.
    pub fn parse(raw: Option<&str>) -> Self {
        raw.and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
            .map(GroupKey::Scheduled)
            .unwrap_or(GroupKey::Unscheduled)
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            GroupKey::Scheduled(d) => Some(*d),
            GroupKey::Unscheduled => None,
        }
    }

    /// Label shown on group headers and exports.
    pub fn label(&self) -> String {
        match self {
            GroupKey::Scheduled(d) => d.format("%Y-%m-%d").to_string(),
            GroupKey::Unscheduled => "Unscheduled".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn unscheduled_sorts_after_every_date() {
        let mut keys = vec![
            GroupKey::Unscheduled,
            GroupKey::Scheduled(date("2024-01-10")),
            GroupKey::Scheduled(date("2024-01-05")),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                GroupKey::Scheduled(date("2024-01-05")),
                GroupKey::Scheduled(date("2024-01-10")),
                GroupKey::Unscheduled,
            ]
        );
    }

    #[test]
    fn malformed_dates_fall_into_the_unscheduled_bucket() {
        assert_eq!(GroupKey::parse(None), GroupKey::Unscheduled);
        assert_eq!(GroupKey::parse(Some("")), GroupKey::Unscheduled);
        assert_eq!(GroupKey::parse(Some("01/10/2024")), GroupKey::Unscheduled);
        assert_eq!(
            GroupKey::parse(Some(" 2024-01-10 ")),
            GroupKey::Scheduled(date("2024-01-10"))
        );
    }

    #[test]
    fn label_uses_iso_date_or_unscheduled() {
        assert_eq!(GroupKey::Scheduled(date("2024-03-04")).label(), "2024-03-04");
        assert_eq!(GroupKey::Unscheduled.label(), "Unscheduled");
    }
}

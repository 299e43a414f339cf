use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use tabview_types::{Error, Result, TableRecord};

/// Candidate timestamp formats, tried in order; first valid parse wins.
/// RFC 3339 is attempted before these.
const CANDIDATE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%d-%m-%Y %H:%M",
];

const CANDIDATE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y"];

/// Parse a raw record timestamp. `None` means the record is excluded from
/// bucketing, never that the batch fails.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for format in CANDIDATE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    for format in CANDIDATE_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date.and_time(NaiveTime::MIN));
        }
    }
    None
}

/// One bucket boundary: records whose calendar-day offset from today is
/// `<= upto` land here (first match wins). `upto: None` is the catch-all
/// tail and must close the config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketSpec {
    pub label: String,
    pub upto: Option<i64>,
}

impl BucketSpec {
    pub fn new(label: impl Into<String>, upto: Option<i64>) -> Self {
        Self {
            label: label.into(),
            upto,
        }
    }
}

/// Ordered bucket boundaries. The bucket count and day offsets are
/// configurable; the classic overdue/today/upcoming split is the default.
/// Construction goes through `new` so the boundary invariants always hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketConfig {
    specs: Vec<BucketSpec>,
}

impl BucketConfig {
    pub fn new(specs: Vec<BucketSpec>) -> Result<Self> {
        if specs.is_empty() {
            return Err(Error::Validation("bucket config needs at least one bucket".into()));
        }
        match specs.last() {
            Some(BucketSpec { upto: None, .. }) => {}
            _ => {
                return Err(Error::Validation(
                    "last bucket must be an unbounded catch-all".into(),
                ));
            }
        }
        let bounds: Vec<i64> = specs.iter().filter_map(|s| s.upto).collect();
        if specs[..specs.len() - 1].iter().any(|s| s.upto.is_none()) {
            return Err(Error::Validation(
                "only the last bucket may be unbounded".into(),
            ));
        }
        if bounds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::Validation(
                "bucket day offsets must be strictly increasing".into(),
            ));
        }
        Ok(Self { specs })
    }

    /// overdue (before today) / today / upcoming (everything after).
    pub fn three_bucket() -> Self {
        Self {
            specs: vec![
                BucketSpec::new("overdue", Some(-1)),
                BucketSpec::new("today", Some(0)),
                BucketSpec::new("upcoming", None),
            ],
        }
    }

    pub fn specs(&self) -> &[BucketSpec] {
        &self.specs
    }

    fn index_for(&self, offset_days: i64) -> usize {
        self.specs
            .iter()
            .position(|s| s.upto.is_none_or(|upto| offset_days <= upto))
            .unwrap_or(self.specs.len() - 1)
    }
}

impl Default for BucketConfig {
    fn default() -> Self {
        Self::three_bucket()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket<R> {
    pub label: String,
    pub records: Vec<R>,
}

/// Bucketing output. `skipped` counts records whose timestamp failed every
/// candidate format; they appear in no bucket and in no total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucketed<R> {
    pub buckets: Vec<Bucket<R>>,
    pub skipped: usize,
}

impl<R> Bucketed<R> {
    pub fn total(&self) -> usize {
        self.buckets.iter().map(|b| b.records.len()).sum()
    }
}

/// Classify records into buckets relative to `now`.
///
/// `now` is captured once by the caller so every record in one pass is
/// measured against the same instant. Insertion order inside each bucket
/// follows the input order.
pub fn bucket_records<R: TableRecord + Clone>(
    records: &[R],
    config: &BucketConfig,
    now: NaiveDateTime,
) -> Bucketed<R> {
    let today = now.date();
    let mut buckets: Vec<Bucket<R>> = config
        .specs
        .iter()
        .map(|s| Bucket {
            label: s.label.clone(),
            records: Vec::new(),
        })
        .collect();
    let mut skipped = 0;

    for record in records {
        let parsed = record.occurred_at().and_then(parse_timestamp);
        match parsed {
            Some(dt) => {
                let offset = (dt.date() - today).num_days();
                buckets[config.index_for(offset)].records.push(record.clone());
            }
            None => skipped += 1,
        }
    }

    Bucketed { buckets, skipped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabview_types::UserId;

    #[derive(Debug, Clone)]
    struct Scheduled {
        title: String,
        at: Option<String>,
    }

    impl Scheduled {
        fn new(title: &str, at: &str) -> Self {
            Self {
                title: title.into(),
                at: Some(at.into()),
            }
        }
    }

    impl TableRecord for Scheduled {
        fn search_haystack(&self) -> String {
            self.title.clone()
        }

        fn owner(&self) -> Option<&UserId> {
            None
        }

        fn occurred_at(&self) -> Option<&str> {
            self.at.as_deref()
        }
    }

    fn noon(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_timestamp_format_fallback() {
        assert!(parse_timestamp("2024-06-15T10:30:00Z").is_some());
        assert!(parse_timestamp("2024-06-15 10:30:00").is_some());
        assert!(parse_timestamp("15-06-2024 10:30").is_some());
        assert!(parse_timestamp("2024-06-15").is_some());
        assert!(parse_timestamp("15-06-2024").is_some());
        assert!(parse_timestamp("not-a-date").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_three_bucket_classification() {
        let now = noon(2024, 6, 15);
        let records = vec![
            Scheduled::new("late", "2024-06-10"),
            Scheduled::new("now", "2024-06-15 23:59:00"),
            Scheduled::new("next", "2024-06-16"),
            Scheduled::new("far", "2024-06-30"),
            Scheduled::new("broken", "not-a-date"),
        ];

        let out = bucket_records(&records, &BucketConfig::default(), now);

        assert_eq!(out.buckets[0].label, "overdue");
        assert_eq!(out.buckets[0].records[0].title, "late");
        assert_eq!(out.buckets[1].records[0].title, "now");
        // The 3-bucket variant deliberately lands both tomorrow and two
        // weeks out in "upcoming".
        assert_eq!(out.buckets[2].records.len(), 2);
        assert_eq!(out.skipped, 1);
        assert_eq!(out.total(), 4);
    }

    #[test]
    fn test_custom_offsets_split_the_future() {
        let config = BucketConfig::new(vec![
            BucketSpec::new("overdue", Some(-1)),
            BucketSpec::new("today", Some(0)),
            BucketSpec::new("tomorrow", Some(1)),
            BucketSpec::new("this_week", Some(7)),
            BucketSpec::new("later", None),
        ])
        .unwrap();

        let now = noon(2024, 6, 15);
        let records = vec![
            Scheduled::new("a", "2024-06-16"),
            Scheduled::new("b", "2024-06-20"),
            Scheduled::new("c", "2024-07-20"),
        ];

        let out = bucket_records(&records, &config, now);
        assert_eq!(out.buckets[2].records[0].title, "a");
        assert_eq!(out.buckets[3].records[0].title, "b");
        assert_eq!(out.buckets[4].records[0].title, "c");
    }

    #[test]
    fn test_config_validation() {
        assert!(BucketConfig::new(vec![]).is_err());
        assert!(BucketConfig::new(vec![BucketSpec::new("bounded", Some(3))]).is_err());
        assert!(
            BucketConfig::new(vec![
                BucketSpec::new("tail", None),
                BucketSpec::new("late", Some(1)),
            ])
            .is_err()
        );
        assert!(
            BucketConfig::new(vec![
                BucketSpec::new("b", Some(5)),
                BucketSpec::new("a", Some(2)),
                BucketSpec::new("tail", None),
            ])
            .is_err()
        );
    }

    #[test]
    fn test_missing_timestamp_counts_as_skipped() {
        let record = Scheduled {
            title: "never".into(),
            at: None,
        };
        let out = bucket_records(&[record], &BucketConfig::default(), noon(2024, 6, 15));
        assert_eq!(out.skipped, 1);
        assert_eq!(out.total(), 0);
    }
}

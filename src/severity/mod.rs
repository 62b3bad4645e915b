//! Severity classification for feed observations.
//!
//! Both classifiers are total lookup functions over a fixed table: any code
//! absent from the table resolves to `Unknown`, never an error. The raw
//! codes come straight from the feed and carry no guaranteed bound.

use std::collections::BTreeMap;
use std::fmt;

/// JMA seismic intensity steps as reported by the P2P-quake feed.
///
/// Ordered ascending by severity; `NoData` ("estimated 5-lower or above")
/// and `Unknown` sort after the numeric steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IntensityScale {
    Zero,
    One,
    Two,
    Three,
    Four,
    FiveLow,
    FiveHigh,
    SixLow,
    SixHigh,
    Seven,
    NoData,
    Unknown,
}

impl IntensityScale {
    /// Converts a raw feed intensity code into a scale step.
    ///
    /// Total over all of `i32`: codes outside the table map to `Unknown`.
    pub fn from_code(code: i32) -> IntensityScale {
        match code {
            -1 => IntensityScale::Unknown,
            10 => IntensityScale::One,
            20 => IntensityScale::Two,
            30 => IntensityScale::Three,
            40 => IntensityScale::Four,
            45 => IntensityScale::FiveLow,
            46 => IntensityScale::NoData,
            50 => IntensityScale::FiveHigh,
            55 => IntensityScale::SixLow,
            60 => IntensityScale::SixHigh,
            70 => IntensityScale::Seven,
            _ => IntensityScale::Unknown,
        }
    }

    /// Returns the Japanese display label for this step.
    pub fn label(&self) -> &'static str {
        match self {
            IntensityScale::Zero => "震度0",
            IntensityScale::One => "震度1",
            IntensityScale::Two => "震度2",
            IntensityScale::Three => "震度3",
            IntensityScale::Four => "震度4",
            IntensityScale::FiveLow => "震度5弱",
            IntensityScale::FiveHigh => "震度5強",
            IntensityScale::SixLow => "震度6弱",
            IntensityScale::SixHigh => "震度6強",
            IntensityScale::Seven => "震度7",
            IntensityScale::NoData => "震度5弱以上と推定",
            IntensityScale::Unknown => "不明",
        }
    }
}

impl fmt::Display for IntensityScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Tsunami forecast grades.
///
/// Ordered ascending: None < Slight < Watch < Warning < MajorWarning.
/// `Unknown` sits outside the severity order and sorts last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TsunamiGrade {
    None,
    Slight,
    Watch,
    Warning,
    MajorWarning,
    Unknown,
}

impl TsunamiGrade {
    /// Converts a raw feed grade code into a grade.
    ///
    /// Total over all strings: codes outside the table (including the
    /// empty string) map to `Unknown`.
    pub fn from_code(code: &str) -> TsunamiGrade {
        match code {
            "MajorWarning" => TsunamiGrade::MajorWarning,
            "Warning" => TsunamiGrade::Warning,
            "Watch" => TsunamiGrade::Watch,
            "Unknown" => TsunamiGrade::Unknown,
            _ => TsunamiGrade::Unknown,
        }
    }

    /// Derives a grade from a numeric forecast height in meters.
    ///
    /// Alternative derivation path for records that carry only a height;
    /// the code-based [`TsunamiGrade::from_code`] is the primary path and
    /// the two must not be conflated. Heights of 0.2 m or below carry no
    /// grade.
    pub fn from_forecast_height(meters: f32) -> Option<TsunamiGrade> {
        if meters > 3.0 {
            Some(TsunamiGrade::MajorWarning)
        } else if meters > 1.0 {
            Some(TsunamiGrade::Warning)
        } else if meters > 0.2 {
            Some(TsunamiGrade::Watch)
        } else {
            None
        }
    }

    /// Returns the Japanese display label for this grade.
    pub fn label(&self) -> &'static str {
        match self {
            TsunamiGrade::MajorWarning => "大津波警報",
            TsunamiGrade::Warning => "津波警報",
            TsunamiGrade::Watch => "津波注意報",
            TsunamiGrade::Slight => "若干の海面変動",
            TsunamiGrade::None => "なし",
            TsunamiGrade::Unknown => "不明",
        }
    }
}

impl fmt::Display for TsunamiGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Groups observations by their classified severity bucket.
///
/// Stable within each bucket (input order is preserved) and buckets with no
/// observations are simply absent from the result. The `BTreeMap` bucket
/// order gives deterministic rendering; iterate in reverse for
/// severe-first output.
pub fn group_by_bucket<'a, T, B, F>(items: &'a [T], classify: F) -> BTreeMap<B, Vec<&'a T>>
where
    B: Ord,
    F: Fn(&T) -> B,
{
    let mut buckets: BTreeMap<B, Vec<&T>> = BTreeMap::new();
    for item in items {
        buckets.entry(classify(item)).or_default().push(item);
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intensity_table() {
        assert_eq!(IntensityScale::from_code(-1), IntensityScale::Unknown);
        assert_eq!(IntensityScale::from_code(10), IntensityScale::One);
        assert_eq!(IntensityScale::from_code(45), IntensityScale::FiveLow);
        assert_eq!(IntensityScale::from_code(46), IntensityScale::NoData);
        assert_eq!(IntensityScale::from_code(50), IntensityScale::FiveHigh);
        assert_eq!(IntensityScale::from_code(70), IntensityScale::Seven);
    }

    #[test]
    fn test_intensity_unmapped_codes_are_unknown() {
        assert_eq!(IntensityScale::from_code(999), IntensityScale::Unknown);
        assert_eq!(IntensityScale::from_code(0), IntensityScale::Unknown);
        assert_eq!(IntensityScale::from_code(i32::MIN), IntensityScale::Unknown);
    }

    #[test]
    fn test_intensity_ordering() {
        assert!(IntensityScale::One < IntensityScale::Seven);
        assert!(IntensityScale::FiveLow < IntensityScale::FiveHigh);
        assert!(IntensityScale::Seven < IntensityScale::NoData);
    }

    #[test]
    fn test_tsunami_grade_table() {
        assert_eq!(TsunamiGrade::from_code("MajorWarning"), TsunamiGrade::MajorWarning);
        assert_eq!(TsunamiGrade::from_code("Warning"), TsunamiGrade::Warning);
        assert_eq!(TsunamiGrade::from_code("Watch"), TsunamiGrade::Watch);
        assert_eq!(TsunamiGrade::from_code("Unknown"), TsunamiGrade::Unknown);
        assert_eq!(TsunamiGrade::from_code(""), TsunamiGrade::Unknown);
        assert_eq!(TsunamiGrade::from_code("Tornado"), TsunamiGrade::Unknown);
    }

    #[test]
    fn test_tsunami_grade_ordering() {
        assert!(TsunamiGrade::None < TsunamiGrade::Slight);
        assert!(TsunamiGrade::Watch < TsunamiGrade::Warning);
        assert!(TsunamiGrade::Warning < TsunamiGrade::MajorWarning);
    }

    #[test]
    fn test_grade_from_forecast_height() {
        assert_eq!(TsunamiGrade::from_forecast_height(5.0), Some(TsunamiGrade::MajorWarning));
        assert_eq!(TsunamiGrade::from_forecast_height(3.0), Some(TsunamiGrade::Warning));
        assert_eq!(TsunamiGrade::from_forecast_height(1.0), Some(TsunamiGrade::Watch));
        assert_eq!(TsunamiGrade::from_forecast_height(0.2), None);
        assert_eq!(TsunamiGrade::from_forecast_height(0.0), None);
    }

    #[test]
    fn test_group_preserves_order_and_omits_empty_buckets() {
        let codes = [30, 10, 30, 999, 30];
        let grouped = group_by_bucket(&codes, |c| IntensityScale::from_code(*c));

        assert_eq!(grouped.len(), 3);
        assert_eq!(grouped[&IntensityScale::Three], vec![&30, &30, &30]);
        assert_eq!(grouped[&IntensityScale::One], vec![&10]);
        assert_eq!(grouped[&IntensityScale::Unknown], vec![&999]);
        assert!(!grouped.contains_key(&IntensityScale::Seven));

        let total: usize = grouped.values().map(|v| v.len()).sum();
        assert_eq!(total, codes.len());
    }

    #[test]
    fn test_group_of_empty_input_is_empty() {
        let codes: [i32; 0] = [];
        let grouped = group_by_bucket(&codes, |c| IntensityScale::from_code(*c));
        assert!(grouped.is_empty());
    }
}

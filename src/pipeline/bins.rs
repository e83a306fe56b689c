//! Fixed odometer buckets used to compare prices across mileage bands

use std::fmt;

use serde::Serialize;

/// One of the eight labeled mileage buckets.
///
/// Buckets are right-open (`[low, high)`) except the last one, which also
/// includes its upper edge of 300,000 miles. Readings outside `[0, 300000]`
/// belong to no bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum OdometerRange {
    #[serde(rename = "0-25K")]
    UpTo25K,
    #[serde(rename = "25K-50K")]
    UpTo50K,
    #[serde(rename = "50K-75K")]
    UpTo75K,
    #[serde(rename = "75K-100K")]
    UpTo100K,
    #[serde(rename = "100K-150K")]
    UpTo150K,
    #[serde(rename = "150K-200K")]
    UpTo200K,
    #[serde(rename = "200K-250K")]
    UpTo250K,
    #[serde(rename = "250K+")]
    Over250K,
}

/// Bucket edges in miles; bucket `i` spans `EDGES[i]..EDGES[i + 1]`.
pub const ODOMETER_EDGES: [f64; 9] = [
    0.0, 25_000.0, 50_000.0, 75_000.0, 100_000.0, 150_000.0, 200_000.0, 250_000.0, 300_000.0,
];

impl OdometerRange {
    /// All buckets in ascending mileage order
    pub const ALL: [OdometerRange; 8] = [
        OdometerRange::UpTo25K,
        OdometerRange::UpTo50K,
        OdometerRange::UpTo75K,
        OdometerRange::UpTo100K,
        OdometerRange::UpTo150K,
        OdometerRange::UpTo200K,
        OdometerRange::UpTo250K,
        OdometerRange::Over250K,
    ];

    /// Place a reading into its bucket, or `None` when it falls outside
    /// every bucket (negative, above 300,000, or NaN).
    pub fn from_odometer(miles: f64) -> Option<Self> {
        if !(ODOMETER_EDGES[0]..=ODOMETER_EDGES[8]).contains(&miles) {
            return None;
        }
        let index = ODOMETER_EDGES[1..]
            .iter()
            .position(|&upper| miles < upper)
            .unwrap_or(Self::ALL.len() - 1);
        Some(Self::ALL[index])
    }

    pub fn label(&self) -> &'static str {
        match self {
            OdometerRange::UpTo25K => "0-25K",
            OdometerRange::UpTo50K => "25K-50K",
            OdometerRange::UpTo75K => "50K-75K",
            OdometerRange::UpTo100K => "75K-100K",
            OdometerRange::UpTo150K => "100K-150K",
            OdometerRange::UpTo200K => "150K-200K",
            OdometerRange::UpTo250K => "200K-250K",
            OdometerRange::Over250K => "250K+",
        }
    }

    /// Parse a bucket back from its label
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|range| range.label() == label)
    }
}

impl fmt::Display for OdometerRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_edges_are_right_open() {
        assert_eq!(OdometerRange::from_odometer(0.0), Some(OdometerRange::UpTo25K));
        assert_eq!(OdometerRange::from_odometer(24_999.0), Some(OdometerRange::UpTo25K));
        assert_eq!(OdometerRange::from_odometer(25_000.0), Some(OdometerRange::UpTo50K));
        assert_eq!(OdometerRange::from_odometer(99_999.9), Some(OdometerRange::UpTo100K));
        assert_eq!(OdometerRange::from_odometer(100_000.0), Some(OdometerRange::UpTo150K));
    }

    #[test]
    fn test_last_bucket_is_closed() {
        assert_eq!(OdometerRange::from_odometer(250_000.0), Some(OdometerRange::Over250K));
        assert_eq!(OdometerRange::from_odometer(300_000.0), Some(OdometerRange::Over250K));
    }

    #[test]
    fn test_out_of_range_readings() {
        assert_eq!(OdometerRange::from_odometer(300_000.5), None);
        assert_eq!(OdometerRange::from_odometer(-1.0), None);
        assert_eq!(OdometerRange::from_odometer(f64::NAN), None);
    }

    #[test]
    fn test_labels_round_trip_and_order() {
        let labels: Vec<&str> = OdometerRange::ALL.iter().map(|r| r.label()).collect();
        assert_eq!(
            labels,
            vec!["0-25K", "25K-50K", "50K-75K", "75K-100K", "100K-150K", "150K-200K", "200K-250K", "250K+"]
        );
        assert_eq!(OdometerRange::from_label("250K+"), Some(OdometerRange::Over250K));
        assert_eq!(OdometerRange::from_label("1M+"), None);
        assert!(OdometerRange::UpTo25K < OdometerRange::Over250K);
    }
}

//! Descriptive statistics used to fill missing cells

/// Median of the values; the mean of the two middle values for an even
/// count. `None` for an empty slice.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Most frequent value; ties go to the smallest value.
pub fn mode(values: &[f64]) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut best: Option<(f64, usize)> = None;
    let mut run_start = 0;
    for i in 1..=sorted.len() {
        if i == sorted.len() || sorted[i].total_cmp(&sorted[run_start]).is_ne() {
            let run = i - run_start;
            // Strictly greater keeps the earlier (smaller) value on ties
            if best.map_or(true, |(_, count)| run > count) {
                best = Some((sorted[run_start], run));
            }
            run_start = i;
        }
    }
    best.map(|(value, _)| value)
}

/// Arithmetic mean, `None` for an empty iterator
pub fn mean<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), x| (sum + x, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_mode_prefers_most_frequent() {
        assert_eq!(mode(&[6.0, 8.0, 8.0, 4.0, 8.0, 6.0]), Some(8.0));
    }

    #[test]
    fn test_mode_tie_takes_smallest() {
        assert_eq!(mode(&[8.0, 6.0, 8.0, 6.0]), Some(6.0));
        assert_eq!(mode(&[5.0]), Some(5.0));
        assert_eq!(mode(&[]), None);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(vec![10_000.0, 20_000.0]), Some(15_000.0));
        assert_eq!(mean(Vec::<f64>::new()), None);
    }
}

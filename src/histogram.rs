use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Bin {
    #[serde(rename = "Start")]
    pub start: f64,
    #[serde(rename = "End")]
    pub end: f64,
    #[serde(rename = "Count")]
    pub count: usize,
}

/// Number of equal-width bins for `len` samples: ⌊3·log10(n) + 1⌋.
pub fn interval_count(len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    ((len as f64).log10() * 3.0 + 1.0).floor() as usize
}

/// Equal-width histogram of an ascending slice.
///
/// Bins are half-open `[start, end)` except the last one, which also takes `max`.
/// Empty when the sample is too small for two bins or has no spread.
pub fn histogram(sorted: &[f64]) -> Vec<Bin> {
    let intervals = interval_count(sorted.len());
    let (Some(&start), Some(&end)) = (sorted.first(), sorted.last()) else {
        return vec![];
    };
    if intervals < 2 || end <= start {
        return vec![];
    }

    let step = (end - start) / intervals as f64;
    let mut bins = (0..intervals)
        .map(|i| Bin {
            start: start + i as f64 * step,
            end: if i + 1 == intervals {
                end
            } else {
                start + (i + 1) as f64 * step
            },
            count: 0,
        })
        .collect::<Vec<_>>();

    for v in sorted {
        let i = (((v - start) / step).floor() as usize).min(intervals - 1);
        bins[i].count += 1;
    }

    bins
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bin_count_grows_logarithmically() {
        assert_eq!(interval_count(1), 1);
        assert_eq!(interval_count(3), 2);
        assert_eq!(interval_count(10), 4);
        assert_eq!(interval_count(100), 7);
    }

    #[test]
    fn every_value_lands_in_one_bin() {
        let data = (0..100).map(|v| v as f64).collect::<Vec<_>>();
        let bins = histogram(&data);
        assert_eq!(bins.len(), 7);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 100);
        assert_eq!(bins.first().map(|b| b.start), Some(0.0));
        assert_eq!(bins.last().map(|b| b.end), Some(99.0));
    }

    #[test]
    fn degenerate_samples() {
        assert!(histogram(&[]).is_empty());
        assert!(histogram(&[5.0]).is_empty());
        assert!(histogram(&[2.0, 2.0, 2.0, 2.0]).is_empty());
    }

    #[test]
    fn outlier_gets_own_bin() {
        let data = [10.0, 12.0, 14.0, 15.0, 16.0, 18.0, 20.0, 22.0, 24.0, 100.0];
        let bins = histogram(&data);
        assert_eq!(bins.len(), 4);
        assert_eq!(bins[0].count, 9);
        assert_eq!(bins[3].count, 1);
    }
}

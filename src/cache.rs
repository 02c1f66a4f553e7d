use std::sync::Arc;

use moka::sync::Cache;

use crate::{compute_statistics, Error, QuartileMethod, StatsResult};

/// Exact bit patterns of the sample in caller order, plus the method.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct CacheKey {
    method: QuartileMethod,
    bits: Vec<u64>,
}

impl CacheKey {
    fn new(values: &[f64], method: QuartileMethod) -> Self {
        Self {
            method,
            bits: values.iter().map(|v| v.to_bits()).collect(),
        }
    }
}

/// Read-through memoization of `compute_statistics`. Failures are not stored.
#[derive(Clone)]
pub struct StatsCache {
    inner: Cache<CacheKey, Arc<StatsResult>>,
}

impl StatsCache {
    pub fn new(capacity: u64) -> Self {
        Self {
            inner: Cache::new(capacity),
        }
    }

    pub fn get_or_compute(
        &self,
        values: &[f64],
        method: QuartileMethod,
    ) -> Result<Arc<StatsResult>, Error> {
        let key = CacheKey::new(values, method);
        if let Some(hit) = self.inner.get(&key) {
            tracing::trace!("stats cache hit: {} values, {}", values.len(), method);
            return Ok(hit);
        }

        let stats = Arc::new(compute_statistics(values, method)?);
        self.inner.insert(key, stats.clone());
        Ok(stats)
    }

    pub fn contains(&self, values: &[f64], method: QuartileMethod) -> bool {
        self.inner.contains_key(&CacheKey::new(values, method))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn second_call_is_served_from_cache() {
        let cache = StatsCache::new(16);
        let data = [1.0, 5.0, 2.0, 8.0];

        assert!(!cache.contains(&data, QuartileMethod::Percentile));
        let first = cache.get_or_compute(&data, QuartileMethod::Percentile).unwrap();
        assert!(cache.contains(&data, QuartileMethod::Percentile));
        let second = cache.get_or_compute(&data, QuartileMethod::Percentile).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn method_is_part_of_the_key() {
        let cache = StatsCache::new(16);
        let data = [2.0, 4.0, 5.0, 5.0, 6.0, 11.0, 11.0, 13.0, 14.0, 25.0, 30.0];
        let ex = cache.get_or_compute(&data, QuartileMethod::ExclusiveHalves).unwrap();
        let inc = cache.get_or_compute(&data, QuartileMethod::InclusiveHalves).unwrap();
        assert_ne!(ex.q3, inc.q3);
    }

    #[test]
    fn errors_are_not_cached() {
        let cache = StatsCache::new(16);
        assert!(cache.get_or_compute(&[1.0], QuartileMethod::default()).is_err());
        assert!(!cache.contains(&[1.0], QuartileMethod::default()));
    }
}

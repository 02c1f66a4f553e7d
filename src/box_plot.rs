use num_traits::Float;

/// Tukey box: quartiles plus the 1.5·IQR fences derived from them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxPlot<T> {
    median: T,
    q1: T,
    q3: T,
    iqr: T,
    lower_bound: T,
    upper_bound: T,
}

// 1.5, without going through FromPrimitive
fn poltora<T: Float>() -> T {
    T::one() + T::one() / (T::one() + T::one())
}

impl<T> BoxPlot<T>
where
    T: Float,
{
    pub fn new(q1: T, median: T, q3: T) -> Self {
        let iqr = q3 - q1;
        let lower_bound = q1 - poltora::<T>() * iqr;
        let upper_bound = q3 + poltora::<T>() * iqr;
        Self {
            median,
            q1,
            q3,
            iqr,
            lower_bound,
            upper_bound,
        }
    }

    pub fn median(&self) -> T {
        self.median
    }

    pub fn q1(&self) -> T {
        self.q1
    }

    pub fn q3(&self) -> T {
        self.q3
    }

    pub fn iqr(&self) -> T {
        self.iqr
    }

    pub fn lower_bound(&self) -> T {
        self.lower_bound
    }

    pub fn upper_bound(&self) -> T {
        self.upper_bound
    }

    /// Strictly outside the fences; values equal to a fence are not outliers.
    pub fn is_outlier(&self, x: T) -> bool {
        x < self.lower_bound || x > self.upper_bound
    }
}

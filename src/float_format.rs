use itertools::Itertools;
use num_traits::Float;

/// Default number of decimals in reports.
pub const DEFAULT_PRECISION: usize = 4;

pub fn format_fixed<T: Float>(x: T, digits: usize) -> String {
    match x.to_f64() {
        Some(x) if x.is_finite() => {
            let s = format!("{:.*}", digits, x);
            // "-0.0000" reads badly
            if s.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
                s.trim_start_matches('-').to_owned()
            } else {
                s
            }
        }
        Some(x) => format!("{}", x),
        None => "NaN".to_owned(),
    }
}

pub fn format_list<T: Float>(values: &[T], digits: usize) -> String {
    format!(
        "[{}]",
        values.iter().map(|v| format_fixed(*v, digits)).join(", ")
    )
}

mod config;
mod error;
mod stats;

pub mod box_plot;
pub mod cache;
pub mod float_format;
pub mod generate;
pub mod histogram;
pub mod input;
pub mod quartile;
pub mod report;
pub mod table;

pub use cache::StatsCache;
pub use config::{Config, RandomConfig};
pub use error::Error;
pub use quartile::{compute_median, QuartileMethod};
pub use stats::{compute_statistics, StatsResult, MIN_SAMPLES};

use std::{net::SocketAddr, path::PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::{generate::Distribution, QuartileMethod};

#[derive(Deserialize, Clone, Copy, Serialize, Debug, PartialEq)]
pub struct RandomConfig {
    #[serde(rename = "Count")]
    pub count: usize,

    #[serde(rename = "Distribution")]
    pub distribution: Distribution,
}

impl Default for RandomConfig {
    fn default() -> Self {
        Self {
            count: 100,
            distribution: Distribution::default(),
        }
    }
}

#[derive(Deserialize, Clone, Serialize, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    #[serde(rename = "BindAddr")]
    pub bind_addr: SocketAddr,

    #[serde(rename = "DefaultMethod")]
    pub default_method: QuartileMethod,

    #[serde(rename = "Precision")]
    pub precision: usize,

    #[serde(rename = "BoxPlotWidth")]
    pub box_plot_width: usize,

    #[serde(rename = "CacheCapacity")]
    pub cache_capacity: u64,

    #[serde(rename = "SampleValues")]
    pub sample_values: String,

    #[serde(rename = "Random")]
    pub random: RandomConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            default_method: QuartileMethod::default(),
            precision: crate::float_format::DEFAULT_PRECISION,
            box_plot_width: crate::report::BOX_PLOT_WIDTH,
            cache_capacity: 256,
            sample_values: "12 15 18 22 25 28 32 35 100".to_owned(),
            random: RandomConfig::default(),
        }
    }
}

impl Config {
    pub fn path() -> anyhow::Result<PathBuf> {
        let base_dirs =
            directories::BaseDirs::new().context("Failed to get config directory!")?;
        Ok(base_dirs
            .config_dir()
            .join("iqr-calculator")
            .join("config.json"))
    }

    /// Reads `<config_dir>/iqr-calculator/config.json`; a missing file means defaults.
    pub fn load() -> anyhow::Result<(Self, PathBuf)> {
        let path = Self::path()?;
        Ok((Self::load_from(&path)?, path))
    }

    pub fn load_from(path: &std::path::Path) -> anyhow::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str::<Config>(&contents)
                .with_context(|| format!("Failed to parse {:?}", path)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("{:?} not found, using default settings", path);
                Ok(Self::default())
            }
            Err(e) => Err(e).with_context(|| format!("Failed to read {:?}", path)),
        }
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "BindAddr: {}", self.bind_addr)?;
        writeln!(f, "DefaultMethod: {}", self.default_method)?;
        writeln!(f, "Precision: {}", self.precision)?;
        writeln!(f, "BoxPlotWidth: {}", self.box_plot_width)?;
        writeln!(f, "CacheCapacity: {}", self.cache_capacity)?;
        writeln!(f, "SampleValues: {}", self.sample_values)?;

        writeln!(f, "Random:")?;
        writeln!(f, "  Count: {}", self.random.count)?;
        writeln!(f, "  Distribution: {:?}", self.random.distribution)?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let c: Config =
            serde_json::from_str(r#"{"DefaultMethod": "percentile", "Precision": 2}"#).unwrap();
        assert_eq!(c.default_method, QuartileMethod::Percentile);
        assert_eq!(c.precision, 2);
        assert_eq!(c.box_plot_width, 50);
        assert_eq!(c.bind_addr.port(), 3000);
    }

    #[test]
    fn random_section() {
        let c: Config = serde_json::from_str(
            r#"{"Random": {"Count": 10, "Distribution": {"Kind": "Exponential", "Scale": 5.0}}}"#,
        )
        .unwrap();
        assert_eq!(c.random.count, 10);
        assert_eq!(c.random.distribution, Distribution::Exponential { scale: 5.0 });
    }

    #[test]
    fn missing_file_is_default() {
        let path = std::env::temp_dir().join("iqr-calculator-no-such-dir/config.json");
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("iqr-config-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();
        let r = Config::load_from(&path);
        std::fs::remove_file(&path).ok();
        assert!(r.is_err());
    }

    #[test]
    fn display_lists_settings() {
        let text = Config::default().to_string();
        assert!(text.contains("DefaultMethod: exclusive-halves"));
        assert!(text.contains("BindAddr: 0.0.0.0:3000"));
    }
}

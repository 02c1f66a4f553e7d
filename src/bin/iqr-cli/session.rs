use std::path::Path;

use anyhow::Context;
use iqr_calculator::{
    compute_statistics, generate::Distribution, report, Config, Error, QuartileMethod,
    StatsResult,
};

use crate::cli::{DistributionKind, ExportKind};

/// Settings and the last computed sample of one console run.
pub struct Session {
    pub method: QuartileMethod,
    pub precision: usize,
    pub box_plot_width: usize,
    pub random_count: usize,
    pub random_distribution: Distribution,
    last: Option<(Vec<f64>, StatsResult)>,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        Self {
            method: config.default_method,
            precision: config.precision,
            box_plot_width: config.box_plot_width,
            random_count: config.random.count,
            random_distribution: config.random.distribution,
            last: None,
        }
    }

    pub fn analyse(&mut self, values: Vec<f64>) -> Result<&StatsResult, Error> {
        let stats = compute_statistics(&values, self.method)?;
        tracing::debug!(
            "{} values, method {}, {} outliers",
            stats.count,
            self.method,
            stats.outlier_count()
        );
        let (_, stats) = self.last.insert((values, stats));
        Ok(stats)
    }

    /// Switches the method; the last sample, if any, is recomputed with it.
    pub fn set_method(&mut self, method: QuartileMethod) -> Result<Option<&StatsResult>, Error> {
        self.method = method;
        match self.last.take() {
            Some((values, _)) => self.analyse(values).map(Some),
            None => Ok(None),
        }
    }

    /// Size and distribution of a random sample; omitted parts come from the config.
    pub fn random_source(
        &self,
        count: Option<usize>,
        kind: Option<DistributionKind>,
    ) -> (usize, Distribution) {
        let distribution = kind
            .map(|kind| kind.with_defaults(self.random_distribution))
            .unwrap_or(self.random_distribution);
        (count.unwrap_or(self.random_count), distribution)
    }

    pub fn last(&self) -> Option<&StatsResult> {
        self.last.as_ref().map(|(_, stats)| stats)
    }

    pub fn report(&self) -> Option<String> {
        self.last.as_ref().map(|(values, stats)| {
            report::text_report(values, stats, self.precision, self.box_plot_width)
        })
    }

    pub fn export(&self, kind: ExportKind, path: &Path) -> anyhow::Result<()> {
        let (values, stats) = self
            .last
            .as_ref()
            .context("Nothing to export yet, enter some numbers first")?;

        let bytes = match kind {
            ExportKind::Csv => report::statistics_csv(stats, self.precision).into_bytes(),
            ExportKind::Data => report::data_csv(stats, self.precision).into_bytes(),
            ExportKind::Txt => {
                report::text_report(values, stats, self.precision, self.box_plot_width)
                    .into_bytes()
            }
            ExportKind::Xlsx => report::xlsx_report(stats, self.precision)?,
        };

        std::fs::write(path, bytes).with_context(|| format!("Failed to write {:?}", path))?;
        tracing::info!("Exported {:?} to {:?}", kind, path);
        Ok(())
    }
}

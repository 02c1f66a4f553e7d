use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use iqr_calculator::{report, Config, StatsCache};

use super::{
    api::{compute, ApiError, StatsRequest},
    into_body::IntoBody,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExportFile {
    StatsCsv,
    DataCsv,
    ReportXlsx,
    ReportTxt,
}

impl ExportFile {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "stats.csv" => Some(Self::StatsCsv),
            "data.csv" => Some(Self::DataCsv),
            "report.xlsx" => Some(Self::ReportXlsx),
            "report.txt" => Some(Self::ReportTxt),
            _ => None,
        }
    }

    fn file_name(&self) -> &'static str {
        match self {
            Self::StatsCsv => "iqr_statistics.csv",
            Self::DataCsv => "iqr_data.csv",
            Self::ReportXlsx => "iqr_report.xlsx",
            Self::ReportTxt => "iqr_report.txt",
        }
    }

    fn content_type(&self) -> &'static str {
        match self {
            Self::StatsCsv | Self::DataCsv => "text/csv; charset=utf-8",
            // https://developer.mozilla.org/en-US/docs/Web/HTTP/Basics_of_HTTP/MIME_types/Common_types
            Self::ReportXlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::ReportTxt => "text/plain; charset=utf-8",
        }
    }
}

pub(crate) fn render_export(
    kind: ExportFile,
    cache: &StatsCache,
    config: &Config,
    request: &StatsRequest,
) -> Result<Vec<u8>, ApiError> {
    let (_, stats) = compute(cache, config, request)?;

    let bytes = match kind {
        ExportFile::StatsCsv => report::statistics_csv(&stats, config.precision).into_bytes(),
        ExportFile::DataCsv => report::data_csv(&stats, config.precision).into_bytes(),
        ExportFile::ReportTxt => {
            let input = request.sample().values;
            report::text_report(&input, &stats, config.precision, config.box_plot_width)
                .into_bytes()
        }
        ExportFile::ReportXlsx => report::xlsx_report(&stats, config.precision)?,
    };
    Ok(bytes)
}

pub(crate) async fn handle_export(
    Path(kind): Path<String>,
    State(cache): State<StatsCache>,
    State(config): State<Config>,
    Json(request): Json<StatsRequest>,
) -> Response {
    let Some(kind) = ExportFile::from_name(&kind) else {
        return ApiError(StatusCode::NOT_FOUND, format!("Unknown export {:?}", kind)).into_response();
    };

    match render_export(kind, &cache, &config, &request) {
        Ok(buf) => {
            tracing::info!("Export {:?}: {} bytes", kind, buf.len());
            let filename = format!("attachment; filename=\"{}\"", kind.file_name());
            let headers = [
                (header::CONTENT_TYPE, kind.content_type().to_owned()),
                (header::CONTENT_DISPOSITION, filename),
            ];
            (headers, buf.into_body()).into_response()
        }
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample() -> StatsRequest {
        StatsRequest {
            text: Some("12 15 18 22 25 28 32 35 100".to_owned()),
            ..Default::default()
        }
    }

    #[test]
    fn export_names() {
        assert_eq!(ExportFile::from_name("stats.csv"), Some(ExportFile::StatsCsv));
        assert_eq!(ExportFile::from_name("report.xlsx"), Some(ExportFile::ReportXlsx));
        assert_eq!(ExportFile::from_name("report.pdf"), None);
    }

    #[test]
    fn csv_exports() {
        let cache = StatsCache::new(4);
        let config = Config::default();

        let stats = render_export(ExportFile::StatsCsv, &cache, &config, &sample()).unwrap();
        assert!(String::from_utf8(stats).unwrap().starts_with("Statistic,Value\n"));

        let data = render_export(ExportFile::DataCsv, &cache, &config, &sample()).unwrap();
        let data = String::from_utf8(data).unwrap();
        assert!(data.starts_with("Index,Value,Outlier\n"));
        assert!(data.trim_end().ends_with("100.0000,true"));
    }

    #[test]
    fn text_and_xlsx_exports() {
        let cache = StatsCache::new(4);
        let config = Config::default();

        let txt = render_export(ExportFile::ReportTxt, &cache, &config, &sample()).unwrap();
        assert!(!txt.is_empty());

        let xlsx = render_export(ExportFile::ReportXlsx, &cache, &config, &sample()).unwrap();
        // zip container
        assert_eq!(&xlsx[..2], b"PK");
    }

    #[test]
    fn export_without_data_fails() {
        let cache = StatsCache::new(4);
        let err = render_export(
            ExportFile::StatsCsv,
            &cache,
            &Config::default(),
            &StatsRequest::default(),
        )
        .unwrap_err();
        assert_eq!(err.0, StatusCode::UNPROCESSABLE_ENTITY);
    }
}

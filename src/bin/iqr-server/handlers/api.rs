use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use iqr_calculator::{
    generate::{self, Distribution},
    histogram::{histogram, Bin},
    input::{parse_numbers, ParsedInput},
    report,
    table::{read_table, ColumnSelector, FileKind},
    Config, Error, QuartileMethod, StatsCache, StatsResult, MIN_SAMPLES,
};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug)]
pub struct ErrorResult {
    pub success: bool,
    pub error: String,
}

#[derive(Debug)]
pub struct ApiError(pub StatusCode, pub String);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        let status = match e {
            Error::InsufficientData { .. } | Error::InvalidInput(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Error::UnsupportedFile(_) | Error::ColumnNotFound(_) => StatusCode::BAD_REQUEST,
            Error::Spreadsheet(_) | Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError(status, e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::debug!("API error {}: {}", self.0, self.1);
        (
            self.0,
            Json(ErrorResult {
                success: false,
                error: self.1,
            }),
        )
            .into_response()
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct StatsRequest {
    #[serde(rename = "Text", default)]
    pub text: Option<String>,

    #[serde(rename = "Values", default)]
    pub values: Option<Vec<f64>>,

    #[serde(rename = "Method", default)]
    pub method: Option<QuartileMethod>,
}

impl StatsRequest {
    /// Text tokens first, then explicit values.
    pub fn sample(&self) -> ParsedInput {
        let mut parsed = self
            .text
            .as_deref()
            .map(parse_numbers)
            .unwrap_or_default();
        if let Some(values) = self.values.as_ref() {
            for v in values {
                if v.is_finite() {
                    parsed.values.push(*v);
                } else {
                    parsed.rejected.push(v.to_string());
                }
            }
        }
        parsed
    }
}

#[derive(Serialize, Debug)]
pub struct SummaryRow {
    #[serde(rename = "Label")]
    pub label: &'static str,
    #[serde(rename = "Value")]
    pub value: String,
}

#[derive(Serialize, Debug)]
pub struct StatsResponse {
    #[serde(rename = "Stats")]
    pub stats: StatsResult,

    #[serde(rename = "Rejected")]
    pub rejected: Vec<String>,

    #[serde(rename = "Histogram")]
    pub histogram: Vec<Bin>,

    #[serde(rename = "Rows")]
    pub rows: Vec<SummaryRow>,

    #[serde(rename = "Summary")]
    pub summary: String,
}

pub(crate) fn compute(
    cache: &StatsCache,
    config: &Config,
    request: &StatsRequest,
) -> Result<(Vec<String>, StatsResult), ApiError> {
    let parsed = request.sample();
    let rejected = parsed.rejected.clone();
    let values = parsed.require(MIN_SAMPLES)?;
    let method = request.method.unwrap_or(config.default_method);
    let stats = cache.get_or_compute(&values, method)?;
    Ok((rejected, stats.as_ref().clone()))
}

pub(crate) fn build_stats_response(
    cache: &StatsCache,
    config: &Config,
    request: &StatsRequest,
) -> Result<StatsResponse, ApiError> {
    let (rejected, stats) = compute(cache, config, request)?;

    let rows = report::statistics_rows(&stats)
        .into_iter()
        .map(|(label, value)| SummaryRow {
            label,
            value: report::format_statistic(label, value, config.precision),
        })
        .collect();

    Ok(StatsResponse {
        histogram: histogram(&stats.sorted),
        summary: report::summary_text(&stats, config.precision),
        rows,
        rejected,
        stats,
    })
}

// Сюда приходят данные для расчёта
pub(crate) async fn handle_stats(
    State(cache): State<StatsCache>,
    State(config): State<Config>,
    Json(request): Json<StatsRequest>,
) -> Result<Json<StatsResponse>, ApiError> {
    tracing::debug!("handle_stats: {:?}", request.method);
    build_stats_response(&cache, &config, &request).map(Json)
}

#[derive(Deserialize, Debug, Default)]
pub struct RandomRequest {
    #[serde(rename = "Count", default)]
    pub count: Option<usize>,

    #[serde(rename = "Distribution", default)]
    pub distribution: Option<Distribution>,

    #[serde(rename = "Seed", default)]
    pub seed: Option<u64>,
}

#[derive(Serialize, Debug)]
pub struct ValuesResult {
    #[serde(rename = "Headers", skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<String>,

    #[serde(rename = "Values")]
    pub values: Vec<f64>,

    #[serde(rename = "Rejected")]
    pub rejected: Vec<String>,
}

pub(crate) fn generate_values(config: &Config, request: &RandomRequest) -> Result<Vec<f64>, ApiError> {
    let count = request.count.unwrap_or(config.random.count);
    let distribution = request.distribution.unwrap_or(config.random.distribution);
    let values = match request.seed {
        Some(seed) => generate::generate_seeded(distribution, count, seed)?,
        None => generate::generate_random(distribution, count)?,
    };
    Ok(values)
}

pub(crate) async fn handle_random(
    State(config): State<Config>,
    Json(request): Json<RandomRequest>,
) -> Result<Json<ValuesResult>, ApiError> {
    tracing::debug!("handle_random: {:?}", request);
    let values = generate_values(&config, &request)?;
    Ok(Json(ValuesResult {
        headers: vec![],
        values,
        rejected: vec![],
    }))
}

#[derive(Deserialize, Debug)]
pub struct UploadQuery {
    pub kind: String,

    #[serde(default)]
    pub column: Option<String>,
}

pub(crate) fn read_upload(query: &UploadQuery, body: &[u8]) -> Result<ValuesResult, ApiError> {
    let kind = query.kind.parse::<FileKind>()?;
    let table = read_table(kind, body)?;

    let selector = match query.column.as_deref().map(str::trim) {
        Some(c) if !c.is_empty() => c.parse::<ColumnSelector>().unwrap_or(ColumnSelector::All),
        _ => kind.default_selector(),
    };
    let parsed = table.values(&selector)?;

    Ok(ValuesResult {
        headers: table.headers,
        values: parsed.values,
        rejected: parsed.rejected,
    })
}

pub(crate) async fn handle_upload(Query(query): Query<UploadQuery>, body: Bytes) -> impl IntoResponse {
    tracing::debug!("handle_upload: {:?}, {} bytes", query, body.len());
    read_upload(&query, &body).map(Json)
}

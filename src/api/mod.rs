use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router, async_trait,
    extract::{FromRequest, Json, Path, Request, State, rejection::JsonRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Datelike, Local};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::config::CalculatorDefaults;
use crate::core::{CalcError, CalcResult, Frequency, RngRange};
use crate::scenarios::{
    analytics, car, coast_fire, fi, health, life_event, loan, mortgage, retirement,
};

pub mod cli;
mod payloads;

use payloads::{
    AddedTimePayload, AssetsLiabilitiesPayload, BmiImperialPayload, BmiMetricPayload,
    CarDepreciationPayload, CarLoanPayload, ChildrenCostPayload, CoastFirePayload,
    CompoundInterestPayload, InvestmentFeesPayload, LifeEventPayload, LoanPayload,
    MortgagePayload, RuleOf72Payload, SavingsRatePayload, TimeToFiPayload, WithdrawalPayload,
};

#[derive(Clone, Debug)]
pub struct AppState {
    pub defaults: Arc<CalculatorDefaults>,
}

impl AppState {
    pub fn new(defaults: CalculatorDefaults) -> Self {
        Self {
            defaults: Arc::new(defaults),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

struct ApiJson<T>(T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(rejection_response(rejection)),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.defaults.cors_origins);
    Router::new()
        .route("/api/frequencies", get(frequencies_handler))
        .route("/api/defaults", get(defaults_handler))
        .route("/api/loan", post(loan_handler))
        .route("/api/loan/csv", post(loan_csv_handler))
        .route("/api/car/loan", post(car_loan_handler))
        .route("/api/car/depreciation", post(car_depreciation_handler))
        .route("/api/property/mortgage", post(mortgage_handler))
        .route("/api/property/mortgage/csv", post(mortgage_csv_handler))
        .route("/api/retirement/withdrawal", post(withdrawal_handler))
        .route("/api/fi/time", post(time_to_fi_handler))
        .route("/api/fi/rule/of/72", post(rule_of_72_handler))
        .route("/api/fi/added/time", post(added_time_handler))
        .route(
            "/api/fi/ten/million/dream/:monthly_investment",
            get(ten_million_dream_handler),
        )
        .route("/api/fi/compound/interest", post(compound_interest_handler))
        .route(
            "/api/fi/investment/fees/effect",
            post(investment_fees_handler),
        )
        .route(
            "/api/fi/cost/of/raising/children",
            post(children_cost_handler),
        )
        .route(
            "/api/fi/cost/of/raising/children/families",
            get(children_families_handler),
        )
        .route("/api/fi/savings/rate", post(savings_rate_handler))
        .route("/api/fi/coast/fire/savings", post(coast_fire_handler))
        .route("/api/fi/health/bmi/imperial", post(bmi_imperial_handler))
        .route("/api/fi/health/bmi/metric", post(bmi_metric_handler))
        .route("/api/life/event", post(life_event_handler))
        .route(
            "/api/analytics/assets/liabilities",
            post(assets_liabilities_handler),
        )
        .fallback(not_found_handler)
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "skipping invalid CORS origin");
                None
            }
        })
        .collect::<Vec<_>>();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub async fn run_http_server(port: u16, defaults: CalculatorDefaults) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = router(AppState::new(defaults));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "finance calculator API listening");
    tracing::info!("local access: http://127.0.0.1:{port}/api/frequencies");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn frequencies_handler() -> Response {
    let frequencies = Frequency::ALL
        .into_iter()
        .map(|f| (f.name(), f.periods_per_year()))
        .collect::<BTreeMap<_, _>>();
    json_response(StatusCode::OK, frequencies)
}

async fn defaults_handler(State(state): State<AppState>) -> Response {
    json_response(StatusCode::OK, state.defaults.as_ref())
}

async fn loan_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoanPayload>,
) -> Response {
    calc_response(
        payload
            .into_request(&state.defaults)
            .and_then(|request| loan::loan_schedule(&request, &state.defaults)),
    )
}

async fn loan_csv_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoanPayload>,
) -> Response {
    match payload
        .into_request(&state.defaults)
        .and_then(|request| loan::loan_schedule(&request, &state.defaults))
    {
        Ok(result) => csv_response(&result.periods),
        Err(err) => calc_error_response(err),
    }
}

async fn car_loan_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CarLoanPayload>,
) -> Response {
    calc_response(car::car_loan(&payload.into_request(), &state.defaults))
}

async fn car_depreciation_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CarDepreciationPayload>,
) -> Response {
    let request = payload.to_request();
    let mut random = match payload.seed {
        Some(seed) => RngRange::seeded(seed),
        None => RngRange::from_entropy(),
    };
    calc_response(car::car_depreciation(&request, &mut random, &state.defaults))
}

fn today() -> chrono::NaiveDate {
    Local::now().date_naive()
}

async fn mortgage_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<MortgagePayload>,
) -> Response {
    calc_response(mortgage::mortgage(
        &payload.into_request(today()),
        &state.defaults,
    ))
}

async fn mortgage_csv_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<MortgagePayload>,
) -> Response {
    match mortgage::mortgage(&payload.into_request(today()), &state.defaults) {
        Ok(result) => csv_response(&result.periods),
        Err(err) => calc_error_response(err),
    }
}

async fn withdrawal_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<WithdrawalPayload>,
) -> Response {
    calc_response(retirement::withdrawal_calc(
        &payload.into_request(),
        &state.defaults,
    ))
}

async fn time_to_fi_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<TimeToFiPayload>,
) -> Response {
    calc_response(fi::time_to_fi(&payload.into_request(), &state.defaults))
}

async fn rule_of_72_handler(ApiJson(payload): ApiJson<RuleOf72Payload>) -> Response {
    let (starting_amount, interest) = payload.resolve();
    calc_response(fi::rule_of_72(starting_amount, interest))
}

async fn added_time_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<AddedTimePayload>,
) -> Response {
    let (monthly_investment, total_additional_expense) = payload.resolve();
    calc_response(fi::added_time_to_fi(
        monthly_investment,
        total_additional_expense,
        &state.defaults,
    ))
}

async fn ten_million_dream_handler(
    State(state): State<AppState>,
    Path(monthly_investment): Path<f64>,
) -> Response {
    calc_response(fi::ten_million_dream(monthly_investment, &state.defaults))
}

async fn compound_interest_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CompoundInterestPayload>,
) -> Response {
    let request = payload.into_request(&state.defaults);
    calc_response(fi::compound_interest(&request, &state.defaults))
}

async fn investment_fees_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<InvestmentFeesPayload>,
) -> Response {
    calc_response(fi::investment_fees_effect(
        &payload.into_request(),
        &state.defaults,
    ))
}

async fn children_cost_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ChildrenCostPayload>,
) -> Response {
    let request = payload.into_request(&state.defaults);
    calc_response(fi::cost_of_raising_children(&request, &state.defaults))
}

async fn children_families_handler(State(state): State<AppState>) -> Response {
    calc_response(fi::cost_of_raising_children_families(&state.defaults))
}

async fn savings_rate_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SavingsRatePayload>,
) -> Response {
    calc_response(fi::savings_rate(&payload.into_request(), &state.defaults))
}

async fn coast_fire_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CoastFirePayload>,
) -> Response {
    calc_response(coast_fire::coast_fire_savings(
        &payload.into_request(today().year()),
        &state.defaults,
    ))
}

async fn bmi_imperial_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<BmiImperialPayload>,
) -> Response {
    calc_response(health::bmi_imperial(&payload.into_request(), &state.defaults))
}

async fn bmi_metric_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<BmiMetricPayload>,
) -> Response {
    calc_response(health::bmi_metric(&payload.into_request(), &state.defaults))
}

async fn life_event_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LifeEventPayload>,
) -> Response {
    calc_response(
        payload
            .into_request()
            .and_then(|request| life_event::life_event(&request, &state.defaults)),
    )
}

async fn assets_liabilities_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<AssetsLiabilitiesPayload>,
) -> Response {
    calc_response(analytics::analyze(&payload.into_request(), &state.defaults))
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

fn calc_error_response(err: CalcError) -> Response {
    tracing::warn!(error = %err, parameter = ?err.parameter(), "rejected calculation request");
    error_response(StatusCode::BAD_REQUEST, &err.to_string())
}

fn rejection_response(rejection: JsonRejection) -> Response {
    tracing::warn!(error = %rejection, "rejected malformed payload");
    error_response(
        StatusCode::BAD_REQUEST,
        &format!("Invalid API JSON payload: {}", rejection.body_text()),
    )
}

fn calc_response<T: Serialize>(result: CalcResult<T>) -> Response {
    match result {
        Ok(body) => json_response(StatusCode::OK, body),
        Err(err) => calc_error_response(err),
    }
}

pub fn csv_string<T: Serialize>(rows: &[T]) -> Result<String, String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| format!("failed to write CSV row: {e}"))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| format!("failed to flush CSV: {e}"))?;
    String::from_utf8(bytes).map_err(|e| format!("CSV is not UTF-8: {e}"))
}

fn csv_response<T: Serialize>(rows: &[T]) -> Response {
    match csv_string(rows) {
        Ok(body) => with_cache_control((
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
            body,
        )),
        Err(msg) => {
            tracing::error!(error = %msg, "failed to render CSV");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &msg)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    fn state() -> AppState {
        AppState::new(CalculatorDefaults::default())
    }

    fn payload<T: for<'de> serde::Deserialize<'de>>(json: &str) -> ApiJson<T> {
        ApiJson(serde_json::from_str(json).expect("json should parse"))
    }

    fn json_request(body: &'static str) -> Request {
        axum::http::Request::builder()
            .header(header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from(body))
            .expect("valid request")
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        String::from_utf8(bytes.to_vec()).expect("utf-8 body")
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_str(&body_text(response).await).expect("json body")
    }

    #[tokio::test]
    async fn loan_endpoint_returns_schedule_with_no_store() {
        let response = loan_handler(State(state()), payload("{}")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL),
            Some(&HeaderValue::from_static("no-store"))
        );

        let body = body_json(response).await;
        assert_eq!(body["payment"], 476.22);
        assert_eq!(body["frequency"], "monthly");
        assert_eq!(body["periods"].as_array().map(Vec::len), Some(72));
        assert!(body["periods"][0].get("startingBalance").is_some());
    }

    #[tokio::test]
    async fn invalid_parameters_map_to_bad_request() {
        let response = loan_handler(State(state()), payload(r#"{"numberOfYears": 151}"#)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(
            body["error"]
                .as_str()
                .is_some_and(|msg| msg.starts_with("term years"))
        );
    }

    #[tokio::test]
    async fn retirement_cap_is_enforced_at_the_boundary() {
        let response = withdrawal_handler(
            State(state()),
            payload(r#"{"takeOutPercentage": 10.01}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response =
            withdrawal_handler(State(state()), payload(r#"{"takeOutPercentage": 10}"#)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body.as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn mortgage_csv_has_header_and_one_line_per_period() {
        let response = mortgage_csv_handler(
            State(state()),
            payload(r#"{"startDate": "2024-01-01", "loanTermYears": 15}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE),
            Some(&HeaderValue::from_static("text/csv; charset=utf-8"))
        );

        let text = body_text(response).await;
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 181);
        assert_eq!(
            lines[0],
            "period,paymentDate,payment,principalPortion,interestPortion,startingBalance,endingBalance"
        );
        assert!(lines[1].starts_with("1,2024-01-01,"));
    }

    #[tokio::test]
    async fn seeded_depreciation_is_repeatable() {
        let first = body_json(
            car_depreciation_handler(State(state()), payload(r#"{"seed": 7}"#)).await,
        )
        .await;
        let second = body_json(
            car_depreciation_handler(State(state()), payload(r#"{"seed": 7}"#)).await,
        )
        .await;
        assert_eq!(first, second);
        assert_eq!(first["depreciation"].as_array().map(Vec::len), Some(10));
    }

    #[tokio::test]
    async fn ten_million_dream_reads_path_parameter() {
        let response = ten_million_dream_handler(State(state()), Path(10_000.0)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body[0]["million"], 1_000_000.0);
        assert_eq!(body[0]["years"][0]["years"], 8.3);
    }

    #[tokio::test]
    async fn life_event_rejects_unknown_type() {
        let response =
            life_event_handler(State(state()), payload(r#"{"type": "selling a boat"}"#)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn bmi_endpoints_return_a_bare_number() {
        let body = body_json(bmi_imperial_handler(State(state()), payload("{}")).await).await;
        assert_eq!(body, 22.38);

        let response =
            bmi_metric_handler(State(state()), payload(r#"{"height": 165, "weight": 60}"#)).await;
        let body = body_json(response).await;
        assert_eq!(body, 22.04);

        let response = bmi_metric_handler(State(state()), payload(r#"{"height": 0}"#)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn frequencies_lists_every_name() {
        let body = body_json(frequencies_handler().await).await;
        assert_eq!(body["daily"], 365);
        assert_eq!(body["half-year"], 2);
        assert_eq!(body["yearly"], 1);
    }

    #[tokio::test]
    async fn defaults_endpoint_serializes_camel_case() {
        let body = body_json(defaults_handler(State(state())).await).await;
        assert_eq!(body["roundingDigits"], 2);
        assert_eq!(body["averageBankInterest"], 0.06);
    }

    #[tokio::test]
    async fn malformed_json_is_a_bad_request_with_error_body() {
        let extracted =
            ApiJson::<LoanPayload>::from_request(json_request(r#"{"loanAmount":"#), &()).await;
        let rejection = match extracted {
            Ok(_) => panic!("truncated json should be rejected"),
            Err(response) => response,
        };
        assert_eq!(rejection.status(), StatusCode::BAD_REQUEST);
        let body = body_json(rejection).await;
        assert!(
            body["error"]
                .as_str()
                .is_some_and(|msg| msg.starts_with("Invalid API JSON payload"))
        );
    }

    #[tokio::test]
    async fn well_formed_json_reaches_the_handler() {
        let ApiJson(loan) = match ApiJson::<LoanPayload>::from_request(
            json_request(r#"{"loanAmount": 10000, "frequency": "yearly"}"#),
            &(),
        )
        .await
        {
            Ok(extracted) => extracted,
            Err(_) => panic!("valid json should be accepted"),
        };
        let response = loan_handler(State(state()), ApiJson(loan)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["periods"].as_array().map(Vec::len), Some(6));
    }

    #[test]
    fn csv_string_of_no_rows_is_empty() {
        let rows: Vec<crate::core::AmortizationPeriod> = Vec::new();
        assert_eq!(csv_string(&rows).expect("csv"), "");
    }
}

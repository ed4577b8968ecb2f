//! Behavior-driven tests for the end-to-end brief.
//!
//! Every upstream is served by an offline transport so the tests verify how
//! the pieces are wired: request order, failure handling and rendering.

use std::sync::Arc;
use std::time::Duration;

use moexbrief_core::{
    CoreError, FailurePolicy, FixtureHttpClient, Pipeline, PipelineConfig, PromptTemplate,
    ReportDate, SourceErrorKind, SourceId, Ticker,
};

const CBR_URL: &str = "https://www.cbr.ru/";
const ISS: &str = "https://iss.moex.com/iss";
const INDEX_PATH: &str = "statistics/engines/stock/markets/index/analytics";
const BOARD_PATH: &str = "engines/stock/markets/shares/boards/TQBR/securities";
const PRICE_QUERY: &str = "iss.meta=off&iss.only=marketdata";

const INDEX_BODY: &str = r#"{"analytics":{
    "columns":["indexid","ticker"],
    "data":[["IMOEX","SBER"],["IMOEX","SBERP"],["IMOEX","GAZP"]]
}}"#;

const CBR_PAGE: &str = r#"<div class="main-indicator">
    <div class="main-indicator_title">Ключевая ставка</div>
    <div class="main-indicator_value">21,00%</div>
</div>"#;

const SBER_PAGE: &str = r#"<table>
    <tr><td></td><td>2022</td><td>2023</td></tr>
    <tr><td>Чистая прибыль, млрд руб</td><td>270</td><td>1 508</td></tr>
    <tr><td>Число акций, млн</td><td>21 587</td><td>21 587</td></tr>
</table>
<div class="reasons-up"><ul><li>Рекордная прибыль</li></ul></div>"#;

const GAZP_PAGE: &str = r#"<table>
    <tr><td></td><td>2022</td><td>2023</td></tr>
    <tr><td>EBITDA, млрд руб</td><td>3 600</td><td>1 800</td></tr>
</table>
<div class="reasons-down"><ul><li>Падение экспорта</li></ul></div>"#;

fn page_url(ticker: &str) -> String {
    format!("https://smart-lab.ru/q/{ticker}/f/q/MSFO/")
}

fn index_url() -> String {
    format!("{ISS}/{INDEX_PATH}/IMOEX.json?limit=100")
}

fn price_url(ticker: &str) -> String {
    format!("{ISS}/{BOARD_PATH}/{ticker}.json?{PRICE_QUERY}")
}

fn price_body(ticker: &str, last: &str) -> String {
    let cols = r#"["SECID","LAST","PREVPRICE"]"#;
    let row = format!(r#"["{ticker}",{last},100.0]"#);
    format!(r#"{{"marketdata":{{"columns":{cols},"data":[{row}]}}}}"#)
}

fn upstream() -> FixtureHttpClient {
    FixtureHttpClient::new()
        .with_body(CBR_URL, CBR_PAGE)
        .with_body(index_url(), INDEX_BODY)
        .with_body(page_url("SBER"), SBER_PAGE)
        .with_body(price_url("SBER"), price_body("SBER", "301.5"))
        .with_body(page_url("GAZP"), GAZP_PAGE)
        .with_body(price_url("GAZP"), price_body("GAZP", "null"))
}

fn config(failure_policy: FailurePolicy) -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.portfolio.pacing = Duration::ZERO;
    config.portfolio.failure_policy = failure_policy;
    config
}

fn date() -> ReportDate {
    ReportDate::parse("14.02.2025").expect("valid date")
}

// =============================================================================
// Full run
// =============================================================================

#[tokio::test]
async fn when_index_has_three_members_with_one_excluded_two_reports_are_rendered() {
    // Given: SBER, SBERP and GAZP in the index, with SBERP excluded
    let http = Arc::new(upstream());
    let pipeline = Pipeline::new(http.clone(), config(FailurePolicy::Abort)).expect("pipeline");

    // When: The brief is built with the default template
    let brief = pipeline
        .run(date(), &PromptTemplate::default())
        .await
        .expect("brief");

    // Then: Two reports in index order, each with its own data
    assert_eq!(brief.portfolio.len(), 2);
    let tickers: Vec<&str> = brief
        .portfolio
        .tickers()
        .into_iter()
        .map(Ticker::as_str)
        .collect();
    assert_eq!(tickers, vec!["SBER", "GAZP"]);
    assert_eq!(brief.portfolio.prices()[0].as_str(), "301.5");
    assert_eq!(brief.portfolio.prices()[1].as_str(), "100.0");
    assert_eq!(brief.portfolio.factors()[0].pros, vec!["Рекордная прибыль"]);
    assert_eq!(brief.portfolio.factors()[1].cons, vec!["Падение экспорта"]);
    assert_eq!(brief.snapshot.excluded.len(), 1);
    assert_eq!(brief.key_rate, "21,00%");

    // And: Only key rows reached the report
    let sber_table = brief.portfolio.tables()[0];
    assert!(sber_table.row("Чистая прибыль").is_some());
    assert!(sber_table.row("Число акций").is_none());

    // And: Upstreams were called in pipeline order, never for the excluded ticker
    assert_eq!(
        http.requested_urls(),
        vec![
            CBR_URL.to_string(),
            index_url(),
            page_url("SBER"),
            price_url("SBER"),
            page_url("GAZP"),
            price_url("GAZP"),
        ]
    );
}

#[tokio::test]
async fn when_brief_is_rendered_the_prompt_embeds_date_rate_tickers_and_body() {
    // Given: A full set of upstream responses
    let pipeline =
        Pipeline::new(Arc::new(upstream()), config(FailurePolicy::Abort)).expect("pipeline");

    // When: The brief is built with the default template
    let brief = pipeline
        .run(date(), &PromptTemplate::default())
        .await
        .expect("brief");

    // Then: The body lists both tickers and the prompt wraps it
    assert!(brief.body.starts_with("📊 Портфель по 2 тикерам:\n"));
    assert!(brief.body.contains("📊 Портфель 1/2: SBER\n"));
    assert!(brief.body.contains("📊 Портфель 2/2: GAZP\n"));
    assert!(brief.body.contains("✅ Рекордная прибыль\n"));
    assert!(brief.body.contains("❌ Падение экспорта\n"));
    assert!(brief.prompt.contains("14.02.2025"));
    assert!(brief.prompt.contains("21,00%"));
    assert!(brief.prompt.contains("SBER, GAZP"));
    assert!(brief.prompt.contains(&brief.body));
    assert!(!brief.prompt.contains("{report}"));
}

#[tokio::test]
async fn when_a_custom_template_is_used_only_its_text_surrounds_the_data() {
    // Given: A minimal template
    let template =
        PromptTemplate::parse("{date} / {key_rate} / {tickers}\n{report}").expect("template");
    let pipeline =
        Pipeline::new(Arc::new(upstream()), config(FailurePolicy::Abort)).expect("pipeline");

    // When: The brief is built
    let brief = pipeline.run(date(), &template).await.expect("brief");

    // Then: The prompt is exactly the substituted template
    assert_eq!(
        brief.prompt,
        format!("14.02.2025 / 21,00% / SBER, GAZP\n{}", brief.body)
    );
}

#[tokio::test]
async fn when_brief_is_serialized_rendered_text_is_left_out() {
    // Given: A completed brief
    let pipeline =
        Pipeline::new(Arc::new(upstream()), config(FailurePolicy::Abort)).expect("pipeline");
    let brief = pipeline
        .run(date(), &PromptTemplate::default())
        .await
        .expect("brief");

    // When: It is written as JSON
    let json: serde_json::Value =
        serde_json::from_str(&brief.to_json_pretty().expect("json")).expect("valid json");

    // Then: Collected data is present and rendered text is not
    assert_eq!(json["date"], "14.02.2025");
    assert_eq!(json["portfolio"]["reports"][1]["ticker"], "GAZP");
    assert_eq!(json["portfolio"]["reports"][1]["price"], "100.0");
    assert!(json.get("body").is_none());
    assert!(json.get("prompt").is_none());
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn when_a_ticker_page_fails_under_abort_the_run_stops() {
    // Given: GAZP has no financial summary page
    let http = Arc::new(
        FixtureHttpClient::new()
            .with_body(CBR_URL, CBR_PAGE)
            .with_body(index_url(), INDEX_BODY)
            .with_body(page_url("SBER"), SBER_PAGE)
            .with_body(price_url("SBER"), price_body("SBER", "301.5")),
    );
    let pipeline = Pipeline::new(http.clone(), config(FailurePolicy::Abort)).expect("pipeline");

    // When: The brief is built
    let error = pipeline
        .run(date(), &PromptTemplate::default())
        .await
        .expect_err("must fail");

    // Then: The failing source is reported and no price was requested for GAZP
    let CoreError::Source(error) = error else {
        panic!("expected a source error, got {error:?}");
    };
    assert_eq!(error.source_id(), SourceId::SmartLab);
    assert_eq!(error.kind(), SourceErrorKind::Transport);
    assert!(!http.requested_urls().contains(&price_url("GAZP")));
}

#[tokio::test]
async fn when_a_ticker_page_fails_under_skip_only_that_ticker_is_dropped() {
    // Given: SBER has no financial summary page
    let http = Arc::new(
        FixtureHttpClient::new()
            .with_body(CBR_URL, CBR_PAGE)
            .with_body(index_url(), INDEX_BODY)
            .with_body(page_url("GAZP"), GAZP_PAGE)
            .with_body(price_url("GAZP"), price_body("GAZP", "160.2")),
    );
    let pipeline = Pipeline::new(http, config(FailurePolicy::Skip)).expect("pipeline");

    // When: The brief is built
    let brief = pipeline
        .run(date(), &PromptTemplate::default())
        .await
        .expect("brief");

    // Then: GAZP is reported alone and SBER is recorded as skipped
    assert_eq!(brief.portfolio.len(), 1);
    assert_eq!(brief.portfolio.tickers()[0].as_str(), "GAZP");
    assert_eq!(brief.portfolio.skipped.len(), 1);
    assert_eq!(brief.portfolio.skipped[0].as_str(), "SBER");
    assert!(brief.body.contains("📊 Портфель 1/1: GAZP\n"));
    assert!(brief.prompt.contains("(GAZP)"));
}

#[tokio::test]
async fn when_key_rate_is_unavailable_nothing_else_is_requested() {
    // Given: The central bank page is unreachable
    let http = Arc::new(FixtureHttpClient::new().with_body(index_url(), INDEX_BODY));
    let pipeline = Pipeline::new(http.clone(), config(FailurePolicy::Skip)).expect("pipeline");

    // When: The brief is built
    let error = pipeline
        .run(date(), &PromptTemplate::default())
        .await
        .expect_err("must fail");

    // Then: The run ends at the first upstream call
    assert!(matches!(error, CoreError::Source(ref e) if e.source_id() == SourceId::Cbr));
    assert_eq!(http.requested_urls(), vec![CBR_URL.to_string()]);
}

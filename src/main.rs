use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use csr_allocator::allocation::{
    calculate_fund_allocation, detect_anomalies, parse_metrics_file, AllocationScoringEngine,
    AnomalyFlag, AnomalySignals, FundShare, NgoId, NgoMetrics, ScoreComponents,
};
use csr_allocator::config::AppConfig;
use csr_allocator::error::AppError;
use csr_allocator::telemetry;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
    engine: Arc<AllocationScoringEngine>,
}

#[derive(Parser, Debug)]
#[command(
    name = "CSR Allocation Engine",
    about = "Score NGOs and distribute CSR funds from the command line or over HTTP",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run one allocation round from a metrics CSV export
    Allocate(AllocateArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct AllocateArgs {
    /// Metrics CSV export from the aggregation job
    #[arg(long)]
    metrics_csv: PathBuf,
    /// CSR fund pool to distribute
    #[arg(long)]
    total_fund: f64,
    /// Include the per-component score breakdown in the output
    #[arg(long)]
    show_components: bool,
}

#[derive(Debug, Deserialize)]
struct AllocationReportRequest {
    total_fund: f64,
    #[serde(default)]
    include_components: bool,
    ngos: Vec<NgoEntry>,
}

#[derive(Debug, Deserialize)]
struct NgoEntry {
    id: String,
    #[serde(flatten)]
    metrics: NgoMetrics,
    #[serde(default)]
    signals: Option<AnomalySignals>,
}

#[derive(Debug, Serialize)]
struct AllocationReportResponse {
    total_fund: f64,
    scores: Vec<NgoScoreView>,
    shares: Vec<FundShare>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    anomalies: Vec<NgoAnomalyView>,
}

#[derive(Debug, Serialize)]
struct NgoScoreView {
    id: NgoId,
    composite: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    components: Option<ScoreComponents>,
}

#[derive(Debug, Serialize)]
struct NgoAnomalyView {
    id: NgoId,
    flags: Vec<AnomalyFlag>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Allocate(args) => run_allocation(args),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let engine = Arc::new(AllocationScoringEngine::new(config.weights)?);

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
        engine,
    };

    let app = app_router(state).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "allocation engine ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/allocation/report", post(allocation_report_endpoint))
        .with_state(state)
}

fn run_allocation(args: AllocateArgs) -> Result<(), AppError> {
    let AllocateArgs {
        metrics_csv,
        total_fund,
        show_components,
    } = args;

    let config = AppConfig::load()?;
    let engine = AllocationScoringEngine::new(config.weights)?;

    let batch = parse_metrics_file(metrics_csv)?;
    let mut composites = Vec::with_capacity(batch.len());
    let mut breakdowns = Vec::with_capacity(batch.len());
    for (ngo_id, metrics) in &batch {
        let components = engine.score_components(metrics);
        let composite = engine.composite_score(&components);
        composites.push((ngo_id.clone(), composite));
        breakdowns.push((ngo_id.clone(), components, composite));
    }

    let shares = calculate_fund_allocation(&composites, total_fund)?;
    render_allocation_report(total_fund, &breakdowns, &shares, show_components);

    Ok(())
}

fn render_allocation_report(
    total_fund: f64,
    breakdowns: &[(NgoId, ScoreComponents, f64)],
    shares: &[FundShare],
    show_components: bool,
) {
    println!("CSR allocation round");
    println!("Fund pool: {total_fund:.2} across {} NGO(s)", shares.len());

    println!("\nComposite scores");
    for (ngo_id, components, composite) in breakdowns {
        println!("- {ngo_id}: {composite:.2}");
        if show_components {
            println!(
                "    rating {:.0} | engagement {:.0} | impact {:.0} | reporting {:.0} | profile {:.0}",
                components.rating,
                components.engagement,
                components.impact,
                components.reporting,
                components.profile
            );
        }
    }

    if shares.is_empty() {
        println!("\nAllocations: none (empty batch)");
    } else {
        println!("\nAllocations");
        for share in shares {
            println!(
                "- {}: {:.2} ({:.2}%)",
                share.ngo_id, share.allocation, share.percentage
            );
        }
    }
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

async fn allocation_report_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<AllocationReportRequest>,
) -> Result<Json<AllocationReportResponse>, AppError> {
    let AllocationReportRequest {
        total_fund,
        include_components,
        ngos,
    } = payload;

    let mut scores = Vec::with_capacity(ngos.len());
    let mut composites = Vec::with_capacity(ngos.len());
    let mut anomalies = Vec::new();

    for entry in &ngos {
        let ngo_id = NgoId(entry.id.clone());
        let components = state.engine.score_components(&entry.metrics);
        let composite = state.engine.composite_score(&components);

        composites.push((ngo_id.clone(), composite));
        scores.push(NgoScoreView {
            id: ngo_id.clone(),
            composite,
            components: include_components.then_some(components),
        });

        if let Some(signals) = &entry.signals {
            let flags = detect_anomalies(signals);
            if !flags.is_empty() {
                anomalies.push(NgoAnomalyView { id: ngo_id, flags });
            }
        }
    }

    let shares = calculate_fund_allocation(&composites, total_fund)?;

    Ok(Json(AllocationReportResponse {
        total_fund,
        scores,
        shares,
        anomalies,
    }))
}

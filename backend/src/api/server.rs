//! HTTP server for gridcalc.
//!
//! Every operation route takes a `multipart/form-data` upload with a file
//! field named `file` and answers with plain text.
//!
//! # API Endpoints
//!
//! | Method | Path        | Description                          |
//! |--------|-------------|--------------------------------------|
//! | GET    | `/health`   | Health check                         |
//! | POST   | `/echo`     | Parsed grid, one row per line        |
//! | POST   | `/invert`   | Transposed grid                      |
//! | POST   | `/flatten`  | All cells on one line                |
//! | POST   | `/sum`      | Sum of all cells                     |
//! | POST   | `/multiply` | Product of all cells                 |
//!
//! ```bash
//! curl -F 'file=@matrix.csv' http://localhost:8080/sum
//! ```

use axum::{
    body::Bytes,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        DefaultBodyLimit, Multipart, State,
    },
    http::{header, Method},
    response::Json,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use super::types::HealthResponse;
use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::transform::{run_bytes, Operation};

/// Name of the multipart field carrying the CSV.
pub const FILE_FIELD: &str = "file";

#[derive(Debug, Clone)]
struct AppState {
    config: ServerConfig,
}

/// An extracted upload.
struct Upload {
    file_name: Option<String>,
    bytes: Bytes,
}

/// Build the application router.
pub fn router(config: &ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    let mut app: Router<AppState> = Router::new()
        .route("/", get(health))
        .route("/health", get(health));

    for operation in Operation::ALL {
        app = app.route(
            operation.route(),
            post(move |upload: Result<Multipart, MultipartRejection>| {
                run_upload(operation, upload)
            }),
        );
    }

    app.layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(AppState {
            config: config.clone(),
        })
}

/// Start the HTTP server and serve until the process exits.
pub async fn start_server(config: ServerConfig) -> ServerResult<()> {
    let addr = config.addr();
    let app = router(&config);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, max_upload_bytes = config.max_upload_bytes, "gridcalc server running");
    tracing::info!("   GET  {:<10} - Health check", "/health");
    for op in Operation::ALL {
        tracing::info!("   POST {:<10} - {}", op.route(), op.description());
    }

    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::new(&state.config))
}

/// Shared handler behind every operation route.
async fn run_upload(
    operation: Operation,
    upload: Result<Multipart, MultipartRejection>,
) -> ServerResult<String> {
    let request_id = Uuid::new_v4();

    let result = process_upload(operation, upload, request_id).await;

    match &result {
        Ok(output) => tracing::info!(%request_id, %operation, bytes_out = output.len(), "operation succeeded"),
        Err(e) if e.status_code().is_client_error() => {
            tracing::warn!(%request_id, %operation, error = %e, "upload rejected")
        }
        Err(e) => tracing::error!(%request_id, %operation, error = %e, "operation failed"),
    }

    result
}

async fn process_upload(
    operation: Operation,
    upload: Result<Multipart, MultipartRejection>,
    request_id: Uuid,
) -> ServerResult<String> {
    let multipart = upload.map_err(|e| ServerError::FileAccess {
        status: e.status(),
        message: e.body_text(),
    })?;

    let Upload { file_name, bytes } = read_upload(multipart).await?;
    tracing::info!(
        %request_id,
        %operation,
        file = file_name.as_deref().unwrap_or("unknown"),
        bytes = bytes.len(),
        "upload received"
    );

    let output = tokio::task::spawn_blocking(move || run_bytes(operation, &bytes))
        .await
        .map_err(|e| ServerError::Internal(format!("worker failed: {}", e)))??;

    Ok(output)
}

/// Pull the `file` field out of the form. Other fields are skipped.
async fn read_upload(mut multipart: Multipart) -> ServerResult<Upload> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_error)?;
        return Ok(Upload { file_name, bytes });
    }

    Err(ServerError::file_access(format!(
        "no file field named {:?} in upload",
        FILE_FIELD
    )))
}

fn multipart_error(e: MultipartError) -> ServerError {
    ServerError::FileAccess {
        status: e.status(),
        message: e.body_text(),
    }
}

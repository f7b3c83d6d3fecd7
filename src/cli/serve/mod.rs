//! Catalog server.
//!
//! ```text
//! OPTIONS *            → 204 + CORS headers
//! GET     /api/icons   → IconCatalog | 500 {error, details?}
//! GET     /health      → {status: "OK", timestamp}
//! GET     /*           → file under `serve.public`, `/` → index.html
//! ```
//!
//! Requests are accepted on the calling thread and handled on a small rayon
//! pool. Outbound design API calls run on a shared tokio runtime through
//! `block_on`, so a slow upstream only occupies its own worker.

mod api;
mod lifecycle;
mod path;
mod response;


use crate::{
    config::{AppConfig, FigmaConfig},
    figma::{FigmaApi, FigmaClient},
    log,
};
use anyhow::{Context, Result};
use response::Cors;
use std::{path::PathBuf, sync::Arc};
use tiny_http::{Method, Request, Server};

/// Number of request workers.
const WORKERS: usize = 4;

/// Everything a request handler needs, shared across workers.
pub struct ServeState<A> {
    api: A,
    figma: FigmaConfig,
    public: PathBuf,
    development: bool,
    cors: Cors,
    runtime: tokio::runtime::Runtime,
}

impl ServeState<FigmaClient> {
    /// Build state backed by the real design API.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let token = config.figma.token.clone().unwrap_or_default();
        let api = FigmaClient::new(&config.figma.api, token)?;
        Self::with_api(api, config)
    }
}

impl<A: FigmaApi> ServeState<A> {
    pub fn with_api(api: A, config: &AppConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("iconpack-upstream")
            .enable_all()
            .build()
            .context("Failed to create tokio runtime")?;

        Ok(Self {
            api,
            figma: config.figma.clone(),
            public: config.serve.public.clone(),
            development: config.serve.development,
            cors: Cors::new(&config.serve.cors_origin)?,
            runtime,
        })
    }
}

/// Bound server ready to accept requests
pub struct BoundServer {
    server: Arc<Server>,
}

/// Bind the HTTP server and report the configuration it will serve with.
pub fn bind_server(config: &AppConfig) -> Result<BoundServer> {
    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    lifecycle::register_server_for_shutdown(Arc::clone(&server));
    lifecycle::report_startup(addr, &config.figma);

    Ok(BoundServer { server })
}

impl BoundServer {
    /// Start the request loop (blocking until the server is unblocked).
    pub fn run<A>(self, state: Arc<ServeState<A>>) -> Result<()>
    where
        A: FigmaApi + Send + Sync + 'static,
    {
        run_request_loop(&self.server, state)
    }
}

/// Entry point for `iconpack serve`.
pub fn serve(config: &AppConfig) -> Result<()> {
    let state = Arc::new(ServeState::from_config(config)?);
    bind_server(config)?.run(state)
}

fn run_request_loop<A>(server: &Server, state: Arc<ServeState<A>>) -> Result<()>
where
    A: FigmaApi + Send + Sync + 'static,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(WORKERS)
        .thread_name(|i| format!("iconpack-serve-{i}"))
        .build()
        .context("Failed to create request pool")?;

    for request in server.incoming_requests() {
        let state = Arc::clone(&state);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &state) {
                log!("serve"; "request error: {e}");
            }
        });
    }
    Ok(())
}

/// Where a request is dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Preflight,
    Icons,
    Health,
    Static,
    MethodNotAllowed,
}

fn route(method: &Method, url: &str) -> Route {
    let path = url.split('?').next().unwrap_or(url);
    match (method, path) {
        (Method::Options, _) => Route::Preflight,
        (Method::Get, "/api/icons") => Route::Icons,
        (Method::Get, "/health") => Route::Health,
        (Method::Get | Method::Head, _) => Route::Static,
        _ => Route::MethodNotAllowed,
    }
}

/// Handle a single HTTP request
fn handle_request<A: FigmaApi>(request: Request, state: &ServeState<A>) -> Result<()> {
    let path = request.url().split('?').next().unwrap_or("/").to_string();
    log!("serve"; "{} {}", request.method(), path);

    if crate::core::is_shutdown() {
        return response::respond_unavailable(request, &state.cors);
    }

    match route(request.method(), request.url()) {
        Route::Preflight => response::respond_preflight(request, &state.cors),
        Route::Health => response::respond_json(request, &state.cors, 200, &api::health()),
        Route::Icons => {
            let result = state
                .runtime
                .block_on(api::fetch_catalog(&state.api, &state.figma));
            match result {
                Ok(catalog) => response::respond_json(request, &state.cors, 200, &catalog),
                Err(e) => {
                    log!("error"; "{}: {}", path, e);
                    let body = api::ErrorBody::new(&e, state.development);
                    response::respond_json(request, &state.cors, 500, &body)
                }
            }
        }
        Route::Static => match path::resolve_static(request.url(), &state.public) {
            Some(file) => response::respond_file(request, &state.cors, &file),
            None => response::respond_not_found(request, &state.cors),
        },
        Route::MethodNotAllowed => response::respond_method_not_allowed(request, &state.cors),
    }
}

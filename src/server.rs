//! Server helpers for running the provider.
//!
//! This module provides the [`ProviderService`] trait and the `serve`
//! functions that expose it to the host over TCP.
//!
//! # Wire format
//!
//! Each request is one JSON object on its own line:
//!
//! ```text
//! {"id": 1, "method": "read", "params": {"resource_type": "akeneo_category", "current_state": {...}}}
//! ```
//!
//! and is answered with one line:
//!
//! ```text
//! {"id": 1, "result": {...}, "diagnostics": []}
//! ```
//!
//! Requests on a connection are handled in order; each connection runs on its
//! own task. A line that cannot be parsed is answered with an error diagnostic
//! and the connection stays open.
//!
//! # Signal Handling
//!
//! The server handles SIGTERM and SIGINT for graceful shutdown. When a signal
//! is received, the server:
//! 1. Stops accepting new connections
//! 2. Lets in-flight requests finish (with configurable timeout)
//! 3. Calls the provider's `stop()` method
//! 4. Exits cleanly

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument, warn};

use crate::error::ProviderError;
use crate::schema::{has_errors, Diagnostic, ProviderSchema};
use crate::types::{
    ImportedResource, PlanResult, ProviderMetadata, HANDSHAKE_PREFIX, PROTOCOL_VERSION,
};

/// Operations the host can call on a provider.
#[async_trait::async_trait]
pub trait ProviderService: Send + Sync + 'static {
    // =========================================================================
    // Schema & Metadata
    // =========================================================================

    /// Return the provider's schema including all resources.
    fn schema(&self) -> ProviderSchema;

    /// Return provider metadata. By default, this is derived from the schema.
    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            version: String::new(),
            resources: self.schema().resources.keys().cloned().collect(),
        }
    }

    // =========================================================================
    // Provider Lifecycle
    // =========================================================================

    /// Validate the provider configuration before configuring.
    async fn validate_provider_config(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        let _ = config;
        Ok(vec![])
    }

    /// Configure the provider with credentials and settings.
    async fn configure(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError>;

    /// Stop the provider gracefully.
    async fn stop(&self) -> Result<(), ProviderError> {
        Ok(())
    }

    // =========================================================================
    // Resource Operations
    // =========================================================================

    /// Validate a resource's configuration before planning.
    async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        let _ = (resource_type, config);
        Ok(vec![])
    }

    /// Upgrade resource state from an older schema version.
    async fn upgrade_resource_state(
        &self,
        resource_type: &str,
        version: i64,
        state: Value,
    ) -> Result<Value, ProviderError> {
        let _ = (resource_type, version);
        Ok(state)
    }

    /// Plan changes for a resource.
    async fn plan(
        &self,
        resource_type: &str,
        prior_state: Option<Value>,
        proposed_state: Value,
        config: Value,
    ) -> Result<PlanResult, ProviderError>;

    async fn create(&self, resource_type: &str, planned_state: Value) -> Result<Value, ProviderError>;

    async fn read(&self, resource_type: &str, current_state: Value) -> Result<Value, ProviderError>;

    async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value, ProviderError>;

    async fn delete(&self, resource_type: &str, current_state: Value) -> Result<(), ProviderError>;

    /// Build state for an existing entity from an import identifier.
    async fn import_resource(
        &self,
        resource_type: &str,
        _id: &str,
    ) -> Result<Vec<ImportedResource>, ProviderError> {
        Err(ProviderError::Unsupported(format!(
            "Import not supported for resource type: {}",
            resource_type
        )))
    }
}

/// One host request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

/// The answer to one [`Request`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub id: Value,
    pub result: Value,
    pub diagnostics: Vec<Diagnostic>,
}

impl Response {
    fn failed(id: Value, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            id,
            result: Value::Null,
            diagnostics,
        }
    }
}

/// Parameters of every method; each method reads the fields it needs.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Params {
    resource_type: String,
    config: Value,
    version: i64,
    state: Value,
    prior_state: Option<Value>,
    proposed_state: Value,
    planned_state: Value,
    current_state: Value,
    id: String,
}

/// Handle one raw request line.
pub async fn handle_line<P: ProviderService + ?Sized>(provider: &P, line: &str) -> Response {
    match serde_json::from_str::<Request>(line) {
        Ok(request) => handle_request(provider, request).await,
        Err(e) => {
            warn!(error = %e, "Malformed request");
            Response::failed(
                Value::Null,
                vec![Diagnostic::error("Malformed request").with_detail(e.to_string())],
            )
        },
    }
}

/// Dispatch a request to the provider and collect its diagnostics.
#[instrument(skip(provider, request), name = "rpc", fields(method = %request.method))]
pub async fn handle_request<P: ProviderService + ?Sized>(provider: &P, request: Request) -> Response {
    let Request { id, method, params } = request;

    let params: Params = match serde_json::from_value(if params.is_null() {
        Value::Object(Default::default())
    } else {
        params
    }) {
        Ok(params) => params,
        Err(e) => {
            warn!(error = %e, "Invalid request parameters");
            return Response::failed(
                id,
                vec![Diagnostic::error("Invalid request parameters").with_detail(e.to_string())],
            );
        },
    };

    debug!(resource_type = %params.resource_type, "Request received");
    match dispatch(provider, &method, params).await {
        Ok((result, diagnostics)) => {
            if has_errors(&diagnostics) {
                warn!(diagnostics = diagnostics.len(), "Request completed with errors");
            } else {
                info!("Request completed successfully");
            }
            Response {
                id,
                result,
                diagnostics,
            }
        },
        Err(e) => {
            error!(error = %e, "Request failed");
            Response::failed(id, e.into_diagnostics())
        },
    }
}

async fn dispatch<P: ProviderService + ?Sized>(
    provider: &P,
    method: &str,
    params: Params,
) -> Result<(Value, Vec<Diagnostic>), ProviderError> {
    let Params {
        resource_type,
        config,
        version,
        state,
        prior_state,
        proposed_state,
        planned_state,
        current_state,
        id,
    } = params;

    let outcome = match method {
        "get_metadata" => (serde_json::to_value(provider.metadata())?, vec![]),
        "get_schema" => (serde_json::to_value(provider.schema())?, vec![]),
        "validate_provider_config" => (Value::Null, provider.validate_provider_config(config).await?),
        "configure" => (Value::Null, provider.configure(config).await?),
        "stop" => {
            provider.stop().await?;
            (Value::Null, vec![])
        },
        "validate_resource_config" => (
            Value::Null,
            provider.validate_resource_config(&resource_type, config).await?,
        ),
        "upgrade_resource_state" => (
            provider
                .upgrade_resource_state(&resource_type, version, state)
                .await?,
            vec![],
        ),
        "plan" => {
            let plan = provider
                .plan(&resource_type, prior_state, proposed_state, config)
                .await?;
            (serde_json::to_value(plan)?, vec![])
        },
        "create" => (provider.create(&resource_type, planned_state).await?, vec![]),
        "read" => (provider.read(&resource_type, current_state).await?, vec![]),
        "update" => (
            provider
                .update(
                    &resource_type,
                    prior_state.unwrap_or(Value::Null),
                    planned_state,
                )
                .await?,
            vec![],
        ),
        "delete" => {
            provider.delete(&resource_type, current_state).await?;
            (Value::Null, vec![])
        },
        "import_resource_state" => {
            let imported = provider.import_resource(&resource_type, &id).await?;
            (serde_json::to_value(imported)?, vec![])
        },
        other => {
            return Err(ProviderError::Unsupported(format!("Unknown method: {}", other)));
        },
    };
    Ok(outcome)
}

/// Options for configuring the provider server.
#[derive(Debug, Clone)]
pub struct ServeOptions {
    /// Timeout for graceful shutdown. After receiving a shutdown signal,
    /// the server will wait this long for in-flight requests to complete.
    /// Default: 30 seconds.
    pub shutdown_timeout: Duration,
}

impl Default for ServeOptions {
    fn default() -> Self {
        Self {
            shutdown_timeout: Duration::from_secs(30),
        }
    }
}

impl ServeOptions {
    /// Create new serve options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shutdown timeout.
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }
}

/// Wait for a shutdown signal (SIGTERM or SIGINT, CTRL+C on Windows).
async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => info!("Received SIGTERM, initiating graceful shutdown"),
                    _ = sigint.recv() => info!("Received SIGINT, initiating graceful shutdown"),
                }
            },
            (Err(e), _) | (_, Err(e)) => {
                error!(error = %e, "Failed to install signal handlers");
                std::future::pending::<()>().await;
            },
        }
    }

    #[cfg(windows)]
    {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received CTRL+C, initiating graceful shutdown"),
            Err(e) => {
                error!(error = %e, "Failed to install CTRL+C handler");
                std::future::pending::<()>().await;
            },
        }
    }

    #[cfg(not(any(unix, windows)))]
    {
        std::future::pending::<()>().await;
    }
}

/// Serve a provider on an available local port.
///
/// This function:
/// 1. Binds `127.0.0.1` on a free port
/// 2. Outputs the handshake string to stdout
/// 3. Serves requests until SIGTERM/SIGINT
///
/// The handshake format is: `AKENEO_PROVIDER|<version>|<address>`
///
/// For custom configuration, use [`serve_with_options`].
pub async fn serve<P: ProviderService>(provider: P) -> Result<(), Box<dyn std::error::Error>> {
    serve_with_options(provider, ServeOptions::default()).await
}

/// Serve a provider with custom options.
pub async fn serve_with_options<P: ProviderService>(
    provider: P,
    options: ServeOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    serve_on_listener(provider, listener, options).await
}

/// Serve a provider on a specific address.
pub async fn serve_on<P: ProviderService>(
    provider: P,
    addr: SocketAddr,
) -> Result<(), Box<dyn std::error::Error>> {
    serve_on_with_options(provider, addr, ServeOptions::default()).await
}

/// Serve a provider on a specific address with custom options.
pub async fn serve_on_with_options<P: ProviderService>(
    provider: P,
    addr: SocketAddr,
    options: ServeOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind(addr).await?;
    serve_on_listener(provider, listener, options).await
}

async fn serve_on_listener<P: ProviderService>(
    provider: P,
    listener: TcpListener,
    options: ServeOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = listener.local_addr()?;
    println!("{}|{}|{}", HANDSHAKE_PREFIX, PROTOCOL_VERSION, addr);

    run(
        Arc::new(provider),
        listener,
        options,
        wait_for_shutdown_signal(),
    )
    .await;
    Ok(())
}

/// Accept connections until `shutdown` resolves, then drain and stop.
async fn run<P: ProviderService>(
    provider: Arc<P>,
    listener: TcpListener,
    options: ServeOptions,
    shutdown: impl Future<Output = ()>,
) {
    info!(address = ?listener.local_addr().ok(), "Provider server starting");

    let (stop_tx, stop_rx) = watch::channel(false);
    let mut connections = JoinSet::new();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    debug!(%peer, "Connection accepted");
                    connections.spawn(serve_connection(
                        Arc::clone(&provider),
                        stream,
                        stop_rx.clone(),
                    ));
                },
                Err(e) => warn!(error = %e, "Failed to accept connection"),
            },
            Some(_) = connections.join_next(), if !connections.is_empty() => {},
        }
    }
    drop(listener);

    // Connections finish their current request, then close
    let _ = stop_tx.send(true);
    let drain = async { while connections.join_next().await.is_some() {} };
    match tokio::time::timeout(options.shutdown_timeout, drain).await {
        Ok(()) => info!("Server shutdown complete"),
        Err(_) => {
            warn!(
                timeout = ?options.shutdown_timeout,
                "Shutdown timeout exceeded, forcing shutdown"
            );
            connections.abort_all();
        },
    }

    debug!("Calling provider stop()");
    if let Err(e) = provider.stop().await {
        warn!(error = %e, "Provider stop() returned error");
    }
    info!("Provider shutdown complete");
}

async fn serve_connection<P: ProviderService>(
    provider: Arc<P>,
    stream: TcpStream,
    mut stop: watch::Receiver<bool>,
) {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    loop {
        let line = tokio::select! {
            _ = stop.changed() => break,
            line = lines.next_line() => line,
        };

        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "Failed to read request");
                break;
            },
        };
        if line.trim().is_empty() {
            continue;
        }

        let response = handle_line(provider.as_ref(), &line).await;
        let mut payload = match serde_json::to_string(&response) {
            Ok(payload) => payload,
            Err(e) => {
                error!(error = %e, "Failed to encode response");
                break;
            },
        };
        payload.push('\n');
        if let Err(e) = writer.write_all(payload.as_bytes()).await {
            warn!(error = %e, "Failed to write response");
            break;
        }
    }
    debug!("Connection closed");
}

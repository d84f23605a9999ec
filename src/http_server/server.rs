//! # HTTP Server
//!
//! Main HTTP server combining every resource router with the health and
//! metrics endpoints.

use std::collections::HashMap;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use uuid::Uuid;

use super::config::HttpServerConfig;
use super::observability_routes::observability_routes;
use super::resource_routes::resource_routes;
use crate::auth::{JwtConfig, JwtManager};
use crate::controller::{Resource, ResourceController, RESOURCE_PATHS};
use crate::observability::{log_event_with_fields, Event, MetricsRegistry, Timer};
use crate::pagination::PaginationConfig;
use crate::schema::{Blog, ChaiVariety, Comment, Employee, Student, Tweet};
use crate::store::Database;

/// Shared services behind every route
#[derive(Clone)]
pub struct Services {
    pub db: Arc<Database>,
    pub metrics: Arc<MetricsRegistry>,
    pub jwt: Arc<JwtManager>,
    /// Pagination overrides keyed by resource path
    pub pagination: HashMap<String, PaginationConfig>,
}

impl Services {
    pub fn new(jwt: JwtConfig) -> Self {
        Self {
            db: Arc::new(Database::new()),
            metrics: Arc::new(MetricsRegistry::new()),
            jwt: Arc::new(JwtManager::new(jwt)),
            pagination: HashMap::new(),
        }
    }

    pub fn with_pagination(mut self, pagination: HashMap<String, PaginationConfig>) -> Self {
        self.pagination = pagination;
        self
    }

    /// Controller for `E` with any configured pagination override applied
    pub fn controller<E: Resource>(&self) -> ResourceController<E> {
        let mut config = E::config();
        if let Some(pagination) = self.pagination.get(E::PATH) {
            config = config.with_pagination(*pagination);
        }
        ResourceController::new(Arc::clone(&self.db), config, Arc::clone(&self.metrics))
    }

    fn routes<E: Resource>(&self) -> Router {
        resource_routes(self.controller::<E>(), Arc::clone(&self.jwt))
    }
}

impl Default for Services {
    fn default() -> Self {
        Self::new(JwtConfig::default())
    }
}

/// HTTP Server for the resource API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with default configuration
    pub fn new() -> Self {
        Self::with_config(HttpServerConfig::default(), Services::default())
    }

    /// Create a new HTTP server with custom configuration
    pub fn with_config(config: HttpServerConfig, services: Services) -> Self {
        let router = Self::build_router(&config, &services);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &HttpServerConfig, services: &Services) -> Router {
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .merge(observability_routes(Arc::clone(&services.metrics)))
            .merge(services.routes::<Employee>())
            .merge(services.routes::<Student>())
            .merge(services.routes::<Blog>())
            .merge(services.routes::<Comment>())
            .merge(services.routes::<ChaiVariety>())
            .merge(services.routes::<Tweet>())
            .layer(TimeoutLayer::new(config.request_timeout()))
            .layer(middleware::from_fn_with_state(
                Arc::clone(&services.metrics),
                track_requests,
            ))
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until Ctrl-C
    pub async fn start(self) -> io::Result<()> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid socket address {}: {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        let addr_text = addr.to_string();
        let resources = RESOURCE_PATHS.join(",");
        log_event_with_fields(
            Event::ServerStart,
            &[("addr", addr_text.as_str()), ("resources", resources.as_str())],
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await?;

        log_event_with_fields(Event::ServerStop, &[("addr", addr_text.as_str())]);
        Ok(())
    }
}

impl Default for HttpServer {
    fn default() -> Self {
        Self::new()
    }
}

/// Every route the server answers, as `METHOD path` lines
pub fn route_table() -> Vec<String> {
    let mut routes = vec!["GET /health".to_string(), "GET /metrics".to_string()];
    for path in RESOURCE_PATHS {
        routes.push(format!("GET /{}/", path));
        routes.push(format!("POST /{}/", path));
        for method in ["GET", "PUT", "PATCH", "DELETE"] {
            routes.push(format!("{} /{}/:id/", method, path));
        }
    }
    routes
}

/// Count and log every request
async fn track_requests(
    State(metrics): State<Arc<MetricsRegistry>>,
    request: Request,
    next: Next,
) -> Response {
    let timer = Timer::new();
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;
    let status = response.status();
    metrics.record_response(status.as_u16());

    let event = if status == StatusCode::REQUEST_TIMEOUT {
        Event::RequestTimeout
    } else {
        Event::RequestComplete
    };
    let elapsed = timer.elapsed_ms();
    log_event_with_fields(
        event,
        &[
            ("request_id", request_id.as_str()),
            ("method", method.as_str()),
            ("path", path.as_str()),
            ("status", status.as_str()),
            ("elapsed_ms", elapsed.as_str()),
        ],
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_creation() {
        let server = HttpServer::new();
        assert_eq!(server.socket_addr(), "127.0.0.1:8000");
    }

    #[test]
    fn test_server_with_custom_port() {
        let config = HttpServerConfig::with_port(8080);
        let server = HttpServer::with_config(config, Services::default());
        assert_eq!(server.socket_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_pagination_override_reaches_controller() {
        let mut overrides = HashMap::new();
        overrides.insert("blogs".to_string(), PaginationConfig::with_page_size(3));
        let services = Services::default().with_pagination(overrides);

        assert_eq!(services.controller::<Blog>().config().pagination.page_size, 3);
        assert_eq!(
            services.controller::<Employee>().config().pagination.page_size,
            crate::pagination::DEFAULT_PAGE_SIZE
        );
    }

    #[test]
    fn test_route_table_covers_every_resource() {
        let routes = route_table();
        assert_eq!(routes.len(), 2 + RESOURCE_PATHS.len() * 6);
        assert!(routes.contains(&"PATCH /tweets/:id/".to_string()));
    }
}

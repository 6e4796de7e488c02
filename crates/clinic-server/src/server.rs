use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, extract::DefaultBodyLimit, middleware, routing::get};
use clinic_core::PageBounds;
use clinic_storage::StorageError;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::AppConfig, handlers, middleware as app_middleware, routes, store::ClinicStore,
};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ClinicStore>,
    pub pagination: PageBounds,
}

impl AppState {
    pub fn new(store: ClinicStore, pagination: PageBounds) -> Self {
        Self {
            store: Arc::new(store),
            pagination,
        }
    }
}

pub struct ClinicServer {
    addr: SocketAddr,
    app: Router,
}

/// Opens the configured store and builds the full router.
pub fn build_app(cfg: &AppConfig) -> Result<Router, StorageError> {
    let store = ClinicStore::open(&cfg.storage)?;
    let state = AppState::new(store, cfg.pagination.bounds());
    Ok(build_router(state, cfg))
}

pub fn build_router(state: AppState, cfg: &AppConfig) -> Router {
    let body_limit = cfg.server.body_limit_bytes;
    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .route("/readyz", get(handlers::readyz))
        .merge(routes::entity_routes())
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .with_state(state)
        // Middleware stack, innermost first: body limit -> content negotiation
        // -> compression/cors -> trace -> request id
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(app_middleware::content_negotiation))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    use tracing::field::Empty;
                    let req_id = req
                        .extensions()
                        .get::<app_middleware::RequestId>()
                        .map(|id| id.as_str().to_string())
                        .unwrap_or_default();
                    tracing::info_span!(
                        "http.request",
                        http.method = %req.method(),
                        http.target = %req.uri(),
                        http.status_code = Empty,
                        request_id = %req_id
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        span.record(
                            "http.status_code",
                            tracing::field::display(res.status().as_u16()),
                        );
                        tracing::info!(
                            http.status = %res.status().as_u16(),
                            elapsed_ms = %latency.as_millis(),
                            "request handled"
                        );
                    },
                ),
        )
        .layer(middleware::from_fn(app_middleware::request_id))
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerBuilder {
    pub fn new() -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
        }
    }

    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    pub fn build(self) -> Result<ClinicServer, StorageError> {
        let app = build_app(&self.config)?;
        Ok(ClinicServer {
            addr: self.addr,
            app,
        })
    }
}

impl ClinicServer {
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use clinic_storage::StorageConfig;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app() -> Router {
        let cfg = AppConfig {
            storage: StorageConfig::memory(),
            ..AppConfig::default()
        };
        build_app(&cfg).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    #[tokio::test]
    async fn doctor_lifecycle() {
        let app = app();

        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/doctors",
                json!({ "name": "Ada Lovelace", "specialty": "Cardiology" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["status"], 201);
        assert_eq!(body["message"], "Doctor created successfully");
        let id = body["doctor"]["id"].as_str().unwrap().to_string();
        assert_eq!(body["doctor"]["createdAt"], body["doctor"]["updatedAt"]);

        let (status, body) = send(&app, get(&format!("/doctors/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["doctor"]["specialty"], "Cardiology");

        let (status, body) = send(
            &app,
            json_request(
                "PUT",
                &format!("/doctors/{id}"),
                json!({ "specialty": "Neurology" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Doctor updated successfully");
        assert_eq!(body["doctor"]["name"], "Ada Lovelace");
        assert_eq!(body["doctor"]["specialty"], "Neurology");

        let (status, body) = send(
            &app,
            Request::builder()
                .method("DELETE")
                .uri(format!("/doctors/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["doctor"]["id"], id.as_str());

        let (status, body) = send(&app, get(&format!("/doctors/{id}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], 404);
        assert_eq!(body["message"], format!("Doctor with id {id} not found"));
    }

    #[tokio::test]
    async fn create_sets_location_and_request_id() {
        let app = app();
        let resp = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/patients",
                json!({ "name": "Grace", "dateOfBirth": "1990-04-12" }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let location = resp.headers()[header::LOCATION].to_str().unwrap().to_string();
        assert!(location.starts_with("/patients/"));
        assert!(resp.headers().contains_key("x-request-id"));

        let mut req = get("/healthz");
        req.headers_mut()
            .insert("x-request-id", "abc-123".parse().unwrap());
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.headers()["x-request-id"], "abc-123");
    }

    #[tokio::test]
    async fn validation_failures_are_bad_requests() {
        let app = app();

        let (status, body) = send(
            &app,
            json_request("POST", "/doctors", json!({ "name": "No Specialty" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 400);

        let (status, _) = send(
            &app,
            json_request("POST", "/doctors", json!({ "name": "  ", "specialty": "x" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            json_request(
                "POST",
                "/patients",
                json!({ "name": "Bad Date", "dateOfBirth": "12/04/1990" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, get("/doctors?page=0")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_ids_are_not_found() {
        let app = app();
        let long_id = "a".repeat(65);
        for uri in [
            "/doctors/bad%20id".to_string(),
            "/doctors/x@y".to_string(),
            format!("/doctors/{long_id}"),
            "/patients/x@y/records".to_string(),
        ] {
            let (status, body) = send(&app, get(&uri)).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(body["status"], 404);
        }

        let (_, body) = send(&app, get("/doctors/x@y")).await;
        assert_eq!(body["message"], "Doctor with id x@y not found");

        let req = Request::builder()
            .method("DELETE")
            .uri("/appointments/x@y")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_fields_and_immutable_fields_are_ignored() {
        let app = app();
        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/doctors",
                json!({ "name": "Ann", "specialty": "Oncology", "favouriteColour": "blue" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(body["doctor"].get("favouriteColour").is_none());
        let created = body["doctor"].clone();
        let id = created["id"].as_str().unwrap().to_string();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        let (status, body) = send(
            &app,
            json_request(
                "PUT",
                &format!("/doctors/{id}"),
                json!({
                    "id": "hijacked",
                    "createdAt": "2000-01-01T00:00:00Z",
                    "phone": "555-0100",
                    "shoeSize": 44
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let updated = &body["doctor"];
        assert_eq!(updated["id"], created["id"]);
        assert_eq!(updated["createdAt"], created["createdAt"]);
        assert_ne!(updated["updatedAt"], created["updatedAt"]);
        assert_eq!(updated["phone"], "555-0100");
        assert!(updated.get("shoeSize").is_none());

        let (status, _) = send(&app, get("/doctors/hijacked")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn oversized_body_is_payload_too_large() {
        let cfg = AppConfig {
            storage: StorageConfig::memory(),
            server: crate::config::ServerConfig {
                body_limit_bytes: 64,
                ..Default::default()
            },
            ..AppConfig::default()
        };
        let app = build_app(&cfg).unwrap();
        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/doctors",
                json!({ "name": "x".repeat(200), "specialty": "Oncology" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["status"], 413);
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn unsupported_method_uses_error_envelope() {
        let app = app();
        let req = Request::builder()
            .method("PATCH")
            .uri("/doctors/x")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["status"], 405);
        assert_eq!(body["message"], "Method not allowed for this route");
    }

    #[tokio::test]
    async fn medication_update_cannot_reverse_stored_range() {
        let app = app();
        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/medications",
                json!({
                    "patientId": "p1",
                    "name": "Ibuprofen",
                    "dosage": "200mg",
                    "startDate": "2024-03-10"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = body["medication"]["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            json_request(
                "PUT",
                &format!("/medications/{id}"),
                json!({ "endDate": "2024-03-01" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 400);

        let (_, body) = send(&app, get(&format!("/medications/{id}"))).await;
        assert!(body["medication"].get("endDate").is_none());
    }

    #[tokio::test]
    async fn non_json_body_is_unsupported_media_type() {
        let app = app();
        let req = Request::builder()
            .method("POST")
            .uri("/doctors")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from("name=x"))
            .unwrap();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body["status"], 415);
    }

    #[tokio::test]
    async fn update_and_delete_of_missing_id_are_not_found() {
        let app = app();
        let (status, _) = send(
            &app,
            json_request("PUT", "/medications/ghost", json!({ "dosage": "5mg" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let req = Request::builder()
            .method("DELETE")
            .uri("/records/ghost")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Patient record with id ghost not found");
    }

    #[tokio::test]
    async fn list_filters_and_paginates() {
        let app = app();
        for (name, specialty) in [
            ("Ann", "Cardiology"),
            ("Bob", "Dermatology"),
            ("Cid", "cardiology"),
            ("Dee", "Cardiology"),
        ] {
            let (status, _) = send(
                &app,
                json_request(
                    "POST",
                    "/doctors",
                    json!({ "name": name, "specialty": specialty }),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, body) = send(&app, get("/doctors?specialty=CARDIOLOGY&limit=2")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Doctors retrieved successfully");
        assert_eq!(body["doctors"].as_array().unwrap().len(), 2);
        assert_eq!(body["pagination"]["total"], 3);
        assert_eq!(body["pagination"]["totalPages"], 2);
        assert_eq!(body["pagination"]["hasMore"], true);

        let (_, body) = send(&app, get("/doctors?specialty=cardiology&limit=2&page=2")).await;
        assert_eq!(body["doctors"].as_array().unwrap().len(), 1);
        assert_eq!(body["pagination"]["hasMore"], false);

        let (_, body) = send(&app, get("/doctors?limit=1000")).await;
        assert_eq!(body["pagination"]["limit"], 100);
        assert_eq!(body["pagination"]["total"], 4);
    }

    #[tokio::test]
    async fn nested_lists_require_parent() {
        let app = app();
        let (_, body) = send(
            &app,
            json_request(
                "POST",
                "/patients",
                json!({ "name": "Grace", "dateOfBirth": "1990-04-12" }),
            ),
        )
        .await;
        let patient = body["patient"]["id"].as_str().unwrap().to_string();

        for (pid, diagnosis) in [(patient.as_str(), "Flu"), ("someone-else", "Cold")] {
            let (status, _) = send(
                &app,
                json_request(
                    "POST",
                    "/records",
                    json!({ "patientId": pid, "diagnosis": diagnosis }),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, body) = send(&app, get(&format!("/patients/{patient}/records"))).await;
        assert_eq!(status, StatusCode::OK);
        let records = body["records"].as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["diagnosis"], "Flu");

        let (status, _) = send(&app, get("/patients/nobody/records")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn service_endpoints() {
        let app = app();
        let (status, body) = send(&app, get("/readyz")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
        assert_eq!(body["backend"], "memory");
        assert_eq!(body["collections"]["doctors"], 0);

        let (status, body) = send(&app, get("/nowhere")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Route not found");
    }
}

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use core_config::AppInfo;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub name: &'static str,
    pub version: &'static str,
}

/// Result of probing one backing service.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DependencyStatus {
    pub name: &'static str,
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Readiness report; answers 503 unless every dependency is healthy.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub dependencies: Vec<DependencyStatus>,
}

impl ReadyResponse {
    pub fn from_checks(dependencies: Vec<DependencyStatus>) -> Self {
        let ready = dependencies.iter().all(|d| d.healthy);
        for dependency in dependencies.iter().filter(|d| !d.healthy) {
            tracing::error!(
                dependency = dependency.name,
                message = ?dependency.message,
                "Readiness check failed"
            );
        }

        Self {
            status: if ready { "ready" } else { "not ready" },
            dependencies,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.dependencies.iter().all(|d| d.healthy)
    }
}

impl IntoResponse for ReadyResponse {
    fn into_response(self) -> Response {
        let status = if self.is_ready() {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };
        (status, Json(self)).into_response()
    }
}

/// Liveness: 200 with the app name and version whenever the process is up.
pub async fn health_handler(State(app): State<AppInfo>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        name: app.name,
        version: app.version,
    })
}

/// `/health` route carrying its own state, ready to merge into any router.
pub fn health_router(app_info: AppInfo) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(app_info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn mongo(healthy: bool) -> DependencyStatus {
        DependencyStatus {
            name: "mongodb",
            healthy,
            latency_ms: Some(3),
            message: (!healthy).then(|| "server selection timeout".to_string()),
        }
    }

    #[tokio::test]
    async fn test_health_router_reports_app_info() {
        let app = health_router(AppInfo {
            name: "catalog-api",
            version: "1.2.3",
        });

        let response = app
            .oneshot(axum::http::Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["name"], "catalog-api");
        assert_eq!(body["version"], "1.2.3");
    }

    #[test]
    fn test_ready_response_all_healthy() {
        let ready = ReadyResponse::from_checks(vec![mongo(true)]);
        assert!(ready.is_ready());
        assert_eq!(ready.into_response().status(), StatusCode::OK);
    }

    #[test]
    fn test_ready_response_unhealthy_dependency() {
        let ready = ReadyResponse::from_checks(vec![mongo(false)]);
        assert_eq!(ready.status, "not ready");
        assert_eq!(ready.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}

use axum::{
    body::Body,
    http::{Response as HttpResponse, StatusCode},
    response::Response,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;

use repolens_protocol::{ErrorEnvelope, SummarizeRequest};

use crate::service::SummarizeService;

pub fn router(service: Arc<SummarizeService>) -> Router {
    Router::new()
        .route(
            "/summarize",
            post({
                let service = service.clone();
                move |body| summarize_handler(body, service.clone())
            }),
        )
        .route("/health", get(health_handler))
}

async fn summarize_handler(
    body: axum::body::Bytes,
    service: Arc<SummarizeService>,
) -> Result<Response, StatusCode> {
    let request: SummarizeRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => {
            let envelope = ErrorEnvelope::new("invalid_request", format!("Invalid JSON body: {err}"))
                .with_hint("Send {\"repository_url\": \"https://github.com/owner/repo\"}");
            return build_response(StatusCode::UNPROCESSABLE_ENTITY, &envelope);
        }
    };

    match service.summarize_url(&request.repository_url).await {
        Ok(summary) => build_response(StatusCode::OK, &summary),
        Err(err) => {
            let (status, code) = err.status_and_code();
            log::warn!("summarize request failed ({code}): {err}");
            let mut envelope = ErrorEnvelope::new(code, err.to_string());
            if let Some(hint) = err.hint() {
                envelope = envelope.with_hint(hint);
            }
            let status =
                StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            build_response(status, &envelope)
        }
    }
}

async fn health_handler() -> Result<Response, StatusCode> {
    #[derive(Serialize)]
    struct Health {
        status: &'static str,
        version: &'static str,
    }
    build_response(
        StatusCode::OK,
        &Health {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        },
    )
}

fn build_response<T: Serialize>(status: StatusCode, body: &T) -> Result<Response, StatusCode> {
    let bytes = serde_json::to_vec(body).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(HttpResponse::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Body::from(bytes))
        .expect("valid HTTP response"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_response_sets_status_and_content_type() {
        let envelope = ErrorEnvelope::new("repo_not_found", "no such repo");
        let response =
            build_response(StatusCode::NOT_FOUND, &envelope).expect("response builds");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response
                .headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
    }
}

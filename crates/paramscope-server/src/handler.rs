use crate::Result;
use crate::config::ServerConfig;
use http::header::{self, HeaderValue};
use http::{Method, Request, Response, StatusCode};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use paramscope_core::{ParameterAnalyzer, Report};
use serde::Serialize;
use std::sync::Arc;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Body of every non-200 JSON response
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

/// Routes requests to the parameter analyzer
///
/// - `GET /api?...` analyzes the raw query string
/// - `POST /api` analyzes the body: form-urlencoded bodies are parsed like a
///   query string, anything else as `key=value` lines
/// - `GET /healthz` answers `ok`
#[derive(Clone)]
pub struct ApiHandler {
    analyzer: ParameterAnalyzer,
    config: Arc<ServerConfig>,
}

impl ApiHandler {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            analyzer: ParameterAnalyzer::new(),
            config: Arc::new(config),
        }
    }

    pub async fn handle<B>(&self, req: Request<B>) -> Response<Full<Bytes>>
    where
        B: Body,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        tracing::debug!("Received request: {} {}", method, path);

        let response = if path == "/healthz" && method == Method::GET {
            text_response(StatusCode::OK, "ok")
        } else if is_api_path(&path) {
            match &method {
                &Method::GET => self.analyze_query(req.uri().query().unwrap_or("")),
                &Method::POST => self.analyze_body(req).await,
                _ => {
                    let mut res = self.error_response(
                        StatusCode::METHOD_NOT_ALLOWED,
                        "Method Not Allowed",
                        format!("{} is not supported on {}", method, path),
                    );
                    res.headers_mut()
                        .insert(header::ALLOW, HeaderValue::from_static("GET, POST"));
                    res
                }
            }
        } else {
            self.error_response(
                StatusCode::NOT_FOUND,
                "Not Found",
                format!("No route for {}", path),
            )
        };

        tracing::info!("{} {} -> {}", method, path, response.status().as_u16());
        response
    }

    fn analyze_query(&self, query: &str) -> Response<Full<Bytes>> {
        let report = self.analyzer.analyze_query(query);
        self.report_response(&report)
    }

    async fn analyze_body<B>(&self, req: Request<B>) -> Response<Full<Bytes>>
    where
        B: Body,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with(FORM_CONTENT_TYPE));

        let limited = Limited::new(req.into_body(), self.config.max_body_bytes);
        let body = match limited.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
                return self.error_response(
                    StatusCode::PAYLOAD_TOO_LARGE,
                    "Payload Too Large",
                    format!("Body exceeds {} bytes", self.config.max_body_bytes),
                );
            }
            Err(e) => {
                tracing::warn!("Failed to read request body: {}", e);
                return self.error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "API Error",
                    e.to_string(),
                );
            }
        };

        match self.analyze_payload(&body, is_form) {
            Ok(report) => self.report_response(&report),
            Err(e) => {
                tracing::warn!("Parameter analysis failed: {}", e);
                self.error_response(StatusCode::INTERNAL_SERVER_ERROR, "API Error", e.to_string())
            }
        }
    }

    fn analyze_payload(&self, body: &[u8], is_form: bool) -> Result<Report> {
        let report = if is_form {
            self.analyzer.analyze_bytes(body)?
        } else {
            self.analyzer.analyze_lines(body)?
        };
        Ok(report)
    }

    fn report_response(&self, report: &Report) -> Response<Full<Bytes>> {
        match self.to_json(report) {
            Ok(body) => json_response(StatusCode::OK, body),
            Err(e) => {
                tracing::error!("Failed to serialize report: {}", e);
                self.error_response(StatusCode::INTERNAL_SERVER_ERROR, "API Error", e.to_string())
            }
        }
    }

    fn error_response(
        &self,
        status: StatusCode,
        error: &str,
        message: String,
    ) -> Response<Full<Bytes>> {
        let body = ErrorBody { error, message };
        match self.to_json(&body) {
            Ok(bytes) => json_response(status, bytes),
            Err(_) => text_response(status, error),
        }
    }

    fn to_json<T: Serialize>(&self, value: &T) -> serde_json::Result<Vec<u8>> {
        if self.config.pretty {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        }
    }
}

impl Default for ApiHandler {
    fn default() -> Self {
        Self::new(ServerConfig::default())
    }
}

fn is_api_path(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

fn json_response(status: StatusCode, body: Vec<u8>) -> Response<Full<Bytes>> {
    let mut res = Response::new(Full::new(Bytes::from(body)));
    *res.status_mut() = status;
    let headers = res.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    res
}

fn text_response(status: StatusCode, text: &str) -> Response<Full<Bytes>> {
    let mut res = Response::new(Full::new(Bytes::from(text.to_string())));
    *res.status_mut() = status;
    res.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    res
}

//! HTTP response handlers.
//!
//! Every response carries the CORS headers, including errors.

use crate::utils::mime::types::{JSON, PLAIN};
use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use std::{fs, io::Read, path::Path};
use tiny_http::{Header, Method, Request, Response, StatusCode};

/// Pre-built CORS headers.
#[derive(Debug, Clone)]
pub struct Cors {
    headers: Vec<Header>,
}

impl Cors {
    pub fn new(origin: &str) -> Result<Self> {
        Ok(Self {
            headers: vec![
                header("Access-Control-Allow-Origin", origin)?,
                header("Access-Control-Allow-Methods", "GET")?,
                header("Access-Control-Allow-Headers", "Content-Type")?,
            ],
        })
    }

    fn apply<R: Read>(&self, mut response: Response<R>) -> Response<R> {
        for h in &self.headers {
            response.add_header(h.clone());
        }
        response
    }
}

/// Respond with a serialized JSON body.
pub fn respond_json<T: Serialize>(
    request: Request,
    cors: &Cors,
    status: u16,
    value: &T,
) -> Result<()> {
    let body = serde_json::to_vec(value).context("Failed to serialize response")?;
    send_body(request, cors, status, JSON, body)
}

/// Respond with a static file.
pub fn respond_file(request: Request, cors: &Cors, path: &Path) -> Result<()> {
    let content_type = crate::utils::mime::from_path(path);

    if is_head_request(&request) {
        return send_head(request, cors, 200, content_type);
    }

    let body = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    send_body(request, cors, 200, content_type, body)
}

/// Answer a CORS preflight.
pub fn respond_preflight(request: Request, cors: &Cors) -> Result<()> {
    let response = cors.apply(Response::empty(StatusCode(204)));
    request.respond(response)?;
    Ok(())
}

pub fn respond_not_found(request: Request, cors: &Cors) -> Result<()> {
    if is_head_request(&request) {
        return send_head(request, cors, 404, PLAIN);
    }
    send_body(request, cors, 404, PLAIN, b"404 Not Found".to_vec())
}

pub fn respond_method_not_allowed(request: Request, cors: &Cors) -> Result<()> {
    send_body(request, cors, 405, PLAIN, b"405 Method Not Allowed".to_vec())
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request, cors: &Cors) -> Result<()> {
    send_body(request, cors, 503, PLAIN, b"503 Service Unavailable".to_vec())
}

fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

fn send_head(request: Request, cors: &Cors, status: u16, content_type: &str) -> Result<()> {
    let response =
        Response::empty(StatusCode(status)).with_header(header("Content-Type", content_type)?);
    request.respond(cors.apply(response))?;
    Ok(())
}

fn send_body(
    request: Request,
    cors: &Cors,
    status: u16,
    content_type: &str,
    body: Vec<u8>,
) -> Result<()> {
    let response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(header("Content-Type", content_type)?);
    request.respond(cors.apply(response))?;
    Ok(())
}

fn header(key: &str, value: &str) -> Result<Header> {
    Header::from_bytes(key.as_bytes(), value.as_bytes())
        .map_err(|()| anyhow!("invalid header value for {key}: `{value}`"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_headers() {
        let cors = Cors::new("http://localhost:3000").unwrap();
        let fields: Vec<_> = cors
            .headers
            .iter()
            .map(|h| h.field.as_str().as_str().to_string())
            .collect();
        assert_eq!(
            fields,
            [
                "Access-Control-Allow-Origin",
                "Access-Control-Allow-Methods",
                "Access-Control-Allow-Headers"
            ]
        );
        assert_eq!(cors.headers[0].value.as_str(), "http://localhost:3000");
    }

    #[test]
    fn test_cors_rejects_invalid_origin() {
        assert!(Cors::new("http://bäd.example").is_err());
    }
}

//! `reqwest` client for `GET /api/site/{id}` and `PUT /api/site`.

use serde::Deserialize;
use uic_inventory_site_models::{EsriPolygon, Site, SiteLocationInput};

use crate::{SiteApiConfig, SiteError};

/// HTTP client for the site API.
pub struct SiteClient {
    config: SiteApiConfig,
    client: reqwest::Client,
}

/// Problem-details body returned by the API on failure.
#[derive(Deserialize)]
struct ProblemDetails {
    title: Option<String>,
    detail: Option<String>,
    message: Option<String>,
}

impl SiteClient {
    /// Creates a client for the configured API.
    #[must_use]
    pub fn new(config: SiteApiConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Creates a client configured from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(SiteApiConfig::from_env())
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &SiteApiConfig {
        &self.config
    }

    fn site_url(&self, site_id: i64) -> String {
        format!("{}/api/site/{site_id}", self.config.base_url)
    }

    fn update_url(&self) -> String {
        format!("{}/api/site", self.config.base_url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Fetches a site by id.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError`] if the request fails, the API returns a
    /// non-success status, or the body is not a site.
    pub async fn get_site(&self, site_id: i64) -> Result<Site, SiteError> {
        log::debug!("Fetching site {site_id}");

        let resp = self
            .authorize(self.client.get(self.site_url(site_id)))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Persists a site's address and boundary.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError`] if the request fails or the API rejects the
    /// update. The caller keeps its input and may retry.
    pub async fn update_location(&self, input: &SiteLocationInput) -> Result<(), SiteError> {
        log::info!("Updating location for site {}", input.site_id);

        let resp = self
            .authorize(self.client.put(self.update_url()))
            .json(input)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }

        let body = resp.text().await.unwrap_or_default();
        let err = status_error(status, &body);
        log::warn!("Site {} location update rejected: {err}", input.site_id);
        Err(err)
    }
}

/// Parses a site's stored boundary text.
///
/// Returns `Ok(None)` when the site has no boundary.
///
/// # Errors
///
/// Returns [`SiteError::Geometry`] if the stored text is not an Esri
/// polygon.
pub fn parse_site_geometry(site: &Site) -> Result<Option<EsriPolygon>, SiteError> {
    let Some(text) = site.geometry.as_deref().filter(|g| !g.trim().is_empty()) else {
        return Ok(None);
    };

    serde_json::from_str(text)
        .map(Some)
        .map_err(|e| SiteError::Geometry {
            message: format!("site {}: {e}", site.id),
        })
}

/// Builds a [`SiteError::Status`] from a failed response body.
fn status_error(status: reqwest::StatusCode, body: &str) -> SiteError {
    let message = serde_json::from_str::<ProblemDetails>(body)
        .ok()
        .and_then(|p| p.detail.or(p.message).or(p.title))
        .unwrap_or_else(|| {
            if body.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            } else {
                body.to_string()
            }
        });

    SiteError::Status {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(geometry: Option<&str>) -> Site {
        Site {
            id: 7,
            name: None,
            address: None,
            geometry: geometry.map(String::from),
            naics_primary: None,
            naics_title: None,
            status: None,
        }
    }

    #[test]
    fn builds_urls_from_base() {
        let client = SiteClient::new(SiteApiConfig::new("https://uic.example.gov/"));
        assert_eq!(client.site_url(42), "https://uic.example.gov/api/site/42");
        assert_eq!(client.update_url(), "https://uic.example.gov/api/site");
    }

    #[test]
    fn status_error_prefers_problem_detail() {
        let err = status_error(
            reqwest::StatusCode::BAD_REQUEST,
            r#"{"title":"Bad Request","detail":"Geometry is required"}"#,
        );
        match err {
            SiteError::Status { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Geometry is required");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn status_error_falls_back_to_body_or_reason() {
        let err = status_error(reqwest::StatusCode::BAD_GATEWAY, "upstream down");
        assert!(matches!(err, SiteError::Status { ref message, .. } if message == "upstream down"));

        let err = status_error(reqwest::StatusCode::NOT_FOUND, "");
        assert!(matches!(err, SiteError::Status { ref message, .. } if message == "Not Found"));
    }

    #[test]
    fn parses_stored_geometry() {
        let stored = site(Some(
            r#"{"rings":[[[0,0],[0,10],[10,10],[10,0],[0,0]]],"spatialReference":{"wkid":3857}}"#,
        ));
        let polygon = parse_site_geometry(&stored).unwrap().unwrap();
        assert_eq!(polygon.rings[0].len(), 5);

        assert!(parse_site_geometry(&site(None)).unwrap().is_none());
        assert!(parse_site_geometry(&site(Some("  "))).unwrap().is_none());
    }

    /// Answers one request with `response` and returns the raw request.
    async fn serve_once(response: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        use tokio::io::{AsyncReadExt as _, AsyncWriteExt as _};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0_u8; 4096];

            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);

                let text = String::from_utf8_lossy(&request);
                if let Some(end) = text.find("\r\n\r\n") {
                    let length = text[..end]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            if name.eq_ignore_ascii_case("content-length") {
                                value.trim().parse::<usize>().ok()
                            } else {
                                None
                            }
                        })
                        .unwrap_or(0);
                    if request.len() >= end + 4 + length {
                        break;
                    }
                }
            }

            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });

        (base_url, handle)
    }

    #[tokio::test]
    async fn get_site_sends_token_and_parses_body() {
        let (base_url, server) = serve_once(
            "HTTP/1.1 200 OK\r\n\
             Content-Type: application/json\r\n\
             Content-Length: 33\r\n\
             Connection: close\r\n\r\n\
             {\"id\":42,\"address\":\"123 Main St\"}",
        )
        .await;
        let client = SiteClient::new(SiteApiConfig::new(base_url).with_token("secret"));

        let site = client.get_site(42).await.unwrap();
        assert_eq!(site.id, 42);
        assert_eq!(site.address.as_deref(), Some("123 Main St"));

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/site/42 "));
        assert!(request.to_ascii_lowercase().contains("authorization: bearer secret"));
    }

    #[tokio::test]
    async fn rejected_update_reports_status() {
        let (base_url, server) = serve_once(
            "HTTP/1.1 400 Bad Request\r\n\
             Content-Length: 19\r\n\
             Connection: close\r\n\r\n\
             Address is required",
        )
        .await;
        let client = SiteClient::new(SiteApiConfig::new(base_url));
        let input = SiteLocationInput {
            id: 1,
            site_id: 42,
            address: String::new(),
            geometry: "{}".to_string(),
        };

        let err = client.update_location(&input).await.unwrap_err();
        assert!(matches!(
            err,
            SiteError::Status { status: 400, ref message } if message == "Address is required"
        ));

        let request = server.await.unwrap();
        assert!(request.starts_with("PUT /api/site "));
        assert!(request.contains("\"siteId\":42"));
    }

    #[test]
    fn malformed_geometry_is_an_error() {
        let err = parse_site_geometry(&site(Some("{\"rings\": 5}"))).unwrap_err();
        assert!(matches!(err, SiteError::Geometry { .. }));
        assert!(err.to_string().contains("site 7"));
    }
}

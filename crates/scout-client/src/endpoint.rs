//! Backend addresses derived from one configured base URL.

use url::Url;

use crate::error::{ClientError, Result};

/// Path of the streaming endpoint.
pub const STREAM_PATH: &str = "/ws";
/// Query parameter carrying the search text.
pub const QUERY_PARAM: &str = "q";
/// Path of the one-shot search endpoint.
pub const SEARCH_PATH: &str = "/api/search";
/// Path of the health probe.
pub const HEALTH_PATH: &str = "/health";

/// The backend host, addressed over HTTP(S) or WS(S).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base: Url,
}

impl Endpoint {
    /// Parse a base URL such as `http://127.0.0.1:8000`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL does not parse or uses a scheme other than
    /// `http`, `https`, `ws` or `wss`.
    pub fn parse(base: &str) -> Result<Self> {
        let base = Url::parse(base.trim())?;
        match base.scheme() {
            "http" | "https" | "ws" | "wss" => {}
            other => {
                return Err(ClientError::endpoint(
                    base.as_str(),
                    format!("unsupported scheme {other}"),
                ));
            }
        }
        if base.host_str().is_none() {
            return Err(ClientError::endpoint(base.as_str(), "missing host"));
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn is_secure(&self) -> bool {
        matches!(self.base.scheme(), "https" | "wss")
    }

    fn with_scheme(&self, scheme: &str, path: &str) -> Result<Url> {
        let mut url = self.base.clone();
        url.set_scheme(scheme)
            .map_err(|()| ClientError::endpoint(self.base.as_str(), "cannot switch scheme"))?;
        url.set_path(path);
        url.set_query(None);
        url.set_fragment(None);
        Ok(url)
    }

    /// Streaming URL carrying the URL-encoded query in `q`.
    pub fn stream_url(&self, query: &str) -> Result<Url> {
        let scheme = if self.is_secure() { "wss" } else { "ws" };
        let mut url = self.with_scheme(scheme, STREAM_PATH)?;
        url.query_pairs_mut().append_pair(QUERY_PARAM, query);
        Ok(url)
    }

    pub fn search_url(&self) -> Result<Url> {
        self.http_url(SEARCH_PATH)
    }

    pub fn health_url(&self) -> Result<Url> {
        self.http_url(HEALTH_PATH)
    }

    fn http_url(&self, path: &str) -> Result<Url> {
        let scheme = if self.is_secure() { "https" } else { "http" };
        self.with_scheme(scheme, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_url_switches_scheme_and_encodes_query() {
        let endpoint = Endpoint::parse("http://127.0.0.1:8000/ui/").unwrap();
        let url = endpoint.stream_url("market gaps & more").unwrap();
        assert_eq!(url.scheme(), "ws");
        assert_eq!(url.path(), "/ws");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            [("q".to_string(), "market gaps & more".to_string())]
        );
    }

    #[test]
    fn secure_base_maps_to_wss_and_https() {
        let endpoint = Endpoint::parse("https://scout.example.com").unwrap();
        assert_eq!(endpoint.stream_url("x").unwrap().scheme(), "wss");
        assert_eq!(
            endpoint.search_url().unwrap().as_str(),
            "https://scout.example.com/api/search"
        );
    }

    #[test]
    fn websocket_base_maps_back_to_http() {
        let endpoint = Endpoint::parse("ws://localhost:9000/ws?q=old").unwrap();
        assert_eq!(
            endpoint.health_url().unwrap().as_str(),
            "http://localhost:9000/health"
        );
    }

    #[test]
    fn rejects_unsupported_schemes() {
        assert!(matches!(
            Endpoint::parse("ftp://example.com"),
            Err(ClientError::InvalidEndpoint { .. })
        ));
        assert!(matches!(
            Endpoint::parse("not a url"),
            Err(ClientError::Url(_))
        ));
    }
}

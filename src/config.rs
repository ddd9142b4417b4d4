use dotenvy::dotenv;
use tracing::info;

/// Default marketplace backend origin
const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

/// Default upstream request timeout in seconds
const DEFAULT_REQUEST_TIMEOUT_S: u64 = 30;

/// Default number of deposit records per page
const DEFAULT_PAGE_LIMIT: u64 = 10;

/// Default console listen port
const DEFAULT_LISTEN_PORT: u16 = 3000;

/// Admin credentials forwarded to the marketplace backend.
///
/// Injected at construction rather than read from ambient globals; the
/// console itself does no authentication.
#[derive(Clone, Debug, Default)]
pub(crate) struct AuthSession {
    bearer_token: Option<String>,
}

impl AuthSession {
    pub(crate) fn new(bearer_token: Option<String>) -> Self {
        Self { bearer_token }
    }

    /// Attach the admin bearer token to an outgoing request, if configured
    pub(crate) fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// Review console configuration
#[derive(Clone, Debug)]
pub(crate) struct ConsoleConfig {
    /// Marketplace backend origin, also the base for normalized upload URLs
    backend_url: String,

    /// Admin session forwarded upstream
    auth_session: AuthSession,

    /// Upstream request timeout in seconds
    request_timeout_s: u64,

    /// Deposit records per listing page
    page_limit: u64,

    /// Port the console API listens on
    listen_port: u16,
}

impl ConsoleConfig {
    pub(crate) fn new() -> Self {
        dotenv().ok(); // Load `.env` file if present

        let backend_url = std::env::var("BACKEND_URL")
            .ok()
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());

        let bearer_token = std::env::var("BACKEND_API_TOKEN")
            .ok()
            .filter(|token| !token.is_empty());

        let request_timeout_s: u64 = std::env::var("BACKEND_REQUEST_TIMEOUT_S")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_S);

        let page_limit: u64 = std::env::var("DEPOSITS_PAGE_LIMIT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|limit| *limit > 0)
            .unwrap_or(DEFAULT_PAGE_LIMIT);

        let listen_port: u16 = std::env::var("LISTEN_PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(DEFAULT_LISTEN_PORT);

        info!(%backend_url, page_limit, "Loaded review console config:");

        ConsoleConfig {
            backend_url,
            auth_session: AuthSession::new(bearer_token),
            request_timeout_s,
            page_limit,
            listen_port,
        }
    }

    /// Getter for `backend_url`
    pub(crate) fn backend_url(&self) -> &str {
        &self.backend_url
    }

    /// Getter for `auth_session`
    pub(crate) fn auth_session(&self) -> &AuthSession {
        &self.auth_session
    }

    /// Getter for `request_timeout_s`
    pub(crate) fn request_timeout_s(&self) -> u64 {
        self.request_timeout_s
    }

    /// Getter for `page_limit`
    pub(crate) fn page_limit(&self) -> u64 {
        self.page_limit
    }

    /// Getter for `listen_port`
    pub(crate) fn listen_port(&self) -> u16 {
        self.listen_port
    }
}

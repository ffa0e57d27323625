use std::sync::Arc;

use parking_lot::RwLock;
use reqwest::blocking::multipart::Form;
use reqwest::blocking::Client as HttpClient;
use reqwest::header::USER_AGENT;
pub use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::config::ApiConfig;

pub const CSRF_PATH: &str = "csrf/";
pub const REFRESH_PATH: &str = "token/refresh/";

#[derive(Debug, Clone, thiserror::Error)]
pub enum HttpError {
    #[error("http: transport failure: {0}")]
    Transport(String),
    #[error("http: status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("http: decode response: {0}")]
    Decode(String),
    #[error("http: no csrf credential cached")]
    MissingCsrf,
    #[error("http: invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("http: request cancelled")]
    Cancelled,
}

impl HttpError {
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Validation and conflict failures carry a structured payload; this pulls the
    /// human readable part out of it for field-level display.
    pub fn field_message(&self) -> Option<String> {
        let HttpError::Status { status, body } = self else {
            return None;
        };
        if !(400..500).contains(status) || *status == 401 {
            return None;
        }
        let payload: Value = serde_json::from_str(body).ok()?;
        ["error", "detail"]
            .iter()
            .filter_map(|key| payload.get(*key))
            .find_map(|value| match value {
                Value::String(text) => Some(text.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Text fields sent as `multipart/form-data` instead of a JSON body.
    pub form: Option<Vec<(String, String)>>,
    /// Set once the request has been re-issued after a token refresh.
    pub retried: bool,
}

impl Request {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: None,
            form: None,
            retried: false,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(key, _)| !key.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn json_body(status: u16, value: Value) -> Self {
        let mut response = Self::new(status, value.to_string());
        response
            .headers
            .push(("content-type".into(), "application/json".into()));
        response
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, HttpError> {
        serde_json::from_slice(&self.body).map_err(|err| HttpError::Decode(err.to_string()))
    }

    /// Value of a cookie set by this response, if any.
    pub fn cookie(&self, name: &str) -> Option<String> {
        self.headers
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case("set-cookie"))
            .filter_map(|(_, value)| value.split(';').next())
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, value)| key.trim() == name && !value.trim().is_empty())
            .map(|(_, value)| value.trim().to_string())
    }
}

pub trait Transport: Send + Sync {
    /// Performs one exchange. Any HTTP status is a successful exchange; only a
    /// missing response is an error.
    fn execute(&self, request: &Request) -> Result<Response, HttpError>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn execute(&self, request: &Request) -> Result<Response, HttpError> {
        (**self).execute(request)
    }
}

pub struct ReqwestTransport {
    http: HttpClient,
    user_agent: String,
}

impl ReqwestTransport {
    pub fn new(cfg: &ApiConfig) -> Result<Self, HttpError> {
        let http = HttpClient::builder()
            .timeout(cfg.timeout)
            .cookie_store(true)
            .build()
            .map_err(|err| HttpError::Transport(err.to_string()))?;
        Ok(Self {
            http,
            user_agent: cfg.user_agent.clone(),
        })
    }
}

impl Transport for ReqwestTransport {
    fn execute(&self, request: &Request) -> Result<Response, HttpError> {
        let mut req = self
            .http
            .request(request.method.clone(), request.url.clone())
            .header(USER_AGENT, self.user_agent.clone());
        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }
        if let Some(fields) = &request.form {
            let form = fields
                .iter()
                .fold(Form::new(), |form, (name, value)| form.text(name.clone(), value.clone()));
            req = req.multipart(form);
        } else if let Some(body) = &request.body {
            req = req.json(body);
        }

        let resp = req
            .send()
            .map_err(|err| HttpError::Transport(err.to_string()))?;
        let status = resp.status().as_u16();
        let headers = resp
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = resp
            .bytes()
            .map_err(|err| HttpError::Transport(err.to_string()))?
            .to_vec();
        Ok(Response {
            status,
            headers,
            body,
        })
    }
}

/// Cached anti-forgery credential shared by the client and the refresh step.
#[derive(Debug)]
pub struct CsrfStore {
    header: String,
    cookie: String,
    token: RwLock<Option<String>>,
}

impl CsrfStore {
    pub fn new(header: impl Into<String>, cookie: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            cookie: cookie.into(),
            token: RwLock::new(None),
        }
    }

    pub fn is_present(&self) -> bool {
        self.token.read().is_some()
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().clone()
    }

    /// Picks up a rotated credential from any response that sets the cookie.
    pub fn absorb(&self, response: &Response) {
        if let Some(token) = response.cookie(&self.cookie) {
            self.set(token);
        }
    }

    pub fn set(&self, token: String) {
        *self.token.write() = Some(token);
    }

    pub fn clear(&self) {
        *self.token.write() = None;
    }

    fn stamp(&self, request: &mut Request) -> Result<(), HttpError> {
        let token = self.token.read().clone().ok_or(HttpError::MissingCsrf)?;
        request.set_header(&self.header, token);
        Ok(())
    }
}

/// Answers a 401 by refreshing the access cookie and re-issuing the request
/// exactly once. The refresh endpoint itself and already-retried requests pass
/// through untouched.
pub struct RefreshOnUnauthorized<T> {
    inner: T,
    refresh_url: Url,
    csrf: Arc<CsrfStore>,
}

impl<T: Transport> RefreshOnUnauthorized<T> {
    pub fn new(inner: T, refresh_url: Url, csrf: Arc<CsrfStore>) -> Self {
        Self {
            inner,
            refresh_url,
            csrf,
        }
    }

    fn refresh(&self) -> bool {
        let mut request = Request::new(Method::POST, self.refresh_url.clone());
        if self.csrf.stamp(&mut request).is_err() {
            tracing::debug!("refreshing without a cached csrf credential");
        }
        match self.inner.execute(&request) {
            Ok(response) if response.is_success() => {
                self.csrf.absorb(&response);
                true
            }
            Ok(response) => {
                tracing::warn!(status = response.status, "token refresh rejected");
                false
            }
            Err(err) => {
                tracing::warn!(error = %err, "token refresh failed");
                false
            }
        }
    }
}

impl<T: Transport> Transport for RefreshOnUnauthorized<T> {
    fn execute(&self, request: &Request) -> Result<Response, HttpError> {
        let response = self.inner.execute(request)?;
        if response.status != 401 || request.retried || request.url == self.refresh_url {
            return Ok(response);
        }

        tracing::debug!(url = %request.url, "unauthorized, attempting token refresh");
        if !self.refresh() {
            return Ok(response);
        }

        let mut retry = request.clone();
        retry.retried = true;
        if retry.header(&self.csrf.header).is_some() {
            self.csrf.stamp(&mut retry)?;
        }
        self.inner.execute(&retry)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub query: Vec<(String, String)>,
    /// When set, the request goes out as a multipart form and `body` is ignored.
    pub form: Option<Vec<(String, String)>>,
}

pub struct Client {
    transport: RefreshOnUnauthorized<Arc<dyn Transport>>,
    base_url: Url,
    csrf: Arc<CsrfStore>,
}

impl Client {
    pub fn new(cfg: &ApiConfig) -> Result<Self, HttpError> {
        let transport: Arc<dyn Transport> = Arc::new(ReqwestTransport::new(cfg)?);
        Self::with_transport(cfg, transport)
    }

    /// Builds a client over any transport; the refresh step is always installed.
    pub fn with_transport(cfg: &ApiConfig, transport: Arc<dyn Transport>) -> Result<Self, HttpError> {
        let mut base = cfg.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;
        let refresh_url = base_url.join(REFRESH_PATH)?;
        let csrf = Arc::new(CsrfStore::new(
            cfg.csrf_header.clone(),
            cfg.csrf_cookie.clone(),
        ));

        Ok(Self {
            transport: RefreshOnUnauthorized::new(transport, refresh_url, csrf.clone()),
            base_url,
            csrf,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn csrf(&self) -> &CsrfStore {
        &self.csrf
    }

    /// Accepts either a path relative to the API root or an absolute URL such as
    /// a `next` cursor handed out by the backend.
    pub fn resolve(&self, path: &str) -> Result<Url, HttpError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    pub fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        options: RequestOptions,
    ) -> Result<Response, HttpError> {
        let mut url = self.resolve(path)?;
        if !options.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &options.query {
                pairs.append_pair(key, value);
            }
        }

        let mut request = Request::new(method, url);
        request.body = body;
        request.form = options.form;
        if request.method != Method::GET {
            self.csrf.stamp(&mut request)?;
        }

        let response = self.transport.execute(&request)?;
        self.csrf.absorb(&response);
        if response.is_success() {
            Ok(response)
        } else {
            Err(HttpError::Status {
                status: response.status,
                body: response.text(),
            })
        }
    }

    pub fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, HttpError> {
        self.send(Method::GET, path, None, RequestOptions::default())?
            .json()
    }

    pub fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, HttpError> {
        self.send(method, path, body, RequestOptions::default())?
            .json()
    }

    /// Fetches a credential from the backend unless one is already cached.
    pub fn ensure_csrf(&self) -> Result<(), HttpError> {
        if self.csrf.is_present() {
            return Ok(());
        }
        let response = self.send(Method::GET, CSRF_PATH, None, RequestOptions::default())?;
        if self.csrf.is_present() {
            return Ok(());
        }
        let token = response
            .json::<Value>()
            .ok()
            .and_then(|payload| {
                payload
                    .get("csrfToken")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .ok_or(HttpError::MissingCsrf)?;
        self.csrf.set(token);
        Ok(())
    }
}

use crate::config::AppConfig;
use crate::models::{
    AdminDashboardStats, AdminUsersResponse, DashboardResponse, ImageUpload, LoginRequest,
    Message, RawUser, RegisterRequest, UpdatePasswordRequest, UpdateProfileRequest,
    UserEnvelope, UserListFilter,
};
use async_trait::async_trait;
use reqwest::{Response, StatusCode, multipart};
use reqwest_cookie_store::{CookieStore, CookieStoreMutex};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

/// ApiError
///
/// The failure taxonomy for every backend call. Errors are rendered as
/// inline feedback at the call site nearest the user action; nothing here is
/// fatal to the process and nothing propagates to a global handler.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 401: invalid credentials or an expired/absent session.
    #[error("not authenticated")]
    Unauthorized,
    /// Any other non-2xx response, carrying the backend's `{ message }`
    /// body when one was supplied.
    #[error("{message}")]
    Rejected { status: u16, message: String },
    /// Transport-level failure (connection refused, DNS, timeout).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    /// A 2xx response whose body did not match the expected schema.
    #[error("malformed response from backend: {0}")]
    Decode(String),
}

// 1. ApiService Contract
/// ApiService
///
/// Defines the abstract contract for every backend REST operation the
/// application consumes. This is the only doorway to the network: handlers
/// and the Session Store interact with the backend through this trait
/// without knowing the concrete transport, which lets tests substitute the
/// scripted MockApiService.
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn ApiService>`) safely shareable across task boundaries.
#[async_trait]
pub trait ApiService: Send + Sync {
    // --- Auth & Profile ---
    /// POST /auth/register (multipart). 201 with the created account.
    async fn register(&self, req: RegisterRequest) -> Result<RawUser, ApiError>;
    /// POST /auth/login. The backend sets the session cookie on success.
    async fn login(&self, req: LoginRequest) -> Result<RawUser, ApiError>;
    /// GET /auth/profile. The bootstrap re-validation call; 401 when the
    /// session cookie is missing or expired.
    async fn fetch_profile(&self) -> Result<RawUser, ApiError>;
    /// POST /auth/logout. Invalidates the server-side session.
    async fn logout(&self) -> Result<(), ApiError>;
    /// PUT /auth/update-profile. Partial update; returns the confirmed copy.
    async fn update_profile(&self, req: UpdateProfileRequest) -> Result<RawUser, ApiError>;
    /// PUT /auth/update-password.
    async fn update_password(&self, req: UpdatePasswordRequest) -> Result<(), ApiError>;
    /// PUT /auth/update-profile-image (multipart). Returns the confirmed copy.
    async fn update_profile_image(&self, upload: ImageUpload) -> Result<RawUser, ApiError>;

    // --- Admin ---
    /// GET /admin/users with pagination and an optional role filter.
    async fn list_users(&self, filter: UserListFilter) -> Result<AdminUsersResponse, ApiError>;
    /// DELETE /admin/users/:id. Soft delete, enforced server-side.
    async fn delete_user(&self, id: &str) -> Result<(), ApiError>;
    /// GET /admin/dashboard.
    async fn dashboard_stats(&self) -> Result<AdminDashboardStats, ApiError>;
}

/// ApiState
///
/// The concrete type used to share the API client across the application state.
pub type ApiState = Arc<dyn ApiService>;

// --- Response Helpers ---

/// check
///
/// Maps the HTTP status line onto the error taxonomy before any body
/// decoding happens. 401 is its own variant because the Session Store treats
/// it differently from other rejections; every other non-2xx becomes
/// `Rejected`, preferring the backend's own `{ message }` text.
async fn check(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized);
    }
    if !status.is_success() {
        let message = resp
            .json::<Message>()
            .await
            .map(|m| m.message)
            .unwrap_or_default();
        let message = if message.is_empty() {
            format!("request rejected with status {}", status.as_u16())
        } else {
            message
        };
        return Err(ApiError::Rejected {
            status: status.as_u16(),
            message,
        });
    }
    Ok(resp)
}

/// decode_user
///
/// Unwraps the `{ user }` envelope shared by all account-returning endpoints.
async fn decode_user(resp: Response) -> Result<RawUser, ApiError> {
    let envelope = check(resp)
        .await?
        .json::<UserEnvelope>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))?;
    Ok(envelope.user)
}

// 2. The Real Implementation (HTTP)
/// HttpApiClient
///
/// The concrete `ApiService` backed by reqwest. Credentials travel as
/// cookies held by an attached cookie store: no token is ever manually
/// placed on a request. The store is flushed to disk after each call so a
/// later process run still carries the session, the way the browser's own
/// cookie jar did.
pub struct HttpApiClient {
    http: reqwest::Client,
    base_url: String,
    cookies: Arc<CookieStoreMutex>,
    /// Where the cookie store is flushed; `None` disables persistence
    /// (used by tests that want a throwaway jar).
    cookie_path: Option<PathBuf>,
}

impl HttpApiClient {
    /// new
    ///
    /// Constructs the client from the loaded configuration, rehydrating the
    /// cookie store from disk when a previous run left one behind.
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let cookie_path = config.cookie_path();
        let store = match std::fs::File::open(&cookie_path).map(std::io::BufReader::new) {
            Ok(reader) => CookieStore::load_json(reader).unwrap_or_else(|e| {
                tracing::warn!("discarding unreadable cookie store: {}", e);
                CookieStore::default()
            }),
            Err(_) => CookieStore::default(),
        };

        Self::with_store(config.backend_url.clone(), store, Some(cookie_path))
    }

    /// Constructs a client over an explicit base URL with a fresh,
    /// non-persistent cookie jar. Intended for tests driving a stub backend.
    pub fn ephemeral(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_store(base_url.into(), CookieStore::default(), None)
    }

    fn with_store(
        base_url: String,
        store: CookieStore,
        cookie_path: Option<PathBuf>,
    ) -> Result<Self, ApiError> {
        let cookies = Arc::new(CookieStoreMutex::new(store));
        let http = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&cookies))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            cookies,
            cookie_path,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// persist_cookies
    ///
    /// Best-effort flush of the cookie store after every request; the
    /// session must survive a process restart, but a failed flush only
    /// degrades to a logged-out next run, so it is never an error.
    fn persist_cookies(&self) {
        let Some(path) = &self.cookie_path else {
            return;
        };

        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!("failed to create cookie store directory: {}", e);
                return;
            }
        }

        match std::fs::File::create(path).map(std::io::BufWriter::new) {
            Ok(mut writer) => {
                let store = self.cookies.lock().unwrap();
                if let Err(e) = store.save_json(&mut writer) {
                    tracing::warn!("failed to persist cookie store: {}", e);
                }
            }
            Err(e) => tracing::warn!("failed to open cookie store for writing: {}", e),
        }
    }

    fn register_form(req: RegisterRequest) -> multipart::Form {
        let mut form = multipart::Form::new()
            .text("firstName", req.first_name)
            .text("lastName", req.last_name)
            .text("username", req.username)
            .text("email", req.email)
            .text("password", req.password)
            .text("role", req.role);

        if let Some(upload) = req.profile_image {
            form = form.part(
                "profileImage",
                multipart::Part::bytes(upload.bytes).file_name(upload.file_name),
            );
        }

        form
    }
}

#[async_trait]
impl ApiService for HttpApiClient {
    async fn register(&self, req: RegisterRequest) -> Result<RawUser, ApiError> {
        let resp = self
            .http
            .post(self.url("/auth/register"))
            .multipart(Self::register_form(req))
            .send()
            .await?;
        self.persist_cookies();
        decode_user(resp).await
    }

    async fn login(&self, req: LoginRequest) -> Result<RawUser, ApiError> {
        let resp = self
            .http
            .post(self.url("/auth/login"))
            .json(&req)
            .send()
            .await?;
        self.persist_cookies();
        decode_user(resp).await
    }

    async fn fetch_profile(&self) -> Result<RawUser, ApiError> {
        let resp = self.http.get(self.url("/auth/profile")).send().await?;
        // The backend may rotate the session cookie on re-validation.
        self.persist_cookies();
        decode_user(resp).await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let resp = self.http.post(self.url("/auth/logout")).send().await?;
        self.persist_cookies();
        check(resp).await?;
        Ok(())
    }

    async fn update_profile(&self, req: UpdateProfileRequest) -> Result<RawUser, ApiError> {
        let resp = self
            .http
            .put(self.url("/auth/update-profile"))
            .json(&req)
            .send()
            .await?;
        decode_user(resp).await
    }

    async fn update_password(&self, req: UpdatePasswordRequest) -> Result<(), ApiError> {
        let resp = self
            .http
            .put(self.url("/auth/update-password"))
            .json(&req)
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    async fn update_profile_image(&self, upload: ImageUpload) -> Result<RawUser, ApiError> {
        let form = multipart::Form::new().part(
            "image",
            multipart::Part::bytes(upload.bytes).file_name(upload.file_name),
        );

        let resp = self
            .http
            .put(self.url("/auth/update-profile-image"))
            .multipart(form)
            .send()
            .await?;
        decode_user(resp).await
    }

    async fn list_users(&self, filter: UserListFilter) -> Result<AdminUsersResponse, ApiError> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(page) = filter.page {
            params.push(("page", page.to_string()));
        }
        if let Some(limit) = filter.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(role) = filter.role {
            params.push(("role", role));
        }

        let resp = self
            .http
            .get(self.url("/admin/users"))
            .query(&params)
            .send()
            .await?;
        check(resp)
            .await?
            .json::<AdminUsersResponse>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn delete_user(&self, id: &str) -> Result<(), ApiError> {
        let resp = self
            .http
            .delete(self.url(&format!("/admin/users/{}", id)))
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    async fn dashboard_stats(&self) -> Result<AdminDashboardStats, ApiError> {
        let resp = self.http.get(self.url("/admin/dashboard")).send().await?;
        let body = check(resp)
            .await?
            .json::<DashboardResponse>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(body.stats)
    }
}

// 3. The Mock Implementation (For Unit Tests)
/// MockApiService
///
/// A scripted implementation of `ApiService` used exclusively for testing
/// the Session Store and the handlers without a network. The profile slot
/// plays the server-side session: `Some` behaves like a valid cookie,
/// `None` like a missing or expired one. The fetch counter and the optional
/// artificial delay exist for the single-flight and supersession tests.
#[derive(Default)]
pub struct MockApiService {
    profile: Mutex<Option<RawUser>>,
    profile_fetches: AtomicUsize,
    fetch_delay: Option<Duration>,
}

impl MockApiService {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock whose session is already established.
    pub fn with_profile(raw: RawUser) -> Self {
        Self {
            profile: Mutex::new(Some(raw)),
            ..Self::default()
        }
    }

    /// Stretches every profile fetch, letting tests overlap calls reliably.
    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = Some(delay);
        self
    }

    pub fn set_profile(&self, profile: Option<RawUser>) {
        *self.profile.lock().unwrap() = profile;
    }

    /// Number of profile fetches issued so far.
    pub fn profile_fetches(&self) -> usize {
        self.profile_fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ApiService for MockApiService {
    async fn register(&self, req: RegisterRequest) -> Result<RawUser, ApiError> {
        let raw = RawUser {
            id: Some(uuid::Uuid::new_v4().to_string()),
            username: req.username,
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            role: Some(req.role),
            profile_image: req.profile_image.map(|u| u.file_name),
            is_active: true,
            ..RawUser::default()
        };
        *self.profile.lock().unwrap() = Some(raw.clone());
        Ok(raw)
    }

    async fn login(&self, _req: LoginRequest) -> Result<RawUser, ApiError> {
        self.profile
            .lock()
            .unwrap()
            .clone()
            .ok_or(ApiError::Unauthorized)
    }

    async fn fetch_profile(&self) -> Result<RawUser, ApiError> {
        self.profile_fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.fetch_delay {
            tokio::time::sleep(delay).await;
        }
        self.profile
            .lock()
            .unwrap()
            .clone()
            .ok_or(ApiError::Unauthorized)
    }

    async fn logout(&self) -> Result<(), ApiError> {
        *self.profile.lock().unwrap() = None;
        Ok(())
    }

    async fn update_profile(&self, req: UpdateProfileRequest) -> Result<RawUser, ApiError> {
        let mut slot = self.profile.lock().unwrap();
        let profile = slot.as_mut().ok_or(ApiError::Unauthorized)?;
        if let Some(v) = req.first_name {
            profile.first_name = v;
        }
        if let Some(v) = req.last_name {
            profile.last_name = v;
        }
        if let Some(v) = req.username {
            profile.username = v;
        }
        if let Some(v) = req.email {
            profile.email = v;
        }
        Ok(profile.clone())
    }

    async fn update_password(&self, _req: UpdatePasswordRequest) -> Result<(), ApiError> {
        if self.profile.lock().unwrap().is_some() {
            Ok(())
        } else {
            Err(ApiError::Unauthorized)
        }
    }

    async fn update_profile_image(&self, upload: ImageUpload) -> Result<RawUser, ApiError> {
        let mut slot = self.profile.lock().unwrap();
        let profile = slot.as_mut().ok_or(ApiError::Unauthorized)?;
        profile.profile_image = Some(upload.file_name);
        Ok(profile.clone())
    }

    async fn list_users(&self, _filter: UserListFilter) -> Result<AdminUsersResponse, ApiError> {
        let users: Vec<RawUser> = self.profile.lock().unwrap().clone().into_iter().collect();
        let total = users.len() as i64;
        Ok(AdminUsersResponse { users, total })
    }

    async fn delete_user(&self, _id: &str) -> Result<(), ApiError> {
        Ok(())
    }

    async fn dashboard_stats(&self) -> Result<AdminDashboardStats, ApiError> {
        Ok(AdminDashboardStats::default())
    }
}

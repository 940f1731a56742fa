use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// --- Role Vocabulary ---

/// Role string constants as the backend stores them.
///
/// Roles are compared by exact, case-sensitive string match everywhere in the
/// application; there is no hierarchy between them. Older accounts may still
/// carry historical values (`user`, `mentor`, `guest`) which parse fine but
/// are accepted by no protected route.
pub mod role {
    pub const STUDENT: &str = "student";
    pub const EMPLOYEE: &str = "employee";
    pub const CORPORATION: &str = "corporation";
    pub const ADMIN: &str = "admin";
}

fn default_true() -> bool {
    true
}

// --- Core Identity Schemas ---

/// RawUser
///
/// The user object exactly as the backend (or the persisted cache) hands it
/// over. The backend has historically emitted the identifier under **two
/// different fields** (`id` and `_id`, depending on the serialization path),
/// so both are modelled here and resolved by `UserIdentity::from_raw`: the
/// single normalization boundary. Nothing outside that function should ever
/// look at these identifier fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawUser {
    /// Canonical identifier field, preferred when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Secondary identifier field emitted by older serialization paths.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub mongo_id: Option<String>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    /// The RBAC field: one of the `role` constants. Absent on malformed
    /// records; the Role Gate treats a missing role as forbidden.
    #[serde(default)]
    pub role: Option<String>,
    /// Reference (URL or storage key) to the user's profile image.
    #[serde(default)]
    pub profile_image: Option<String>,
    /// Soft-delete marker maintained by the backend. Defaults to active when
    /// the field is missing from the payload.
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Default for RawUser {
    /// Matches the wire default: a record missing `isActive` is active.
    fn default() -> Self {
        Self {
            id: None,
            mongo_id: None,
            username: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            role: None,
            profile_image: None,
            is_active: true,
            created_at: None,
        }
    }
}

/// IdentityError
///
/// Failure of the normalization boundary. A user object without any usable
/// identifier can never become a Session, regardless of where it came from.
#[derive(Debug, Error, PartialEq)]
pub enum IdentityError {
    #[error("user record carries no identifier in either `id` or `_id`")]
    MissingId,
}

/// UserIdentity
///
/// The normalized identity owned by the Session Store. Invariant: `id` is
/// always non-empty; a Session is either wholly absent or holds one of
/// these. Constructed exclusively via `from_raw`, which is applied at every
/// ingress point (login response, registration response, profile fetch,
/// cache read).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    pub id: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Option<String>,
    pub profile_image: Option<String>,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl UserIdentity {
    /// from_raw
    ///
    /// The normalization boundary: derive the canonical identifier from a
    /// wire-shaped user object. Picks `id` when present and non-empty, falls
    /// back to `_id`, and fails when neither carries a value.
    pub fn from_raw(raw: RawUser) -> Result<Self, IdentityError> {
        let id = raw
            .id
            .filter(|v| !v.is_empty())
            .or(raw.mongo_id.filter(|v| !v.is_empty()))
            .ok_or(IdentityError::MissingId)?;

        Ok(Self {
            id,
            username: raw.username,
            first_name: raw.first_name,
            last_name: raw.last_name,
            email: raw.email,
            role: raw.role,
            profile_image: raw.profile_image,
            is_active: raw.is_active,
            created_at: raw.created_at,
        })
    }

    /// Convenience accessor for the role as a comparable string slice.
    pub fn role_str(&self) -> Option<&str> {
        self.role.as_deref()
    }
}

// --- Request Payloads (Input Schemas) ---

/// ImageUpload
///
/// An image file read into memory, ready to be attached to a multipart
/// request. The filename is kept so the backend can derive the extension.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// RegisterRequest
///
/// Input for the registration endpoint (POST /auth/register). Sent as a
/// multipart form, matching the backend contract; the optional profile image
/// travels as a file part alongside the text fields.
#[derive(Debug, Clone, Default)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub profile_image: Option<ImageUpload>,
}

/// LoginRequest
///
/// Input for the login endpoint (POST /auth/login). The identifier matches
/// either username or email on the server side.
#[derive(Debug, Clone, Serialize, Default)]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}

/// UpdateProfileRequest
///
/// Partial update payload for the profile endpoint (PUT /auth/update-profile).
///
/// Uses `Option<T>` with `#[serde(skip_serializing_if = "Option::is_none")]`
/// so only the fields the user actually edited are included in the JSON body.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UpdateProfileRequest {
    /// True when no field is set; callers skip the network round-trip then.
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.username.is_none()
            && self.email.is_none()
    }
}

/// UpdatePasswordRequest
///
/// Input for the password change endpoint (PUT /auth/update-password).
/// The password values pass straight through to the backend and are never
/// persisted or logged by this application.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// UserListFilter
///
/// Accepted query parameters for the admin user listing
/// (GET /admin/users?page&limit&role).
#[derive(Debug, Clone, Default)]
pub struct UserListFilter {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// Optional exact-match role filter.
    pub role: Option<String>,
}

// --- Response Envelopes (Output Schemas) ---

/// UserEnvelope
///
/// The `{ user }` wrapper the auth endpoints use for every payload that
/// returns an account object.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct UserEnvelope {
    pub user: RawUser,
}

/// AdminUsersResponse
///
/// Paginated user listing returned by GET /admin/users.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AdminUsersResponse {
    pub users: Vec<RawUser>,
    /// Total matching accounts across all pages.
    pub total: i64,
}

/// AdminDashboardStats
///
/// Aggregate counters for the administrative dashboard (GET /admin/dashboard).
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboardStats {
    pub total_users: i64,
    pub students: i64,
    pub employees: i64,
    pub corporations: i64,
    pub admins: i64,
}

/// DashboardResponse
///
/// The `{ stats }` wrapper around the dashboard counters.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct DashboardResponse {
    pub stats: AdminDashboardStats,
}

/// Message
///
/// Minimal error/info body the backend attaches to non-2xx responses.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Message {
    #[serde(default)]
    pub message: String,
}

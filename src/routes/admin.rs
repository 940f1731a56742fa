use super::{Access, Route};
use crate::models::role::ADMIN;

/// Admin Routes
///
/// Views restricted to administrators. A signed-in non-admin reaching one of
/// these gets `DenyForbidden` and lands on the public home page: silently,
/// so the existence of the admin surface is not advertised.
pub const ADMIN_ONLY: &[&str] = &[ADMIN];

pub const ROUTES: &[Route] = &[
    // Aggregate counters: total accounts and the per-role breakdown.
    Route {
        path: "/admin/dashboard",
        access: Access::Protected(ADMIN_ONLY),
    },
    // Paginated account listing with role filter and soft delete.
    Route {
        path: "/admin/users",
        access: Access::Protected(ADMIN_ONLY),
    },
];

use super::{Access, Route};
use crate::models::role::{ADMIN, CORPORATION, EMPLOYEE, STUDENT};

/// Authenticated Routes
///
/// Views accessible to any signed-in account regardless of its tier. The
/// accepted set enumerates every role, including `admin`, which must be
/// listed explicitly because the Role Gate applies no hierarchy.
///
/// The utility tools live here: each is stateless and shares nothing with
/// the session, but navigation to them is still gated like any other
/// member view.
pub const MEMBER_ROLES: &[&str] = &[STUDENT, EMPLOYEE, CORPORATION, ADMIN];

pub const ROUTES: &[Route] = &[
    // The signed-in landing page: profile card, quick tool access,
    // profile/password/image update forms.
    Route {
        path: "/user/dashboard",
        access: Access::Protected(MEMBER_ROLES),
    },
    // --- Utility Tools ---
    // Tool switcher hub.
    Route {
        path: "/tools",
        access: Access::Protected(MEMBER_ROLES),
    },
    Route {
        path: "/tools/uuid",
        access: Access::Protected(MEMBER_ROLES),
    },
    Route {
        path: "/tools/json",
        access: Access::Protected(MEMBER_ROLES),
    },
    Route {
        path: "/tools/jwt",
        access: Access::Protected(MEMBER_ROLES),
    },
    Route {
        path: "/tools/base64",
        access: Access::Protected(MEMBER_ROLES),
    },
    Route {
        path: "/tools/space",
        access: Access::Protected(MEMBER_ROLES),
    },
    Route {
        path: "/tools/image-compressor",
        access: Access::Protected(MEMBER_ROLES),
    },
    Route {
        path: "/tools/image-type-converter",
        access: Access::Protected(MEMBER_ROLES),
    },
];

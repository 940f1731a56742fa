use super::{Access, Route};

/// Public Routes
///
/// Views accessible to everyone, authenticated or not. These never consult
/// the Role Gate; they are listed so the route table covers the whole
/// navigable surface and redirect targets provably exist.
pub const ROUTES: &[Route] = &[
    // The marketing home page, and the landing spot for forbidden redirects.
    Route {
        path: "/",
        access: Access::Public,
    },
    // Project and team background.
    Route {
        path: "/about",
        access: Access::Public,
    },
    // Sign-in form, and the landing spot for unauthenticated redirects.
    Route {
        path: "/signin",
        access: Access::Public,
    },
    // Account creation form.
    Route {
        path: "/register",
        access: Access::Public,
    },
];

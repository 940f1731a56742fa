//! The application's navigable surface as one static, declarative table,
//! segregated by access tier (Public, Authenticated, Admin) the same way
//! the views are grouped in the UI. Every protected entry names its
//! accepted role set explicitly: the Role Gate performs no inference, so a
//! role missing from a set means that role is locked out of the view,
//! admins included.
//!
//! Keeping the table static (rather than passing role lists ad hoc at each
//! call site) makes the access policy reviewable in one place and lets the
//! test suite assert it exhaustively.

pub mod admin;
pub mod authenticated;
pub mod public;

/// Redirect target for `DenyUnauthenticated` verdicts.
pub const SIGN_IN: &str = "/signin";
/// Redirect target for `DenyForbidden` verdicts: the public home page,
/// deliberately distinct from the sign-in entry point.
pub const HOME: &str = "/";

/// Access
///
/// The policy attached to a route: open to everyone, or restricted to an
/// enumerated set of roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Protected(&'static [&'static str]),
}

/// Route
///
/// One navigable path and its access policy.
#[derive(Debug, Clone, Copy)]
pub struct Route {
    pub path: &'static str,
    pub access: Access,
}

/// All routes across the three tiers, public first.
pub fn all() -> impl Iterator<Item = &'static Route> {
    public::ROUTES
        .iter()
        .chain(authenticated::ROUTES.iter())
        .chain(admin::ROUTES.iter())
}

/// Looks up the access policy for a path. `None` means the path is not part
/// of the application at all (the UI renders its not-found page).
pub fn access_for(path: &str) -> Option<Access> {
    all().find(|route| route.path == path).map(|route| route.access)
}

use crate::session::{SessionSnapshot, SessionStatus};

/// Verdict
///
/// The Role Gate's answer for one protected view:
/// - `Pending`: the session is still unresolved; show a waiting indicator
///   and re-evaluate once the bootstrap settles. No redirect yet.
/// - `DenyUnauthenticated`: confirmed logged out; redirect to sign-in.
/// - `DenyForbidden`: logged in with the wrong (or no) role; redirect to the
///   public home page. Deliberately a different target than the
///   unauthenticated case, and deliberately silent: no error text that
///   would disclose which routes exist.
/// - `Allow`: render the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pending,
    DenyUnauthenticated,
    DenyForbidden,
    Allow,
}

/// evaluate
///
/// Decides whether a session may access a view that accepts the given
/// roles. A pure function of its two inputs: no state, no I/O.
///
/// Membership is exact, case-sensitive string match with no hierarchy:
/// `admin` does not implicitly satisfy a check for any other role, so every
/// view that admins keep access to lists `admin` explicitly in its accepted
/// set. A `Present` session with a missing role is forbidden, not
/// unauthenticated: the user is logged in, they just may not be here.
pub fn evaluate(accepted_roles: &[&str], session: &SessionSnapshot) -> Verdict {
    match session.status {
        SessionStatus::Unresolved => Verdict::Pending,
        SessionStatus::Absent => Verdict::DenyUnauthenticated,
        SessionStatus::Present => {
            let allowed = session
                .identity
                .as_ref()
                .and_then(|identity| identity.role_str())
                .is_some_and(|role| accepted_roles.contains(&role));

            if allowed {
                Verdict::Allow
            } else {
                Verdict::DenyForbidden
            }
        }
    }
}

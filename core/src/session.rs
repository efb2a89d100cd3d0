//! The ambient authorization signal.
//!
//! The client only needs to know whether the current caller is an
//! administrator. How that is established (login, tokens) is the session
//! provider's business.

pub trait Session {
    fn is_admin(&self) -> bool;
}

impl<T: Session + ?Sized> Session for &T {
    fn is_admin(&self) -> bool {
        (**self).is_admin()
    }
}

/// A session whose role is fixed at construction. Used by the CLI and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticSession {
    admin: bool,
}

impl StaticSession {
    pub fn admin() -> Self {
        Self { admin: true }
    }

    pub fn viewer() -> Self {
        Self { admin: false }
    }
}

impl Session for StaticSession {
    fn is_admin(&self) -> bool {
        self.admin
    }
}

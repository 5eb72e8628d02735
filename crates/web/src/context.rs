use hemmy_auth::SessionFlags;

/// Session state seen by a request that passed the guard.
///
/// Inserted as a request extension by the guard middleware.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SessionContext {
    flags: SessionFlags,
}

impl SessionContext {
    pub fn new(flags: SessionFlags) -> Self {
        Self { flags }
    }

    pub fn flags(&self) -> SessionFlags {
        self.flags
    }

    pub fn is_signed_in(&self) -> bool {
        self.flags.has_session
    }
}

use forum_core::SubjectId;

/// Authenticated session context for a request.
///
/// Inserted by the session validator; present on every protected route.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SessionContext {
    subject: SubjectId,
}

impl SessionContext {
    pub fn new(subject: SubjectId) -> Self {
        Self { subject }
    }

    pub fn subject(&self) -> SubjectId {
        self.subject
    }
}

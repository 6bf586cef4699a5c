use serde::{Deserialize, Serialize};

/// An id/name pair referencing a backend resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    /// Backend-assigned identifier.
    pub id: i64,
    /// Human-readable name.
    pub name: String,
}

/// A student/teacher binding to a semester, program, and batch section.
///
/// Fetched separately after login; not every user has one, and absence is
/// a valid state rather than an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentRecord {
    /// Backend-assigned enrollment identifier.
    pub id: i64,
    /// Semester the enrollment belongs to.
    #[serde(default)]
    pub semester: Option<NamedRef>,
    /// Program the enrollment belongs to.
    #[serde(default)]
    pub program: Option<NamedRef>,
    /// Batch section the enrollment belongs to.
    #[serde(default)]
    pub batch_section: Option<NamedRef>,
}

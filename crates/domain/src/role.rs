use std::str::FromStr;

use campora_core::AppError;
use serde::{Deserialize, Serialize};

/// Account roles recognized by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full administrative access; implicitly holds every permission.
    Administrator,
    /// Non-teaching staff member.
    Staff,
    /// Teaching staff member with an enrollment binding.
    Teacher,
    /// Enrolled student.
    Student,
}

impl Role {
    /// Returns a stable storage value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Administrator => "administrator",
            Self::Staff => "staff",
            Self::Teacher => "teacher",
            Self::Student => "student",
        }
    }

    /// Returns true for roles bound to a semester/program enrollment.
    #[must_use]
    pub fn requires_enrollment(&self) -> bool {
        matches!(self, Self::Student | Self::Teacher)
    }

    /// Returns true for the role that implicitly holds every permission.
    #[must_use]
    pub fn is_administrator(&self) -> bool {
        matches!(self, Self::Administrator)
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "administrator" => Ok(Self::Administrator),
            "staff" => Ok(Self::Staff),
            "teacher" => Ok(Self::Teacher),
            "student" => Ok(Self::Student),
            _ => Err(AppError::Validation(format!("unknown role '{value}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::Role;

    #[test]
    fn role_roundtrip_storage_value() {
        let role = Role::Teacher;
        let restored = Role::from_str(role.as_str());
        assert!(restored.is_ok());
        assert_eq!(restored.unwrap_or(Role::Administrator), role);
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(Role::from_str("principal").is_err());
    }

    #[test]
    fn only_students_and_teachers_require_enrollment() {
        assert!(Role::Student.requires_enrollment());
        assert!(Role::Teacher.requires_enrollment());
        assert!(!Role::Staff.requires_enrollment());
        assert!(!Role::Administrator.requires_enrollment());
    }

    #[test]
    fn administrator_is_administrator() {
        assert!(Role::Administrator.is_administrator());
        assert!(!Role::Student.is_administrator());
    }
}

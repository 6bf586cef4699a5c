use serde::{Deserialize, Serialize};

use crate::{Permission, PermissionGroup, PermissionSet};

/// Role-specific extension data beyond the base user record.
///
/// The backend shapes this differently per role (guardian fields for
/// students, designation for staff); fields the backend omits stay `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    /// Backend-assigned profile identifier, used for enrollment lookups.
    pub id: i64,
    /// Contact phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// National identity number.
    #[serde(default)]
    pub nid: Option<String>,
    /// Staff/teacher designation title.
    #[serde(default)]
    pub designation: Option<String>,
    /// Guardian name for student profiles.
    #[serde(default)]
    pub guardian_name: Option<String>,
    /// Guardian phone for student profiles.
    #[serde(default)]
    pub guardian_phone: Option<String>,
    /// Avatar or photo URL.
    #[serde(default)]
    pub photo: Option<String>,
    /// Permissions granted directly to the profile.
    #[serde(default)]
    pub permissions: Option<Vec<Permission>>,
    /// Permission groups the profile belongs to.
    #[serde(default)]
    pub permission_groups: Option<Vec<PermissionGroup>>,
}

impl ProfileRecord {
    /// Computes the effective permission set of this profile.
    ///
    /// Returns `Some` only when the backend sent both the direct
    /// permission list and the group list; a profile missing either is
    /// treated as carrying no derivable permissions.
    #[must_use]
    pub fn effective_permissions(&self) -> Option<PermissionSet> {
        match (&self.permissions, &self.permission_groups) {
            (Some(direct), Some(groups)) => Some(PermissionSet::from_parts(direct, groups)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ProfileRecord;
    use crate::{Permission, PermissionGroup};

    fn permission(id: i64, codename: &str) -> Permission {
        Permission {
            id,
            codename: codename.to_owned(),
            name: codename.to_uppercase(),
        }
    }

    fn bare_profile() -> ProfileRecord {
        ProfileRecord {
            id: 3,
            phone: None,
            nid: None,
            designation: None,
            guardian_name: None,
            guardian_phone: None,
            photo: None,
            permissions: None,
            permission_groups: None,
        }
    }

    #[test]
    fn effective_permissions_requires_both_lists() {
        let mut profile = bare_profile();
        assert!(profile.effective_permissions().is_none());

        profile.permissions = Some(vec![permission(1, "p1")]);
        assert!(profile.effective_permissions().is_none());

        profile.permission_groups = Some(vec![]);
        let set = profile.effective_permissions();
        assert!(set.is_some());
        assert_eq!(set.map(|permissions| permissions.len()).unwrap_or(0), 1);
    }

    #[test]
    fn effective_permissions_unions_groups() {
        let mut profile = bare_profile();
        profile.permissions = Some(vec![permission(1, "p1")]);
        profile.permission_groups = Some(vec![PermissionGroup {
            id: Some(5),
            name: Some("registrars".to_owned()),
            permissions: vec![permission(1, "p1"), permission(2, "p2")],
        }]);

        let set = profile
            .effective_permissions()
            .unwrap_or_else(|| panic!("test"));
        assert_eq!(set.len(), 2);
        assert!(set.contains_codename("p2"));
    }

    #[test]
    fn deserializes_student_payload_with_unknown_fields() {
        let raw = r#"{
            "id": 11,
            "phone": "01700000000",
            "guardian_name": "Abdul Karim",
            "blood_group": "O+",
            "permissions": [],
            "permission_groups": []
        }"#;

        let profile: ProfileRecord =
            serde_json::from_str(raw).unwrap_or_else(|_| panic!("test"));
        assert_eq!(profile.id, 11);
        assert_eq!(profile.guardian_name.as_deref(), Some("Abdul Karim"));
        assert!(
            profile
                .effective_permissions()
                .map(|set| set.is_empty())
                .unwrap_or(false)
        );
    }
}

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A named capability granted to a profile, checked by codename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    /// Backend-assigned permission identifier; the deduplication key.
    pub id: i64,
    /// Stable machine name used for membership checks.
    pub codename: String,
    /// Human-readable label.
    pub name: String,
}

/// A named bundle of permissions assignable to a profile as a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGroup {
    /// Backend-assigned group identifier, when the backend sends one.
    #[serde(default)]
    pub id: Option<i64>,
    /// Human-readable group name, when the backend sends one.
    #[serde(default)]
    pub name: Option<String>,
    /// Permissions granted through membership in this group.
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

/// The effective permission set of a profile: the union of its direct
/// permissions and all group permissions, deduplicated by permission id.
///
/// The first occurrence of an id wins; order is otherwise irrelevant.
/// Serialized as a plain permission list, which is also the denormalized
/// representation cached by the session store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Permission>", into = "Vec<Permission>")]
pub struct PermissionSet {
    permissions: Vec<Permission>,
}

impl PermissionSet {
    /// Computes the deduplicated union of direct and group permissions.
    #[must_use]
    pub fn from_parts(direct: &[Permission], groups: &[PermissionGroup]) -> Self {
        let group_permissions = groups.iter().flat_map(|group| group.permissions.iter());

        let mut seen = HashSet::new();
        let mut permissions = Vec::new();
        for permission in direct.iter().chain(group_permissions) {
            if seen.insert(permission.id) {
                permissions.push(permission.clone());
            }
        }

        Self { permissions }
    }

    /// Returns true when a permission with this codename is in the set.
    #[must_use]
    pub fn contains_codename(&self, codename: &str) -> bool {
        self.permissions
            .iter()
            .any(|permission| permission.codename == codename)
    }

    /// Returns the number of distinct permissions in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    /// Returns true when the set holds no permissions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }

    /// Iterates the permissions in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.permissions.iter()
    }
}

impl From<Vec<Permission>> for PermissionSet {
    fn from(permissions: Vec<Permission>) -> Self {
        Self::from_parts(&permissions, &[])
    }
}

impl From<PermissionSet> for Vec<Permission> {
    fn from(set: PermissionSet) -> Self {
        set.permissions
    }
}

use serde::{Deserialize, Serialize};
use sqlx::Type;

/// Account role as asserted by the account provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "userrole", rename_all = "lowercase")]
pub(crate) enum UserRole {
    Student,
    Teacher,
    Admin,
}

impl UserRole {
    /// Teachers and admins may read and override other students' progress.
    pub(crate) fn can_manage_students(self) -> bool {
        matches!(self, Self::Teacher | Self::Admin)
    }
}

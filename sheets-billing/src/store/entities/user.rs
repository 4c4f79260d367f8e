//! Application accounts

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{ROLE_CUSTOMER, STATUS_ACTIVE, merge};
use crate::api::Row;
use crate::store::id::format_datetime;
use crate::store::record::Record;
use crate::store::table::Entity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Email")]
    pub email: String,
    /// Password hash; hashing happens before it reaches the store
    #[serde(rename = "Password")]
    pub password: String,
    #[serde(rename = "Role")]
    pub role: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Created_At")]
    pub created_at: String,
}

/// A user without the password column, for display
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: String,
    pub status: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub email: String,
    /// Already hashed
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
}

impl UserPatch {
    pub fn status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Self::default()
        }
    }
}

impl User {
    pub fn is_active(&self) -> bool {
        self.status == STATUS_ACTIVE
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            role: self.role.clone(),
            status: self.status.clone(),
            created_at: self.created_at.clone(),
        }
    }
}

impl Entity for User {
    const TABLE: &'static str = "Users";
    const COLUMNS: &'static [&'static str] = &[
        "ID",
        "Username",
        "Email",
        "Password",
        "Role",
        "Status",
        "Created_At",
    ];

    type Draft = NewUser;
    type Patch = UserPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_record(record: &Record) -> Self {
        Self {
            id: record.get("ID"),
            username: record.get("Username"),
            email: record.get("Email"),
            password: record.get("Password"),
            role: record.get("Role"),
            status: record.get("Status"),
            created_at: record.get("Created_At"),
        }
    }

    fn to_row(&self) -> Row {
        vec![
            self.id.clone(),
            self.username.clone(),
            self.email.clone(),
            self.password.clone(),
            self.role.clone(),
            self.status.clone(),
            self.created_at.clone(),
        ]
    }

    fn from_draft(id: String, draft: NewUser, now: NaiveDateTime) -> Self {
        Self {
            id,
            username: draft.username,
            email: draft.email,
            password: draft.password,
            role: draft.role.unwrap_or_else(|| ROLE_CUSTOMER.to_string()),
            status: draft.status.unwrap_or_else(|| STATUS_ACTIVE.to_string()),
            created_at: format_datetime(now),
        }
    }

    fn apply(&mut self, patch: UserPatch) {
        merge(&mut self.username, patch.username, |v| v);
        merge(&mut self.email, patch.email, |v| v);
        merge(&mut self.password, patch.password, |v| v);
        merge(&mut self.role, patch.role, |v| v);
        merge(&mut self.status, patch.status, |v| v);
    }
}

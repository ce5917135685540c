use serde::{Deserialize, Serialize};

use super::user::default_true;

/// A tenant HR agency using the console.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct HrCompany {
    pub id: i64,
    pub name: String,
    pub code: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, skip_serializing)]
    pub hr_users_count: Option<u32>,
}

/// A client company that job postings are published for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct CustomerCompany {
    pub id: i64,
    pub name: String,
    pub code: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, skip_serializing)]
    pub authorized_hr_users_count: Option<u32>,
}

/// Envelope of the `toggle_active` action: `{message, data}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ToggleActiveResponse<T> {
    #[serde(default)]
    pub message: Option<String>,
    pub data: T,
}

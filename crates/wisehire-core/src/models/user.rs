use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The authenticated identity returned by the profile endpoint.
///
/// Role flags default to `false` when the profile payload omits them, so a
/// thin profile can never grant superuser access by accident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Principal {
    pub id: i64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub hr_company_name: Option<String>,
    #[serde(default)]
    pub authorized_companies_list: Vec<String>,
}

impl Principal {
    /// Full name, falling back to username and then email.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if !full.is_empty() {
            full.to_string()
        } else if !self.username.is_empty() {
            self.username.clone()
        } else {
            self.email.clone()
        }
    }

    pub fn role_label(&self) -> &'static str {
        if self.is_superuser {
            "Superuser"
        } else if self.is_staff {
            "Staff"
        } else {
            "HR User"
        }
    }
}

/// Body of a successful login call.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<Value>,
}

/// An HR account as managed on the HR users screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct HrUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub hr_company: Option<i64>,
    #[serde(default)]
    pub authorized_customer_companies: Vec<i64>,
    #[serde(default, skip_serializing)]
    pub authorized_companies_count: Option<u32>,
    #[serde(default, skip_serializing)]
    pub last_login: Option<DateTime<Utc>>,
}

impl HrUser {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

pub(crate) fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_principal_missing_flags_default_to_false() {
        let json = r#"{"id": 3, "username": "ayse", "email": "ayse@x.com", "first_name": "Ayşe", "last_name": "Yılmaz", "phone": null, "hr_company_name": "Acme HR", "authorized_companies_list": ["Globex"]}"#;
        let principal: Principal = serde_json::from_str(json).unwrap();
        assert!(!principal.is_superuser);
        assert!(!principal.is_staff);
        assert_eq!(principal.display_name(), "Ayşe Yılmaz");
        assert_eq!(principal.role_label(), "HR User");
        assert_eq!(principal.authorized_companies_list, vec!["Globex"]);
    }

    #[test]
    fn test_principal_display_name_fallbacks() {
        let principal: Principal =
            serde_json::from_str(r#"{"id": 1, "username": "admin", "is_superuser": true}"#).unwrap();
        assert_eq!(principal.display_name(), "admin");
        assert_eq!(principal.role_label(), "Superuser");

        let principal: Principal = serde_json::from_str(r#"{"id": 2, "email": "a@x.com"}"#).unwrap();
        assert_eq!(principal.display_name(), "a@x.com");
    }

    #[test]
    fn test_hr_user_read_only_fields_not_sent_back() {
        let json = r#"{"id": 9, "username": "mert", "email": "mert@x.com", "first_name": "Mert", "last_name": "Kaya", "is_active": true, "is_staff": false, "is_superuser": false, "hr_company": 2, "authorized_customer_companies": [4, 5], "authorized_companies_count": 2, "last_login": "2024-05-01T09:30:00Z"}"#;
        let user: HrUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.authorized_companies_count, Some(2));
        assert_eq!(user.full_name(), "Mert Kaya");

        let body = serde_json::to_value(&user).unwrap();
        assert!(body.get("authorized_companies_count").is_none());
        assert!(body.get("last_login").is_none());
        assert_eq!(body["authorized_customer_companies"], serde_json::json!([4, 5]));
    }
}

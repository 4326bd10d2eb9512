//! Types for authentication and the employee roster

use serde::{Deserialize, Serialize};

/// The role a signed-in user operates under.
///
/// Every role-dependent decision in the client (endpoint selection, landing
/// page) is an exhaustive match on this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Sales,
    Operations,
    Accounts,
}

impl Role {
    /// The dashboard route a user of this role lands on after sign-in
    pub fn landing_path(&self) -> &'static str {
        match self {
            Role::Admin => "/admin",
            Role::Sales => "/sales",
            Role::Operations => "/operations",
            Role::Accounts => "/accounts",
        }
    }

    /// Wire representation of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Sales => "sales",
            Role::Operations => "operations",
            Role::Accounts => "accounts",
        }
    }
}

/// Profile submitted when registering a new user
#[derive(Debug, Clone, Serialize)]
pub struct RegisterProfile {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Compared against `password` locally; never sent over the wire
    #[serde(skip_serializing)]
    pub confirm_password: String,
    pub contact: String,
    #[serde(rename = "type")]
    pub role: Role,
}

/// The user object embedded in login/register responses
#[derive(Debug, Clone, Deserialize)]
pub struct AccountProfile {
    pub id: i64,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(rename = "type", default)]
    pub role: Option<Role>,
}

/// Employee record embedded in auth responses and the roster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeDetails {
    #[serde(rename = "type")]
    pub role: Role,
}

/// Response body of `POST /auth/login/` and `POST /auth/user/`
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user: AccountProfile,
    pub token: String,
    /// Present on register responses; carries the role when `user` does not
    #[serde(default)]
    pub emp: Option<EmployeeDetails>,
}

impl AuthResponse {
    /// Resolve the role from whichever part of the response carries it
    pub fn role(&self) -> Option<Role> {
        self.user.role.or(self.emp.as_ref().map(|e| e.role))
    }
}

/// Employee as returned by the roster and current-user endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub employee_details: EmployeeDetails,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trip() {
        let role: Role = serde_json::from_str("\"operations\"").unwrap();
        assert_eq!(role, Role::Operations);
        assert_eq!(serde_json::to_string(&role).unwrap(), "\"operations\"");
    }

    #[test]
    fn landing_paths() {
        assert_eq!(Role::Admin.landing_path(), "/admin");
        assert_eq!(Role::Sales.landing_path(), "/sales");
        assert_eq!(Role::Operations.landing_path(), "/operations");
        assert_eq!(Role::Accounts.landing_path(), "/accounts");
    }

    #[test]
    fn register_profile_omits_confirmation() {
        let profile = RegisterProfile {
            name: "Asha".into(),
            email: "asha@example.com".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
            contact: "555-0101".into(),
            role: Role::Sales,
        };
        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("confirm_password").is_none());
        assert_eq!(json["type"], "sales");
    }

    #[test]
    fn role_resolved_from_emp_when_user_lacks_it() {
        let response: AuthResponse = serde_json::from_str(
            r#"{"user": {"id": 7, "email": "a@b.c", "name": "A"},
                "token": "t",
                "emp": {"type": "accounts"}}"#,
        )
        .unwrap();
        assert_eq!(response.role(), Some(Role::Accounts));
    }
}

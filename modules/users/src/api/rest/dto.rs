use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::contract::model::{NewUser, User};

/// Missing fields deserialize as empty strings so the service reports them
/// with its own validation messages.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RegisterReq {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoginReq {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResp {
    pub message: String,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResp {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDto {
    pub name: String,
    pub email: String,
    pub user_id: Uuid,
}

impl From<RegisterReq> for NewUser {
    fn from(req: RegisterReq) -> Self {
        Self {
            name: req.name,
            email: req.email,
            password: req.password,
        }
    }
}

impl From<User> for ProfileDto {
    fn from(user: User) -> Self {
        Self {
            name: user.name,
            email: user.email,
            user_id: user.id,
        }
    }
}

// Requests are logged; the password must not be.
impl RegisterReq {
    pub fn redacted(&self) -> String {
        format!("name={:?} email={:?}", self.name, self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_uses_camel_case_user_id() {
        let id = Uuid::new_v4();
        let v = serde_json::to_value(ProfileDto {
            name: "Ann".into(),
            email: "ann@example.com".into(),
            user_id: id,
        })
        .unwrap();
        assert_eq!(v["userId"], id.to_string());
        assert!(v.get("user_id").is_none());
    }

    #[test]
    fn missing_fields_become_empty() {
        let req: RegisterReq = serde_json::from_str(r#"{"email":"a@b.co"}"#).unwrap();
        assert_eq!(req.name, "");
        assert_eq!(req.password, "");
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    models::{Address, ProductResponse},
    utils::validation,
};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: Option<String>,
    pub profile_image: Option<String>,
    pub is_admin: bool,
    pub is_banned: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub phone: Option<String>,
}

/// A registration that passed sanitization and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionUser {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            is_admin: user.is_admin,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub is_admin: bool,
    pub user: SessionUser,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub profile_image: Option<String>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub profile_image: Option<String>,
}

impl UpdateProfileRequest {
    /// Blank fields are treated as absent; present ones follow the
    /// registration rules.
    pub fn into_changes(self) -> Result<ProfileChanges> {
        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        if let Some(ref name) = name {
            validation::validate_name(name)?;
        }

        let phone = self
            .phone
            .map(|p| validation::normalize_phone(&p))
            .filter(|p| !p.is_empty());
        if let Some(ref phone) = phone {
            validation::validate_phone(phone)?;
        }

        let profile_image = self
            .profile_image
            .map(|i| i.trim().to_string())
            .filter(|i| !i.is_empty());

        Ok(ProfileChanges {
            name,
            phone,
            profile_image,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub old_password: String,
    #[serde(default)]
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub user: User,
    pub wishlist: Vec<ProductResponse>,
    pub addresses: Vec<Address>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_profile_changes_normalize_fields() {
        let changes = UpdateProfileRequest {
            name: Some(" Jane O'Neil ".into()),
            phone: Some("+91 98765-43210".into()),
            profile_image: Some("".into()),
        }
        .into_changes()
        .unwrap();

        assert_eq!(
            changes,
            ProfileChanges {
                name: Some("Jane O'Neil".into()),
                phone: Some("+919876543210".into()),
                profile_image: None,
            }
        );
    }

    #[test]
    fn test_profile_changes_reject_bad_name() {
        let req = UpdateProfileRequest {
            name: Some("R2-D2".into()),
            phone: None,
            profile_image: None,
        };
        assert!(matches!(req.into_changes(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_password_hash_is_never_serialized() {
        let user = User {
            id: 1,
            name: "Test".into(),
            email: "test@test.com".into(),
            password_hash: "$2b$12$secret".into(),
            phone: None,
            profile_image: None,
            is_admin: false,
            is_banned: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "test@test.com");
    }
}

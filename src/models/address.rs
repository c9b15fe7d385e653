use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Address {
    pub id: i32,
    #[serde(skip_serializing)]
    pub user_id: i32,
    pub full_name: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

/// Address fields copied onto an order at placement time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub full_name: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

impl From<&Address> for ShippingAddress {
    fn from(address: &Address) -> Self {
        Self {
            full_name: address.full_name.clone(),
            phone: address.phone.clone(),
            street: address.street.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            zip_code: address.zip_code.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AddressRequest {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub is_default: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAddress {
    pub address: ShippingAddress,
    pub is_default: bool,
}

/// Partial address edit; blank strings count as "not provided".
#[derive(Debug, Default, PartialEq, Eq)]
pub struct AddressChanges {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub is_default: Option<bool>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl AddressRequest {
    pub fn into_new(self) -> Result<NewAddress> {
        let missing = || AppError::BadRequest("Please enter all address fields".to_string());

        Ok(NewAddress {
            address: ShippingAddress {
                full_name: non_blank(self.full_name).ok_or_else(missing)?,
                phone: non_blank(self.phone).ok_or_else(missing)?,
                street: non_blank(self.street).ok_or_else(missing)?,
                city: non_blank(self.city).ok_or_else(missing)?,
                state: non_blank(self.state).ok_or_else(missing)?,
                zip_code: non_blank(self.zip_code).ok_or_else(missing)?,
            },
            is_default: self.is_default.unwrap_or(false),
        })
    }

    pub fn into_changes(self) -> AddressChanges {
        AddressChanges {
            full_name: non_blank(self.full_name),
            phone: non_blank(self.phone),
            street: non_blank(self.street),
            city: non_blank(self.city),
            state: non_blank(self.state),
            zip_code: non_blank(self.zip_code),
            is_default: self.is_default,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AddressDeletedResponse {
    pub message: String,
    pub addresses: Vec<Address>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request() -> AddressRequest {
        AddressRequest {
            full_name: Some(" Test User ".into()),
            phone: Some("9876543210".into()),
            street: Some("123 MG Road".into()),
            city: Some("Mumbai".into()),
            state: Some("Maharashtra".into()),
            zip_code: Some("400001".into()),
            is_default: None,
        }
    }

    #[test]
    fn test_into_new_trims_and_defaults() {
        let new = full_request().into_new().unwrap();
        assert_eq!(new.address.full_name, "Test User");
        assert!(!new.is_default);
    }

    #[test]
    fn test_into_new_requires_every_field() {
        let req = AddressRequest {
            city: Some("   ".into()),
            ..full_request()
        };
        assert!(matches!(req.into_new(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_into_changes_drops_blank_fields() {
        let changes = AddressRequest {
            street: Some("".into()),
            city: Some("Pune".into()),
            is_default: Some(true),
            ..Default::default()
        }
        .into_changes();

        assert_eq!(changes.street, None);
        assert_eq!(changes.city.as_deref(), Some("Pune"));
        assert_eq!(changes.is_default, Some(true));
    }
}

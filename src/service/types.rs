use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ServiceError;
use crate::error::ConsoleError;

/// Numeric vendor identifier as typed by the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VendorId(u64);

impl VendorId {
    /// Surrounding whitespace is ignored; anything else must be digits.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        trimmed.parse::<u64>().ok().map(Self)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for VendorId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl FromStr for VendorId {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ConsoleError::InvalidVendorId(s.to_string()))
    }
}

impl fmt::Display for VendorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Business partner selling through the marketplace
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Collaborator {
    #[serde(deserialize_with = "string_or_number")]
    pub collaborator_id: String,
    pub name: String,
    pub brand_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    pub commission_type: String,
    #[serde(deserialize_with = "string_or_number")]
    pub commission_value: String,
    #[serde(default)]
    pub min_order_quantity: u32,
    pub status: String,
}

impl Collaborator {
    /// `12.5%` for percentage commissions, `300 ₹` for flat ones.
    pub fn commission_display(&self) -> String {
        if self.commission_type == "percentage" {
            format!("{}%", self.commission_value)
        } else {
            format!("{} ₹", self.commission_value)
        }
    }
}

pub const COMMISSION_TYPES: [&str; 2] = ["percentage", "fixed"];
pub const COLLABORATOR_STATUSES: [&str; 2] = ["active", "inactive"];

/// Body of a collaborator create or update. Optional contact fields are sent
/// as empty strings when unset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollaboratorDraft {
    pub name: String,
    pub brand_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub website: String,
    pub commission_type: String,
    pub commission_value: f64,
    pub min_order_quantity: u32,
    pub status: String,
}

impl Default for CollaboratorDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            brand_name: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            website: String::new(),
            commission_type: "percentage".to_string(),
            commission_value: 10.0,
            min_order_quantity: 1,
            status: "active".to_string(),
        }
    }
}

impl CollaboratorDraft {
    /// Start an edit from the stored record.
    pub fn from_existing(existing: &Collaborator) -> Result<Self, ServiceError> {
        let commission_value = existing.commission_value.trim().parse::<f64>().map_err(|_| {
            ServiceError::Invalid(format!(
                "Collaborator {} has a non-numeric commission value {:?}",
                existing.collaborator_id, existing.commission_value
            ))
        })?;

        Ok(Self {
            name: existing.name.clone(),
            brand_name: existing.brand_name.clone(),
            email: existing.email.clone(),
            phone: existing.phone.clone().unwrap_or_default(),
            address: existing.address.clone().unwrap_or_default(),
            website: existing.website.clone().unwrap_or_default(),
            commission_type: existing.commission_type.clone(),
            commission_value,
            min_order_quantity: existing.min_order_quantity,
            status: existing.status.clone(),
        })
    }

    pub fn validate(&self) -> Result<(), ServiceError> {
        if [&self.name, &self.brand_name, &self.email].iter().any(|f| f.trim().is_empty()) {
            return Err(ServiceError::Invalid("Name, Brand Name, and Email are required".to_string()));
        }
        if !COMMISSION_TYPES.contains(&self.commission_type.as_str()) {
            return Err(ServiceError::Invalid(format!(
                "Unknown commission type: {}",
                self.commission_type
            )));
        }
        if !self.commission_value.is_finite() || self.commission_value < 0.0 {
            return Err(ServiceError::Invalid("Commission value must be a non-negative number".to_string()));
        }
        if !COLLABORATOR_STATUSES.contains(&self.status.as_str()) {
            return Err(ServiceError::Invalid(format!("Unknown status: {}", self.status)));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Product {
    #[serde(deserialize_with = "string_or_number")]
    pub product_id: String,
    pub name: String,
    pub category: String,
    #[serde(deserialize_with = "string_or_number")]
    pub unit_price: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub stock_quantity: i64,
    #[serde(default)]
    pub min_order_quantity: u32,
    pub status: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Numeric columns come back either quoted or bare depending on the backend
/// driver.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn vendor_id_accepts_digits_only() {
        assert_eq!(VendorId::parse("42"), Some(VendorId(42)));
        assert_eq!(VendorId::parse("  7 "), Some(VendorId(7)));
        assert_eq!(VendorId::parse(""), None);
        assert_eq!(VendorId::parse("   "), None);
        assert_eq!(VendorId::parse("abc"), None);
        assert_eq!(VendorId::parse("4 2"), None);
        assert_eq!(VendorId::parse("-3"), None);
        assert_eq!(VendorId::parse("1.5"), None);
    }

    #[test]
    fn vendor_id_from_str_reports_input() {
        let err = "x1".parse::<VendorId>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid vendor id: \"x1\"");
    }

    #[test]
    fn collaborator_accepts_numeric_columns() {
        let collaborator: Collaborator = serde_json::from_value(json!({
            "collaborator_id": 9,
            "name": "Asha",
            "brand_name": "Pixel Cafe",
            "email": "asha@example.com",
            "commission_type": "percentage",
            "commission_value": 12.5,
            "min_order_quantity": 3,
            "status": "active"
        }))
        .unwrap();

        assert_eq!(collaborator.collaborator_id, "9");
        assert_eq!(collaborator.commission_display(), "12.5%");
        assert!(collaborator.phone.is_none());
    }

    #[test]
    fn flat_commission_uses_rupee_suffix() {
        let collaborator: Collaborator = serde_json::from_value(json!({
            "collaborator_id": "c-1",
            "name": "Ravi",
            "brand_name": "Joypad Co",
            "email": "ravi@example.com",
            "commission_type": "fixed",
            "commission_value": "300",
            "status": "inactive"
        }))
        .unwrap();

        assert_eq!(collaborator.commission_display(), "300 ₹");
        assert_eq!(collaborator.min_order_quantity, 0);
    }

    #[test]
    fn draft_requires_name_brand_and_email() {
        let draft = CollaboratorDraft {
            name: "Asha".to_string(),
            brand_name: " ".to_string(),
            email: "asha@example.com".to_string(),
            ..CollaboratorDraft::default()
        };
        assert_eq!(
            draft.validate(),
            Err(ServiceError::Invalid("Name, Brand Name, and Email are required".to_string()))
        );

        let draft = CollaboratorDraft {
            brand_name: "Pixel Cafe".to_string(),
            ..draft
        };
        assert_eq!(draft.validate(), Ok(()));
    }

    #[test]
    fn draft_serializes_numbers_and_empty_contacts() {
        let body = serde_json::to_value(CollaboratorDraft {
            name: "Asha".to_string(),
            brand_name: "Pixel Cafe".to_string(),
            email: "asha@example.com".to_string(),
            ..CollaboratorDraft::default()
        })
        .unwrap();

        assert_eq!(body["commission_value"], json!(10.0));
        assert_eq!(body["min_order_quantity"], json!(1));
        assert_eq!(body["phone"], json!(""));
        assert_eq!(body["commission_type"], json!("percentage"));
    }

    #[test]
    fn draft_from_existing_parses_commission() {
        let existing: Collaborator = serde_json::from_value(json!({
            "collaborator_id": "4",
            "name": "Ravi",
            "brand_name": "Joypad Co",
            "email": "ravi@example.com",
            "website": "https://joypad.example",
            "commission_type": "fixed",
            "commission_value": "300.00",
            "min_order_quantity": 2,
            "status": "inactive"
        }))
        .unwrap();

        let draft = CollaboratorDraft::from_existing(&existing).unwrap();
        assert_eq!(draft.commission_value, 300.0);
        assert_eq!(draft.website, "https://joypad.example");
        assert_eq!(draft.phone, "");

        let broken = Collaborator {
            commission_value: "ten".to_string(),
            ..existing
        };
        assert!(matches!(
            CollaboratorDraft::from_existing(&broken),
            Err(ServiceError::Invalid(_))
        ));
    }
}

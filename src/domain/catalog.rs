//! Catalog records: the products and service packages sold on the storefront.
//!
//! Products are created and edited only through the admin console; the
//! storefront sees active entries only.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A catalog entry. `status` is stored as text (`active`, `inactive`,
/// `draft`); [`ProductStatus`] is the typed view used by domain logic.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub original_price: Option<Decimal>,
    pub category: String,
    pub subcategory: Option<String>,
    pub stock: i32,
    pub status: String,
    pub features: Vec<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn status(&self) -> ProductStatus {
        ProductStatus::parse(&self.status)
    }

    pub fn is_active(&self) -> bool {
        self.status() == ProductStatus::Active
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Active,
    Inactive,
    #[default]
    Draft,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Active => "active",
            ProductStatus::Inactive => "inactive",
            ProductStatus::Draft => "draft",
        }
    }

    /// Unknown status text is treated as draft, keeping bad rows off the
    /// storefront.
    pub fn parse(value: &str) -> ProductStatus {
        match value {
            "active" => ProductStatus::Active,
            "inactive" => ProductStatus::Inactive,
            _ => ProductStatus::Draft,
        }
    }
}

/// Admin payload for creating or replacing a product.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProductInput {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub original_price: Option<Decimal>,
    #[validate(length(min = 1, message = "category is required"))]
    pub category: String,
    pub subcategory: Option<String>,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ProductInput {
    /// Checks validator rules plus the numeric constraints the derive cannot
    /// express for `Decimal` fields.
    pub fn check(&self) -> Result<(), String> {
        if let Err(errors) = self.validate() {
            return Err(errors.to_string());
        }
        if self.price < Decimal::ZERO {
            return Err("price must not be negative".to_string());
        }
        if let Some(original) = self.original_price {
            if original < Decimal::ZERO {
                return Err("original price must not be negative".to_string());
            }
        }
        if self.stock < 0 {
            return Err("stock must not be negative".to_string());
        }
        Ok(())
    }

    pub fn into_product(self, id: Uuid, now: DateTime<Utc>) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            original_price: self.original_price,
            category: self.category,
            subcategory: self.subcategory,
            stock: self.stock,
            status: self.status.as_str().to_string(),
            features: self.features,
            tags: self.tags,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, price: Decimal) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            description: None,
            price,
            original_price: None,
            category: "hosting".to_string(),
            subcategory: None,
            stock: 10,
            status: ProductStatus::Active,
            features: vec![],
            tags: vec![],
        }
    }

    #[test]
    fn rejects_empty_name() {
        assert!(input("", Decimal::ONE).check().is_err());
    }

    #[test]
    fn rejects_negative_price() {
        assert!(input("VPS Basic", Decimal::new(-1, 0)).check().is_err());
    }

    #[test]
    fn unknown_status_parses_as_draft() {
        assert_eq!(ProductStatus::parse("deleted"), ProductStatus::Draft);
    }
}

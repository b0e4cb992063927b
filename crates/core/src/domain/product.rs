use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::validation::ValidationErrors;

pub const MAX_NAME_LEN: usize = 200;
pub const MAX_DESCRIPTION_LEN: usize = 2000;
pub const MAX_PRICE_SCALE: u32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub i64);

/// Categories carry no data of their own; they exist only as a filter key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub i64);

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub description: Option<String>,
    pub category_id: Option<CategoryId>,
}

/// A product that passed validation and has not been stored yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub description: Option<String>,
    pub category_id: Option<CategoryId>,
}

impl NewProduct {
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            description: self.description,
            category_id: self.category_id,
        }
    }
}

/// Create-product payload as received from callers.
///
/// Every field is optional so that an absent field is reported through
/// [`ValidationErrors`] instead of failing deserialization as a whole.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub category_id: Option<i64>,
}

impl ProductDraft {
    pub fn validate(self) -> Result<NewProduct, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let name = self.name.map(|name| name.trim().to_string()).unwrap_or_default();
        if name.is_empty() {
            errors.add("name", "is required");
        } else if name.chars().count() > MAX_NAME_LEN {
            errors.add("name", format!("must be at most {MAX_NAME_LEN} characters"));
        }

        match self.price {
            None => errors.add("price", "is required"),
            Some(price) => {
                if price < Decimal::ZERO {
                    errors.add("price", "must not be negative");
                }
                if price.normalize().scale() > MAX_PRICE_SCALE {
                    errors.add(
                        "price",
                        format!("must have at most {MAX_PRICE_SCALE} decimal places"),
                    );
                }
            }
        }

        let description =
            self.description.map(|text| text.trim().to_string()).filter(|text| !text.is_empty());
        if let Some(text) = &description {
            if text.chars().count() > MAX_DESCRIPTION_LEN {
                errors.add(
                    "description",
                    format!("must be at most {MAX_DESCRIPTION_LEN} characters"),
                );
            }
        }

        if let Some(category_id) = self.category_id {
            if category_id <= 0 {
                errors.add("categoryId", "must be a positive identifier");
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewProduct {
            name,
            price: self.price.unwrap_or_default(),
            description,
            category_id: self.category_id.map(CategoryId),
        })
    }
}

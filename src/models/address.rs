use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

lazy_static! {
    static ref POSTAL_CODE: Regex = Regex::new(r"^\d{5}(-\d{4})?$").unwrap();
}

/// A pickup, destination or storage location.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "addresses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[validate(length(min = 1, max = 255, message = "Street address is required"))]
    pub street_address_1: String,

    pub street_address_2: Option<String>,

    #[validate(length(min = 1, max = 100, message = "City is required"))]
    pub city: String,

    #[validate(length(equal = 2, message = "State must be a two-letter code"))]
    pub state: String,

    #[validate(regex(path = "POSTAL_CODE", message = "Postal code must be a US ZIP"))]
    pub postal_code: String,

    pub country: Option<String>,

    /// Outside the continental United States.
    pub is_oconus: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// First three digits of the postal code.
    pub fn zip3(&self) -> &str {
        self.postal_code.get(..3).unwrap_or(&self.postal_code)
    }

    /// Five-digit postal code without any +4 extension.
    pub fn zip5(&self) -> &str {
        self.postal_code.get(..5).unwrap_or(&self.postal_code)
    }

    pub fn is_alaska(&self) -> bool {
        if self.state.eq_ignore_ascii_case("AK") {
            return true;
        }
        matches!(self.zip3(), "995" | "996" | "997" | "998" | "999")
    }
}

//! Checkout form validation.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Email;

static POSTAL_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{5}(-\d{4})?$")
        .unwrap_or_else(|e| unreachable!("postal code pattern is a valid regex: {e}"))
});

/// Country pre-filled on a fresh form.
pub const DEFAULT_COUNTRY: &str = "United States";

/// Contact and shipping details as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_country() -> String {
    DEFAULT_COUNTRY.to_owned()
}

impl Default for CheckoutForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            address: String::new(),
            city: String::new(),
            postal_code: String::new(),
            country: default_country(),
        }
    }
}

/// Form fields, named as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckoutField {
    Name,
    Email,
    Address,
    City,
    PostalCode,
    Country,
}

/// One failing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: CheckoutField,
    pub message: String,
}

/// Every field that failed validation, in form order.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("checkout validation failed for {} field(s)", .errors.len())]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// The message for `field`, if it failed.
    #[must_use]
    pub fn message_for(&self, field: CheckoutField) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

/// A form that passed validation. Fields are trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedCheckout {
    pub name: String,
    pub email: Email,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl CheckoutForm {
    /// Check every field and collect all failures.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] listing each failing field.
    pub fn validate(&self) -> Result<ValidatedCheckout, ValidationErrors> {
        let mut errors = Vec::new();
        let mut fail = |field, message: &str| {
            errors.push(FieldError {
                field,
                message: message.to_owned(),
            });
        };

        let name = self.name.trim();
        if name.chars().count() < 2 {
            fail(CheckoutField::Name, "Name must be at least 2 characters");
        }

        let email = Email::parse(self.email.trim());
        if email.is_err() {
            fail(CheckoutField::Email, "Invalid email address");
        }

        let address = self.address.trim();
        if address.chars().count() < 5 {
            fail(CheckoutField::Address, "Address is required");
        }

        let city = self.city.trim();
        if city.chars().count() < 2 {
            fail(CheckoutField::City, "City is required");
        }

        let postal_code = self.postal_code.trim();
        if !POSTAL_CODE.is_match(postal_code) {
            fail(CheckoutField::PostalCode, "Invalid postal code (e.g. 12345)");
        }

        let country = self.country.trim();
        if country.chars().count() < 2 {
            fail(CheckoutField::Country, "Country is required");
        }

        match email {
            Ok(email) if errors.is_empty() => Ok(ValidatedCheckout {
                name: name.to_owned(),
                email,
                address: address.to_owned(),
                city: city.to_owned(),
                postal_code: postal_code.to_owned(),
                country: country.to_owned(),
            }),
            _ => Err(ValidationErrors { errors }),
        }
    }
}

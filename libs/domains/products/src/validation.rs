//! Validation and coercion of raw product JSON.
//!
//! Runs in two passes. The first checks every key for presence, `null`, JSON
//! type and category membership, coercing numbers on the way. The second runs
//! the length and range rules through [`ProductDraft`]. Every problem from both
//! passes is reported together.

use std::str::FromStr;

use axum_helpers::FieldErrors;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal::prelude::FromPrimitive;
use serde_json::{Map, Value};
use validator::Validate;

use crate::models::{NewProduct, ProductCategory, ProductChanges};

pub const REQUIRED: &str = "This field is required.";
pub const NULL: &str = "Field cannot be null.";
pub const INVALID: &str = "Invalid value provided.";
pub const UNKNOWN_FIELD: &str = "Unknown field.";
pub const INVALID_INPUT_TYPE: &str = "Invalid input type.";
pub const CATEGORY_MESSAGE: &str =
    "Category must be one of: Electronics, Clothing, Grocery, Furniture, Stationery.";

const FIELDS: [&str; 5] = ["name", "category", "quantity", "price", "sku"];

/// Typed values awaiting the rule checks.
#[derive(Debug, Default, Validate)]
struct ProductDraft {
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters."))]
    name: Option<String>,
    category: Option<ProductCategory>,
    #[validate(range(min = 0, message = "Quantity cannot be negative."))]
    quantity: Option<i64>,
    #[validate(range(min = 0.01, message = "Price must be greater than 0."))]
    price: Option<f64>,
    /// Exact value stored when the rules pass
    #[validate(skip)]
    price_decimal: Option<Decimal>,
    #[validate(length(min = 4, max = 20, message = "SKU must be between 4 and 20 characters."))]
    sku: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Full,
    Partial,
}

/// Validates a create payload; every field is required.
pub fn validate_new_product(input: &Value) -> Result<NewProduct, FieldErrors> {
    let draft = check(input, Mode::Full)?;

    match (draft.name, draft.category, draft.quantity, draft.price_decimal, draft.sku) {
        (Some(name), Some(category), Some(quantity), Some(price), Some(sku)) => Ok(NewProduct {
            name,
            category,
            quantity: quantity as i32,
            price,
            sku,
        }),
        // check() reports every absent field in full mode
        _ => Err(missing_fields(input)),
    }
}

/// Validates an update payload; only the present fields are checked.
pub fn validate_product_changes(input: &Value) -> Result<ProductChanges, FieldErrors> {
    let draft = check(input, Mode::Partial)?;

    Ok(ProductChanges {
        name: draft.name,
        category: draft.category,
        quantity: draft.quantity.map(|q| q as i32),
        price: draft.price_decimal,
        sku: draft.sku,
    })
}

fn check(input: &Value, mode: Mode) -> Result<ProductDraft, FieldErrors> {
    let Some(object) = input.as_object() else {
        let mut errors = FieldErrors::new();
        errors.add(FieldErrors::SCHEMA, INVALID_INPUT_TYPE);
        return Err(errors);
    };

    let mut errors = FieldErrors::new();
    let mut draft = ProductDraft::default();

    for key in object.keys() {
        if !FIELDS.contains(&key.as_str()) {
            errors.add(key.as_str(), UNKNOWN_FIELD);
        }
    }

    if let Some(value) = field(object, "name", mode, &mut errors) {
        draft.name = coerce_string(value, "name", &mut errors);
    }
    if let Some(value) = field(object, "category", mode, &mut errors) {
        draft.category = coerce_category(value, &mut errors);
    }
    if let Some(value) = field(object, "quantity", mode, &mut errors) {
        draft.quantity = coerce_quantity(value, &mut errors);
    }
    if let Some(value) = field(object, "price", mode, &mut errors) {
        if let Some((float, decimal)) = coerce_price(value, &mut errors) {
            draft.price = Some(float);
            draft.price_decimal = Some(decimal);
        }
    }
    if let Some(value) = field(object, "sku", mode, &mut errors) {
        draft.sku = coerce_string(value, "sku", &mut errors);
    }

    if let Err(rule_errors) = draft.validate() {
        errors.merge(rule_errors);
    }

    errors.into_result().map(|()| draft)
}

/// Returns the non-null value of `key`, recording missing and null errors.
fn field<'a>(
    object: &'a Map<String, Value>,
    key: &'static str,
    mode: Mode,
    errors: &mut FieldErrors,
) -> Option<&'a Value> {
    match object.get(key) {
        None => {
            if mode == Mode::Full {
                errors.add(key, REQUIRED);
            }
            None
        }
        Some(Value::Null) => {
            errors.add(key, NULL);
            None
        }
        Some(value) => Some(value),
    }
}

fn coerce_string(value: &Value, key: &'static str, errors: &mut FieldErrors) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        _ => {
            errors.add(key, INVALID);
            None
        }
    }
}

fn coerce_category(value: &Value, errors: &mut FieldErrors) -> Option<ProductCategory> {
    let Value::String(raw) = value else {
        errors.add("category", INVALID);
        return None;
    };

    match ProductCategory::from_str(raw) {
        Ok(category) => Some(category),
        Err(_) => {
            errors.add("category", CATEGORY_MESSAGE);
            None
        }
    }
}

/// Integers, integral floats and numeric strings; the result must fit the
/// 32-bit column.
fn coerce_quantity(value: &Value, errors: &mut FieldErrors) -> Option<i64> {
    let parsed = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    match parsed.filter(|q| i32::try_from(*q).is_ok()) {
        Some(quantity) => Some(quantity),
        None => {
            errors.add("quantity", INVALID);
            None
        }
    }
}

/// Numbers and numeric strings. The stored value is rounded to two places;
/// the rule check sees the value as sent.
fn coerce_price(value: &Value, errors: &mut FieldErrors) -> Option<(f64, Decimal)> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    let decimal = parsed.filter(|f| f.is_finite()).and_then(|f| {
        Decimal::from_f64(f)
            .map(|d| (f, d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)))
    });

    if decimal.is_none() {
        errors.add("price", INVALID);
    }
    decimal
}

fn missing_fields(input: &Value) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for key in FIELDS {
        if input.get(key).is_none_or(Value::is_null) {
            errors.add(key, REQUIRED);
        }
    }
    errors
}

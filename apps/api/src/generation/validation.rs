//! Request validation. Collects every missing or invalid field before failing.

use anyhow::anyhow;
use serde_json::Value;

use crate::errors::AppError;
use crate::models::offer::{is_truthy, render_list_item, render_value, OfferRequest};

/// Units are written as a path-like suffix: `/kg`, `/stk`, `/pk`.
pub const UNIT_SEPARATOR: char = '/';

/// A request that passed validation, with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidOffer {
    pub product: String,
    pub price: String,
    pub unit: String,
    /// `None` when absent or empty; the prompt omits the line entirely.
    pub pickup_note: Option<String>,
    pub extra_note: Option<String>,
    pub tones: Vec<String>,
    pub emojis: bool,
}

/// Validates `product`, `price` and `unit` all at once.
///
/// Fails with `AppError::InvalidFields` listing the offending field names in
/// the order `product`, `price`, `unit`. Optional fields are only looked at
/// once the required ones pass.
pub fn validate_offer(request: OfferRequest) -> Result<ValidOffer, AppError> {
    let mut invalid = Vec::new();

    let product = present(request.product).map(|v| render_value(&v));
    if product.is_none() {
        invalid.push("product");
    }

    let price = present(request.price).map(|v| render_value(&v));
    if price.is_none() {
        invalid.push("price");
    }

    let unit = present(request.unit)
        .map(|v| render_value(&v))
        .filter(|u| u.starts_with(UNIT_SEPARATOR));
    if unit.is_none() {
        invalid.push("unit");
    }

    let (Some(product), Some(price), Some(unit)) = (product, price, unit) else {
        return Err(AppError::InvalidFields(invalid));
    };

    Ok(ValidOffer {
        product,
        price,
        unit,
        pickup_note: present(request.pickup_note).map(|v| render_value(&v)),
        extra_note: present(request.extra_note).map(|v| render_value(&v)),
        tones: tone_list(request.tones)?,
        emojis: request.emojis.as_ref().map_or(true, is_truthy),
    })
}

fn present(value: Option<Value>) -> Option<Value> {
    value.filter(is_truthy)
}

/// A list of tags, or a single tag given as a bare string.
fn tone_list(tones: Option<Value>) -> Result<Vec<String>, AppError> {
    match tones {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items.iter().map(render_list_item).collect()),
        Some(Value::String(s)) if s.is_empty() => Ok(Vec::new()),
        Some(Value::String(s)) => Ok(vec![s]),
        Some(other) => Err(AppError::Internal(anyhow!(
            "tones must be a list of strings, got {other}"
        ))),
    }
}

//! Order request validation
//!
//! Decodes the raw request body into an `OrderRequest` and checks each field
//! against its declared constraints. Fields are checked in declaration order
//! and each field reports at most its first violated constraint, so the
//! resulting error list is deterministic.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::api::responses::FieldError;
use crate::models::{
    NewOrder, OrderRequest, OrderType, MAX_SYMBOL_LEN, PRICE_LIMIT, PRICE_SCALE,
};

/// A declared field constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Field must be present and non-empty
    Required,
    /// Field must be strictly greater than the bound
    GreaterThan(i64),
    /// Field must be strictly less than the bound
    LessThan(i64),
    /// Field must have at most this many decimal places
    MaxDecimals(u32),
    /// Field must be one of the listed literals
    OneOf(&'static [&'static str]),
    /// Field must be at most this many characters
    MaxLength(usize),
}

impl Constraint {
    /// Short constraint name, as used in fallback messages
    pub fn kind(&self) -> &'static str {
        match self {
            Constraint::Required => "required",
            Constraint::GreaterThan(_) => "gt",
            Constraint::LessThan(_) => "lt",
            Constraint::MaxDecimals(_) => "decimals",
            Constraint::OneOf(_) => "oneof",
            Constraint::MaxLength(_) => "max",
        }
    }

    /// Human-readable message for a violation on `field`
    pub fn message(&self, field: &str) -> String {
        match self {
            Constraint::Required => format!("{} is required", field),
            Constraint::GreaterThan(bound) => format!("{} must be greater than {}", field, bound),
            Constraint::OneOf(allowed) => {
                format!("{} must be one of: {}", field, allowed.join(" "))
            }
            other => format!("{} failed validation: {}", field, other.kind()),
        }
    }
}

/// A constraint that a request field failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: &'static str,
    pub constraint: Constraint,
}

impl Violation {
    fn new(field: &'static str, constraint: Constraint) -> Self {
        Self { field, constraint }
    }
}

impl From<Violation> for FieldError {
    fn from(violation: Violation) -> Self {
        let field = violation.field.to_lowercase();
        Self {
            message: violation.constraint.message(&field),
            field,
        }
    }
}

/// Why a create request was rejected
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Malformed request body: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Validation failed on {} field(s)", .0.len())]
    Invalid(Vec<FieldError>),
}

/// Decode and validate a create-order request body
///
/// # Returns
/// * `Ok(NewOrder)` when every field satisfies its constraints
/// * `Err(RequestError::Malformed)` when the body is not a JSON object of
///   the expected shape
/// * `Err(RequestError::Invalid)` with one entry per offending field
pub fn validate_order_request(body: &[u8]) -> Result<NewOrder, RequestError> {
    let request: OrderRequest = serde_json::from_slice(body)?;
    validate(request)
}

/// Validate an already decoded request
pub fn validate(request: OrderRequest) -> Result<NewOrder, RequestError> {
    let symbol = check_symbol(request.symbol);
    let price = check_price(request.price);
    let quantity = check_quantity(request.quantity);
    let order_type = check_order_type(request.order_type.as_deref());

    match (symbol, price, quantity, order_type) {
        (Ok(symbol), Ok(price), Ok(quantity), Ok(order_type)) => {
            Ok(NewOrder::new(symbol, price, quantity, order_type))
        }
        (symbol, price, quantity, order_type) => {
            let errors = [symbol.err(), price.err(), quantity.err(), order_type.err()]
                .into_iter()
                .flatten()
                .map(FieldError::from)
                .collect();

            Err(RequestError::Invalid(errors))
        }
    }
}

fn check_symbol(symbol: Option<String>) -> Result<String, Violation> {
    match symbol {
        None => Err(Violation::new("symbol", Constraint::Required)),
        Some(s) if s.is_empty() => Err(Violation::new("symbol", Constraint::Required)),
        Some(s) if s.chars().count() > MAX_SYMBOL_LEN => {
            Err(Violation::new("symbol", Constraint::MaxLength(MAX_SYMBOL_LEN)))
        }
        Some(s) => Ok(s),
    }
}

fn check_price(price: Option<Decimal>) -> Result<Decimal, Violation> {
    match price {
        None => Err(Violation::new("price", Constraint::Required)),
        Some(p) if p <= Decimal::ZERO => Err(Violation::new("price", Constraint::GreaterThan(0))),
        Some(p) if p >= Decimal::from(PRICE_LIMIT) => {
            Err(Violation::new("price", Constraint::LessThan(PRICE_LIMIT)))
        }
        Some(p) if p.normalize().scale() > PRICE_SCALE => {
            Err(Violation::new("price", Constraint::MaxDecimals(PRICE_SCALE)))
        }
        Some(p) => Ok(p),
    }
}

fn check_quantity(quantity: Option<i32>) -> Result<i32, Violation> {
    match quantity {
        None => Err(Violation::new("quantity", Constraint::Required)),
        Some(q) if q <= 0 => Err(Violation::new("quantity", Constraint::GreaterThan(0))),
        Some(q) => Ok(q),
    }
}

fn check_order_type(order_type: Option<&str>) -> Result<OrderType, Violation> {
    match order_type {
        None | Some("") => Err(Violation::new("order_type", Constraint::Required)),
        Some(value) => value
            .parse::<OrderType>()
            .map_err(|_| Violation::new("order_type", Constraint::OneOf(&OrderType::ALLOWED))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn invalid_fields(body: &str) -> Vec<FieldError> {
        match validate_order_request(body.as_bytes()) {
            Err(RequestError::Invalid(errors)) => errors,
            other => panic!("expected validation errors, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_request() {
        let order = validate_order_request(
            br#"{"symbol":"AAPL","price":150.5,"quantity":10,"order_type":"BUY"}"#,
        )
        .unwrap();

        assert_eq!(
            order,
            NewOrder::new("AAPL".to_string(), dec!(150.5), 10, OrderType::Buy)
        );
    }

    #[test]
    fn test_integer_price_accepted() {
        let order = validate_order_request(
            br#"{"symbol":"MSFT","price":250,"quantity":1,"order_type":"SELL"}"#,
        )
        .unwrap();

        assert_eq!(order.price, dec!(250));
        assert_eq!(order.order_type, OrderType::Sell);
    }

    #[test]
    fn test_missing_symbol() {
        let errors = invalid_fields(r#"{"price":150.5,"quantity":10,"order_type":"BUY"}"#);

        assert_eq!(
            errors,
            vec![FieldError {
                field: "symbol".to_string(),
                message: "symbol is required".to_string(),
            }]
        );
    }

    #[test]
    fn test_non_positive_price_and_quantity() {
        let errors =
            invalid_fields(r#"{"symbol":"AAPL","price":-1,"quantity":0,"order_type":"BUY"}"#);

        let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["price must be greater than 0", "quantity must be greater than 0"]
        );
    }

    #[test]
    fn test_price_must_fit_the_column() {
        for (price, message) in [
            ("0.001", "price failed validation: decimals"),
            ("150.555", "price failed validation: decimals"),
            ("1e14", "price failed validation: lt"),
            ("10000000000000", "price failed validation: lt"),
        ] {
            let body = format!(
                r#"{{"symbol":"AAPL","price":{},"quantity":1,"order_type":"BUY"}}"#,
                price
            );
            let errors = invalid_fields(&body);

            assert_eq!(errors.len(), 1, "price {}", price);
            assert_eq!(errors[0].field, "price");
            assert_eq!(errors[0].message, message);
        }
    }

    #[test]
    fn test_two_decimal_price_accepted() {
        let order = validate_order_request(
            br#"{"symbol":"AAPL","price":9999999999999.99,"quantity":1,"order_type":"BUY"}"#,
        )
        .unwrap();

        assert_eq!(order.price, dec!(9999999999999.99));
    }

    #[test]
    fn test_invalid_order_type() {
        let errors =
            invalid_fields(r#"{"symbol":"AAPL","price":1.5,"quantity":1,"order_type":"INVALID"}"#);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "order_type");
        assert_eq!(errors[0].message, "order_type must be one of: BUY SELL");
    }

    #[test]
    fn test_empty_object_reports_every_field_in_order() {
        let errors = invalid_fields("{}");

        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["symbol", "price", "quantity", "order_type"]);
        assert!(errors.iter().all(|e| e.message.ends_with("is required")));
    }

    #[test]
    fn test_symbol_too_long_uses_fallback_message() {
        let body = format!(
            r#"{{"symbol":"{}","price":1,"quantity":1,"order_type":"BUY"}}"#,
            "X".repeat(MAX_SYMBOL_LEN + 1)
        );
        let errors = invalid_fields(&body);

        assert_eq!(errors[0].message, "symbol failed validation: max");
    }

    #[test]
    fn test_malformed_body() {
        for body in ["invalid json", "", "null", "42", r#"{"quantity":"ten"}"#] {
            assert!(
                matches!(
                    validate_order_request(body.as_bytes()),
                    Err(RequestError::Malformed(_))
                ),
                "body {:?} should be malformed",
                body
            );
        }
    }

    #[test]
    fn test_constraint_messages() {
        assert_eq!(Constraint::Required.message("symbol"), "symbol is required");
        assert_eq!(
            Constraint::GreaterThan(0).message("price"),
            "price must be greater than 0"
        );
        assert_eq!(
            Constraint::OneOf(&["BUY", "SELL"]).message("order_type"),
            "order_type must be one of: BUY SELL"
        );
        assert_eq!(
            Constraint::MaxLength(20).message("symbol"),
            "symbol failed validation: max"
        );
        assert_eq!(
            Constraint::MaxDecimals(2).message("price"),
            "price failed validation: decimals"
        );
    }

    #[test]
    fn test_field_names_lower_cased() {
        let error = FieldError::from(Violation::new("Symbol", Constraint::Required));

        assert_eq!(error.field, "symbol");
        assert_eq!(error.message, "symbol is required");
    }
}

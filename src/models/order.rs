use chrono::{DateTime, Utc};
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::serialize::{self, Output, ToSql};
use diesel::sql_types::Text;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::str::FromStr;
use utoipa::ToSchema;

/// Maximum symbol length, matches the `VARCHAR(20)` column
pub const MAX_SYMBOL_LEN: usize = 20;

/// Decimal places kept by the `price NUMERIC(15, 2)` column
pub const PRICE_SCALE: u32 = 2;

/// Exclusive upper bound on prices, from the column's 13 integer digits
pub const PRICE_LIMIT: i64 = 10_000_000_000_000;

/// Whether `price` is stored by the `price` column exactly as given
pub fn fits_price_column(price: &Decimal) -> bool {
    price.normalize().scale() <= PRICE_SCALE && *price < Decimal::from(PRICE_LIMIT)
}

/// A persisted trade order
///
/// Orders are immutable once stored: the only way to obtain one is through
/// `OrderRepository::create` or `OrderRepository::list`.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = crate::database::schema::orders)]
#[diesel(primary_key(id))]
pub struct Order {
    /// Server-assigned identifier
    #[schema(example = 1)]
    pub id: i64,

    /// Instrument ticker (e.g., "AAPL")
    #[schema(example = "AAPL")]
    pub symbol: String,

    /// Limit price, always positive
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 150.5)]
    pub price: Decimal,

    /// Number of units, always positive
    #[schema(example = 10)]
    pub quantity: i32,

    pub order_type: OrderType,

    /// Insertion time, assigned by the persistence layer
    pub created_at: DateTime<Utc>,
}

/// Order side as stored and serialized: `BUY` or `SELL`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    Buy,
    Sell,
}

impl OrderType {
    /// Literals accepted on the wire, in declaration order
    pub const ALLOWED: [&'static str; 2] = ["BUY", "SELL"];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Buy => "BUY",
            OrderType::Sell => "SELL",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BUY" => Ok(OrderType::Buy),
            "SELL" => Ok(OrderType::Sell),
            other => Err(format!("Invalid order type value: {}", other)),
        }
    }
}

// Stored as the upper-case literal in a VARCHAR column
impl ToSql<Text, Pg> for OrderType {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(serialize::IsNull::No)
    }
}

impl FromSql<Text, Pg> for OrderType {
    fn from_sql(bytes: <Pg as diesel::backend::Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let text = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
        text.parse::<OrderType>().map_err(Into::into)
    }
}

/// Client-supplied order fields, before validation
///
/// Every field is optional at decode time so that a missing field surfaces
/// as a per-field validation error rather than a decode failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct OrderRequest {
    #[schema(example = "AAPL")]
    #[serde(default)]
    pub symbol: Option<String>,

    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>, example = 150.5)]
    pub price: Option<Decimal>,

    #[schema(example = 10)]
    #[serde(default)]
    pub quantity: Option<i32>,

    /// One of `BUY`, `SELL`
    #[schema(example = "BUY")]
    #[serde(default)]
    pub order_type: Option<String>,
}

/// A validated order that has not been persisted yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub symbol: String,
    pub price: Decimal,
    pub quantity: i32,
    pub order_type: OrderType,
}

impl NewOrder {
    pub fn new(symbol: String, price: Decimal, quantity: i32, order_type: OrderType) -> Self {
        Self {
            symbol,
            price,
            quantity,
            order_type,
        }
    }

    /// Check the invariants every persisted order must satisfy
    pub fn check_invariants(&self) -> Result<(), &'static str> {
        if self.symbol.is_empty() {
            return Err("symbol cannot be empty");
        }
        if self.price <= Decimal::ZERO {
            return Err("price must be positive");
        }
        if !fits_price_column(&self.price) {
            return Err("price exceeds NUMERIC(15, 2)");
        }
        if self.quantity <= 0 {
            return Err("quantity must be positive");
        }
        Ok(())
    }

    /// Combine with the fields assigned at insertion time
    pub fn into_order(self, id: i64, created_at: DateTime<Utc>) -> Order {
        Order {
            id,
            symbol: self.symbol,
            price: self.price,
            quantity: self.quantity,
            order_type: self.order_type,
            created_at,
        }
    }
}

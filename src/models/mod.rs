pub mod order;

pub use order::{NewOrder, Order, OrderRequest, OrderType, MAX_SYMBOL_LEN};
pub use order::{fits_price_column, PRICE_LIMIT, PRICE_SCALE};

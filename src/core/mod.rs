mod error;
mod filter;
mod row;

pub use error::DbError;
pub use filter::RowFilter;
pub use row::{FIELD_SEPARATOR, Row};

pub mod converter;
pub mod error;
pub mod mapping;
pub mod record;
pub mod schema;
pub mod value;

pub use record::Record;
pub use recast_derive::Record;

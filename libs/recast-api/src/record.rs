use std::any::Any;

use crate::error::InstantiationError;
use crate::schema::Shape;

/// A record-shaped type the mapper can read from and write into.
///
/// Normally produced by `#[derive(Record)]`. The shape is built once per type
/// and lives for the rest of the process.
pub trait Record: Any + Sized {
    fn shape() -> &'static Shape<Self>;

    /// Zero-argument construction used by `Mapper::map_to_new`.
    ///
    /// The derive forwards to `Default`; types marked `#[record(no_default)]`
    /// return `InstantiationError`.
    fn instantiate() -> Result<Self, InstantiationError>;
}

pub mod chain;
pub mod config;
pub mod converters;
pub mod error;
pub mod mapper;
pub mod plan;

pub use chain::{Converted, ConverterChain, ResolvedConverter};
pub use config::MapperConfig;
pub use error::MapperError;
pub use mapper::Mapper;

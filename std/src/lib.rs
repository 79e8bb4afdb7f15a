//! Standard connectors for Switchyard.
//!
//! * `RuleConnector`: hand-authored negotiators under one name.
//! * `CatalogConnector`: derives edges from a `TypeCatalog` by probing every type pair.
//! * `builtin`: text, bytes and JSON conversions ready to register.

pub mod builtin;
pub mod catalog;
pub mod prelude;
pub mod rule;

pub use builtin::{builtin_provider, bytes_connector, json_connector, text_connector};
pub use catalog::{CatalogConnector, ConversionCatalog, TypeCatalog};
pub use rule::RuleConnector;

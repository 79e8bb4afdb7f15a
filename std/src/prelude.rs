pub use crate::builtin::{builtin_provider, bytes_connector, json_connector, text_connector};
pub use crate::catalog::{CatalogConnector, ConversionCatalog, TypeCatalog};
pub use crate::rule::RuleConnector;

//! Built-in connectors for everyday value shapes.
//!
//! | Connector | Edges |
//! |-----------|-------|
//! | `text`    | `String` to and from `i64`, `f64`, `bool` (parsing may fail) |
//! | `bytes`   | `Vec<u8>` to and from `String[text/plain]` (utf-8), plus zero-cost retagging |
//! | `json`    | `serde_json::Value` to and from `String[application/json]` and `Vec<u8>[application/json]` |

use crate::catalog::{CatalogConnector, ConversionCatalog};
use crate::rule::RuleConnector;
use switchyard_core::connector::StaticConnectorProvider;
use switchyard_core::negotiator::Negotiator;

pub const TEXT_PLAIN: &str = "text/plain";
pub const APPLICATION_JSON: &str = "application/json";

/// Scalars rendered as and parsed from text.
pub fn text_connector() -> CatalogConnector<ConversionCatalog> {
    let catalog = ConversionCatalog::new()
        .register(|n: i64| n.to_string())
        .register_try(|s: String| s.trim().parse::<i64>())
        .register(|n: f64| n.to_string())
        .register_try(|s: String| s.trim().parse::<f64>())
        .register(|b: bool| b.to_string())
        .register_try(|s: String| s.trim().parse::<bool>());
    CatalogConnector::new("text", catalog)
}

/// UTF-8 decoding and encoding between raw bytes and plain text.
pub fn bytes_connector() -> RuleConnector {
    RuleConnector::new("bytes")
        .rule(
            Negotiator::try_convert(String::from_utf8)
                .as_content_type(TEXT_PLAIN)
                .labeled("utf8-decode")
                .build(),
        )
        .rule(
            Negotiator::convert(String::into_bytes)
                .of_content_type(TEXT_PLAIN)
                .labeled("utf8-encode")
                .build(),
        )
        .rule(
            Negotiator::convert(|s: String| s)
                .of_content_type(TEXT_PLAIN)
                .with_weight(0.0)
                .labeled("untag-text")
                .build(),
        )
        .rule(
            Negotiator::convert(|s: String| s)
                .as_content_type(TEXT_PLAIN)
                .with_weight(0.0)
                .labeled("tag-text")
                .build(),
        )
}

/// JSON documents serialised as text or bytes.
pub fn json_connector() -> RuleConnector {
    use serde_json::Value;

    RuleConnector::new("json")
        .rule(
            Negotiator::try_convert(|v: Value| serde_json::to_string(&v))
                .as_content_type(APPLICATION_JSON)
                .labeled("json-serialize")
                .build(),
        )
        .rule(
            Negotiator::try_convert(|s: String| serde_json::from_str::<Value>(&s))
                .of_content_type(APPLICATION_JSON)
                .labeled("json-parse")
                .build(),
        )
        .rule(
            Negotiator::try_convert(|v: Value| serde_json::to_vec(&v))
                .as_content_type(APPLICATION_JSON)
                .labeled("json-serialize-bytes")
                .build(),
        )
        .rule(
            Negotiator::try_convert(|b: Vec<u8>| serde_json::from_slice::<Value>(&b))
                .of_content_type(APPLICATION_JSON)
                .labeled("json-parse-bytes")
                .build(),
        )
}

/// Every built-in connector, ready for `NegotiationBuilder::provider`.
pub fn builtin_provider() -> StaticConnectorProvider {
    StaticConnectorProvider::new()
        .with(text_connector())
        .with(bytes_connector())
        .with(json_connector())
}

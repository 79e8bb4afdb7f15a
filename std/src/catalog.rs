//! # Catalog Connectors
//!
//! A `TypeCatalog` knows a set of types and, for any ordered pair, whether it
//! can convert between them. `CatalogConnector` turns that knowledge into
//! edges by probing every pair of distinct types in both directions.

use ahash::AHashMap;
use std::any::Any;
use switchyard_core::connector::Connector;
use switchyard_core::negotiator::{Negotiator, Transform, typed_transform};
use switchyard_core::state::{State, TypeKey};

/// A source of runtime-discoverable conversions.
pub trait TypeCatalog: Send + Sync {
    /// Every type the catalog knows about.
    fn types(&self) -> Vec<TypeKey>;

    /// Conversion from `from` to `to`, if the catalog supports one.
    fn converter(&self, from: TypeKey, to: TypeKey) -> Option<Transform>;
}

/// Connector that asks a `TypeCatalog` about every pair of its types.
#[derive(Debug, Clone)]
pub struct CatalogConnector<C> {
    name: String,
    catalog: C,
    weight: f64,
}

impl<C: TypeCatalog> CatalogConnector<C> {
    pub fn new(name: impl Into<String>, catalog: C) -> Self {
        Self {
            name: name.into(),
            catalog,
            weight: switchyard_core::config::DEFAULT_WEIGHT,
        }
    }

    /// Weight given to every edge this connector produces.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    fn edge(&self, from: TypeKey, to: TypeKey) -> Option<Negotiator> {
        let transform = self.catalog.converter(from, to)?;
        Some(Negotiator::from_parts(
            State::new(from, None),
            State::new(to, None),
            self.weight,
            transform,
        ))
    }
}

impl<C: TypeCatalog> Connector for CatalogConnector<C> {
    fn name(&self) -> &str {
        &self.name
    }

    fn configure(&self) -> Vec<Negotiator> {
        let mut types = self.catalog.types();
        let mut seen = ahash::AHashSet::new();
        types.retain(|key| seen.insert(*key));

        let mut negotiators = Vec::new();
        for (i, &a) in types.iter().enumerate() {
            for &b in &types[i + 1..] {
                negotiators.extend(self.edge(a, b));
                negotiators.extend(self.edge(b, a));
            }
        }
        tracing::debug!(
            connector = %self.name,
            types = types.len(),
            edges = negotiators.len(),
            "Catalog probed"
        );
        negotiators
    }
}

/// In-memory `TypeCatalog` filled by explicit registration.
#[derive(Default, Clone)]
pub struct ConversionCatalog {
    types: Vec<TypeKey>,
    converters: AHashMap<(TypeKey, TypeKey), Transform>,
}

impl ConversionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an infallible conversion from `A` to `B`.
    pub fn register<A, B, F>(self, f: F) -> Self
    where
        A: Any + Send,
        B: Any + Send,
        F: Fn(A) -> B + Send + Sync + 'static,
    {
        self.register_try::<A, B, std::convert::Infallible, _>(move |a| Ok(f(a)))
    }

    /// Register a fallible conversion from `A` to `B`.
    pub fn register_try<A, B, E, F>(mut self, f: F) -> Self
    where
        A: Any + Send,
        B: Any + Send,
        E: Into<anyhow::Error>,
        F: Fn(A) -> Result<B, E> + Send + Sync + 'static,
    {
        let from = TypeKey::of::<A>();
        let to = TypeKey::of::<B>();
        self.note(from);
        self.note(to);
        self.converters.insert((from, to), typed_transform(f));
        self
    }

    /// Register `B::from`.
    pub fn register_from<A, B>(self) -> Self
    where
        A: Any + Send,
        B: From<A> + Any + Send,
    {
        self.register::<A, B, _>(B::from)
    }

    /// Register `B::try_from`.
    pub fn register_try_from<A, B>(self) -> Self
    where
        A: Any + Send,
        B: TryFrom<A> + Any + Send,
        <B as TryFrom<A>>::Error: Into<anyhow::Error>,
    {
        self.register_try::<A, B, _, _>(B::try_from)
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    fn note(&mut self, key: TypeKey) {
        if !self.types.contains(&key) {
            self.types.push(key);
        }
    }
}

impl TypeCatalog for ConversionCatalog {
    fn types(&self) -> Vec<TypeKey> {
        self.types.clone()
    }

    fn converter(&self, from: TypeKey, to: TypeKey) -> Option<Transform> {
        self.converters.get(&(from, to)).cloned()
    }
}

impl std::fmt::Debug for ConversionCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversionCatalog")
            .field("types", &self.types)
            .field("converters", &self.converters.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widening() -> ConversionCatalog {
        ConversionCatalog::new()
            .register_from::<u8, u16>()
            .register_from::<u16, u32>()
            .register_try_from::<u32, u8>()
    }

    #[test]
    fn test_one_edge_per_convertible_direction() {
        let connector = CatalogConnector::new("widening", widening()).with_weight(2.0);
        let edges = connector.configure();

        assert_eq!(edges.len(), 3);
        assert_eq!(connector.catalog().len(), 3);
        assert!(edges.iter().all(|n| n.weight() == 2.0));
        assert!(
            edges
                .iter()
                .any(|n| n.source() == &State::of::<u32>() && n.target() == &State::of::<u8>())
        );
        assert!(
            !edges
                .iter()
                .any(|n| n.source() == &State::of::<u16>() && n.target() == &State::of::<u8>())
        );
    }

    #[test]
    fn test_catalog_edges_execute() {
        let edges = CatalogConnector::new("widening", widening()).configure();
        let narrow = edges
            .iter()
            .find(|n| n.target() == &State::of::<u8>())
            .unwrap();

        let ok = narrow.execute(Box::new(200u32)).unwrap();
        assert_eq!(*ok.downcast::<u8>().unwrap(), 200);
        assert!(narrow.execute(Box::new(300u32)).is_err());
    }

    #[test]
    fn test_types_are_deduplicated() {
        let catalog = widening();
        assert_eq!(catalog.types().len(), 3);
        assert_eq!(catalog.len(), 3);
        assert!(catalog.converter(TypeKey::of::<u8>(), TypeKey::of::<u32>()).is_none());
    }

    struct Duplicating;

    impl TypeCatalog for Duplicating {
        fn types(&self) -> Vec<TypeKey> {
            vec![TypeKey::of::<i8>(), TypeKey::of::<i16>(), TypeKey::of::<i8>()]
        }

        fn converter(&self, from: TypeKey, to: TypeKey) -> Option<Transform> {
            (from == TypeKey::of::<i8>() && to == TypeKey::of::<i16>())
                .then(|| typed_transform(|x: i8| Ok::<_, std::convert::Infallible>(x as i16)))
        }
    }

    #[test]
    fn test_duplicate_catalog_types_probe_once() {
        let edges = CatalogConnector::new("dup", Duplicating).configure();
        assert_eq!(edges.len(), 1);
    }
}

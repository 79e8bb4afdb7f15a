//! # Negotiation: Build Once, Query Many
//!
//! `Negotiation` owns the long-lived base graph, a router and an optional
//! route cache. Queries that need extra, query-local edges are answered over a
//! `MergedNegotiationGraph` and never touch the base graph or the cache.
//!
//! ## Example
//!
//! ```rust,ignore
//! let negotiation = Negotiation::builder()
//!     .provider(builtin_provider())
//!     .negotiator(Negotiator::convert(|c: Celsius| Kelvin(c.0 + 273.15)).build())
//!     .build()?;
//!
//! let kelvin: Kelvin = negotiation.convert(Celsius(21.0))?;
//! ```

use crate::cache::RouteCache;
use crate::pipeline::Pipeline;
use std::any::Any;
use std::sync::Arc;
use switchyard_core::config::NegotiationConfig;
use switchyard_core::connector::{
    Connector, ConnectorProvider, NegotiatorProvider, StaticConnectorProvider,
};
use switchyard_core::error::{GraphConfigurationError, NegotiationError, NoRouteFound};
use switchyard_core::graph::{DefaultNegotiationGraph, MergedNegotiationGraph};
use switchyard_core::negotiator::Negotiator;
use switchyard_core::router::{DijkstraRouter, Router};
use switchyard_core::schematic::Schematic;
use switchyard_core::state::State;

/// Resolves and executes conversion pipelines over one shared base graph.
pub struct Negotiation {
    graph: Arc<DefaultNegotiationGraph>,
    router: Arc<dyn Router>,
    config: NegotiationConfig,
    cache: Option<RouteCache>,
}

impl Negotiation {
    pub fn builder() -> NegotiationBuilder {
        NegotiationBuilder::default()
    }

    /// Wrap an already built graph with the default router and config.
    pub fn new(graph: DefaultNegotiationGraph) -> Self {
        Self::with_parts(
            Arc::new(graph),
            Arc::new(DijkstraRouter),
            NegotiationConfig::default(),
        )
    }

    fn with_parts(
        graph: Arc<DefaultNegotiationGraph>,
        router: Arc<dyn Router>,
        config: NegotiationConfig,
    ) -> Self {
        let cache = config
            .route_cache
            .then(|| RouteCache::new(config.route_cache_capacity));
        Self {
            graph,
            router,
            config,
            cache,
        }
    }

    pub fn graph(&self) -> &DefaultNegotiationGraph {
        &self.graph
    }

    pub fn shared_graph(&self) -> Arc<DefaultNegotiationGraph> {
        self.graph.clone()
    }

    pub fn config(&self) -> &NegotiationConfig {
        &self.config
    }

    pub fn cache(&self) -> Option<&RouteCache> {
        self.cache.as_ref()
    }

    /// Cheapest pipeline from `from` to `to` over the base graph.
    pub fn resolve(&self, from: &State, to: &State) -> Result<Pipeline, NoRouteFound> {
        if let Some(hit) = self.cache.as_ref().and_then(|cache| cache.get(from, to)) {
            tracing::trace!(%from, %to, "Route cache hit");
            return hit;
        }

        let result = self
            .router
            .route(self.graph.as_ref(), from, to)
            .map(Pipeline::new);

        if let Some(cache) = &self.cache {
            cache.insert(from.clone(), to.clone(), result.clone());
        }
        result
    }

    /// Cheapest pipeline over the base graph plus `extra` edges visible to this query only.
    ///
    /// Both endpoints are anchored with terminate negotiators, so they need not
    /// appear in the base graph.
    pub fn resolve_with(
        &self,
        extra: Vec<Negotiator>,
        from: &State,
        to: &State,
    ) -> Result<Pipeline, NegotiationError> {
        let anchors = [
            Negotiator::terminate(from.clone()),
            Negotiator::terminate(to.clone()),
        ];
        let merged =
            MergedNegotiationGraph::new(self.graph.as_ref(), extra.into_iter().chain(anchors))?;
        let route = self.router.route(&merged, from, to)?;
        Ok(Pipeline::new(route))
    }

    /// First of `candidates`, in caller order, that `from` can reach.
    ///
    /// Content negotiation adapters pass the client's acceptable targets in
    /// preference order.
    pub fn resolve_any(&self, from: &State, candidates: &[State]) -> Option<Pipeline> {
        candidates
            .iter()
            .find_map(|candidate| self.resolve(from, candidate).ok())
    }

    /// Convert `input` into `Out` between untagged States.
    pub fn convert<In, Out>(&self, input: In) -> Result<Out, NegotiationError>
    where
        In: Any + Send,
        Out: Any + Send,
    {
        self.convert_tagged(input, None, None)
    }

    /// Convert `input` into `Out`, optionally pinning content types on either end.
    pub fn convert_tagged<In, Out>(
        &self,
        input: In,
        from_content_type: Option<&str>,
        to_content_type: Option<&str>,
    ) -> Result<Out, NegotiationError>
    where
        In: Any + Send,
        Out: Any + Send,
    {
        let from = State::new(switchyard_core::TypeKey::of::<In>(), from_content_type);
        let to = State::new(switchyard_core::TypeKey::of::<Out>(), to_content_type);
        let pipeline = self.resolve(&from, &to)?;
        Ok(pipeline.run(input)?)
    }

    /// Get the Schematic (structural view) of the base graph.
    pub fn schematic(&self, name: impl Into<String>) -> Schematic {
        Schematic::from_graph(name, self.graph.as_ref())
    }
}

impl std::fmt::Debug for Negotiation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Negotiation")
            .field("graph", &self.graph)
            .field("config", &self.config)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

/// Hand-registered negotiators, grouped under one connector.
struct ManualConnector {
    negotiators: Vec<Negotiator>,
}

impl Connector for ManualConnector {
    fn name(&self) -> &str {
        "manual"
    }

    fn configure(&self) -> Vec<Negotiator> {
        self.negotiators.clone()
    }
}

/// Registration surface: collects providers, connectors and loose negotiators.
#[derive(Default)]
pub struct NegotiationBuilder {
    providers: Vec<Arc<dyn ConnectorProvider>>,
    connectors: StaticConnectorProvider,
    negotiators: Vec<Negotiator>,
    router: Option<Arc<dyn Router>>,
    config: Option<NegotiationConfig>,
}

impl NegotiationBuilder {
    pub fn provider<P: ConnectorProvider + 'static>(mut self, provider: P) -> Self {
        self.providers.push(Arc::new(provider));
        self
    }

    pub fn connector<C: Connector + 'static>(mut self, connector: C) -> Self {
        self.connectors.push(Arc::new(connector));
        self
    }

    pub fn negotiator(mut self, negotiator: Negotiator) -> Self {
        self.negotiators.push(negotiator);
        self
    }

    pub fn router<R: Router + 'static>(mut self, router: R) -> Self {
        self.router = Some(Arc::new(router));
        self
    }

    pub fn config(mut self, config: NegotiationConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Configure every connector once, index the edges, and validate the result.
    pub fn build(self) -> Result<Negotiation, GraphConfigurationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let mut providers = self.providers;
        if !self.connectors.is_empty() {
            providers.push(Arc::new(self.connectors));
        }
        if !self.negotiators.is_empty() {
            let manual = StaticConnectorProvider::new().with(ManualConnector {
                negotiators: self.negotiators,
            });
            providers.push(Arc::new(manual));
        }

        let provider = NegotiatorProvider::new(providers);
        let graph = DefaultNegotiationGraph::new(&[&provider])?;
        let router = self.router.unwrap_or_else(|| Arc::new(DijkstraRouter));

        Ok(Negotiation::with_parts(Arc::new(graph), router, config))
    }
}

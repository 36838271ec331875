use std::sync::Arc;

use crate::{
    db::{MovieStore, WatchlistStore},
    services::{
        catalog::CatalogBackend, classifier::Classifier, ConceptMapper,
        RecommendationOrchestrator, RetryPolicy, SearchGateway,
    },
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: RecommendationOrchestrator,
    pub gateway: SearchGateway,
    pub movies: Arc<dyn MovieStore>,
    pub watchlist: Arc<dyn WatchlistStore>,
    pub classifier_configured: bool,
}

impl AppState {
    /// Wires the pipeline around the given collaborators
    pub fn new(
        backend: Arc<dyn CatalogBackend>,
        classifier: Option<Arc<dyn Classifier>>,
        mapper: ConceptMapper,
        movies: Arc<dyn MovieStore>,
        watchlist: Arc<dyn WatchlistStore>,
        retry: RetryPolicy,
    ) -> Self {
        let gateway = SearchGateway::new(backend, retry);
        let classifier_configured = classifier.is_some();
        let orchestrator = RecommendationOrchestrator::new(
            classifier,
            Arc::new(mapper),
            gateway.clone(),
            Arc::clone(&movies),
        );

        Self {
            orchestrator,
            gateway,
            movies,
            watchlist,
            classifier_configured,
        }
    }
}

pub mod catalog;
pub mod classifier;
pub mod concepts;
pub mod fallback;
pub mod recommendations;
pub mod retry;
pub mod seeds;

pub use catalog::SearchGateway;
pub use concepts::ConceptMapper;
pub use recommendations::RecommendationOrchestrator;
pub use retry::RetryPolicy;

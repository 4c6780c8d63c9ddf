pub mod data_fetcher;
pub mod form_analyzer;
pub mod head_to_head;
pub mod outcome_scorer;
pub mod predictor;
pub mod scoreline_estimator;

pub use data_fetcher::*;
pub use form_analyzer::*;
pub use head_to_head::*;
pub use outcome_scorer::*;
pub use predictor::*;
pub use scoreline_estimator::*;

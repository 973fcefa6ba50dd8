/// External collaborators of the recommender
///
/// The recommender never learns or stores anything itself: scores come from a
/// pre-trained model behind [`Predictor`], and a user's completed titles come from
/// a paginated list API behind [`CompletedListProvider`].
use crate::{
    error::AppResult,
    models::{ItemId, Prediction, UserId},
};

pub mod jikan;
pub mod prediction_server;

pub use jikan::JikanClient;
pub use prediction_server::PredictionServerClient;

/// Pre-trained rating model
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Predictor: Send + Sync {
    /// Estimates how `user` would rate `item`
    async fn predict(&self, user: &UserId, item: ItemId) -> AppResult<Prediction>;

    /// Predictor name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Source of the titles a user has already completed
///
/// Pages start at 1. The list is exhausted once a page comes back empty.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CompletedListProvider: Send + Sync {
    async fn fetch_completed_page(&self, user: &UserId, page: u32) -> AppResult<Vec<ItemId>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

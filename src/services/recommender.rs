use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::{
    error::AppResult,
    models::{Catalog, Fan, ItemId, Recommendation, UserId, UsernameTable},
    services::providers::{CompletedListProvider, Predictor},
};

/// Score given to titles the user has already completed
const COMPLETED_SCORE: f64 = 0.0;

/// Turns a pre-trained model into "recommend titles" and "find fans" queries
///
/// The catalog and username table are fixed once the recommender is built; a
/// changed table means building a new recommender.
pub struct Recommender {
    predictor: Arc<dyn Predictor>,
    completed_lists: Arc<dyn CompletedListProvider>,
    usernames: UsernameTable,
    catalog: Catalog,
    /// Known users, in table order
    users: Vec<String>,
    page_delay: Duration,
}

impl Recommender {
    pub fn new(
        predictor: Arc<dyn Predictor>,
        completed_lists: Arc<dyn CompletedListProvider>,
        usernames: UsernameTable,
        catalog: Catalog,
        page_delay: Duration,
    ) -> Self {
        let users = usernames.usernames().map(str::to_string).collect();

        tracing::info!(
            catalog_size = catalog.len(),
            known_users = usernames.len(),
            predictor = predictor.name(),
            completed_lists = completed_lists.name(),
            "Recommender initialized"
        );

        Self {
            predictor,
            completed_lists,
            usernames,
            catalog,
            users,
            page_delay,
        }
    }

    pub fn resolve_user(&self, username: &str) -> UserId {
        self.usernames.resolve(username)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn users(&self) -> &[String] {
        &self.users
    }

    /// Top `count` catalog titles for `user`, best first
    ///
    /// With `filter_completed`, titles on the user's completed list score zero
    /// and aren't sent to the predictor. Equal scores keep catalog order.
    pub async fn get_recommendations(
        &self,
        user: &str,
        count: usize,
        filter_completed: bool,
    ) -> AppResult<Vec<Recommendation>> {
        let start = Instant::now();
        let uid = self.resolve_user(user);

        let completed = if filter_completed {
            self.fetch_completed(&uid).await?
        } else {
            HashSet::new()
        };

        let mut scored: Vec<(ItemId, f64)> = Vec::with_capacity(self.catalog.len());
        for entry in self.catalog.iter() {
            let est = if completed.contains(&entry.anime_id) {
                COMPLETED_SCORE
            } else {
                self.predictor.predict(&uid, entry.anime_id).await?.est
            };
            scored.push((entry.anime_id, est));
        }

        let recommendations: Vec<Recommendation> = top_n(scored, count)
            .into_iter()
            .filter_map(|(anime_id, est)| {
                self.catalog
                    .get(anime_id)
                    .map(|entry| entry.to_recommendation(est))
            })
            .collect();

        tracing::info!(
            user = %uid,
            completed = completed.len(),
            returned = recommendations.len(),
            processing_time_ms = start.elapsed().as_millis(),
            "Recommendations computed"
        );

        Ok(recommendations)
    }

    /// Top `count` known users for `item`, best first
    pub async fn get_fans(
        &self,
        item: ItemId,
        count: usize,
        with_scores: bool,
    ) -> AppResult<Vec<Fan>> {
        let start = Instant::now();

        let mut scored: Vec<(&str, f64)> = Vec::with_capacity(self.users.len());
        for username in &self.users {
            let uid = self.resolve_user(username);
            let est = self.predictor.predict(&uid, item).await?.est;
            scored.push((username.as_str(), est));
        }

        let fans: Vec<Fan> = top_n(scored, count)
            .into_iter()
            .map(|(username, est)| Fan {
                username: username.to_string(),
                est: with_scores.then_some(est),
            })
            .collect();

        tracing::info!(
            item = item,
            scored_users = self.users.len(),
            returned = fans.len(),
            processing_time_ms = start.elapsed().as_millis(),
            "Fans computed"
        );

        Ok(fans)
    }

    /// Collects every completed title for `user`, one page at a time
    ///
    /// Keeps requesting until a page comes back empty, sleeping `page_delay`
    /// before every request after the first.
    async fn fetch_completed(&self, user: &UserId) -> AppResult<HashSet<ItemId>> {
        let mut completed: HashSet<ItemId> = self
            .completed_lists
            .fetch_completed_page(user, 1)
            .await?
            .into_iter()
            .collect();

        let mut page = 2;
        loop {
            tokio::time::sleep(self.page_delay).await;
            let ids = self.completed_lists.fetch_completed_page(user, page).await?;
            if ids.is_empty() {
                break;
            }
            completed.extend(ids);
            page += 1;
        }

        tracing::debug!(
            user = %user,
            pages = page,
            completed = completed.len(),
            "Completed list fetched"
        );

        Ok(completed)
    }
}

/// Stable descending sort by score, truncated to `count`
///
/// NaN estimates rank below every number.
fn top_n<K>(mut scored: Vec<(K, f64)>, count: usize) -> Vec<(K, f64)> {
    scored.sort_by(|a, b| match (a.1.is_nan(), b.1.is_nan()) {
        (false, false) => b.1.total_cmp(&a.1),
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
    });
    scored.truncate(count);
    scored
}

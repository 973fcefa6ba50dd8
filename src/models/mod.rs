use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod catalog;
pub mod users;

pub use catalog::{fix_image_url, Catalog, CatalogEntry, PLACEHOLDER_IMAGE_URL};
pub use users::UsernameTable;

/// MyAnimeList item identifier
pub type ItemId = i64;

/// Internal user identifier understood by the predictor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Extra information attached to a prediction by the model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionDetails {
    /// Set when the model couldn't score the pair and fell back to a default estimate
    #[serde(default)]
    pub was_impossible: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

/// A single (user, item) prediction from the pre-trained model
///
/// Read from the model's record layout `[uid, iid, r_ui, est, details]`, where the
/// estimate is the fourth field. The keyed object form is accepted as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WirePrediction")]
pub struct Prediction {
    pub uid: UserId,
    pub iid: ItemId,
    /// True rating, when the model knows one
    pub r_ui: Option<f64>,
    /// Estimated rating
    pub est: f64,
    pub details: PredictionDetails,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WirePrediction {
    Record(UserId, ItemId, Option<f64>, f64, PredictionDetails),
    Keyed {
        uid: UserId,
        iid: ItemId,
        #[serde(default)]
        r_ui: Option<f64>,
        est: f64,
        #[serde(default)]
        details: PredictionDetails,
    },
}

impl From<WirePrediction> for Prediction {
    fn from(wire: WirePrediction) -> Self {
        match wire {
            WirePrediction::Record(uid, iid, r_ui, est, details) => Prediction {
                uid,
                iid,
                r_ui,
                est,
                details,
            },
            WirePrediction::Keyed {
                uid,
                iid,
                r_ui,
                est,
                details,
            } => Prediction {
                uid,
                iid,
                r_ui,
                est,
                details,
            },
        }
    }
}

/// A recommended catalog entry returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub anime_id: ItemId,
    pub title: String,
    pub image_url: String,
    /// Predicted score; zero for titles on the user's completed list
    pub est: f64,
}

/// A user predicted to like a given item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Fan {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub est: Option<f64>,
}

use indexmap::IndexMap;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use super::{ItemId, Recommendation};

/// Image served in place of a missing or broken thumbnail
pub const PLACEHOLDER_IMAGE_URL: &str = "https://cdn.myanimelist.net/images/error/404_image.png";

/// Retired MyAnimeList CDN host still present in older catalog dumps
const LEGACY_CDN_HOST: &str = "cdn-dena.com";

/// A recommendable title with its display metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct CatalogEntry {
    pub anime_id: ItemId,
    pub title: String,
    pub image_url: Option<String>,
}

/// Static, ordered table of recommendable titles
///
/// Iteration follows the order entries were supplied in, which is also the
/// tie-break order for equal scores.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: IndexMap<ItemId, CatalogEntry>,
}

impl Catalog {
    /// Builds the catalog from rows in order
    ///
    /// A repeated `anime_id` keeps its first position but takes the later row.
    pub fn new(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        let mut catalog = IndexMap::new();
        for entry in entries {
            let anime_id = entry.anime_id;
            if let Some(replaced) = catalog.insert(anime_id, entry) {
                tracing::warn!(
                    anime_id = anime_id,
                    replaced_title = %replaced.title,
                    "Duplicate catalog id, keeping the later row"
                );
            }
        }

        Self { entries: catalog }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, anime_id: ItemId) -> Option<&CatalogEntry> {
        self.entries.get(&anime_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }
}

impl CatalogEntry {
    /// Builds the client-facing record for this entry
    pub fn to_recommendation(&self, est: f64) -> Recommendation {
        Recommendation {
            anime_id: self.anime_id,
            title: self.title.clone(),
            image_url: fix_image_url(self.image_url.as_deref()),
            est,
        }
    }
}

/// Rewrites legacy CDN thumbnails onto myanimelist.net
///
/// Anything missing or not an absolute http(s) URL falls back to the placeholder.
pub fn fix_image_url(url: Option<&str>) -> String {
    let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) else {
        return PLACEHOLDER_IMAGE_URL.to_string();
    };

    let rewritten = url.replace(LEGACY_CDN_HOST, "net");
    match Url::parse(&rewritten) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.has_host() => {
            rewritten
        }
        _ => PLACEHOLDER_IMAGE_URL.to_string(),
    }
}

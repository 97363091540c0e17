use std::fmt::Display;

use mkt_common::helpers::split_csv;
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::db_types::{Kobo, ProductStatus, ProductTag};

/// Categories whose listings must come with a video.
pub const VIDEO_REQUIRED_CATEGORIES: [&str; 3] = ["Accessories", "Household-Items", "Electronics"];
pub const MAX_PRODUCT_IMAGES: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductQueryFilter {
    pub category: Option<String>,
    pub uploader_id: Option<i64>,
    pub status: Option<ProductStatus>,
}

impl ProductQueryFilter {
    pub fn with_category<S: Into<String>>(mut self, category: S) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_uploader(mut self, uploader_id: i64) -> Self {
        self.uploader_id = Some(uploader_id);
        self
    }

    pub fn with_status(mut self, status: ProductStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.uploader_id.is_none() && self.status.is_none()
    }
}

impl Display for ProductQueryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "All products");
        }
        let mut parts = vec![];
        if let Some(category) = &self.category {
            parts.push(format!("category: {category}"));
        }
        if let Some(uploader) = self.uploader_id {
            parts.push(format!("uploader: {uploader}"));
        }
        if let Some(status) = self.status {
            parts.push(format!("status: {status}"));
        }
        write!(f, "{}", parts.join(", "))
    }
}

/// A listing as submitted by a seller. Every field is optional at the wire level so that missing fields produce the
/// marketplace's own validation messages rather than a deserialization error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewListing {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<Kobo>,
    pub price_category: Option<String>,
    pub location: Option<String>,
    pub specification: Option<String>,
    pub condition: Option<String>,
    #[serde(default, deserialize_with = "images_from_list_or_csv")]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "index_from_number_or_str")]
    pub primary_image_index: Option<usize>,
    #[serde(alias = "videoUrl")]
    pub video: Option<String>,
}

/// Changes a seller may make to their own listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerProductUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Kobo>,
    pub availability: Option<bool>,
}

/// Changes an admin may make to any listing. `image` is the URL of a freshly uploaded cover image.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProductUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<Kobo>,
    pub price_category: Option<String>,
    pub location: Option<String>,
    pub tag: Option<ProductTag>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

fn images_from_list_or_csv<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where D: Deserializer<'de> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Images {
        List(Vec<String>),
        Csv(String),
    }
    Ok(match Option::<Images>::deserialize(deserializer)? {
        Some(Images::List(list)) => list.into_iter().map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect(),
        Some(Images::Csv(s)) => split_csv(&s),
        None => vec![],
    })
}

fn index_from_number_or_str<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where D: Deserializer<'de> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Index {
        Number(usize),
        Text(String),
    }
    match Option::<Index>::deserialize(deserializer)? {
        Some(Index::Number(n)) => Ok(Some(n)),
        Some(Index::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Index::Text(s)) => s.trim().parse().map(Some).map_err(de::Error::custom),
        None => Ok(None),
    }
}

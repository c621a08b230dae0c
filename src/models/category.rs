use serde::Serialize;

use crate::error::StoreQueryError;
use crate::services::store::{Collection, Document};

/// Channel category (read-only from the directory's perspective)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    /// External M3U playlist feeding this category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub m3u_url: Option<String>,
}

impl Category {
    /// Decode a `categories` document, rejecting missing required fields
    pub fn from_document(doc: &Document) -> Result<Self, StoreQueryError> {
        let collection = Collection::Categories;
        Ok(Self {
            id: doc.id.clone(),
            name: doc.required_str(collection, "name")?,
            slug: doc.required_str(collection, "slug")?,
            icon_url: doc.optional_str(collection, "iconUrl")?,
            m3u_url: doc.optional_str(collection, "m3uUrl")?,
        })
    }
}

/// Response for the category listing
#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<Category>,
    pub total: usize,
}

use serde::{Deserialize, Serialize};

use crate::error::StoreQueryError;
use crate::services::store::{Collection, Document};

/// Logo used when neither the playlist nor the store provides one
pub const PLACEHOLDER_LOGO: &str = "/placeholder.svg";

/// A playable channel, identical in shape whether it came from a playlist or the store
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: String,
    pub name: String,
    pub logo_url: String,
    pub stream_url: String,
    pub category_id: String,
    pub category_name: String,
}

impl Channel {
    /// Decode a `channels` document.
    ///
    /// `categoryName` falls back to the owning category's name and a missing
    /// logo falls back to the placeholder. `authCookie` is never read here.
    pub fn from_document(doc: &Document, fallback_category_name: &str) -> Result<Self, StoreQueryError> {
        let collection = Collection::Channels;
        Ok(Self {
            id: doc.id.clone(),
            name: doc.required_str(collection, "name")?,
            logo_url: doc
                .optional_str(collection, "logoUrl")?
                .unwrap_or_else(|| PLACEHOLDER_LOGO.to_string()),
            stream_url: doc.required_str(collection, "streamUrl")?,
            category_id: doc.required_str(collection, "categoryId")?,
            category_name: doc
                .optional_str(collection, "categoryName")?
                .unwrap_or_else(|| fallback_category_name.to_string()),
        })
    }
}

/// Query parameters for the one-shot channels endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ChannelsQuery {
    #[serde(default)]
    pub q: String,
}

/// One-shot category load response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryChannelsResponse {
    pub category: super::Category,
    pub channels: Vec<Channel>,
    /// Size of the unfiltered list
    pub total: usize,
    pub query: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_channel_defaults() {
        let doc = Document::new(
            "abc",
            json!({ "name": "CNN", "streamUrl": "http://s/cnn", "categoryId": "cat1", "authCookie": "secret" }),
        );
        let channel = Channel::from_document(&doc, "News").unwrap();

        assert_eq!(channel.id, "abc");
        assert_eq!(channel.logo_url, PLACEHOLDER_LOGO);
        assert_eq!(channel.category_name, "News");
    }

    #[test]
    fn test_decode_channel_missing_stream() {
        let doc = Document::new("abc", json!({ "name": "CNN", "categoryId": "cat1" }));
        let err = Channel::from_document(&doc, "News").unwrap_err();
        assert!(err.to_string().contains("streamUrl"));
    }

    #[test]
    fn test_serialize_camel_case() {
        let channel = Channel {
            id: "1".into(),
            name: "CNN".into(),
            logo_url: PLACEHOLDER_LOGO.into(),
            stream_url: "http://s".into(),
            category_id: "cat1".into(),
            category_name: "News".into(),
        };
        let value = serde_json::to_value(&channel).unwrap();
        assert_eq!(value["streamUrl"], "http://s");
        assert_eq!(value["logoUrl"], PLACEHOLDER_LOGO);
        assert!(value.get("authCookie").is_none());
    }
}

//! Case-insensitive channel name search

use crate::models::Channel;

/// Channels whose name contains `query`, ignoring case, in input order.
///
/// An empty query returns every channel.
pub fn filter_channels<'a>(channels: &'a [Channel], query: &str) -> Vec<&'a Channel> {
    if query.is_empty() {
        return channels.iter().collect();
    }

    let needle = query.to_lowercase();
    channels
        .iter()
        .filter(|channel| channel.name.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PLACEHOLDER_LOGO;

    fn channel(name: &str) -> Channel {
        Channel {
            id: name.to_lowercase(),
            name: name.to_string(),
            logo_url: PLACEHOLDER_LOGO.to_string(),
            stream_url: format!("http://s/{}", name),
            category_id: "c".to_string(),
            category_name: "C".to_string(),
        }
    }

    fn names<'a>(channels: &[&'a Channel]) -> Vec<&'a str> {
        channels.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_empty_query_returns_everything() {
        let channels = vec![channel("BBC News"), channel("CNN")];
        assert_eq!(names(&filter_channels(&channels, "")), vec!["BBC News", "CNN"]);
    }

    #[test]
    fn test_case_insensitive_match() {
        let channels = vec![channel("BBC News"), channel("CNN"), channel("Sky NEWS")];
        assert_eq!(names(&filter_channels(&channels, "news")), vec!["BBC News", "Sky NEWS"]);
        assert_eq!(names(&filter_channels(&channels, "cNn")), vec!["CNN"]);
    }

    #[test]
    fn test_no_match_is_empty() {
        let channels = vec![channel("BBC News"), channel("CNN")];
        assert!(filter_channels(&channels, "weather").is_empty());
    }

    #[test]
    fn test_whitespace_is_significant() {
        let channels = vec![channel("BBC News"), channel("CNN")];
        assert_eq!(names(&filter_channels(&channels, " news")), vec!["BBC News"]);
        assert!(filter_channels(&channels, " cnn").is_empty());
    }
}

pub mod loader;
pub mod playlist_fetcher;
pub mod playlist_parser;
pub mod search;
pub mod store;
pub mod views;

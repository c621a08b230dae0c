//! Repository layer for database access

pub mod documents;

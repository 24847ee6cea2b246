//! Titanic passenger dashboard: CSV cleaning and filtering, chart
//! summaries, and a chat assistant that answers questions about the data.

pub mod chat;
pub mod config;
pub mod data;

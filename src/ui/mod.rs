pub mod charts;
pub mod chat;
pub mod dashboard;
pub mod panels;
pub mod table;

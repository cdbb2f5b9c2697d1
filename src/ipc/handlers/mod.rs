pub mod auth;
pub mod charts;
pub mod core;
pub mod hafalan;
pub mod reports;
pub mod scores;
pub mod tables;

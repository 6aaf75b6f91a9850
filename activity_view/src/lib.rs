pub mod api;
pub mod columns;
pub mod config;
pub mod controller;
pub mod enrich;
pub mod filter;
pub mod matcher;
pub mod metrics;
pub mod table;
pub mod view_state;

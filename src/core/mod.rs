pub mod charts;
pub mod config;
pub mod dashboard;
pub mod edit;
pub mod filter;
pub mod grouping;
pub mod kpi;
pub mod log;
pub mod search;
pub mod table;

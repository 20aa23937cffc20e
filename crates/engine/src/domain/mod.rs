pub mod error;
pub mod fetcher;
pub mod report;
pub mod reporter;
pub mod trust_list;
pub mod types;

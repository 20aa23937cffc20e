// DGC trust list adapter - re-exports all public interfaces

mod constants;
mod url_validation;
mod http;
mod masterdata;
mod decoder;
mod store;
mod engine;

pub use constants::*;
pub use url_validation::*;
pub use http::*;
pub use masterdata::*;
pub use decoder::*;
pub use store::*;
pub use engine::*;

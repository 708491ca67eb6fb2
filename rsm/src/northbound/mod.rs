mod service;
mod types;

pub use service::RsmService;
pub use types::*;

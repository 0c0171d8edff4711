//! Data models

pub mod analysis;
pub mod report;
pub mod user;

pub use analysis::*;
pub use report::*;
pub use user::*;

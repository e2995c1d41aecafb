pub mod error;

pub mod models;
pub mod requests;

// Date, slot and month-grid helpers shared by both dashboards
pub mod calendar;
pub mod config;
pub mod schedule;

pub use error::*;
pub use models::*;
pub use requests::*;

pub use calendar::*;
pub use config::*;
pub use schedule::*;

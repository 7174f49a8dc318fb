pub mod property_manager;
pub mod services;
pub mod time;
pub mod utils;

pub use property_manager::{LoadMetadata, PropertyManager};
pub use time::{Clock, FixedClock, SystemClock};

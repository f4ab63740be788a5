// Domain layer - Pure models and trend analysis
pub mod asset;
pub mod reading;
pub mod time_range;
pub mod trend;

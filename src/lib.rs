pub mod calculation;
pub mod calendar;
pub mod clock;
pub mod config;
pub mod duration;
pub mod format;
pub mod market_data;
pub mod models;
pub mod storage;
pub mod update;
pub mod validation;

pub mod config;
pub mod error;
pub mod event;
pub mod fundamentals;
pub mod indicator;
pub mod input;
pub mod kite;
pub mod model;
pub mod news;
pub mod shipping;
pub mod tick_buffer;
pub mod ui;
pub mod watchlist;

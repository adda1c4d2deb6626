pub mod packet;
pub mod rest;
pub mod types;
pub mod ws;

pub use rest::KiteRestClient;
pub use ws::KiteTicker;

pub mod client;
pub mod sentiment;
pub mod types;

pub use client::NewsClient;
pub use sentiment::{classify, Sentiment};
pub use types::Article;

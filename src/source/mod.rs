mod client;
mod fetcher;

pub use client::Client;
pub use fetcher::HttpFetcher;

pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod output;
pub mod parse;
pub mod scrape;
pub mod testutil;
pub mod throttle;
pub mod traits;

pub use config::{InputConfig, Settings};
pub use error::AppError;
pub use models::Company;
pub use scrape::{ScrapeService, ScrapeSummary};
pub use traits::Fetcher;

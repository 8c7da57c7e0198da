pub mod base;
pub mod finviz;
pub mod offline;

pub use base::QuoteScraper;
pub use finviz::FinvizScraper;
pub use offline::OfflineScraper;

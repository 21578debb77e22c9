//! Scraping fallback for the `na.org.br/virtual/` listing page.
//!
//! The page carries one `<table>` of meetings with weekday names in
//! Portuguese. It has no join links, so records built from it only say when
//! a meeting is on.

mod config;
mod parse;
mod provider;

pub use config::HtmlConfig;
pub use parse::{parse_page, weekday_from_name};
pub use provider::HtmlSource;

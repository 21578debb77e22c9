//! Meeting sources for nowmeeting.
//!
//! - [`MeetingSource`] - The trait every source implements
//! - [`FileSource`] - Reads a `meetings.json` snapshot
//! - [`BmltSource`] - Queries BMLT root servers (feature `bmlt`)
//! - [`HtmlSource`] - Scrapes the public listing page (feature `html`)
//! - [`ProviderError`] - Error types for source operations
//!
//! # Example
//!
//! ```ignore
//! use nowmeeting_providers::{BmltConfig, BmltSource, MeetingSource, write_meetings};
//!
//! let source = BmltSource::new(BmltConfig::with_default_roots()?)?;
//! let meetings = source.fetch().await?;
//! write_meetings(Path::new("meetings.json"), &meetings)?;
//! ```

pub mod error;
pub mod file;
pub mod source;

#[cfg(any(feature = "bmlt", feature = "html"))]
mod http;

#[cfg(feature = "bmlt")]
pub mod bmlt;

#[cfg(feature = "html")]
pub mod html;

pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use file::{FileSource, load_meetings, write_meetings};
pub use source::{BoxFuture, MeetingSource};

#[cfg(feature = "bmlt")]
pub use bmlt::{BmltConfig, BmltSource};

#[cfg(feature = "html")]
pub use html::{HtmlConfig, HtmlSource};

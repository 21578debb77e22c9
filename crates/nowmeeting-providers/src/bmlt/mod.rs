//! BMLT (Basic Meeting List Toolbox) support.
//!
//! Root servers expose a JSON `client_interface`. nowmeeting asks for every
//! weekday and keeps only meetings with a virtual format code.

mod config;
mod convert;
mod provider;

pub use config::BmltConfig;
pub use convert::{
    BmltRow, DEFAULT_DURATION_MINUTES, LooseInt, duration_minutes, end_after, is_virtual,
    parse_rows, to_record, to_records,
};
pub use provider::BmltSource;

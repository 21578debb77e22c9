//! Meeting actions: open links, copy to clipboard.

use nowmeeting_core::MeetingRecord;
use tracing::info;

use crate::error::{ClientError, ClientResult};

/// Opens the first current meeting's link in the default browser.
pub fn open_link(meetings: &[MeetingRecord]) -> ClientResult<()> {
    let link = first_link(meetings)?;

    info!(url = %link, "opening meeting link");
    open::that(link).map_err(|e| ClientError::Action(format!("failed to open URL: {}", e)))?;

    Ok(())
}

/// Copies the first current meeting's link to the clipboard.
pub fn copy_link(meetings: &[MeetingRecord]) -> ClientResult<()> {
    let link = first_link(meetings)?;

    info!(url = %link, "copying meeting link to clipboard");

    let mut clipboard = arboard::Clipboard::new()
        .map_err(|e| ClientError::Action(format!("failed to access clipboard: {}", e)))?;

    clipboard
        .set_text(link)
        .map_err(|e| ClientError::Action(format!("failed to copy to clipboard: {}", e)))?;

    println!("{}", link);
    Ok(())
}

/// Returns the link of the first meeting that has one, in display order.
fn first_link(meetings: &[MeetingRecord]) -> ClientResult<&str> {
    if meetings.is_empty() {
        return Err(ClientError::Action("no meeting is happening now".into()));
    }
    meetings
        .iter()
        .find_map(MeetingRecord::join_link)
        .ok_or_else(|| ClientError::Action("no current meeting has a link".into()))
}

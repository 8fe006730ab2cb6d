//! Report publisher
//!
//! Posts the rendered report back to the server as a public note.

mod notes;

pub use notes::{NotesPublisher, PublishError, ReportPublisher, REPORT_VISIBILITY};

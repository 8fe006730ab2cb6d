//! Reporting - window close, message rendering, and report cadence

mod cycle;
mod schedule;
mod template;

pub use cycle::{Report, ReportingCycle};
pub use schedule::ReportSchedule;
pub use template::{ReportTemplate, DEFAULT_REPORT_TEMPLATE};

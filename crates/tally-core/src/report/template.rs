//! Report message template

use crate::error::DomainError;

/// Placeholder replaced with the tallied count
pub const COUNT_PLACEHOLDER: &str = "{count}";

/// Default report text
pub const DEFAULT_REPORT_TEMPLATE: &str =
    "ガリガリガリ…\nこの1時間の間に核の絵文字を使ったリアクションは{count}回行われました。";

/// Fixed-text message with a `{count}` placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTemplate(String);

impl ReportTemplate {
    /// Create a template, requiring at least one `{count}` placeholder
    pub fn new(template: impl Into<String>) -> Result<Self, DomainError> {
        let template = template.into();
        if !template.contains(COUNT_PLACEHOLDER) {
            return Err(DomainError::MissingPlaceholder);
        }
        Ok(Self(template))
    }

    /// Render the message for a count
    pub fn render(&self, count: u64) -> String {
        self.0.replace(COUNT_PLACEHOLDER, &count.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ReportTemplate {
    fn default() -> Self {
        Self(DEFAULT_REPORT_TEMPLATE.to_string())
    }
}

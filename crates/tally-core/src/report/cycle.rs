//! Reporting cycle
//!
//! Owns the reaction tally. Each call to [`ReportingCycle::close_window`]
//! drains the tally, so reactions seen afterwards belong to the next window.

use super::ReportTemplate;
use crate::tally::{ReactionTally, TallySnapshot};
use crate::value_objects::TargetEmojiSet;

/// A rendered report for one closed window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Sum of target emoji counts
    pub count: u64,
    /// Message to publish
    pub text: String,
    /// Every emoji tracked during the window
    pub snapshot: TallySnapshot,
}

/// Tally owner and report renderer
#[derive(Debug)]
pub struct ReportingCycle {
    tally: ReactionTally,
    targets: TargetEmojiSet,
    template: ReportTemplate,
}

impl ReportingCycle {
    pub fn new(tally: ReactionTally, targets: TargetEmojiSet, template: ReportTemplate) -> Self {
        Self {
            tally,
            targets,
            template,
        }
    }

    pub fn on_reacted(&mut self, raw: &str) -> bool {
        self.tally.on_reacted(raw)
    }

    pub fn on_unreacted(&mut self, raw: &str) -> bool {
        self.tally.on_unreacted(raw)
    }

    /// Drain the tally and render the report for the window just ended
    pub fn close_window(&mut self) -> Report {
        let snapshot = self.tally.drain_and_reset();
        let count = snapshot.count_targets(&self.targets);

        Report {
            count,
            text: self.template.render(count),
            snapshot,
        }
    }

    pub fn tally(&self) -> &ReactionTally {
        &self.tally
    }

    pub fn targets(&self) -> &TargetEmojiSet {
        &self.targets
    }
}

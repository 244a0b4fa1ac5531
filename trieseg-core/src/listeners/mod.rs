//! Tree listeners used with [`crate::walker::TreeWalker`]

mod branching;
mod report;

pub use branching::{combine_or, BranchedString, BranchingListener};
pub use report::{parse_report, write_report, ProfileListener, ReportEntry, ReportListener, ReportProfile};

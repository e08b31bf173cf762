//! Stages of the inventory calculation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Linear stage sequence of the inventory calculator.
///
/// Each stage is the precondition of the next; there is no branching and no
/// stage is ever revisited within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    Load,
    MergeGlobal,
    MergeMainStore,
    MergePendingPo,
    ComputeMetrics,
    Validate,
    Export,
}

impl Stage {
    /// All stages in execution order.
    pub const ALL: [Stage; 7] = [
        Stage::Load,
        Stage::MergeGlobal,
        Stage::MergeMainStore,
        Stage::MergePendingPo,
        Stage::ComputeMetrics,
        Stage::Validate,
        Stage::Export,
    ];

    /// The stage that must have completed before this one may start.
    pub fn predecessor(self) -> Option<Stage> {
        match self {
            Self::Load => None,
            Self::MergeGlobal => Some(Self::Load),
            Self::MergeMainStore => Some(Self::MergeGlobal),
            Self::MergePendingPo => Some(Self::MergeMainStore),
            Self::ComputeMetrics => Some(Self::MergePendingPo),
            Self::Validate => Some(Self::ComputeMetrics),
            Self::Export => Some(Self::Validate),
        }
    }

    /// The stage that follows this one.
    pub fn successor(self) -> Option<Stage> {
        match self {
            Self::Load => Some(Self::MergeGlobal),
            Self::MergeGlobal => Some(Self::MergeMainStore),
            Self::MergeMainStore => Some(Self::MergePendingPo),
            Self::MergePendingPo => Some(Self::ComputeMetrics),
            Self::ComputeMetrics => Some(Self::Validate),
            Self::Validate => Some(Self::Export),
            Self::Export => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Load => "LOAD",
            Self::MergeGlobal => "MERGE_GLOBAL",
            Self::MergeMainStore => "MERGE_MAIN_STORE",
            Self::MergePendingPo => "MERGE_PENDING_PO",
            Self::ComputeMetrics => "COMPUTE_METRICS",
            Self::Validate => "VALIDATE",
            Self::Export => "EXPORT",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

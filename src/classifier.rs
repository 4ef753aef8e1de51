use std::fmt;

use crate::profile::{AxisKind, AxisProfile, ProfileTable};

/// How a run picks the profile for each group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifyMode {
    /// One profile for every group, chosen up front.
    Manual(AxisKind),
    /// Profile inferred from each group's name.
    Auto,
}

impl ClassifyMode {
    /// Choices offered by the processing-mode prompt, in order.
    pub const OPTIONS: [ClassifyMode; 4] = [
        ClassifyMode::Manual(AxisKind::ThreeAxis),
        ClassifyMode::Manual(AxisKind::FourAxis),
        ClassifyMode::Manual(AxisKind::FiveAxis),
        ClassifyMode::Auto,
    ];

    pub fn option_labels() -> Vec<String> {
        Self::OPTIONS.iter().map(ToString::to_string).collect()
    }

    pub fn from_option(index: usize) -> Option<Self> {
        Self::OPTIONS.get(index).copied()
    }
}

impl fmt::Display for ClassifyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifyMode::Manual(kind) => write!(f, "{kind}"),
            ClassifyMode::Auto => write!(f, "auto"),
        }
    }
}

/// Name markers in priority order; the first one found wins.
const AXIS_MARKERS: &[(&str, AxisKind)] =
    &[("_5X_", AxisKind::FiveAxis), ("_4X_", AxisKind::FourAxis)];

/// Assigns an axis profile to a group.
pub struct AxisClassifier;

impl AxisClassifier {
    /// Case-insensitive marker scan; names without a marker are 3-axis.
    pub fn detect(group_name: &str) -> AxisKind {
        let upper = group_name.to_uppercase();
        AXIS_MARKERS
            .iter()
            .find(|(marker, _)| upper.contains(marker))
            .map(|&(_, kind)| kind)
            .unwrap_or(AxisKind::ThreeAxis)
    }

    pub fn classify<'a>(
        group_name: &str,
        mode: ClassifyMode,
        table: &'a ProfileTable,
    ) -> AxisProfile<'a> {
        let kind = match mode {
            ClassifyMode::Manual(kind) => kind,
            ClassifyMode::Auto => Self::detect(group_name),
        };
        table.profile(kind)
    }
}

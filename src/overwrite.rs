use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::prompt::Prompter;

/// Run-scoped overwrite mode.
///
/// Starts `Unset`; the first conflict moves it to one of the other three
/// states, where it stays for the rest of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverwriteState {
    Unset,
    AlwaysOverwrite,
    NeverOverwrite,
    AskEachTime,
}

impl fmt::Display for OverwriteState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverwriteState::Unset => write!(f, "UNSET"),
            OverwriteState::AlwaysOverwrite => write!(f, "ALWAYS_OVERWRITE"),
            OverwriteState::NeverOverwrite => write!(f, "NEVER_OVERWRITE"),
            OverwriteState::AskEachTime => write!(f, "ASK_EACH_TIME"),
        }
    }
}

/// Answer to the three-way "overwrite all?" question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwriteAnswer {
    Yes,
    No,
    Cancel,
}

/// What the dispatcher does with a conflicting output path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Proceed,
    Skip,
}

/// Decides whether existing output files may be replaced.
///
/// Only consulted for paths that already exist.
#[derive(Debug, Clone)]
pub struct OverwritePolicy {
    state: OverwriteState,
}

impl Default for OverwritePolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl OverwritePolicy {
    pub fn new() -> Self {
        Self {
            state: OverwriteState::Unset,
        }
    }

    #[allow(dead_code)]
    pub fn state(&self) -> OverwriteState {
        self.state
    }

    /// Resolves one conflict, prompting as the current state requires.
    ///
    /// - `Unset` asks the three-way question: `Yes` and `No` settle the run,
    ///   `Cancel` switches to asking per file and asks about this path at once.
    /// - `AlwaysOverwrite` / `NeverOverwrite` answer without prompting.
    /// - `AskEachTime` asks a yes/no question for this path only.
    pub fn resolve_conflict(&mut self, path: &Path, prompter: &mut impl Prompter) -> Decision {
        if self.state == OverwriteState::Unset {
            self.state = match prompter.overwrite_all(path) {
                OverwriteAnswer::Yes => OverwriteState::AlwaysOverwrite,
                OverwriteAnswer::No => OverwriteState::NeverOverwrite,
                OverwriteAnswer::Cancel => OverwriteState::AskEachTime,
            };
        }

        match self.state {
            OverwriteState::AlwaysOverwrite => Decision::Proceed,
            OverwriteState::NeverOverwrite | OverwriteState::Unset => Decision::Skip,
            OverwriteState::AskEachTime => {
                if prompter.overwrite_one(path) {
                    Decision::Proceed
                } else {
                    Decision::Skip
                }
            }
        }
    }
}

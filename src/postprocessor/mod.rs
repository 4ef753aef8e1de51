pub mod command;
pub mod error;

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use command::CommandPostprocessor;
pub use error::PostprocessError;

/// Units written to the NC program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputUnit {
    #[default]
    Metric,
    Inch,
}

/// Whether the postprocessor writes warnings, left to the postprocessor by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningPolicy {
    #[default]
    PostDefined,
    Suppress,
}

/// Whether the postprocessor opens its tool review, left to the postprocessor by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReviewPolicy {
    #[default]
    PostDefined,
    Off,
}

impl fmt::Display for OutputUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputUnit::Metric => write!(f, "metric"),
            OutputUnit::Inch => write!(f, "inch"),
        }
    }
}

impl fmt::Display for WarningPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningPolicy::PostDefined => write!(f, "post-defined"),
            WarningPolicy::Suppress => write!(f, "suppress"),
        }
    }
}

impl fmt::Display for ReviewPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewPolicy::PostDefined => write!(f, "post-defined"),
            ReviewPolicy::Off => write!(f, "off"),
        }
    }
}

/// Output settings shared by every call of a run (`[request]` in `postbatch.toml`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestOptions {
    pub unit: OutputUnit,
    pub warning: WarningPolicy,
    pub review: ReviewPolicy,
}

/// One postprocess call: a group through one postprocessor into one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRequest {
    pub group: String,
    pub postprocessor: String,
    pub output: PathBuf,
    pub unit: OutputUnit,
    pub warning: WarningPolicy,
    pub review: ReviewPolicy,
}

impl PostRequest {
    /// Metric output with warnings and tool review left to the postprocessor.
    pub fn new(group: &str, postprocessor: &str, output: PathBuf) -> Self {
        Self {
            group: group.to_string(),
            postprocessor: postprocessor.to_string(),
            output,
            unit: OutputUnit::Metric,
            warning: WarningPolicy::default(),
            review: ReviewPolicy::default(),
        }
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.unit = options.unit;
        self.warning = options.warning;
        self.review = options.review;
        self
    }
}

/// The external machining postprocessor.
///
/// Each call blocks the batch until it returns; calls never overlap.
#[allow(async_fn_in_trait)]
pub trait Postprocessor {
    async fn postprocess(&self, request: &PostRequest) -> Result<(), PostprocessError>;
}

#[cfg(test)]
pub mod testing {
    use std::cell::RefCell;
    use std::collections::HashSet;

    use super::*;

    /// Writes the output file like a real postprocessor, and records each call.
    #[derive(Default)]
    pub struct FakePost {
        pub calls: RefCell<Vec<PostRequest>>,
        pub failing: HashSet<String>,
    }

    impl FakePost {
        pub fn failing(postprocessor: &str) -> Self {
            Self {
                failing: HashSet::from([postprocessor.to_string()]),
                ..Default::default()
            }
        }
    }

    impl Postprocessor for FakePost {
        async fn postprocess(&self, request: &PostRequest) -> Result<(), PostprocessError> {
            self.calls.borrow_mut().push(request.clone());
            if self.failing.contains(&request.postprocessor) {
                return Err(PostprocessError::ExitStatus {
                    postprocessor: request.postprocessor.clone(),
                    code: Some(1),
                });
            }
            std::fs::write(&request.output, &request.postprocessor).map_err(|source| {
                PostprocessError::Launch {
                    program: "fake".into(),
                    source,
                }
            })
        }
    }
}

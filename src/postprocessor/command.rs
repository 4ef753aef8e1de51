use std::process::Stdio;

use console::Style;
use tokio::process::Command;

use super::error::PostprocessError;
use super::{PostRequest, Postprocessor};
use crate::error::BatchError;

/// Runs the postprocessor as an external program.
///
/// The argv template may use `{group}`, `{postprocessor}`, `{output}`,
/// `{unit}`, `{warning}` and `{review}`; each argument is substituted
/// separately, so paths with spaces stay one argument.
pub struct CommandPostprocessor {
    template: Vec<String>,
    echo: bool,
}

impl CommandPostprocessor {
    pub fn new(template: Vec<String>) -> Result<Self, BatchError> {
        match template.first() {
            Some(program) if !program.trim().is_empty() => Ok(Self {
                template,
                echo: false,
            }),
            _ => Err(BatchError::Config(
                "postprocess_command is not configured in postbatch.toml".into(),
            )),
        }
    }

    /// Print each command line to stderr before running it.
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    fn render_args(&self, request: &PostRequest) -> Vec<String> {
        let output = request.output.display().to_string();
        let unit = request.unit.to_string();
        let warning = request.warning.to_string();
        let review = request.review.to_string();
        let values = [
            ("{group}", request.group.as_str()),
            ("{postprocessor}", request.postprocessor.as_str()),
            ("{output}", output.as_str()),
            ("{unit}", unit.as_str()),
            ("{warning}", warning.as_str()),
            ("{review}", review.as_str()),
        ];
        self.template
            .iter()
            .map(|arg| substitute(arg, &values))
            .collect()
    }
}

// Single left-to-right pass; substituted text is never scanned again.
fn substitute(arg: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(arg.len());
    let mut rest = arg;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        match values.iter().find(|(key, _)| tail.starts_with(key)) {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len()..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

impl Postprocessor for CommandPostprocessor {
    async fn postprocess(&self, request: &PostRequest) -> Result<(), PostprocessError> {
        let args = self.render_args(request);
        let Some((program, rest)) = args.split_first() else {
            return Err(PostprocessError::Rejected("empty command line".into()));
        };

        if self.echo {
            eprintln!("    {}", Style::new().dim().apply_to(args.join(" ")));
        }

        // No timeout: a hanging postprocessor holds the batch.
        let status = Command::new(program)
            .args(rest)
            .stdin(Stdio::null())
            .status()
            .await
            .map_err(|source| PostprocessError::Launch {
                program: program.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(PostprocessError::ExitStatus {
                postprocessor: request.postprocessor.clone(),
                code: status.code(),
            })
        }
    }
}

use std::path::{Component, Path, PathBuf};

use crate::classifier::{AxisClassifier, ClassifyMode};
use crate::error::BatchError;
use crate::overwrite::{Decision, OverwritePolicy};
use crate::postprocessor::{PostRequest, Postprocessor, RequestOptions};
use crate::profile::{AxisKind, ProfileEntry, ProfileTable};
use crate::prompt::Prompter;
use crate::report::{JobResult, RunReport};
use crate::tree::{resolve_root, JobTree, NodeId};

/// Which groups a batch postprocesses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchScope {
    /// Every direct child group of the batch root.
    #[default]
    Children,
    /// The batch root group itself.
    Selected,
}

/// Progress hooks for whatever renders the run; all default to no-ops.
pub trait RunListener {
    fn run_started(&mut self, _mode: &str, _root: &str, _output_dir: &Path) {}

    /// `detected` is set when the profile came from the group name.
    fn group_started(&mut self, _group: &str, _detected: Option<AxisKind>) {}

    fn entry_started(&mut self, _group: &str, _entry: &ProfileEntry, _output: &Path) {}

    fn entry_finished(&mut self, _result: &JobResult) {}
}

impl RunListener for () {}

/// Substring of `name` before the first `delimiter`, or all of it.
pub fn short_name(name: &str, delimiter: char) -> &str {
    name.split(delimiter).next().unwrap_or(name)
}

/// `short` + `extension` when that is one plain file name inside the output directory.
fn output_file_name(short: &str, extension: &str) -> Option<String> {
    let file = format!("{short}{extension}");
    if file.contains(['/', '\\']) {
        return None;
    }
    let mut parts = Path::new(&file).components();
    match (parts.next(), parts.next()) {
        (Some(Component::Normal(_)), None) => Some(file),
        _ => None,
    }
}

/// Resolves the selection to the group a batch starts from.
pub fn resolve_batch_root(tree: &JobTree, selection: Option<NodeId>) -> Result<NodeId, BatchError> {
    let selected = selection.ok_or(BatchError::NothingSelected)?;
    resolve_root(tree, selected)
        .ok_or_else(|| BatchError::Unresolvable(tree.display_name(selected).to_string()))
}

/// Drives groups × profile entries through the external postprocessor.
pub struct BatchOrchestrator<P, Q> {
    pub profiles: ProfileTable,
    pub delimiter: char,
    pub options: RequestOptions,
    postprocessor: P,
    prompter: Q,
}

impl<P: Postprocessor, Q: Prompter> BatchOrchestrator<P, Q> {
    pub fn new(profiles: ProfileTable, delimiter: char, postprocessor: P, prompter: Q) -> Self {
        Self {
            profiles,
            delimiter,
            options: RequestOptions::default(),
            postprocessor,
            prompter,
        }
    }

    #[allow(dead_code)]
    pub fn prompter_mut(&mut self) -> &mut Q {
        &mut self.prompter
    }

    #[allow(dead_code)]
    pub fn postprocessor(&self) -> &P {
        &self.postprocessor
    }

    /// Checks every precondition, creates the output directory, then dispatches.
    ///
    /// Nothing is written unless all checks pass. A root without child groups
    /// (for [`BatchScope::Children`]) is reported as
    /// [`BatchError::NoChildGroups`], which is informational.
    pub async fn run_batch(
        &mut self,
        tree: &JobTree,
        selection: Option<NodeId>,
        mode: ClassifyMode,
        output_dir: &Path,
        scope: BatchScope,
        listener: &mut impl RunListener,
    ) -> Result<RunReport, BatchError> {
        let root = resolve_batch_root(tree, selection)?;

        if scope == BatchScope::Children && tree.child_groups(root).next().is_none() {
            return Err(BatchError::NoChildGroups(tree.display_name(root).to_string()));
        }

        std::fs::create_dir_all(output_dir).map_err(|source| BatchError::CreateDirectory {
            path: output_dir.to_path_buf(),
            source,
        })?;

        Ok(self
            .dispatch(tree, root, mode, output_dir, scope, listener)
            .await)
    }

    /// The batch loop. Failures are recorded per entry and never stop the run.
    pub async fn dispatch(
        &mut self,
        tree: &JobTree,
        root: NodeId,
        mode: ClassifyMode,
        output_dir: &Path,
        scope: BatchScope,
        listener: &mut impl RunListener,
    ) -> RunReport {
        let mut report = RunReport::new(&mode.to_string(), tree.display_name(root), output_dir);
        let mut policy = OverwritePolicy::new();
        listener.run_started(&report.mode, &report.root, output_dir);

        let groups: Vec<NodeId> = match scope {
            BatchScope::Children => tree.child_groups(root).collect(),
            BatchScope::Selected => vec![root],
        };

        for group in groups {
            let name = tree.display_name(group);
            let short = short_name(name, self.delimiter);
            let profile = AxisClassifier::classify(name, mode, &self.profiles);
            let detected = matches!(mode, ClassifyMode::Auto).then_some(profile.kind);
            listener.group_started(name, detected);

            for entry in profile.entries {
                let Some(file) = output_file_name(short, &entry.extension) else {
                    let result = JobResult::failed(
                        name,
                        &entry.postprocessor,
                        &PathBuf::from(format!("{short}{}", entry.extension)),
                        format!("short name {short:?} is not a plain file name"),
                    );
                    listener.entry_finished(&result);
                    report.push(result);
                    continue;
                };
                let output = output_dir.join(file);

                if output.exists()
                    && policy.resolve_conflict(&output, &mut self.prompter) == Decision::Skip
                {
                    let result = JobResult::skipped(name, &entry.postprocessor, &output);
                    listener.entry_finished(&result);
                    report.push(result);
                    continue;
                }

                listener.entry_started(name, entry, &output);
                let request = PostRequest::new(name, &entry.postprocessor, output.clone())
                    .with_options(self.options);
                let result = match self.postprocessor.postprocess(&request).await {
                    Ok(()) => JobResult::success(name, &entry.postprocessor, &output),
                    Err(e) => JobResult::failed(name, &entry.postprocessor, &output, e.to_string()),
                };
                listener.entry_finished(&result);
                report.push(result);
            }
        }

        report.finish();
        report
    }
}

mod classifier;
mod cli;
mod config;
mod error;
mod orchestrator;
mod overwrite;
mod postprocessor;
mod profile;
mod prompt;
mod report;
mod tree;
mod ui;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use console::Style;

use classifier::ClassifyMode;
use cli::{BatchArgs, Cli, Command};
use config::PostbatchConfig;
use error::BatchError;
use orchestrator::{resolve_batch_root, BatchOrchestrator, BatchScope, RunListener};
use postprocessor::{CommandPostprocessor, Postprocessor};
use profile::AxisKind;
use prompt::{ConsolePrompter, PresetPrompter, Prompter};
use report::RunReport;
use tree::{RenderOptions, Session};
use ui::BatchProgress;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        let code = exit_code(&err);
        if code == 0 {
            eprintln!("{} {err}", Style::new().yellow().apply_to("ℹ"));
        } else {
            eprintln!("{} {err:#}", Style::new().red().bold().apply_to("✘"));
            std::process::exit(code);
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = PostbatchConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Run(args) => {
            run_batch(&config, args, BatchScope::Children, cli.verbose, cli.json).await
        }
        Command::Single(args) => {
            run_batch(&config, args, BatchScope::Selected, cli.verbose, cli.json).await
        }
        Command::Tree {
            tree,
            select,
            setups_only,
            operations,
        } => show_tree(
            &tree,
            select.as_deref(),
            RenderOptions {
                setups_only,
                operations,
            },
        ),
        Command::Profiles => show_profiles(&config, cli.json),
    }
}

async fn run_batch(
    config: &PostbatchConfig,
    args: BatchArgs,
    scope: BatchScope,
    verbose: bool,
    json: bool,
) -> Result<()> {
    let postprocessor =
        CommandPostprocessor::new(config.postprocess_command.clone())?.with_echo(verbose);

    let mut prompter = PresetPrompter::new(ConsolePrompter::new());
    prompter.output_dir = args.output.clone();
    prompter.mode = args
        .mode
        .map(ClassifyMode::from)
        .and_then(|mode| ClassifyMode::OPTIONS.iter().position(|&m| m == mode));
    prompter.overwrite = args.overwrite.map(Into::into);

    if json {
        let report = run_batch_with(config, &args, scope, postprocessor, prompter, &mut ()).await?;
        BatchProgress::print_json(&report)?;
        return Ok(());
    }

    let mut progress = BatchProgress::new();
    let report =
        run_batch_with(config, &args, scope, postprocessor, prompter, &mut progress).await?;
    println!();
    if verbose {
        eprint!("{}", report.render_text());
    }
    progress.done(&report);
    Ok(())
}

/// Selection, processing mode and output directory, then the batch.
///
/// Every check runs before the output directory is created.
async fn run_batch_with<P: Postprocessor, Q: Prompter>(
    config: &PostbatchConfig,
    args: &BatchArgs,
    scope: BatchScope,
    postprocessor: P,
    mut prompter: Q,
    listener: &mut impl RunListener,
) -> Result<RunReport, BatchError> {
    let session = Session::load(&args.tree)?;
    let tree = &session.tree;
    let selection = match args.select.clone().or_else(|| session.selection.clone()) {
        Some(selector) => Some(
            tree.find(&selector)
                .ok_or(BatchError::SelectionNotFound(selector))?,
        ),
        None => None,
    };
    let root = resolve_batch_root(tree, selection)?;

    let mode = prompter
        .select_processing_mode(&ClassifyMode::option_labels())
        .and_then(ClassifyMode::from_option)
        .ok_or(BatchError::Cancelled)?;

    let default_dir = default_output_dir(config, &args.tree);
    let output_dir = prompter
        .select_output_directory(&default_dir)
        .ok_or(BatchError::NoOutputDirectory)?;

    let mut orchestrator =
        BatchOrchestrator::new(config.profiles.clone(), config.delimiter, postprocessor, prompter);
    orchestrator.options = config.request;
    orchestrator
        .run_batch(tree, Some(root), mode, &output_dir, scope, listener)
        .await
}

// Informational conditions end the run without failing it.
fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<BatchError>() {
        Some(batch) if batch.is_informational() => 0,
        _ => 1,
    }
}

// Configured directory, else the folder holding the session file, else the working directory.
fn default_output_dir(config: &PostbatchConfig, session_file: &Path) -> PathBuf {
    if let Some(dir) = &config.default_output_dir {
        return dir.clone();
    }
    match session_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

fn show_tree(path: &Path, select: Option<&str>, options: RenderOptions) -> Result<()> {
    let session = Session::load(path).with_context(|| format!("failed to load {}", path.display()))?;
    let tree = &session.tree;
    let start = match select.or(session.selection.as_deref()) {
        Some(selector) => {
            let node = tree
                .find(selector)
                .ok_or_else(|| BatchError::SelectionNotFound(selector.to_string()))?;
            resolve_batch_root(tree, Some(node))?
        }
        None => tree.root(),
    };
    print!("{}", tree::render_tree(tree, start, options));
    Ok(())
}

fn show_profiles(config: &PostbatchConfig, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&config.profiles)?);
        return Ok(());
    }
    let bold = Style::new().bold();
    for kind in AxisKind::ALL {
        println!("{}", bold.apply_to(kind));
        for entry in config.profiles.profile(kind).entries {
            println!("  {:<24} {}", entry.postprocessor, entry.extension);
        }
    }
    println!("short-name delimiter: {:?}", config.delimiter);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::postprocessor::testing::FakePost;
    use crate::prompt::testing::ScriptedPrompter;

    const SESSION: &str = r#"{
        "name": "PROGRAM", "kind": "group",
        "children": [
            { "name": "SETUP_1", "kind": "group",
              "children": [
                  { "name": "PART1_OP", "kind": "group",
                    "children": [{ "name": "FACE", "kind": "leaf" }] },
                  { "name": "PART2_4X_OP", "kind": "group" }
              ] }
        ]
    }"#;

    fn session_file(dir: &Path, selection: Option<&str>) -> PathBuf {
        let path = dir.join("session.json");
        let contents = match selection {
            Some(sel) => format!(r#"{{ "root": {SESSION}, "selection": "{sel}" }}"#),
            None => SESSION.to_string(),
        };
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn batch_args(tree: PathBuf, select: Option<&str>) -> BatchArgs {
        BatchArgs {
            tree,
            select: select.map(str::to_string),
            mode: None,
            output: None,
            overwrite: None,
        }
    }

    // Auto mode and `out` as the output directory.
    fn answering(out: &Path) -> ScriptedPrompter {
        ScriptedPrompter {
            mode: Some(3),
            output_dir: Some(out.to_path_buf()),
            ..Default::default()
        }
    }

    async fn run_with(args: &BatchArgs, prompter: ScriptedPrompter) -> Result<RunReport, BatchError> {
        let config = PostbatchConfig::default();
        run_batch_with(&config, args, BatchScope::Children, FakePost::default(), prompter, &mut ())
            .await
    }

    #[tokio::test]
    async fn batch_uses_session_selection() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nc");
        let args = batch_args(session_file(dir.path(), Some("SETUP_1")), None);

        let report = run_with(&args, answering(&out)).await.unwrap();

        assert_eq!(report.succeeded(), 4);
        assert_eq!(report.root, "SETUP_1");
        assert!(out.join("PART1.txt").exists());
        assert!(out.join("PART2.min").exists());
    }

    #[tokio::test]
    async fn unknown_selection_aborts_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nc");
        let args = batch_args(session_file(dir.path(), None), Some("MISSING"));

        let err = run_with(&args, answering(&out)).await.unwrap_err();

        assert!(matches!(err, BatchError::SelectionNotFound(ref s) if s == "MISSING"));
        assert!(!out.exists());
        assert_eq!(exit_code(&anyhow::Error::from(err)), 1);
    }

    #[tokio::test]
    async fn session_without_selection_is_nothing_selected() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nc");
        let args = batch_args(session_file(dir.path(), None), None);

        let err = run_with(&args, answering(&out)).await.unwrap_err();

        assert!(matches!(err, BatchError::NothingSelected));
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn missing_session_file_is_no_tree() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nc");
        let args = batch_args(dir.path().join("absent.json"), Some("SETUP_1"));

        let err = run_with(&args, answering(&out)).await.unwrap_err();

        assert!(matches!(err, BatchError::NoTree(_)));
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn backing_out_of_mode_prompt_cancels_quietly() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nc");
        let args = batch_args(session_file(dir.path(), None), Some("SETUP_1"));
        let prompter = ScriptedPrompter {
            mode: None,
            ..answering(&out)
        };

        let err = run_with(&args, prompter).await.unwrap_err();

        assert!(matches!(err, BatchError::Cancelled));
        assert!(!out.exists());
        assert_eq!(exit_code(&anyhow::Error::from(err)), 0);
    }

    #[tokio::test]
    async fn backing_out_of_directory_prompt_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nc");
        let args = batch_args(session_file(dir.path(), None), Some("SETUP_1"));
        let prompter = ScriptedPrompter {
            output_dir: None,
            ..answering(&out)
        };

        let err = run_with(&args, prompter).await.unwrap_err();

        assert!(matches!(err, BatchError::NoOutputDirectory));
        assert!(!out.exists());
        assert_eq!(exit_code(&anyhow::Error::from(err)), 1);
    }

    #[tokio::test]
    async fn group_without_child_groups_exits_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nc");
        let args = batch_args(session_file(dir.path(), None), Some("FACE"));

        let err = run_with(&args, answering(&out)).await.unwrap_err();

        assert!(matches!(err, BatchError::NoChildGroups(ref g) if g == "PART1_OP"));
        assert!(!out.exists());
        assert_eq!(exit_code(&anyhow::Error::from(err)), 0);
    }

    #[test]
    fn config_errors_exit_with_failure() {
        let err = anyhow::anyhow!("failed to parse config postbatch.toml");
        assert_eq!(exit_code(&err), 1);
    }

    #[test]
    fn default_output_dir_prefers_config() {
        let config = PostbatchConfig {
            default_output_dir: Some(PathBuf::from("/srv/nc")),
            ..PostbatchConfig::default()
        };
        assert_eq!(
            default_output_dir(&config, Path::new("/parts/session.json")),
            PathBuf::from("/srv/nc")
        );
    }

    #[test]
    fn default_output_dir_falls_back_to_session_folder() {
        let config = PostbatchConfig::default();
        assert_eq!(
            default_output_dir(&config, Path::new("/parts/session.json")),
            PathBuf::from("/parts")
        );
        assert_eq!(
            default_output_dir(&config, Path::new("session.json")),
            std::env::current_dir().unwrap()
        );
    }
}

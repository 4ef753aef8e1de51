//! Perguntas interativas feitas durante um lote.
//!
//! O trait [`Prompter`] abstrai os diálogos do host (pasta de saída, tipo de
//! processamento, sobrescrita). [`ConsolePrompter`] pergunta no terminal via
//! `console`; [`PresetPrompter`] responde a partir das flags da CLI e só
//! recorre ao terminal para o que as flags não decidiram.

use std::path::{Path, PathBuf};

use console::{Style, Term};

use crate::overwrite::OverwriteAnswer;

/// Interactive decisions a batch run may need from the user.
pub trait Prompter {
    /// `None` when the user backs out.
    fn select_output_directory(&mut self, default_dir: &Path) -> Option<PathBuf>;

    /// Index into `options`, or `None` when the user backs out.
    fn select_processing_mode(&mut self, options: &[String]) -> Option<usize>;

    fn overwrite_all(&mut self, path: &Path) -> OverwriteAnswer;

    fn overwrite_one(&mut self, path: &Path) -> bool;
}

/// Asks on the terminal (stderr), reading answers line by line.
///
/// Without a terminal every question backs out, as if the user closed it.
pub struct ConsolePrompter {
    term: Term,
    interactive: bool,
    bold: Style,
}

impl Default for ConsolePrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsolePrompter {
    pub fn new() -> Self {
        let term = Term::stderr();
        Self {
            interactive: term.is_term(),
            term,
            bold: Style::new().bold(),
        }
    }

    // `None` on EOF or when stderr is not a terminal: `read_line` then
    // returns an empty line that would read as "take the default".
    fn ask(&self, question: &str) -> Option<String> {
        if !self.interactive {
            return None;
        }
        self.term.write_str(question).ok()?;
        self.term
            .read_line()
            .ok()
            .map(|line| line.trim().to_string())
    }
}

impl Prompter for ConsolePrompter {
    fn select_output_directory(&mut self, default_dir: &Path) -> Option<PathBuf> {
        let answer = self.ask(&format!(
            "{} [{}]: ",
            self.bold.apply_to("Output directory for NC programs"),
            default_dir.display()
        ))?;
        if answer.is_empty() {
            Some(default_dir.to_path_buf())
        } else {
            Some(PathBuf::from(answer))
        }
    }

    fn select_processing_mode(&mut self, options: &[String]) -> Option<usize> {
        let _ = self
            .term
            .write_line(&self.bold.apply_to("Processing type:").to_string());
        for (i, option) in options.iter().enumerate() {
            let _ = self.term.write_line(&format!("  {}) {option}", i + 1));
        }
        let answer = self.ask("Choice [1]: ")?;
        parse_choice(&answer, options.len())
    }

    fn overwrite_all(&mut self, path: &Path) -> OverwriteAnswer {
        let question = format!(
            "File {} already exists.\n  y = overwrite all, n = overwrite none, anything else = ask each time: ",
            path.display()
        );
        match self.ask(&question) {
            Some(answer) => parse_overwrite_all(&answer),
            None => OverwriteAnswer::No,
        }
    }

    fn overwrite_one(&mut self, path: &Path) -> bool {
        self.ask(&format!("File {} already exists. Overwrite? [y/N]: ", path.display()))
            .is_some_and(|answer| is_yes(&answer))
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.to_lowercase().as_str(), "y" | "yes")
}

fn parse_overwrite_all(answer: &str) -> OverwriteAnswer {
    match answer.to_lowercase().as_str() {
        "y" | "yes" => OverwriteAnswer::Yes,
        "n" | "no" => OverwriteAnswer::No,
        _ => OverwriteAnswer::Cancel,
    }
}

// Empty input picks the preselected first option.
fn parse_choice(answer: &str, len: usize) -> Option<usize> {
    if answer.is_empty() {
        return (len > 0).then_some(0);
    }
    let n: usize = answer.parse().ok()?;
    (1..=len).contains(&n).then(|| n - 1)
}

/// Answers fixed by command-line flags; everything else goes to `fallback`.
pub struct PresetPrompter<P> {
    pub output_dir: Option<PathBuf>,
    pub mode: Option<usize>,
    pub overwrite: Option<OverwriteAnswer>,
    fallback: P,
}

impl<P: Prompter> PresetPrompter<P> {
    pub fn new(fallback: P) -> Self {
        Self {
            output_dir: None,
            mode: None,
            overwrite: None,
            fallback,
        }
    }
}

impl<P: Prompter> Prompter for PresetPrompter<P> {
    fn select_output_directory(&mut self, default_dir: &Path) -> Option<PathBuf> {
        match &self.output_dir {
            Some(dir) => Some(dir.clone()),
            None => self.fallback.select_output_directory(default_dir),
        }
    }

    fn select_processing_mode(&mut self, options: &[String]) -> Option<usize> {
        match self.mode {
            Some(index) => Some(index),
            None => self.fallback.select_processing_mode(options),
        }
    }

    fn overwrite_all(&mut self, path: &Path) -> OverwriteAnswer {
        match self.overwrite {
            Some(answer) => answer,
            None => self.fallback.overwrite_all(path),
        }
    }

    fn overwrite_one(&mut self, path: &Path) -> bool {
        self.fallback.overwrite_one(path)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedPrompter;
    use super::*;

    #[test]
    fn choice_parsing() {
        assert_eq!(parse_choice("", 4), Some(0));
        assert_eq!(parse_choice("4", 4), Some(3));
        assert_eq!(parse_choice("0", 4), None);
        assert_eq!(parse_choice("5", 4), None);
        assert_eq!(parse_choice("auto", 4), None);
        assert_eq!(parse_choice("", 0), None);
    }

    #[test]
    fn overwrite_all_parsing() {
        assert_eq!(parse_overwrite_all("Y"), OverwriteAnswer::Yes);
        assert_eq!(parse_overwrite_all("no"), OverwriteAnswer::No);
        assert_eq!(parse_overwrite_all(""), OverwriteAnswer::Cancel);
        assert_eq!(parse_overwrite_all("c"), OverwriteAnswer::Cancel);
    }

    #[test]
    fn console_without_terminal_backs_out() {
        let mut prompter = ConsolePrompter {
            interactive: false,
            ..ConsolePrompter::new()
        };
        assert_eq!(prompter.select_output_directory(Path::new("/default")), None);
        assert_eq!(
            prompter.select_processing_mode(&["3-axis".to_string(), "auto".to_string()]),
            None
        );
        assert_eq!(prompter.overwrite_all(Path::new("/nc/PART1.i")), OverwriteAnswer::No);
        assert!(!prompter.overwrite_one(Path::new("/nc/PART1.i")));
    }

    #[test]
    fn preset_answers_win_over_fallback() {
        let fallback = ScriptedPrompter {
            output_dir: Some(PathBuf::from("/fallback")),
            mode: Some(0),
            ..Default::default()
        };
        let mut prompter = PresetPrompter::new(fallback);
        prompter.output_dir = Some(PathBuf::from("/preset"));
        prompter.mode = Some(3);
        prompter.overwrite = Some(OverwriteAnswer::Yes);

        assert_eq!(
            prompter.select_output_directory(Path::new("/default")),
            Some(PathBuf::from("/preset"))
        );
        assert_eq!(prompter.select_processing_mode(&[]), Some(3));
        assert_eq!(prompter.overwrite_all(Path::new("x")), OverwriteAnswer::Yes);
        assert_eq!(prompter.fallback.all_prompts, 0);
    }

    #[test]
    fn preset_defers_unset_answers() {
        let fallback = ScriptedPrompter::new()
            .answer_all(OverwriteAnswer::No)
            .answer_each([true]);
        let mut prompter = PresetPrompter::new(fallback);

        assert_eq!(prompter.overwrite_all(Path::new("x")), OverwriteAnswer::No);
        assert!(prompter.overwrite_one(Path::new("x")));
        assert_eq!(prompter.fallback.all_prompts, 1);
        assert_eq!(prompter.fallback.one_prompts, 1);
    }
}

//! Interface de terminal do postbatch: spinners e saída colorida.
//!
//! Usa as crates `indicatif` para o spinner enquanto o pós-processador
//! externo roda e `console` para estilização com cores. O [`BatchProgress`]
//! recebe os eventos do lote via [`RunListener`].

use std::path::Path;
use std::time::Duration;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::orchestrator::RunListener;
use crate::profile::{AxisKind, ProfileEntry};
use crate::report::{JobResult, JobStatus, RunReport};

/// Indicador visual de progresso para um lote no terminal.
///
/// Exibe um spinner durante cada chamada ao pós-processador e uma linha
/// colorida por resultado: sucesso (verde), ignorado (amarelo), falha (vermelho).
pub struct BatchProgress {
    // Spinner da chamada em andamento, se houver.
    pb: Option<ProgressBar>,
    green: Style,
    red: Style,
    yellow: Style,
    bold: Style,
}

impl Default for BatchProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchProgress {
    pub fn new() -> Self {
        Self {
            pb: None,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
            bold: Style::new().bold(),
        }
    }

    /// Linha final com o resumo e a pasta onde os arquivos ficaram.
    pub fn done(&self, report: &RunReport) {
        let style = if report.failed() > 0 {
            &self.red
        } else {
            &self.green
        };
        println!("{}", style.apply_to(report.summary()));
        println!(
            "Postprocess ({}) finished. Files saved in: {}",
            report.mode,
            report.output_dir.display()
        );
    }

    /// Imprime o relatório formatado em JSON.
    pub fn print_json(report: &RunReport) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(report)?);
        Ok(())
    }

    fn clear_spinner(&mut self) {
        if let Some(pb) = self.pb.take() {
            pb.finish_and_clear();
        }
    }
}

impl RunListener for BatchProgress {
    /// Cabeçalho do lote: modo, grupo raiz e pasta de saída.
    fn run_started(&mut self, mode: &str, root: &str, output_dir: &Path) {
        println!(
            "{}",
            self.bold
                .apply_to(format!("=== Batch postprocess ({mode}) ==="))
        );
        println!("Group: {root}");
        println!("Output directory: {}", output_dir.display());
        println!();
    }

    fn group_started(&mut self, group: &str, detected: Option<AxisKind>) {
        self.clear_spinner();
        match detected {
            Some(kind) => println!("{group} → {kind}"),
            None => println!("{group}"),
        }
    }

    fn entry_started(&mut self, _group: &str, entry: &ProfileEntry, output: &Path) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("   {spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("{} -> {}", entry.postprocessor, file_name(output)));
        pb.enable_steady_tick(Duration::from_millis(100));
        self.pb = Some(pb);
    }

    fn entry_finished(&mut self, result: &JobResult) {
        self.clear_spinner();
        let file = file_name(&result.output_path);
        match result.status {
            JobStatus::Success => println!(
                "   {} {} -> {file}",
                self.green.apply_to("✔"),
                result.postprocessor_id
            ),
            JobStatus::Skipped => println!(
                "   {} {} -> {file} (kept existing file)",
                self.yellow.apply_to("↷"),
                result.postprocessor_id
            ),
            JobStatus::Failed => eprintln!(
                "   {} Error ({}): {}",
                self.red.apply_to("✘"),
                result.postprocessor_id,
                result.message
            ),
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

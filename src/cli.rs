//! Interface de linha de comando do postbatch baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (run, single, tree,
//! profiles) e flags globais (--config, --verbose, --json). As flags de
//! lote respondem antecipadamente às perguntas interativas.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::classifier::ClassifyMode;
use crate::overwrite::OverwriteAnswer;
use crate::profile::AxisKind;

/// postbatch: pós-processamento em lote de programas CAM.
#[derive(Debug, Parser)]
#[command(name = "postbatch", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Caminho para o arquivo de configuração (padrão: ./postbatch.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Mostra a linha de comando de cada chamada ao pós-processador.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Imprime o relatório em JSON.
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Pós-processa cada grupo filho do grupo selecionado.
    Run(BatchArgs),

    /// Pós-processa somente o grupo selecionado.
    Single(BatchArgs),

    /// Mostra a estrutura de grupos da árvore de programas.
    Tree {
        /// Sessão CAM exportada em JSON.
        #[arg(long)]
        tree: PathBuf,

        /// Grupo ou operação de partida (nome ou id).
        #[arg(long)]
        select: Option<String>,

        /// Expande apenas grupos de fixação (SETUP_, SET-, УСТ_ ...).
        #[arg(long, default_value_t = false)]
        setups_only: bool,

        /// Lista também as operações de cada grupo.
        #[arg(long, default_value_t = false)]
        operations: bool,
    },

    /// Lista a tabela de perfis configurada.
    Profiles,
}

#[derive(Debug, Clone, Args)]
pub struct BatchArgs {
    /// Sessão CAM exportada em JSON.
    #[arg(long)]
    pub tree: PathBuf,

    /// Grupo ou operação selecionada (nome ou id); usa a seleção da sessão se omitido.
    #[arg(long)]
    pub select: Option<String>,

    /// Tipo de processamento; pergunta se omitido.
    #[arg(long)]
    pub mode: Option<ModeArg>,

    /// Pasta de saída; pergunta se omitida.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Resposta para arquivos já existentes; pergunta no primeiro conflito se omitida.
    #[arg(long)]
    pub overwrite: Option<OverwriteArg>,
}

/// Tipo de processamento aceito pela CLI, mapeado para [`ClassifyMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Todos os grupos com os pós-processadores de 3 eixos.
    #[value(name = "3x")]
    ThreeAxis,
    /// Todos os grupos com os pós-processadores de 4 eixos.
    #[value(name = "4x")]
    FourAxis,
    /// Todos os grupos com os pós-processadores de 5 eixos.
    #[value(name = "5x")]
    FiveAxis,
    /// Detecta pelo nome do grupo (_4X_, _5X_).
    Auto,
}

impl From<ModeArg> for ClassifyMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::ThreeAxis => ClassifyMode::Manual(AxisKind::ThreeAxis),
            ModeArg::FourAxis => ClassifyMode::Manual(AxisKind::FourAxis),
            ModeArg::FiveAxis => ClassifyMode::Manual(AxisKind::FiveAxis),
            ModeArg::Auto => ClassifyMode::Auto,
        }
    }
}

/// Política de sobrescrita aceita pela CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OverwriteArg {
    /// Sobrescreve todos os arquivos existentes.
    All,
    /// Mantém todos os arquivos existentes.
    None,
    /// Pergunta para cada arquivo existente.
    Ask,
}

impl From<OverwriteArg> for OverwriteAnswer {
    fn from(arg: OverwriteArg) -> Self {
        match arg {
            OverwriteArg::All => OverwriteAnswer::Yes,
            OverwriteArg::None => OverwriteAnswer::No,
            OverwriteArg::Ask => OverwriteAnswer::Cancel,
        }
    }
}

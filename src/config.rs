//! Configuração do postbatch carregada a partir de `postbatch.toml`.
//!
//! A struct [`PostbatchConfig`] contém a tabela de perfis, o delimitador do
//! nome curto e o comando do pós-processador externo. Valores não presentes
//! no arquivo usam defaults sensíveis. A variável de ambiente
//! `POSTBATCH_OUTPUT_DIR` tem precedência sobre o arquivo.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::postprocessor::RequestOptions;
use crate::profile::ProfileTable;

const CONFIG_FILE: &str = "postbatch.toml";
const OUTPUT_DIR_ENV: &str = "POSTBATCH_OUTPUT_DIR";

/// Configuração de nível superior carregada de `postbatch.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct PostbatchConfig {
    /// Caractere que separa o nome curto do restante do nome do grupo.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Perfis de pós-processamento por número de eixos.
    #[serde(default)]
    pub profiles: ProfileTable,

    /// Linha de comando do pós-processador externo, com placeholders
    /// `{group}`, `{postprocessor}`, `{output}`, `{unit}`, `{warning}`, `{review}`.
    #[serde(default)]
    pub postprocess_command: Vec<String>,

    /// Unidade, avisos e revisão de ferramentas repassados ao pós-processador.
    #[serde(default)]
    pub request: RequestOptions,

    /// Diretório de saída sugerido no prompt.
    #[serde(default)]
    pub default_output_dir: Option<PathBuf>,
}

// Valor padrão para o delimitador: '_'.
fn default_delimiter() -> char {
    '_'
}

impl Default for PostbatchConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            profiles: ProfileTable::default(),
            postprocess_command: Vec::new(),
            request: RequestOptions::default(),
            default_output_dir: None,
        }
    }
}

impl PostbatchConfig {
    /// Carrega a configuração do caminho explícito, ou de `postbatch.toml`
    /// no diretório atual. Usa valores padrão se o arquivo não existir.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None if Path::new(CONFIG_FILE).exists() => Self::from_file(Path::new(CONFIG_FILE))?,
            None => Self::default(),
        };

        // Variável de ambiente tem precedência sobre o arquivo de configuração.
        if let Ok(dir) = std::env::var(OUTPUT_DIR_ENV)
            && !dir.is_empty()
        {
            config.default_output_dir = Some(PathBuf::from(dir));
        }

        config.profiles.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = toml::from_str::<PostbatchConfig>(&contents)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok(config)
    }
}

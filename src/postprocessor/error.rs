//! Tipos de erro do pós-processador externo.
//!
//! Uma falha aqui nunca interrompe o lote: a mensagem vira a entrada
//! `Failed` do relatório e o laço segue para o próximo par (grupo, perfil).

use thiserror::Error;

/// Erros de uma única chamada ao pós-processador.
#[derive(Debug, Error)]
pub enum PostprocessError {
    /// O processo não pôde ser iniciado (programa ausente, sem permissão).
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// O pós-processador terminou com código diferente de zero.
    #[error("{postprocessor} exited with {}", describe_code(.code))]
    ExitStatus {
        postprocessor: String,
        code: Option<i32>,
    },

    /// O pós-processador recusou a requisição antes de rodar.
    #[error("postprocess rejected: {0}")]
    Rejected(String),
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no status (terminated by signal)".to_string(),
    }
}

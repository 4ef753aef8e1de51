//! Tabela de perfis de pós-processamento por número de eixos.
//!
//! Cada [`AxisKind`] aponta para uma lista ordenada de [`ProfileEntry`]
//! (pós-processador + extensão do arquivo de saída). Os valores padrão
//! reproduzem o parque de máquinas da oficina; `postbatch.toml` pode
//! substituí-los.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::BatchError;

/// Axis-count category of a machining program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisKind {
    ThreeAxis,
    FourAxis,
    FiveAxis,
}

impl AxisKind {
    pub const ALL: [AxisKind; 3] = [AxisKind::ThreeAxis, AxisKind::FourAxis, AxisKind::FiveAxis];
}

impl fmt::Display for AxisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisKind::ThreeAxis => write!(f, "3-axis"),
            AxisKind::FourAxis => write!(f, "4-axis"),
            AxisKind::FiveAxis => write!(f, "5-axis"),
        }
    }
}

/// One postprocessor run: which postprocessor, and the extension of the file it writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileEntry {
    pub postprocessor: String,
    pub extension: String,
}

impl ProfileEntry {
    pub fn new(postprocessor: &str, extension: &str) -> Self {
        Self {
            postprocessor: postprocessor.to_string(),
            extension: extension.to_string(),
        }
    }
}

/// The ordered entries chosen for one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisProfile<'a> {
    pub kind: AxisKind,
    pub entries: &'a [ProfileEntry],
}

/// Process-wide profile table, one entry list per axis category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileTable {
    #[serde(default = "default_three_axis")]
    pub three_axis: Vec<ProfileEntry>,

    #[serde(default = "default_four_axis")]
    pub four_axis: Vec<ProfileEntry>,

    #[serde(default = "default_five_axis")]
    pub five_axis: Vec<ProfileEntry>,
}

fn default_three_axis() -> Vec<ProfileEntry> {
    vec![
        ProfileEntry::new("DMU-60T", ".i"),
        ProfileEntry::new("OKUMA_MB-46VAE_3X", ".min"),
        ProfileEntry::new("HAAS-VF2", ".txt"),
    ]
}

fn default_four_axis() -> Vec<ProfileEntry> {
    vec![ProfileEntry::new("OKUMA_MB-46VAE_4X", ".min")]
}

fn default_five_axis() -> Vec<ProfileEntry> {
    vec![ProfileEntry::new("DMU-5axis", ".i")]
}

impl Default for ProfileTable {
    fn default() -> Self {
        Self {
            three_axis: default_three_axis(),
            four_axis: default_four_axis(),
            five_axis: default_five_axis(),
        }
    }
}

impl ProfileTable {
    pub fn profile(&self, kind: AxisKind) -> AxisProfile<'_> {
        let entries = match kind {
            AxisKind::ThreeAxis => &self.three_axis,
            AxisKind::FourAxis => &self.four_axis,
            AxisKind::FiveAxis => &self.five_axis,
        };
        AxisProfile { kind, entries }
    }

    /// Rejects entries that could not produce a usable output file.
    pub fn validate(&self) -> Result<(), BatchError> {
        for kind in AxisKind::ALL {
            for entry in self.profile(kind).entries {
                if entry.postprocessor.trim().is_empty() {
                    return Err(BatchError::Config(format!(
                        "{kind} profile has an entry without a postprocessor"
                    )));
                }
                if entry.extension.contains(['/', '\\']) {
                    return Err(BatchError::Config(format!(
                        "extension {:?} of {} must not contain a path separator",
                        entry.extension, entry.postprocessor
                    )));
                }
            }
        }
        Ok(())
    }
}

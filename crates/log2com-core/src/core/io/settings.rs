use super::error::IoError;
use serde::{Deserialize, Serialize};

/// Options rendered into the header of a job deck.
///
/// Values are kept as the strings the user supplied and passed through to
/// the deck verbatim; no chemistry validation happens here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct JobSettings {
    pub charge: String,
    #[serde(alias = "mul")]
    pub multiplicity: String,
    pub job: String,
    pub theory: String,
    pub basis: String,
    pub cores: String,
    pub memory: String,
    pub linda: String,
}

impl Default for JobSettings {
    fn default() -> Self {
        Self {
            charge: "0".to_string(),
            multiplicity: "1".to_string(),
            job: "Opt Freq".to_string(),
            theory: "B3LYP".to_string(),
            basis: "6-311G(2df,2p)".to_string(),
            cores: "8".to_string(),
            memory: "20gb".to_string(),
            linda: "1".to_string(),
        }
    }
}

impl JobSettings {
    /// Option names accepted by [`JobSettings::set`], in display order.
    pub const KEYS: [&'static str; 8] = [
        "charge",
        "multiplicity",
        "job",
        "theory",
        "basis",
        "cores",
        "memory",
        "linda",
    ];

    fn slot_mut(&mut self, key: &str) -> Option<&mut String> {
        match key {
            "charge" => Some(&mut self.charge),
            "mul" | "multiplicity" => Some(&mut self.multiplicity),
            "job" => Some(&mut self.job),
            "theory" => Some(&mut self.theory),
            "basis" => Some(&mut self.basis),
            "cores" => Some(&mut self.cores),
            "memory" => Some(&mut self.memory),
            "linda" => Some(&mut self.linda),
            _ => None,
        }
    }

    /// Looks up an option by name.
    pub fn get(&self, key: &str) -> Option<&str> {
        let value = match key {
            "charge" => &self.charge,
            "mul" | "multiplicity" => &self.multiplicity,
            "job" => &self.job,
            "theory" => &self.theory,
            "basis" => &self.basis,
            "cores" => &self.cores,
            "memory" => &self.memory,
            "linda" => &self.linda,
            _ => return None,
        };
        Some(value)
    }

    /// Sets an option by name. `mul` is accepted as a short form of `multiplicity`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::UnknownSetting`] for an unrecognized key; the
    /// settings are left unchanged.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), IoError> {
        let slot = self
            .slot_mut(key.trim())
            .ok_or_else(|| IoError::UnknownSetting(key.to_string()))?;
        *slot = value.trim().to_string();
        Ok(())
    }

    /// All options as `(name, value)` pairs, in [`JobSettings::KEYS`] order.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        Self::KEYS
            .iter()
            .filter_map(|&key| self.get(key).map(|value| (key, value)))
            .collect()
    }
}

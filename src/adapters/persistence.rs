use crate::core::{InputField, RawInputs, Storage};
use crate::utils::error::Result;

/// Flat `key=value` store of the raw input values.
///
/// Only the inputs are kept; derived results are always recomputed.
pub struct InputStore<S: Storage> {
    storage: S,
    path: String,
}

impl<S: Storage> InputStore<S> {
    pub fn new(storage: S, path: impl Into<String>) -> Self {
        Self {
            storage,
            path: path.into(),
        }
    }

    /// Reads the stored inputs. A store that does not exist yet is empty.
    pub async fn load(&self) -> Result<RawInputs> {
        if !self.storage.exists(&self.path).await {
            tracing::debug!("No input store at {}, starting empty", self.path);
            return Ok(RawInputs::new());
        }

        let data = self.storage.read_file(&self.path).await?;
        let raw = decode(&String::from_utf8_lossy(&data));
        tracing::info!("Loaded {} stored inputs from {}", raw.iter().count(), self.path);
        Ok(raw)
    }

    pub async fn save(&self, raw: &RawInputs) -> Result<()> {
        self.storage
            .write_file(&self.path, encode(raw).as_bytes())
            .await?;
        tracing::debug!("Saved inputs to {}", self.path);
        Ok(())
    }
}

pub fn encode(raw: &RawInputs) -> String {
    let mut out = String::new();
    for field in InputField::ALL {
        if let Some(value) = raw.get(field) {
            // one pair per line, so a value can never span lines
            let value = value.replace(['\r', '\n'], " ");
            out.push_str(field.key());
            out.push('=');
            out.push_str(value.trim());
            out.push('\n');
        }
    }
    out
}

/// Parses `key=value` lines. Blank lines and `#` comments are ignored; unknown
/// keys and lines without `=` are skipped with a warning.
pub fn decode(text: &str) -> RawInputs {
    let mut raw = RawInputs::new();

    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            tracing::warn!("Skipping malformed store line {}: {:?}", number + 1, line);
            continue;
        };

        match key.trim().parse::<InputField>() {
            Ok(field) => raw.set(field, value.trim()),
            Err(e) => tracing::warn!("Skipping store line {}: {}", number + 1, e),
        }
    }

    raw
}

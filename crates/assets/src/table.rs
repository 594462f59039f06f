use std::path::Path;

use crate::ModelError;
use crate::model::Model;

/// Words preceding the model count in an environment blob.
const BLOB_HEADER_WORDS: usize = 2;

/// Read-only table of environment models, in load order.
#[derive(Debug, Clone, Default)]
pub struct ModelTable {
    models: Vec<Model>,
}

impl ModelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an environment blob: two header words, a model count, then each
    /// model back to back.
    pub fn from_words(words: &[u16]) -> Result<Self, ModelError> {
        let count_at = BLOB_HEADER_WORDS;
        let count = *words.get(count_at).ok_or(ModelError::Truncated {
            needed: count_at + 1,
            available: words.len(),
        })? as usize;

        let mut offset = count_at + 1;
        let mut models = Vec::with_capacity(count);
        for i in 0..count {
            let (model, used) = Model::from_words(&words[offset..]).inspect_err(|e| {
                tracing::debug!(model = i, offset, error = %e, "model parse rejected");
            })?;
            offset += used;
            models.push(model);
        }
        tracing::debug!(models = models.len(), words = offset, "environment table parsed");
        Ok(Self { models })
    }

    /// Parse a little-endian environment blob.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ModelError> {
        if bytes.len() % 2 != 0 {
            return Err(ModelError::OddLength(bytes.len()));
        }
        let words: Vec<u16> = bytemuck::pod_collect_to_vec::<u8, u16>(bytes)
            .into_iter()
            .map(u16::from_le)
            .collect();
        Self::from_words(&words)
    }

    /// Load an environment blob from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(&bytes)
    }

    /// Serialise as an environment blob (zeroed header words).
    pub fn to_words(&self) -> Vec<u16> {
        let mut out = vec![0; BLOB_HEADER_WORDS];
        out.push(self.models.len() as u16);
        for m in &self.models {
            out.extend(m.to_words());
        }
        out
    }

    /// Write as a little-endian environment blob.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ModelError> {
        let bytes: Vec<u8> = self
            .to_words()
            .into_iter()
            .flat_map(u16::to_le_bytes)
            .collect();
        std::fs::write(path.as_ref(), bytes)?;
        Ok(())
    }

    pub fn push(&mut self, model: Model) -> usize {
        self.models.push(model);
        self.models.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&Model> {
        self.models.get(index)
    }

    /// First model carrying `label`.
    pub fn by_label(&self, label: u16) -> Option<&Model> {
        self.models.iter().find(|m| m.label() == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Model> {
        self.models.iter()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl FromIterator<Model> for ModelTable {
    fn from_iter<I: IntoIterator<Item = Model>>(iter: I) -> Self {
        Self {
            models: iter.into_iter().collect(),
        }
    }
}

//! Per-field conversion pipeline.
//!
//! A [`TransformMap`] maps each raw input field to a conversion producing a
//! named output field. Redaction is layered on top of an existing map by
//! [`crate::compose`]; this module only owns the map and runs it.

use crate::error::TransformError;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Conversion from a raw field value to its validated output.
pub type Converter = Arc<dyn Fn(&str) -> Result<String, TransformError> + Send + Sync>;

/// One pipeline entry: a conversion and the field it writes.
#[derive(Clone)]
pub struct FieldTransform {
    pub output_field: String,
    pub convert: Converter,
}

impl FieldTransform {
    pub fn new<F>(output_field: impl Into<String>, convert: F) -> Self
    where
        F: Fn(&str) -> Result<String, TransformError> + Send + Sync + 'static,
    {
        Self {
            output_field: output_field.into(),
            convert: Arc::new(convert),
        }
    }

    /// Entry that copies the raw value unchanged.
    pub fn identity(output_field: impl Into<String>) -> Self {
        Self::new(output_field, |raw| Ok(raw.to_string()))
    }

    pub fn apply(&self, raw: &str) -> Result<String, TransformError> {
        (self.convert)(raw)
    }
}

impl std::fmt::Debug for FieldTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldTransform")
            .field("output_field", &self.output_field)
            .finish_non_exhaustive()
    }
}

/// Input field name → conversion entry.
#[derive(Debug, Clone, Default)]
pub struct TransformMap {
    entries: BTreeMap<String, FieldTransform>,
}

impl TransformMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity entries for each named field, each writing to the same name.
    pub fn identity<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut map = Self::new();
        for field in fields {
            let field = field.into();
            map.insert(field.clone(), FieldTransform::identity(field));
        }
        map
    }

    /// Add or replace the entry for `input_field`.
    pub fn insert(
        &mut self,
        input_field: impl Into<String>,
        transform: FieldTransform,
    ) -> Option<FieldTransform> {
        self.entries.insert(input_field.into(), transform)
    }

    pub fn get(&self, input_field: &str) -> Option<&FieldTransform> {
        self.entries.get(input_field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldTransform)> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut FieldTransform)> {
        self.entries.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Convert one record.
    ///
    /// Fields with an entry are converted and written under the entry's
    /// output name; other fields pass through. Every failing field is
    /// reported, and no output is produced if any field failed.
    pub fn run(
        &self,
        record: &BTreeMap<String, String>,
    ) -> Result<BTreeMap<String, String>, Vec<TransformError>> {
        let mut output = BTreeMap::new();
        let mut errors = Vec::new();

        for (field, raw) in record {
            match self.entries.get(field) {
                Some(transform) => match transform.apply(raw) {
                    Ok(value) => {
                        output.insert(transform.output_field.clone(), value);
                    }
                    Err(err) => errors.push(err),
                },
                None => {
                    output.insert(field.clone(), raw.clone());
                }
            }
        }

        if errors.is_empty() {
            Ok(output)
        } else {
            Err(errors)
        }
    }
}

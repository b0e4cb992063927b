use std::collections::BTreeMap;

use serde::Serialize;

/// Field name to the list of reasons that field was rejected.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn single(field: &str, reason: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.add(field, reason);
        errors
    }

    pub fn add(&mut self, field: &str, reason: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(reason.into());
    }

    pub fn reasons(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of rejected fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rendered = self
            .0
            .iter()
            .map(|(field, reasons)| format!("{field} {}", reasons.join(", ")))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&rendered)
    }
}

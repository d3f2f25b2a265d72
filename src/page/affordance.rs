use serde::{Deserialize, Serialize};
use std::fmt;

/// What sort of UI element an affordance names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AffordanceKind {
    Button,
    Input,
    Table,
}

impl fmt::Display for AffordanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AffordanceKind::Button => "button",
            AffordanceKind::Input => "input",
            AffordanceKind::Table => "table",
        };
        f.write_str(name)
    }
}

/// A named UI target and the model used to find it on screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affordance {
    pub kind: AffordanceKind,

    /// Semantic label, e.g. "login" or "username"
    pub label: String,

    /// Workflow or model id sent to the inference service
    pub model_id: String,
}

impl Affordance {
    pub fn new(kind: AffordanceKind, label: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self { kind, label: label.into(), model_id: model_id.into() }
    }

    pub fn button(label: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self::new(AffordanceKind::Button, label, model_id)
    }

    pub fn input(label: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self::new(AffordanceKind::Input, label, model_id)
    }

    pub fn table(label: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self::new(AffordanceKind::Table, label, model_id)
    }
}

impl fmt::Display for Affordance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}' ({})", self.kind, self.label, self.model_id)
    }
}

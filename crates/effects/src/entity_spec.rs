use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::input::GeometryInput;
use crate::kind::{EffectKind, UnknownKind};
use crate::options::Options;

/// Declarative request for one visual effect.
///
/// `kind` stays a string until creation so that an instruction naming an
/// unknown effect can still be carried around and reported.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySpec {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: GeometryInput,
    #[serde(default)]
    pub options: Options,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl EntitySpec {
    pub fn new(kind: impl Into<String>, data: GeometryInput) -> Self {
        Self {
            kind: kind.into(),
            data,
            options: Options::new(),
            id: None,
        }
    }

    pub fn of(kind: EffectKind, data: GeometryInput) -> Self {
        Self::new(kind.as_str(), data)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    pub fn effect_kind(&self) -> Result<EffectKind, UnknownKind> {
        self.kind.parse()
    }
}

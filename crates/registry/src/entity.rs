use std::borrow::Borrow;
use std::fmt;

use effects::{AnimatedSample, EffectKind, GeometryInput, Options, RenderState};
use foundation::time::Time;
use serde::{Deserialize, Serialize};

/// Stable, caller-visible entity identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A live effect: its identity, the inputs it was built from, and the render
/// state those inputs produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderableEntity {
    pub id: EntityId,
    pub kind: EffectKind,
    pub created_at: Time,
    pub render_state: RenderState,
    pub raw_data: GeometryInput,
    pub raw_options: Options,
}

impl RenderableEntity {
    /// Time-dependent parameters at `now`.
    pub fn sample(&self, now: Time) -> AnimatedSample {
        self.render_state.sample(now, self.created_at)
    }
}

//! Offline replay of instruction batches, used by the `geopulse` binary.

use std::collections::BTreeMap;

use effects::{AnimatedSample, EffectKind, EntitySpec};
use registry::{BatchOutcome, BatchReport, EntityId, EntityRegistry, process_batch};
use runtime::frame::Frame;
use runtime::metrics::MetricsSnapshot;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ReplayOptions {
    /// Clock ticks to run after the batch is applied.
    pub frames: u64,
    /// Milliseconds between ticks.
    pub frame_ms: f64,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self {
            frames: 60,
            frame_ms: 1000.0 / 60.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySample {
    pub id: EntityId,
    pub kind: EffectKind,
    #[serde(flatten)]
    pub sample: AnimatedSample,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayReport {
    pub summary: BatchReport,
    pub outcomes: Vec<BatchOutcome>,
    pub stats: BTreeMap<EffectKind, usize>,
    pub final_frame: Frame,
    pub samples: Vec<EntitySample>,
    pub metrics: MetricsSnapshot,
}

pub fn parse_instructions(json: &str) -> Result<Vec<EntitySpec>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Applies `instructions`, advances the clock `options.frames` times and
/// reports the resulting state.
pub fn replay(
    registry: &mut EntityRegistry,
    instructions: Vec<EntitySpec>,
    options: ReplayOptions,
) -> ReplayReport {
    let outcomes = process_batch(registry, instructions);

    let start = registry.now().millis();
    for frame in 1..=options.frames {
        registry.tick(start + frame as f64 * options.frame_ms);
    }
    let final_frame = registry.frame();
    info!(
        frames = options.frames,
        time_ms = final_frame.time.millis(),
        entities = registry.len(),
        "replay finished"
    );

    let now = registry.now();
    let samples = registry
        .get_all()
        .into_iter()
        .map(|entity| EntitySample {
            sample: entity.sample(now),
            id: entity.id,
            kind: entity.kind,
        })
        .collect();

    ReplayReport {
        summary: BatchReport::from_outcomes(&outcomes),
        outcomes,
        stats: registry.stats(),
        final_frame,
        samples,
        metrics: registry.metrics(),
    }
}

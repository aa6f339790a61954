use std::collections::{BTreeMap, BTreeSet, HashMap};

use effects::{
    AnimatedSample, BuildError, BuildInput, EffectKind, EntitySpec, GeometryInput, Options,
    RenderState, UnknownKind, build, merge,
};
use foundation::time::Time;
use runtime::clock::AnimationClock;
use runtime::config::EngineConfig;
use runtime::frame::Frame;
use runtime::metrics::{Metrics, MetricsSnapshot};
use thiserror::Error;
use tracing::{debug, warn};

use crate::entity::{EntityId, RenderableEntity};

pub const ENTITIES_CREATED: &str = "entities.created";
pub const ENTITIES_REPLACED: &str = "entities.replaced";
pub const ENTITIES_REMOVED: &str = "entities.removed";
pub const CREATE_FAILED: &str = "create.failed";
pub const CLOCK_TICKS: &str = "clock.ticks";
pub const ENTITIES_LIVE: &str = "entities.live";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CreateError {
    #[error(transparent)]
    InvalidType(#[from] UnknownKind),
    #[error("malformed geometry: {0}")]
    MalformedGeometry(#[from] BuildError),
}

/// Owns every live effect and the clock they animate against.
///
/// Entities are kept in insertion order. Snapshots returned by the getters are
/// owned copies, so holding one never blocks a mutation.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    config: EngineConfig,
    clock: AnimationClock,
    metrics: Metrics,
    next_seq: u64,
    next_generated: u64,
    entities: BTreeMap<u64, RenderableEntity>,
    by_id: HashMap<EntityId, u64>,
    by_kind: BTreeMap<EffectKind, BTreeSet<u64>>,
}

impl EntityRegistry {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Builds and stores the effect described by `spec`.
    ///
    /// An existing entity with the same id is replaced; the replacement goes to
    /// the end of the insertion order. Nothing is stored on failure.
    pub fn create(&mut self, spec: EntitySpec) -> Result<EntityId, CreateError> {
        let kind = match spec.effect_kind() {
            Ok(kind) => kind,
            Err(err) => {
                warn!(kind = %spec.kind, "rejecting effect of unknown type");
                self.metrics.incr(CREATE_FAILED);
                return Err(err.into());
            }
        };

        let id = match spec.id {
            Some(id) => EntityId(id),
            None => self.generate_id(kind),
        };
        let created_at = self.clock.now();

        let render_state = match rebuild(&self.config, &id, kind, &spec.data, &spec.options, created_at) {
            Ok(state) => state,
            Err(err) => {
                warn!(%id, %kind, error = %err, "failed to build effect");
                self.metrics.incr(CREATE_FAILED);
                return Err(err.into());
            }
        };

        if self.detach(id.as_str()).is_some() {
            debug!(%id, "replacing existing entity");
            self.metrics.incr(ENTITIES_REPLACED);
        }

        self.insert(RenderableEntity {
            id: id.clone(),
            kind,
            created_at,
            render_state,
            raw_data: spec.data,
            raw_options: spec.options,
        });
        self.metrics.incr(ENTITIES_CREATED);
        self.update_live_gauge();
        debug!(%id, %kind, created_at_ms = created_at.millis(), "created entity");
        Ok(id)
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let removed = self.detach(id).is_some();
        if removed {
            self.metrics.incr(ENTITIES_REMOVED);
            self.update_live_gauge();
            debug!(id, "removed entity");
        }
        removed
    }

    /// Removes every entity of `kind`, returning how many were removed.
    pub fn remove_by_type(&mut self, kind: EffectKind) -> usize {
        let Some(seqs) = self.by_kind.remove(&kind) else {
            return 0;
        };

        let mut removed = 0;
        for seq in seqs {
            if let Some(entity) = self.entities.remove(&seq) {
                self.by_id.remove(entity.id.as_str());
                removed += 1;
            }
        }

        self.metrics.incr_by(ENTITIES_REMOVED, removed as u64);
        self.update_live_gauge();
        debug!(%kind, removed, "removed entities by type");
        removed
    }

    /// Replaces the entity's geometry input and rebuilds it.
    ///
    /// Returns `false` when the id is unknown or the new data does not build;
    /// in the latter case the entity keeps its previous state.
    pub fn update_data(&mut self, id: &str, data: GeometryInput) -> bool {
        let Some(seq) = self.by_id.get(id).copied() else {
            debug!(id, "update_data for unknown entity");
            return false;
        };
        let Some(state) = self.rebuild_entity(seq, Some(&data), None) else {
            return false;
        };
        if let Some(entity) = self.entities.get_mut(&seq) {
            entity.render_state = state;
            entity.raw_data = data;
        }
        debug!(id, "updated entity data");
        true
    }

    /// Shallow-merges `options` over the entity's options and rebuilds it.
    ///
    /// Same failure rules as [`Self::update_data`].
    pub fn update_options(&mut self, id: &str, options: Options) -> bool {
        let Some(seq) = self.by_id.get(id).copied() else {
            debug!(id, "update_options for unknown entity");
            return false;
        };
        let Some(current) = self.entities.get(&seq) else {
            return false;
        };
        let merged = merge(&current.raw_options, options);
        let Some(state) = self.rebuild_entity(seq, None, Some(&merged)) else {
            return false;
        };
        if let Some(entity) = self.entities.get_mut(&seq) {
            entity.render_state = state;
            entity.raw_options = merged;
        }
        debug!(id, "updated entity options");
        true
    }

    pub fn get(&self, id: &str) -> Option<RenderableEntity> {
        self.by_id
            .get(id)
            .and_then(|seq| self.entities.get(seq))
            .cloned()
    }

    /// Every live entity, in insertion order.
    pub fn get_all(&self) -> Vec<RenderableEntity> {
        self.entities.values().cloned().collect()
    }

    pub fn get_by_type(&self, kind: EffectKind) -> Vec<RenderableEntity> {
        self.by_kind
            .get(&kind)
            .map(|seqs| {
                seqs.iter()
                    .filter_map(|seq| self.entities.get(seq))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Live entity count per kind. Kinds with no entities are absent.
    pub fn stats(&self) -> BTreeMap<EffectKind, usize> {
        self.by_kind
            .iter()
            .map(|(kind, seqs)| (*kind, seqs.len()))
            .collect()
    }

    pub fn clear(&mut self) {
        let removed = self.entities.len();
        self.entities.clear();
        self.by_id.clear();
        self.by_kind.clear();
        self.metrics.incr_by(ENTITIES_REMOVED, removed as u64);
        self.update_live_gauge();
        debug!(removed, "cleared registry");
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Advances the shared clock. Entities are not visited.
    pub fn tick(&mut self, timestamp_ms: f64) -> Frame {
        self.metrics.incr(CLOCK_TICKS);
        self.clock.tick(timestamp_ms)
    }

    pub fn now(&self) -> Time {
        self.clock.now()
    }

    pub fn frame(&self) -> Frame {
        self.clock.frame()
    }

    /// Animated parameters of one entity at the current clock time.
    pub fn sample(&self, id: &str) -> Option<AnimatedSample> {
        let now = self.clock.now();
        self.by_id
            .get(id)
            .and_then(|seq| self.entities.get(seq))
            .map(|entity| entity.sample(now))
    }

    /// Animated parameters of every entity at the current clock time, in
    /// insertion order.
    pub fn samples(&self) -> Vec<(EntityId, AnimatedSample)> {
        let now = self.clock.now();
        self.entities
            .values()
            .map(|entity| (entity.id.clone(), entity.sample(now)))
            .collect()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    fn generate_id(&mut self, kind: EffectKind) -> EntityId {
        loop {
            self.next_generated += 1;
            let candidate = format!("{}-{}", kind.as_str(), self.next_generated);
            if !self.by_id.contains_key(candidate.as_str()) {
                return EntityId(candidate);
            }
        }
    }

    fn insert(&mut self, entity: RenderableEntity) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.by_id.insert(entity.id.clone(), seq);
        self.by_kind.entry(entity.kind).or_default().insert(seq);
        self.entities.insert(seq, entity);
    }

    fn detach(&mut self, id: &str) -> Option<RenderableEntity> {
        let seq = self.by_id.remove(id)?;
        let entity = self.entities.remove(&seq)?;
        if let Some(seqs) = self.by_kind.get_mut(&entity.kind) {
            seqs.remove(&seq);
            if seqs.is_empty() {
                self.by_kind.remove(&entity.kind);
            }
        }
        Some(entity)
    }

    /// Rebuilds entity `seq` with optional replacement inputs. Logs and returns
    /// `None` if the builder rejects them.
    fn rebuild_entity(
        &self,
        seq: u64,
        data: Option<&GeometryInput>,
        options: Option<&Options>,
    ) -> Option<RenderState> {
        let entity = self.entities.get(&seq)?;
        let data = data.unwrap_or(&entity.raw_data);
        let options = options.unwrap_or(&entity.raw_options);
        match rebuild(&self.config, &entity.id, entity.kind, data, options, entity.created_at) {
            Ok(state) => Some(state),
            Err(err) => {
                warn!(id = %entity.id, kind = %entity.kind, error = %err, "rebuild failed; keeping previous state");
                None
            }
        }
    }

    fn update_live_gauge(&mut self) {
        self.metrics.set_gauge(ENTITIES_LIVE, self.entities.len() as i64);
    }
}

fn rebuild(
    config: &EngineConfig,
    id: &EntityId,
    kind: EffectKind,
    data: &GeometryInput,
    options: &Options,
    clock: Time,
) -> Result<RenderState, BuildError> {
    build(
        kind,
        &BuildInput {
            id: id.as_str(),
            data,
            options,
            clock,
            config,
        },
    )
}

use std::collections::HashSet;

use effects::{BuildError, EffectKind, EntitySpec, GeometryInput, PointRecord, RenderState};
use foundation::time::Time;
use pretty_assertions::assert_eq;
use registry::{CreateError, EntityRegistry};
use runtime::config::EngineConfig;
use serde_json::json;

fn points(coords: &[(f64, f64)]) -> GeometryInput {
    GeometryInput::Points(coords.iter().map(|&(lat, lon)| PointRecord::at(lat, lon)).collect())
}

fn dot(lat: f64, lon: f64) -> EntitySpec {
    EntitySpec::of(EffectKind::PulsingDot, points(&[(lat, lon)]))
}

fn arc(from: (f64, f64), to: (f64, f64)) -> EntitySpec {
    EntitySpec::of(
        EffectKind::AnimatedArc,
        GeometryInput::Points(vec![PointRecord::at(from.0, from.1).with_target(to.0, to.1)]),
    )
}

fn assert_close(a: f64, b: f64, eps: f64) {
    let diff = (a - b).abs();
    assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
}

#[test]
fn remove_by_type_leaves_other_kinds_alone() {
    let mut registry = EntityRegistry::default();
    for i in 0..3 {
        registry.create(dot(i as f64, i as f64)).unwrap();
    }
    registry.create(arc((0.0, 0.0), (10.0, 10.0))).unwrap();
    registry.create(arc((5.0, 5.0), (-10.0, 40.0))).unwrap();

    assert_eq!(registry.remove_by_type(EffectKind::PulsingDot), 3);
    assert_eq!(registry.get_by_type(EffectKind::AnimatedArc).len(), 2);
    assert_eq!(registry.get_by_type(EffectKind::PulsingDot).len(), 0);
    assert_eq!(registry.remove_by_type(EffectKind::PulsingDot), 0);
    assert_eq!(registry.len(), 2);

    let stats = registry.stats();
    assert!(!stats.contains_key(&EffectKind::PulsingDot));
    assert_eq!(stats.get(&EffectKind::AnimatedArc), Some(&2));
}

#[test]
fn ids_stay_unique_across_creates_and_removals() {
    let mut registry = EntityRegistry::default();
    let mut seen = HashSet::new();
    for i in 0..20 {
        let id = registry.create(dot(0.0, i as f64)).unwrap();
        assert!(seen.insert(id.clone()), "duplicate id {id}");
        if i % 3 == 0 {
            assert!(registry.remove(id.as_str()));
        }
    }
    let live: HashSet<_> = registry.get_all().into_iter().map(|e| e.id).collect();
    assert_eq!(live.len(), registry.len());
}

#[test]
fn unknown_type_is_rejected_and_nothing_is_stored() {
    let mut registry = EntityRegistry::default();
    let err = registry
        .create(EntitySpec::new("hologram", points(&[(0.0, 0.0)])))
        .unwrap_err();
    assert!(matches!(err, CreateError::InvalidType(_)));
    assert!(registry.is_empty());
    assert!(registry.stats().is_empty());
    assert_eq!(registry.metrics().counters.get("create.failed"), Some(&1));
}

#[test]
fn malformed_geometry_is_reported() {
    let mut registry = EntityRegistry::default();
    let err = registry
        .create(EntitySpec::of(EffectKind::AnimatedArc, points(&[(0.0, 0.0)])))
        .unwrap_err();
    assert_eq!(
        err,
        CreateError::MalformedGeometry(BuildError::MissingEndpoints { index: 0 })
    );
    assert!(registry.is_empty());
}

#[test]
fn stats_sum_matches_len() {
    let mut registry = EntityRegistry::default();
    registry.create(dot(0.0, 0.0)).unwrap();
    registry.create(dot(1.0, 0.0)).unwrap();
    registry.create(arc((0.0, 0.0), (1.0, 1.0))).unwrap();
    registry
        .create(EntitySpec::of(EffectKind::EventMarker, points(&[(3.0, 3.0)])))
        .unwrap();

    let stats = registry.stats();
    assert_eq!(stats.get(&EffectKind::PulsingDot), Some(&2));
    assert_eq!(stats.get(&EffectKind::AnimatedArc), Some(&1));
    assert_eq!(stats.get(&EffectKind::Explosion), None);
    assert_eq!(stats.values().sum::<usize>(), registry.len());

    registry.clear();
    assert!(registry.stats().is_empty());
    assert_eq!(registry.len(), 0);
}

#[test]
fn update_data_rebuilds_and_keeps_identity() {
    let mut registry = EntityRegistry::default();
    registry.tick(250.0);
    let id = registry.create(dot(0.0, 0.0)).unwrap();
    registry.tick(900.0);

    assert!(registry.update_data(id.as_str(), points(&[(45.0, 90.0)])));
    let entity = registry.get(id.as_str()).unwrap();
    assert_eq!(entity.created_at, Time(250.0));
    assert_eq!(entity.kind, EffectKind::PulsingDot);
    let RenderState::PulsingDot { dots, .. } = &entity.render_state else {
        panic!("wrong variant");
    };
    assert_eq!(dots[0].geo.lat_deg(), 45.0);
}

#[test]
fn failed_update_leaves_entity_untouched() {
    let mut registry = EntityRegistry::default();
    let id = registry.create(dot(10.0, 10.0)).unwrap();
    let before = registry.get(id.as_str()).unwrap();

    assert!(!registry.update_data(id.as_str(), points(&[(95.0, 0.0)])));
    assert_eq!(registry.get(id.as_str()).unwrap(), before);

    assert!(!registry.update_data("missing", points(&[(0.0, 0.0)])));
    assert!(!registry.update_options("missing", serde_json::Map::new()));
}

#[test]
fn snapshots_are_owned_copies() {
    let mut registry = EntityRegistry::default();
    registry.create(dot(0.0, 0.0)).unwrap();
    registry.create(dot(1.0, 1.0)).unwrap();

    let snapshot = registry.get_all();
    for entity in &snapshot {
        registry.remove(entity.id.as_str());
    }
    assert_eq!(snapshot.len(), 2);
    assert!(registry.is_empty());
}

#[test]
fn pulsing_dot_samples_follow_the_clock() {
    let mut registry = EntityRegistry::default();
    let id = registry.create(dot(35.0, 139.0)).unwrap();

    assert_eq!(registry.sample(id.as_str()).unwrap().radius, Some(5000.0));
    registry.tick(392.7);
    assert_close(registry.sample(id.as_str()).unwrap().radius.unwrap(), 6500.0, 0.01);
    assert!(registry.sample("missing").is_none());
}

#[test]
fn explosion_loops_relative_to_creation() {
    let mut registry = EntityRegistry::default();
    registry.tick(1000.0);
    let id = registry
        .create(
            EntitySpec::of(EffectKind::Explosion, points(&[(0.0, 0.0)]))
                .with_option("duration", json!(2000)),
        )
        .unwrap();

    let at_start = registry.sample(id.as_str()).unwrap();
    registry.tick(2000.0);
    let mid = registry.sample(id.as_str()).unwrap();
    registry.tick(3000.0);
    let looped = registry.sample(id.as_str()).unwrap();

    assert_eq!(at_start.radius, Some(10_000.0));
    assert!(mid.radius.unwrap() > at_start.radius.unwrap());
    assert_close(looped.radius.unwrap(), 10_000.0, 1e-9);
}

#[test]
fn clock_ignores_rewinds() {
    let mut registry = EntityRegistry::default();
    registry.tick(500.0);
    let frame = registry.tick(100.0);
    assert_eq!(frame.time, Time(500.0));
    assert_eq!(frame.index, 2);
}

#[test]
fn config_drives_projection_radius() {
    let config = EngineConfig::from_toml_str("[globe]\nradius = 2.0\n").unwrap();
    let mut registry = EntityRegistry::new(config);
    let id = registry
        .create(EntitySpec::of(EffectKind::EventMarker, points(&[(12.0, 34.0)])))
        .unwrap();
    let entity = registry.get(id.as_str()).unwrap();
    let position = entity.render_state.positions()[0];
    assert_close(position.length(), 2.0, 1e-12);
}

#[test]
fn explosion_render_radius_follows_globe_scale() {
    let config = EngineConfig::from_toml_str("[globe]\nradius = 1.0\nearth_radius_km = 10.0\n").unwrap();
    let mut registry = EntityRegistry::new(config);
    let id = registry
        .create(EntitySpec::of(EffectKind::Explosion, points(&[(0.0, 0.0)])))
        .unwrap();

    let sample = registry.sample(id.as_str()).unwrap();
    assert_eq!(sample.radius, Some(10_000.0));
    assert_close(sample.render_radius.unwrap(), 1.0, 1e-12);
}

use std::path::PathBuf;

use effects::{EffectKind, EntitySpec, GeometryInput, PointRecord};
use pretty_assertions::assert_eq;
use registry::{BatchReport, EntityRegistry, process_batch};

fn fixture(name: &str) -> Vec<EntitySpec> {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/data");
    path.push(name);
    let content = std::fs::read_to_string(&path).expect("read fixture");
    serde_json::from_str(&content).expect("parse fixture")
}

#[test]
fn one_bad_instruction_does_not_affect_the_others() {
    let mut registry = EntityRegistry::default();
    let instructions = vec![
        EntitySpec::of(
            EffectKind::PulsingDot,
            GeometryInput::Points(vec![PointRecord::at(10.0, 10.0)]),
        ),
        EntitySpec::new("not_a_kind", GeometryInput::Points(vec![PointRecord::at(0.0, 0.0)])),
        EntitySpec::of(
            EffectKind::EventMarker,
            GeometryInput::Points(vec![PointRecord::at(-10.0, 20.0)]),
        ),
    ];

    let outcomes = process_batch(&mut registry, instructions.clone());

    assert_eq!(outcomes.len(), 3);
    assert_eq!(
        outcomes.iter().map(|o| o.success).collect::<Vec<_>>(),
        vec![true, false, true]
    );
    assert!(outcomes[1].id.is_none());
    assert!(outcomes[1].error.as_deref().unwrap_or_default().contains("not_a_kind"));
    for (outcome, instruction) in outcomes.iter().zip(&instructions) {
        assert_eq!(&outcome.instruction, instruction);
    }
    assert_eq!(registry.len(), 2);
}

#[test]
fn mixed_fixture_reports_each_instruction() {
    let mut registry = EntityRegistry::default();
    let outcomes = process_batch(&mut registry, fixture("mixed_batch.json"));

    assert_eq!(
        BatchReport::from_outcomes(&outcomes),
        BatchReport {
            total: 6,
            succeeded: 4,
            failed: 2
        }
    );
    assert_eq!(outcomes[0].id.as_ref().map(|id| id.as_str()), Some("quake-tokyo"));
    assert!(!outcomes[2].success);
    assert!(!outcomes[5].success);
    assert!(
        outcomes[5]
            .error
            .as_deref()
            .unwrap_or_default()
            .starts_with("malformed geometry")
    );

    let stats = registry.stats();
    assert_eq!(stats.get(&EffectKind::GlowingBorder), None);
    assert_eq!(stats.values().sum::<usize>(), registry.len());
}

#[test]
fn repeated_ids_in_one_batch_keep_the_last() {
    let mut registry = EntityRegistry::default();
    let first = EntitySpec::of(
        EffectKind::PulsingDot,
        GeometryInput::Points(vec![PointRecord::at(1.0, 1.0)]),
    )
    .with_id("same");
    let second = EntitySpec::of(
        EffectKind::Explosion,
        GeometryInput::Points(vec![PointRecord::at(2.0, 2.0)]),
    )
    .with_id("same");

    let outcomes = process_batch(&mut registry, vec![first, second]);

    assert!(outcomes.iter().all(|o| o.success));
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get("same").map(|e| e.kind), Some(EffectKind::Explosion));
}

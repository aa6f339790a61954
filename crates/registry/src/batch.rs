//! Batch instruction processing.
//!
//! Instructions are applied one at a time against the registry. A failing
//! instruction produces a failed outcome and does not affect the others; there
//! is no rollback.

use effects::EntitySpec;
use serde::Serialize;
use tracing::info;

use crate::entity::EntityId;
use crate::registry::EntityRegistry;

/// Result of one instruction. `instruction` echoes the input.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub instruction: EntitySpec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BatchReport {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchReport {
    pub fn from_outcomes(outcomes: &[BatchOutcome]) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.success).count();
        Self {
            total: outcomes.len(),
            succeeded,
            failed: outcomes.len() - succeeded,
        }
    }
}

/// Creates one entity per instruction, in order. Always returns exactly one
/// outcome per instruction.
pub fn process_batch(registry: &mut EntityRegistry, instructions: Vec<EntitySpec>) -> Vec<BatchOutcome> {
    let outcomes: Vec<BatchOutcome> = instructions
        .into_iter()
        .map(|instruction| match registry.create(instruction.clone()) {
            Ok(id) => BatchOutcome {
                success: true,
                id: Some(id),
                error: None,
                instruction,
            },
            Err(err) => BatchOutcome {
                success: false,
                id: None,
                error: Some(err.to_string()),
                instruction,
            },
        })
        .collect();

    let report = BatchReport::from_outcomes(&outcomes);
    info!(
        total = report.total,
        succeeded = report.succeeded,
        failed = report.failed,
        "processed batch"
    );
    outcomes
}

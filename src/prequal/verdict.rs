use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::DecisionStatus;

// checked in order: negated approvals must match before "aprob" and "qualif"
const DENIED_TOKENS: &[&str] = &[
    "no calif",
    "no aplica",
    "no aprob",
    "desaprob",
    "descalific",
    "not qualif",
    "disqualif",
    "unqualif",
    "not approved",
    "negad",
    "rechaz",
    "denied",
    "declined",
];
const REVIEW_TOKENS: &[&str] = &["revisi", "review", "analisis", "análisis", "pendiente", "evaluaci"];
const APPROVED_TOKENS: &[&str] = &["aprob", "approved", "califica", "qualif"];

/// map a free-text scorer decision onto a status, if recognized
pub fn map_decision(decision: &str) -> Option<DecisionStatus> {
    let text = decision.trim().to_lowercase();
    if text.is_empty() {
        return None;
    }

    let table: [(&[&str], DecisionStatus); 3] = [
        (DENIED_TOKENS, DecisionStatus::Denied),
        (REVIEW_TOKENS, DecisionStatus::Review),
        (APPROVED_TOKENS, DecisionStatus::Approved),
    ];

    table
        .iter()
        .find(|(tokens, _)| tokens.iter().any(|token| text.contains(token)))
        .map(|(_, status)| *status)
}

/// unrecognized decisions go to manual review
pub fn classify_decision(decision: &str) -> DecisionStatus {
    map_decision(decision).unwrap_or_else(|| {
        warn!(decision, "unmapped scorer decision, defaulting to review");
        DecisionStatus::Review
    })
}

/// which path produced the decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Verdict {
    Remote {
        status: DecisionStatus,
        decision: String,
        reason: Option<String>,
    },
    Fallback {
        status: DecisionStatus,
        cause: String,
    },
}

impl Verdict {
    pub fn status(&self) -> DecisionStatus {
        match self {
            Verdict::Remote { status, .. } | Verdict::Fallback { status, .. } => *status,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Verdict::Fallback { .. })
    }
}

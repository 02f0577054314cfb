//! Greedy packing of panels into outbound messages.
//!
//! Single pass, no reordering. A batch is closed when the next panel would
//! push it past the byte budget or past the per-message panel limit. A panel
//! that alone exceeds the budget is emitted as a batch of one; it is never
//! split.

use serde::{Deserialize, Serialize};

use crate::panel::Panel;
use crate::{MAX_PANELS_PER_MESSAGE, MESSAGE_BYTE_BUDGET};

/// Per-message ceilings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchLimits {
    pub max_bytes: usize,
    /// `0` is treated as `1`.
    pub max_panels: usize,
}

impl Default for BatchLimits {
    fn default() -> Self {
        Self {
            max_bytes: MESSAGE_BYTE_BUDGET,
            max_panels: MAX_PANELS_PER_MESSAGE,
        }
    }
}

/// Ordered, non-empty group of panels destined for one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBatch {
    panels: Vec<Panel>,
    cost: usize,
}

impl MessageBatch {
    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    /// Sum of panel costs.
    pub fn cost(&self) -> usize {
        self.cost
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    /// Always `false` for batches produced by [`pack`].
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Inclusive rank range covered, `(first, last)`.
    pub fn rank_range(&self) -> Option<(usize, usize)> {
        let first = self.panels.first()?.first_rank;
        let last = self.panels.last()?.last_rank;
        Some((first, last))
    }
}

/// Pack panels into batches, preserving order.
pub fn pack(panels: Vec<Panel>, limits: &BatchLimits) -> Vec<MessageBatch> {
    let max_panels = limits.max_panels.max(1);
    let mut out: Vec<MessageBatch> = Vec::new();
    let mut current: Vec<Panel> = Vec::new();
    let mut current_cost: usize = 0;

    for panel in panels {
        let cost = panel.cost();
        let over_budget = current_cost.saturating_add(cost) > limits.max_bytes;
        if !current.is_empty() && (over_budget || current.len() >= max_panels) {
            out.push(MessageBatch {
                panels: std::mem::take(&mut current),
                cost: current_cost,
            });
            current_cost = 0;
        }
        current_cost = current_cost.saturating_add(cost);
        current.push(panel);
    }

    if !current.is_empty() {
        out.push(MessageBatch {
            panels: current,
            cost: current_cost,
        });
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

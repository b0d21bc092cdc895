//! Per-side cap on external lookups across a whole debate.

use serde::{Deserialize, Serialize};

use super::types::Polarity;

/// Default number of tool lookups each side may make per debate.
pub const DEFAULT_LOOKUPS_PER_POLARITY: u32 = 3;

/// Counts lookups made on behalf of each side.
///
/// One budget belongs to one run; it is never shared between debates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupBudget {
    per_polarity: u32,
    pro_used: u32,
    con_used: u32,
}

impl Default for LookupBudget {
    fn default() -> Self {
        Self::new(DEFAULT_LOOKUPS_PER_POLARITY)
    }
}

impl LookupBudget {
    pub fn new(per_polarity: u32) -> Self {
        Self {
            per_polarity,
            pro_used: 0,
            con_used: 0,
        }
    }

    fn used_mut(&mut self, polarity: Polarity) -> &mut u32 {
        match polarity {
            Polarity::Pro => &mut self.pro_used,
            Polarity::Con => &mut self.con_used,
        }
    }

    /// Lookups already spent by `polarity`.
    pub fn used(&self, polarity: Polarity) -> u32 {
        match polarity {
            Polarity::Pro => self.pro_used,
            Polarity::Con => self.con_used,
        }
    }

    pub fn remaining(&self, polarity: Polarity) -> u32 {
        self.per_polarity.saturating_sub(self.used(polarity))
    }

    /// Spend one lookup for `polarity`. Returns `false` when the cap is reached.
    pub fn try_acquire(&mut self, polarity: Polarity) -> bool {
        let cap = self.per_polarity;
        let used = self.used_mut(polarity);
        if *used >= cap {
            return false;
        }
        *used += 1;
        true
    }
}

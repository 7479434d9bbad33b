//! Loop ledger - append-only record of iteration outcomes.

use crate::domain::LoopResult;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoopLedger {
    entries: Vec<LoopResult>,
}

impl LoopLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loop number the next appended entry must carry
    pub fn next_loop_number(&self) -> u32 {
        self.entries.last().map_or(1, |r| r.loop_number + 1)
    }

    /// Append an entry. Loop numbers start at 1 and increase by one.
    pub fn append(&mut self, result: LoopResult) {
        debug_assert_eq!(result.loop_number, self.next_loop_number());
        self.entries.push(result);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[LoopResult] {
        &self.entries
    }

    pub fn last(&self) -> Option<&LoopResult> {
        self.entries.last()
    }

    /// The trailing `size` entries, or everything when shorter
    pub fn window(&self, size: usize) -> &[LoopResult] {
        let start = self.entries.len().saturating_sub(size);
        &self.entries[start..]
    }

    pub fn into_vec(self) -> Vec<LoopResult> {
        self.entries
    }
}

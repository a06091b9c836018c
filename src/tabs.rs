//! Tab state machine and per-tab focus memory.
//!
//! One instance lives for the page session. The selected-tab index is only
//! ever changed through [`TabState::set_current`] after the controller has
//! validated the target against the committed view, so the machine can never
//! point at a tab that was not rendered.

use crate::host::FocusRef;

/// Number of result categories in the full three-way split.
pub const CATEGORY_COUNT: usize = 3;

/// Selected-tab index plus the focus slot remembered for each rendered tab.
///
/// `focused_by_tab[i]` holds at most one pending focus target, consumed the
/// next time tab `i` becomes active.
#[derive(Debug, Clone)]
pub struct TabState {
    current: usize,
    focused_by_tab: Vec<Option<FocusRef>>,
}

impl Default for TabState {
    fn default() -> Self {
        Self {
            current: 0,
            focused_by_tab: vec![None; CATEGORY_COUNT],
        }
    }
}

impl TabState {
    /// The currently selected tab index.
    pub fn current(&self) -> usize {
        self.current
    }

    /// How many tabs the last committed view rendered.
    pub fn tab_count(&self) -> usize {
        self.focused_by_tab.len()
    }

    /// Reset the focus memory for a freshly committed view with `tab_count`
    /// rendered tabs.
    pub fn reset(&mut self, tab_count: usize) {
        self.focused_by_tab = vec![None; tab_count.max(1)];
    }

    /// Record a validated tab selection.
    pub(crate) fn set_current(&mut self, tab: usize) {
        self.current = tab;
    }

    /// Cyclic move from the current tab over however many tabs are rendered.
    /// Returns the target index without selecting it; selection happens once
    /// the controller has validated the target.
    pub fn advance(&self, direction: isize) -> usize {
        let len = self.focused_by_tab.len() as isize;
        (self.current as isize + direction).rem_euclid(len) as usize
    }

    /// Remember the focused row for the outgoing (current) tab.
    pub fn save_focus(&mut self, focused: Option<FocusRef>) {
        if let Some(slot) = self.focused_by_tab.get_mut(self.current) {
            *slot = focused;
        }
    }

    /// Consume the pending focus target for a tab, if one was captured.
    pub fn take_focus(&mut self, tab: usize) -> Option<FocusRef> {
        self.focused_by_tab.get_mut(tab).and_then(Option::take)
    }
}

/// Tab shown after a fresh search: keep the previous selection unless its
/// category came back empty, in which case auto-advance to the first
/// non-empty category in fixed order 0→1→2.
pub fn initial_tab(previous: usize, counts: [usize; CATEGORY_COUNT]) -> usize {
    if counts.get(previous).copied().unwrap_or(0) != 0 {
        return previous;
    }
    counts
        .iter()
        .position(|&count| count != 0)
        .unwrap_or(previous)
}

//! The dashboard controller: authoritative filter state plus change
//! notification.
//!
//! A front end embeds one [`Dashboard`] and hands it a callback at
//! construction. Every state change emits the complete current
//! [`NeedFilter`] through that callback, never a delta, and there is no
//! ambient or global state anywhere; whoever owns the `Dashboard` owns
//! the selection. Emissions are synchronous. A collaborator that
//! refreshes data asynchronously must discard responses that arrive
//! after a newer state has been emitted.

use crate::filter::NeedFilter;
use std::fmt;

/// Owns the current filter selection and notifies one observer.
pub struct Dashboard {
    filter: NeedFilter,
    on_change: Box<dyn FnMut(&NeedFilter)>,
}

impl Dashboard {
    /// Start at the default (everything-selected) state. Construction
    /// itself does not emit.
    pub fn new(on_change: impl FnMut(&NeedFilter) + 'static) -> Self {
        Self::with_filter(NeedFilter::default(), on_change)
    }

    /// Resume from a previously held state. Does not emit.
    pub fn with_filter(filter: NeedFilter, on_change: impl FnMut(&NeedFilter) + 'static) -> Self {
        Self {
            filter,
            on_change: Box::new(on_change),
        }
    }

    /// The authoritative current state.
    #[must_use]
    pub const fn filter(&self) -> &NeedFilter {
        &self.filter
    }

    /// Replace the whole state and notify. This is the manual-edit path:
    /// sidebar widgets always submit the complete next state, even when
    /// only one dimension changed.
    pub fn set_filter(&mut self, next: NeedFilter) {
        self.filter = next;
        self.emit();
    }

    /// Drill into one user group: the entire state is replaced, clearing
    /// every other dimension.
    pub fn click_user_group(&mut self, id: &str) {
        self.set_filter(NeedFilter::for_user_group(id));
    }

    /// Drill into one super group; full replacement.
    pub fn click_super_group(&mut self, id: &str) {
        self.set_filter(NeedFilter::for_super_group(id));
    }

    /// Drill into one entity; full replacement.
    pub fn click_entity(&mut self, id: &str) {
        self.set_filter(NeedFilter::for_entity(id));
    }

    /// Drill into one workflow phase; full replacement.
    pub fn click_workflow_phase(&mut self, id: &str) {
        self.set_filter(NeedFilter::for_workflow_phase(id));
    }

    /// Whether a reset would change anything. UIs enable the clear
    /// affordance only when this is true.
    #[must_use]
    pub fn can_reset(&self) -> bool {
        self.filter.is_active()
    }

    /// Restore the canonical default state and notify. A no-op, with no
    /// emission, when the state is already default.
    pub fn reset(&mut self) {
        if !self.can_reset() {
            return;
        }
        self.filter.reset();
        self.emit();
    }

    fn emit(&mut self) {
        (self.on_change)(&self.filter);
    }
}

impl fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dashboard")
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

//! SELECT / GROUP BY synchronization.
//!
//! In a grouped query every non-aggregated SELECT entry must also be a GROUP BY
//! key. [`Select::add_selection`] is the only way to append to a select's
//! SELECT list and keeps both lists in step.
//!
//! Precondition: aggregate-wrapped entries are filtered out by the caller
//! before they reach this path; this module cannot tell them apart.

use super::nodes::{Select, Selectable};

impl Select {
    /// Appends `selectable` to the SELECT list and, when grouping is active and
    /// the entry is not yet a key, to the GROUP BY list as well.
    pub fn add_selection(&mut self, selectable: Selectable) {
        if let Some(group_bys) = self.group_bys.as_mut() {
            if !group_bys.contains(&selectable) {
                log::trace!("{}: {} joins GROUP BY", self.id, selectable.kind_name());
                group_bys.add(selectable.clone());
            }
        }
        self.selection.push(selectable);
    }

    /// Same as [`add_selection`](Self::add_selection), unless the select
    /// already lists the entry. Returns whether it was added.
    pub fn add_selection_if_absent(&mut self, selectable: Selectable) -> bool {
        if self.contains_selection(&selectable) {
            return false;
        }
        self.add_selection(selectable);
        true
    }

    pub fn contains_selection(&self, selectable: &Selectable) -> bool {
        self.selection.contains(selectable)
    }
}

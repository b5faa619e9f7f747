//! Sequence gate for incremental search results.
//!
//! Search-as-you-type issues a query per (debounced) keystroke, and responses
//! can complete out of order. Each query carries a token identifying the page
//! view it came from plus a sequence number that increases within that view;
//! a response may be applied only while no higher sequence from the same view
//! has been applied, so a slow response for an older keystroke can never
//! overwrite a newer result set.
//!
//! The view token is what keeps the gate honest across page lifetimes: a
//! reload or a second tab starts a fresh counter, and the gate resets with it
//! instead of holding the old high-water mark against the new page's first
//! keystrokes.

use serde::{Deserialize, Serialize};

/// High-water mark of applied sequences for one page view.
///
/// The storefront keeps one per shopper session. [`SequenceGate::observe`]
/// is the whole protocol: it decides whether a tagged response is still
/// current and returns the gate to store back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceGate {
    /// Token identifying the page view the counter belongs to.
    pub view: String,
    /// Highest sequence applied for that view.
    pub highest: u64,
}

impl SequenceGate {
    /// Apply `seq` from `view` against the prior gate, if any.
    ///
    /// Returns the gate to persist and whether the response may be applied.
    /// Within a view the highest sequence wins and anything below it is
    /// stale; a different (or first) view starts a fresh counter, so an old
    /// high-water mark never outlives its page.
    #[must_use]
    pub fn observe(prior: Option<Self>, view: &str, seq: u64) -> (Self, bool) {
        match prior {
            Some(gate) if gate.view == view => {
                if seq < gate.highest {
                    (gate, false)
                } else {
                    (Self { highest: seq, ..gate }, true)
                }
            }
            _ => (
                Self {
                    view: view.to_owned(),
                    highest: seq,
                },
                true,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn within_a_view_only_the_highest_sequence_is_current() {
        let (gate, current) = SequenceGate::observe(None, "a", 1);
        assert!(current);

        let (gate, current) = SequenceGate::observe(Some(gate), "a", 3);
        assert!(current);

        // The response for sequence 2 arrives after 3 was applied.
        let (gate, current) = SequenceGate::observe(Some(gate.clone()), "a", 2);
        assert!(!current);
        assert_eq!(gate.highest, 3);
    }

    #[test]
    fn equal_sequence_is_still_current() {
        let (gate, _) = SequenceGate::observe(None, "a", 5);
        let (_, current) = SequenceGate::observe(Some(gate), "a", 5);
        assert!(current);
    }

    #[test]
    fn a_new_view_starts_a_fresh_counter() {
        // Sequences climb during the first visit to the search page.
        let (gate, _) = SequenceGate::observe(None, "first-load", 40);

        // After a reload the client counter restarts at 1; the old high-water
        // mark must not swallow it.
        let (gate, current) = SequenceGate::observe(Some(gate), "second-load", 1);
        assert!(current);
        assert_eq!(gate.view, "second-load");
        assert_eq!(gate.highest, 1);
    }

    #[test]
    fn alternating_views_always_render() {
        // Two tabs sharing one session flip the gate back and forth; each
        // flip resets the counter, so neither tab's requests are discarded.
        let (gate, current) = SequenceGate::observe(None, "tab-a", 7);
        assert!(current);
        let (gate, current) = SequenceGate::observe(Some(gate), "tab-b", 2);
        assert!(current);
        let (_, current) = SequenceGate::observe(Some(gate), "tab-a", 8);
        assert!(current);
    }
}

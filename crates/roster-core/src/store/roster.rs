// ── Identity-aware ordered roster ──
//
// The first delivery of an id wins; later duplicates are skipped and
// never reorder or update earlier entries. Insertion order is the order
// entries were first accepted.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::model::{Person, PersonId};

/// The visible list, deduplicated by [`PersonId`].
///
/// Backed by an insertion-ordered map, so "the set of seen ids" and "the
/// ordered list" cannot drift apart. Mutated exclusively by the pager;
/// everyone else sees immutable [`snapshot`](Roster::snapshot)s.
#[derive(Debug, Default)]
pub struct Roster {
    people: IndexMap<PersonId, Person>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one page of people into the roster.
    ///
    /// Entries whose id is already present are skipped. Returns the
    /// number of newly accepted entries. Feeding the same page twice
    /// leaves the roster unchanged on the second pass.
    pub fn merge(&mut self, incoming: Vec<Person>) -> usize {
        let mut accepted = 0;
        for person in incoming {
            if !self.people.contains_key(&person.id) {
                self.people.insert(person.id.clone(), person);
                accepted += 1;
            }
        }
        accepted
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.people.clear();
    }

    /// Whether `id` has already been accepted.
    pub fn contains(&self, id: &PersonId) -> bool {
        self.people.contains_key(id)
    }

    /// Immutable ordered copy for subscribers.
    pub fn snapshot(&self) -> Arc<Vec<Person>> {
        Arc::new(self.people.values().cloned().collect())
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn person(id: u64, name: &str) -> Person {
        Person::new(id, name)
    }

    fn ids(roster: &Roster) -> Vec<PersonId> {
        roster.snapshot().iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn merge_appends_in_delivery_order() {
        let mut roster = Roster::new();
        let accepted = roster.merge(vec![person(1, "Ada"), person(2, "Brin")]);

        assert_eq!(accepted, 2);
        assert_eq!(ids(&roster), vec![PersonId::Num(1), PersonId::Num(2)]);
    }

    #[test]
    fn merge_skips_already_seen_ids() {
        let mut roster = Roster::new();
        roster.merge(vec![person(1, "Ada")]);

        let accepted = roster.merge(vec![person(1, "Ada"), person(3, "Cleo")]);

        assert_eq!(accepted, 1);
        assert_eq!(ids(&roster), vec![PersonId::Num(1), PersonId::Num(3)]);
    }

    #[test]
    fn merge_is_idempotent() {
        let page = vec![person(1, "Ada"), person(2, "Brin")];

        let mut roster = Roster::new();
        roster.merge(page.clone());
        let once = roster.snapshot();

        roster.merge(page);
        assert_eq!(roster.snapshot(), once);
    }

    #[test]
    fn first_write_wins_on_duplicate_id() {
        let mut roster = Roster::new();
        roster.merge(vec![person(1, "Ada")]);
        roster.merge(vec![person(1, "Renamed")]);

        let snap = roster.snapshot();
        assert_eq!(snap[0].display_name, "Ada");
    }

    #[test]
    fn no_duplicate_ids_across_any_merge_sequence() {
        let mut roster = Roster::new();
        roster.merge(vec![person(1, "Ada"), person(2, "Brin")]);
        roster.merge(vec![person(2, "Brin"), person(3, "Cleo"), person(1, "Ada")]);
        roster.merge(vec![person(3, "Cleo")]);

        let snap = roster.snapshot();
        let mut seen = std::collections::HashSet::new();
        for p in snap.iter() {
            assert!(seen.insert(p.id.clone()), "duplicate id {} in roster", p.id);
        }
        assert_eq!(snap.len(), 3);
    }

    #[test]
    fn contains_tracks_every_visible_entry() {
        let mut roster = Roster::new();
        roster.merge(vec![person(1, "Ada"), person(2, "Brin")]);

        for p in roster.snapshot().iter() {
            assert!(roster.contains(&p.id));
        }
        assert!(!roster.contains(&PersonId::Num(99)));
    }

    #[test]
    fn clear_empties_everything() {
        let mut roster = Roster::new();
        roster.merge(vec![person(1, "Ada")]);

        roster.clear();

        assert!(roster.is_empty());
        assert!(roster.snapshot().is_empty());
        assert!(!roster.contains(&PersonId::Num(1)));
    }

    #[test]
    fn empty_merge_accepts_nothing() {
        let mut roster = Roster::new();
        roster.merge(vec![person(1, "Ada")]);

        let accepted = roster.merge(Vec::new());

        assert_eq!(accepted, 0);
        assert_eq!(roster.len(), 1);
    }
}

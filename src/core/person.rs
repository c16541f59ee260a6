use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Unique identifier for a person sharing expenses in a group.
///
/// Identifiers are compared as plain strings. Their ordering is the
/// tie-break key whenever the engine emits a sequence of people.
///
/// # Examples
///
/// ```
/// use split_ledger::core::person::PersonId;
///
/// let alex = PersonId::new("1");
/// let taylor = PersonId::new("2");
/// assert_ne!(alex, taylor);
/// assert!(alex < taylor);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(String);

impl PersonId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation of this person ID.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// An identifier made only of whitespace cannot name anyone.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PersonId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PersonId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A member of the group, as supplied by the roster owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Person {
    pub fn new(id: impl Into<PersonId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// The set of people whose balances are tracked.
///
/// Keyed by [`PersonId`], so iteration is always in id order. Adding a
/// person whose id already exists replaces the earlier entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    people: BTreeMap<PersonId, Person>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, person: Person) {
        self.people.insert(person.id.clone(), person);
    }

    pub fn get(&self, id: &PersonId) -> Option<&Person> {
        self.people.get(id)
    }

    pub fn contains(&self, id: &PersonId) -> bool {
        self.people.contains_key(id)
    }

    /// Display name for `id`, or `"Unknown"` when nobody on the roster has it.
    pub fn display_name(&self, id: &PersonId) -> &str {
        self.people
            .get(id)
            .map(|p| p.name.as_str())
            .unwrap_or("Unknown")
    }

    pub fn ids(&self) -> impl Iterator<Item = &PersonId> {
        self.people.keys()
    }

    pub fn people(&self) -> impl Iterator<Item = &Person> {
        self.people.values()
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }
}

impl FromIterator<Person> for Roster {
    fn from_iter<T: IntoIterator<Item = Person>>(iter: T) -> Self {
        let mut roster = Roster::new();
        for person in iter {
            roster.add(person);
        }
        roster
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_id_equality() {
        let a = PersonId::new("1");
        let b = PersonId::new("1");
        let c = PersonId::new("2");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_person_id_display() {
        assert_eq!(format!("{}", PersonId::new("alex")), "alex");
    }

    #[test]
    fn test_blank_person_id() {
        assert!(PersonId::new("").is_blank());
        assert!(PersonId::new("   ").is_blank());
        assert!(!PersonId::new("1").is_blank());
    }

    #[test]
    fn test_roster_display_name_fallback() {
        let roster: Roster = [Person::new("1", "Alex"), Person::new("2", "Taylor")]
            .into_iter()
            .collect();
        assert_eq!(roster.display_name(&PersonId::new("2")), "Taylor");
        assert_eq!(roster.display_name(&PersonId::new("9")), "Unknown");
    }

    #[test]
    fn test_roster_iterates_in_id_order() {
        let roster: Roster = [
            Person::new("3", "Jordan"),
            Person::new("1", "Alex"),
            Person::new("2", "Taylor"),
        ]
        .into_iter()
        .collect();
        let ids: Vec<&str> = roster.ids().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_roster_replaces_duplicate_id() {
        let mut roster = Roster::new();
        roster.add(Person::new("1", "Alex"));
        roster.add(Person::new("1", "Alexandra").with_email("a@example.com"));
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.display_name(&PersonId::new("1")), "Alexandra");
    }
}

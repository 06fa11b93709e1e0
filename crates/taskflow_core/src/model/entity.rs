//! Identity and ordered-collection primitives shared by tasks and projects.
//!
//! # Responsibility
//! - Define the opaque `EntityId` used by every stored entity.
//! - Provide `EntityList`, an insertion-ordered collection keyed by id.
//!
//! # Invariants
//! - Ids read from external input are non-blank (`EntityId::parse`).
//! - An `EntityList` never holds two items with the same id.
//! - Items keep insertion order; updates never move an item.
//! - `merge` and `remove` touch at most one item.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque identifier for tasks, projects and users.
///
/// Identifiers issued by the backend are kept verbatim; locally created
/// entities use `EntityId::generate`. Deserialization goes through
/// `EntityId::parse`, so a blank id in JSON input is an error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntityId(String);

/// Identifier rejected by `EntityId::parse`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidIdError {
    Blank,
}

impl Display for InvalidIdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blank => write!(f, "id must not be blank"),
        }
    }
}

impl Error for InvalidIdError {}

impl EntityId {
    /// Wraps `value` without validation; the store rejects blank ids on insert.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Trims `value` and wraps it.
    ///
    /// # Errors
    /// - `InvalidIdError::Blank` when nothing but whitespace remains.
    pub fn parse(value: &str) -> Result<Self, InvalidIdError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(InvalidIdError::Blank);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Creates a fresh random identifier (UUID v4, hyphenated).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.trim().is_empty() {
            return Err(D::Error::custom(InvalidIdError::Blank));
        }
        Ok(Self(raw))
    }
}

impl Display for EntityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Entity stored in an `EntityList`.
pub trait Entity {
    /// Partial field set applied by shallow merge.
    type Patch;

    fn id(&self) -> &EntityId;

    /// Overwrites every field present in `patch`, leaving the rest untouched.
    fn apply_patch(&mut self, patch: &Self::Patch);
}

/// Insert rejected because the id is already present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateIdError {
    pub id: EntityId,
}

impl Display for DuplicateIdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "duplicate id `{}`", self.id)
    }
}

impl Error for DuplicateIdError {}

/// Insertion-ordered collection with unique ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityList<T> {
    items: Vec<T>,
}

impl<T> Default for EntityList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> EntityList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T: Entity> EntityList<T> {
    /// Builds a list from an ordered sequence.
    ///
    /// # Errors
    /// - Returns the first repeated id; nothing is built in that case.
    pub fn from_items(items: Vec<T>) -> Result<Self, DuplicateIdError> {
        if let Some(repeated) = first_repeated_id(&items) {
            return Err(DuplicateIdError { id: repeated });
        }
        Ok(Self { items })
    }

    pub fn get(&self, id: &EntityId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Appends one item at the end.
    ///
    /// # Errors
    /// - Returns `DuplicateIdError` and leaves the list unchanged when the id
    ///   already exists.
    pub fn insert(&mut self, item: T) -> Result<(), DuplicateIdError> {
        if self.contains(item.id()) {
            return Err(DuplicateIdError {
                id: item.id().clone(),
            });
        }
        self.items.push(item);
        Ok(())
    }

    /// Shallow-merges `patch` into the item with `id`.
    ///
    /// Returns `false` (no change) when no item matches.
    pub fn merge(&mut self, id: &EntityId, patch: &T::Patch) -> bool {
        match self.items.iter_mut().find(|item| item.id() == id) {
            Some(item) => {
                item.apply_patch(patch);
                true
            }
            None => false,
        }
    }

    /// Removes the item with `id`, returning it when present.
    pub fn remove(&mut self, id: &EntityId) -> Option<T> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(index))
    }
}

fn first_repeated_id<T: Entity>(items: &[T]) -> Option<EntityId> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .iter()
        .map(Entity::id)
        .find(|id| !seen.insert(*id))
        .cloned()
}

/// Deserializes a present field (including explicit `null`) as `Some`.
///
/// Paired with `#[serde(default)]` so an absent field stays `None`, which lets
/// patches tell "leave unchanged" apart from "clear".
pub(crate) fn deserialize_present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl<'a, T> IntoIterator for &'a EntityList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Serialize> Serialize for EntityList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl<'de, T: Entity + Deserialize<'de>> Deserialize<'de> for EntityList<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Vec::<T>::deserialize(deserializer)?;
        Self::from_items(items).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::{DuplicateIdError, Entity, EntityId, EntityList, InvalidIdError};

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Item {
        id: EntityId,
        label: String,
    }

    impl Entity for Item {
        type Patch = Option<String>;

        fn id(&self) -> &EntityId {
            &self.id
        }

        fn apply_patch(&mut self, patch: &Self::Patch) {
            if let Some(label) = patch {
                self.label = label.clone();
            }
        }
    }

    fn item(id: &str, label: &str) -> Item {
        Item {
            id: EntityId::from(id),
            label: label.to_string(),
        }
    }

    #[test]
    fn generated_ids_are_unique_uuids() {
        let a = EntityId::generate();
        let b = EntityId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }

    #[test]
    fn from_items_rejects_repeated_id() {
        let err = EntityList::from_items(vec![item("a", "1"), item("b", "2"), item("a", "3")])
            .expect_err("repeated id must fail");
        assert_eq!(
            err,
            DuplicateIdError {
                id: EntityId::from("a")
            }
        );
    }

    #[test]
    fn parse_trims_and_rejects_blank_ids() {
        assert_eq!(EntityId::parse("  t1 ").expect("trimmed id"), EntityId::from("t1"));
        assert_eq!(EntityId::parse(""), Err(InvalidIdError::Blank));
        assert_eq!(EntityId::parse(" \t"), Err(InvalidIdError::Blank));
        assert!(EntityId::new(" ").is_blank());
        assert!(!EntityId::new("a").is_blank());
    }

    #[test]
    fn blank_id_in_json_is_rejected() {
        let err = serde_json::from_str::<EntityId>("\"  \"").expect_err("blank id must fail");
        assert!(err.to_string().contains("must not be blank"));
        let id: EntityId = serde_json::from_str("\"t1\"").expect("plain id");
        assert_eq!(id.as_str(), "t1");
    }

    #[test]
    fn from_items_reports_late_duplicate_in_large_list() {
        let mut items: Vec<Item> = (0..5_000).map(|n| item(&format!("id-{n}"), "x")).collect();
        assert_eq!(
            EntityList::from_items(items.clone()).expect("unique ids").len(),
            5_000
        );
        items.push(item("id-4321", "again"));
        let err = EntityList::from_items(items).expect_err("late repeat must fail");
        assert_eq!(err.id, EntityId::from("id-4321"));
    }

    #[test]
    fn merge_touches_only_matching_item() {
        let mut list =
            EntityList::from_items(vec![item("a", "1"), item("b", "2")]).expect("unique ids");
        assert!(list.merge(&EntityId::from("b"), &Some("two".to_string())));
        assert!(!list.merge(&EntityId::from("zz"), &Some("x".to_string())));
        assert_eq!(list.as_slice(), &[item("a", "1"), item("b", "two")]);
    }

    #[test]
    fn remove_keeps_order_of_remaining_items() {
        let mut list = EntityList::from_items(vec![item("a", "1"), item("b", "2"), item("c", "3")])
            .expect("unique ids");
        let removed = list.remove(&EntityId::from("b")).expect("b exists");
        assert_eq!(removed.label, "2");
        assert!(list.remove(&EntityId::from("b")).is_none());
        let ids: Vec<&str> = list.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }
}

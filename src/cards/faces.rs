//! Face identities and the pools they are drawn from.
//!
//! A face is an opaque token. The core only compares faces for exact
//! equality, so `"Cat"` and `"cat"` are different faces.

use std::sync::Arc;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Opaque face identity shared by the two cards of a pair.
///
/// Cheap to clone: boards hold many copies of the same face.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FaceId(Arc<str>);

impl FaceId {
    /// Create a face identity.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    /// The identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FaceId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for FaceId {
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}

impl std::fmt::Display for FaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of available face identities.
///
/// The board generator reads from a pool but never mutates it.
pub trait IdentityPool {
    /// All identities currently available.
    fn identities(&self) -> Vec<FaceId>;
}

impl IdentityPool for [FaceId] {
    fn identities(&self) -> Vec<FaceId> {
        self.to_vec()
    }
}

impl IdentityPool for Vec<FaceId> {
    fn identities(&self) -> Vec<FaceId> {
        self.clone()
    }
}

/// A named collection of card faces.
///
/// Duplicate names are collapsed on insert so every identity in the set is
/// distinct, which keeps "each face appears exactly twice" true on the board.
///
/// ```
/// use pairwise::cards::{CardSet, IdentityPool};
///
/// let set = CardSet::from_names(["cat", "dog", "cat"]);
/// assert_eq!(set.len(), 2);
/// assert_eq!(set.identities().len(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CardSetFile")]
pub struct CardSet {
    faces: Vec<FaceId>,
    #[serde(skip)]
    index: FxHashSet<FaceId>,
}

/// Serialized form of a `CardSet`; duplicates are collapsed on load.
#[derive(Deserialize)]
struct CardSetFile {
    faces: Vec<FaceId>,
}

impl From<CardSetFile> for CardSet {
    fn from(file: CardSetFile) -> Self {
        let mut set = Self::new();
        for face in file.faces {
            set.insert(face);
        }
        set
    }
}

impl CardSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from face names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for name in names {
            set.insert(FaceId::new(name));
        }
        set
    }

    /// Add a face. Returns false if it was already present.
    pub fn insert(&mut self, face: FaceId) -> bool {
        if !self.index.insert(face.clone()) {
            return false;
        }
        self.faces.push(face);
        true
    }

    /// Add a face (builder pattern).
    #[must_use]
    pub fn with_face(mut self, face: impl Into<FaceId>) -> Self {
        self.insert(face.into());
        self
    }

    /// Is this face in the set?
    #[must_use]
    pub fn contains(&self, face: &FaceId) -> bool {
        self.index.contains(face)
    }

    /// Number of distinct faces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// True if the set holds no faces.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

impl IdentityPool for CardSet {
    fn identities(&self) -> Vec<FaceId> {
        self.faces.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_equality_is_exact() {
        assert_eq!(FaceId::from("cat"), FaceId::from(String::from("cat")));
        assert_ne!(FaceId::from("cat"), FaceId::from("Cat"));
        assert_ne!(FaceId::from("cat"), FaceId::from("cat "));
    }

    #[test]
    fn test_face_display() {
        assert_eq!(FaceId::from("owl").to_string(), "owl");
    }

    #[test]
    fn test_card_set_dedupes() {
        let mut set = CardSet::new().with_face("a").with_face("b");
        assert!(!set.insert(FaceId::from("a")));
        assert!(set.insert(FaceId::from("c")));
        assert_eq!(set.len(), 3);
        assert!(set.contains(&FaceId::from("b")));
        assert!(!set.contains(&FaceId::from("z")));
    }

    #[test]
    fn test_card_set_serde_dedupes() {
        let set: CardSet = serde_json::from_str(r#"{"faces": ["a", "a", "b"]}"#).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&FaceId::from("b")));
        assert_eq!(set, CardSet::from_names(["a", "b"]));

        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"{"faces":["a","b"]}"#);
    }

    #[test]
    fn test_large_card_set() {
        let set = CardSet::from_names((0..5000).map(|i| format!("f{}", i % 2500)));
        assert_eq!(set.len(), 2500);
        assert!(set.contains(&FaceId::from("f2499")));
        assert_eq!(set.identities()[0], FaceId::from("f0"));
    }

    #[test]
    fn test_pool_impls() {
        let faces = vec![FaceId::from("x"), FaceId::from("y")];
        assert_eq!(faces.identities(), faces);
        assert_eq!(faces.as_slice().identities(), faces);
        assert!(CardSet::new().identities().is_empty());
    }

    #[test]
    fn test_face_serde() {
        let face = FaceId::from("star");
        let json = serde_json::to_string(&face).unwrap();
        assert_eq!(json, "\"star\"");
        let back: FaceId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, face);
    }
}

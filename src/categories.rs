//! Categories
//!
//! A sorted, de-duplicated, lower-cased set of category names.

use smallvec::SmallVec;

/// Category memberships of a product.
///
/// Names are lower-cased on the way in, so every lookup is case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Categories {
    names: SmallVec<[String; 5]>,
}

impl Categories {
    /// Create an empty set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a category set from string slices.
    pub fn from_strs(names: &[&str]) -> Self {
        names.iter().copied().collect()
    }

    /// Check whether the set contains `name`, ignoring case.
    pub fn contains(&self, name: &str) -> bool {
        self.names.binary_search(&normalize(name)).is_ok()
    }

    /// Add a category.
    pub fn add(&mut self, name: &str) {
        let name = normalize(name);

        if let Err(pos) = self.names.binary_search(&name) {
            self.names.insert(pos, name);
        }
    }

    /// Remove a category.
    pub fn remove(&mut self, name: &str) {
        if let Ok(pos) = self.names.binary_search(&normalize(name)) {
            self.names.remove(pos);
        }
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate the (lower-cased) category names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<'a> FromIterator<&'a str> for Categories {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut names: SmallVec<[String; 5]> = iter.into_iter().map(normalize).collect();

        names.sort();
        names.dedup();

        Self { names }
    }
}

/// Lower-case a category name for storage and comparison.
pub(crate) fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

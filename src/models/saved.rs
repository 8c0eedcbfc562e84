use std::collections::HashSet;

use super::{Deal, Identifier};

/// Identifiers of the deals the current user has bookmarked.
#[derive(Debug, Clone, Default)]
pub struct SavedIds(HashSet<String>);

impl SavedIds {
    pub fn contains(&self, id: &Identifier) -> bool {
        self.0.contains(&id.as_key())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Identifier> for SavedIds {
    fn from_iter<I: IntoIterator<Item = Identifier>>(iter: I) -> Self {
        Self(iter.into_iter().map(|id| id.as_key()).collect())
    }
}

impl<'a> FromIterator<&'a Deal> for SavedIds {
    fn from_iter<I: IntoIterator<Item = &'a Deal>>(iter: I) -> Self {
        iter.into_iter().map(|deal| deal.id.clone()).collect()
    }
}

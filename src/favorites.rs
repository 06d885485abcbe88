use serde::{Deserialize, Serialize};

use crate::{
    catalog::Catalog,
    models::{Product, ProductId},
};

/// A user's favorite products in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites {
    ids: Vec<ProductId>,
}

impl Favorites {
    pub fn add(&mut self, product_id: ProductId) {
        if !self.contains(product_id) {
            self.ids.push(product_id);
        }
    }

    pub fn remove(&mut self, product_id: ProductId) {
        self.ids.retain(|id| *id != product_id);
    }

    /// Flips membership and returns whether the product is now a favorite.
    pub fn toggle(&mut self, product_id: ProductId) -> bool {
        if self.contains(product_id) {
            self.remove(product_id);
            false
        } else {
            self.ids.push(product_id);
            true
        }
    }

    pub fn contains(&self, product_id: ProductId) -> bool {
        self.ids.contains(&product_id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn ids(&self) -> &[ProductId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Favorite products still present in the catalog.
    pub fn resolve<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Product> {
        self.ids.iter().filter_map(|id| catalog.get(*id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_is_idempotent_and_keeps_order() {
        let mut favs = Favorites::default();
        favs.add(3);
        favs.add(1);
        favs.add(3);
        assert_eq!(favs.ids(), &[3, 1]);
    }

    #[test]
    fn toggle_flips_membership() {
        let mut favs = Favorites::default();
        assert!(favs.toggle(5));
        assert!(favs.contains(5));
        assert!(!favs.toggle(5));
        assert!(favs.is_empty());
    }

    #[test]
    fn remove_unknown_is_noop_and_clear_empties() {
        let mut favs = Favorites::default();
        favs.add(2);
        favs.remove(9);
        assert_eq!(favs.len(), 1);
        favs.clear();
        assert!(favs.is_empty());
    }

    #[test]
    fn resolve_skips_products_missing_from_catalog() {
        let catalog = Catalog::demo();
        let mut favs = Favorites::default();
        favs.add(6);
        favs.add(404);
        favs.add(2);
        let names: Vec<_> = favs.resolve(&catalog).iter().map(|p| p.id).collect();
        assert_eq!(names, [6, 2]);
    }
}

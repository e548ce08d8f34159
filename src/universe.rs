//! The fixed product universe and its minimal catalog.
//!
//! Products are identified by a dense [`ProductId`] (`0..N`). Every other
//! structure in the crate (heat maps, layouts, graph adjacency) is indexed by
//! that id, which keeps iteration order deterministic without sorting.
//!
//! Names and categories are catalog metadata: the optimizer never reads them.
//! Only the order generator looks at [`Category`], to bias baskets toward one
//! dominant aisle.

use core::fmt;

// ─── ProductId ──────────────────────────────────────────────────────────────

/// Stable identifier of a product within one run.
///
/// Displayed as `Product_<n>` with `n` starting at 1, matching the catalog names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ProductId(pub u32);

impl ProductId {
    /// Position of this product in dense per-product vectors.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Build an id from a dense index.
    #[inline]
    pub fn from_index(index: usize) -> Self {
        Self(index as u32)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Product_{}", self.0 + 1)
    }
}

// ─── Category ───────────────────────────────────────────────────────────────

/// Aisle category tag from the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Category {
    /// Milk, cheese, yoghurt.
    Dairy,
    /// Bread and pastries.
    Bakery,
    /// Rice, pasta, cereal.
    Grains,
    /// Fruit and vegetables.
    Produce,
    /// Crisps, sweets.
    Snacks,
    /// Drinks.
    Beverages,
    /// Everything else.
    Misc,
}

impl Category {
    /// All categories in catalog order.
    pub const ALL: [Category; 7] = [
        Category::Dairy,
        Category::Bakery,
        Category::Grains,
        Category::Produce,
        Category::Snacks,
        Category::Beverages,
        Category::Misc,
    ];

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Category::Dairy => "Dairy",
            Category::Bakery => "Bakery",
            Category::Grains => "Grains",
            Category::Produce => "Produce",
            Category::Snacks => "Snacks",
            Category::Beverages => "Beverages",
            Category::Misc => "Misc",
        }
    }
}

// ─── Product ────────────────────────────────────────────────────────────────

/// Catalog entry for one product.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Product {
    /// Dense identifier.
    pub id: ProductId,
    /// Display name, `Product_<n>`.
    pub name: String,
    /// Aisle category.
    pub category: Category,
}

// ─── ProductUniverse ────────────────────────────────────────────────────────

/// The fixed set of products known before any order is generated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProductUniverse {
    products: Vec<Product>,
}

impl ProductUniverse {
    /// Synthetic universe of `count` products, categories assigned round-robin.
    pub fn synthetic(count: usize) -> Self {
        let products = (0..count)
            .map(|i| {
                let id = ProductId::from_index(i);
                Product {
                    id,
                    name: id.to_string(),
                    category: Category::ALL[i % Category::ALL.len()],
                }
            })
            .collect();
        Self { products }
    }

    /// Universe from explicit category tags; product `i` gets `categories[i]`.
    pub fn from_categories(categories: &[Category]) -> Self {
        let products = categories
            .iter()
            .enumerate()
            .map(|(i, &category)| {
                let id = ProductId::from_index(i);
                Product { id, name: id.to_string(), category }
            })
            .collect();
        Self { products }
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// `true` if the universe holds no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// `true` if `id` belongs to this universe.
    pub fn contains(&self, id: ProductId) -> bool {
        id.index() < self.products.len()
    }

    /// Catalog entry for `id`.
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.get(id.index())
    }

    /// Look a product up by display name.
    pub fn find_by_name(&self, name: &str) -> Option<ProductId> {
        self.products.iter().find(|p| p.name == name).map(|p| p.id)
    }

    /// All product ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = ProductId> + '_ {
        self.products.iter().map(|p| p.id)
    }

    /// All catalog entries.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// Products grouped by category, in [`Category::ALL`] order.
    ///
    /// Categories with no products are omitted.
    pub fn by_category(&self) -> Vec<(Category, Vec<ProductId>)> {
        Category::ALL
            .iter()
            .map(|&c| {
                let members: Vec<ProductId> = self
                    .products
                    .iter()
                    .filter(|p| p.category == c)
                    .map(|p| p.id)
                    .collect();
                (c, members)
            })
            .filter(|(_, members)| !members.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_one_based() {
        assert_eq!(ProductId(0).to_string(), "Product_1");
        assert_eq!(ProductId(49).to_string(), "Product_50");
    }

    #[test]
    fn test_synthetic_universe_round_robins_categories() {
        let u = ProductUniverse::synthetic(9);
        assert_eq!(u.len(), 9);
        assert_eq!(u.product(ProductId(0)).map(|p| p.category), Some(Category::Dairy));
        assert_eq!(u.product(ProductId(7)).map(|p| p.category), Some(Category::Dairy));
        assert_eq!(u.product(ProductId(8)).map(|p| p.category), Some(Category::Bakery));
    }

    #[test]
    fn test_by_category_skips_empty_aisles() {
        let u = ProductUniverse::synthetic(3);
        let groups = u.by_category();
        assert_eq!(groups.len(), 3);
        assert!(groups.iter().all(|(_, m)| m.len() == 1));
    }

    #[test]
    fn test_find_by_name() {
        let u = ProductUniverse::synthetic(5);
        assert_eq!(u.find_by_name("Product_3"), Some(ProductId(2)));
        assert_eq!(u.find_by_name("Product_6"), None);
        assert!(!u.contains(ProductId(5)));
    }

    #[test]
    fn test_from_categories_groups_by_tag() {
        let u = ProductUniverse::from_categories(&[Category::Produce, Category::Snacks, Category::Produce]);
        assert_eq!(
            u.by_category(),
            vec![
                (Category::Produce, vec![ProductId(0), ProductId(2)]),
                (Category::Snacks, vec![ProductId(1)]),
            ]
        );
    }
}

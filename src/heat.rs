//! Pick frequency per product.
//!
//! Heat is the number of baskets containing a product. The map always covers
//! the full universe: a product nobody ordered has heat 0, not a missing key.
//! The sum of all heat values equals the sum of basket sizes.

use crate::error::{Result, SlottingError};
use crate::orders::Basket;
use crate::universe::{ProductId, ProductUniverse};

/// Dense product → basket-count map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeatMap {
    counts: Vec<u32>,
}

impl HeatMap {
    /// Count, for every product, how many baskets contain it.
    pub fn build(universe: &ProductUniverse, baskets: &[Basket]) -> Result<Self> {
        let mut counts = vec![0u32; universe.len()];
        for basket in baskets {
            for &p in basket.items() {
                let slot = counts
                    .get_mut(p.index())
                    .ok_or(SlottingError::UnknownProduct(p))?;
                *slot += 1;
            }
        }
        Ok(Self { counts })
    }

    /// Heat map from explicit counts, indexed by product id.
    pub fn from_counts(counts: Vec<u32>) -> Self {
        Self { counts }
    }

    /// Heat of `p`; 0 for ids outside the universe.
    pub fn heat(&self, p: ProductId) -> u32 {
        self.counts.get(p.index()).copied().unwrap_or(0)
    }

    /// Number of products covered.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// `true` for an empty universe.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all heat values.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| u64::from(c)).sum()
    }

    /// `(product, heat)` pairs in ascending product order.
    pub fn iter(&self) -> impl Iterator<Item = (ProductId, u32)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(|(i, &c)| (ProductId::from_index(i), c))
    }

    /// Raw counts indexed by product id.
    pub fn as_slice(&self) -> &[u32] {
        &self.counts
    }
}

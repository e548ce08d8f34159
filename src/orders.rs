//! Synthetic order workload.
//!
//! Each basket mimics a shopping trip with one dominant aisle:
//!
//! ```text
//! 1. pick a dominant category, draw `base_items` distinct products from it
//! 2. draw `cross_items_min..=cross_items_max` products from the whole
//!    universe, weighted by a power-law popularity rank (1 / rank^s)
//! 3. union the draws; duplicates collapse
//! ```
//!
//! Because of step 3 a basket can end up smaller than the number of draws.
//! That is accepted: baskets are sets, not multisets. The base draw alone
//! supplies two distinct products, because only categories holding at least
//! `base_items` products serve as dominant aisles.
//!
//! The popularity ranking is itself drawn from the supplied RNG, so a fixed
//! seed reproduces the exact basket sequence.

use heapless::Vec as HVec;
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

use crate::error::{Result, SlottingError};
use crate::universe::{ProductId, ProductUniverse};

/// Largest number of distinct products an order may contain.
pub const MAX_BASKET_SIZE: usize = 6;

/// Fewest distinct products an order may contain.
///
/// The one exception is a one-product universe, see [`Basket::single`].
pub const MIN_BASKET_SIZE: usize = 2;

// ─── Basket ─────────────────────────────────────────────────────────────────

/// One order: a set of distinct product ids, kept sorted.
///
/// Immutable once built. Capacity is fixed at [`MAX_BASKET_SIZE`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Basket {
    items: HVec<ProductId, MAX_BASKET_SIZE>,
}

impl Basket {
    /// Build a basket from any sequence of product ids.
    ///
    /// Duplicates collapse. Fails unless between [`MIN_BASKET_SIZE`] and
    /// [`MAX_BASKET_SIZE`] distinct products remain.
    pub fn from_products<I>(products: I) -> Result<Self>
    where
        I: IntoIterator<Item = ProductId>,
    {
        let mut distinct: Vec<ProductId> = products.into_iter().collect();
        distinct.sort_unstable();
        distinct.dedup();

        match distinct.len() {
            0 => Err(SlottingError::EmptyBasket),
            size if size < MIN_BASKET_SIZE => {
                Err(SlottingError::BasketTooSmall { size, min: MIN_BASKET_SIZE })
            }
            size if size > MAX_BASKET_SIZE => {
                Err(SlottingError::BasketTooLarge { size, max: MAX_BASKET_SIZE })
            }
            size => HVec::from_slice(&distinct)
                .map(|items| Self { items })
                .map_err(|_| SlottingError::BasketTooLarge { size, max: MAX_BASKET_SIZE }),
        }
    }

    /// Basket holding one product.
    ///
    /// Only a one-product universe produces these: there is no second product
    /// to pair with. It adds heat and no edges.
    pub fn single(product: ProductId) -> Self {
        let mut items = HVec::new();
        let _ = items.push(product);
        Self { items }
    }

    /// Distinct products in ascending id order.
    pub fn items(&self) -> &[ProductId] {
        &self.items
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always `false` for a constructed basket; provided for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `true` if the basket contains `id`.
    pub fn contains(&self, id: ProductId) -> bool {
        self.items.binary_search(&id).is_ok()
    }

    /// Every unordered pair `(a, b)` with `a < b`.
    pub fn pairs(&self) -> impl Iterator<Item = (ProductId, ProductId)> + '_ {
        self.items
            .iter()
            .enumerate()
            .flat_map(move |(i, &a)| self.items[i + 1..].iter().map(move |&b| (a, b)))
    }
}

// ─── Config ─────────────────────────────────────────────────────────────────

/// Shape of generated baskets.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderGeneratorConfig {
    /// Products drawn from the dominant category. Default: 2.
    pub base_items: usize,
    /// Fewest cross-category draws per basket. Default: 1.
    pub cross_items_min: usize,
    /// Most cross-category draws per basket. Default: 2.
    pub cross_items_max: usize,
    /// Exponent `s` of the popularity weight `1 / rank^s`. Default: 1.2.
    pub popularity_exponent: f64,
}

impl Default for OrderGeneratorConfig {
    fn default() -> Self {
        Self {
            base_items: 2,
            cross_items_min: 1,
            cross_items_max: 2,
            popularity_exponent: 1.2,
        }
    }
}

// ─── OrderGenerator ─────────────────────────────────────────────────────────

/// Produces the synthetic basket workload for one run.
#[derive(Debug)]
pub struct OrderGenerator<'a> {
    universe: &'a ProductUniverse,
    config: OrderGeneratorConfig,
    aisles: Vec<Vec<ProductId>>,
}

impl<'a> OrderGenerator<'a> {
    /// Bind a generator to a universe.
    ///
    /// The draw counts are clamped so a basket holds between
    /// [`MIN_BASKET_SIZE`] and [`MAX_BASKET_SIZE`] products. Dominant aisles
    /// are the categories with at least `base_items` products; when none
    /// qualifies the whole universe acts as the one aisle.
    pub fn new(universe: &'a ProductUniverse, config: OrderGeneratorConfig) -> Result<Self> {
        if universe.is_empty() {
            return Err(SlottingError::EmptyUniverse);
        }
        let mut config = config;
        config.base_items = config.base_items.clamp(MIN_BASKET_SIZE, MAX_BASKET_SIZE);
        config.cross_items_max = config
            .cross_items_max
            .min(MAX_BASKET_SIZE - config.base_items);
        config.cross_items_min = config.cross_items_min.min(config.cross_items_max);

        let mut aisles: Vec<Vec<ProductId>> = universe
            .by_category()
            .into_iter()
            .map(|(_, members)| members)
            .filter(|members| members.len() >= config.base_items)
            .collect();
        if aisles.is_empty() {
            aisles.push(universe.ids().collect());
        }
        Ok(Self { universe, config, aisles })
    }

    /// Effective configuration after clamping.
    pub fn config(&self) -> &OrderGeneratorConfig {
        &self.config
    }

    /// Generate `count` baskets.
    pub fn generate<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Result<Vec<Basket>> {
        let popularity = self.popularity(rng)?;
        let ids: Vec<ProductId> = self.universe.ids().collect();

        let mut baskets = Vec::with_capacity(count);
        for _ in 0..count {
            let mut draws: HVec<ProductId, MAX_BASKET_SIZE> = HVec::new();

            if let Some(aisle) = self.aisles.choose(rng) {
                for &p in aisle.choose_multiple(rng, self.config.base_items) {
                    let _ = draws.push(p);
                }
            }

            let cross = rng.random_range(self.config.cross_items_min..=self.config.cross_items_max);
            for _ in 0..cross {
                let _ = draws.push(ids[popularity.sample(rng)]);
            }

            let basket = match ids.as_slice() {
                [only] => Basket::single(*only),
                _ => Basket::from_products(draws)?,
            };
            baskets.push(basket);
        }

        tracing::debug!(
            orders = baskets.len(),
            products = self.universe.len(),
            "generated synthetic baskets"
        );
        Ok(baskets)
    }

    /// Power-law weights over a freshly shuffled popularity ranking.
    fn popularity<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<WeightedIndex<f64>> {
        let n = self.universe.len();
        let mut ranks: Vec<usize> = (0..n).collect();
        ranks.shuffle(rng);

        let s = self.config.popularity_exponent.max(0.0);
        let weights = ranks.iter().map(|&r| 1.0 / ((r + 1) as f64).powf(s));
        WeightedIndex::new(weights).map_err(|_| SlottingError::EmptyUniverse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_basket_collapses_duplicates_and_sorts() {
        let b = Basket::from_products([ProductId(4), ProductId(1), ProductId(4)]).unwrap();
        assert_eq!(b.items(), &[ProductId(1), ProductId(4)]);
        assert!(b.contains(ProductId(4)));
        assert!(!b.contains(ProductId(2)));
    }

    #[test]
    fn test_basket_rejects_empty_and_oversized() {
        assert_eq!(
            Basket::from_products(core::iter::empty()),
            Err(SlottingError::EmptyBasket)
        );
        let seven = (0..7).map(ProductId);
        assert_eq!(
            Basket::from_products(seven),
            Err(SlottingError::BasketTooLarge { size: 7, max: MAX_BASKET_SIZE })
        );
        assert_eq!(
            Basket::from_products([ProductId(3), ProductId(3)]),
            Err(SlottingError::BasketTooSmall { size: 1, min: MIN_BASKET_SIZE })
        );
    }

    #[test]
    fn test_oversized_basket_reports_distinct_count() {
        let repeats = (0..7).chain([6, 6, 0]).map(ProductId);
        assert_eq!(
            Basket::from_products(repeats),
            Err(SlottingError::BasketTooLarge { size: 7, max: MAX_BASKET_SIZE })
        );
    }

    #[test]
    fn test_small_universes_still_get_two_item_baskets() {
        for n in [2usize, 3, 5, 8, 10, 13] {
            let universe = ProductUniverse::synthetic(n);
            let gen = OrderGenerator::new(&universe, OrderGeneratorConfig::default()).unwrap();
            let baskets = gen.generate(1000, &mut StdRng::seed_from_u64(1)).unwrap();
            let short = baskets.iter().filter(|b| b.len() < MIN_BASKET_SIZE).count();
            assert_eq!(short, 0, "N={}: {} baskets below two items", n, short);
        }
    }

    #[test]
    fn test_pairs_enumerates_each_unordered_pair_once() {
        let b = Basket::from_products([ProductId(0), ProductId(1), ProductId(2)]).unwrap();
        let pairs: Vec<_> = b.pairs().collect();
        assert_eq!(
            pairs,
            vec![
                (ProductId(0), ProductId(1)),
                (ProductId(0), ProductId(2)),
                (ProductId(1), ProductId(2)),
            ]
        );
    }

    #[test]
    fn test_generated_baskets_stay_in_bounds() {
        let universe = ProductUniverse::synthetic(50);
        let gen = OrderGenerator::new(&universe, OrderGeneratorConfig::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let baskets = gen.generate(500, &mut rng).unwrap();
        assert_eq!(baskets.len(), 500);
        for b in &baskets {
            assert!((2..=4).contains(&b.len()), "basket size {}", b.len());
            assert!(b.items().iter().all(|&p| universe.contains(p)));
        }
        // Most baskets keep both base items plus at least one distinct cross item.
        let at_least_three = baskets.iter().filter(|b| b.len() >= 3).count();
        assert!(at_least_three > 250, "only {} baskets had 3+ items", at_least_three);
    }

    #[test]
    fn test_same_seed_same_baskets() {
        let universe = ProductUniverse::synthetic(30);
        let gen = OrderGenerator::new(&universe, OrderGeneratorConfig::default()).unwrap();
        let a = gen.generate(200, &mut StdRng::seed_from_u64(99)).unwrap();
        let b = gen.generate(200, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_product_universe_yields_singleton_baskets() {
        let universe = ProductUniverse::synthetic(1);
        let gen = OrderGenerator::new(&universe, OrderGeneratorConfig::default()).unwrap();
        let baskets = gen.generate(10, &mut StdRng::seed_from_u64(1)).unwrap();
        assert!(baskets.iter().all(|b| b.items() == [ProductId(0)]));
    }

    #[test]
    fn test_empty_universe_is_rejected() {
        let universe = ProductUniverse::synthetic(0);
        assert!(matches!(
            OrderGenerator::new(&universe, OrderGeneratorConfig::default()),
            Err(SlottingError::EmptyUniverse)
        ));
    }
}

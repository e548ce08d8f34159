//! Bin layouts: a bijection from products onto bins `1..=N`.
//!
//! A [`Layout`] can only be built through constructors that check the
//! bijection, so every value of the type is a valid permutation. The baseline
//! generator lives here too: a uniformly random permutation, independent of
//! the graph and the heat map, used as the control condition.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Result, SlottingError};
use crate::heat::HeatMap;
use crate::universe::ProductId;

/// Product → bin assignment, bins numbered from 1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    /// `bins[p]` is the bin of product `p`.
    bins: Vec<u32>,
}

impl Layout {
    /// Assign bins `1..=N` to `ordering` in sequence.
    ///
    /// `ordering` must list every product `0..N` exactly once.
    pub fn from_ordering(ordering: &[ProductId]) -> Result<Self> {
        let n = ordering.len();
        let mut bins = vec![0u32; n];
        for (slot, &p) in ordering.iter().enumerate() {
            let bin = bins.get_mut(p.index()).ok_or_else(|| {
                SlottingError::InvalidLayout(format!("{} is outside a universe of {}", p, n))
            })?;
            if *bin != 0 {
                return Err(SlottingError::InvalidLayout(format!("{} placed twice", p)));
            }
            *bin = slot as u32 + 1;
        }
        Ok(Self { bins })
    }

    /// Layout from explicit per-product bins (`bins[p]` = bin of product `p`).
    ///
    /// Fails unless the bins are exactly `1..=N` with no repeats.
    pub fn from_bins(bins: Vec<u32>) -> Result<Self> {
        let n = bins.len();
        let mut used = vec![false; n];
        for (i, &bin) in bins.iter().enumerate() {
            if bin == 0 || bin as usize > n {
                return Err(SlottingError::InvalidLayout(format!(
                    "bin {} of {} is outside 1..={}",
                    bin,
                    ProductId::from_index(i),
                    n
                )));
            }
            if core::mem::replace(&mut used[bin as usize - 1], true) {
                return Err(SlottingError::InvalidLayout(format!("bin {} used twice", bin)));
            }
        }
        Ok(Self { bins })
    }

    /// Pure heat-sorted layout: hottest product in bin 1, ties by product id.
    pub fn heat_sorted(heat: &HeatMap) -> Self {
        let mut ordering: Vec<ProductId> = heat.iter().map(|(p, _)| p).collect();
        ordering.sort_by_key(|&p| (core::cmp::Reverse(heat.heat(p)), p));
        let mut bins = vec![0u32; ordering.len()];
        for (slot, p) in ordering.iter().enumerate() {
            bins[p.index()] = slot as u32 + 1;
        }
        Self { bins }
    }

    /// Bin of `p`.
    pub fn bin(&self, p: ProductId) -> Option<u32> {
        self.bins.get(p.index()).copied()
    }

    /// Number of products (and bins).
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    /// `true` for an empty universe.
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// `(product, bin)` pairs in ascending product order.
    pub fn iter(&self) -> impl Iterator<Item = (ProductId, u32)> + '_ {
        self.bins
            .iter()
            .enumerate()
            .map(|(i, &b)| (ProductId::from_index(i), b))
    }

    /// Products in bin order (bin 1 first).
    pub fn ordering(&self) -> Vec<ProductId> {
        let mut ordering = vec![ProductId(0); self.bins.len()];
        for (p, bin) in self.iter() {
            ordering[bin as usize - 1] = p;
        }
        ordering
    }

    /// Raw bins indexed by product id.
    pub fn as_slice(&self) -> &[u32] {
        &self.bins
    }
}

/// Uniformly random layout over `n` products.
pub fn baseline_layout<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Layout {
    let mut ordering: Vec<ProductId> = (0..n).map(ProductId::from_index).collect();
    ordering.shuffle(rng);
    let mut bins = vec![0u32; n];
    for (slot, p) in ordering.iter().enumerate() {
        bins[p.index()] = slot as u32 + 1;
    }
    Layout { bins }
}

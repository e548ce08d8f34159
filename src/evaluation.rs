//! Layout quality figures.
//!
//! The pick span of a basket is the distance, in bins, between its first and
//! last product: `max(bin) − min(bin)`. Averaged over all baskets it is a
//! travel proxy: a layout that keeps co-ordered products close scores low.

use crate::layout::Layout;
use crate::orders::Basket;

/// Aggregate pick figures for one layout.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PickStats {
    /// Baskets evaluated.
    pub orders: usize,
    /// Mean distinct products per basket.
    pub mean_picks_per_order: f64,
    /// Mean `max(bin) − min(bin)` per basket.
    pub mean_pick_span: f64,
}

impl PickStats {
    /// Evaluate `layout` against `baskets`. Products without a bin are skipped.
    pub fn measure(layout: &Layout, baskets: &[Basket]) -> Self {
        if baskets.is_empty() {
            return Self { orders: 0, mean_picks_per_order: 0.0, mean_pick_span: 0.0 };
        }
        let mut picks = 0usize;
        let mut span = 0u64;
        for basket in baskets {
            picks += basket.len();
            let bins = basket.items().iter().filter_map(|&p| layout.bin(p));
            let (lo, hi) = bins.fold((u32::MAX, 0u32), |(lo, hi), b| (lo.min(b), hi.max(b)));
            if hi >= lo {
                span += u64::from(hi - lo);
            }
        }
        let orders = baskets.len();
        Self {
            orders,
            mean_picks_per_order: picks as f64 / orders as f64,
            mean_pick_span: span as f64 / orders as f64,
        }
    }
}

/// Baseline vs optimized layout on the same baskets.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutComparison {
    /// Figures for the random layout.
    pub baseline: PickStats,
    /// Figures for the optimized layout.
    pub optimized: PickStats,
}

impl LayoutComparison {
    /// Measure both layouts.
    pub fn measure(baseline: &Layout, optimized: &Layout, baskets: &[Basket]) -> Self {
        Self {
            baseline: PickStats::measure(baseline, baskets),
            optimized: PickStats::measure(optimized, baskets),
        }
    }

    /// Relative pick-span reduction, `(baseline − optimized) / baseline`.
    ///
    /// 0 when the baseline span is 0. Negative if the optimized layout is worse.
    pub fn span_improvement(&self) -> f64 {
        if self.baseline.mean_pick_span <= 0.0 {
            return 0.0;
        }
        (self.baseline.mean_pick_span - self.optimized.mean_pick_span) / self.baseline.mean_pick_span
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::universe::ProductId;

    fn basket(ids: &[u32]) -> Basket {
        Basket::from_products(ids.iter().copied().map(ProductId)).unwrap()
    }

    #[test]
    fn test_span_of_adjacent_products_is_small() {
        let close = Layout::from_bins(vec![1, 2, 3, 4]).unwrap();
        let far = Layout::from_bins(vec![1, 3, 4, 2]).unwrap();
        let baskets = [basket(&[0, 1]), basket(&[2, 3])];
        assert_eq!(PickStats::measure(&close, &baskets).mean_pick_span, 1.0);
        assert_eq!(PickStats::measure(&far, &baskets).mean_pick_span, 2.0);
        assert_eq!(PickStats::measure(&close, &baskets).mean_picks_per_order, 2.0);
    }

    #[test]
    fn test_single_item_basket_has_zero_span() {
        let layout = Layout::from_bins(vec![1]).unwrap();
        let stats = PickStats::measure(&layout, &[Basket::single(ProductId(0))]);
        assert_eq!(stats.mean_pick_span, 0.0);
    }

    #[test]
    fn test_no_baskets() {
        let layout = Layout::from_bins(vec![1]).unwrap();
        let cmp = LayoutComparison::measure(&layout, &layout, &[]);
        assert_eq!(cmp.baseline.orders, 0);
        assert_eq!(cmp.span_improvement(), 0.0);
    }

    #[test]
    fn test_improvement_fraction() {
        let baseline = Layout::from_bins(vec![1, 4, 2, 3]).unwrap();
        let optimized = Layout::from_bins(vec![1, 2, 3, 4]).unwrap();
        let baskets = [basket(&[0, 1])];
        let cmp = LayoutComparison::measure(&baseline, &optimized, &baskets);
        assert!((cmp.span_improvement() - (3.0 - 1.0) / 3.0).abs() < 1e-12);
    }
}

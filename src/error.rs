//! Error kinds surfaced by the slotting pipeline.
//!
//! Three families:
//!
//! - **Configuration**: the run cannot start (empty universe, bad community count).
//! - **Input contract**: a basket violates the order contract (empty, too large,
//!   unknown product).
//! - **Internal consistency**: a community detector returned a partition that
//!   omits or duplicates a product. These abort the run before anything is
//!   published and indicate a detector bug.
//!
//! The degenerate-graph fallback has no variant: it is a logged
//! condition, not a failure.

use thiserror::Error;

use crate::universe::ProductId;

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, SlottingError>;

/// Every failure the slotting core can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlottingError {
    /// The product universe has no products.
    #[error("product universe is empty")]
    EmptyUniverse,

    /// The requested community count is zero.
    #[error("community count must be at least 1")]
    ZeroCommunities,

    /// More communities were requested than there are products.
    #[error("community count {requested} exceeds product count {products}")]
    TooManyCommunities {
        /// Requested community count.
        requested: usize,
        /// Size of the product universe.
        products: usize,
    },

    /// A basket was built from zero products.
    #[error("basket contains no products")]
    EmptyBasket,

    /// A basket holds fewer distinct products than an order must contain.
    #[error("basket holds {size} distinct product(s), at least {min} required")]
    BasketTooSmall {
        /// Distinct products offered.
        size: usize,
        /// Minimum basket size.
        min: usize,
    },

    /// A basket holds more distinct products than an order may contain.
    #[error("basket holds {size} distinct products, at most {max} allowed")]
    BasketTooLarge {
        /// Distinct products offered.
        size: usize,
        /// Maximum basket size.
        max: usize,
    },

    /// A basket or partition references a product outside the universe.
    #[error("{0} is not part of the product universe")]
    UnknownProduct(ProductId),

    /// A partition left a product without a community.
    #[error("partition omits {0}")]
    PartitionMissing(ProductId),

    /// A partition placed a product in more than one community.
    #[error("partition assigns {0} to more than one community")]
    PartitionDuplicate(ProductId),

    /// A partition references a product id the graph does not contain.
    #[error("partition references {0}, which is outside the graph")]
    PartitionUnknown(ProductId),

    /// A bin assignment is not a bijection onto `1..=N`.
    #[error("invalid layout: {0}")]
    InvalidLayout(String),

    /// No run has completed yet, so there is nothing to serve.
    #[error("no slotting result has been computed yet")]
    NotReady,
}

pub mod show;
pub mod pricing;

pub use show::{City, Show, Theater};
pub use pricing::{
    DynamicPricing, FixedPricing, PricingConfig, PricingError, PricingModel, PricingStrategy,
};

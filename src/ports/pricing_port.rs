//! Pricing and fund-metadata provider port trait.

use crate::domain::error::FundrankError;
use crate::domain::series::PriceSeries;
use crate::domain::universe::FundMeta;

/// External price-history and metadata provider. Implementations must
/// return series sorted strictly ascending by date; the core validates
/// but never re-sorts (rolling-window results are wrong on unsorted
/// input).
pub trait PricingPort {
    fn fetch_pricing(&self, fund_id: &str) -> Result<PriceSeries, FundrankError>;

    fn list_funds(&self) -> Result<Vec<FundMeta>, FundrankError>;
}

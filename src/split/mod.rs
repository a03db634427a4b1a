//! Split boundary location.
//!
//! Given a parsed document body and a split policy, this module
//! computes the ordered list of node-index ranges, one per output
//! document.

mod locator;
mod plan;
mod policy;

pub use locator::locate;
pub use plan::SplitPlan;
pub use policy::SplitPolicy;

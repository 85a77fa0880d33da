//! Room allocation: availability calculation and the transactional claim.

mod allocator;
mod availability;

pub use allocator::{AllocationRequest, Allocator};
pub use availability::find_available;

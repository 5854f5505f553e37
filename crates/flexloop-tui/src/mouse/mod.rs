//! Pointer regions and gesture synthesis

mod handler;
mod region;

pub use handler::MouseHandler;
pub use region::{MouseRegion, RegionHandler, RegionId, RegionRegistry};

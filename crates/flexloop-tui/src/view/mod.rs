//! The view contract and a handful of leaf views
//!
//! A view is asked for its size under a pair of limits first and rendered into
//! a concrete area afterwards. Limits of zero mean "unconstrained".

mod leaf;
mod traits;

pub use leaf::{Empty, Flexible, Spacer, Text, When};
pub use traits::View;

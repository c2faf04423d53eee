// Debug-group markers: timer correlation, instance building, hierarchy sums,
// and call → region lookup.

mod correlate;
mod hierarchy;
mod instance;
mod locate;

pub use correlate::{correlate, Correlation, SortedFetches};
pub use hierarchy::reconstruct_sums;
pub use instance::{build_instances, MarkerId, MarkerInstance, MarkerTiming};
pub use locate::{locate, locate_index};

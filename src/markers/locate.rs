// Interval location: narrowest marker containing a call

use super::instance::MarkerInstance;
use crate::call_log::CallIndex;

/// Position of the narrowest instance containing `call`
///
/// Containment is inclusive at both ends. Among equal ranges the first
/// instance in slice order wins.
pub fn locate_index(call: CallIndex, instances: &[MarkerInstance]) -> Option<usize> {
    let mut best: Option<(usize, u64)> = None;

    for (i, marker) in instances.iter().enumerate() {
        if !marker.contains_call(call) {
            continue;
        }
        let range = marker.range();
        match best {
            Some((_, best_range)) if best_range <= range => {}
            _ => best = Some((i, range)),
        }
    }

    best.map(|(i, _)| i)
}

/// Narrowest instance containing `call`, if any
pub fn locate(call: CallIndex, instances: &[MarkerInstance]) -> Option<&MarkerInstance> {
    locate_index(call, instances).map(|i| &instances[i])
}

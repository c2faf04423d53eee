#![no_main]

use libfuzzer_sys::fuzz_target;
use glscope::call_log::parse_call_log;
use glscope::markers::{build_instances, reconstruct_sums, SortedFetches};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Any text must parse, pair and reconstruct without panicking
        let log = parse_call_log(input.lines());
        let fetches = SortedFetches::new(log.fetches);
        let mut markers = build_instances(&log.intervals, &fetches, 15);
        reconstruct_sums(&mut markers);
    }
});

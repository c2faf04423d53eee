// Event stream parser for apitrace call logs
//
// Turns `apitrace dump` text into the three signals the analysis correlates:
// program labels, debug-group intervals and timestamp reads.

mod classify;
mod parser;

pub use classify::{
    parse_pop, parse_program_label, parse_push, parse_timestamp_fetch, CallIndex,
    DebugGroupPush, ProgramId, ProgramLabel, TimestampFetch,
};
pub use parser::{
    lossy_lines, parse_call_log, read_call_log, CallLog, CallLogParser, DebugGroupInterval,
    ProgramLabels,
};

#[cfg(test)]
mod tests;

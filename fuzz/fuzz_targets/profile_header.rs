#![no_main]

use libfuzzer_sys::fuzz_target;
use glscope::attribution::ProfileHeader;
use glscope::config::ProfileColumns;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let mut lines = input.lines();
        if let Some(Ok(header)) = lines
            .next()
            .map(|line| ProfileHeader::parse(line, &ProfileColumns::default()))
        {
            for line in lines {
                let _ = header.parse_row(line);
            }
        }
    }
});

// Parser tests over small hand-written dumps

use super::*;
use std::io::Cursor;

fn push(call: u64, message: &str) -> String {
    format!(
        r#"{} glPushDebugGroup(source = GL_DEBUG_SOURCE_APPLICATION, id = 0, length = -1, message = "{}")"#,
        call, message
    )
}

fn pop(call: u64) -> String {
    format!("{} glPopDebugGroup()", call)
}

fn label(call: u64, program: u32, text: &str) -> String {
    format!(
        r#"{} glObjectLabel(identifier = GL_PROGRAM, name = {}, length = -1, label = "{}")"#,
        call, program, text
    )
}

fn fetch(call: u64, value: u64) -> String {
    format!(
        "{} glGetQueryObjectui64v(id = 1, pname = GL_QUERY_RESULT, params = &{})",
        call, value
    )
}

#[test]
fn test_labels_collected() {
    let log = parse_call_log([
        label(1234, 42, "shaders/test.glsl"),
        label(5678, 99, "shaders/pbr.frag"),
    ]);

    assert_eq!(log.labels.len(), 2);
    assert_eq!(log.labels.get(42), Some("shaders/test.glsl"));
    assert_eq!(log.labels.get(99), Some("shaders/pbr.frag"));
}

#[test]
fn test_label_last_write_wins() {
    let log = parse_call_log([label(1, 7, "shaders/old.glsl"), label(2, 7, "shaders/new.glsl")]);
    assert_eq!(log.labels.len(), 1);
    assert_eq!(log.labels.get(7), Some("shaders/new.glsl"));
}

#[test]
fn test_sequential_groups() {
    let log = parse_call_log([
        push(100, "IBL Generation"),
        pop(200),
        push(300, "Rendering"),
        pop(400),
    ]);

    assert_eq!(
        log.intervals,
        vec![
            DebugGroupInterval::new(100, 200, "IBL Generation"),
            DebugGroupInterval::new(300, 400, "Rendering"),
        ]
    );
}

#[test]
fn test_nested_groups_emitted_in_close_order() {
    let log = parse_call_log([
        push(10, "Frame"),
        push(20, "Shadow"),
        pop(30),
        push(40, "Lighting"),
        pop(50),
        pop(60),
    ]);

    let order: Vec<(u64, u64, &str)> = log
        .intervals
        .iter()
        .map(|i| (i.start, i.end, i.label.as_str()))
        .collect();
    assert_eq!(
        order,
        vec![(20, 30, "Shadow"), (40, 50, "Lighting"), (10, 60, "Frame")]
    );
}

#[test]
fn test_unmatched_pop_discarded() {
    let log = parse_call_log([pop(5), push(10, "A"), pop(20), pop(25)]);

    assert_eq!(log.intervals, vec![DebugGroupInterval::new(10, 20, "A")]);
    assert_eq!(log.unmatched_pops, 2);
}

#[test]
fn test_unclosed_push_counted() {
    let log = parse_call_log([push(10, "Outer"), push(20, "Inner"), pop(30)]);

    assert_eq!(log.intervals, vec![DebugGroupInterval::new(20, 30, "Inner")]);
    assert_eq!(log.unclosed_pushes, 1);
}

#[test]
fn test_fetches_kept_in_log_order() {
    let log = parse_call_log([fetch(16039, 3550650788280), fetch(16038, 3550341052030)]);

    assert_eq!(
        log.fetches,
        vec![
            TimestampFetch {
                call: 16039,
                value: 3550650788280
            },
            TimestampFetch {
                call: 16038,
                value: 3550341052030
            },
        ]
    );
}

#[test]
fn test_unrecognised_lines_ignored() {
    let log = parse_call_log([
        "",
        "garbage",
        "42 glDrawElements(mode = GL_TRIANGLES, count = 36, type = GL_UNSIGNED_INT, indices = NULL)",
        "glPopDebugGroup()",
    ]);

    assert!(log.labels.is_empty());
    assert!(log.intervals.is_empty());
    assert!(log.fetches.is_empty());
    assert_eq!(log.unmatched_pops, 0);
}

#[test]
fn test_read_call_log_from_reader() {
    let text = [push(1, "A"), pop(2), fetch(3, 10), fetch(4, 20)].join("\n");
    let log = read_call_log(Cursor::new(text)).unwrap();

    assert_eq!(log.intervals.len(), 1);
    assert_eq!(log.fetches.len(), 2);
}

#[test]
fn test_incremental_feed_matches_batch() {
    let lines = [push(1, "A"), push(2, "B"), pop(3), pop(4), label(5, 1, "x")];

    let mut parser = CallLogParser::new();
    for line in &lines {
        parser.feed(line);
    }
    let incremental = parser.finish();
    let batch = parse_call_log(&lines);

    assert_eq!(incremental.intervals, batch.intervals);
    assert_eq!(incremental.labels, batch.labels);
}

#[test]
fn test_invalid_utf8_line_is_ignored() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(push(100, "Bloom").as_bytes());
    bytes.extend_from_slice(b"\n150 glStringMarkerGREMEDY(len = 2, string = \"\xff\xfe\")\n");
    bytes.extend_from_slice(pop(200).as_bytes());
    bytes.push(b'\n');

    let log = read_call_log(Cursor::new(bytes)).unwrap();

    assert_eq!(log.intervals, vec![DebugGroupInterval::new(100, 200, "Bloom")]);
}

#[test]
fn test_lossy_lines_strip_line_endings() {
    let lines: Vec<String> = lossy_lines(Cursor::new(b"a\r\nb\xff\nc".to_vec()))
        .collect::<std::io::Result<_>>()
        .unwrap();

    assert_eq!(lines, vec!["a", "b\u{FFFD}", "c"]);
}

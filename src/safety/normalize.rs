//! Lexical `remove_dot_segments`, as described in
//! [RFC 3986 5.2.4](https://datatracker.ietf.org/doc/html/rfc3986#section-5.2.4).

use itertools::{Itertools, Position};

/// Whether `segment` reads as `target` (`.` or `..`) once `%2e` is decoded.
///
/// User agents decode these before resolving, so `/admin/%2e%2e/x` has to be
/// treated like `/admin/../x`.
fn is_dot_segment(segment: &str, target: &str) -> bool {
    segment.len() <= 6 && segment.to_ascii_lowercase().replace("%2e", ".") == target
}

/// Resolves the `.` and `..` segments of an absolute path, without touching
/// the filesystem.
///
/// `..` never climbs above the root, and a trailing dot segment leaves a
/// trailing slash behind (`/a/b/..` becomes `/a/`). Backslashes separate
/// segments too, as they do for user agents on http(s) URLs, and come out as
/// slashes.
pub(crate) fn remove_dot_segments(path: &str) -> String {
    let relative = path.strip_prefix(['/', '\\']).unwrap_or(path);
    let mut output: Vec<&str> = Vec::new();

    for (position, segment) in relative.split(['/', '\\']).with_position() {
        let is_last = matches!(position, Position::Last | Position::Only);

        if is_dot_segment(segment, "..") {
            output.pop();
        } else if !is_dot_segment(segment, ".") {
            output.push(segment);
            continue;
        }

        if is_last {
            output.push("");
        }
    }

    format!("/{}", output.join("/"))
}

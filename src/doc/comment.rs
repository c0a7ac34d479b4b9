use serde::de::IgnoredAny;

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";
const INDENT: &str = "  ";

/// Turn a raw descriptor comment into description text.
///
/// Leading comment decoration (`/`, `*`, spaces, newlines) is dropped and
/// fenced ```` ```json ```` blocks are re-indented.
pub fn description(comment: &str) -> String {
    let text = comment.trim_start_matches(|c| matches!(c, '*' | '/' | '\n' | ' '));
    indent_json_blocks(text, JSON_FENCE, FENCE)
}

/// Re-indent the JSON between `begin`/`end` pairs.
///
/// Scanning stops at a `begin` marker that starts the remaining text, so a
/// comment opening with a fence is left alone. Every block body is put on a
/// new line after its marker; a body that is not valid JSON is otherwise kept
/// as written. If a `begin` marker has no matching `end`, the whole comment is
/// returned unchanged.
pub fn indent_json_blocks(comment: &str, begin: &str, end: &str) -> String {
    let mut out = String::with_capacity(comment.len());
    let mut rest = comment;

    while let Some(start) = rest.find(begin).filter(|&start| start > 0) {
        out.push_str(&rest[..start + begin.len()]);
        rest = &rest[start + begin.len()..];

        let stop = match rest.find(end) {
            Some(stop) => stop,
            None => return comment.to_string(),
        };

        let body = &rest[..stop];
        out.push('\n');
        match indent_json(body) {
            Some(pretty) => out.push_str(&pretty),
            None => out.push_str(body),
        }
        out.push_str(end);
        rest = &rest[stop + end.len()..];
    }

    out.push_str(rest);
    out
}

fn is_json_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

// Only whitespace outside string literals changes; numbers, escapes and
// duplicate keys are copied as written. Leading whitespace is dropped and
// trailing whitespace kept.
fn indent_json(body: &str) -> Option<String> {
    let content = body.trim_start_matches(is_json_space);
    let json = content.trim_end_matches(is_json_space);
    let trailing = &content[json.len()..];

    serde_json::from_str::<IgnoredAny>(json).ok()?;

    let mut out = String::with_capacity(json.len() * 2);
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut chars = json.chars().peekable();

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            c if is_json_space(c) => {}
            '"' => {
                in_string = true;
                out.push(c);
            }
            '{' | '[' => {
                out.push(c);
                while chars.peek().copied().map_or(false, is_json_space) {
                    chars.next();
                }
                match chars.peek() {
                    Some(&close) if close == '}' || close == ']' => {
                        out.push(close);
                        chars.next();
                    }
                    _ => {
                        depth += 1;
                        newline(&mut out, depth);
                    }
                }
            }
            '}' | ']' => {
                depth = depth.saturating_sub(1);
                newline(&mut out, depth);
                out.push(c);
            }
            ',' => {
                out.push(c);
                newline(&mut out, depth);
            }
            ':' => out.push_str(": "),
            _ => out.push(c),
        }
    }

    out.push_str(trailing);
    Some(out)
}

fn newline(out: &mut String, depth: usize) {
    out.push('\n');
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

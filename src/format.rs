//! Fixed-width text layout for tag lists and multi-line header fields.

/// Maximum number of requirement tags rendered in one numeric step.
pub const TAGS_PER_STEP: usize = 7;

fn text_width(s: &str) -> usize {
    s.chars().count()
}

/// Join tags into a comma-separated list, wrapping at `width`.
///
/// Every tag but the last carries a trailing `,`. Tokens are packed greedily
/// and never broken; continuation lines start with `indent` spaces, which
/// count toward `width`. A token wider than the line sits alone on it.
pub fn format_tag_list<S: AsRef<str>>(
    tags: &[S],
    delimiter: &str,
    width: usize,
    indent: usize,
) -> String {
    let last = tags.len().saturating_sub(1);
    let tokens: Vec<String> = tags
        .iter()
        .enumerate()
        .map(|(i, tag)| {
            if i < last {
                format!("{},", tag.as_ref())
            } else {
                tag.as_ref().to_string()
            }
        })
        .collect();

    let joined = tokens.join(delimiter);
    if text_width(&joined) <= width {
        return joined;
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for token in tokens {
        if current.is_empty() {
            current = token;
            continue;
        }
        let limit = if lines.is_empty() {
            width
        } else {
            width.saturating_sub(indent)
        };
        if text_width(&current) + text_width(delimiter) + text_width(&token) <= limit {
            current.push_str(delimiter);
            current.push_str(&token);
        } else {
            lines.push(std::mem::replace(&mut current, token));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines.join(&format!("\n{}", " ".repeat(indent)))
}

/// Lay out `label: text` with continuation lines aligned under the value.
pub fn format_multiline_field(label: &str, text: &str, indent: usize) -> Vec<String> {
    let pad = " ".repeat(indent);
    let mut parts = text.lines();
    let first = match parts.next() {
        Some(first) if !first.is_empty() => format!("{pad}{label}: {first}"),
        _ => format!("{pad}{label}:"),
    };

    let value_pad = " ".repeat(indent + text_width(label) + 2);
    std::iter::once(first)
        .chain(parts.map(|cont| format!("{value_pad}{cont}")))
        .collect()
}

/// Split tags into numeric-step chunks. No tags still yields one empty chunk.
pub fn chunk_tags<T>(tags: &[T]) -> Vec<&[T]> {
    if tags.is_empty() {
        return vec![tags];
    }
    tags.chunks(TAGS_PER_STEP).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(prefix: &str, n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("{prefix}-{i:04}")).collect()
    }

    /// Undo `format_tag_list`: join continuation lines, split, drop commas.
    fn unwrap_tags(text: &str, indent: usize) -> Vec<String> {
        text.replace(&format!("\n{}", " ".repeat(indent)), " ")
            .split(' ')
            .map(|t| t.trim_end_matches(',').to_string())
            .collect()
    }

    #[test]
    fn short_list_stays_on_one_line() {
        assert_eq!(
            format_tag_list(&["X-1", "X-2", "X-3"], " ", 120, 11),
            "X-1, X-2, X-3"
        );
    }

    #[test]
    fn empty_list() {
        let tags: [&str; 0] = [];
        assert_eq!(format_tag_list(&tags, " ", 120, 11), "");
    }

    #[test]
    fn single_tag_has_no_comma() {
        assert_eq!(format_tag_list(&["X-1"], " ", 120, 11), "X-1");
    }

    #[test]
    fn long_list_wraps_with_indent() {
        let tags = numbered("BSW_SEC_ModulesHere_Bogus", 10);
        let text = format_tag_list(&tags, " ", 120, 11);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines.len() > 1);
        assert!(text_width(lines[0]) <= 120);
        for line in &lines[1..] {
            assert!(line.starts_with("           "));
            assert!(!line[11..].starts_with(' '));
            assert!(text_width(line) <= 120);
        }
        assert_eq!(unwrap_tags(&text, 11), tags);
    }

    #[test]
    fn wrapping_is_greedy() {
        // Each token is "T-n," (4 chars); width 14 fits three per line.
        let tags = numbered("T", 7)
            .into_iter()
            .map(|t| t.replace("-000", "-"))
            .collect::<Vec<_>>();
        let text = format_tag_list(&tags, " ", 14, 2);
        assert_eq!(text, "T-1, T-2, T-3,\n  T-4, T-5,\n  T-6, T-7");
    }

    #[test]
    fn oversized_token_gets_its_own_line() {
        let long = "X".repeat(30);
        let text = format_tag_list(&["A-1".to_string(), long.clone(), "B-1".to_string()], " ", 20, 4);
        assert_eq!(text, format!("A-1,\n    {long},\n    B-1"));
    }

    #[test]
    fn wrapping_is_deterministic() {
        let tags = numbered("REQ", 40);
        assert_eq!(
            format_tag_list(&tags, " ", 120, 14),
            format_tag_list(&tags, " ", 120, 14)
        );
    }

    #[test]
    fn round_trip_for_many_sizes() {
        for n in 1..30 {
            let tags = numbered("BSW_SWCS_CryptoDriver_Crypto", n);
            let text = format_tag_list(&tags, " ", 120, 14);
            assert_eq!(unwrap_tags(&text, 14), tags, "n = {n}");
        }
    }

    #[test]
    fn multiline_field_alignment() {
        let lines = format_multiline_field(
            "Description",
            "This is a multi-line description for the generator test.\nIt spans multiple lines to validate parsing behavior.",
            6,
        );
        assert_eq!(
            lines,
            [
                "      Description: This is a multi-line description for the generator test.",
                "                   It spans multiple lines to validate parsing behavior.",
            ]
        );
    }

    #[test]
    fn multiline_field_output_indent() {
        let lines = format_multiline_field("Output", "First\nSecond line of output description.", 6);
        assert_eq!(lines[1], format!("{}Second line of output description.", " ".repeat(14)));
    }

    #[test]
    fn empty_field_keeps_label() {
        assert_eq!(format_multiline_field("Input", "", 6), ["      Input:"]);
    }

    #[test]
    fn blank_continuation_lines_keep_alignment() {
        let lines = format_multiline_field("Input", "a\n\nb", 2);
        assert_eq!(lines, ["  Input: a", "         ", "         b"]);
    }

    #[test]
    fn chunk_counts() {
        for (n, expected) in [(0, 1), (1, 1), (7, 1), (8, 2), (9, 2), (14, 2), (15, 3)] {
            let tags = numbered("R", n);
            assert_eq!(chunk_tags(&tags).len(), expected, "n = {n}");
            assert_eq!(expected, std::cmp::max(1, n.div_ceil(TAGS_PER_STEP)));
        }
    }

    #[test]
    fn nine_tags_split_seven_and_two() {
        let tags = numbered("R", 9);
        let sizes: Vec<usize> = chunk_tags(&tags).iter().map(|c| c.len()).collect();
        assert_eq!(sizes, [7, 2]);
    }

    #[test]
    fn no_tags_is_one_empty_chunk() {
        let tags: Vec<String> = Vec::new();
        let chunks = chunk_tags(&tags);
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].is_empty());
    }
}

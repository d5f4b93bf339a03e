use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::dataset::{Dataset, Record};

static FIELD_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[[\s\x{FEFF}]--\x{85}]*(?:,|$)").expect("static pattern"));

// Unicode whitespace plus the byte-order mark, minus NEL.
fn is_blank_char(ch: char) -> bool {
    ch == '\u{feff}' || (ch.is_whitespace() && ch != '\u{85}')
}

fn trim_blank(text: &str) -> &str {
    text.trim_matches(is_blank_char)
}

// The first non-blank line names the columns; rows need one field per column.
pub fn parse(raw: &str) -> Dataset {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let mut lines = raw
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !trim_blank(line).is_empty());

    let Some(header_line) = lines.next() else {
        return Dataset::empty();
    };
    let columns: Arc<[String]> = header_line
        .split(',')
        .map(|header| trim_blank(header).replace('"', ""))
        .collect();

    let mut records = Vec::new();
    for (row, line) in lines.enumerate() {
        let fields = tokenize(line);
        if fields.len() == columns.len() {
            records.push(Record::new(Arc::clone(&columns), fields));
        } else {
            tracing::debug!(
                row = row + 1,
                found = fields.len(),
                expected = columns.len(),
                "dropping row with mismatched field count"
            );
        }
    }

    Dataset::new(columns, records)
}

pub fn tokenize(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut pos = 0;
    while pos < line.len() {
        match match_field(line, pos) {
            Some(end) => {
                fields.push(clean_field(&line[pos..end]));
                pos = end;
            }
            None => {
                pos += line[pos..].chars().next().map_or(1, char::len_utf8);
            }
        }
    }
    fields
}

// Quotes go first, whitespace second: `" foo "` becomes `foo`.
fn clean_field(raw: &str) -> String {
    trim_blank(&raw.replace('"', "")).to_string()
}

fn at_boundary(rest: &str) -> bool {
    FIELD_BOUNDARY.is_match(rest)
}

// End offset of the field starting at `start`, if one starts there.
fn match_field(line: &str, start: usize) -> Option<usize> {
    let rest = &line[start..];

    if rest.starts_with('"') {
        // Shortest closing quote that leaves us on a boundary.
        for (offset, ch) in rest.char_indices().skip(1) {
            if matches!(ch, '\r' | '\u{2028}' | '\u{2029}') {
                break;
            }
            if ch == '"' {
                let end = start + offset + 1;
                if at_boundary(&line[end..]) {
                    return Some(end);
                }
            }
        }
    }

    // Unquoted run, longest first, backing off one char at a time.
    let run = rest.find(['"', ',']).unwrap_or(rest.len());
    rest[..run]
        .char_indices()
        .map(|(offset, ch)| start + offset + ch.len_utf8())
        .rev()
        .find(|&end| at_boundary(&line[end..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(dataset: &Dataset) -> Vec<Vec<(String, String)>> {
        dataset
            .records()
            .iter()
            .map(|r| {
                r.iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect()
            })
            .collect()
    }

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn blank_lines_are_ignored_anywhere() {
        let dataset = parse("a,b\n1,2\n\n3,4");
        assert_eq!(
            rows(&dataset),
            vec![pairs(&[("a", "1"), ("b", "2")]), pairs(&[("a", "3"), ("b", "4")])]
        );

        let padded = parse("\n  \na,b\n \t \n1,2\n\n");
        assert_eq!(padded.columns(), ["a", "b"]);
        assert_eq!(padded.len(), 1);
    }

    #[test]
    fn quoted_field_keeps_embedded_comma() {
        let dataset = parse("a,b\n\"1,1\",2");
        assert_eq!(rows(&dataset), vec![pairs(&[("a", "1,1"), ("b", "2")])]);
    }

    #[test]
    fn mismatched_rows_are_dropped_without_touching_neighbours() {
        assert!(parse("a,b\n1,2,3").is_empty());

        let dataset = parse("a,b\n1,2\nonly-one\n3,4\n5,6,7\n8,9");
        let firsts: Vec<_> = dataset
            .records()
            .iter()
            .map(|r| r.get("a").unwrap_or_default().to_string())
            .collect();
        assert_eq!(firsts, vec!["1", "3", "8"]);
    }

    #[test]
    fn headers_are_trimmed_then_unquoted() {
        let dataset = parse(" \"Concept\" , Journal Prompt \nJoy,Laugh");
        assert_eq!(dataset.columns(), ["Concept", "Journal Prompt"]);
        let first = dataset.get(0).unwrap();
        assert_eq!(first.get("Journal Prompt"), Some("Laugh"));
    }

    #[test]
    fn quotes_are_stripped_before_trimming() {
        assert_eq!(tokenize("\" foo \",bar"), vec!["foo", "bar"]);
        assert_eq!(tokenize("  spaced  ,  out  "), vec!["spaced", "out"]);
    }

    #[test]
    fn empty_fields_produce_no_token() {
        assert_eq!(tokenize("1,,2"), vec!["1", "2"]);
        assert!(parse("a,b,c\n1,,2").is_empty());
    }

    #[test]
    fn crlf_input_parses_cleanly() {
        let dataset = parse("a,b\r\n1,\"x, y\"\r\n2,3\r\n");
        assert_eq!(
            rows(&dataset),
            vec![pairs(&[("a", "1"), ("b", "x, y")]), pairs(&[("a", "2"), ("b", "3")])]
        );
    }

    #[test]
    fn trailing_space_after_quoted_field_becomes_extra_token() {
        assert_eq!(tokenize("1,\"x\" "), vec!["1", "x", ""]);
    }

    #[test]
    fn quoted_span_extends_to_a_boundary_quote() {
        // The first closing quote is followed by text, so the span keeps going.
        assert_eq!(tokenize("\"say \"hi\" now\",2"), vec!["say hi now", "2"]);
    }

    #[test]
    fn unquoted_text_glued_to_a_quote_is_not_a_field() {
        // `ab"` never reaches a boundary; the quoted tail still does.
        assert_eq!(tokenize("ab\"c\",d"), vec!["c", "d"]);
    }

    #[test]
    fn empty_input_yields_empty_dataset() {
        let dataset = parse("");
        assert!(dataset.is_empty());
        assert!(dataset.columns().is_empty());

        let header_only = parse("a,b\n");
        assert!(header_only.is_empty());
        assert_eq!(header_only.columns(), ["a", "b"]);
    }

    #[test]
    fn non_ascii_text_survives() {
        let dataset = parse("Concept,Note\nGratitude ✨,\"merci, danke\"");
        let first = dataset.get(0).unwrap();
        assert_eq!(first.get("Note"), Some("merci, danke"));
        assert_eq!(first.concept(), "Gratitude ✨");
    }

    #[test]
    fn bundled_dataset_parses_every_row() {
        let raw = include_str!("../assets/cards.csv");
        let dataset = parse(raw);
        assert_eq!(dataset.len(), 12);
        assert!(dataset.records().iter().all(|r| !r.prompt().is_empty()));
        assert_eq!(dataset.get(0).unwrap().actions().len(), 2);
    }

    #[test]
    fn leading_byte_order_mark_is_ignored() {
        let dataset = parse("\u{feff}Concept,Prompt\nJoy,Laugh");
        assert_eq!(dataset.columns(), ["Concept", "Prompt"]);
        assert_eq!(dataset.get(0).unwrap().get("Concept"), Some("Joy"));

        let bom_line = parse("\u{feff}\nConcept,Prompt\nJoy,Laugh");
        assert_eq!(bom_line.columns(), ["Concept", "Prompt"]);
        assert_eq!(bom_line.len(), 1);
    }

    #[test]
    fn byte_order_mark_counts_as_whitespace() {
        assert_eq!(tokenize("\"x\"\u{feff},y"), vec!["x", "y"]);
        assert_eq!(tokenize("\u{feff}joy\u{feff},rest"), vec!["joy", "rest"]);
        let dataset = parse("a,b\n\u{feff}\n1,2");
        assert_eq!(dataset.len(), 1);
    }

    #[test]
    fn next_line_char_is_not_whitespace() {
        assert_eq!(tokenize("x,\u{85}"), vec!["x", "\u{85}"]);
        // NEL after the closing quote is no boundary, so only the tail matches.
        assert_eq!(tokenize("\"x\"\u{85},y"), vec!["\u{85}", "y"]);
        let dataset = parse("a,b\n\u{85}\n1,2");
        assert_eq!(dataset.columns(), ["a", "b"]);
        assert_eq!(dataset.len(), 1);
    }
}

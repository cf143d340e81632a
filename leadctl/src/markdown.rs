//! Parser for the markdown subset used by AI summaries: heading levels 1-3
//! and `**bold**` spans. Everything else is literal text.

use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum Span {
    Text(String),
    Bold(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph(Vec<Span>),
    Blank,
}

/// Parse a document into blocks, one per input line.
pub fn parse(text: &str) -> Vec<Block> {
    text.lines().map(parse_line).collect()
}

fn parse_line(line: &str) -> Block {
    if line.trim().is_empty() {
        return Block::Blank;
    }

    // Longest prefix first so `###` is not read as a level-1 heading
    for (prefix, level) in [("### ", 3), ("## ", 2), ("# ", 1)] {
        if let Some(rest) = line.strip_prefix(prefix) {
            return Block::Heading {
                level,
                text: rest.trim().to_string(),
            };
        }
    }

    Block::Paragraph(parse_spans(line))
}

/// Split a line into text and bold spans. An opening `**` without a closing
/// partner is kept as literal text.
fn parse_spans(line: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut rest = line;

    while let Some(start) = rest.find("**") {
        let after_marker = &rest[start + 2..];
        match after_marker.find("**") {
            Some(end) => {
                if start > 0 {
                    spans.push(Span::Text(rest[..start].to_string()));
                }
                spans.push(Span::Bold(after_marker[..end].to_string()));
                rest = &after_marker[end + 2..];
            }
            None => break,
        }
    }

    if !rest.is_empty() {
        spans.push(Span::Text(rest.to_string()));
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_parse_with_their_level() {
        assert_eq!(
            parse("# Título"),
            vec![Block::Heading { level: 1, text: "Título".to_string() }]
        );
        assert_eq!(
            parse("### Resumo conversa"),
            vec![Block::Heading { level: 3, text: "Resumo conversa".to_string() }]
        );
    }

    #[test]
    fn hash_without_space_is_a_paragraph() {
        assert_eq!(
            parse("#semespaço"),
            vec![Block::Paragraph(vec![Span::Text("#semespaço".to_string())])]
        );
    }

    #[test]
    fn blank_lines_become_blank_blocks() {
        let blocks = parse("### A\n\ntexto");
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[1], Block::Blank);
    }

    #[test]
    fn bold_spans_are_extracted() {
        assert_eq!(
            parse("**Status:** Não Cliente"),
            vec![Block::Paragraph(vec![
                Span::Bold("Status:".to_string()),
                Span::Text(" Não Cliente".to_string()),
            ])]
        );
    }

    #[test]
    fn multiple_bold_spans_on_one_line() {
        assert_eq!(
            parse("a **b** c **d** e"),
            vec![Block::Paragraph(vec![
                Span::Text("a ".to_string()),
                Span::Bold("b".to_string()),
                Span::Text(" c ".to_string()),
                Span::Bold("d".to_string()),
                Span::Text(" e".to_string()),
            ])]
        );
    }

    #[test]
    fn unterminated_bold_marker_is_literal() {
        assert_eq!(
            parse("a **b c"),
            vec![Block::Paragraph(vec![Span::Text("a **b c".to_string())])]
        );
    }

    #[test]
    fn plain_text_is_a_single_span() {
        assert_eq!(
            parse("apenas texto"),
            vec![Block::Paragraph(vec![Span::Text("apenas texto".to_string())])]
        );
    }
}

// Light markdown styling for AI summaries

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

/// Render a whole summary, tracking fenced code blocks across lines.
pub fn render_summary(markdown: &str) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut in_code_block = false;

    for line in markdown.lines() {
        if is_code_fence(line) {
            in_code_block = !in_code_block;
            continue;
        }

        if in_code_block {
            lines.push(Line::from(Span::styled(
                format!("  {line}"),
                Style::default().fg(Color::Green),
            )));
        } else {
            lines.push(render_line(line));
        }
    }

    lines
}

fn render_line(line: &str) -> Line<'static> {
    let trimmed = line.trim_start();

    if let Some((level, heading)) = heading(trimmed) {
        let color = if level == 1 { Color::Yellow } else { Color::Cyan };
        return Line::from(Span::styled(
            heading.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
    }

    if let Some(item) = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
    {
        let mut spans = vec![Span::styled("• ", Style::default().fg(Color::Cyan))];
        spans.extend(inline_spans(item));
        return Line::from(spans);
    }

    if let Some((number, item)) = numbered_item(trimmed) {
        let mut spans = vec![Span::styled(
            format!("{number}. "),
            Style::default().fg(Color::Cyan),
        )];
        spans.extend(inline_spans(item));
        return Line::from(spans);
    }

    Line::from(inline_spans(line))
}

fn heading(line: &str) -> Option<(usize, &str)> {
    let level = line.chars().take_while(|&c| c == '#').count();
    if level == 0 {
        return None;
    }
    line[level..]
        .strip_prefix(' ')
        .map(|rest| (level, rest.trim()))
}

fn numbered_item(line: &str) -> Option<(&str, &str)> {
    let (number, rest) = line.split_once(". ")?;
    (!number.is_empty() && number.chars().all(|c| c.is_ascii_digit())).then_some((number, rest))
}

/// Style `**bold**` and `` `code` `` runs. Unclosed markers stay literal.
fn inline_spans(text: &str) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let bold = rest.find("**");
        let code = rest.find('`');

        let (start, marker, style) = match (bold, code) {
            (Some(b), Some(c)) if c < b => (c, "`", code_style()),
            (Some(b), _) => (b, "**", bold_style()),
            (None, Some(c)) => (c, "`", code_style()),
            (None, None) => break,
        };

        let after = &rest[start + marker.len()..];
        let Some(end) = after.find(marker) else {
            break;
        };

        if start > 0 {
            spans.push(Span::raw(rest[..start].to_string()));
        }
        spans.push(Span::styled(after[..end].to_string(), style));
        rest = &after[end + marker.len()..];
    }

    if !rest.is_empty() {
        spans.push(Span::raw(rest.to_string()));
    }
    spans
}

fn bold_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

fn code_style() -> Style {
    Style::default().fg(Color::Magenta)
}

pub fn is_code_fence(line: &str) -> bool {
    line.trim().starts_with("```")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn test_plain_text() {
        let lines = render_summary("This code updates one document.");
        assert_eq!(lines.len(), 1);
        assert_eq!(text_of(&lines[0]), "This code updates one document.");
    }

    #[test]
    fn test_bold_and_code_are_split_into_spans() {
        let lines = render_summary("Calls **findOneAndUpdate** with `upsert(true)`.");
        let spans = &lines[0].spans;
        assert_eq!(spans.len(), 5);
        assert_eq!(spans[1].content, "findOneAndUpdate");
        assert_eq!(spans[1].style, bold_style());
        assert_eq!(spans[3].content, "upsert(true)");
        assert_eq!(spans[3].style, code_style());
    }

    #[test]
    fn test_unclosed_marker_is_literal() {
        let lines = render_summary("a **dangling marker");
        assert_eq!(text_of(&lines[0]), "a **dangling marker");
    }

    #[test]
    fn test_heading() {
        let lines = render_summary("## What it does");
        assert_eq!(text_of(&lines[0]), "What it does");
        // No space after the hashes: not a heading
        assert_eq!(text_of(&render_summary("#hashtag")[0]), "#hashtag");
    }

    #[test]
    fn test_lists() {
        let lines = render_summary("- first\n2. second");
        assert_eq!(text_of(&lines[0]), "• first");
        assert_eq!(text_of(&lines[1]), "2. second");
    }

    #[test]
    fn test_code_fence_lines_are_dropped() {
        let lines = render_summary("Example:\n```java\nint x = 1;\n```\nDone");
        assert_eq!(lines.len(), 3);
        assert_eq!(text_of(&lines[1]), "  int x = 1;");
    }

    #[test]
    fn test_is_code_fence() {
        assert!(is_code_fence("```"));
        assert!(is_code_fence("  ```java"));
        assert!(!is_code_fence("code"));
    }
}

//! Line-oriented markdown repair.
//!
//! Generated text is prone to hard-wrap artifacts: run-on headings, titles
//! wrapped onto the next line, paragraphs broken mid-sentence, numbers
//! orphaned on their own line. This pipeline repairs layout only: it never
//! reorders, deletes, or paraphrases words outside the structural joins and
//! splits below, and it never touches the character sequence inside a
//! fenced code region.
//!
//! Lines are classified once (fence delimiter, fence interior, blank,
//! heading, bullet, plain text) and then pushed through a fixed sequence of
//! repair passes, each with a narrow precondition.

use regex::Regex;
use std::sync::LazyLock;

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").expect("heading pattern must compile"));

static BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:[-*]|\d+\.)\s+").expect("bullet pattern must compile"));

static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*```").expect("fence pattern must compile"));

// Run-on H3 headings like "### Programme overview The MSc..." are split
// into a short title and a paragraph. Intentionally restricted to H3, the
// level the generator produces.
static INLINE_H3_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(###\s+)(.+)$").expect("heading pattern must compile"));

static THE_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i) the ").expect("split pattern must compile"));

// Lowercase connectives that should never end a paragraph; a blank line
// after one of these is a spurious hard wrap.
static CONNECTIVE_END_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(in|to|of|be|is|are|was|were)$").expect("connective pattern must compile")
});

// Short fragments like "40 students" or "12 and 24 months," orphaned
// between blank lines.
static NUMERIC_FRAGMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+(?:\s+and\s+\d+)?\s+[A-Za-z]+[A-Za-z\s]*[,.;:]?$")
        .expect("fragment pattern must compile")
});

/// Structural classification of a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    /// A fence delimiter line (``` with optional indent/info string).
    Fence,
    /// A line inside a fenced region; copied through byte-for-byte.
    Verbatim,
    /// Empty or whitespace-only line.
    Blank,
    /// ATX heading.
    Heading,
    /// Bullet or numbered list item.
    Bullet,
    /// Anything else.
    Text,
}

#[derive(Debug, Clone)]
struct Line {
    text: String,
    kind: LineKind,
}

impl Line {
    /// Classify a line that lives outside any fenced region.
    fn classified(raw: &str) -> Self {
        let trimmed = raw.trim();
        let kind = if trimmed.is_empty() {
            LineKind::Blank
        } else if HEADING_RE.is_match(trimmed) {
            LineKind::Heading
        } else if BULLET_RE.is_match(raw) {
            LineKind::Bullet
        } else {
            LineKind::Text
        };
        Line {
            text: raw.to_string(),
            kind,
        }
    }

    fn text_line(text: String) -> Self {
        Line {
            text,
            kind: LineKind::Text,
        }
    }

    fn heading(text: String) -> Self {
        Line {
            text,
            kind: LineKind::Heading,
        }
    }

    fn blank() -> Self {
        Line {
            text: String::new(),
            kind: LineKind::Blank,
        }
    }
}

/// Repair markdown layout without altering wording.
///
/// Blank input is passed through unchanged. Fence interiors are preserved
/// byte-for-byte, including their blank lines.
pub fn normalize(text: &str) -> String {
    if text.trim().is_empty() {
        return text.to_string();
    }

    let text = text.replace("\r\n", "\n").replace('\r', "\n");

    let mut lines = parse(&text);
    lines = strip_trailing_whitespace(lines);
    lines = rejoin_split_headings(lines);
    lines = split_inline_h3_headings(lines);
    lines = reflow_paragraphs(lines);
    lines = remove_paragraph_breaks(lines);
    lines = rejoin_numeric_fragments(lines);
    lines = tighten_bullets(lines);
    lines = space_headings(lines);
    lines = space_lists(lines);
    lines = cap_blank_runs(lines);

    render(&lines)
}

/// Split into classified lines, tracking the fenced-region boolean.
fn parse(text: &str) -> Vec<Line> {
    let mut in_fence = false;
    text.split('\n')
        .map(|raw| {
            if FENCE_RE.is_match(raw) {
                in_fence = !in_fence;
                Line {
                    text: raw.to_string(),
                    kind: LineKind::Fence,
                }
            } else if in_fence {
                Line {
                    text: raw.to_string(),
                    kind: LineKind::Verbatim,
                }
            } else {
                Line::classified(raw)
            }
        })
        .collect()
}

fn strip_trailing_whitespace(lines: Vec<Line>) -> Vec<Line> {
    lines
        .into_iter()
        .map(|line| match line.kind {
            LineKind::Fence | LineKind::Verbatim => line,
            _ => Line {
                text: line.text.trim_end().to_string(),
                kind: line.kind,
            },
        })
        .collect()
}

/// Rejoin a heading whose title wrapped onto the following line, even
/// across blank lines:
///
/// ```text
/// ### Why the EDI
/// programme?
/// ```
///
/// becomes `### Why the EDI programme?`. Only short continuations that do
/// not look like sentences (no terminal `.`/`!`) are merged.
fn rejoin_split_headings(lines: Vec<Line>) -> Vec<Line> {
    let mut out: Vec<Line> = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        let line = &lines[i];

        if line.kind == LineKind::Heading && line.text.trim_start().starts_with("###") {
            let mut j = i + 1;
            while j < lines.len() && lines[j].kind == LineKind::Blank {
                j += 1;
            }

            if j < lines.len() {
                let next = &lines[j];
                let nxt = next.text.trim();

                if next.kind == LineKind::Text
                    && !nxt.starts_with(['#', '-', '*'])
                    && nxt.split_whitespace().count() <= 7
                    && !nxt.ends_with('.')
                    && !nxt.ends_with('!')
                {
                    out.push(Line::heading(format!("{} {}", line.text.trim(), nxt)));
                    i = j + 1;
                    continue;
                }
            }
        }

        out.push(line.clone());
        i += 1;
    }

    out
}

/// Split run-on H3 headings into a short title and a paragraph:
///
/// ```text
/// ### Programme overview The MSc...
/// ```
///
/// becomes the heading, a blank line, then the paragraph. The split point
/// is the first standalone " the " when present, otherwise after the first
/// three words.
fn split_inline_h3_headings(lines: Vec<Line>) -> Vec<Line> {
    let mut out: Vec<Line> = Vec::with_capacity(lines.len());

    for line in lines {
        if line.kind != LineKind::Heading {
            out.push(line);
            continue;
        }

        let trimmed = line.text.trim();
        let Some(caps) = INLINE_H3_RE.captures(trimmed) else {
            out.push(line);
            continue;
        };

        let prefix = caps.get(1).map(|m| m.as_str()).unwrap_or("### ");
        let rest = caps.get(2).map(|m| m.as_str()).unwrap_or("").trim();

        // Short headings are already fine
        if rest.split_whitespace().count() <= 5 {
            out.push(Line::heading(format!("{}{}", prefix, rest)));
            continue;
        }

        if let Some(m) = THE_SPLIT_RE.find(rest) {
            let title = rest[..m.start()].trim();
            let cont = rest[m.start() + 1..].trim();
            if !title.is_empty() && !cont.is_empty() {
                out.push(Line::heading(format!("{}{}", prefix, title)));
                out.push(Line::blank());
                out.push(Line::text_line(cont.to_string()));
                continue;
            }
        }

        let words: Vec<&str> = rest.split_whitespace().collect();
        let title = words[..3].join(" ");
        let cont = words[3..].join(" ");

        out.push(Line::heading(format!("{}{}", prefix, title)));
        out.push(Line::blank());
        out.push(Line::text_line(cont));
    }

    out
}

/// Join runs of consecutive plain-text lines into one line. Blank lines,
/// headings, bullets, and fences are hard boundaries that flush the run.
fn reflow_paragraphs(lines: Vec<Line>) -> Vec<Line> {
    let mut out: Vec<Line> = Vec::with_capacity(lines.len());
    let mut buf: Vec<String> = Vec::new();

    fn flush(out: &mut Vec<Line>, buf: &mut Vec<String>) {
        if !buf.is_empty() {
            out.push(Line::text_line(buf.join(" ")));
            buf.clear();
        }
    }

    for line in lines {
        match line.kind {
            LineKind::Text => buf.push(line.text.trim().to_string()),
            _ => {
                flush(&mut out, &mut buf);
                out.push(line);
            }
        }
    }
    flush(&mut out, &mut buf);

    out
}

/// Remove blank lines that break a sentence rather than a paragraph:
/// a blank line before a lowercase continuation, or after a trailing
/// lowercase connective ("in", "to", "of", ...). Only fires between two
/// plain-text lines.
fn remove_paragraph_breaks(lines: Vec<Line>) -> Vec<Line> {
    let mut out: Vec<Line> = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        let cur = &lines[i];

        if cur.kind == LineKind::Blank {
            let merge = match (out.last(), lines.get(i + 1)) {
                (Some(prev), Some(next))
                    if prev.kind == LineKind::Text && next.kind == LineKind::Text =>
                {
                    let first = next.text.trim_start().chars().next();
                    let starts_lower = matches!(first, Some(c) if c.is_lowercase());
                    let starts_word = matches!(first, Some(c) if c.is_alphanumeric());
                    let ends_connective = CONNECTIVE_END_RE.is_match(prev.text.trim_end());
                    // Isolated numeric fragments belong to the next pass
                    let prev_is_fragment = NUMERIC_FRAGMENT_RE.is_match(prev.text.trim());
                    !prev_is_fragment && (starts_lower || (ends_connective && starts_word))
                }
                _ => false,
            };

            if merge {
                if let (Some(prev), Some(next)) = (out.pop(), lines.get(i + 1)) {
                    out.push(Line::text_line(format!(
                        "{} {}",
                        prev.text.trim_end(),
                        next.text.trim_start()
                    )));
                }
                i += 2;
                continue;
            }
        }

        out.push(cur.clone());
        i += 1;
    }

    out
}

/// Rejoin a blank-line-isolated numeric fragment ("40 students",
/// "12 and 24 months,") into its surrounding sentence.
fn rejoin_numeric_fragments(lines: Vec<Line>) -> Vec<Line> {
    let mut out: Vec<Line> = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        let prev_is_text = out
            .last()
            .map(|l| l.kind == LineKind::Text)
            .unwrap_or(false);

        if lines[i].kind == LineKind::Blank && prev_is_text {
            let fragment = lines.get(i + 1).filter(|l| {
                l.kind == LineKind::Text && NUMERIC_FRAGMENT_RE.is_match(l.text.trim())
            });
            let second_blank = lines
                .get(i + 2)
                .map(|l| l.kind == LineKind::Blank)
                .unwrap_or(false);
            let tail = lines.get(i + 3).filter(|l| l.kind == LineKind::Text);

            if let (Some(fragment), true, Some(tail)) = (fragment, second_blank, tail) {
                if let Some(prev) = out.pop() {
                    out.push(Line::text_line(format!(
                        "{} {} {}",
                        prev.text.trim_end(),
                        fragment.text.trim(),
                        tail.text.trim_start()
                    )));
                }
                i += 4;
                continue;
            }
        }

        out.push(lines[i].clone());
        i += 1;
    }

    out
}

/// Remove a blank line strictly between two list items.
fn tighten_bullets(lines: Vec<Line>) -> Vec<Line> {
    let mut out: Vec<Line> = Vec::with_capacity(lines.len());

    for (i, line) in lines.iter().enumerate() {
        if line.kind == LineKind::Blank
            && i > 0
            && i + 1 < lines.len()
            && lines[i - 1].kind == LineKind::Bullet
            && lines[i + 1].kind == LineKind::Bullet
        {
            continue;
        }
        out.push(line.clone());
    }

    out
}

/// Enforce exactly one blank line immediately after every heading.
fn space_headings(lines: Vec<Line>) -> Vec<Line> {
    let mut out: Vec<Line> = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        let is_heading = lines[i].kind == LineKind::Heading;
        out.push(lines[i].clone());

        if is_heading {
            let mut j = i + 1;
            while j < lines.len() && lines[j].kind == LineKind::Blank {
                j += 1;
            }
            if j < lines.len() {
                out.push(Line::blank());
            }
            i = j;
            continue;
        }

        i += 1;
    }

    out
}

/// Insert a blank line before the first bullet of a block preceded by
/// text, and after the last bullet followed by non-blank content.
fn space_lists(lines: Vec<Line>) -> Vec<Line> {
    let mut out: Vec<Line> = Vec::with_capacity(lines.len());

    for (i, line) in lines.iter().enumerate() {
        let cur_is_bullet = line.kind == LineKind::Bullet;

        if cur_is_bullet && i > 0 {
            let prev = &lines[i - 1];
            if !matches!(
                prev.kind,
                LineKind::Blank | LineKind::Bullet | LineKind::Heading
            ) {
                out.push(Line::blank());
            }
        }

        out.push(line.clone());

        if cur_is_bullet {
            if let Some(next) = lines.get(i + 1) {
                if !matches!(next.kind, LineKind::Blank | LineKind::Bullet) {
                    out.push(Line::blank());
                }
            }
        }
    }

    out
}

/// Collapse runs of three or more blank lines to exactly two.
fn cap_blank_runs(lines: Vec<Line>) -> Vec<Line> {
    let mut out: Vec<Line> = Vec::with_capacity(lines.len());
    let mut run = 0usize;

    for line in lines {
        if line.kind == LineKind::Blank {
            run += 1;
            if run > 2 {
                continue;
            }
        } else {
            run = 0;
        }
        out.push(line);
    }

    out
}

/// Join lines, trim the whole text, terminate with one trailing newline.
fn render(lines: &[Line]) -> String {
    let text = lines
        .iter()
        .map(|l| l.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    format!("{}\n", text.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_input_passes_through() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \n  "), "   \n  ");
    }

    #[test]
    fn test_inline_h3_split_prefers_the() {
        assert_eq!(
            normalize("### Programme overview The MSc is great"),
            "### Programme overview\n\nThe MSc is great\n"
        );
    }

    #[test]
    fn test_inline_h3_split_falls_back_to_three_words() {
        assert_eq!(
            normalize("### Admissions timeline details explained for applicants"),
            "### Admissions timeline details\n\nexplained for applicants\n"
        );
    }

    #[test]
    fn test_short_h3_heading_kept() {
        assert_eq!(normalize("### Fees and funding"), "### Fees and funding\n");
    }

    #[test]
    fn test_heading_rejoin() {
        assert_eq!(
            normalize("### Why the EDI\nprogramme?"),
            "### Why the EDI programme?\n"
        );
    }

    #[test]
    fn test_heading_rejoin_across_blank_lines() {
        assert_eq!(
            normalize("### Admissions\n\n\ntimeline overview\n\nRest of the paragraph."),
            "### Admissions timeline overview\n\nRest of the paragraph.\n"
        );
    }

    #[test]
    fn test_heading_not_rejoined_with_sentence() {
        assert_eq!(
            normalize("### Deadlines\nApplications close in February."),
            "### Deadlines\n\nApplications close in February.\n"
        );
    }

    #[test]
    fn test_paragraph_reflow() {
        assert_eq!(
            normalize("The programme combines\nengineering and design\nin one curriculum."),
            "The programme combines engineering and design in one curriculum.\n"
        );
    }

    #[test]
    fn test_reflow_stops_at_bullets() {
        assert_eq!(
            normalize("Intro line.\n\n- first item\n- second item\n\nClosing line."),
            "Intro line.\n\n- first item\n- second item\n\nClosing line.\n"
        );
    }

    #[test]
    fn test_blank_before_lowercase_continuation_removed() {
        assert_eq!(
            normalize("The deadline falls\n\nin early February."),
            "The deadline falls in early February.\n"
        );
    }

    #[test]
    fn test_blank_after_connective_removed() {
        assert_eq!(
            normalize("The fee must be paid in\n\nSeptember each year."),
            "The fee must be paid in September each year.\n"
        );
    }

    #[test]
    fn test_real_paragraph_break_kept() {
        assert_eq!(
            normalize("First paragraph ends here.\n\nSecond paragraph starts here."),
            "First paragraph ends here.\n\nSecond paragraph starts here.\n"
        );
    }

    #[test]
    fn test_numeric_fragment_rejoined() {
        assert_eq!(
            normalize("The programme admits\n\n40 students\n\neach academic year."),
            "The programme admits 40 students each academic year.\n"
        );
    }

    #[test]
    fn test_numeric_range_fragment_rejoined() {
        assert_eq!(
            normalize("The course runs for\n\n12 and 24 months\n\ndepending on the track."),
            "The course runs for 12 and 24 months depending on the track.\n"
        );
    }

    #[test]
    fn test_bullet_tightening() {
        assert_eq!(
            normalize("- first item\n\n- second item"),
            "- first item\n- second item\n"
        );
    }

    #[test]
    fn test_heading_spacing_inserted() {
        assert_eq!(
            normalize("### Overview\nBody text follows here."),
            "### Overview\n\nBody text follows here.\n"
        );
    }

    #[test]
    fn test_heading_spacing_collapsed_to_one() {
        assert_eq!(
            normalize("### Overview\n\n\n\nBody text follows here."),
            "### Overview\n\nBody text follows here.\n"
        );
    }

    #[test]
    fn test_list_block_spacing_inserted() {
        assert_eq!(
            normalize("Intro line.\n- first item\n- second item\nClosing line."),
            "Intro line.\n\n- first item\n- second item\n\nClosing line.\n"
        );
    }

    #[test]
    fn test_blank_run_capped_at_two() {
        assert_eq!(
            normalize("Para one.\n\n\n\n\n\nPara two."),
            "Para one.\n\n\nPara two.\n"
        );
    }

    #[test]
    fn test_fence_interior_untouched() {
        let input =
            "Intro text here.\n\n```\nfn main()  {\n\n\n\n    println!(\"hi\");\n}\n```\n\nAfter text.";
        let output = normalize(input);
        // Interior bytes, including the blank-line run and double space,
        // survive exactly.
        assert!(output.contains("fn main()  {\n\n\n\n    println!(\"hi\");\n}"));
        assert!(output.starts_with("Intro text here.\n"));
        assert!(output.ends_with("After text.\n"));
    }

    #[test]
    fn test_fenced_lines_not_reflowed() {
        let input = "```\nline one\nline two\n```";
        assert_eq!(normalize(input), "```\nline one\nline two\n```\n");
    }

    #[test]
    fn test_idempotence() {
        let messy = "### Programme overview The MSc combines engineering and design\nSome wrapped\ntext lines here.\n\n\n\n- one item\n\n- two item\nTail text after the list.";
        let once = normalize(messy);
        let twice = normalize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_idempotence_with_fences() {
        let messy = "Intro line.\n\n```\ncode  here\n\nmore code\n```\nAfter the fence.";
        let once = normalize(messy);
        let twice = normalize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_trailing_newline_exact() {
        let output = normalize("A single line.");
        assert_eq!(output, "A single line.\n");
    }
}

// =============================================================================
// MARKDOWN PARSER
// =============================================================================
//
// Turns raw Markdown into the block/inline model. The supported vocabulary is
// deliberately small:
//
// - `#`, `##`, `###` headings
// - `-`, `*`, `+` and `1.` list items (flat, no nesting)
// - paragraphs (consecutive lines are joined with a single space)
// - `***bold italic***`, `**bold**` / `__bold__`, `*italic*` / `_italic_`
//
// Anything else is kept as literal text. Parsing never fails: every input
// string maps to some (possibly empty) block sequence.

use std::ops::Range;

use super::markdown_models::{Block, BlockKind, InlineRun};

/// Parses Markdown into an ordered block sequence.
pub fn parse(markdown: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();

    for raw_line in markdown.split('\n') {
        let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);

        if line.trim().is_empty() {
            flush_paragraph(&mut paragraph, &mut blocks);
            continue;
        }

        match split_marker(line.trim_start()) {
            Some((kind, content)) => {
                flush_paragraph(&mut paragraph, &mut blocks);
                let runs = parse_inline(content);
                // A bare marker ("- ", "# ") carries no text and yields no block.
                if !runs.is_empty() {
                    blocks.push(Block::new(kind, runs));
                }
            }
            None => paragraph.push(line.trim()),
        }
    }

    flush_paragraph(&mut paragraph, &mut blocks);
    blocks
}

fn flush_paragraph(lines: &mut Vec<&str>, blocks: &mut Vec<Block>) {
    if lines.is_empty() {
        return;
    }
    let runs = parse_inline(&lines.join(" "));
    lines.clear();
    if !runs.is_empty() {
        blocks.push(Block::new(BlockKind::Paragraph, runs));
    }
}

/// Recognises a heading or list marker at the start of a line. Returns the
/// block kind and the content with the marker and surrounding whitespace removed.
fn split_marker(line: &str) -> Option<(BlockKind, &str)> {
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if hashes > 0 {
        let rest = &line[hashes..];
        return match BlockKind::heading(hashes) {
            Some(kind) if starts_with_whitespace(rest) => Some((kind, rest.trim())),
            _ => None,
        };
    }

    let marker_len = if line.starts_with(&['-', '*', '+'][..]) {
        1
    } else {
        let digits = line.bytes().take_while(|b| b.is_ascii_digit()).count();
        if digits == 0 || !line[digits..].starts_with('.') {
            return None;
        }
        digits + 1
    };

    let rest = &line[marker_len..];
    if starts_with_whitespace(rest) {
        Some((BlockKind::BulletItem, rest.trim()))
    } else {
        None
    }
}

fn starts_with_whitespace(text: &str) -> bool {
    text.chars().next().is_some_and(char::is_whitespace)
}

// =============================================================================
// INLINE PARSING
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Text(String),
    Delim { ch: char, len: usize },
}

/// Parses the inline styling of a single block's content.
pub fn parse_inline(content: &str) -> Vec<InlineRun> {
    let tokens = tokenize(content);
    let closers = Closers::index(&tokens);
    let mut runs = Vec::new();
    emit_runs(&tokens, &closers, 0..tokens.len(), false, false, &mut runs);
    runs
}

fn tokenize(content: &str) -> Vec<Token> {
    let chars: Vec<char> = content.chars().collect();
    let mut tokens = Vec::new();
    let mut text = String::new();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];

        if ch == '\\' && chars.get(i + 1).is_some_and(|c| c.is_ascii_punctuation()) {
            text.push(chars[i + 1]);
            i += 2;
            continue;
        }

        if ch == '*' || ch == '_' {
            let len = chars[i..].iter().take_while(|c| **c == ch).count();
            let before = i.checked_sub(1).map(|p| chars[p]);
            let after = chars.get(i + len).copied();
            let intraword = ch == '_'
                && before.is_some_and(char::is_alphanumeric)
                && after.is_some_and(char::is_alphanumeric);

            if len <= 3 && !intraword {
                if !text.is_empty() {
                    tokens.push(Token::Text(std::mem::take(&mut text)));
                }
                tokens.push(Token::Delim { ch, len });
            } else {
                text.extend(std::iter::repeat(ch).take(len));
            }
            i += len;
            continue;
        }

        text.push(ch);
        i += 1;
    }

    if !text.is_empty() {
        tokens.push(Token::Text(text));
    }
    tokens
}

/// `*` and `_` runs of length 1 to 3.
const DELIMITER_KINDS: usize = 6;

fn delimiter_kind(ch: char, len: usize) -> usize {
    let base = if ch == '*' { 0 } else { 3 };
    base + len.clamp(1, 3) - 1
}

/// For every token position, the next delimiter of each kind that may close a
/// pair (one not preceded by whitespace). Built once per block so matching an
/// opener never rescans the rest of the line.
struct Closers {
    next: Vec<[usize; DELIMITER_KINDS]>,
}

impl Closers {
    fn index(tokens: &[Token]) -> Self {
        let mut next = vec![[usize::MAX; DELIMITER_KINDS]; tokens.len() + 1];
        for j in (0..tokens.len()).rev() {
            next[j] = next[j + 1];
            if let Token::Delim { ch, len } = &tokens[j] {
                let after_space = j > 0
                    && matches!(&tokens[j - 1], Token::Text(prev) if prev.ends_with(char::is_whitespace));
                if !after_space {
                    next[j][delimiter_kind(*ch, *len)] = j;
                }
            }
        }
        Self { next }
    }

    /// First closing candidate of `kind` in `from..end`.
    fn find(&self, kind: usize, from: usize, end: usize) -> Option<usize> {
        self.next
            .get(from)
            .map(|row| row[kind])
            .filter(|&j| j < end)
    }
}

fn emit_runs(
    tokens: &[Token],
    closers: &Closers,
    span: Range<usize>,
    bold: bool,
    italic: bool,
    runs: &mut Vec<InlineRun>,
) {
    let mut i = span.start;
    while i < span.end {
        match &tokens[i] {
            Token::Text(text) => push_run(runs, text, bold, italic),
            Token::Delim { ch, len } => {
                if let Some(close) = find_closer(tokens, closers, i, span.end) {
                    let (b, it) = delimiter_style(*len);
                    emit_runs(tokens, closers, i + 1..close, bold || b, italic || it, runs);
                    i = close + 1;
                    continue;
                }
                // Unmatched delimiters stay as literal text.
                let literal: String = std::iter::repeat(*ch).take(*len).collect();
                push_run(runs, &literal, bold, italic);
            }
        }
        i += 1;
    }
}

/// Finds the delimiter that closes the opener at `open` before `end`: the next
/// run of the same character and length that is not preceded by whitespace.
fn find_closer(tokens: &[Token], closers: &Closers, open: usize, end: usize) -> Option<usize> {
    let Token::Delim { ch, len } = &tokens[open] else {
        return None;
    };

    match tokens[open + 1..end].first() {
        None => return None,
        Some(Token::Text(next)) if next.starts_with(char::is_whitespace) => return None,
        _ => {}
    }

    closers.find(delimiter_kind(*ch, *len), open + 2, end)
}

fn delimiter_style(len: usize) -> (bool, bool) {
    match len {
        1 => (false, true),
        2 => (true, false),
        _ => (true, true),
    }
}

/// Appends text to the run list, merging with the previous run when the
/// styling is identical.
fn push_run(runs: &mut Vec<InlineRun>, text: &str, bold: bool, italic: bool) {
    if text.is_empty() {
        return;
    }
    match runs.last_mut() {
        Some(last) if last.bold == bold && last.italic == italic => last.text.push_str(text),
        _ => runs.push(InlineRun::styled(text, bold, italic)),
    }
}

// =============================================================================
// RENDERING
// =============================================================================

/// Renders blocks back to Markdown in the supported vocabulary. Literal
/// delimiter characters are escaped so the output parses back to the same blocks.
pub fn render_markdown(blocks: &[Block]) -> String {
    let mut output = String::new();
    let mut previous: Option<BlockKind> = None;

    for block in blocks {
        if let Some(prev) = previous {
            // Keep consecutive list items together.
            if prev == BlockKind::BulletItem && block.kind == BlockKind::BulletItem {
                output.push('\n');
            } else {
                output.push_str("\n\n");
            }
        }

        let marker = match block.kind {
            BlockKind::Heading1 => "# ",
            BlockKind::Heading2 => "## ",
            BlockKind::Heading3 => "### ",
            BlockKind::BulletItem => "- ",
            BlockKind::Paragraph => "",
        };
        output.push_str(marker);

        let body = render_runs(&block.runs);
        if block.kind == BlockKind::Paragraph && split_marker(&body).is_some() {
            output.push_str(&escape_leading_marker(&body));
        } else {
            output.push_str(&body);
        }

        previous = Some(block.kind);
    }

    output
}

/// One piece of a rendered block body. Delimiter characters are picked once
/// the whole body is laid out.
#[derive(Debug)]
enum Piece {
    Text(String),
    Open { pair: usize, len: usize },
    Close { pair: usize, len: usize },
}

const DELIMITER_CHARS: [char; 2] = ['*', '_'];

fn render_runs(runs: &[InlineRun]) -> String {
    let mut pieces = Vec::new();
    let mut pairs = 0;
    layout_runs(runs, false, false, &mut pieces, &mut pairs);
    let chars = assign_delimiters(&pieces, pairs);

    let mut output = String::new();
    for piece in &pieces {
        match piece {
            Piece::Text(text) => output.push_str(text),
            Piece::Open { pair, len } | Piece::Close { pair, len } => {
                output.extend(std::iter::repeat(chars[*pair]).take(*len));
            }
        }
    }
    output
}

/// Lays out runs that all carry at least the enclosing `bold`/`italic` style.
/// Each maximal stretch of runs that adds a style becomes one delimiter pair,
/// so `**bold *both* bold**` keeps its shape instead of splitting into
/// separately wrapped runs.
fn layout_runs(
    runs: &[InlineRun],
    bold: bool,
    italic: bool,
    pieces: &mut Vec<Piece>,
    pairs: &mut usize,
) {
    let mut i = 0;
    while i < runs.len() {
        let run = &runs[i];
        let adds_bold = run.bold && !bold;
        let adds_italic = run.italic && !italic;

        if !adds_bold && !adds_italic {
            pieces.push(Piece::Text(escape_inline(&run.text)));
            i += 1;
            continue;
        }

        let bold_end = if adds_bold { stretch_end(runs, i, |r| r.bold) } else { i };
        let italic_end = if adds_italic { stretch_end(runs, i, |r| r.italic) } else { i };

        // The longer stretch becomes the outer pair.
        let (end, len, inner_bold, inner_italic) = if bold_end == italic_end {
            (bold_end, 3, true, true)
        } else if bold_end > italic_end {
            (bold_end, 2, true, italic)
        } else {
            (italic_end, 1, bold, true)
        };

        let pair = *pairs;
        *pairs += 1;
        pieces.push(Piece::Open { pair, len });
        layout_runs(&runs[i..end], inner_bold, inner_italic, pieces, pairs);
        pieces.push(Piece::Close { pair, len });
        i = end;
    }
}

fn stretch_end(runs: &[InlineRun], from: usize, styled: impl Fn(&InlineRun) -> bool) -> usize {
    runs[from..]
        .iter()
        .position(|run| !styled(run))
        .map_or(runs.len(), |offset| from + offset)
}

/// Picks `*` or `_` for every pair. Two touching delimiters must differ or
/// they read back as one longer run, and `_` must not sit inside a word.
/// Falls back to `*` everywhere if the search runs out of steps.
fn assign_delimiters(pieces: &[Piece], pairs: usize) -> Vec<char> {
    let mut positions = vec![(0, 0); pairs];
    for (index, piece) in pieces.iter().enumerate() {
        match piece {
            Piece::Open { pair, .. } => positions[*pair].0 = index,
            Piece::Close { pair, .. } => positions[*pair].1 = index,
            Piece::Text(_) => {}
        }
    }

    let mut chars: Vec<Option<char>> = vec![None; pairs];
    let mut tried = vec![0; pairs];
    let mut budget = pairs.saturating_mul(16).max(256);
    let mut k = 0;

    while k < pairs {
        if budget == 0 {
            return vec!['*'; pairs];
        }
        budget -= 1;

        let (open, close) = positions[k];
        let mut placed = false;
        while tried[k] < DELIMITER_CHARS.len() {
            let ch = DELIMITER_CHARS[tried[k]];
            tried[k] += 1;
            if fits(pieces, &chars, open, ch) && fits(pieces, &chars, close, ch) {
                chars[k] = Some(ch);
                placed = true;
                break;
            }
        }

        if placed {
            k += 1;
            continue;
        }
        if k == 0 {
            return vec!['*'; pairs];
        }
        tried[k] = 0;
        k -= 1;
        chars[k] = None;
    }

    chars.into_iter().map(|ch| ch.unwrap_or('*')).collect()
}

fn fits(pieces: &[Piece], chars: &[Option<char>], position: usize, ch: char) -> bool {
    let before = position.checked_sub(1).and_then(|p| pieces.get(p));
    let after = pieces.get(position + 1);

    let touches_same = [before, after]
        .into_iter()
        .flatten()
        .any(|piece| delimiter_char(piece, chars) == Some(ch));
    if touches_same {
        return false;
    }

    if ch == '_' {
        let word_before = before
            .and_then(|piece| text_edge(piece, true))
            .is_some_and(char::is_alphanumeric);
        let word_after = after
            .and_then(|piece| text_edge(piece, false))
            .is_some_and(char::is_alphanumeric);
        return !(word_before && word_after);
    }
    true
}

fn delimiter_char(piece: &Piece, chars: &[Option<char>]) -> Option<char> {
    match piece {
        Piece::Open { pair, .. } | Piece::Close { pair, .. } => chars[*pair],
        Piece::Text(_) => None,
    }
}

fn text_edge(piece: &Piece, last: bool) -> Option<char> {
    match piece {
        Piece::Text(text) if last => text.chars().next_back(),
        Piece::Text(text) => text.chars().next(),
        _ => None,
    }
}

fn escape_inline(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '*' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Escapes a paragraph that would otherwise be read back as a heading or list item.
fn escape_leading_marker(body: &str) -> String {
    let digits = body.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits > 0 {
        format!("{}\\{}", &body[..digits], &body[digits..])
    } else {
        format!("\\{}", body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &str) -> InlineRun {
        InlineRun::plain(text)
    }

    #[test]
    fn test_empty_input_has_no_blocks() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n   \n").is_empty());
    }

    #[test]
    fn test_heading_levels() {
        let blocks = parse("# One\n## Two\n### Three");
        let kinds: Vec<BlockKind> = blocks.iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            vec![BlockKind::Heading1, BlockKind::Heading2, BlockKind::Heading3]
        );
        assert_eq!(blocks[0].text(), "One");
        assert_eq!(blocks[2].text(), "Three");
    }

    #[test]
    fn test_deep_heading_falls_back_to_paragraph() {
        let blocks = parse("#### Four");
        assert_eq!(blocks, vec![Block::new(BlockKind::Paragraph, vec![plain("#### Four")])]);
    }

    #[test]
    fn test_heading_requires_whitespace_after_marker() {
        let blocks = parse("#hashtag");
        assert_eq!(blocks[0].kind, BlockKind::Paragraph);
        assert_eq!(blocks[0].text(), "#hashtag");
    }

    #[test]
    fn test_list_markers() {
        let blocks = parse("- dash\n* star\n+ plus\n12. numbered\n  - indented");
        assert_eq!(blocks.len(), 5);
        assert!(blocks.iter().all(|b| b.kind == BlockKind::BulletItem));
        let texts: Vec<String> = blocks.iter().map(Block::text).collect();
        assert_eq!(texts, vec!["dash", "star", "plus", "numbered", "indented"]);
    }

    #[test]
    fn test_bare_markers_produce_no_block() {
        assert!(parse("- \n#  \n1. ").is_empty());
    }

    #[test]
    fn test_paragraph_lines_are_coalesced() {
        let blocks = parse("first line\n  second line  \n\nnext paragraph");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].text(), "first line second line");
        assert_eq!(blocks[1].text(), "next paragraph");
    }

    #[test]
    fn test_heading_interrupts_paragraph() {
        let blocks = parse("intro\n# Title\nbody");
        let kinds: Vec<BlockKind> = blocks.iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            vec![BlockKind::Paragraph, BlockKind::Heading1, BlockKind::Paragraph]
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        let blocks = parse("# Title\r\n\r\nbody\r\n");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].text(), "Title");
        assert_eq!(blocks[1].text(), "body");
    }

    #[test]
    fn test_inline_styles() {
        let runs = parse_inline("a **b** *c* ***d*** __e__ _f_");
        assert_eq!(
            runs,
            vec![
                plain("a "),
                InlineRun::styled("b", true, false),
                plain(" "),
                InlineRun::styled("c", false, true),
                plain(" "),
                InlineRun::styled("d", true, true),
                plain(" "),
                InlineRun::styled("e", true, false),
                plain(" "),
                InlineRun::styled("f", false, true),
            ]
        );
    }

    #[test]
    fn test_nested_emphasis() {
        let runs = parse_inline("**bold *both* bold**");
        assert_eq!(
            runs,
            vec![
                InlineRun::styled("bold ", true, false),
                InlineRun::styled("both", true, true),
                InlineRun::styled(" bold", true, false),
            ]
        );
    }

    #[test]
    fn test_unterminated_bold_is_literal() {
        assert_eq!(parse_inline("**oops"), vec![plain("**oops")]);
        assert_eq!(parse_inline("*oops"), vec![plain("*oops")]);
        assert_eq!(parse_inline("**a*"), vec![plain("**a*")]);
    }

    #[test]
    fn test_spaced_delimiters_are_literal() {
        assert_eq!(parse_inline("2 * 3 * 4"), vec![plain("2 * 3 * 4")]);
    }

    #[test]
    fn test_intraword_underscores_are_literal() {
        assert_eq!(parse_inline("snake_case_name"), vec![plain("snake_case_name")]);
    }

    #[test]
    fn test_escaped_delimiters() {
        assert_eq!(parse_inline(r"\*not italic\*"), vec![plain("*not italic*")]);
    }

    #[test]
    fn test_runs_concatenate_to_block_text() {
        let blocks = parse("Some **bold** and *italic* text.");
        assert_eq!(blocks[0].text(), "Some bold and italic text.");
        assert!(blocks[0].runs.iter().all(|r| !r.text.is_empty() && !r.text.contains('\n')));
    }

    #[test]
    fn test_render_then_parse_round_trips() {
        let sources = [
            "# Title\n\nSome **bold** text.",
            "## Sub *heading*\n\n- item **one**\n- item *two*\n\nclosing ***note***",
            "### Deep\n\nplain paragraph\nspanning lines",
            "**oops",
            "1. not numbered here\n\n#### literal heading",
            "snake_case and 2 * 3",
            "**bold *both* bold**",
            "*a **b** c*",
            "_**x**y_",
            "__a__*b*c",
            "***all*** of **it** and *this*",
            "- **lead *mid***tail",
        ];

        for source in sources {
            let blocks = parse(source);
            let rendered = render_markdown(&blocks);
            assert_eq!(parse(&rendered), blocks, "round trip failed for {:?}", source);
        }
    }

    #[test]
    fn test_render_escapes_marker_like_paragraphs() {
        let blocks = vec![
            Block::new(BlockKind::Paragraph, vec![plain("# not a heading")]),
            Block::new(BlockKind::Paragraph, vec![plain("3. not a list")]),
        ];
        let rendered = render_markdown(&blocks);
        assert_eq!(parse(&rendered), blocks);
    }

    #[test]
    fn test_render_keeps_nested_emphasis_grouped() {
        let blocks = parse("**bold *both* bold**\n\n*a **b** c*");
        assert_eq!(render_markdown(&blocks), "**bold *both* bold**\n\n*a **b** c*");
    }

    #[test]
    fn test_render_separates_touching_delimiters() {
        // Bold then italic with nothing between them.
        let runs = vec![
            InlineRun::styled("a", true, false),
            InlineRun::styled("b", false, true),
        ];
        let blocks = vec![Block::new(BlockKind::Paragraph, runs)];
        let rendered = render_markdown(&blocks);

        assert!(!rendered.contains("***"), "delimiters fused in {:?}", rendered);
        assert_eq!(parse(&rendered), blocks);
    }

    #[test]
    fn test_render_avoids_intraword_underscores() {
        // Italic group ending right before a word character must not use `_`.
        let runs = vec![
            InlineRun::styled("x", true, true),
            InlineRun::styled("y", false, true),
            plain(" z"),
        ];
        let blocks = vec![Block::new(BlockKind::Paragraph, runs)];
        assert_eq!(parse(&render_markdown(&blocks)), blocks);
    }

    #[test]
    fn test_unmatched_openers_on_a_long_line() {
        let line = "*a ".repeat(20_000);
        let runs = parse_inline(line.trim_end());
        assert_eq!(runs, vec![plain(line.trim_end())]);
    }
}

use crate::{
    formula::Formula,
    parse::{LoadError, LoadErrorKind},
    proof::Annotation,
    strings,
};
use aho_corasick::AhoCorasick;
use itertools::Itertools;
use line_span::LineSpanExt;
use std::{ops::Range, sync::LazyLock};
use tracing::trace;

static RULE_KEYWORDS: LazyLock<AhoCorasick> = LazyLock::new(|| {
    let patterns = [
        &strings::AND,
        &strings::OR,
        &strings::IMP,
        &strings::IFF,
        &strings::NOT,
        &strings::BOT,
        &strings::REPEAT,
        &strings::LEM,
        &strings::HYP,
    ]
    .map(|kw| format!("{}{}", strings::ANNOTATION_MARK, kw.as_str()));

    AhoCorasick::new(patterns).expect("rule keyword patterns are plain strings")
});

/// One non-structural line of proof text with its indentation resolved.
#[derive(Debug)]
pub(super) struct SourceLine {
    /// 1-based line in the input.
    pub number: usize,
    /// Byte range of the content after indentation and line number.
    pub span: Range<usize>,
    pub level: usize,
    pub kind: LineKind,
}

#[derive(Debug)]
pub(super) enum LineKind {
    Turnstile,
    Comment(String),
    Blank,
    Formula {
        formula: Formula,
        annotation: Annotation,
    },
}

impl LineKind {
    pub fn is_hypothesis(&self) -> bool {
        matches!(self, LineKind::Formula { annotation, .. } if annotation.is_hyp())
    }

    /// A formula that is not a hypothesis.
    pub fn is_claim(&self) -> bool {
        matches!(self, LineKind::Formula { annotation, .. } if !annotation.is_hyp())
    }
}

pub(super) fn read_lines(text: &str, tab_size: usize) -> Result<Vec<SourceLine>, LoadError> {
    let spans = text.line_spans().collect_vec();
    let is_blank = |s: &str| s.trim().is_empty();

    let Some(first) = spans.iter().position(|s| !is_blank(s.as_str())) else {
        return Err(LoadError::new(LoadErrorKind::Empty, 1, 0..0));
    };
    let last = spans
        .iter()
        .rposition(|s| !is_blank(s.as_str()))
        .unwrap_or(first);

    let head = spans[first].as_str().trim_start();
    let bars =
        head.starts_with(strings::VERT) || head.starts_with(strings::BAR_TURNSTILE.as_str());
    trace!(bars, first, last, "reading proof lines");

    spans[first..=last]
        .iter()
        .enumerate()
        .map(|(i, span)| read_line(first + i + 1, span.as_str(), span.start(), bars, tab_size))
        .collect()
}

fn read_line(
    number: usize,
    raw: &str,
    offset: usize,
    bars: bool,
    tab_size: usize,
) -> Result<SourceLine, LoadError> {
    let raw = raw.trim_end();
    let (level, indent_len) = indentation(raw, bars, tab_size);
    let content_start = indent_len + line_number_len(&raw[indent_len..]);
    let content = &raw[content_start..];
    let span = offset + content_start..offset + raw.len();

    let kind = if content.starts_with(strings::PROVES.as_str())
        || content.starts_with(strings::BAR_TURNSTILE.as_str())
    {
        LineKind::Turnstile
    } else if content.starts_with(strings::COMMENT) {
        LineKind::Comment(content.to_string())
    } else if content.is_empty() {
        LineKind::Blank
    } else {
        let Some((formula_text, annotation_text)) = split_annotation(content) else {
            return Err(LoadError::new(LoadErrorKind::MissingAnnotation, number, span));
        };

        let formula = Formula::parse(formula_text).map_err(|e| {
            let at = (span.start + e.pos()).min(span.end.saturating_sub(1));
            LoadError::new(LoadErrorKind::Formula(e), number, at..at + 1)
        })?;

        LineKind::Formula {
            formula,
            annotation: Annotation::parse(annotation_text),
        }
    };

    Ok(SourceLine {
        number,
        span,
        level,
        kind,
    })
}

/// Nesting level and the byte length of the indentation.
fn indentation(line: &str, bars: bool, tab_size: usize) -> (usize, usize) {
    if bars {
        let count = line.chars().take_while(|&c| c == strings::VERT).count();
        return (count.max(1), count * strings::VERT.len_utf8());
    }

    let tab = " ".repeat(tab_size);
    let mut level = 1;
    let mut rest = line;
    loop {
        if let Some(r) = rest.strip_prefix('\t') {
            rest = r;
        } else if let Some(r) = rest.strip_prefix(tab.as_str()) {
            rest = r;
        } else {
            break;
        }
        level += 1;
    }

    (level, line.len() - rest.len())
}

/// Length of a leading `N.` line number and the whitespace around it.
fn line_number_len(text: &str) -> usize {
    let trimmed = text.trim_start();
    let leading = text.len() - trimmed.len();
    let digits = trimmed.bytes().take_while(u8::is_ascii_digit).count();

    match trimmed[digits..].strip_prefix(strings::ANNOTATION_MARK) {
        Some(after) if digits > 0 => {
            let after_len = after.len() - after.trim_start().len();
            leading + digits + 1 + after_len
        }
        _ => leading,
    }
}

/// Splits `formula .annotation` at the first rule keyword, or failing that at the first `.`.
fn split_annotation(content: &str) -> Option<(&str, &str)> {
    let at_keyword = RULE_KEYWORDS.find_iter(content).find(|m| {
        let before = content[..m.start()].chars().next_back();
        let after = content[m.end()..].chars().next();
        before.is_none_or(char::is_whitespace) && after.is_none_or(char::is_whitespace)
    });

    let mark = match at_keyword {
        Some(m) => m.start(),
        None => content.find(strings::ANNOTATION_MARK)?,
    };

    Some((&content[..mark], &content[mark + 1..]))
}

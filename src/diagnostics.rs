use crate::parse::{LoadError, LoadErrorKind};
use annotate_snippets::{Level, Message, Renderer, Snippet};
use std::ops::Range;

/// An error about a proof file, rendered as an annotated source snippet.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    title: String,
    parts: Vec<DiagnosticPart>,
    help: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum DiagnosticPart {
    Error(String, Range<usize>),
}

impl Diagnostic {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            parts: Vec::new(),
            help: Vec::new(),
        }
    }

    pub fn with_error(mut self, msg: &str, span: Range<usize>) -> Self {
        self.parts.push(DiagnosticPart::Error(msg.to_string(), span));
        self
    }

    pub fn with_help(mut self, msg: &str) -> Self {
        self.help.push(msg.to_string());
        self
    }

    pub fn to_message<'a>(&'a self, source: &'a str, path: &'a str) -> Message<'a> {
        let mut msg = Level::Error.title(&self.title);

        if !self.parts.is_empty() {
            let mut snippet = Snippet::source(source).origin(path).fold(true);
            for part in &self.parts {
                snippet = match part {
                    DiagnosticPart::Error(m, span) => {
                        snippet.annotation(Level::Error.span(clamp(span, source)).label(m))
                    }
                };
            }
            msg = msg.snippet(snippet);
        }

        for help in &self.help {
            msg = msg.footer(Level::Help.title(help));
        }

        msg
    }

    pub fn render(&self, source: &str, path: &str) -> String {
        Renderer::styled()
            .render(self.to_message(source, path))
            .to_string()
    }

    pub fn render_plain(&self, source: &str, path: &str) -> String {
        Renderer::plain()
            .render(self.to_message(source, path))
            .to_string()
    }

    pub fn print(&self, source: &str, path: &str) {
        println!();
        println!("{}", self.render(source, path));
    }
}

fn clamp(span: &Range<usize>, source: &str) -> Range<usize> {
    let end = span.end.min(source.len());
    span.start.min(end)..end
}

impl Diagnostic {
    pub fn err_load(err: &LoadError) -> Self {
        let diag = Diagnostic::new("cannot load proof").with_error(&err.kind().to_string(), err.span());

        match err.kind() {
            LoadErrorKind::MissingAnnotation => {
                diag.with_help("write `.` after the formula, followed by its justification")
            }
            LoadErrorKind::MissingConclusion => {
                diag.with_help("a subproof needs at least one line after its hypothesis")
            }
            LoadErrorKind::OpenWithoutHypothesis => {
                diag.with_help("indent a line annotated `.hyp` to open a subproof")
            }
            _ => diag,
        }
    }
}

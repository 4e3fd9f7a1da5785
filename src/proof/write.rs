use crate::{
    proof::{NodeLabel, Proof, ProofNode, Zone},
    strings,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentStyle {
    /// This many spaces per nesting level.
    Spaces(usize),
    /// One `│` per level, `├─` as the turnstile.
    Bars,
}

impl Default for IndentStyle {
    fn default() -> Self {
        IndentStyle::Spaces(2)
    }
}

impl IndentStyle {
    fn indent(self, level: usize) -> String {
        match self {
            IndentStyle::Spaces(n) => " ".repeat(n * (level - 1)),
            IndentStyle::Bars => strings::VERT.to_string().repeat(level),
        }
    }

    fn turnstile(self, level: usize) -> String {
        match self {
            IndentStyle::Spaces(_) => format!("{}{}", self.indent(level), *strings::PROVES),
            IndentStyle::Bars => format!(
                "{}{}",
                strings::VERT.to_string().repeat(level - 1),
                *strings::BAR_TURNSTILE
            ),
        }
    }
}

impl Proof {
    /// Writes the proof back as numbered Fitch text that the loader reads back
    /// to the same tree.
    pub fn to_text(&self, style: IndentStyle) -> String {
        let mut writer = Writer {
            style,
            next_line: 1,
            out: String::new(),
        };
        writer.subproof(self.root(), 1);
        writer.out
    }
}

struct Writer {
    style: IndentStyle,
    next_line: usize,
    out: String,
}

impl Writer {
    fn subproof(&mut self, node: &ProofNode, level: usize) {
        let children = node.children();
        let hyp_len = children
            .iter()
            .take_while(|c| c.zone() == Zone::Hypothesis)
            .count();

        // Without a turnstile the loader would put a leading comment or blank
        // conclusion into the hypothesis zone.
        let needs_turnstile = level > 1
            || hyp_len > 0
            || children.get(hyp_len).is_some_and(|c| {
                matches!(c.label(), NodeLabel::Comment { .. } | NodeLabel::Blank { .. })
            });

        for (i, child) in children.iter().enumerate() {
            if i == hyp_len && needs_turnstile {
                self.push(self.style.turnstile(level));
            }
            if child.is_subproof() {
                self.subproof(child, level + 1);
            } else {
                self.line(child, level);
            }
        }

        if hyp_len == children.len() && needs_turnstile {
            self.push(self.style.turnstile(level));
        }
    }

    fn line(&mut self, node: &ProofNode, level: usize) {
        let content = match node.label() {
            NodeLabel::Hypothesis(line) => format!("{} .{}", line.formula(), line.annotation()),
            NodeLabel::Conclusion(line) => format!("{} .{}", line.formula(), line.annotation()),
            NodeLabel::Comment { text, .. } if text.starts_with(strings::COMMENT) => text.clone(),
            NodeLabel::Comment { text, .. } => format!("{} {text}", strings::COMMENT),
            NodeLabel::Blank { .. } | NodeLabel::Subproof => String::new(),
        };

        let number = self.next_line;
        self.next_line += 1;

        let indent = self.style.indent(level);
        if content.is_empty() {
            self.push(format!("{indent}{number}."));
        } else {
            self.push(format!("{indent}{number}. {content}"));
        }
    }

    fn push(&mut self, line: String) {
        self.out.push_str(&line);
        self.out.push('\n');
    }
}

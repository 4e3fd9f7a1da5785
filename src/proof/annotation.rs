use crate::{proof::LineRef, strings};
use itertools::Itertools;
use std::fmt;
use thiserror::Error;
use ustr::Ustr;

/// The natural-deduction rules a line can be justified by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    Hyp,
    Lem,
    Repeat,
    AndIntro,
    AndElim,
    OrIntro,
    OrElim,
    ImpIntro,
    ImpElim,
    IffIntro,
    IffElim,
    NotIntro,
    NotElim,
    BotIntro,
    BotElim,
}

/// What kind of line a rule's premises must cite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PremiseKind {
    Any,
    Line,
    Subproof,
}

impl Rule {
    /// The order in which the search engine tries rules. `hyp` is never searched for.
    pub const SEARCH_ORDER: [Rule; 14] = [
        Rule::Lem,
        Rule::Repeat,
        Rule::BotIntro,
        Rule::NotIntro,
        Rule::AndIntro,
        Rule::OrIntro,
        Rule::ImpIntro,
        Rule::IffIntro,
        Rule::BotElim,
        Rule::NotElim,
        Rule::AndElim,
        Rule::OrElim,
        Rule::ImpElim,
        Rule::IffElim,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Rule::Hyp => "hyp",
            Rule::Lem => "LEM",
            Rule::Repeat => "repeat",
            Rule::AndIntro => "and intro",
            Rule::AndElim => "and elim",
            Rule::OrIntro => "or intro",
            Rule::OrElim => "or elim",
            Rule::ImpIntro => "imp intro",
            Rule::ImpElim => "imp elim",
            Rule::IffIntro => "iff intro",
            Rule::IffElim => "iff elim",
            Rule::NotIntro => "not intro",
            Rule::NotElim => "not elim",
            Rule::BotIntro => "bot intro",
            Rule::BotElim => "bot elim",
        }
    }

    pub fn arity(self) -> usize {
        match self {
            Rule::Hyp | Rule::Lem => 0,
            Rule::Repeat
            | Rule::AndElim
            | Rule::OrIntro
            | Rule::ImpIntro
            | Rule::NotIntro
            | Rule::NotElim
            | Rule::BotElim => 1,
            Rule::AndIntro | Rule::ImpElim | Rule::IffIntro | Rule::IffElim | Rule::BotIntro => 2,
            Rule::OrElim => 3,
        }
    }

    pub fn premise_kind(self) -> PremiseKind {
        match self {
            Rule::Repeat => PremiseKind::Line,
            Rule::ImpIntro | Rule::NotIntro | Rule::NotElim => PremiseKind::Subproof,
            _ => PremiseKind::Any,
        }
    }

    fn from_words(words: &[&str]) -> Option<Rule> {
        let words = words.iter().map(|w| Ustr::from(*w)).collect_vec();

        match words.as_slice() {
            [w] if *w == *strings::HYP => Some(Rule::Hyp),
            [w] if *w == *strings::LEM => Some(Rule::Lem),
            [w] if *w == *strings::REPEAT => Some(Rule::Repeat),
            [conn, dir] => {
                let intro = if *dir == *strings::INTRO {
                    true
                } else if *dir == *strings::ELIM {
                    false
                } else {
                    return None;
                };

                let pair = if *conn == *strings::AND {
                    (Rule::AndIntro, Rule::AndElim)
                } else if *conn == *strings::OR {
                    (Rule::OrIntro, Rule::OrElim)
                } else if *conn == *strings::IMP {
                    (Rule::ImpIntro, Rule::ImpElim)
                } else if *conn == *strings::IFF {
                    (Rule::IffIntro, Rule::IffElim)
                } else if *conn == *strings::NOT {
                    (Rule::NotIntro, Rule::NotElim)
                } else if *conn == *strings::BOT {
                    (Rule::BotIntro, Rule::BotElim)
                } else {
                    return None;
                };

                Some(if intro { pair.0 } else { pair.1 })
            }
            _ => None,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotationError {
    #[error("unknown rule `{0}`")]
    UnknownRule(String),
    #[error("`{0}` is not a line number or a line range")]
    BadPremise(String),
    #[error("{rule} takes {expected} premise{}, found {found}", crate::util::plural(*.expected))]
    WrongArity {
        rule: Rule,
        expected: usize,
        found: usize,
    },
    #[error("{0} must cite a single line")]
    ExpectedLine(Rule),
    #[error("{0} must cite a subproof range")]
    ExpectedRange(Rule),
}

/// A rule together with the lines it cites.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Justification {
    rule: Rule,
    premises: Vec<LineRef>,
}

impl Justification {
    pub fn new(rule: Rule, premises: Vec<LineRef>) -> Self {
        Self { rule, premises }
    }

    pub fn hyp() -> Self {
        Self::new(Rule::Hyp, Vec::new())
    }

    pub fn rule(&self) -> Rule {
        self.rule
    }

    pub fn premises(&self) -> &[LineRef] {
        &self.premises
    }

    pub(crate) fn premises_mut(&mut self) -> &mut [LineRef] {
        &mut self.premises
    }

    /// Parses `<rule words> <premise>,<premise>,...`. The premise list starts at the first digit.
    pub fn parse(text: &str) -> Result<Self, AnnotationError> {
        let text = text.trim();
        let (words, premises) = match text.find(|c: char| c.is_ascii_digit()) {
            Some(i) => text.split_at(i),
            None => (text, ""),
        };

        let words = words.split_whitespace().collect_vec();
        let rule = Rule::from_words(&words)
            .ok_or_else(|| AnnotationError::UnknownRule(words.join(" ")))?;

        let premises = if premises.trim().is_empty() {
            Vec::new()
        } else {
            premises
                .split(',')
                .map(|p| {
                    p.parse::<LineRef>()
                        .map_err(|_| AnnotationError::BadPremise(p.trim().to_string()))
                })
                .collect::<Result<Vec<_>, _>>()?
        };

        if premises.len() != rule.arity() {
            return Err(AnnotationError::WrongArity {
                rule,
                expected: rule.arity(),
                found: premises.len(),
            });
        }

        match rule.premise_kind() {
            PremiseKind::Line if premises.iter().any(|p| p.is_range()) => {
                Err(AnnotationError::ExpectedLine(rule))
            }
            PremiseKind::Subproof if premises.iter().any(|p| !p.is_range()) => {
                Err(AnnotationError::ExpectedRange(rule))
            }
            _ => Ok(Self { rule, premises }),
        }
    }
}

impl fmt::Display for Justification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rule.name())?;
        if !self.premises.is_empty() {
            write!(f, " {}", self.premises.iter().join(","))?;
        }
        Ok(())
    }
}

/// The justification text written after a formula.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Annotation {
    /// A bare `.` with nothing after it.
    Empty,
    Justified(Justification),
    /// Text that did not parse; kept so it can be written back unchanged.
    Raw(String),
}

impl Annotation {
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            return Annotation::Empty;
        }

        match Justification::parse(text) {
            Ok(justification) => Annotation::Justified(justification),
            Err(_) => Annotation::Raw(text.to_string()),
        }
    }

    pub fn hyp() -> Self {
        Annotation::Justified(Justification::hyp())
    }

    pub fn justification(&self) -> Option<&Justification> {
        match self {
            Annotation::Justified(j) => Some(j),
            _ => None,
        }
    }

    pub(crate) fn justification_mut(&mut self) -> Option<&mut Justification> {
        match self {
            Annotation::Justified(j) => Some(j),
            _ => None,
        }
    }

    pub fn rule(&self) -> Option<Rule> {
        self.justification().map(Justification::rule)
    }

    pub fn is_hyp(&self) -> bool {
        self.rule() == Some(Rule::Hyp)
    }
}

impl From<Justification> for Annotation {
    fn from(justification: Justification) -> Self {
        Annotation::Justified(justification)
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Annotation::Empty => Ok(()),
            Annotation::Justified(j) => write!(f, "{j}"),
            Annotation::Raw(text) => f.write_str(text),
        }
    }
}

use std::fmt::{self, Display};
use ustr::Ustr;

mod parser;
mod stream;

pub use parser::{FormulaError, FormulaErrorKind};

/// A propositional formula. Equality is structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Formula {
    Bot,
    Atom(Ustr),
    Not(Box<Formula>),
    And(Box<Formula>, Box<Formula>),
    Or(Box<Formula>, Box<Formula>),
    Imp(Box<Formula>, Box<Formula>),
    Iff(Box<Formula>, Box<Formula>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connective {
    Bot,
    Not,
    And,
    Or,
    Imp,
    Iff,
}

impl Formula {
    pub fn parse(text: &str) -> Result<Self, FormulaError> {
        parser::parse_formula(text)
    }

    pub fn atom(name: &str) -> Self {
        Self::Atom(Ustr::from(name))
    }

    pub fn bot() -> Self {
        Self::Bot
    }

    pub fn not(inner: Formula) -> Self {
        Self::Not(Box::new(inner))
    }

    pub fn and(lhs: Formula, rhs: Formula) -> Self {
        Self::And(Box::new(lhs), Box::new(rhs))
    }

    pub fn or(lhs: Formula, rhs: Formula) -> Self {
        Self::Or(Box::new(lhs), Box::new(rhs))
    }

    pub fn imp(lhs: Formula, rhs: Formula) -> Self {
        Self::Imp(Box::new(lhs), Box::new(rhs))
    }

    pub fn iff(lhs: Formula, rhs: Formula) -> Self {
        Self::Iff(Box::new(lhs), Box::new(rhs))
    }

    /// `None` for atoms.
    pub fn principal_connective(&self) -> Option<Connective> {
        match self {
            Formula::Atom(_) => None,
            Formula::Bot => Some(Connective::Bot),
            Formula::Not(_) => Some(Connective::Not),
            Formula::And(_, _) => Some(Connective::And),
            Formula::Or(_, _) => Some(Connective::Or),
            Formula::Imp(_, _) => Some(Connective::Imp),
            Formula::Iff(_, _) => Some(Connective::Iff),
        }
    }

    pub fn children(&self) -> Vec<&Formula> {
        match self {
            Formula::Bot | Formula::Atom(_) => Vec::new(),
            Formula::Not(inner) => vec![&**inner],
            Formula::And(l, r) | Formula::Or(l, r) | Formula::Imp(l, r) | Formula::Iff(l, r) => {
                vec![&**l, &**r]
            }
        }
    }

    pub fn is_bot(&self) -> bool {
        matches!(self, Formula::Bot)
    }

    pub fn as_not(&self) -> Option<&Formula> {
        match self {
            Formula::Not(inner) => Some(&**inner),
            _ => None,
        }
    }

    pub fn as_and(&self) -> Option<(&Formula, &Formula)> {
        match self {
            Formula::And(l, r) => Some((&**l, &**r)),
            _ => None,
        }
    }

    pub fn as_or(&self) -> Option<(&Formula, &Formula)> {
        match self {
            Formula::Or(l, r) => Some((&**l, &**r)),
            _ => None,
        }
    }

    pub fn as_imp(&self) -> Option<(&Formula, &Formula)> {
        match self {
            Formula::Imp(l, r) => Some((&**l, &**r)),
            _ => None,
        }
    }

    pub fn as_iff(&self) -> Option<(&Formula, &Formula)> {
        match self {
            Formula::Iff(l, r) => Some((&**l, &**r)),
            _ => None,
        }
    }

    /// Is `self` exactly `not other`?
    pub fn is_negation_of(&self, other: &Formula) -> bool {
        self.as_not().is_some_and(|inner| inner == other)
    }

    pub fn to_text(&self) -> String {
        self.to_string()
    }

    fn precedence(&self) -> u8 {
        match self {
            Formula::Imp(_, _) | Formula::Iff(_, _) => 1,
            Formula::And(_, _) | Formula::Or(_, _) => 2,
            Formula::Not(_) => 3,
            Formula::Bot | Formula::Atom(_) => 4,
        }
    }
}

impl Connective {
    pub fn keyword(self) -> &'static str {
        match self {
            Connective::Bot => "bot",
            Connective::Not => "not",
            Connective::And => "and",
            Connective::Or => "or",
            Connective::Imp => "imp",
            Connective::Iff => "iff",
        }
    }
}

impl Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

// Parentheses are emitted only where the grammar needs them, plus around a
// mixed and/or on the left for readability.
impl Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Bot => f.write_str("bot"),
            Formula::Atom(name) => f.write_str(name),
            Formula::Not(inner) => {
                f.write_str("not ")?;
                write_operand(f, inner, inner.precedence() < 3)
            }
            Formula::And(l, r) | Formula::Or(l, r) => {
                let conn = self.principal_connective();
                let mixed = l.precedence() == 2 && l.principal_connective() != conn;
                write_operand(f, l, l.precedence() < 2 || mixed)?;
                write!(f, " {} ", conn.map_or("", Connective::keyword))?;
                write_operand(f, r, r.precedence() <= 2)
            }
            Formula::Imp(l, r) => {
                write_operand(f, l, l.precedence() <= 1)?;
                f.write_str(" imp ")?;
                write_operand(f, r, matches!(**r, Formula::Iff(_, _)))
            }
            Formula::Iff(l, r) => {
                write_operand(f, l, matches!(**l, Formula::Imp(_, _)))?;
                f.write_str(" iff ")?;
                write_operand(f, r, r.precedence() <= 1)
            }
        }
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, operand: &Formula, parens: bool) -> fmt::Result {
    if parens {
        write!(f, "({operand})")
    } else {
        write!(f, "{operand}")
    }
}

use crate::{
    parse::{
        LoadError, LoadErrorKind,
        lines::{LineKind, SourceLine},
    },
    proof::{ProofNode, Zone},
};
use std::ops::Range;
use tracing::trace;

/// An open subproof while reading.
struct Frame {
    level: usize,
    zone: Zone,
    children: Vec<ProofNode>,
    has_hypothesis: bool,
    opened_at: (usize, Range<usize>),
}

impl Frame {
    fn open(level: usize, line: &SourceLine) -> Self {
        Self {
            level,
            zone: Zone::Hypothesis,
            children: Vec::new(),
            has_hypothesis: false,
            opened_at: (line.number, line.span.clone()),
        }
    }
}

/// Builds the proof tree from classified lines, one line at a time.
pub(super) struct TreeBuilder {
    stack: Vec<Frame>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            stack: vec![Frame {
                level: 1,
                zone: Zone::Hypothesis,
                children: Vec::new(),
                has_hypothesis: false,
                opened_at: (1, 0..0),
            }],
        }
    }

    fn top(&mut self) -> &mut Frame {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    fn at_root(&self) -> bool {
        self.stack.len() == 1
    }

    pub fn push_line(&mut self, line: SourceLine) -> Result<(), LoadError> {
        let err = |kind| LoadError::new(kind, line.number, line.span.clone());

        if let LineKind::Turnstile = line.kind {
            let top = self.top();
            if top.zone == Zone::Conclusion {
                return Err(err(LoadErrorKind::MisplacedTurnstile));
            }
            top.zone = Zone::Conclusion;
            return Ok(());
        }

        let is_hyp = line.kind.is_hypothesis();
        let is_claim = line.kind.is_claim();
        let current = self.top().level;

        if line.level > current {
            if line.level > current + 1 {
                return Err(err(LoadErrorKind::SkippedLevel));
            }
            if is_claim {
                return Err(err(LoadErrorKind::OpenWithoutHypothesis));
            }
            trace!(line = line.number, level = line.level, "open subproof");
            self.top().zone = Zone::Conclusion;
            self.stack.push(Frame::open(line.level, &line));
        } else if line.level < current {
            while self.top().level > line.level {
                self.close_top()?;
            }
        }

        let zone = self.top().zone;
        match zone {
            // A claim ends the hypothesis zone even without a turnstile.
            Zone::Hypothesis if is_claim => self.top().zone = Zone::Conclusion,
            Zone::Conclusion if is_hyp => {
                if self.at_root() {
                    return Err(err(LoadErrorKind::HypothesisInConclusion));
                }
                trace!(line = line.number, "adjacent subproof");
                self.close_top()?;
                self.stack.push(Frame::open(line.level, &line));
            }
            _ => {}
        }

        let at_root = self.at_root();
        let top = self.top();
        if is_hyp {
            if top.has_hypothesis && !at_root {
                return Err(err(LoadErrorKind::TooManyHypotheses));
            }
            top.has_hypothesis = true;
        }

        let zone = top.zone;
        let node = match line.kind {
            LineKind::Comment(text) => ProofNode::comment(zone, text),
            LineKind::Blank => ProofNode::blank(zone),
            LineKind::Formula { formula, .. } if is_hyp => ProofNode::hypothesis(formula),
            LineKind::Formula {
                formula,
                annotation,
            } => ProofNode::conclusion(formula, annotation),
            LineKind::Turnstile => unreachable!("turnstiles are handled above"),
        };
        top.children.push(node);

        Ok(())
    }

    fn close_top(&mut self) -> Result<(), LoadError> {
        let Some(frame) = self.stack.pop() else {
            return Ok(());
        };

        if !frame.children.iter().any(|c| c.zone() == Zone::Conclusion) {
            let (number, span) = frame.opened_at;
            return Err(LoadError::new(LoadErrorKind::MissingConclusion, number, span));
        }

        self.top().children.push(ProofNode::subproof(frame.children));
        Ok(())
    }

    pub fn finish(mut self) -> Result<ProofNode, LoadError> {
        while !self.at_root() {
            self.close_top()?;
        }

        let root = self.top();
        if root.children.is_empty() {
            return Err(LoadError::new(LoadErrorKind::Empty, 1, 0..0));
        }
        Ok(ProofNode::subproof(std::mem::take(&mut root.children)))
    }
}

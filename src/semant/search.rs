use crate::{
    formula::Formula,
    proof::{Annotation, Justification, LineRef, NodeLabel, Proof, Rule},
    semant::rules::verifies,
};
use itertools::Itertools;
use std::fmt;
use tracing::{debug, trace};

/// One line the search justified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchStep {
    pub line: LineRef,
    pub justification: Justification,
}

impl fmt::Display for SearchStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.line, self.justification)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchReport {
    /// Justifications found, in the order they were written.
    pub steps: Vec<SearchStep>,
    /// The line no rule could justify, if the search gave up.
    pub stuck_on: Option<LineRef>,
}

impl SearchReport {
    pub fn is_complete(&self) -> bool {
        self.stuck_on.is_none()
    }
}

/// A line that may be cited, with the formula it stands for.
struct Candidate {
    line: LineRef,
    formula: Formula,
    subproof: bool,
}

impl Proof {
    /// The last conclusion line that is not yet verified.
    pub fn next_unproved(&self) -> Option<LineRef> {
        self.lines()
            .collect_vec()
            .into_iter()
            .rev()
            .find(|(line, node)| {
                matches!(node.label(), NodeLabel::Conclusion(_)) && !self.verified(*line)
            })
            .map(|(line, _)| line)
    }

    /// Repeatedly justifies the last unproved line until every line is
    /// verified or one resists every rule.
    pub fn search(&mut self) -> SearchReport {
        let mut report = SearchReport::default();

        while let Some(line) = self.next_unproved() {
            let Some(justification) = self.find_justification(line) else {
                debug!(%line, "no rule justifies line");
                report.stuck_on = Some(line);
                break;
            };

            debug!(%line, %justification, "justified line");
            self.write_justification(line, justification.clone());

            if !self.verified(line) {
                report.stuck_on = Some(line);
                break;
            }
            report.steps.push(SearchStep {
                line,
                justification,
            });
        }

        self.validate_all();
        report
    }

    /// The first rule, in search order, that justifies `line` from lines it may cite.
    pub fn find_justification(&self, line: LineRef) -> Option<Justification> {
        let node = self.node_at_ref(line)?;
        let NodeLabel::Conclusion(conclusion) = node.label() else {
            return None;
        };

        let candidates = self.candidates(line);
        trace!(%line, candidates = candidates.len(), "searching");

        Rule::SEARCH_ORDER.into_iter().find_map(|rule| {
            let mut premises = try_rule(rule, conclusion.formula(), &candidates)?;
            premises.sort_by_key(|p| p.sort_key());
            Some(Justification::new(rule, premises))
        })
    }

    /// Citable lines and subproofs, nearest first.
    fn candidates(&self, line: LineRef) -> Vec<Candidate> {
        let Some(line_path) = self.path_of(line) else {
            return Vec::new();
        };

        self.index()
            .entries()
            .rev()
            .filter(|(_, path)| path.is_earlier(line_path))
            .filter_map(|(cited, path)| match self.node_at(path)?.label() {
                NodeLabel::Hypothesis(l) | NodeLabel::Conclusion(l) => Some(Candidate {
                    line: cited,
                    formula: l.formula().clone(),
                    subproof: false,
                }),
                NodeLabel::Subproof => {
                    self.subproof_as_implication(cited)
                        .ok()
                        .map(|formula| Candidate {
                            line: cited,
                            formula,
                            subproof: true,
                        })
                }
                NodeLabel::Comment { .. } | NodeLabel::Blank { .. } => None,
            })
            .collect()
    }

    fn write_justification(&mut self, line: LineRef, justification: Justification) {
        let Some(path) = self.path_of(line).cloned() else {
            return;
        };
        if let Some(node) = self.node_at_mut(&path)
            && let Some(annotation) = node.annotation_mut()
        {
            *annotation = Annotation::Justified(justification);
            node.set_validated(true);
        }
    }
}

/// Premises under which `rule` derives `conclusion`, if the candidates have them.
fn try_rule(rule: Rule, conclusion: &Formula, candidates: &[Candidate]) -> Option<Vec<LineRef>> {
    let holds = |premises: &[&Candidate]| {
        let formulas = premises.iter().map(|c| c.formula.clone()).collect_vec();
        verifies(rule, conclusion, &formulas)
    };
    let lines = || candidates.iter().filter(|c| !c.subproof);
    let subproofs = || candidates.iter().filter(|c| c.subproof);

    match rule {
        Rule::Hyp => None,
        Rule::Lem => holds(&[]).then(Vec::new),
        Rule::Repeat => lines()
            .find(|c| c.formula == *conclusion)
            .map(|c| vec![c.line]),

        Rule::BotIntro => {
            if !conclusion.is_bot() {
                return None;
            }
            lines()
                .filter(|neg| neg.formula.as_not().is_some())
                .find_map(|neg| {
                    lines()
                        .find(|pos| pos.line != neg.line && neg.formula.is_negation_of(&pos.formula))
                        .map(|pos| vec![neg.line, pos.line])
                })
        }
        Rule::NotIntro => {
            conclusion.as_not()?;
            single(subproofs(), holds)
        }
        Rule::ImpIntro => {
            conclusion.as_imp()?;
            single(subproofs(), holds)
        }
        Rule::NotElim => single(subproofs(), holds),

        Rule::AndIntro => {
            let (a, b) = conclusion.as_and()?;
            lines()
                .filter(|first| first.formula == *a || first.formula == *b)
                .find_map(|first| {
                    lines()
                        .find(|&second| holds(&[first, second]))
                        .map(|second| vec![first.line, second.line])
                })
        }
        Rule::OrIntro => {
            conclusion.as_or()?;
            single(lines(), holds)
        }
        Rule::IffIntro => {
            conclusion.as_iff()?;
            let imps = || candidates.iter().filter(|c| c.formula.as_imp().is_some());
            imps().find_map(|x| {
                imps()
                    .find(|&y| y.line != x.line && holds(&[x, y]))
                    .map(|y| vec![x.line, y.line])
            })
        }

        Rule::AndElim | Rule::BotElim => single(lines(), holds),
        Rule::OrElim => lines()
            .filter(|c| c.formula.as_or().is_some())
            .find_map(|disjunction| {
                let cases = candidates
                    .iter()
                    .filter(|c| {
                        c.line != disjunction.line
                            && c.formula
                                .as_imp()
                                .is_some_and(|(_, consequent)| consequent == conclusion)
                    })
                    .collect_vec();

                cases
                    .iter()
                    .copied()
                    .tuple_combinations()
                    .find(|&(p, q)| holds(&[disjunction, p, q]))
                    .map(|(p, q)| vec![disjunction.line, p.line, q.line])
            }),
        Rule::ImpElim => lines()
            .filter(|c| {
                c.formula
                    .as_imp()
                    .is_some_and(|(_, consequent)| consequent == conclusion)
            })
            .find_map(|imp| {
                let (antecedent, _) = imp.formula.as_imp()?;
                lines()
                    .find(|c| c.line != imp.line && c.formula == *antecedent)
                    .map(|c| vec![imp.line, c.line])
            }),
        Rule::IffElim => lines()
            .filter(|c| c.formula.as_iff().is_some())
            .find_map(|iff| {
                lines()
                    .find(|&c| c.line != iff.line && holds(&[iff, c]))
                    .map(|c| vec![iff.line, c.line])
            }),
    }
}

fn single<'a>(
    mut candidates: impl Iterator<Item = &'a Candidate>,
    holds: impl Fn(&[&Candidate]) -> bool,
) -> Option<Vec<LineRef>> {
    candidates.find(|&c| holds(&[c])).map(|c| vec![c.line])
}

use crate::{formula::Formula, proof::Rule};

/// Does `rule` derive `conclusion` from `premises`? Premise order never
/// matters; a wrong number of premises is simply a mismatch.
pub fn verifies(rule: Rule, conclusion: &Formula, premises: &[Formula]) -> bool {
    match (rule, premises) {
        (Rule::Hyp, []) => true,
        (Rule::Lem, []) => conclusion
            .as_or()
            .is_some_and(|(a, b)| b.is_negation_of(a) || a.is_negation_of(b)),
        (Rule::Repeat, [x]) => x == conclusion,

        (Rule::AndIntro, [x, y]) => conclusion
            .as_and()
            .is_some_and(|(a, b)| (x == a && y == b) || (x == b && y == a)),
        (Rule::AndElim, [x]) => x
            .as_and()
            .is_some_and(|(a, b)| conclusion == a || conclusion == b),

        (Rule::OrIntro, [x]) => conclusion.as_or().is_some_and(|(a, b)| x == a || x == b),
        (Rule::OrElim, [_, _, _]) => or_elim(conclusion, premises),

        (Rule::ImpIntro, [x]) => conclusion.as_imp().is_some() && x == conclusion,
        (Rule::ImpElim, [x, y]) => modus_ponens(conclusion, x, y) || modus_ponens(conclusion, y, x),

        (Rule::IffIntro, [x, y]) => iff_intro(conclusion, x, y),
        (Rule::IffElim, [x, y]) => iff_elim(conclusion, x, y) || iff_elim(conclusion, y, x),

        (Rule::NotIntro, [x]) => conclusion.as_not().is_some_and(|a| {
            x.as_imp()
                .is_some_and(|(ante, cons)| ante == a && cons.is_bot())
        }),
        (Rule::NotElim, [x]) => x
            .as_imp()
            .is_some_and(|(ante, cons)| ante.is_negation_of(conclusion) && cons.is_bot()),

        (Rule::BotIntro, [x, y]) => {
            conclusion.is_bot() && (x.is_negation_of(y) || y.is_negation_of(x))
        }
        (Rule::BotElim, [x]) => x.is_bot(),

        _ => false,
    }
}

/// `imp` is `antecedent imp conclusion` and `antecedent` is the other premise.
fn modus_ponens(conclusion: &Formula, imp: &Formula, antecedent: &Formula) -> bool {
    imp.as_imp()
        .is_some_and(|(ante, cons)| ante == antecedent && cons == conclusion)
}

fn iff_intro(conclusion: &Formula, x: &Formula, y: &Formula) -> bool {
    let (Some((a, b)), Some((l1, r1)), Some((l2, r2))) =
        (conclusion.as_iff(), x.as_imp(), y.as_imp())
    else {
        return false;
    };

    l1 == r2 && r1 == l2 && ((a == l1 && b == r1) || (a == l2 && b == r2))
}

/// `iff` has `other` on one side and the conclusion on the other.
fn iff_elim(conclusion: &Formula, iff: &Formula, other: &Formula) -> bool {
    iff.as_iff().is_some_and(|(l, r)| {
        (l == other && r == conclusion) || (r == other && l == conclusion)
    })
}

fn or_elim(conclusion: &Formula, premises: &[Formula]) -> bool {
    (0..premises.len()).any(|i| {
        let Some((a, b)) = premises[i].as_or() else {
            return false;
        };
        let cases = premises
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, p)| p.as_imp())
            .collect::<Option<Vec<_>>>();

        match cases.as_deref() {
            Some([(l1, r1), (l2, r2)]) => {
                *r1 == conclusion
                    && *r2 == conclusion
                    && ((*l1 == a && *l2 == b) || (*l1 == b && *l2 == a))
            }
            _ => false,
        }
    })
}

use fitch::{
    edit::{Chunk, Target},
    formula::Formula,
    parse::{LoadOptions, load},
    proof::{Annotation, IndentStyle, LineRef, Proof, ProofNode, Zone},
};
use proptest::prelude::*;

fn atom() -> impl Strategy<Value = Formula> {
    prop::sample::select(vec!["A", "B", "C"]).prop_map(Formula::atom)
}

fn annotation() -> impl Strategy<Value = Annotation> {
    (0..5u8, 1..8usize, 1..8usize).prop_map(|(kind, a, b)| match kind {
        0 => Annotation::Empty,
        1 => Annotation::parse(&format!("repeat {a}")),
        2 => Annotation::parse(&format!("and intro {a},{b}")),
        3 => Annotation::parse(&format!("imp intro {}-{}", a.min(b), a.max(b))),
        _ => Annotation::parse("and intro"),
    })
}

fn body_line() -> impl Strategy<Value = ProofNode> {
    let leaf = prop_oneof![
        4 => (atom(), annotation()).prop_map(|(f, a)| ProofNode::conclusion(f, a)),
        1 => Just(ProofNode::comment(Zone::Conclusion, "# note")),
        1 => Just(ProofNode::blank(Zone::Conclusion)),
    ];

    leaf.prop_recursive(3, 24, 4, |inner| {
        (atom(), prop::collection::vec(inner, 1..4)).prop_map(|(hyp, rest)| {
            let mut children = vec![ProofNode::hypothesis(hyp)];
            children.extend(rest);
            ProofNode::subproof(children)
        })
    })
}

fn proof() -> impl Strategy<Value = Proof> {
    (
        prop::collection::vec(atom(), 0..3),
        prop::collection::vec(body_line(), 1..6),
    )
        .prop_map(|(hyps, body)| {
            let mut children: Vec<_> = hyps.into_iter().map(ProofNode::hypothesis).collect();
            children.extend(body);
            Proof::from_root(ProofNode::subproof(children)).unwrap()
        })
}

#[derive(Debug, Clone)]
enum Op {
    Insert(usize, bool, bool),
    Delete(usize),
    Move(usize, usize, bool),
    Duplicate(usize, usize, bool),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<usize>(), any::<bool>(), any::<bool>()).prop_map(|(l, a, d)| Op::Insert(l, a, d)),
        any::<usize>().prop_map(Op::Delete),
        (any::<usize>(), any::<usize>(), any::<bool>()).prop_map(|(l, t, a)| Op::Move(l, t, a)),
        (any::<usize>(), any::<usize>(), any::<bool>())
            .prop_map(|(l, t, a)| Op::Duplicate(l, t, a)),
    ]
}

fn target(line: LineRef, above: bool) -> Target {
    if above {
        Target::above(line)
    } else {
        Target::below(line)
    }
}

fn apply(proof: &mut Proof, op: &Op) {
    let n = proof.line_count();
    let line = |i: usize| LineRef::Line(i % n + 1);

    let before = proof.to_text(IndentStyle::default());
    let result = match *op {
        Op::Insert(l, above, down) => {
            let t = target(line(l), above);
            proof.insert(if down { t.level_down() } else { t }, Vec::new())
        }
        Op::Delete(l) => proof.delete(Chunk::node(line(l))),
        Op::Move(l, t, above) => proof.move_chunk(Chunk::node(line(l)), target(line(t), above)),
        Op::Duplicate(l, t, above) => {
            proof.duplicate(Chunk::node(line(l)), target(line(t), above))
        }
    };

    if result.is_err() {
        assert_eq!(proof.to_text(IndentStyle::default()), before);
    }
}

fn flags(proof: &Proof) -> Vec<bool> {
    let mut flags = Vec::new();
    proof.root().for_each(&mut |node| flags.push(node.is_validated()));
    flags
}

proptest! {
    #[test]
    fn is_earlier_is_a_strict_order(proof in proof()) {
        let refs: Vec<LineRef> = proof.index().entries().map(|(r, _)| r).collect();

        for &a in &refs {
            prop_assert!(!proof.is_earlier(a, a));
            for &b in &refs {
                if !proof.is_earlier(a, b) {
                    continue;
                }
                prop_assert!(!proof.is_earlier(b, a));
                for &c in &refs {
                    if proof.is_earlier(b, c) {
                        prop_assert!(proof.is_earlier(a, c));
                    }
                }
            }
        }
    }

    #[test]
    fn is_earlier_sees_exactly_the_open_scopes(proof in proof()) {
        let entries: Vec<_> = proof
            .index()
            .entries()
            .map(|(r, p)| (r, p.clone()))
            .collect();

        for (a, a_path) in &entries {
            for (b, b_path) in &entries {
                let Some(scope) = a_path.parent() else { continue };
                if b_path.starts_with(a_path) {
                    // `a` encloses `b`.
                    prop_assert!(!proof.is_earlier(*a, *b));
                } else if b_path.starts_with(&scope) && a.end() < b.start() {
                    prop_assert!(proof.is_earlier(*a, *b));
                }
            }
        }
    }

    #[test]
    fn edits_keep_designators_contiguous(
        mut proof in proof(),
        ops in prop::collection::vec(op(), 1..8),
    ) {
        for op in &ops {
            apply(&mut proof, op);

            let numbers: Vec<LineRef> = proof.lines().map(|(r, _)| r).collect();
            let expected: Vec<LineRef> = (1..=proof.root().leaf_count()).map(LineRef::Line).collect();
            prop_assert_eq!(numbers, expected);
        }
    }

    #[test]
    fn validation_is_idempotent(mut proof in proof()) {
        proof.validate_all();
        let first = flags(&proof);
        proof.validate_all();
        prop_assert_eq!(first, flags(&proof));
    }

    #[test]
    fn text_round_trips(proof in proof(), bars in any::<bool>()) {
        let style = if bars { IndentStyle::Bars } else { IndentStyle::Spaces(2) };
        let text = proof.to_text(style);
        let reloaded = load(&text, &LoadOptions::default()).unwrap();

        prop_assert!(reloaded.root().same_structure(proof.root()), "{}", text);
        prop_assert_eq!(reloaded.to_text(style), text);
    }
}

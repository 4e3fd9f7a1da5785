use crate::{
    proof::{IndentStyle, LineRef, Proof},
    semant::{LineStatus, ProofStatuses, SearchReport},
    strings,
    util::{
        ansi::{ANSI_BOLD, ANSI_GRAY, ANSI_GREEN, ANSI_RED, ANSI_RESET, ANSI_YELLOW},
        plural,
    },
};
use std::fmt::Write;

pub fn format_report(statuses: &ProofStatuses, iteration: Option<usize>) -> String {
    let mut out = String::new();
    let checked = statuses.hypothesis_cnt() + statuses.verified_cnt() + statuses.problems().len();

    _ = write!(out, "Checked {checked} line{}", plural(checked));
    if let Some(i) = iteration {
        _ = write!(out, " {ANSI_GRAY}(run {i}){ANSI_RESET}");
    }
    _ = writeln!(out, ":");

    let hyps = statuses.hypothesis_cnt();
    _ = writeln!(
        out,
        " {ANSI_GRAY}•{ANSI_RESET} {ANSI_BOLD}{hyps}{ANSI_RESET} hypothes{}.",
        if hyps == 1 { "is" } else { "es" }
    );

    let verified = statuses.verified_cnt();
    _ = writeln!(
        out,
        " {ANSI_GREEN}✓{ANSI_RESET} {ANSI_BOLD}{verified}{ANSI_RESET} line{} verified.",
        plural(verified)
    );

    let unjustified = statuses.unjustified_cnt();
    if unjustified > 0 {
        _ = writeln!(
            out,
            " {ANSI_YELLOW}?{ANSI_RESET} {ANSI_BOLD}{unjustified}{ANSI_RESET} line{} without justification.",
            plural(unjustified)
        );
    }

    let errors = statuses.error_cnt();
    if errors > 0 {
        _ = writeln!(
            out,
            " {ANSI_RED}✗{ANSI_RESET} {ANSI_BOLD}{errors}{ANSI_RESET} line{} with errors.",
            plural(errors)
        );
    }

    for (line, status) in statuses.problems() {
        let color = match status {
            LineStatus::Unjustified => ANSI_YELLOW,
            _ => ANSI_RED,
        };
        _ = writeln!(out, "     {color}{line}{ANSI_RESET}: {status}");
    }

    if statuses.all_valid() {
        _ = writeln!(out);
        _ = writeln!(out, "🎉 Proof correct! 🎉");
    }

    out
}

/// Prints the summary of a check and returns whether every line is valid.
pub fn display_report(statuses: &ProofStatuses, iteration: Option<usize>) -> bool {
    print!("{}", format_report(statuses, iteration));
    statuses.all_valid()
}

/// The proof text with a mark in front of every numbered formula line.
pub fn format_marked_proof(proof: &Proof, style: IndentStyle) -> String {
    let mut out = String::new();

    for text in proof.to_text(style).lines() {
        let mark = match line_number(text).map(|n| proof.line_status(LineRef::Line(n))) {
            Some(LineStatus::Hypothesis) => format!("{ANSI_GRAY}•{ANSI_RESET}"),
            Some(LineStatus::Verified(_)) => format!("{ANSI_GREEN}✓{ANSI_RESET}"),
            Some(LineStatus::Unjustified) => format!("{ANSI_YELLOW}?{ANSI_RESET}"),
            Some(LineStatus::NotAFormula) | None => " ".to_string(),
            Some(_) => format!("{ANSI_RED}✗{ANSI_RESET}"),
        };
        _ = writeln!(out, "{mark} {text}");
    }

    out
}

fn line_number(text: &str) -> Option<usize> {
    let rest = text.trim_start_matches(|c: char| c.is_whitespace() || c == strings::VERT);
    let digits = rest.find(|c: char| !c.is_ascii_digit())?;
    if digits == 0 || !rest[digits..].starts_with('.') {
        return None;
    }
    rest[..digits].parse().ok()
}

pub fn format_search_report(report: &SearchReport) -> String {
    let mut out = String::new();

    for step in &report.steps {
        _ = writeln!(
            out,
            " {ANSI_GREEN}✓{ANSI_RESET} line {ANSI_BOLD}{}{ANSI_RESET} by {}",
            step.line, step.justification
        );
    }

    match report.stuck_on {
        Some(line) => {
            _ = writeln!(
                out,
                " {ANSI_RED}✗{ANSI_RESET} no rule justifies line {ANSI_BOLD}{line}{ANSI_RESET}."
            );
        }
        None if report.steps.is_empty() => {
            _ = writeln!(out, "Nothing to do: every line is already justified.");
        }
        None => {
            _ = writeln!(out);
            _ = writeln!(
                out,
                "🎉 Justified {} line{}! 🎉",
                report.steps.len(),
                plural(report.steps.len())
            );
        }
    }

    out
}

//! Terminal colorization for run results
//!
//! Applies ANSI escape codes to run traces using crossterm.

use crossterm::style::{Color, Stylize};
use fsaviz::automaton::{RunResult, Verdict};

fn paint(text: &str, color: Color, enabled: bool) -> String {
    if enabled {
        format!("{}", text.with(color))
    } else {
        text.to_string()
    }
}

/// Format one run as a single line
///
/// ```text
/// "0111": q0 -> q1 -> q2 -> q1 -> q2  Accepted
/// ```
///
/// With colors enabled, states are cyan, arrows yellow and the verdict
/// green or red.
pub fn format_run(input: &str, result: &RunResult, colorize: bool) -> String {
    let arrow = paint("->", Color::Yellow, colorize);
    let path = result
        .path()
        .into_iter()
        .map(|state| paint(state, Color::Cyan, colorize))
        .collect::<Vec<_>>()
        .join(&format!(" {} ", arrow));

    let verdict_color = match result.verdict {
        Verdict::Accepted => Color::Green,
        Verdict::Declined => Color::Red,
    };
    let verdict = paint(&result.verdict.to_string(), verdict_color, colorize);

    let consumed = result.trace.len();
    let total = input.chars().count();
    let stopped = if consumed < total {
        format!(" (stopped after {} of {} symbols)", consumed, total)
    } else {
        String::new()
    };

    format!("{:?}: {}  {}{}", input, path, verdict, stopped)
}

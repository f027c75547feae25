//! Terminal output.
//!
//! Status lines start with a symbol whose color carries the meaning. Errors
//! and hints go to stderr so they survive `matchbook run > summary.txt`.
//! Styling is dropped entirely when `NO_COLOR` is set.

use std::fmt::Display;

use console::Style;

const RULE: &str = "────────────────────────────────────────────────────────";

#[derive(Clone, Copy)]
enum Tone {
    Success,
    Error,
    Warning,
    Hint,
}

impl Tone {
    fn symbol(self) -> &'static str {
        match self {
            Self::Success => "✓",
            Self::Error => "✗",
            Self::Warning => "⚠",
            Self::Hint => "→",
        }
    }

    fn style(self) -> Style {
        let style = Style::new();
        match self {
            Self::Success => style.green(),
            Self::Error => style.red(),
            Self::Warning => style.yellow(),
            Self::Hint => style.cyan(),
        }
    }

    fn to_stderr(self) -> bool {
        matches!(self, Self::Error | Self::Hint)
    }
}

fn colors_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

fn paint(text: impl Display, style: Style) -> String {
    if colors_enabled() {
        style.apply_to(text).to_string()
    } else {
        text.to_string()
    }
}

fn status(tone: Tone, msg: &str) {
    let symbol = paint(tone.symbol(), tone.style());
    let msg = match tone {
        Tone::Hint => paint(msg, tone.style()),
        _ => msg.to_string(),
    };
    if tone.to_stderr() {
        eprintln!("{} {}", symbol, msg);
    } else {
        println!("{} {}", symbol, msg);
    }
}

/// `✓ decrypted 4 files`
pub fn success(msg: &str) {
    status(Tone::Success, msg);
}

/// `✗ missing required option: git_url`, on stderr.
pub fn error(msg: &str) {
    status(Tone::Error, msg);
}

pub fn warn(msg: &str) {
    status(Tone::Warning, msg);
}

/// `→ run: matchbook init <git_url>`, on stderr.
pub fn hint(msg: &str) {
    status(Tone::Hint, msg);
}

/// A table row: dimmed label padded to `width`, bold value.
pub fn kv(label: &str, value: impl Display, width: usize) {
    let label = format!("{:width$}", label, width = width);
    println!(
        "  {}  {}",
        paint(label, Style::new().dim()),
        paint(value, Style::new().bold())
    );
}

/// Blank line, bold title, dimmed rule.
pub fn section(title: &str) {
    println!();
    println!("{}", paint(title, Style::new().bold()));
    println!("{}", paint(RULE, Style::new().dim()));
}

pub fn path(p: impl Display) -> String {
    paint(p, Style::new().cyan())
}

pub fn cmd(c: &str) -> String {
    paint(c, Style::new().green())
}

pub fn dimmed(msg: &str) {
    println!("{}", paint(msg, Style::new().dim()));
}

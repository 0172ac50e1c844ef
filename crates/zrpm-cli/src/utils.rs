use std::{fmt::Display, io::IsTerminal, time::SystemTime};

use chrono::{DateTime, Local};
use nu_ansi_term::Style;
use zrpm_config::display::DisplaySettings;

/// Presentation settings passed to every formatting function.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    pub color: bool,
    pub highlight: bool,
}

impl Theme {
    /// Colors are used only when enabled in the settings, not disabled on the
    /// command line, and stdout is a terminal.
    pub fn new(settings: &DisplaySettings, no_color: bool) -> Self {
        Self::with_terminal(settings, no_color, std::io::stdout().is_terminal())
    }

    pub fn with_terminal(settings: &DisplaySettings, no_color: bool, is_terminal: bool) -> Self {
        let color = settings.color() && !no_color && is_terminal;
        Self {
            color,
            highlight: color && settings.highlight(),
        }
    }

    pub fn plain() -> Self {
        Self {
            color: false,
            highlight: false,
        }
    }

    pub fn paint<T: Display>(&self, style: impl Into<Style>, value: T) -> Colored<T> {
        Colored(self.color.then(|| style.into()), value)
    }
}

/// A value rendered with `style`, or as is when the style is `None`.
pub struct Colored<T: Display>(pub Option<Style>, pub T);

impl<T: Display> Display for Colored<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(style) => {
                write!(f, "{}", style.prefix())?;
                self.1.fmt(f)?;
                write!(f, "{}", style.suffix())
            }
            None => self.1.fmt(f),
        }
    }
}

/// Wraps every literal part of the query terms found in `name` in bold.
///
/// Terms are split on the glob metacharacters and matched without regard to
/// ASCII case. Overlapping occurrences are skipped.
pub fn highlight<S: AsRef<str>>(name: &str, terms: &[S], theme: &Theme) -> String {
    if !theme.highlight {
        return name.to_string();
    }

    let lower = name.to_ascii_lowercase();
    let mut ranges: Vec<(usize, usize)> = terms
        .iter()
        .flat_map(|term| {
            term.as_ref()
                .split(|c: char| c == '*' || c == '?')
                .filter(|piece| !piece.is_empty())
                .map(str::to_ascii_lowercase)
                .collect::<Vec<_>>()
        })
        .flat_map(|piece| {
            lower
                .match_indices(piece.as_str())
                .map(|(start, m)| (start, start + m.len()))
                .collect::<Vec<_>>()
        })
        .collect();
    ranges.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

    let bold = Style::new().bold();
    let mut out = String::with_capacity(name.len());
    let mut pos = 0;
    for (start, end) in ranges {
        if start < pos {
            continue;
        }
        out.push_str(&name[pos..start]);
        out.push_str(&bold.paint(&name[start..end]).to_string());
        pos = end;
    }
    out.push_str(&name[pos..]);
    out
}

/// Pads `styled` to `width` columns, counting only the visible `text`.
pub fn pad(styled: &str, text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.chars().count());
    format!("{styled}{}", " ".repeat(fill))
}

pub fn format_time(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format("%H:%M %d %b %Y")
        .to_string()
}

//! Terminal front ends for the session.
//!
//! [`Plain`] writes unadorned text and works on any stream. [`Rich`] adds
//! colours, framed panels and a progress bar. Which one runs is decided once
//! by [`select`].

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::Path;

use console::{measure_text_width, style, Term};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::debug;

use crate::batch::Progress;
use crate::error::Error;

pub const TITLE: &str = "Cookie Maker";
pub const SUBTITLE: &str = "username(base64):password(md5)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    Error,
}

/// What is about to be generated.
#[derive(Debug)]
pub struct Summary<'a> {
    pub username: &'a str,
    pub count: usize,
    pub output: &'a Path,
}

pub trait Presenter {
    /// Start of a loop iteration.
    fn banner(&mut self) -> Result<(), Error>;
    /// Free text answer, trimmed. An empty answer yields `default` if given.
    fn prompt(&mut self, text: &str, default: Option<&str>) -> Result<String, Error>;
    /// One of `choices`, asking again until the answer matches.
    fn choose(&mut self, text: &str, choices: &[&str], default: &str) -> Result<String, Error>;
    fn confirm(&mut self, text: &str) -> Result<bool, Error>;
    /// Wait for Enter.
    fn pause(&mut self) -> Result<(), Error>;
    fn message(&mut self, tone: Tone, text: &str) -> Result<(), Error>;
    fn list(&mut self, title: &str, items: &[String]) -> Result<(), Error>;
    fn summary(&mut self, summary: &Summary<'_>) -> Result<(), Error>;
    fn begin_batch(&mut self, total: usize) -> Result<(), Error>;
    fn progress(&mut self, progress: Progress<'_>) -> Result<(), Error>;
    fn end_batch(&mut self) -> Result<(), Error>;
}

/// Line oriented terminal shared by both presenters.
struct Lines<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Lines<R, W> {
    fn ask(&mut self, question: &str) -> Result<String, Error> {
        write!(self.output, "{question}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            debug!("end of input");
            return Err(Error::Interrupted);
        }
        Ok(line.trim().to_string())
    }

    fn say(&mut self, text: impl std::fmt::Display) -> Result<(), Error> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }
}

fn or_default(answer: String, default: Option<&str>) -> String {
    match default {
        Some(default) if answer.is_empty() => default.to_string(),
        _ => answer,
    }
}

fn progress_line(p: &Progress<'_>) -> String {
    format!("{} -> {} -> {}", p.password, p.digest, p.cookie)
}

pub struct Plain<R, W> {
    term: Lines<R, W>,
}

impl<R: BufRead, W: Write> Plain<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            term: Lines { input, output },
        }
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.term.output
    }
}

impl<R: BufRead, W: Write> Presenter for Plain<R, W> {
    fn banner(&mut self) -> Result<(), Error> {
        self.term.say(format_args!("=== {TITLE} ===\n{SUBTITLE}"))
    }

    fn prompt(&mut self, text: &str, default: Option<&str>) -> Result<String, Error> {
        let question = match default {
            Some(default) => format!("{text} [{default}]: "),
            None => format!("{text}: "),
        };
        let answer = self.term.ask(&question)?;
        Ok(or_default(answer, default))
    }

    fn choose(&mut self, text: &str, choices: &[&str], default: &str) -> Result<String, Error> {
        let question = format!("{text} ({}) [default {default}]: ", choices.join("/"));
        loop {
            let answer = or_default(self.term.ask(&question)?, Some(default));
            if choices.contains(&answer.as_str()) {
                return Ok(answer);
            }
            self.term.say(format_args!("Please choose one of {}", choices.join(", ")))?;
        }
    }

    fn confirm(&mut self, text: &str) -> Result<bool, Error> {
        let answer = self.term.ask(&format!("{text} [y/N]: "))?.to_lowercase();
        Ok(matches!(answer.as_str(), "y" | "yes"))
    }

    fn pause(&mut self) -> Result<(), Error> {
        self.term.ask("Press Enter to continue...").map(|_| ())
    }

    fn message(&mut self, tone: Tone, text: &str) -> Result<(), Error> {
        match tone {
            Tone::Error => self.term.say(format_args!("Error: {text}")),
            Tone::Info | Tone::Success => self.term.say(text),
        }
    }

    fn list(&mut self, title: &str, items: &[String]) -> Result<(), Error> {
        self.term.say(format_args!("--- {title} ---"))?;
        for (i, item) in items.iter().enumerate() {
            self.term.say(format_args!("{:3}. {item}", i + 1))?;
        }
        self.term.say("-".repeat(20))
    }

    fn summary(&mut self, s: &Summary<'_>) -> Result<(), Error> {
        self.term.say(format_args!(
            "\nSummary:\n Username: {}\n Password count: {}\n Output: {}",
            s.username,
            s.count,
            s.output.display()
        ))
    }

    fn begin_batch(&mut self, _total: usize) -> Result<(), Error> {
        self.term.say("\nProcessing...")
    }

    fn progress(&mut self, progress: Progress<'_>) -> Result<(), Error> {
        self.term.say(progress_line(&progress))
    }

    fn end_batch(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

/// Box drawn around `lines`, sized to the widest one.
fn panel(title: Option<&str>, lines: &[String]) -> String {
    let width = lines
        .iter()
        .map(|l| measure_text_width(l))
        .chain(title.map(|t| measure_text_width(t) + 2))
        .max()
        .unwrap_or(0);

    let top = match title {
        Some(title) => {
            let fill = width - measure_text_width(title) - 2;
            format!("╭─ {title} {}─╮", "─".repeat(fill))
        }
        None => format!("╭{}╮", "─".repeat(width + 2)),
    };
    let mut out = top;
    for line in lines {
        let pad = width - measure_text_width(line);
        out.push_str(&format!("\n│ {line}{} │", " ".repeat(pad)));
    }
    out.push_str(&format!("\n╰{}╯", "─".repeat(width + 2)));
    out
}

pub struct Rich<R, W> {
    term: Lines<R, W>,
    screen: Option<Term>,
    draw_target: fn() -> ProgressDrawTarget,
    bar: Option<ProgressBar>,
}

impl<R: BufRead, W: Write> Rich<R, W> {
    /// Rich output without screen clearing or a visible progress bar.
    pub fn new(input: R, output: W) -> Self {
        Self {
            term: Lines { input, output },
            screen: None,
            draw_target: ProgressDrawTarget::hidden,
            bar: None,
        }
    }

    /// Clears the screen on each banner and draws the progress bar on stderr.
    pub fn on_terminal(self) -> Self {
        Self {
            screen: Some(Term::stdout()),
            draw_target: ProgressDrawTarget::stderr,
            ..self
        }
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.term.output
    }
}

impl<R: BufRead, W: Write> Presenter for Rich<R, W> {
    fn banner(&mut self) -> Result<(), Error> {
        if let Some(screen) = &self.screen {
            screen.clear_screen()?;
        }
        let lines = [
            style(TITLE).green().bold().to_string(),
            style(SUBTITLE).dim().to_string(),
        ];
        self.term.say(panel(None, &lines))
    }

    fn prompt(&mut self, text: &str, default: Option<&str>) -> Result<String, Error> {
        let question = match default {
            Some(default) => format!("{} {}: ", style(text).bold(), style(format!("({default})")).cyan()),
            None => format!("{}: ", style(text).bold()),
        };
        let answer = self.term.ask(&question)?;
        Ok(or_default(answer, default))
    }

    fn choose(&mut self, text: &str, choices: &[&str], default: &str) -> Result<String, Error> {
        let question = format!(
            "{} {} {}: ",
            style(text).bold(),
            style(format!("[{}]", choices.join("/"))).magenta(),
            style(format!("({default})")).cyan()
        );
        loop {
            let answer = or_default(self.term.ask(&question)?, Some(default));
            if choices.contains(&answer.as_str()) {
                return Ok(answer);
            }
            self.term
                .say(style("Please select one of the available options").red())?;
        }
    }

    fn confirm(&mut self, text: &str) -> Result<bool, Error> {
        let question = format!("{} {}: ", style(text).bold(), style("[y/n]").magenta());
        loop {
            match self.term.ask(&question)?.to_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.term.say(style("Please enter Y or N").red())?,
            }
        }
    }

    fn pause(&mut self) -> Result<(), Error> {
        let question = style("Press Enter to continue...").dim().to_string();
        self.term.ask(&question).map(|_| ())
    }

    fn message(&mut self, tone: Tone, text: &str) -> Result<(), Error> {
        match tone {
            Tone::Info => self.term.say(style(text).yellow()),
            Tone::Success => {
                let lines: Vec<String> = std::iter::once(style("Success").green().bold().to_string())
                    .chain(text.lines().map(String::from))
                    .collect();
                self.term.say(panel(None, &lines))
            }
            Tone::Error => self.term.say(format_args!("{} {text}", style("Error:").red())),
        }
    }

    fn list(&mut self, title: &str, items: &[String]) -> Result<(), Error> {
        let lines: Vec<String> = items
            .iter()
            .enumerate()
            .map(|(i, item)| format!("{} {item}", style(format!("{:>3}", i + 1)).dim()))
            .collect();
        self.term.say(panel(Some(title), &lines))
    }

    fn summary(&mut self, s: &Summary<'_>) -> Result<(), Error> {
        let lines = [
            style("Summary").bold().to_string(),
            format!("Username: {}", style(s.username).cyan()),
            format!("Passwords: {}", style(s.count).yellow()),
            format!("Output: {}", style(s.output.display()).green()),
        ];
        self.term.say(panel(Some("Confirm before processing"), &lines))
    }

    fn begin_batch(&mut self, total: usize) -> Result<(), Error> {
        self.term.say(format_args!("\n{}", style("Processing...").green().bold()))?;
        let bar = ProgressBar::with_draw_target(Some(total as u64), (self.draw_target)());
        bar.set_style(
            ProgressStyle::with_template("Converting {bar:40.cyan/blue} {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        self.bar = Some(bar);
        Ok(())
    }

    fn progress(&mut self, p: Progress<'_>) -> Result<(), Error> {
        let line = format!(
            "{} -> md5: {} -> cookie: {}",
            style(p.password).dim(),
            style(p.digest).magenta(),
            style(p.cookie).cyan()
        );
        match &self.bar {
            Some(bar) if !bar.is_hidden() => {
                bar.println(line);
                bar.inc(1);
            }
            Some(bar) => {
                bar.inc(1);
                self.term.say(line)?;
            }
            None => self.term.say(line)?,
        }
        Ok(())
    }

    fn end_batch(&mut self) -> Result<(), Error> {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
        Ok(())
    }
}

fn no_color_requested() -> bool {
    std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty())
}

fn is_dumb_terminal() -> bool {
    std::env::var("TERM")
        .map(|value| value.eq_ignore_ascii_case("dumb"))
        .unwrap_or(false)
}

pub fn use_rich(stdout_is_terminal: bool, no_color: bool, dumb_terminal: bool) -> bool {
    stdout_is_terminal && !no_color && !dumb_terminal
}

/// Presenter on stdin/stdout suited to the current terminal.
pub fn select() -> Box<dyn Presenter> {
    let stdin = io::stdin().lock();
    let stdout = io::stdout();
    if use_rich(stdout.is_terminal(), no_color_requested(), is_dumb_terminal()) {
        debug!("rich presenter");
        Box::new(Rich::new(stdin, stdout).on_terminal())
    } else {
        debug!("plain presenter");
        Box::new(Plain::new(stdin, stdout))
    }
}

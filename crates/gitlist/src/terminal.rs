//! Line-oriented terminal host: output sink and prompt.

use crossterm::style::Stylize;
use gitlist_core::{DiffView, Output, OutputSink, Prompt};
use std::io::{self, BufRead, Write};

/// Prints command output, colouring diffs when `color` is set.
pub struct TerminalSink<W: Write> {
    out: W,
    color: bool,
}

impl TerminalSink<io::Stdout> {
    pub fn stdout(color: bool) -> Self {
        TerminalSink::new(io::stdout(), color)
    }
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W, color: bool) -> Self {
        TerminalSink { out, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_output(&mut self, output: &Output) -> io::Result<()> {
        match output {
            Output::Text(text) => writeln!(self.out, "{text}"),
            Output::Object { title, value } => {
                if let Some(title) = title {
                    self.heading(title)?;
                }
                let pretty = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
                writeln!(self.out, "{pretty}")
            }
            Output::Diff(view) => self.write_diff(view),
        }
    }

    fn heading(&mut self, title: &str) -> io::Result<()> {
        if self.color {
            writeln!(self.out, "{}", title.bold())
        } else {
            writeln!(self.out, "{title}")
        }
    }

    fn write_diff(&mut self, view: &DiffView) -> io::Result<()> {
        self.heading(&view.title)?;
        writeln!(self.out, "--- {}", view.left_title)?;
        writeln!(self.out, "+++ {}", view.right_title)?;

        if view.hunks.is_empty() {
            return writeln!(self.out, "No changes to display");
        }

        for hunk in &view.hunks {
            if self.color {
                writeln!(self.out, "{}", hunk.header.as_str().cyan())?;
            } else {
                writeln!(self.out, "{}", hunk.header)?;
            }

            for line in &hunk.lines {
                let text = format!("{}{}", line.origin, line.content.trim_end_matches('\n'));
                match (self.color, line.origin) {
                    (true, '+') => writeln!(self.out, "{}", text.green())?,
                    (true, '-') => writeln!(self.out, "{}", text.red())?,
                    _ => writeln!(self.out, "{text}")?,
                }
            }
        }
        Ok(())
    }
}

impl<W: Write> OutputSink for TerminalSink<W> {
    fn emit(&mut self, output: Output) {
        if let Err(err) = self.write_output(&output) {
            tracing::warn!(error = %err, "failed to write output");
        }
    }
}

/// Reads answers line by line; an empty answer takes the default and end
/// of input dismisses the prompt.
pub struct StdinPrompt<R: BufRead, W: Write> {
    input: R,
    out: W,
}

impl StdinPrompt<io::StdinLock<'static>, io::Stderr> {
    pub fn stdin() -> Self {
        StdinPrompt::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> StdinPrompt<R, W> {
    pub fn new(input: R, out: W) -> Self {
        StdinPrompt { input, out }
    }
}

impl<R: BufRead, W: Write> Prompt for StdinPrompt<R, W> {
    fn read_line(&mut self, question: &str, default: &str) -> Option<String> {
        let asked = if default.is_empty() {
            write!(self.out, "{question} ")
        } else {
            write!(self.out, "{question} [{default}] ")
        };
        if asked.and_then(|()| self.out.flush()).is_err() {
            return None;
        }

        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                let answer = answer.trim_end_matches(['\r', '\n']);
                if answer.is_empty() {
                    Some(default.to_string())
                } else {
                    Some(answer.to_string())
                }
            }
        }
    }
}

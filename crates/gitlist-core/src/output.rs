//! Command output, prompting and process launch seams.
//!
//! Commands never return errors to the host. They write one or more
//! [`Output`] values to a sink, ask the host for input through a
//! [`Prompt`], and start external tools through a [`Launcher`].

use serde::Serialize;
use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// A single line in an inline diff
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffLine {
    /// Line origin: '+' (add), '-' (remove), ' ' (context)
    pub origin: char,
    /// Line content
    pub content: String,
    /// Old line number (for context/removed lines)
    pub old_lineno: Option<u32>,
    /// New line number (for context/added lines)
    pub new_lineno: Option<u32>,
}

/// A diff hunk representing a change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffHunk {
    /// Hunk header (@@ -x,y +a,b @@)
    pub header: String,
    /// Lines in this hunk
    pub lines: Vec<DiffLine>,
}

/// Two-pane diff for the host to render inline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffView {
    pub title: String,
    pub left_title: String,
    pub right_title: String,
    pub hunks: Vec<DiffHunk>,
}

impl DiffView {
    /// Count of added and removed lines across all hunks.
    pub fn line_counts(&self) -> (usize, usize) {
        self.hunks
            .iter()
            .flat_map(|h| h.lines.iter())
            .fold((0, 0), |(added, removed), line| match line.origin {
                '+' => (added + 1, removed),
                '-' => (added, removed + 1),
                _ => (added, removed),
            })
    }
}

/// Something a command wants the host to show.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Text(String),
    Object {
        title: Option<String>,
        value: serde_json::Value,
    },
    Diff(DiffView),
}

impl Output {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Output::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Destination for command output.
pub trait OutputSink {
    fn emit(&mut self, output: Output);
}

impl dyn OutputSink + '_ {
    /// Emit a line of text.
    pub fn line(&mut self, text: impl Into<String>) {
        self.emit(Output::Text(text.into()));
    }

    /// Emit a serializable value under an optional title.
    ///
    /// Values that fail to serialize are reported as text instead.
    pub fn object<T: Serialize>(&mut self, title: Option<&str>, value: &T) {
        match serde_json::to_value(value) {
            Ok(value) => self.emit(Output::Object {
                title: title.map(str::to_string),
                value,
            }),
            Err(err) => self.emit(Output::Text(format!("<unprintable value: {err}>"))),
        }
    }
}

/// Sink that keeps everything in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub outputs: Vec<Output>,
}

impl MemorySink {
    /// All text lines emitted so far.
    pub fn lines(&self) -> Vec<&str> {
        self.outputs.iter().filter_map(Output::as_text).collect()
    }

    pub fn last_text(&self) -> Option<&str> {
        self.outputs.iter().rev().find_map(Output::as_text)
    }
}

impl OutputSink for MemorySink {
    fn emit(&mut self, output: Output) {
        self.outputs.push(output);
    }
}

/// Host-provided line input.
pub trait Prompt {
    /// Ask a question. `None` means the user dismissed the prompt.
    fn read_line(&mut self, question: &str, default: &str) -> Option<String>;
}

/// Prompt that replays queued answers and records the questions asked.
#[derive(Debug, Default, Clone)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
    pub questions: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedPrompt {
            answers: answers.into_iter().map(Into::into).collect(),
            questions: Vec::new(),
        }
    }
}

impl Prompt for ScriptedPrompt {
    fn read_line(&mut self, question: &str, _default: &str) -> Option<String> {
        self.questions.push(question.to_string());
        self.answers.pop_front()
    }
}

/// Starts external programs on behalf of commands.
pub trait Launcher {
    fn launch(&mut self, program: &Path, args: &[String]) -> io::Result<()>;
}

/// Spawns the program detached from our stdio and never waits for it.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedLauncher;

impl Launcher for DetachedLauncher {
    fn launch(&mut self, program: &Path, args: &[String]) -> io::Result<()> {
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        tracing::debug!(pid = child.id(), program = %program.display(), "launched external tool");
        Ok(())
    }
}

/// Records launches instead of running anything.
#[derive(Debug, Default, Clone)]
pub struct RecordingLauncher {
    pub launches: Vec<(PathBuf, Vec<String>)>,
}

impl Launcher for RecordingLauncher {
    fn launch(&mut self, program: &Path, args: &[String]) -> io::Result<()> {
        self.launches.push((program.to_path_buf(), args.to_vec()));
        Ok(())
    }
}

/// Everything a command may touch on the host side.
pub struct CommandContext<'a> {
    pub output: &'a mut dyn OutputSink,
    pub prompt: &'a mut dyn Prompt,
    pub launcher: &'a mut dyn Launcher,
}

impl<'a> CommandContext<'a> {
    #[must_use]
    pub fn new(
        output: &'a mut dyn OutputSink,
        prompt: &'a mut dyn Prompt,
        launcher: &'a mut dyn Launcher,
    ) -> Self {
        Self {
            output,
            prompt,
            launcher,
        }
    }

    pub fn say(&mut self, text: impl Into<String>) {
        self.output.line(text);
    }

    pub fn ask(&mut self, question: &str, default: &str) -> Option<String> {
        self.prompt.read_line(question, default)
    }

    /// Ask a yes/no question; only an explicit "yes" confirms.
    pub fn confirm(&mut self, question: &str) -> bool {
        self.ask(question, "no")
            .is_some_and(|answer| answer.trim().eq_ignore_ascii_case("yes"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn line(origin: char) -> DiffLine {
        DiffLine {
            origin,
            content: "x\n".into(),
            old_lineno: None,
            new_lineno: None,
        }
    }

    #[test]
    fn diff_view_counts_lines() {
        let view = DiffView {
            hunks: vec![DiffHunk {
                header: "@@ -1,2 +1,3 @@".into(),
                lines: vec![line(' '), line('+'), line('+'), line('-')],
            }],
            ..DiffView::default()
        };
        assert_eq!(view.line_counts(), (2, 1));
    }

    #[test]
    fn memory_sink_collects_text_and_objects() {
        let mut sink = MemorySink::default();
        {
            let out: &mut dyn OutputSink = &mut sink;
            out.line("first");
            out.object(Some("Details"), &json!({ "sha": "abc" }));
            out.line("second");
        }
        assert_eq!(sink.lines(), vec!["first", "second"]);
        assert_eq!(sink.last_text(), Some("second"));
        assert!(matches!(
            &sink.outputs[1],
            Output::Object { title: Some(t), .. } if t == "Details"
        ));
    }

    #[test]
    fn scripted_prompt_replays_and_records() {
        let mut prompt = ScriptedPrompt::new(["yes"]);
        assert_eq!(prompt.read_line("Sure?", "no").as_deref(), Some("yes"));
        assert_eq!(prompt.read_line("Again?", "no"), None);
        assert_eq!(prompt.questions, vec!["Sure?", "Again?"]);
    }

    #[test]
    fn confirm_requires_explicit_yes() {
        let mut sink = MemorySink::default();
        let mut prompt = ScriptedPrompt::new(["YES", "y", " yes "]);
        let mut launcher = RecordingLauncher::default();
        let mut ctx = CommandContext::new(&mut sink, &mut prompt, &mut launcher);

        assert!(ctx.confirm("drop?"));
        assert!(!ctx.confirm("drop?"));
        assert!(ctx.confirm("drop?"));
        assert!(!ctx.confirm("drop?"));
    }

    #[test]
    fn recording_launcher_keeps_arguments() {
        let mut launcher = RecordingLauncher::default();
        launcher
            .launch(Path::new("/usr/bin/meld"), &["a".into(), "b".into()])
            .unwrap();
        assert_eq!(launcher.launches.len(), 1);
        assert_eq!(launcher.launches[0].1, vec!["a", "b"]);
    }
}

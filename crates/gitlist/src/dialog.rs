//! Modal connection form.
//!
//! Two text fields (repository path and external diff tool), Tab to move
//! between them, Enter to validate and accept, Esc to cancel.

use color_eyre::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use gitlist_git::ConnectionProperties;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use std::io::{stdout, Stdout};

const FORM_WIDTH: u16 = 72;
const FORM_HEIGHT: u16 = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Repository,
    DiffTool,
}

impl Field {
    fn label(self) -> &'static str {
        match self {
            Field::Repository => "Repository path",
            Field::DiffTool => "External diff tool",
        }
    }

    fn other(self) -> Field {
        match self {
            Field::Repository => Field::DiffTool,
            Field::DiffTool => Field::Repository,
        }
    }
}

/// What the caller should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    Continue,
    Accept(ConnectionProperties),
    Cancel,
}

/// Editing state of the connection form.
#[derive(Debug, Clone)]
pub struct ConnectionForm {
    props: ConnectionProperties,
    focus: Field,
    error: Option<String>,
}

impl ConnectionForm {
    pub fn new(props: ConnectionProperties) -> Self {
        ConnectionForm {
            props,
            focus: Field::Repository,
            error: None,
        }
    }

    fn value(&self, field: Field) -> &str {
        match field {
            Field::Repository => &self.props.repository_path,
            Field::DiffTool => &self.props.external_diff_tool_path,
        }
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            Field::Repository => &mut self.props.repository_path,
            Field::DiffTool => &mut self.props.external_diff_tool_path,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        match key.code {
            KeyCode::Esc => return FormAction::Cancel,
            KeyCode::Enter => {
                return match self.props.validate() {
                    Ok(()) => FormAction::Accept(self.props.clone()),
                    Err(err) => {
                        self.error = Some(err.to_string());
                        FormAction::Continue
                    }
                };
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.focus = self.focus.other();
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.focused_mut().clear();
            }
            KeyCode::Char(c) => self.focused_mut().push(c),
            KeyCode::Backspace => {
                self.focused_mut().pop();
            }
            _ => return FormAction::Continue,
        }
        self.error = None;
        FormAction::Continue
    }

    pub fn render(&self, frame: &mut Frame) {
        let popup = centered_rect(FORM_WIDTH, FORM_HEIGHT, frame.area());
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(" Git Repository Connection ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(inner);

        for (i, field) in [Field::Repository, Field::DiffTool].into_iter().enumerate() {
            let label_row = rows[i * 3];
            let input_row = rows[i * 3 + 1];
            let focused = self.focus == field;
            let label_style = if focused {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };

            frame.render_widget(Paragraph::new(field.label()).style(label_style), label_row);
            frame.render_widget(
                Paragraph::new(format!("> {}", self.value(field))),
                input_row,
            );

            if focused {
                let width = self.value(field).chars().count() as u16 + 2;
                frame.set_cursor_position((
                    input_row.x + width.min(input_row.width.saturating_sub(1)),
                    input_row.y,
                ));
            }
        }

        if let Some(error) = &self.error {
            frame.render_widget(
                Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red)),
                rows[6],
            );
        }

        frame.render_widget(
            Paragraph::new("Tab: switch field  Enter: save  Esc: cancel  Ctrl+U: clear")
                .style(Style::default().fg(Color::DarkGray)),
            rows[7],
        );
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Show the form full screen until it is accepted or cancelled.
pub fn run_dialog(initial: ConnectionProperties) -> Result<Option<ConnectionProperties>> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let mut form = ConnectionForm::new(initial);
    let result = event_loop(&mut terminal, &mut form);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    form: &mut ConnectionForm,
) -> Result<Option<ConnectionProperties>> {
    loop {
        terminal.draw(|frame| form.render(frame))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match form.handle_key(key) {
                FormAction::Continue => {}
                FormAction::Accept(props) => return Ok(Some(props)),
                FormAction::Cancel => return Ok(None),
            }
        }
    }
}

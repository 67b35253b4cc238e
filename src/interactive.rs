//! Interactive mode for live previewing a rule.

use std::io::{self, Write};

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};

use ssed::error::Error;
use ssed::interpreter;
use ssed::parser;
use ssed::{Document, ast::RuleSet};

const MIN_PREVIEW_LINES: usize = 10;
const PROMPT: &str = "ssed> ";

/// Edits one extra rule-string, previewing the pipeline's output on every keystroke.
pub struct InteractiveMode<'a> {
    input: &'a Document,
    rules: RuleSet,
    status: Option<String>,
    rule: String,
    /// Cursor position, counted in chars.
    cursor: usize,
    json_output: bool,
    last_output_lines: usize,
    prompt_row: u16,
}

impl<'a> InteractiveMode<'a> {
    /// `rules` are the rule-strings given on the command line; the edited rule runs after them.
    pub fn new(input: &'a Document, rules: &[String], status: Option<String>) -> Self {
        let mut ignored: Vec<Error> = Vec::new();
        Self {
            input,
            rules: parser::parse_rule_set(rules, &mut ignored),
            status,
            rule: String::new(),
            cursor: 0,
            json_output: false,
            last_output_lines: 0,
            prompt_row: 0,
        }
    }

    /// Run interactive mode. Returns the final rule if committed, None if cancelled.
    pub fn run(&mut self) -> Result<Option<String>> {
        // Capture cursor position before raw mode
        self.prompt_row = cursor::position().map(|(_, row)| row).unwrap_or(0);

        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        let result = self.event_loop();
        terminal::disable_raw_mode().context("failed to disable raw mode")?;
        result
    }

    fn event_loop(&mut self) -> Result<Option<String>> {
        let mut stdout = io::stdout();

        self.draw(&mut stdout)?;

        loop {
            if let Event::Key(key) = event::read().context("failed to read event")? {
                match self.handle_key(key) {
                    KeyAction::Continue => {}
                    KeyAction::Commit => {
                        self.clear_output(&mut stdout)?;
                        return Ok(Some(self.rule.clone()));
                    }
                    KeyAction::Cancel => {
                        self.clear_output(&mut stdout)?;
                        return Ok(None);
                    }
                }
                self.draw(&mut stdout)?;
            }
        }
    }

    fn clear_output(&self, stdout: &mut io::Stdout) -> Result<()> {
        self.clear_below(stdout)?;
        execute!(
            stdout,
            cursor::MoveToColumn(0),
            terminal::Clear(ClearType::CurrentLine)
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Clear the preview lines drawn below the prompt, leaving the cursor on the prompt line.
    fn clear_below(&self, stdout: &mut io::Stdout) -> Result<()> {
        if self.last_output_lines > 0 {
            execute!(stdout, cursor::MoveDown(self.last_output_lines as u16))?;
            for _ in 0..self.last_output_lines {
                execute!(
                    stdout,
                    terminal::Clear(ClearType::CurrentLine),
                    cursor::MoveUp(1)
                )?;
            }
        }
        Ok(())
    }

    fn terminal_width() -> usize {
        terminal::size().map(|(w, _)| w as usize).unwrap_or(80)
    }

    fn available_preview_lines(&self) -> usize {
        let (_, term_height) = terminal::size().unwrap_or((80, 24));
        let lines_below = (term_height as usize).saturating_sub(self.prompt_row as usize + 1);
        lines_below.max(MIN_PREVIEW_LINES)
    }

    fn byte_index(&self, cursor: usize) -> usize {
        self.rule
            .char_indices()
            .nth(cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.rule.len())
    }

    fn handle_key(&mut self, key: KeyEvent) -> KeyAction {
        let len = self.rule.chars().count();
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) | (KeyCode::Esc, _) => KeyAction::Cancel,

            (KeyCode::Char('j'), KeyModifiers::CONTROL) => {
                self.json_output = !self.json_output;
                KeyAction::Continue
            }

            (KeyCode::Enter, _) => KeyAction::Commit,

            (KeyCode::Backspace, _) => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_index(self.cursor);
                    self.rule.remove(at);
                }
                KeyAction::Continue
            }

            (KeyCode::Delete, _) => {
                if self.cursor < len {
                    let at = self.byte_index(self.cursor);
                    self.rule.remove(at);
                }
                KeyAction::Continue
            }

            (KeyCode::Left, _) => {
                self.cursor = self.cursor.saturating_sub(1);
                KeyAction::Continue
            }

            (KeyCode::Right, _) => {
                if self.cursor < len {
                    self.cursor += 1;
                }
                KeyAction::Continue
            }

            (KeyCode::Home, _) => {
                self.cursor = 0;
                KeyAction::Continue
            }

            (KeyCode::End, _) => {
                self.cursor = len;
                KeyAction::Continue
            }

            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                let at = self.byte_index(self.cursor);
                self.rule.insert(at, c);
                self.cursor += 1;
                KeyAction::Continue
            }

            _ => KeyAction::Continue,
        }
    }

    fn draw(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        let term_width = Self::terminal_width();

        self.clear_below(stdout)?;

        let prompt = format!("{}{}", PROMPT, self.rule);
        execute!(
            stdout,
            cursor::MoveToColumn(0),
            terminal::Clear(ClearType::CurrentLine),
            Print(&prompt)
        )?;

        let mut lines_below = 0;
        let max_lines = self.available_preview_lines();

        match self.preview() {
            Ok(output) => {
                let rendered = if self.json_output {
                    serde_json::to_string_pretty(&output)
                        .unwrap_or_else(|e| format!("JSON error: {}", e))
                } else {
                    output.to_string()
                };
                for line in rendered.lines().take(max_lines) {
                    let truncated = truncate_line(line, term_width);
                    execute!(stdout, Print("\r\n"), Print(&truncated))?;
                    lines_below += 1;
                }
            }
            Err(err) => {
                let offset = err.position.source_pos.unwrap_or(0);
                let message = err.message.lines().next().unwrap_or_default();
                let message = message.strip_prefix("parse error: ").unwrap_or(message);
                let caret_pos = PROMPT.len() + self.rule[..offset.min(self.rule.len())].chars().count();
                let caret_line = format!("{:>width$}", "^", width = caret_pos + 1);
                let error_line = format!("{} {}", caret_line, message);
                let truncated = truncate_line(&error_line, term_width);
                execute!(
                    stdout,
                    Print("\r\n"),
                    SetForegroundColor(Color::Red),
                    Print(&truncated),
                    ResetColor
                )?;
                lines_below += 1;
            }
        }

        if lines_below > 0 {
            execute!(stdout, cursor::MoveUp(lines_below as u16))?;
        }
        let cursor_col = PROMPT.len() + self.cursor;
        execute!(stdout, cursor::MoveToColumn(cursor_col as u16))?;

        stdout.flush()?;
        self.last_output_lines = lines_below;

        Ok(())
    }

    /// Run the command-line rules plus the rule being edited.
    ///
    /// An empty rule previews the command-line rules alone.
    fn preview(&self) -> std::result::Result<Document, Error> {
        let mut rules = self.rules.clone();
        if !self.rule.trim().is_empty() {
            rules.rules.push(parser::parse_rule(&self.rule)?);
        }
        let mut ignored: Vec<Error> = Vec::new();
        let pipeline = interpreter::compile(&rules, &mut ignored);
        let ctx = interpreter::Context::new(self.status.clone());
        Ok(Document::from(pipeline.run(self.input.lines.clone(), &ctx)))
    }
}

enum KeyAction {
    Continue,
    Commit,
    Cancel,
}

fn truncate_line(line: &str, max_width: usize) -> String {
    if line.chars().count() <= max_width {
        line.to_string()
    } else if max_width > 3 {
        let head: String = line.chars().take(max_width - 3).collect();
        format!("{}...", head)
    } else {
        line.chars().take(max_width).collect()
    }
}

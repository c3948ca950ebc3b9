//! Interactive fuzzy picker
//!
//! Full-screen ratatui picker: filtered list on the left, preview of the
//! highlighted item on the right, query prompt on the bottom line.

use std::io::{self, Stdout};

use async_trait::async_trait;
use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use tracing::debug;

use super::event::PickerCommand;
use super::selector::{SelectionItem, Selector};
use super::theme::Theme;
use crate::error::{Result, TuiError};

/// An item that survived filtering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedItem {
    /// Index into the original item list
    pub index: usize,
    /// Match score, higher is better
    pub score: i64,
    /// Character positions in the label that matched the query
    pub indices: Vec<usize>,
}

/// What the picker should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerOutcome {
    Continue,
    Selected(usize),
    Cancelled,
}

/// Query, filtered matches and cursor
pub struct PickerState {
    query: String,
    matches: Vec<MatchedItem>,
    list_state: ListState,
    /// Rows visible in the list, updated on render
    page_size: usize,
    matcher: SkimMatcherV2,
}

impl PickerState {
    /// Create a state with an initial query
    pub fn new(items: &[SelectionItem], query: &str) -> Self {
        let mut state = Self {
            query: query.to_string(),
            matches: Vec::new(),
            list_state: ListState::default(),
            page_size: 10,
            matcher: SkimMatcherV2::default(),
        };
        state.refilter(items);
        state
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn matches(&self) -> &[MatchedItem] {
        &self.matches
    }

    /// Index of the highlighted item in the original list
    pub fn selected_item(&self) -> Option<usize> {
        self.list_state
            .selected()
            .and_then(|cursor| self.matches.get(cursor))
            .map(|m| m.index)
    }

    /// Apply a command
    pub fn apply(&mut self, command: PickerCommand, items: &[SelectionItem]) -> PickerOutcome {
        match command {
            PickerCommand::NavigateUp => self.move_cursor(-1),
            PickerCommand::NavigateDown => self.move_cursor(1),
            PickerCommand::PageUp => self.move_cursor(-(self.page_size as isize)),
            PickerCommand::PageDown => self.move_cursor(self.page_size as isize),
            PickerCommand::Select => {
                return match self.selected_item() {
                    Some(index) => PickerOutcome::Selected(index),
                    None => PickerOutcome::Continue,
                };
            }
            PickerCommand::Cancel => return PickerOutcome::Cancelled,
            PickerCommand::TextInput(c) => {
                self.query.push(c);
                self.refilter(items);
            }
            PickerCommand::Backspace => {
                if self.query.pop().is_some() {
                    self.refilter(items);
                }
            }
            PickerCommand::ClearQuery => {
                if !self.query.is_empty() {
                    self.query.clear();
                    self.refilter(items);
                }
            }
        }
        PickerOutcome::Continue
    }

    /// Recompute matches for the current query and reset the cursor
    fn refilter(&mut self, items: &[SelectionItem]) {
        self.matches = if self.query.is_empty() {
            (0..items.len())
                .map(|index| MatchedItem {
                    index,
                    score: 0,
                    indices: Vec::new(),
                })
                .collect()
        } else {
            let mut matches: Vec<MatchedItem> = items
                .iter()
                .enumerate()
                .filter_map(|(index, item)| {
                    self.matcher
                        .fuzzy_indices(&item.label, &self.query)
                        .map(|(score, indices)| MatchedItem {
                            index,
                            score,
                            indices,
                        })
                })
                .collect();
            // Stable, so equal scores keep input order
            matches.sort_by(|a, b| b.score.cmp(&a.score));
            matches
        };

        let cursor = if self.matches.is_empty() { None } else { Some(0) };
        self.list_state.select(cursor);
    }

    fn move_cursor(&mut self, delta: isize) {
        let Some(current) = self.list_state.selected() else {
            return;
        };
        let last = self.matches.len().saturating_sub(1) as isize;
        let next = (current as isize + delta).clamp(0, last);
        self.list_state.select(Some(next as usize));
    }
}

/// Split a label into spans with matched characters highlighted
fn highlight_label<'a>(label: &'a str, indices: &[usize], theme: &Theme) -> Line<'a> {
    if indices.is_empty() {
        return Line::from(label);
    }

    let spans: Vec<Span<'a>> = label
        .chars()
        .enumerate()
        .map(|(i, c)| {
            if indices.contains(&i) {
                Span::styled(c.to_string(), theme.matched())
            } else {
                Span::raw(c.to_string())
            }
        })
        .collect();
    Line::from(spans)
}

/// Draw the picker
pub fn render_picker(
    frame: &mut Frame,
    state: &mut PickerState,
    items: &[SelectionItem],
    theme: &Theme,
) {
    let [main, prompt] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());
    let [list_area, preview_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(main);

    state.page_size = list_area.height.saturating_sub(2).max(1) as usize;

    let list_items: Vec<ListItem<'_>> = state
        .matches
        .iter()
        .filter_map(|m| items.get(m.index).map(|item| (m, item)))
        .map(|(m, item)| ListItem::new(highlight_label(&item.label, &m.indices, theme)))
        .collect();

    let list = List::new(list_items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.list_border))
                .title(" Projects "),
        )
        .style(Style::default().fg(theme.label))
        .highlight_style(theme.cursor())
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, list_area, &mut state.list_state);

    let preview = state
        .selected_item()
        .and_then(|index| items.get(index))
        .map(|item| item.preview.as_str())
        .unwrap_or("");
    let preview = Paragraph::new(preview)
        .style(Style::default().fg(theme.muted))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.preview_border))
                .title(" Preview "),
        );
    frame.render_widget(preview, preview_area);

    let prompt_line = Line::from(vec![
        Span::styled("> ", theme.prompt()),
        Span::raw(state.query.as_str()),
    ]);
    frame.render_widget(Paragraph::new(prompt_line), prompt);

    let counter = format!("{}/{}", state.matches.len(), items.len());
    frame.render_widget(
        Paragraph::new(counter)
            .alignment(Alignment::Right)
            .style(Style::default().fg(theme.muted)),
        prompt,
    );

    let cursor_x = prompt.x + 2 + state.query.chars().count() as u16;
    frame.set_cursor_position((cursor_x.min(prompt.right().saturating_sub(1)), prompt.y));
}

/// Full-screen fuzzy picker on the controlling terminal
pub struct FuzzyPicker {
    theme: Theme,
    query: String,
}

impl Default for FuzzyPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl FuzzyPicker {
    pub fn new() -> Self {
        Self {
            theme: Theme::default(),
            query: String::new(),
        }
    }

    /// Start with a pre-filled query
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    async fn run(
        &self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
        items: &[SelectionItem],
    ) -> Result<Option<usize>> {
        let mut state = PickerState::new(items, &self.query);
        let mut events = EventStream::new();

        loop {
            terminal
                .draw(|f| render_picker(f, &mut state, items, &self.theme))
                .map_err(|e| TuiError::RenderError(e.to_string()))?;

            let Some(event) = events.next().await else {
                debug!("Terminal event stream closed");
                return Ok(None);
            };
            let event = event.map_err(|e| TuiError::EventError(e.to_string()))?;

            // Resize and other events just trigger a redraw
            let Event::Key(key) = event else {
                continue;
            };
            let Some(command) = PickerCommand::from_key(key) else {
                continue;
            };

            match state.apply(command, items) {
                PickerOutcome::Continue => {}
                PickerOutcome::Selected(index) => return Ok(Some(index)),
                PickerOutcome::Cancelled => return Ok(None),
            }
        }
    }
}

#[async_trait(?Send)]
impl Selector for FuzzyPicker {
    async fn select(&mut self, items: &[SelectionItem]) -> Result<Option<usize>> {
        if items.is_empty() {
            return Ok(None);
        }

        let mut terminal = setup_terminal()?;
        let result = self.run(&mut terminal, items).await;
        // Restore even when the picker failed
        let restored = restore_terminal(&mut terminal);

        let selection = result?;
        restored?;
        Ok(selection)
    }
}

/// Enter raw mode and the alternate screen
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().map_err(|e| TuiError::InitFailed(e.to_string()))?;

    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(TuiError::InitFailed(e.to_string()).into());
    }

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).map_err(|e| TuiError::InitFailed(e.to_string()))?;

    Ok(terminal)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().map_err(|e| TuiError::RestoreFailed(e.to_string()))?;

    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .map_err(|e| TuiError::RestoreFailed(e.to_string()))?;

    terminal
        .show_cursor()
        .map_err(|e| TuiError::RestoreFailed(e.to_string()))?;

    Ok(())
}

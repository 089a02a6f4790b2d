use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use planner_core::{Clock, Intent, KeyValueStore, Mode, Planner, StatementType};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use std::io::{self, Stdout};
use std::time::Duration;

use crate::config::DisplaySection;
use crate::form::{EntryForm, Field, FormOutcome};
use crate::render;

pub struct App<S, C> {
    planner: Planner<S, C>,
    form: EntryForm,
    selected: usize,
    display: DisplaySection,
    should_quit: bool,
}

impl<S: KeyValueStore, C: Clock> App<S, C> {
    pub fn new(planner: Planner<S, C>, display: DisplaySection) -> Self {
        let selected = planner.statements().len().saturating_sub(1);
        Self {
            planner,
            form: EntryForm::default(),
            selected,
            display,
            should_quit: false,
        }
    }

    pub fn planner(&self) -> &Planner<S, C> {
        &self.planner
    }

    pub fn selected(&self) -> Option<usize> {
        if self.planner.statements().is_empty() {
            None
        } else {
            Some(self.selected)
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Route one key press. Persistence failures are returned to the caller.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<()> {
        match self.planner.mode() {
            // The list stays live while the form is open; the form ignores these keys.
            Mode::Open(_) if matches!(code, KeyCode::Delete) => self.delete_selected()?,
            Mode::Open(_) if matches!(code, KeyCode::Up | KeyCode::Down) => self.move_selection(code),
            Mode::Open(_) => match self.form.handle_key(code) {
                FormOutcome::Pending => {}
                FormOutcome::Cancel => {
                    self.planner.dispatch(Intent::Cancel)?;
                    self.form.reset();
                }
                FormOutcome::Submit { amount, remarks } => {
                    self.planner.dispatch(Intent::Submit {
                        amount: Some(amount),
                        remarks: Some(remarks),
                    })?;
                    self.form.reset();
                    self.selected = self.planner.statements().len().saturating_sub(1);
                    tracing::info!(count = self.planner.statements().len(), "statement added");
                }
            },
            Mode::Closed => match code {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('i') => self.open_form(StatementType::Income)?,
                KeyCode::Char('e') | KeyCode::Char('s') => self.open_form(StatementType::Expense)?,
                KeyCode::Up | KeyCode::Down => self.move_selection(code),
                KeyCode::Char('k') => self.move_selection(KeyCode::Up),
                KeyCode::Char('j') => self.move_selection(KeyCode::Down),
                KeyCode::Char('d') | KeyCode::Delete => self.delete_selected()?,
                _ => {}
            },
        }
        Ok(())
    }

    fn move_selection(&mut self, code: KeyCode) {
        let last = self.planner.statements().len().saturating_sub(1);
        self.selected = match code {
            KeyCode::Up => self.selected.saturating_sub(1),
            _ => (self.selected + 1).min(last),
        };
    }

    fn open_form(&mut self, kind: StatementType) -> Result<()> {
        self.form.reset();
        self.planner.dispatch(Intent::Enable(kind))?;
        Ok(())
    }

    fn delete_selected(&mut self) -> Result<()> {
        let Some(id) = self.planner.statements().get(self.selected).map(|s| s.id) else {
            return Ok(());
        };
        self.planner.dispatch(Intent::Delete(id))?;
        tracing::info!(id, "statement deleted");
        let last = self.planner.statements().len().saturating_sub(1);
        self.selected = self.selected.min(last);
        Ok(())
    }

    fn draw(&self, f: &mut Frame<'_>) {
        let bottom = if self.planner.is_form_open() { 7 } else { 3 };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Min(3),
                Constraint::Length(bottom),
                Constraint::Length(1),
            ])
            .split(f.area());

        self.draw_summary(f, chunks[0]);
        self.draw_list(f, chunks[1]);
        match self.planner.active_type() {
            Some(kind) => self.draw_form(f, chunks[2], kind),
            None => self.draw_buttons(f, chunks[2]),
        }

        let hint = if self.planner.is_form_open() {
            "Tab=switch field  Enter=submit  Esc=cancel  ↑/↓=select  Del=delete"
        } else {
            "i=income  e=spending  ↑/↓=select  d=delete  q=quit"
        };
        f.render_widget(
            Paragraph::new(Span::styled(hint, Style::default().fg(Color::Gray))),
            chunks[3],
        );
    }

    fn draw_summary(&self, f: &mut Frame<'_>, area: Rect) {
        let summary = self.planner.summary();
        let text = Text::from(vec![
            Line::from(Span::styled("Balance", Style::default().fg(Color::Gray))),
            Line::from(Span::styled(
                render::balance_line(&summary, &self.display),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::styled(
                    format!(
                        "Income: {}",
                        render::money(summary.income, &self.display.amount_suffix)
                    ),
                    Style::default().fg(Color::Green),
                ),
                Span::raw("   "),
                Span::styled(
                    format!(
                        "Spendings: {}",
                        render::money(summary.expense, &self.display.amount_suffix)
                    ),
                    Style::default().fg(Color::Red),
                ),
            ]),
        ]);
        let widget = Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("expense planner"));
        f.render_widget(widget, area);
    }

    fn draw_list(&self, f: &mut Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = self
            .planner
            .statements()
            .iter()
            .map(|s| {
                let color = if s.is_income() { Color::Green } else { Color::Red };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:<10} ", s.date), Style::default().fg(Color::Gray)),
                    Span::styled(
                        format!("{:>12} ", render::entry_amount(s, &self.display)),
                        Style::default().fg(color),
                    ),
                    Span::raw(s.remarks_text().to_string()),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("statements"))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        let mut state = ListState::default().with_selected(self.selected());
        f.render_stateful_widget(list, area, &mut state);
    }

    fn draw_form(&self, f: &mut Frame<'_>, area: Rect, kind: StatementType) {
        let field_style = |field: Field| {
            if self.form.focus == field {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            }
        };

        let mut lines = vec![
            Line::from(vec![
                Span::styled("Amount:  ", field_style(Field::Amount)),
                Span::raw(self.form.amount.clone()),
            ]),
            Line::from(vec![
                Span::styled("Remarks: ", field_style(Field::Remarks)),
                Span::raw(self.form.remarks.clone()),
            ]),
            Line::raw(""),
            Line::from(Span::styled(
                "[Enter] Submit   [Esc] Cancel",
                Style::default().fg(Color::Gray),
            )),
        ];
        if let Some(err) = &self.form.error {
            lines.push(Line::from(Span::styled(
                err.clone(),
                Style::default().fg(Color::Red),
            )));
        }

        let widget = Paragraph::new(Text::from(lines)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Add {}", kind.label())),
        );
        f.render_widget(widget, area);
    }

    fn draw_buttons(&self, f: &mut Frame<'_>, area: Rect) {
        let line = Line::from(vec![
            Span::styled("[i] Add Income", Style::default().fg(Color::Green)),
            Span::raw("      "),
            Span::styled("[e] Add Spending", Style::default().fg(Color::Red)),
        ]);
        let widget = Paragraph::new(line)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(widget, area);
    }
}

pub fn run<S: KeyValueStore, C: Clock>(app: &mut App<S, C>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = event_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn event_loop<S: KeyValueStore, C: Clock>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App<S, C>,
) -> Result<()> {
    while !app.should_quit() {
        terminal.draw(|f| app.draw(f))?;

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                app.handle_key(key.code)?;
            }
        }
    }
    Ok(())
}

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use expense_ledger::{Classification, Clock, ExpenseApp, KeyValueStore};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Description,
    Amount,
    Date,
    List,
}

impl Focus {
    pub fn next(&self) -> Self {
        match self {
            Focus::Description => Focus::Amount,
            Focus::Amount => Focus::Date,
            Focus::Date => Focus::List,
            Focus::List => Focus::Description,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Focus::Description => Focus::List,
            Focus::Amount => Focus::Description,
            Focus::Date => Focus::Amount,
            Focus::List => Focus::Date,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Focus::Description => "Description",
            Focus::Amount => "Amount",
            Focus::Date => "Date",
            Focus::List => "Entries",
        }
    }

    fn is_field(&self) -> bool {
        *self != Focus::List
    }
}

pub struct UiState<'a, S: KeyValueStore, C: Clock> {
    pub app: &'a mut ExpenseApp<S, C>,
    pub focus: Focus,
    pub state: TableState,
}

impl<'a, S: KeyValueStore, C: Clock> UiState<'a, S, C> {
    pub fn new(app: &'a mut ExpenseApp<S, C>) -> Self {
        let mut state = TableState::default();
        if !app.view().rows.is_empty() {
            state.select(Some(0));
        }

        Self {
            app,
            focus: Focus::Description,
            state,
        }
    }

    /// Keep the selection on a row that still exists after a re-render
    fn clamp_selection(&mut self) {
        let len = self.app.view().rows.len();
        let selected = match self.state.selected() {
            _ if len == 0 => None,
            Some(i) if i >= len => Some(len - 1),
            Some(i) => Some(i),
            None => Some(0),
        };
        self.state.select(selected);
    }

    pub fn next(&mut self) {
        let len = self.app.view().rows.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i >= len - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.app.view().rows.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    fn field_mut(&mut self) -> Option<&mut String> {
        let fields = self.app.fields_mut();
        match self.focus {
            Focus::Description => Some(&mut fields.description),
            Focus::Amount => Some(&mut fields.amount),
            Focus::Date => Some(&mut fields.date),
            Focus::List => None,
        }
    }

    fn submit(&mut self) {
        if self.app.submit().is_some() {
            // Newest row is at the bottom
            let len = self.app.view().rows.len();
            self.state.select(len.checked_sub(1));
            self.focus = Focus::Description;
        }
    }

    fn edit_selected(&mut self) {
        let action = self
            .state
            .selected()
            .and_then(|i| self.app.view().row(i))
            .map(|row| row.edit());
        if let Some(action) = action {
            self.app.dispatch(action);
            self.clamp_selection();
            self.focus = Focus::Description;
        }
    }

    fn delete_selected(&mut self) {
        let action = self
            .state
            .selected()
            .and_then(|i| self.app.view().row(i))
            .map(|row| row.delete());
        if let Some(action) = action {
            self.app.dispatch(action);
            self.clamp_selection();
        }
    }

    /// Returns false when the user asked to quit
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        // Notifications block everything until dismissed
        if self.app.notification().is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.app.dismiss_notification();
            }
            return true;
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return false;
        }

        match key.code {
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.previous(),
            _ if self.focus.is_field() => self.handle_field_key(key),
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::Home => self.state.select(Some(0)),
            KeyCode::End => {
                let len = self.app.view().rows.len();
                self.state.select(len.checked_sub(1));
            }
            KeyCode::Char('e') | KeyCode::Enter => self.edit_selected(),
            KeyCode::Char('d') | KeyCode::Delete => self.delete_selected(),
            KeyCode::Char('a') | KeyCode::Char('n') => self.focus = Focus::Description,
            _ => {}
        }
        true
    }

    fn handle_field_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.submit(),
            KeyCode::Esc => {
                self.app.cancel_edit();
                self.focus = Focus::List;
            }
            KeyCode::Backspace => {
                if let Some(field) = self.field_mut() {
                    field.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(field) = self.field_mut() {
                    field.push(c);
                }
            }
            _ => {}
        }
    }
}

pub fn run_ui<S: KeyValueStore, C: Clock>(app: &mut ExpenseApp<S, C>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let mut ui_state = UiState::new(app);
    let res = run_app(&mut terminal, &mut ui_state);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        log::error!("UI loop failed: {:?}", err);
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend, S: KeyValueStore, C: Clock>(
    terminal: &mut Terminal<B>,
    ui_state: &mut UiState<'_, S, C>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, ui_state))?;

        if let Event::Key(key) = event::read()? {
            // Windows reports releases too
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if !ui_state.handle_key(key) {
                return Ok(());
            }
        }
    }
}

fn ui<S: KeyValueStore, C: Clock>(f: &mut Frame, ui_state: &mut UiState<'_, S, C>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with balance
            Constraint::Length(3), // Entry form
            Constraint::Min(0),    // Entry list
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], ui_state);
    render_form(f, chunks[1], ui_state);
    render_table(f, chunks[2], ui_state);
    render_status_bar(f, chunks[3], ui_state);

    if let Some(message) = ui_state.app.notification() {
        render_notification(f, message);
    }
}

fn classification_color(classification: Classification) -> Color {
    match classification {
        Classification::Income => Color::Green,
        Classification::Expense => Color::Red,
    }
}

fn render_header<S: KeyValueStore, C: Clock>(f: &mut Frame, area: Rect, ui_state: &UiState<'_, S, C>) {
    let view = ui_state.app.view();
    let income = view
        .rows
        .iter()
        .filter(|r| r.classification == Classification::Income)
        .count();
    let expenses = view.rows.len() - income;

    let balance_color = if view.balance.starts_with('-') {
        Color::Red
    } else {
        Color::Green
    };

    let spans = vec![
        Span::styled(
            " Expense Ledger",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled("Balance: ", Style::default().fg(Color::White)),
        Span::styled(
            view.balance.clone(),
            Style::default().fg(balance_color).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(format!("Entries: {}", view.rows.len()), Style::default().fg(Color::White)),
        Span::raw("  |  "),
        Span::styled(format!("↑ {}", income), Style::default().fg(Color::Green)),
        Span::raw("  "),
        Span::styled(format!("↓ {}", expenses), Style::default().fg(Color::Red)),
    ];

    let header = Paragraph::new(vec![Line::from(spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn render_form<S: KeyValueStore, C: Clock>(f: &mut Frame, area: Rect, ui_state: &UiState<'_, S, C>) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(50),
            Constraint::Percentage(20),
            Constraint::Percentage(30),
        ])
        .split(area);

    let fields = ui_state.app.fields();
    let max_date = ui_state.app.form().max_date().format("%Y-%m-%d").to_string();
    let inputs = [
        (Focus::Description, fields.description.as_str(), String::new()),
        (Focus::Amount, fields.amount.as_str(), String::new()),
        (Focus::Date, fields.date.as_str(), format!(" (max {})", max_date)),
    ];

    for (chunk, (focus, value, hint)) in chunks.iter().zip(inputs.iter()) {
        let focused = ui_state.focus == *focus;
        let border = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let mut text = value.to_string();
        if focused {
            text.push('▏');
        }

        let input = Paragraph::new(text).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(format!(" {}{} ", focus.title(), hint)),
        );
        f.render_widget(input, *chunk);
    }
}

fn render_table<S: KeyValueStore, C: Clock>(f: &mut Frame, area: Rect, ui_state: &mut UiState<'_, S, C>) {
    let header_cells = ["#", "Date", "Description", "Amount", "Type"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = ui_state.app.view().rows.iter().map(|row| {
        let color = classification_color(row.classification);

        let cells = vec![
            Cell::from(format!("{}", row.index + 1)),
            Cell::from(row.date.clone()),
            Cell::from(truncate(&row.description, 40)),
            Cell::from(row.amount.clone()).style(Style::default().fg(color)),
            Cell::from(row.classification.label()).style(Style::default().fg(color)),
        ];

        Row::new(cells).height(1)
    });

    let border = if ui_state.focus == Focus::List {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(5),
            Constraint::Length(12),
            Constraint::Length(42),
            Constraint::Length(14),
            Constraint::Length(9),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(" Entries "),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut ui_state.state);
}

fn render_status_bar<S: KeyValueStore, C: Clock>(f: &mut Frame, area: Rect, ui_state: &UiState<'_, S, C>) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow));

    let mut status_spans = vec![Span::styled(
        format!(" {} ", ui_state.focus.title()),
        Style::default().fg(Color::Cyan),
    )];

    if ui_state.app.form().pending_edit().is_some() {
        status_spans.push(Span::styled(" editing ", Style::default().fg(Color::Magenta)));
    }

    status_spans.push(Span::raw(" | "));
    if ui_state.focus.is_field() {
        status_spans.push(key("Enter"));
        status_spans.push(Span::raw(" Save | "));
        status_spans.push(key("Esc"));
        status_spans.push(Span::raw(" Clear | "));
    } else {
        status_spans.push(key("↑/↓"));
        status_spans.push(Span::raw(" Nav | "));
        status_spans.push(key("e"));
        status_spans.push(Span::raw(" Edit | "));
        status_spans.push(key("d"));
        status_spans.push(Span::raw(" Delete | "));
        status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
        status_spans.push(Span::raw(" Quit | "));
    }
    status_spans.push(key("Tab"));
    status_spans.push(Span::raw(" Next field"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn render_notification(f: &mut Frame, message: &str) {
    let area = centered_rect(50, 7, f.size());

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", message),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "  Press Enter to continue",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )),
    ];

    let popup = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title(" Invalid entry "),
    );

    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

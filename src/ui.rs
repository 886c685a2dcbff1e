use anyhow::Result;
use bundle_builder::{
    format_currency, BundleController, DiscountView, EventKind, PageModel, PricingConfig,
    SummaryView,
};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use std::io;

pub struct App {
    pub controller: BundleController<PageModel>,
    pub state: TableState,
}

impl App {
    pub fn new(page: PageModel, pricing: PricingConfig) -> Self {
        let mut state = TableState::default();
        if !page.cards().is_empty() {
            state.select(Some(0));
        }

        Self {
            controller: BundleController::new(page, pricing),
            state,
        }
    }

    fn product_count(&self) -> usize {
        self.controller.view().cards().len()
    }

    pub fn highlighted_id(&self) -> Option<String> {
        self.state
            .selected()
            .and_then(|i| self.controller.view().cards().get(i))
            .map(|card| card.id.clone())
    }

    pub fn next(&mut self) {
        let len = self.product_count();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.product_count();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn toggle_highlighted(&mut self) {
        if let Some(id) = self.highlighted_id() {
            self.controller.toggle_selection(&id);
        }
    }

    pub fn change_highlighted_quantity(&mut self, delta: i32) {
        if let Some(id) = self.highlighted_id() {
            self.controller.change_quantity(&id, delta);
        }
    }

    pub fn remove_highlighted(&mut self) {
        if let Some(id) = self.highlighted_id() {
            self.controller.remove_product(&id);
        }
    }

    pub fn showing_confirmation(&self) -> bool {
        self.controller.view().confirmation().is_some()
    }

    /// One-line description of the latest bundle event
    pub fn status(&self) -> String {
        let Some(event) = self.controller.events().back() else {
            return "Pick products to build your bundle".to_string();
        };

        match &event.kind {
            EventKind::ProductAdded { id } => format!("Added {} to bundle", id),
            EventKind::ProductRemoved { id } => format!("Removed {} from bundle", id),
            EventKind::QuantityChanged { id, quantity } => {
                format!("{} quantity is now {}", id, quantity)
            }
            EventKind::BundleConfirmed { total, .. } => {
                format!("Bundle added to cart ({})", format_currency(*total))
            }
            EventKind::BundleRejected { selected, required } => format!(
                "Not enough items selected for bundle ({}/{})",
                selected, required
            ),
            EventKind::BundleReset => "Bundle reset".to_string(),
            EventKind::ElementMissing { element } => format!("{} not found", element),
        }
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        // Any key closes the confirmation
        if app.showing_confirmation() {
            app.controller.view_mut().dismiss_confirmation();
            continue;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
            KeyCode::Down | KeyCode::Char('j') => app.next(),
            KeyCode::Up | KeyCode::Char('k') => app.previous(),
            KeyCode::Char(' ') | KeyCode::Enter => app.toggle_highlighted(),
            KeyCode::Char('+') | KeyCode::Char('=') => app.change_highlighted_quantity(1),
            KeyCode::Char('-') => app.change_highlighted_quantity(-1),
            KeyCode::Char('d') | KeyCode::Delete => app.remove_highlighted(),
            KeyCode::Char('a') => {
                app.controller.confirm_bundle();
            }
            KeyCode::Char('r') => app.controller.reset(),
            _ => {}
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Products + bundle
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(55), // Product list
            Constraint::Percentage(45), // Bundle summary
        ])
        .split(chunks[1]);

    render_products(f, content_chunks[0], app);
    render_bundle(f, content_chunks[1], app);
    render_status_bar(f, chunks[2], app);

    if app.showing_confirmation() {
        render_confirmation(f, app);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let pricing = app.controller.pricing();
    let state = app.controller.snapshot();

    let header_text = Line::from(vec![
        Span::styled(
            " BUNDLE BUILDER ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" │ "),
        Span::styled(
            format!(
                "{} of {} products selected",
                state.count, pricing.discount_threshold
            ),
            Style::default().fg(if state.has_discount {
                Color::Green
            } else {
                Color::Yellow
            }),
        ),
    ]);

    let header = Paragraph::new(header_text).block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn render_products(f: &mut Frame, area: Rect, app: &mut App) {
    let rows: Vec<Row> = app
        .controller
        .view()
        .cards()
        .iter()
        .map(|card| {
            let marker = if card.selected { "[x]" } else { "[ ]" };
            let button = if card.added { "Added" } else { "Add to Bundle" };
            let style = if card.selected {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(marker),
                Cell::from(truncate(&card.name, 28)),
                Cell::from(format_currency(card.price)),
                Cell::from(button),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Min(20),
            Constraint::Length(10),
            Constraint::Length(14),
        ],
    )
    .header(
        Row::new(vec!["", "Product", "Price", ""])
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().borders(Borders::ALL).title(" Products "))
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("> ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_bundle(f: &mut Frame, area: Rect, app: &App) {
    let view = app.controller.view();
    let mut content: Vec<Line> = vec![Line::from("")];

    match view.summary() {
        Some(SummaryView::Empty { message }) => {
            content.push(Line::from(Span::styled(
                format!("  {}", message),
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            )));
        }
        Some(SummaryView::Items { items }) => {
            for item in items {
                content.push(Line::from(vec![
                    Span::styled(
                        format!("  {}", truncate(&item.name, 22)),
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(format!("  {}", item.price_text)),
                    Span::styled(
                        format!("  − {} +", item.quantity),
                        Style::default().fg(Color::Yellow),
                    ),
                ]));
            }
        }
        None => {
            content.push(Line::from("  Selected products unavailable"));
        }
    }

    content.push(Line::from(""));
    content.push(Line::from("  ─────────────────────────────────────"));

    if let Some(DiscountView::Shown { text }) = view.discount() {
        content.push(Line::from(vec![
            Span::styled("  Discount: ", Style::default().fg(Color::Cyan)),
            Span::styled(text.clone(), Style::default().fg(Color::Green)),
        ]));
    }

    if let Some(total) = view.total() {
        content.push(Line::from(vec![
            Span::styled(
                "  Total:    ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                total.to_string(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        ]));
    }

    content.push(Line::from(""));

    if let Some(cta) = view.call_to_action() {
        let style = if cta.enabled {
            Style::default().fg(Color::Black).bg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        content.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(format!(" {} ", cta.label), style),
        ]));
    }

    let panel = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Your Bundle "),
    );

    f.render_widget(panel, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let status_text = Line::from(vec![
        Span::styled(
            format!(" {} ", app.status()),
            Style::default().fg(Color::Green),
        ),
        Span::raw(" │ "),
        Span::styled(
            "↑↓ move  Space toggle  +/- qty  d remove  a add to cart  r reset  q quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let status_bar = Paragraph::new(status_text).block(Block::default().borders(Borders::ALL));
    f.render_widget(status_bar, area);
}

fn render_confirmation(f: &mut Frame, app: &App) {
    let Some(confirmation) = app.controller.view().confirmation() else {
        return;
    };

    let area = centered_rect(50, 40, f.size());
    let mut lines: Vec<Line> = confirmation
        .message()
        .lines()
        .map(|line| Line::from(format!("  {}", line)))
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Press any key to close",
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
    )));

    let dialog = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green))
            .title(" Bundle Added "),
    );

    f.render_widget(Clear, area);
    f.render_widget(dialog, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
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
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bundle_builder::ProductCard;

    fn app() -> App {
        let cards = ["a", "b", "c"]
            .iter()
            .map(|id| ProductCard {
                id: id.to_string(),
                name: format!("Product {}", id),
                price: 10.0,
                image: String::new(),
                selected: false,
                added: false,
            })
            .collect();
        App::new(PageModel::new(cards), PricingConfig::default())
    }

    #[test]
    fn test_navigation_wraps() {
        let mut app = app();
        assert_eq!(app.highlighted_id(), Some("a".to_string()));

        app.previous();
        assert_eq!(app.highlighted_id(), Some("c".to_string()));

        app.next();
        assert_eq!(app.highlighted_id(), Some("a".to_string()));
    }

    #[test]
    fn test_keys_drive_controller() {
        let mut app = app();
        app.toggle_highlighted();
        app.change_highlighted_quantity(2);

        let state = app.controller.snapshot();
        assert_eq!(state.count, 1);
        assert_eq!(state.selected_products[0].quantity, 3);
        assert_eq!(app.status(), "a quantity is now 3");

        app.remove_highlighted();
        assert_eq!(app.controller.snapshot().count, 0);
    }

    #[test]
    fn test_confirmation_dialog_state() {
        let mut app = app();
        for _ in 0..3 {
            app.toggle_highlighted();
            app.next();
        }

        assert!(app.controller.confirm_bundle().is_some());
        assert!(app.showing_confirmation());

        app.controller.view_mut().dismiss_confirmation();
        assert!(!app.showing_confirmation());
        assert_eq!(app.controller.snapshot().count, 3);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long product name", 10), "a very ...");
    }
}

//! Ratatui-based terminal UI.
//!
//! Two views: the application form and the result screen. Submissions run
//! on a worker thread so the form stays responsive; replies come back over a
//! channel and are applied by the [`SubmissionController`] on the UI thread.

use std::io;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use tracing::debug;

use crate::client::{HttpPredictor, PredictionError, Predictor};
use crate::config::ServiceConfig;
use crate::domain::{FormField, PredictionOutcome, Validity};
use crate::error::{AppError, EXIT_RUNTIME};
use crate::session::result::BACK_ACTION;
use crate::session::{
    Begin, Completion, NoticeKind, ResultDisplay, ResultScreen, Session, SubmissionController, Ticket, View,
};

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];
/// Index of the submit row, placed after every form field.
const SUBMIT_ROW: usize = FormField::ALL.len();

/// Start the TUI.
pub fn run(config: &ServiceConfig) -> Result<(), AppError> {
    let predictor = HttpPredictor::new(config)?;
    let endpoint = predictor.endpoint().to_string();

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(Arc::new(predictor), endpoint);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(
                EXIT_RUNTIME,
                format!("Failed to enter alternate screen: {e}"),
            ));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// A finished request, sent back from the worker thread.
struct Reply {
    id: u64,
    result: Result<PredictionOutcome, PredictionError>,
}

struct App {
    session: Session,
    controller: SubmissionController,
    predictor: Arc<dyn Predictor>,
    endpoint: String,
    selected: usize,
    editing: bool,
    status: String,
    tick: usize,
    replies_tx: Sender<Reply>,
    replies_rx: Receiver<Reply>,
}

impl App {
    fn new(predictor: Arc<dyn Predictor>, endpoint: String) -> Self {
        let (replies_tx, replies_rx) = mpsc::channel();
        Self {
            session: Session::default(),
            controller: SubmissionController::new(),
            predictor,
            endpoint,
            selected: 0,
            editing: false,
            status: "Fill in the application and press s to submit.".to_string(),
            tick: 0,
            replies_tx,
            replies_rx,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if self.drain_replies() {
                needs_redraw = true;
            }

            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Event poll error: {e}")))?
            {
                if self.controller.is_submitting() {
                    self.tick = self.tick.wrapping_add(1);
                    needs_redraw = true;
                }
                continue;
            }

            match event::read().map_err(|e| AppError::new(EXIT_RUNTIME, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Apply any replies delivered by the worker. Returns whether state changed.
    fn drain_replies(&mut self) -> bool {
        let mut changed = false;
        loop {
            match self.replies_rx.try_recv() {
                Ok(reply) => {
                    self.apply_reply(reply);
                    changed = true;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        changed
    }

    fn apply_reply(&mut self, reply: Reply) {
        match self.controller.complete(&mut self.session, reply.id, reply.result) {
            Completion::Decided(decision) => {
                self.editing = false;
                self.status = format!("Decision received for submission #{}.", decision.submission_id);
            }
            Completion::Failed(_) => {
                self.status = "Submission failed. Adjust the form and try again.".to_string();
            }
            Completion::Stale => {}
        }
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.session.notice().is_some() {
            self.session.dismiss_notice();
            return false;
        }

        let on_result = matches!(self.session.view(), View::Result(_));
        if on_result {
            self.handle_result_key(code)
        } else if self.editing {
            self.handle_edit_key(code);
            false
        } else {
            self.handle_form_key(code)
        }
    }

    fn handle_result_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('b') | KeyCode::Enter | KeyCode::Esc | KeyCode::Backspace => {
                self.session.back_to_form();
                self.status = "Back on the application form.".to_string();
            }
            _ => {}
        }
        false
    }

    fn handle_form_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Up | KeyCode::BackTab => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Tab => {
                if self.selected < SUBMIT_ROW {
                    self.selected += 1;
                }
            }
            KeyCode::Left => self.cycle_selected(false),
            KeyCode::Right => self.cycle_selected(true),
            KeyCode::Char('s') => self.submit(),
            KeyCode::Char('v') => {
                self.session.open_result();
            }
            KeyCode::Enter => match self.selected_field() {
                None => self.submit(),
                Some(field) if field.is_text() => self.start_editing(field),
                Some(_) => self.cycle_selected(true),
            },
            KeyCode::Char(c) if is_number_char(c) => {
                if let Some(field) = self.selected_field().filter(|f| f.is_text()) {
                    self.start_editing(field);
                    self.handle_edit_key(KeyCode::Char(c));
                }
            }
            _ => {}
        }
        false
    }

    fn handle_edit_key(&mut self, code: KeyCode) {
        let Some(input) = self
            .selected_field()
            .and_then(|field| self.session.form.text_input_mut(field))
        else {
            self.editing = false;
            return;
        };

        match code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Up | KeyCode::Down | KeyCode::Tab => {
                self.editing = false;
                self.status = String::new();
            }
            KeyCode::Backspace => input.pop(),
            KeyCode::Char(c) if is_number_char(c) => input.push(c),
            _ => {}
        }
    }

    fn start_editing(&mut self, field: FormField) {
        self.editing = true;
        self.status = format!("Editing {}. Enter to finish.", field.display_name());
    }

    fn cycle_selected(&mut self, forward: bool) {
        if let Some(field) = self.selected_field() {
            self.session.form.cycle(field, forward);
        }
    }

    fn selected_field(&self) -> Option<FormField> {
        FormField::ALL.get(self.selected).copied()
    }

    fn submit(&mut self) {
        self.editing = false;
        match self.controller.begin(&mut self.session) {
            Begin::Started(ticket) => {
                self.status = format!("Submitting to {}...", self.endpoint);
                self.dispatch(ticket);
            }
            Begin::Ignored => {}
            Begin::Invalid(_) => {
                self.status = "Fix the highlighted fields.".to_string();
            }
        }
    }

    fn dispatch(&self, ticket: Ticket) {
        let predictor = Arc::clone(&self.predictor);
        let tx = self.replies_tx.clone();
        thread::spawn(move || {
            let result = predictor.predict(&ticket.payload);
            if tx.send(Reply { id: ticket.id, result }).is_err() {
                debug!(submission_id = ticket.id, "UI closed before the reply arrived");
            }
        });
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        match self.session.view() {
            View::Form => self.draw_form(frame, chunks[1]),
            View::Result(screen) => draw_result(frame, chunks[1], screen),
        }
        self.draw_footer(frame, chunks[2]);

        if let Some(notice) = self.session.notice() {
            draw_notice(frame, size, notice.kind, &notice.message);
        }
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let lines = vec![
            Line::from(vec![
                Span::styled(
                    "Loan Portal",
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ),
                Span::raw(" - decision tree approval model"),
            ]),
            Line::from(Span::styled(
                format!("service: {}", self.endpoint),
                Style::default().fg(Color::Gray),
            )),
        ];
        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_form(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let form = &self.session.form;
        let mut items: Vec<ListItem> = Vec::with_capacity(SUBMIT_ROW + 1);

        for (idx, field) in FormField::ALL.iter().copied().enumerate() {
            let editing_here = self.editing && idx == self.selected;
            let mut value = form.display_value(field);
            if editing_here {
                value.push('▏');
            }

            let invalid = form
                .text_input(field)
                .is_some_and(|input| input.validity() == Validity::Invalid);
            let value_style = if invalid {
                Style::default().fg(Color::Red)
            } else if field.is_read_only() {
                Style::default().fg(Color::DarkGray)
            } else if editing_here {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };

            let mut spans = vec![
                Span::styled(
                    format!("{:<20}", field.display_name()),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(value, value_style),
            ];
            if invalid {
                spans.push(Span::styled("  not a number", Style::default().fg(Color::Red)));
            }
            items.push(ListItem::new(Line::from(spans)));
        }

        let submit = if self.controller.is_submitting() {
            Span::styled(
                format!("[ Processing... {} ]", SPINNER[self.tick % SPINNER.len()]),
                Style::default().fg(Color::DarkGray),
            )
        } else {
            Span::styled(
                "[ Run Tree Prediction ]",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )
        };
        items.push(ListItem::new(Line::from(submit)));

        let list = List::new(items)
            .block(Block::default().title("Application Details").borders(Borders::ALL))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = match self.session.view() {
            View::Form if self.editing => "type digits  Backspace delete  Enter done",
            View::Form => "↑/↓ select  ←/→ change  Enter edit  s submit  v result  q quit",
            View::Result(_) => "b back  q quit",
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(self.status.as_str(), Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn draw_result(frame: &mut ratatui::Frame<'_>, area: Rect, screen: &ResultScreen) {
    let mut lines = vec![Line::raw("")];
    match screen {
        ResultScreen::Decided {
            display,
            submission_id,
            decided_at,
        } => {
            let color = match display {
                ResultDisplay::Approved => Color::Green,
                ResultDisplay::Rejected => Color::Red,
            };
            lines.push(Line::from(Span::styled(
                format!("{}  {}", display.symbol(), display.headline()),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled(
                format!(
                    "submission #{submission_id} at {}",
                    decided_at.format("%Y-%m-%d %H:%M:%S")
                ),
                Style::default().fg(Color::Gray),
            )));
        }
        ResultScreen::NoResult => {
            lines.push(Line::from(Span::styled(
                "No result yet",
                Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled(
                "Submit an application to get a decision.",
                Style::default().fg(Color::Gray),
            )));
        }
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        format!("[b] {BACK_ACTION}"),
        Style::default().fg(Color::Green),
    )));

    let p = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Center)
        .block(Block::default().title("Result").borders(Borders::ALL));
    frame.render_widget(p, area);
}

fn draw_notice(frame: &mut ratatui::Frame<'_>, area: Rect, kind: NoticeKind, message: &str) {
    let rect = centered_rect(area, 60, 9);
    frame.render_widget(Clear, rect);

    let color = match kind {
        NoticeKind::Validation => Color::Yellow,
        NoticeKind::Network | NoticeKind::Service => Color::Red,
    };
    let text = Text::from(vec![
        Line::raw(message.to_string()),
        Line::raw(""),
        Line::from(Span::styled(
            "(press any key to dismiss)",
            Style::default().fg(Color::Gray),
        )),
    ]);
    let p = Paragraph::new(text).wrap(Wrap { trim: true }).block(
        Block::default()
            .title(kind.title())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color)),
    );
    frame.render_widget(p, rect);
}

/// A `width_pct`% wide, `height`-row box centred in `area`.
fn centered_rect(area: Rect, width_pct: u16, height: u16) -> Rect {
    let width = (u32::from(area.width) * u32::from(width_pct) / 100) as u16;
    let width = width.max(20).min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RequestPayload;
    use crate::session::SubmissionStatus;

    struct FixedPredictor(Result<PredictionOutcome, PredictionError>);

    impl Predictor for FixedPredictor {
        fn predict(&self, _payload: &RequestPayload) -> Result<PredictionOutcome, PredictionError> {
            self.0.clone()
        }
    }

    fn app(result: Result<PredictionOutcome, PredictionError>) -> App {
        App::new(Arc::new(FixedPredictor(result)), "http://127.0.0.1:8000/predict".to_string())
    }

    fn wait_for_reply(app: &mut App) {
        let reply = app
            .replies_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("worker reply");
        app.apply_reply(reply);
    }

    fn select(app: &mut App, field: FormField) {
        app.selected = FormField::ALL.iter().position(|f| *f == field).unwrap();
    }

    #[test]
    fn typing_edits_selected_amount() {
        let mut app = app(Ok(PredictionOutcome::Approved));
        select(&mut app, FormField::LoanAmount);

        app.handle_key(KeyCode::Enter);
        assert!(app.editing);
        app.handle_key(KeyCode::Backspace);
        app.handle_key(KeyCode::Char('7'));
        app.handle_key(KeyCode::Char('x'));
        app.handle_key(KeyCode::Enter);

        assert!(!app.editing);
        assert_eq!(app.session.form.loan_amount.raw(), "157");
    }

    #[test]
    fn submit_runs_on_worker_and_shows_result() {
        let mut app = app(Ok(PredictionOutcome::Approved));
        app.handle_key(KeyCode::Char('s'));
        assert_eq!(app.controller.status(), SubmissionStatus::Submitting);

        // A second trigger while in flight does not start another request.
        app.handle_key(KeyCode::Char('s'));
        wait_for_reply(&mut app);
        assert!(app.replies_rx.try_recv().is_err());

        assert!(matches!(
            app.session.view(),
            View::Result(ResultScreen::Decided { display: ResultDisplay::Approved, .. })
        ));

        app.handle_key(KeyCode::Char('b'));
        assert_eq!(app.session.view(), &View::Form);
        assert!(app.session.decision().is_some());
    }

    #[test]
    fn decision_arriving_mid_edit_ends_edit_mode() {
        let mut app = app(Ok(PredictionOutcome::Approved));
        app.handle_key(KeyCode::Char('s'));
        select(&mut app, FormField::LoanAmount);
        app.handle_key(KeyCode::Enter);
        assert!(app.editing);

        wait_for_reply(&mut app);
        assert!(!app.editing);

        app.handle_key(KeyCode::Char('b'));
        assert_eq!(app.session.view(), &View::Form);
        assert!(!app.editing);
    }

    #[test]
    fn failure_notice_is_dismissed_by_any_key() {
        let mut app = app(Err(PredictionError::Service {
            detail: "model unavailable".to_string(),
        }));
        app.handle_key(KeyCode::Char('s'));
        wait_for_reply(&mut app);

        assert_eq!(app.session.notice().unwrap().message, "model unavailable");
        assert_eq!(app.session.view(), &View::Form);

        // The dismissing key is swallowed.
        assert!(!app.handle_key(KeyCode::Char('q')));
        assert!(app.session.notice().is_none());
    }

    #[test]
    fn result_without_decision_is_neutral() {
        let mut app = app(Ok(PredictionOutcome::Rejected));
        app.handle_key(KeyCode::Char('v'));
        assert_eq!(app.session.view(), &View::Result(ResultScreen::NoResult));
    }

    #[test]
    fn invalid_amount_never_reaches_worker() {
        let mut app = app(Ok(PredictionOutcome::Approved));
        app.session.form.applicant_income.set_raw("abc");
        app.handle_key(KeyCode::Char('s'));

        assert_eq!(app.controller.status(), SubmissionStatus::Idle);
        assert_eq!(app.session.notice().unwrap().kind, NoticeKind::Validation);
        assert!(
            app.replies_rx
                .recv_timeout(Duration::from_millis(100))
                .is_err()
        );
    }
}

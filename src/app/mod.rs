pub mod config;
pub mod i18n;
pub mod view;
pub mod widgets;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use log::{debug, info, warn};
use ratatui::{prelude::*, style::palette::tailwind, widgets::*, DefaultTerminal};
use std::{
    sync::mpsc::{self, Receiver, Sender},
    time::{Duration, Instant},
};

use crate::{
    app::{
        config::AppConfig,
        i18n::Translator,
        view::{DashboardView, Size},
        widgets::{flow_line, MeterBar},
    },
    cmd::{
        fetch::TelemetrySource,
        helper::spawn_helper,
        poll_state::PollTiming,
        spawn_poller,
        telemetry::Telemetry,
        Message,
    },
    error::AppError,
};

struct AppStyle {
    frame_fg: Color,
    title_fg: Color,
    error_fg: Color,
    dumping: Color,
    inssuficient: Color,
    consuming: Color,
}

pub struct App {
    exit: bool,
    dirty: bool,
    full_redraw: bool,
    last_snapshot: Option<Telemetry>,
    auth_failed: bool,
    last_error: Option<String>,
    style: AppStyle,
    translator: Translator,
    config: AppConfig,
    last_render: Instant,
    tx: Sender<Message>,
    rx: Receiver<Message>,
}

impl App {
    const TICK_RATE: Duration = Duration::from_millis(100);

    pub fn new(config: AppConfig) -> Self {
        let (tx, rx) = mpsc::channel();
        let app_style = AppStyle {
            frame_fg: tailwind::YELLOW.c300,
            title_fg: tailwind::ZINC.c100,
            error_fg: tailwind::PINK.c400,
            dumping: tailwind::LIME.c400,
            inssuficient: tailwind::AMBER.c400,
            consuming: tailwind::RED.c400,
        };
        Self {
            exit: false,
            dirty: true,
            full_redraw: false,
            last_snapshot: None,
            auth_failed: false,
            last_error: None,
            style: app_style,
            translator: Translator::new(&config.language),
            config,
            last_render: Instant::now(),
            tx,
            rx,
        }
    }

    pub async fn run(&mut self, mut terminal: DefaultTerminal) -> Result<(), AppError> {
        let source = TelemetrySource::new(self.config.server.clone(), self.config.request_timeout)?;
        let timing = PollTiming {
            update_interval: self.config.update_interval,
            retry_delay: self.config.retry_delay,
        };
        let helper = spawn_helper(self.tx.clone());
        let poller = spawn_poller(source, timing, self.tx.clone(), helper);
        info!("Polling {} every {:?}", self.config.server, self.config.update_interval);

        let result = self.event_loop(&mut terminal).await;
        poller.abort();
        Ok(result?)
    }

    async fn event_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<(), std::io::Error> {
        while !self.exit {
            while let Ok(msg) = self.rx.try_recv() {
                self.handle_message(msg);
            }
            if self.full_redraw {
                terminal.clear()?;
                self.full_redraw = false;
                self.dirty = true;
            }
            if self.dirty || self.last_render.elapsed() >= self.config.update_interval {
                terminal.draw(|frame| self.ui(frame))?;
                self.dirty = false;
                self.last_render = Instant::now();
            }
            self.handle_keyboard_events()?;
            tokio::time::sleep(Self::TICK_RATE).await;
        }
        Ok(())
    }

    pub fn handle_message(&mut self, msg: Message) {
        match msg {
            Message::Telemetry(telemetry) => {
                // Render right away on the first snapshot, then on the render tick.
                if self.last_snapshot.is_none() {
                    self.dirty = true;
                }
                self.last_snapshot = Some(telemetry);
                self.last_error = None;
            }
            Message::FetchFailed(err) => {
                self.last_error = Some(err);
            }
            Message::AuthFailed => {
                if !self.auth_failed {
                    warn!("Authorization failed, showing last known state");
                }
                self.auth_failed = true;
                self.dirty = true;
            }
            Message::Notification(notification) => {
                debug!("Helper replied to {}: {}", notification.name, notification.payload);
                self.dirty = true;
            }
        }
    }

    pub fn view(&self) -> DashboardView {
        DashboardView::build(
            &self.config,
            &self.translator,
            self.last_snapshot.as_ref(),
            self.auth_failed,
        )
    }

    fn handle_keyboard_events(&mut self) -> Result<(), std::io::Error> {
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => self.exit = true,
                    KeyCode::Char('r') => self.full_redraw = true,
                    _ => {}
                },
                Event::Resize(_, _) => self.dirty = true,
                _ => {}
            }
        }
        Ok(())
    }

    fn ui(&self, frame: &mut Frame) {
        let view = self.view();
        let block = Block::new()
            .borders(Borders::ALL)
            .padding(Padding::horizontal(2))
            .fg(self.style.frame_fg);
        let block = match &view.title {
            Some(title) => block.title(
                Line::from(title.as_str())
                    .centered()
                    .style(Style::default().fg(self.style.title_fg).bold()),
            ),
            None => block,
        };
        let inner = block.inner(frame.area());
        frame.render_widget(block, frame.area());

        let mut constraints = Vec::new();
        if view.error.is_some() {
            constraints.push(Constraint::Length(1));
        }
        if view.loading.is_some() {
            constraints.push(Constraint::Length(1));
        }
        if view.flow.is_some() {
            constraints.push(Constraint::Length(2));
        }
        for meter in &view.meters {
            let gap = if meter.size == Size::Large { 1 } else { 0 };
            constraints.push(Constraint::Length(MeterBar::HEIGHT + gap));
        }
        if view.status.is_some() {
            constraints.push(Constraint::Length(1));
        }
        // Once data is on screen, a failing fetch shows under the status line.
        let stale = view.loading.is_none().then_some(self.last_error.as_ref()).flatten();
        if stale.is_some() {
            constraints.push(Constraint::Length(1));
        }
        constraints.push(Constraint::Min(0));
        let rows = Layout::vertical(constraints).split(inner);
        let mut rows = rows.iter();

        if let Some(error) = &view.error {
            let Some(area) = rows.next() else { return };
            frame.render_widget(
                Paragraph::new(error.as_str()).fg(self.style.error_fg).bold(),
                *area,
            );
        }
        if let Some(loading) = &view.loading {
            let Some(area) = rows.next() else { return };
            let text = match &self.last_error {
                Some(err) => format!("{loading} ({err})"),
                None => loading.clone(),
            };
            frame.render_widget(Paragraph::new(text).fg(self.style.title_fg), *area);
        }
        if let Some(flow) = &view.flow {
            let Some(area) = rows.next() else { return };
            frame.render_widget(Paragraph::new(flow_line(flow)), *area);
        }
        for meter in &view.meters {
            if let Some(area) = rows.next() {
                frame.render_widget(MeterBar::new(meter), *area);
            }
        }
        if let Some(status) = &view.status {
            let Some(area) = rows.next() else { return };
            let color = match status.status {
                view::SystemStatus::Dumping => self.style.dumping,
                view::SystemStatus::Inssuficient => self.style.inssuficient,
                view::SystemStatus::Consuming => self.style.consuming,
            };
            let line = Line::from(vec![
                Span::raw(format!("{}: ", status.label)).fg(self.style.title_fg),
                Span::styled(status.value.clone(), Style::default().fg(color).bold()),
            ]);
            frame.render_widget(Paragraph::new(line), *area);
        }
        if let Some(err) = stale {
            let Some(area) = rows.next() else { return };
            frame.render_widget(Paragraph::new(err.as_str()).fg(self.style.error_fg).dim(), *area);
        }
    }
}

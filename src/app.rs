use std::sync::Arc;

use async_channel::Sender;
use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ihdathi::coords::{
    run_conversion, ConversionForm, Direction as ConversionDirection, Field, FixedDelay,
    Scheduler, UtmZone,
};
use ratatui::{
    prelude::*,
    widgets::block::{Position, Title},
    widgets::*,
};

use crate::{
    action::Action,
    components::{
        button::ConvertButton, field::CoordinateField, result::ResultPanel, selector::Selector,
        Component,
    },
    config::{key_event_to_string, Config},
    focus::{self, FocusTarget},
    mode::Mode,
    styles::{ERROR_COLOR, FOCUSED_COLOR},
    tui::{self, Frame},
};

const CARD_TITLE: &str = " تحويل الإحداثيات ";
const CARD_DESCRIPTION: &str = " تحويل بين أنظمة الإحداثيات المختلفة ";

pub struct App {
    pub config: Config,
    pub tick_rate: f64,
    pub frame_rate: f64,
    pub components: Vec<Box<dyn Component>>,
    pub should_quit: bool,
    pub should_suspend: bool,
    pub mode: Mode,
    pub focus: FocusTarget,
    pub form: ConversionForm,
    pub scheduler: Arc<dyn Scheduler>,
    pub last_error: Option<String>,
    pub last_tick_key_events: Vec<KeyEvent>,
}

impl App {
    pub fn new(
        tick_rate: f64,
        frame_rate: f64,
        direction: ConversionDirection,
        zone: UtmZone,
    ) -> Result<Self> {
        let config = Config::new()?;
        let form = ConversionForm::new(direction, zone);
        Ok(Self::with_config(config, tick_rate, frame_rate, form))
    }

    pub fn with_config(
        config: Config,
        tick_rate: f64,
        frame_rate: f64,
        form: ConversionForm,
    ) -> Self {
        let scheduler = Arc::new(FixedDelay(config.conversion.delay()));
        let components: Vec<Box<dyn Component>> = vec![
            Box::new(Selector::direction(true)),
            Box::new(Selector::zone()),
            Box::new(CoordinateField::new(Field::Easting)),
            Box::new(CoordinateField::new(Field::Northing)),
            Box::new(CoordinateField::new(Field::Latitude)),
            Box::new(CoordinateField::new(Field::Longitude)),
            Box::new(ConvertButton::new()),
            Box::new(ResultPanel::new()),
        ];
        Self {
            config,
            tick_rate,
            frame_rate,
            components,
            should_quit: false,
            should_suspend: false,
            mode: Mode::default(),
            focus: FocusTarget::default(),
            form,
            scheduler,
            last_error: None,
            last_tick_key_events: Vec::new(),
        }
    }

    /// Focusable rows currently on screen, top to bottom.
    fn focus_order(&self) -> Vec<FocusTarget> {
        self.components
            .iter()
            .filter(|component| component.visible(&self.form))
            .filter_map(|component| component.focus_target())
            .collect()
    }

    pub async fn run(&mut self) -> Result<()> {
        let (action_tx, action_rx) = async_channel::unbounded();

        let mut tui = tui::Tui::new()?
            .tick_rate(self.tick_rate)
            .frame_rate(self.frame_rate)
            .paste(true);
        tui.enter()?;

        loop {
            if let Some(e) = tui.next().await {
                match e {
                    tui::Event::Closed => action_tx.send(Action::Quit).await?,
                    tui::Event::Error => {
                        action_tx
                            .send(Action::Error("Failed to read terminal event".to_string()))
                            .await?
                    }
                    tui::Event::Tick => action_tx.send(Action::Tick).await?,
                    tui::Event::Render => action_tx.send(Action::Render).await?,
                    tui::Event::Resize(x, y) => action_tx.send(Action::Resize(x, y)).await?,
                    tui::Event::Key(key) => {
                        if let Some(keymap) = self.config.keybindings.get(&self.mode) {
                            if let Some(action) = keymap.get(&vec![key]) {
                                log::info!("Got action: {action:?}");
                                action_tx.send(action.clone()).await?;
                            } else {
                                // If the key was not handled as a single key action,
                                // then consider it for multi-key combinations.
                                self.last_tick_key_events.push(key);

                                if let Some(action) = keymap.get(&self.last_tick_key_events) {
                                    log::info!("Got action: {action:?}");
                                    action_tx.send(action.clone()).await?;
                                } else {
                                    log::trace!("Unbound key: {}", key_event_to_string(&key));
                                }
                            }
                        };
                    }
                    _ => {}
                }
                for component in self.components.iter_mut() {
                    if let Some(action) = component.handle_events(Some(e.clone()))? {
                        action_tx.send(action).await?;
                    }
                }
            }

            while let Ok(action) = action_rx.try_recv() {
                if action != Action::Tick && action != Action::Render {
                    log::debug!("{action:?}");
                }
                match action {
                    Action::Resize(w, h) => {
                        tui.resize(Rect::new(0, 0, w, h))?;
                        self.draw(&mut tui, &action_tx).await?;
                    }
                    Action::Render => self.draw(&mut tui, &action_tx).await?,
                    action => self.dispatch(action, &action_tx).await?,
                }
            }
            if self.should_suspend {
                tui.suspend()?;
                action_tx.send(Action::Resume).await?;
                tui = tui::Tui::new()?
                    .tick_rate(self.tick_rate)
                    .frame_rate(self.frame_rate)
                    .paste(true);
                tui.enter()?;
            } else if self.should_quit {
                tui.stop()?;
                break;
            }
        }
        tui.exit()?;
        Ok(())
    }

    async fn draw(&mut self, tui: &mut tui::Tui, action_tx: &Sender<Action>) -> Result<()> {
        let mut failure = None;
        tui.draw(|f| {
            if let Err(e) = self.render(f) {
                failure = Some(e);
            }
        })?;
        if let Some(e) = failure {
            action_tx
                .send(Action::Error(format!("Failed to draw: {:?}", e)))
                .await?;
        }
        Ok(())
    }

    fn render(&mut self, f: &mut Frame<'_>) -> Result<()> {
        let area = f.size();
        let mode_hint = match self.mode {
            Mode::Navigate => " NAVIGATE ",
            Mode::Insert => " INSERT ",
        };

        let mut card = Block::default()
            .title(Title::from(CARD_TITLE).alignment(Alignment::Right))
            .title(Title::from(mode_hint).alignment(Alignment::Left))
            .title(
                Title::from(CARD_DESCRIPTION)
                    .position(Position::Bottom)
                    .alignment(Alignment::Right),
            )
            .borders(Borders::ALL)
            .border_type(BorderType::Thick)
            .style(Style::default().fg(FOCUSED_COLOR).bg(Color::Black));
        if let Some(error) = &self.last_error {
            card = card.title(
                Title::from(Span::styled(
                    format!(" {error} "),
                    Style::default().fg(ERROR_COLOR),
                ))
                .position(Position::Bottom)
                .alignment(Alignment::Left),
            );
        }
        let inner = card.inner(area).inner(&Margin::new(1, 0));
        f.render_widget(card, area);

        let form = &self.form;
        let mut rows: Vec<&mut Box<dyn Component>> = self
            .components
            .iter_mut()
            .filter(|component| component.visible(form))
            .collect();
        let mut constraints: Vec<Constraint> = rows.iter().map(|row| row.constraint()).collect();
        constraints.push(Constraint::Min(0));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);
        for (row, chunk) in rows.iter_mut().zip(chunks.iter()) {
            row.draw(f, *chunk, form)?;
        }
        Ok(())
    }

    /// Applies a non-terminal action to the app, then lets every component see it.
    pub async fn dispatch(&mut self, action: Action, action_tx: &Sender<Action>) -> Result<()> {
        if action == Action::SwitchMode(Mode::Insert) && self.focus.field().is_none() {
            log::debug!("Insert mode needs a focused field, focus is {:?}", self.focus);
            return Ok(());
        }

        match action.clone() {
            Action::Tick => {
                self.last_tick_key_events.drain(..);
            }
            Action::Quit => self.should_quit = true,
            Action::Suspend => self.should_suspend = true,
            Action::Resume => self.should_suspend = false,
            Action::Error(message) => {
                log::error!("{message}");
                self.last_error = Some(message);
            }
            Action::SwitchMode(mode) => self.mode = mode,
            Action::FocusNext | Action::FocusPrevious => {
                let forward = action == Action::FocusNext;
                let target = focus::step(&self.focus_order(), self.focus, forward);
                action_tx.send(Action::Focus(target)).await?;
            }
            Action::Focus(target) => {
                self.focus = target;
                if self.mode == Mode::Insert && target.field().is_none() {
                    action_tx.send(Action::SwitchMode(Mode::Navigate)).await?;
                }
            }
            Action::Activate => {
                let next = match self.focus {
                    FocusTarget::Field(_) => Action::SwitchMode(Mode::Insert),
                    FocusTarget::Convert => Action::Convert,
                    FocusTarget::Direction | FocusTarget::Zone => Action::SelectNext,
                };
                action_tx.send(next).await?;
            }
            Action::SelectNext | Action::SelectPrevious => {
                let forward = action == Action::SelectNext;
                match self.focus {
                    FocusTarget::Direction => {
                        let current = self.form.direction();
                        self.form.set_direction(if forward {
                            current.next()
                        } else {
                            current.previous()
                        });
                    }
                    FocusTarget::Zone => {
                        let current = self.form.zone();
                        self.form.select_zone(if forward {
                            current.next()
                        } else {
                            current.previous()
                        });
                    }
                    _ => {}
                }
            }
            Action::InsertChar(c) => self.edit_focused_field(|value| value.push(c)),
            Action::DeleteChar => self.edit_focused_field(|value| {
                value.pop();
            }),
            Action::Paste(text) => self.edit_focused_field(|value| {
                value.extend(text.chars().filter(|c| !c.is_control()));
            }),
            Action::ClearField => self.edit_focused_field(String::clear),
            Action::Convert => self.start_conversion(action_tx)?,
            Action::ConversionFinished(result) => {
                self.form.finish_conversion(result);
            }
            Action::CopyResult => {
                if let Some(result) = self.form.result() {
                    let copied = arboard::Clipboard::new()
                        .and_then(|mut clipboard| clipboard.set_text(result.to_string()));
                    if let Err(e) = copied {
                        action_tx
                            .send(Action::Error(format!("Failed to copy result: {e}")))
                            .await?;
                    }
                }
            }
            _ => {}
        }

        for component in self.components.iter_mut() {
            if let Some(action) = component.update(action.clone())? {
                action_tx.send(action).await?
            };
        }
        Ok(())
    }

    fn edit_focused_field(&mut self, edit: impl FnOnce(&mut String)) {
        let Some(field) = self.focus.field() else {
            return;
        };
        let mut value = self.form.value(field).to_string();
        edit(&mut value);
        self.form.update_field(field, value);
    }

    fn start_conversion(&mut self, action_tx: &Sender<Action>) -> Result<()> {
        // The button is disabled while busy; the form itself would accept it.
        if self.form.is_busy() {
            log::debug!("Conversion already pending, ignoring request");
            return Ok(());
        }
        self.last_error = None;

        let pending = self.form.begin_conversion();
        log::info!("Converting {}", serde_json::to_string(&pending)?);

        let scheduler = Arc::clone(&self.scheduler);
        let action_tx = action_tx.clone();
        tokio::spawn(async move {
            let result = run_conversion(pending, scheduler.as_ref()).await;
            action_tx
                .send(Action::ConversionFinished(result))
                .await
                .ok();
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_channel::Receiver;
    use ihdathi::coords::ConversionResult;
    use pretty_assertions::assert_eq;

    fn app(direction: ConversionDirection) -> App {
        let form = ConversionForm::new(direction, UtmZone::default());
        App::with_config(Config::default(), 1.0, 4.0, form)
    }

    /// Dispatches `action` and everything it queues, without waiting on timers.
    async fn settle(
        app: &mut App,
        action: Action,
        tx: &Sender<Action>,
        rx: &Receiver<Action>,
    ) -> Result<()> {
        app.dispatch(action, tx).await?;
        while let Ok(next) = rx.try_recv() {
            app.dispatch(next, tx).await?;
        }
        Ok(())
    }

    async fn type_into(
        app: &mut App,
        field: Field,
        text: &str,
        tx: &Sender<Action>,
        rx: &Receiver<Action>,
    ) -> Result<()> {
        settle(app, Action::Focus(FocusTarget::Field(field)), tx, rx).await?;
        settle(app, Action::SwitchMode(Mode::Insert), tx, rx).await?;
        for c in text.chars() {
            settle(app, Action::InsertChar(c), tx, rx).await?;
        }
        settle(app, Action::SwitchMode(Mode::Navigate), tx, rx).await
    }

    #[tokio::test(start_paused = true)]
    async fn conversion_resolves_after_the_delay() -> Result<()> {
        let (tx, rx) = async_channel::unbounded();
        let mut app = app(ConversionDirection::UtmToGeographic);
        type_into(&mut app, Field::Easting, "500000", &tx, &rx).await?;
        type_into(&mut app, Field::Northing, "1000000", &tx, &rx).await?;

        settle(&mut app, Action::Convert, &tx, &rx).await?;
        assert!(app.form.is_busy());
        assert_eq!(app.form.result(), None);

        // A second request while busy is dropped by the host.
        settle(&mut app, Action::Convert, &tx, &rx).await?;

        let finished = rx.recv().await?;
        settle(&mut app, finished, &tx, &rx).await?;
        assert!(!app.form.is_busy());
        assert_eq!(
            app.form.result(),
            Some(&ConversionResult::Geographic {
                latitude: "8.983112".to_string(),
                longitude: "4.491556".to_string(),
            })
        );

        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn empty_fields_report_missing_input() -> Result<()> {
        let (tx, rx) = async_channel::unbounded();
        let mut app = app(ConversionDirection::GeographicToUtm);
        type_into(&mut app, Field::Latitude, "30", &tx, &rx).await?;

        settle(&mut app, Action::Convert, &tx, &rx).await?;
        let finished = rx.recv().await?;
        settle(&mut app, finished, &tx, &rx).await?;
        assert_eq!(app.form.result(), Some(&ConversionResult::MissingInput));
        Ok(())
    }

    #[tokio::test]
    async fn focus_skips_rows_hidden_by_the_direction() -> Result<()> {
        let (tx, rx) = async_channel::unbounded();
        let mut app = app(ConversionDirection::GeographicToUtm);

        settle(&mut app, Action::FocusNext, &tx, &rx).await?;
        assert_eq!(app.focus, FocusTarget::Field(Field::Latitude));
        settle(&mut app, Action::FocusPrevious, &tx, &rx).await?;
        settle(&mut app, Action::FocusPrevious, &tx, &rx).await?;
        assert_eq!(app.focus, FocusTarget::Convert);
        Ok(())
    }

    #[tokio::test]
    async fn insert_mode_needs_a_field() -> Result<()> {
        let (tx, rx) = async_channel::unbounded();
        let mut app = app(ConversionDirection::UtmToGeographic);

        settle(&mut app, Action::SwitchMode(Mode::Insert), &tx, &rx).await?;
        assert_eq!(app.mode, Mode::Navigate);

        settle(&mut app, Action::Focus(FocusTarget::Field(Field::Easting)), &tx, &rx).await?;
        settle(&mut app, Action::Activate, &tx, &rx).await?;
        assert_eq!(app.mode, Mode::Insert);

        settle(&mut app, Action::FocusNext, &tx, &rx).await?;
        assert_eq!(app.focus, FocusTarget::Field(Field::Northing));
        assert_eq!(app.mode, Mode::Insert);

        settle(&mut app, Action::FocusNext, &tx, &rx).await?;
        assert_eq!(app.focus, FocusTarget::Convert);
        assert_eq!(app.mode, Mode::Navigate);
        Ok(())
    }

    #[tokio::test]
    async fn editing_touches_only_the_focused_field() -> Result<()> {
        let (tx, rx) = async_channel::unbounded();
        let mut app = app(ConversionDirection::UtmToGeographic);
        type_into(&mut app, Field::Easting, "5000x", &tx, &rx).await?;

        settle(&mut app, Action::DeleteChar, &tx, &rx).await?;
        settle(&mut app, Action::Paste("0\n0".to_string()), &tx, &rx).await?;
        assert_eq!(app.form.value(Field::Easting), "500000");
        assert_eq!(app.form.value(Field::Northing), "");

        settle(&mut app, Action::ClearField, &tx, &rx).await?;
        assert_eq!(app.form.value(Field::Easting), "");
        Ok(())
    }

    #[tokio::test]
    async fn selects_cycle_the_focused_choice() -> Result<()> {
        let (tx, rx) = async_channel::unbounded();
        let mut app = app(ConversionDirection::UtmToGeographic);
        type_into(&mut app, Field::Easting, "500000", &tx, &rx).await?;

        settle(&mut app, Action::Focus(FocusTarget::Zone), &tx, &rx).await?;
        settle(&mut app, Action::SelectPrevious, &tx, &rx).await?;
        assert_eq!(app.form.zone(), UtmZone::Zone35);

        settle(&mut app, Action::Focus(FocusTarget::Direction), &tx, &rx).await?;
        settle(&mut app, Action::Activate, &tx, &rx).await?;
        assert_eq!(app.form.direction(), ConversionDirection::GeographicToUtm);
        assert_eq!(app.form.value(Field::Easting), "500000");
        Ok(())
    }
}

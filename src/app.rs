use crate::config::Config;
use crate::screens::{
    GenerateScreen, PictureScreen, Screen, ScreenAction, ScreenContext, ScreensaverScreen,
};
use crate::services::{GenerationService, GeneratorSettings, JobHandle};
use crate::state::{ActivityResponse, Effect, IdleMonitor, Mode, ModeController};
use crate::tui::Tui;
use crate::utils::disable_system_screensaver;
use anyhow::{Context, Result};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tokio::runtime::Runtime;
use tracing::{debug, error, info, warn};

/// Upper bound on how long the loop waits for input before running timers.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Main application state
pub struct App {
    config: Config,
    tui: Tui,
    runtime: Runtime,
    controller: ModeController,
    idle_monitor: IdleMonitor,
    generator: GeneratorSettings,
    /// The single in-flight generation, if any
    job: Option<JobHandle>,
    screens: Screens,
    /// Set when a new image was published and the decoded one is outdated
    picture_stale: bool,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let store = config.image_store();
        store
            .ensure_directory()
            .context("Failed to prepare the picture directory")?;

        let tui = Tui::new()?;
        let runtime = Runtime::new().context("Failed to create tokio runtime")?;
        let now = Instant::now();
        let controller = ModeController::new(store, config.controller_settings(), now);
        let idle_monitor = IdleMonitor::new(config.idle_poll_interval(), now);
        let generator = config.generator_settings();

        Ok(Self {
            config,
            tui,
            runtime,
            controller,
            idle_monitor,
            generator,
            job: None,
            screens: Screens::default(),
            picture_stale: true,
            should_quit: false,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        if self.config.display.disable_host_screensaver {
            disable_system_screensaver();
        }

        self.tui.enter()?;
        info!(
            "Frame started, picture at {:?}",
            self.controller.store().path()
        );

        if self.controller.mode().is_picture() {
            let now = Instant::now();
            let effects = self.refresh_picture(now);
            self.apply_effects(effects, now);
        }

        // Main event loop
        loop {
            self.draw()?;

            if self.should_quit {
                break;
            }

            if let Some(event) = self.tui.poll_event(POLL_INTERVAL)? {
                self.handle_event(&event)?;
            }

            self.update(Instant::now());
        }

        if self.job.is_some() {
            warn!("Quitting while a generation is still running");
        }
        self.tui.exit()?;
        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        let ctx = ScreenContext::new(&self.controller);
        let screen = self.screens.for_mode(self.controller.mode());

        let mut result = Ok(());
        self.tui.terminal_mut().draw(|frame| {
            result = screen.render(frame, frame.area(), &ctx);
        })?;
        result
    }

    fn handle_event(&mut self, event: &Event) -> Result<()> {
        let now = Instant::now();

        if is_quit_key(event) {
            info!("Quit requested");
            self.should_quit = true;
            return Ok(());
        }

        let (action, effects) = route_event(&mut self.controller, &mut self.screens, event, now)?;
        self.apply_effects(effects, now);
        self.apply_action(action, now);
        Ok(())
    }

    fn apply_action(&mut self, action: ScreenAction, now: Instant) {
        let effects = match action {
            ScreenAction::None => return,
            ScreenAction::CreateNew => self.controller.create_new(),
            ScreenAction::Submit(text) => match self.controller.submit_prompt(&text, now) {
                Ok(effects) => effects,
                Err(e) => {
                    debug!("Prompt rejected: {}", e);
                    Vec::new()
                }
            },
            ScreenAction::Back => self.controller.back_to_picture(),
        };
        self.apply_effects(effects, now);
    }

    /// Carry out controller effects, including any they trigger in turn.
    fn apply_effects(&mut self, effects: Vec<Effect>, now: Instant) {
        let mut queue: VecDeque<Effect> = effects.into();
        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::ModeChanged { to: Mode::Picture, .. } => {
                    queue.extend(self.refresh_picture(now));
                }
                Effect::ModeChanged { .. } => {}
                Effect::StartGeneration(request) => {
                    if self.job.is_some() {
                        warn!("Generation already in flight, not starting another");
                        continue;
                    }
                    info!("Dispatching generation job");
                    self.job = Some(GenerationService::start(
                        self.runtime.handle(),
                        request,
                        self.generator.clone(),
                        self.controller.store().clone(),
                    ));
                }
                Effect::PromptCleared => self.screens.generate.clear_prompt(),
                Effect::StatusShown(status) => debug!("Status: {}", status.text),
                Effect::StatusCleared => {}
            }
        }
    }

    /// Decode the current image if needed before showing it.
    fn refresh_picture(&mut self, now: Instant) -> Vec<Effect> {
        let picture = &mut self.screens.picture;
        if picture.is_loaded() && !self.picture_stale {
            return Vec::new();
        }
        match picture.reload(self.controller.store()) {
            Ok(()) => {
                self.picture_stale = false;
                Vec::new()
            }
            Err(e) => {
                error!("Failed to load picture: {:#}", e);
                self.controller
                    .on_image_load_failed(&format!("{e:#}"), now)
            }
        }
    }

    /// Poll the job and run the controller's timers.
    fn update(&mut self, now: Instant) {
        if let Some(outcome) = self.job.as_mut().and_then(JobHandle::try_recv) {
            self.job = None;
            if outcome.is_success() {
                self.picture_stale = true;
            }
            let effects = self.controller.on_generation_outcome(outcome, now);
            self.apply_effects(effects, now);
        }

        let effects = self.controller.tick(now);
        self.apply_effects(effects, now);

        let effects = self.idle_monitor.tick(now, &mut self.controller);
        self.apply_effects(effects, now);
    }
}

/// One screen per mode, keeping its widget state across mode changes.
#[derive(Debug, Default)]
struct Screens {
    picture: PictureScreen,
    generate: GenerateScreen,
    screensaver: ScreensaverScreen,
}

impl Screens {
    fn for_mode(&mut self, mode: Mode) -> &mut dyn Screen {
        match mode {
            Mode::Picture => &mut self.picture,
            Mode::Generate { .. } => &mut self.generate,
            Mode::Screensaver => &mut self.screensaver,
        }
    }
}

/// Route one input event.
///
/// Activity is reported to the controller first. An event that wakes the
/// frame is consumed there and never reaches a screen; anything else goes to
/// the screen of the current mode.
fn route_event(
    controller: &mut ModeController,
    screens: &mut Screens,
    event: &Event,
    now: Instant,
) -> Result<(ScreenAction, Vec<Effect>)> {
    let effects = if is_activity(event) {
        let (response, effects) = controller.report_activity(now);
        if response == ActivityResponse::Consumed {
            return Ok((ScreenAction::None, effects));
        }
        effects
    } else {
        Vec::new()
    };

    let ctx = ScreenContext::new(controller);
    let action = screens.for_mode(controller.mode()).handle_event(event, &ctx)?;
    Ok((action, effects))
}

/// Ctrl+Q and Ctrl+C leave the frame.
fn is_quit_key(event: &Event) -> bool {
    matches!(
        event,
        Event::Key(KeyEvent {
            code: KeyCode::Char('q' | 'c'),
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) if modifiers.contains(KeyModifiers::CONTROL)
    )
}

/// Pointer presses, pointer motion and key presses count as activity.
fn is_activity(event: &Event) -> bool {
    match event {
        Event::Key(key) => key.kind == KeyEventKind::Press,
        Event::Mouse(mouse) => matches!(
            mouse.kind,
            MouseEventKind::Down(_) | MouseEventKind::Moved | MouseEventKind::Drag(_)
        ),
        Event::Paste(_) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_store::ImageStore;
    use crate::state::ControllerSettings;
    use crossterm::event::{MouseButton, MouseEvent};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use tempfile::TempDir;

    fn mouse(kind: MouseEventKind) -> Event {
        mouse_at(kind, 0, 0)
    }

    fn mouse_at(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_quit_keys() {
        let ctrl_q = Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL));
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        let plain_q = Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));
        assert!(is_quit_key(&ctrl_q));
        assert!(is_quit_key(&ctrl_c));
        assert!(!is_quit_key(&plain_q));
    }

    #[test]
    fn test_activity_events() {
        assert!(is_activity(&mouse(MouseEventKind::Down(MouseButton::Left))));
        assert!(is_activity(&mouse(MouseEventKind::Moved)));
        assert!(!is_activity(&mouse(MouseEventKind::Up(MouseButton::Left))));
        assert!(!is_activity(&mouse(MouseEventKind::ScrollDown)));
        assert!(is_activity(&Event::Key(KeyEvent::new(
            KeyCode::Char('a'),
            KeyModifiers::NONE
        ))));
        assert!(!is_activity(&Event::Resize(80, 24)));
    }

    #[test]
    fn test_touch_that_wakes_does_not_click_the_picture() {
        let temp_dir = TempDir::new().unwrap();
        let store = ImageStore::new(temp_dir.path().join("current_image.png"));
        std::fs::write(store.path(), b"png").unwrap();
        let start = Instant::now();
        let mut controller = ModeController::new(store, ControllerSettings::default(), start);
        let mut screens = Screens::default();

        // The picture was on screen, so its click area is known
        let mut terminal = Terminal::new(TestBackend::new(40, 12)).unwrap();
        terminal
            .draw(|frame| {
                let ctx = ScreenContext::new(&controller);
                screens
                    .picture
                    .render(frame, frame.area(), &ctx)
                    .unwrap();
            })
            .unwrap();

        controller.check_idle(start + Duration::from_secs(301));
        assert_eq!(controller.mode(), Mode::Screensaver);

        // A tap in the middle of the picture wakes the frame and stops there
        let tap = mouse_at(MouseEventKind::Down(MouseButton::Left), 20, 5);
        let now = start + Duration::from_secs(400);
        let (action, effects) = route_event(&mut controller, &mut screens, &tap, now).unwrap();
        assert_eq!(action, ScreenAction::None);
        assert!(effects.contains(&Effect::ModeChanged {
            from: Mode::Screensaver,
            to: Mode::Picture,
        }));
        assert_eq!(controller.mode(), Mode::Picture);

        // The next tap is an ordinary click on the picture
        let later = now + Duration::from_secs(1);
        let (action, effects) = route_event(&mut controller, &mut screens, &tap, later).unwrap();
        assert_eq!(action, ScreenAction::CreateNew);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_events_reach_the_screen_for_the_mode() {
        let temp_dir = TempDir::new().unwrap();
        let store = ImageStore::new(temp_dir.path().join("current_image.png"));
        let mut controller =
            ModeController::new(store, ControllerSettings::default(), Instant::now());
        let mut screens = Screens::default();
        assert!(controller.mode().is_generate());

        let key = Event::Key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE));
        let (action, _) = route_event(&mut controller, &mut screens, &key, Instant::now()).unwrap();
        assert_eq!(action, ScreenAction::None);
        assert_eq!(screens.generate.prompt(), "a");
    }
}

//! The mode state machine.

use super::{ControllerSettings, ControllerState, Effect, Mode, StatusMessage, StatusVariant};
use crate::image_store::ImageStore;
use crate::services::{EmptyPromptError, GenerationOutcome, GenerationRequest};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Whether an input event should continue to the screen under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityResponse {
    /// The event woke the screen and must not be handled further.
    Consumed,
    /// Handle the event normally.
    Propagate,
}

/// Owner of [`ControllerState`] and the only place modes change.
///
/// Every operation takes the current instant and returns the effects the UI
/// loop has to apply. Nothing here blocks or touches the terminal.
#[derive(Debug)]
pub struct ModeController {
    state: ControllerState,
    store: ImageStore,
    settings: ControllerSettings,
}

impl ModeController {
    /// Create the controller, choosing the initial mode from the store.
    pub fn new(store: ImageStore, settings: ControllerSettings, now: Instant) -> Self {
        let state = ControllerState::initial(store.has_image(), now);
        info!("Starting in {} mode", state.mode.name());
        Self {
            state,
            store,
            settings,
        }
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn is_generating(&self) -> bool {
        self.state.generation_in_progress
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.state.status.as_ref()
    }

    pub fn store(&self) -> &ImageStore {
        &self.store
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    /// User asked to create a new picture from the picture screen.
    pub fn create_new(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if !self.state.mode.is_picture() || self.state.generation_in_progress {
            debug!("Ignoring create-new in {} mode", self.state.mode.name());
            return effects;
        }
        self.enter_generate(&mut effects);
        effects
    }

    /// User asked to go back to the picture from the prompt screen.
    ///
    /// Does nothing without an image or while a generation runs.
    pub fn back_to_picture(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if !self.state.mode.is_generate()
            || self.state.generation_in_progress
            || !self.store.has_image()
        {
            debug!("Back to picture not available");
            return effects;
        }
        self.state.pending_picture_at = None;
        self.set_mode(Mode::Picture, &mut effects);
        effects
    }

    /// Submit prompt text for generation.
    ///
    /// While a generation is in flight this is a silent no-op. Blank input
    /// shows a status message and returns [`EmptyPromptError`]; the message
    /// is recorded on the controller state.
    pub fn submit_prompt(
        &mut self,
        input: &str,
        now: Instant,
    ) -> Result<Vec<Effect>, EmptyPromptError> {
        let mut effects = Vec::new();
        if self.state.generation_in_progress {
            debug!("Generation already running, dropping duplicate submission");
            return Ok(effects);
        }
        if !self.state.mode.is_generate() {
            debug!("Ignoring prompt submission in {} mode", self.state.mode.name());
            return Ok(effects);
        }

        let request = match GenerationRequest::new(input) {
            Ok(request) => request,
            Err(e) => {
                self.show_status(e.to_string(), StatusVariant::Error, now, &mut effects);
                return Err(e);
            }
        };

        info!("Starting generation for {:?}", request.prompt());
        self.state.generation_in_progress = true;
        self.state.pending_picture_at = None;
        self.set_mode(Mode::Generate { show_back: false }, &mut effects);
        let text = format!(
            "Creating '{}'... This takes about 3 minutes!",
            request.prompt()
        );
        effects.push(Effect::StartGeneration(request));
        self.show_status(text, StatusVariant::Info, now, &mut effects);
        Ok(effects)
    }

    /// Record user activity (pointer press, key press, pointer motion).
    ///
    /// Wakes the screensaver into the best available mode. A waking event is
    /// reported as [`ActivityResponse::Consumed`].
    pub fn report_activity(&mut self, now: Instant) -> (ActivityResponse, Vec<Effect>) {
        self.state.last_activity = now;
        let mut effects = Vec::new();
        if !self.state.screensaver_armed {
            return (ActivityResponse::Propagate, effects);
        }

        info!("Waking from screensaver");
        self.enter_best_mode(&mut effects);
        (ActivityResponse::Consumed, effects)
    }

    /// Enter the screensaver if the idle threshold has passed.
    ///
    /// Never fires while a generation is running.
    pub fn check_idle(&mut self, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.state.screensaver_armed || self.state.generation_in_progress {
            return effects;
        }
        let idle = now.saturating_duration_since(self.state.last_activity);
        if idle <= self.settings.idle_threshold {
            return effects;
        }

        info!("Idle for {}s, entering screensaver", idle.as_secs());
        self.state.pending_picture_at = None;
        self.set_mode(Mode::Screensaver, &mut effects);
        effects
    }

    /// Apply the outcome of the running generation.
    ///
    /// Must be called from the UI loop. Outcomes arriving while no generation
    /// is in flight are dropped.
    pub fn on_generation_outcome(
        &mut self,
        outcome: GenerationOutcome,
        now: Instant,
    ) -> Vec<Effect> {
        let mut effects = Vec::new();
        if !self.state.generation_in_progress {
            warn!("Dropping generation outcome with no generation in flight");
            return effects;
        }
        self.state.generation_in_progress = false;

        match outcome {
            GenerationOutcome::Success { .. } => {
                self.show_status(
                    "Image created! Displaying...",
                    StatusVariant::Success,
                    now,
                    &mut effects,
                );
                self.state.pending_picture_at = Some(now + self.settings.success_delay);
            }
            GenerationOutcome::Failure(failure) => {
                let show_back = self.back_available();
                self.set_mode(Mode::Generate { show_back }, &mut effects);
                self.show_status(
                    format!("Error: {failure}"),
                    StatusVariant::Error,
                    now,
                    &mut effects,
                );
            }
        }
        effects
    }

    /// Run scheduled work: the post-success switch and status auto-hide.
    pub fn tick(&mut self, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();

        if let Some(at) = self.state.pending_picture_at {
            if now >= at {
                self.state.pending_picture_at = None;
                if self.state.mode.is_generate() && !self.state.generation_in_progress {
                    self.enter_best_mode(&mut effects);
                }
            }
        }

        if self
            .state
            .status
            .as_ref()
            .is_some_and(|status| status.is_expired(now))
        {
            self.clear_status(&mut effects);
        }

        effects
    }

    /// The picture could not be decoded; treat it as missing.
    pub fn on_image_load_failed(&mut self, detail: &str, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();
        if !self.state.mode.is_picture() {
            return effects;
        }
        warn!("Could not display image: {}", detail);
        // The file exists but cannot be shown, so there is nothing to go back to.
        self.set_mode(Mode::Generate { show_back: false }, &mut effects);
        effects.push(Effect::PromptCleared);
        self.show_status(
            format!("Error loading image: {detail}"),
            StatusVariant::Error,
            now,
            &mut effects,
        );
        effects
    }

    fn back_available(&self) -> bool {
        !self.state.generation_in_progress && self.store.has_image()
    }

    /// Picture if there is one, otherwise a fresh prompt screen.
    fn enter_best_mode(&mut self, effects: &mut Vec<Effect>) {
        if self.store.has_image() {
            self.set_mode(Mode::Picture, effects);
        } else {
            self.enter_generate(effects);
        }
    }

    /// Fresh prompt screen: empty input, no status.
    fn enter_generate(&mut self, effects: &mut Vec<Effect>) {
        let show_back = self.back_available();
        self.set_mode(Mode::Generate { show_back }, effects);
        effects.push(Effect::PromptCleared);
        self.clear_status(effects);
    }

    fn set_mode(&mut self, to: Mode, effects: &mut Vec<Effect>) {
        let from = self.state.mode;
        if from == to {
            return;
        }
        self.state.mode = to;
        self.state.screensaver_armed = to.is_screensaver();
        info!("Mode {} -> {}", from.name(), to.name());
        effects.push(Effect::ModeChanged { from, to });
    }

    /// Status messages auto-hide unless a generation is running.
    fn show_status(
        &mut self,
        text: impl Into<String>,
        variant: StatusVariant,
        now: Instant,
        effects: &mut Vec<Effect>,
    ) {
        let status = if self.state.generation_in_progress {
            StatusMessage::persistent(text, variant)
        } else {
            StatusMessage::expiring(text, variant, now, self.settings.status_timeout)
        };
        self.state.status = Some(status.clone());
        effects.push(Effect::StatusShown(status));
    }

    fn clear_status(&mut self, effects: &mut Vec<Effect>) {
        if self.state.status.take().is_some() {
            effects.push(Effect::StatusCleared);
        }
    }
}

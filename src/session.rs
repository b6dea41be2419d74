//! Session: the surface the presentation layer talks to
//!
//! A driver creates one [`Session`], forwards input with [`Session::on_input`],
//! calls [`Session::tick`] once per frame and paints [`Session::render`].
//! Storage is injected; the session saves the profile whenever it changes.

use glam::{UVec2, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::emotes::{Emote, EmoteWheel};
use crate::persistence::{PersistenceProvider, Profile};
use crate::renderer::{Frame, UiView, render};
use crate::settings::{ControlScheme, Settings};
use crate::shop::Shop;
use crate::sim::{GameState, TickInput, tick};

/// Fatal setup failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no drawable surface")]
    SurfaceUnavailable,
    #[error("invalid world size {width}x{height}")]
    InvalidWorldSize { width: u32, height: u32 },
}

/// Drawable surface size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn is_drawable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Input from the presentation layer. Screen coordinates are in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Currently held direction (keyboard scheme); `(0, 0)` when released
    Move { dx: f32, dy: f32 },
    ToggleDig,
    /// Primary press: buys in the shop, picks on the wheel, digs in pointer mode
    Interact { x: f32, y: f32 },
    /// Primary release (ends pointer-mode digging)
    InteractEnd,
    PointerMoved { x: f32, y: f32 },
    ToggleShop,
    ToggleEmoteWheel,
    ShowEmote(Emote),
    ToggleControls,
}

#[derive(Debug)]
pub struct Session {
    state: GameState,
    settings: Settings,
    shop: Shop,
    wheel: EmoteWheel,
    store: Box<dyn PersistenceProvider>,
    /// Held keyboard direction
    held: Vec2,
    /// Last pointer position (screen space)
    pointer: Option<Vec2>,
    /// Profile as last written to the store
    saved: Profile,
}

impl Session {
    /// Validate the surface and world, load settings and profile, build the world
    pub fn initialize(
        surface: Option<Viewport>,
        world: UVec2,
        store: Box<dyn PersistenceProvider>,
        seed: u64,
    ) -> Result<Self, SessionError> {
        let viewport = surface
            .filter(Viewport::is_drawable)
            .ok_or(SessionError::SurfaceUnavailable)?;
        if world.x == 0 || world.y == 0 {
            return Err(SessionError::InvalidWorldSize {
                width: world.x,
                height: world.y,
            });
        }

        let mut settings = Settings::load(store.as_ref());
        settings.world.width = world.x;
        settings.world.height = world.y;
        let profile = Profile::load(store.as_ref());

        let state = GameState::new(&settings.world, seed, &profile, viewport.size());
        let shop = Shop::new(state.player.owned_emotes(), seed.wrapping_add(1));
        log::info!(
            "Session started: {}x{} world, {} controls",
            world.x,
            world.y,
            settings.controls.as_str()
        );

        Ok(Self {
            state,
            settings,
            shop,
            wheel: EmoteWheel::default(),
            store,
            held: Vec2::ZERO,
            pointer: None,
            saved: profile,
        })
    }

    /// Advance one frame
    pub fn tick(&mut self, dt_ms: f32) {
        let input = match self.settings.controls {
            ControlScheme::Keyboard => TickInput {
                direction: self.held,
                pointer: None,
            },
            ControlScheme::Pointer => TickInput {
                direction: Vec2::ZERO,
                pointer: self.pointer,
            },
        };
        tick(&mut self.state, &input, dt_ms);
        self.persist_if_changed();
    }

    /// Draw commands for the current state
    pub fn render(&self) -> Frame {
        render(
            &self.state,
            &UiView {
                shop: &self.shop,
                wheel: &self.wheel,
            },
        )
    }

    pub fn on_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Move { dx, dy } => {
                if self.settings.controls == ControlScheme::Keyboard {
                    self.held = Vec2::new(dx, dy);
                }
            }
            InputEvent::ToggleDig => self.state.player.toggle_digging(),
            InputEvent::Interact { x, y } => self.interact(Vec2::new(x, y)),
            InputEvent::InteractEnd => {
                if self.settings.controls == ControlScheme::Pointer && !self.overlay_open() {
                    self.state.player.body.digging = false;
                }
            }
            InputEvent::PointerMoved { x, y } => {
                let point = Vec2::new(x, y);
                self.pointer = Some(point);
                let owned = self.owned_list();
                self.wheel.hover(point, self.screen_center(), &owned);
            }
            InputEvent::ToggleShop => self.shop.toggle(self.state.player.owned_emotes()),
            InputEvent::ToggleEmoteWheel => self.wheel.toggle(),
            InputEvent::ShowEmote(emote) => {
                self.state.player.display_emote(emote);
            }
            InputEvent::ToggleControls => {
                self.settings.controls = self.settings.controls.toggled();
                if self.settings.controls == ControlScheme::Pointer {
                    self.held = Vec2::ZERO;
                }
                log::info!("Controls: {}", self.settings.controls.as_str());
                self.settings.save(self.store.as_mut());
            }
        }
    }

    fn interact(&mut self, point: Vec2) {
        if self.shop.is_open() {
            if let Some(slot) = self.shop.slot_at(point, self.state.camera.viewport) {
                if self.shop.purchase(slot, &mut self.state.player) {
                    self.persist_if_changed();
                }
            }
        } else if self.wheel.is_open() {
            let owned = self.owned_list();
            self.wheel.hover(point, self.screen_center(), &owned);
            if let Some(emote) = self.wheel.confirm() {
                self.state.player.display_emote(emote);
            }
        } else if self.settings.controls == ControlScheme::Pointer {
            self.state.player.body.digging = true;
        }
    }

    fn overlay_open(&self) -> bool {
        self.shop.is_open() || self.wheel.is_open()
    }

    fn owned_list(&self) -> Vec<Emote> {
        self.state.player.owned_emotes().iter().copied().collect()
    }

    fn screen_center(&self) -> Vec2 {
        self.state.camera.viewport / 2.0
    }

    /// Gold and owned emotes, as stored between sessions
    pub fn persistable_state(&self) -> Profile {
        self.state.player.profile()
    }

    /// Replace gold and emotes (e.g. after an external sync)
    pub fn load_persistable_state(&mut self, profile: &Profile) {
        self.state.player.apply_profile(profile);
        self.shop.refresh(self.state.player.owned_emotes());
        self.persist_if_changed();
    }

    fn persist_if_changed(&mut self) {
        let current = self.state.player.profile();
        if current != self.saved {
            current.save(self.store.as_mut());
            self.saved = current;
        }
    }

    /// New surface size; undrawable sizes are ignored
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport.is_drawable() {
            self.state.camera.viewport = viewport.size();
        } else {
            log::warn!("Ignoring resize to {}x{}", viewport.width, viewport.height);
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn shop(&self) -> &Shop {
        &self.shop
    }

    pub fn emote_wheel(&self) -> &EmoteWheel {
        &self.wheel
    }

    pub fn store(&self) -> &dyn PersistenceProvider {
        self.store.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::sim::WorldConfig;

    fn session_with(store: MemoryStore) -> Session {
        let mut store = store;
        let settings = Settings {
            world: WorldConfig {
                initial_enemies: 0,
                max_enemies: 0,
                pregenerate_terrain: false,
                ..Default::default()
            },
            ..Default::default()
        };
        settings.save(&mut store);
        Session::initialize(
            Some(Viewport::new(800.0, 600.0)),
            UVec2::new(2000, 2000),
            Box::new(store),
            17,
        )
        .unwrap()
    }

    #[test]
    fn test_pointer_controls_ignore_keys() {
        let mut session = session_with(MemoryStore::new());
        session.on_input(InputEvent::Move { dx: 1.0, dy: 0.0 });
        session.on_input(InputEvent::ToggleControls);
        assert_eq!(session.settings().controls, ControlScheme::Pointer);
        assert_eq!(session.held, Vec2::ZERO);

        session.on_input(InputEvent::Move { dx: 1.0, dy: 0.0 });
        let start = session.state().player.body.pos;
        session.tick(16.0);
        assert_eq!(session.state().player.body.pos, start);

        // The choice is persisted
        assert_eq!(Settings::load(session.store()).controls, ControlScheme::Pointer);
    }

    #[test]
    fn test_pointer_press_digs_until_release() {
        let mut session = session_with(MemoryStore::new());
        session.on_input(InputEvent::ToggleControls);
        session.on_input(InputEvent::Interact { x: 400.0, y: 300.0 });
        assert!(session.state().player.body.digging);
        session.on_input(InputEvent::InteractEnd);
        assert!(!session.state().player.body.digging);
    }

    #[test]
    fn test_emote_wheel_pick() {
        let mut session = session_with(MemoryStore::new());
        session.on_input(InputEvent::ToggleEmoteWheel);
        assert!(session.emote_wheel().is_open());

        // Slot 0 sits to the right of the center: the first owned emote
        session.on_input(InputEvent::Interact { x: 480.0, y: 300.0 });
        assert!(!session.emote_wheel().is_open());
        assert_eq!(session.state().player.body.emote.map(|e| e.emote), Some(Emote::Happy));
    }

    #[test]
    fn test_unowned_emote_hotkey_ignored() {
        let mut session = session_with(MemoryStore::new());
        session.on_input(InputEvent::ShowEmote(Emote::Dead));
        assert!(session.state().player.body.emote.is_none());
        session.on_input(InputEvent::ShowEmote(Emote::Sad));
        assert!(session.state().player.body.emote.is_some());
    }
}

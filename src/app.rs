use std::collections::BTreeMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use tracing::{info, warn};

use crate::config::Config;
use crate::engine::{Catalog, Template, TimingTracker};
use crate::session::card::{InputSession, Solve};
use crate::session::input::{Digit, KeypadEvent};
use crate::store::json_store::JsonStore;
use crate::store::schema::TimingData;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    Card,
}

pub struct App {
    pub screen: AppScreen,
    pub catalog: Catalog,
    pub config: Config,
    pub theme: Theme,
    pub timings: TimingTracker,
    pub session: Option<InputSession>,
    pub last_solve: Option<Solve>,
    pub menu_selected: usize,
    pub search_query: String,
    pub searching: bool,
    /// One-line message for the footer, cleared on the next key.
    pub status: Option<String>,
    pub should_quit: bool,
    store: Option<JsonStore>,
    rng: SmallRng,
}

impl App {
    /// `seed` makes every round reproducible; otherwise rounds draw from OS
    /// entropy.
    pub fn new(
        config: Config,
        catalog: Catalog,
        store: Option<JsonStore>,
        seed: Option<u64>,
    ) -> Self {
        let theme = Theme::load_or_default(&config.theme);

        let averages = match &store {
            Some(s) => {
                if s.check_interrupted_import() {
                    warn!("recovered timings from an interrupted import");
                }
                s.load_timings().averages
            }
            None => BTreeMap::new(),
        };

        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        let mut app = Self {
            screen: AppScreen::Menu,
            catalog,
            config,
            theme,
            timings: TimingTracker::new(averages),
            session: None,
            last_solve: None,
            menu_selected: 0,
            search_query: String::new(),
            searching: false,
            status: None,
            should_quit: false,
            store,
            rng,
        };

        if let Some(title) = app.config.start_template.clone() {
            app.open_template(&title);
        }
        app
    }

    /// Catalog indices shown in the menu under the current search query.
    pub fn visible_templates(&self) -> Vec<usize> {
        self.catalog.search(&self.search_query)
    }

    pub fn selected_template(&self) -> Option<&Template> {
        let visible = self.visible_templates();
        let index = *visible.get(self.menu_selected)?;
        self.catalog.get(index)
    }

    pub fn open_template(&mut self, title: &str) -> bool {
        let Some(template) = self.catalog.find(title).copied() else {
            warn!(title, "no such template");
            return false;
        };
        let rng = SmallRng::seed_from_u64(self.rng.next_u64());
        let mut session = InputSession::new(template, rng);
        session.reset();
        info!(title, "opened template");

        self.session = Some(session);
        self.last_solve = None;
        self.screen = AppScreen::Card;
        true
    }

    pub fn go_to_menu(&mut self) {
        if let Some(session) = self.session.take()
            && let Some(pos) = self.visible_templates().iter().position(|&i| {
                self.catalog.get(i).map(|t| t.title) == Some(session.template().title)
            })
        {
            self.menu_selected = pos;
        }
        self.last_solve = None;
        self.screen = AppScreen::Menu;
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.status = None;
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        match self.screen {
            AppScreen::Menu if self.searching => self.handle_search_key(key),
            AppScreen::Menu => self.handle_menu_key(key),
            AppScreen::Card => self.handle_card_key(key),
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) {
        let count = self.visible_templates().len();
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc if !self.search_query.is_empty() => self.set_query(String::new()),
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('/') => self.searching = true,
            KeyCode::Up | KeyCode::Char('k') if count > 0 => {
                self.menu_selected = (self.menu_selected + count - 1) % count;
            }
            KeyCode::Down | KeyCode::Char('j') if count > 0 => {
                self.menu_selected = (self.menu_selected + 1) % count;
            }
            KeyCode::Home => self.menu_selected = 0,
            KeyCode::End => self.menu_selected = count.saturating_sub(1),
            KeyCode::Enter => {
                if let Some(title) = self.selected_template().map(|t| t.title) {
                    self.open_template(title);
                }
            }
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.searching = false;
                self.set_query(String::new());
            }
            KeyCode::Enter => {
                self.searching = false;
                if self.visible_templates().len() == 1 {
                    self.handle_menu_key(key);
                }
            }
            KeyCode::Backspace => {
                let mut query = self.search_query.clone();
                query.pop();
                self.set_query(query);
            }
            KeyCode::Up | KeyCode::Down => self.handle_menu_key(key),
            KeyCode::Char(ch) => {
                let mut query = self.search_query.clone();
                query.push(ch);
                self.set_query(query);
            }
            _ => {}
        }
    }

    fn set_query(&mut self, query: String) {
        self.search_query = query;
        let count = self.visible_templates().len();
        self.menu_selected = self.menu_selected.min(count.saturating_sub(1));
    }

    fn handle_card_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.go_to_menu();
            return;
        }
        let Some(event) = keypad_event_for(&key) else {
            return;
        };
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Some(solve) = session.handle(event, &mut self.timings) {
            self.last_solve = Some(solve);
            self.save_timings();
        }
    }

    fn save_timings(&mut self) {
        let Some(store) = &self.store else {
            return;
        };
        let data = TimingData::new(self.timings.store().clone());
        if let Err(e) = store.save_timings(&data) {
            warn!(error = %e, "failed to save timings");
            self.status = Some(format!("Could not save timings: {e}"));
        }
    }

    pub fn average_for(&self, title: &str) -> Option<f64> {
        self.timings.read_average(title)
    }
}

/// Map a terminal key to a keypad event. Keys with no keypad meaning map to
/// `None`.
pub fn keypad_event_for(key: &KeyEvent) -> Option<KeypadEvent> {
    match key.code {
        KeyCode::Char('-') => Some(KeypadEvent::ToggleSign),
        KeyCode::Char(ch) => Digit::from_char(ch).map(KeypadEvent::Digit),
        KeyCode::Backspace | KeyCode::Delete => Some(KeypadEvent::Backspace),
        KeyCode::Tab | KeyCode::Right => Some(KeypadEvent::NextField),
        KeyCode::BackTab | KeyCode::Left => Some(KeypadEvent::PrevField),
        _ => None,
    }
}

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::data::{FetchError, RawQuestion, Storage};
use crate::models::{Screen, ANSWER_COUNT};
use crate::store::{FetchRequest, SessionStore, Snapshot};
use crate::timer::Ticker;

const MAX_FIELD_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Username,
    Password,
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub focus: LoginField,
}

impl LoginForm {
    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }
}

/// What the event loop has to do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    None,
    Quit,
    Fetch(FetchRequest),
}

/// Everything a frame needs to draw.
pub struct View<'a> {
    pub state: Snapshot<'a>,
    pub login: &'a LoginForm,
    pub selected_option: usize,
    pub confirm_stop: bool,
}

/// Session store plus the purely visual state around it.
pub struct App<S, T> {
    store: SessionStore<S, T>,
    login: LoginForm,
    selected_option: usize,
    confirm_stop: bool,
    pub should_quit: bool,
}

impl<S: Storage, T: Ticker> App<S, T> {
    pub fn new(store: SessionStore<S, T>) -> Self {
        Self {
            store,
            login: LoginForm::default(),
            selected_option: 0,
            confirm_stop: false,
            should_quit: false,
        }
    }

    pub fn store(&self) -> &SessionStore<S, T> {
        &self.store
    }

    pub fn view(&self) -> View<'_> {
        View {
            state: self.store.snapshot(),
            login: &self.login,
            selected_option: self.selected_option,
            confirm_stop: self.confirm_stop,
        }
    }

    pub fn selected_option(&self) -> usize {
        self.selected_option
    }

    pub fn select_next_option(&mut self) {
        self.selected_option = (self.selected_option + 1) % ANSWER_COUNT;
    }

    pub fn select_previous_option(&mut self) {
        self.selected_option = (self.selected_option + ANSWER_COUNT - 1) % ANSWER_COUNT;
    }

    pub fn on_tick(&mut self) {
        if self.store.tick() {
            tracing::info!("time is up");
            self.reset_quiz_view();
        }
    }

    pub fn on_fetch(&mut self, request: FetchRequest, result: Result<Vec<RawQuestion>, FetchError>) {
        // Failures are logged and surfaced by the store itself.
        if self.store.finish_fetch(request, result, &mut rand::rng()).is_ok() {
            self.reset_quiz_view();
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Command {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return self.quit();
        }

        match self.store.screen() {
            Screen::Login => self.handle_login_input(key.code),
            Screen::Home => self.handle_home_input(key.code),
            Screen::Quiz => self.handle_quiz_input(key.code),
            Screen::Results => self.handle_result_input(key.code),
        }
    }

    fn quit(&mut self) -> Command {
        self.should_quit = true;
        Command::Quit
    }

    fn reset_quiz_view(&mut self) {
        self.selected_option = 0;
        self.confirm_stop = false;
    }

    fn logout(&mut self) -> Command {
        self.store.logout();
        self.login = LoginForm::default();
        self.reset_quiz_view();
        Command::None
    }

    fn handle_login_input(&mut self, key: KeyCode) -> Command {
        match key {
            KeyCode::Esc => return self.quit(),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.login.toggle_focus();
            }
            KeyCode::Char(c) => {
                self.store.clear_error();
                let field = self.login.focused_mut();
                if field.chars().count() < MAX_FIELD_LEN {
                    field.push(c);
                }
            }
            KeyCode::Backspace => {
                self.store.clear_error();
                self.login.focused_mut().pop();
            }
            KeyCode::Enter => {
                if self.login.focus == LoginField::Username && self.login.password.is_empty() {
                    self.login.focus = LoginField::Password;
                    return Command::None;
                }
                let LoginForm {
                    username, password, ..
                } = &self.login;
                if self.store.login(username, password).is_ok() {
                    self.login = LoginForm::default();
                }
            }
            _ => {}
        }
        Command::None
    }

    fn handle_home_input(&mut self, key: KeyCode) -> Command {
        match key {
            KeyCode::Enter | KeyCode::Char('s') | KeyCode::Char('S') => {
                match self.store.begin_fetch() {
                    Ok(request) => return Command::Fetch(request),
                    Err(error) => tracing::debug!(%error, "start ignored"),
                }
            }
            KeyCode::Char('l') | KeyCode::Char('L') => return self.logout(),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return self.quit(),
            _ => {}
        }
        Command::None
    }

    fn handle_quiz_input(&mut self, key: KeyCode) -> Command {
        if self.confirm_stop {
            match key {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    if let Err(error) = self.store.stop_quiz() {
                        tracing::debug!(%error, "stop ignored");
                    }
                    self.reset_quiz_view();
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.confirm_stop = false;
                }
                _ => {}
            }
            return Command::None;
        }

        match key {
            KeyCode::Up | KeyCode::Char('k') => self.select_previous_option(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next_option(),
            KeyCode::Char(c @ '1'..='4') => {
                self.selected_option = c as usize - '1' as usize;
                self.submit_selected();
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.submit_selected(),
            KeyCode::Char('x') | KeyCode::Char('X') => self.confirm_stop = true,
            KeyCode::Char('l') | KeyCode::Char('L') => return self.logout(),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return self.quit(),
            _ => {}
        }
        Command::None
    }

    fn handle_result_input(&mut self, key: KeyCode) -> Command {
        match key {
            KeyCode::Enter | KeyCode::Char('r') | KeyCode::Char('R') => {
                if let Err(error) = self.store.restart() {
                    tracing::debug!(%error, "restart ignored");
                }
            }
            KeyCode::Char('l') | KeyCode::Char('L') => return self.logout(),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return self.quit(),
            _ => {}
        }
        Command::None
    }

    fn submit_selected(&mut self) {
        match self.store.submit_answer(self.selected_option) {
            Ok(outcome) => {
                tracing::debug!(correct = outcome.correct, finished = outcome.finished, "answer submitted");
                self.reset_quiz_view();
            }
            Err(error) => tracing::debug!(%error, "answer ignored"),
        }
    }
}

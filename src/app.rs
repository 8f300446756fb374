use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;

use crate::api::pokemon::root_cursor;
use crate::api::{Catalog, ErrorKind, PokeApiClient};
use crate::config::AppConfig;
use crate::debounce::Debouncer;
use crate::event::{AppEvent, Event, EventHandler, ViewKind, send_app_event};
use crate::identifier::parse_identifier;
use crate::sync::detail::{DetailRequest, DetailSynchronizer, fetch_detail};
use crate::sync::list::{ListSynchronizer, PageRequest, fetch_page};
use crate::sync::{Phase, SyncFailure};
use crate::ui;

// ---------------------------------------------------------------------------
// App mode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppMode {
    Normal,
    Search,
}

// ---------------------------------------------------------------------------
// View state
// ---------------------------------------------------------------------------

pub struct ViewState {
    pub kind: ViewKind,
    pub selected_index: usize,
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App<C = PokeApiClient> {
    pub running: bool,
    pub events: EventHandler,
    pub config: AppConfig,

    // View system
    pub view_stack: Vec<ViewState>,
    pub mode: AppMode,

    // Data state
    pub list: ListSynchronizer,
    pub detail: DetailSynchronizer,

    // Input state
    pub search_input: String,
    search: Debouncer<String>,

    catalog: Arc<C>,

    // Status
    pub status_message: Option<String>,
    pub error_detail: Option<String>,
}

impl<C: Catalog + 'static> App<C> {
    pub fn new(config: AppConfig, catalog: Arc<C>, events: EventHandler) -> Self {
        let root = root_cursor(catalog.base_url(), config.page_size);

        let sender = events.sender();
        let search = Debouncer::new(
            move |text: String| send_app_event(&sender, AppEvent::SearchSettled(text)),
            Duration::from_millis(config.search_debounce_ms),
        );

        Self {
            running: true,
            events,
            config,
            view_stack: vec![ViewState {
                kind: ViewKind::List,
                selected_index: 0,
            }],
            mode: AppMode::Normal,
            list: ListSynchronizer::new(root),
            detail: DetailSynchronizer::new(),
            search_input: String::new(),
            search,
            catalog,
            status_message: None,
            error_detail: None,
        }
    }

    // -- Main event loop ----------------------------------------------------

    pub async fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.start();

        while self.running {
            terminal.draw(|frame| ui::draw(frame, &self))?;
            let event = self.events.next().await?;
            self.handle_event(event);
        }
        Ok(())
    }

    /// Kick off the first page load.
    pub fn start(&mut self) {
        let req = self.list.start();
        self.dispatch_page(req);
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Tick => {}
            Event::Crossterm(crossterm::event::Event::Key(key))
                if key.kind == KeyEventKind::Press =>
            {
                self.handle_key_event(key);
            }
            Event::Crossterm(_) => {}
            Event::App(app_event) => self.handle_app_event(*app_event),
        }
    }

    // -- View stack ---------------------------------------------------------

    pub fn current_view(&self) -> Option<&ViewKind> {
        self.view_stack.last().map(|vs| &vs.kind)
    }

    /// The top of the stack ignoring overlays such as Help.
    pub fn content_view(&self) -> Option<&ViewKind> {
        self.view_stack
            .iter()
            .rev()
            .map(|vs| &vs.kind)
            .find(|k| !matches!(k, ViewKind::Help))
    }

    fn push_view(&mut self, kind: ViewKind) {
        tracing::debug!(?kind, "push view");
        self.view_stack.push(ViewState {
            kind,
            selected_index: 0,
        });
        self.sync_detail_with_view();
    }

    fn pop_view(&mut self) {
        if self.view_stack.len() > 1 {
            self.view_stack.pop();
            self.sync_detail_with_view();
        }
    }

    /// Keep the detail synchronizer pointed at whatever detail view is on
    /// screen; leaving detail views altogether releases it.
    fn sync_detail_with_view(&mut self) {
        match self.content_view().cloned() {
            Some(ViewKind::Detail(identifier)) => {
                if let Some(req) = self.detail.set_identifier(&identifier) {
                    self.dispatch_detail(req);
                }
            }
            _ => self.detail.clear(),
        }
    }

    fn open_detail(&mut self, identifier: &str) {
        // Search results replace the detail view on top instead of stacking.
        if let Some(ViewKind::Detail(_)) = self.current_view()
            && self.mode == AppMode::Search
        {
            self.view_stack.pop();
        }
        self.push_view(ViewKind::Detail(identifier.to_string()));
    }

    // -- Key event routing --------------------------------------------------

    fn handle_key_event(&mut self, key: KeyEvent) {
        // Ctrl-C always quits.
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c' | 'C'))
        {
            self.events.send(AppEvent::Quit);
            return;
        }

        if self.error_detail.is_some() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                self.error_detail = None;
            }
            return;
        }

        match self.mode {
            AppMode::Normal => self.handle_normal_key(key),
            AppMode::Search => self.handle_search_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                if self.view_stack.len() > 1 {
                    self.events.send(AppEvent::PopView);
                } else {
                    self.events.send(AppEvent::Quit);
                }
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection_down();
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection_up();
            }
            KeyCode::Enter => {
                self.open_selected();
            }
            KeyCode::Char('n') | KeyCode::Right => {
                self.events.send(AppEvent::NextPage);
            }
            KeyCode::Char('p') | KeyCode::Left => {
                self.events.send(AppEvent::PrevPage);
            }
            KeyCode::Char('r') => {
                self.events.send(AppEvent::Reload);
            }
            KeyCode::Char('o') => {
                self.open_artwork();
            }
            KeyCode::Char('/') => {
                self.mode = AppMode::Search;
                self.search_input.clear();
            }
            KeyCode::Char('?') => {
                self.events.send(AppEvent::PushView(ViewKind::Help));
            }
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.search.cancel();
                self.mode = AppMode::Normal;
                self.search_input.clear();
            }
            KeyCode::Enter => {
                if self.search_input.trim().is_empty() {
                    self.search.cancel();
                } else {
                    self.search.flush(self.search_input.clone());
                }
                self.mode = AppMode::Normal;
            }
            KeyCode::Backspace => {
                self.search_input.pop();
                self.search_changed();
            }
            KeyCode::Char(c) => {
                self.search_input.push(c);
                self.search_changed();
            }
            _ => {}
        }
    }

    fn search_changed(&mut self) {
        if self.search_input.trim().is_empty() {
            self.search.cancel();
        } else {
            self.search.call(self.search_input.clone());
        }
    }

    // -- Selection helpers --------------------------------------------------

    fn move_selection_down(&mut self) {
        let count = self.current_item_count();
        if let Some(vs) = self.view_stack.last_mut()
            && vs.selected_index + 1 < count
        {
            vs.selected_index += 1;
        }
    }

    fn move_selection_up(&mut self) {
        if let Some(vs) = self.view_stack.last_mut() {
            vs.selected_index = vs.selected_index.saturating_sub(1);
        }
    }

    fn current_item_count(&self) -> usize {
        match self.current_view() {
            Some(ViewKind::List) => self.list.items().len(),
            Some(ViewKind::Detail(_)) => self.detail.view().map_or(0, |v| v.related.len()),
            Some(ViewKind::Help) | None => 0,
        }
    }

    pub fn selected_index(&self) -> usize {
        self.view_stack.last().map_or(0, |vs| vs.selected_index)
    }

    fn open_selected(&mut self) {
        let idx = self.selected_index();
        let target = match self.current_view() {
            Some(ViewKind::List) => self.list.items().get(idx).map(|item| item.name.clone()),
            Some(ViewKind::Detail(_)) => self
                .detail
                .view()
                .and_then(|v| v.related.get(idx))
                .map(|r| r.name.clone()),
            _ => None,
        };
        if let Some(name) = target {
            self.events.send(AppEvent::PushView(ViewKind::Detail(name)));
        }
    }

    fn open_artwork(&mut self) {
        let url = match self.current_view() {
            Some(ViewKind::List) => self
                .list
                .items()
                .get(self.selected_index())
                .and_then(|item| item.image.url()),
            Some(ViewKind::Detail(_)) => self.detail.view().and_then(|v| v.item.image.url()),
            _ => None,
        };
        let Some(url) = url.map(str::to_owned) else {
            self.status_message = Some("No artwork URL for this item".to_string());
            return;
        };
        if let Err(e) = open::that_detached(&url) {
            tracing::warn!(%url, "failed to open artwork: {e}");
            self.status_message = Some(format!("Could not open {url}: {e}"));
        }
    }

    // -- App event handling -------------------------------------------------

    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            // Navigation
            AppEvent::Quit => {
                self.search.cancel();
                self.running = false;
            }
            AppEvent::PushView(kind) => {
                self.push_view(kind);
            }
            AppEvent::PopView => {
                self.pop_view();
            }

            // Pagination
            AppEvent::NextPage => {
                if self.current_view() == Some(&ViewKind::List)
                    && let Some(req) = self.list.next_page()
                {
                    self.dispatch_page(req);
                }
            }
            AppEvent::PrevPage => {
                if self.current_view() == Some(&ViewKind::List)
                    && let Some(req) = self.list.prev_page()
                {
                    self.dispatch_page(req);
                }
            }
            AppEvent::Reload => match self.current_view() {
                Some(ViewKind::List) => {
                    let req = self.list.start();
                    self.dispatch_page(req);
                }
                Some(ViewKind::Detail(_)) => {
                    if let Some(req) = self.detail.reload() {
                        self.dispatch_detail(req);
                    }
                }
                _ => {}
            },

            // Search
            AppEvent::SearchSettled(text) => match parse_identifier(&text) {
                Some(identifier) => self.open_detail(&identifier),
                None => {
                    self.status_message = Some(format!("Not a name or number: {text}"));
                }
            },

            // Results
            AppEvent::PageLoaded { generation, result } => {
                if self.list.apply(generation, result) {
                    self.reset_selection(|kind| matches!(kind, ViewKind::List));
                    self.report_failure(self.list.phase().clone(), "page");
                }
            }
            AppEvent::DetailLoaded { generation, result } => {
                if self.detail.apply(generation, result.map(|view| *view)) {
                    self.reset_selection(|kind| matches!(kind, ViewKind::Detail(_)));
                    self.report_failure(self.detail.phase().clone(), "item");
                }
            }
        }
    }

    fn reset_selection(&mut self, matches_view: impl Fn(&ViewKind) -> bool) {
        if let Some(vs) = self.view_stack.iter_mut().rev().find(|vs| matches_view(&vs.kind)) {
            vs.selected_index = 0;
        }
    }

    fn report_failure(&mut self, phase: Phase, what: &str) {
        let Some(failure) = phase.failure() else {
            self.status_message = None;
            return;
        };
        self.status_message = Some(failure_summary(failure, what));
        self.error_detail = Some(failure.message.clone());
    }

    // -- Dispatch -----------------------------------------------------------

    fn dispatch_page(&self, req: PageRequest) {
        let catalog = Arc::clone(&self.catalog);
        let sender = self.events.sender();

        tokio::spawn(async move {
            let result = fetch_page(catalog.as_ref(), &req.cursor)
                .await
                .map_err(SyncFailure::from);
            send_app_event(
                &sender,
                AppEvent::PageLoaded {
                    generation: req.generation,
                    result,
                },
            );
        });
    }

    fn dispatch_detail(&self, req: DetailRequest) {
        let catalog = Arc::clone(&self.catalog);
        let sender = self.events.sender();

        tokio::spawn(async move {
            let result = fetch_detail(catalog.as_ref(), &req.identifier)
                .await
                .map(Box::new)
                .map_err(SyncFailure::from);
            send_app_event(
                &sender,
                AppEvent::DetailLoaded {
                    generation: req.generation,
                    result,
                },
            );
        });
    }
}

/// One-line status text for a failed load.
pub fn failure_summary(failure: &SyncFailure, what: &str) -> String {
    match failure.kind {
        ErrorKind::NotFound => format!("No such {what}"),
        ErrorKind::Network => format!("Network error loading {what}"),
        ErrorKind::Malformed => format!("Unexpected response loading {what}"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::pokemon::pokemon_url;
    use crate::test_support::{
        FAKE_BASE, FakeCatalog, listed_pokemon_ids, listing_cursor, listing_detail_url, name_for,
        pokemon_json,
    };

    fn key(code: KeyCode) -> Event {
        Event::Crossterm(crossterm::event::Event::Key(KeyEvent::new(
            code,
            KeyModifiers::NONE,
        )))
    }

    fn app_with(catalog: FakeCatalog) -> App<FakeCatalog> {
        let config = AppConfig {
            page_size: 2,
            ..AppConfig::default()
        };
        App::new(config, Arc::new(catalog), EventHandler::detached())
    }

    /// Process queued events until one matching `done` has been handled.
    async fn pump_until(app: &mut App<FakeCatalog>, done: impl Fn(&AppEvent) -> bool) {
        loop {
            let event = app.events.next().await.expect("event loop open");
            let finished = matches!(&event, Event::App(e) if done(e));
            app.handle_event(event);
            if finished {
                return;
            }
        }
    }

    fn two_page_catalog() -> FakeCatalog {
        let catalog = FakeCatalog::new();
        let root = listing_cursor(0, 2);
        let second = listing_cursor(2, 2);
        catalog.page(&root, &[1, 2], Some(&second), None);
        catalog.page(&second, &[3, 4], None, Some(&root));
        listed_pokemon_ids(&catalog, &[1, 2, 3, 4]);
        catalog
    }

    #[tokio::test]
    async fn first_page_loads_on_start() {
        let mut app = app_with(two_page_catalog());
        app.start();
        assert!(app.list.is_loading());

        pump_until(&mut app, |e| matches!(e, AppEvent::PageLoaded { .. })).await;
        let names: Vec<&str> = app.list.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["mon-1", "mon-2"]);
        assert!(app.status_message.is_none());
    }

    #[tokio::test]
    async fn next_and_previous_keys_paginate() {
        let mut app = app_with(two_page_catalog());
        app.start();
        pump_until(&mut app, |e| matches!(e, AppEvent::PageLoaded { .. })).await;

        app.handle_event(key(KeyCode::Char('n')));
        pump_until(&mut app, |e| matches!(e, AppEvent::PageLoaded { .. })).await;
        assert_eq!(app.list.cursor(), listing_cursor(2, 2));
        assert_eq!(app.list.items()[0].id, 3);

        // No next page: the key does nothing.
        app.handle_event(key(KeyCode::Char('n')));
        pump_until(&mut app, |e| matches!(e, AppEvent::NextPage)).await;
        assert!(!app.list.is_loading());

        app.handle_event(key(KeyCode::Char('p')));
        pump_until(&mut app, |e| matches!(e, AppEvent::PageLoaded { .. })).await;
        assert_eq!(app.list.items()[0].id, 1);
    }

    #[tokio::test]
    async fn enter_opens_detail_and_escape_releases_it() {
        let catalog = two_page_catalog();
        catalog.pokemon(&name_for(2), pokemon_json(2, &name_for(2), &[]));
        let mut app = app_with(catalog);
        app.start();
        pump_until(&mut app, |e| matches!(e, AppEvent::PageLoaded { .. })).await;

        app.handle_event(key(KeyCode::Down));
        app.handle_event(key(KeyCode::Enter));
        pump_until(&mut app, |e| matches!(e, AppEvent::DetailLoaded { .. })).await;

        assert_eq!(app.current_view(), Some(&ViewKind::Detail(name_for(2))));
        assert_eq!(app.detail.view().unwrap().item.id, 2);

        app.handle_event(key(KeyCode::Esc));
        pump_until(&mut app, |e| matches!(e, AppEvent::PopView)).await;
        assert_eq!(app.current_view(), Some(&ViewKind::List));
        assert_eq!(app.detail.phase(), &Phase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn typing_jumps_to_item_after_quiet_period() {
        let catalog = FakeCatalog::new();
        catalog.pokemon("pikachu", pokemon_json(25, "pikachu", &[]));
        let mut app = app_with(catalog);

        app.handle_event(key(KeyCode::Char('/')));
        for c in "Pikachu".chars() {
            app.handle_event(key(KeyCode::Char(c)));
        }
        assert_eq!(app.mode, AppMode::Search);

        pump_until(&mut app, |e| matches!(e, AppEvent::SearchSettled(_))).await;
        assert_eq!(app.current_view(), Some(&ViewKind::Detail("pikachu".into())));

        pump_until(&mut app, |e| matches!(e, AppEvent::DetailLoaded { .. })).await;
        assert_eq!(app.detail.view().unwrap().item.name, "pikachu");
    }

    #[tokio::test]
    async fn unknown_search_reports_not_found() {
        let catalog = FakeCatalog::new();
        catalog.status(&pokemon_url(FAKE_BASE, "999999"), 404);
        let mut app = app_with(catalog);

        app.handle_event(key(KeyCode::Char('/')));
        for c in "999999".chars() {
            app.handle_event(key(KeyCode::Char(c)));
        }
        app.handle_event(key(KeyCode::Enter));
        assert_eq!(app.mode, AppMode::Normal);

        pump_until(&mut app, |e| matches!(e, AppEvent::DetailLoaded { .. })).await;
        assert_eq!(
            app.detail.phase().failure().map(|f| f.kind),
            Some(ErrorKind::NotFound)
        );
        assert_eq!(app.status_message.as_deref(), Some("No such item"));
        assert!(app.error_detail.is_some());

        // Any key other than Esc/Enter is swallowed by the error popup.
        app.handle_event(key(KeyCode::Char('j')));
        assert!(app.error_detail.is_some());
        app.handle_event(key(KeyCode::Enter));
        assert!(app.error_detail.is_none());
    }

    #[tokio::test]
    async fn failed_page_leaves_nothing_to_select() {
        let catalog = FakeCatalog::new();
        let root = listing_cursor(0, 2);
        let second = listing_cursor(2, 2);
        catalog.page(&root, &[1, 2], Some(&second), None);
        catalog.page(&second, &[3, 4], None, Some(&root));
        listed_pokemon_ids(&catalog, &[1, 2, 3]);
        catalog.status(&listing_detail_url(4), 503);
        let mut app = app_with(catalog);
        app.start();
        pump_until(&mut app, |e| matches!(e, AppEvent::PageLoaded { .. })).await;

        app.handle_event(key(KeyCode::Char('n')));
        pump_until(&mut app, |e| matches!(e, AppEvent::PageLoaded { .. })).await;
        assert!(app.list.items().is_empty());
        assert_eq!(
            app.status_message.as_deref(),
            Some("Network error loading page")
        );

        // Dismiss the popup, then selection keys have nothing to act on.
        app.handle_event(key(KeyCode::Esc));
        app.handle_event(key(KeyCode::Down));
        assert_eq!(app.selected_index(), 0);
        app.handle_event(key(KeyCode::Enter));
        assert_eq!(app.view_stack.len(), 1);

        app.handle_event(key(KeyCode::Char('p')));
        pump_until(&mut app, |e| matches!(e, AppEvent::PageLoaded { .. })).await;
        assert_eq!(app.list.cursor(), root);
        assert_eq!(app.list.items()[0].id, 1);
    }

    #[tokio::test]
    async fn search_for_non_identifier_stays_on_list() {
        let mut app = app_with(FakeCatalog::new());
        app.handle_event(key(KeyCode::Char('/')));
        for c in "25.5".chars() {
            app.handle_event(key(KeyCode::Char(c)));
        }
        app.handle_event(key(KeyCode::Enter));
        pump_until(&mut app, |e| matches!(e, AppEvent::SearchSettled(_))).await;

        assert_eq!(app.current_view(), Some(&ViewKind::List));
        assert_eq!(
            app.status_message.as_deref(),
            Some("Not a name or number: 25.5")
        );
    }

    #[tokio::test]
    async fn escape_in_search_cancels_pending_lookup() {
        let mut app = app_with(FakeCatalog::new());
        app.handle_event(key(KeyCode::Char('/')));
        app.handle_event(key(KeyCode::Char('a')));
        app.handle_event(key(KeyCode::Esc));

        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.search_input.is_empty());
        assert!(!app.search.is_pending());
    }
}

use futures::future::try_join_all;

use crate::api::pokemon::{get_page, get_pokemon_at};
use crate::api::{ApiClientError, Catalog};
use crate::model::ItemDetail;
use crate::sync::{Generation, Phase, SyncFailure};

/// One listing page with every entry fully fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPage {
    pub items: Vec<ItemDetail>,
    pub next: Option<String>,
    pub previous: Option<String>,
}

/// Work order handed out when the cursor changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub generation: Generation,
    pub cursor: String,
}

/// Fetch the page at `cursor`, then every entry's detail concurrently.
///
/// Items come back in listing order no matter which detail request finishes
/// first. Any failed request fails the whole page.
pub async fn fetch_page<C: Catalog>(
    catalog: &C,
    cursor: &str,
) -> Result<CatalogPage, ApiClientError> {
    let list = get_page(catalog, cursor).await?;

    let details = try_join_all(
        list.results
            .iter()
            .map(|entry| get_pokemon_at(catalog, &entry.url)),
    )
    .await?;

    Ok(CatalogPage {
        items: details.into_iter().map(ItemDetail::from).collect(),
        next: list.next,
        previous: list.previous,
    })
}

/// Cursor-driven pagination state.
///
/// While a page is loading the previously committed page stays readable; the
/// new page replaces it in the same call that clears the loading phase. A
/// failed load drops it, so items never outlive the cursor they came from.
#[derive(Debug)]
pub struct ListSynchronizer {
    cursor: String,
    generation: Generation,
    phase: Phase,
    page: Option<CatalogPage>,
    /// Cursor of the last page that loaded successfully.
    last_good: Option<String>,
}

impl ListSynchronizer {
    pub fn new(root_cursor: String) -> Self {
        Self {
            cursor: root_cursor,
            generation: 0,
            phase: Phase::Idle,
            page: None,
            last_good: None,
        }
    }

    /// (Re)load the current cursor.
    pub fn start(&mut self) -> PageRequest {
        self.generation += 1;
        self.phase = Phase::Loading;
        tracing::debug!(generation = self.generation, cursor = %self.cursor, "page load started");
        PageRequest {
            generation: self.generation,
            cursor: self.cursor.clone(),
        }
    }

    pub fn set_cursor(&mut self, cursor: String) -> PageRequest {
        self.cursor = cursor;
        self.start()
    }

    /// Move to the next page. `None` when there is no next page.
    pub fn next_page(&mut self) -> Option<PageRequest> {
        let cursor = self.next_cursor()?.to_string();
        Some(self.set_cursor(cursor))
    }

    /// Move to the previous page. `None` when there is no previous page.
    pub fn prev_page(&mut self) -> Option<PageRequest> {
        let cursor = self.prev_cursor()?.to_string();
        Some(self.set_cursor(cursor))
    }

    /// Commit a finished load. Returns `false` when the result was stale and
    /// has been dropped.
    pub fn apply(
        &mut self,
        generation: Generation,
        result: Result<CatalogPage, SyncFailure>,
    ) -> bool {
        if generation != self.generation || !self.phase.is_loading() {
            tracing::debug!(
                generation,
                current = self.generation,
                "discarding stale page result"
            );
            return false;
        }

        match result {
            Ok(page) => {
                tracing::debug!(generation, items = page.items.len(), "page committed");
                self.page = Some(page);
                self.last_good = Some(self.cursor.clone());
                self.phase = Phase::Ready;
            }
            Err(failure) => {
                tracing::warn!(generation, cursor = %self.cursor, "page load failed: {failure}");
                self.page = None;
                self.phase = Phase::Failed(failure);
            }
        }
        true
    }

    pub fn cursor(&self) -> &str {
        &self.cursor
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase.is_loading()
    }

    /// Items of the last committed page.
    pub fn items(&self) -> &[ItemDetail] {
        self.page.as_ref().map_or(&[], |p| p.items.as_slice())
    }

    /// Next cursor of the page on display. Only available once that page is
    /// the one the current cursor points at.
    pub fn next_cursor(&self) -> Option<&str> {
        self.ready_page().and_then(|p| p.next.as_deref())
    }

    /// After a failed load this leads back to the last page that loaded.
    pub fn prev_cursor(&self) -> Option<&str> {
        match self.phase {
            Phase::Failed(_) => self
                .last_good
                .as_deref()
                .filter(|&cursor| cursor != self.cursor),
            _ => self.ready_page().and_then(|p| p.previous.as_deref()),
        }
    }

    fn ready_page(&self) -> Option<&CatalogPage> {
        match self.phase {
            Phase::Ready => self.page.as_ref(),
            _ => None,
        }
    }
}

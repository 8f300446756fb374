use crate::api::pokemon::{get_pokemon, get_type, normalize_identifier};
use crate::api::{ApiClientError, Catalog};
use crate::model::{ItemDetail, RelatedItem, related_from_type};
use crate::sync::{Generation, Phase, SyncFailure};

/// One item plus up to five others sharing its primary type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub item: ItemDetail,
    pub related: Vec<RelatedItem>,
}

impl DetailView {
    /// Related items only make sense when the item has a type at all.
    pub fn shows_related(&self) -> bool {
        self.item.primary_category().is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRequest {
    pub generation: Generation,
    pub identifier: String,
}

/// Fetch an item by id or name, then its primary type's first members.
///
/// Items without a type skip the type lookup entirely.
pub async fn fetch_detail<C: Catalog>(
    catalog: &C,
    identifier: &str,
) -> Result<DetailView, ApiClientError> {
    let item = ItemDetail::from(get_pokemon(catalog, identifier).await?);

    let related = match item.primary_category() {
        Some(type_name) => related_from_type(get_type(catalog, type_name).await?),
        None => Vec::new(),
    };

    Ok(DetailView { item, related })
}

/// Identifier-driven detail state. Nothing is cached across identifiers.
#[derive(Debug, Default)]
pub struct DetailSynchronizer {
    identifier: Option<String>,
    generation: Generation,
    phase: Phase,
    view: Option<DetailView>,
}

impl DetailSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point at a new identifier. Returns `None` if it is the one already
    /// shown (after normalization) and that one did not fail.
    pub fn set_identifier(&mut self, identifier: &str) -> Option<DetailRequest> {
        let identifier = normalize_identifier(identifier);
        if identifier.is_empty() {
            return None;
        }
        if self.identifier.as_deref() == Some(identifier.as_str())
            && !matches!(self.phase, Phase::Failed(_) | Phase::Idle)
        {
            return None;
        }

        self.identifier = Some(identifier);
        self.view = None;
        self.reload()
    }

    /// Fetch the current identifier again from scratch.
    pub fn reload(&mut self) -> Option<DetailRequest> {
        let identifier = self.identifier.clone()?;
        self.generation += 1;
        self.phase = Phase::Loading;
        tracing::debug!(generation = self.generation, %identifier, "detail load started");
        Some(DetailRequest {
            generation: self.generation,
            identifier,
        })
    }

    /// Forget everything, invalidating any request still in flight.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.identifier = None;
        self.phase = Phase::Idle;
        self.view = None;
    }

    /// Commit a finished load. Returns `false` when the result was stale.
    pub fn apply(
        &mut self,
        generation: Generation,
        result: Result<DetailView, SyncFailure>,
    ) -> bool {
        if generation != self.generation || !self.phase.is_loading() {
            tracing::debug!(generation, current = self.generation, "discarding stale detail");
            return false;
        }

        match result {
            Ok(view) => {
                self.view = Some(view);
                self.phase = Phase::Ready;
            }
            Err(failure) => {
                tracing::warn!(generation, identifier = ?self.identifier, "detail load failed: {failure}");
                self.view = None;
                self.phase = Phase::Failed(failure);
            }
        }
        true
    }

    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase.is_loading()
    }

    pub fn view(&self) -> Option<&DetailView> {
        self.view.as_ref()
    }
}

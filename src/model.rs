use serde::Serialize;

use crate::api::types::{NamedResource, Pokemon, TypeResponse};

/// Related items kept per detail view.
pub const RELATED_LIMIT: usize = 5;

/// What to show where a picture would go.
///
/// `Ordinal` is the legacy fallback: when the record has no dream-world
/// artwork, the record's `order` number is shown instead of an image URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Artwork {
    DreamWorld(String),
    Ordinal(i64),
    Missing,
}

impl Artwork {
    pub fn from_pokemon(p: &Pokemon) -> Self {
        match (p.dream_world_artwork(), p.order) {
            (Some(url), _) => Self::DreamWorld(url.to_string()),
            (None, Some(order)) => Self::Ordinal(order),
            (None, None) => Self::Missing,
        }
    }

    /// The string the list and detail views display.
    pub fn display(&self) -> Option<String> {
        match self {
            Self::DreamWorld(url) => Some(url.clone()),
            Self::Ordinal(order) => Some(order.to_string()),
            Self::Missing => None,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Self::DreamWorld(url) => Some(url),
            _ => None,
        }
    }
}

/// A fully fetched catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemDetail {
    pub id: u32,
    pub name: String,
    pub image: Artwork,
    /// Decimetres.
    pub height: u32,
    /// Hectograms.
    pub weight: u32,
    /// Type names in the order the service lists them.
    pub categories: Vec<String>,
}

impl From<Pokemon> for ItemDetail {
    fn from(p: Pokemon) -> Self {
        let image = Artwork::from_pokemon(&p);
        Self {
            id: p.id,
            name: p.name,
            image,
            height: p.height,
            weight: p.weight,
            categories: p.types.into_iter().map(|t| t.type_.name).collect(),
        }
    }
}

impl ItemDetail {
    pub fn primary_category(&self) -> Option<&str> {
        self.categories.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedItem {
    pub name: String,
    pub detail_url: String,
}

impl From<NamedResource> for RelatedItem {
    fn from(r: NamedResource) -> Self {
        Self {
            name: r.name,
            detail_url: r.url,
        }
    }
}

/// First [`RELATED_LIMIT`] members of a type, in service order.
pub fn related_from_type(resp: TypeResponse) -> Vec<RelatedItem> {
    resp.pokemon
        .into_iter()
        .take(RELATED_LIMIT)
        .map(|m| RelatedItem::from(m.pokemon))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{pokemon_json, type_json};

    fn pokemon(value: serde_json::Value) -> Pokemon {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn artwork_prefers_dream_world() {
        let p = pokemon(pokemon_json(1, "bulbasaur", &["grass", "poison"]));
        let detail = ItemDetail::from(p);
        assert!(matches!(detail.image, Artwork::DreamWorld(_)));
        assert_eq!(detail.categories, vec!["grass", "poison"]);
    }

    #[test]
    fn artwork_falls_back_to_order() {
        let mut raw = pokemon_json(10_001, "deoxys-attack", &["psychic"]);
        raw["sprites"] = serde_json::json!({ "other": { "dream_world": { "front_default": null } } });
        raw["order"] = serde_json::json!(433);
        let detail = ItemDetail::from(pokemon(raw));
        assert_eq!(detail.image, Artwork::Ordinal(433));
        assert_eq!(detail.image.display().as_deref(), Some("433"));
        assert_eq!(detail.image.url(), None);
    }

    #[test]
    fn artwork_missing_entirely() {
        let mut raw = pokemon_json(7, "squirtle", &["water"]);
        raw["sprites"] = serde_json::json!({});
        raw.as_object_mut().unwrap().remove("order");
        let detail = ItemDetail::from(pokemon(raw));
        assert_eq!(detail.image, Artwork::Missing);
        assert_eq!(detail.image.display(), None);
    }

    #[test]
    fn categories_keep_service_order() {
        let mut raw = pokemon_json(6, "charizard", &[]);
        raw["types"] = serde_json::json!([
            { "slot": 2, "type": { "name": "flying", "url": "u" } },
            { "slot": 1, "type": { "name": "fire", "url": "u" } }
        ]);
        let detail = ItemDetail::from(pokemon(raw));
        assert_eq!(detail.categories, vec!["flying", "fire"]);
        assert_eq!(detail.primary_category(), Some("flying"));
    }

    #[test]
    fn related_truncates_to_five_in_order() {
        let names: Vec<String> = (0..12).map(|i| format!("member-{i}")).collect();
        let resp: TypeResponse = serde_json::from_value(type_json(&names)).unwrap();
        let related = related_from_type(resp);
        assert_eq!(related.len(), 5);
        let got: Vec<&str> = related.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            got,
            vec!["member-0", "member-1", "member-2", "member-3", "member-4"]
        );
    }
}

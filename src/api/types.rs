use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// One page of `GET /pokemon?offset=..&limit=..`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedResourceList {
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<NamedResource>,
}

/// A `{ name, url }` pointer to another resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

// ---------------------------------------------------------------------------
// Pokemon
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub sprites: Sprites,
    #[serde(default)]
    pub types: Vec<PokemonTypeSlot>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sprites {
    #[serde(default)]
    pub other: Option<OtherSprites>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OtherSprites {
    #[serde(default)]
    pub dream_world: Option<SpriteSet>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpriteSet {
    #[serde(default)]
    pub front_default: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonTypeSlot {
    #[serde(rename = "type")]
    pub type_: NamedResource,
}

impl Pokemon {
    /// The dream-world artwork URL, when the service supplied one.
    pub fn dream_world_artwork(&self) -> Option<&str> {
        self.sprites
            .other
            .as_ref()
            .and_then(|o| o.dream_world.as_ref())
            .and_then(|d| d.front_default.as_deref())
    }
}

// ---------------------------------------------------------------------------
// Type (category) lookup
// ---------------------------------------------------------------------------

/// `GET /type/{name}`. Only the member list is needed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeResponse {
    #[serde(default)]
    pub pokemon: Vec<TypeMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeMember {
    pub pokemon: NamedResource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pokemon_without_other_sprites_has_no_artwork() {
        let raw = serde_json::json!({
            "id": 10,
            "name": "caterpie",
            "order": 14,
            "height": 3,
            "weight": 29,
            "sprites": { "front_default": "https://img/10.png" },
            "types": [{ "slot": 1, "type": { "name": "bug", "url": "https://x/type/7/" } }]
        });
        let p: Pokemon = serde_json::from_value(raw).unwrap();
        assert_eq!(p.dream_world_artwork(), None);
        assert_eq!(p.types[0].type_.name, "bug");
    }

    #[test]
    fn pokemon_with_dream_world_artwork() {
        let raw = serde_json::json!({
            "id": 1,
            "name": "bulbasaur",
            "order": 1,
            "height": 7,
            "weight": 69,
            "sprites": { "other": { "dream_world": { "front_default": "https://img/1.svg" } } },
            "types": []
        });
        let p: Pokemon = serde_json::from_value(raw).unwrap();
        assert_eq!(p.dream_world_artwork(), Some("https://img/1.svg"));
    }

    #[test]
    fn list_accepts_null_cursors() {
        let raw = serde_json::json!({
            "count": 1302,
            "next": null,
            "previous": "https://pokeapi.co/api/v2/pokemon?offset=1280&limit=20",
            "results": [{ "name": "a", "url": "https://x/1/" }]
        });
        let page: NamedResourceList = serde_json::from_value(raw).unwrap();
        assert!(page.next.is_none());
        assert_eq!(page.results.len(), 1);
    }
}

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::api::types::{NamedResourceList, Pokemon, TypeResponse};
use crate::api::{ApiClientError, Catalog};

/// Percent-encoding set for a single path segment (encode everything except unreserved chars).
const SEGMENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn encode_segment(s: &str) -> String {
    utf8_percent_encode(s, SEGMENT_ENCODE_SET).to_string()
}

/// The first listing page: `<base>/pokemon?offset=0&limit=<page_size>`.
pub fn root_cursor(base_url: &str, page_size: u32) -> String {
    let limit = page_size.clamp(1, 100);
    format!("{base_url}/pokemon?offset=0&limit={limit}")
}

/// Normalize a user-supplied identifier (numeric id or name).
///
/// The service only knows lowercase names, so `Pikachu ` becomes `pikachu`.
pub fn normalize_identifier(identifier: &str) -> String {
    identifier.trim().to_lowercase()
}

/// Detail URL for an identifier.
pub fn pokemon_url(base_url: &str, identifier: &str) -> String {
    format!(
        "{base_url}/pokemon/{}",
        encode_segment(&normalize_identifier(identifier))
    )
}

/// Category lookup URL for a type name.
pub fn type_url(base_url: &str, type_name: &str) -> String {
    format!("{base_url}/type/{}", encode_segment(type_name))
}

/// Fetch one listing page at an opaque cursor URL.
pub async fn get_page<C: Catalog>(
    catalog: &C,
    cursor: &str,
) -> Result<NamedResourceList, ApiClientError> {
    catalog.get_json(cursor).await
}

/// Fetch a pokemon from the detail URL handed out by a listing page.
pub async fn get_pokemon_at<C: Catalog>(catalog: &C, url: &str) -> Result<Pokemon, ApiClientError> {
    catalog.get_json(url).await
}

/// Fetch a pokemon by numeric id or exact name.
pub async fn get_pokemon<C: Catalog>(
    catalog: &C,
    identifier: &str,
) -> Result<Pokemon, ApiClientError> {
    let url = pokemon_url(catalog.base_url(), identifier);
    catalog.get_json(&url).await
}

/// Fetch the members of a type (category).
pub async fn get_type<C: Catalog>(
    catalog: &C,
    type_name: &str,
) -> Result<TypeResponse, ApiClientError> {
    let url = type_url(catalog.base_url(), type_name);
    catalog.get_json(&url).await
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://pokeapi.co/api/v2";

    #[test]
    fn root_cursor_clamps_limit() {
        assert_eq!(
            root_cursor(BASE, 20),
            "https://pokeapi.co/api/v2/pokemon?offset=0&limit=20"
        );
        assert_eq!(
            root_cursor(BASE, 0),
            "https://pokeapi.co/api/v2/pokemon?offset=0&limit=1"
        );
        assert_eq!(
            root_cursor(BASE, 5000),
            "https://pokeapi.co/api/v2/pokemon?offset=0&limit=100"
        );
    }

    #[test]
    fn pokemon_url_normalizes_identifier() {
        assert_eq!(
            pokemon_url(BASE, "  Pikachu "),
            "https://pokeapi.co/api/v2/pokemon/pikachu"
        );
        assert_eq!(pokemon_url(BASE, "25"), "https://pokeapi.co/api/v2/pokemon/25");
    }

    #[test]
    fn pokemon_url_encodes_path_separators() {
        assert_eq!(
            pokemon_url(BASE, "mr mime/../x"),
            "https://pokeapi.co/api/v2/pokemon/mr%20mime%2F..%2Fx"
        );
    }

    #[test]
    fn type_url_for_name() {
        assert_eq!(type_url(BASE, "grass"), "https://pokeapi.co/api/v2/type/grass");
    }
}

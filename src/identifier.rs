use url::Url;

/// Turn what a user typed into a catalog identifier.
///
/// Accepts a numeric id (`25`, `#25`, `#025`), a name (`Mr. Mime` becomes
/// `mr-mime`), or a catalog detail URL such as
/// `https://pokeapi.co/api/v2/pokemon/25/`.
pub fn parse_identifier(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return identifier_from_url(trimmed);
    }

    let without_hash = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if !without_hash.is_empty() && without_hash.chars().all(|c| c.is_ascii_digit()) {
        let id = without_hash.trim_start_matches('0');
        return (!id.is_empty()).then(|| id.to_owned());
    }

    // Names always carry a letter; `25.5` or `1,000` are neither.
    if !trimmed.chars().any(char::is_alphabetic) {
        return None;
    }
    let name = slugify(trimmed);
    (!name.is_empty()).then_some(name)
}

/// Path: `.../pokemon/<id-or-name>/`
fn identifier_from_url(input: &str) -> Option<String> {
    let url = Url::parse(input).ok()?;
    let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
    let pos = segments.iter().rposition(|&s| s == "pokemon")?;
    let ident = segments.get(pos + 1)?;
    Some(ident.to_lowercase())
}

/// Lowercase, spaces to dashes, drop punctuation the service never uses.
fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            c if c.is_alphanumeric() => out.extend(c.to_lowercase()),
            ' ' | '-' | '_' if !out.ends_with('-') && !out.is_empty() => out.push('-'),
            _ => {}
        }
    }
    out.trim_end_matches('-').to_owned()
}

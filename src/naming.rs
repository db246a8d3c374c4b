//! Pure string transforms used to derive storage names from domain names.
//!
//! Every function here is total: empty input produces a well-defined result
//! rather than an error, so callers never need to guard before naming.

/// Suffixes stripped from a contract name to recover the managed entity name.
///
/// Longest first so that `Repository` wins over `Repo`.
const CONTRACT_SUFFIXES: &[&str] = &["Repository", "Gateway", "Store", "Repo", "Port", "Dao"];

/// Entity name used when nothing can be inferred from a contract name.
pub const FALLBACK_ENTITY_NAME: &str = "Entity";

/// Convert a camelCase or PascalCase identifier to snake_case.
///
/// Acronym runs are kept together (`HTTPServer` becomes `http_server`) and
/// digits stay attached to the word they follow.
///
/// ```
/// use persistplan::naming::to_snake_case;
///
/// assert_eq!(to_snake_case("OrderItem"), "order_item");
/// assert_eq!(to_snake_case("customerId"), "customer_id");
/// ```
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == '-' || c == ' ' {
            push_separator(&mut out);
            continue;
        }
        if c.is_uppercase() {
            if i > 0 && needs_boundary(&chars, i) {
                push_separator(&mut out);
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }

    out
}

fn needs_boundary(chars: &[char], i: usize) -> bool {
    let prev = chars[i - 1];
    if prev == '_' {
        return false;
    }
    if prev.is_lowercase() || prev.is_ascii_digit() {
        return true;
    }
    // End of an acronym run: "HTTPServer" splits before the 'S'.
    prev.is_uppercase() && chars.get(i + 1).is_some_and(|next| next.is_lowercase())
}

fn push_separator(out: &mut String) {
    if !out.is_empty() && !out.ends_with('_') {
        out.push('_');
    }
}

/// Pluralize an English noun (or the last word of a snake_case phrase).
///
/// Covers the rules storage naming relies on: consonant + `y` becomes
/// `ies`, sibilant endings (`s`, `x`, `z`, `ch`, `sh`) take `es`, everything
/// else takes `s`.
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    let lower = word.to_lowercase();
    if let Some(stem) = word.strip_suffix('y').or_else(|| word.strip_suffix('Y')) {
        let before = stem.chars().last();
        if before.is_some_and(|c| !is_vowel(c)) {
            return format!("{stem}ies");
        }
    }

    if ["s", "x", "z", "ch", "sh"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        return format!("{word}es");
    }

    format!("{word}s")
}

fn is_vowel(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Table name for an entity: snake_case of the name with the last word pluralized.
///
/// ```
/// use persistplan::naming::to_table_name;
///
/// assert_eq!(to_table_name("OrderItem"), "order_items");
/// assert_eq!(to_table_name("Address"), "addresses");
/// ```
pub fn to_table_name(entity_name: &str) -> String {
    pluralize(&to_snake_case(entity_name))
}

/// Infer the managed entity name from a repository-style contract name.
///
/// Returns [`FALLBACK_ENTITY_NAME`] for an empty name or a name that is only
/// a suffix.
pub fn infer_entity_name(contract_name: &str) -> String {
    let simple = contract_name.rsplit('.').next().unwrap_or(contract_name);
    let stripped = CONTRACT_SUFFIXES
        .iter()
        .find_map(|suffix| simple.strip_suffix(suffix).filter(|rest| !rest.is_empty()))
        .unwrap_or(simple);

    if stripped.is_empty() || CONTRACT_SUFFIXES.contains(&stripped) {
        FALLBACK_ENTITY_NAME.to_string()
    } else {
        stripped.to_string()
    }
}

/// Lower-case the first character (`EmailAddress` → `emailAddress`).
pub fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Upper-case the first character (`emailAddress` → `EmailAddress`).
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Split an identifier into lower-case words, e.g. `createdAt` → `["created", "at"]`.
pub fn words(name: &str) -> Vec<String> {
    to_snake_case(name)
        .split('_')
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

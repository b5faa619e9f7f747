//! URL-safe slug generation.
//!
//! Product and category slugs are derived from Spanish display names, so the
//! fold handles the accented vowels and ñ/ü that actually occur in them.

/// Derive a URL-safe slug from a display name.
///
/// Lowercases, folds accented Latin characters to ASCII, drops everything
/// outside `[a-z0-9 -]`, converts whitespace runs to single hyphens, and
/// collapses hyphen runs.
///
/// ```
/// use telar_core::slug::slugify;
///
/// assert_eq!(slugify("Cojín Artesanal Ñandú"), "cojin-artesanal-nandu");
/// assert_eq!(slugify("  Manta -- Tejida  "), "manta-tejida");
/// ```
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_hyphen = true; // suppress leading hyphens

    for c in name.to_lowercase().chars() {
        let folded = fold_accent(c);
        let keep = match folded {
            'a'..='z' | '0'..='9' => {
                slug.push(folded);
                true
            }
            ' ' | '\t' | '\n' | '-' => {
                if !last_was_hyphen {
                    slug.push('-');
                }
                false
            }
            _ => continue,
        };
        last_was_hyphen = !keep;
    }

    if slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Map an accented lowercase Latin character to its ASCII base.
const fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' | 'ã' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn folds_spanish_accents() {
        assert_eq!(slugify("Cojín de Algodón"), "cojin-de-algodon");
        assert_eq!(slugify("Diseño Ñapa"), "diseno-napa");
    }

    #[test]
    fn strips_special_characters() {
        assert_eq!(slugify("Manta 100% lana (gris)"), "manta-100-lana-gris");
    }

    #[test]
    fn collapses_separator_runs() {
        assert_eq!(slugify("uno  --  dos"), "uno-dos");
    }

    #[test]
    fn trims_edge_hyphens() {
        assert_eq!(slugify(" - cojín - "), "cojin");
    }

    #[test]
    fn empty_and_symbol_only_input_yields_empty_slug() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("¡¿!?"), "");
    }
}

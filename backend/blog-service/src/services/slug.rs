/// Slug allocation: text normalization plus a uniqueness probe against the
/// owning entity's table.
///
/// The probe is an optimization for a friendly slug; the database unique
/// constraint remains the authoritative guard. A concurrent writer that wins
/// the race surfaces as a unique violation at insert time, reported as a
/// conflict rather than retried.
use crate::error::{AppError, Result};
use sqlx::PgPool;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

/// Which entity table a slug must be unique within.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlugScope {
    Posts,
    Categories,
    Tags,
}

impl SlugScope {
    fn table(self) -> &'static str {
        match self {
            SlugScope::Posts => "posts",
            SlugScope::Categories => "categories",
            SlugScope::Tags => "tags",
        }
    }
}

/// Normalize free text into a URL-safe slug.
///
/// Decomposes Unicode, strips diacritics, lowercases, collapses whitespace to
/// single hyphens, drops everything outside letters/numbers/hyphens, collapses
/// repeated hyphens, and trims hyphens from both ends. Idempotent on already
/// normalized slugs.
///
/// Fails when the input is empty/whitespace-only, or when nothing slug-worthy
/// survives normalization.
pub fn slugify(raw: &str) -> Result<String> {
    if raw.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Invalid title provided for slug generation: it must be a non-empty string".to_string(),
        ));
    }

    let decomposed: String = raw.nfd().filter(|c| !is_combining_mark(*c)).collect();

    let hyphenated: String = decomposed
        .to_lowercase()
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .filter(|c| c.is_alphanumeric() || *c == '-')
        .collect();

    let mut slug = String::with_capacity(hyphenated.len());
    for c in hyphenated.chars() {
        if c == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(c);
    }
    let slug = slug.trim_matches('-').to_string();

    if slug.is_empty() {
        return Err(AppError::BadRequest(
            "Unable to generate slug from the provided input".to_string(),
        ));
    }

    Ok(slug)
}

/// Probe the scope's table until a free slug is found, starting from `base`
/// and appending `-N` on collisions. `exclude_id` skips the row being updated
/// so a row can keep its own slug.
pub async fn ensure_unique_slug(
    pool: &PgPool,
    scope: SlugScope,
    base: &str,
    exclude_id: Option<Uuid>,
) -> Result<String> {
    if base.is_empty() {
        return Err(AppError::BadRequest(
            "Invalid slug provided for uniqueness check: it must be a non-empty string".to_string(),
        ));
    }

    let query = format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE slug = $1 AND ($2::uuid IS NULL OR id <> $2))",
        scope.table()
    );

    let mut candidate = base.to_string();
    let mut count: u32 = 0;

    loop {
        let taken: bool = sqlx::query_scalar(&query)
            .bind(&candidate)
            .bind(exclude_id)
            .fetch_one(pool)
            .await?;

        if !taken {
            return Ok(candidate);
        }

        count += 1;
        candidate = format!("{base}-{count}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_title() {
        assert_eq!(slugify("Hello, World!").unwrap(), "hello-world");
    }

    #[test]
    fn idempotent_on_normalized_slug() {
        let once = slugify("Some Long Post Title").unwrap();
        let twice = slugify(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn strips_diacritics() {
        assert_eq!(slugify("Crème Brûlée Recipes").unwrap(), "creme-brulee-recipes");
    }

    #[test]
    fn keeps_non_latin_letters() {
        assert_eq!(slugify("日本語 タイトル").unwrap(), "日本語-タイトル");
    }

    #[test]
    fn collapses_whitespace_and_hyphens() {
        assert_eq!(slugify("  a   b --- c  ").unwrap(), "a-b-c");
    }

    #[test]
    fn trims_leading_and_trailing_hyphens() {
        assert_eq!(slugify("--wrapped in hyphens--").unwrap(), "wrapped-in-hyphens");
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(slugify(""), Err(AppError::BadRequest(_))));
        assert!(matches!(slugify("   "), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn rejects_input_with_no_slug_characters() {
        assert!(matches!(slugify("!!! ??? ..."), Err(AppError::BadRequest(_))));
    }
}

//! Category vocabulary for supply/need matching.
//!
//! Categories are free text. Two categories match exactly when they compare
//! equal case-insensitively, and are *related* when both belong to the same
//! fixed family below. Unknown categories are only exact-matchable.

/// Category families. Relatedness is symmetric within a group; the family
/// key itself is a member. The loose "Supplies"/"Emergency" membership under
/// Food is kept verbatim from the operational table.
const CATEGORY_FAMILIES: &[&[&str]] = &[
    &["medical", "health", "firstaid", "medicine", "pharmaceutical"],
    &["food", "nutrition", "supplies", "rations", "emergency"],
    &["shelter", "housing", "tents", "blankets", "bedding"],
    &["water", "hydration", "sanitation", "hygiene"],
    &["equipment", "tools", "gear", "machinery"],
];

/// Case-insensitive exact category match.
#[must_use]
pub fn categories_match(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Whether two categories belong to the same family. Exact matches are not
/// considered "related" — callers check [`categories_match`] first.
#[must_use]
pub fn categories_related(a: &str, b: &str) -> bool {
    let a = a.trim();
    let b = b.trim();
    CATEGORY_FAMILIES.iter().any(|family| {
        family.iter().any(|m| m.eq_ignore_ascii_case(a))
            && family.iter().any(|m| m.eq_ignore_ascii_case(b))
    })
}

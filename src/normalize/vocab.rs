//! Fixed vocabularies used by label normalization.

/// Tokens carrying no diagnostic signal, dropped during normalization.
pub const GENERIC_TERMS: &[&str] = &[
    "of", "the", "and", "on", "in", "plant", "plants", "crop", "crops",
];

/// Plant-part terms treated as location hints.
pub const LOCATION_TERMS: &[&str] = &[
    "leaf", "leaves", "stem", "stems", "fruit", "fruits", "root", "roots", "seed", "seeds",
    "flower", "flowers", "bark", "shoot", "branch",
];

/// Common host genera/crops as they appear in CV model labels.
///
/// The list is intentionally colloquial (crop names, not Latin binomials):
/// vision models are trained on dataset class names like "Wheat leaf rust",
/// not on EPPO preferred names.
pub const HOST_GENERA: &[&str] = &[
    "apple", "banana", "barley", "bean", "cabbage", "carrot", "cassava", "cherry", "citrus",
    "coffee", "corn", "cotton", "cucumber", "grape", "lettuce", "maize", "mango", "oat", "olive",
    "onion", "pea", "peach", "pepper", "potato", "rapeseed", "rice", "rye", "sorghum", "soybean",
    "strawberry", "sugarcane", "sunflower", "tobacco", "tomato", "wheat",
];

/// Returns `true` if `token` is a stop-word.
pub fn is_generic_term(token: &str) -> bool {
    GENERIC_TERMS.contains(&token)
}

/// Returns `true` if `token` names a plant part.
pub fn is_location_term(token: &str) -> bool {
    LOCATION_TERMS.contains(&token)
}

/// Returns `true` if `token` names a known host genus/crop.
pub fn is_host_genus(token: &str) -> bool {
    HOST_GENERA.binary_search(&token).is_ok()
}

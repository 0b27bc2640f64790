//! Normalization of free-text Provider categories into the closed
//! [`AssociationCategory`] set.

use ludik_db::AssociationCategory;

/// Map a Provider category label to the internal category enum.
///
/// The mapping is closed: labels the Provider is known to emit (French
/// and English variants) map to their category, everything else falls
/// back to [`AssociationCategory::Other`]. An unrecognized label never
/// fails the record.
pub fn normalize_category(raw: Option<&str>) -> AssociationCategory {
    let Some(raw) = raw else {
        return AssociationCategory::Other;
    };

    match raw.trim().to_lowercase().as_str() {
        "sport" | "sports" => AssociationCategory::Sport,
        "culture" | "arts" | "arts et culture" | "patrimoine" => AssociationCategory::Culture,
        "musique" | "music" | "chant" => AssociationCategory::Music,
        "danse" | "dance" => AssociationCategory::Dance,
        "théâtre" | "theatre" | "spectacle" => AssociationCategory::Theatre,
        "éducation" | "education" | "soutien scolaire" | "formation" => {
            AssociationCategory::Education
        }
        "loisirs" | "leisure" | "jeux" => AssociationCategory::Leisure,
        "solidarité" | "solidarite" | "entraide" | "humanitaire" => {
            AssociationCategory::Solidarity
        }
        _ => AssociationCategory::Other,
    }
}

pub mod bnt;
pub mod bpa;
pub mod corsi;
pub mod d2;
pub mod fv;
pub mod pcfo;
pub mod ravlt;
pub mod tin;

use crate::scoring::Stratifier;

/// Schooling levels used to key adult norms.
pub const SCHOOLING_LEVELS: &[&str] = &["fundamental_i", "fundamental_ii", "medio", "superior"];

/// School network used to key child phonological norms.
pub const SCHOOL_TYPES: &[&str] = &["publica", "privada"];

pub(crate) fn schooling() -> Stratifier {
    Stratifier {
        id: "escolaridade".to_string(),
        name: "Schooling level".to_string(),
        values: SCHOOLING_LEVELS.iter().map(|s| s.to_string()).collect(),
    }
}

pub(crate) fn school_type() -> Stratifier {
    Stratifier {
        id: "tipo_escola".to_string(),
        name: "School type".to_string(),
        values: SCHOOL_TYPES.iter().map(|s| s.to_string()).collect(),
    }
}

use psinorm_core::models::classification::{
    BandingScheme, ClassificationLabel, PercentileBand, StandardBand,
};
use psinorm_core::models::lookup::Lookup;
use serde::Serialize;

/// One tier of a banding scheme. A value belongs to the tier with the
/// greatest `lower` bound not above it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassificationBand {
    /// Inclusive lower bound; the first tier is open below.
    pub lower: f64,
    pub label: ClassificationLabel,
}

const PERCENTILE_BANDS: [ClassificationBand; 5] = [
    ClassificationBand {
        lower: f64::NEG_INFINITY,
        label: ClassificationLabel::Percentile(PercentileBand::Inferior),
    },
    ClassificationBand {
        lower: 6.0,
        label: ClassificationLabel::Percentile(PercentileBand::MediaInferior),
    },
    ClassificationBand {
        lower: 26.0,
        label: ClassificationLabel::Percentile(PercentileBand::Media),
    },
    ClassificationBand {
        lower: 75.0,
        label: ClassificationLabel::Percentile(PercentileBand::MediaSuperior),
    },
    ClassificationBand {
        lower: 95.0,
        label: ClassificationLabel::Percentile(PercentileBand::Superior),
    },
];

const STANDARD_BANDS: [ClassificationBand; 5] = [
    ClassificationBand {
        lower: f64::NEG_INFINITY,
        label: ClassificationLabel::Standard(StandardBand::MuitoBaixa),
    },
    ClassificationBand {
        lower: 70.0,
        label: ClassificationLabel::Standard(StandardBand::Baixa),
    },
    ClassificationBand {
        lower: 85.0,
        label: ClassificationLabel::Standard(StandardBand::Media),
    },
    ClassificationBand {
        lower: 115.0,
        label: ClassificationLabel::Standard(StandardBand::Alta),
    },
    ClassificationBand {
        lower: 130.0,
        label: ClassificationLabel::Standard(StandardBand::MuitoAlta),
    },
];

/// The five tiers of `scheme`, lowest first.
pub fn bands(scheme: BandingScheme) -> &'static [ClassificationBand; 5] {
    match scheme {
        BandingScheme::Percentile5 => &PERCENTILE_BANDS,
        BandingScheme::StandardScore5 => &STANDARD_BANDS,
    }
}

/// Map a percentile or standard score to its tier.
///
/// Total over finite values. NaN compares below every bound and lands in
/// the lowest tier; normative tables never author one.
pub fn classify(scheme: BandingScheme, value: f64) -> ClassificationLabel {
    let tiers = bands(scheme);
    tiers
        .iter()
        .rev()
        .find(|band| value >= band.lower)
        .unwrap_or(&tiers[0])
        .label
}

/// Classify a lookup outcome. Unavailable stays unavailable; it never
/// defaults to a label.
pub fn classify_lookup(scheme: BandingScheme, value: Lookup<f64>) -> Lookup<ClassificationLabel> {
    value.map(|v| classify(scheme, v))
}

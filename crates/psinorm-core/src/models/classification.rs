use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Which five-tier banding an instrument's normative scores are read against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum BandingScheme {
    /// Percentile rank (0–100).
    #[serde(rename = "percentile_5")]
    Percentile5,
    /// Standard score, mean 100, SD 15.
    #[serde(rename = "standard_score_5")]
    StandardScore5,
}

impl BandingScheme {
    /// Inclusive range of values a normative table may author for this scheme.
    pub fn scale(&self) -> (f64, f64) {
        match self {
            BandingScheme::Percentile5 => (0.0, 100.0),
            BandingScheme::StandardScore5 => (20.0, 160.0),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BandingScheme::Percentile5 => "percentile",
            BandingScheme::StandardScore5 => "standard score",
        }
    }
}

/// Tiers of the percentile scheme, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PercentileBand {
    Inferior,
    MediaInferior,
    Media,
    MediaSuperior,
    Superior,
}

/// Tiers of the standard-score scheme, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum StandardBand {
    MuitoBaixa,
    Baixa,
    Media,
    Alta,
    MuitoAlta,
}

/// An ordinal classification label, tagged with the scheme that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(tag = "scheme", content = "band")]
#[ts(export)]
pub enum ClassificationLabel {
    #[serde(rename = "percentile_5")]
    Percentile(PercentileBand),
    #[serde(rename = "standard_score_5")]
    Standard(StandardBand),
}

impl ClassificationLabel {
    pub fn scheme(&self) -> BandingScheme {
        match self {
            ClassificationLabel::Percentile(_) => BandingScheme::Percentile5,
            ClassificationLabel::Standard(_) => BandingScheme::StandardScore5,
        }
    }

    /// Ordinal position within the scheme, 1 (lowest) to 5 (highest).
    pub fn tier(&self) -> u8 {
        match self {
            ClassificationLabel::Percentile(band) => *band as u8 + 1,
            ClassificationLabel::Standard(band) => *band as u8 + 1,
        }
    }

    /// Label as printed on clinical reports.
    pub fn label(&self) -> &'static str {
        match self {
            ClassificationLabel::Percentile(band) => match band {
                PercentileBand::Inferior => "Inferior",
                PercentileBand::MediaInferior => "Média Inferior",
                PercentileBand::Media => "Média",
                PercentileBand::MediaSuperior => "Média Superior",
                PercentileBand::Superior => "Superior",
            },
            ClassificationLabel::Standard(band) => match band {
                StandardBand::MuitoBaixa => "Muito Baixa",
                StandardBand::Baixa => "Baixa",
                StandardBand::Media => "Média",
                StandardBand::Alta => "Alta",
                StandardBand::MuitoAlta => "Muito Alta",
            },
        }
    }

    pub fn english(&self) -> &'static str {
        match self {
            ClassificationLabel::Percentile(band) => match band {
                PercentileBand::Inferior => "Inferior",
                PercentileBand::MediaInferior => "Below Average",
                PercentileBand::Media => "Average",
                PercentileBand::MediaSuperior => "Above Average",
                PercentileBand::Superior => "Superior",
            },
            ClassificationLabel::Standard(band) => match band {
                StandardBand::MuitoBaixa => "Very Low",
                StandardBand::Baixa => "Low",
                StandardBand::Media => "Average",
                StandardBand::Alta => "High",
                StandardBand::MuitoAlta => "Very High",
            },
        }
    }
}

impl fmt::Display for ClassificationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

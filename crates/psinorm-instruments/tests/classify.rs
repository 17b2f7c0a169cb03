use psinorm_core::models::classification::{
    BandingScheme, ClassificationLabel, PercentileBand, StandardBand,
};
use psinorm_core::models::lookup::Lookup;
use psinorm_instruments::classify::{bands, classify, classify_lookup};

#[test]
fn percentile_boundaries_are_exact() {
    let expected = [
        (5.0, PercentileBand::Inferior),
        (6.0, PercentileBand::MediaInferior),
        (25.0, PercentileBand::MediaInferior),
        (26.0, PercentileBand::Media),
        (74.0, PercentileBand::Media),
        (75.0, PercentileBand::MediaSuperior),
        (94.0, PercentileBand::MediaSuperior),
        (95.0, PercentileBand::Superior),
    ];
    for (value, band) in expected {
        assert_eq!(
            classify(BandingScheme::Percentile5, value),
            ClassificationLabel::Percentile(band),
            "percentile {value}"
        );
    }
}

#[test]
fn standard_score_boundaries_are_exact() {
    let expected = [
        (69.0, StandardBand::MuitoBaixa),
        (70.0, StandardBand::Baixa),
        (84.0, StandardBand::Baixa),
        (85.0, StandardBand::Media),
        (114.0, StandardBand::Media),
        (115.0, StandardBand::Alta),
        (129.0, StandardBand::Alta),
        (130.0, StandardBand::MuitoAlta),
    ];
    for (value, band) in expected {
        assert_eq!(
            classify(BandingScheme::StandardScore5, value),
            ClassificationLabel::Standard(band),
            "standard score {value}"
        );
    }
}

#[test]
fn scale_extremes_fall_in_outer_tiers() {
    assert_eq!(
        classify(BandingScheme::Percentile5, 0.0).label(),
        "Inferior"
    );
    assert_eq!(
        classify(BandingScheme::Percentile5, 100.0).label(),
        "Superior"
    );
    assert_eq!(
        classify(BandingScheme::StandardScore5, 40.0).label(),
        "Muito Baixa"
    );
    assert_eq!(
        classify(BandingScheme::StandardScore5, 160.0).label(),
        "Muito Alta"
    );
}

#[test]
fn fractional_values_belong_to_the_tier_they_have_reached() {
    assert_eq!(
        classify(BandingScheme::Percentile5, 5.5).label(),
        "Inferior"
    );
    assert_eq!(
        classify(BandingScheme::StandardScore5, 84.9).label(),
        "Baixa"
    );
}

#[test]
fn unavailable_never_defaults_to_a_label() {
    assert_eq!(
        classify_lookup(BandingScheme::Percentile5, Lookup::NotAvailable),
        Lookup::NotAvailable
    );
    assert_eq!(
        classify_lookup(BandingScheme::Percentile5, Lookup::Found(50.0)),
        Lookup::Found(ClassificationLabel::Percentile(PercentileBand::Media))
    );
}

#[test]
fn each_scheme_has_five_ascending_tiers() {
    for scheme in [BandingScheme::Percentile5, BandingScheme::StandardScore5] {
        let tiers = bands(scheme);
        for pair in tiers.windows(2) {
            assert!(pair[0].lower < pair[1].lower);
            assert_eq!(pair[0].label.tier() + 1, pair[1].label.tier());
        }
        assert!(tiers.iter().all(|t| t.label.scheme() == scheme));
    }
}

use psinorm_instruments::derive::{net_score, ratio, round_hundredths};

#[test]
fn net_score_subtracts_both_error_kinds() {
    assert_eq!(net_score(20.0, 3.0, 2.0), 15.0);
    assert_eq!(net_score(0.0, 4.0, 6.0), -10.0);
}

#[test]
fn ratio_with_zero_denominator_is_zero() {
    assert_eq!(ratio(7.0, 0.0), 0.0);
    assert_eq!(ratio(0.0, 0.0), 0.0);
}

#[test]
fn ratio_rounds_to_hundredths() {
    assert_eq!(ratio(2.0, 3.0), 0.67);
    assert_eq!(ratio(12.0, 13.0), 0.92);
    assert_eq!(ratio(15.0, 1.0), 15.0);
}

#[test]
fn rounded_values_equal_their_decimal_literals() {
    assert_eq!(round_hundredths(0.574999), 0.57);
    assert_eq!(round_hundredths(1.005_1), 1.01);
}

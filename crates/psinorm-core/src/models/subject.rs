use jiff::Unit;
use jiff::civil::Date;

use crate::error::CoreError;

/// Completed years between `birth_date` and `assessed_on`.
///
/// Someone born on 29 February turns a year older on 1 March in
/// non-leap years.
pub fn age_on(birth_date: Date, assessed_on: Date) -> Result<u32, CoreError> {
    if birth_date > assessed_on {
        return Err(CoreError::BirthAfterAssessment {
            birth_date,
            assessed_on,
        });
    }

    let span = birth_date.until((Unit::Year, assessed_on))?;
    Ok(u32::from(span.get_years().unsigned_abs()))
}

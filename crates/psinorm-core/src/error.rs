use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("date arithmetic error: {0}")]
    Date(#[from] jiff::Error),

    #[error("birth date {birth_date} is after assessment date {assessed_on}")]
    BirthAfterAssessment {
        birth_date: jiff::civil::Date,
        assessed_on: jiff::civil::Date,
    },
}

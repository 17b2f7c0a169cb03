pub mod classification;
pub mod lookup;
pub mod raw;
pub mod request;
pub mod result;
pub mod subject;

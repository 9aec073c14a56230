use thiserror::Error;

/// A numeric form field that could not be turned into a usable value.
///
/// Never shown to the user: the caller substitutes the field's fallback constant.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("no value entered")]
    Empty,

    #[error("not a number: {0:?}")]
    NotANumber(String),

    #[error("{value} is below the minimum of {minimum}")]
    BelowMinimum { value: f64, minimum: f64 },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BetslipError {
    #[error("a betslip must keep at least one selection")]
    LastSelection,

    #[error("no selection with id {0}")]
    UnknownSelection(String),
}

/// Failures of the image export pipeline. Each one ends in a single toast.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExportError {
    #[error("render target #{0} not found")]
    TargetNotFound(String),

    #[error("DOM operation failed: {0}")]
    Dom(String),

    #[error("rasterization failed: {0}")]
    Rasterize(String),

    #[error("could not encode image: {0}")]
    Encode(String),

    #[error("sharing failed: {0}")]
    Share(String),

    #[error("an export is already running")]
    Busy,
}

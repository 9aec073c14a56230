mod form;
mod preview;

pub use form::BetslipForm;
pub use preview::BetslipPreview;

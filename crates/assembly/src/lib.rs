//! Build validation and commit.
//!
//! A build selects one part per category. It is checked for availability and
//! compatibility, then committed against the inventory as a single
//! all-or-nothing decrement.

pub mod request;
pub mod rules;
pub mod validator;

pub use request::{
    BackplateChoice, BackplateSelection, BuildRequest, BuildSelection, ColorChoice,
    ColoredSelection, StorageChoice, StorageSelection,
};
pub use rules::{Violation, check_compatibility};
pub use validator::{
    BuildOutcome, BuildReceipt, BuildValidator, RejectionKind, attempt_build, check_availability,
    evaluate,
};

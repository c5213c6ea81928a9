//! Address autocomplete collaborator.
//!
//! Keystrokes are debounced, the last query is sent to an opaque [`SuggestionProvider`] with a
//! per-session token, and picking a suggestion fills structured address fields. Submitting the
//! form starts a new session token. No network client lives here.

/// Cancellable delayed task.
pub mod debounce;
/// Keystroke → query → selection state machine.
pub mod session;
/// Provider contract and reply types.
pub mod suggestion;

pub use debounce::Debouncer;
pub use session::{AddressFields, AutocompleteOpts, AutocompleteSession};
pub use suggestion::{Compound, Prediction, SessionToken, SuggestionProvider, SuggestionResponse};

#[cfg(test)]
#[path = "../../tests/unit/autocomplete/mod.rs"]
mod tests;

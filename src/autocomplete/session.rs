use std::time::{Duration, Instant};

use crate::autocomplete::debounce::Debouncer;
use crate::autocomplete::suggestion::{Prediction, SessionToken, SuggestionProvider};
use crate::foundation::error::{FramesmithError, FramesmithResult};

/// Structured address form fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AddressFields {
    /// Free-form address line.
    pub address: String,
    /// City / province.
    pub city: String,
    /// District.
    pub district: String,
    /// Ward / commune.
    pub ward: String,
}

/// Autocomplete tuning.
#[derive(Clone, Copy, Debug)]
pub struct AutocompleteOpts {
    /// Quiet period after the last keystroke before querying.
    pub debounce: Duration,
    /// Queries shorter than this (in characters) hide suggestions instead of querying.
    pub min_query_chars: usize,
}

impl Default for AutocompleteOpts {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            min_query_chars: 2,
        }
    }
}

/// Address autocomplete state machine over an opaque [`SuggestionProvider`].
pub struct AutocompleteSession<P> {
    provider: P,
    opts: AutocompleteOpts,
    token: SessionToken,
    debounce: Debouncer<String>,
    suggestions: Vec<Prediction>,
    visible: bool,
    fields: AddressFields,
}

impl<P: SuggestionProvider> AutocompleteSession<P> {
    /// Start a session with a fresh token.
    pub fn new(provider: P, opts: AutocompleteOpts) -> Self {
        Self {
            provider,
            opts,
            token: SessionToken::new(),
            debounce: Debouncer::new(opts.debounce),
            suggestions: Vec::new(),
            visible: false,
            fields: AddressFields::default(),
        }
    }

    /// Token sent with every query of the current session.
    pub fn token(&self) -> SessionToken {
        self.token
    }

    /// Current form fields.
    pub fn fields(&self) -> &AddressFields {
        &self.fields
    }

    /// Whether the suggestion list is shown.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Suggestions from the last successful query.
    pub fn suggestions(&self) -> &[Prediction] {
        &self.suggestions
    }

    /// Whether a debounced query is waiting to fire.
    pub fn is_search_pending(&self) -> bool {
        self.debounce.is_pending()
    }

    /// Record a keystroke in the address input and (re)schedule the search.
    pub fn input(&mut self, text: &str, now: Instant) {
        self.fields.address = text.to_owned();
        self.debounce.push(text.to_owned(), now);
    }

    /// Run the debounced search if its quiet period has elapsed.
    ///
    /// Returns `true` when a query was actually sent to the provider.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.debounce.poll(now) {
            Some(query) => self.search(&query),
            None => false,
        }
    }

    fn search(&mut self, query: &str) -> bool {
        if query.chars().count() < self.opts.min_query_chars {
            self.visible = false;
            return false;
        }

        match self.provider.suggest(query, self.token) {
            Ok(resp) if resp.is_ok() => {
                tracing::debug!(query, count = resp.predictions.len(), "suggestions received");
                self.suggestions = resp.predictions;
                self.visible = true;
            }
            Ok(resp) => {
                tracing::debug!(query, status = %resp.status, "suggestion provider returned no results");
            }
            Err(e) => {
                tracing::warn!(query, error = %e, "suggestion lookup failed");
            }
        }
        true
    }

    /// Pick the suggestion at `index`, filling the form and hiding the list.
    pub fn select(&mut self, index: usize) -> FramesmithResult<&AddressFields> {
        let prediction = self.suggestions.get(index).ok_or_else(|| {
            FramesmithError::validation(format!(
                "suggestion index {index} out of range ({} shown)",
                self.suggestions.len()
            ))
        })?;

        self.fields.address = prediction.description.clone();
        if let Some(compound) = &prediction.compound {
            self.fields.city = compound.province.clone().unwrap_or_default();
            self.fields.district = compound.district.clone().unwrap_or_default();
            self.fields.ward = compound.commune.clone().unwrap_or_default();
        }
        self.visible = false;
        self.debounce.cancel();
        Ok(&self.fields)
    }

    /// Hide the suggestion list (click outside).
    pub fn dismiss(&mut self) {
        self.visible = false;
    }

    /// Submit the form: returns the fields and starts a new search session.
    pub fn submit(&mut self) -> AddressFields {
        self.token.reset();
        self.debounce.cancel();
        self.visible = false;
        tracing::debug!(token = %self.token, "new search session");
        self.fields.clone()
    }
}

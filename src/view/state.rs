//! Owned view state.
//!
//! One state object per view instance, mutated only through explicit
//! setters. Nothing here persists; a new process starts empty.

use alloy::primitives::Address;

use crate::gateway::Sponsorship;

/// State owned exclusively by the sponsorship view.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    current_account: Option<Address>,
    draft_name: String,
    draft_message: String,
    sponsorships: Vec<Sponsorship>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_account(&self) -> Option<Address> {
        self.current_account
    }

    pub fn draft_name(&self) -> &str {
        &self.draft_name
    }

    pub fn draft_message(&self) -> &str {
        &self.draft_message
    }

    /// Sponsorships in arrival order: initial batch first, then live events.
    pub fn sponsorships(&self) -> &[Sponsorship] {
        &self.sponsorships
    }

    pub fn set_account(&mut self, account: Option<Address>) {
        self.current_account = account;
    }

    pub fn set_draft_name(&mut self, name: impl Into<String>) {
        self.draft_name = name.into();
    }

    pub fn set_draft_message(&mut self, message: impl Into<String>) {
        self.draft_message = message.into();
    }

    pub fn clear_drafts(&mut self) {
        self.draft_name.clear();
        self.draft_message.clear();
    }

    /// Replace the whole list with a freshly loaded batch, keeping its order.
    pub fn replace_sponsorships(&mut self, sponsorships: Vec<Sponsorship>) {
        self.sponsorships = sponsorships;
    }

    /// Append one live event at the end. No reordering, no dedup.
    pub fn append_sponsorship(&mut self, sponsorship: Sponsorship) {
        self.sponsorships.push(sponsorship);
    }
}

//! The sponsorship client view.
//!
//! # Lifecycle
//! ```text
//! Unmounted
//!     → Mounting   (load history + check wallet + attach event feed)
//!     → Mounted    (idle; submit / connect / live events)
//!     → Unmounting (detach event feed)
//!     → Unmounted
//! ```
//!
//! Submissions and connection requests are side operations within `Mounted`;
//! they never change the lifecycle phase. Errors are terminal to their
//! operation only and leave the state at its pre-operation value.

pub mod state;

pub use state::ViewState;

use alloy::primitives::Address;

use crate::gateway::{EventFeed, GatewayError, Sponsorship, SponsorshipGateway, TxOutcome};
use crate::notify::{
    Notification, NotificationKind, Notifier, Position, IN_FLIGHT_AUTO_CLOSE,
};
use crate::wallet::{WalletError, WalletProvider};

/// Fallback supporter name for blank input.
pub const DEFAULT_NAME: &str = "Anonymous";
/// Fallback message for blank input.
pub const DEFAULT_MESSAGE: &str = "No Message";

const TOAST_WALLET_CONNECTED: &str = "Wallet is Connected";
const TOAST_WALLET_MISSING: &str = "Make sure you have a wallet connected";
const TOAST_SENDING: &str = "Sending sponsorship...";
const TOAST_SENT: &str = "Sponsorship Sent!";

/// Lifecycle phase of a view instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewPhase {
    Unmounted,
    Mounting,
    Mounted,
    Unmounting,
}

/// The single view of this client: a submission form plus a live list.
///
/// Generic over its three collaborators so tests can run fully in-process.
#[derive(Debug)]
pub struct SponsorshipView<G, P, N> {
    gateway: G,
    wallet: P,
    notifier: N,
    state: ViewState,
    phase: ViewPhase,
    feed: Option<EventFeed>,
}

impl<G, P, N> SponsorshipView<G, P, N>
where
    G: SponsorshipGateway,
    P: WalletProvider,
    N: Notifier,
{
    /// Mount the view: load the historical list, check wallet connectivity,
    /// and attach the live event feed.
    ///
    /// Mount-time failures are surfaced and logged but do not abort the
    /// mount; the view still reaches `Mounted` so the user can retry.
    pub async fn mount(gateway: G, wallet: P, notifier: N) -> Self {
        let mut view = Self {
            gateway,
            wallet,
            notifier,
            state: ViewState::new(),
            phase: ViewPhase::Mounting,
            feed: None,
        };
        tracing::debug!("View mounting");

        view.load_all().await;
        view.check_connection().await;

        match view.gateway.subscribe().await {
            Ok(feed) => view.feed = Some(feed),
            Err(e) => {
                tracing::warn!(error = %e, "Could not attach event feed");
                view.toast(NotificationKind::Error, e.to_string());
            }
        }

        view.phase = ViewPhase::Mounted;
        tracing::debug!(sponsorships = view.state.sponsorships().len(), "View mounted");
        view
    }

    /// Unmount the view, detaching the event feed. Returns the final state.
    pub fn unmount(mut self) -> ViewState {
        self.phase = ViewPhase::Unmounting;
        if let Some(feed) = self.feed.take() {
            feed.detach();
        }
        self.phase = ViewPhase::Unmounted;
        tracing::debug!("View unmounted");
        self.state
    }

    pub fn phase(&self) -> ViewPhase {
        self.phase
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Whether a live event feed is currently attached.
    pub fn subscribed(&self) -> bool {
        self.feed.is_some()
    }

    pub fn set_draft_name(&mut self, name: impl Into<String>) {
        self.state.set_draft_name(name);
    }

    pub fn set_draft_message(&mut self, message: impl Into<String>) {
        self.state.set_draft_message(message);
    }

    /// Query the wallet for already-authorized accounts, without prompting.
    ///
    /// Sets the current account to the first address when present.
    pub async fn check_connection(&mut self) -> Option<Address> {
        match self.wallet.accounts().await {
            Ok(accounts) => match accounts.first().copied() {
                Some(account) => {
                    self.state.set_account(Some(account));
                    self.toast(NotificationKind::Success, TOAST_WALLET_CONNECTED);
                    Some(account)
                }
                None => {
                    self.toast(NotificationKind::Warn, TOAST_WALLET_MISSING);
                    None
                }
            },
            Err(WalletError::NoProvider) => {
                self.toast(NotificationKind::Warn, TOAST_WALLET_MISSING);
                None
            }
            Err(e) => {
                self.toast(NotificationKind::Error, e.to_string());
                None
            }
        }
    }

    /// Actively request wallet authorization.
    pub async fn request_connection(&mut self) -> Option<Address> {
        match self.wallet.request_accounts().await {
            Ok(accounts) => match accounts.first().copied() {
                Some(account) => {
                    self.state.set_account(Some(account));
                    Some(account)
                }
                None => {
                    self.toast(NotificationKind::Warn, TOAST_WALLET_MISSING);
                    None
                }
            },
            Err(WalletError::NoProvider) => {
                self.toast(NotificationKind::Warn, TOAST_WALLET_MISSING);
                None
            }
            Err(e) => {
                self.toast(NotificationKind::Error, e.to_string());
                None
            }
        }
    }

    /// Submit the current drafts as one sponsorship.
    ///
    /// Blank or whitespace-only drafts fall back to [`DEFAULT_NAME`] /
    /// [`DEFAULT_MESSAGE`]; non-blank drafts are sent verbatim. On success
    /// both drafts are cleared; on any failure they are left unchanged so
    /// the user can retry.
    pub async fn submit(&mut self) -> Option<TxOutcome> {
        let name = default_if_blank(self.state.draft_name(), DEFAULT_NAME);
        let message = default_if_blank(self.state.draft_message(), DEFAULT_MESSAGE);

        let tx_hash = match self.gateway.dispatch_sponsorship(&name, &message).await {
            Ok(tx_hash) => tx_hash,
            Err(e) => {
                self.toast(NotificationKind::Error, e.to_string());
                return None;
            }
        };

        self.notifier.notify(
            Notification::new(NotificationKind::Info, TOAST_SENDING)
                .position(Position::TopLeft)
                .auto_close(IN_FLIGHT_AUTO_CLOSE),
        );

        match self.gateway.await_confirmation(tx_hash).await {
            Ok(TxOutcome::Confirmed { block_number }) => {
                tracing::info!(tx_hash = %tx_hash, block_number, "Sponsorship confirmed");
                self.state.clear_drafts();
                self.notifier.notify(
                    Notification::new(NotificationKind::Success, TOAST_SENT)
                        .position(Position::TopLeft),
                );
                Some(TxOutcome::Confirmed { block_number })
            }
            Ok(TxOutcome::Reverted { reason }) => {
                self.toast(
                    NotificationKind::Error,
                    GatewayError::Reverted(reason.clone()).to_string(),
                );
                Some(TxOutcome::Reverted { reason })
            }
            Err(e) => {
                self.toast(NotificationKind::Error, e.to_string());
                None
            }
        }
    }

    /// Wait for the next live sponsorship and append it to the list.
    ///
    /// Returns `None` when no feed is attached or the feed has stopped; a
    /// stopped feed is dropped so the view no longer counts as subscribed.
    pub async fn next_event(&mut self) -> Option<Sponsorship> {
        let feed = self.feed.as_mut()?;
        match feed.next().await {
            Some(sponsorship) => {
                self.state.append_sponsorship(sponsorship.clone());
                Some(sponsorship)
            }
            None => {
                self.feed = None;
                None
            }
        }
    }

    /// Append any already-delivered live events without waiting.
    ///
    /// Returns how many were appended.
    pub fn drain_events(&mut self) -> usize {
        let Some(feed) = self.feed.as_mut() else {
            return 0;
        };
        let mut appended = 0;
        while let Some(sponsorship) = feed.try_next() {
            self.state.append_sponsorship(sponsorship);
            appended += 1;
        }
        appended
    }

    async fn load_all(&mut self) {
        match self.gateway.sponsorships().await {
            Ok(sponsorships) => self.state.replace_sponsorships(sponsorships),
            Err(e) => {
                tracing::warn!(error = %e, "Could not load sponsorship history");
                self.toast(NotificationKind::Error, e.to_string());
            }
        }
    }

    fn toast(&self, kind: NotificationKind, text: impl Into<String>) {
        self.notifier.notify(Notification::new(kind, text));
    }
}

fn default_if_blank(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

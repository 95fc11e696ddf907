//! End-to-end view behavior against in-process collaborators.

use std::sync::{Arc, Mutex};

use alloy::primitives::{address, Address, TxHash};
use chrono::{TimeZone, Utc};
use tokio::sync::mpsc;

use edubrew_client::gateway::{
    EventFeed, GatewayError, GatewayResult, Sponsorship, SponsorshipGateway, TxOutcome,
};
use edubrew_client::notify::{Notification, NotificationKind, Notifier};
use edubrew_client::view::{SponsorshipView, ViewPhase, DEFAULT_MESSAGE, DEFAULT_NAME};
use edubrew_client::wallet::{WalletError, WalletProvider, WalletResult};

const PAYER: Address = address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266");

fn sponsorship(name: &str, secs: i64) -> Sponsorship {
    Sponsorship {
        address: PAYER,
        timestamp: Utc.timestamp_opt(secs, 0).unwrap(),
        message: format!("message from {}", name),
        name: name.to_string(),
    }
}

/// Gateway double: canned history, recorded dispatches, feed wired to a
/// channel the test holds the sender of.
#[derive(Clone, Default)]
struct MockGateway {
    history: Vec<Sponsorship>,
    load_error: Option<String>,
    dispatch_error: Option<String>,
    outcome: Option<TxOutcome>,
    dispatched: Arc<Mutex<Vec<(String, String)>>>,
    feed_tx: Arc<Mutex<Option<mpsc::Sender<Sponsorship>>>>,
    subscribe_count: Arc<Mutex<usize>>,
}

impl MockGateway {
    fn confirming(history: Vec<Sponsorship>) -> Self {
        Self {
            history,
            outcome: Some(TxOutcome::Confirmed { block_number: 7 }),
            ..Self::default()
        }
    }

    fn feed_sender(&self) -> mpsc::Sender<Sponsorship> {
        self.feed_tx
            .lock()
            .unwrap()
            .clone()
            .expect("view has not subscribed")
    }

    fn dispatched(&self) -> Vec<(String, String)> {
        self.dispatched.lock().unwrap().clone()
    }
}

impl SponsorshipGateway for MockGateway {
    async fn dispatch_sponsorship(&self, name: &str, message: &str) -> GatewayResult<TxHash> {
        if let Some(error) = &self.dispatch_error {
            return Err(GatewayError::Rpc(error.clone()));
        }
        self.dispatched
            .lock()
            .unwrap()
            .push((name.to_string(), message.to_string()));
        Ok(TxHash::ZERO)
    }

    async fn await_confirmation(&self, _tx_hash: TxHash) -> GatewayResult<TxOutcome> {
        match &self.outcome {
            Some(outcome) => Ok(outcome.clone()),
            None => Err(GatewayError::ConfirmationTimeout(180)),
        }
    }

    async fn sponsorships(&self) -> GatewayResult<Vec<Sponsorship>> {
        if let Some(error) = &self.load_error {
            return Err(GatewayError::Decode(error.clone()));
        }
        Ok(self.history.clone())
    }

    async fn subscribe(&self) -> GatewayResult<EventFeed> {
        let (tx, rx) = mpsc::channel(16);
        *self.feed_tx.lock().unwrap() = Some(tx);
        *self.subscribe_count.lock().unwrap() += 1;
        Ok(EventFeed::from_channel(rx))
    }
}

#[derive(Clone)]
enum MockWallet {
    Authorized(Vec<Address>),
    Empty,
    NoProvider,
    Failing(String),
}

impl WalletProvider for MockWallet {
    async fn accounts(&self) -> WalletResult<Vec<Address>> {
        match self {
            MockWallet::Authorized(accounts) => Ok(accounts.clone()),
            MockWallet::Empty => Ok(Vec::new()),
            MockWallet::NoProvider => Err(WalletError::NoProvider),
            MockWallet::Failing(message) => Err(WalletError::Key(message.clone())),
        }
    }

    async fn request_accounts(&self) -> WalletResult<Vec<Address>> {
        self.accounts().await
    }
}

#[derive(Clone, Default)]
struct Recorder {
    toasts: Arc<Mutex<Vec<Notification>>>,
}

impl Recorder {
    fn toasts(&self) -> Vec<Notification> {
        self.toasts.lock().unwrap().clone()
    }

    fn kinds(&self) -> Vec<NotificationKind> {
        self.toasts().iter().map(|n| n.kind).collect()
    }
}

impl Notifier for Recorder {
    fn notify(&self, notification: Notification) {
        self.toasts.lock().unwrap().push(notification);
    }
}

#[tokio::test]
async fn mount_loads_history_in_gateway_order() {
    let history = vec![
        sponsorship("first", 1_700_000_000),
        sponsorship("second", 1_700_000_100),
        sponsorship("third", 1_700_000_200),
    ];
    let gateway = MockGateway::confirming(history.clone());

    let view = SponsorshipView::mount(gateway, MockWallet::Empty, Recorder::default()).await;

    assert_eq!(view.phase(), ViewPhase::Mounted);
    assert!(view.subscribed());
    assert_eq!(view.state().sponsorships(), history.as_slice());
    assert_eq!(
        view.state().sponsorships()[0].timestamp.to_rfc3339(),
        "2023-11-14T22:13:20+00:00"
    );
}

#[tokio::test]
async fn failed_history_load_still_mounts_with_error_toast() {
    let mut gateway = MockGateway::confirming(vec![sponsorship("first", 1_700_000_000)]);
    gateway.load_error = Some("malformed record".to_string());
    let recorder = Recorder::default();

    let view = SponsorshipView::mount(gateway, MockWallet::Empty, recorder.clone()).await;

    assert_eq!(view.phase(), ViewPhase::Mounted);
    assert!(view.state().sponsorships().is_empty());
    assert!(view.subscribed());

    let errors: Vec<Notification> = recorder
        .toasts()
        .into_iter()
        .filter(|n| n.kind == NotificationKind::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].text.contains("malformed record"));
}

#[tokio::test]
async fn live_event_appends_at_the_end() {
    let gateway = MockGateway::confirming(vec![
        sponsorship("first", 1_700_000_000),
        sponsorship("second", 1_700_000_100),
    ]);
    let handle = gateway.clone();

    let mut view = SponsorshipView::mount(gateway, MockWallet::Empty, Recorder::default()).await;
    let initial_len = view.state().sponsorships().len();

    handle
        .feed_sender()
        .send(sponsorship("live", 1_700_000_300))
        .await
        .unwrap();

    let event = view.next_event().await.unwrap();
    assert_eq!(event.name, "live");

    let sponsorships = view.state().sponsorships();
    assert_eq!(sponsorships.len(), initial_len + 1);
    assert_eq!(sponsorships.last().unwrap().name, "live");
}

#[tokio::test]
async fn blank_drafts_fall_back_to_defaults() {
    let gateway = MockGateway::confirming(Vec::new());
    let handle = gateway.clone();

    let mut view =
        SponsorshipView::mount(gateway, MockWallet::Authorized(vec![PAYER]), Recorder::default())
            .await;
    view.set_draft_name("   ");
    view.set_draft_message("");

    let outcome = view.submit().await;
    assert!(matches!(outcome, Some(TxOutcome::Confirmed { .. })));
    assert_eq!(
        handle.dispatched(),
        vec![(DEFAULT_NAME.to_string(), DEFAULT_MESSAGE.to_string())]
    );
}

#[tokio::test]
async fn non_blank_drafts_are_sent_verbatim_and_cleared() {
    let gateway = MockGateway::confirming(Vec::new());
    let handle = gateway.clone();

    let mut view =
        SponsorshipView::mount(gateway, MockWallet::Authorized(vec![PAYER]), Recorder::default())
            .await;
    view.set_draft_name("Ada ");
    view.set_draft_message("keep going");

    view.submit().await;

    assert_eq!(
        handle.dispatched(),
        vec![("Ada ".to_string(), "keep going".to_string())]
    );
    assert!(view.state().draft_name().is_empty());
    assert!(view.state().draft_message().is_empty());
}

#[tokio::test]
async fn in_flight_toast_precedes_success_toast() {
    let gateway = MockGateway::confirming(Vec::new());
    let recorder = Recorder::default();

    let mut view =
        SponsorshipView::mount(gateway, MockWallet::Authorized(vec![PAYER]), recorder.clone())
            .await;
    view.set_draft_name("Ada");
    view.set_draft_message("hello");
    view.submit().await;

    let toasts = recorder.toasts();
    let sending = toasts
        .iter()
        .position(|n| n.text == "Sending sponsorship...")
        .unwrap();
    let sent = toasts
        .iter()
        .position(|n| n.text == "Sponsorship Sent!")
        .unwrap();
    assert!(sending < sent);
    assert_eq!(toasts[sending].kind, NotificationKind::Info);
    assert_eq!(toasts[sent].kind, NotificationKind::Success);
}

#[tokio::test]
async fn failed_dispatch_preserves_drafts() {
    let mut gateway = MockGateway::confirming(Vec::new());
    gateway.dispatch_error = Some("insufficient funds".to_string());
    let recorder = Recorder::default();

    let mut view =
        SponsorshipView::mount(gateway, MockWallet::Authorized(vec![PAYER]), recorder.clone())
            .await;
    view.set_draft_name("Ada");
    view.set_draft_message("hello");

    let outcome = view.submit().await;
    assert!(outcome.is_none());
    assert_eq!(view.state().draft_name(), "Ada");
    assert_eq!(view.state().draft_message(), "hello");

    let last = recorder.toasts().pop().unwrap();
    assert_eq!(last.kind, NotificationKind::Error);
    assert!(last.text.contains("insufficient funds"));
}

#[tokio::test]
async fn confirmation_timeout_preserves_drafts_and_notifies_error() {
    let mut gateway = MockGateway::confirming(Vec::new());
    gateway.outcome = None;
    let recorder = Recorder::default();

    let mut view =
        SponsorshipView::mount(gateway, MockWallet::Authorized(vec![PAYER]), recorder.clone())
            .await;
    view.set_draft_name("Ada");
    view.set_draft_message("hello");

    let outcome = view.submit().await;
    assert!(outcome.is_none());
    assert_eq!(view.state().draft_name(), "Ada");
    assert_eq!(view.state().draft_message(), "hello");

    let last = recorder.toasts().pop().unwrap();
    assert_eq!(last.kind, NotificationKind::Error);
    assert!(last.text.contains("not confirmed"));
}

#[tokio::test]
async fn reverted_transaction_preserves_drafts_and_notifies_error() {
    let mut gateway = MockGateway::confirming(Vec::new());
    gateway.outcome = Some(TxOutcome::Reverted {
        reason: "execution reverted".to_string(),
    });
    let recorder = Recorder::default();

    let mut view =
        SponsorshipView::mount(gateway, MockWallet::Authorized(vec![PAYER]), recorder.clone())
            .await;
    view.set_draft_name("Ada");
    view.set_draft_message("hello");

    let outcome = view.submit().await;
    assert!(matches!(outcome, Some(TxOutcome::Reverted { .. })));
    assert_eq!(view.state().draft_name(), "Ada");
    assert_eq!(view.state().draft_message(), "hello");

    let last = recorder.toasts().pop().unwrap();
    assert_eq!(last.kind, NotificationKind::Error);
    assert!(last.text.contains("reverted"));
}

#[tokio::test]
async fn check_connection_with_accounts_sets_first_and_notifies_success() {
    let other = address!("70997970c51812dc3a010c7d01b50e0d17dc79c8");
    let gateway = MockGateway::confirming(Vec::new());
    let recorder = Recorder::default();

    let mut view = SponsorshipView::mount(
        gateway,
        MockWallet::Authorized(vec![PAYER, other]),
        recorder.clone(),
    )
    .await;

    assert_eq!(view.state().current_account(), Some(PAYER));
    assert!(recorder.kinds().contains(&NotificationKind::Success));

    // Calling again is idempotent.
    let account = view.check_connection().await;
    assert_eq!(account, Some(PAYER));
}

#[tokio::test]
async fn check_connection_without_accounts_warns_and_leaves_state() {
    let gateway = MockGateway::confirming(Vec::new());
    let recorder = Recorder::default();

    let view = SponsorshipView::mount(gateway, MockWallet::Empty, recorder.clone()).await;

    assert_eq!(view.state().current_account(), None);
    assert!(recorder.kinds().contains(&NotificationKind::Warn));
    assert!(!recorder.kinds().contains(&NotificationKind::Success));
}

#[tokio::test]
async fn missing_provider_warns_instead_of_erroring() {
    let gateway = MockGateway::confirming(Vec::new());
    let recorder = Recorder::default();

    let mut view = SponsorshipView::mount(gateway, MockWallet::NoProvider, recorder.clone()).await;
    assert!(view.request_connection().await.is_none());

    assert_eq!(view.state().current_account(), None);
    assert!(recorder.kinds().contains(&NotificationKind::Warn));
    assert!(!recorder.kinds().contains(&NotificationKind::Error));
}

#[tokio::test]
async fn wallet_failure_surfaces_as_error_toast() {
    let gateway = MockGateway::confirming(Vec::new());
    let recorder = Recorder::default();

    let mut view = SponsorshipView::mount(
        gateway,
        MockWallet::Failing("keystore unreadable".to_string()),
        recorder.clone(),
    )
    .await;
    view.request_connection().await;

    let errors: Vec<Notification> = recorder
        .toasts()
        .into_iter()
        .filter(|n| n.kind == NotificationKind::Error)
        .collect();
    assert!(!errors.is_empty());
    assert!(errors[0].text.contains("keystore unreadable"));
}

#[tokio::test]
async fn remount_keeps_exactly_one_active_subscription() {
    let gateway = MockGateway::confirming(vec![sponsorship("first", 1_700_000_000)]);
    let handle = gateway.clone();

    let mut view =
        SponsorshipView::mount(gateway.clone(), MockWallet::Empty, Recorder::default()).await;
    let first_sender = handle.feed_sender();

    first_sender
        .send(sponsorship("live-one", 1_700_000_100))
        .await
        .unwrap();
    assert_eq!(view.next_event().await.unwrap().name, "live-one");

    let state = view.unmount();
    assert_eq!(state.sponsorships().len(), 2);

    // The old feed is gone: the first mount's sender has no receiver left.
    assert!(first_sender
        .send(sponsorship("orphan", 1_700_000_200))
        .await
        .is_err());

    let mut view = SponsorshipView::mount(gateway, MockWallet::Empty, Recorder::default()).await;
    assert_eq!(*handle.subscribe_count.lock().unwrap(), 2);

    // A single gateway event is delivered exactly once to the new mount.
    handle
        .feed_sender()
        .send(sponsorship("live-two", 1_700_000_300))
        .await
        .unwrap();
    assert_eq!(view.next_event().await.unwrap().name, "live-two");
    assert_eq!(view.drain_events(), 0);
}

#[tokio::test]
async fn ended_feed_clears_subscription() {
    let gateway = MockGateway::confirming(Vec::new());
    let handle = gateway.clone();

    let mut view = SponsorshipView::mount(gateway, MockWallet::Empty, Recorder::default()).await;
    assert!(view.subscribed());

    // Dropping the sender ends the feed's channel.
    *handle.feed_tx.lock().unwrap() = None;

    assert!(view.next_event().await.is_none());
    assert!(!view.subscribed());
    assert_eq!(view.drain_events(), 0);
}

#[tokio::test]
async fn unmount_returns_final_state() {
    let gateway = MockGateway::confirming(vec![sponsorship("first", 1_700_000_000)]);

    let mut view = SponsorshipView::mount(
        gateway,
        MockWallet::Authorized(vec![PAYER]),
        Recorder::default(),
    )
    .await;
    view.set_draft_name("Ada");

    let state = view.unmount();
    assert_eq!(state.current_account(), Some(PAYER));
    assert_eq!(state.draft_name(), "Ada");
    assert_eq!(state.sponsorships().len(), 1);
}

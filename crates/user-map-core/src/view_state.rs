//! View state of one client session.
//!
//! All flags live in one [`Activity`] value: "busy" and "transaction pending"
//! are derived from it, so a pending transaction without a busy client cannot
//! be represented.
//!
//! Every operation is started with [`ViewStateController::begin`], which
//! returns a [`Ticket`]. Two generations are tracked. Account changes advance
//! the session generation, which every operation checks before applying its
//! outcome. Panel switches advance only the view generation, which query
//! results are also checked against, so navigating away drops a pending
//! query result but never the outcome of a submit.

use serde::Serialize;
use tracing::debug;
use user_map_types::{AddressKey, ConnectionState, QueryKind, QueryResult, TxReceipt};

use crate::error::{FailureKind, KvError};

/// Step of a submit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitPhase {
    Validating,
    BalanceChecking,
    Submitting,
    Reconciling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "activity", content = "detail", rename_all = "snake_case")]
pub enum Activity {
    #[default]
    Idle,
    /// Fetching the connected account's own record after login.
    Loading,
    Querying(QueryKind),
    FetchingBalance,
    Signing,
    Submitting(SubmitPhase),
}

impl Activity {
    pub fn is_busy(&self) -> bool {
        !matches!(self, Activity::Idle)
    }

    /// Waiting on-chain, as opposed to doing anything else.
    pub fn is_tx_pending(&self) -> bool {
        matches!(self, Activity::Submitting(SubmitPhase::Submitting))
    }
}

/// Which result panel is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultPanel {
    /// The connected account's own record. No query results shown.
    #[default]
    Editor,
    ValueByUser,
    Users,
    Map,
}

impl From<QueryKind> for ResultPanel {
    fn from(kind: QueryKind) -> Self {
        match kind {
            QueryKind::ValueByUser => ResultPanel::ValueByUser,
            QueryKind::Users => ResultPanel::Users,
            QueryKind::Map => ResultPanel::Map,
        }
    }
}

/// Last user-facing message. Dismissible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "notice", rename_all = "snake_case")]
pub enum Notice {
    Validation { reason: String },
    InsufficientFunds { balance: u128, required: u128, denom: String },
    TransactionFailed { kind: FailureKind, detail: String },
    RefreshFailed { detail: String },
    Submitted { receipt: TxReceipt },
    Error { detail: String },
}

impl Notice {
    /// Map a failure to the notice shown for it.
    pub fn from_error(err: &KvError) -> Self {
        match err {
            KvError::Validation { reason } => Notice::Validation {
                reason: reason.clone(),
            },
            KvError::InsufficientFunds {
                balance,
                required,
                denom,
            } => Notice::InsufficientFunds {
                balance: *balance,
                required: *required,
                denom: denom.clone(),
            },
            KvError::TransactionFailed { kind, detail } => Notice::TransactionFailed {
                kind: *kind,
                detail: detail.clone(),
            },
            other => Notice::Error {
                detail: other.to_string(),
            },
        }
    }
}

/// Handle for one started operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    flight: u64,
    session: u64,
    view: u64,
}

#[derive(Debug, Default)]
pub struct ViewStateController {
    connection: ConnectionState,
    activity: Activity,
    panel: ResultPanel,
    result: Option<QueryResult>,
    selected_address: Option<AddressKey>,
    pending_edit: String,
    validation_error: Option<String>,
    last_receipt: Option<TxReceipt>,
    notice: Option<Notice>,
    session_generation: u64,
    view_generation: u64,
    flight: u64,
}

/// Serializable copy of the view, for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewSnapshot {
    pub connection: ConnectionState,
    pub activity: Activity,
    pub busy: bool,
    pub tx_pending: bool,
    pub panel: ResultPanel,
    pub result: Option<QueryResult>,
    pub selected_address: Option<AddressKey>,
    pub pending_edit: String,
    pub validation_error: Option<String>,
    pub last_receipt: Option<TxReceipt>,
    pub notice: Option<Notice>,
}

impl ViewStateController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connection(&self) -> &ConnectionState {
        &self.connection
    }

    pub fn account(&self) -> Option<&AddressKey> {
        self.connection.address()
    }

    /// Apply a session change from the wallet provider.
    ///
    /// Any login (same or different address) and any logout resets the view
    /// and clears query results. Logout, or a login as another account, also
    /// drops the pending edit and the last receipt. Returns `true` when the
    /// view was reset.
    pub fn set_connection(&mut self, connection: ConnectionState) -> bool {
        let other_account = self.connection.address() != connection.address();
        let reset = match (&self.connection, &connection) {
            (_, ConnectionState::Connected(_)) => true,
            (ConnectionState::Disconnected, ConnectionState::Disconnected) => false,
            (_, ConnectionState::Disconnected) => true,
            (_, ConnectionState::Connecting) => false,
        };
        if reset {
            self.reset_view();
            if !connection.is_connected() || other_account {
                self.pending_edit.clear();
                self.last_receipt = None;
            }
        }
        self.connection = connection;
        reset
    }

    fn reset_view(&mut self) {
        self.panel = ResultPanel::default();
        self.result = None;
        self.selected_address = None;
        self.validation_error = None;
        self.notice = None;
        self.session_generation += 1;
        self.view_generation += 1;
        debug!(generation = self.session_generation, "view reset");
    }

    pub fn activity(&self) -> Activity {
        self.activity
    }

    pub fn is_busy(&self) -> bool {
        self.activity.is_busy()
    }

    pub fn is_tx_pending(&self) -> bool {
        self.activity.is_tx_pending()
    }

    /// Start an operation. Fails with [`KvError::Busy`] while another one is
    /// in flight. Starting a query clears the previous result and shows the
    /// query's panel.
    pub fn begin(&mut self, activity: Activity) -> Result<Ticket, KvError> {
        if self.activity.is_busy() {
            return Err(KvError::Busy);
        }
        if let Activity::Querying(kind) = activity {
            self.result = None;
            self.panel = kind.into();
        }
        self.flight += 1;
        self.activity = activity;
        Ok(Ticket {
            flight: self.flight,
            session: self.session_generation,
            view: self.view_generation,
        })
    }

    /// Move the operation owning `ticket` to another step.
    pub fn advance(&mut self, ticket: &Ticket, activity: Activity) {
        if ticket.flight == self.flight && self.activity.is_busy() {
            self.activity = activity;
        }
    }

    /// End the operation owning `ticket`.
    pub fn finish(&mut self, ticket: &Ticket) {
        if ticket.flight == self.flight {
            self.activity = Activity::Idle;
        }
    }

    /// Whether the ticket was issued for the current account session.
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        ticket.session == self.session_generation
    }

    /// Whether the ticket's session and panel are both still on screen.
    pub fn is_current_view(&self, ticket: &Ticket) -> bool {
        self.is_current(ticket) && ticket.view == self.view_generation
    }

    /// Store a query result unless the view moved on since the query began.
    pub fn accept_result(&mut self, ticket: &Ticket, result: QueryResult) -> bool {
        if !self.is_current_view(ticket) {
            debug!(
                kind = result.kind().name(),
                "dropping result for a previous view"
            );
            return false;
        }
        self.panel = result.kind().into();
        self.result = Some(result);
        true
    }

    /// Switch panels. Results of the old panel, and any query still running
    /// for it, are discarded. Other operations are unaffected.
    pub fn select_panel(&mut self, panel: ResultPanel) {
        if panel == self.panel {
            return;
        }
        self.panel = panel;
        self.result = None;
        self.view_generation += 1;
    }

    pub fn panel(&self) -> ResultPanel {
        self.panel
    }

    pub fn result(&self) -> Option<&QueryResult> {
        self.result.as_ref()
    }

    pub fn select_address(&mut self, address: Option<AddressKey>) {
        self.selected_address = address;
    }

    pub fn selected_address(&self) -> Option<&AddressKey> {
        self.selected_address.as_ref()
    }

    pub fn pending_edit(&self) -> &str {
        &self.pending_edit
    }

    pub fn set_pending_edit(&mut self, text: String) {
        self.pending_edit = text;
    }

    pub fn validation_error(&self) -> Option<&str> {
        self.validation_error.as_deref()
    }

    pub fn set_validation_error(&mut self, reason: Option<String>) {
        self.validation_error = reason;
    }

    pub fn last_receipt(&self) -> Option<&TxReceipt> {
        self.last_receipt.as_ref()
    }

    pub fn record_receipt(&mut self, receipt: TxReceipt) {
        self.validation_error = None;
        self.notice = Some(Notice::Submitted {
            receipt: receipt.clone(),
        });
        self.last_receipt = Some(receipt);
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            connection: self.connection.clone(),
            activity: self.activity,
            busy: self.is_busy(),
            tx_pending: self.is_tx_pending(),
            panel: self.panel,
            result: self.result.clone(),
            selected_address: self.selected_address.clone(),
            pending_edit: self.pending_edit.clone(),
            validation_error: self.validation_error.clone(),
            last_receipt: self.last_receipt.clone(),
            notice: self.notice.clone(),
        }
    }
}

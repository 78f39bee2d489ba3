//! Submit cycle and session operations of the user-map client.
//!
//! A submit runs `Validating -> BalanceChecking -> Submitting -> Reconciling`
//! and aborts to idle at the first failing step. After a confirmed
//! transaction the stored value is always re-read from the contract; the
//! local edit is never assumed to match what was committed.

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{info, warn};
use user_map_types::{AddressKey, ConnectionState, QueryKind, QueryResult, TxReceipt, UserRecord};

use crate::error::{FailureKind, KvError};
use crate::gateway::RemoteGateway;
use crate::json_guard::{self, Validation, INVALID_JSON};
use crate::view_state::{
    Activity, Notice, ResultPanel, SubmitPhase, Ticket, ViewSnapshot, ViewStateController,
};

/// Minimum balance, in base units, required before an update is submitted.
pub const MIN_SUBMIT_BALANCE: u128 = 184;

/// Value shown for an account that has no record (or could not be loaded).
pub const EMPTY_RECORD: &str = "{}";

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub min_balance: u128,
    pub fee_denom: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            min_balance: MIN_SUBMIT_BALANCE,
            fee_denom: user_map_types::DEFAULT_FEE_DENOM.to_string(),
        }
    }
}

/// Result of reading the record back after a confirmed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum RefreshStatus {
    /// The pending edit now holds the committed value.
    Synced(String),
    /// The transaction is confirmed, but the value could not be re-read.
    Failed(String),
    /// The session changed before the refresh finished; nothing was applied.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitOutcome {
    pub receipt: TxReceipt,
    pub refresh: RefreshStatus,
}

/// Where the value shown after login came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadSource {
    Remote,
    NoRecord,
    /// Every attempt failed; the empty record was substituted.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InitialLoad {
    pub value: String,
    pub source: LoadSource,
}

pub struct TransactionOrchestrator {
    gateway: RemoteGateway,
    config: OrchestratorConfig,
    state: Mutex<ViewStateController>,
}

impl TransactionOrchestrator {
    pub fn new(gateway: RemoteGateway, config: OrchestratorConfig) -> Self {
        Self {
            gateway,
            config,
            state: Mutex::new(ViewStateController::new()),
        }
    }

    pub fn gateway(&self) -> &RemoteGateway {
        &self.gateway
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        self.state.lock().snapshot()
    }

    pub fn account(&self) -> Option<AddressKey> {
        self.state.lock().account().cloned()
    }

    fn require_account(&self) -> Result<AddressKey, KvError> {
        self.account().ok_or(KvError::NotConnected)
    }

    fn begin(&self, activity: Activity) -> Result<Ticket, KvError> {
        self.state.lock().begin(activity)
    }

    fn finish(&self, ticket: &Ticket) {
        self.state.lock().finish(ticket);
    }

    fn advance(&self, ticket: &Ticket, phase: SubmitPhase) {
        self.state.lock().advance(ticket, Activity::Submitting(phase));
    }

    fn fail(&self, err: KvError) -> KvError {
        self.state.lock().set_notice(Notice::from_error(&err));
        err
    }

    // ---------------------------------------------------------------------
    // Session
    // ---------------------------------------------------------------------

    /// Report that the wallet provider is establishing a session.
    pub fn connecting(&self) {
        self.state.lock().set_connection(ConnectionState::Connecting);
    }

    /// Bind the session to `address` and load its record into the editor.
    ///
    /// A record that cannot be loaded after all retries is replaced by `{}`.
    /// This also hides real connectivity problems behind what looks like a
    /// new user; the fallback is reported as [`LoadSource::Fallback`].
    ///
    /// While another operation is in flight this fails with
    /// [`KvError::Busy`] and the current account stays bound.
    pub async fn connect(&self, address: AddressKey) -> Result<InitialLoad, KvError> {
        let ticket = self.bind_account(None, &address)?;
        self.load_initial(ticket, address).await
    }

    /// Switch the session to `address` and start its initial load.
    ///
    /// `held` is an operation the caller already owns; it is handed over to
    /// the load. Without one, a busy client is left untouched.
    fn bind_account(&self, held: Option<Ticket>, address: &AddressKey) -> Result<Ticket, KvError> {
        let mut state = self.state.lock();
        match held {
            Some(ticket) => state.finish(&ticket),
            None if state.is_busy() => return Err(KvError::Busy),
            None => {}
        }
        state.set_connection(ConnectionState::Connected(address.clone()));
        let ticket = state.begin(Activity::Loading)?;
        info!(address = %address.short(), "session connected");
        Ok(ticket)
    }

    async fn load_initial(&self, ticket: Ticket, address: AddressKey) -> Result<InitialLoad, KvError> {
        let fetched = self.gateway.get_value_by_user(&address).await;
        let load = match fetched {
            Ok(Some(value)) => InitialLoad {
                value,
                source: LoadSource::Remote,
            },
            Ok(None) => InitialLoad {
                value: EMPTY_RECORD.to_string(),
                source: LoadSource::NoRecord,
            },
            Err(e) if e.is_transient() => {
                warn!(
                    address = address.as_str(),
                    error = %e,
                    "initial load failed, showing an empty record"
                );
                InitialLoad {
                    value: EMPTY_RECORD.to_string(),
                    source: LoadSource::Fallback,
                }
            }
            Err(e) => {
                self.finish(&ticket);
                return Err(self.fail(e));
            }
        };
        let mut state = self.state.lock();
        if state.is_current(&ticket) {
            state.set_pending_edit(load.value.clone());
        }
        state.finish(&ticket);
        Ok(load)
    }

    /// Ask the signing session which account it is bound to, then connect it.
    pub async fn connect_session_account(&self) -> Result<InitialLoad, KvError> {
        let held = self.begin(Activity::Loading)?;
        self.connecting();
        match self.gateway.session_account().await {
            Ok(Some(address)) => {
                let ticket = self.bind_account(Some(held), &address)?;
                self.load_initial(ticket, address).await
            }
            Ok(None) => {
                self.finish(&held);
                self.disconnect();
                Err(KvError::NotConnected)
            }
            Err(e) => {
                self.finish(&held);
                self.disconnect();
                Err(e)
            }
        }
    }

    /// Rebind a session established earlier without reloading its record.
    pub fn resume(&self, address: AddressKey, pending_edit: Option<String>) {
        let mut state = self.state.lock();
        state.set_connection(ConnectionState::Connected(address));
        if let Some(text) = pending_edit {
            state.set_pending_edit(text);
        }
    }

    pub fn disconnect(&self) {
        info!("session disconnected");
        self.state.lock().set_connection(ConnectionState::Disconnected);
    }

    // ---------------------------------------------------------------------
    // Editor
    // ---------------------------------------------------------------------

    /// Replace the pending edit with normalized `text`. Returns the stored text.
    pub fn set_pending_edit(&self, text: &str) -> String {
        let normalized = json_guard::normalize(text);
        let mut state = self.state.lock();
        state.set_validation_error(None);
        state.set_pending_edit(normalized.clone());
        normalized
    }

    pub fn pending_edit(&self) -> String {
        self.state.lock().pending_edit().to_string()
    }

    /// Validate the pending edit and record the inline error, if any.
    pub fn validate_pending(&self) -> Validation {
        let mut state = self.state.lock();
        let validation = json_guard::validate(state.pending_edit());
        state.set_validation_error(validation.error().map(String::from));
        validation
    }

    /// Pretty-print the pending edit in place (unchanged if it does not parse).
    pub fn format_pending(&self) -> String {
        let mut state = self.state.lock();
        let formatted = json_guard::format(state.pending_edit());
        state.set_pending_edit(formatted.clone());
        formatted
    }

    pub fn select_panel(&self, panel: ResultPanel) {
        self.state.lock().select_panel(panel);
    }

    pub fn select_address(&self, address: Option<AddressKey>) {
        self.state.lock().select_address(address);
    }

    pub fn dismiss_notice(&self) {
        self.state.lock().dismiss_notice();
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    async fn run_query<F, Fut>(&self, kind: QueryKind, fetch: F) -> Result<QueryResult, KvError>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<QueryResult, KvError>>,
    {
        let ticket = self.begin(Activity::Querying(kind))?;
        let outcome = fetch().await;
        let mut state = self.state.lock();
        state.finish(&ticket);
        match outcome {
            Ok(result) => {
                state.accept_result(&ticket, result.clone());
                Ok(result)
            }
            Err(e) => {
                if state.is_current_view(&ticket) {
                    state.set_notice(Notice::from_error(&e));
                }
                Err(e)
            }
        }
    }

    pub async fn query_users(&self) -> Result<QueryResult, KvError> {
        let gateway = &self.gateway;
        self.run_query(QueryKind::Users, move || async move {
            Ok(QueryResult::Users {
                users: gateway.get_users().await?,
            })
        })
        .await
    }

    pub async fn query_map(&self) -> Result<QueryResult, KvError> {
        let gateway = &self.gateway;
        self.run_query(QueryKind::Map, move || async move {
            let entries: Vec<UserRecord> = gateway.get_map().await?;
            Ok(QueryResult::Map { entries })
        })
        .await
    }

    /// Value stored for `address`, or for the selected secondary address.
    pub async fn query_value_by_user(
        &self,
        address: Option<AddressKey>,
    ) -> Result<QueryResult, KvError> {
        let address = match address {
            Some(a) => {
                self.select_address(Some(a.clone()));
                a
            }
            None => {
                let selected = self.state.lock().selected_address().cloned();
                match selected {
                    Some(a) => a,
                    None => self.require_account()?,
                }
            }
        };
        let gateway = &self.gateway;
        self.run_query(QueryKind::ValueByUser, move || async move {
            let value = gateway.get_value_by_user(&address).await?;
            Ok(QueryResult::ValueByUser { address, value })
        })
        .await
    }

    /// Balance of the connected account in the fee denomination, base units.
    pub async fn balance(&self) -> Result<u128, KvError> {
        let account = self.require_account()?;
        let ticket = self.begin(Activity::FetchingBalance)?;
        let result = self
            .gateway
            .get_balance(&account, &self.config.fee_denom)
            .await;
        self.finish(&ticket);
        result.map_err(|e| self.fail(e))
    }

    /// Sign an arbitrary challenge with the connected account's session key.
    pub async fn sign_arbitrary(&self, message: &str) -> Result<String, KvError> {
        let account = self.require_account()?;
        let ticket = self.begin(Activity::Signing)?;
        let result = self.gateway.sign_arbitrary(&account, message).await;
        self.finish(&ticket);
        result.map_err(|e| self.fail(e))
    }

    // ---------------------------------------------------------------------
    // Submit
    // ---------------------------------------------------------------------

    /// Run one submit cycle for the pending edit.
    pub async fn submit(&self) -> Result<SubmitOutcome, KvError> {
        let account = self.require_account()?;
        let ticket = self.begin(Activity::Submitting(SubmitPhase::Validating))?;
        let result = self.run_submit(&ticket, &account).await;
        let mut state = self.state.lock();
        state.finish(&ticket);
        if let Err(e) = &result {
            if state.is_current(&ticket) {
                state.set_notice(Notice::from_error(e));
            }
        }
        result
    }

    async fn run_submit(&self, ticket: &Ticket, account: &AddressKey) -> Result<SubmitOutcome, KvError> {
        // Validating
        let payload = {
            let mut state = self.state.lock();
            let normalized = json_guard::normalize(state.pending_edit());
            state.set_pending_edit(normalized.clone());
            match json_guard::validate(&normalized) {
                Validation::Valid => normalized,
                other => {
                    let reason = other.error().unwrap_or(INVALID_JSON).to_string();
                    state.set_validation_error(Some(reason.clone()));
                    return Err(KvError::Validation { reason });
                }
            }
        };

        // BalanceChecking
        self.advance(ticket, SubmitPhase::BalanceChecking);
        let denom = &self.config.fee_denom;
        let balance = match self.gateway.get_balance(account, denom).await {
            Ok(balance) => balance,
            Err(e @ KvError::GatewayPrecondition { .. }) => return Err(e),
            Err(e) => {
                return Err(KvError::TransactionFailed {
                    kind: FailureKind::Generic,
                    detail: e.to_string(),
                })
            }
        };
        if balance < self.config.min_balance {
            warn!(
                address = account.as_str(),
                balance = %balance,
                required = %self.config.min_balance,
                "balance below submit minimum"
            );
            return Err(KvError::InsufficientFunds {
                balance,
                required: self.config.min_balance,
                denom: denom.clone(),
            });
        }

        // Submitting
        self.advance(ticket, SubmitPhase::Submitting);
        let receipt = match self
            .gateway
            .execute_update(account, self.gateway.contract(), &payload)
            .await
        {
            Ok(receipt) => receipt,
            Err(e @ KvError::GatewayPrecondition { .. }) => return Err(e),
            Err(e) => {
                let detail = e.to_string();
                return Err(KvError::TransactionFailed {
                    kind: FailureKind::classify(&detail),
                    detail,
                });
            }
        };
        info!(
            tx_hash = %receipt.transaction_hash,
            height = receipt.height,
            "update confirmed"
        );

        // Confirmed
        {
            let mut state = self.state.lock();
            if state.is_current(ticket) {
                state.record_receipt(receipt.clone());
            }
        }

        // Reconciling
        self.advance(ticket, SubmitPhase::Reconciling);
        let refresh = match self.gateway.get_value_by_user(account).await {
            Ok(Some(value)) => {
                let mut state = self.state.lock();
                if state.is_current(ticket) {
                    state.set_pending_edit(value.clone());
                    RefreshStatus::Synced(value)
                } else {
                    RefreshStatus::Skipped
                }
            }
            Ok(None) => RefreshStatus::Failed(format!(
                "contract has no value for {} after transaction {}",
                account, receipt.transaction_hash
            )),
            Err(e) => RefreshStatus::Failed(e.to_string()),
        };
        if let RefreshStatus::Failed(detail) = &refresh {
            warn!(tx_hash = %receipt.transaction_hash, error = %detail, "refresh after update failed");
            let mut state = self.state.lock();
            if state.is_current(ticket) {
                state.set_notice(Notice::RefreshFailed {
                    detail: detail.clone(),
                });
            }
        }
        Ok(SubmitOutcome { receipt, refresh })
    }
}

//! In-memory point ledger.
//!
//! Each member's account is an event-sourced `MemberPointAccount`. A single
//! mutex guards all accounts, which makes every adjustment an atomic
//! read-modify-write and serializes concurrent adjustments to one member.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use loyalty_core::MemberId;
use loyalty_events::execute;
use loyalty_points::{
    AccountLedger, AdjustPoints, LedgerError, MemberPointAccount, OpenAccount,
    PointAccountCommand, PointAccountEvent, PointAdjustment, PointsAdjusted,
};

/// Point balances for one member, as reported by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountSummary {
    pub member_id: MemberId,
    pub balance: i64,
    pub total_earned: i64,
}

#[derive(Debug)]
struct AccountStream {
    account: MemberPointAccount,
    events: Vec<PointAccountEvent>,
}

impl AccountStream {
    fn new(member_id: MemberId) -> Self {
        Self {
            account: MemberPointAccount::empty(member_id),
            events: Vec::new(),
        }
    }

    fn execute(&mut self, command: &PointAccountCommand) -> Result<(), LedgerError> {
        let events = execute(&mut self.account, command)?;
        self.events.extend(events);
        Ok(())
    }
}

/// In-memory `AccountLedger` (tests/dev/replay).
///
/// Members without an account start from a zero balance.
#[derive(Debug, Default)]
pub struct InMemoryAccountLedger {
    accounts: Mutex<HashMap<MemberId, AccountStream>>,
}

impl InMemoryAccountLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<MemberId, AccountStream>>, LedgerError> {
        self.accounts
            .lock()
            .map_err(|_| LedgerError::Unavailable("lock poisoned".to_string()))
    }

    /// Run `command` against the member's stream. A member without history is
    /// only added to the map once a command is accepted.
    fn execute_for(
        &self,
        member_id: MemberId,
        command: &PointAccountCommand,
    ) -> Result<(), LedgerError> {
        let mut accounts = self.lock()?;
        if let Some(stream) = accounts.get_mut(&member_id) {
            return stream.execute(command);
        }

        let mut stream = AccountStream::new(member_id);
        stream.execute(command)?;
        accounts.insert(member_id, stream);
        Ok(())
    }

    /// Seed an account with an opening balance. Fails if it already has history.
    pub fn open_account(&self, member_id: MemberId, opening_balance: i64) -> Result<(), LedgerError> {
        self.execute_for(
            member_id,
            &PointAccountCommand::OpenAccount(OpenAccount {
                member_id,
                opening_balance,
                occurred_at: Utc::now(),
            }),
        )
    }

    /// Current balance (zero for unknown members).
    pub fn balance(&self, member_id: MemberId) -> Result<i64, LedgerError> {
        Ok(self.summary(member_id)?.balance)
    }

    pub fn summary(&self, member_id: MemberId) -> Result<AccountSummary, LedgerError> {
        let accounts = self.lock()?;
        let (balance, total_earned) = accounts
            .get(&member_id)
            .map(|s| (s.account.balance(), s.account.total_earned()))
            .unwrap_or((0, 0));
        Ok(AccountSummary {
            member_id,
            balance,
            total_earned,
        })
    }

    /// All known accounts.
    pub fn summaries(&self) -> Result<Vec<AccountSummary>, LedgerError> {
        let accounts = self.lock()?;
        Ok(accounts
            .values()
            .map(|s| AccountSummary {
                member_id: s.account.member_id(),
                balance: s.account.balance(),
                total_earned: s.account.total_earned(),
            })
            .collect())
    }

    /// Point history, oldest first.
    pub fn history(&self, member_id: MemberId) -> Result<Vec<PointsAdjusted>, LedgerError> {
        let accounts = self.lock()?;
        Ok(accounts
            .get(&member_id)
            .map(|s| {
                s.events
                    .iter()
                    .filter_map(|e| match e {
                        PointAccountEvent::PointsAdjusted(adjusted) => Some(adjusted.clone()),
                        PointAccountEvent::AccountOpened(_) => None,
                    })
                    .collect()
            })
            .unwrap_or_default())
    }
}

impl AccountLedger for InMemoryAccountLedger {
    fn apply(&self, adjustment: &PointAdjustment) -> Result<(), LedgerError> {
        self.execute_for(
            adjustment.member_id,
            &PointAccountCommand::AdjustPoints(AdjustPoints {
                member_id: adjustment.member_id,
                delta: adjustment.delta,
                reason: adjustment.reason.clone(),
                occurred_at: Utc::now(),
            }),
        )
    }
}

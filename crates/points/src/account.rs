use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use loyalty_core::{Aggregate, AggregateRoot, DomainError, MemberId};
use loyalty_events::Event;

use crate::error::LedgerError;

/// Aggregate root: a member's point account.
///
/// Tracks the spendable `balance` and the lifetime `total_earned`. Debits
/// reduce the balance only; they never reduce what was earned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberPointAccount {
    member_id: MemberId,
    balance: i64,
    total_earned: i64,
    version: u64,
}

impl MemberPointAccount {
    /// An account with no history (zero balance).
    pub fn empty(member_id: MemberId) -> Self {
        Self {
            member_id,
            balance: 0,
            total_earned: 0,
            version: 0,
        }
    }

    pub fn member_id(&self) -> MemberId {
        self.member_id
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }

    pub fn total_earned(&self) -> i64 {
        self.total_earned
    }
}

impl AggregateRoot for MemberPointAccount {
    type Id = MemberId;

    fn id(&self) -> &Self::Id {
        &self.member_id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: OpenAccount (seed an opening balance, e.g. when migrating members).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenAccount {
    pub member_id: MemberId,
    pub opening_balance: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AdjustPoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustPoints {
    pub member_id: MemberId,
    pub delta: i64,
    pub reason: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointAccountCommand {
    OpenAccount(OpenAccount),
    AdjustPoints(AdjustPoints),
}

/// Event: AccountOpened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountOpened {
    pub member_id: MemberId,
    pub opening_balance: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: PointsAdjusted (one entry of the member's point history).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsAdjusted {
    pub member_id: MemberId,
    pub delta: i64,
    pub balance_after: i64,
    pub reason: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointAccountEvent {
    AccountOpened(AccountOpened),
    PointsAdjusted(PointsAdjusted),
}

impl Event for PointAccountEvent {
    fn event_type(&self) -> &'static str {
        match self {
            PointAccountEvent::AccountOpened(_) => "points.account.opened",
            PointAccountEvent::PointsAdjusted(_) => "points.account.adjusted",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            PointAccountEvent::AccountOpened(e) => e.occurred_at,
            PointAccountEvent::PointsAdjusted(e) => e.occurred_at,
        }
    }
}

impl Aggregate for MemberPointAccount {
    type Command = PointAccountCommand;
    type Event = PointAccountEvent;
    type Error = LedgerError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            PointAccountEvent::AccountOpened(e) => {
                self.member_id = e.member_id;
                self.balance = e.opening_balance;
                self.total_earned = e.opening_balance;
            }
            PointAccountEvent::PointsAdjusted(e) => {
                self.balance = e.balance_after;
                if e.delta > 0 {
                    self.total_earned = self.total_earned.saturating_add(e.delta);
                }
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            PointAccountCommand::OpenAccount(cmd) => self.handle_open(cmd),
            PointAccountCommand::AdjustPoints(cmd) => self.handle_adjust(cmd),
        }
    }
}

impl MemberPointAccount {
    fn ensure_member(&self, member_id: MemberId) -> Result<(), DomainError> {
        if self.member_id != member_id {
            return Err(DomainError::invariant("member_id mismatch"));
        }
        Ok(())
    }

    fn handle_open(&self, cmd: &OpenAccount) -> Result<Vec<PointAccountEvent>, LedgerError> {
        self.ensure_member(cmd.member_id)?;

        if self.version > 0 {
            return Err(DomainError::conflict("point account already has history").into());
        }
        if cmd.opening_balance < 0 {
            return Err(DomainError::validation("opening balance must not be negative").into());
        }

        Ok(vec![PointAccountEvent::AccountOpened(AccountOpened {
            member_id: cmd.member_id,
            opening_balance: cmd.opening_balance,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_adjust(&self, cmd: &AdjustPoints) -> Result<Vec<PointAccountEvent>, LedgerError> {
        self.ensure_member(cmd.member_id)?;

        if cmd.delta == 0 {
            return Err(DomainError::validation("delta must not be zero").into());
        }
        if cmd.reason.trim().is_empty() {
            return Err(DomainError::validation("reason must not be empty").into());
        }

        let balance_after = self
            .balance
            .checked_add(cmd.delta)
            .ok_or_else(|| DomainError::overflow("point balance"))?;

        if balance_after < 0 {
            return Err(LedgerError::InsufficientBalance {
                member_id: self.member_id,
                available: self.balance,
                requested: cmd.delta.saturating_abs(),
            });
        }

        Ok(vec![PointAccountEvent::PointsAdjusted(PointsAdjusted {
            member_id: cmd.member_id,
            delta: cmd.delta,
            balance_after,
            reason: cmd.reason.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }
}

//! Operation contents
//!
//! The node describes every operation kind with one flat JSON object and a
//! `kind` discriminator. Here each kind is its own variant carrying the
//! fields that kind defines; serde dispatches on `kind` when decoding and
//! writes it back when encoding. Keys a protocol adds beyond those land in
//! each record's `extra` map and are written back unchanged.

use crate::numeric::DecimalString;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Discriminator of an operation's contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Endorsement,
    EndorsementWithSlot,
    SeedNonceRevelation,
    DoubleEndorsementEvidence,
    DoubleBakingEvidence,
    ActivateAccount,
    Proposals,
    Ballot,
    FailingNoop,
    Reveal,
    Transaction,
    Origination,
    Delegation,
    RegisterGlobalConstant,
    SetDepositsLimit,
}

impl OperationKind {
    pub const ALL: [OperationKind; 15] = [
        OperationKind::Endorsement,
        OperationKind::EndorsementWithSlot,
        OperationKind::SeedNonceRevelation,
        OperationKind::DoubleEndorsementEvidence,
        OperationKind::DoubleBakingEvidence,
        OperationKind::ActivateAccount,
        OperationKind::Proposals,
        OperationKind::Ballot,
        OperationKind::FailingNoop,
        OperationKind::Reveal,
        OperationKind::Transaction,
        OperationKind::Origination,
        OperationKind::Delegation,
        OperationKind::RegisterGlobalConstant,
        OperationKind::SetDepositsLimit,
    ];

    /// The wire value of the `kind` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Endorsement => "endorsement",
            OperationKind::EndorsementWithSlot => "endorsement_with_slot",
            OperationKind::SeedNonceRevelation => "seed_nonce_revelation",
            OperationKind::DoubleEndorsementEvidence => "double_endorsement_evidence",
            OperationKind::DoubleBakingEvidence => "double_baking_evidence",
            OperationKind::ActivateAccount => "activate_account",
            OperationKind::Proposals => "proposals",
            OperationKind::Ballot => "ballot",
            OperationKind::FailingNoop => "failing_noop",
            OperationKind::Reveal => "reveal",
            OperationKind::Transaction => "transaction",
            OperationKind::Origination => "origination",
            OperationKind::Delegation => "delegation",
            OperationKind::RegisterGlobalConstant => "register_global_constant",
            OperationKind::SetDepositsLimit => "set_deposits_limit",
        }
    }

    /// Manager operations carry a source, fee, counter and limits.
    pub fn is_manager(&self) -> bool {
        matches!(
            self,
            OperationKind::Reveal
                | OperationKind::Transaction
                | OperationKind::Origination
                | OperationKind::Delegation
                | OperationKind::RegisterGlobalConstant
                | OperationKind::SetDepositsLimit
        )
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logical operation inside an operation group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Contents {
    Endorsement(Endorsement),
    EndorsementWithSlot(EndorsementWithSlot),
    SeedNonceRevelation(SeedNonceRevelation),
    DoubleEndorsementEvidence(DoubleEndorsementEvidence),
    DoubleBakingEvidence(DoubleBakingEvidence),
    ActivateAccount(ActivateAccount),
    Proposals(Proposals),
    Ballot(Ballot),
    FailingNoop(FailingNoop),
    Reveal(Reveal),
    Transaction(Transaction),
    Origination(Origination),
    Delegation(Delegation),
    RegisterGlobalConstant(RegisterGlobalConstant),
    SetDepositsLimit(SetDepositsLimit),
}

impl Contents {
    pub fn kind(&self) -> OperationKind {
        match self {
            Contents::Endorsement(_) => OperationKind::Endorsement,
            Contents::EndorsementWithSlot(_) => OperationKind::EndorsementWithSlot,
            Contents::SeedNonceRevelation(_) => OperationKind::SeedNonceRevelation,
            Contents::DoubleEndorsementEvidence(_) => OperationKind::DoubleEndorsementEvidence,
            Contents::DoubleBakingEvidence(_) => OperationKind::DoubleBakingEvidence,
            Contents::ActivateAccount(_) => OperationKind::ActivateAccount,
            Contents::Proposals(_) => OperationKind::Proposals,
            Contents::Ballot(_) => OperationKind::Ballot,
            Contents::FailingNoop(_) => OperationKind::FailingNoop,
            Contents::Reveal(_) => OperationKind::Reveal,
            Contents::Transaction(_) => OperationKind::Transaction,
            Contents::Origination(_) => OperationKind::Origination,
            Contents::Delegation(_) => OperationKind::Delegation,
            Contents::RegisterGlobalConstant(_) => OperationKind::RegisterGlobalConstant,
            Contents::SetDepositsLimit(_) => OperationKind::SetDepositsLimit,
        }
    }

    /// Shared manager fields, for manager operations only.
    pub fn manager(&self) -> Option<&ManagerFields> {
        match self {
            Contents::Reveal(op) => Some(&op.manager),
            Contents::Transaction(op) => Some(&op.manager),
            Contents::Origination(op) => Some(&op.manager),
            Contents::Delegation(op) => Some(&op.manager),
            Contents::RegisterGlobalConstant(op) => Some(&op.manager),
            Contents::SetDepositsLimit(op) => Some(&op.manager),
            _ => None,
        }
    }

    /// Account that signed the operation, when the kind names one.
    pub fn source(&self) -> Option<&str> {
        match self {
            Contents::Proposals(op) => Some(&op.source),
            Contents::Ballot(op) => Some(&op.source),
            _ => self.manager().map(|m| m.source.as_str()),
        }
    }

    pub fn fee(&self) -> Option<&DecimalString> {
        self.manager().map(|m| &m.fee)
    }

    pub fn metadata(&self) -> Option<&ContentsMetadata> {
        match self {
            Contents::Endorsement(op) => op.metadata.as_ref(),
            Contents::EndorsementWithSlot(op) => op.metadata.as_ref(),
            Contents::SeedNonceRevelation(op) => op.metadata.as_ref(),
            Contents::DoubleEndorsementEvidence(op) => op.metadata.as_ref(),
            Contents::DoubleBakingEvidence(op) => op.metadata.as_ref(),
            Contents::ActivateAccount(op) => op.metadata.as_ref(),
            Contents::Proposals(op) => op.metadata.as_ref(),
            Contents::Ballot(op) => op.metadata.as_ref(),
            Contents::FailingNoop(op) => op.metadata.as_ref(),
            Contents::Reveal(op) => op.metadata.as_ref(),
            Contents::Transaction(op) => op.metadata.as_ref(),
            Contents::Origination(op) => op.metadata.as_ref(),
            Contents::Delegation(op) => op.metadata.as_ref(),
            Contents::RegisterGlobalConstant(op) => op.metadata.as_ref(),
            Contents::SetDepositsLimit(op) => op.metadata.as_ref(),
        }
    }

    /// Result of applying the operation, if the node reported one.
    pub fn operation_result(&self) -> Option<&OperationResult> {
        self.metadata().and_then(|m| m.operation_result.as_ref())
    }
}

/// Fields shared by every manager operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagerFields {
    pub source: String,
    pub fee: DecimalString,
    pub counter: DecimalString,
    pub gas_limit: DecimalString,
    pub storage_limit: DecimalString,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endorsement {
    pub level: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ContentsMetadata>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndorsementWithSlot {
    /// The wrapped endorsement operation, kept as received.
    pub endorsement: Value,
    pub slot: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ContentsMetadata>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedNonceRevelation {
    pub level: i64,
    pub nonce: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ContentsMetadata>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoubleEndorsementEvidence {
    pub op1: Value,
    pub op2: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ContentsMetadata>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoubleBakingEvidence {
    pub bh1: Value,
    pub bh2: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ContentsMetadata>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivateAccount {
    pub pkh: String,
    pub secret: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ContentsMetadata>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposals {
    pub source: String,
    pub period: i64,
    pub proposals: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ContentsMetadata>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Vote cast in a ballot operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vote {
    Yay,
    Nay,
    Pass,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ballot {
    pub source: String,
    pub period: i64,
    pub proposal: String,
    pub ballot: Vote,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ContentsMetadata>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailingNoop {
    pub arbitrary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ContentsMetadata>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reveal {
    #[serde(flatten)]
    pub manager: ManagerFields,
    pub public_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ContentsMetadata>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(flatten)]
    pub manager: ManagerFields,
    pub amount: DecimalString,
    pub destination: String,
    /// Smart-contract call parameters (Micheline), kept as received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ContentsMetadata>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Origination {
    #[serde(flatten)]
    pub manager: ManagerFields,
    pub balance: DecimalString,
    #[serde(
        rename = "managerPubkey",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub manager_pubkey: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delegate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spendable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delegatable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ContentsMetadata>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delegation {
    #[serde(flatten)]
    pub manager: ManagerFields,
    /// `None` withdraws the current delegation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delegate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ContentsMetadata>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterGlobalConstant {
    #[serde(flatten)]
    pub manager: ManagerFields,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ContentsMetadata>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetDepositsLimit {
    #[serde(flatten)]
    pub manager: ManagerFields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<DecimalString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ContentsMetadata>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Execution outcome attached to one contents entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentsMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance_updates: Option<Vec<BalanceUpdate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_result: Option<OperationResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delegate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slots: Option<Vec<u16>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_operation_results: Option<Vec<Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Application status of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationStatus {
    Applied,
    Failed,
    Skipped,
    Backtracked,
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            OperationStatus::Applied => "applied",
            OperationStatus::Failed => "failed",
            OperationStatus::Skipped => "skipped",
            OperationStatus::Backtracked => "backtracked",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationResult {
    pub status: OperationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumed_gas: Option<DecimalString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<NodeError>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance_updates: Option<Vec<BalanceUpdate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub originated_contracts: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_size: Option<DecimalString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_storage_size_diff: Option<DecimalString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allocated_destination_contract: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OperationResult {
    pub fn is_applied(&self) -> bool {
        self.status == OperationStatus::Applied
    }
}

/// One ledger delta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceUpdate {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delegate: Option<String>,
    pub change: DecimalString,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Error reported by the node for a failed operation.
///
/// Only `kind` and `id` are common to every error; whatever else the node
/// attaches is kept in `details`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeError {
    pub kind: String,
    pub id: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

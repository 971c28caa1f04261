//! Ledger value types.

use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
use sp_runtime::{helpers_128bit::multiply_by_rational_with_rounding, Rounding, RuntimeDebug};

/// Compliance classification attached to every lot. Zero is not a valid type.
pub type RegulationType = u16;

pub type RequestId = u64;

/// Denominator of [`FeeType::Percentage`] fee values.
pub const BASIS_POINTS: u128 = 10_000;

/// A holder's sub-balance of one classification issued on one date.
#[derive(
    Encode,
    Decode,
    DecodeWithMemTracking,
    Clone,
    Copy,
    PartialEq,
    Eq,
    RuntimeDebug,
    TypeInfo,
    MaxEncodedLen,
)]
pub struct Lot {
    pub regulation_type: RegulationType,
    /// Unix time in seconds.
    pub issuance_date: u64,
    pub amount: u128,
}

impl Lot {
    pub fn matches(&self, regulation_type: RegulationType, issuance_date: u64) -> bool {
        self.regulation_type == regulation_type && self.issuance_date == issuance_date
    }
}

#[derive(
    Encode,
    Decode,
    DecodeWithMemTracking,
    Clone,
    Copy,
    PartialEq,
    Eq,
    RuntimeDebug,
    TypeInfo,
    MaxEncodedLen,
)]
pub enum RequestStatus {
    Requested,
    /// Advisory, set by the agent.
    UnderReview,
    /// Advisory, set by the agent.
    Approved,
    Rejected,
    Executed,
    Expired,
}

impl RequestStatus {
    /// No further transition is possible.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Rejected | Self::Executed | Self::Expired)
    }
}

#[derive(
    Encode,
    Decode,
    DecodeWithMemTracking,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    RuntimeDebug,
    TypeInfo,
    MaxEncodedLen,
)]
pub enum FeeType {
    /// `fee_value` in settlement-asset units per request.
    #[default]
    Flat,
    /// `fee_value` in basis points of the requested amount.
    Percentage,
}

#[derive(Encode, Decode, Clone, PartialEq, Eq, RuntimeDebug, TypeInfo, MaxEncodedLen)]
pub struct FeeConfig<AssetId> {
    pub fee_type: FeeType,
    pub fee_value: u128,
    /// Settlement asset. A positive fee cannot be collected while unset.
    pub fee_asset: Option<AssetId>,
}

impl<AssetId> Default for FeeConfig<AssetId> {
    fn default() -> Self {
        Self { fee_type: FeeType::Flat, fee_value: 0, fee_asset: None }
    }
}

impl<AssetId> FeeConfig<AssetId> {
    /// Minimum fee for a request moving `amount`. Percentage fees round down.
    pub fn required_fee(&self, amount: u128) -> Option<u128> {
        match self.fee_type {
            FeeType::Flat => Some(self.fee_value),
            FeeType::Percentage => multiply_by_rational_with_rounding(
                amount,
                self.fee_value,
                BASIS_POINTS,
                Rounding::Down,
            ),
        }
    }
}

#[derive(Encode, Decode, Clone, PartialEq, Eq, RuntimeDebug, TypeInfo, MaxEncodedLen)]
pub struct TransferRequest<AccountId> {
    pub from: AccountId,
    pub to: AccountId,
    pub amount: u128,
    /// Fee held in escrow for this request.
    pub fee_paid: u128,
    pub fee_payer: AccountId,
    pub requested_by: AccountId,
    /// Unix time in seconds.
    pub requested_at: u64,
    pub status: RequestStatus,
}

/// Legal ground recorded with a forced transfer.
#[derive(
    Encode,
    Decode,
    DecodeWithMemTracking,
    Clone,
    Copy,
    PartialEq,
    Eq,
    RuntimeDebug,
    TypeInfo,
    MaxEncodedLen,
)]
pub enum ForcedTransferReason {
    CourtOrder,
    RegulatoryAction,
    LostCredentials,
    Other,
}

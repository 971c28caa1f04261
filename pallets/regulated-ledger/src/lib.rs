#![cfg_attr(not(feature = "std"), no_std)]
#![allow(deprecated)]
#![allow(clippy::let_unit_value)]

//! # Regulated Ledger Pallet
//!
//! Token ledger that records each holder's balance as lots tagged with a regulation
//! type and issuance date.
//!
//! Every mutating call except [`Pallet::request_transfer`] and
//! [`Pallet::expire_request`] requires [`Config::AgentOrigin`]. In a runtime the agent
//! is the guarded queue's account, so issuance, burns, transfers, freezes and fee
//! changes all need the queue's signer threshold.
//!
//! Holders (or brokers acting for them) open transfer requests and escrow a fee in
//! the configured settlement asset. The agent approves, rejects or annotates the
//! request; a stale request can be expired by anyone after [`Config::RequestTtl`].

use frame_support::{
    dispatch::DispatchResult,
    ensure,
    pallet_prelude::*,
    traits::{
        fungibles::{self, Mutate as _},
        tokens::Preservation,
        EnsureOrigin, UnixTime,
    },
    PalletId,
};
use frame_system::{ensure_signed, pallet_prelude::*};
use sp_runtime::traits::{AccountIdConversion, TrailingZeroInput};
use sp_std::prelude::*;

pub use pallet::*;
pub use types::*;
pub use weights::WeightInfo;

#[cfg(test)]
mod mock;


#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub mod types;
pub mod weights;

/// The current storage version.
const STORAGE_VERSION: StorageVersion = StorageVersion::new(1);

pub const LOG_TARGET: &str = "runtime::regulated-ledger";

pub type AssetIdOf<T> = <<T as Config>::Assets as fungibles::Inspect<
    <T as frame_system::Config>::AccountId,
>>::AssetId;

/// Prepares a settlement asset for benchmarks.
#[cfg(feature = "runtime-benchmarks")]
pub trait BenchmarkHelper<AssetId> {
    /// Return an existing asset that accounts can hold without other deposits.
    fn fee_asset() -> AssetId;
}

#[frame_support::pallet]
pub mod pallet {
    use super::*;

    #[pallet::config]
    pub trait Config: frame_system::Config {
        type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

        /// The single caller allowed to mutate the ledger.
        type AgentOrigin: EnsureOrigin<Self::RuntimeOrigin>;

        type TimeProvider: UnixTime;

        /// Settlement assets for transfer-request fees.
        type Assets: fungibles::Mutate<Self::AccountId, Balance = u128>;

        /// Derives the fee escrow account.
        #[pallet::constant]
        type PalletId: Get<PalletId>;

        #[pallet::constant]
        type MaxLotsPerHolder: Get<u32>;

        /// Maximum number of elements in a batch call.
        #[pallet::constant]
        type MaxBatchSize: Get<u32>;

        /// Seconds after which an open request may be expired.
        #[pallet::constant]
        type RequestTtl: Get<u64>;

        type WeightInfo: WeightInfo;

        #[cfg(feature = "runtime-benchmarks")]
        type BenchmarkHelper: BenchmarkHelper<AssetIdOf<Self>>;
    }

    #[pallet::pallet]
    #[pallet::storage_version(STORAGE_VERSION)]
    pub struct Pallet<T>(_);

    /// Lots per holder, sorted by ascending issuance date. Never holds an empty lot.
    #[pallet::storage]
    #[pallet::getter(fn lots_of)]
    pub type Lots<T: Config> = StorageMap<
        _,
        Blake2_128Concat,
        T::AccountId,
        BoundedVec<Lot, T::MaxLotsPerHolder>,
        ValueQuery,
    >;

    #[pallet::storage]
    #[pallet::getter(fn total_supply)]
    pub type TotalSupply<T> = StorageValue<_, u128, ValueQuery>;

    /// Outstanding amount per regulation type.
    #[pallet::storage]
    #[pallet::getter(fn regulation_supply)]
    pub type RegulationSupply<T> =
        StorageMap<_, Twox64Concat, RegulationType, u128, ValueQuery>;

    /// Frozen accounts (cannot take part in requested transfers)
    #[pallet::storage]
    #[pallet::getter(fn is_frozen)]
    pub type Frozen<T: Config> = StorageMap<_, Blake2_128Concat, T::AccountId, bool, ValueQuery>;

    /// Accounts allowed to open transfer requests on behalf of holders.
    #[pallet::storage]
    #[pallet::getter(fn is_broker)]
    pub type Brokers<T: Config> = StorageMap<_, Blake2_128Concat, T::AccountId, bool, ValueQuery>;

    #[pallet::storage]
    #[pallet::getter(fn next_request_id)]
    pub type NextRequestId<T> = StorageValue<_, RequestId, ValueQuery>;

    #[pallet::storage]
    #[pallet::getter(fn transfer_request)]
    pub type TransferRequests<T: Config> =
        StorageMap<_, Twox64Concat, RequestId, TransferRequest<T::AccountId>>;

    #[pallet::storage]
    #[pallet::getter(fn fee_config)]
    pub type FeeConfiguration<T: Config> = StorageValue<_, FeeConfig<AssetIdOf<T>>, ValueQuery>;

    /// Fees held in escrow by the pallet account.
    #[pallet::storage]
    #[pallet::getter(fn collected_fees)]
    pub type CollectedFees<T> = StorageValue<_, u128, ValueQuery>;

    #[pallet::event]
    #[pallet::generate_deposit(pub(super) fn deposit_event)]
    pub enum Event<T: Config> {
        Minted {
            to: T::AccountId,
            amount: u128,
            regulation_type: RegulationType,
            issuance_date: u64,
        },
        /// Lots consumed oldest first, across all regulation types.
        Burned { from: T::AccountId, amount: u128 },
        RegulationBurned { from: T::AccountId, regulation_type: RegulationType, amount: u128 },
        LotTransferred {
            from: T::AccountId,
            to: T::AccountId,
            amount: u128,
            regulation_type: RegulationType,
            issuance_date: u64,
        },
        AccountFrozen { account: T::AccountId, frozen: bool },
        BrokerStatusUpdated { broker: T::AccountId, approved: bool },
        /// Override transfer, executed regardless of freeze state.
        ForcedTransfer {
            from: T::AccountId,
            to: T::AccountId,
            amount: u128,
            evidence_hash: T::Hash,
            reason: ForcedTransferReason,
        },
        TransferRequested {
            id: RequestId,
            from: T::AccountId,
            to: T::AccountId,
            amount: u128,
            fee_paid: u128,
            requested_by: T::AccountId,
        },
        RequestStatusChanged { id: RequestId, status: RequestStatus },
        TransferExecuted { id: RequestId, from: T::AccountId, to: T::AccountId, amount: u128 },
        TransferRejected { id: RequestId, reason_code: u16, refunded: bool },
        RequestExpired { id: RequestId, refunded: u128 },
        FeesWithdrawn { recipient: T::AccountId, amount: u128 },
        FeeParametersUpdated { fee_type: FeeType, fee_value: u128 },
        FeeTokenUpdated { asset: AssetIdOf<T> },
    }

    #[pallet::error]
    pub enum Error<T> {
        ZeroAddress,
        ZeroAmount,
        /// Regulation type zero is reserved.
        InvalidRegulationType,
        FutureIssuanceDate,
        InsufficientBalance,
        /// No lot with the given regulation type and issuance date holds the amount.
        InsufficientLotBalance,
        InsufficientRegulationBalance,
        /// The holder already has `MaxLotsPerHolder` lots.
        TooManyLots,
        EmptyBatch,
        BatchTooLarge,
        /// Batch argument vectors differ in length.
        LengthMismatch,
        /// Sender or recipient is frozen.
        AccountFrozen,
        /// Caller is neither the holder nor an approved broker.
        NotAuthorizedRequester,
        UnknownRequest,
        /// The request was already executed, rejected or expired.
        RequestAlreadyFinalized,
        /// The request is younger than `RequestTtl`.
        RequestNotStale,
        /// Only the advisory statuses can be set directly.
        InvalidStatusTransition,
        InsufficientFee,
        FeeTokenNotSet,
        InsufficientCollectedFees,
        /// The fee asset cannot change while fees are held in escrow.
        FeesOutstanding,
        /// Percentage fee above 10 000 basis points.
        InvalidFeeValue,
        Overflow,
    }

    #[pallet::hooks]
    impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
        fn integrity_test() {
            assert!(T::MaxLotsPerHolder::get() > 0, "MaxLotsPerHolder must be non-zero");
            assert!(T::MaxBatchSize::get() > 0, "MaxBatchSize must be non-zero");
        }

        #[cfg(feature = "try-runtime")]
        fn try_state(_n: BlockNumberFor<T>) -> Result<(), sp_runtime::TryRuntimeError> {
            Self::do_try_state()
        }
    }

    #[pallet::call]
    impl<T: Config> Pallet<T> {
        #[pallet::call_index(0)]
        #[pallet::weight(T::WeightInfo::mint())]
        pub fn mint(
            origin: OriginFor<T>,
            to: T::AccountId,
            amount: u128,
            regulation_type: RegulationType,
            issuance_date: u64,
        ) -> DispatchResult {
            T::AgentOrigin::ensure_origin(origin)?;
            Self::do_mint(to, amount, regulation_type, issuance_date)
        }

        /// Burn `amount` from `from`, oldest lots first.
        #[pallet::call_index(1)]
        #[pallet::weight(T::WeightInfo::burn_fifo())]
        pub fn burn_fifo(origin: OriginFor<T>, from: T::AccountId, amount: u128) -> DispatchResult {
            T::AgentOrigin::ensure_origin(origin)?;
            Self::do_burn(&from, amount, None)?;
            Self::deposit_event(Event::Burned { from, amount });
            Ok(())
        }

        /// Burn `amount` from `from`'s lots of `regulation_type`, oldest first.
        #[pallet::call_index(2)]
        #[pallet::weight(T::WeightInfo::burn_by_regulation())]
        pub fn burn_by_regulation(
            origin: OriginFor<T>,
            from: T::AccountId,
            amount: u128,
            regulation_type: RegulationType,
        ) -> DispatchResult {
            T::AgentOrigin::ensure_origin(origin)?;
            Self::do_burn_by_regulation(from, amount, regulation_type)
        }

        /// Move `amount` out of the lot keyed by `(regulation_type, issuance_date)`.
        ///
        /// The recipient's lot keeps the same key. Neither account may be frozen.
        #[pallet::call_index(3)]
        #[pallet::weight(T::WeightInfo::transfer_lot())]
        pub fn transfer_lot(
            origin: OriginFor<T>,
            from: T::AccountId,
            to: T::AccountId,
            amount: u128,
            regulation_type: RegulationType,
            issuance_date: u64,
        ) -> DispatchResult {
            T::AgentOrigin::ensure_origin(origin)?;
            Self::do_transfer_lot(from, to, amount, regulation_type, issuance_date)
        }

        #[pallet::call_index(4)]
        #[pallet::weight(T::WeightInfo::batch_mint(recipients.len() as u32))]
        pub fn batch_mint(
            origin: OriginFor<T>,
            recipients: Vec<T::AccountId>,
            amounts: Vec<u128>,
            regulation_types: Vec<RegulationType>,
            issuance_dates: Vec<u64>,
        ) -> DispatchResult {
            T::AgentOrigin::ensure_origin(origin)?;
            Self::ensure_batch(
                recipients.len(),
                &[amounts.len(), regulation_types.len(), issuance_dates.len()],
            )?;
            for (((to, amount), regulation_type), issuance_date) in
                recipients.into_iter().zip(amounts).zip(regulation_types).zip(issuance_dates)
            {
                Self::do_mint(to, amount, regulation_type, issuance_date)?;
            }
            Ok(())
        }

        #[pallet::call_index(5)]
        #[pallet::weight(T::WeightInfo::batch_burn_by_regulation(holders.len() as u32))]
        pub fn batch_burn_by_regulation(
            origin: OriginFor<T>,
            holders: Vec<T::AccountId>,
            amounts: Vec<u128>,
            regulation_types: Vec<RegulationType>,
        ) -> DispatchResult {
            T::AgentOrigin::ensure_origin(origin)?;
            Self::ensure_batch(holders.len(), &[amounts.len(), regulation_types.len()])?;
            for ((from, amount), regulation_type) in
                holders.into_iter().zip(amounts).zip(regulation_types)
            {
                Self::do_burn_by_regulation(from, amount, regulation_type)?;
            }
            Ok(())
        }

        #[pallet::call_index(6)]
        #[pallet::weight(T::WeightInfo::batch_transfer_from(senders.len() as u32))]
        pub fn batch_transfer_from(
            origin: OriginFor<T>,
            senders: Vec<T::AccountId>,
            recipients: Vec<T::AccountId>,
            amounts: Vec<u128>,
            regulation_types: Vec<RegulationType>,
            issuance_dates: Vec<u64>,
        ) -> DispatchResult {
            T::AgentOrigin::ensure_origin(origin)?;
            Self::ensure_batch(
                senders.len(),
                &[recipients.len(), amounts.len(), regulation_types.len(), issuance_dates.len()],
            )?;
            for ((((from, to), amount), regulation_type), issuance_date) in senders
                .into_iter()
                .zip(recipients)
                .zip(amounts)
                .zip(regulation_types)
                .zip(issuance_dates)
            {
                Self::do_transfer_lot(from, to, amount, regulation_type, issuance_date)?;
            }
            Ok(())
        }

        /// Set or clear the freeze flag. Emits an event even when nothing changes.
        #[pallet::call_index(7)]
        #[pallet::weight(T::WeightInfo::set_frozen())]
        pub fn set_frozen(
            origin: OriginFor<T>,
            account: T::AccountId,
            frozen: bool,
        ) -> DispatchResult {
            T::AgentOrigin::ensure_origin(origin)?;
            Self::ensure_not_zero(&account)?;
            if frozen {
                Frozen::<T>::insert(&account, true);
            } else {
                Frozen::<T>::remove(&account);
            }
            Self::deposit_event(Event::AccountFrozen { account, frozen });
            Ok(())
        }

        /// Move `amount` from `from` to `to` oldest lots first, ignoring freeze flags.
        #[pallet::call_index(8)]
        #[pallet::weight(T::WeightInfo::forced_transfer())]
        pub fn forced_transfer(
            origin: OriginFor<T>,
            from: T::AccountId,
            to: T::AccountId,
            amount: u128,
            evidence_hash: T::Hash,
            reason: ForcedTransferReason,
        ) -> DispatchResult {
            T::AgentOrigin::ensure_origin(origin)?;
            Self::ensure_not_zero(&from)?;
            Self::ensure_not_zero(&to)?;
            ensure!(amount > 0, Error::<T>::ZeroAmount);

            Self::move_fifo(&from, &to, amount)?;

            log::info!(
                target: LOG_TARGET,
                "forced transfer of {amount} ({reason:?}), evidence {evidence_hash:?}",
            );
            Self::deposit_event(Event::ForcedTransfer { from, to, amount, evidence_hash, reason });
            Ok(())
        }

        #[pallet::call_index(9)]
        #[pallet::weight(T::WeightInfo::set_broker_status())]
        pub fn set_broker_status(
            origin: OriginFor<T>,
            broker: T::AccountId,
            approved: bool,
        ) -> DispatchResult {
            T::AgentOrigin::ensure_origin(origin)?;
            Self::ensure_not_zero(&broker)?;
            if approved {
                Brokers::<T>::insert(&broker, true);
            } else {
                Brokers::<T>::remove(&broker);
            }
            Self::deposit_event(Event::BrokerStatusUpdated { broker, approved });
            Ok(())
        }

        #[pallet::call_index(10)]
        #[pallet::weight(T::WeightInfo::set_fee_parameters())]
        pub fn set_fee_parameters(
            origin: OriginFor<T>,
            fee_type: FeeType,
            fee_value: u128,
        ) -> DispatchResult {
            T::AgentOrigin::ensure_origin(origin)?;
            ensure!(
                fee_type == FeeType::Flat || fee_value <= BASIS_POINTS,
                Error::<T>::InvalidFeeValue
            );
            FeeConfiguration::<T>::mutate(|config| {
                config.fee_type = fee_type;
                config.fee_value = fee_value;
            });
            Self::deposit_event(Event::FeeParametersUpdated { fee_type, fee_value });
            Ok(())
        }

        /// Select the settlement asset. Refused while escrowed fees are outstanding.
        #[pallet::call_index(11)]
        #[pallet::weight(T::WeightInfo::set_fee_token())]
        pub fn set_fee_token(origin: OriginFor<T>, asset: AssetIdOf<T>) -> DispatchResult {
            T::AgentOrigin::ensure_origin(origin)?;
            ensure!(CollectedFees::<T>::get() == 0, Error::<T>::FeesOutstanding);
            FeeConfiguration::<T>::mutate(|config| config.fee_asset = Some(asset.clone()));
            Self::deposit_event(Event::FeeTokenUpdated { asset });
            Ok(())
        }

        /// Open a transfer request from `from` to `to`, escrowing `fee_amount` from the
        /// caller.
        ///
        /// The caller must be `from` or an approved broker. `fee_amount` must cover
        /// [`FeeConfig::required_fee`]; any excess is kept as part of the fee.
        #[pallet::call_index(12)]
        #[pallet::weight(T::WeightInfo::request_transfer())]
        pub fn request_transfer(
            origin: OriginFor<T>,
            from: T::AccountId,
            to: T::AccountId,
            amount: u128,
            fee_amount: u128,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::ensure_not_zero(&from)?;
            Self::ensure_not_zero(&to)?;
            ensure!(who == from || Brokers::<T>::get(&who), Error::<T>::NotAuthorizedRequester);
            ensure!(amount > 0, Error::<T>::ZeroAmount);
            Self::ensure_unfrozen(&from)?;
            Self::ensure_unfrozen(&to)?;
            ensure!(Self::balance_of(&from) >= amount, Error::<T>::InsufficientBalance);

            let config = FeeConfiguration::<T>::get();
            let required = config.required_fee(amount).ok_or(Error::<T>::Overflow)?;
            ensure!(fee_amount >= required, Error::<T>::InsufficientFee);
            if fee_amount > 0 {
                let asset = config.fee_asset.ok_or(Error::<T>::FeeTokenNotSet)?;
                T::Assets::transfer(
                    asset,
                    &who,
                    &Self::account_id(),
                    fee_amount,
                    Preservation::Expendable,
                )?;
                CollectedFees::<T>::try_mutate(|collected| -> DispatchResult {
                    *collected = collected.checked_add(fee_amount).ok_or(Error::<T>::Overflow)?;
                    Ok(())
                })?;
            }

            let id = NextRequestId::<T>::get();
            NextRequestId::<T>::put(id.checked_add(1).ok_or(Error::<T>::Overflow)?);
            TransferRequests::<T>::insert(
                id,
                TransferRequest {
                    from: from.clone(),
                    to: to.clone(),
                    amount,
                    fee_paid: fee_amount,
                    fee_payer: who.clone(),
                    requested_by: who.clone(),
                    requested_at: Self::now(),
                    status: RequestStatus::Requested,
                },
            );
            Self::deposit_event(Event::TransferRequested {
                id,
                from,
                to,
                amount,
                fee_paid: fee_amount,
                requested_by: who,
            });
            Ok(())
        }

        /// Annotate an open request as `UnderReview` or `Approved`. Moves no funds.
        #[pallet::call_index(13)]
        #[pallet::weight(T::WeightInfo::update_status())]
        pub fn update_status(
            origin: OriginFor<T>,
            id: RequestId,
            status: RequestStatus,
        ) -> DispatchResult {
            T::AgentOrigin::ensure_origin(origin)?;
            ensure!(
                matches!(status, RequestStatus::UnderReview | RequestStatus::Approved),
                Error::<T>::InvalidStatusTransition
            );
            let mut request = Self::open_request(id)?;
            request.status = status;
            TransferRequests::<T>::insert(id, request);
            Self::deposit_event(Event::RequestStatusChanged { id, status });
            Ok(())
        }

        /// Finalize a request. Approval moves the amount oldest lots first; refusal
        /// keeps the escrowed fee.
        #[pallet::call_index(14)]
        #[pallet::weight(T::WeightInfo::process())]
        pub fn process(origin: OriginFor<T>, id: RequestId, approve: bool) -> DispatchResult {
            T::AgentOrigin::ensure_origin(origin)?;
            let mut request = Self::open_request(id)?;

            if approve {
                Self::ensure_unfrozen(&request.from)?;
                Self::ensure_unfrozen(&request.to)?;
                Self::move_fifo(&request.from, &request.to, request.amount)?;
                request.status = RequestStatus::Executed;
                Self::deposit_event(Event::TransferExecuted {
                    id,
                    from: request.from.clone(),
                    to: request.to.clone(),
                    amount: request.amount,
                });
            } else {
                request.status = RequestStatus::Rejected;
                Self::deposit_event(Event::TransferRejected {
                    id,
                    reason_code: 0,
                    refunded: false,
                });
            }
            TransferRequests::<T>::insert(id, request);
            Ok(())
        }

        #[pallet::call_index(15)]
        #[pallet::weight(T::WeightInfo::reject())]
        pub fn reject(
            origin: OriginFor<T>,
            id: RequestId,
            reason_code: u16,
            refund: bool,
        ) -> DispatchResult {
            T::AgentOrigin::ensure_origin(origin)?;
            let mut request = Self::open_request(id)?;
            if refund {
                Self::refund_fee(&request)?;
            }
            request.status = RequestStatus::Rejected;
            TransferRequests::<T>::insert(id, request);
            Self::deposit_event(Event::TransferRejected { id, reason_code, refunded: refund });
            Ok(())
        }

        /// Pay `amount` of escrowed fees to `recipient`.
        #[pallet::call_index(16)]
        #[pallet::weight(T::WeightInfo::withdraw_fees())]
        pub fn withdraw_fees(
            origin: OriginFor<T>,
            amount: u128,
            recipient: T::AccountId,
        ) -> DispatchResult {
            T::AgentOrigin::ensure_origin(origin)?;
            Self::ensure_not_zero(&recipient)?;
            ensure!(amount > 0, Error::<T>::ZeroAmount);
            let collected = CollectedFees::<T>::get();
            ensure!(amount <= collected, Error::<T>::InsufficientCollectedFees);
            let asset = FeeConfiguration::<T>::get().fee_asset.ok_or(Error::<T>::FeeTokenNotSet)?;

            T::Assets::transfer(
                asset,
                &Self::account_id(),
                &recipient,
                amount,
                Preservation::Expendable,
            )?;
            CollectedFees::<T>::put(collected - amount);
            Self::deposit_event(Event::FeesWithdrawn { recipient, amount });
            Ok(())
        }

        /// Close an open request older than `RequestTtl` and refund its fee. Any signed
        /// account may call this.
        #[pallet::call_index(17)]
        #[pallet::weight(T::WeightInfo::expire_request())]
        pub fn expire_request(origin: OriginFor<T>, id: RequestId) -> DispatchResult {
            ensure_signed(origin)?;
            let mut request = Self::open_request(id)?;
            ensure!(
                Self::now() >= request.requested_at.saturating_add(T::RequestTtl::get()),
                Error::<T>::RequestNotStale
            );
            Self::refund_fee(&request)?;
            let refunded = request.fee_paid;
            request.status = RequestStatus::Expired;
            TransferRequests::<T>::insert(id, request);
            Self::deposit_event(Event::RequestExpired { id, refunded });
            Ok(())
        }
    }

    #[pallet::genesis_config]
    #[derive(frame_support::DefaultNoBound)]
    pub struct GenesisConfig<T: Config> {
        /// Approved brokers
        pub brokers: Vec<T::AccountId>,
        /// Accounts frozen at genesis
        pub frozen_accounts: Vec<T::AccountId>,
        /// Initial lots (holder, amount, regulation type, issuance date)
        pub initial_lots: Vec<(T::AccountId, u128, RegulationType, u64)>,
    }

    #[pallet::genesis_build]
    impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
        fn build(&self) {
            for broker in &self.brokers {
                Brokers::<T>::insert(broker, true);
            }
            for account in &self.frozen_accounts {
                Frozen::<T>::insert(account, true);
            }

            let mut total: u128 = 0;
            for (holder, amount, regulation_type, issuance_date) in &self.initial_lots {
                assert!(*amount > 0, "Zero-amount genesis lot");
                assert!(*regulation_type != 0, "Regulation type zero in genesis lot");
                let lot = Lot {
                    regulation_type: *regulation_type,
                    issuance_date: *issuance_date,
                    amount: *amount,
                };
                Pallet::<T>::deposit_lot(holder, lot).expect("Too many genesis lots for holder");
                RegulationSupply::<T>::mutate(regulation_type, |supply| {
                    *supply = supply.saturating_add(*amount)
                });
                total = total.saturating_add(*amount);
            }
            TotalSupply::<T>::put(total);
        }
    }
}

impl<T: Config> Pallet<T> {
    /// The fee escrow account.
    pub fn account_id() -> T::AccountId {
        T::PalletId::get().into_account_truncating()
    }

    /// Sum of all of `who`'s lots.
    pub fn balance_of(who: &T::AccountId) -> u128 {
        Lots::<T>::get(who).iter().fold(0u128, |sum, lot| sum.saturating_add(lot.amount))
    }

    pub fn regulation_balance_of(who: &T::AccountId, regulation_type: RegulationType) -> u128 {
        Lots::<T>::get(who)
            .iter()
            .filter(|lot| lot.regulation_type == regulation_type)
            .fold(0u128, |sum, lot| sum.saturating_add(lot.amount))
    }

    pub fn lot_count(who: &T::AccountId) -> u32 {
        Lots::<T>::decode_len(who).unwrap_or(0) as u32
    }

    fn do_mint(
        to: T::AccountId,
        amount: u128,
        regulation_type: RegulationType,
        issuance_date: u64,
    ) -> DispatchResult {
        Self::ensure_not_zero(&to)?;
        ensure!(amount > 0, Error::<T>::ZeroAmount);
        ensure!(regulation_type != 0, Error::<T>::InvalidRegulationType);
        ensure!(issuance_date <= Self::now(), Error::<T>::FutureIssuanceDate);

        TotalSupply::<T>::try_mutate(|supply| -> DispatchResult {
            *supply = supply.checked_add(amount).ok_or(Error::<T>::Overflow)?;
            Ok(())
        })?;
        RegulationSupply::<T>::try_mutate(regulation_type, |supply| -> DispatchResult {
            *supply = supply.checked_add(amount).ok_or(Error::<T>::Overflow)?;
            Ok(())
        })?;
        Self::deposit_lot(&to, Lot { regulation_type, issuance_date, amount })?;

        Self::deposit_event(Event::Minted { to, amount, regulation_type, issuance_date });
        Ok(())
    }

    fn do_burn_by_regulation(
        from: T::AccountId,
        amount: u128,
        regulation_type: RegulationType,
    ) -> DispatchResult {
        ensure!(regulation_type != 0, Error::<T>::InvalidRegulationType);
        Self::do_burn(&from, amount, Some(regulation_type))?;
        Self::deposit_event(Event::RegulationBurned { from, regulation_type, amount });
        Ok(())
    }

    fn do_burn(
        from: &T::AccountId,
        amount: u128,
        regulation_type: Option<RegulationType>,
    ) -> DispatchResult {
        Self::ensure_not_zero(from)?;
        ensure!(amount > 0, Error::<T>::ZeroAmount);
        for drawn in Self::withdraw_fifo(from, amount, regulation_type)? {
            RegulationSupply::<T>::mutate(drawn.regulation_type, |supply| {
                *supply = supply.saturating_sub(drawn.amount)
            });
        }
        TotalSupply::<T>::mutate(|supply| *supply = supply.saturating_sub(amount));
        Ok(())
    }

    fn do_transfer_lot(
        from: T::AccountId,
        to: T::AccountId,
        amount: u128,
        regulation_type: RegulationType,
        issuance_date: u64,
    ) -> DispatchResult {
        Self::ensure_not_zero(&from)?;
        Self::ensure_not_zero(&to)?;
        ensure!(amount > 0, Error::<T>::ZeroAmount);
        Self::ensure_unfrozen(&from)?;
        Self::ensure_unfrozen(&to)?;

        let mut lots = Lots::<T>::get(&from);
        let index = lots
            .iter()
            .position(|lot| lot.matches(regulation_type, issuance_date) && lot.amount >= amount)
            .ok_or(Error::<T>::InsufficientLotBalance)?;
        lots[index].amount -= amount;
        if lots[index].amount == 0 {
            lots.remove(index);
        }
        Self::put_lots(&from, lots);
        Self::deposit_lot(&to, Lot { regulation_type, issuance_date, amount })?;

        Self::deposit_event(Event::LotTransferred {
            from,
            to,
            amount,
            regulation_type,
            issuance_date,
        });
        Ok(())
    }

    /// Credit `lot` to `who`, merging into an existing lot with the same key or
    /// inserting it after all lots issued on or before its date.
    fn deposit_lot(who: &T::AccountId, lot: Lot) -> DispatchResult {
        Lots::<T>::try_mutate(who, |lots| -> DispatchResult {
            match lots.iter().position(|held| held.matches(lot.regulation_type, lot.issuance_date))
            {
                Some(index) => {
                    lots[index].amount =
                        lots[index].amount.checked_add(lot.amount).ok_or(Error::<T>::Overflow)?
                },
                None => {
                    let index = lots.partition_point(|held| held.issuance_date <= lot.issuance_date);
                    lots.try_insert(index, lot).map_err(|_| Error::<T>::TooManyLots)?;
                },
            }
            Ok(())
        })
    }

    /// Debit `amount` from `who` oldest lots first, optionally only from lots of one
    /// regulation type. Emptied lots are removed. Returns the portion drawn from each
    /// lot touched.
    fn withdraw_fifo(
        who: &T::AccountId,
        amount: u128,
        regulation_type: Option<RegulationType>,
    ) -> Result<Vec<Lot>, DispatchError> {
        match regulation_type {
            Some(regulation_type) => ensure!(
                Self::regulation_balance_of(who, regulation_type) >= amount,
                Error::<T>::InsufficientRegulationBalance
            ),
            None => ensure!(Self::balance_of(who) >= amount, Error::<T>::InsufficientBalance),
        }

        let mut lots = Lots::<T>::get(who);
        let mut remaining = amount;
        let mut drawn = Vec::new();
        for lot in lots.iter_mut() {
            if remaining == 0 {
                break;
            }
            if regulation_type.is_some_and(|wanted| wanted != lot.regulation_type) {
                continue;
            }
            let take = lot.amount.min(remaining);
            lot.amount -= take;
            remaining -= take;
            drawn.push(Lot { amount: take, ..*lot });
        }
        lots.retain(|lot| lot.amount > 0);
        Self::put_lots(who, lots);
        Ok(drawn)
    }

    /// FIFO move preserving each drawn portion's regulation type and issuance date.
    fn move_fifo(from: &T::AccountId, to: &T::AccountId, amount: u128) -> DispatchResult {
        for lot in Self::withdraw_fifo(from, amount, None)? {
            Self::deposit_lot(to, lot)?;
        }
        Ok(())
    }

    fn put_lots(who: &T::AccountId, lots: BoundedVec<Lot, T::MaxLotsPerHolder>) {
        if lots.is_empty() {
            Lots::<T>::remove(who);
        } else {
            Lots::<T>::insert(who, lots);
        }
    }

    fn refund_fee(request: &TransferRequest<T::AccountId>) -> DispatchResult {
        if request.fee_paid == 0 {
            return Ok(());
        }
        let asset = FeeConfiguration::<T>::get().fee_asset.ok_or(Error::<T>::FeeTokenNotSet)?;
        T::Assets::transfer(
            asset,
            &Self::account_id(),
            &request.fee_payer,
            request.fee_paid,
            Preservation::Expendable,
        )?;
        CollectedFees::<T>::try_mutate(|collected| -> DispatchResult {
            *collected =
                collected.checked_sub(request.fee_paid).ok_or(Error::<T>::InsufficientCollectedFees)?;
            Ok(())
        })
    }

    fn open_request(id: RequestId) -> Result<TransferRequest<T::AccountId>, DispatchError> {
        let request = TransferRequests::<T>::get(id).ok_or(Error::<T>::UnknownRequest)?;
        ensure!(!request.status.is_final(), Error::<T>::RequestAlreadyFinalized);
        Ok(request)
    }

    fn ensure_batch(len: usize, other_lens: &[usize]) -> DispatchResult {
        ensure!(len > 0, Error::<T>::EmptyBatch);
        ensure!(len <= T::MaxBatchSize::get() as usize, Error::<T>::BatchTooLarge);
        ensure!(other_lens.iter().all(|other| *other == len), Error::<T>::LengthMismatch);
        Ok(())
    }

    fn ensure_unfrozen(who: &T::AccountId) -> DispatchResult {
        ensure!(!Frozen::<T>::get(who), Error::<T>::AccountFrozen);
        Ok(())
    }

    fn ensure_not_zero(who: &T::AccountId) -> DispatchResult {
        let zero = T::AccountId::decode(&mut TrailingZeroInput::zeroes()).ok();
        ensure!(zero.as_ref() != Some(who), Error::<T>::ZeroAddress);
        Ok(())
    }

    fn now() -> u64 {
        T::TimeProvider::now().as_secs()
    }

    /// Every stored lot is non-empty and in issuance order, and both supply counters
    /// match the lots actually held.
    #[cfg(any(feature = "try-runtime", test))]
    pub fn do_try_state() -> Result<(), sp_runtime::TryRuntimeError> {
        use sp_runtime::TryRuntimeError;
        use sp_std::collections::btree_map::BTreeMap;

        let mut total: u128 = 0;
        let mut by_regulation = BTreeMap::<RegulationType, u128>::new();
        for (_, lots) in Lots::<T>::iter() {
            ensure!(
                lots.iter().all(|lot| lot.amount > 0),
                TryRuntimeError::Other("Empty lot in storage")
            );
            ensure!(
                lots.windows(2).all(|pair| pair[0].issuance_date <= pair[1].issuance_date),
                TryRuntimeError::Other("Lots out of issuance order")
            );
            for lot in lots.iter() {
                total = total.saturating_add(lot.amount);
                let supply = by_regulation.entry(lot.regulation_type).or_default();
                *supply = supply.saturating_add(lot.amount);
            }
        }

        ensure!(
            TotalSupply::<T>::get() == total,
            TryRuntimeError::Other("TotalSupply differs from the sum of lots")
        );
        for (regulation_type, supply) in RegulationSupply::<T>::iter() {
            ensure!(
                by_regulation.get(&regulation_type).copied().unwrap_or(0) == supply,
                TryRuntimeError::Other("RegulationSupply differs from the lots of its type")
            );
        }
        for (regulation_type, held) in by_regulation {
            ensure!(
                RegulationSupply::<T>::get(regulation_type) == held,
                TryRuntimeError::Other("Lots of an untracked regulation type")
            );
        }
        Ok(())
    }
}

impl<T: Config> Call<T> {
    /// Destination and amount when this call is a `transfer_lot`. Used to decide
    /// whether a queued call is time-locked.
    ///
    /// Only `transfer_lot` is recognised. Batch transfers, forced transfers and
    /// request execution return `None` and are never delayed.
    pub fn regulated_movement(&self) -> Option<(T::AccountId, u128)> {
        match self {
            Call::transfer_lot { to, amount, .. } => Some((to.clone(), *amount)),
            _ => None,
        }
    }
}

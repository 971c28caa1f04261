#![cfg_attr(not(feature = "std"), no_std)]
#![allow(deprecated)]
#![allow(clippy::let_unit_value)]

//! # Guarded Queue Pallet
//!
//! Multi-party execution queue for privileged runtime calls.
//!
//! Registered signers submit arbitrary calls. A call executes from this pallet's own
//! account (derived from [`Config::PalletId`]) once [`RequiredSignatures`] distinct
//! signers have confirmed it. Calls that the [`TimeLockInspector`] recognises as a
//! large regulated movement to a destination outside the internal-wallet registry
//! may only execute [`Config::TimeLockDelay`] seconds after submission.
//!
//! Signer, threshold and internal-wallet management are calls of this pallet that
//! accept only the pallet's own origin, so they go through the same queue as every
//! other privileged action. Other pallets gate their privileged calls with
//! [`EnsureQueue`].

use codec::DecodeLimit;
use core::marker::PhantomData;
use frame_support::{
    dispatch::{
        extract_actual_weight, DispatchErrorWithPostInfo, DispatchResult,
        DispatchResultWithPostInfo, GetDispatchInfo, PostDispatchInfo,
    },
    ensure,
    pallet_prelude::*,
    traits::{EnsureOrigin, OriginTrait, UnixTime},
    PalletId,
};
use frame_system::{ensure_signed, pallet_prelude::*};
use sp_runtime::traits::{AccountIdConversion, Dispatchable, Hash, TrailingZeroInput};
use sp_std::prelude::*;

pub use pallet::*;
pub use weights::WeightInfo;

#[cfg(test)]
mod mock;

#[cfg(test)]
mod tests;

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub mod weights;

/// The current storage version.
const STORAGE_VERSION: StorageVersion = StorageVersion::new(1);

pub const LOG_TARGET: &str = "runtime::guarded-queue";

/// Nesting limit applied when decoding a stored call.
const CALL_DECODE_DEPTH_LIMIT: u32 = 256;

pub type OperationId = u64;

/// Recognises the call shapes subject to the time-lock.
///
/// Returns the destination and amount of a regulated movement, or `None` for any
/// other call. Returning `None` means "no delay": the time-lock fails open on shapes
/// it does not recognise and only ever delays the high-value external pattern.
pub trait TimeLockInspector<AccountId, Call> {
    fn regulated_movement(call: &Call) -> Option<(AccountId, u128)>;
}

impl<AccountId, Call> TimeLockInspector<AccountId, Call> for () {
    fn regulated_movement(_call: &Call) -> Option<(AccountId, u128)> {
        None
    }
}

/// A queued call and its confirmations.
#[derive(
    Encode,
    Decode,
    CloneNoBound,
    PartialEqNoBound,
    EqNoBound,
    RuntimeDebugNoBound,
    TypeInfo,
    MaxEncodedLen,
)]
#[scale_info(skip_type_params(T))]
#[codec(mel_bound())]
pub struct Operation<T: Config> {
    /// SCALE-encoded `RuntimeCall`: the target pallet and its arguments.
    pub call: BoundedVec<u8, T::MaxCallSize>,
    pub submitted_by: T::AccountId,
    /// Unix time in seconds.
    pub submitted_at: u64,
    pub confirmations: BoundedVec<T::AccountId, T::MaxSigners>,
    pub executed: bool,
}

#[frame_support::pallet]
pub mod pallet {
    use super::*;

    #[pallet::config]
    pub trait Config: frame_system::Config {
        type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

        /// The aggregated call type executed by the queue.
        type RuntimeCall: Parameter
            + Dispatchable<RuntimeOrigin = Self::RuntimeOrigin, PostInfo = PostDispatchInfo>
            + GetDispatchInfo
            + From<frame_system::Call<Self>>;

        type TimeProvider: UnixTime;

        type TimeLockInspector: TimeLockInspector<Self::AccountId, <Self as Config>::RuntimeCall>;

        /// Derives the account every executed call is dispatched from.
        #[pallet::constant]
        type PalletId: Get<PalletId>;

        #[pallet::constant]
        type MaxSigners: Get<u32>;

        /// Maximum encoded length of a queued call.
        #[pallet::constant]
        type MaxCallSize: Get<u32>;

        /// Upper bound on the declared weight of a queued call.
        #[pallet::constant]
        type MaxCallWeight: Get<Weight>;

        /// Smallest movement amount subject to the time-lock.
        #[pallet::constant]
        type HighValueThreshold: Get<u128>;

        /// Seconds between submission and earliest execution of a time-locked call.
        #[pallet::constant]
        type TimeLockDelay: Get<u64>;

        type WeightInfo: WeightInfo;
    }

    #[pallet::pallet]
    #[pallet::storage_version(STORAGE_VERSION)]
    pub struct Pallet<T>(_);

    /// Accounts allowed to submit, confirm, revoke and execute operations.
    #[pallet::storage]
    #[pallet::getter(fn signers)]
    pub type Signers<T: Config> =
        StorageValue<_, BoundedVec<T::AccountId, T::MaxSigners>, ValueQuery>;

    /// Confirmations needed before an operation may execute.
    #[pallet::storage]
    #[pallet::getter(fn required_signatures)]
    pub type RequiredSignatures<T> = StorageValue<_, u32, ValueQuery>;

    #[pallet::storage]
    #[pallet::getter(fn next_operation_id)]
    pub type NextOperationId<T> = StorageValue<_, OperationId, ValueQuery>;

    #[pallet::storage]
    #[pallet::getter(fn operation)]
    pub type Operations<T: Config> = StorageMap<_, Twox64Concat, OperationId, Operation<T>>;

    /// Destinations exempt from the time-lock.
    #[pallet::storage]
    #[pallet::getter(fn is_internal_wallet)]
    pub type InternalWallets<T: Config> =
        StorageMap<_, Blake2_128Concat, T::AccountId, bool, ValueQuery>;

    #[pallet::event]
    #[pallet::generate_deposit(pub(super) fn deposit_event)]
    pub enum Event<T: Config> {
        /// A signer queued a call (and confirmed it).
        OperationSubmitted { id: OperationId, submitter: T::AccountId, call_hash: T::Hash },
        OperationConfirmed { id: OperationId, signer: T::AccountId, confirmations: u32 },
        ConfirmationRevoked { id: OperationId, signer: T::AccountId, confirmations: u32 },
        /// Threshold reached but the time-lock holds execution until `unlock_at`.
        ExecutionDeferred { id: OperationId, unlock_at: u64 },
        OperationExecuted { id: OperationId },
        SignerAdded { signer: T::AccountId },
        SignerRemoved { signer: T::AccountId },
        RequirementChanged { required: u32 },
        InternalWalletAdded { wallet: T::AccountId },
        InternalWalletRemoved { wallet: T::AccountId },
        UpgradeAuthorized { code_hash: T::Hash },
    }

    #[pallet::error]
    pub enum Error<T> {
        /// Caller is not a registered signer.
        NotSigner,
        /// No operation with this id.
        UnknownOperation,
        AlreadyExecuted,
        /// Caller already confirmed this operation.
        AlreadyConfirmed,
        /// Caller has no confirmation on this operation to revoke.
        NotConfirmed,
        /// Fewer confirmations than `RequiredSignatures`.
        ThresholdNotMet,
        /// The operation is time-locked and its delay has not elapsed.
        TimeLockActive,
        ZeroIdentity,
        DuplicateSigner,
        SignerNotFound,
        /// Threshold would fall outside `1..=signer count`.
        InvalidThreshold,
        TooManySigners,
        CallTooLarge,
        CallTooHeavy,
        /// The stored call no longer decodes into a `RuntimeCall`.
        UndecodableCall,
        DuplicateInternalWallet,
        InternalWalletNotFound,
        Overflow,
    }

    #[pallet::hooks]
    impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
        fn integrity_test() {
            assert!(T::MaxSigners::get() > 0, "MaxSigners must allow at least one signer");
            assert!(T::MaxCallSize::get() > 0, "MaxCallSize must be non-zero");
        }

        #[cfg(feature = "try-runtime")]
        fn try_state(_n: BlockNumberFor<T>) -> Result<(), sp_runtime::TryRuntimeError> {
            Self::do_try_state()
        }
    }

    #[pallet::call]
    impl<T: Config> Pallet<T> {
        /// Queue `call` and confirm it on behalf of the submitter.
        ///
        /// Executes immediately when one confirmation already meets the threshold and
        /// no time-lock applies.
        #[pallet::call_index(0)]
        #[pallet::weight(T::WeightInfo::submit().saturating_add(T::MaxCallWeight::get()))]
        pub fn submit(
            origin: OriginFor<T>,
            call: Box<<T as Config>::RuntimeCall>,
        ) -> DispatchResultWithPostInfo {
            let who = ensure_signed(origin)?;
            ensure!(Self::is_signer(&who), Error::<T>::NotSigner);
            ensure!(
                call.get_dispatch_info().call_weight.all_lte(T::MaxCallWeight::get()),
                Error::<T>::CallTooHeavy
            );
            let payload: BoundedVec<u8, T::MaxCallSize> =
                call.encode().try_into().map_err(|_| Error::<T>::CallTooLarge)?;

            let id = NextOperationId::<T>::get();
            NextOperationId::<T>::put(id.checked_add(1).ok_or(Error::<T>::Overflow)?);

            let mut confirmations = BoundedVec::default();
            confirmations.try_push(who.clone()).map_err(|_| Error::<T>::TooManySigners)?;

            let call_hash = T::Hashing::hash(&payload);
            let operation = Operation {
                call: payload,
                submitted_by: who.clone(),
                submitted_at: Self::now(),
                confirmations,
                executed: false,
            };
            Self::deposit_event(Event::OperationSubmitted { id, submitter: who, call_hash });
            Self::settle(id, operation, T::WeightInfo::submit())
        }

        /// Add the caller's confirmation, executing the operation once it is eligible.
        ///
        /// A failing call fails this extrinsic, so the confirmation is not recorded.
        #[pallet::call_index(1)]
        #[pallet::weight(T::WeightInfo::confirm().saturating_add(T::MaxCallWeight::get()))]
        pub fn confirm(origin: OriginFor<T>, id: OperationId) -> DispatchResultWithPostInfo {
            let who = ensure_signed(origin)?;
            ensure!(Self::is_signer(&who), Error::<T>::NotSigner);
            let mut operation = Operations::<T>::get(id).ok_or(Error::<T>::UnknownOperation)?;
            ensure!(!operation.executed, Error::<T>::AlreadyExecuted);
            ensure!(!operation.confirmations.contains(&who), Error::<T>::AlreadyConfirmed);

            let signers = Signers::<T>::get();
            operation.confirmations.retain(|signer| signers.contains(signer));
            operation.confirmations.try_push(who.clone()).map_err(|_| Error::<T>::TooManySigners)?;
            Self::deposit_event(Event::OperationConfirmed {
                id,
                signer: who,
                confirmations: Self::valid_confirmations(&operation),
            });
            Self::settle(id, operation, T::WeightInfo::confirm())
        }

        /// Withdraw the caller's confirmation from a pending operation.
        #[pallet::call_index(2)]
        #[pallet::weight(T::WeightInfo::revoke())]
        pub fn revoke(origin: OriginFor<T>, id: OperationId) -> DispatchResult {
            let who = ensure_signed(origin)?;
            ensure!(Self::is_signer(&who), Error::<T>::NotSigner);
            Operations::<T>::try_mutate(id, |maybe_operation| -> DispatchResult {
                let operation = maybe_operation.as_mut().ok_or(Error::<T>::UnknownOperation)?;
                ensure!(!operation.executed, Error::<T>::AlreadyExecuted);
                let position = operation
                    .confirmations
                    .iter()
                    .position(|signer| *signer == who)
                    .ok_or(Error::<T>::NotConfirmed)?;
                operation.confirmations.remove(position);
                Self::deposit_event(Event::ConfirmationRevoked {
                    id,
                    signer: who.clone(),
                    confirmations: Self::valid_confirmations(operation),
                });
                Ok(())
            })
        }

        /// Re-attempt an operation that met its threshold but was held back, either by
        /// the time-lock or because the threshold was lowered after it was confirmed.
        #[pallet::call_index(3)]
        #[pallet::weight(T::WeightInfo::execute().saturating_add(T::MaxCallWeight::get()))]
        pub fn execute(origin: OriginFor<T>, id: OperationId) -> DispatchResultWithPostInfo {
            let who = ensure_signed(origin)?;
            ensure!(Self::is_signer(&who), Error::<T>::NotSigner);
            let operation = Operations::<T>::get(id).ok_or(Error::<T>::UnknownOperation)?;
            ensure!(!operation.executed, Error::<T>::AlreadyExecuted);
            ensure!(Self::threshold_met(&operation), Error::<T>::ThresholdNotMet);
            if let Some(unlock_at) = Self::pending_unlock(&operation) {
                log::debug!(
                    target: LOG_TARGET,
                    "operation {id} still time-locked until {unlock_at}",
                );
                return Err(Error::<T>::TimeLockActive.into());
            }
            Self::do_execute(id, operation, T::WeightInfo::execute())
        }

        #[pallet::call_index(4)]
        #[pallet::weight(T::WeightInfo::add_signer())]
        pub fn add_signer(origin: OriginFor<T>, signer: T::AccountId) -> DispatchResult {
            EnsureQueue::<T>::ensure_origin(origin)?;
            ensure!(!Self::is_zero(&signer), Error::<T>::ZeroIdentity);
            Signers::<T>::try_mutate(|signers| -> DispatchResult {
                ensure!(!signers.contains(&signer), Error::<T>::DuplicateSigner);
                signers.try_push(signer.clone()).map_err(|_| Error::<T>::TooManySigners)?;
                Ok(())
            })?;
            Self::deposit_event(Event::SignerAdded { signer });
            Ok(())
        }

        /// Remove a signer. The remaining set must still meet the threshold.
        #[pallet::call_index(5)]
        #[pallet::weight(T::WeightInfo::remove_signer())]
        pub fn remove_signer(origin: OriginFor<T>, signer: T::AccountId) -> DispatchResult {
            EnsureQueue::<T>::ensure_origin(origin)?;
            Signers::<T>::try_mutate(|signers| -> DispatchResult {
                let position = signers
                    .iter()
                    .position(|existing| *existing == signer)
                    .ok_or(Error::<T>::SignerNotFound)?;
                ensure!(
                    (signers.len() as u32).saturating_sub(1) >= RequiredSignatures::<T>::get(),
                    Error::<T>::InvalidThreshold
                );
                signers.remove(position);
                Ok(())
            })?;
            Self::deposit_event(Event::SignerRemoved { signer });
            Ok(())
        }

        #[pallet::call_index(6)]
        #[pallet::weight(T::WeightInfo::update_required_signatures())]
        pub fn update_required_signatures(origin: OriginFor<T>, required: u32) -> DispatchResult {
            EnsureQueue::<T>::ensure_origin(origin)?;
            ensure!(
                required >= 1 && required <= Signers::<T>::decode_len().unwrap_or(0) as u32,
                Error::<T>::InvalidThreshold
            );
            RequiredSignatures::<T>::put(required);
            Self::deposit_event(Event::RequirementChanged { required });
            Ok(())
        }

        #[pallet::call_index(7)]
        #[pallet::weight(T::WeightInfo::add_internal_wallet())]
        pub fn add_internal_wallet(origin: OriginFor<T>, wallet: T::AccountId) -> DispatchResult {
            EnsureQueue::<T>::ensure_origin(origin)?;
            ensure!(!Self::is_zero(&wallet), Error::<T>::ZeroIdentity);
            ensure!(!InternalWallets::<T>::get(&wallet), Error::<T>::DuplicateInternalWallet);
            InternalWallets::<T>::insert(&wallet, true);
            Self::deposit_event(Event::InternalWalletAdded { wallet });
            Ok(())
        }

        #[pallet::call_index(8)]
        #[pallet::weight(T::WeightInfo::remove_internal_wallet())]
        pub fn remove_internal_wallet(
            origin: OriginFor<T>,
            wallet: T::AccountId,
        ) -> DispatchResult {
            EnsureQueue::<T>::ensure_origin(origin)?;
            ensure!(!Self::is_zero(&wallet), Error::<T>::ZeroIdentity);
            ensure!(InternalWallets::<T>::get(&wallet), Error::<T>::InternalWalletNotFound);
            InternalWallets::<T>::remove(&wallet);
            Self::deposit_event(Event::InternalWalletRemoved { wallet });
            Ok(())
        }

        /// Authorize a runtime upgrade to the code with `code_hash`.
        ///
        /// Delivery of the code itself goes through `frame_system::apply_authorized_upgrade`.
        #[pallet::call_index(9)]
        #[pallet::weight(T::WeightInfo::authorize_upgrade())]
        pub fn authorize_upgrade(origin: OriginFor<T>, code_hash: T::Hash) -> DispatchResult {
            EnsureQueue::<T>::ensure_origin(origin)?;
            frame_system::Pallet::<T>::do_authorize_upgrade(code_hash, true);
            log::info!(target: LOG_TARGET, "runtime upgrade {code_hash:?} authorized");
            Self::deposit_event(Event::UpgradeAuthorized { code_hash });
            Ok(())
        }
    }

    #[pallet::genesis_config]
    #[derive(frame_support::DefaultNoBound)]
    pub struct GenesisConfig<T: Config> {
        /// Initial signer set
        pub signers: Vec<T::AccountId>,
        /// Confirmations required per operation
        pub required_signatures: u32,
        /// Destinations exempt from the time-lock
        pub internal_wallets: Vec<T::AccountId>,
    }

    #[pallet::genesis_build]
    impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
        fn build(&self) {
            let mut signers = BoundedVec::<T::AccountId, T::MaxSigners>::default();
            for signer in &self.signers {
                assert!(!Pallet::<T>::is_zero(signer), "Zero identity in genesis signers");
                assert!(!signers.contains(signer), "Duplicate signer in genesis");
                signers.try_push(signer.clone()).expect("Too many genesis signers");
            }
            if !signers.is_empty() {
                assert!(
                    self.required_signatures >= 1
                        && self.required_signatures <= signers.len() as u32,
                    "Genesis threshold must be within 1..=signer count"
                );
            }
            Signers::<T>::put(signers);
            RequiredSignatures::<T>::put(self.required_signatures);

            for wallet in &self.internal_wallets {
                assert!(!Pallet::<T>::is_zero(wallet), "Zero identity in genesis internal wallets");
                InternalWallets::<T>::insert(wallet, true);
            }
        }
    }
}

impl<T: Config> Pallet<T> {
    /// The account queued calls are dispatched from.
    pub fn account_id() -> T::AccountId {
        T::PalletId::get().into_account_truncating()
    }

    pub fn is_signer(who: &T::AccountId) -> bool {
        Signers::<T>::get().contains(who)
    }

    /// Confirmations on `id` from accounts that are still signers.
    pub fn confirmation_count(id: OperationId) -> u32 {
        Operations::<T>::get(id).map_or(0, |operation| Self::valid_confirmations(&operation))
    }

    /// Earliest execution time if `operation` is a high-value movement to a
    /// destination outside the internal-wallet registry.
    ///
    /// Payloads that do not decode, or decode to any other call, are never delayed.
    pub fn time_lock_release(operation: &Operation<T>) -> Option<u64> {
        let call = match Self::decode_call(operation) {
            Ok(call) => call,
            Err(_) => {
                log::debug!(target: LOG_TARGET, "undecodable payload, time-lock not applied");
                return None;
            },
        };
        let (destination, amount) = T::TimeLockInspector::regulated_movement(&call)?;
        if amount < T::HighValueThreshold::get() || InternalWallets::<T>::get(&destination) {
            return None;
        }
        Some(operation.submitted_at.saturating_add(T::TimeLockDelay::get()))
    }

    fn pending_unlock(operation: &Operation<T>) -> Option<u64> {
        Self::time_lock_release(operation).filter(|unlock_at| Self::now() < *unlock_at)
    }

    fn threshold_met(operation: &Operation<T>) -> bool {
        Self::valid_confirmations(operation) >= RequiredSignatures::<T>::get()
    }

    /// Confirmations of a removed signer stay recorded but no longer count.
    fn valid_confirmations(operation: &Operation<T>) -> u32 {
        let signers = Signers::<T>::get();
        operation.confirmations.iter().filter(|who| signers.contains(who)).count() as u32
    }

    /// Execute `operation` if it is eligible, otherwise store it as pending.
    ///
    /// `base` is the weight of the calling extrinsic without the queued call.
    fn settle(
        id: OperationId,
        operation: Operation<T>,
        base: Weight,
    ) -> DispatchResultWithPostInfo {
        if Self::threshold_met(&operation) {
            match Self::pending_unlock(&operation) {
                Some(unlock_at) => {
                    log::info!(
                        target: LOG_TARGET,
                        "operation {id} reached threshold, deferred until {unlock_at}",
                    );
                    Self::deposit_event(Event::ExecutionDeferred { id, unlock_at });
                },
                None => return Self::do_execute(id, operation, base),
            }
        }
        Operations::<T>::insert(id, operation);
        Ok(Some(base).into())
    }

    /// Dispatch the stored call from the queue account.
    ///
    /// The operation is marked executed before dispatch so a nested call cannot run it
    /// again. Any dispatch error is returned and unwinds every write of the extrinsic;
    /// a failed dispatch is charged the full declared weight. On success the actual
    /// weight is `base` plus what the queued call reports.
    fn do_execute(
        id: OperationId,
        mut operation: Operation<T>,
        base: Weight,
    ) -> DispatchResultWithPostInfo {
        let call = Self::decode_call(&operation)?;
        let info = call.get_dispatch_info();
        operation.executed = true;
        Operations::<T>::insert(id, operation);

        let origin: OriginFor<T> = frame_system::RawOrigin::Signed(Self::account_id()).into();
        let result = call.dispatch(origin);
        let call_weight = extract_actual_weight(&result, &info);
        result.map_err(|DispatchErrorWithPostInfo { error, .. }| error)?;

        log::info!(target: LOG_TARGET, "operation {id} executed");
        Self::deposit_event(Event::OperationExecuted { id });
        Ok(Some(base.saturating_add(call_weight)).into())
    }

    fn decode_call(operation: &Operation<T>) -> Result<<T as Config>::RuntimeCall, Error<T>> {
        <T as Config>::RuntimeCall::decode_all_with_depth_limit(
            CALL_DECODE_DEPTH_LIMIT,
            &mut &operation.call[..],
        )
        .map_err(|_| Error::<T>::UndecodableCall)
    }

    fn now() -> u64 {
        T::TimeProvider::now().as_secs()
    }

    /// Signers are unique and the threshold stays reachable.
    #[cfg(any(feature = "try-runtime", test))]
    pub fn do_try_state() -> Result<(), sp_runtime::TryRuntimeError> {
        use sp_runtime::TryRuntimeError;

        let signers = Signers::<T>::get();
        for (index, signer) in signers.iter().enumerate() {
            ensure!(
                !signers[index + 1..].contains(signer),
                TryRuntimeError::Other("Duplicate signer")
            );
        }
        if !signers.is_empty() {
            let required = RequiredSignatures::<T>::get();
            ensure!(
                required >= 1 && required <= signers.len() as u32,
                TryRuntimeError::Other("Threshold outside 1..=signer count")
            );
        }
        Ok(())
    }

    fn is_zero(who: &T::AccountId) -> bool {
        T::AccountId::decode(&mut TrailingZeroInput::zeroes()).ok().as_ref() == Some(who)
    }
}

/// Accepts only the queue account's signed origin.
///
/// Plug into another pallet's privileged origin so its calls are reachable only
/// through a confirmed operation.
pub struct EnsureQueue<T>(PhantomData<T>);

impl<T: Config> EnsureOrigin<OriginFor<T>> for EnsureQueue<T> {
    type Success = T::AccountId;

    fn try_origin(o: OriginFor<T>) -> Result<Self::Success, OriginFor<T>> {
        match o.as_system_ref() {
            Some(frame_system::RawOrigin::Signed(who)) if *who == Pallet::<T>::account_id() => {
                Ok(who.clone())
            },
            _ => Err(o),
        }
    }

    #[cfg(feature = "runtime-benchmarks")]
    fn try_successful_origin() -> Result<OriginFor<T>, ()> {
        Ok(frame_system::RawOrigin::Signed(Pallet::<T>::account_id()).into())
    }
}

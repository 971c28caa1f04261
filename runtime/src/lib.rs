#![cfg_attr(not(feature = "std"), no_std)]

//! Runtime composing the guarded queue and the regulated ledger.
//!
//! The ledger's agent origin is the queue account, so every ledger mutation except
//! holder requests passes through the queue's signer threshold. `transfer_lot` calls
//! are the movements the queue's time-lock inspects.

use frame_support::{
    construct_runtime, derive_impl, parameter_types,
    traits::{AsEnsureOriginWithArg, ConstU128, ConstU32, ConstU64},
    weights::{constants::WEIGHT_REF_TIME_PER_SECOND, Weight},
    PalletId,
};
use frame_system::{EnsureRoot, EnsureSigned};
use sp_runtime::{
    generic,
    traits::{AccountIdLookup, BlakeTwo256, IdentifyAccount, Verify},
    MultiAddress, MultiSignature,
};

pub use pallet_guarded_queue;
pub use pallet_regulated_ledger;


pub type Signature = MultiSignature;
pub type AccountId = <<Signature as Verify>::Signer as IdentifyAccount>::AccountId;
pub type Balance = u128;
pub type BlockNumber = u32;
pub type Nonce = u32;
pub type Hash = sp_core::H256;
pub type AssetId = u32;

pub type Address = MultiAddress<AccountId, ()>;
pub type Header = generic::Header<BlockNumber, BlakeTwo256>;
pub type TxExtension = (
    frame_system::CheckNonZeroSender<Runtime>,
    frame_system::CheckSpecVersion<Runtime>,
    frame_system::CheckTxVersion<Runtime>,
    frame_system::CheckGenesis<Runtime>,
    frame_system::CheckEra<Runtime>,
    frame_system::CheckNonce<Runtime>,
    frame_system::CheckWeight<Runtime>,
);
pub type UncheckedExtrinsic =
    generic::UncheckedExtrinsic<Address, RuntimeCall, Signature, TxExtension>;
pub type Block = generic::Block<Header, UncheckedExtrinsic>;

/// Ledger and native token precision.
pub const UNIT: Balance = 1_000_000_000_000_000_000;
pub const EXISTENTIAL_DEPOSIT: Balance = UNIT / 1_000;

/// Transfers of at least one million whole tokens are time-locked.
pub const HIGH_VALUE_THRESHOLD: u128 = 1_000_000 * UNIT;
pub const TIME_LOCK_DELAY: u64 = 24 * 60 * 60;
pub const REQUEST_TTL: u64 = 30 * 24 * 60 * 60;

construct_runtime!(
    pub enum Runtime {
        System: frame_system,
        Timestamp: pallet_timestamp,
        Balances: pallet_balances,
        Assets: pallet_assets,
        GuardedQueue: pallet_guarded_queue,
        RegulatedLedger: pallet_regulated_ledger,
    }
);

parameter_types! {
    pub const BlockHashCount: BlockNumber = 2400;
    pub const QueuePalletId: PalletId = PalletId(*b"rta/gdqu");
    pub const LedgerPalletId: PalletId = PalletId(*b"rta/ldgr");
    pub MaxQueuedCallWeight: Weight =
        Weight::from_parts(WEIGHT_REF_TIME_PER_SECOND, 5 * 1024 * 1024);
}

#[derive_impl(frame_system::config_preludes::SolochainDefaultConfig)]
impl frame_system::Config for Runtime {
    type Block = Block;
    type AccountId = AccountId;
    type Lookup = AccountIdLookup<AccountId, ()>;
    type Nonce = Nonce;
    type Hash = Hash;
    type BlockHashCount = BlockHashCount;
    type AccountData = pallet_balances::AccountData<Balance>;
    type MaxConsumers = ConstU32<16>;
}

impl pallet_timestamp::Config for Runtime {
    type Moment = u64;
    type OnTimestampSet = ();
    type MinimumPeriod = ConstU64<3_000>;
    type WeightInfo = ();
}

#[derive_impl(pallet_balances::config_preludes::TestDefaultConfig)]
impl pallet_balances::Config for Runtime {
    type Balance = Balance;
    type ExistentialDeposit = ConstU128<EXISTENTIAL_DEPOSIT>;
    type AccountStore = System;
    type MaxLocks = ConstU32<50>;
    type MaxReserves = ConstU32<50>;
    type WeightInfo = pallet_balances::weights::SubstrateWeight<Runtime>;
}

#[derive_impl(pallet_assets::config_preludes::TestDefaultConfig)]
impl pallet_assets::Config for Runtime {
    type Balance = Balance;
    type AssetId = AssetId;
    type AssetIdParameter = AssetId;
    type Currency = Balances;
    type CreateOrigin = AsEnsureOriginWithArg<EnsureSigned<AccountId>>;
    type ForceOrigin = EnsureRoot<AccountId>;
    type AssetDeposit = ConstU128<{ 100 * UNIT }>;
    type AssetAccountDeposit = ConstU128<{ UNIT }>;
    type MetadataDepositBase = ConstU128<{ 10 * UNIT }>;
    type MetadataDepositPerByte = ConstU128<{ UNIT / 100 }>;
    type ApprovalDeposit = ConstU128<{ UNIT / 10 }>;
    type StringLimit = ConstU32<50>;
    type WeightInfo = pallet_assets::weights::SubstrateWeight<Runtime>;
}

/// Exposes ledger lot transfers to the queue's time-lock.
pub struct RegulatedMovements;
impl pallet_guarded_queue::TimeLockInspector<AccountId, RuntimeCall> for RegulatedMovements {
    fn regulated_movement(call: &RuntimeCall) -> Option<(AccountId, u128)> {
        match call {
            RuntimeCall::RegulatedLedger(call) => call.regulated_movement(),
            _ => None,
        }
    }
}

impl pallet_guarded_queue::Config for Runtime {
    type RuntimeEvent = RuntimeEvent;
    type RuntimeCall = RuntimeCall;
    type TimeProvider = Timestamp;
    type TimeLockInspector = RegulatedMovements;
    type PalletId = QueuePalletId;
    type MaxSigners = ConstU32<16>;
    type MaxCallSize = ConstU32<{ 16 * 1024 }>;
    type MaxCallWeight = MaxQueuedCallWeight;
    type HighValueThreshold = ConstU128<HIGH_VALUE_THRESHOLD>;
    type TimeLockDelay = ConstU64<TIME_LOCK_DELAY>;
    type WeightInfo = pallet_guarded_queue::weights::SubstrateWeight<Runtime>;
}

/// Fee asset used by ledger benchmarks, created on first use.
#[cfg(feature = "runtime-benchmarks")]
pub struct BenchmarkFeeAsset;
#[cfg(feature = "runtime-benchmarks")]
impl pallet_regulated_ledger::BenchmarkHelper<AssetId> for BenchmarkFeeAsset {
    fn fee_asset() -> AssetId {
        use frame_support::traits::fungibles::{Create, Inspect};
        const BENCHMARK_ASSET: AssetId = 1;
        if !<Assets as Inspect<AccountId>>::asset_exists(BENCHMARK_ASSET) {
            let owner = RegulatedLedger::account_id();
            let _ = <Assets as Create<AccountId>>::create(BENCHMARK_ASSET, owner, true, 1);
        }
        BENCHMARK_ASSET
    }
}

impl pallet_regulated_ledger::Config for Runtime {
    type RuntimeEvent = RuntimeEvent;
    type AgentOrigin = pallet_guarded_queue::EnsureQueue<Runtime>;
    type TimeProvider = Timestamp;
    type Assets = Assets;
    type PalletId = LedgerPalletId;
    type MaxLotsPerHolder = ConstU32<64>;
    type MaxBatchSize = ConstU32<100>;
    type RequestTtl = ConstU64<REQUEST_TTL>;
    type WeightInfo = pallet_regulated_ledger::weights::SubstrateWeight<Runtime>;
    #[cfg(feature = "runtime-benchmarks")]
    type BenchmarkHelper = BenchmarkFeeAsset;
}

#[cfg(feature = "runtime-benchmarks")]
mod benches {
    frame_benchmarking::define_benchmarks!(
        [pallet_guarded_queue, GuardedQueue]
        [pallet_regulated_ledger, RegulatedLedger]
    );
}

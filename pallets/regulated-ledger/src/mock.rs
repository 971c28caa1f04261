use crate as pallet_regulated_ledger;
use frame_support::{
    derive_impl, parameter_types,
    traits::{AsEnsureOriginWithArg, ConstU32, ConstU64},
    PalletId,
};
use frame_system::{EnsureRoot, EnsureSigned};
use sp_core::H256;
use sp_runtime::{
    traits::{BlakeTwo256, IdentityLookup},
    BuildStorage,
};

type Block = frame_system::mocking::MockBlock<Test>;

// Configure a mock runtime to test the pallet.
frame_support::construct_runtime!(
    pub enum Test {
        System: frame_system,
        Timestamp: pallet_timestamp,
        Balances: pallet_balances,
        Assets: pallet_assets,
        RegulatedLedger: pallet_regulated_ledger,
    }
);

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Test {
    type BaseCallFilter = frame_support::traits::Everything;
    type RuntimeOrigin = RuntimeOrigin;
    type RuntimeCall = RuntimeCall;
    type Nonce = u64;
    type Hash = H256;
    type Hashing = BlakeTwo256;
    type AccountId = u64;
    type Lookup = IdentityLookup<Self::AccountId>;
    type Block = Block;
    type RuntimeEvent = RuntimeEvent;
    type BlockHashCount = ConstU64<250>;
    type PalletInfo = PalletInfo;
    type AccountData = pallet_balances::AccountData<u64>;
    type MaxConsumers = ConstU32<16>;
}

impl pallet_timestamp::Config for Test {
    type Moment = u64;
    type OnTimestampSet = ();
    type MinimumPeriod = ConstU64<1>;
    type WeightInfo = ();
}

#[derive_impl(pallet_balances::config_preludes::TestDefaultConfig)]
impl pallet_balances::Config for Test {
    type AccountStore = System;
}

#[derive_impl(pallet_assets::config_preludes::TestDefaultConfig)]
impl pallet_assets::Config for Test {
    type Balance = u128;
    type Currency = Balances;
    type CreateOrigin = AsEnsureOriginWithArg<EnsureSigned<u64>>;
    type ForceOrigin = EnsureRoot<u64>;
}

/// The injected agent; stands in for the guarded queue's account.
pub const AGENT: u64 = 1;
pub const HOLDER: u64 = 2;
pub const RECEIVER: u64 = 3;
/// Approved broker.
pub const BROKER: u64 = 4;
pub const OUTSIDER: u64 = 5;
pub const FEE_COLLECTOR: u64 = 6;

/// Settlement asset created at genesis.
pub const FEE_ASSET: u32 = 7;
pub const OTHER_ASSET: u32 = 8;
pub const FEE_FUNDING: u128 = 1_000;

pub const R1: u16 = 1;
pub const R2: u16 = 2;
pub const R3: u16 = 3;

pub const DAY: u64 = 24 * 60 * 60;
/// Unix seconds at the start of every test.
pub const GENESIS_TIME: u64 = 1_700_000_000;
pub const D1: u64 = GENESIS_TIME - 2 * DAY;
pub const D2: u64 = GENESIS_TIME - DAY;
pub const REQUEST_TTL: u64 = 7 * DAY;
pub const MAX_LOTS: u32 = 4;
pub const MAX_BATCH: u32 = 100;

parameter_types! {
    pub const AgentAccount: u64 = AGENT;
    pub const LedgerPalletId: PalletId = PalletId(*b"rta/ldgr");
}

pub struct EnsureAgent;
impl frame_support::traits::EnsureOrigin<RuntimeOrigin> for EnsureAgent {
    type Success = u64;

    fn try_origin(o: RuntimeOrigin) -> Result<Self::Success, RuntimeOrigin> {
        match o.clone().into() {
            Ok(frame_system::RawOrigin::Signed(account)) if account == AgentAccount::get() => {
                Ok(account)
            },
            _ => Err(o),
        }
    }

    #[cfg(feature = "runtime-benchmarks")]
    fn try_successful_origin() -> Result<RuntimeOrigin, ()> {
        Ok(RuntimeOrigin::signed(AgentAccount::get()))
    }
}

#[cfg(feature = "runtime-benchmarks")]
pub struct GenesisFeeAsset;
#[cfg(feature = "runtime-benchmarks")]
impl pallet_regulated_ledger::BenchmarkHelper<u32> for GenesisFeeAsset {
    fn fee_asset() -> u32 {
        FEE_ASSET
    }
}

impl pallet_regulated_ledger::Config for Test {
    type RuntimeEvent = RuntimeEvent;
    type AgentOrigin = EnsureAgent;
    type TimeProvider = Timestamp;
    type Assets = Assets;
    type PalletId = LedgerPalletId;
    type MaxLotsPerHolder = ConstU32<MAX_LOTS>;
    type MaxBatchSize = ConstU32<MAX_BATCH>;
    type RequestTtl = ConstU64<REQUEST_TTL>;
    type WeightInfo = ();
    #[cfg(feature = "runtime-benchmarks")]
    type BenchmarkHelper = GenesisFeeAsset;
}

pub fn agent() -> RuntimeOrigin {
    RuntimeOrigin::signed(AGENT)
}

pub fn escrow_account() -> u64 {
    RegulatedLedger::account_id()
}

pub fn fee_balance(who: u64) -> u128 {
    pallet_assets::Pallet::<Test>::balance(FEE_ASSET, who)
}

/// Move the clock forward by `secs` seconds.
pub fn advance_time(secs: u64) {
    let now = pallet_timestamp::Now::<Test>::get();
    Timestamp::set_timestamp(now + secs * 1_000);
}

// Build genesis storage according to the mock runtime.
//
// HOLDER starts with lots [30@R1/D1, 40@R2/D2]; BROKER is approved; HOLDER, BROKER and
// OUTSIDER hold FEE_FUNDING of the settlement asset. No fee asset is configured yet.
pub fn new_test_ext() -> sp_io::TestExternalities {
    let mut t = frame_system::GenesisConfig::<Test>::default().build_storage().unwrap();

    pallet_balances::GenesisConfig::<Test> {
        balances: vec![(AGENT, 1_000)],
        dev_accounts: None,
    }
    .assimilate_storage(&mut t)
    .unwrap();

    pallet_assets::GenesisConfig::<Test> {
        assets: vec![(FEE_ASSET, AGENT, true, 1), (OTHER_ASSET, AGENT, true, 1)],
        accounts: vec![
            (FEE_ASSET, HOLDER, FEE_FUNDING),
            (FEE_ASSET, BROKER, FEE_FUNDING),
            (FEE_ASSET, OUTSIDER, FEE_FUNDING),
        ],
        ..Default::default()
    }
    .assimilate_storage(&mut t)
    .unwrap();

    pallet_regulated_ledger::GenesisConfig::<Test> {
        brokers: vec![BROKER],
        frozen_accounts: vec![],
        initial_lots: vec![(HOLDER, 30, R1, D1), (HOLDER, 40, R2, D2)],
    }
    .assimilate_storage(&mut t)
    .unwrap();

    let mut ext = sp_io::TestExternalities::new(t);
    ext.execute_with(|| {
        System::set_block_number(1);
        Timestamp::set_timestamp(GENESIS_TIME * 1_000);
    });
    ext
}

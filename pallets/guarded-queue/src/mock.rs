use crate as pallet_guarded_queue;
use frame_support::{
    derive_impl, parameter_types,
    traits::{ConstU128, ConstU32, ConstU64},
    weights::Weight,
    PalletId,
};
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
        GuardedQueue: pallet_guarded_queue,
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

pub const ALICE: u64 = 1;
pub const BOB: u64 = 2;
pub const CHARLIE: u64 = 3;
/// Not a signer.
pub const DAVE: u64 = 4;
/// Registered internal wallet.
pub const TREASURY: u64 = 50;
pub const EXTERNAL: u64 = 60;

pub const HIGH_VALUE_THRESHOLD: u128 = 1_000_000;
pub const TIME_LOCK_DELAY: u64 = 24 * 60 * 60;
/// Unix seconds at the start of every test.
pub const GENESIS_TIME: u64 = 1_700_000_000;

parameter_types! {
    pub const QueuePalletId: PalletId = PalletId(*b"rta/gdqu");
    pub MaxCallWeight: Weight = Weight::from_parts(1_000_000_000_000, 1_000_000);
}

/// Treats balance transfers out of the queue account as regulated movements.
pub struct BalanceTransfers;
impl pallet_guarded_queue::TimeLockInspector<u64, RuntimeCall> for BalanceTransfers {
    fn regulated_movement(call: &RuntimeCall) -> Option<(u64, u128)> {
        match call {
            RuntimeCall::Balances(pallet_balances::Call::transfer_keep_alive { dest, value }) => {
                Some((*dest, u128::from(*value)))
            },
            _ => None,
        }
    }
}

impl pallet_guarded_queue::Config for Test {
    type RuntimeEvent = RuntimeEvent;
    type RuntimeCall = RuntimeCall;
    type TimeProvider = Timestamp;
    type TimeLockInspector = BalanceTransfers;
    type PalletId = QueuePalletId;
    type MaxSigners = ConstU32<8>;
    type MaxCallSize = ConstU32<1024>;
    type MaxCallWeight = MaxCallWeight;
    type HighValueThreshold = ConstU128<HIGH_VALUE_THRESHOLD>;
    type TimeLockDelay = ConstU64<TIME_LOCK_DELAY>;
    type WeightInfo = ();
}

pub fn queue_account() -> u64 {
    GuardedQueue::account_id()
}

/// Move the clock forward by `secs` seconds.
pub fn advance_time(secs: u64) {
    let now = pallet_timestamp::Now::<Test>::get();
    Timestamp::set_timestamp(now + secs * 1_000);
}

// Build genesis storage according to the mock runtime.
//
// 2-of-3 signers (Alice, Bob, Charlie), Treasury registered as an internal wallet,
// and a funded queue account for transfer operations.
pub fn new_test_ext() -> sp_io::TestExternalities {
    let mut t = frame_system::GenesisConfig::<Test>::default().build_storage().unwrap();

    pallet_balances::GenesisConfig::<Test> {
        balances: vec![(queue_account(), 10_000_000), (ALICE, 1_000), (TREASURY, 1_000)],
        dev_accounts: None,
    }
    .assimilate_storage(&mut t)
    .unwrap();

    pallet_guarded_queue::GenesisConfig::<Test> {
        signers: vec![ALICE, BOB, CHARLIE],
        required_signatures: 2,
        internal_wallets: vec![TREASURY],
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

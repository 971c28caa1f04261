//! Weights for pallet-regulated-ledger.
//!
//! Hand-tuned placeholders until the benchmarks in `benchmarking.rs` are run
//! against reference hardware. Batch weights scale linearly with `n`.

#![allow(unused_parens)]
#![allow(unused_imports)]

use core::marker::PhantomData;
use frame_support::{
    traits::Get,
    weights::{constants::RocksDbWeight, Weight},
};

pub trait WeightInfo {
    fn mint() -> Weight;
    fn burn_fifo() -> Weight;
    fn burn_by_regulation() -> Weight;
    fn transfer_lot() -> Weight;
    fn batch_mint(n: u32) -> Weight;
    fn batch_burn_by_regulation(n: u32) -> Weight;
    fn batch_transfer_from(n: u32) -> Weight;
    fn set_frozen() -> Weight;
    fn forced_transfer() -> Weight;
    fn set_broker_status() -> Weight;
    fn set_fee_parameters() -> Weight;
    fn set_fee_token() -> Weight;
    fn request_transfer() -> Weight;
    fn update_status() -> Weight;
    fn process() -> Weight;
    fn reject() -> Weight;
    fn withdraw_fees() -> Weight;
    fn expire_request() -> Weight;
}

/// Weights scaled by the runtime's database weight.
pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: frame_system::Config> WeightInfo for SubstrateWeight<T> {
    fn mint() -> Weight {
        Weight::from_parts(18_000_000, 3_500)
            .saturating_add(T::DbWeight::get().reads_writes(3, 3))
    }
    fn burn_fifo() -> Weight {
        Weight::from_parts(22_000_000, 3_500)
            .saturating_add(T::DbWeight::get().reads_writes(3, 3))
    }
    fn burn_by_regulation() -> Weight {
        Weight::from_parts(21_000_000, 3_500)
            .saturating_add(T::DbWeight::get().reads_writes(3, 3))
    }
    fn transfer_lot() -> Weight {
        Weight::from_parts(24_000_000, 7_000)
            .saturating_add(T::DbWeight::get().reads_writes(4, 2))
    }
    fn batch_mint(n: u32) -> Weight {
        Weight::from_parts(5_000_000, 0)
            .saturating_add(Weight::from_parts(18_000_000, 3_500).saturating_mul(n.into()))
            .saturating_add(T::DbWeight::get().reads((3_u64).saturating_mul(n.into())))
            .saturating_add(T::DbWeight::get().writes((3_u64).saturating_mul(n.into())))
    }
    fn batch_burn_by_regulation(n: u32) -> Weight {
        Weight::from_parts(5_000_000, 0)
            .saturating_add(Weight::from_parts(21_000_000, 3_500).saturating_mul(n.into()))
            .saturating_add(T::DbWeight::get().reads((3_u64).saturating_mul(n.into())))
            .saturating_add(T::DbWeight::get().writes((3_u64).saturating_mul(n.into())))
    }
    fn batch_transfer_from(n: u32) -> Weight {
        Weight::from_parts(5_000_000, 0)
            .saturating_add(Weight::from_parts(24_000_000, 7_000).saturating_mul(n.into()))
            .saturating_add(T::DbWeight::get().reads((4_u64).saturating_mul(n.into())))
            .saturating_add(T::DbWeight::get().writes((2_u64).saturating_mul(n.into())))
    }
    fn set_frozen() -> Weight {
        Weight::from_parts(11_000_000, 0)
            .saturating_add(T::DbWeight::get().reads_writes(0, 1))
    }
    fn forced_transfer() -> Weight {
        Weight::from_parts(26_000_000, 7_000)
            .saturating_add(T::DbWeight::get().reads_writes(2, 2))
    }
    fn set_broker_status() -> Weight {
        Weight::from_parts(11_000_000, 0)
            .saturating_add(T::DbWeight::get().reads_writes(0, 1))
    }
    fn set_fee_parameters() -> Weight {
        Weight::from_parts(10_000_000, 1_600)
            .saturating_add(T::DbWeight::get().reads_writes(1, 1))
    }
    fn set_fee_token() -> Weight {
        Weight::from_parts(11_000_000, 1_600)
            .saturating_add(T::DbWeight::get().reads_writes(2, 1))
    }
    fn request_transfer() -> Weight {
        Weight::from_parts(48_000_000, 6_200)
            .saturating_add(T::DbWeight::get().reads_writes(9, 6))
    }
    fn update_status() -> Weight {
        Weight::from_parts(13_000_000, 3_600)
            .saturating_add(T::DbWeight::get().reads_writes(1, 1))
    }
    fn process() -> Weight {
        Weight::from_parts(30_000_000, 7_000)
            .saturating_add(T::DbWeight::get().reads_writes(5, 3))
    }
    fn reject() -> Weight {
        Weight::from_parts(40_000_000, 6_200)
            .saturating_add(T::DbWeight::get().reads_writes(6, 4))
    }
    fn withdraw_fees() -> Weight {
        Weight::from_parts(38_000_000, 6_200)
            .saturating_add(T::DbWeight::get().reads_writes(5, 3))
    }
    fn expire_request() -> Weight {
        Weight::from_parts(40_000_000, 6_200)
            .saturating_add(T::DbWeight::get().reads_writes(6, 4))
    }
}

// For backwards compatibility and tests.
impl WeightInfo for () {
    fn mint() -> Weight {
        Weight::from_parts(18_000_000, 3_500)
            .saturating_add(RocksDbWeight::get().reads_writes(3, 3))
    }
    fn burn_fifo() -> Weight {
        Weight::from_parts(22_000_000, 3_500)
            .saturating_add(RocksDbWeight::get().reads_writes(3, 3))
    }
    fn burn_by_regulation() -> Weight {
        Weight::from_parts(21_000_000, 3_500)
            .saturating_add(RocksDbWeight::get().reads_writes(3, 3))
    }
    fn transfer_lot() -> Weight {
        Weight::from_parts(24_000_000, 7_000)
            .saturating_add(RocksDbWeight::get().reads_writes(4, 2))
    }
    fn batch_mint(n: u32) -> Weight {
        Weight::from_parts(5_000_000, 0)
            .saturating_add(Weight::from_parts(18_000_000, 3_500).saturating_mul(n.into()))
            .saturating_add(RocksDbWeight::get().reads((3_u64).saturating_mul(n.into())))
            .saturating_add(RocksDbWeight::get().writes((3_u64).saturating_mul(n.into())))
    }
    fn batch_burn_by_regulation(n: u32) -> Weight {
        Weight::from_parts(5_000_000, 0)
            .saturating_add(Weight::from_parts(21_000_000, 3_500).saturating_mul(n.into()))
            .saturating_add(RocksDbWeight::get().reads((3_u64).saturating_mul(n.into())))
            .saturating_add(RocksDbWeight::get().writes((3_u64).saturating_mul(n.into())))
    }
    fn batch_transfer_from(n: u32) -> Weight {
        Weight::from_parts(5_000_000, 0)
            .saturating_add(Weight::from_parts(24_000_000, 7_000).saturating_mul(n.into()))
            .saturating_add(RocksDbWeight::get().reads((4_u64).saturating_mul(n.into())))
            .saturating_add(RocksDbWeight::get().writes((2_u64).saturating_mul(n.into())))
    }
    fn set_frozen() -> Weight {
        Weight::from_parts(11_000_000, 0)
            .saturating_add(RocksDbWeight::get().reads_writes(0, 1))
    }
    fn forced_transfer() -> Weight {
        Weight::from_parts(26_000_000, 7_000)
            .saturating_add(RocksDbWeight::get().reads_writes(2, 2))
    }
    fn set_broker_status() -> Weight {
        Weight::from_parts(11_000_000, 0)
            .saturating_add(RocksDbWeight::get().reads_writes(0, 1))
    }
    fn set_fee_parameters() -> Weight {
        Weight::from_parts(10_000_000, 1_600)
            .saturating_add(RocksDbWeight::get().reads_writes(1, 1))
    }
    fn set_fee_token() -> Weight {
        Weight::from_parts(11_000_000, 1_600)
            .saturating_add(RocksDbWeight::get().reads_writes(2, 1))
    }
    fn request_transfer() -> Weight {
        Weight::from_parts(48_000_000, 6_200)
            .saturating_add(RocksDbWeight::get().reads_writes(9, 6))
    }
    fn update_status() -> Weight {
        Weight::from_parts(13_000_000, 3_600)
            .saturating_add(RocksDbWeight::get().reads_writes(1, 1))
    }
    fn process() -> Weight {
        Weight::from_parts(30_000_000, 7_000)
            .saturating_add(RocksDbWeight::get().reads_writes(5, 3))
    }
    fn reject() -> Weight {
        Weight::from_parts(40_000_000, 6_200)
            .saturating_add(RocksDbWeight::get().reads_writes(6, 4))
    }
    fn withdraw_fees() -> Weight {
        Weight::from_parts(38_000_000, 6_200)
            .saturating_add(RocksDbWeight::get().reads_writes(5, 3))
    }
    fn expire_request() -> Weight {
        Weight::from_parts(40_000_000, 6_200)
            .saturating_add(RocksDbWeight::get().reads_writes(6, 4))
    }
}

//! Weights for pallet-guarded-queue.
//!
//! Hand-tuned placeholders until the benchmarks in `benchmarking.rs` are run
//! against reference hardware.

#![allow(unused_parens)]
#![allow(unused_imports)]

use core::marker::PhantomData;
use frame_support::{
    traits::Get,
    weights::{constants::RocksDbWeight, Weight},
};

pub trait WeightInfo {
    fn submit() -> Weight;
    fn confirm() -> Weight;
    fn revoke() -> Weight;
    fn execute() -> Weight;
    fn add_signer() -> Weight;
    fn remove_signer() -> Weight;
    fn update_required_signatures() -> Weight;
    fn add_internal_wallet() -> Weight;
    fn remove_internal_wallet() -> Weight;
    fn authorize_upgrade() -> Weight;
}

/// Weights scaled by the runtime's database weight.
pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: frame_system::Config> WeightInfo for SubstrateWeight<T> {
    fn submit() -> Weight {
        Weight::from_parts(32_000_000, 3_600)
            .saturating_add(T::DbWeight::get().reads(3))
            .saturating_add(T::DbWeight::get().writes(2))
    }
    fn confirm() -> Weight {
        Weight::from_parts(28_000_000, 3_600)
            .saturating_add(T::DbWeight::get().reads(4))
            .saturating_add(T::DbWeight::get().writes(1))
    }
    fn revoke() -> Weight {
        Weight::from_parts(21_000_000, 3_600)
            .saturating_add(T::DbWeight::get().reads(2))
            .saturating_add(T::DbWeight::get().writes(1))
    }
    fn execute() -> Weight {
        Weight::from_parts(26_000_000, 3_600)
            .saturating_add(T::DbWeight::get().reads(4))
            .saturating_add(T::DbWeight::get().writes(1))
    }
    fn add_signer() -> Weight {
        Weight::from_parts(14_000_000, 1_500)
            .saturating_add(T::DbWeight::get().reads_writes(1, 1))
    }
    fn remove_signer() -> Weight {
        Weight::from_parts(15_000_000, 1_500)
            .saturating_add(T::DbWeight::get().reads_writes(2, 1))
    }
    fn update_required_signatures() -> Weight {
        Weight::from_parts(11_000_000, 1_500)
            .saturating_add(T::DbWeight::get().reads_writes(1, 1))
    }
    fn add_internal_wallet() -> Weight {
        Weight::from_parts(12_000_000, 2_500)
            .saturating_add(T::DbWeight::get().reads_writes(1, 1))
    }
    fn remove_internal_wallet() -> Weight {
        Weight::from_parts(12_000_000, 2_500)
            .saturating_add(T::DbWeight::get().reads_writes(1, 1))
    }
    fn authorize_upgrade() -> Weight {
        Weight::from_parts(10_000_000, 0).saturating_add(T::DbWeight::get().writes(1))
    }
}

// For backwards compatibility and tests.
impl WeightInfo for () {
    fn submit() -> Weight {
        Weight::from_parts(32_000_000, 3_600)
            .saturating_add(RocksDbWeight::get().reads(3))
            .saturating_add(RocksDbWeight::get().writes(2))
    }
    fn confirm() -> Weight {
        Weight::from_parts(28_000_000, 3_600)
            .saturating_add(RocksDbWeight::get().reads(4))
            .saturating_add(RocksDbWeight::get().writes(1))
    }
    fn revoke() -> Weight {
        Weight::from_parts(21_000_000, 3_600)
            .saturating_add(RocksDbWeight::get().reads(2))
            .saturating_add(RocksDbWeight::get().writes(1))
    }
    fn execute() -> Weight {
        Weight::from_parts(26_000_000, 3_600)
            .saturating_add(RocksDbWeight::get().reads(4))
            .saturating_add(RocksDbWeight::get().writes(1))
    }
    fn add_signer() -> Weight {
        Weight::from_parts(14_000_000, 1_500).saturating_add(RocksDbWeight::get().reads_writes(1, 1))
    }
    fn remove_signer() -> Weight {
        Weight::from_parts(15_000_000, 1_500).saturating_add(RocksDbWeight::get().reads_writes(2, 1))
    }
    fn update_required_signatures() -> Weight {
        Weight::from_parts(11_000_000, 1_500).saturating_add(RocksDbWeight::get().reads_writes(1, 1))
    }
    fn add_internal_wallet() -> Weight {
        Weight::from_parts(12_000_000, 2_500).saturating_add(RocksDbWeight::get().reads_writes(1, 1))
    }
    fn remove_internal_wallet() -> Weight {
        Weight::from_parts(12_000_000, 2_500).saturating_add(RocksDbWeight::get().reads_writes(1, 1))
    }
    fn authorize_upgrade() -> Weight {
        Weight::from_parts(10_000_000, 0).saturating_add(RocksDbWeight::get().writes(1))
    }
}

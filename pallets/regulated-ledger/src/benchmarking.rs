//! Benchmarking setup for pallet-regulated-ledger

use super::*;

#[allow(unused)]
use crate::Pallet as RegulatedLedger;
use frame_benchmarking::v2::*;
use frame_support::traits::fungibles::Mutate;
use frame_system::RawOrigin;
use sp_runtime::traits::Hash;

const REGULATION: RegulationType = 1;
const ISSUED: u64 = 0;

fn agent<T: Config>() -> T::RuntimeOrigin {
    T::AgentOrigin::try_successful_origin().expect("Agent origin")
}

/// Fill `who` with `MaxLotsPerHolder` lots; the oldest one holds `amount`.
fn fill_lots<T: Config>(who: &T::AccountId, amount: u128) {
    Pallet::<T>::deposit_lot(
        who,
        Lot { regulation_type: REGULATION, issuance_date: ISSUED, amount },
    )
    .expect("empty holder");
    for date in 1..T::MaxLotsPerHolder::get() as u64 {
        Pallet::<T>::deposit_lot(
            who,
            Lot { regulation_type: REGULATION, issuance_date: date, amount: 1 },
        )
        .expect("within MaxLotsPerHolder");
    }
    let total = amount + T::MaxLotsPerHolder::get() as u128 - 1;
    TotalSupply::<T>::mutate(|supply| *supply += total);
    RegulationSupply::<T>::mutate(REGULATION, |supply| *supply += total);
}

/// Configure a flat fee of `fee` and fund `payer` to cover it.
fn setup_fee<T: Config>(payer: &T::AccountId, fee: u128) -> AssetIdOf<T> {
    let asset = T::BenchmarkHelper::fee_asset();
    FeeConfiguration::<T>::put(FeeConfig {
        fee_type: FeeType::Flat,
        fee_value: fee,
        fee_asset: Some(asset.clone()),
    });
    T::Assets::mint_into(asset.clone(), payer, fee * 10).expect("fund fee payer");
    asset
}

fn open_request<T: Config>(from: &T::AccountId, to: &T::AccountId, fee: u128) -> RequestId {
    fill_lots::<T>(from, 1_000);
    setup_fee::<T>(from, fee);
    Pallet::<T>::request_transfer(
        RawOrigin::Signed(from.clone()).into(),
        from.clone(),
        to.clone(),
        1_000,
        fee,
    )
    .expect("request opens");
    NextRequestId::<T>::get() - 1
}

#[benchmarks]
mod benchmarks {
    use super::*;

    #[benchmark]
    fn mint() {
        let recipient: T::AccountId = account("recipient", 0, 0);
        let origin = agent::<T>();

        #[extrinsic_call]
        _(origin as T::RuntimeOrigin, recipient.clone(), 1_000_000, REGULATION, ISSUED);

        assert_eq!(Pallet::<T>::balance_of(&recipient), 1_000_000);
    }

    #[benchmark]
    fn burn_fifo() {
        let holder: T::AccountId = account("holder", 0, 0);
        fill_lots::<T>(&holder, 1);
        let lots = T::MaxLotsPerHolder::get() as u128;
        let origin = agent::<T>();

        #[extrinsic_call]
        _(origin as T::RuntimeOrigin, holder.clone(), lots);

        assert_eq!(Pallet::<T>::lot_count(&holder), 0);
    }

    #[benchmark]
    fn burn_by_regulation() {
        let holder: T::AccountId = account("holder", 0, 0);
        fill_lots::<T>(&holder, 1);
        let lots = T::MaxLotsPerHolder::get() as u128;
        let origin = agent::<T>();

        #[extrinsic_call]
        _(origin as T::RuntimeOrigin, holder.clone(), lots, REGULATION);

        assert_eq!(Pallet::<T>::lot_count(&holder), 0);
    }

    #[benchmark]
    fn transfer_lot() {
        let from: T::AccountId = account("from", 0, 0);
        let to: T::AccountId = account("to", 0, 0);
        fill_lots::<T>(&from, 1_000);
        let origin = agent::<T>();

        #[extrinsic_call]
        _(origin as T::RuntimeOrigin, from, to.clone(), 500, REGULATION, ISSUED);

        assert_eq!(Pallet::<T>::balance_of(&to), 500);
    }

    #[benchmark]
    fn batch_mint(n: Linear<1, { T::MaxBatchSize::get() }>) {
        let recipients: Vec<T::AccountId> = (0..n).map(|i| account("recipient", i, 0)).collect();
        let len = n as usize;
        let before = TotalSupply::<T>::get();
        let origin = agent::<T>();

        #[extrinsic_call]
        _(
            origin as T::RuntimeOrigin,
            recipients,
            vec![1_000; len],
            vec![REGULATION; len],
            vec![ISSUED; len],
        );

        assert_eq!(TotalSupply::<T>::get(), before + 1_000 * n as u128);
    }

    #[benchmark]
    fn batch_burn_by_regulation(n: Linear<1, { T::MaxBatchSize::get() }>) {
        let holders: Vec<T::AccountId> = (0..n).map(|i| account("holder", i, 0)).collect();
        let before = TotalSupply::<T>::get();
        for holder in &holders {
            fill_lots::<T>(holder, 1);
        }
        let len = n as usize;
        let lots = T::MaxLotsPerHolder::get() as u128;
        let origin = agent::<T>();

        #[extrinsic_call]
        _(origin as T::RuntimeOrigin, holders, vec![lots; len], vec![REGULATION; len]);

        assert_eq!(TotalSupply::<T>::get(), before);
    }

    #[benchmark]
    fn batch_transfer_from(n: Linear<1, { T::MaxBatchSize::get() }>) {
        let senders: Vec<T::AccountId> = (0..n).map(|i| account("from", i, 0)).collect();
        let recipients: Vec<T::AccountId> = (0..n).map(|i| account("to", i, 0)).collect();
        for sender in &senders {
            fill_lots::<T>(sender, 1_000);
        }
        let len = n as usize;
        let origin = agent::<T>();

        #[extrinsic_call]
        _(
            origin as T::RuntimeOrigin,
            senders,
            recipients.clone(),
            vec![500; len],
            vec![REGULATION; len],
            vec![ISSUED; len],
        );

        assert_eq!(Pallet::<T>::balance_of(&recipients[0]), 500);
    }

    #[benchmark]
    fn set_frozen() {
        let account: T::AccountId = account("holder", 0, 0);
        let origin = agent::<T>();

        #[extrinsic_call]
        _(origin as T::RuntimeOrigin, account.clone(), true);

        assert!(Frozen::<T>::get(&account));
    }

    #[benchmark]
    fn forced_transfer() {
        let from: T::AccountId = account("from", 0, 0);
        let to: T::AccountId = account("to", 0, 0);
        fill_lots::<T>(&from, 1);
        Frozen::<T>::insert(&from, true);
        let amount = T::MaxLotsPerHolder::get() as u128;
        let evidence_hash = T::Hashing::hash(b"evidence");
        let origin = agent::<T>();

        #[extrinsic_call]
        _(
            origin as T::RuntimeOrigin,
            from,
            to.clone(),
            amount,
            evidence_hash,
            ForcedTransferReason::CourtOrder,
        );

        assert_eq!(Pallet::<T>::balance_of(&to), amount);
    }

    #[benchmark]
    fn set_broker_status() {
        let broker: T::AccountId = account("broker", 0, 0);
        let origin = agent::<T>();

        #[extrinsic_call]
        _(origin as T::RuntimeOrigin, broker.clone(), true);

        assert!(Brokers::<T>::get(&broker));
    }

    #[benchmark]
    fn set_fee_parameters() {
        let origin = agent::<T>();

        #[extrinsic_call]
        _(origin as T::RuntimeOrigin, FeeType::Percentage, 250);

        assert_eq!(FeeConfiguration::<T>::get().fee_value, 250);
    }

    #[benchmark]
    fn set_fee_token() {
        let asset = T::BenchmarkHelper::fee_asset();
        let origin = agent::<T>();

        #[extrinsic_call]
        _(origin as T::RuntimeOrigin, asset.clone());

        assert_eq!(FeeConfiguration::<T>::get().fee_asset, Some(asset));
    }

    #[benchmark]
    fn request_transfer() {
        let caller: T::AccountId = whitelisted_caller();
        let to: T::AccountId = account("to", 0, 0);
        fill_lots::<T>(&caller, 1_000);
        setup_fee::<T>(&caller, 10);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller.clone()), caller.clone(), to, 1_000, 10);

        assert_eq!(CollectedFees::<T>::get(), 10);
    }

    #[benchmark]
    fn update_status() {
        let from: T::AccountId = account("from", 0, 0);
        let to: T::AccountId = account("to", 0, 0);
        let id = open_request::<T>(&from, &to, 10);
        let origin = agent::<T>();

        #[extrinsic_call]
        _(origin as T::RuntimeOrigin, id, RequestStatus::Approved);

        assert_eq!(
            TransferRequests::<T>::get(id).expect("request").status,
            RequestStatus::Approved
        );
    }

    #[benchmark]
    fn process() {
        let from: T::AccountId = account("from", 0, 0);
        let to: T::AccountId = account("to", 0, 0);
        let id = open_request::<T>(&from, &to, 10);
        let origin = agent::<T>();

        #[extrinsic_call]
        _(origin as T::RuntimeOrigin, id, true);

        assert_eq!(Pallet::<T>::balance_of(&to), 1_000);
    }

    #[benchmark]
    fn reject() {
        let from: T::AccountId = account("from", 0, 0);
        let to: T::AccountId = account("to", 0, 0);
        let id = open_request::<T>(&from, &to, 10);
        let origin = agent::<T>();

        #[extrinsic_call]
        _(origin as T::RuntimeOrigin, id, 1, true);

        assert_eq!(CollectedFees::<T>::get(), 0);
    }

    #[benchmark]
    fn withdraw_fees() {
        let from: T::AccountId = account("from", 0, 0);
        let to: T::AccountId = account("to", 0, 0);
        let recipient: T::AccountId = account("recipient", 0, 0);
        open_request::<T>(&from, &to, 10);
        let origin = agent::<T>();

        #[extrinsic_call]
        _(origin as T::RuntimeOrigin, 5, recipient);

        assert_eq!(CollectedFees::<T>::get(), 5);
    }

    #[benchmark]
    fn expire_request() {
        let from: T::AccountId = account("from", 0, 0);
        let to: T::AccountId = account("to", 0, 0);
        let id = open_request::<T>(&from, &to, 10);
        // Backdate the request past its TTL.
        TransferRequests::<T>::mutate(id, |request| {
            if let Some(request) = request {
                request.requested_at = 0;
            }
        });
        let caller: T::AccountId = whitelisted_caller();

        #[extrinsic_call]
        _(RawOrigin::Signed(caller), id);

        assert_eq!(
            TransferRequests::<T>::get(id).expect("request").status,
            RequestStatus::Expired
        );
    }

    impl_benchmark_test_suite!(RegulatedLedger, crate::mock::new_test_ext(), crate::mock::Test);
}

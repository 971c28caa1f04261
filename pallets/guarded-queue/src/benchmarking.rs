//! Benchmarking setup for pallet-guarded-queue

use super::*;

#[allow(unused)]
use crate::Pallet as GuardedQueue;
use frame_benchmarking::v2::*;
use frame_system::RawOrigin;

fn setup_signers<T: Config>(count: u32, required: u32) -> Vec<T::AccountId> {
    let signers: Vec<T::AccountId> = (0..count).map(|i| account("signer", i, 0)).collect();
    let bounded: BoundedVec<T::AccountId, T::MaxSigners> =
        signers.clone().try_into().expect("MaxSigners too small for benchmark");
    Signers::<T>::put(bounded);
    RequiredSignatures::<T>::put(required);
    signers
}

fn noop_call<T: Config>() -> <T as Config>::RuntimeCall {
    frame_system::Call::<T>::remark { remark: vec![] }.into()
}

fn pending_operation<T: Config>(confirmed_by: &[T::AccountId]) -> OperationId {
    let id = NextOperationId::<T>::get();
    NextOperationId::<T>::put(id + 1);
    let operation = Operation::<T> {
        call: noop_call::<T>().encode().try_into().expect("remark fits MaxCallSize"),
        submitted_by: confirmed_by[0].clone(),
        submitted_at: 0,
        confirmations: confirmed_by.to_vec().try_into().expect("within MaxSigners"),
        executed: false,
    };
    Operations::<T>::insert(id, operation);
    id
}

#[benchmarks]
mod benchmarks {
    use super::*;

    #[benchmark]
    fn submit() {
        let signers = setup_signers::<T>(3, 2);

        #[extrinsic_call]
        _(RawOrigin::Signed(signers[0].clone()), Box::new(noop_call::<T>()));

        assert_eq!(GuardedQueue::<T>::confirmation_count(0), 1);
    }

    #[benchmark]
    fn confirm() {
        let signers = setup_signers::<T>(3, 2);
        let id = pending_operation::<T>(&signers[..1]);

        #[extrinsic_call]
        _(RawOrigin::Signed(signers[1].clone()), id);

        assert!(Operations::<T>::get(id).expect("operation").executed);
    }

    #[benchmark]
    fn revoke() {
        let signers = setup_signers::<T>(3, 3);
        let id = pending_operation::<T>(&signers[..2]);

        #[extrinsic_call]
        _(RawOrigin::Signed(signers[1].clone()), id);

        assert_eq!(GuardedQueue::<T>::confirmation_count(id), 1);
    }

    #[benchmark]
    fn execute() {
        let signers = setup_signers::<T>(3, 2);
        let id = pending_operation::<T>(&signers[..2]);

        #[extrinsic_call]
        _(RawOrigin::Signed(signers[2].clone()), id);

        assert!(Operations::<T>::get(id).expect("operation").executed);
    }

    #[benchmark]
    fn add_signer() {
        setup_signers::<T>(2, 1);
        let signer: T::AccountId = account("new-signer", 0, 0);
        let origin = EnsureQueue::<T>::try_successful_origin().expect("Queue origin");

        #[extrinsic_call]
        _(origin as T::RuntimeOrigin, signer.clone());

        assert!(GuardedQueue::<T>::is_signer(&signer));
    }

    #[benchmark]
    fn remove_signer() {
        let signers = setup_signers::<T>(3, 1);
        let origin = EnsureQueue::<T>::try_successful_origin().expect("Queue origin");

        #[extrinsic_call]
        _(origin as T::RuntimeOrigin, signers[2].clone());

        assert!(!GuardedQueue::<T>::is_signer(&signers[2]));
    }

    #[benchmark]
    fn update_required_signatures() {
        setup_signers::<T>(3, 1);
        let origin = EnsureQueue::<T>::try_successful_origin().expect("Queue origin");

        #[extrinsic_call]
        _(origin as T::RuntimeOrigin, 3);

        assert_eq!(RequiredSignatures::<T>::get(), 3);
    }

    #[benchmark]
    fn add_internal_wallet() {
        let wallet: T::AccountId = account("wallet", 0, 0);
        let origin = EnsureQueue::<T>::try_successful_origin().expect("Queue origin");

        #[extrinsic_call]
        _(origin as T::RuntimeOrigin, wallet.clone());

        assert!(InternalWallets::<T>::get(&wallet));
    }

    #[benchmark]
    fn remove_internal_wallet() {
        let wallet: T::AccountId = account("wallet", 0, 0);
        InternalWallets::<T>::insert(&wallet, true);
        let origin = EnsureQueue::<T>::try_successful_origin().expect("Queue origin");

        #[extrinsic_call]
        _(origin as T::RuntimeOrigin, wallet.clone());

        assert!(!InternalWallets::<T>::get(&wallet));
    }

    #[benchmark]
    fn authorize_upgrade() {
        let code_hash = T::Hashing::hash(b"benchmark code");
        let origin = EnsureQueue::<T>::try_successful_origin().expect("Queue origin");

        #[extrinsic_call]
        _(origin as T::RuntimeOrigin, code_hash);
    }

    impl_benchmark_test_suite!(GuardedQueue, crate::mock::new_test_ext(), crate::mock::Test);
}

// Allow clippy warnings for test code (bool assertions and borrows are fine here)
#![allow(clippy::bool_assert_comparison, clippy::needless_borrows_for_generic_args)]

use crate::{
    mock::*, Call as QueueCall, EnsureQueue, Error, Event, Operation, OperationId, WeightInfo,
};
use frame_support::{
    assert_noop, assert_ok, dispatch::GetDispatchInfo, traits::EnsureOrigin, BoundedVec,
};
use sp_runtime::traits::{BlakeTwo256, Hash};

fn remark(tag: &[u8]) -> Box<RuntimeCall> {
    Box::new(frame_system::Call::remark_with_event { remark: tag.to_vec() }.into())
}

fn queue_call(call: QueueCall<Test>) -> Box<RuntimeCall> {
    Box::new(call.into())
}

fn payout(dest: u64, value: u64) -> Box<RuntimeCall> {
    Box::new(pallet_balances::Call::transfer_keep_alive { dest, value }.into())
}

fn last_operation_id() -> OperationId {
    GuardedQueue::next_operation_id() - 1
}

/// Submit as Alice and confirm as Bob, reaching the 2-of-3 threshold.
fn pass(call: Box<RuntimeCall>) -> OperationId {
    assert_ok!(GuardedQueue::submit(RuntimeOrigin::signed(ALICE), call));
    let id = last_operation_id();
    assert_ok!(GuardedQueue::confirm(RuntimeOrigin::signed(BOB), id));
    id
}

#[test]
fn genesis_config_works() {
    new_test_ext().execute_with(|| {
        assert_eq!(GuardedQueue::signers().to_vec(), vec![ALICE, BOB, CHARLIE]);
        assert_eq!(GuardedQueue::required_signatures(), 2);
        assert_eq!(GuardedQueue::is_internal_wallet(&TREASURY), true);
        assert_eq!(GuardedQueue::is_internal_wallet(&EXTERNAL), false);
        assert_eq!(GuardedQueue::next_operation_id(), 0);
    });
}

// ============================================================================
// Submission and Confirmation
// ============================================================================

#[test]
fn submit_records_operation_confirmed_by_submitter() {
    new_test_ext().execute_with(|| {
        let call = remark(b"hello");
        assert_ok!(GuardedQueue::submit(RuntimeOrigin::signed(ALICE), call.clone()));

        let operation = GuardedQueue::operation(0).expect("operation stored");
        assert_eq!(operation.submitted_by, ALICE);
        assert_eq!(operation.submitted_at, GENESIS_TIME);
        assert_eq!(operation.confirmations.to_vec(), vec![ALICE]);
        assert_eq!(operation.executed, false);
        assert_eq!(GuardedQueue::confirmation_count(0), 1);

        let call_hash = BlakeTwo256::hash(&codec::Encode::encode(&*call));
        System::assert_last_event(
            Event::OperationSubmitted { id: 0, submitter: ALICE, call_hash }.into(),
        );
    });
}

#[test]
fn submit_fails_for_non_signer() {
    new_test_ext().execute_with(|| {
        assert_noop!(
            GuardedQueue::submit(RuntimeOrigin::signed(DAVE), remark(b"x")),
            Error::<Test>::NotSigner
        );
    });
}

#[test]
fn operation_ids_increase_in_submission_order() {
    new_test_ext().execute_with(|| {
        assert_ok!(GuardedQueue::submit(RuntimeOrigin::signed(ALICE), remark(b"a")));
        assert_ok!(GuardedQueue::submit(RuntimeOrigin::signed(BOB), remark(b"b")));
        assert_ok!(GuardedQueue::submit(RuntimeOrigin::signed(CHARLIE), remark(b"c")));

        assert_eq!(GuardedQueue::next_operation_id(), 3);
        assert_eq!(GuardedQueue::operation(1).unwrap().submitted_by, BOB);
        assert_eq!(GuardedQueue::operation(2).unwrap().submitted_by, CHARLIE);
    });
}

#[test]
fn confirm_reaching_threshold_executes_from_queue_account() {
    new_test_ext().execute_with(|| {
        let id = pass(remark(b"approved"));

        assert_eq!(GuardedQueue::operation(id).unwrap().executed, true);
        System::assert_has_event(
            frame_system::Event::Remarked {
                sender: queue_account(),
                hash: BlakeTwo256::hash(b"approved"),
            }
            .into(),
        );
        System::assert_last_event(Event::OperationExecuted { id }.into());
    });
}

#[test]
fn confirm_fails_for_non_signer() {
    new_test_ext().execute_with(|| {
        assert_ok!(GuardedQueue::submit(RuntimeOrigin::signed(ALICE), remark(b"x")));
        assert_noop!(
            GuardedQueue::confirm(RuntimeOrigin::signed(DAVE), 0),
            Error::<Test>::NotSigner
        );
    });
}

#[test]
fn double_confirmation_fails() {
    new_test_ext().execute_with(|| {
        assert_ok!(GuardedQueue::submit(RuntimeOrigin::signed(ALICE), remark(b"x")));
        assert_noop!(
            GuardedQueue::confirm(RuntimeOrigin::signed(ALICE), 0),
            Error::<Test>::AlreadyConfirmed
        );
    });
}

#[test]
fn calls_against_unknown_operation_fail() {
    new_test_ext().execute_with(|| {
        assert_noop!(
            GuardedQueue::confirm(RuntimeOrigin::signed(ALICE), 7),
            Error::<Test>::UnknownOperation
        );
        assert_noop!(
            GuardedQueue::revoke(RuntimeOrigin::signed(ALICE), 7),
            Error::<Test>::UnknownOperation
        );
        assert_noop!(
            GuardedQueue::execute(RuntimeOrigin::signed(ALICE), 7),
            Error::<Test>::UnknownOperation
        );
    });
}

#[test]
fn executed_operation_is_terminal() {
    new_test_ext().execute_with(|| {
        let id = pass(remark(b"once"));

        assert_noop!(
            GuardedQueue::confirm(RuntimeOrigin::signed(CHARLIE), id),
            Error::<Test>::AlreadyExecuted
        );
        assert_noop!(
            GuardedQueue::execute(RuntimeOrigin::signed(CHARLIE), id),
            Error::<Test>::AlreadyExecuted
        );
        assert_noop!(
            GuardedQueue::revoke(RuntimeOrigin::signed(ALICE), id),
            Error::<Test>::AlreadyExecuted
        );
    });
}

#[test]
fn failed_execution_rolls_back_confirmation() {
    new_test_ext().execute_with(|| {
        // Adding the zero identity is rejected by the queue when the call runs.
        assert_ok!(GuardedQueue::submit(
            RuntimeOrigin::signed(ALICE),
            queue_call(QueueCall::add_signer { signer: 0 })
        ));

        assert_noop!(
            GuardedQueue::confirm(RuntimeOrigin::signed(BOB), 0),
            Error::<Test>::ZeroIdentity
        );

        let operation = GuardedQueue::operation(0).unwrap();
        assert_eq!(operation.confirmations.to_vec(), vec![ALICE]);
        assert_eq!(operation.executed, false);
    });
}

#[test]
fn pending_operation_is_charged_base_weight_only() {
    new_test_ext().execute_with(|| {
        pass(queue_call(QueueCall::update_required_signatures { required: 3 }));

        let submitted = GuardedQueue::submit(RuntimeOrigin::signed(ALICE), remark(b"x"))
            .expect("submit succeeds");
        assert_eq!(submitted.actual_weight, Some(<() as WeightInfo>::submit()));

        let id = last_operation_id();
        let confirmed =
            GuardedQueue::confirm(RuntimeOrigin::signed(BOB), id).expect("confirm succeeds");
        assert_eq!(confirmed.actual_weight, Some(<() as WeightInfo>::confirm()));
        assert_eq!(GuardedQueue::operation(id).unwrap().executed, false);
    });
}

#[test]
fn executed_operation_is_charged_base_plus_call_weight() {
    new_test_ext().execute_with(|| {
        let call = remark(b"x");
        let call_weight = call.get_dispatch_info().call_weight;
        assert_ok!(GuardedQueue::submit(RuntimeOrigin::signed(ALICE), call));

        let confirmed =
            GuardedQueue::confirm(RuntimeOrigin::signed(BOB), 0).expect("confirm succeeds");
        assert_eq!(
            confirmed.actual_weight,
            Some(<() as WeightInfo>::confirm().saturating_add(call_weight))
        );
        assert_eq!(GuardedQueue::operation(0).unwrap().executed, true);
    });
}

// ============================================================================
// Revocation
// ============================================================================

#[test]
fn revoke_removes_confirmation() {
    new_test_ext().execute_with(|| {
        assert_ok!(GuardedQueue::submit(RuntimeOrigin::signed(ALICE), remark(b"x")));
        assert_ok!(GuardedQueue::revoke(RuntimeOrigin::signed(ALICE), 0));

        assert_eq!(GuardedQueue::confirmation_count(0), 0);
        System::assert_last_event(
            Event::ConfirmationRevoked { id: 0, signer: ALICE, confirmations: 0 }.into(),
        );

        // Bob alone no longer meets the threshold; Charlie's confirmation does.
        assert_ok!(GuardedQueue::confirm(RuntimeOrigin::signed(BOB), 0));
        assert_eq!(GuardedQueue::operation(0).unwrap().executed, false);
        assert_ok!(GuardedQueue::confirm(RuntimeOrigin::signed(CHARLIE), 0));
        assert_eq!(GuardedQueue::operation(0).unwrap().executed, true);
    });
}

#[test]
fn revoke_without_confirmation_fails() {
    new_test_ext().execute_with(|| {
        assert_ok!(GuardedQueue::submit(RuntimeOrigin::signed(ALICE), remark(b"x")));
        assert_noop!(
            GuardedQueue::revoke(RuntimeOrigin::signed(BOB), 0),
            Error::<Test>::NotConfirmed
        );

        assert_ok!(GuardedQueue::revoke(RuntimeOrigin::signed(ALICE), 0));
        assert_noop!(
            GuardedQueue::revoke(RuntimeOrigin::signed(ALICE), 0),
            Error::<Test>::NotConfirmed
        );
    });
}

#[test]
fn execute_before_threshold_fails() {
    new_test_ext().execute_with(|| {
        assert_ok!(GuardedQueue::submit(RuntimeOrigin::signed(ALICE), remark(b"x")));
        assert_noop!(
            GuardedQueue::execute(RuntimeOrigin::signed(ALICE), 0),
            Error::<Test>::ThresholdNotMet
        );
    });
}

#[test]
fn execute_runs_operation_after_threshold_is_lowered() {
    new_test_ext().execute_with(|| {
        assert_ok!(GuardedQueue::submit(RuntimeOrigin::signed(ALICE), remark(b"pending")));

        assert_ok!(GuardedQueue::update_required_signatures(
            RuntimeOrigin::signed(queue_account()),
            1
        ));

        assert_ok!(GuardedQueue::execute(RuntimeOrigin::signed(CHARLIE), 0));
        assert_eq!(GuardedQueue::operation(0).unwrap().executed, true);
    });
}

#[test]
fn single_signature_threshold_executes_on_submit() {
    new_test_ext().execute_with(|| {
        pass(queue_call(QueueCall::update_required_signatures { required: 1 }));
        assert_eq!(GuardedQueue::required_signatures(), 1);

        assert_ok!(GuardedQueue::submit(RuntimeOrigin::signed(CHARLIE), remark(b"solo")));
        let id = last_operation_id();
        assert_eq!(GuardedQueue::operation(id).unwrap().executed, true);
        System::assert_last_event(Event::OperationExecuted { id }.into());
    });
}

// ============================================================================
// Time-Lock Policy
// ============================================================================

#[test]
fn high_value_transfer_to_external_wallet_is_deferred() {
    new_test_ext().execute_with(|| {
        let id = pass(payout(EXTERNAL, 1_000_000));

        assert_eq!(GuardedQueue::operation(id).unwrap().executed, false);
        assert_eq!(Balances::free_balance(EXTERNAL), 0);
        System::assert_last_event(
            Event::ExecutionDeferred { id, unlock_at: GENESIS_TIME + TIME_LOCK_DELAY }.into(),
        );

        assert_noop!(
            GuardedQueue::execute(RuntimeOrigin::signed(CHARLIE), id),
            Error::<Test>::TimeLockActive
        );

        advance_time(TIME_LOCK_DELAY - 1);
        assert_noop!(
            GuardedQueue::execute(RuntimeOrigin::signed(CHARLIE), id),
            Error::<Test>::TimeLockActive
        );

        advance_time(1);
        assert_ok!(GuardedQueue::execute(RuntimeOrigin::signed(CHARLIE), id));
        assert_eq!(GuardedQueue::operation(id).unwrap().executed, true);
        assert_eq!(Balances::free_balance(EXTERNAL), 1_000_000);
    });
}

#[test]
fn high_value_transfer_to_internal_wallet_executes_immediately() {
    new_test_ext().execute_with(|| {
        let id = pass(payout(TREASURY, 2_000_000));

        assert_eq!(GuardedQueue::operation(id).unwrap().executed, true);
        assert_eq!(Balances::free_balance(TREASURY), 2_001_000);
    });
}

#[test]
fn transfer_below_threshold_executes_immediately() {
    new_test_ext().execute_with(|| {
        let id = pass(payout(EXTERNAL, 999_999));

        assert_eq!(GuardedQueue::operation(id).unwrap().executed, true);
        assert_eq!(Balances::free_balance(EXTERNAL), 999_999);
    });
}

#[test]
fn confirmation_after_delay_executes_directly() {
    new_test_ext().execute_with(|| {
        assert_ok!(GuardedQueue::submit(RuntimeOrigin::signed(ALICE), payout(EXTERNAL, 5_000_000)));
        advance_time(TIME_LOCK_DELAY);

        assert_ok!(GuardedQueue::confirm(RuntimeOrigin::signed(BOB), 0));
        assert_eq!(GuardedQueue::operation(0).unwrap().executed, true);
        assert_eq!(Balances::free_balance(EXTERNAL), 5_000_000);
    });
}

#[test]
fn undecodable_payload_is_not_time_locked() {
    new_test_ext().execute_with(|| {
        let operation = Operation::<Test> {
            call: BoundedVec::truncate_from(vec![0xff, 0xff, 0xff]),
            submitted_by: ALICE,
            submitted_at: GENESIS_TIME,
            confirmations: BoundedVec::truncate_from(vec![ALICE, BOB]),
            executed: false,
        };
        assert_eq!(GuardedQueue::time_lock_release(&operation), None);
    });
}

#[test]
fn unrecognised_call_shape_is_not_time_locked() {
    new_test_ext().execute_with(|| {
        // Same amount, different call: transfer_allow_death is not the inspected shape.
        let call: Box<RuntimeCall> = Box::new(
            pallet_balances::Call::transfer_allow_death { dest: EXTERNAL, value: 3_000_000 }
                .into(),
        );
        let id = pass(call);
        assert_eq!(GuardedQueue::operation(id).unwrap().executed, true);
    });
}

// ============================================================================
// Signer and Internal-Wallet Management
// ============================================================================

#[test]
fn management_calls_reject_any_origin_but_the_queue() {
    new_test_ext().execute_with(|| {
        assert_noop!(
            GuardedQueue::add_signer(RuntimeOrigin::signed(ALICE), DAVE),
            sp_runtime::DispatchError::BadOrigin
        );
        assert_noop!(
            GuardedQueue::remove_signer(RuntimeOrigin::signed(ALICE), BOB),
            sp_runtime::DispatchError::BadOrigin
        );
        assert_noop!(
            GuardedQueue::update_required_signatures(RuntimeOrigin::signed(ALICE), 1),
            sp_runtime::DispatchError::BadOrigin
        );
        assert_noop!(
            GuardedQueue::add_internal_wallet(RuntimeOrigin::signed(ALICE), EXTERNAL),
            sp_runtime::DispatchError::BadOrigin
        );
        assert_noop!(
            GuardedQueue::remove_internal_wallet(RuntimeOrigin::root(), TREASURY),
            sp_runtime::DispatchError::BadOrigin
        );
    });
}

#[test]
fn add_signer_through_queue_works() {
    new_test_ext().execute_with(|| {
        pass(queue_call(QueueCall::add_signer { signer: DAVE }));

        assert!(GuardedQueue::is_signer(&DAVE));
        System::assert_has_event(Event::SignerAdded { signer: DAVE }.into());

        // The new signer can take part straight away.
        assert_ok!(GuardedQueue::submit(RuntimeOrigin::signed(DAVE), remark(b"new")));
    });
}

#[test]
fn add_signer_validation() {
    new_test_ext().execute_with(|| {
        let queue = RuntimeOrigin::signed(queue_account());
        assert_noop!(
            GuardedQueue::add_signer(queue.clone(), 0),
            Error::<Test>::ZeroIdentity
        );
        assert_noop!(
            GuardedQueue::add_signer(queue.clone(), BOB),
            Error::<Test>::DuplicateSigner
        );
        for signer in 10..15 {
            assert_ok!(GuardedQueue::add_signer(queue.clone(), signer));
        }
        assert_noop!(GuardedQueue::add_signer(queue, 99), Error::<Test>::TooManySigners);
    });
}

#[test]
fn remove_signer_keeps_threshold_reachable() {
    new_test_ext().execute_with(|| {
        let queue = RuntimeOrigin::signed(queue_account());
        assert_ok!(GuardedQueue::remove_signer(queue.clone(), CHARLIE));
        assert!(!GuardedQueue::is_signer(&CHARLIE));
        System::assert_last_event(Event::SignerRemoved { signer: CHARLIE }.into());

        // Two signers left with a threshold of two.
        assert_noop!(
            GuardedQueue::remove_signer(queue.clone(), BOB),
            Error::<Test>::InvalidThreshold
        );
        assert_noop!(
            GuardedQueue::remove_signer(queue, CHARLIE),
            Error::<Test>::SignerNotFound
        );
    });
}

#[test]
fn removed_signer_loses_access() {
    new_test_ext().execute_with(|| {
        pass(queue_call(QueueCall::remove_signer { signer: CHARLIE }));
        assert_noop!(
            GuardedQueue::submit(RuntimeOrigin::signed(CHARLIE), remark(b"x")),
            Error::<Test>::NotSigner
        );
    });
}

#[test]
fn removed_signer_confirmation_no_longer_counts() {
    new_test_ext().execute_with(|| {
        assert_ok!(GuardedQueue::submit(RuntimeOrigin::signed(CHARLIE), remark(b"x")));
        let id = last_operation_id();
        pass(queue_call(QueueCall::remove_signer { signer: CHARLIE }));

        assert_eq!(GuardedQueue::confirmation_count(id), 0);
        assert_noop!(
            GuardedQueue::execute(RuntimeOrigin::signed(ALICE), id),
            Error::<Test>::ThresholdNotMet
        );

        // One current signer is not enough; the stale confirmation is dropped.
        assert_ok!(GuardedQueue::confirm(RuntimeOrigin::signed(ALICE), id));
        let operation = GuardedQueue::operation(id).unwrap();
        assert_eq!(operation.executed, false);
        assert_eq!(operation.confirmations.to_vec(), vec![ALICE]);

        assert_ok!(GuardedQueue::confirm(RuntimeOrigin::signed(BOB), id));
        assert_eq!(GuardedQueue::operation(id).unwrap().executed, true);
    });
}

#[test]
fn removing_a_signer_during_time_lock_withdraws_their_approval() {
    new_test_ext().execute_with(|| {
        let id = pass(payout(EXTERNAL, 1_000_000));
        pass(queue_call(QueueCall::remove_signer { signer: BOB }));

        advance_time(TIME_LOCK_DELAY);
        assert_noop!(
            GuardedQueue::execute(RuntimeOrigin::signed(CHARLIE), id),
            Error::<Test>::ThresholdNotMet
        );
        assert_eq!(Balances::free_balance(EXTERNAL), 0);

        assert_ok!(GuardedQueue::confirm(RuntimeOrigin::signed(CHARLIE), id));
        assert_eq!(GuardedQueue::operation(id).unwrap().executed, true);
        assert_eq!(Balances::free_balance(EXTERNAL), 1_000_000);
    });
}

#[test]
fn update_required_signatures_bounds() {
    new_test_ext().execute_with(|| {
        let queue = RuntimeOrigin::signed(queue_account());
        assert_noop!(
            GuardedQueue::update_required_signatures(queue.clone(), 0),
            Error::<Test>::InvalidThreshold
        );
        assert_noop!(
            GuardedQueue::update_required_signatures(queue.clone(), 4),
            Error::<Test>::InvalidThreshold
        );
        assert_ok!(GuardedQueue::update_required_signatures(queue, 3));
        assert_eq!(GuardedQueue::required_signatures(), 3);
        System::assert_last_event(Event::RequirementChanged { required: 3 }.into());
    });
}

#[test]
fn internal_wallet_registry_through_queue() {
    new_test_ext().execute_with(|| {
        pass(queue_call(QueueCall::add_internal_wallet { wallet: EXTERNAL }));
        assert_eq!(GuardedQueue::is_internal_wallet(&EXTERNAL), true);

        // Now exempt from the time-lock.
        let id = pass(payout(EXTERNAL, 1_000_000));
        assert_eq!(GuardedQueue::operation(id).unwrap().executed, true);

        pass(queue_call(QueueCall::remove_internal_wallet { wallet: EXTERNAL }));
        assert_eq!(GuardedQueue::is_internal_wallet(&EXTERNAL), false);
        System::assert_has_event(Event::InternalWalletRemoved { wallet: EXTERNAL }.into());
    });
}

#[test]
fn internal_wallet_validation() {
    new_test_ext().execute_with(|| {
        let queue = RuntimeOrigin::signed(queue_account());
        assert_noop!(
            GuardedQueue::add_internal_wallet(queue.clone(), 0),
            Error::<Test>::ZeroIdentity
        );
        assert_noop!(
            GuardedQueue::add_internal_wallet(queue.clone(), TREASURY),
            Error::<Test>::DuplicateInternalWallet
        );
        assert_noop!(
            GuardedQueue::remove_internal_wallet(queue.clone(), EXTERNAL),
            Error::<Test>::InternalWalletNotFound
        );
        assert_noop!(
            GuardedQueue::remove_internal_wallet(queue, 0),
            Error::<Test>::ZeroIdentity
        );
    });
}

// ============================================================================
// Upgrade Authorization and Origin Gate
// ============================================================================

#[test]
fn upgrade_authorization_goes_through_queue() {
    new_test_ext().execute_with(|| {
        let code_hash = BlakeTwo256::hash(b"new runtime code");

        assert_noop!(
            GuardedQueue::authorize_upgrade(RuntimeOrigin::signed(ALICE), code_hash),
            sp_runtime::DispatchError::BadOrigin
        );

        pass(queue_call(QueueCall::authorize_upgrade { code_hash }));
        System::assert_has_event(
            frame_system::Event::UpgradeAuthorized { code_hash, check_version: true }.into(),
        );
        System::assert_has_event(Event::UpgradeAuthorized { code_hash }.into());
    });
}

#[test]
fn ensure_queue_accepts_only_queue_account() {
    new_test_ext().execute_with(|| {
        assert_eq!(
            EnsureQueue::<Test>::try_origin(RuntimeOrigin::signed(queue_account())).ok(),
            Some(queue_account())
        );
        assert!(EnsureQueue::<Test>::try_origin(RuntimeOrigin::signed(ALICE)).is_err());
        assert!(EnsureQueue::<Test>::try_origin(RuntimeOrigin::root()).is_err());
        assert!(EnsureQueue::<Test>::try_origin(RuntimeOrigin::none()).is_err());
    });
}

#[test]
fn state_checks_follow_signer_management() {
    new_test_ext().execute_with(|| {
        assert_ok!(GuardedQueue::do_try_state());

        pass(queue_call(QueueCall::add_signer { signer: DAVE }));
        pass(queue_call(QueueCall::update_required_signatures { required: 4 }));
        assert_ok!(GuardedQueue::do_try_state());

        crate::RequiredSignatures::<Test>::put(5);
        assert!(GuardedQueue::do_try_state().is_err());

        crate::RequiredSignatures::<Test>::put(2);
        crate::Signers::<Test>::put(BoundedVec::truncate_from(vec![ALICE, BOB, ALICE]));
        assert!(GuardedQueue::do_try_state().is_err());
    });
}

use std::{
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Barrier,
    },
    thread,
    time::Duration,
};

use proptest::prelude::*;
use rand::{rngs::StdRng, RngCore as _, SeedableRng as _};
use slot_store::{
    mocks::FaultyBackend, ContractCall, ContractId, ContractStorage, DataBackend, MemoryBackend,
    Method, Runtime, COUNTER_KEY,
};

fn random_contract(rng: &mut StdRng) -> ContractId {
    let mut id = ContractId::default();

    rng.fill_bytes(&mut id);

    id
}

fn read_counter<D: DataBackend>(runtime: &Runtime<D>, contract: &ContractId) -> u64 {
    runtime.storage(contract).get(&COUNTER_KEY).unwrap()
}

#[test]
fn fresh_contract_reads_zero() {
    let runtime = Runtime::new(MemoryBackend::default());
    let contract = random_contract(&mut StdRng::seed_from_u64(1));

    assert_eq!(read_counter(&runtime, &contract), 0);
    assert!(!runtime.storage(&contract).has(&COUNTER_KEY).unwrap());
}

#[test]
fn overwrite_keeps_latest_value() {
    let runtime = Runtime::new(MemoryBackend::default());
    let contract = random_contract(&mut StdRng::seed_from_u64(2));

    runtime
        .call(contract, Method::StoreValue { val: 5 })
        .unwrap();
    runtime
        .call(contract, Method::StoreValue { val: 9 })
        .unwrap();

    assert_eq!(read_counter(&runtime, &contract), 9);
}

#[test]
fn boundary_values_round_trip() {
    let runtime = Runtime::new(MemoryBackend::default());
    let contract = random_contract(&mut StdRng::seed_from_u64(3));

    for val in [0, u64::MAX, 0] {
        runtime.call(contract, Method::StoreValue { val }).unwrap();

        assert_eq!(read_counter(&runtime, &contract), val);
    }

    assert!(runtime.storage(&contract).has(&COUNTER_KEY).unwrap());
}

#[test]
fn failed_commit_leaves_previous_value() {
    let data = FaultyBackend::default();
    let runtime = Runtime::new(data.clone());
    let contract = random_contract(&mut StdRng::seed_from_u64(4));

    runtime
        .call(contract, Method::StoreValue { val: 11 })
        .unwrap();

    data.fail_writes(true);

    let err = runtime
        .call(contract, Method::StoreValue { val: 12 })
        .unwrap_err();

    assert!(err.is_storage());

    data.fail_writes(false);

    assert_eq!(read_counter(&runtime, &contract), 11);
}

#[test]
fn read_fault_surfaces_as_storage_error() {
    let data = FaultyBackend::default();
    let storage = ContractStorage::new(data.clone(), [9u8; 32]);

    data.fail_reads(true);

    assert!(storage.get(&COUNTER_KEY).is_err());
}

#[test]
fn clones_share_the_namespace() {
    let runtime = Runtime::new(MemoryBackend::default());
    let other = runtime.clone();
    let contract = random_contract(&mut StdRng::seed_from_u64(5));

    let call = ContractCall::new(contract, &Method::StoreValue { val: 77 });

    other.invoke(&call).unwrap();

    assert_eq!(read_counter(&runtime, &contract), 77);
}

/// Memory backend recording whether two batch writes were ever in flight at once.
#[derive(Debug, Clone, Default)]
struct OverlapBackend {
    data: MemoryBackend,
    in_flight: Arc<AtomicUsize>,
    overlapped: Arc<AtomicBool>,
    batches: Arc<AtomicUsize>,
}

impl DataBackend for OverlapBackend {
    fn get(&self, prefix: &[u8], key: &[u8]) -> anyhow::Result<Option<Vec<u8>>> {
        self.data.get(prefix, key)
    }

    fn has(&self, prefix: &[u8], key: &[u8]) -> anyhow::Result<bool> {
        self.data.has(prefix, key)
    }

    fn set(&self, prefix: &[u8], key: &[u8], data: &[u8]) -> anyhow::Result<Option<Vec<u8>>> {
        self.data.set(prefix, key, data)
    }

    fn set_batch(&self, prefix: &[u8], entries: &[(&[u8], &[u8])]) -> anyhow::Result<()> {
        if self.in_flight.fetch_add(1, Ordering::SeqCst) > 0 {
            self.overlapped.store(true, Ordering::SeqCst);
        }

        thread::sleep(Duration::from_millis(20));

        let res = self.data.set_batch(prefix, entries);

        self.batches.fetch_add(1, Ordering::SeqCst);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        res
    }
}

#[test]
fn invocations_from_threads_are_serialized() {
    let data = OverlapBackend::default();
    let runtime = Runtime::new(data.clone());
    let contract = random_contract(&mut StdRng::seed_from_u64(6));
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (1..=8u64)
        .map(|val| {
            let runtime = runtime.clone();
            let barrier = barrier.clone();

            thread::spawn(move || {
                barrier.wait();
                runtime.call(contract, Method::StoreValue { val })
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap().unwrap();
    }

    assert_eq!(data.batches.load(Ordering::SeqCst), 8);
    assert!(!data.overlapped.load(Ordering::SeqCst));
    assert!((1..=8).contains(&read_counter(&runtime, &contract)));
}

#[test]
fn overlapping_batches_are_detected() {
    let data = OverlapBackend::default();
    let barrier = Arc::new(Barrier::new(2));
    let entry: (&[u8], &[u8]) = (&[1], &[2]);

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let data = data.clone();
            let barrier = barrier.clone();

            thread::spawn(move || {
                barrier.wait();
                data.set_batch(b"overlap", &[entry])
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap().unwrap();
    }

    assert!(data.overlapped.load(Ordering::SeqCst));
}

proptest! {
    #[test]
    fn write_then_read(val: u64, seed: u64) {
        let runtime = Runtime::new(MemoryBackend::default());
        let contract = random_contract(&mut StdRng::seed_from_u64(seed));

        runtime.call(contract, Method::StoreValue { val }).unwrap();

        prop_assert_eq!(read_counter(&runtime, &contract), val);
    }

    #[test]
    fn repeated_identical_writes_are_idempotent(val: u64, seed: u64) {
        let once = MemoryBackend::default();
        let twice = MemoryBackend::default();
        let contract = random_contract(&mut StdRng::seed_from_u64(seed));

        Runtime::new(once.clone()).call(contract, Method::StoreValue { val }).unwrap();

        let runtime = Runtime::new(twice.clone());

        runtime.call(contract, Method::StoreValue { val }).unwrap();
        runtime.call(contract, Method::StoreValue { val }).unwrap();

        let a = ContractStorage::new(once.clone(), contract);
        let b = ContractStorage::new(twice.clone(), contract);

        prop_assert_eq!(a.get_slot(&COUNTER_KEY).unwrap(), b.get_slot(&COUNTER_KEY).unwrap());
        prop_assert_eq!(once.len(), twice.len());
    }

    #[test]
    fn namespaces_are_isolated(a: u64, b: u64, seed: u64) {
        let runtime = Runtime::new(MemoryBackend::default());
        let rng = &mut StdRng::seed_from_u64(seed);
        let first = random_contract(rng);
        let second = random_contract(rng);

        prop_assume!(first != second);

        runtime.call(first, Method::StoreValue { val: a }).unwrap();

        prop_assert_eq!(read_counter(&runtime, &second), 0);

        runtime.call(second, Method::StoreValue { val: b }).unwrap();

        prop_assert_eq!(read_counter(&runtime, &first), a);
        prop_assert_eq!(read_counter(&runtime, &second), b);
    }

    #[test]
    fn wire_calls_decode_to_the_same_write(val: u64, seed: u64) {
        let runtime = Runtime::new(MemoryBackend::default());
        let contract = random_contract(&mut StdRng::seed_from_u64(seed));
        let bytes = ContractCall::new(contract, &Method::StoreValue { val }).to_bytes();
        let call = ContractCall::try_from_bytes(&bytes).unwrap();

        runtime.invoke(&call).unwrap();

        prop_assert_eq!(read_counter(&runtime, &contract), val);
    }
}

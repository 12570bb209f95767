use crate::*;

fn contract_id(n: u8) -> ContractId {
    [n; HASH_LEN]
}

#[test]
fn store_value_selector_is_stable() {
    let method = Method::StoreValue { val: 0 };
    let declared = abi();

    assert_eq!(declared.functions.len(), 1);
    assert_eq!(declared.functions[0].selector().unwrap(), method.selector());
    assert_eq!(
        declared.functions[0].signature().unwrap(),
        "store_value(u64)"
    );
}

#[test]
fn abi_has_no_read_method() {
    let declared = abi();

    assert!(declared
        .functions
        .iter()
        .all(|f| f.output_type().unwrap() == ParamType::Unit));
}

#[test]
fn contract_writes_the_counter_slot_only() {
    let data = MemoryBackend::default();
    let storage = ContractStorage::new(data.clone(), contract_id(1));
    let mut contract = Contract::new(storage.clone());

    contract.store_value(17).unwrap();

    assert_eq!(contract.state(), InvocationState::Idle);
    assert_eq!(storage.get(&COUNTER_KEY).unwrap(), 17);
    assert_eq!(
        storage.get_slot(&COUNTER_KEY).unwrap(),
        Some(StorageSlot::from_word(COUNTER_KEY, 17))
    );
    assert_eq!(data.len(), 1);
}

#[test]
fn failed_write_returns_to_idle() {
    struct Broken;

    impl Storage for Broken {
        fn get(&self, _key: &StorageKey) -> anyhow::Result<Word> {
            Ok(0)
        }

        fn put(&mut self, _key: &StorageKey, _value: Word) -> anyhow::Result<()> {
            anyhow::bail!("broken storage")
        }
    }

    let mut contract = Contract::new(Broken);

    assert!(contract.store_value(1).is_err());
    assert_eq!(contract.state(), InvocationState::Idle);
}

#[test]
fn journal_reads_its_own_writes() {
    let storage = ContractStorage::new(MemoryBackend::default(), contract_id(2));

    storage.put(&COUNTER_KEY, 3).unwrap();

    let mut journal = Journal::new(&storage);

    assert_eq!(Storage::get(&journal, &COUNTER_KEY).unwrap(), 3);

    journal.put(&COUNTER_KEY, 4).unwrap();

    assert_eq!(Storage::get(&journal, &COUNTER_KEY).unwrap(), 4);
    assert_eq!(storage.get(&COUNTER_KEY).unwrap(), 3);
    assert_eq!(journal.commit().unwrap(), 1);
    assert_eq!(storage.get(&COUNTER_KEY).unwrap(), 4);
}

#[test]
fn dropped_journal_discards_writes() {
    let storage = ContractStorage::new(MemoryBackend::default(), contract_id(3));

    {
        let mut journal = Journal::new(&storage);

        journal.put(&COUNTER_KEY, 99).unwrap();
    }

    assert!(!storage.has(&COUNTER_KEY).unwrap());
    assert_eq!(storage.get(&COUNTER_KEY).unwrap(), 0);
}

#[test]
fn corrupted_slot_is_a_storage_fault() {
    let data = MemoryBackend::default();
    let storage = ContractStorage::new(data.clone(), contract_id(4));

    data.set(storage.namespace(), &COUNTER_KEY, &[1, 2, 3])
        .unwrap();

    let err = storage.get(&COUNTER_KEY).unwrap_err();

    assert!(err.to_string().starts_with("corrupted slot"));
    assert!(format!("{err:#}").contains("invalid slot length"));
}

#[test]
fn contract_call_wire_layout() {
    let call = ContractCall::new(contract_id(5), &Method::StoreValue { val: 42 });
    let bytes = call.to_bytes();

    assert_eq!(bytes.len(), ContractCall::HEADER_LEN + WORD_SIZE);
    assert_eq!(&bytes[..HASH_LEN], &contract_id(5));
    assert_eq!(&bytes[HASH_LEN..ContractCall::HEADER_LEN], &call.selector);
    assert_eq!(&bytes[ContractCall::HEADER_LEN..], &42u64.to_be_bytes());
    assert_eq!(ContractCall::try_from_bytes(&bytes).unwrap(), call);

    assert_eq!(
        ContractCall::try_from_bytes(&bytes[..HASH_LEN]),
        Err(CodecError::Truncated {
            expected: ContractCall::HEADER_LEN,
            found: HASH_LEN
        })
    );
}

#[test]
fn decode_rejects_unknown_selector() {
    let err = Method::decode(&[0xff; WORD_SIZE], &1u64.to_be_bytes()).unwrap_err();

    assert_eq!(err, CodecError::UnknownSelector([0xff; WORD_SIZE]));
}

#[test]
fn runtime_rejects_malformed_calls_without_writing() {
    let data = MemoryBackend::default();
    let runtime = Runtime::new(data.clone());
    let mut call = ContractCall::new(contract_id(6), &Method::StoreValue { val: 1 });

    call.args.push(0);

    let err = runtime.invoke(&call).unwrap_err();

    assert!(err.is_invocation_shape());
    assert!(data.is_empty());
}

#[test]
fn runtime_receipt_reports_unit_return() {
    let runtime = Runtime::new(MemoryBackend::default());
    let receipt = runtime
        .call(contract_id(7), Method::StoreValue { val: 8 })
        .unwrap();

    assert_eq!(receipt.contract, contract_id(7));
    assert_eq!(receipt.method, Method::STORE_VALUE);
    assert_eq!(receipt.slots, 1);
    assert!(receipt.ret.is_empty());
}

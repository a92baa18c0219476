//! Submission pipeline tests for fsn-sdk
//!
//! Covers prepare-only, sender authorisation, signer invocation and the
//! raw-send routing for every signature state.

use std::sync::Mutex;

use fsn_sdk::transport::MOCK_TX_HASH;
use fsn_sdk::{
    Account, Address, FsnClient, MockTransport, Network, OperationKind, PreparedTransaction,
    SdkError, Signer, SignedPayload, SubmitMode, Submission, U256,
};
use serde_json::json;

const KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const SENDER: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";
const OTHER: &str = "0x432baf0ab7261819fcf587de7e6d68f902e43195";
const FSN: &str = "0xffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff";

/// Signer that records what it was asked to sign
struct RecordingSigner {
    account: Account,
    seen: Mutex<Vec<(PreparedTransaction, u64)>>,
}

impl RecordingSigner {
    fn new() -> Self {
        Self {
            account: Account::from_private_key_hex(KEY).unwrap(),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn seen(&self) -> Vec<(PreparedTransaction, u64)> {
        self.seen.lock().unwrap().clone()
    }
}

impl Signer for RecordingSigner {
    fn address(&self) -> Address {
        *self.account.address()
    }

    fn sign_transaction(
        &self,
        tx: &PreparedTransaction,
        chain_id: u64,
    ) -> Result<SignedPayload, SdkError> {
        self.seen.lock().unwrap().push((tx.clone(), chain_id));
        self.account.sign_transaction(tx, chain_id)
    }
}

fn client(network: Network) -> (FsnClient, MockTransport) {
    let transport = MockTransport::new();
    (FsnClient::with_transport(network, transport.clone()), transport)
}

fn every_kind_request(kind: OperationKind, from: &str) -> serde_json::Value {
    let mut request = match kind {
        OperationKind::CreateAsset => json!({
            "name": "Test Token", "symbol": "TT", "decimals": 8, "total": "100000000"
        }),
        OperationKind::IncrementAsset
        | OperationKind::DecrementAsset
        | OperationKind::SendAsset
        | OperationKind::AssetToTimeLock
        | OperationKind::TimeLockToAsset
        | OperationKind::TimeLockToTimeLock => json!({"to": OTHER, "asset": FSN, "value": "1000"}),
        OperationKind::MakeSwap => json!({
            "FromAssetID": FSN,
            "ToAssetID": FSN,
            "MinFromAmount": "1",
            "MinToAmount": "2",
            "SwapSize": 1
        }),
        OperationKind::RecallSwap => json!({"SwapID": FSN}),
        OperationKind::TakeSwap => json!({"SwapID": FSN, "Size": 1}),
        OperationKind::BuyTicket | OperationKind::GenNotation => json!({}),
        OperationKind::Send => json!({"to": OTHER, "value": "0x1"}),
    };
    request["from"] = json!(from);
    request["gasPrice"] = json!("default");
    request
}

// ==================== Prepare-only Tests ====================

#[tokio::test]
async fn test_prepare_only_never_signs_or_sends() {
    for kind in OperationKind::ALL {
        let (client, transport) = client(Network::Test);
        let submission = client
            .submit(kind, &every_kind_request(kind, OTHER), SubmitMode::PrepareOnly)
            .await
            .unwrap();

        let prepared = match submission {
            Submission::Prepared(tx) => tx,
            Submission::Sent(_) => panic!("{} was sent in prepare-only mode", kind),
        };
        // The mock build reports chain id 1
        assert_eq!(prepared.chain_id, Some(46688), "{}", kind);

        let methods = transport.methods();
        assert!(
            methods.iter().all(|m| !m.contains("sendRaw") && !m.ends_with("sendTransaction")),
            "{}: {:?}",
            kind,
            methods
        );
        if let Some(build) = kind.build_method() {
            assert_eq!(methods, vec![build], "{}", kind);
        }
    }
}

#[tokio::test]
async fn test_prepare_only_ignores_sender_of_other_account() {
    let (client, _) = client(Network::Main);
    client.set_key(KEY).unwrap();

    let submission = client
        .submit(
            OperationKind::GenNotation,
            &every_kind_request(OperationKind::GenNotation, OTHER),
            SubmitMode::PrepareOnly,
        )
        .await
        .unwrap();
    assert_eq!(
        submission.into_prepared().unwrap().chain_id,
        Some(32659)
    );
}

// ==================== Authorisation Tests ====================

#[tokio::test]
async fn test_sender_mismatch_before_any_rpc() {
    for kind in OperationKind::ALL {
        let (client, transport) = client(Network::Test);
        client.set_key(KEY).unwrap();

        let err = client
            .submit(kind, &every_kind_request(kind, OTHER), SubmitMode::Submit)
            .await
            .unwrap_err();
        match err {
            SdkError::SenderMismatch { expected, found } => {
                assert_eq!(expected, Address::from_hex(SENDER).unwrap());
                assert_eq!(found, Address::from_hex(OTHER).unwrap());
            }
            other => panic!("{}: expected sender mismatch, got {:?}", kind, other),
        }
        assert!(transport.calls().is_empty(), "{}", kind);
    }
}

#[tokio::test]
async fn test_no_signing_key_before_any_rpc() {
    let (client, transport) = client(Network::Test);
    let err = client
        .submit(
            OperationKind::BuyTicket,
            &every_kind_request(OperationKind::BuyTicket, SENDER),
            SubmitMode::Submit,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::NoSigningKey));
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn test_validation_error_before_any_rpc() {
    let (client, transport) = client(Network::Test);
    client.set_key(KEY).unwrap();
    let err = client
        .submit(
            OperationKind::SendAsset,
            &json!({"from": SENDER, "to": OTHER, "value": "1"}),
            SubmitMode::Submit,
        )
        .await
        .unwrap_err();
    match err {
        SdkError::Validation(e) => assert_eq!(e.field, "asset"),
        other => panic!("expected validation error, got {:?}", other),
    }
    assert!(transport.calls().is_empty());
}

// ==================== Signer Tests ====================

#[tokio::test]
async fn test_signer_receives_chain_id_and_built_transaction() {
    let (client, transport) = client(Network::Test);
    let signer = RecordingSigner::new();

    let submission = client
        .submit_with_signer(
            OperationKind::GenNotation,
            &every_kind_request(OperationKind::GenNotation, SENDER),
            Some(&signer),
            SubmitMode::Submit,
        )
        .await
        .unwrap();
    assert_eq!(submission.tx_hash().unwrap().to_hex(), MOCK_TX_HASH);

    let seen = signer.seen();
    assert_eq!(seen.len(), 1);
    let (tx, chain_id) = &seen[0];
    assert_eq!(*chain_id, 46688);
    assert_eq!(tx.chain_id, Some(46688));
    assert_eq!(tx.nonce, 7);
    assert_eq!(tx.to, Some(Address::FSN_CALL));
    assert_eq!(tx.input.to_vec(), vec![0xc4u8, 0x82, 0x00, 0x01]);

    // What is broadcast is exactly what the signer produced
    let expected = signer.account.sign_transaction(tx, 46688).unwrap();
    assert_eq!(
        transport.last_params("fsntx_sendRawTransaction").unwrap(),
        vec![json!(expected.to_hex())]
    );
}

#[test]
fn test_known_key_signature_matches_eip155_vector() {
    let account = Account::from_private_key(&[0x46; 32]).unwrap();
    let tx = PreparedTransaction {
        from: Some(*account.address()),
        nonce: 9,
        gas_price: U256::from(20_000_000_000u64),
        gas: 21_000,
        to: Some(Address::from_hex("0x3535353535353535353535353535353535353535").unwrap()),
        value: U256::exp10(18),
        input: bytes::Bytes::new(),
        chain_id: Some(1),
        v: None,
        r: None,
        s: None,
        hash: None,
    };

    let signed = account.sign_transaction(&tx, 1).unwrap();
    assert_eq!(
        signed.to_hex(),
        "0xf86c098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a76400008025a028ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276a067cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83"
    );

    let fusion = account.sign_transaction(&tx, 46688).unwrap();
    assert_eq!(fusion, account.sign_transaction(&tx, 46688).unwrap());
    assert_ne!(fusion.raw, signed.raw);
}

#[tokio::test]
async fn test_send_prepared_checks_sender_of_prepared_tx() {
    let (client, transport) = client(Network::Test);
    let tx = client
        .prepare(
            OperationKind::GenNotation,
            &every_kind_request(OperationKind::GenNotation, OTHER),
        )
        .await
        .unwrap();
    assert_eq!(tx.from, Some(Address::from_hex(OTHER).unwrap()));

    client.set_key(KEY).unwrap();
    let err = client.send_prepared(&tx).await.unwrap_err();
    assert!(matches!(err, SdkError::SenderMismatch { .. }));
    assert_eq!(transport.call_count("fsntx_sendRawTransaction"), 0);
}

#[tokio::test]
async fn test_send_prepared_unsigned_without_sender_rejected() {
    let (client, transport) = client(Network::Test);
    client.set_key(KEY).unwrap();
    let mut tx = client
        .prepare(
            OperationKind::GenNotation,
            &every_kind_request(OperationKind::GenNotation, SENDER),
        )
        .await
        .unwrap();
    tx.from = None;

    match client.send_prepared(&tx).await.unwrap_err() {
        SdkError::Validation(e) => assert_eq!(e.field, "from"),
        other => panic!("expected validation error, got {:?}", other),
    }
    assert_eq!(transport.call_count("fsntx_sendRawTransaction"), 0);
}

// ==================== Routing Tests ====================

#[tokio::test]
async fn test_generic_send_fills_defaults_and_sends_generic_raw() {
    let (client, transport) = client(Network::Main);
    let signer = RecordingSigner::new();

    client
        .submit_with_signer(
            OperationKind::Send,
            &json!({"from": SENDER, "to": OTHER, "value": "0x10", "data": "0x"}),
            Some(&signer),
            SubmitMode::Submit,
        )
        .await
        .unwrap();

    assert_eq!(
        transport.methods(),
        vec![
            "eth_getTransactionCount",
            "eth_gasPrice",
            "eth_estimateGas",
            "eth_sendRawTransaction"
        ]
    );
    assert_eq!(
        transport.last_params("eth_getTransactionCount").unwrap(),
        vec![json!(SENDER), json!("pending")]
    );

    let (tx, chain_id) = &signer.seen()[0];
    assert_eq!(*chain_id, 32659);
    assert_eq!(tx.gas, 21_000);
    assert_eq!(tx.gas_price, U256::from(21_000_000_000u64));
    assert_eq!(tx.value, U256::from(16));
    assert!(tx.r.is_none() && tx.s.is_none());
}

#[tokio::test]
async fn test_explicit_fields_skip_default_filling() {
    let (client, transport) = client(Network::Test);
    client.set_key(KEY).unwrap();

    client
        .send_raw_transaction(
            &json!({
                "from": SENDER,
                "to": OTHER,
                "nonce": 4,
                "gas": 21000,
                "gasPrice": "0x3b9aca00"
            }),
            SubmitMode::Submit,
        )
        .await
        .unwrap();
    assert_eq!(transport.methods(), vec!["eth_sendRawTransaction"]);
}

#[tokio::test]
async fn test_presigned_build_result_is_not_resigned() {
    let (client, transport) = client(Network::Test);
    let mut built = fsn_sdk::transport::mock_built_transaction();
    built["v"] = json!("0x16cde");
    built["r"] = json!("0x1f");
    built["s"] = json!("0x2e");
    transport.set_response("fsntx_buildRecallSwapTx", built);

    let signer = RecordingSigner::new();
    client
        .submit_with_signer(
            OperationKind::RecallSwap,
            &every_kind_request(OperationKind::RecallSwap, SENDER),
            Some(&signer),
            SubmitMode::Submit,
        )
        .await
        .unwrap();

    assert!(signer.seen().is_empty());
    assert_eq!(
        transport.methods(),
        vec!["fsntx_buildRecallSwapTx", "fsntx_sendRawTransaction"]
    );
}

#[tokio::test]
async fn test_half_signed_build_result_rejected() {
    let (client, transport) = client(Network::Test);
    client.set_key(KEY).unwrap();
    let mut built = fsn_sdk::transport::mock_built_transaction();
    built["r"] = json!("0x1f");
    transport.set_response("fsntx_buildGenNotationTx", built);

    let err = client
        .submit(
            OperationKind::GenNotation,
            &every_kind_request(OperationKind::GenNotation, SENDER),
            SubmitMode::Submit,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::Validation(_)));
    assert_eq!(transport.call_count("fsntx_sendRawTransaction"), 0);
}

#[tokio::test]
async fn test_remote_build_failure_is_not_retried() {
    let (client, transport) = client(Network::Test);
    client.set_key(KEY).unwrap();
    transport.set_error("fsntx_buildBuyTicketTx", -32000, "insufficient balance");

    let err = client
        .submit(
            OperationKind::BuyTicket,
            &every_kind_request(OperationKind::BuyTicket, SENDER),
            SubmitMode::Submit,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::Rpc { .. }));
    assert_eq!(transport.methods(), vec!["fsntx_buildBuyTicketTx"]);
}

#[tokio::test]
async fn test_null_build_result_is_not_found() {
    let (client, transport) = client(Network::Test);
    transport.set_response("fsntx_buildTakeSwapTx", serde_json::Value::Null);

    let err = client
        .submit(
            OperationKind::TakeSwap,
            &every_kind_request(OperationKind::TakeSwap, SENDER),
            SubmitMode::PrepareOnly,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::NotFound(_)));
}

#[tokio::test]
async fn test_concurrent_submissions_all_complete() {
    let (client, transport) = client(Network::Test);
    client.set_key(KEY).unwrap();
    let request = every_kind_request(OperationKind::GenNotation, SENDER);

    let (a, b) = tokio::join!(
        client.submit(OperationKind::GenNotation, &request, SubmitMode::Submit),
        client.submit(OperationKind::GenNotation, &request, SubmitMode::Submit),
    );
    a.unwrap();
    b.unwrap();

    // Each build is followed by its own send
    assert_eq!(
        transport.methods(),
        vec![
            "fsntx_buildGenNotationTx",
            "fsntx_sendRawTransaction",
            "fsntx_buildGenNotationTx",
            "fsntx_sendRawTransaction"
        ]
    );
}

//! Transaction builder tests for fsn-sdk

use fsn_sdk::tx_builder::{build, build_time_lock};
use fsn_sdk::{GasPrice, IntentPayload, OperationKind, ValidationErrorKind, U256};
use proptest::prelude::*;
use serde_json::{json, Value};

const FROM: &str = "0x432baf0ab7261819fcf587de7e6d68f902e43195";
const TO: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";
const FSN: &str = "0xffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff";

/// Complete request for `kind` with every required key
fn request(kind: OperationKind) -> Value {
    let mut request = match kind {
        OperationKind::CreateAsset => json!({
            "name": "Test Token", "symbol": "TT", "decimals": 8, "total": 100000000
        }),
        OperationKind::IncrementAsset
        | OperationKind::DecrementAsset
        | OperationKind::SendAsset
        | OperationKind::AssetToTimeLock
        | OperationKind::TimeLockToAsset
        | OperationKind::TimeLockToTimeLock => json!({"to": TO, "asset": FSN, "value": 1000}),
        OperationKind::MakeSwap => json!({
            "FromAssetID": FSN,
            "ToAssetID": FSN,
            "MinFromAmount": 1,
            "MinToAmount": 2,
            "SwapSize": 3
        }),
        OperationKind::RecallSwap => json!({"SwapID": FSN}),
        OperationKind::TakeSwap => json!({"SwapID": FSN, "Size": 1}),
        OperationKind::BuyTicket | OperationKind::GenNotation | OperationKind::Send => json!({}),
    };
    request["from"] = json!(FROM);
    request
}

/// Keys `build` must insist on for `kind`
fn required_keys(kind: OperationKind) -> &'static [&'static str] {
    match kind {
        OperationKind::CreateAsset => &["from", "name", "symbol", "decimals", "total"],
        OperationKind::IncrementAsset
        | OperationKind::DecrementAsset
        | OperationKind::SendAsset
        | OperationKind::AssetToTimeLock
        | OperationKind::TimeLockToAsset
        | OperationKind::TimeLockToTimeLock => &["from", "to", "asset", "value"],
        OperationKind::MakeSwap => &[
            "from",
            "FromAssetID",
            "ToAssetID",
            "MinFromAmount",
            "MinToAmount",
            "SwapSize",
        ],
        OperationKind::RecallSwap => &["from", "SwapID"],
        OperationKind::TakeSwap => &["from", "SwapID", "Size"],
        OperationKind::BuyTicket | OperationKind::GenNotation | OperationKind::Send => &["from"],
    }
}

#[test]
fn test_every_kind_builds() {
    for kind in OperationKind::ALL {
        let intent = build(kind, &request(kind), 46688).unwrap();
        assert_eq!(intent.kind, kind);
        assert_eq!(intent.chain_id, 46688);
        assert_eq!(intent.from.to_hex(), FROM);
    }
}

#[test]
fn test_missing_required_field_is_named() {
    for kind in OperationKind::ALL {
        for key in required_keys(kind) {
            let mut partial = request(kind);
            partial.as_object_mut().unwrap().remove(*key);

            let err = build(kind, &partial, 46688).unwrap_err();
            assert_eq!(err.field, *key, "{}", kind);
            assert_eq!(err.kind, ValidationErrorKind::MissingField, "{}", kind);
        }
    }
}

#[test]
fn test_null_counts_as_missing() {
    let mut req = request(OperationKind::SendAsset);
    req["asset"] = Value::Null;
    let err = build(OperationKind::SendAsset, &req, 46688).unwrap_err();
    assert_eq!(err.field, "asset");
    assert_eq!(err.kind, ValidationErrorKind::MissingField);
}

#[test]
fn test_malformed_fields() {
    let mut req = request(OperationKind::SendAsset);
    req["to"] = json!("0x1234");
    let err = build(OperationKind::SendAsset, &req, 1).unwrap_err();
    assert_eq!(err.kind, ValidationErrorKind::MalformedAddress);

    let mut req = request(OperationKind::SendAsset);
    req["asset"] = json!("0xff");
    let err = build(OperationKind::SendAsset, &req, 1).unwrap_err();
    assert_eq!(err.kind, ValidationErrorKind::MalformedHex);

    let mut req = request(OperationKind::SendAsset);
    req["value"] = json!(-5);
    let err = build(OperationKind::SendAsset, &req, 1).unwrap_err();
    assert_eq!(err.field, "value");
    assert!(matches!(err.kind, ValidationErrorKind::WrongType { .. }));

    let mut req = request(OperationKind::Send);
    req["data"] = json!("not hex");
    let err = build(OperationKind::Send, &req, 1).unwrap_err();
    assert_eq!(err.field, "data");
}

#[test]
fn test_time_lock_window_order() {
    let mut req = request(OperationKind::AssetToTimeLock);
    req["start"] = json!(2000);
    req["end"] = json!(1000);
    let err = build_time_lock(OperationKind::AssetToTimeLock, &req, 1).unwrap_err();
    assert_eq!(err.field, "end");

    req["end"] = json!("0xffffffffffffffff");
    let intent = build_time_lock(OperationKind::AssetToTimeLock, &req, 1).unwrap();
    match intent.payload {
        IntentPayload::TimeLock { start, end, .. } => {
            assert_eq!(start, Some(2000));
            assert_eq!(end, Some(u64::MAX));
        }
        other => panic!("unexpected payload {:?}", other),
    }
}

#[test]
fn test_default_gas_price_resolves_per_kind() {
    let mut req = request(OperationKind::CreateAsset);
    req["gasPrice"] = json!("default");
    let mut create = build(OperationKind::CreateAsset, &req, 1).unwrap();
    assert_eq!(create.gas_price, Some(GasPrice::Default));
    assert!(create.to_params().get("gasPrice").is_none());

    create.resolve_gas_price().unwrap();
    assert_eq!(
        create.gas_price,
        Some(GasPrice::Wei(
            OperationKind::CreateAsset.default_gas_price_wei().unwrap()
        ))
    );

    let mut req = request(OperationKind::GenNotation);
    req["gasPrice"] = json!("default");
    let mut notation = build(OperationKind::GenNotation, &req, 1).unwrap();
    notation.resolve_gas_price().unwrap();
    assert_ne!(create.gas_price, notation.gas_price);
    assert_eq!(
        notation.to_params()["gasPrice"],
        json!("0x2d79883d2000")
    );
}

#[test]
fn test_gas_price_units() {
    let with = |price: Value| {
        let mut req = request(OperationKind::BuyTicket);
        req["gasPrice"] = price;
        build(OperationKind::BuyTicket, &req, 1).map(|intent| intent.gas_price)
    };

    let gwei = U256::from(1_000_000_000u64);
    assert_eq!(with(json!("0x3b9aca00")).unwrap(), Some(GasPrice::Wei(gwei)));
    assert_eq!(with(json!("0.000000001")).unwrap(), Some(GasPrice::Wei(gwei)));
    assert_eq!(with(json!(1)).unwrap(), Some(GasPrice::Wei(U256::exp10(18))));
    assert!(with(json!(true)).is_err());
}

#[test]
fn test_make_swap_wire_keys() {
    let intent = build(OperationKind::MakeSwap, &request(OperationKind::MakeSwap), 1).unwrap();
    let params = intent.to_params();
    assert_eq!(params["FromAssetID"], json!(FSN));
    assert_eq!(params["SwapSize"], json!("0x3"));
    assert_eq!(params["Targes"], json!([]));
    assert_eq!(params["Description"], json!(""));

    let mut zero = request(OperationKind::MakeSwap);
    zero["SwapSize"] = json!(0);
    assert_eq!(
        build(OperationKind::MakeSwap, &zero, 1).unwrap_err().field,
        "SwapSize"
    );
}

fn kind_strategy() -> impl Strategy<Value = OperationKind> {
    (0..OperationKind::ALL.len()).prop_map(|i| OperationKind::ALL[i])
}

proptest! {
    #[test]
    fn prop_build_is_deterministic(
        kind in kind_strategy(),
        gas in proptest::option::of(21_000u64..10_000_000),
        nonce in proptest::option::of(any::<u32>()),
        chain_id in prop_oneof![Just(46688u64), Just(32659u64)],
    ) {
        let mut req = request(kind);
        if let Some(gas) = gas {
            req["gas"] = json!(gas);
        }
        if let Some(nonce) = nonce {
            req["nonce"] = json!(format!("0x{:x}", nonce));
        }

        let first = build(kind, &req, chain_id).unwrap();
        let second = build(kind, &req, chain_id).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.to_params(), second.to_params());
        prop_assert_eq!(first.gas, gas);
        prop_assert_eq!(first.nonce, nonce.map(u64::from));
    }

    #[test]
    fn prop_decimal_and_hex_values_agree(value in any::<u64>()) {
        let mut decimal = request(OperationKind::SendAsset);
        decimal["value"] = json!(value.to_string());
        let mut hex = request(OperationKind::SendAsset);
        hex["value"] = json!(format!("0x{:x}", value));

        let a = build(OperationKind::SendAsset, &decimal, 1).unwrap();
        let b = build(OperationKind::SendAsset, &hex, 1).unwrap();
        prop_assert_eq!(a, b);
    }
}

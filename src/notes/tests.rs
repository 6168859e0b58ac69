#![allow(non_snake_case)]

use super::*;
use proptest::prelude::*;

fn b64(text: &str) -> String {
    STANDARD.encode(text)
}

#[test]
fn encode_influence_note__joins_fields_with_separator() {
    // given
    let note_id = NoteId::from("abc-123");

    // when
    let actual = encode_influence_note("CITYMGR", 123, 500, &note_id);

    // then
    assert_eq!(actual, "awe_CITYMGR_123_500_abc-123");
}

#[test]
fn decode__influence_note_round_trips_known_scenario() {
    // given
    let encoded = encode_influence_note("CITYMGR...", 123, 500, &NoteId::from("abc-123"));

    // when
    let actual = InfluenceDepositNote::decode(&encoded).unwrap();

    // then
    let expected = InfluenceDepositNote {
        receiver: "CITYMGR...".to_string(),
        asset_index: 123,
        asset_title: None,
        influence_deposit: 500,
        note_id: NoteId::from("abc-123"),
    };
    assert_eq!(actual, expected);
}

#[test]
fn encode_build_note__places_object_before_note_id() {
    let actual =
        encode_build_note("BUILDMGR", 7, 1000, "Castle", &NoteId::from("id-1"));

    assert_eq!(actual, "awebuild_BUILDMGR_7_1000_Castle_id-1");
}

#[test]
fn encode_pack_purchase_note__uses_two_field_shape() {
    let actual = encode_pack_purchase_note(42, "BUYER");

    assert_eq!(actual, "awe_pp_42_BUYER");
    let decoded = PackPurchaseNote::decode(&actual).unwrap();
    assert_eq!(decoded.pack_id, 42);
    assert_eq!(decoded.buyer_address, "BUYER");
}

#[test]
fn encoders__start_with_their_indexer_prefix() {
    let note_id = NoteId::from("id-1");

    assert!(encode_influence_note("MGR", 1, 2, &note_id).starts_with(&influence_prefix("MGR")));
    assert!(encode_build_note("MGR", 1, 2, "House", &note_id).starts_with(&build_prefix("MGR")));
    assert!(encode_pack_purchase_note(3, "BUYER").starts_with(&pack_purchase_prefix()));
    assert_eq!(
        encode_build_note("MGR", 1, 2, "House", &note_id)
            .split(NOTE_SEPARATOR)
            .count(),
        6
    );
}

#[test]
fn prefixes__match_indexer_filters() {
    assert_eq!(build_prefix("test-manager-addr"), "awebuild_test-manager-addr");
    assert_eq!(
        STANDARD.encode(build_prefix("test-manager-addr")),
        "YXdlYnVpbGRfdGVzdC1tYW5hZ2VyLWFkZHI="
    );
    assert_eq!(influence_prefix("MGR"), "awe_MGR");
    assert_eq!(pack_purchase_prefix(), "awe_pp_");
}

#[test]
fn decode__rejects_foreign_prefix() {
    let err = InfluenceDepositNote::decode("AWE_MGR_1_2_id").unwrap_err();

    assert_eq!(
        err,
        NoteDecodeError::Prefix {
            expected: "awe",
            found: "AWE".to_string(),
        }
    );
}

#[test]
fn decode__rejects_build_note_as_influence_note() {
    let build = encode_build_note("MGR", 1, 2, "House", &NoteId::from("id"));

    assert!(InfluenceDepositNote::decode(&build).is_err());
}

#[test]
fn decode__rejects_wrong_field_count() {
    let err = InfluenceDepositNote::decode("awe_MGR_1_2").unwrap_err();

    assert_eq!(
        err,
        NoteDecodeError::FieldCount {
            expected: 5,
            found: 4
        }
    );
}

#[test]
fn decode__rejects_non_numeric_amount() {
    let err = BuildNote::decode("awebuild_MGR_1_lots_House_id").unwrap_err();

    assert!(matches!(
        err,
        NoteDecodeError::NotNumeric {
            field: "depositAmount",
            ..
        }
    ));
}

#[test]
fn decode__rejects_signed_and_fractional_numbers() {
    assert!(InfluenceDepositNote::decode("awe_MGR_1_-5_id").is_err());
    assert!(InfluenceDepositNote::decode("awe_MGR_1_2.5_id").is_err());
    assert!(InfluenceDepositNote::decode("awe_MGR__5_id").is_err());
}

#[test]
fn decode_base64__rejects_garbage() {
    let err = InfluenceDepositNote::decode_base64("***not base64***").unwrap_err();

    assert!(matches!(err, NoteDecodeError::Base64(_)));
}

#[test]
fn decode_base64__rejects_non_utf8_bytes() {
    let note = STANDARD.encode([0xff, 0xfe, 0x00]);

    assert_eq!(
        BuildNote::decode_base64(&note).unwrap_err(),
        NoteDecodeError::Utf8
    );
}

#[test]
fn decode_base64__decodes_indexer_note() {
    let note = b64("awebuild_MGR_12_900_Forest_0f6e");

    let actual = BuildNote::decode_base64(&note).unwrap();

    assert_eq!(actual.asset_index, 12);
    assert_eq!(actual.deposit, 900);
    assert_eq!(actual.object, "Forest");
    assert_eq!(actual.note_id.as_str(), "0f6e");
}

#[test]
fn note_id__new_mints_distinct_uuids() {
    let a = NoteId::new();
    let b = NoteId::new();

    assert_ne!(a, b);
    assert_eq!(a.as_str().len(), 36);
    assert!(!a.as_str().contains(NOTE_SEPARATOR));
}

proptest! {
    #[test]
    fn influence_note__round_trips(
        receiver in "[A-Z2-7]{1,58}",
        asset_index in any::<u64>(),
        deposit in any::<u64>(),
        note_id in "[a-f0-9-]{1,36}",
    ) {
        let note = InfluenceDepositNote {
            receiver,
            asset_index,
            asset_title: None,
            influence_deposit: deposit,
            note_id: NoteId::from(note_id),
        };

        let decoded = InfluenceDepositNote::decode(&note.encode()).unwrap();

        prop_assert_eq!(decoded, note);
    }

    #[test]
    fn build_note__round_trips(
        receiver in "[A-Z2-7]{1,58}",
        asset_index in any::<u64>(),
        deposit in any::<u64>(),
        object in "[A-Za-z0-9]{1,24}",
        note_id in "[a-f0-9-]{1,36}",
    ) {
        let note = BuildNote {
            receiver,
            asset_index,
            deposit,
            object,
            note_id: NoteId::from(note_id),
        };

        let decoded = BuildNote::decode_base64(&b64(&note.encode())).unwrap();

        prop_assert_eq!(decoded, note);
    }

    #[test]
    fn decode__never_panics_on_arbitrary_text(text in ".*") {
        let _ = InfluenceDepositNote::decode(&text);
        let _ = BuildNote::decode(&text);
        let _ = PackPurchaseNote::decode(&text);
        let _ = BuildNote::decode_base64(&text);
    }
}

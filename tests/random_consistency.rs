use keyio::{
    bech32, convert_bits, decode_destination, extract_destinations, is_valid_destination, solver,
    Params, TxoutType,
};
use proptest::prelude::*;

fn all_params() -> &'static [Params] {
    &[
        Params::MAINNET,
        Params::TESTNET,
        Params::SIGNET,
        Params::REGTEST,
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    // convert_bits(5,8,false) is a left inverse of convert_bits(8,5,true).
    #[test]
    fn convert_bits_round_trips(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        let symbols = convert_bits(8, 5, true, &bytes).expect("padding conversion");
        prop_assert!(symbols.iter().all(|&s| s < 32));
        let back = convert_bits(5, 8, false, &symbols).expect("unpadding conversion");
        prop_assert_eq!(back, bytes);
    }

    #[test]
    fn base58_check_round_trips(payload in proptest::collection::vec(any::<u8>(), 0..40)) {
        let encoded = keyio::base58::encode_base58_check(&payload);
        let decoded = keyio::base58::decode_base58_check(&encoded, payload.len());
        prop_assert_eq!(decoded.as_deref(), Some(payload.as_slice()));
    }

    #[test]
    fn bech32_round_trips_in_both_flavours(
        hrp in "[a-z]{1,10}",
        data in proptest::collection::vec(0u8..32, 0..40),
    ) {
        for encoding in [bech32::Encoding::Bech32, bech32::Encoding::Bech32m] {
            let encoded = bech32::encode(encoding, &hrp, &data);
            let decoded = bech32::decode(&encoded).expect("decode own encoding");
            prop_assert_eq!(decoded.encoding, encoding);
            prop_assert_eq!(&decoded.hrp, &hrp);
            prop_assert_eq!(&decoded.data, &data);

            // The all-uppercase form carries the same symbols.
            let upper = bech32::decode(&encoded.to_uppercase()).expect("uppercase form");
            prop_assert_eq!(upper.data, decoded.data);
        }
    }

    // Every single-address standard kind survives script -> address ->
    // script, on every network.
    #[test]
    fn standard_scripts_round_trip_through_addresses(
        hash20 in proptest::array::uniform20(any::<u8>()),
        hash32 in proptest::array::uniform32(any::<u8>()),
    ) {
        let mut p2pkh = vec![0x76, 0xa9, 0x14];
        p2pkh.extend(hash20);
        p2pkh.extend([0x88, 0xac]);

        let mut p2sh = vec![0xa9, 0x14];
        p2sh.extend(hash20);
        p2sh.push(0x87);

        let mut p2wpkh = vec![0x00, 0x14];
        p2wpkh.extend(hash20);

        let mut p2wsh = vec![0x00, 0x20];
        p2wsh.extend(hash32);

        let mut p2tr = vec![0x51, 0x20];
        p2tr.extend(hash32);

        for script in [&p2pkh, &p2sh, &p2wpkh, &p2wsh, &p2tr] {
            for params in all_params() {
                let mut addresses = Vec::new();
                prop_assert!(extract_destinations(script, params, &mut addresses));
                prop_assert_eq!(addresses.len(), 1);
                let decoded = decode_destination(&addresses[0], params);
                prop_assert_eq!(decoded.as_deref(), Ok(script.as_slice()));
                prop_assert!(is_valid_destination(&addresses[0], params));
            }
        }
    }

    // Arbitrary bytes never panic the classifier, and the solution shapes
    // obey the per-kind contract.
    #[test]
    fn solver_total_on_arbitrary_scripts(script in proptest::collection::vec(any::<u8>(), 0..128)) {
        let (kind, solutions) = solver(&script);
        match kind {
            TxoutType::NonStandard | TxoutType::NullData => prop_assert!(solutions.is_empty()),
            TxoutType::PubKeyHash | TxoutType::ScriptHash => {
                prop_assert_eq!(solutions.len(), 1);
                prop_assert_eq!(solutions[0].len(), 20);
            }
            TxoutType::PubKey => {
                prop_assert_eq!(solutions.len(), 1);
                prop_assert!(solutions[0].len() == 33 || solutions[0].len() == 65);
            }
            TxoutType::WitnessV0KeyHash => prop_assert_eq!(solutions[0].len(), 20),
            TxoutType::WitnessV0ScriptHash | TxoutType::WitnessV1Taproot => {
                prop_assert_eq!(solutions[0].len(), 32)
            }
            TxoutType::WitnessUnknown => {
                prop_assert_eq!(solutions.len(), 2);
                prop_assert!((1..=16).contains(&solutions[0][0]));
                prop_assert!((2..=40).contains(&solutions[1].len()));
            }
            TxoutType::Multisig => {
                prop_assert!(solutions.len() >= 3);
                let m = solutions[0][0];
                let n = *solutions.last().unwrap().first().unwrap();
                prop_assert!(1 <= m && m <= n && n <= 16);
                prop_assert_eq!(solutions.len(), n as usize + 2);
            }
        }
    }

    // The boolean validator agrees with the full decoder on arbitrary
    // input, for every parameter set.
    #[test]
    fn validity_agrees_with_decoding(s in "[\\x20-\\x7e]{0,60}") {
        for params in all_params() {
            let decoded_ok = decode_destination(&s, params).is_ok();
            // The validator alone rejects the empty string early; the
            // decoder reports a diagnostic instead of a script for it.
            if s.is_empty() {
                prop_assert!(!is_valid_destination(&s, params));
                prop_assert!(!decoded_ok);
            } else {
                prop_assert_eq!(is_valid_destination(&s, params), decoded_ok);
            }
        }
    }

    // Mutating one character of a valid address never yields the same
    // script under the same network.
    #[test]
    fn corrupted_addresses_do_not_alias(
        hash20 in proptest::array::uniform20(any::<u8>()),
        position in 0usize..34,
    ) {
        let mut script = vec![0x76, 0xa9, 0x14];
        script.extend(hash20);
        script.extend([0x88, 0xac]);
        let mut addresses = Vec::new();
        extract_destinations(&script, &Params::MAINNET, &mut addresses);
        let address = addresses.remove(0);

        let mut corrupted = address.clone().into_bytes();
        let position = position % corrupted.len();
        corrupted[position] = if corrupted[position] == b'2' { b'3' } else { b'2' };
        let corrupted = String::from_utf8(corrupted).unwrap();
        if corrupted != address {
            if let Ok(other) = decode_destination(&corrupted, &Params::MAINNET) {
                prop_assert_ne!(other, script);
            }
        }
    }
}

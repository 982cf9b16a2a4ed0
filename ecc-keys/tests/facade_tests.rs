//! Key facade integration tests

use ecc_keys::{
    EcCurve, FacadeOptions, KeyError, KeyFacade, KeyOrigin, PrivateKeyHandle, PublicKeyHandle,
};

fn facade() -> KeyFacade {
    KeyFacade::new(FacadeOptions {
        pbkdf2_iterations: 1_000,
    })
}

#[test]
fn test_generate_all_supported_strengths() {
    let facade = facade();
    for curve in EcCurve::ALL {
        let pair = facade.generate_keypair(curve.bits()).unwrap();
        assert_ne!(pair.public.id(), 0);
        assert_ne!(pair.private.id(), 0);
        assert_eq!(facade.public_metadata(pair.public).unwrap().curve, curve);
        assert_eq!(facade.private_metadata(pair.private).unwrap().curve, curve);
    }
    assert_eq!(facade.list_public_keys().len(), EcCurve::ALL.len());
    assert_eq!(facade.list_private_keys().len(), EcCurve::ALL.len());
}

#[test]
fn test_generate_unsupported_strength() {
    let facade = facade();
    for bits in [0, 128, 255, 512, 1024] {
        assert!(matches!(
            facade.generate_keypair(bits),
            Err(KeyError::Generation(_))
        ));
    }
}

#[test]
fn test_p521_key_pair_round_trips() {
    let facade = facade();
    let pair = facade.generate_keypair(521).unwrap();

    let point = facade.marshal_public(pair.public).unwrap();
    assert_eq!(point.len(), 133);
    assert_eq!(point[0], 0x04);

    let pem = facade.encode_private_pem(pair.private, "abc").unwrap();
    let decoded = facade.decode_private_pem(&pem, "abc").unwrap();
    let derived = facade.derive_public(decoded).unwrap();
    assert_eq!(facade.marshal_public(derived).unwrap(), point);

    let restored = facade.unmarshal_public(521, &point).unwrap();
    assert_eq!(facade.public_metadata(restored).unwrap().curve, EcCurve::P521);
}

#[test]
fn test_short_digest_signs_on_wide_curves() {
    let facade = facade();
    // SHA-1 sized digest on P-384, 8 bytes on P-256
    for (bits, digest_len) in [(384, 20), (256, 8), (521, 32)] {
        let pair = facade.generate_keypair(bits).unwrap();
        let hash = vec![0xa7u8; digest_len];
        let signature = facade.sign(pair.private, &hash).unwrap();
        assert!(facade.verify(pair.public, &hash, &signature).unwrap());

        let mut other = hash.clone();
        other[digest_len - 1] ^= 1;
        assert!(!facade.verify(pair.public, &other, &signature).unwrap());
    }
}

#[test]
fn test_public_pem_round_trip_marshals_identically() {
    let facade = facade();
    let pair = facade.generate_keypair(256).unwrap();

    let pem = facade.encode_public_pem(pair.public).unwrap();
    let decoded = facade.decode_public_pem(&pem).unwrap();

    assert_ne!(decoded, pair.public);
    assert_eq!(
        facade.marshal_public(decoded).unwrap(),
        facade.marshal_public(pair.public).unwrap()
    );
    assert_eq!(
        facade.public_metadata(decoded).unwrap().origin,
        KeyOrigin::PemDecoded
    );
}

#[test]
fn test_private_pem_round_trip_with_passphrase() {
    let facade = facade();
    let pair = facade.generate_keypair(256).unwrap();

    let pem = facade.encode_private_pem(pair.private, "abc").unwrap();
    let decoded = facade.decode_private_pem(&pem, "abc").unwrap();

    let derived = facade.derive_public(decoded).unwrap();
    assert_eq!(
        facade.marshal_public(derived).unwrap(),
        facade.marshal_public(pair.public).unwrap()
    );
}

#[test]
fn test_private_pem_wrong_passphrase() {
    let facade = facade();
    let pair = facade.generate_keypair(256).unwrap();
    let pem = facade.encode_private_pem(pair.private, "abc").unwrap();
    let before = facade.list_private_keys();

    assert!(matches!(
        facade.decode_private_pem(&pem, "wrong"),
        Err(KeyError::WrongPassphrase(_))
    ));
    assert_eq!(facade.list_private_keys(), before);
}

#[test]
fn test_private_pem_without_passphrase() {
    let facade = facade();
    let pair = facade.generate_keypair(384).unwrap();

    let pem = facade.encode_private_pem(pair.private, "").unwrap();
    assert!(pem.contains("BEGIN EC PRIVATE KEY"));

    let decoded = facade.decode_private_pem(&pem, "").unwrap();
    assert_eq!(
        facade.marshal_private(decoded).unwrap(),
        facade.marshal_private(pair.private).unwrap()
    );
}

#[test]
fn test_marshal_public_is_deterministic() {
    let facade = facade();
    let pair = facade.generate_keypair(256).unwrap();
    let first = facade.marshal_public(pair.public).unwrap();
    let second = facade.marshal_public(pair.public).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_malformed_public_pem_inserts_nothing() {
    let facade = facade();
    facade.generate_keypair(256).unwrap();
    let before = facade.list_public_keys();

    let inputs = [
        "",
        "hello world",
        "-----BEGIN PUBLIC KEY-----\nnot base64!\n-----END PUBLIC KEY-----\n",
        "-----BEGIN PUBLIC KEY-----\nAAECAw==\n-----END PUBLIC KEY-----\n",
    ];
    for input in inputs {
        assert!(matches!(
            facade.decode_public_pem(input),
            Err(KeyError::MalformedPem(_))
        ));
    }
    assert_eq!(facade.list_public_keys(), before);
}

#[test]
fn test_private_pem_is_not_a_public_pem() {
    let facade = facade();
    let pair = facade.generate_keypair(256).unwrap();
    let pem = facade.encode_private_pem(pair.private, "").unwrap();
    assert!(matches!(
        facade.decode_public_pem(&pem),
        Err(KeyError::MalformedPem(_))
    ));
}

#[test]
fn test_marshal_hex_length() {
    let facade = facade();
    let pair = facade.generate_keypair(256).unwrap();
    let bytes = facade.marshal_public(pair.public).unwrap();
    let dump = hex::encode(&bytes);

    assert_eq!(bytes.len(), 65);
    assert_eq!(dump.len(), 2 * bytes.len());
    assert!(dump.starts_with("04"));
}

#[test]
fn test_unknown_handles() {
    let facade = facade();
    let public = PublicKeyHandle::from_raw(42);
    let private = PrivateKeyHandle::from_raw(42);

    assert!(matches!(facade.encode_public_pem(public), Err(KeyError::UnknownHandle(_))));
    assert!(matches!(facade.marshal_public(public), Err(KeyError::UnknownHandle(_))));
    assert!(matches!(
        facade.encode_private_pem(private, "abc"),
        Err(KeyError::UnknownHandle(_))
    ));
    assert!(matches!(facade.sign_message(private, b"m"), Err(KeyError::UnknownHandle(_))));
}

#[test]
fn test_release_invalidates_without_reuse() {
    let facade = facade();
    let pair = facade.generate_keypair(256).unwrap();

    facade.release_public(pair.public).unwrap();
    facade.release_private(pair.private).unwrap();

    assert!(matches!(facade.marshal_public(pair.public), Err(KeyError::UnknownHandle(_))));
    assert!(matches!(
        facade.release_private(pair.private),
        Err(KeyError::UnknownHandle(_))
    ));

    let next = facade.generate_keypair(256).unwrap();
    assert_ne!(next.public, pair.public);
    assert_ne!(next.private, pair.private);
    assert_eq!(facade.list_public_keys(), vec![next.public]);
}

#[test]
fn test_unmarshal_round_trips() {
    let facade = facade();
    let pair = facade.generate_keypair(384).unwrap();

    let public_bytes = facade.marshal_public(pair.public).unwrap();
    let public = facade.unmarshal_public(384, &public_bytes).unwrap();
    assert_eq!(facade.marshal_public(public).unwrap(), public_bytes);

    let private_bytes = facade.marshal_private(pair.private).unwrap();
    let private = facade.unmarshal_private(&private_bytes).unwrap();
    let signature = facade.sign_message(private, b"payload").unwrap();
    assert!(facade.verify_message(pair.public, b"payload", &signature).unwrap());
}

#[test]
fn test_unmarshal_rejects_bad_input() {
    let facade = facade();
    assert!(matches!(
        facade.unmarshal_public(512, &[4u8; 65]),
        Err(KeyError::UnsupportedCurve(512))
    ));
    assert!(matches!(
        facade.unmarshal_public(256, &[4u8; 10]),
        Err(KeyError::InvalidFormat(_))
    ));
    assert!(matches!(
        facade.unmarshal_private(b"not der"),
        Err(KeyError::InvalidFormat(_))
    ));
}

#[test]
fn test_sign_verify_through_handles() {
    let facade = facade();
    let pair = facade.generate_keypair(256).unwrap();
    let hash = [7u8; 32];

    let signature = facade.sign(pair.private, &hash).unwrap();
    assert!(facade.verify(pair.public, &hash, &signature).unwrap());
    assert!(!facade.verify(pair.public, &[8u8; 32], &signature).unwrap());
    assert!(matches!(
        facade.verify(pair.public, &hash, b"garbage"),
        Err(KeyError::InvalidFormat(_))
    ));
}

#[test]
fn test_encrypt_decrypt_through_handles() {
    let facade = facade();
    let pair = facade.generate_keypair(224).unwrap();

    let encrypted = facade.encrypt(pair.public, b"attack at dawn").unwrap();
    assert_eq!(facade.decrypt(pair.private, &encrypted).unwrap(), b"attack at dawn");
    assert!(matches!(
        facade.decrypt(pair.private, &encrypted[..20]),
        Err(KeyError::Decryption(_))
    ));
}

#[test]
fn test_seal_open_through_handles() {
    let facade = facade();
    let alice = facade.generate_keypair(256).unwrap();
    let bob = facade.generate_keypair(256).unwrap();

    let sealed = facade.seal(alice.private, bob.public, b"hello bob").unwrap();
    let opened = facade.open(bob.private, alice.public, &sealed).unwrap();
    assert_eq!(opened, b"hello bob");

    assert!(matches!(
        facade.open(bob.private, bob.public, &sealed),
        Err(KeyError::Signature(_))
    ));
}

#[test]
fn test_concurrent_generation() {
    let facade = std::sync::Arc::new(facade());
    let workers: Vec<_> = (0..4)
        .map(|_| {
            let facade = std::sync::Arc::clone(&facade);
            std::thread::spawn(move || facade.generate_keypair(256).unwrap())
        })
        .collect();

    let mut ids: Vec<u32> = workers
        .into_iter()
        .map(|worker| worker.join().unwrap().public.id())
        .collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 4);
}

mod common;

use common::{context, entry, keytab_bytes, Harness};
use std::fs;
use tempfile::TempDir;
use wallet::{keytab::FileFormatVersion, Enctype, MemoryChannel, WalletError, PROTOCOL_FAILURE};

const NAME: &str = "host/foo.example.com";
const CHECK: [&str; 4] = ["wallet", "check", "keytab", NAME];
const AUTOCREATE: [&str; 4] = ["wallet", "autocreate", "keytab", NAME];
const GET: [&str; 4] = ["wallet", "get", "keytab", NAME];

fn des_keytab() -> Vec<u8> {
    keytab_bytes(
        FileFormatVersion::V2,
        &[
            entry(NAME, 5, Enctype::AES256_CTS_HMAC_SHA1_96, &[7; 32]),
            entry(NAME, 5, Enctype::DES_CBC_CRC, &[9; 8]),
        ],
    )
}

fn aes_keytab() -> Vec<u8> {
    keytab_bytes(
        FileFormatVersion::V2,
        &[entry(NAME, 5, Enctype::AES256_CTS_HMAC_SHA1_96, &[7; 32])],
    )
}

#[test]
fn test_get_keytab_creates_object_and_writes_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("keytab");
    let data = des_keytab();
    let channel = MemoryChannel::new()
        .respond(&CHECK, 0, b"no\n")
        .respond(&AUTOCREATE, 0, b"")
        .respond(&GET, 0, &data);
    let mut harness = Harness::new(channel);

    let status = harness
        .session
        .get_keytab(&context(), NAME, Some(&path), None)
        .unwrap();
    assert_eq!(status, 0);
    assert_eq!(fs::read(&path).unwrap(), data);
    assert!(!dir.path().join("keytab.new").exists());
    assert_eq!(
        harness.command_lines(),
        vec![
            format!("wallet check keytab {}", NAME),
            format!("wallet autocreate keytab {}", NAME),
            format!("wallet get keytab {}", NAME),
        ]
    );
}

#[test]
fn test_get_keytab_keeps_backup_of_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("keytab");
    fs::write(&path, b"old keytab").unwrap();
    let data = des_keytab();
    let channel = MemoryChannel::new()
        .respond(&CHECK, 0, b"yes\n")
        .respond(&GET, 0, &data);
    let mut harness = Harness::new(channel);

    let status = harness
        .session
        .get_keytab(&context(), NAME, Some(&path), None)
        .unwrap();
    assert_eq!(status, 0);
    assert_eq!(fs::read(&path).unwrap(), data);
    assert_eq!(fs::read(dir.path().join("keytab.bak")).unwrap(), b"old keytab");
}

#[test]
fn test_failed_fetch_leaves_no_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("keytab");
    let channel = MemoryChannel::new()
        .respond(&CHECK, 0, b"yes\n")
        .respond(&GET, 1, b"");
    let mut harness = Harness::new(channel);

    let status = harness
        .session
        .get_keytab(&context(), NAME, Some(&path), None)
        .unwrap();
    assert_eq!(status, 1);
    assert!(!path.exists());
}

#[test]
fn test_empty_fetch_is_protocol_failure() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("keytab");
    let channel = MemoryChannel::new()
        .respond(&CHECK, 0, b"yes\n")
        .respond(&GET, 0, b"");
    let mut harness = Harness::new(channel);

    let status = harness
        .session
        .get_keytab(&context(), NAME, Some(&path), None)
        .unwrap();
    assert_eq!(status, PROTOCOL_FAILURE);
    assert_eq!(
        harness.err.text(),
        "wallet: no data returned by wallet server\n"
    );
    assert!(!path.exists());
}

#[test]
fn test_get_keytab_writes_srvtab() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("keytab");
    let srvtab = dir.path().join("srvtab");
    let channel = MemoryChannel::new()
        .respond(&CHECK, 0, b"yes\n")
        .respond(&GET, 0, &des_keytab());
    let mut harness = Harness::new(channel);

    let status = harness
        .session
        .get_keytab(&context(), NAME, Some(&path), Some(&srvtab))
        .unwrap();
    assert_eq!(status, 0);
    let mut expected = b"rcmd\0foo\0EXAMPLE.COM\0\x05".to_vec();
    expected.extend([9; 8]);
    assert_eq!(fs::read(&srvtab).unwrap(), expected);
}

#[test]
fn test_srvtab_failure_keeps_keytab() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("keytab");
    let srvtab = dir.path().join("srvtab");
    let data = aes_keytab();
    let channel = MemoryChannel::new()
        .respond(&CHECK, 0, b"yes\n")
        .respond(&GET, 0, &data);
    let mut harness = Harness::new(channel);

    let err = harness
        .session
        .get_keytab(&context(), NAME, Some(&path), Some(&srvtab))
        .unwrap_err();
    match err {
        WalletError::SrvtabFailed { path: failed, source } => {
            assert_eq!(failed, srvtab);
            assert!(matches!(*source, WalletError::UnsupportedEnctype { .. }));
        }
        err => panic!("unexpected error {err}"),
    }
    assert_eq!(fs::read(&path).unwrap(), data);
    assert!(!srvtab.exists());
}

#[test]
fn test_srvtab_requires_file() {
    let dir = TempDir::new().unwrap();
    let srvtab = dir.path().join("srvtab");
    let mut harness = Harness::new(MemoryChannel::new());

    let status = harness
        .session
        .get_keytab(&context(), NAME, None, Some(&srvtab))
        .unwrap();
    assert_eq!(status, 1);
    assert_eq!(
        harness.err.text(),
        "wallet: -S option requires -f also be used\n"
    );
    assert!(harness.command_lines().is_empty());
}

#[test]
fn test_get_file_to_output() {
    let channel = MemoryChannel::new()
        .respond(&["wallet", "check", "file", "secret"], 0, b"yes\n")
        .respond(&["wallet", "get", "file", "secret"], 0, b"s3cr3t");
    let mut harness = Harness::new(channel);

    let status = harness.session.get_file("file", "secret", None).unwrap();
    assert_eq!(status, 0);
    assert_eq!(harness.out.contents(), b"s3cr3t");
}

#[test]
fn test_store_sends_raw_data() {
    let data = b"line one\n\x00binary";
    let store: [&[u8]; 5] = [b"wallet", b"store", b"file", b"secret", data];
    let channel = MemoryChannel::new()
        .respond(&["wallet", "check", "file", "secret"], 0, b"no\n")
        .respond(&["wallet", "autocreate", "file", "secret"], 0, b"")
        .respond(&store, 0, b"");
    let mut harness = Harness::new(channel);

    let status = harness.session.store("file", "secret", data).unwrap();
    assert_eq!(status, 0);
    let commands = harness.session.channel().commands();
    assert_eq!(commands.len(), 3);
    assert_eq!(commands[2][4], data);
}

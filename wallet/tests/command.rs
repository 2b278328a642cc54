mod common;

use common::{Harness, SharedBuffer};
use std::{fs, os::unix::fs::PermissionsExt};
use tempfile::TempDir;
use wallet::{
    MemoryChannel, Output, RemctlCommand, Session, Stdout, StdoutMode, PROTOCOL_FAILURE,
};

const SHOW: [&str; 4] = ["wallet", "show", "keytab", "service/foo"];

#[test]
fn test_streamed_output_goes_to_output_sink() {
    let channel = MemoryChannel::new().respond(&SHOW, 0, b"details\n");
    let mut harness = Harness::new(channel);
    let result = harness
        .session
        .run_command(&SHOW, StdoutMode::Stream)
        .unwrap();
    assert!(result.success());
    assert_eq!(result.stdout, Stdout::Streamed);
    assert_eq!(harness.out.contents(), b"details\n");
}

#[test]
fn test_captured_output_is_returned() {
    let channel = MemoryChannel::new().respond(&SHOW, 0, b"details\n");
    let mut harness = Harness::new(channel);
    let result = harness
        .session
        .run_command(&SHOW, StdoutMode::Capture)
        .unwrap();
    assert!(harness.out.contents().is_empty());
    assert_eq!(result.into_data().unwrap(), b"details\n");
}

#[test]
fn test_stderr_is_prefixed_and_flagged() {
    let channel = MemoryChannel::new().reply(
        &SHOW,
        vec![
            Output::stderr(b"access denied\n"),
            Output::Status(1),
        ],
    );
    let mut harness = Harness::new(channel);
    let result = harness
        .session
        .run_command(&SHOW, StdoutMode::Stream)
        .unwrap();
    assert_eq!(result.status, 1);
    assert!(result.stderr);
    assert_eq!(harness.err.text(), "wallet: access denied\n");
}

#[test]
fn test_application_failure_keeps_server_status() {
    let channel = MemoryChannel::new().respond(&SHOW, 1, b"");
    let mut harness = Harness::new(channel);
    let result = harness
        .session
        .run_command(&SHOW, StdoutMode::Stream)
        .unwrap();
    assert_eq!(result.status, 1);
    assert!(!result.stderr);
    assert!(harness.err.contents().is_empty());
}

#[test]
fn test_refused_command_is_protocol_failure() {
    let channel = MemoryChannel::new().refuse(&SHOW, "cannot connect to wallet.example.com");
    let mut harness = Harness::new(channel);
    let result = harness
        .session
        .run_command(&SHOW, StdoutMode::Stream)
        .unwrap();
    assert_eq!(result.status, PROTOCOL_FAILURE);
    assert_eq!(
        harness.err.text(),
        "wallet: cannot connect to wallet.example.com\n"
    );
}

#[test]
fn test_broken_channel_is_protocol_failure() {
    let channel = MemoryChannel::new().break_after(
        &SHOW,
        vec![Output::stdout(b"partial")],
        "connection reset",
    );
    let mut harness = Harness::new(channel);
    let result = harness
        .session
        .run_command(&SHOW, StdoutMode::Stream)
        .unwrap();
    assert_eq!(result.status, PROTOCOL_FAILURE);
    assert_eq!(harness.out.contents(), b"partial");
    assert_eq!(harness.err.text(), "wallet: connection reset\n");
}

#[test]
fn test_server_error_is_protocol_failure() {
    let mut harness = Harness::new(MemoryChannel::new());
    let result = harness
        .session
        .run_command(&["wallet", "bogus"], StdoutMode::Stream)
        .unwrap();
    assert_eq!(result.status, PROTOCOL_FAILURE);
    assert_eq!(harness.err.text(), "wallet: Unknown command\n");
}

#[test]
fn test_done_counts_as_success() {
    let channel = MemoryChannel::new().reply(&SHOW, vec![Output::stdout(b"ok\n"), Output::Done]);
    let mut harness = Harness::new(channel);
    let result = harness
        .session
        .run_command(&SHOW, StdoutMode::Capture)
        .unwrap();
    assert_eq!(result.status, 0);
}

#[test]
fn test_binary_arguments_are_sent_unchanged() {
    let command: [&[u8]; 5] = [b"wallet", b"store", b"file", b"blob", b"\x00\xff\n"];
    let channel = MemoryChannel::new().respond(&command, 0, b"");
    let mut harness = Harness::new(channel);
    let result = harness
        .session
        .run_commandv(&command, StdoutMode::Stream)
        .unwrap();
    assert!(result.success());
    assert_eq!(harness.session.channel().commands()[0][4], b"\x00\xff\n");
}

#[test]
fn test_remctl_client_failure_is_protocol_failure() {
    let dir = TempDir::new().unwrap();
    let script = dir.path().join("remctl");
    fs::write(
        &script,
        "#!/bin/sh\n\
         echo 'remctl: cannot connect to wallet.example.com (port 4373): Connection refused' >&2\n\
         exit 1\n",
    )
    .unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

    let channel = RemctlCommand::new("wallet.example.com", 4373, None).with_program(&script);
    let err = SharedBuffer::default();
    let mut session = Session::with_streams(
        channel,
        "wallet",
        Box::new(SharedBuffer::default()),
        Box::new(err.clone()),
    );
    let result = session.run_command(&SHOW, StdoutMode::Stream).unwrap();
    assert_eq!(result.status, PROTOCOL_FAILURE);
    assert_eq!(
        err.text(),
        "wallet: remctl: cannot connect to wallet.example.com (port 4373): Connection refused\n"
    );
}

#[test]
fn test_remctl_rejects_binary_arguments() {
    let channel = RemctlCommand::new("wallet.example.com", 0, None);
    let err = SharedBuffer::default();
    let mut session = Session::with_streams(
        channel,
        "wallet",
        Box::new(SharedBuffer::default()),
        Box::new(err.clone()),
    );
    let command: [&[u8]; 5] = [b"wallet", b"store", b"file", b"blob", b"\x05\x02\x00\x00"];
    let result = session.run_commandv(&command, StdoutMode::Stream).unwrap();
    assert_eq!(result.status, PROTOCOL_FAILURE);
    assert_eq!(
        err.text(),
        "wallet: remctl client cannot send arguments containing NUL bytes\n"
    );
}

#![allow(dead_code)]

use std::{
    cell::RefCell,
    io::{self, Write},
    rc::Rc,
};
use wallet::{
    keytab::{FileFormatVersion, Kvno},
    Context, Enctype, Keyblock, Keytab, KeytabEntry, MemoryChannel, Principal, Profile, Session,
};

pub const REALM: &str = "EXAMPLE.COM";

/// An in-memory sink that stays readable after being handed to a session.
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> Vec<u8> {
        self.0.borrow().clone()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub struct Harness {
    pub session: Session<MemoryChannel>,
    pub out: SharedBuffer,
    pub err: SharedBuffer,
}

impl Harness {
    pub fn new(channel: MemoryChannel) -> Self {
        let out = SharedBuffer::default();
        let err = SharedBuffer::default();
        let session = Session::with_streams(
            channel,
            "wallet",
            Box::new(out.clone()),
            Box::new(err.clone()),
        );
        Self { session, out, err }
    }

    pub fn command_lines(&self) -> Vec<String> {
        self.session.channel().command_lines()
    }
}

pub fn context() -> Context {
    let mut context = Context::with_profile(Profile::default());
    context.set_default_realm(REALM);
    context
}

pub fn entry(name: &str, vno: Kvno, enctype: Enctype, key: &[u8]) -> KeytabEntry {
    KeytabEntry {
        principal: Principal::parse_name(name, Some(REALM.as_bytes())).unwrap(),
        timestamp: 1_700_000_000,
        vno,
        key: Keyblock {
            enctype,
            contents: key.to_vec(),
        },
    }
}

pub fn keytab_bytes(version: FileFormatVersion, entries: &[KeytabEntry]) -> Vec<u8> {
    let mut keytab = Keytab::new(version);
    for entry in entries {
        keytab.add_entry(entry.clone());
    }
    keytab.to_bytes().unwrap()
}

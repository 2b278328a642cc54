use super::KeytabEntry;
use crate::{
    error::{KRB5_KEYTAB_BADVNO, KRB5_KT_FORMAT},
    Enctype, Keyblock, NameType, Principal, Result,
};
use nom::{
    bytes::complete::take,
    number::{complete as number, Endianness},
    IResult,
};

const FILE_FIRST_BYTE: u8 = 5;
const RECORD_LENGTH_SIZE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormatVersion {
    V1 = 1,
    V2,
}

impl TryFrom<u8> for FileFormatVersion {
    type Error = crate::WalletError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Self::V1),
            2 => Ok(Self::V2),
            _ => Err(KRB5_KEYTAB_BADVNO)?,
        }
    }
}

impl FileFormatVersion {
    // Version 1 of the file format uses native byte order for integer
    // representations. Version 2 always uses big-endian byte order.
    fn endianness(self) -> Endianness {
        match self {
            Self::V1 => Endianness::Native,
            Self::V2 => Endianness::Big,
        }
    }
}

/// Records parsed out of a keytab file, plus the offset just past the last
/// record. Anything after that offset is an end marker or zero fill.
pub(super) struct Records {
    pub(super) version: FileFormatVersion,
    pub(super) entries: Vec<KeytabEntry>,
    pub(super) end: usize,
}

// There are two versions of the file format used by the FILE keytab type.
// The first byte of the file always has the value 5, and the value of the
// second byte contains the version number (1 or 2).
pub(super) fn read_version(data: &[u8]) -> Result<FileFormatVersion> {
    match data {
        [FILE_FIRST_BYTE, version, ..] => FileFormatVersion::try_from(*version),
        _ => Err(KRB5_KEYTAB_BADVNO)?,
    }
}

// After the two-byte version indicator, the file contains a sequence of
// signed 32-bit record lengths followed by key records or holes. A positive
// record length indicates a valid key entry whose size is equal to or less
// than the record length. A negative length indicates a zero-filled hole
// whose size is the inverse of the length. A length of 0 indicates the end
// of the file.
pub(super) fn read_records(data: &[u8]) -> Result<Records> {
    let version = read_version(data)?;
    let endianness = version.endianness();
    let mut position = 2;
    let mut entries = vec![];
    loop {
        let size = match number::i32::<_, nom::error::Error<&[u8]>>(endianness)(&data[position..])
        {
            Ok((_, size)) => size,
            Err(_) => break,
        };
        if size == 0 {
            break;
        }
        if size == i32::MIN {
            Err(KRB5_KT_FORMAT)?
        }
        let start = position + RECORD_LENGTH_SIZE;
        let length = size.unsigned_abs() as usize;
        let record = data.get(start..start + length).ok_or(KRB5_KT_FORMAT)?;
        if size > 0 {
            let (_, entry) = read_entry(record, version).map_err(|_| KRB5_KT_FORMAT)?;
            entries.push(entry);
        }
        position = start + length;
    }
    Ok(Records {
        version,
        entries,
        end: position,
    })
}

// Key entries use the following informal grammar:
//
// entry ::=
//     principal
//     timestamp (32 bits)
//     key version (8 bits)
//     enctype (16 bits)
//     key length (16 bits)
//     key contents
//     key version (32 bits) [in release 1.14 and later]
// principal ::=
//     count of components (16 bits) [includes realm in version 1]
//     realm (data)
//     component1 (data)
//     component2 (data)
//     ...
//     name type (32 bits) [omitted in version 1]
// data ::=
//     length (16 bits)
//     value (length bytes)
//
// The 32-bit key version overrides the 8-bit key version when at least 4
// bytes remain in the record and their value is non-zero.
fn read_entry(input: &[u8], version: FileFormatVersion) -> IResult<&[u8], KeytabEntry> {
    let endianness = version.endianness();
    let (input, principal) = read_principal(input, version)?;
    let (input, timestamp) = number::u32(endianness)(input)?;
    let (input, vno8) = number::u8(input)?;
    let (input, enctype) = number::i16(endianness)(input)?;
    let (input, contents) = read_data(input, endianness)?;
    let (input, vno) = match number::u32::<_, nom::error::Error<&[u8]>>(endianness)(input) {
        Ok((rest, vno32)) if vno32 != 0 => (rest, vno32),
        _ => (input, vno8.into()),
    };
    let entry = KeytabEntry {
        principal,
        timestamp,
        vno,
        key: Keyblock {
            enctype: Enctype(enctype.into()),
            contents: contents.to_vec(),
        },
    };
    Ok((input, entry))
}

fn read_principal(input: &[u8], version: FileFormatVersion) -> IResult<&[u8], Principal> {
    let endianness = version.endianness();
    let (input, count) = number::u16(endianness)(input)?;
    let component_count = match (count, version) {
        (count, FileFormatVersion::V1) if count > 1 => count - 1,
        (count, FileFormatVersion::V2) if count > 0 => count,
        _ => {
            return Err(nom::Err::Failure(nom::error::Error::new(
                input,
                nom::error::ErrorKind::Verify,
            )))
        }
    };
    let (mut input, realm) = read_data(input, endianness)?;
    let mut components = vec![];
    for _ in 0..component_count {
        let (rest, component) = read_data(input, endianness)?;
        components.push(component.to_vec());
        input = rest;
    }
    let (input, name_type) = match version {
        FileFormatVersion::V1 => (input, NameType::UNKNOWN),
        FileFormatVersion::V2 => {
            let (input, name_type) = number::i32(endianness)(input)?;
            (input, NameType(name_type))
        }
    };
    let principal = Principal {
        realm: realm.to_vec(),
        components,
        name_type,
    };
    Ok((input, principal))
}

fn read_data(input: &[u8], endianness: Endianness) -> IResult<&[u8], &[u8]> {
    let (input, size) = number::u16(endianness)(input)?;
    take(size)(input)
}

macro_rules! write_int {
    ($fn:ident, $type:ident) => {
        fn $fn(buf: &mut Vec<u8>, value: $type, endianness: Endianness) {
            match endianness {
                Endianness::Big => buf.extend_from_slice(&value.to_be_bytes()),
                Endianness::Little => buf.extend_from_slice(&value.to_le_bytes()),
                Endianness::Native => buf.extend_from_slice(&value.to_ne_bytes()),
            }
        }
    };
}

write_int!(write_u16, u16);
write_int!(write_i16, i16);
write_int!(write_u32, u32);
write_int!(write_i32, i32);

pub(super) fn write_header(buf: &mut Vec<u8>, version: FileFormatVersion) {
    buf.push(FILE_FIRST_BYTE);
    buf.push(version as u8);
}

/// Appends one length-prefixed record holding `entry`.
pub(super) fn write_entry(
    buf: &mut Vec<u8>,
    entry: &KeytabEntry,
    version: FileFormatVersion,
) -> Result<()> {
    let endianness = version.endianness();
    let mut record = vec![];

    let principal = &entry.principal;
    let count = match version {
        FileFormatVersion::V1 => principal.components.len() + 1,
        FileFormatVersion::V2 => principal.components.len(),
    };
    write_u16(&mut record, narrow(count)?, endianness);
    write_data(&mut record, &principal.realm, endianness)?;
    for component in &principal.components {
        write_data(&mut record, component, endianness)?;
    }
    if version == FileFormatVersion::V2 {
        write_i32(&mut record, principal.name_type.0, endianness);
    }

    write_u32(&mut record, entry.timestamp, endianness);
    // Key versions above 255 only survive in the trailing 32-bit field.
    record.push(entry.vno as u8);
    let enctype = i16::try_from(entry.key.enctype.0).map_err(|_| KRB5_KT_FORMAT)?;
    write_i16(&mut record, enctype, endianness);
    write_data(&mut record, &entry.key.contents, endianness)?;
    write_u32(&mut record, entry.vno, endianness);

    let length = i32::try_from(record.len()).map_err(|_| KRB5_KT_FORMAT)?;
    write_i32(buf, length, endianness);
    buf.extend_from_slice(&record);
    Ok(())
}

fn write_data(buf: &mut Vec<u8>, data: &[u8], endianness: Endianness) -> Result<()> {
    write_u16(buf, narrow(data.len())?, endianness);
    buf.extend_from_slice(data);
    Ok(())
}

fn narrow(length: usize) -> Result<u16> {
    Ok(u16::try_from(length).map_err(|_| KRB5_KT_FORMAT)?)
}

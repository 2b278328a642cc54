use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Enctype(pub i32);

macro_rules! enctype {
    ($enctype:ident, $int:expr) => {
        pub const $enctype: Enctype = Enctype($int);
    };
}

impl Enctype {
    enctype!(NULL, 0x0000);
    // The only enctype a srvtab can carry
    enctype!(DES_CBC_CRC, 0x0001);
    enctype!(DES_CBC_MD4, 0x0002);
    enctype!(DES_CBC_MD5, 0x0003);
    enctype!(DES3_CBC_SHA1, 0x0010);
    // RFC 3962
    enctype!(AES128_CTS_HMAC_SHA1_96, 0x0011);
    // RFC 3962
    enctype!(AES256_CTS_HMAC_SHA1_96, 0x0012);
    // RFC 8009
    enctype!(AES128_CTS_HMAC_SHA256_128, 0x0013);
    // RFC 8009
    enctype!(AES256_CTS_HMAC_SHA384_192, 0x0014);
    // RFC 4757
    enctype!(ARCFOUR_HMAC, 0x0017);
    // RFC 6803
    enctype!(CAMELLIA128_CTS_CMAC, 0x0019);
    // RFC 6803
    enctype!(CAMELLIA256_CTS_CMAC, 0x001a);

    pub fn name(self) -> Option<&'static str> {
        ENCTYPE_NAMES
            .iter()
            .find(|(enctype, _)| *enctype == self)
            .map(|(_, name)| *name)
    }
}

impl fmt::Display for Enctype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "enctype {}", self.0),
        }
    }
}

const ENCTYPE_NAMES: [(Enctype, &str); 12] = [
    (Enctype::NULL, "null"),
    (Enctype::DES_CBC_CRC, "des-cbc-crc"),
    (Enctype::DES_CBC_MD4, "des-cbc-md4"),
    (Enctype::DES_CBC_MD5, "des-cbc-md5"),
    (Enctype::DES3_CBC_SHA1, "des3-cbc-sha1"),
    (Enctype::AES128_CTS_HMAC_SHA1_96, "aes128-cts-hmac-sha1-96"),
    (Enctype::AES256_CTS_HMAC_SHA1_96, "aes256-cts-hmac-sha1-96"),
    (Enctype::AES128_CTS_HMAC_SHA256_128, "aes128-cts-hmac-sha256-128"),
    (Enctype::AES256_CTS_HMAC_SHA384_192, "aes256-cts-hmac-sha384-192"),
    (Enctype::ARCFOUR_HMAC, "arcfour-hmac"),
    (Enctype::CAMELLIA128_CTS_CMAC, "camellia128-cts-cmac"),
    (Enctype::CAMELLIA256_CTS_CMAC, "camellia256-cts-cmac"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyblock {
    pub enctype: Enctype,
    pub contents: Vec<u8>,
}

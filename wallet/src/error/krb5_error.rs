use super::{error, Krb5Error};

error!(
    KRB5_PARSE_MALFORMED,
    -1765328250, "Malformed representation of principal"
);
error!(
    KRB5_KEYTAB_BADVNO,
    -1765328171, "Unsupported key table format version number"
);
error!(
    KRB5_CONFIG_NODEFREALM,
    -1765328160, "Configuration file does not specify default realm"
);
error!(KRB5_KT_FORMAT, -1765328145, "Bad format in keytab");

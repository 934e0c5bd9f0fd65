use ciborium::value::Value;
use tracing::debug;

use crate::descriptor::checksum::add_checksum;
use crate::descriptor::types::{
    DescriptorError, HdKey, KeyExpression, KeyPath, PathComponent, ScriptExpression,
};
use crate::ur::cbor;

/// Registered CBOR tags, legacy and current numbering.
mod tags {
    pub const OUTPUT: [u64; 2] = [308, 40308];
    pub const HDKEY: [u64; 2] = [303, 40303];
    pub const KEYPATH: [u64; 2] = [304, 40304];
    pub const COININFO: [u64; 2] = [305, 40305];
    pub const ECKEY: [u64; 2] = [306, 40306];

    pub const SH: u64 = 400;
    pub const WSH: u64 = 401;
    pub const PK: u64 = 402;
    pub const PKH: u64 = 403;
    pub const WPKH: u64 = 404;
    pub const COMBO: u64 = 405;
    pub const MULTI: u64 = 406;
    pub const SORTED_MULTI: u64 = 407;
    pub const TR: u64 = 409;
}

fn map_get(map: &[(Value, Value)], key: u64) -> Option<&Value> {
    map.iter().find_map(|(k, v)| match k {
        Value::Integer(i) if u64::try_from(*i).ok() == Some(key) => Some(v),
        _ => None,
    })
}

fn as_map<'a>(value: &'a Value, what: &'static str) -> Result<&'a [(Value, Value)], DescriptorError> {
    match value {
        Value::Map(entries) => Ok(entries),
        _ => Err(DescriptorError::Expected(what)),
    }
}

fn as_uint<T: TryFrom<u64>>(value: &Value, field: &'static str) -> Result<T, DescriptorError> {
    let invalid = || DescriptorError::InvalidField { field, detail: format!("{value:?}") };
    match value {
        Value::Integer(i) => {
            let n = u64::try_from(*i).map_err(|_| invalid())?;
            T::try_from(n).map_err(|_| invalid())
        }
        _ => Err(invalid()),
    }
}

fn as_bool(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Bool(true)))
}

fn as_bytes<'a>(value: &'a Value, field: &'static str) -> Result<&'a [u8], DescriptorError> {
    match value {
        Value::Bytes(b) => Ok(b),
        _ => Err(DescriptorError::InvalidField { field, detail: "not a byte string".into() }),
    }
}

/// Tag number and content, or `None` for an untagged item.
fn untag(value: &Value) -> Option<(u64, &Value)> {
    match value {
        Value::Tag(tag, inner) => Some((*tag, inner.as_ref())),
        _ => None,
    }
}

fn expect_tag<'a>(value: &'a Value, accepted: &[u64], what: &'static str) -> Result<&'a Value, DescriptorError> {
    match untag(value) {
        Some((tag, inner)) if accepted.contains(&tag) => Ok(inner),
        Some((tag, _)) => Err(DescriptorError::UnexpectedTag(tag)),
        None => Err(DescriptorError::Expected(what)),
    }
}

fn parse_keypath(value: &Value) -> Result<KeyPath, DescriptorError> {
    let map = as_map(expect_tag(value, &tags::KEYPATH, "keypath")?, "keypath map")?;

    let mut components = Vec::new();
    if let Some(Value::Array(items)) = map_get(map, 1) {
        for pair in items.chunks(2) {
            let [step, hardened] = pair else {
                return Err(DescriptorError::InvalidField { field: "components", detail: "odd length".into() });
            };
            let hardened = matches!(hardened, Value::Bool(true));
            components.push(match step {
                Value::Integer(_) => PathComponent::Index { index: as_uint(step, "component")?, hardened },
                Value::Array(range) if range.is_empty() => PathComponent::Wildcard { hardened },
                Value::Array(range) if range.len() == 2 => PathComponent::Range {
                    low: as_uint(&range[0], "range")?,
                    high: as_uint(&range[1], "range")?,
                    hardened,
                },
                _ => {
                    return Err(DescriptorError::InvalidField {
                        field: "components",
                        detail: format!("{step:?}"),
                    })
                }
            });
        }
    }

    Ok(KeyPath {
        components,
        source_fingerprint: map_get(map, 2).map(|v| as_uint(v, "source-fingerprint")).transpose()?,
        depth: map_get(map, 3).map(|v| as_uint(v, "depth")).transpose()?,
    })
}

fn parse_hdkey(map: &[(Value, Value)]) -> Result<HdKey, DescriptorError> {
    if as_bool(map_get(map, 2)) {
        return Err(DescriptorError::PrivateKey);
    }
    let key_data = as_bytes(map_get(map, 3).ok_or(DescriptorError::MissingField("key-data"))?, "key-data")?;
    let chain_code = map_get(map, 4).map(|v| as_bytes(v, "chain-code")).transpose()?;

    let testnet = match map_get(map, 5) {
        Some(info) => {
            let info = as_map(expect_tag(info, &tags::COININFO, "coininfo")?, "coininfo map")?;
            map_get(info, 2).map(|n| as_uint::<u64>(n, "network")).transpose()? == Some(1)
        }
        None => false,
    };

    Ok(HdKey {
        key_data: key_data.to_vec(),
        chain_code: chain_code.map(<[u8]>::to_vec),
        testnet,
        origin: map_get(map, 6).map(parse_keypath).transpose()?,
        children: map_get(map, 7).map(parse_keypath).transpose()?,
        parent_fingerprint: map_get(map, 8).map(|v| as_uint(v, "parent-fingerprint")).transpose()?,
    })
}

fn parse_key(value: &Value) -> Result<KeyExpression, DescriptorError> {
    match untag(value) {
        Some((tag, inner)) if tags::HDKEY.contains(&tag) => Ok(KeyExpression::Hd(parse_hdkey(as_map(inner, "hdkey map")?)?)),
        Some((tag, inner)) if tags::ECKEY.contains(&tag) => {
            let map = as_map(inner, "eckey map")?;
            if as_bool(map_get(map, 2)) {
                return Err(DescriptorError::PrivateKey);
            }
            let data = as_bytes(map_get(map, 3).ok_or(DescriptorError::MissingField("key-data"))?, "key-data")?;
            Ok(KeyExpression::Ec(data.to_vec()))
        }
        Some((tag, _)) => Err(DescriptorError::UnexpectedTag(tag)),
        None => Err(DescriptorError::Expected("key expression")),
    }
}

fn parse_multikey(value: &Value) -> Result<(u32, Vec<KeyExpression>), DescriptorError> {
    let map = as_map(value, "multikey map")?;
    let threshold = as_uint(map_get(map, 1).ok_or(DescriptorError::MissingField("threshold"))?, "threshold")?;
    let keys = match map_get(map, 2) {
        Some(Value::Array(keys)) => keys.iter().map(parse_key).collect::<Result<Vec<_>, _>>()?,
        _ => return Err(DescriptorError::MissingField("keys")),
    };
    Ok((threshold, keys))
}

pub fn parse_script(value: &Value) -> Result<ScriptExpression, DescriptorError> {
    let (tag, inner) = untag(value).ok_or(DescriptorError::Expected("script expression"))?;
    Ok(match tag {
        tags::SH => ScriptExpression::Sh(Box::new(parse_script(inner)?)),
        tags::WSH => ScriptExpression::Wsh(Box::new(parse_script(inner)?)),
        tags::PK => ScriptExpression::Pk(parse_key(inner)?),
        tags::PKH => ScriptExpression::Pkh(parse_key(inner)?),
        tags::WPKH => ScriptExpression::Wpkh(parse_key(inner)?),
        tags::COMBO => ScriptExpression::Combo(parse_key(inner)?),
        tags::TR => ScriptExpression::Tr(parse_key(inner)?),
        tags::MULTI => {
            let (threshold, keys) = parse_multikey(inner)?;
            ScriptExpression::Multi { threshold, keys }
        }
        tags::SORTED_MULTI => {
            let (threshold, keys) = parse_multikey(inner)?;
            ScriptExpression::SortedMulti { threshold, keys }
        }
        other => return Err(DescriptorError::UnexpectedTag(other)),
    })
}

/// Text form with `@n` key placeholders: `{1: text, 2: [keys]}`.
fn render_template(map: &[(Value, Value)]) -> Result<String, DescriptorError> {
    let mut text = match map_get(map, 1) {
        Some(Value::Text(t)) => t.clone(),
        _ => return Err(DescriptorError::MissingField("source")),
    };
    let keys = match map_get(map, 2) {
        Some(Value::Array(keys)) => keys.iter().map(parse_key).collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
        Some(_) => return Err(DescriptorError::Expected("key array")),
    };
    // highest index first so `@1` never eats the prefix of `@10`
    for (i, key) in keys.iter().enumerate().rev() {
        text = text.replace(&format!("@{i}"), &key.render()?);
    }
    Ok(text)
}

/// Descriptor text, with checksum, from a fountain message.
///
/// Accepts the script expression alone (how `ur:crypto-output` carries
/// it), wrapped in the output tag, or the placeholder map form.
pub fn decode_output(message: &[u8]) -> Result<String, DescriptorError> {
    let value = cbor::from_cbor(message).map_err(|e| DescriptorError::Cbor(e.to_string()))?;

    let body = match untag(&value) {
        Some((tag, inner)) if tags::OUTPUT.contains(&tag) => inner,
        _ => &value,
    };
    let text = match body {
        Value::Map(map) => render_template(map)?,
        other => parse_script(other)?.render()?,
    };
    debug!(len = text.len(), "descriptor reconstructed");
    add_checksum(&text).ok_or(DescriptorError::Charset)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHAIN_CODE: &str = "873dff81c02f525623fd1fe5167eac3a55a049de3d314bb42ee227ffed37d508";
    const KEY: &str = "0339a36013301597daef41fbe593a02cc513d0b55527ec2df1050e2e8ff49c85c2";

    fn int(n: u64) -> Value {
        Value::Integer(n.into())
    }

    fn bytes(h: &str) -> Value {
        Value::Bytes(hex::decode(h).unwrap())
    }

    fn keypath(components: Vec<Value>, fingerprint: Option<u64>) -> Value {
        let mut map = vec![(int(1), Value::Array(components))];
        if let Some(fp) = fingerprint {
            map.push((int(2), int(fp)));
        }
        Value::Tag(304, Box::new(Value::Map(map)))
    }

    fn hdkey(origin: Value, children: Value, testnet: bool) -> Value {
        let mut map = vec![
            (int(3), bytes(KEY)),
            (int(4), bytes(CHAIN_CODE)),
            (int(6), origin),
            (int(7), children),
            (int(8), int(0x1234_5678)),
        ];
        if testnet {
            map.push((int(5), Value::Tag(305, Box::new(Value::Map(vec![(int(2), int(1))])))));
        }
        Value::Tag(303, Box::new(Value::Map(map)))
    }

    fn hardened(i: u64) -> [Value; 2] {
        [int(i), Value::Bool(true)]
    }

    #[test]
    fn single_sig_crypto_output() {
        let origin = keypath([hardened(84), hardened(0), hardened(0)].concat(), Some(0x73c5_da0a));
        let children = keypath(vec![int(0), Value::Bool(false), Value::Array(vec![]), Value::Bool(false)], None);
        let item = Value::Tag(404, Box::new(hdkey(origin, children, false)));
        let message = cbor::to_cbor(&item).unwrap();

        assert_eq!(
            decode_output(&message).unwrap(),
            "wpkh([73c5da0a/84'/0'/0']xpub6BnXfs8uoXsD16WsSQ2AehFUtUaQW6cDv1giYX2f6PcZetTVdmAx3BtZm25MV83xEoM664un3jxfLEqXteq2ocQCZL13N6oZ41jakHrUN67/0/*)#hjkl7xfk"
        );
    }

    #[test]
    fn testnet_multisig_with_multipath_children() {
        let origin = keypath([hardened(48), hardened(1), hardened(0), hardened(2)].concat(), Some(0x73c5_da0a));
        let children = keypath(
            vec![Value::Array(vec![int(0), int(1)]), Value::Bool(false), Value::Array(vec![]), Value::Bool(false)],
            None,
        );
        let ec = Value::Tag(306, Box::new(Value::Map(vec![(int(3), bytes(&format!("02{}", "11".repeat(32))))])));
        let multikey = Value::Map(vec![
            (int(1), int(2)),
            (int(2), Value::Array(vec![hdkey(origin, children, true), ec])),
        ]);
        let item = Value::Tag(
            308,
            Box::new(Value::Tag(401, Box::new(Value::Tag(407, Box::new(multikey))))),
        );
        let message = cbor::to_cbor(&item).unwrap();

        assert_eq!(
            decode_output(&message).unwrap(),
            "wsh(sortedmulti(2,[73c5da0a/48'/1'/0'/2']tpubDE3J3tUcj7VfDkz8zVzCBpV7uKi4fzuBQcvCFzZTfwg71EWpRiVhivZPK799ixSWFD5LRvkPfqGMo6ja5hhA94FqvRXueJM68pXuaKyWKfq/<0;1>/*,021111111111111111111111111111111111111111111111111111111111111111))#wtnl3d9u"
        );
    }

    #[test]
    fn placeholder_map_form() {
        let ec = Value::Tag(40306, Box::new(Value::Map(vec![(int(3), bytes(KEY))])));
        let item = Value::Tag(
            40308,
            Box::new(Value::Map(vec![
                (int(1), Value::Text("sh(wpkh(@0))".into())),
                (int(2), Value::Array(vec![ec])),
            ])),
        );
        let message = cbor::to_cbor(&item).unwrap();
        assert_eq!(
            decode_output(&message).unwrap(),
            "sh(wpkh(0339a36013301597daef41fbe593a02cc513d0b55527ec2df1050e2e8ff49c85c2))#l2x2sa9v"
        );
    }

    #[test]
    fn private_keys_and_unknown_tags_are_rejected() {
        let private = Value::Tag(404, Box::new(Value::Tag(303, Box::new(Value::Map(vec![(int(2), Value::Bool(true))])))));
        assert_eq!(decode_output(&cbor::to_cbor(&private).unwrap()), Err(DescriptorError::PrivateKey));

        let unknown = Value::Tag(499, Box::new(Value::Null));
        assert_eq!(decode_output(&cbor::to_cbor(&unknown).unwrap()), Err(DescriptorError::UnexpectedTag(499)));
    }
}

use std::fmt;

use thiserror::Error;

use crate::descriptor::base58::{encode_check, TPUB_VERSION, XPUB_VERSION};

const HARDENED: u32 = 0x8000_0000;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("invalid cbor: {0}")]
    Cbor(String),

    #[error("unexpected cbor tag {0}")]
    UnexpectedTag(u64),

    #[error("expected {0}")]
    Expected(&'static str),

    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("invalid {field}: {detail}")]
    InvalidField { field: &'static str, detail: String },

    #[error("private keys are never rendered")]
    PrivateKey,

    #[error("descriptor contains characters outside the checksum alphabet")]
    Charset,
}

/// One derivation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathComponent {
    Index { index: u32, hardened: bool },
    Wildcard { hardened: bool },
    /// Multipath `<low;high>`.
    Range { low: u32, high: u32, hardened: bool },
}

impl PathComponent {
    /// Child number as serialised in an extended key.
    pub fn child_number(&self) -> u32 {
        match *self {
            PathComponent::Index { index, hardened: true } => index | HARDENED,
            PathComponent::Index { index, hardened: false } => index,
            _ => 0,
        }
    }
}

impl fmt::Display for PathComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hardened = match *self {
            PathComponent::Index { index, hardened } => {
                write!(f, "{index}")?;
                hardened
            }
            PathComponent::Wildcard { hardened } => {
                f.write_str("*")?;
                hardened
            }
            PathComponent::Range { low, high, hardened } => {
                write!(f, "<{low};{high}>")?;
                hardened
            }
        };
        if hardened {
            f.write_str("'")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPath {
    pub components: Vec<PathComponent>,
    pub source_fingerprint: Option<u32>,
    pub depth: Option<u8>,
}

impl KeyPath {
    /// Components joined by `/`, no leading separator.
    pub fn path(&self) -> String {
        self.components.iter().map(ToString::to_string).collect::<Vec<_>>().join("/")
    }
}

/// Extended public key with optional origin and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HdKey {
    pub key_data: Vec<u8>,
    pub chain_code: Option<Vec<u8>>,
    pub testnet: bool,
    pub origin: Option<KeyPath>,
    pub children: Option<KeyPath>,
    pub parent_fingerprint: Option<u32>,
}

impl HdKey {
    /// Base58Check `xpub` / `tpub`.
    pub fn extended_key(&self) -> Result<String, DescriptorError> {
        let chain_code = self.chain_code.as_deref().ok_or(DescriptorError::MissingField("chain-code"))?;
        if chain_code.len() != 32 {
            return Err(DescriptorError::InvalidField {
                field: "chain-code",
                detail: format!("{} bytes", chain_code.len()),
            });
        }
        if self.key_data.len() != 33 {
            return Err(DescriptorError::InvalidField {
                field: "key-data",
                detail: format!("{} bytes", self.key_data.len()),
            });
        }

        let (depth, child) = match &self.origin {
            Some(origin) => {
                let depth = match origin.depth {
                    Some(d) => d,
                    None => u8::try_from(origin.components.len()).map_err(|_| DescriptorError::InvalidField {
                        field: "origin",
                        detail: "deeper than 255".into(),
                    })?,
                };
                (depth, origin.components.last().map_or(0, PathComponent::child_number))
            }
            None => (0, 0),
        };

        let mut raw = Vec::with_capacity(78);
        raw.extend_from_slice(if self.testnet { &TPUB_VERSION } else { &XPUB_VERSION });
        raw.push(depth);
        raw.extend_from_slice(&self.parent_fingerprint.unwrap_or(0).to_be_bytes());
        raw.extend_from_slice(&child.to_be_bytes());
        raw.extend_from_slice(chain_code);
        raw.extend_from_slice(&self.key_data);
        Ok(encode_check(&raw))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyExpression {
    Hd(HdKey),
    /// Bare public key bytes.
    Ec(Vec<u8>),
}

impl KeyExpression {
    /// `[fingerprint/path]key/children`.
    pub fn render(&self) -> Result<String, DescriptorError> {
        let hd = match self {
            KeyExpression::Ec(data) => return Ok(hex::encode(data)),
            KeyExpression::Hd(hd) => hd,
        };

        let mut out = String::new();
        if let Some(origin) = &hd.origin {
            out.push('[');
            if let Some(fp) = origin.source_fingerprint {
                out.push_str(&format!("{fp:08x}"));
            }
            if !origin.components.is_empty() {
                if origin.source_fingerprint.is_some() {
                    out.push('/');
                }
                out.push_str(&origin.path());
            }
            out.push(']');
        }
        out.push_str(&hd.extended_key()?);
        if let Some(children) = &hd.children {
            if !children.components.is_empty() {
                out.push('/');
                out.push_str(&children.path());
            }
        }
        Ok(out)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptExpression {
    Sh(Box<ScriptExpression>),
    Wsh(Box<ScriptExpression>),
    Pk(KeyExpression),
    Pkh(KeyExpression),
    Wpkh(KeyExpression),
    Combo(KeyExpression),
    Multi { threshold: u32, keys: Vec<KeyExpression> },
    SortedMulti { threshold: u32, keys: Vec<KeyExpression> },
    Tr(KeyExpression),
}

impl ScriptExpression {
    /// Descriptor text without checksum.
    pub fn render(&self) -> Result<String, DescriptorError> {
        let multi = |name: &str, threshold: u32, keys: &[KeyExpression]| -> Result<String, DescriptorError> {
            let keys = keys.iter().map(KeyExpression::render).collect::<Result<Vec<_>, _>>()?;
            Ok(format!("{name}({threshold},{})", keys.join(",")))
        };
        Ok(match self {
            ScriptExpression::Sh(inner) => format!("sh({})", inner.render()?),
            ScriptExpression::Wsh(inner) => format!("wsh({})", inner.render()?),
            ScriptExpression::Pk(key) => format!("pk({})", key.render()?),
            ScriptExpression::Pkh(key) => format!("pkh({})", key.render()?),
            ScriptExpression::Wpkh(key) => format!("wpkh({})", key.render()?),
            ScriptExpression::Combo(key) => format!("combo({})", key.render()?),
            ScriptExpression::Tr(key) => format!("tr({})", key.render()?),
            ScriptExpression::Multi { threshold, keys } => multi("multi", *threshold, keys)?,
            ScriptExpression::SortedMulti { threshold, keys } => multi("sortedmulti", *threshold, keys)?,
        })
    }
}

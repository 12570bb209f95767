use alloc::{
    string::{String, ToString as _},
    vec::Vec,
};
use core::{fmt, str::FromStr};

use msgpacker::{MsgPacker, Packable as _, Unpackable as _};
use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};

use crate::{Hash, HASH_LEN, WORD_SIZE};

/// An ABI function selector.
pub type Selector = [u8; WORD_SIZE];

/// Computes the selector of a function signature such as `store_value(u64)`.
///
/// The first 4 bytes of the sha256 digest are right-aligned into a word.
pub fn selector(signature: &str) -> Selector {
    let digest = Sha256::digest(signature.as_bytes());
    let mut selector = Selector::default();

    selector[4..].copy_from_slice(&digest[..4]);

    selector
}

/// The type of an ABI parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ParamType {
    /// The empty type `()`.
    Unit,
    /// An unsigned 8-bit integer.
    U8,
    /// An unsigned 16-bit integer.
    U16,
    /// An unsigned 32-bit integer.
    U32,
    /// An unsigned 64-bit integer.
    U64,
    /// A boolean.
    Bool,
    /// A 256-bit opaque value.
    B256,
}

impl ParamType {
    /// Returns the canonical ABI type string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ParamType::Unit => "()",
            ParamType::U8 => "u8",
            ParamType::U16 => "u16",
            ParamType::U32 => "u32",
            ParamType::U64 => "u64",
            ParamType::Bool => "bool",
            ParamType::B256 => "b256",
        }
    }

    /// Returns the length of the encoded type.
    pub const fn encoding_len(&self) -> usize {
        match self {
            ParamType::Unit => 0,
            ParamType::B256 => HASH_LEN,
            _ => WORD_SIZE,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParamType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "()" => ParamType::Unit,
            "u8" => ParamType::U8,
            "u16" => ParamType::U16,
            "u32" => ParamType::U32,
            "u64" => ParamType::U64,
            "bool" => ParamType::Bool,
            "b256" => ParamType::B256,
            t => anyhow::bail!("unsupported ABI type `{t}`"),
        })
    }
}

/// A typed ABI value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Token {
    /// The empty value.
    Unit,
    /// An unsigned 8-bit integer.
    U8(u8),
    /// An unsigned 16-bit integer.
    U16(u16),
    /// An unsigned 32-bit integer.
    U32(u32),
    /// An unsigned 64-bit integer.
    U64(u64),
    /// A boolean.
    Bool(bool),
    /// A 256-bit opaque value.
    B256(Hash),
}

impl Token {
    /// Returns the type of the token.
    pub const fn param_type(&self) -> ParamType {
        match self {
            Token::Unit => ParamType::Unit,
            Token::U8(_) => ParamType::U8,
            Token::U16(_) => ParamType::U16,
            Token::U32(_) => ParamType::U32,
            Token::U64(_) => ParamType::U64,
            Token::Bool(_) => ParamType::Bool,
            Token::B256(_) => ParamType::B256,
        }
    }
}

/// A named, typed parameter of an ABI function.
#[derive(
    Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, MsgPacker,
)]
pub struct AbiParameter {
    /// Parameter name; empty for outputs.
    pub name: String,

    /// ABI type string, such as `u64`.
    #[serde(rename = "type")]
    pub type_field: String,
}

impl AbiParameter {
    /// Creates a new parameter.
    pub fn new<N: Into<String>>(name: N, ty: ParamType) -> Self {
        Self {
            name: name.into(),
            type_field: ty.as_str().to_string(),
        }
    }

    /// Parses the parameter type.
    pub fn param_type(&self) -> anyhow::Result<ParamType> {
        self.type_field.parse()
    }
}

/// An externally callable function of a contract.
#[derive(
    Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, MsgPacker,
)]
pub struct AbiFunction {
    /// Function name.
    pub name: String,

    /// Ordered function inputs.
    pub inputs: Vec<AbiParameter>,

    /// Function output.
    pub output: AbiParameter,
}

impl AbiFunction {
    /// Creates a new function definition.
    pub fn new<N: Into<String>>(name: N, inputs: Vec<AbiParameter>, output: ParamType) -> Self {
        Self {
            name: name.into(),
            inputs,
            output: AbiParameter::new("", output),
        }
    }

    /// Returns the parsed input types.
    pub fn input_types(&self) -> anyhow::Result<Vec<ParamType>> {
        self.inputs.iter().map(AbiParameter::param_type).collect()
    }

    /// Returns the parsed output type.
    pub fn output_type(&self) -> anyhow::Result<ParamType> {
        self.output.param_type()
    }

    /// Computes the canonical signature, such as `store_value(u64)`.
    pub fn signature(&self) -> anyhow::Result<String> {
        let inputs = self
            .input_types()?
            .iter()
            .map(ParamType::as_str)
            .collect::<Vec<_>>()
            .join(",");

        Ok(alloc::format!("{}({inputs})", self.name))
    }

    /// Computes the function selector.
    pub fn selector(&self) -> anyhow::Result<Selector> {
        self.signature().map(|s| selector(&s))
    }
}

/// The declared set of externally callable functions of a program.
#[derive(
    Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, MsgPacker,
)]
pub struct ProgramAbi {
    /// Declared functions.
    pub functions: Vec<AbiFunction>,
}

impl ProgramAbi {
    /// Returns the function with the provided name, if declared.
    pub fn function(&self, name: &str) -> Option<&AbiFunction> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// Returns the function matching the provided selector, if declared.
    pub fn resolve(&self, selector: &Selector) -> anyhow::Result<Option<&AbiFunction>> {
        for f in &self.functions {
            if &f.selector()? == selector {
                return Ok(Some(f));
            }
        }

        Ok(None)
    }

    /// Encodes the packed ABI into prefixed hex.
    pub fn to_hex(&self) -> String {
        let bytes = self.pack_to_vec();

        const_hex::encode_prefixed(bytes)
    }

    /// Try to parse the packed ABI from a hex string.
    pub fn try_from_hex<H: AsRef<str>>(hex: H) -> anyhow::Result<Self> {
        let hex = hex.as_ref();
        let hex = hex.strip_prefix("0x").unwrap_or(hex);
        let bytes =
            const_hex::decode(hex).map_err(|e| anyhow::anyhow!("failed to decode hex: {e}"))?;

        Ok(Self::unpack(&bytes)
            .map_err(|e| anyhow::anyhow!("failed to unpack ABI: {e}"))?
            .1)
    }
}

#[test]
fn selector_is_right_aligned_digest_prefix() {
    let s = selector("store_value(u64)");
    let digest = Sha256::digest(b"store_value(u64)");

    assert_eq!(&s[..4], &[0u8; 4]);
    assert_eq!(&s[4..], &digest[..4]);
    assert_ne!(s, selector("store_value(u32)"));
}

#[test]
fn function_signature_uses_canonical_types() {
    let f = AbiFunction::new(
        "store_value",
        alloc::vec![AbiParameter::new("val", ParamType::U64)],
        ParamType::Unit,
    );

    assert_eq!(f.signature().unwrap(), "store_value(u64)");
    assert_eq!(f.selector().unwrap(), selector("store_value(u64)"));
    assert_eq!(f.output_type().unwrap(), ParamType::Unit);
}

#[test]
fn program_abi_parses_from_json() {
    let json = r#"{
        "functions": [
            {
                "name": "store_value",
                "inputs": [{ "name": "val", "type": "u64" }],
                "output": { "name": "", "type": "()" }
            }
        ]
    }"#;

    let abi: ProgramAbi = serde_json::from_str(json).unwrap();
    let f = abi.function("store_value").unwrap();

    assert_eq!(f.input_types().unwrap(), alloc::vec![ParamType::U64]);
    assert_eq!(abi.resolve(&selector("store_value(u64)")).unwrap(), Some(f));
    assert_eq!(abi.resolve(&[0xff; WORD_SIZE]).unwrap(), None);
}

#[test]
fn program_abi_packs_to_hex() {
    let abi = ProgramAbi {
        functions: alloc::vec![AbiFunction::new(
            "store_value",
            alloc::vec![AbiParameter::new("val", ParamType::U64)],
            ParamType::Unit,
        )],
    };

    let hex = abi.to_hex();
    let parsed = ProgramAbi::try_from_hex(&hex).unwrap();

    assert!(hex.starts_with("0x"));
    assert_eq!(parsed, abi);
    assert_eq!(
        parsed.resolve(&selector("store_value(u64)")).unwrap(),
        abi.function("store_value")
    );
    assert!(ProgramAbi::try_from_hex(&hex[..hex.len() - 4]).is_err());
    assert!(ProgramAbi::try_from_hex("0xzz").is_err());
}

#[test]
fn unsupported_types_are_rejected() {
    assert!("str[4]".parse::<ParamType>().is_err());
    assert!(AbiParameter {
        name: "x".into(),
        type_field: "struct Foo".into(),
    }
    .param_type()
    .is_err());
}

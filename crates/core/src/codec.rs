use crate::{CodecError, Hash, ParamType, Token, HASH_LEN, WORD_SIZE};

/// Encodes ABI tokens.
///
/// Integers and booleans are right-aligned big-endian words, `b256` values are raw 32 bytes
/// and the unit value is empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct AbiEncoder;

impl AbiEncoder {
    /// Encodes the tokens, in order.
    pub fn encode(tokens: &[Token]) -> Vec<u8> {
        let mut bytes =
            Vec::with_capacity(tokens.iter().map(|t| t.param_type().encoding_len()).sum());

        for t in tokens {
            match t {
                Token::Unit => (),
                Token::U8(v) => bytes.extend((*v as u64).to_be_bytes()),
                Token::U16(v) => bytes.extend((*v as u64).to_be_bytes()),
                Token::U32(v) => bytes.extend((*v as u64).to_be_bytes()),
                Token::U64(v) => bytes.extend(v.to_be_bytes()),
                Token::Bool(v) => bytes.extend((*v as u64).to_be_bytes()),
                Token::B256(v) => bytes.extend(v),
            }
        }

        bytes
    }
}

/// Decodes ABI tokens.
#[derive(Debug, Default, Clone, Copy)]
pub struct AbiDecoder;

impl AbiDecoder {
    /// Decodes the bytes into tokens of the provided types.
    ///
    /// The bytes must have exactly the encoded length of the types; values must be canonical.
    pub fn decode(types: &[ParamType], bytes: &[u8]) -> Result<Vec<Token>, CodecError> {
        let expected = types.iter().map(ParamType::encoding_len).sum();

        if bytes.len() != expected {
            return Err(CodecError::Length {
                expected,
                found: bytes.len(),
            });
        }

        let mut tokens = Vec::with_capacity(types.len());
        let mut offset = 0;

        for ty in types {
            let len = ty.encoding_len();
            let chunk = &bytes[offset..offset + len];

            offset += len;

            let token = match ty {
                ParamType::Unit => Token::Unit,
                ParamType::B256 => {
                    let mut value = Hash::default();

                    value.copy_from_slice(&chunk[..HASH_LEN]);

                    Token::B256(value)
                }
                ParamType::U8 => Token::U8(Self::narrow(*ty, Self::word(chunk), u8::MAX)? as u8),
                ParamType::U16 => {
                    Token::U16(Self::narrow(*ty, Self::word(chunk), u16::MAX)? as u16)
                }
                ParamType::U32 => {
                    Token::U32(Self::narrow(*ty, Self::word(chunk), u32::MAX)? as u32)
                }
                ParamType::U64 => Token::U64(Self::word(chunk)),
                ParamType::Bool => match Self::word(chunk) {
                    0 => Token::Bool(false),
                    1 => Token::Bool(true),
                    w => return Err(CodecError::InvalidBool(w)),
                },
            };

            tokens.push(token);
        }

        Ok(tokens)
    }

    fn word(chunk: &[u8]) -> u64 {
        let mut word = [0u8; WORD_SIZE];

        word.copy_from_slice(&chunk[..WORD_SIZE]);

        u64::from_be_bytes(word)
    }

    fn narrow<M: Into<u64>>(ty: ParamType, value: u64, max: M) -> Result<u64, CodecError> {
        if value > max.into() {
            return Err(CodecError::Overflow { ty, value });
        }

        Ok(value)
    }
}

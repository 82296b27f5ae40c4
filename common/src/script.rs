use crate::{
    crypto::blake2b_224,
    hash::{AddrKeyhash, PolicyId},
};

/// Tag prepended to native script bytes before hashing
const NATIVE_SCRIPT_TAG: u8 = 0;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub enum NativeScript {
    ScriptPubkey(AddrKeyhash),
    ScriptAll(Vec<NativeScript>),
    ScriptAny(Vec<NativeScript>),
    ScriptNOfK(u32, Vec<NativeScript>),
    InvalidBefore(u64),
    InvalidHereafter(u64),
}

impl NativeScript {
    /// `all [sig key_hash]`, the policy the minter creates for itself
    pub fn single_signer(key_hash: AddrKeyhash) -> Self {
        NativeScript::ScriptAll(vec![NativeScript::ScriptPubkey(key_hash)])
    }

    pub fn to_cbor(&self) -> Vec<u8> {
        // Writing into a Vec cannot fail
        minicbor::to_vec(self).unwrap_or_default()
    }

    /// Script hash, which is the policy id of anything it mints
    pub fn policy_id(&self) -> PolicyId {
        let mut tagged = vec![NATIVE_SCRIPT_TAG];
        tagged.extend(self.to_cbor());
        blake2b_224(&tagged)
    }

    /// Key hashes whose signatures this script can require
    pub fn key_hashes(&self) -> Vec<AddrKeyhash> {
        match self {
            NativeScript::ScriptPubkey(hash) => vec![*hash],
            NativeScript::ScriptAll(scripts)
            | NativeScript::ScriptAny(scripts)
            | NativeScript::ScriptNOfK(_, scripts) => {
                scripts.iter().flat_map(NativeScript::key_hashes).collect()
            }
            NativeScript::InvalidBefore(_) | NativeScript::InvalidHereafter(_) => Vec::new(),
        }
    }
}

impl<'b, C> minicbor::decode::Decode<'b, C> for NativeScript {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, minicbor::decode::Error> {
        let size = d.array()?;
        let expect = |expected: u64| match size {
            Some(actual) if actual == expected => Ok(()),
            _ => Err(minicbor::decode::Error::message("unexpected array size in NativeScript")),
        };

        match d.u32()? {
            0 => {
                expect(2)?;
                Ok(NativeScript::ScriptPubkey(d.decode_with(ctx)?))
            }
            1 => {
                expect(2)?;
                Ok(NativeScript::ScriptAll(d.decode_with(ctx)?))
            }
            2 => {
                expect(2)?;
                Ok(NativeScript::ScriptAny(d.decode_with(ctx)?))
            }
            3 => {
                expect(3)?;
                Ok(NativeScript::ScriptNOfK(d.decode_with(ctx)?, d.decode_with(ctx)?))
            }
            4 => {
                expect(2)?;
                Ok(NativeScript::InvalidBefore(d.decode_with(ctx)?))
            }
            5 => {
                expect(2)?;
                Ok(NativeScript::InvalidHereafter(d.decode_with(ctx)?))
            }
            _ => Err(minicbor::decode::Error::message("unknown variant id for native script")),
        }
    }
}

impl<C> minicbor::encode::Encode<C> for NativeScript {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        match self {
            NativeScript::ScriptPubkey(hash) => {
                e.array(2)?.u8(0)?;
                e.encode_with(hash, ctx)?;
            }
            NativeScript::ScriptAll(scripts) => {
                e.array(2)?.u8(1)?;
                e.encode_with(scripts, ctx)?;
            }
            NativeScript::ScriptAny(scripts) => {
                e.array(2)?.u8(2)?;
                e.encode_with(scripts, ctx)?;
            }
            NativeScript::ScriptNOfK(n, scripts) => {
                e.array(3)?.u8(3)?.u32(*n)?;
                e.encode_with(scripts, ctx)?;
            }
            NativeScript::InvalidBefore(slot) => {
                e.array(2)?.u8(4)?.u64(*slot)?;
            }
            NativeScript::InvalidHereafter(slot) => {
                e.array(2)?.u8(5)?.u64(*slot)?;
            }
        }
        Ok(())
    }
}

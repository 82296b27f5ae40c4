use std::collections::BTreeMap;

use crate::{asset::AssetName, hash::PolicyId};

/// Transaction metadata label for CIP-25 NFT metadata
pub const CIP25_LABEL: MetadatumLabel = 721;

pub type MetadatumLabel = u64;

pub type Metadata = BTreeMap<MetadatumLabel, Metadatum>;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Metadatum {
    Int(i64),
    Bytes(Vec<u8>),
    Text(String),
    Array(Vec<Metadatum>),
    Map(Vec<(Metadatum, Metadatum)>),
}

impl Metadatum {
    fn text(s: &str) -> Self {
        Metadatum::Text(s.to_string())
    }
}

/// `721 => { policy_hex => { asset_name => { "name" => asset_name } } }`
pub fn cip25_metadata(policy_id: &PolicyId, asset_name: &AssetName) -> Metadata {
    let name = match asset_name.as_utf8() {
        Some(text) => text.to_string(),
        None => asset_name.to_string(),
    };
    let asset = Metadatum::Map(vec![(Metadatum::text("name"), Metadatum::text(&name))]);
    let assets = Metadatum::Map(vec![(Metadatum::text(&name), asset)]);
    let policies = Metadatum::Map(vec![(Metadatum::Text(policy_id.to_string()), assets)]);
    BTreeMap::from([(CIP25_LABEL, policies)])
}

impl<C> minicbor::Encode<C> for Metadatum {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        match self {
            Metadatum::Int(n) => {
                e.i64(*n)?;
            }
            Metadatum::Bytes(bytes) => {
                e.bytes(bytes)?;
            }
            Metadatum::Text(text) => {
                e.str(text)?;
            }
            Metadatum::Array(items) => {
                e.array(items.len() as u64)?;
                for item in items {
                    e.encode_with(item, ctx)?;
                }
            }
            Metadatum::Map(entries) => {
                e.map(entries.len() as u64)?;
                for (key, value) in entries {
                    e.encode_with(key, ctx)?.encode_with(value, ctx)?;
                }
            }
        }
        Ok(())
    }
}

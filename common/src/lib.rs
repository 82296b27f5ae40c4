// Minter common library - main library exports

pub mod address;
pub mod asset;
pub mod commands;
pub mod configuration;
pub mod crypto;
pub mod hash;
pub mod messages;
pub mod metadata;
pub mod protocol_params;
pub mod rest_error;
pub mod rest_helper;
pub mod script;
pub mod tx;
pub mod utxo;

// Flattened re-exports
pub use self::address::{Address, AddressNetwork};
pub use self::asset::{AssetName, AssetUnit, NativeAsset, Value};
pub use self::hash::{Hash, PolicyId, TxHash};
pub use self::protocol_params::ProtocolParams;
pub use self::utxo::{Amount, UTxOIdentifier, Utxo};

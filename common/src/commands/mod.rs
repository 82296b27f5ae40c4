pub mod minting;

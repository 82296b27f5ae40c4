mod error;
mod submitted;
mod tx;
mod value;
mod witness;

pub use error::*;
pub use submitted::*;
pub use tx::*;
pub use value::encode_output;

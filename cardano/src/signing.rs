//! Signing of transactions built here

use minter_codec::{CodecError, encode_body, transaction_id};
use minter_common::{TxHash, crypto::SigningKey, tx::{Transaction, VKeyWitness}};
use tracing::debug;

/// Add a vkey witness from each key, in order, over the current body.
/// Returns the id that was signed.
pub fn sign_transaction(tx: &mut Transaction, keys: &[&SigningKey]) -> Result<TxHash, CodecError> {
    let id = transaction_id(&encode_body(&tx.body)?);
    for key in keys {
        debug!("Signing {id} with key {}", key.key_hash());
        tx.witnesses.add_vkey(VKeyWitness::create(key, &id));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use minter_common::tx::TransactionBody;

    #[test]
    fn witnesses_follow_key_order_and_verify() {
        let first = SigningKey::from_seed([1; 32]);
        let second = SigningKey::from_seed([2; 32]);
        let mut tx = Transaction::new(TransactionBody {
            fee: 10,
            ..Default::default()
        });

        let id = sign_transaction(&mut tx, &[&first, &second]).unwrap();

        let vkeys: Vec<_> = tx.witnesses.vkeys.iter().map(|w| w.vkey).collect();
        assert_eq!(vkeys, vec![first.verification_key(), second.verification_key()]);
        assert!(tx.witnesses.vkeys.iter().all(|w| w.verifies(&id)));
    }

    #[test]
    fn resigning_replaces_stale_witnesses() {
        let key = SigningKey::from_seed([1; 32]);
        let mut tx = Transaction::new(TransactionBody::default());
        sign_transaction(&mut tx, &[&key]).unwrap();

        tx.body.fee = 99;
        let id = sign_transaction(&mut tx, &[&key]).unwrap();

        assert_eq!(tx.witnesses.vkeys.len(), 1);
        assert!(tx.witnesses.vkeys[0].verifies(&id));
    }
}

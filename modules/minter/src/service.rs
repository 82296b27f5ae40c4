//! Minting service: builds mints for payers and submits the signed results

use std::sync::Arc;

use dashu_int::UBig;
use minter_cardano::{
    backend::{BackendError, ChainBackend},
    builder::{DepositStatus, MintRequest, TransactionBuilder},
    error::BuildError,
};
use minter_codec::{CodecError, SubmittedTransaction, ledger_check};
use minter_common::{
    Address, AddressNetwork, AssetName, TxHash, address::AddressError, rest_error::RESTError,
};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    keystore::Keystore,
    registry::{MintRegistry, RegistryError},
};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Already minted for context {0}")]
    AlreadyMinted(String),

    #[error("Invalid payer address: {0}")]
    Address(#[from] AddressError),

    #[error("Payer address is for the {0:?} network")]
    WrongNetwork(AddressNetwork),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("Invalid transaction: {0}")]
    Serialization(#[from] CodecError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl From<ServiceError> for RESTError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::AlreadyMinted(context_id) => RESTError::already_minted(&context_id),
            ServiceError::Address(_)
            | ServiceError::WrongNetwork(_)
            | ServiceError::Serialization(_)
            | ServiceError::Registry(RegistryError::InvalidContextId(_)) => {
                RESTError::BadRequest(error.to_string())
            }
            _ => RESTError::InternalServerError(error.to_string()),
        }
    }
}

/// Minting settings that do not come from the keystore
#[derive(Debug, Clone)]
pub struct MintSettings {
    pub network: AddressNetwork,
    pub asset_name: AssetName,
    pub transfer_amount: u64,
    pub allow_deposit_shortfall: bool,
}

pub struct MinterService {
    backend: Arc<dyn ChainBackend>,
    builder: TransactionBuilder,
    keystore: Keystore,
    registry: MintRegistry,
    settings: MintSettings,
}

impl MinterService {
    pub fn new(
        backend: Arc<dyn ChainBackend>,
        builder: TransactionBuilder,
        keystore: Keystore,
        registry: MintRegistry,
        settings: MintSettings,
    ) -> Self {
        Self {
            backend,
            builder,
            keystore,
            registry,
            settings,
        }
    }

    pub async fn already_minted(&self, context_id: &str) -> Result<bool, ServiceError> {
        Ok(self.registry.already_minted(context_id).await?)
    }

    async fn ensure_not_minted(&self, context_id: &str) -> Result<(), ServiceError> {
        if let Some(id) = self.registry.minted_id(context_id).await? {
            info!("Context {context_id} already minted in {id}");
            return Err(ServiceError::AlreadyMinted(context_id.to_string()));
        }
        Ok(())
    }

    /// Build a minting transaction paid for by `payer`, returned as hex CBOR
    /// for the payer's wallet to sign
    pub async fn create_transaction(
        &self,
        payer: &str,
        context_id: &str,
    ) -> Result<String, ServiceError> {
        self.ensure_not_minted(context_id).await?;

        let payer: Address = payer.parse()?;
        if payer.network() != self.settings.network {
            return Err(ServiceError::WrongNetwork(payer.network()));
        }

        let request = MintRequest {
            payer,
            asset_name: self.settings.asset_name,
            quantity: UBig::from(1u64),
            transfer_amount: self.settings.transfer_amount,
            policy: &self.keystore.policy,
            co_signers: std::slice::from_ref(&self.keystore.account),
        };
        let built = self.builder.build(&request).await?;

        if let DepositStatus::Shortfall {
            required,
            available,
        } = &built.deposit
        {
            if !self.settings.allow_deposit_shortfall {
                return Err(BuildError::DepositShortfall {
                    required: *required,
                    available: available.clone(),
                }
                .into());
            }
            warn!("Returning mint for context {context_id} despite a deposit shortfall");
        }

        info!("Created mint for context {context_id} with fee {}", built.fee);
        Ok(built.to_hex().map_err(BuildError::from)?)
    }

    /// Add the policy and account witnesses to a payer-signed transaction and
    /// submit it. `None` when the backend refuses the transaction.
    pub async fn submit_transaction(
        &self,
        cbor_hex: &str,
        context_id: &str,
    ) -> Result<Option<TxHash>, ServiceError> {
        self.ensure_not_minted(context_id).await?;

        let mut transaction = SubmittedTransaction::from_hex(cbor_hex)?;
        transaction.sign(&self.keystore.policy.key);
        transaction.sign(&self.keystore.account);
        transaction.is_valid = true;

        let bytes = transaction.to_bytes()?;
        let expected = ledger_check(&bytes)?;

        match self.backend.submit_transaction(&bytes).await {
            Ok(id) => {
                if id != expected {
                    warn!("Backend reported id {id} for transaction {expected}");
                }
                self.registry.record(context_id, &id).await?;
                info!("Submitted {id} for context {context_id}");
                Ok(Some(id))
            }
            Err(BackendError::Status { code, body }) => {
                warn!("Submission of {expected} refused with status {code}: {body}");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use minter_cardano::{
        builder::FUNDING_MARGIN, in_memory_backend::InMemoryBackend, policy::MintingPolicy,
    };
    use minter_common::{
        Amount, ProtocolParams, UTxOIdentifier, Utxo, crypto::SigningKey, tx::VKeyWitness,
    };
    use tempfile::TempDir;

    pub(crate) struct Fixture {
        _dir: TempDir,
        pub backend: Arc<InMemoryBackend>,
        pub service: MinterService,
        pub payer_key: SigningKey,
        pub payer: Address,
    }

    pub(crate) async fn fixture(lovelace: &[u64], allow_deposit_shortfall: bool) -> Fixture {
        let dir = TempDir::new().unwrap();
        let payer_key = SigningKey::from_seed([8; 32]);
        let payer = Address::enterprise(AddressNetwork::Test, &*payer_key.key_hash());

        let backend = Arc::new(InMemoryBackend::new(ProtocolParams::default(), 50_000));
        for (index, quantity) in lovelace.iter().enumerate() {
            backend
                .add_utxo(Utxo {
                    id: UTxOIdentifier::new(TxHash::new([0x33; 32]), index as u32),
                    address: payer.clone(),
                    amounts: vec![Amount::lovelace(*quantity)],
                    data_hash: None,
                })
                .await;
        }

        let keystore = Keystore {
            account: SigningKey::from_seed([6; 32]),
            policy: MintingPolicy::single_signer(SigningKey::from_seed([7; 32])),
        };
        let service = MinterService::new(
            backend.clone(),
            TransactionBuilder::new(backend.clone()).with_estimation_signers(1),
            keystore,
            MintRegistry::new(dir.path()).unwrap(),
            MintSettings {
                network: AddressNetwork::Test,
                asset_name: AssetName::new(b"test").unwrap(),
                transfer_amount: 0,
                allow_deposit_shortfall,
            },
        );

        Fixture {
            _dir: dir,
            backend,
            service,
            payer_key,
            payer,
        }
    }

    /// What the payer's wallet does with the built transaction
    pub(crate) fn wallet_sign(cbor_hex: &str, key: &SigningKey) -> String {
        let mut tx = SubmittedTransaction::from_hex(cbor_hex).unwrap();
        tx.sign(key);
        hex::encode(tx.to_bytes().unwrap())
    }

    #[tokio::test]
    async fn create_sign_submit_and_refuse_a_second_time() {
        let f = fixture(&[10_000_000], false).await;

        let cbor_hex = f.service.create_transaction(&f.payer.to_string(), "7").await.unwrap();
        let signed = wallet_sign(&cbor_hex, &f.payer_key);
        let id = f.service.submit_transaction(&signed, "7").await.unwrap();

        let submitted = f.backend.submitted().await;
        assert_eq!(submitted.len(), 1);
        let tx = SubmittedTransaction::from_bytes(&submitted[0]).unwrap();
        assert_eq!(id, Some(tx.id()));
        assert!(tx.is_valid);

        // payer, account and policy, each once and each over the body
        assert_eq!(tx.witnesses.vkeys.len(), 3);
        assert!(tx.witnesses.vkeys.iter().all(|w: &VKeyWitness| w.verifies(&tx.id())));

        assert!(f.service.already_minted("7").await.unwrap());
        assert!(matches!(
            f.service.create_transaction(&f.payer.to_string(), "7").await,
            Err(ServiceError::AlreadyMinted(_))
        ));
        assert!(matches!(
            f.service.submit_transaction(&signed, "7").await,
            Err(ServiceError::AlreadyMinted(_))
        ));
    }

    #[tokio::test]
    async fn refused_submission_is_none_and_not_recorded() {
        let f = fixture(&[10_000_000], false).await;
        let cbor_hex = f.service.create_transaction(&f.payer.to_string(), "8").await.unwrap();
        f.backend.reject_submissions(400).await;

        let id = f.service.submit_transaction(&cbor_hex, "8").await.unwrap();

        assert_eq!(id, None);
        assert!(!f.service.already_minted("8").await.unwrap());
    }

    #[tokio::test]
    async fn malformed_submissions_are_serialization_errors() {
        let f = fixture(&[10_000_000], false).await;
        for bad in ["zz", "80", ""] {
            let result = f.service.submit_transaction(bad, "9").await;
            let error = result.unwrap_err();
            assert!(matches!(error, ServiceError::Serialization(_)));
            assert_eq!(RESTError::from(error).status_code(), 400);
        }
    }

    #[tokio::test]
    async fn empty_wallet_is_insufficient_balance() {
        let f = fixture(&[], false).await;
        let result = f.service.create_transaction(&f.payer.to_string(), "1").await;
        assert!(matches!(
            result,
            Err(ServiceError::Build(BuildError::InsufficientBalance { required, .. }))
                if required == FUNDING_MARGIN
        ));
    }

    #[tokio::test]
    async fn deposit_shortfall_depends_on_configuration() {
        let strict = fixture(&[1_500_000], false).await;
        assert!(matches!(
            strict.service.create_transaction(&strict.payer.to_string(), "2").await,
            Err(ServiceError::Build(BuildError::DepositShortfall { .. }))
        ));

        let lenient = fixture(&[1_500_000], true).await;
        let cbor_hex =
            lenient.service.create_transaction(&lenient.payer.to_string(), "2").await.unwrap();
        assert!(SubmittedTransaction::from_hex(&cbor_hex).is_ok());
    }

    #[tokio::test]
    async fn fee_eating_into_the_change_deposit_is_refused() {
        let f = fixture(&[2_000_001], false).await;
        assert!(matches!(
            f.service.create_transaction(&f.payer.to_string(), "5").await,
            Err(ServiceError::Build(BuildError::DepositShortfall { .. }))
        ));
    }

    #[tokio::test]
    async fn rejects_payers_on_another_network() {
        let f = fixture(&[10_000_000], false).await;
        let mainnet = Address::enterprise(AddressNetwork::Main, &[1; 28]);

        let error = f.service.create_transaction(&mainnet.to_string(), "3").await.unwrap_err();
        assert!(matches!(error, ServiceError::WrongNetwork(AddressNetwork::Main)));

        let error = f.service.create_transaction("addr_test1notbech32", "3").await.unwrap_err();
        assert_eq!(RESTError::from(error).status_code(), 400);
    }

    #[tokio::test]
    async fn created_transaction_carries_minter_witnesses_only() {
        let f = fixture(&[10_000_000], false).await;
        let cbor_hex = f.service.create_transaction(&f.payer.to_string(), "4").await.unwrap();
        let tx = SubmittedTransaction::from_hex(&cbor_hex).unwrap();

        let keys: Vec<_> = tx.witnesses.vkeys.iter().map(|w| w.vkey).collect();
        assert_eq!(
            keys,
            vec![
                SigningKey::from_seed([6; 32]).verification_key(),
                SigningKey::from_seed([7; 32]).verification_key()
            ]
        );
        assert!(!tx.witnesses.has_vkey(&f.payer_key.verification_key()));
        assert_eq!(hex::encode(tx.to_bytes().unwrap()), cbor_hex);
    }
}

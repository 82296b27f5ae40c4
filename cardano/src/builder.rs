//! Minting transaction builder
//!
//! A build runs in five phases, each depending on the one before:
//!
//! 1. Snapshot the tip-derived expiry and the protocol parameters
//! 2. Select base-currency UTXOs from the payer for the transfer plus a margin
//! 3. Merge everything selected into a change output, less transfer and deposit
//! 4. Top the change output up until it meets its own minimum deposit
//! 5. Assemble mint, script and metadata, then sign and settle the fee
//!
//! Phases 4 and 5 run again, with the fee held back, when paying the fee
//! leaves the change output under its minimum deposit. Collaborator calls are
//! never retried; the first error fails the build.

use std::collections::HashSet;
use std::sync::Arc;

use dashu_int::{IBig, UBig};
use minter_codec::{CodecError, auxiliary_data_hash, encode_transaction};
use minter_common::{
    Address, AssetName, AssetUnit, NativeAsset, ProtocolParams, UTxOIdentifier, Utxo, Value,
    asset::{AssetError, NativeAssets, ONE_ADA},
    crypto::SigningKey,
    metadata::cip25_metadata,
    tx::{Transaction, TransactionBody, TransactionOutput},
};
use tracing::{debug, info, warn};

use crate::{
    backend::ChainBackend,
    deposit::{BabbageDepositCalculator, DepositCalculator},
    error::BuildError,
    fee::{FeeCalculator, FeeError, LinearFeeCalculator},
    policy::MintingPolicy,
    selection::{FirstFitSelector, UtxoSelectionStrategy},
    signing::sign_transaction,
};

/// Slots after the tip that a built transaction stays valid for
pub const TTL_HORIZON: u64 = 2000;

/// Fee the body carries until the real one is known
pub const PLACEHOLDER_FEE: u64 = 170_000;

/// Base currency asked of the payer on top of the transfer amount
pub const FUNDING_MARGIN: u64 = 2 * ONE_ADA;

/// Sign-and-price rounds before giving up on a stable fee
pub const MAX_FEE_ROUNDS: usize = 3;

/// Position of the change output in the built transaction
const CHANGE_OUTPUT: usize = 0;

/// What to mint, and for whom
#[derive(Debug, Clone)]
pub struct MintRequest<'a> {
    pub payer: Address,
    pub asset_name: AssetName,
    pub quantity: UBig,

    /// Lovelace carried by the minted output on top of its deposit
    pub transfer_amount: u64,

    pub policy: &'a MintingPolicy,

    /// Keys whose witnesses go out with the transaction, signed ahead of the
    /// policy key
    pub co_signers: &'a [SigningKey],
}

/// Whether the change output ended up meeting its minimum deposit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepositStatus {
    Satisfied,

    /// The payer ran out of UTXOs first; the ledger will likely refuse it
    Shortfall { required: u64, available: IBig },
}

#[derive(Debug, Clone)]
pub struct BuiltTransaction {
    pub transaction: Transaction,
    pub deposit: DepositStatus,
    pub fee: u64,
}

impl BuiltTransaction {
    pub fn to_hex(&self) -> Result<String, CodecError> {
        Ok(hex::encode(encode_transaction(&self.transaction)?))
    }
}

/// Inputs spent so far and the change output collecting their value
#[derive(Debug, Clone)]
pub struct Funding {
    pub inputs: Vec<UTxOIdentifier>,
    pub change: TransactionOutput,
}

impl Funding {
    pub fn new(payer: Address) -> Self {
        Self {
            inputs: Vec::new(),
            change: TransactionOutput::new(payer, Value::default()),
        }
    }

    /// Spend each UTXO and merge its amounts into the change output
    pub fn absorb(&mut self, utxos: &[Utxo]) -> Result<(), AssetError> {
        for utxo in utxos {
            self.inputs.push(utxo.id);
            self.change.value.merge_amounts(&utxo.amounts)?;
        }
        Ok(())
    }

    fn spent(&self) -> HashSet<UTxOIdentifier> {
        self.inputs.iter().copied().collect()
    }
}

pub struct TransactionBuilder {
    backend: Arc<dyn ChainBackend>,
    selector: Arc<dyn UtxoSelectionStrategy>,
    deposits: Arc<dyn DepositCalculator>,
    fees: Arc<dyn FeeCalculator>,

    /// Stand-ins for witnesses other parties add later, sized into the fee
    /// but never returned
    estimation_signers: Vec<SigningKey>,
}

impl TransactionBuilder {
    pub fn new(backend: Arc<dyn ChainBackend>) -> Self {
        Self {
            selector: Arc::new(FirstFitSelector::new(backend.clone())),
            backend,
            deposits: Arc::new(BabbageDepositCalculator),
            fees: Arc::new(LinearFeeCalculator),
            estimation_signers: Vec::new(),
        }
    }

    pub fn with_selector(mut self, selector: Arc<dyn UtxoSelectionStrategy>) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_deposit_calculator(mut self, deposits: Arc<dyn DepositCalculator>) -> Self {
        self.deposits = deposits;
        self
    }

    pub fn with_fee_calculator(mut self, fees: Arc<dyn FeeCalculator>) -> Self {
        self.fees = fees;
        self
    }

    /// Reserve room in the fee for `count` witnesses added after the build
    pub fn with_estimation_signers(mut self, count: usize) -> Self {
        self.estimation_signers = (0..count).map(|_| SigningKey::generate()).collect();
        self
    }

    pub async fn build(&self, request: &MintRequest<'_>) -> Result<BuiltTransaction, BuildError> {
        let payer = &request.payer;
        info!("Building mint of {} for {payer}", request.asset_name);

        // Phase 1: expiry and parameters, fixed for the rest of the build
        let ttl = self.backend.fetch_tip_slot().await?.saturating_add(TTL_HORIZON);
        let params = self.backend.fetch_protocol_parameters().await?;

        // Phase 2: primary funding
        let policy_id = request.policy.policy_id();
        let minted: NativeAssets = vec![(
            policy_id,
            vec![NativeAsset {
                name: request.asset_name,
                amount: request.quantity.clone(),
            }],
        )];
        let deposit = self.deposits.minimum_deposit(
            &TransactionOutput::new(payer.clone(), Value::new(0, minted.clone())),
            &params,
        )?;

        let required = request.transfer_amount.saturating_add(FUNDING_MARGIN);
        let utxos = self
            .selector
            .select(payer, &AssetUnit::Lovelace, Some(&UBig::from(required)), &HashSet::new())
            .await?;
        if utxos.is_empty() {
            return Err(BuildError::InsufficientBalance {
                address: payer.clone(),
                required,
            });
        }

        // Phase 3: change accumulation
        let mut funding = Funding::new(payer.clone());
        funding.absorb(&utxos)?;
        funding.change.value.coin -= IBig::from(request.transfer_amount) + IBig::from(deposit);
        debug!(
            "Primary funding: {} inputs, change {} lovelace after deposit {deposit}",
            funding.inputs.len(),
            funding.change.value.coin
        );

        // Phases 4 and 5 repeat while the fee pushes the change output back
        // under its minimum deposit; later passes top up with the fee reserved
        let payment = TransactionOutput::new(
            payer.clone(),
            Value::new(deposit.saturating_add(request.transfer_amount), minted.clone()),
        );
        let metadata = cip25_metadata(&policy_id, &request.asset_name);
        let metadata_hash = auxiliary_data_hash(&metadata)?;
        let mut reserve = 0;

        loop {
            let inputs_before = funding.inputs.len();
            let status = self.top_up(&mut funding, &params, reserve).await?;

            let body = TransactionBody {
                inputs: funding.inputs.clone(),
                outputs: vec![funding.change.clone(), payment.clone()],
                fee: PLACEHOLDER_FEE,
                ttl: Some(ttl),
                auxiliary_data_hash: Some(metadata_hash),
                mint: minted.clone(),
            };
            let mut transaction = Transaction::new(body);
            transaction.witnesses.native_scripts.push(request.policy.script.clone());
            transaction.metadata = Some(metadata.clone());

            let fee = self.settle_fee(&mut transaction, request, &params)?;

            let change = &transaction.body.outputs[CHANGE_OUTPUT];
            let required = self.deposits.minimum_deposit(change, &params)?;
            let deposit_status = if change.value.coin >= IBig::from(required) {
                DepositStatus::Satisfied
            } else if matches!(status, DepositStatus::Shortfall { .. })
                || (funding.inputs.len() == inputs_before && reserve >= fee)
            {
                DepositStatus::Shortfall {
                    required,
                    available: change.value.coin.clone(),
                }
            } else {
                debug!("Fee {fee} leaves the change output short, topping up again");
                reserve = fee;
                continue;
            };

            if let DepositStatus::Shortfall {
                required,
                available,
            } = &deposit_status
            {
                warn!(
                    "Change output for {payer} holds {available} lovelace of the {required} it needs"
                );
            }

            for key in &self.estimation_signers {
                transaction.witnesses.remove_vkey(&key.verification_key());
            }

            info!(
                "Built mint for {payer}: {} inputs, fee {fee}, ttl {ttl}",
                transaction.body.inputs.len()
            );
            return Ok(BuiltTransaction {
                transaction,
                deposit: deposit_status,
                fee,
            });
        }
    }

    /// Add UTXOs until the change output carries its own minimum deposit
    /// plus `reserve`, or the payer runs out. Makes no selection at all when
    /// the change output already suffices.
    pub async fn top_up(
        &self,
        funding: &mut Funding,
        params: &ProtocolParams,
        reserve: u64,
    ) -> Result<DepositStatus, BuildError> {
        let needed = |funding: &Funding| -> Result<u64, BuildError> {
            let deposit = self.deposits.minimum_deposit(&funding.change, params)?;
            Ok(deposit.saturating_add(reserve))
        };
        let mut required = needed(funding)?;

        while IBig::from(required) > funding.change.value.coin {
            let utxos = self
                .selector
                .select(
                    &funding.change.address,
                    &AssetUnit::Lovelace,
                    Some(&UBig::from(required)),
                    &funding.spent(),
                )
                .await?;
            if utxos.is_empty() {
                return Ok(DepositStatus::Shortfall {
                    required,
                    available: funding.change.value.coin.clone(),
                });
            }

            debug!("Topping up change output with {} UTXOs", utxos.len());
            funding.absorb(&utxos)?;
            required = needed(funding)?;
        }
        Ok(DepositStatus::Satisfied)
    }

    /// Sign, price, and take the fee out of the change output, re-signing
    /// after every change so no witness covers a stale body
    fn settle_fee(
        &self,
        transaction: &mut Transaction,
        request: &MintRequest<'_>,
        params: &ProtocolParams,
    ) -> Result<u64, BuildError> {
        let signers: Vec<&SigningKey> = request
            .co_signers
            .iter()
            .chain(self.estimation_signers.iter())
            .chain(std::iter::once(&request.policy.key))
            .collect();

        let change_before_fee = transaction.body.outputs[CHANGE_OUTPUT].value.coin.clone();
        // Lovelace still missing once the fee is paid
        let insufficient = |fee: u64| {
            let missing = IBig::from(fee) - &change_before_fee;
            BuildError::InsufficientBalance {
                address: request.payer.clone(),
                required: u64::try_from(missing).unwrap_or(u64::MAX),
            }
        };
        if change_before_fee < IBig::ZERO {
            // price the shape with an empty change output
            transaction.body.outputs[CHANGE_OUTPUT].value.coin = IBig::ZERO;
        }

        sign_transaction(transaction, &signers)?;
        let mut fee = self.fees.calculate_fee(transaction, params)?;

        for round in 1..=MAX_FEE_ROUNDS {
            if change_before_fee < IBig::from(fee) {
                return Err(insufficient(fee));
            }
            transaction.body.fee = fee;
            transaction.body.outputs[CHANGE_OUTPUT].value.coin =
                &change_before_fee - IBig::from(fee);

            transaction.witnesses.vkeys.clear();
            sign_transaction(transaction, &signers)?;

            let priced = self.fees.calculate_fee(transaction, params)?;
            debug!("Fee round {round}: paying {fee}, size needs {priced}");
            if priced <= fee {
                return Ok(fee);
            }
            fee = priced;
        }

        Err(FeeError::Unstable {
            rounds: MAX_FEE_ROUNDS,
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendError;
    use crate::in_memory_backend::InMemoryBackend;
    use minter_codec::{encode_body, transaction_id};
    use minter_common::{AddressNetwork, Amount, PolicyId, TxHash, metadata::CIP25_LABEL};
    use quickcheck_macros::quickcheck;

    fn payer() -> Address {
        Address::enterprise(AddressNetwork::Test, &[9; 28])
    }

    fn policy() -> MintingPolicy {
        MintingPolicy::single_signer(SigningKey::from_seed([1; 32]))
    }

    fn utxo(index: u32, amounts: Vec<Amount>) -> Utxo {
        Utxo {
            id: UTxOIdentifier::new(TxHash::new([0xaa; 32]), index),
            address: payer(),
            amounts,
            data_hash: None,
        }
    }

    async fn backend_with(lovelace: &[u64]) -> Arc<InMemoryBackend> {
        let backend = Arc::new(InMemoryBackend::new(ProtocolParams::default(), 1_000));
        for (index, quantity) in lovelace.iter().enumerate() {
            backend.add_utxo(utxo(index as u32, vec![Amount::lovelace(*quantity)])).await;
        }
        backend
    }

    fn request<'a>(policy: &'a MintingPolicy, co_signers: &'a [SigningKey]) -> MintRequest<'a> {
        MintRequest {
            payer: payer(),
            asset_name: AssetName::new(b"test").unwrap(),
            quantity: UBig::from(1u64),
            transfer_amount: 0,
            policy,
            co_signers,
        }
    }

    fn coin(value: &Value) -> u64 {
        u64::try_from(value.coin.clone()).unwrap()
    }

    #[tokio::test]
    async fn builds_balanced_signed_mint() {
        let backend = backend_with(&[1_500_000, 1_000_000, 10_000_000]).await;
        let builder = TransactionBuilder::new(backend).with_estimation_signers(1);
        let policy = policy();
        let account = [SigningKey::from_seed([2; 32])];

        let built = builder.build(&request(&policy, &account)).await.unwrap();
        let tx = &built.transaction;

        assert_eq!(built.deposit, DepositStatus::Satisfied);
        // 1.5 + 1 ADA already exceeds the funding margin
        assert_eq!(tx.body.inputs.len(), 2);
        assert_eq!(tx.body.ttl, Some(1_000 + TTL_HORIZON));
        assert_eq!(tx.body.fee, built.fee);
        assert_eq!(tx.body.mint[0].0, policy.policy_id());
        assert_eq!(tx.witnesses.native_scripts, vec![policy.script.clone()]);
        assert!(tx.metadata.as_ref().unwrap().contains_key(&CIP25_LABEL));

        // coin is conserved
        let outputs: u64 = tx.body.outputs.iter().map(|o| coin(&o.value)).sum();
        assert_eq!(outputs + built.fee, 2_500_000);

        // minted output carries the token and its deposit
        let minted = &tx.body.outputs[1];
        assert_eq!(
            minted.value.asset_quantity(&policy.policy_id(), &AssetName::new(b"test").unwrap()),
            UBig::from(1u64)
        );
        let deposit = BabbageDepositCalculator
            .minimum_deposit(minted, &ProtocolParams::default())
            .unwrap();
        assert_eq!(coin(&minted.value), deposit);

        // account then policy, every one over the final body; no stand-ins
        let id = transaction_id(&encode_body(&tx.body).unwrap());
        let vkeys: Vec<_> = tx.witnesses.vkeys.iter().map(|w| w.vkey).collect();
        assert_eq!(vkeys, vec![account[0].verification_key(), policy.key.verification_key()]);
        assert!(tx.witnesses.vkeys.iter().all(|w| w.verifies(&id)));
    }

    #[tokio::test]
    async fn fee_matches_final_size() {
        let backend = backend_with(&[10_000_000]).await;
        let builder = TransactionBuilder::new(backend);
        let policy = policy();

        let built = builder.build(&request(&policy, &[])).await.unwrap();

        let size = encode_transaction(&built.transaction).unwrap().len() as u64;
        assert_eq!(built.fee, 44 * size + 155_381);
        let outputs = &built.transaction.body.outputs;
        assert_eq!(
            coin(&outputs[CHANGE_OUTPUT].value) + built.fee,
            10_000_000 - coin(&outputs[1].value)
        );
    }

    #[tokio::test]
    async fn stand_in_witnesses_are_paid_for() {
        let policy = policy();
        let plain = TransactionBuilder::new(backend_with(&[10_000_000]).await)
            .build(&request(&policy, &[]))
            .await
            .unwrap();
        let padded = TransactionBuilder::new(backend_with(&[10_000_000]).await)
            .with_estimation_signers(2)
            .build(&request(&policy, &[]))
            .await
            .unwrap();

        assert!(padded.fee > plain.fee);
        assert_eq!(padded.transaction.witnesses.vkeys.len(), 1);
    }

    #[tokio::test]
    async fn empty_wallet_is_insufficient() {
        let builder = TransactionBuilder::new(backend_with(&[]).await);
        let policy = policy();

        let result = builder.build(&request(&policy, &[])).await;

        assert!(matches!(
            result,
            Err(BuildError::InsufficientBalance { required, .. }) if required == FUNDING_MARGIN
        ));
    }

    #[tokio::test]
    async fn too_little_for_the_minted_output_is_insufficient() {
        let builder = TransactionBuilder::new(backend_with(&[500_000]).await);
        let policy = policy();

        let result = builder.build(&request(&policy, &[])).await;

        // short by the minted output's deposit less the input, plus the fee
        let Err(BuildError::InsufficientBalance { required, .. }) = result else {
            panic!("unexpected {result:?}");
        };
        let deficit = 1_043_020 - 500_000;
        assert!(required > deficit + 155_381, "{required}");
        assert!(required < deficit + 300_000, "{required}");
    }

    #[tokio::test]
    async fn fee_that_breaks_the_change_deposit_is_a_shortfall() {
        // enough for the change deposit until the fee comes out of it
        let builder = TransactionBuilder::new(backend_with(&[2_000_001]).await);
        let policy = policy();

        let built = builder.build(&request(&policy, &[])).await.unwrap();

        let change = &built.transaction.body.outputs[CHANGE_OUTPUT];
        let required = BabbageDepositCalculator
            .minimum_deposit(change, &ProtocolParams::default())
            .unwrap();
        assert_eq!(
            built.deposit,
            DepositStatus::Shortfall {
                required,
                available: change.value.coin.clone(),
            }
        );
        assert!(coin(&change.value) < required);
        assert_eq!(built.transaction.body.inputs.len(), 1);
    }

    #[tokio::test]
    async fn tops_up_again_when_the_fee_breaks_the_change_deposit() {
        let backend = backend_with(&[2_000_001, 1_000_000]).await;
        let builder = TransactionBuilder::new(backend);
        let policy = policy();

        let built = builder.build(&request(&policy, &[])).await.unwrap();
        let tx = &built.transaction;

        assert_eq!(built.deposit, DepositStatus::Satisfied);
        let indexes: Vec<u32> = tx.body.inputs.iter().map(|i| i.output_index).collect();
        assert_eq!(indexes, vec![0, 1]);

        let change = &tx.body.outputs[CHANGE_OUTPUT];
        let required = BabbageDepositCalculator
            .minimum_deposit(change, &ProtocolParams::default())
            .unwrap();
        assert!(coin(&change.value) >= required);

        let outputs: u64 = tx.body.outputs.iter().map(|o| coin(&o.value)).sum();
        assert_eq!(outputs + built.fee, 3_000_001);
        let size = encode_transaction(tx).unwrap().len() as u64;
        assert_eq!(built.fee, 44 * size + 155_381);
    }

    #[tokio::test]
    async fn tokens_in_the_change_trigger_a_top_up() {
        let backend = Arc::new(InMemoryBackend::new(ProtocolParams::default(), 1_000));
        let mut amounts = vec![Amount::lovelace(2_500_000)];
        for n in 0..10u8 {
            let unit = AssetUnit::Native {
                policy: PolicyId::new([n + 0x10; 28]),
                name: AssetName::new(&[n]).unwrap(),
            };
            amounts.push(Amount::native(&unit, 1));
        }
        backend.add_utxo(utxo(0, amounts)).await;
        backend.add_utxo(utxo(1, vec![Amount::lovelace(5_000_000)])).await;
        backend.add_utxo(utxo(2, vec![Amount::lovelace(7_000_000)])).await;

        let selector = FirstFitSelector::new(backend.clone()).only_base_currency(false);
        let builder = TransactionBuilder::new(backend).with_selector(Arc::new(selector));
        let policy = policy();

        let built = builder.build(&request(&policy, &[])).await.unwrap();
        let tx = &built.transaction;

        assert_eq!(built.deposit, DepositStatus::Satisfied);
        // the token-bearing input is not picked twice, and one top-up suffices
        let indexes: Vec<u32> = tx.body.inputs.iter().map(|i| i.output_index).collect();
        assert_eq!(indexes, vec![0, 1]);

        let change = &tx.body.outputs[CHANGE_OUTPUT];
        assert_eq!(change.value.assets.len(), 10);
        let required = BabbageDepositCalculator
            .minimum_deposit(change, &ProtocolParams::default())
            .unwrap();
        assert!(required > 1_456_980);
        assert!(coin(&change.value) >= required);

        let outputs: u64 = tx.body.outputs.iter().map(|o| coin(&o.value)).sum();
        assert_eq!(outputs + built.fee, 7_500_000);
    }

    #[tokio::test]
    async fn reports_deposit_shortfall() {
        // covers the minted output but leaves the change below its minimum
        let builder = TransactionBuilder::new(backend_with(&[1_500_000]).await);
        let policy = policy();

        let built = builder.build(&request(&policy, &[])).await.unwrap();

        match built.deposit {
            DepositStatus::Shortfall {
                required,
                available,
            } => {
                assert_eq!(required, (160 + 43) * 4310);
                assert!(available < IBig::from(required));
            }
            DepositStatus::Satisfied => panic!("expected a shortfall"),
        }
    }

    #[tokio::test]
    async fn top_up_adds_unspent_utxos() {
        let backend = backend_with(&[100_000, 2_000_000]).await;
        let builder = TransactionBuilder::new(backend.clone());
        let mut funding = Funding::new(payer());
        funding.absorb(&[utxo(0, vec![Amount::lovelace(100_000)])]).unwrap();

        let status = builder.top_up(&mut funding, &ProtocolParams::default(), 0).await.unwrap();

        assert_eq!(status, DepositStatus::Satisfied);
        assert_eq!(funding.inputs.len(), 2);
        assert_eq!(funding.inputs[1].output_index, 1);
        assert_eq!(coin(&funding.change.value), 2_100_000);
    }

    #[tokio::test]
    async fn satisfied_top_up_selects_nothing() {
        let backend = backend_with(&[5_000_000]).await;
        let builder = TransactionBuilder::new(backend.clone());
        let mut funding = Funding::new(payer());
        funding.absorb(&[utxo(7, vec![Amount::lovelace(5_000_000)])]).unwrap();
        let before = funding.clone();

        let status = builder.top_up(&mut funding, &ProtocolParams::default(), 0).await.unwrap();

        assert_eq!(status, DepositStatus::Satisfied);
        assert_eq!(backend.page_fetches(), 0);
        assert_eq!(funding.inputs, before.inputs);
        assert_eq!(funding.change, before.change);
    }

    struct UnreachableSelector;

    #[async_trait::async_trait]
    impl UtxoSelectionStrategy for UnreachableSelector {
        async fn select(
            &self,
            _address: &Address,
            _unit: &AssetUnit,
            _amount: Option<&UBig>,
            _exclude: &HashSet<UTxOIdentifier>,
        ) -> Result<Vec<Utxo>, BackendError> {
            Err(BackendError::Transport("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn selection_errors_fail_the_build() {
        let builder = TransactionBuilder::new(backend_with(&[10_000_000]).await)
            .with_selector(Arc::new(UnreachableSelector));
        let policy = policy();

        let result = builder.build(&request(&policy, &[])).await;

        assert!(matches!(result, Err(BuildError::Backend(BackendError::Transport(_)))));
    }

    #[test]
    fn merges_coin_and_tokens_into_change() {
        let policy_a = PolicyId::new([0xa; 28]);
        let name1 = AssetName::new(b"name1").unwrap();
        let unit = AssetUnit::Native {
            policy: policy_a,
            name: name1,
        };
        let mut funding = Funding::new(payer());

        funding
            .absorb(&[
                utxo(0, vec![Amount::lovelace(10)]),
                utxo(1, vec![Amount::native(&unit, 2)]),
            ])
            .unwrap();

        assert_eq!(funding.change.value.coin, IBig::from(10u64));
        assert_eq!(
            funding.change.value.assets,
            vec![(
                policy_a,
                vec![NativeAsset {
                    name: name1,
                    amount: UBig::from(2u64),
                }]
            )]
        );
    }

    #[test]
    fn rejects_unparseable_units() {
        let mut funding = Funding::new(payer());
        let bad = Amount {
            unit: "nonsense".to_string(),
            quantity: UBig::from(1u64),
        };
        assert!(funding.absorb(&[utxo(0, vec![bad])]).is_err());
    }

    // Every asset in the change output sums its quantities across inputs
    #[quickcheck]
    fn change_sums_each_asset(entries: Vec<(u8, u8, u32)>) -> bool {
        let units: Vec<(AssetUnit, u64)> = entries
            .iter()
            .map(|(policy, name, quantity)| {
                (
                    AssetUnit::Native {
                        policy: PolicyId::new([*policy % 4; 28]),
                        name: AssetName::new(&[*name % 3]).unwrap(),
                    },
                    *quantity as u64,
                )
            })
            .collect();
        let utxos: Vec<Utxo> = units
            .iter()
            .enumerate()
            .map(|(i, (unit, quantity))| {
                utxo(i as u32, vec![Amount::lovelace(1), Amount::native(unit, *quantity)])
            })
            .collect();

        let mut funding = Funding::new(payer());
        funding.absorb(&utxos).unwrap();

        let no_zeros = funding
            .change
            .value
            .assets
            .iter()
            .all(|(_, bundle)| !bundle.is_empty() && bundle.iter().all(|a| a.amount != UBig::ZERO));
        no_zeros
            && funding.change.value.coin == IBig::from(utxos.len())
            && units.iter().all(|(unit, _)| {
                let AssetUnit::Native { policy, name } = unit else {
                    return false;
                };
                let expected: u64 =
                    units.iter().filter(|(u, _)| u == unit).map(|(_, q)| *q).sum();
                funding.change.value.asset_quantity(policy, name) == UBig::from(expected)
            })
    }
}

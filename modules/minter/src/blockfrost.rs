//! Chain backend over the Blockfrost HTTP API

use std::time::Duration;

use async_trait::async_trait;
use dashu_int::UBig;
use minter_cardano::backend::{BackendError, ChainBackend, Order};
use minter_common::{Address, Amount, ProtocolParams, TxHash, UTxOIdentifier, Utxo, hash::DatumHash};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, de::DeserializeOwned};
use serde_with::{DisplayFromStr, serde_as};
use tracing::{debug, info};

const PROJECT_ID_HEADER: &str = "project_id";

pub struct BlockfrostBackend {
    client: Client,
    base_url: String,
    project_id: String,
}

// Blockfrost sends quantities and hashes as strings
#[serde_as]
#[derive(Debug, Deserialize)]
struct AmountDto {
    unit: String,
    #[serde_as(as = "DisplayFromStr")]
    quantity: UBig,
}

#[serde_as]
#[derive(Debug, Deserialize)]
struct UtxoDto {
    #[serde_as(as = "DisplayFromStr")]
    address: Address,
    #[serde_as(as = "DisplayFromStr")]
    tx_hash: TxHash,
    output_index: u32,
    amount: Vec<AmountDto>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    data_hash: Option<DatumHash>,
}

#[serde_as]
#[derive(Debug, Deserialize)]
struct ProtocolParamsDto {
    min_fee_a: u64,
    min_fee_b: u64,
    max_tx_size: u64,
    #[serde_as(as = "Option<DisplayFromStr>")]
    coins_per_utxo_size: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct BlockDto {
    slot: Option<u64>,
}

impl From<UtxoDto> for Utxo {
    fn from(dto: UtxoDto) -> Self {
        Utxo {
            id: UTxOIdentifier::new(dto.tx_hash, dto.output_index),
            address: dto.address,
            amounts: dto
                .amount
                .into_iter()
                .map(|a| Amount {
                    unit: a.unit,
                    quantity: a.quantity,
                })
                .collect(),
            data_hash: dto.data_hash,
        }
    }
}

impl BlockfrostBackend {
    pub fn new(
        base_url: &str,
        project_id: &str,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        info!("Using Blockfrost backend at {base_url}");
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            project_id: project_id.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, BackendError> {
        let response = request
            .header(PROJECT_ID_HEADER, &self.project_id)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                code: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn get<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, BackendError> {
        self.send(request).await?.json::<T>().await.map_err(|e| BackendError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ChainBackend for BlockfrostBackend {
    async fn fetch_utxos(
        &self,
        address: &Address,
        count: usize,
        page: usize,
        order: Order,
    ) -> Result<Vec<Utxo>, BackendError> {
        debug!("Fetching UTXO page {page} of {address}");
        let request = self.client.get(self.url(&format!("/addresses/{address}/utxos"))).query(&[
            ("count", count.to_string()),
            ("page", page.to_string()),
            ("order", order.as_str().to_string()),
        ]);
        let utxos: Vec<UtxoDto> = self.get(request).await?;
        Ok(utxos.into_iter().map(Utxo::from).collect())
    }

    async fn fetch_protocol_parameters(&self) -> Result<ProtocolParams, BackendError> {
        let dto: ProtocolParamsDto =
            self.get(self.client.get(self.url("/epochs/latest/parameters"))).await?;
        let coins_per_utxo_byte = dto
            .coins_per_utxo_size
            .ok_or_else(|| BackendError::Decode("coins_per_utxo_size missing".to_string()))?;

        Ok(ProtocolParams {
            min_fee_a: dto.min_fee_a,
            min_fee_b: dto.min_fee_b,
            max_tx_size: dto.max_tx_size,
            coins_per_utxo_byte,
        })
    }

    async fn fetch_tip_slot(&self) -> Result<u64, BackendError> {
        let block: BlockDto = self.get(self.client.get(self.url("/blocks/latest"))).await?;
        block.slot.ok_or_else(|| BackendError::Decode("latest block has no slot".to_string()))
    }

    async fn submit_transaction(&self, cbor: &[u8]) -> Result<TxHash, BackendError> {
        let request = self
            .client
            .post(self.url("/tx/submit"))
            .header(reqwest::header::CONTENT_TYPE, "application/cbor")
            .body(cbor.to_vec());
        let id: String = self.get(request).await?;
        id.parse::<TxHash>().map_err(|e| BackendError::Decode(format!("transaction id: {e}")))
    }
}

//! UTXO selection strategies

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use dashu_int::UBig;
use minter_common::{Address, AssetUnit, UTxOIdentifier, Utxo};
use tracing::debug;

use crate::backend::{BackendError, ChainBackend, Order};

/// Page size of UTXO listings
pub const DEFAULT_PAGE_SIZE: usize = 40;

/// Picks UTXOs at an address to cover an amount of one unit
#[async_trait]
pub trait UtxoSelectionStrategy: Send + Sync {
    /// UTXOs carrying `unit`, none of them in `exclude`. The result may fall
    /// short of `amount` when the address runs out; callers check.
    async fn select(
        &self,
        address: &Address,
        unit: &AssetUnit,
        amount: Option<&UBig>,
        exclude: &HashSet<UTxOIdentifier>,
    ) -> Result<Vec<Utxo>, BackendError>;
}

/// Greedy first-fit over the backend's paged listing: takes eligible UTXOs
/// in listing order until the running total strictly exceeds the amount
pub struct FirstFitSelector {
    backend: Arc<dyn ChainBackend>,
    page_size: usize,
    order: Order,

    /// Skip UTXOs carrying anything but the base currency
    only_base_currency: bool,

    /// Skip UTXOs with a datum hash attached
    ignore_datum_hash: bool,
}

impl FirstFitSelector {
    pub fn new(backend: Arc<dyn ChainBackend>) -> Self {
        Self {
            backend,
            page_size: DEFAULT_PAGE_SIZE,
            order: Order::Asc,
            only_base_currency: true,
            ignore_datum_hash: true,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }

    pub fn only_base_currency(mut self, only: bool) -> Self {
        self.only_base_currency = only;
        self
    }

    pub fn allow_datum_hash(mut self, allow: bool) -> Self {
        self.ignore_datum_hash = !allow;
        self
    }

    fn eligible(&self, utxo: &Utxo, exclude: &HashSet<UTxOIdentifier>) -> bool {
        if exclude.contains(&utxo.id) {
            return false;
        }
        if self.only_base_currency && !utxo.is_base_currency_only() {
            return false;
        }
        if self.ignore_datum_hash && utxo.data_hash.is_some() {
            return false;
        }
        true
    }
}

#[async_trait]
impl UtxoSelectionStrategy for FirstFitSelector {
    async fn select(
        &self,
        address: &Address,
        unit: &AssetUnit,
        amount: Option<&UBig>,
        exclude: &HashSet<UTxOIdentifier>,
    ) -> Result<Vec<Utxo>, BackendError> {
        let target = amount.cloned().unwrap_or(UBig::ZERO);
        let unit = unit.to_string();

        let mut selected = Vec::new();
        let mut total = UBig::ZERO;
        let mut page = 1;

        'pages: loop {
            let utxos = self.backend.fetch_utxos(address, self.page_size, page, self.order).await?;
            if utxos.is_empty() {
                break;
            }

            for utxo in utxos {
                if !self.eligible(&utxo, exclude) {
                    continue;
                }
                let Some(quantity) = utxo.quantity_of(&unit) else {
                    continue;
                };
                total += quantity;
                selected.push(utxo);

                if total > target {
                    break 'pages;
                }
            }
            page += 1;
        }

        debug!(
            "Selected {} UTXOs holding {total} {unit} at {address} (target {target}, {} pages)",
            selected.len(),
            page
        );
        Ok(selected)
    }
}

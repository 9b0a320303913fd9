use alloy::{
    primitives::{TxHash, U256},
    providers::DynProvider,
    rpc::types::TransactionReceipt,
};
use fastnum::UD128;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::Client;
use crate::{
    MarginAsset,
    abi::{erc20::IERC20, vault::IMarginVault},
    error::ChainError,
    outcome::Outcome,
    receipt,
    types::DepositIntent,
};

/// Transactions submitted by a deposit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositReceipt {
    /// Allowance top-up, if the existing allowance was insufficient.
    pub approval_tx: Option<TxHash>,
    pub deposit_tx: TxHash,
}

impl Client {
    /// Current vault allowance of a margin asset, in token units.
    pub async fn allowance(&self, asset: &str) -> Outcome<U256> {
        let asset = match self.margin_asset(asset) {
            Ok(asset) => asset,
            Err(err) => return err.into(),
        };
        let token = IERC20::new(asset.address, self.provider.clone());
        token
            .allowance(self.address(), self.config.vault)
            .call()
            .await
            .map_err(ChainError::from)
            .into()
    }

    /// Approves the vault to spend `amount` of a margin asset and waits for
    /// the approval to be mined.
    pub async fn approve(&self, asset: &str, amount: UD128) -> Outcome<TxHash> {
        let asset = match self.margin_asset(asset) {
            Ok(asset) => asset,
            Err(err) => return err.into(),
        };
        let amount = asset.converter().to_unsigned(amount);
        let token = IERC20::new(asset.address, self.provider.clone());
        self.submit_approval(&token, amount, None).await.into()
    }

    /// Deposits a margin asset into the vault, topping up the allowance first
    /// if needed.
    ///
    /// Waits for each transaction as configured by [`crate::ClientConfig::wait_policy`];
    /// without a deadline the wait is unbounded, see [`Self::deposit_with_cancel`].
    pub async fn deposit(&self, intent: &DepositIntent) -> Outcome<DepositReceipt> {
        self.deposit_inner(intent, None).await
    }

    /// Same as [`Self::deposit`], giving up as soon as `cancel` fires.
    /// Transactions already submitted are not reverted.
    pub async fn deposit_with_cancel(
        &self,
        intent: &DepositIntent,
        cancel: &CancellationToken,
    ) -> Outcome<DepositReceipt> {
        self.deposit_inner(intent, Some(cancel)).await
    }

    async fn deposit_inner(
        &self,
        intent: &DepositIntent,
        cancel: Option<&CancellationToken>,
    ) -> Outcome<DepositReceipt> {
        let asset = match self.margin_asset(&intent.asset) {
            Ok(asset) => asset,
            Err(err) => return err.into(),
        };
        let amount = asset.converter().to_unsigned(intent.amount);
        debug!(?intent, %amount, vault = %self.config.vault, "depositing");
        self.run_deposit(asset, amount, cancel).await.into()
    }

    async fn run_deposit(
        &self,
        asset: &MarginAsset,
        amount: U256,
        cancel: Option<&CancellationToken>,
    ) -> Result<DepositReceipt, ChainError> {
        let token = IERC20::new(asset.address, self.provider.clone());
        let allowance = token
            .allowance(self.address(), self.config.vault)
            .call()
            .await?;

        let approval_tx = if allowance < amount {
            debug!(%allowance, %amount, "allowance insufficient, approving");
            Some(self.submit_approval(&token, amount, cancel).await?)
        } else {
            None
        };

        let vault = IMarginVault::new(self.config.vault, self.provider.clone());
        let call = vault.deposit(asset.address, amount, U256::from(self.sub_account_id));
        call.call().await?;
        let pending = call.send().await?;
        let deposit_tx = *pending.tx_hash();
        info!(%deposit_tx, asset = %asset.symbol, %amount, "deposit submitted");
        self.confirm(deposit_tx, cancel).await?;

        Ok(DepositReceipt {
            approval_tx,
            deposit_tx,
        })
    }

    async fn submit_approval(
        &self,
        token: &IERC20::IERC20Instance<DynProvider>,
        amount: U256,
        cancel: Option<&CancellationToken>,
    ) -> Result<TxHash, ChainError> {
        let call = token.approve(self.config.vault, amount);
        call.call().await?;
        let pending = call.send().await?;
        let tx_hash = *pending.tx_hash();
        info!(%tx_hash, %amount, spender = %self.config.vault, "approval submitted");
        self.confirm(tx_hash, cancel).await?;
        Ok(tx_hash)
    }

    async fn confirm(
        &self,
        tx_hash: TxHash,
        cancel: Option<&CancellationToken>,
    ) -> Result<TransactionReceipt, ChainError> {
        let receipt =
            receipt::wait_for_receipt(&self.provider, tx_hash, self.config.wait_policy, cancel)
                .await?;
        if !receipt.status() {
            warn!(%tx_hash, "transaction reverted");
            return Err(ChainError::TransactionFailed(tx_hash));
        }
        debug!(%tx_hash, block = ?receipt.block_number, "transaction confirmed");
        Ok(receipt)
    }
}

//! EIP-712 signing against the fixed per-client domain.

use std::borrow::Cow;

use alloy::{
    primitives::{Address, Signature, U256},
    signers::{SignerSync, local::PrivateKeySigner},
};
use alloy_sol_types::{Eip712Domain, SolStruct};
use tracing::debug;

use crate::{DomainConfig, error::Error};

/// Signs typed messages on behalf of the trading account.
#[derive(Clone, derive_more::Debug)]
pub struct MessageSigner {
    #[debug("{}", signer.address())]
    signer: PrivateKeySigner,
    domain: Eip712Domain,
}

impl MessageSigner {
    pub fn new(signer: PrivateKeySigner, domain: &DomainConfig) -> Self {
        Self {
            signer,
            domain: domain.to_eip712(),
        }
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn domain(&self) -> &Eip712Domain {
        &self.domain
    }

    pub(crate) fn private_key(&self) -> &PrivateKeySigner {
        &self.signer
    }

    /// Signs `message` as primary type `M::NAME`.
    pub fn sign<M: SolStruct>(&self, message: &M) -> Result<Signature, Error> {
        debug!(primary_type = M::NAME, account = %self.address(), "signing typed message");
        self.signer
            .sign_typed_data_sync(message, &self.domain)
            .map_err(|source| Error::Signing {
                primary_type: M::NAME,
                source,
            })
    }
}

impl DomainConfig {
    pub fn to_eip712(&self) -> Eip712Domain {
        Eip712Domain::new(
            Some(Cow::Owned(self.name().to_string())),
            Some(Cow::Owned(self.version().to_string())),
            Some(U256::from(self.chain_id())),
            Some(self.verifying_contract()),
            None,
        )
    }
}

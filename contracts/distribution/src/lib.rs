#![no_std]
mod distribution;

pub use distribution::{
    DistributionContract, DistributionContractClient, DistributionError, WalletAddedEvent,
    WalletRemovedEvent,
};

//! IPv4 CIDR arithmetic for the subnet layout
//!
//! Blocks are handed out sequentially from the network range, aligned to
//! their own size. Mixing mask widths therefore never produces overlapping
//! blocks, only (possibly) alignment gaps.

use crate::error::{AwsError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// An IPv4 CIDR block (network address + prefix length)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CidrBlock {
    addr: u32,
    prefix: u8,
}

impl CidrBlock {
    /// Create a block. Host bits below the prefix are masked off.
    pub fn new(addr: Ipv4Addr, prefix: u8) -> Self {
        let prefix = prefix.min(32);
        let raw = u32::from(addr);
        let masked = if prefix == 0 {
            0
        } else {
            raw & (u32::MAX << (32 - prefix))
        };
        Self {
            addr: masked,
            prefix,
        }
    }

    pub fn network(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.addr)
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// Number of addresses in the block
    pub fn size(&self) -> u64 {
        1u64 << (32 - self.prefix)
    }

    pub fn contains(&self, other: &CidrBlock) -> bool {
        let start = self.addr as u64;
        let end = start + self.size();
        let other_start = other.addr as u64;
        let other_end = other_start + other.size();
        other_start >= start && other_end <= end
    }
}

impl fmt::Display for CidrBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network(), self.prefix)
    }
}

impl FromStr for CidrBlock {
    type Err = AwsError;

    fn from_str(s: &str) -> Result<Self> {
        let (addr, prefix) = s
            .split_once('/')
            .ok_or_else(|| AwsError::InvalidCidr(s.to_string()))?;
        let addr: Ipv4Addr = addr
            .parse()
            .map_err(|_| AwsError::InvalidCidr(s.to_string()))?;
        let prefix: u8 = prefix
            .parse()
            .map_err(|_| AwsError::InvalidCidr(s.to_string()))?;
        Ok(CidrBlock::new(addr, prefix))
    }
}

impl Serialize for CidrBlock {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CidrBlock {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Sequential block allocator over one network range
pub struct SubnetAllocator {
    network: CidrBlock,
    cursor: u64,
}

impl SubnetAllocator {
    pub fn new(network: CidrBlock) -> Self {
        Self {
            cursor: network.addr as u64,
            network,
        }
    }

    /// Allocate the next `/prefix` block, aligned to its own size
    pub fn next_block(&mut self, prefix: u8) -> Result<CidrBlock> {
        if prefix < self.network.prefix || prefix > 32 {
            return Err(AwsError::SubnetMaskOutOfRange {
                mask: prefix,
                prefix: self.network.prefix,
            });
        }

        let size = 1u64 << (32 - prefix);
        let aligned = self.cursor.div_ceil(size) * size;
        let end = aligned + size;

        let network_end = self.network.addr as u64 + self.network.size();
        if end > network_end {
            return Err(AwsError::AddressSpaceExhausted(prefix));
        }

        self.cursor = end;
        Ok(CidrBlock {
            addr: aligned as u32,
            prefix,
        })
    }
}

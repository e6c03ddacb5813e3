//! CIDR parsing and network policy checks.
//!
//! A network entry is accepted when it parses as `address/prefix`, carries
//! no host bits, and its prefix stays within the per-family bound of the
//! [`NetmaskPolicy`].

use crate::error::{CidrParseError, NetworkError, ValidationError};
use crate::model::{MAX_NETWORK_BITS_V4, MAX_NETWORK_BITS_V6};
use crate::multi_error::MultiError;
use crate::summary::RouteMapSummary;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

const IPV4_BITS: u8 = 32;
const IPV6_BITS: u8 = 128;

/// Largest prefix length allowed for each address family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetmaskPolicy {
    pub max_ipv4_bits: u8,
    pub max_ipv6_bits: u8,
}

impl Default for NetmaskPolicy {
    fn default() -> Self {
        Self {
            max_ipv4_bits: MAX_NETWORK_BITS_V4,
            max_ipv6_bits: MAX_NETWORK_BITS_V6,
        }
    }
}

/// Network mask described by its leading one bits and total width.
///
/// A mask that is not a run of ones followed by zeros, or whose width is
/// not an address family width, has size `(0, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Netmask {
    ones: u8,
    bits: u8,
}

impl Netmask {
    pub fn from_bytes(mask: &[u8]) -> Self {
        const NON_CANONICAL: Netmask = Netmask { ones: 0, bits: 0 };

        let bits = match mask.len() {
            4 => IPV4_BITS,
            16 => IPV6_BITS,
            _ => return NON_CANONICAL,
        };

        let mut ones: u8 = 0;
        let mut seen_zero = false;
        for byte in mask {
            if seen_zero {
                if *byte != 0 {
                    return NON_CANONICAL;
                }
                continue;
            }
            let leading = byte.leading_ones() as u8;
            // Remaining bits after the leading run must all be zero.
            if leading < 8 && (byte << leading) != 0 {
                return NON_CANONICAL;
            }
            ones += leading;
            seen_zero = leading < 8;
        }

        Self { ones, bits }
    }

    /// `(ones, bits)`.
    pub fn size(&self) -> (u8, u8) {
        (self.ones, self.bits)
    }
}

/// A parsed `address/prefix` network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cidr {
    addr: IpAddr,
    prefix_len: u8,
}

impl Cidr {
    pub fn new(addr: IpAddr, prefix_len: u8) -> Result<Self, CidrParseError> {
        let max = address_bits(&addr);
        if prefix_len > max {
            return Err(CidrParseError::PrefixOutOfRange {
                prefix: u32::from(prefix_len),
                max,
            });
        }
        Ok(Self { addr, prefix_len })
    }

    pub fn addr(&self) -> IpAddr {
        self.addr
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// Width of the address in bits: 32 or 128.
    pub fn address_bits(&self) -> u8 {
        address_bits(&self.addr)
    }

    pub fn is_ipv4(&self) -> bool {
        self.address_bits() == IPV4_BITS
    }

    pub fn mask_bytes(&self) -> Vec<u8> {
        match self.addr {
            IpAddr::V4(_) => prefix_mask_v4(self.prefix_len).to_be_bytes().to_vec(),
            IpAddr::V6(_) => prefix_mask_v6(self.prefix_len).to_be_bytes().to_vec(),
        }
    }

    pub fn netmask(&self) -> Netmask {
        Netmask::from_bytes(&self.mask_bytes())
    }

    /// The base address of the network: the address with host bits cleared.
    pub fn network(&self) -> IpAddr {
        match self.addr {
            IpAddr::V4(addr) => {
                IpAddr::V4(Ipv4Addr::from(u32::from(addr) & prefix_mask_v4(self.prefix_len)))
            }
            IpAddr::V6(addr) => {
                IpAddr::V6(Ipv6Addr::from(u128::from(addr) & prefix_mask_v6(self.prefix_len)))
            }
        }
    }

    /// Whether the address is its own network base.
    pub fn is_aligned(&self) -> bool {
        self.addr == self.network()
    }
}

impl FromStr for Cidr {
    type Err = CidrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr, prefix) = s.split_once('/').ok_or(CidrParseError::MissingPrefix)?;
        let addr: IpAddr = addr
            .parse()
            .map_err(|_| CidrParseError::InvalidAddress(addr.to_string()))?;

        if prefix.is_empty() || prefix.len() > 3 || !prefix.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CidrParseError::InvalidPrefix(prefix.to_string()));
        }
        let prefix_len: u32 = prefix
            .parse()
            .map_err(|_| CidrParseError::InvalidPrefix(prefix.to_string()))?;

        let max = address_bits(&addr);
        if prefix_len > u32::from(max) {
            return Err(CidrParseError::PrefixOutOfRange {
                prefix: prefix_len,
                max,
            });
        }

        Cidr::new(addr, prefix_len as u8)
    }
}

impl fmt::Display for Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix_len)
    }
}

fn address_bits(addr: &IpAddr) -> u8 {
    match addr {
        IpAddr::V4(_) => IPV4_BITS,
        IpAddr::V6(_) => IPV6_BITS,
    }
}

fn prefix_mask_v4(prefix_len: u8) -> u32 {
    u32::MAX
        .checked_shl(u32::from(IPV4_BITS - prefix_len))
        .unwrap_or(0)
}

fn prefix_mask_v6(prefix_len: u8) -> u128 {
    u128::MAX
        .checked_shl(u32::from(IPV6_BITS - prefix_len))
        .unwrap_or(0)
}

/// The address must carry no host bits.
pub fn check_alignment(cidr: &Cidr) -> Result<(), NetworkError> {
    if cidr.is_aligned() {
        Ok(())
    } else {
        Err(NetworkError::NotMasked)
    }
}

/// The mask must be recognized and within the family's prefix bound.
pub fn check_netmask_len(mask: Netmask, policy: &NetmaskPolicy) -> Result<(), NetworkError> {
    match mask.size() {
        (_, 0) => Err(NetworkError::InvalidMask),
        (ones, IPV6_BITS) if ones > policy.max_ipv6_bits => Err(NetworkError::PrefixTooLong {
            bits: ones,
            max: policy.max_ipv6_bits,
        }),
        (ones, IPV4_BITS) if ones > policy.max_ipv4_bits => Err(NetworkError::PrefixTooLong {
            bits: ones,
            max: policy.max_ipv4_bits,
        }),
        _ => Ok(()),
    }
}

/// Outcome of validating one network string.
///
/// `network` is present whenever the string parsed, even if policy checks
/// failed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkCheck {
    pub network: Option<Cidr>,
    pub errors: MultiError<NetworkError>,
}

impl NetworkCheck {
    pub fn is_valid(&self) -> bool {
        self.network.is_some() && self.errors.is_empty()
    }
}

/// Parse `network` and run the alignment and netmask checks.
///
/// A parse failure is the only error reported for that entry. Otherwise
/// both checks run and every failure is kept.
pub fn validate_network(network: &str, policy: &NetmaskPolicy) -> NetworkCheck {
    let cidr = match network.parse::<Cidr>() {
        Ok(cidr) => cidr,
        Err(error) => {
            return NetworkCheck {
                network: None,
                errors: MultiError::from(NetworkError::from(error)),
            };
        }
    };

    let mut errors = MultiError::new();
    if let Err(error) = check_alignment(&cidr) {
        errors.push(error);
    }
    if let Err(error) = check_netmask_len(cidr.netmask(), policy) {
        errors.push(error);
    }

    NetworkCheck {
        network: Some(cidr),
        errors,
    }
}

/// Validate every network of map segment `segment`, updating the summary's
/// network and per-family counters.
pub fn validate_networks(
    networks: &[String],
    segment: usize,
    policy: &NetmaskPolicy,
    summary: &mut RouteMapSummary,
) -> MultiError<ValidationError> {
    let mut all_errors = MultiError::new();
    summary.num_networks += networks.len();

    for (index, network) in networks.iter().enumerate() {
        let check = validate_network(network, policy);

        if let Some(cidr) = check.network {
            if cidr.is_ipv4() {
                summary.num_ipv4 += 1;
            } else {
                summary.num_ipv6 += 1;
            }
        }

        all_errors.extend(check.errors.into_iter().map(|error| ValidationError::Network {
            error,
            cidr: network.clone(),
            index,
            segment,
        }));
    }

    all_errors
}

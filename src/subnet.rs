use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The selectable /24 networks. The planner offers a fixed catalog rather
/// than free-form CIDR input; everything downstream derives from these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Subnet {
    /// 192.168.0.0/24
    Net0,
    /// 192.168.1.0/24
    Net1,
    /// 192.168.2.0/24
    Net2,
    /// 192.168.31.0/24
    Net31,
    /// 192.168.50.0/24
    Net50,
    /// 10.0.0.0/24
    Ten,
}

impl Subnet {
    pub const ALL: [Subnet; 6] = [
        Subnet::Net0,
        Subnet::Net1,
        Subnet::Net2,
        Subnet::Net31,
        Subnet::Net50,
        Subnet::Ten,
    ];

    /// The network address as it appears in documents, e.g. `192.168.31.0`.
    pub fn network(self) -> &'static str {
        match self {
            Subnet::Net0 => "192.168.0.0",
            Subnet::Net1 => "192.168.1.0",
            Subnet::Net2 => "192.168.2.0",
            Subnet::Net31 => "192.168.31.0",
            Subnet::Net50 => "192.168.50.0",
            Subnet::Ten => "10.0.0.0",
        }
    }

    /// The first three octets, the part every host in the subnet shares.
    pub fn prefix(self) -> &'static str {
        match self {
            Subnet::Net0 => "192.168.0",
            Subnet::Net1 => "192.168.1",
            Subnet::Net2 => "192.168.2",
            Subnet::Net31 => "192.168.31",
            Subnet::Net50 => "192.168.50",
            Subnet::Ten => "10.0.0",
        }
    }
}

impl fmt::Display for Subnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/24", self.network())
    }
}

static BY_NETWORK: Lazy<BTreeMap<&'static str, Subnet>> = Lazy::new(|| {
    Subnet::ALL.iter().map(|s| (s.network(), *s)).collect()
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown subnet: {0}")]
pub struct UnknownSubnet(pub String);

impl FromStr for Subnet {
    type Err = UnknownSubnet;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept both the bare network address and the /24 display form.
        let key = s.strip_suffix("/24").unwrap_or(s);
        BY_NETWORK
            .get(key)
            .copied()
            .ok_or_else(|| UnknownSubnet(s.to_string()))
    }
}

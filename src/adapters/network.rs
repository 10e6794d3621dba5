use crate::domain::ports::NetworkNameProbe;

/// Network name handed in from outside (a flag, an env var, a hook argument).
#[derive(Debug, Clone, Default)]
pub struct StaticNetworkName {
    name: Option<String>,
}

impl StaticNetworkName {
    pub fn new(name: Option<String>) -> Self {
        Self {
            name: name.filter(|n| !n.trim().is_empty()),
        }
    }
}

impl NetworkNameProbe for StaticNetworkName {
    fn current(&self) -> Option<String> {
        self.name.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Proceed,
    /// Joined to some other, known network.
    Skip { current: String },
}

/// Decides whether a login run is worth starting. Only skips when both the
/// current and the target network are known and they differ; an unknown
/// current network always proceeds.
pub fn network_gate(probe: &dyn NetworkNameProbe, target: Option<&str>) -> GateDecision {
    let (Some(current), Some(target)) = (probe.current(), target) else {
        return GateDecision::Proceed;
    };

    if normalize(&current) == normalize(target) {
        GateDecision::Proceed
    } else {
        GateDecision::Skip { current }
    }
}

// Some OS tools report the SSID wrapped in quotes.
fn normalize(name: &str) -> &str {
    name.trim().trim_matches('"')
}

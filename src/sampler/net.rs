//! `/proc/net/dev` parsing.

use crate::sampler::SampleError;

/// Receive/transmit drop counters for one interface, cumulative since boot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NetCounters {
    pub rx_dropped: u64,
    pub tx_dropped: u64,
}

impl NetCounters {
    /// Find the row for `interface` in `/proc/net/dev` content.
    ///
    /// Rows look like `eth0: 1296 9 0 4 0 0 0 0 354 6 0 2 0 0 0 0` after a
    /// two-line header; the first eight numbers are receive counters, the
    /// next eight transmit, with `drop` third in each group.
    pub fn parse(netdev: &str, interface: &str) -> Result<Self, SampleError> {
        for line in netdev.lines().skip(2) {
            let Some((name, counters)) = line.split_once(':') else {
                continue;
            };
            if name.trim() != interface {
                continue;
            }
            let fields: Vec<u64> = counters
                .split_whitespace()
                .map(|f| f.parse().unwrap_or(0))
                .collect();
            if fields.len() < 12 {
                return Err(SampleError::Malformed("short /proc/net/dev row"));
            }
            return Ok(NetCounters {
                rx_dropped: fields[3],
                tx_dropped: fields[11],
            });
        }
        Err(SampleError::InterfaceNotFound(interface.to_string()))
    }

    pub fn total_dropped(&self) -> u64 {
        self.rx_dropped + self.tx_dropped
    }

    /// Drops per second between `prev` and `self` over `elapsed_secs`.
    /// Zero when no time has elapsed or the counters moved backwards.
    pub fn dropped_per_sec(&self, prev: &NetCounters, elapsed_secs: f64) -> f64 {
        if elapsed_secs <= 0.0 {
            return 0.0;
        }
        let delta = self.total_dropped().saturating_sub(prev.total_dropped());
        delta as f64 / elapsed_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NETDEV: &str = "\
Inter-|   Receive                                                |  Transmit\n\
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed\n\
    lo:  500000    1000    0    0    0     0          0         0   500000    1000    0    0    0     0       0          0\n\
  eth0: 8000000   60000    2   40    0     0          0         0  2000000   30000    1   10    0     0       0          0\n";

    #[test]
    fn finds_the_interface_drop_counters() {
        let c = NetCounters::parse(NETDEV, "eth0").unwrap();
        assert_eq!(c.rx_dropped, 40);
        assert_eq!(c.tx_dropped, 10);
        assert_eq!(c.total_dropped(), 50);
    }

    #[test]
    fn loopback_row_does_not_match_eth0() {
        let c = NetCounters::parse(NETDEV, "lo").unwrap();
        assert_eq!(c.total_dropped(), 0);
    }

    #[test]
    fn missing_interface_is_an_error() {
        let err = NetCounters::parse(NETDEV, "wlan0").unwrap_err();
        assert!(matches!(err, SampleError::InterfaceNotFound(_)));
    }

    #[test]
    fn drop_rate_is_delta_over_elapsed() {
        let prev = NetCounters {
            rx_dropped: 10,
            tx_dropped: 5,
        };
        let now = NetCounters {
            rx_dropped: 40,
            tx_dropped: 15,
        };
        assert!((now.dropped_per_sec(&prev, 5.0) - 8.0).abs() < 1e-9);
        assert_eq!(now.dropped_per_sec(&prev, 0.0), 0.0);
        // Counter reset (reboot of the interface) reads as no drops.
        assert_eq!(prev.dropped_per_sec(&now, 5.0), 0.0);
    }
}

//! Per-client fixed-window request counting.
//!
//! Each client gets a window starting at its first request. Requests are
//! counted until the window elapses, then the count starts over. IPv6
//! clients are grouped by their /64 prefix, since one host usually owns a
//! whole /64. Elapsed windows are swept at most once per window length.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv6Addr};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::config::WindowConfig;

const IPV6_PREFIX_MASK: u128 = !0u128 << 64;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

#[derive(Debug, Default)]
struct WindowTable {
    windows: HashMap<IpAddr, Window>,
    last_sweep: Option<Instant>,
}

impl WindowTable {
    fn sweep_if_due(&mut self, now: Instant, window: Duration) {
        let last = *self.last_sweep.get_or_insert(now);
        if now.saturating_duration_since(last) < window {
            return;
        }
        self.windows
            .retain(|_, w| now.saturating_duration_since(w.started) < window);
        self.last_sweep = Some(now);
    }
}

/// Outcome of counting one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Time until the client's window resets.
    pub reset_after: Duration,
}

/// The key a client's requests are counted under.
///
/// IPv4 addresses (including IPv4-mapped IPv6) are used as is; other IPv6
/// addresses are truncated to their /64 network.
pub fn client_key(ip: IpAddr) -> IpAddr {
    match ip {
        IpAddr::V4(_) => ip,
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => IpAddr::V4(v4),
            None => IpAddr::V6(Ipv6Addr::from(u128::from(v6) & IPV6_PREFIX_MASK)),
        },
    }
}

pub struct FixedWindowLimiter {
    config: WindowConfig,
    table: Mutex<WindowTable>,
}

impl FixedWindowLimiter {
    pub fn new(config: WindowConfig) -> Self {
        Self {
            config,
            table: Mutex::new(WindowTable::default()),
        }
    }

    /// Count a request from `ip` arriving at `now`.
    pub async fn check(&self, ip: IpAddr, now: Instant) -> RateDecision {
        let WindowConfig {
            max_requests,
            window,
        } = self.config;
        let mut table = self.table.lock().await;
        table.sweep_if_due(now, window);

        let entry = table.windows.entry(client_key(ip)).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.saturating_duration_since(entry.started) >= window {
            *entry = Window {
                started: now,
                count: 0,
            };
        }

        let allowed = entry.count < max_requests;
        if allowed {
            entry.count += 1;
        }

        RateDecision {
            allowed,
            limit: max_requests,
            remaining: max_requests.saturating_sub(entry.count),
            reset_after: window.saturating_sub(now.saturating_duration_since(entry.started)),
        }
    }

    pub async fn check_now(&self, ip: IpAddr) -> RateDecision {
        self.check(ip, Instant::now()).await
    }

    #[cfg(test)]
    async fn tracked_clients(&self) -> usize {
        self.table.lock().await.windows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn limiter(max_requests: u32, secs: u64) -> FixedWindowLimiter {
        FixedWindowLimiter::new(WindowConfig {
            max_requests,
            window: Duration::from_secs(secs),
        })
    }

    const CLIENT: IpAddr = IpAddr::V4(Ipv4Addr::new(203, 0, 113, 7));
    const OTHER: IpAddr = IpAddr::V4(Ipv4Addr::new(203, 0, 113, 8));

    #[tokio::test]
    async fn test_blocks_after_limit_within_window() {
        let limiter = limiter(20, 60);
        let start = Instant::now();

        for i in 0..20 {
            let decision = limiter.check(CLIENT, start + Duration::from_millis(i)).await;
            assert!(decision.allowed, "request {i}");
            assert_eq!(decision.remaining, 19 - i as u32);
        }

        let blocked = limiter.check(CLIENT, start + Duration::from_secs(30)).await;
        assert!(!blocked.allowed);
        assert_eq!(blocked.remaining, 0);
        assert_eq!(blocked.limit, 20);
        assert_eq!(blocked.reset_after, Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_window_resets() {
        let limiter = limiter(1, 60);
        let start = Instant::now();

        assert!(limiter.check(CLIENT, start).await.allowed);
        assert!(!limiter.check(CLIENT, start + Duration::from_secs(59)).await.allowed);
        assert!(limiter.check(CLIENT, start + Duration::from_secs(60)).await.allowed);
    }

    #[tokio::test]
    async fn test_clients_are_counted_separately() {
        let limiter = limiter(1, 60);
        let now = Instant::now();

        assert!(limiter.check(CLIENT, now).await.allowed);
        assert!(limiter.check(OTHER, now).await.allowed);
        assert!(!limiter.check(CLIENT, now).await.allowed);
    }

    #[test]
    fn test_client_key_groups_ipv6_by_prefix() {
        let host: IpAddr = "2001:db8:0:1:aaaa:bbbb:cccc:dddd".parse().unwrap();
        let network: IpAddr = "2001:db8:0:1::".parse().unwrap();
        assert_eq!(client_key(host), network);

        let mapped: IpAddr = "::ffff:203.0.113.7".parse().unwrap();
        assert_eq!(client_key(mapped), CLIENT);
        assert_eq!(client_key(CLIENT), CLIENT);
    }

    #[tokio::test]
    async fn test_rotating_within_one_ipv6_network_shares_a_window() {
        let limiter = limiter(1, 60);
        let now = Instant::now();

        let mut allowed = 0;
        for host in 0..50u16 {
            let ip = IpAddr::V6(Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, host));
            if limiter.check(ip, now).await.allowed {
                allowed += 1;
            }
        }
        assert_eq!(allowed, 1);

        let neighbour = IpAddr::V6(Ipv6Addr::new(0x2001, 0xdb8, 0, 1, 0, 0, 0, 1));
        assert!(limiter.check(neighbour, now).await.allowed);
        assert_eq!(limiter.tracked_clients().await, 2);
    }

    #[tokio::test]
    async fn test_elapsed_windows_are_swept() {
        let limiter = limiter(5, 60);
        let start = Instant::now();

        for octet in 0..=255u8 {
            let ip = IpAddr::V4(Ipv4Addr::new(198, 51, 100, octet));
            limiter.check(ip, start + Duration::from_secs(1)).await;
        }
        assert_eq!(limiter.tracked_clients().await, 256);

        // Not yet a full window since the last sweep.
        limiter.check(CLIENT, start + Duration::from_secs(59)).await;
        assert_eq!(limiter.tracked_clients().await, 257);

        limiter.check(OTHER, start + Duration::from_secs(61)).await;
        assert_eq!(limiter.tracked_clients().await, 2);
    }
}

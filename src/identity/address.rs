use std::{collections::HashSet, net::Ipv4Addr};

use rand::{Rng, seq::IndexedRandom as _};

use super::catalog;

/// A freshly drawn prefix that collides with a recorded one is redrawn at
/// most this many times before the duplicate is accepted.
const MAX_FRESH_REDRAWS: usize = 16;

/// The 3-octet prefixes already handed out by one engine instance.
///
/// Visitor reuse is bucketed on the prefix, never the full address: a
/// returning visitor gets a previously issued prefix with a fresh host
/// octet, which is how the consuming side distinguishes "same network" from
/// "new network". Two independently fresh visitors sharing a prefix by
/// chance is accepted behavior.
#[derive(Debug, Default)]
pub struct SubnetPool {
    issued: Vec<[u8; 3]>,
    seen: HashSet<[u8; 3]>,
}

impl SubnetPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct prefixes issued so far.
    pub fn len(&self) -> usize {
        self.issued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issued.is_empty()
    }

    /// Synthesizes the client address for one hit.
    ///
    /// A draw below `unique_prob` (or an empty pool) originates a new
    /// network; otherwise the visitor returns from a uniformly chosen
    /// previously issued prefix. The host octet always lands in 1..=254.
    pub fn address(&mut self, country_code: &str, unique_prob: f64, rng: &mut impl Rng) -> Ipv4Addr {
        let prefix = if self.issued.is_empty() || rng.random::<f64>() < unique_prob {
            self.fresh_prefix(country_code, rng)
        } else {
            *self
                .issued
                .choose(rng)
                .expect("issued pool checked non-empty")
        };
        Ipv4Addr::new(prefix[0], prefix[1], prefix[2], rng.random_range(1..=254))
    }

    fn fresh_prefix(&mut self, country_code: &str, rng: &mut impl Rng) -> [u8; 3] {
        let pool = catalog::first_octet_pool(country_code);
        let mut prefix = [0u8; 3];
        for _ in 0..MAX_FRESH_REDRAWS {
            prefix = [
                *pool.choose(rng).expect("octet pools are never empty"),
                rng.random(),
                rng.random(),
            ];
            if self.seen.insert(prefix) {
                self.issued.push(prefix);
                return prefix;
            }
        }
        // Out of redraws: hand back the colliding prefix. The pool already
        // holds it, so no recorded entry is lost.
        prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng as _, rngs::SmallRng};

    #[test]
    fn always_unique_grows_the_pool_per_hit() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut pool = SubnetPool::new();
        assert!(pool.is_empty());

        for expected in 1..=200usize {
            pool.address("US", 1.0, &mut rng);
            assert_eq!(pool.len(), expected);
        }
    }

    #[test]
    fn never_unique_reuses_recorded_prefixes() {
        let mut rng = SmallRng::seed_from_u64(11);
        let mut pool = SubnetPool::new();

        // First hit has nothing to reuse and must originate a network.
        pool.address("DE", 0.0, &mut rng);
        assert_eq!(pool.len(), 1);

        for _ in 0..100 {
            let ip = pool.address("DE", 0.0, &mut rng);
            let octets = ip.octets();
            assert_eq!(pool.len(), 1);
            assert!(pool.seen.contains(&[octets[0], octets[1], octets[2]]));
        }
    }

    #[test]
    fn host_octet_stays_in_range() {
        let mut rng = SmallRng::seed_from_u64(23);
        let mut pool = SubnetPool::new();

        for _ in 0..500 {
            let ip = pool.address("GB", 0.5, &mut rng);
            let host = ip.octets()[3];
            assert!((1..=254).contains(&host), "host octet {host} out of range");
        }
    }

    #[test]
    fn first_octet_comes_from_the_country_pool() {
        let mut rng = SmallRng::seed_from_u64(31);
        let mut pool = SubnetPool::new();

        for _ in 0..100 {
            let ip = pool.address("JP", 1.0, &mut rng);
            assert!(catalog::first_octet_pool("JP").contains(&ip.octets()[0]));
        }
    }

    #[test]
    fn unmapped_country_falls_back_to_default_pool() {
        let mut rng = SmallRng::seed_from_u64(43);
        let mut pool = SubnetPool::new();

        let ip = pool.address("ZZ", 1.0, &mut rng);
        assert!(catalog::DEFAULT_FIRST_OCTETS.contains(&ip.octets()[0]));
    }
}

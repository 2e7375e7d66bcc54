//! Property-based tests for port types and allocation.

use std::collections::HashSet;
use std::net::IpAddr;

use proptest::prelude::*;

use super::{MockPortProbe, Port, PortAllocator, PortRange};
use crate::error::Error;

// Ranges are kept small so the occupied sets can cover them.
fn range_strategy() -> impl Strategy<Value = (u16, u16)> {
    (1024u16..=60000).prop_flat_map(|min| (Just(min), min..=min.saturating_add(64)))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 1000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn range_iteration_matches_len((min, max) in range_strategy()) {
        let range =
            PortRange::new(Port::try_from(min).unwrap(), Port::try_from(max).unwrap()).unwrap();
        let ports: Vec<Port> = range.iter().collect();

        prop_assert_eq!(ports.len() as u32, range.len());
        prop_assert!(ports.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(ports.iter().all(|p| range.contains(*p)));
    }

    #[test]
    fn allocation_returns_lowest_free_port_in_range(
        (min, max) in range_strategy(),
        busy in prop::collection::vec(any::<prop::sample::Index>(), 0..80),
    ) {
        let range =
            PortRange::new(Port::try_from(min).unwrap(), Port::try_from(max).unwrap()).unwrap();
        let all: Vec<Port> = range.iter().collect();
        let occupied: HashSet<Port> = busy.iter().map(|i| *i.get(&all)).collect();

        let allocator = PortAllocator::new(MockPortProbe::new(occupied.clone()));
        let ip: IpAddr = "127.0.0.1".parse().unwrap();

        match allocator.allocate(ip, range) {
            Ok(port) => {
                prop_assert!(range.contains(port));
                prop_assert!(!occupied.contains(&port));
                prop_assert!(all.iter().take_while(|p| **p < port).all(|p| occupied.contains(p)));
            }
            Err(Error::NoPortAvailable { .. }) => {
                prop_assert_eq!(occupied.len(), all.len());
            }
            Err(other) => prop_assert!(false, "unexpected error {other:?}"),
        }
    }

    #[test]
    fn config_values_outside_u16_are_rejected(value in prop_oneof![i64::MIN..=0i64, 65536i64..=i64::MAX]) {
        prop_assert!(Port::from_config_value(value).is_err());
    }
}

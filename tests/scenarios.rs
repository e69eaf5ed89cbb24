use std::net::IpAddr;

use route_solver::config::{from_ini_str, from_toml_str};
use route_solver::protocol::{Admission, Route, RoutingTable};
use route_solver::{RouteError, TopologyContext};

fn ip(s: &str) -> IpAddr {
    s.parse().unwrap()
}

fn derive(topology: &str) -> TopologyContext {
    let mut ctx = from_toml_str(topology).unwrap();
    ctx.derive_routes().unwrap();
    ctx
}

fn routes_of<'a>(ctx: &'a TopologyContext, router: &str) -> &'a [Route] {
    ctx.routers.get(router).unwrap().routing_table.routes()
}

const TWO_ROUTERS: &str = r#"
[N1]
network_address = "192.168.1.0/24"
network_name = "N1"
router_name = "R1"

[R1-R2]
network_address = "10.0.0.0/30"
router_1_name = "R1"
router_2_name = "R2"

[N2]
network_address = "192.168.2.0/24"
network_name = "N2"
router_name = "R2"
"#;

// R1-R2 and R2-R3 cost 1, R1-R3 cost 5. N1 behind R1, N3 behind R3.
const TRIANGLE: &str = r#"
[N1]
network_address = "192.168.1.0/24"
network_name = "N1"
router_name = "R1"

[R1-R2]
network_address = "10.0.0.0/30"
router_1_name = "R1"
router_2_name = "R2"
metric = 1

[R2-R3]
network_address = "10.0.0.4/30"
router_1_name = "R2"
router_2_name = "R3"
metric = 1

[R1-R3]
network_address = "10.0.0.8/30"
router_1_name = "R1"
router_2_name = "R3"
metric = 5

[N3]
network_address = "192.168.3.0/24"
network_name = "N3"
router_name = "R3"
"#;

#[test]
fn two_routers_learn_each_others_network() {
    let ctx = derive(TWO_ROUTERS);

    assert_eq!(routes_of(&ctx, "R1"), &[Route::new("N2", ip("10.0.0.2"), 1)]);
    assert_eq!(routes_of(&ctx, "R2"), &[Route::new("N1", ip("10.0.0.1"), 1)]);
}

#[test]
fn directly_attached_networks_are_never_routed() {
    for topology in [TWO_ROUTERS, TRIANGLE] {
        let ctx = derive(topology);

        for router in ctx.routers.iter() {
            for attached in &router.attached {
                let direct_cost = ctx.graph.weight(&router.name, &attached.network).unwrap();
                assert!(
                    router
                        .routing_table
                        .routes_to(&attached.network)
                        .all(|r| r.metric != direct_cost),
                    "{} routes to its own network {}",
                    router.name,
                    attached.network
                );
            }
        }
    }
}

#[test]
fn isolated_router_network_is_unreachable() {
    let topology = format!(
        "{}{}",
        TWO_ROUTERS,
        r#"
[N9]
network_address = "192.168.9.0/24"
network_name = "N9"
router_name = "R9"
"#
    );
    let ctx = derive(&topology);

    for router in ctx.routers.iter() {
        assert_eq!(router.routing_table.routes_to("N9").count(), 0);
    }
    assert!(routes_of(&ctx, "R9").is_empty());
    assert_eq!(routes_of(&ctx, "R1"), &[Route::new("N2", ip("10.0.0.2"), 1)]);
}

#[test]
fn triangle_tables_follow_enumeration_order() {
    let ctx = derive(TRIANGLE);

    // R1 -> N3: via R2 (cost 2) is enumerated first, then the direct R3 link
    // (cost 5) through another gateway, which is kept.
    assert_eq!(
        routes_of(&ctx, "R1"),
        &[
            Route::new("N3", ip("10.0.0.2"), 2),
            Route::new("N3", ip("10.0.0.10"), 5),
        ]
    );

    // R2 -> N3: the detour through R1 (cost 6) comes first and is then
    // overwritten in place by the direct path through R3 (cost 1).
    assert_eq!(
        routes_of(&ctx, "R2"),
        &[
            Route::new("N1", ip("10.0.0.1"), 1),
            Route::new("N1", ip("10.0.0.6"), 6),
            Route::new("N3", ip("10.0.0.6"), 1),
        ]
    );

    assert_eq!(
        routes_of(&ctx, "R3"),
        &[
            Route::new("N1", ip("10.0.0.5"), 2),
            Route::new("N1", ip("10.0.0.9"), 5),
        ]
    );
}

#[test]
fn admission_order_changes_the_surviving_routes() {
    let via_r3 = Route::new("N3", ip("10.0.0.10"), 5);
    let via_r2 = Route::new("N3", ip("10.0.0.2"), 2);

    let mut direct_first = RoutingTable::new();
    assert_eq!(
        direct_first.admit(via_r3.clone()),
        Admission::Appended { position: 0 }
    );
    assert_eq!(
        direct_first.admit(via_r2.clone()),
        Admission::ReplacedBetterMetric {
            position: 0,
            previous: via_r3.clone(),
        }
    );
    assert_eq!(direct_first.routes(), &[via_r2.clone()]);

    let mut detour_first = RoutingTable::new();
    detour_first.admit(via_r2.clone());
    assert_eq!(
        detour_first.admit(via_r3.clone()),
        Admission::Appended { position: 1 }
    );
    assert_eq!(detour_first.routes(), &[via_r2, via_r3]);

    assert_ne!(direct_first, detour_first);
}

#[test]
fn derivation_is_reproducible() {
    let first = derive(TRIANGLE);
    let second = derive(TRIANGLE);

    for (a, b) in first.routers.iter().zip(second.routers.iter()) {
        assert_eq!(a.name, b.name);
        assert_eq!(a.routing_table, b.routing_table);
    }
}

#[test]
fn malformed_sections_do_not_stop_derivation() {
    let topology = format!(
        "{}{}",
        TWO_ROUTERS,
        r#"
[broken]
network_address = "10.9.9.0/30"
router_1_name = "R1"
"#
    );
    let ctx = derive(&topology);

    assert_eq!(ctx.routers.len(), 2);
    assert_eq!(routes_of(&ctx, "R1"), &[Route::new("N2", ip("10.0.0.2"), 1)]);
}

#[test]
fn oversized_path_metrics_are_an_error() {
    let mut ctx = from_toml_str(
        r#"
[R1-R2]
network_address = "10.0.0.0/30"
router_1_name = "R1"
router_2_name = "R2"
metric = 3000000000

[R2-R3]
network_address = "10.0.0.4/30"
router_1_name = "R2"
router_2_name = "R3"
metric = 3000000000

[N3]
network_address = "192.168.3.0/24"
network_name = "N3"
router_name = "R3"
"#,
    )
    .unwrap();

    match ctx.derive_routes() {
        Err(RouteError::MetricOverflow { path }) => {
            assert_eq!(path, vec!["R1", "R2", "R3", "N3"]);
        }
        other => panic!("expected a metric overflow, got {:?}", other),
    }
}

#[test]
fn original_ini_topologies_derive_routes() {
    let mut ctx = from_ini_str(
        "\
[A]
network_address=192.168.1.0/24
network_name=Madrid
router_name=R1

[AS1]
network_address=10.0.0.0/30
router_1_name=R1
router_2_name=R2

[AS2]
network_address=192.168.2.0/24
router_1_name=R2
router_2_name=R3
metric=4

[C]
network_address=192.168.3.0/24
network_name=Lisboa
router_name=R3
",
    )
    .unwrap();
    ctx.derive_routes().unwrap();

    assert_eq!(
        routes_of(&ctx, "R1"),
        &[Route::new("Lisboa", ip("10.0.0.2"), 5)]
    );
    assert_eq!(
        routes_of(&ctx, "R3"),
        &[Route::new("Madrid", ip("192.168.2.1"), 5)]
    );
}

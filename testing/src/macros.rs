//! Assertion macros for routing results.

/// Assert that `$router` finds a route in `$graph` from `$from` to `$to`.
///
/// ```rust,ignore
/// assert_route!(graph, state('A'), state('C'));
/// assert_route!(graph, state('A'), state('C'), labels = ["A->B", "B->C"]);
/// assert_route!(graph, state('A'), state('C'), weight = 3.0);
/// ```
#[macro_export]
macro_rules! assert_route {
    ($graph:expr, $from:expr, $to:expr) => {{
        match $crate::__route(&$graph, &$from, &$to) {
            Ok(route) => route,
            Err(e) => panic!("expected a route, got: {e}"),
        }
    }};
    ($graph:expr, $from:expr, $to:expr, labels = [$($label:expr),* $(,)?]) => {{
        let route = $crate::assert_route!($graph, $from, $to);
        let actual: Vec<&str> = route.negotiators().iter().map(|n| n.label()).collect();
        let expected: Vec<&str> = vec![$($label),*];
        assert_eq!(actual, expected, "route labels differ");
        route
    }};
    ($graph:expr, $from:expr, $to:expr, weight = $weight:expr) => {{
        let route = $crate::assert_route!($graph, $from, $to);
        let expected: f64 = $weight;
        assert!(
            (route.total_weight() - expected).abs() < 1e-9,
            "route weight {} != expected {}",
            route.total_weight(),
            expected
        );
        route
    }};
}

/// Assert that no route exists in `$graph` from `$from` to `$to`.
#[macro_export]
macro_rules! assert_no_route {
    ($graph:expr, $from:expr, $to:expr) => {{
        match $crate::__route(&$graph, &$from, &$to) {
            Ok(route) => panic!(
                "expected no route, got {} negotiators (weight {})",
                route.len(),
                route.total_weight()
            ),
            Err(e) => e,
        }
    }};
}

//! Threaded tests for dp-table.

use std::sync::atomic::AtomicBool;
use std::time::Duration;

use dp_core::{AgentId, AgentState, DpError, DurationRange, Ring, TableConfig};
use dp_protocol::{RecordingObserver, Transition, TransitionObserver};

use crate::{TableBuilder, TableError};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn fast_config(ring_size: usize, seed: u64, max_meals: Option<u64>) -> TableConfig {
    TableConfig {
        ring_size,
        seed,
        think_ms: DurationRange::new(0, 2),
        eat_ms:   DurationRange::new(0, 2),
        max_meals,
    }
}

/// Replay a transition sequence and check it against the lifecycle and the
/// adjacency rule.  Returns meals per philosopher.
fn replay(ring: Ring, transitions: &[Transition]) -> Vec<u64> {
    let mut states = vec![AgentState::Thinking; ring.size()];
    let mut meals = vec![0u64; ring.size()];

    for (step, t) in transitions.iter().enumerate() {
        let before = states[t.id.index()];
        let legal = matches!(
            (before, t.state),
            (AgentState::Thinking, AgentState::Hungry)
                | (AgentState::Hungry, AgentState::Eating)
                | (AgentState::Hungry, AgentState::Thinking) // abandoned on shutdown
                | (AgentState::Eating, AgentState::Thinking)
        );
        assert!(legal, "step {step}: philosopher {} went {before} -> {}", t.id, t.state);

        if t.state == AgentState::Eating {
            for n in ring.neighbors(t.id) {
                assert_ne!(
                    states[n.index()],
                    AgentState::Eating,
                    "step {step}: {} and {} eating together",
                    t.id,
                    n
                );
            }
            meals[t.id.index()] += 1;
        }
        states[t.id.index()] = t.state;
    }
    assert!(states.iter().all(|s| s.is_thinking()), "run ended with {states:?}");
    meals
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn single_seat_table_rejected() {
        let result = TableBuilder::new(TableConfig::with_ring_size(1)).build();
        assert!(matches!(
            result,
            Err(TableError::Protocol(DpError::RingTooSmall { size: 1 }))
        ));
    }

    #[test]
    fn empty_table_rejected() {
        assert!(TableBuilder::new(TableConfig::with_ring_size(0)).build().is_err());
    }

    #[test]
    fn empty_duration_range_rejected() {
        let config = TableConfig {
            think_ms: DurationRange::new(3, 1),
            ..TableConfig::default()
        };
        assert!(matches!(
            TableBuilder::new(config).build(),
            Err(TableError::Protocol(DpError::Config(_)))
        ));
    }

    #[test]
    fn seat_checks_range() {
        let table = TableBuilder::new(TableConfig::with_ring_size(3)).build().unwrap();
        assert_eq!(table.seat(AgentId(2)).unwrap().id(), AgentId(2));
        assert!(table.seat(AgentId(3)).is_err());
    }

    #[test]
    fn seat_taken_only_once() {
        let table = TableBuilder::new(fast_config(3, 0, Some(1))).build().unwrap();
        let first = table.seat(AgentId(0)).unwrap();
        assert!(matches!(
            table.seat(AgentId(0)),
            Err(TableError::Protocol(DpError::SeatTaken { id: AgentId(0) }))
        ));

        // The one lifecycle that got the seat still runs normally.
        let summary = first.start().unwrap().await_termination().unwrap();
        assert_eq!(summary.meals, 1);
    }

    #[test]
    fn start_refuses_a_hand_taken_seat() {
        let table = TableBuilder::new(fast_config(3, 0, Some(1))).build().unwrap();
        let _held = table.seat(AgentId(1)).unwrap();
        assert!(matches!(
            table.start(),
            Err(TableError::Protocol(DpError::SeatTaken { id: AgentId(1) }))
        ));
    }
}

// ── Bounded runs ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod bounded_tests {
    use super::*;

    #[test]
    fn five_seats_every_meal_served() {
        let table = TableBuilder::new(fast_config(5, 42, Some(20)))
            .observer(RecordingObserver::new())
            .build()
            .unwrap();
        let report = table.start().unwrap().await_termination().unwrap();

        assert_eq!(report.meals(), vec![20; 5]);
        assert!(report.is_clean(), "{:?}", report.ledger);
        assert_eq!(report.ledger.retractions, 0);

        let meals = replay(Ring::new(5).unwrap(), &report.observer.transitions);
        assert_eq!(meals, vec![20; 5]);
        // HUNGRY + EATING + THINKING per meal.
        assert_eq!(report.observer.transitions.len(), 5 * 20 * 3);
    }

    #[test]
    fn two_seats_take_turns() {
        let table = TableBuilder::new(fast_config(2, 7, Some(25)))
            .observer(RecordingObserver::new())
            .build()
            .unwrap();
        let report = table.start().unwrap().await_termination().unwrap();
        assert_eq!(report.meals(), vec![25, 25]);
        assert!(report.is_clean());
        replay(Ring::new(2).unwrap(), &report.observer.transitions);
    }

    #[test]
    fn every_ring_size_and_seed() {
        for n in 2..=8 {
            for seed in 0..4 {
                let config = TableConfig {
                    think_ms: DurationRange::fixed(0),
                    eat_ms: DurationRange::new(0, 1),
                    ..fast_config(n, seed, Some(8))
                };
                let table = TableBuilder::new(config)
                    .observer(RecordingObserver::new())
                    .build()
                    .unwrap();
                let report = table.start().unwrap().await_termination().unwrap();
                assert!(report.is_clean(), "n={n} seed={seed}");
                let meals = replay(Ring::new(n).unwrap(), &report.observer.transitions);
                assert!(meals.iter().all(|&m| m == 8), "n={n} seed={seed} meals={meals:?}");
            }
        }
    }

    #[test]
    fn run_returns_when_meals_are_done() {
        let stop = AtomicBool::new(false);
        let table = TableBuilder::new(fast_config(4, 3, Some(5))).build().unwrap();
        let report = table.run(&stop, Duration::from_millis(1)).unwrap();
        assert_eq!(report.meals(), vec![5; 4]);
        assert!(report.is_clean());
    }
}

// ── Shutdown ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod shutdown_tests {
    use super::*;

    #[test]
    fn unbounded_run_stops_cleanly() {
        let table = TableBuilder::new(fast_config(5, 11, None))
            .observer(RecordingObserver::new())
            .build()
            .unwrap();
        let running = table.start().unwrap();
        std::thread::sleep(Duration::from_millis(50));
        running.shutdown_handle().shutdown();
        let report = running.await_termination().unwrap();

        assert_eq!(report.summaries.len(), 5);
        assert!(report.is_clean(), "{:?}", report.final_states);
        replay(Ring::new(5).unwrap(), &report.observer.transitions);
    }

    #[test]
    fn parked_philosopher_abandons_on_shutdown() {
        // Eating takes long enough that whoever is hungry is parked when the
        // shutdown lands.
        let config = TableConfig {
            ring_size: 3,
            seed:      5,
            think_ms:  DurationRange::fixed(0),
            eat_ms:    DurationRange::fixed(300),
            max_meals: None,
        };
        let table = TableBuilder::new(config)
            .observer(RecordingObserver::new())
            .build()
            .unwrap();
        let running = table.start().unwrap();
        std::thread::sleep(Duration::from_millis(60));

        let parked = running
            .snapshot()
            .iter()
            .filter(|a| a.state == AgentState::Hungry && a.pending > 0)
            .count();
        assert!(parked >= 1, "{:?}", running.snapshot());

        running.shutdown_handle().shutdown();
        let report = running.await_termination().unwrap();
        assert!(report.is_clean());
        assert!(report.ledger.retractions >= 1, "{:?}", report.ledger);
        replay(Ring::new(3).unwrap(), &report.observer.transitions);
    }

    #[test]
    fn preset_stop_flag_ends_run() {
        let stop = AtomicBool::new(true);
        let table = TableBuilder::new(fast_config(3, 1, None)).build().unwrap();
        let report = table.run(&stop, Duration::from_millis(1)).unwrap();
        assert!(report.is_clean());
    }

    #[test]
    fn shutdown_handle_outlives_table() {
        let table = TableBuilder::new(fast_config(2, 0, Some(1))).build().unwrap();
        let running = table.start().unwrap();
        let handle = running.shutdown_handle();
        let report = running.await_termination().unwrap();
        assert!(report.is_clean());
        handle.shutdown();
    }
}

// ── Failure ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod failure_tests {
    use super::*;

    /// Panics the first time philosopher 0 starts eating.
    struct Tripwire;

    impl TransitionObserver for Tripwire {
        fn on_transition(&mut self, id: AgentId, state: AgentState) {
            if id == AgentId(0) && state == AgentState::Eating {
                panic!("tripwire");
            }
        }
    }

    #[test]
    fn panicking_philosopher_does_not_wedge_the_table() {
        let table = TableBuilder::new(fast_config(4, 9, Some(50)))
            .observer(Tripwire)
            .build()
            .unwrap();
        let result = table.start().unwrap().await_termination();
        assert!(matches!(result, Err(TableError::AgentPanicked { id: AgentId(0) })));
    }
}

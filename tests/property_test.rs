//! Property checks for the dispatch rules
//!
//! Random call sequences against the queue, the controller and a full
//! simulation.

use std::collections::BTreeSet;

use proptest::prelude::*;

use elevator_sim::simulation::{
    CallDirection, CallQueue, DispatchController, ElevatorSim, Event, EventKind, EventSource,
    Floor, ScheduledCall, SimConfig, DEFAULT_DWELL,
};

const FLOORS: usize = 8;

fn floor() -> impl Strategy<Value = Floor> {
    (0..FLOORS).prop_map(Floor)
}

fn controller_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        floor().prop_map(|f| Event::external_call(f, CallDirection::Up)),
        floor().prop_map(|f| Event::internal_call(f, CallDirection::Down)),
        floor().prop_map(Event::car_approach),
        floor().prop_map(Event::car_stop),
        floor().prop_map(Event::door_opened),
        floor().prop_map(Event::door_closed),
    ]
}

fn scripted_call() -> impl Strategy<Value = ScheduledCall> {
    (0.0f32..20.0, 0..FLOORS, any::<bool>(), any::<bool>()).prop_map(
        |(at, floor, external, up)| {
            if external {
                // The top landing only has a down button
                let direction = if up && floor + 1 < FLOORS {
                    CallDirection::Up
                } else {
                    CallDirection::Down
                };
                ScheduledCall::external(at, floor, direction)
            } else {
                ScheduledCall::internal(at, floor)
            }
        },
    )
}

proptest! {
    #[test]
    fn queue_never_holds_a_floor_twice(
        calls in prop::collection::vec((floor(), floor(), floor()), 0..40)
    ) {
        let mut queue = CallQueue::new();
        for (call, last_served, car_floor) in calls {
            queue.register(call, last_served, car_floor);
            let distinct: BTreeSet<Floor> = queue.iter().collect();
            prop_assert_eq!(distinct.len(), queue.len());
        }
    }

    #[test]
    fn controller_queue_stays_distinct(events in prop::collection::vec(controller_event(), 0..60)) {
        let mut controller = DispatchController::new(FLOORS, DEFAULT_DWELL);
        for event in events {
            controller.handle(&event).unwrap();
            let distinct: BTreeSet<Floor> = controller.queue().iter().collect();
            prop_assert_eq!(distinct.len(), controller.queue().len());
        }
    }

    #[test]
    fn stop_marks_floor_served_and_dequeued(
        events in prop::collection::vec(controller_event(), 0..40),
        stop in floor(),
    ) {
        let mut controller = DispatchController::new(FLOORS, DEFAULT_DWELL);
        for event in events {
            controller.handle(&event).unwrap();
        }
        controller.handle(&Event::car_stop(stop)).unwrap();
        prop_assert_eq!(controller.last_served(), stop);
        prop_assert!(!controller.queue().contains(stop));
    }

    #[test]
    fn resting_floor_call_is_idempotent(rest in floor(), repeats in 1usize..5) {
        let mut controller = DispatchController::new(FLOORS, DEFAULT_DWELL);
        controller.handle(&Event::car_stop(rest)).unwrap();
        for _ in 0..repeats {
            controller.handle(&Event::external_call(rest, CallDirection::Up)).unwrap();
            prop_assert!(controller.queue().is_empty());
            prop_assert_eq!(controller.last_served(), rest);
        }
    }

    #[test]
    fn floor_on_the_way_is_served_first(
        floors in prop::sample::subsequence((0..FLOORS).collect::<Vec<usize>>(), 3),
        going_up in any::<bool>(),
    ) {
        let (low, on_the_way, high) = (Floor(floors[0]), Floor(floors[1]), Floor(floors[2]));
        let (start, target) = if going_up { (low, high) } else { (high, low) };

        let mut sim = ElevatorSim::new(SimConfig::with_floors(FLOORS)).unwrap();
        sim.press_internal(start).unwrap();
        sim.run_until_idle(0.05, 200.0).unwrap();
        prop_assert_eq!(sim.last_served(), start);

        sim.press_internal(target).unwrap();
        sim.press_external(on_the_way, CallDirection::between(start, target)).unwrap();
        sim.run_until_idle(0.05, 200.0).unwrap();

        // A call at the resting ground floor is answered without a stop
        let mut expected = if start == Floor(0) { vec![] } else { vec![start] };
        expected.extend([on_the_way, target]);
        prop_assert_eq!(sim.served_floors(), expected.as_slice());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn every_requested_floor_gets_served(calls in prop::collection::vec(scripted_call(), 1..8)) {
        let mut sim = ElevatorSim::new(SimConfig::with_floors(FLOORS)).unwrap();
        sim.run_script(&calls, 0.05, 600.0).unwrap();

        prop_assert!(sim.queue().is_empty());
        prop_assert_eq!(sim.stats().protocol_violations, 0);
        let served: BTreeSet<Floor> = sim.served_floors().iter().copied().collect();
        // A press at the resting floor is answered with a door cycle only
        let opened: BTreeSet<Floor> = sim
            .event_history()
            .filter(|event| event.source == EventSource::DoorSensor && event.kind == EventKind::Open)
            .map(|event| event.floor)
            .collect();
        for call in &calls {
            prop_assert!(
                served.contains(&call.floor) || opened.contains(&call.floor),
                "floor {} was never served",
                call.floor
            );
        }
    }
}

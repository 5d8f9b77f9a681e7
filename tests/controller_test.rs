//! Dispatch controller tests
//!
//! Drive the controller with hand-made events, no car or doors attached.

use elevator_sim::simulation::{
    CallDirection, Command, DispatchController, Event, Floor, Outcome, Registration, SimError,
    DEFAULT_DWELL,
};

fn external(floor: usize) -> Event {
    Event::external_call(Floor(floor), CallDirection::Up)
}

fn internal(floor: usize) -> Event {
    Event::internal_call(Floor(floor), CallDirection::Up)
}

fn floors(values: &[usize]) -> Vec<Floor> {
    values.iter().map(|f| Floor(*f)).collect()
}

#[test]
fn test_resting_floor_call_cycles_door_without_queueing() {
    let mut controller = DispatchController::new(4, DEFAULT_DWELL);
    let dispatch = controller.handle(&external(0)).unwrap();

    assert_eq!(
        dispatch.commands,
        vec![
            Command::OpenDoor(Floor(0)),
            Command::CloseDoorAfter {
                floor: Floor(0),
                delay: DEFAULT_DWELL
            },
        ]
    );
    assert!(controller.queue().is_empty());
    assert_eq!(
        dispatch.outcomes,
        vec![Outcome::Registered {
            floor: Floor(0),
            registration: Registration::ServedInPlace
        }]
    );
}

#[test]
fn test_duplicate_tail_call_is_ignored() {
    let mut controller = DispatchController::new(4, DEFAULT_DWELL);
    controller.handle(&internal(3)).unwrap();
    let dispatch = controller.handle(&external(3)).unwrap();

    assert_eq!(controller.queue().to_vec(), floors(&[3]));
    assert_eq!(
        dispatch.outcomes,
        vec![Outcome::Registered {
            floor: Floor(3),
            registration: Registration::DuplicateTail
        }]
    );
    // The car is simply re-sent to the same head
    assert_eq!(dispatch.commands, vec![Command::TravelTo(Floor(3))]);
}

#[test]
fn test_call_on_the_way_retargets_the_car() {
    let mut controller = DispatchController::new(4, DEFAULT_DWELL);
    controller.handle(&internal(3)).unwrap();
    let dispatch = controller.handle(&external(1)).unwrap();

    assert_eq!(controller.queue().to_vec(), floors(&[1, 3]));
    assert_eq!(dispatch.commands, vec![Command::TravelTo(Floor(1))]);
}

#[test]
fn test_stop_dequeues_and_remembers_floor() {
    let mut controller = DispatchController::new(4, DEFAULT_DWELL);
    controller.handle(&internal(3)).unwrap();
    controller.handle(&external(1)).unwrap();
    controller.handle(&Event::car_approach(Floor(1))).unwrap();
    let dispatch = controller.handle(&Event::car_stop(Floor(1))).unwrap();

    assert_eq!(controller.last_served(), Floor(1));
    assert_eq!(controller.queue().to_vec(), floors(&[3]));
    assert!(dispatch.outcomes.contains(&Outcome::StopServed(Floor(1))));
}

#[test]
fn test_car_waits_for_door_closed_before_leaving() {
    let mut controller = DispatchController::new(4, DEFAULT_DWELL);
    controller.handle(&internal(2)).unwrap();
    controller.handle(&Event::car_stop(Floor(2))).unwrap();

    // Door is open at 2: a new call is queued but the car stays
    let dispatch = controller.handle(&internal(0)).unwrap();
    assert_eq!(controller.queue().to_vec(), floors(&[0]));
    assert!(dispatch.commands.is_empty());

    controller.handle(&Event::door_opened(Floor(2))).unwrap();
    let dispatch = controller.handle(&Event::door_closed(Floor(2))).unwrap();
    assert_eq!(dispatch.commands, vec![Command::TravelTo(Floor(0))]);
}

#[test]
fn test_door_closed_with_empty_queue_does_nothing() {
    let mut controller = DispatchController::new(4, DEFAULT_DWELL);
    controller.handle(&external(0)).unwrap();
    let dispatch = controller.handle(&Event::door_closed(Floor(0))).unwrap();
    assert!(dispatch.commands.is_empty());
}

#[test]
fn test_unexpected_stop_resynchronizes_last_served() {
    let mut controller = DispatchController::new(4, DEFAULT_DWELL);
    controller.handle(&internal(3)).unwrap();
    controller.handle(&internal(2)).unwrap();
    assert_eq!(controller.queue().to_vec(), floors(&[2, 3]));

    // Car reports a stop at 3 while 2 is at the head
    let dispatch = controller.handle(&Event::car_stop(Floor(3))).unwrap();

    assert_eq!(controller.last_served(), Floor(3));
    assert_eq!(controller.queue().to_vec(), floors(&[2]));
    assert!(dispatch.outcomes.contains(&Outcome::Recovered(SimError::QueueMismatch {
        expected: Some(Floor(2)),
        reported: Floor(3),
    })));
    assert!(dispatch.commands.contains(&Command::OpenDoor(Floor(3))));
}

#[test]
fn test_stop_with_empty_queue_is_recovered() {
    let mut controller = DispatchController::new(4, DEFAULT_DWELL);
    let dispatch = controller.handle(&Event::car_stop(Floor(2))).unwrap();
    assert_eq!(controller.last_served(), Floor(2));
    assert!(matches!(
        dispatch.outcomes.first(),
        Some(Outcome::Recovered(SimError::QueueMismatch { expected: None, .. }))
    ));
}

#[test]
fn test_invalid_floor_is_rejected() {
    let mut controller = DispatchController::new(2, DEFAULT_DWELL);
    assert!(matches!(
        controller.handle(&Event::car_stop(Floor(2))),
        Err(SimError::InvalidFloor { floor: 2, num_floors: 2 })
    ));
    assert_eq!(controller.last_served(), Floor(0));
}

#[test]
fn test_dwell_comes_from_controller_settings() {
    let mut controller = DispatchController::new(4, 5.0);
    let dispatch = controller.handle(&external(0)).unwrap();
    assert!(dispatch.commands.contains(&Command::CloseDoorAfter {
        floor: Floor(0),
        delay: 5.0
    }));
}

#[test]
fn test_car_floor_follows_motion_notifications() {
    let mut controller = DispatchController::new(4, DEFAULT_DWELL);
    controller.handle(&internal(3)).unwrap();
    controller.handle(&Event::car_approach(Floor(1))).unwrap();
    assert_eq!(controller.state().car_floor, Floor(1));
    assert_eq!(controller.state().last_served, Floor(0));

    // Floor 1 is where the car is now: not pushed ahead of 3
    controller.handle(&external(1)).unwrap();
    assert_eq!(controller.queue().to_vec(), floors(&[3, 1]));

    controller.handle(&Event::car_approach(Floor(2))).unwrap();
    controller.handle(&Event::car_approach(Floor(3))).unwrap();
    controller.handle(&Event::car_stop(Floor(3))).unwrap();
    assert_eq!(controller.state().car_floor, Floor(3));
    assert!(!controller.state().doors_closed());
}

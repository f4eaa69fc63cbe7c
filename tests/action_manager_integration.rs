//! ActionManager integration tests: lifecycle, lazy removal, pausing, dead
//! targets and actions that mutate the manager while they step.

use bevy_ecs::prelude::*;
use glam::Vec2;

use actionloop::actions::Action;
use actionloop::components::mapposition::MapPosition;
use actionloop::events::action::ActionFinished;
use actionloop::resources::actionmanager::ActionManager;
use actionloop::systems::actions::{add_action, run_action, update_actions};

const EPSILON: f32 = 1e-4;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec_approx_eq(a: Vec2, b: Vec2) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

#[derive(Resource, Default)]
struct Finished(Vec<ActionFinished>);

fn make_world() -> World {
    let mut world = World::new();
    world.insert_resource(ActionManager::new());
    world.init_resource::<Finished>();
    world.add_observer(|finished: On<ActionFinished>, mut log: ResMut<Finished>| {
        log.0.push(finished.event().clone());
    });
    world
}

fn position(world: &World, entity: Entity) -> Vec2 {
    world.get::<MapPosition>(entity).unwrap().pos
}

fn count(world: &World, entity: Entity) -> usize {
    world
        .resource::<ActionManager>()
        .number_of_running_actions_in_target(entity)
}

#[test]
fn move_by_runs_to_completion_and_is_reclaimed() {
    let mut world = make_world();
    let e = world.spawn(MapPosition::new(0.0, 0.0)).id();
    let id = run_action(
        &mut world,
        e,
        Action::move_by(1.0, Vec2::new(10.0, 0.0)).with_tag(4),
    );

    for step in 1..=3 {
        update_actions(&mut world, 0.25);
        assert!(vec_approx_eq(position(&world, e), Vec2::new(2.5 * step as f32, 0.0)));
        assert!(world.resource::<Finished>().0.is_empty());
    }

    update_actions(&mut world, 0.25);
    assert!(vec_approx_eq(position(&world, e), Vec2::new(10.0, 0.0)));
    let finished = &world.resource::<Finished>().0;
    assert_eq!(finished.len(), 1);
    assert_eq!(finished[0].entity, e);
    assert_eq!(finished[0].id, id);
    assert_eq!(finished[0].tag, 4);

    // Stopped but still recorded until the next update visits it.
    assert_eq!(count(&world, e), 1);
    assert!(world.resource::<ActionManager>().get_action_by_tag(4, e).is_none());

    update_actions(&mut world, 0.25);
    assert_eq!(count(&world, e), 0);
    assert_eq!(world.resource::<ActionManager>().total_actions(), 0);
    assert_eq!(world.resource::<Finished>().0.len(), 1);
}

#[test]
fn first_step_uses_its_delta() {
    let mut world = make_world();
    let e = world.spawn(MapPosition::new(0.0, 0.0)).id();
    run_action(&mut world, e, Action::move_to(2.0, Vec2::new(20.0, 0.0)));
    update_actions(&mut world, 0.5);
    assert!(vec_approx_eq(position(&world, e), Vec2::new(5.0, 0.0)));
}

#[test]
fn action_removing_sibling_prevents_its_step() {
    let mut world = make_world();
    let e = world.spawn(MapPosition::new(0.0, 0.0)).id();
    run_action(
        &mut world,
        e,
        Action::call_func(|world, target| {
            world
                .resource_mut::<ActionManager>()
                .remove_action_by_tag(2, target);
        }),
    );
    run_action(&mut world, e, Action::move_by(1.0, Vec2::new(10.0, 0.0)).with_tag(2));

    update_actions(&mut world, 0.5);
    assert_eq!(position(&world, e), Vec2::ZERO);
    // The removed sibling is reclaimed as the walk reaches it; the finished
    // call waits for the next update.
    assert_eq!(count(&world, e), 1);
    // Only the call finished; removal does not count as finishing.
    assert_eq!(world.resource::<Finished>().0.len(), 1);

    update_actions(&mut world, 0.5);
    assert_eq!(count(&world, e), 0);
    assert_eq!(position(&world, e), Vec2::ZERO);
}

#[test]
fn action_removing_itself_mid_run_stops() {
    let mut world = make_world();
    let e = world.spawn(MapPosition::new(0.0, 0.0)).id();
    let seq = Action::sequence([
        Action::move_by(0.5, Vec2::new(4.0, 0.0)),
        Action::call_func(|world, target| {
            world
                .resource_mut::<ActionManager>()
                .remove_action_by_tag(9, target);
        }),
        Action::move_by(0.5, Vec2::new(4.0, 0.0)),
    ])
    .with_tag(9);
    let id = run_action(&mut world, e, seq);

    update_actions(&mut world, 0.6);
    let am = world.resource::<ActionManager>();
    assert!(am.action(id).unwrap().target().is_none());
    let reached = position(&world, e).x;
    assert!(reached >= 4.0 && reached < 8.0);

    update_actions(&mut world, 1.0);
    assert_eq!(count(&world, e), 0);
    assert!(approx_eq(position(&world, e).x, reached));
    assert!(world.resource::<Finished>().0.is_empty());
}

#[test]
fn actions_added_during_update_wait_for_next_update() {
    let mut world = make_world();
    let e = world.spawn(MapPosition::new(0.0, 0.0)).id();
    run_action(
        &mut world,
        e,
        Action::call_func(|world, target| {
            run_action(world, target, Action::place(Vec2::new(5.0, 5.0)));
        }),
    );
    update_actions(&mut world, 0.1);
    assert_eq!(position(&world, e), Vec2::ZERO);
    update_actions(&mut world, 0.1);
    assert_eq!(position(&world, e), Vec2::new(5.0, 5.0));
}

#[test]
fn remove_all_from_other_target_during_update() {
    let mut world = make_world();
    let a = world.spawn(MapPosition::new(0.0, 0.0)).id();
    let b = world.spawn(MapPosition::new(0.0, 0.0)).id();
    run_action(
        &mut world,
        a,
        Action::call_func(move |world, _| {
            world
                .resource_mut::<ActionManager>()
                .remove_all_actions_from_target(b);
        }),
    );
    run_action(&mut world, b, Action::move_by(1.0, Vec2::new(1.0, 1.0)));
    run_action(&mut world, b, Action::move_by(1.0, Vec2::new(1.0, 1.0)));

    update_actions(&mut world, 0.5);
    assert_eq!(position(&world, b), Vec2::ZERO);
    update_actions(&mut world, 0.5);
    assert_eq!(count(&world, b), 0);
    assert_eq!(world.resource::<ActionManager>().targets().count(), 0);
}

#[test]
fn paused_actions_keep_their_progress() {
    let mut world = make_world();
    let e = world.spawn(MapPosition::new(0.0, 0.0)).id();
    add_action(&mut world, Action::move_by(1.0, Vec2::new(10.0, 0.0)), e, true);

    update_actions(&mut world, 0.5);
    assert_eq!(position(&world, e), Vec2::ZERO);

    world.resource_mut::<ActionManager>().resume_target(e);
    update_actions(&mut world, 0.5);
    assert!(vec_approx_eq(position(&world, e), Vec2::new(5.0, 0.0)));

    world.resource_mut::<ActionManager>().pause_target(e);
    update_actions(&mut world, 0.5);
    assert!(vec_approx_eq(position(&world, e), Vec2::new(5.0, 0.0)));
}

#[test]
fn despawned_target_actions_are_reclaimed() {
    let mut world = make_world();
    let e = world.spawn(MapPosition::new(0.0, 0.0)).id();
    run_action(&mut world, e, Action::move_by(1.0, Vec2::new(10.0, 0.0)));
    run_action(&mut world, e, Action::delay(3.0));
    world.despawn(e);

    update_actions(&mut world, 0.5);
    let am = world.resource::<ActionManager>();
    assert_eq!(am.total_actions(), 0);
    assert_eq!(am.targets().count(), 0);
    assert!(world.resource::<Finished>().0.is_empty());
}

#[test]
fn remove_self_despawns_and_finishes() {
    let mut world = make_world();
    let e = world.spawn(MapPosition::new(0.0, 0.0)).id();
    run_action(
        &mut world,
        e,
        Action::sequence([Action::delay(0.2), Action::remove_self()]),
    );
    update_actions(&mut world, 0.1);
    assert!(world.get_entity(e).is_ok());
    update_actions(&mut world, 0.2);
    assert!(world.get_entity(e).is_err());
    assert_eq!(world.resource::<Finished>().0.len(), 1);
    update_actions(&mut world, 0.1);
    assert_eq!(world.resource::<ActionManager>().total_actions(), 0);
}

#[test]
fn remove_all_actions_stops_every_target() {
    let mut world = make_world();
    let a = world.spawn(MapPosition::new(0.0, 0.0)).id();
    let b = world.spawn(MapPosition::new(0.0, 0.0)).id();
    run_action(&mut world, a, Action::move_by(1.0, Vec2::X));
    run_action(&mut world, b, Action::move_by(1.0, Vec2::Y));
    world.resource_mut::<ActionManager>().remove_all_actions();

    update_actions(&mut world, 0.5);
    assert_eq!(position(&world, a), Vec2::ZERO);
    assert_eq!(position(&world, b), Vec2::ZERO);
    assert_eq!(world.resource::<ActionManager>().total_actions(), 0);
}

#[test]
fn actions_step_in_target_then_insertion_order() {
    #[derive(Resource, Default)]
    struct Order(Vec<&'static str>);

    let mut world = make_world();
    world.init_resource::<Order>();
    let a = world.spawn_empty().id();
    let b = world.spawn_empty().id();
    let mark = |label: &'static str| {
        Action::call_func(move |world, _| world.resource_mut::<Order>().0.push(label))
    };
    run_action(&mut world, b, mark("b1"));
    run_action(&mut world, a, mark("a1"));
    run_action(&mut world, b, mark("b2"));

    update_actions(&mut world, 0.0);
    assert_eq!(world.resource::<Order>().0, vec!["b1", "b2", "a1"]);
}

#[test]
fn action_clearing_its_own_target_does_not_disturb_the_pass() {
    let mut world = make_world();
    let e = world.spawn(MapPosition::new(0.0, 0.0)).id();
    let other = world.spawn(MapPosition::new(0.0, 0.0)).id();
    let x = run_action(
        &mut world,
        e,
        Action::call_func(|world, target| {
            world
                .resource_mut::<ActionManager>()
                .remove_all_actions_from_target(target);
        }),
    );
    let y = run_action(&mut world, e, Action::move_by(1.0, Vec2::X));
    run_action(&mut world, other, Action::move_by(1.0, Vec2::new(4.0, 0.0)));

    update_actions(&mut world, 0.5);
    let am = world.resource::<ActionManager>();
    assert!(am.action(x).unwrap().target().is_none());
    assert!(am.action(y).is_none());
    assert_eq!(position(&world, e), Vec2::ZERO);
    assert!(vec_approx_eq(position(&world, other), Vec2::new(2.0, 0.0)));
    // X removed itself in the step that completed it.
    assert!(world.resource::<Finished>().0.is_empty());
}

#[test]
fn removal_during_final_step_suppresses_finished_event() {
    let mut world = make_world();
    let e = world.spawn(MapPosition::new(0.0, 0.0)).id();
    let id = run_action(
        &mut world,
        e,
        Action::sequence([
            Action::delay(0.5),
            Action::call_func(|world, target| {
                world
                    .resource_mut::<ActionManager>()
                    .remove_all_actions_from_target(target);
            }),
        ]),
    );
    let other = run_action(&mut world, e, Action::delay(0.5));

    update_actions(&mut world, 1.0);
    assert!(world.resource::<Finished>().0.is_empty());
    let am = world.resource::<ActionManager>();
    assert!(am.action(id).unwrap().target().is_none());
    assert!(am.action(other).is_none());

    update_actions(&mut world, 1.0);
    assert_eq!(count(&world, e), 0);
    assert!(world.resource::<Finished>().0.is_empty());
}

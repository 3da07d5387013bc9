//! Benchmarks for zone touch dispatch
//!
//! Every touch resolves a handle against the trigger arena and asks the host
//! whether the entity is still alive before the timer transition runs, so
//! this path is hit many times per tick on busy servers.
//!
//! Run with `cargo bench --features benchmark`.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use kztimer::test_utils::{FakePawn, FakeWorld, course_descriptor, zone_spawn};
use kztimer::types::{EntityHandle, PlayerSlot, TickStamp, TriggerKind};
use kztimer::{Env, SilentFeedback, TimerConfig, TimerSystem, ZoneRegistry};
use std::hint::black_box;

const PLAYER: PlayerSlot = PlayerSlot(1);

/// Registry with `courses` courses of ten checkpoints each.
fn populated_registry(courses: u32) -> ZoneRegistry {
    let mut zones = ZoneRegistry::new(&TimerConfig::default());
    let mut index = 1;
    for course in 0..courses {
        let name = format!("course{course}");
        zones.on_entity_spawned(&course_descriptor(EntityHandle::new(index, 0), &name)).unwrap();
        index += 1;
        for number in 1..=10 {
            let spawn = zone_spawn(EntityHandle::new(index, 0), TriggerKind::ZoneCheckpoint, &name, Some(number));
            zones.on_entity_spawned(&spawn).unwrap();
            index += 1;
        }
    }
    zones.finish_setup();
    zones
}

fn bench_resolve_trigger(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_trigger");
    let world = FakeWorld::default();

    for courses in [1u32, 16, 128] {
        let zones = populated_registry(courses);
        let live = EntityHandle::new(2, 0);
        let stale = EntityHandle::new(2, 1);

        group.bench_with_input(BenchmarkId::new("live", courses), &zones, |b, zones| {
            b.iter(|| black_box(zones.resolve_trigger(black_box(live), &world)))
        });
        group.bench_with_input(BenchmarkId::new("stale", courses), &zones, |b, zones| {
            b.iter(|| black_box(zones.resolve_trigger(black_box(stale), &world)))
        });
    }
    group.finish();
}

fn bench_touch_dispatch(c: &mut Criterion) {
    let mut system = TimerSystem::new(TimerConfig::default());
    let start = EntityHandle::new(100, 0);
    let checkpoint = EntityHandle::new(101, 0);
    {
        let zones = system.zones_mut();
        zones.on_entity_spawned(&course_descriptor(EntityHandle::new(99, 0), "Main")).unwrap();
        zones.on_entity_spawned(&zone_spawn(start, TriggerKind::ZoneStart, "Main", None)).unwrap();
        zones.on_entity_spawned(&zone_spawn(checkpoint, TriggerKind::ZoneCheckpoint, "Main", Some(1))).unwrap();
        zones.finish_setup();
    }
    system.on_player_connect(PLAYER);

    let world = FakeWorld::default();
    let mut pawn = FakePawn::default();
    let mut feedback = SilentFeedback;
    let clock = TickStamp::at_tick(1, system.config().tick_interval);
    {
        let mut env = Env::new(clock, &mut pawn, &mut feedback, "classic");
        system.on_trigger_start_touch(PLAYER, start, &world, &mut env);
        system.on_trigger_end_touch(PLAYER, start, &world, &mut env);
    }

    c.bench_function("checkpoint_touch_running", |b| {
        let mut tick = 2;
        b.iter(|| {
            tick += 1;
            let clock = TickStamp::at_tick(tick, 1.0 / 64.0);
            let mut env = Env::new(clock, &mut pawn, &mut feedback, "classic");
            black_box(system.on_trigger_start_touch(PLAYER, black_box(checkpoint), &world, &mut env))
        })
    });
}

criterion_group!(benches, bench_resolve_trigger, bench_touch_dispatch);
criterion_main!(benches);

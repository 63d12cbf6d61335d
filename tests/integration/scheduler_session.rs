//! Integration tests for a full scheduler session

use super::test_utils::{counting_callback, Widget};
use std::sync::Arc;
use std::time::Duration;
use tickwork::cli::{format_report_text, run_simulation, FireSource, SimulationPlan};
use tickwork::{Scheduler, SchedulerConfig};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn test_wall_and_frame_timers_run_side_by_side() {
    let (mut scheduler, clock) = Scheduler::manual(SchedulerConfig::default()).unwrap();
    let widget = Widget::new();
    let wall = counting_callback();
    let frame = counting_callback();

    scheduler.timers().schedule_loop(ms(100), &widget, &wall, true, ());
    scheduler.frames().frame_loop(ms(50), &widget, &frame, true, ());

    for i in 1..=10u64 {
        clock.advance(ms(20));
        scheduler.on_frame(ms(20 * i));
    }
    // 200ms of wall time: 2 wall fires; 200ms of frame time at 20ms
    // granularity crosses 50ms every third frame: 3 frame fires.
    assert_eq!(widget.hits(), 5);
}

#[test]
fn test_stopped_driver_freezes_frame_timers_only() {
    let (mut scheduler, clock) = Scheduler::manual(SchedulerConfig::default()).unwrap();
    let widget = Widget::new();
    let wall = counting_callback();
    let frame = counting_callback();

    scheduler.timers().schedule_once(ms(30), &widget, &wall, true, ());
    scheduler.frames().frame_once(ms(30), &widget, &frame, true, ());

    scheduler.stop_frames();
    clock.advance(ms(50));
    assert_eq!(scheduler.on_frame(ms(50)), None);
    assert_eq!(widget.hits(), 1);
    assert!(scheduler.frames().contains(&widget, &frame));
}

#[test]
fn test_released_context_is_pruned() {
    let (scheduler, _clock) = Scheduler::manual(SchedulerConfig::default()).unwrap();
    let widget = Widget::new();
    let cb = counting_callback();

    scheduler.frames().frame_loop(ms(10), &widget, &cb, true, ());
    scheduler.clear_context(&widget);
    drop(widget);

    assert_eq!(scheduler.resolver().prune(), 1);
    assert!(scheduler.resolver().is_empty());
}

#[test]
fn test_context_outlives_caller_while_timer_is_live() {
    let (scheduler, clock) = Scheduler::manual(SchedulerConfig::default()).unwrap();
    let widget = Widget::new();
    let cb = counting_callback();
    scheduler.timers().schedule_loop(ms(10), &widget, &cb, true, ());

    let observer = Arc::downgrade(&widget);
    drop(widget);
    clock.advance(ms(10));

    let widget = observer.upgrade().unwrap();
    assert_eq!(widget.hits(), 1);
    assert_eq!(scheduler.clear_context(&widget), 1);
}

#[test]
fn test_simulation_report_renders() {
    let plan = SimulationPlan {
        frames: 3,
        frame_ms: 16,
        frame_loop: vec![16],
        once: vec![40],
        ..Default::default()
    };
    let report = run_simulation(SchedulerConfig::default(), &plan).unwrap();

    let wall: Vec<_> = report
        .events
        .iter()
        .filter(|e| e.source == FireSource::Wall)
        .collect();
    assert_eq!(wall.len(), 1);
    assert_eq!(wall[0].at_ms, 40);
    assert_eq!(report.events.len(), 4);

    let text = format_report_text(&report);
    assert!(text.contains("once(40)"));
    assert!(text.contains("3 frames"));
}

//! Integration tests for wall-clock timers on a tokio runtime

use super::test_utils::{counting_callback, Widget};
use std::time::Duration;
use tickwork::{Scheduler, SchedulerConfig};

#[tokio::test(start_paused = true)]
async fn test_session_on_tokio_runtime() {
    let scheduler = Scheduler::with_tokio(SchedulerConfig::default()).unwrap();
    let widget = Widget::new();
    let every = counting_callback();
    let once = counting_callback();

    scheduler
        .timers()
        .schedule_loop(Duration::from_millis(10), &widget, &every, true, ());
    scheduler
        .timers()
        .schedule_once(Duration::from_millis(25), &widget, &once, true, ());
    assert_eq!(scheduler.timers().len(), 2);

    tokio::time::sleep(Duration::from_millis(35)).await;
    assert_eq!(widget.hits(), 4);
    assert!(!scheduler.timers().contains(&widget, &once));

    assert!(scheduler.timers().clear(&widget, &every));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(widget.hits(), 4);
}

#[test]
fn test_session_without_runtime_fails() {
    assert!(Scheduler::with_tokio(SchedulerConfig::default()).is_err());
}

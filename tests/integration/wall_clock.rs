//! Integration tests for the wall-clock timer registry over a manual clock

use super::test_utils::{counting_callback, Widget};
use std::sync::Arc;
use std::time::Duration;
use tickwork::{Callback, ManualClock, TimerRegistry};

fn registry() -> (TimerRegistry, ManualClock) {
    let clock = ManualClock::new();
    (TimerRegistry::new(Arc::new(clock.clone())), clock)
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn test_loop_fires_every_period_until_cleared() {
    let (timers, clock) = registry();
    let widget = Widget::new();
    let tick = counting_callback();

    timers.schedule_loop(ms(100), &widget, &tick, true, ());
    clock.advance(ms(350));
    assert_eq!(widget.hits(), 3);

    assert!(timers.clear(&widget, &tick));
    clock.advance(ms(500));
    assert_eq!(widget.hits(), 3);
    assert!(timers.is_empty());
    assert_eq!(clock.pending(), 0);
}

#[test]
fn test_once_fires_once_and_retires() {
    let (timers, clock) = registry();
    let widget = Widget::new();
    let tick = counting_callback();

    timers.schedule_once(ms(50), &widget, &tick, true, ());
    assert!(timers.contains(&widget, &tick));

    clock.advance(ms(49));
    assert_eq!(widget.hits(), 0);
    clock.advance(ms(1));
    assert_eq!(widget.hits(), 1);

    clock.advance(ms(1000));
    assert_eq!(widget.hits(), 1);
    assert!(!timers.contains(&widget, &tick));
    assert_eq!(timers.context_count(), 0);
}

#[test]
fn test_reregistering_replaces_prior_timer() {
    let (timers, clock) = registry();
    let widget = Widget::new();
    let tick = counting_callback();

    timers.schedule_loop(ms(10), &widget, &tick, true, ());
    timers.schedule_loop(ms(10), &widget, &tick, true, ());
    assert_eq!(timers.len(), 1);
    assert_eq!(clock.pending(), 1);

    clock.advance(ms(30));
    assert_eq!(widget.hits(), 3);
}

#[test]
fn test_overwrite_without_clearing_leaks_prior_timer() {
    let (timers, clock) = registry();
    let widget = Widget::new();
    let tick = counting_callback();

    timers.schedule_loop(ms(10), &widget, &tick, true, ());
    timers.schedule_loop(ms(10), &widget, &tick, false, ());
    assert_eq!(timers.len(), 1);
    assert_eq!(clock.pending(), 2);

    clock.advance(ms(10));
    assert_eq!(widget.hits(), 2);

    // Only the tracked timer can be cancelled.
    timers.clear(&widget, &tick);
    clock.advance(ms(10));
    assert_eq!(widget.hits(), 3);
    assert_eq!(clock.pending(), 1);
}

#[test]
fn test_different_callbacks_are_independent() {
    let (timers, clock) = registry();
    let widget = Widget::new();
    let first = counting_callback();
    let second = counting_callback();

    timers.schedule_loop(ms(10), &widget, &first, true, ());
    timers.schedule_loop(ms(10), &widget, &second, true, ());
    assert_eq!(timers.context_len(&widget), 2);

    timers.clear(&widget, &first);
    clock.advance(ms(20));
    assert_eq!(widget.hits(), 2);
    assert!(timers.contains(&widget, &second));
}

#[test]
fn test_same_callback_on_different_contexts_is_independent() {
    let (timers, clock) = registry();
    let a = Widget::new();
    let b = Widget::new();
    let tick = counting_callback();

    let key_a = timers.schedule_loop(ms(10), &a, &tick, true, ());
    let key_b = timers.schedule_loop(ms(10), &b, &tick, true, ());
    assert_ne!(key_a, key_b);

    clock.advance(ms(10));
    assert_eq!(a.hits(), 1);
    assert_eq!(b.hits(), 1);
}

#[test]
fn test_clear_all_leaves_other_contexts() {
    let (timers, clock) = registry();
    let a = Widget::new();
    let b = Widget::new();
    let first = counting_callback();
    let second = counting_callback();

    timers.schedule_loop(ms(10), &a, &first, true, ());
    timers.schedule_once(ms(10), &a, &second, true, ());
    timers.schedule_loop(ms(10), &b, &first, true, ());

    assert_eq!(timers.clear_all(&a), 2);
    assert_eq!(timers.clear_all(&a), 0);
    assert_eq!(timers.context_count(), 1);

    clock.advance(ms(10));
    assert_eq!(a.hits(), 0);
    assert_eq!(b.hits(), 1);
}

#[test]
fn test_clear_unknown_is_noop() {
    let (timers, _clock) = registry();
    let widget = Widget::new();
    assert!(!timers.clear(&widget, &counting_callback()));
    assert_eq!(timers.clear_all(&widget), 0);
}

#[test]
fn test_bound_arguments_reach_callback() {
    let (timers, clock) = registry();
    let log = Arc::new(journal::Log::default());
    let append: Callback<journal::Log, String> =
        Callback::new(|log: &journal::Log, word: &String| log.push(word));

    timers.schedule_once(ms(5), &log, &append, true, "hello".to_string());
    clock.advance(ms(5));
    assert_eq!(log.words(), vec!["hello".to_string()]);
}

#[test]
fn test_callback_can_clear_itself() {
    let (timers, clock) = registry();
    let widget = Widget::new();
    let slot: Arc<std::sync::Mutex<Option<Callback<Widget>>>> = Arc::default();

    let registry = timers.clone();
    let own = Arc::clone(&slot);
    let target = Arc::clone(&widget);
    let stop_after_two = Callback::no_args(move |w: &Widget| {
        let n = w.hits.fetch_add(1, std::sync::atomic::Ordering::SeqCst) + 1;
        if n == 2 {
            if let Some(cb) = own.lock().unwrap().as_ref() {
                registry.clear(&target, cb);
            }
        }
    });
    *slot.lock().unwrap() = Some(stop_after_two.clone());

    timers.schedule_loop(ms(10), &widget, &stop_after_two, true, ());
    clock.advance(ms(100));
    assert_eq!(widget.hits(), 2);
    assert!(timers.is_empty());

    // Break the callback -> slot cycle.
    slot.lock().unwrap().take();
}

mod journal {
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct Log(Mutex<Vec<String>>);

    impl Log {
        pub fn push(&self, word: &str) {
            self.0.lock().unwrap().push(word.to_string());
        }

        pub fn words(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }
}

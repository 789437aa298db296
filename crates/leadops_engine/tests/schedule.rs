use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use leadops_engine::{Debouncer, PollTimer};
use tokio::runtime::Handle;
use tokio::time::sleep;

#[tokio::test(start_paused = true)]
async fn debouncer_runs_only_the_last_of_a_burst() {
    let runs = Arc::new(Mutex::new(Vec::new()));
    let mut debouncer = Debouncer::new(Handle::current());

    for text in ["b", "ba", "bak", "bake", "bakery"] {
        let runs = runs.clone();
        debouncer.schedule(Duration::from_millis(500), async move {
            runs.lock().unwrap().push(text);
        });
        sleep(Duration::from_millis(40)).await;
    }

    // 40ms of the last quiet period already passed inside the loop.
    sleep(Duration::from_millis(450)).await;
    assert!(runs.lock().unwrap().is_empty());

    sleep(Duration::from_millis(20)).await;
    assert_eq!(*runs.lock().unwrap(), vec!["bakery"]);
}

#[tokio::test(start_paused = true)]
async fn zero_delay_runs_promptly_and_cancel_drops_pending() {
    let runs = Arc::new(AtomicUsize::new(0));
    let mut debouncer = Debouncer::new(Handle::current());

    let counter = runs.clone();
    debouncer.schedule(Duration::ZERO, async move {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    sleep(Duration::from_millis(1)).await;
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    let counter = runs.clone();
    debouncer.schedule(Duration::from_millis(500), async move {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    debouncer.cancel();
    sleep(Duration::from_secs(2)).await;
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn poll_timer_ticks_each_interval_until_dropped() {
    let ticks = Arc::new(AtomicUsize::new(0));
    let counter = ticks.clone();
    let timer = PollTimer::start(&Handle::current(), Duration::from_millis(3000), move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    sleep(Duration::from_millis(2990)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), 0);

    sleep(Duration::from_millis(6020)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), 3);

    drop(timer);
    sleep(Duration::from_secs(30)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn cancelled_poll_timer_stops() {
    let ticks = Arc::new(AtomicUsize::new(0));
    let counter = ticks.clone();
    let timer = PollTimer::start(&Handle::current(), Duration::from_millis(100), move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    sleep(Duration::from_millis(150)).await;
    timer.cancel();
    assert!(timer.is_cancelled());
    sleep(Duration::from_secs(1)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), 1);
}

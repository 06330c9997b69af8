#![allow(dead_code)]

use std::sync::Arc;

use booking_server::{
    calendar::{CalendarDate, FixedClock, TimeOfDay, Weekday},
    config::BookingConfig,
    models::availability::AvailabilityWindow,
    scheduling::Scheduler,
    store::{MemoryStore, SchedulingStore},
};

pub const PRO: &str = "pro-1";
pub const OTHER_PRO: &str = "pro-2";

pub const HAIRCUT: u64 = 1;
pub const COLOR: u64 = 2;
pub const MASSAGE: u64 = 3;

/// Monday.
pub const TODAY: &str = "2026-10-19";
pub const NOW: &str = "10:00";

pub fn date(s: &str) -> CalendarDate {
    s.parse().unwrap()
}

pub fn time(s: &str) -> TimeOfDay {
    s.parse().unwrap()
}

pub fn times(list: &[TimeOfDay]) -> Vec<String> {
    list.iter().map(|t| t.to_string()).collect()
}

pub struct Fixture {
    pub store: Arc<MemoryStore>,
    pub scheduler: Scheduler,
}

/// Two professionals open Monday 08:00-18:00 offering a 30, 45 and 60 minute
/// service, with the clock at Monday 2026-10-19 10:00.
pub fn fixture() -> Fixture {
    fixture_with_grid(BookingConfig::default())
}

pub fn fixture_with_grid(config: BookingConfig) -> Fixture {
    let store = Arc::new(MemoryStore::new());
    store.add_service(HAIRCUT, "haircut", 30);
    store.add_service(COLOR, "color", 45);
    store.add_service(MASSAGE, "massage", 60);

    for pid in &[PRO, OTHER_PRO] {
        store.add_professional(pid, "Someone", true);
        for sid in &[HAIRCUT, COLOR, MASSAGE] {
            store.offer_service(pid, *sid);
        }
    }

    let clock = FixedClock::at(date(TODAY), time(NOW));
    let scheduler = Scheduler::new(
        store.clone() as Arc<dyn SchedulingStore>,
        Arc::new(clock),
        config,
    );

    for pid in &[PRO, OTHER_PRO] {
        scheduler
            .set_availability(
                pid,
                Weekday::Monday,
                AvailabilityWindow::open(time("08:00"), time("18:00")).unwrap(),
            )
            .unwrap();
    }

    Fixture { store, scheduler }
}

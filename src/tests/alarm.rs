use crate::{
    message::{Message, MessageType},
    prelude::{
        ApplyOutcome, Config, CorrectionDatabase, Discard, Duration, Error, Slot, Unavailable,
    },
    tests::{fast_corrections, geo, gps, gps_mask, init_logger, t0},
};

#[test]
fn geo_alarm_swap() {
    init_logger();

    let t0 = t0();
    let (g120, g123) = (geo(20), geo(23));

    let mut db = CorrectionDatabase::new(Config::default());

    for geo in [g120, g123] {
        db.apply_message(geo, &gps_mask(0, 3), t0).unwrap();
        db.apply_message(geo, &fast_corrections(0, 0, &[(1.5, 3), (-2.0, 5)]), t0)
            .unwrap();
    }

    assert_eq!(db.geos().count(), 2);

    let t1 = t0 + Duration::from_seconds(1.0);
    let outcome = db.apply_message(g123, &Message::DoNotUse, t1).unwrap();
    assert_eq!(outcome, ApplyOutcome::Stored);

    assert_eq!(db.alarms().primary().map(|alarm| alarm.geo), Some(g123));
    assert_eq!(
        db.record(Slot::Geo(g123))
            .unwrap()
            .received(MessageType::DoNotUse),
        1
    );

    // source and aggregate are cleared, other GEOs are not
    assert_eq!(
        db.fast_correction(Slot::Geo(g123), gps(1), t1),
        Err(Unavailable::GeoAlarm(g123))
    );
    assert_eq!(
        db.fast_correction(Slot::Aggregate, gps(1), t1),
        Err(Unavailable::NoMask)
    );
    assert!(db.fast_correction(Slot::Geo(g120), gps(1), t1).is_ok());
    assert_eq!(db.record(Slot::Geo(g123)).unwrap().masks().count(), 0);

    let outcome = db.apply_message(g123, &gps_mask(0, 3), t1).unwrap();
    assert_eq!(outcome, ApplyOutcome::Discarded(Discard::GeoAlarm(g123)));

    // G120 alarm displaces G123, whose cool down restarts
    let t2 = t0 + Duration::from_seconds(30.0);
    db.apply_message(g120, &Message::DoNotUse, t2).unwrap();

    let primary = db.alarms().primary().unwrap();
    let deferred = db.alarms().deferred();
    assert_eq!((primary.geo, primary.since), (g120, t2));
    assert_eq!(deferred.len(), 1);
    assert_eq!((deferred[0].geo, deferred[0].since), (g123, t2));

    // 60s after the first alarm: G123 still alarmed
    let t = t1 + Duration::from_seconds(61.0);
    db.process_epoch(t);

    assert!(db.alarms().is_alarmed(g123, t));
    assert!(db.alarms().is_alarmed(g120, t));

    let outcome = db.apply_message(g123, &gps_mask(0, 3), t).unwrap();
    assert_eq!(outcome, ApplyOutcome::Discarded(Discard::GeoAlarm(g123)));

    let t = t2 + Duration::from_seconds(61.0);
    db.process_epoch(t);

    assert!(db.alarms().primary().is_none());
    assert!(db.alarms().deferred().is_empty());

    let outcome = db.apply_message(g123, &gps_mask(0, 3), t).unwrap();
    assert_eq!(outcome, ApplyOutcome::Stored);
}

#[test]
fn alarm_between_epoch_ticks() {
    init_logger();

    let t0 = t0();
    let (g120, g123) = (geo(20), geo(23));

    let mut db = CorrectionDatabase::new(Config::default());

    db.apply_message(g120, &Message::DoNotUse, t0).unwrap();

    for dt in 0..=60 {
        db.process_epoch(t0 + Duration::from_seconds(dt as f64));
    }

    // G120 cool down is over, but no epoch tick expired it yet
    let t = t0 + Duration::from_seconds(60.5);
    assert!(!db.alarms().is_alarmed(g120, t));

    db.apply_message(g123, &Message::DoNotUse, t).unwrap();
    assert!(db.alarms().deferred().is_empty());

    let t = t0 + Duration::from_seconds(90.0);
    let outcome = db.apply_message(g120, &gps_mask(0, 3), t).unwrap();
    assert_eq!(outcome, ApplyOutcome::Stored);

    let outcome = db.apply_message(g123, &gps_mask(0, 3), t).unwrap();
    assert_eq!(outcome, ApplyOutcome::Discarded(Discard::GeoAlarm(g123)));
}

#[test]
fn aggregate_mirroring() {
    init_logger();

    let t0 = t0();
    let (g120, g123) = (geo(20), geo(23));

    let mut db = CorrectionDatabase::new(Config::default());

    db.apply_message(g120, &gps_mask(0, 3), t0).unwrap();
    db.apply_message(g120, &fast_corrections(0, 0, &[(1.5, 3), (-2.0, 5)]), t0)
        .unwrap();

    let t1 = t0 + Duration::from_seconds(1.0);
    db.apply_message(g123, &gps_mask(0, 3), t1).unwrap();
    db.apply_message(g123, &fast_corrections(0, 2, &[(1.4, 4)]), t1)
        .unwrap();

    // most recent data, whatever its source
    let fast = db.fast_correction(Slot::Aggregate, gps(1), t1).unwrap();
    assert_eq!((fast.udrei, fast.prc_at(t1)), (4, 1.4));

    let fast = db.fast_correction(Slot::Geo(g120), gps(1), t1).unwrap();
    assert_eq!((fast.udrei, fast.prc_at(t1)), (3, 1.5));

    // G02 only comes from G120
    let fast = db.fast_correction(Slot::Aggregate, gps(2), t1).unwrap();
    assert_eq!(fast.udrei, 5);

    assert_eq!(
        db.fast_correction(Slot::Geo(geo(30)), gps(1), t1),
        Err(Unavailable::UnknownGeo(geo(30)))
    );

    let aggregate = db.record(Slot::Aggregate).unwrap();
    assert!(aggregate.geo.is_none());
    assert_eq!(aggregate.received(MessageType::PrnMask), 2);
    assert_eq!(aggregate.received(MessageType::FastCorrections), 2);
}

#[test]
fn geo_capacity() {
    init_logger();

    let t0 = t0();

    let cfg = Config::default().with_max_geos(2);
    let mut db = CorrectionDatabase::new(cfg);

    db.apply_message(geo(20), &gps_mask(0, 3), t0).unwrap();
    db.apply_message(geo(23), &gps_mask(0, 3), t0).unwrap();

    assert_eq!(
        db.apply_message(geo(26), &gps_mask(0, 3), t0),
        Err(Error::TooManyGeos(geo(26), 2))
    );

    // reset keeps the GEOs we track
    db.reset();
    assert_eq!(db.geos().count(), 2);
    assert_eq!(db.record(Slot::Aggregate).unwrap().masks().count(), 0);
}

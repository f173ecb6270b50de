use crate::{
    message::{FastDegradation, Message, MessageType},
    prelude::{
        Config, CorrectionDatabase, Duration, EntryState, NavigationMode, Slot, TimeoutOverride,
        Unavailable,
    },
    tests::{fast_corrections, geo, gps, gps_mask, init_logger, t0},
};

#[test]
fn fast_correction_timeout_monotonicity() {
    init_logger();

    let t0 = t0();
    let geo = geo(23);

    for mode in [
        NavigationMode::PrecisionApproach,
        NavigationMode::NonPrecisionApproach,
    ] {
        let cfg = Config::default().with_navigation_mode(mode);
        let mut db = CorrectionDatabase::new(cfg);

        db.apply_message(geo, &gps_mask(0, 3), t0).unwrap();
        db.apply_message(geo, &fast_corrections(0, 0, &[(1.5, 3), (-2.0, 5)]), t0)
            .unwrap();

        let mut expired = false;

        for dt in 0..40 {
            let t = t0 + Duration::from_seconds(dt as f64);
            db.process_epoch(t);

            let available = db.fast_correction(Slot::Geo(geo), gps(1), t).is_ok();

            if expired {
                assert!(!available, "{}: G01 came back to life at t0+{}s", mode, dt);
            } else if !available {
                expired = true;
                // no MT7: the most stringent degradation factor applies
                match mode {
                    NavigationMode::PrecisionApproach => assert_eq!(dt, 13),
                    NavigationMode::NonPrecisionApproach => assert_eq!(dt, 19),
                }
            }
        }

        assert!(expired, "{}: G01 never timed out", mode);
    }
}

#[test]
fn mode_switch() {
    init_logger();

    let t0 = t0();
    let geo = geo(23);
    let slot = Slot::Geo(geo);

    let mut db = CorrectionDatabase::new(Config::default());
    assert_eq!(db.mode(), NavigationMode::NonPrecisionApproach);

    db.apply_message(geo, &gps_mask(0, 3), t0).unwrap();
    db.apply_message(geo, &fast_corrections(0, 0, &[(1.5, 3)]), t0)
        .unwrap();

    let t = t0 + Duration::from_seconds(15.0);

    let fast = db.fast_correction(slot, gps(1), t).unwrap();
    assert_eq!(fast.prc_at(t), 1.5);
    assert_eq!(fast.udrei, 3);

    // stale in PA, not purged yet
    db.set_mode(NavigationMode::PrecisionApproach);
    assert_eq!(db.fast_correction_state(slot, gps(1), t), EntryState::Stale);
    assert_eq!(
        db.fast_correction(slot, gps(1), t),
        Err(Unavailable::NoFastCorrection(gps(1)))
    );

    db.set_mode(NavigationMode::NonPrecisionApproach);
    assert_eq!(db.fast_correction_state(slot, gps(1), t), EntryState::Live);
    assert!(db.fast_correction(slot, gps(1), t).is_ok());

    // epoch tick while in PA: purged for good
    db.set_mode(NavigationMode::PrecisionApproach);
    db.process_epoch(t);
    db.set_mode(NavigationMode::NonPrecisionApproach);

    assert_eq!(db.fast_correction_state(slot, gps(1), t), EntryState::Purged);
    assert_eq!(
        db.fast_correction(slot, gps(1), t),
        Err(Unavailable::NoFastCorrection(gps(1)))
    );
}

#[test]
fn forced_npa_udrei() {
    init_logger();

    let t0 = t0();
    let geo = geo(23);
    let slot = Slot::Geo(geo);

    let degradation = Message::FastDegradation(FastDegradation {
        system_latency_s: 0,
        iodp: 0,
        ai: vec![0; 3],
    });

    for forced in [false, true] {
        let cfg = Config::default().with_forced_npa(forced);
        let mut db = CorrectionDatabase::new(cfg);

        db.apply_message(geo, &gps_mask(0, 3), t0).unwrap();
        db.apply_message(geo, &degradation, t0).unwrap();
        db.apply_message(geo, &fast_corrections(0, 0, &[(1.5, 3)]), t0)
            .unwrap();

        // fast correction is valid for 180s, the UDREI for 18s only
        let t = t0 + Duration::from_seconds(30.0);
        db.process_epoch(t);

        let fast = db.fast_correction(slot, gps(1), t);

        if forced {
            let fast = fast.unwrap();
            assert_eq!(fast.udrei, 3);
            assert_eq!(fast.degradation.npa_timeout_s, 180);
        } else {
            assert_eq!(fast, Err(Unavailable::NoFastCorrection(gps(1))));
        }
    }
}

#[test]
fn mask_timeout_override() {
    init_logger();

    let t0 = t0();
    let geo = geo(23);
    let slot = Slot::Geo(geo);

    let cfg = Config::default().with_timeout_override(TimeoutOverride {
        message: MessageType::PrnMask,
        precision_approach_s: None,
        non_precision_approach_s: Some(10),
        update_interval_s: None,
    });

    let mut db = CorrectionDatabase::new(cfg);

    db.apply_message(geo, &gps_mask(0, 3), t0).unwrap();
    db.apply_message(geo, &fast_corrections(0, 0, &[(1.5, 3)]), t0)
        .unwrap();

    let t = t0 + Duration::from_seconds(5.0);
    assert!(db.fast_correction(slot, gps(1), t).is_ok());

    // mask has timed out
    let t = t0 + Duration::from_seconds(11.0);
    assert_eq!(
        db.fast_correction(slot, gps(1), t),
        Err(Unavailable::NotInMask(gps(1)))
    );

    db.process_epoch(t);
    assert_eq!(
        db.fast_correction(slot, gps(1), t),
        Err(Unavailable::NoMask)
    );
}

#[test]
fn entry_state_agrees_with_queries() {
    init_logger();

    let t0 = t0();
    let geo = geo(23);
    let slot = Slot::Geo(geo);

    let degradation = Message::FastDegradation(FastDegradation {
        system_latency_s: 0,
        iodp: 0,
        ai: vec![0; 3],
    });

    for forced in [false, true] {
        let cfg = Config::default()
            .with_navigation_mode(NavigationMode::PrecisionApproach)
            .with_forced_npa(forced);

        let mut db = CorrectionDatabase::new(cfg);

        db.apply_message(geo, &gps_mask(0, 3), t0).unwrap();
        db.apply_message(geo, &degradation, t0).unwrap();
        db.apply_message(geo, &fast_corrections(0, 0, &[(1.5, 3)]), t0)
            .unwrap();

        // UDREI timed out, fast correction itself still valid
        let t = t0 + Duration::from_seconds(30.0);
        let state = db.fast_correction_state(slot, gps(1), t);

        if forced {
            assert_eq!(state, EntryState::Live);
            assert!(db.fast_correction(slot, gps(1), t).is_ok());
        } else {
            assert_eq!(state, EntryState::Stale);
            assert_eq!(
                db.fast_correction(slot, gps(1), t),
                Err(Unavailable::NoFastCorrection(gps(1)))
            );
        }

        for dt in 0..250 {
            let t = t0 + Duration::from_seconds(dt as f64);
            let state = db.fast_correction_state(slot, gps(1), t);
            let served = db.fast_correction(slot, gps(1), t).is_ok();
            assert_eq!(
                state.is_live(),
                served,
                "forced={} t0+{}s: {:?}",
                forced,
                dt,
                state
            );
        }

        // never received
        assert_eq!(
            db.fast_correction_state(slot, gps(3), t0),
            EntryState::Purged
        );
    }
}

#[test]
fn update_intervals() {
    init_logger();

    let t0 = t0();
    let geo = geo(23);
    let slot = Slot::Geo(geo);

    let cfg = Config::default().with_timeout_override(TimeoutOverride {
        message: MessageType::PrnMask,
        precision_approach_s: None,
        non_precision_approach_s: None,
        update_interval_s: Some(30),
    });

    let mut db = CorrectionDatabase::new(cfg);

    assert!(db.is_overdue(slot, MessageType::PrnMask, t0));
    assert!(!db.is_overdue(slot, MessageType::DoNotUse, t0));

    db.apply_message(geo, &gps_mask(0, 3), t0).unwrap();
    db.apply_message(geo, &fast_corrections(0, 0, &[(1.5, 3)]), t0)
        .unwrap();

    let t = t0 + Duration::from_seconds(30.0);
    assert!(!db.is_overdue(slot, MessageType::PrnMask, t));
    assert!(db.is_overdue(slot, MessageType::FastCorrections, t));
    assert!(!db.is_overdue(Slot::Aggregate, MessageType::PrnMask, t));

    let t = t0 + Duration::from_seconds(31.0);
    assert!(db.is_overdue(slot, MessageType::PrnMask, t));
    assert_eq!(
        db.record(slot).unwrap().last_received(MessageType::PrnMask),
        Some(t0)
    );
}

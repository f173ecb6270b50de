use crate::{
    integrity::test_parameters,
    message::{
        ClockEphemerisCovariance, CovarianceMessage, LongTermCorrection, LongTermCorrections,
        LongTermRates, Message, RegionShape, ServiceMessage, ServiceRegion,
    },
    prelude::{
        Config, CorrectionDatabase, Duration, LineOfSight, NavigationMode, PiercePoint, Slot,
        Unavailable, Vector3, SV,
    },
    tests::{
        fast_corrections, full_igp_mask, geo, gps, gps_mask, init_logger, t0,
        uniform_iono_delays,
    },
};

const SHELL_HEIGHT_M: f64 = 350.0E3;

fn zenith() -> LineOfSight {
    LineOfSight {
        user_lat_deg: 0.0,
        user_lon_deg: 0.0,
        unit_vector: Vector3::new(0.0, 0.0, 1.0),
    }
}

fn long_term_corrections(rates: Option<LongTermRates>) -> Message {
    Message::LongTermCorrections(LongTermCorrections {
        iodp: 0,
        corrections: vec![LongTermCorrection {
            mask_number: 1,
            iode: 42,
            dx_m: 1.0,
            dy_m: -1.0,
            dz_m: 0.5,
            daf0_s: 1.0E-8,
            rates,
        }],
    })
}

/// Mask, fast (G01 UDREI=3), long-term (G01) and degradation parameters at t0
fn corrected_database(cfg: Config, geo: SV) -> CorrectionDatabase {
    let t0 = t0();
    let mut db = CorrectionDatabase::new(cfg);

    db.apply_message(geo, &gps_mask(0, 3), t0).unwrap();
    db.apply_message(geo, &fast_corrections(0, 0, &[(1.5, 3), (-2.0, 5)]), t0)
        .unwrap();
    db.apply_message(geo, &long_term_corrections(None), t0)
        .unwrap();
    db.apply_message(
        geo,
        &Message::DegradationParameters(test_parameters()),
        t0,
    )
    .unwrap();

    db
}

#[test]
fn satellite_correction() {
    init_logger();

    let t0 = t0();
    let geo = geo(23);
    let slot = Slot::Geo(geo);

    let db = corrected_database(Config::default(), geo);

    let t = t0 + Duration::from_seconds(2.0);
    let correction = db.satellite_correction(slot, gps(1), t, &zenith()).unwrap();

    assert_eq!(correction.range_correction_m, 1.5);
    assert_eq!(correction.long_term.correction.iode, 42);
    assert_eq!(correction.long_term.position_m, Vector3::new(1.0, -1.0, 0.5));
    assert_eq!(correction.long_term.clock_s, 1.0E-8);

    let budget = correction.budget;
    assert_eq!(budget.delta_udre, 1.0);
    assert!((budget.sigma_udre_m - 0.2830_f64.sqrt()).abs() < 1E-12);
    // most stringent aᵢ, without MT7
    assert!((budget.eps_fc_m - 0.0116).abs() < 1E-12);
    assert_eq!(budget.eps_rrc_m, 0.0);
    assert_eq!(budget.eps_ltc_m, 0.0);
    assert_eq!(budget.eps_er_m, 0.0);

    let expected = (0.2830_f64.sqrt() + 0.0116).powi(2);
    assert!((correction.variance_m2 - expected).abs() < 1E-9);

    // stale in PA: en route degradation applies
    let t = t0 + Duration::from_seconds(15.0);
    let correction = db.satellite_correction(slot, gps(1), t, &zenith()).unwrap();

    assert_eq!(correction.budget.eps_er_m, 5.0);
    assert!((correction.budget.eps_fc_m - 0.6525).abs() < 1E-12);

    // no long-term correction for G02
    assert_eq!(
        db.satellite_correction(slot, gps(2), t, &zenith()),
        Err(Unavailable::NoLongTermCorrection(gps(2)))
    );
}

#[test]
fn velocity_code_one() {
    init_logger();

    let t0 = t0();
    let geo = geo(23);
    let slot = Slot::Geo(geo);

    let mut db = corrected_database(Config::default(), geo);

    // t0 is midnight: t0 of the correction lies 10s ahead
    let rates = LongTermRates {
        ddx_m_s: 0.01,
        ddy_m_s: 0.0,
        ddz_m_s: -0.02,
        daf1_s_s: 1.0E-10,
        t0_s: 10.0,
    };

    db.apply_message(geo, &long_term_corrections(Some(rates)), t0)
        .unwrap();

    let t = t0 + Duration::from_seconds(2.0);
    let correction = db.satellite_correction(slot, gps(1), t, &zenith()).unwrap();

    let ltc = correction.long_term;
    assert!((ltc.dt_s + 8.0).abs() < 1E-9);
    assert!((ltc.position_m[0] - 0.92).abs() < 1E-9);
    assert!((ltc.position_m[2] - 0.66).abs() < 1E-9);

    // outside [t0, t0 + I_ltc_v1]
    assert!((correction.budget.eps_ltc_m - (0.2 + 0.05 * 8.0)).abs() < 1E-9);
}

#[test]
fn delta_udre() {
    init_logger();

    let t0 = t0();
    let geo = geo(23);
    let slot = Slot::Geo(geo);

    let mut db = corrected_database(Config::default(), geo);

    let service = Message::ServiceMessage(ServiceMessage {
        iods: 1,
        num_messages: 1,
        message_number: 1,
        priority: 2,
        delta_udre_inside: 3,
        delta_udre_outside: 6,
        regions: vec![ServiceRegion::new(-10.0, -10.0, 10.0, 10.0, RegionShape::Quadrangle)],
    });

    db.apply_message(geo, &service, t0).unwrap();

    let t = t0 + Duration::from_seconds(2.0);
    let correction = db.satellite_correction(slot, gps(1), t, &zenith()).unwrap();
    assert_eq!(correction.budget.delta_udre, 1.5);

    let outside = LineOfSight {
        user_lat_deg: 45.0,
        ..zenith()
    };

    let correction = db.satellite_correction(slot, gps(1), t, &outside).unwrap();
    assert_eq!(correction.budget.delta_udre, 4.0);

    // MT28 takes precedence over MT27
    // identity, scale exponent 5
    let elements = [1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];

    let covariance = Message::ClockEphemerisCovariance(CovarianceMessage {
        iodp: 0,
        entries: vec![ClockEphemerisCovariance {
            mask_number: 1,
            scale_exponent: 5,
            elements,
        }],
    });

    db.apply_message(geo, &covariance, t0).unwrap();

    let correction = db.satellite_correction(slot, gps(1), t, &outside).unwrap();

    // sqrt(IᵀCI) + C_cov * SF, I = [0, 0, 1, 1]
    let expected = 2.0_f64.sqrt() + 0.1;
    assert!((correction.budget.delta_udre - expected).abs() < 1E-9);
}

#[test]
fn missing_degradation_parameters() {
    init_logger();

    let t0 = t0();
    let geo = geo(23);
    let slot = Slot::Geo(geo);

    let cfg = Config::default().with_navigation_mode(NavigationMode::PrecisionApproach);
    let mut db = CorrectionDatabase::new(cfg);

    db.apply_message(geo, &gps_mask(0, 3), t0).unwrap();
    db.apply_message(geo, &fast_corrections(0, 0, &[(1.5, 3)]), t0)
        .unwrap();
    db.apply_message(geo, &long_term_corrections(None), t0)
        .unwrap();

    let t = t0 + Duration::from_seconds(2.0);

    assert_eq!(
        db.satellite_correction(slot, gps(1), t, &zenith()),
        Err(Unavailable::MissingDegradationParameters)
    );

    // NPA: every degradation term is zero
    db.set_mode(NavigationMode::NonPrecisionApproach);
    let correction = db.satellite_correction(slot, gps(1), t, &zenith()).unwrap();
    assert_eq!(correction.budget.eps_fc_m, 0.0);
    assert!((correction.variance_m2 - 0.2830).abs() < 1E-12);
}

#[test]
fn iono_correction() {
    init_logger();

    let t0 = t0();
    let geo = geo(23);
    let slot = Slot::Geo(geo);

    let mut db = CorrectionDatabase::new(Config::default());

    db.apply_message(geo, &full_igp_mask(4, 1), t0).unwrap();
    for delays in uniform_iono_delays(4, 1, 2.0, 5) {
        db.apply_message(geo, &delays, t0).unwrap();
    }

    let record = db.record(slot).unwrap();
    assert_eq!(record.iono().band(4).unwrap().num_delays(), 201);

    let t = t0 + Duration::from_seconds(60.0);

    let pierce_point = PiercePoint::new(0.0, 0.0, 90.0, 0.0, SHELL_HEIGHT_M).unwrap();
    let iono = db.iono_correction(slot, &pierce_point, t).unwrap();

    assert!((iono.vertical_delay_m() - 2.0).abs() < 1E-9);
    assert!((iono.vertical_variance_m2() - 0.2994).abs() < 1E-9);
    assert!((iono.slant_delay_m - 2.0).abs() < 1E-9);

    let pierce_point = PiercePoint::new(0.0, 0.0, 30.0, 0.0, SHELL_HEIGHT_M).unwrap();
    let iono = db.iono_correction(slot, &pierce_point, t).unwrap();

    assert!(pierce_point.obliquity > 1.0);
    assert!((iono.slant_delay_m - 2.0 * pierce_point.obliquity).abs() < 1E-9);
    assert!(
        (iono.slant_variance_m2 - 0.2994 * pierce_point.obliquity.powi(2)).abs() < 1E-9
    );

    // band 5 is missing
    let pierce_point = PiercePoint::new(0.0, 30.0, 90.0, 0.0, SHELL_HEIGHT_M).unwrap();
    assert_eq!(
        db.iono_correction(slot, &pierce_point, t),
        Err(Unavailable::InsufficientIgps)
    );

    // degraded by the MT10 step and ramp terms
    db.apply_message(
        geo,
        &Message::DegradationParameters(test_parameters()),
        t0,
    )
    .unwrap();

    let pierce_point = PiercePoint::new(0.0, 0.0, 90.0, 0.0, SHELL_HEIGHT_M).unwrap();
    let iono = db.iono_correction(slot, &pierce_point, t).unwrap();

    let expected = (0.2994_f64.sqrt() + 0.25 + 0.06).powi(2);
    assert!((iono.vertical_variance_m2() - expected).abs() < 1E-9);

    // delays have timed out
    let t = t0 + Duration::from_seconds(601.0);
    db.set_mode(NavigationMode::PrecisionApproach);
    assert_eq!(
        db.iono_correction(slot, &pierce_point, t),
        Err(Unavailable::MissingDegradationParameters)
    );

    db.set_mode(NavigationMode::NonPrecisionApproach);
    assert_eq!(
        db.iono_correction(slot, &pierce_point, t),
        Err(Unavailable::InsufficientIgps)
    );
}

#[test]
fn zenith_pierce_point() {
    use crate::constants::EARTH_SEMI_MAJOR_AXIS_WGS84_M;

    init_logger();

    let db = CorrectionDatabase::new(Config::default());

    let rx = Vector3::new(EARTH_SEMI_MAJOR_AXIS_WGS84_M, 0.0, 0.0);
    let sv = Vector3::new(EARTH_SEMI_MAJOR_AXIS_WGS84_M + 20_000.0E3, 0.0, 0.0);

    let pierce_point = db.pierce_point(&rx, &sv).unwrap();

    assert!(pierce_point.lat_deg.abs() < 1E-6);
    assert!(pierce_point.lon_deg.abs() < 1E-6);
    assert!((pierce_point.elevation_deg - 90.0).abs() < 1E-6);
    assert!((pierce_point.obliquity - 1.0).abs() < 1E-9);

    let below = Vector3::new(-EARTH_SEMI_MAJOR_AXIS_WGS84_M, 0.0, 0.0);
    assert_eq!(db.pierce_point(&rx, &below), Err(Unavailable::BelowHorizon));
}

use covoit_report::dataset::Dataset;
use covoit_report::filters::FilterState;
use covoit_report::output::render_summary;
use covoit_report::pipeline::{BonusDropError, FrequencyRow, compute};
use covoit_report::session::{Session, SessionCommand};

fn load_fixture() -> Dataset {
    let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");
    Dataset::load(format!("{dir}/journeys.csv"), format!("{dir}/routes.csv"))
        .expect("Failed to load fixtures")
}

fn row(k: usize, nb_driver: usize, inverted_cumsum: usize) -> FrequencyRow {
    FrequencyRow {
        nb_covoits_by_driver: k,
        nb_driver,
        inverted_cumsum,
    }
}

#[test]
fn test_full_pipeline_default_filters() {
    let dataset = load_fixture();
    assert_eq!(dataset.routes.len(), 51);
    assert_eq!(dataset.journeys.len(), 99);

    let report = compute(&dataset, &FilterState::default(), 10);

    assert_eq!(report.covoit_routes, 48);
    assert_eq!(report.drivers, 6);
    assert_eq!(
        report.distribution,
        vec![row(1, 1, 6), row(3, 1, 5), row(10, 2, 4), row(11, 1, 2), row(12, 1, 1)]
    );

    let drop = report.bonus_drop.clone().unwrap();
    assert_eq!(drop.at_threshold, 4);
    assert_eq!(drop.above_threshold, 2);
    assert_eq!(drop.percent(), 50);

    let mut buf = Vec::new();
    render_summary(&report, &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert!(text.contains("Trips matching the filters: 48"));
    assert!(text.contains("Drivers with x trips matching the filters: 6"));
    assert!(text.contains("=> Loss of 50% of drivers after reaching the bonus"));
}

#[test]
fn test_min_passengers_two_loses_bonus_bucket() {
    let dataset = load_fixture();
    let report = compute(&dataset, &FilterState::default().with_min_passengers(2), 10);

    assert_eq!(report.covoit_routes, 5);
    assert_eq!(report.distribution, vec![row(2, 1, 2), row(3, 1, 1)]);
    assert_eq!(report.bonus_drop, Err(BonusDropError::MissingBucket(10)));
}

#[test]
fn test_session_status_changes() {
    let mut session = Session::new(load_fixture());

    assert_eq!(session.options().routes, vec!["DONE", "CANCELLED"]);
    assert_eq!(
        session.options().journeys,
        vec!["VALIDATED", "PENDING", "CANCELLED"]
    );

    session
        .apply(SessionCommand::Routes {
            statuses: vec!["DONE".into(), "CANCELLED".into()],
        })
        .unwrap();
    let report = session.report();
    assert_eq!(
        report.distribution,
        vec![row(1, 2, 7), row(3, 1, 5), row(10, 1, 4), row(11, 2, 3), row(12, 1, 1)]
    );
    assert_eq!(report.bonus_drop.unwrap().percent(), 25);

    session
        .apply(SessionCommand::Routes {
            statuses: vec!["DONE".into()],
        })
        .unwrap();
    session
        .apply(SessionCommand::Journeys {
            statuses: vec!["VALIDATED".into(), "PENDING".into()],
        })
        .unwrap();
    session.apply(SessionCommand::MinPassengers { value: 2 }).unwrap();
    let report = session.report();
    assert_eq!(report.covoit_routes, 47);
    assert_eq!(report.drivers, 6);
}

#[test]
fn test_empty_journey_selection() {
    let mut session = Session::new(load_fixture());
    session
        .apply(SessionCommand::Journeys { statuses: vec![] })
        .unwrap();

    let report = session.report();
    assert_eq!(report.covoit_routes, 0);
    assert_eq!(report.drivers, 0);
    assert!(report.distribution.is_empty());
    assert!(report.bonus_drop.is_err());
}

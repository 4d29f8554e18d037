//! Integration tests for the find -> convert -> trace pipeline.

use std::io::Write;
use tilewalk::{
    GridCoordinate, Heading, RouteFinder, RouteTracer, TilewalkError, TilewalkResult,
    TraceState, TravelConfig, Traveller, Waypoint, WorldTransform,
};

#[test]
fn test_manual_pipeline_on_prototype_floor() -> TilewalkResult<()> {
    let config = TravelConfig::default();
    let finder = RouteFinder::new(config.map_width, config.map_height);
    let transform = config.world_transform();
    let mut tracer = RouteTracer::with_velocity(config.velocity);

    let route = finder.find(GridCoordinate::new(0, 0), GridCoordinate::new(5, 2))?;
    assert_eq!(route.len(), 6);

    let waypoints = transform.route_to_world(&route);
    tracer.set_route(&waypoints)?;
    assert_eq!(tracer.position()?, Waypoint::new(0.0, 27.5, 0.0));

    // Drive it like a 60 FPS render loop
    let mut frames = 0;
    while tracer.is_playing() {
        tracer.update(1.0 / 60.0);
        frames += 1;
        assert!(frames < 60 * 60, "route never finished");
    }

    let expected_seconds = tracer.total_distance().unwrap_or_default() / config.velocity;
    assert!((frames as f32 / 60.0 - expected_seconds).abs() <= 1.0 / 60.0 + 1e-3);
    assert_eq!(tracer.state(), TraceState::Finished);
    assert_eq!(tracer.position()?, Waypoint::new(250.0, 27.5, 100.0));

    Ok(())
}

#[test]
fn test_straight_route_timing() -> TilewalkResult<()> {
    let mut tracer = RouteTracer::new();
    tracer.set_route(&[Waypoint::new(0.0, 0.0, 0.0), Waypoint::new(100.0, 0.0, 0.0)])?;
    assert_eq!(tracer.position()?, Waypoint::new(0.0, 0.0, 0.0));

    let seconds_needed = 100.0 / tracer.velocity();
    tracer.update(seconds_needed * 0.5);
    assert!(tracer.is_playing());
    let midway = tracer.position()?;
    assert!((midway.x - 50.0).abs() < 1e-3);

    tracer.update(seconds_needed);
    assert!(!tracer.is_playing());
    assert_eq!(tracer.position()?, Waypoint::new(100.0, 0.0, 0.0));

    tracer.reset();
    assert_eq!(tracer.position()?, Waypoint::new(0.0, 0.0, 0.0));
    Ok(())
}

#[test]
fn test_traveller_walks_a_sequence_of_moves() -> TilewalkResult<()> {
    let mut traveller = Traveller::new(TravelConfig::default(), GridCoordinate::origin())?;

    for goal in [
        GridCoordinate::new(5, 5),
        GridCoordinate::new(0, 5),
        GridCoordinate::new(3, 0),
    ] {
        let route = traveller.travel_to(goal)?.to_vec();
        assert_eq!(route.last(), Some(&goal));

        let mut last = traveller.position()?;
        while traveller.is_moving() {
            let position = traveller.tick(0.1)?;
            // Never moves further than one tick's worth of travel
            assert!(position.distance(last) <= 30.0 * 0.1 + 1e-3);
            last = position;
        }

        assert_eq!(traveller.cell(), goal);
        assert_eq!(traveller.position()?, traveller.transform().to_world(goal));
    }

    Ok(())
}

#[test]
fn test_traveller_heading_follows_route() -> TilewalkResult<()> {
    let mut traveller = Traveller::new(TravelConfig::for_testing(), GridCoordinate::new(0, 3))?;
    traveller.travel_to(GridCoordinate::new(0, 0))?;
    assert_eq!(traveller.heading()?, Some(Heading::Down));

    traveller.tick(100.0)?;
    assert_eq!(traveller.heading()?, None);
    Ok(())
}

#[test]
fn test_unreachable_goal_is_reported() {
    let finder = RouteFinder::new(10, 10);
    let err = finder
        .find(GridCoordinate::new(0, 0), GridCoordinate::new(10, 11))
        .unwrap_err();
    assert_eq!(err.to_string(), "No route from [0, 0] to [10, 11]");
}

#[test]
fn test_short_route_is_rejected() {
    let mut tracer = RouteTracer::new();
    let err = tracer.set_route(&[Waypoint::new(1.0, 2.0, 3.0)]).unwrap_err();
    assert!(matches!(err, TilewalkError::InvalidRoute { waypoints: 1 }));
    assert_eq!(tracer.state(), TraceState::Idle);
    assert!(matches!(tracer.position(), Err(TilewalkError::NoActiveRoute)));
}

#[test]
fn test_config_from_json_file() -> TilewalkResult<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    write!(file, r#"{{ "map_width": 12, "velocity": 60.0 }}"#)?;

    let config = TravelConfig::from_json_file(file.path())?;
    assert_eq!(config.map_width, 12);
    assert_eq!(config.velocity, 60.0);
    // Unspecified fields keep their defaults
    assert_eq!(config.map_height, 5);
    assert_eq!(config.world_transform(), WorldTransform::new(50.0, 5.0));
    Ok(())
}

#[test]
fn test_config_file_errors() -> TilewalkResult<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    write!(file, "not json")?;
    assert!(matches!(
        TravelConfig::from_json_file(file.path()),
        Err(TilewalkError::Serde(_))
    ));

    let mut file = tempfile::NamedTempFile::new()?;
    write!(file, r#"{{ "velocity": -1.0 }}"#)?;
    assert!(matches!(
        TravelConfig::from_json_file(file.path()),
        Err(TilewalkError::InvalidConfig(_))
    ));

    assert!(matches!(
        TravelConfig::from_json_file("/definitely/not/here.json"),
        Err(TilewalkError::Io(_))
    ));
    Ok(())
}

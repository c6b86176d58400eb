//! Focused unit tests covering argument parsing and configuration.

use super::*;
use crate::options::{OptionsArgs, OptionsConfig};
use crate::place::{PlaceArgs, PlaceChange, PlaceConfig};
use crate::run::{RunArgs, RunConfig};
use crate::service::ServiceConfig;
use crate::setup::{SetupArgs, SetupConfig, config_from_layers_for_test};
use camino::Utf8PathBuf;
use rstest::rstest;
use std::time::Duration;
use travel_time_core::{
    AvoidType, Coordinate, DEFAULT_NAME, DEFAULT_SCAN_INTERVAL, RouteType, RoutingOptions,
    TravelMode,
};
use travel_time_tomtom::DEFAULT_BASE_URL;

#[rstest]
fn setup_without_api_key_errors() {
    let args = SetupArgs {
        locations: vec!["1,2".to_owned(), "3,4".to_owned()],
        ..SetupArgs::default()
    };

    let err = SetupConfig::try_from(args).expect_err("missing key should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_API_KEY);
            assert_eq!(env, ENV_SETUP_API_KEY);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
#[case(None, DEFAULT_NAME)]
#[case(Some("Commute"), "Commute")]
fn setup_name_defaults(#[case] name: Option<&str>, #[case] expected: &str) {
    let args = SetupArgs {
        api_key: Some("secret".to_owned()),
        name: name.map(str::to_owned),
        ..SetupArgs::default()
    };

    let config = SetupConfig::try_from(args).expect("config should build");
    assert_eq!(config.data.name, expected);
    assert_eq!(config.data.api_key, "secret");
}

#[rstest]
fn service_defaults() {
    let service = ServiceConfig::from_layers(None, None, None);
    assert_eq!(service.store, Utf8PathBuf::from("travel_time_entries.json"));
    assert_eq!(service.client.base_url, DEFAULT_BASE_URL);
    assert_eq!(service.client.timeout, Duration::from_secs(30));
}

#[rstest]
fn service_overrides() {
    let service = ServiceConfig::from_layers(
        Some(Utf8PathBuf::from("/var/lib/travel.json")),
        Some("http://localhost:9000".to_owned()),
        Some(5),
    );
    assert_eq!(service.store, Utf8PathBuf::from("/var/lib/travel.json"));
    assert_eq!(service.client.base_url, "http://localhost:9000");
    assert_eq!(service.client.timeout, Duration::from_secs(5));
}

#[rstest]
fn setup_command_parses_locations_in_order() {
    let cli = Cli::try_parse_from([
        "travel-time",
        "setup",
        "--api-key",
        "secret",
        "52.1,4.2",
        "zone.home",
        "Madrid",
    ])
    .expect("arguments should parse");

    match cli.command {
        Command::Setup(args) => {
            assert_eq!(args.locations, vec!["52.1,4.2", "zone.home", "Madrid"]);
            assert_eq!(args.api_key.as_deref(), Some("secret"));
        }
        other => panic!("expected setup command, found {other:?}"),
    }
}

#[rstest]
fn options_command_parses_enumerations_case_insensitively() {
    let cli = Cli::try_parse_from([
        "travel-time",
        "options",
        "--entry",
        "abc",
        "--travel-mode",
        "TRUCK",
        "--route-type",
        "eco",
        "--avoid",
        "toll_roads",
        "--avoid",
        "Ferries",
    ])
    .expect("arguments should parse");

    match cli.command {
        Command::Options(args) => {
            assert_eq!(args.travel_mode, Some(TravelMode::Truck));
            assert_eq!(args.route_type, Some(RouteType::Eco));
            assert_eq!(args.avoid, vec![AvoidType::TollRoads, AvoidType::Ferries]);
        }
        other => panic!("expected options command, found {other:?}"),
    }
}

#[rstest]
fn options_command_rejects_unknown_modes() {
    let err = Cli::try_parse_from([
        "travel-time",
        "options",
        "--entry",
        "abc",
        "--travel-mode",
        "hovercraft",
    ])
    .expect_err("unknown mode should be rejected");
    assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
}

fn options_config(args: OptionsArgs) -> OptionsConfig {
    OptionsConfig::try_from(OptionsArgs {
        entry: Some("abc".to_owned()),
        ..args
    })
    .expect("config should build")
}

#[rstest]
fn options_keep_unspecified_values() {
    let current = RoutingOptions {
        vehicle_type: TravelMode::Bicycle,
        route_type: RouteType::Short,
        avoid_type: vec![AvoidType::Motorways],
    };
    let config = options_config(OptionsArgs {
        route_type: Some(RouteType::Thrilling),
        ..OptionsArgs::default()
    });

    let updated = config.apply(&current);

    assert_eq!(updated.vehicle_type, TravelMode::Bicycle);
    assert_eq!(updated.route_type, RouteType::Thrilling);
    assert_eq!(updated.avoid_type, vec![AvoidType::Motorways]);
}

#[rstest]
#[case(vec![AvoidType::Tunnels], false, vec![AvoidType::Tunnels])]
#[case(Vec::new(), true, Vec::new())]
#[case(vec![AvoidType::Ferries], true, vec![AvoidType::Ferries])]
#[case(Vec::new(), false, vec![AvoidType::Motorways])]
fn avoid_list_is_replaced_or_cleared(
    #[case] avoid: Vec<AvoidType>,
    #[case] clear_avoid: bool,
    #[case] expected: Vec<AvoidType>,
) {
    let current = RoutingOptions {
        avoid_type: vec![AvoidType::Motorways],
        ..RoutingOptions::default()
    };
    let config = options_config(OptionsArgs {
        avoid,
        clear_avoid,
        ..OptionsArgs::default()
    });

    assert_eq!(config.apply(&current).avoid_type, expected);
}

#[rstest]
fn options_require_an_entry() {
    let err = OptionsConfig::try_from(OptionsArgs::default()).expect_err("missing entry");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_ENTRY);
            assert_eq!(env, ENV_OPTIONS_ENTRY);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn place_coordinates_are_parsed() {
    let config = PlaceConfig::try_from(PlaceArgs {
        name: Some("Home".to_owned()),
        coordinates: Some(" 51.2, 5.3 ".to_owned()),
        ..PlaceArgs::default()
    })
    .expect("config should build");
    assert_eq!(config.change, PlaceChange::Set(Coordinate::new(51.2, 5.3)));
}

#[rstest]
fn place_rejects_malformed_coordinates() {
    let err = PlaceConfig::try_from(PlaceArgs {
        name: Some("Home".to_owned()),
        coordinates: Some("somewhere".to_owned()),
        ..PlaceArgs::default()
    })
    .expect_err("malformed coordinates");
    match err {
        CliError::InvalidCoordinates { name, .. } => assert_eq!(name, "Home"),
        other => panic!("expected InvalidCoordinates, found {other:?}"),
    }
}

#[rstest]
fn removing_a_place_needs_no_coordinates() {
    let config = PlaceConfig::try_from(PlaceArgs {
        name: Some("Home".to_owned()),
        remove: true,
        ..PlaceArgs::default()
    })
    .expect("config should build");
    assert_eq!(config.change, PlaceChange::Remove);
}

#[rstest]
#[case(None, DEFAULT_SCAN_INTERVAL)]
#[case(Some(60), Duration::from_secs(60))]
fn run_scan_interval(#[case] secs: Option<u64>, #[case] expected: Duration) {
    let config = RunConfig::from(RunArgs {
        scan_interval_secs: secs,
        ..RunArgs::default()
    });
    assert_eq!(config.scan_interval, expected);
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "timeout_secs": "soon" }));

    let err = config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    match err {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honour_precedence() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "api_key": "from-file",
            "base_url": "http://from-file:8080",
            "name": "From file",
        }),
        None,
    );
    composer.push_environment(json!({
        "api_key": "from-env",
    }));
    composer.push_cli(json!({
        "name": "From CLI",
    }));

    let config = config_from_layers_for_test(composer.layers()).expect("merged config");
    assert_eq!(config.data.api_key, "from-env");
    assert_eq!(config.data.name, "From CLI");
    assert_eq!(config.service.client.base_url, "http://from-file:8080");
}

//! Unit tests for tsc-core primitives.

#[cfg(test)]
mod ids {
    use std::collections::BTreeSet;

    use crate::{LaneId, SignalId};

    #[test]
    fn display_is_raw_id() {
        assert_eq!(SignalId::new("tls_159").to_string(), "tls_159");
    }

    #[test]
    fn ordering_and_dedup() {
        let set: BTreeSet<LaneId> = ["b_0", "a_0", "b_0"].into_iter().map(LaneId::from).collect();
        let ids: Vec<&str> = set.iter().map(LaneId::as_str).collect();
        assert_eq!(ids, ["a_0", "b_0"]);
    }

    #[test]
    fn serde_transparent() {
        let json = serde_json::to_string(&SignalId::new("tls_1")).unwrap();
        assert_eq!(json, "\"tls_1\"");
    }
}

#[cfg(test)]
mod time {
    use crate::{Tick, TickRange};

    #[test]
    fn exact_division_len() {
        let r = TickRange::new(25_200, 34_200, 5).unwrap();
        assert_eq!(r.len(), 1_800);
        assert_eq!(r.iter().count(), 1_800);
    }

    #[test]
    fn partial_step_rounds_up() {
        let r = TickRange::new(0, 10, 3).unwrap();
        let ticks: Vec<u64> = r.iter().map(|t| t.0).collect();
        assert_eq!(ticks, [0, 3, 6, 9]);
        assert_eq!(r.len(), 4);
    }

    #[test]
    fn ticks_strictly_increase_by_delta() {
        let r = TickRange::new(100, 200, 10).unwrap();
        let ticks: Vec<Tick> = r.iter().collect();
        assert_eq!(ticks.first(), Some(&Tick(100)));
        assert!(ticks.windows(2).all(|w| w[1] - w[0] == 10));
        assert!(ticks.iter().all(|t| *t < r.end));
    }

    #[test]
    fn empty_range() {
        let r = TickRange::new(50, 50, 5).unwrap();
        assert!(r.is_empty());
        assert_eq!(r.iter().count(), 0);
    }

    #[test]
    fn zero_delta_rejected() {
        assert!(TickRange::new(0, 10, 0).is_err());
    }

    #[test]
    fn reversed_range_rejected() {
        assert!(TickRange::new(10, 0, 1).is_err());
    }

    #[test]
    fn offset_saturates() {
        assert_eq!(Tick(5).offset(10), Tick(15));
        assert_eq!(Tick(u64::MAX - 1).offset(10), Tick(u64::MAX));
    }
}

#[cfg(test)]
mod pollutant {
    use crate::Pollutant;

    #[test]
    fn column_order() {
        let cols: Vec<&str> = Pollutant::ALL.iter().map(|p| p.column_name()).collect();
        assert_eq!(
            cols,
            ["localCO2Emission", "localCOEmission", "localHCEmission", "localPMxEmission", "localNOxEmission"]
        );
    }

    #[test]
    fn index_matches_position() {
        for (i, p) in Pollutant::ALL.iter().enumerate() {
            assert_eq!(p.index(), i);
        }
    }
}

#[cfg(test)]
mod config {
    use std::io::Write;

    use crate::{CoreError, EvalConfig, MAX_EPISODE_TICKS, OutputFormat, SignalId};

    #[test]
    fn defaults_match_reference_run() {
        let c = EvalConfig::default();
        assert_eq!(c.episodes, 5);
        assert_eq!(c.tick_range().unwrap().len(), 1_800);
        assert_eq!(c.signals.len(), 3);
        c.validate().unwrap();
    }

    #[test]
    fn partial_json_uses_defaults() {
        let c = EvalConfig::from_json_str(r#"{ "episodes": 2, "run_name": "r" }"#).unwrap();
        assert_eq!(c.episodes, 2);
        assert_eq!(c.delta_time, 5);
        assert_eq!(c.output_format, OutputFormat::Csv);
    }

    #[test]
    fn format_parses_lowercase() {
        let c = EvalConfig::from_json_str(r#"{ "output_format": "parquet" }"#).unwrap();
        assert_eq!(c.output_format, OutputFormat::Parquet);
        assert_eq!("SQLite".parse::<OutputFormat>().unwrap(), OutputFormat::Sqlite);
        assert!("xlsx".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn zero_delta_rejected() {
        assert!(EvalConfig::from_json_str(r#"{ "delta_time": 0 }"#).is_err());
    }

    #[test]
    fn duplicate_signal_rejected() {
        let c = EvalConfig {
            signals: vec![SignalId::new("a"), SignalId::new("a")],
            ..EvalConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn empty_signals_rejected() {
        let c = EvalConfig { signals: vec![], ..EvalConfig::default() };
        assert!(c.validate().is_err());
    }

    #[test]
    fn overflowing_horizon_rejected() {
        let json = r#"{ "begin_time": 18446744073709551000, "num_seconds": 9000 }"#;
        assert!(matches!(EvalConfig::from_json_str(json), Err(CoreError::Config(_))));

        let c = EvalConfig { begin_time: u64::MAX, num_seconds: 1, ..EvalConfig::default() };
        assert!(matches!(c.tick_range(), Err(CoreError::Config(_))));
    }

    #[test]
    fn oversized_horizon_rejected() {
        let c = EvalConfig {
            begin_time: 0,
            num_seconds: MAX_EPISODE_TICKS + 1,
            delta_time: 1,
            ..EvalConfig::default()
        };
        assert!(c.tick_range().is_ok());
        assert!(matches!(c.validate(), Err(CoreError::Config(_))));

        let at_limit = EvalConfig { num_seconds: MAX_EPISODE_TICKS, ..c };
        at_limit.validate().unwrap();
    }

    #[test]
    fn artifact_stem_format() {
        let c = EvalConfig { run_name: "combined_emission_200".into(), ..EvalConfig::default() };
        assert_eq!(c.artifact_stem(3), "combined_emission_200_df_3");
    }

    #[test]
    fn load_from_file_round_trip() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("eval.json");
        let original = EvalConfig { episodes: 3, seed: 7, ..EvalConfig::default() };
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(original.to_json_string().unwrap().as_bytes()).unwrap();
        drop(f);

        let loaded = EvalConfig::load_json(&path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = EvalConfig::load_json(std::path::Path::new("/nonexistent/eval.json")).unwrap_err();
        assert!(matches!(err, crate::CoreError::Io(_)));
    }
}

// ── Scenario parsing ──────────────────────────────────────────────────────────

#[cfg(test)]
mod scenario {
    use std::path::{Path, PathBuf};

    use ev_core::Crs;

    use crate::config::{NetworkSource, Scenario};

    const MINIMAL: &str = r#"
        steps      = 10
        output_dir = "out"

        [network]
        nodes = "nodes.csv"
        edges = "edges.csv"

        [hazard]
        path = "hazard.csv"

        [candidates]
        path = "candidates.csv"
        crs  = "epsg:3857"
    "#;

    #[test]
    fn minimal_scenario_parses() {
        let s = Scenario::from_toml(MINIMAL).unwrap();
        assert_eq!(s.steps, 10);
        assert_eq!(s.seed, None);
        assert_eq!(s.target, None);
        assert!(!s.sqlite);
        assert!(s.render.is_none());
        assert_eq!(
            s.network.source().unwrap(),
            NetworkSource::Csv { nodes: "nodes.csv".into(), edges: "edges.csv".into() },
        );
        assert_eq!(s.hazard.crs().unwrap(), None);
        assert_eq!(s.candidates.crs().unwrap(), Some(Crs::WebMercator));
    }

    #[test]
    fn render_defaults() {
        let text = format!("{MINIMAL}\n[render]\npath = \"v.mp4\"\n");
        let render = Scenario::from_toml(&text).unwrap().render.unwrap();
        assert_eq!((render.fps, render.width, render.height), (10, 1280, 720));
    }

    #[test]
    fn zero_steps_rejected() {
        let text = MINIMAL.replace("steps      = 10", "steps = 0");
        assert!(Scenario::from_toml(&text).is_err());
    }

    #[test]
    fn odd_frame_size_rejected() {
        let text = format!("{MINIMAL}\n[render]\npath = \"v.mp4\"\nwidth = 641\n");
        let err = Scenario::from_toml(&text).unwrap_err();
        assert!(format!("{err:#}").contains("even"));
    }

    #[test]
    fn network_needs_exactly_one_source() {
        let half = MINIMAL.replace("edges = \"edges.csv\"", "");
        assert!(Scenario::from_toml(&half).is_err());

        let both = MINIMAL.replace("edges = \"edges.csv\"", "edges = \"edges.csv\"\npbf = \"town.osm.pbf\"");
        assert!(Scenario::from_toml(&both).is_err());
    }

    #[test]
    fn unknown_crs_rejected() {
        let text = MINIMAL.replace("epsg:3857", "EPSG:27700");
        assert!(Scenario::from_toml(&text).is_err());
    }

    #[test]
    fn unknown_field_rejected() {
        let text = MINIMAL.replace("steps      = 10", "steps = 10\nspeed = 2.0");
        assert!(Scenario::from_toml(&text).is_err());
    }

    #[test]
    fn relative_paths_follow_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("scenario.toml");
        let text = MINIMAL.replace("\"nodes.csv\"", "\"/abs/nodes.csv\"");
        std::fs::write(&file, text).unwrap();

        let s = Scenario::from_file(&file).unwrap();
        assert_eq!(s.output_dir, dir.path().join("out"));
        assert_eq!(s.hazard.path, dir.path().join("hazard.csv"));
        assert_eq!(s.network.nodes.as_deref(), Some(Path::new("/abs/nodes.csv")));
        assert_eq!(s.network.edges, Some(dir.path().join("edges.csv")));
    }

    #[test]
    fn bundled_scenario_loads() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenario.toml");
        let s = Scenario::from_file(path).unwrap();
        assert_eq!(s.target, Some(1024));
        assert_eq!(s.seed, Some(42));
        assert!(s.hazard.path.exists());
        assert!(s.candidates.path.exists());
    }
}

// ── End to end ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run {
    use std::path::{Path, PathBuf};

    use crate::run_scenario;

    fn data(name: &str) -> String {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(name);
        path.to_string_lossy().replace('\\', "/")
    }

    /// The bundled inputs, with output redirected into `dir`.
    fn write_scenario(dir: &Path, steps: u64, extra: &str) -> PathBuf {
        let text = format!(
            r#"
            steps      = {steps}
            seed       = 42
            target     = 1024
            output_dir = "out"
            {extra}

            [network]
            nodes = "{nodes}"
            edges = "{edges}"

            [hazard]
            path = "{hazard}"
            crs  = "EPSG:4326"

            [candidates]
            path = "{candidates}"
            "#,
            nodes = data("nodes.csv"),
            edges = data("edges.csv"),
            hazard = data("hazard.csv"),
            candidates = data("candidates.csv"),
        );
        let file = dir.join("scenario.toml");
        std::fs::write(&file, text).unwrap();
        file
    }

    #[test]
    fn everyone_in_the_flood_reaches_the_corner() {
        let dir = tempfile::tempdir().unwrap();
        let summary = run_scenario(&write_scenario(dir.path(), 20, "")).unwrap();

        assert_eq!(summary.agents, 17);
        assert_eq!(summary.steps_recorded, 20);
        assert_eq!(summary.final_evacuated, 17);
        assert!(summary.all_evacuated_at.is_some());
    }

    #[test]
    fn csv_series_are_written() {
        let dir = tempfile::tempdir().unwrap();
        run_scenario(&write_scenario(dir.path(), 5, "")).unwrap();

        let positions = std::fs::read_to_string(dir.path().join("out/agent_positions.csv")).unwrap();
        // Header plus one row per agent per step.
        assert_eq!(positions.lines().count(), 1 + 17 * 5);

        let model = std::fs::read_to_string(dir.path().join("out/model_series.csv")).unwrap();
        assert_eq!(model.lines().count(), 1 + 5);
    }

    #[test]
    fn same_seed_same_output() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        run_scenario(&write_scenario(a.path(), 8, "")).unwrap();
        run_scenario(&write_scenario(b.path(), 8, "")).unwrap();

        let read = |d: &Path| std::fs::read_to_string(d.join("out/agent_positions.csv")).unwrap();
        assert_eq!(read(a.path()), read(b.path()));
    }

    #[test]
    fn unknown_target_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_scenario(dir.path(), 5, "");
        let text = std::fs::read_to_string(&file).unwrap().replace("target     = 1024", "target = 99");
        std::fs::write(&file, text).unwrap();
        assert!(run_scenario(&file).is_err());
    }

    #[cfg(not(feature = "sqlite"))]
    #[test]
    fn sqlite_without_feature_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run_scenario(&write_scenario(dir.path(), 5, "sqlite = true")).is_err());
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn sqlite_written_with_feature() {
        let dir = tempfile::tempdir().unwrap();
        run_scenario(&write_scenario(dir.path(), 5, "sqlite = true")).unwrap();
        assert!(dir.path().join("out/output.db").exists());
    }
}

use ::common::QuestionDef;
use serde_json::json;

use crate::common::{TestApp, routes};

mod question_fallback {
    use super::*;

    #[tokio::test]
    async fn defaults_apply_when_store_and_file_are_both_unavailable() {
        // No store, and the questions file path points at nothing.
        let app = TestApp::spawn_without_db().await;

        let res = app.get(routes::FORM).await;

        assert_eq!(res.status, 200);
        let expected =
            serde_json::to_value(::common::questions::default_questions()).unwrap();
        assert_eq!(res.body["questions"], expected);
    }

    #[tokio::test]
    async fn questions_file_beats_the_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let qfile = dir.path().join("questions.json");
        std::fs::write(
            &qfile,
            r#"[{"question": "Rain during the race?", "options": ["Yes", "No"]}]"#,
        )
        .unwrap();

        let app =
            TestApp::spawn_without_db_with(|cfg| cfg.content.questions_file = qfile.clone()).await;

        let res = app.get(routes::FORM).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["questions"].as_array().unwrap().len(), 1);
        assert_eq!(res.body["questions"][0]["question"], "Rain during the race?");
    }

    #[tokio::test]
    async fn inline_config_override_beats_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let qfile = dir.path().join("questions.json");
        std::fs::write(
            &qfile,
            r#"[{"question": "From the file", "options": ["A", "B"]}]"#,
        )
        .unwrap();

        let app = TestApp::spawn_without_db_with(|cfg| {
            cfg.content.questions_file = qfile.clone();
            cfg.content.questions = Some(vec![QuestionDef::new(
                "From the config",
                &["One", "Two"],
            )]);
        })
        .await;

        let res = app.get(routes::FORM).await;

        assert_eq!(res.body["questions"][0]["question"], "From the config");
    }

    #[tokio::test]
    async fn stored_questions_beat_every_other_layer() {
        let app = TestApp::spawn_with(|cfg| {
            cfg.content.questions = Some(vec![QuestionDef::new(
                "From the config",
                &["One", "Two"],
            )]);
        })
        .await;
        let token = app.admin_token().await;
        let race_id = app.create_race(&token, "Spanish GP").await;
        app.create_question(&token, race_id, "Pit stops under 20?", &["Yes", "No"])
            .await;

        let res = app
            .get(&format!("{}?race_id={race_id}", routes::FORM))
            .await;

        assert_eq!(res.body["questions"].as_array().unwrap().len(), 1);
        assert_eq!(res.body["questions"][0]["question"], "Pit stops under 20?");
    }

    #[tokio::test]
    async fn a_race_without_stored_questions_falls_through() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let race_id = app.create_race(&token, "Spanish GP").await;

        let res = app
            .get(&format!("{}?race_id={race_id}", routes::FORM))
            .await;

        let expected =
            serde_json::to_value(::common::questions::default_questions()).unwrap();
        assert_eq!(res.body["questions"], expected);
    }
}

mod description {
    use super::*;

    #[tokio::test]
    async fn default_description_applies_without_overrides() {
        let app = TestApp::spawn_without_db().await;

        let res = app.get(routes::FORM).await;

        assert_eq!(
            res.body["description"],
            "Predict the race results and score points!"
        );
    }

    #[tokio::test]
    async fn settings_file_overrides_the_default() {
        let dir = tempfile::tempdir().unwrap();
        let sfile = dir.path().join("app_settings.json");
        std::fs::write(&sfile, r#"{"app_description": "Pick your podium!"}"#).unwrap();

        let app =
            TestApp::spawn_without_db_with(|cfg| cfg.content.settings_file = sfile.clone()).await;

        let res = app.get(routes::FORM).await;

        assert_eq!(res.body["description"], "Pick your podium!");
    }

    #[tokio::test]
    async fn config_override_beats_the_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let sfile = dir.path().join("app_settings.json");
        std::fs::write(&sfile, r#"{"app_description": "From the file"}"#).unwrap();

        let app = TestApp::spawn_without_db_with(|cfg| {
            cfg.content.settings_file = sfile.clone();
            cfg.content.description = Some("From the config".to_string());
        })
        .await;

        let res = app.get(routes::FORM).await;

        assert_eq!(res.body["description"], "From the config");
    }
}

mod context {
    use super::*;

    #[tokio::test]
    async fn grid_and_fixed_options_are_served() {
        let app = TestApp::spawn_without_db().await;

        let res = app.get(routes::FORM).await;

        let grid = res.body["grid"].as_array().unwrap();
        assert_eq!(grid.len(), 10);
        let drivers: usize = grid
            .iter()
            .map(|t| t["drivers"].as_array().unwrap().len())
            .sum();
        assert_eq!(drivers, 20);

        assert_eq!(res.body["options"]["time_diff"].as_array().unwrap().len(), 5);
        assert_eq!(
            res.body["options"]["teams_with_points"],
            json!([5, 6, 7, 8, 9, 10])
        );
        assert_eq!(res.body["options"]["yes_no"], json!(["Yes", "No"]));
    }

    #[tokio::test]
    async fn active_races_carry_deadline_state() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let open = app
            .post_with_token(
                routes::RACES,
                &json!({
                    "name": "Future GP",
                    "race_date": "2099-06-01",
                    "submission_deadline": "2099-01-01T12:00:00Z",
                }),
                &token,
            )
            .await;
        assert_eq!(open.status, 201);

        let closed = app
            .post_with_token(
                routes::RACES,
                &json!({
                    "name": "Past GP",
                    "race_date": "2020-06-01",
                    "submission_deadline": "2020-01-01T12:00:00Z",
                }),
                &token,
            )
            .await;
        assert_eq!(closed.status, 201);

        let res = app.get(routes::FORM).await;
        let races = res.body["active_races"].as_array().unwrap();
        assert_eq!(races.len(), 2);

        let by_name = |name: &str| {
            races
                .iter()
                .find(|r| r["name"] == name)
                .unwrap_or_else(|| panic!("race {name} missing"))
                .clone()
        };
        assert_eq!(by_name("Future GP")["deadline_passed"], false);
        assert_eq!(by_name("Past GP")["deadline_passed"], true);
    }

    #[tokio::test]
    async fn first_active_race_is_selected_by_default() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let race_id = app.create_race(&token, "Only GP").await;

        let res = app.get(routes::FORM).await;

        assert_eq!(res.body["selected_race_id"], race_id);
    }

    #[tokio::test]
    async fn no_store_means_no_races_but_a_rendered_form() {
        let app = TestApp::spawn_without_db().await;

        let res = app.get(routes::FORM).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["active_races"], json!([]));
        assert_eq!(res.body["selected_race_id"], serde_json::Value::Null);
    }
}

use serde_json::json;

use crate::common::{TestApp, result_body, routes, submission_body};

mod scoreboard {
    use super::*;

    #[tokio::test]
    async fn without_a_result_only_the_count_is_reported() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let race_id = app.create_race(&token, "Spanish GP").await;
        app.submit(&submission_body("Iza", Some(race_id))).await;

        let res = app.get_with_token(&routes::stats(race_id), &token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["submission_count"], 1);
        assert!(res.body["scoreboard"].is_null());
        assert!(res.body["max_score"].is_null());
        assert!(res.body["distributions"].is_null());
    }

    #[tokio::test]
    async fn perfect_prediction_scores_the_maximum() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let race_id = app.create_race(&token, "Spanish GP").await;

        app.submit(&submission_body("Iza", Some(race_id))).await;
        app.enter_result(&token, race_id, &result_body()).await;

        let res = app.get_with_token(&routes::stats(race_id), &token).await;

        // No extra questions: 4 podium + 6 fixed categories.
        assert_eq!(res.body["max_score"], 10);
        let row = &res.body["scoreboard"][0];
        assert_eq!(row["rank"], 1);
        assert_eq!(row["user_name"], "Iza");
        assert_eq!(row["points"], 10);
        let details = row["details"].as_array().unwrap();
        assert_eq!(details.len(), 10);
        assert!(details.contains(&json!("1 pt full podium bonus")));
    }

    #[tokio::test]
    async fn swapped_podium_positions_score_seven() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let race_id = app.create_race(&token, "Spanish GP").await;

        // P2 and P3 swapped relative to the result: the worked example.
        let mut body = submission_body("Iza", Some(race_id));
        body["podium_2"] = json!("Charles Leclerc");
        body["podium_3"] = json!("Lando Norris");
        app.submit(&body).await;
        app.enter_result(&token, race_id, &result_body()).await;

        let res = app.get_with_token(&routes::stats(race_id), &token).await;

        let row = &res.body["scoreboard"][0];
        assert_eq!(row["points"], 7);
        assert!(
            !row["details"]
                .as_array()
                .unwrap()
                .contains(&json!("1 pt full podium bonus"))
        );
    }

    #[tokio::test]
    async fn equal_totals_share_the_better_rank() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let race_id = app.create_race(&token, "Spanish GP").await;

        // Two perfect predictions and one that misses driver of the day.
        app.submit(&submission_body("Iza", Some(race_id))).await;
        app.submit(&submission_body("Kinga", Some(race_id))).await;
        let mut worse = submission_body("Seweryn", Some(race_id));
        worse["driver_of_day"] = json!("Lewis Hamilton");
        worse["safety_car"] = json!("No");
        app.submit(&worse).await;

        app.enter_result(&token, race_id, &result_body()).await;

        let res = app.get_with_token(&routes::stats(race_id), &token).await;
        let scoreboard = res.body["scoreboard"].as_array().unwrap();

        let ranks: Vec<i64> = scoreboard
            .iter()
            .map(|r| r["rank"].as_i64().unwrap())
            .collect();
        assert_eq!(ranks, [1, 1, 3]);
        assert_eq!(scoreboard[2]["user_name"], "Seweryn");
        assert_eq!(scoreboard[2]["points"], 8);
    }

    #[tokio::test]
    async fn extra_answers_score_only_on_matching_labels() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let race_id = app.create_race(&token, "Spanish GP").await;

        // Submission answers two extras; the result only carries one.
        let mut body = submission_body("Iza", Some(race_id));
        body["extra_answers"] = json!(["Yes", "Ferrari"]);
        app.submit(&body).await;

        let mut result = result_body();
        result["extra_answers"] = json!(["Yes"]);
        app.enter_result(&token, race_id, &result).await;

        let res = app.get_with_token(&routes::stats(race_id), &token).await;

        // 10 fixed points + 1 matching extra; the orphaned label scores zero.
        assert_eq!(res.body["max_score"], 11);
        assert_eq!(res.body["scoreboard"][0]["points"], 11);
    }

    #[tokio::test]
    async fn histogram_counts_totals() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let race_id = app.create_race(&token, "Spanish GP").await;

        app.submit(&submission_body("Iza", Some(race_id))).await;
        app.submit(&submission_body("Kinga", Some(race_id))).await;
        app.enter_result(&token, race_id, &result_body()).await;

        let res = app.get_with_token(&routes::stats(race_id), &token).await;

        assert_eq!(res.body["score_histogram"], json!([{"points": 10, "count": 2}]));
    }
}

mod distributions {
    use super::*;

    #[tokio::test]
    async fn pick_counts_flag_the_actual_result() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let race_id = app.create_race(&token, "Spanish GP").await;

        app.submit(&submission_body("Iza", Some(race_id))).await;
        let mut other = submission_body("Kinga", Some(race_id));
        other["podium_1"] = json!("Lando Norris");
        other["podium_2"] = json!("Max Verstappen");
        app.submit(&other).await;

        app.enter_result(&token, race_id, &result_body()).await;

        let res = app.get_with_token(&routes::stats(race_id), &token).await;
        let distributions = res.body["distributions"].as_array().unwrap();

        let podium_1 = distributions
            .iter()
            .find(|d| d["category"] == "podium_1")
            .expect("podium_1 distribution missing");
        let options = podium_1["options"].as_array().unwrap();
        assert_eq!(options.len(), 2);
        for option in options {
            assert_eq!(option["count"], 1);
            let is_winner = option["option"] == "Max Verstappen";
            assert_eq!(option["actual"], json!(is_winner));
        }

        let safety_car = distributions
            .iter()
            .find(|d| d["category"] == "safety_car")
            .expect("safety_car distribution missing");
        assert_eq!(
            safety_car["options"],
            json!([{"option": "Yes", "count": 2, "actual": true}])
        );
    }
}

mod export {
    use super::*;

    #[tokio::test]
    async fn scoreboard_export_is_a_csv_attachment() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let race_id = app.create_race(&token, "Spanish GP").await;
        app.submit(&submission_body("Iza", Some(race_id))).await;
        app.enter_result(&token, race_id, &result_body()).await;

        let res = app
            .get_with_token(&routes::stats_export(race_id), &token)
            .await;

        assert_eq!(res.status, 200);
        assert!(res.content_type.as_deref().unwrap().starts_with("text/csv"));
        assert_eq!(
            res.content_disposition.as_deref(),
            Some("attachment; filename=\"Spanish_GP_scoreboard.csv\"")
        );

        let lines: Vec<&str> = res.text.lines().collect();
        assert_eq!(lines[0], "Rank,Name,Points,Details,Submitted at");
        assert!(lines[1].starts_with("1,Iza,10,"));
    }

    #[tokio::test]
    async fn scoreboard_export_requires_a_result() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let race_id = app.create_race(&token, "Spanish GP").await;

        let res = app
            .get_with_token(&routes::stats_export(race_id), &token)
            .await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn submissions_export_lists_raw_rows() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let race_id = app.create_race(&token, "Spanish GP").await;
        let mut body = submission_body("Iza", Some(race_id));
        body["extra_answers"] = json!(["Ferrari"]);
        app.submit(&body).await;

        let res = app
            .get_with_token(&routes::submissions_export(race_id), &token)
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(
            res.content_disposition.as_deref(),
            Some("attachment; filename=\"Spanish_GP_submissions.csv\"")
        );

        let lines: Vec<&str> = res.text.lines().collect();
        assert!(lines[0].starts_with("id,user_name,podium_1"));
        assert!(lines[1].contains("Iza"));
        assert!(lines[1].contains("Extra question 1"));
    }

    #[tokio::test]
    async fn exports_are_admin_only() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let race_id = app.create_race(&token, "Spanish GP").await;

        let res = app.get(&routes::submissions_export(race_id)).await;

        assert_eq!(res.status, 401);
    }
}

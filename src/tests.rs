#[cfg(test)]
mod integration_tests {
    use crate::schemas::ApiResponse;
    use crate::test_utils::test_utils::{setup_short_app, setup_test_app};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use common::{
        AggregateSeriesDto, BirthRecordDto, ForecastDto, RegionTotalDto, SummaryDto, YearTotalDto,
    };
    use compute::testing::sample_records;

    #[tokio::test]
    async fn test_health_check() {
        // Setup test server
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        // Send GET request to health endpoint
        let response = server.get("/health").await;

        // Verify response
        response.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_summary_matches_source_records() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/api/v1/summary").await;
        response.assert_status(StatusCode::OK);

        let body: ApiResponse<SummaryDto> = response.json();
        assert!(body.success);

        // The reported total must equal the sum over the raw records
        let expected_total: u64 = sample_records().iter().map(|r| u64::from(r.count)).sum();
        assert_eq!(body.data.total_births, expected_total);
        assert!(body.data.top_region.is_some());
        assert!(body.data.dominant_age_group.is_some());
    }

    #[tokio::test]
    async fn test_region_filter_restricts_totals() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .get("/api/v1/aggregates/regions")
            .add_query_param("regions", "Glasgow City")
            .await;
        response.assert_status(StatusCode::OK);

        let body: ApiResponse<Vec<RegionTotalDto>> = response.json();
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0].region, "Glasgow City");

        let expected: u64 = sample_records()
            .iter()
            .filter(|r| r.region == "Glasgow City")
            .map(|r| u64::from(r.count))
            .sum();
        assert_eq!(body.data[0].total, expected);
    }

    #[tokio::test]
    async fn test_year_totals_cover_both_years() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/api/v1/aggregates/years").await;
        response.assert_status(StatusCode::OK);

        let body: ApiResponse<Vec<YearTotalDto>> = response.json();
        let years: Vec<i32> = body.data.iter().map(|t| t.year).collect();
        assert_eq!(years, vec![2022, 2023]);
    }

    #[tokio::test]
    async fn test_series_is_contiguous() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/api/v1/series").await;
        response.assert_status(StatusCode::OK);

        let body: ApiResponse<AggregateSeriesDto> = response.json();
        let points = &body.data.points;
        assert_eq!(points.len(), 24);
        assert_eq!((points[0].year, points[0].month), (2022, 1));
        for pair in points.windows(2) {
            let prev = pair[0].year * 12 + pair[0].month as i32 - 1;
            let next = pair[1].year * 12 + pair[1].month as i32 - 1;
            assert_eq!(next, prev + 1);
        }
    }

    #[tokio::test]
    async fn test_records_returns_full_sample() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/api/v1/records").await;
        response.assert_status(StatusCode::OK);

        let body: ApiResponse<Vec<BirthRecordDto>> = response.json();
        // 3 regions x 24 months x 4 age groups
        assert_eq!(body.data.len(), 288);
    }

    #[tokio::test]
    async fn test_forecast_extends_the_series() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .get("/api/v1/forecast")
            .add_query_param("horizon", "6")
            .await;
        response.assert_status(StatusCode::OK);

        let body: ApiResponse<ForecastDto> = response.json();
        assert_eq!(body.data.horizon, 6);
        assert_eq!(body.data.points.len(), 6);

        // The sample ends at 2023-12, so the forecast starts at 2024-01
        assert_eq!(
            (body.data.points[0].year, body.data.points[0].month),
            (2024, 1)
        );
        for point in &body.data.points {
            assert!(point.lower >= 0.0);
            assert!(point.lower <= point.predicted);
            assert!(point.predicted <= point.upper);
        }
    }

    #[tokio::test]
    async fn test_forecast_rejects_short_history() {
        let app = setup_short_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/api/v1/forecast").await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_bad_filter_parameters_are_rejected() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .get("/api/v1/summary")
            .add_query_param("start", "not-a-period")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let response = server
            .get("/api/v1/forecast")
            .add_query_param("horizon", "100")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_repeated_request_is_served_from_cache() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let first = server.get("/api/v1/summary").await;
        first.assert_status(StatusCode::OK);
        let first: ApiResponse<SummaryDto> = first.json();

        let second = server.get("/api/v1/summary").await;
        second.assert_status(StatusCode::OK);
        let second: ApiResponse<SummaryDto> = second.json();

        assert_eq!(second.message, "Summary retrieved from cache");
        assert_eq!(first.data.total_births, second.data.total_births);
    }
}

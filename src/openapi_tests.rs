#[cfg(test)]
mod tests {
    use crate::schemas::ApiDoc;
    use utoipa::OpenApi;

    #[test]
    fn test_openapi_schema_generation() {
        // Test that the OpenAPI schema can be generated without errors
        let openapi = ApiDoc::openapi();

        // Verify that the schema contains the expected components
        assert!(openapi.components.is_some());
        let components = openapi.components.as_ref().unwrap();

        // Check that ErrorResponse schema is properly defined
        assert!(components.schemas.contains_key("ErrorResponse"));

        // Check that HealthResponse schema is properly defined
        assert!(components.schemas.contains_key("HealthResponse"));

        // Verify that the schema can be serialized to JSON without errors
        let json_result = serde_json::to_string(&openapi);
        assert!(json_result.is_ok());
    }

    #[test]
    fn test_error_response_schema_structure() {
        let openapi = ApiDoc::openapi();
        let components = openapi.components.as_ref().unwrap();
        let error_response_schema = components.schemas.get("ErrorResponse").unwrap();

        // Verify ErrorResponse has the expected structure
        if let utoipa::openapi::RefOr::T(utoipa::openapi::schema::Schema::Object(obj)) =
            error_response_schema
        {
            let properties = &obj.properties;
            assert!(properties.contains_key("error"));
            assert!(properties.contains_key("code"));
            assert!(properties.contains_key("success"));
        } else {
            panic!("ErrorResponse should be an object schema");
        }
    }

    #[test]
    fn test_health_response_schema_structure() {
        let openapi = ApiDoc::openapi();
        let components = openapi.components.as_ref().unwrap();
        let health_response_schema = components.schemas.get("HealthResponse").unwrap();

        // Verify HealthResponse has the expected structure
        if let utoipa::openapi::RefOr::T(utoipa::openapi::schema::Schema::Object(obj)) =
            health_response_schema
        {
            let properties = &obj.properties;
            assert!(properties.contains_key("status"));
            assert!(properties.contains_key("version"));
            assert!(properties.contains_key("dataset"));
        } else {
            panic!("HealthResponse should be an object schema");
        }
    }

    #[test]
    fn test_openapi_paths_cover_api_surface() {
        let openapi = ApiDoc::openapi();
        let paths = &openapi.paths.paths;

        assert!(paths.contains_key("/health"));
        assert!(paths.contains_key("/api/v1/records"));
        assert!(paths.contains_key("/api/v1/aggregates/regions"));
        assert!(paths.contains_key("/api/v1/aggregates/age-groups"));
        assert!(paths.contains_key("/api/v1/aggregates/years"));
        assert!(paths.contains_key("/api/v1/aggregates/months"));
        assert!(paths.contains_key("/api/v1/aggregates/heatmap"));
        assert!(paths.contains_key("/api/v1/series"));
        assert!(paths.contains_key("/api/v1/summary"));
        assert!(paths.contains_key("/api/v1/forecast"));

        let health_path = paths.get("/health").unwrap();
        let health_get = health_path
            .operations
            .get(&utoipa::openapi::PathItemType::Get);
        assert!(health_get.is_some());

        let responses = &health_get.unwrap().responses;
        assert!(responses.responses.contains_key("200"));
    }
}

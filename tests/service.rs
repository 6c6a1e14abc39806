//! Request handling: status codes, JSON shapes and messages.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use curve_shape::service::{AnalysisRequest, AnalysisResponse, AnalysisService};
use curve_shape::{AnalysisConfig, Category, ErrorKind};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn service() -> AnalysisService {
    AnalysisService::new(AnalysisConfig::default()).unwrap()
}

fn handle(body: Value) -> (u16, Value) {
    let (status, body) = service().handle_json(&body.to_string());
    (status, serde_json::from_str(&body).unwrap())
}

#[test]
fn test_classified_response_shape() {
    let (status, body) = handle(json!({ "expressionString": "x*x" }));
    assert_eq!(status, 200);
    assert_eq!(body["category"], "Quadratic");
    assert_eq!(
        body["displayText"],
        "The function is classified as: QUADRATIC FUNCTION"
    );

    let series = &body["series"];
    assert_eq!(series["grid"].as_array().unwrap().len(), 20_000);
    assert_eq!(series["values"].as_array().unwrap().len(), 20_000);
    assert_eq!(series["derivative1"].as_array().unwrap().len(), 19_999);
    // Two panels: no second derivative.
    assert!(series.get("derivative2").is_none());

    assert_eq!(body["plot"]["mime"], "image/svg+xml");
    let svg = STANDARD.decode(body["plot"]["data"].as_str().unwrap()).unwrap();
    let svg = String::from_utf8(svg).unwrap();
    assert_eq!(svg.matches("class=\"panel\"").count(), 2);
    assert!(svg.contains("Analysis of function: 'x*x'"));
}

#[test]
fn test_three_panel_shapes_include_second_derivative() {
    for (expression, category) in [("abs(x)", "Triangular"), ("sin(5*x)", "SmoothCurved")] {
        let (status, body) = handle(json!({ "expressionString": expression }));
        assert_eq!(status, 200);
        assert_eq!(body["category"], category);
        assert_eq!(
            body["series"]["derivative2"].as_array().unwrap().len(),
            19_998
        );
    }
}

#[test]
fn test_display_labels() {
    let cases = [
        ("sign(x)", "RECTANGULAR WAVE"),
        ("abs(x)", "TRIANGULAR WAVE"),
        ("x", "LINEAR FUNCTION"),
        ("x*x", "QUADRATIC FUNCTION"),
        ("sin(5*x)", "SINE-LIKE (SMOOTH / CURVED FUNCTION)"),
    ];
    let service = service();
    for (expression, label) in cases {
        let (status, response) = service.handle(&AnalysisRequest::new(expression));
        assert_eq!(status, 200);
        assert_eq!(
            response.text(),
            format!("The function is classified as: {}", label)
        );
    }
}

#[test]
fn test_degenerate_response() {
    let (status, body) = handle(json!({ "expressionString": "5" }));
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({
            "category": "ConstantOrInvalid",
            "displayText": "The function '5' is CONSTANT or INVALID.",
        })
    );
}

#[test]
fn test_empty_input() {
    for expression in ["", "   ", "\t\n"] {
        let (status, body) = handle(json!({ "expressionString": expression }));
        assert_eq!(status, 400);
        assert_eq!(
            body,
            json!({
                "errorKind": "EmptyInput",
                "message": "Function string is empty.",
            })
        );
    }
}

#[test]
fn test_missing_field_is_empty_input() {
    let (status, body) = handle(json!({}));
    assert_eq!(status, 400);
    assert_eq!(body["errorKind"], "EmptyInput");
}

#[test]
fn test_legacy_field_name() {
    let (status, body) = handle(json!({ "function_string": "x" }));
    assert_eq!(status, 200);
    assert_eq!(body["category"], "Linear");
}

#[test]
fn test_evaluation_error() {
    let (status, body) = handle(json!({ "expressionString": "y+1" }));
    assert_eq!(status, 400);
    assert_eq!(
        body,
        json!({
            "errorKind": "EvaluationError",
            "message": "Error evaluating function: name 'y' is not defined",
        })
    );
}

#[test]
fn test_syntax_error() {
    let (status, body) = handle(json!({ "expressionString": "x +* 2" }));
    assert_eq!(status, 400);
    assert_eq!(body["errorKind"], "EvaluationError");
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .starts_with("Error evaluating function: invalid syntax at column")
    );
}

#[test]
fn test_division_by_a_zero_number() {
    let (status, body) = handle(json!({ "expressionString": "x + 1/0" }));
    assert_eq!(status, 400);
    assert_eq!(
        body,
        json!({
            "errorKind": "EvaluationError",
            "message": "Error evaluating function: division by zero",
        })
    );

    // Dividing samples by zero gives infinities, not an error.
    let (status, body) = handle(json!({ "expressionString": "1/x" }));
    assert_eq!(status, 200);
    assert_eq!(body["category"], "Rectangular");
}

#[test]
fn test_deeply_nested_expression_is_rejected() {
    let depth = 10_000;
    let expression = format!("{}x{}", "(".repeat(depth), ")".repeat(depth));
    let (status, response) = service().handle(&AnalysisRequest::new(expression));
    assert_eq!(status, 400);
    assert!(
        response
            .text()
            .starts_with("Error evaluating function: expression nested too deeply")
    );

    let expression = format!("{}x{}", "(".repeat(40), ")".repeat(40));
    let (status, response) = service().handle(&AnalysisRequest::new(expression));
    assert_eq!(status, 200);
    assert_eq!(response.category(), Some(Category::Linear));
}

#[test]
fn test_invalid_payload() {
    let (status, body) = service().handle_json("{not json");
    assert_eq!(status, 400);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["errorKind"], "InvalidPayload");
}

#[test]
fn test_handle_returns_typed_response() {
    let (status, response) = service().handle(&AnalysisRequest::new("sign(x)"));
    assert_eq!(status, 200);
    assert_eq!(response.category(), Some(Category::Rectangular));
    match response {
        AnalysisResponse::Classified(classified) => {
            assert!(classified.series.derivative2.is_none());
            assert!(classified.series.derivative1.iter().all(|d| d.is_finite()));
        }
        other => panic!("Expected a classified response, got {:?}", other),
    }

    let (status, response) = service().handle(&AnalysisRequest::new("sin"));
    assert_eq!(status, 400);
    assert_eq!(response.category(), None);
    match response {
        AnalysisResponse::Failure(failure) => {
            assert_eq!(failure.error_kind, ErrorKind::EvaluationError)
        }
        other => panic!("Expected a failure response, got {:?}", other),
    }
}

#[test]
fn test_nan_values_serialise_as_null() {
    let (status, body) = handle(json!({ "expressionString": "sqrt(x)" }));
    assert_eq!(status, 200);
    let values = body["series"]["values"].as_array().unwrap();
    assert!(values[0].is_null());
    assert!(values[19_999].is_number());
}

#[test]
fn test_config_changes_grid() {
    let config =
        AnalysisConfig::from_toml_str("[grid]\nstart = 0.0\nstop = 1.0\nsamples = 101\n")
            .unwrap();
    let service = AnalysisService::new(config).unwrap();
    let (status, response) = service.handle(&AnalysisRequest::new("x*x"));
    assert_eq!(status, 200);
    match response {
        AnalysisResponse::Classified(classified) => {
            assert_eq!(classified.series.grid.len(), 101);
            assert_eq!(classified.series.grid[0], 0.0);
            assert_eq!(classified.series.grid[100], 1.0);
        }
        other => panic!("Expected a classified response, got {:?}", other),
    }
}

//! End-to-end pipeline tests with a mock chat model.

use chartflow::testing::MockChat;
use chartflow::{
    ChartPipeline, ChartRequest, ChartType, DataValue, ErrorKind, FileInput, PipelineConfig,
};

#[tokio::test]
async fn prompt_with_bracketed_lists_produces_a_chart() {
    let pipeline = ChartPipeline::new(MockChat::always_miss());
    let request = ChartRequest::from_prompt("Beijing[22,23,24], Shanghai[25,26,27]");

    let result = pipeline.generate_chart(&request).await;

    assert!(result.success, "unexpected error: {:?}", result.error);
    assert_eq!(result.data.len(), 3);
    let first = &result.data[0];
    assert_eq!(first["Beijing"], DataValue::Number(22.0));
    assert_eq!(first["Shanghai"], DataValue::Number(25.0));
    assert!(result.config.is_some());
    assert!(!result.insights.is_empty());
    assert_eq!(
        result.metadata.data_source,
        Some(chartflow::DataSource::Prompt)
    );
}

#[tokio::test]
async fn ai_parse_takes_precedence_over_patterns() {
    let chat = MockChat::new().with_response(
        r#"```json
{"hasData": true, "xAxisKey": "name", "yAxisKeys": ["value"],
 "data": [{"name": "A", "value": 60}, {"name": "B", "value": 40}]}
```"#,
    );
    let pipeline = ChartPipeline::new(chat);
    let request =
        ChartRequest::from_prompt("A has 60 and B has 40, show the share").with_chart_type(ChartType::Pie);

    let result = pipeline.generate_chart(&request).await;

    assert!(result.success, "unexpected error: {:?}", result.error);
    assert_eq!(result.chart_type, Some(ChartType::Pie));
    // Pie insight names the leading category with its percentage.
    assert!(result
        .insights
        .iter()
        .any(|i| i.contains("A") && i.contains("60.0%")));
}

#[tokio::test]
async fn chat_outage_falls_back_to_regex_silently() {
    let pipeline = ChartPipeline::new(MockChat::new().failing());
    let request = ChartRequest::from_prompt("一月: 120万元, 二月: 95万元, 三月: 130万元");

    let result = pipeline.generate_chart(&request).await;

    assert!(result.success, "unexpected error: {:?}", result.error);
    assert_eq!(result.data[0]["amount"], DataValue::Number(1_200_000.0));
}

#[tokio::test]
async fn unstructured_prompt_is_insufficient_data() {
    let pipeline = ChartPipeline::new(MockChat::always_miss());
    let request = ChartRequest::from_prompt("please draw me something nice");

    let result = pipeline.generate_chart(&request).await;

    assert!(!result.success);
    assert_eq!(result.error_kind, Some(ErrorKind::InsufficientData));
    assert!(result.error.is_some());
}

#[tokio::test]
async fn csv_file_wins_over_the_prompt() {
    let pipeline = ChartPipeline::new(MockChat::always_miss());
    let csv = b"month,revenue\nJan,1200\nFeb,950\nMar,1400\n".to_vec();
    let request =
        ChartRequest::from_prompt("chart my revenue").with_file(FileInput::new("revenue.csv", csv));

    let result = pipeline.generate_chart(&request).await;

    assert!(result.success, "unexpected error: {:?}", result.error);
    assert_eq!(
        result.metadata.data_source,
        Some(chartflow::DataSource::File)
    );
    assert_eq!(result.data.len(), 3);
    assert_eq!(result.data[2]["revenue"], DataValue::Number(1400.0));
}

#[tokio::test]
async fn empty_file_fails_with_insufficient_data() {
    let pipeline = ChartPipeline::new(MockChat::always_miss());
    let request = ChartRequest::from_prompt("chart this")
        .with_file(FileInput::new("empty.csv", b"a,b\n".to_vec()));

    let result = pipeline.generate_chart(&request).await;

    assert!(!result.success);
    assert_eq!(result.error_kind, Some(ErrorKind::InsufficientData));
    assert!(result.error.as_deref().unwrap().contains("empty.csv"));
}

#[tokio::test]
async fn unsupported_file_type_fails_with_invalid_request() {
    let pipeline = ChartPipeline::new(MockChat::always_miss());
    let request = ChartRequest::from_prompt("chart this")
        .with_file(FileInput::new("notes.pdf", b"%PDF-".to_vec()));

    let result = pipeline.generate_chart(&request).await;

    assert!(!result.success);
    assert_eq!(result.error_kind, Some(ErrorKind::InvalidRequest));
}

#[tokio::test]
async fn pie_with_thirteen_categories_is_rejected() {
    let pipeline = ChartPipeline::new(MockChat::always_miss());
    let mut csv = String::from("name,value\n");
    for i in 0..13 {
        csv.push_str(&format!("cat-{i},{}\n", 10 + i));
    }
    let request = ChartRequest::from_prompt("pie chart please")
        .with_file(FileInput::new("cats.csv", csv.into_bytes()))
        .with_chart_type(ChartType::Pie);

    let result = pipeline.generate_chart(&request).await;

    assert!(!result.success);
    assert_eq!(result.error_kind, Some(ErrorKind::InvalidRequest));
    assert!(result.error.as_deref().unwrap().contains("bar"));
}

#[tokio::test]
async fn result_shape_is_stable_across_sources() {
    let pipeline = ChartPipeline::new(MockChat::always_miss());

    let from_prompt = pipeline
        .generate_chart(&ChartRequest::from_prompt("a[1,2,3] b[4,5,6]"))
        .await;
    let from_file = pipeline
        .generate_chart(
            &ChartRequest::from_prompt("").with_file(FileInput::new(
                "t.csv",
                b"x,a,b\np,1,4\nq,2,5\nr,3,6\n".to_vec(),
            )),
        )
        .await;

    for result in [&from_prompt, &from_file] {
        assert!(result.success, "unexpected error: {:?}", result.error);
        let json = serde_json::to_value(result).unwrap();
        for key in ["success", "data", "config", "insights", "metadata"] {
            assert!(json.get(key).is_some(), "missing key {key}");
        }
        assert!(json["metadata"].get("processingTime").is_some());
        assert!(json["metadata"].get("confidence").is_some());
    }
}

#[tokio::test]
async fn regex_fallback_reports_its_extraction_method() {
    use chartflow::{ExtractionMethod, PromptExtractor};

    let extractor = PromptExtractor::new(MockChat::always_miss());
    let extracted = extractor
        .extract("Beijing[22,23,24], Shanghai[25,26,27]")
        .await
        .unwrap();
    assert_eq!(extracted.extraction_method, ExtractionMethod::RegexPattern);
}

#[tokio::test]
async fn low_quality_dataset_is_rejected() {
    let config = PipelineConfig {
        min_quality_score: 0.9,
        ..Default::default()
    };
    let pipeline = ChartPipeline::with_config(MockChat::always_miss(), config);

    // Half the cells empty: completeness drags quality under the floor.
    let csv = b"name,value\nA,10\nB,\nC,\nD,40\n".to_vec();
    let request = ChartRequest::from_prompt("").with_file(FileInput::new("sparse.csv", csv));

    let result = pipeline.generate_chart(&request).await;

    assert!(!result.success);
    assert!(result.error.as_deref().unwrap().contains("quality"));
}

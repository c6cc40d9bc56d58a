//! Pairwise text quality comparison
//!
//! An LLM judge decides which of two responses to the same prompt is
//! better, optionally grounding the judgment in per-response source
//! text and an ideal reference answer. The judgment comes back as a
//! forced function call with a labeled choice.

use tracing::debug;

use crate::error::{EvalError, EvalResult};
use crate::llm::{FunctionSpec, JudgeClient, JudgeMessage};
use crate::metrics::value::MetricValue;

const JUDGE_INSTRUCTIONS: &str = "You are comparing two responses to the same prompt. \
     Decide which response answers the prompt better, considering \
     correctness, relevance and completeness. If source text is given, \
     prefer the response that is consistent with it. If an ideal \
     response is given, prefer the response closer to it. Save your \
     verdict as 'Response A', 'Response B', or 'Tie'.";

fn to_owned_vec<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    items.iter().map(|s| s.as_ref().to_string()).collect()
}

fn check_parallel(name: &str, len: usize, expected: usize) -> EvalResult<()> {
    if len != expected {
        return Err(EvalError::invalid_input(format!(
            "{name} length {len} does not match generated_outputs_a length {expected}"
        )));
    }
    Ok(())
}

fn build_comparison_prompt(
    prompt: &str,
    output_a: &str,
    output_b: &str,
    source_a: Option<&str>,
    source_b: Option<&str>,
    reference: Option<&str>,
) -> String {
    let mut text = format!("[Prompt]\n{prompt}\n");
    if let Some(source) = source_a {
        text.push_str(&format!("\n[Source for Response A]\n{source}\n"));
    }
    if let Some(source) = source_b {
        text.push_str(&format!("\n[Source for Response B]\n{source}\n"));
    }
    if let Some(reference) = reference {
        text.push_str(&format!("\n[Ideal Response]\n{reference}\n"));
    }
    text.push_str(&format!(
        "\n[Response A]\n{output_a}\n\n[Response B]\n{output_b}"
    ));
    text
}

/// Compares pairs of generated outputs with an LLM judge. Scores:
/// `Response A` 0.0, `Tie` 0.5, `Response B` 1.0.
///
/// `prompts` is required here since the judge needs the original
/// question; `sources_a`/`sources_b` ground each side in its own
/// source text and `reference_outputs` supplies an ideal answer. The
/// returned value carries the A-side outputs as `generated_outputs`
/// and the B side as `reference_outputs`.
pub async fn pairwise_comparison<S, P>(
    generated_outputs_a: &[S],
    generated_outputs_b: &[S],
    prompts: &[P],
    sources_a: Option<&[S]>,
    sources_b: Option<&[S]>,
    reference_outputs: Option<&[S]>,
    client: &JudgeClient,
) -> EvalResult<MetricValue>
where
    S: AsRef<str>,
    P: AsRef<str>,
{
    let expected = generated_outputs_a.len();
    check_parallel("generated_outputs_b", generated_outputs_b.len(), expected)?;
    check_parallel("prompts", prompts.len(), expected)?;
    if let Some(sources) = sources_a {
        check_parallel("sources_a", sources.len(), expected)?;
    }
    if let Some(sources) = sources_b {
        check_parallel("sources_b", sources.len(), expected)?;
    }
    if let Some(references) = reference_outputs {
        check_parallel("reference_outputs", references.len(), expected)?;
    }

    let spec = FunctionSpec::new(
        "pairwise_comparison",
        "Saves the verdict of a pairwise response comparison.",
        "pairwise_comparison",
        vec![
            "Response A".to_string(),
            "Response B".to_string(),
            "Tie".to_string(),
        ],
    );

    let mut metric_values = Vec::with_capacity(expected);
    for i in 0..expected {
        let user_prompt = build_comparison_prompt(
            prompts[i].as_ref(),
            generated_outputs_a[i].as_ref(),
            generated_outputs_b[i].as_ref(),
            sources_a.map(|s| s[i].as_ref()),
            sources_b.map(|s| s[i].as_ref()),
            reference_outputs.map(|r| r[i].as_ref()),
        );
        let messages = vec![
            JudgeMessage::system(JUDGE_INSTRUCTIONS),
            JudgeMessage::user(user_prompt),
        ];

        let response = client.chat(&messages, Some(&spec)).await?;
        let verdict = response
            .function_argument("pairwise_comparison")
            .ok_or_else(|| EvalError::llm("judge returned no pairwise_comparison verdict"))?;
        let score = match verdict {
            "Response A" => 0.0,
            "Tie" => 0.5,
            "Response B" => 1.0,
            other => {
                return Err(EvalError::llm(format!(
                    "unexpected pairwise_comparison verdict '{other}'"
                )));
            }
        };
        debug!(verdict, score, "pairwise judgment");
        metric_values.push(score);
    }

    MetricValue::new(
        "pairwise_comparison",
        Some(to_owned_vec(prompts)),
        to_owned_vec(generated_outputs_a),
        Some(to_owned_vec(generated_outputs_b)),
        metric_values,
        None,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::llm::{JudgeProvider, ModelParameters, ProviderConfig};

    fn verdict_response(verdict: &str) -> serde_json::Value {
        json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {
                            "name": "pairwise_comparison",
                            "arguments": format!("{{\n  \"pairwise_comparison\": \"{verdict}\"\n}}")
                        }
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        })
    }

    async fn mock_judge(verdict: &str) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(verdict_response(verdict)))
            .mount(&mock_server)
            .await;
        mock_server
    }

    fn openai_client(base_url: &str) -> JudgeClient {
        let config = ProviderConfig::new()
            .with_api_key("dummy_key")
            .with_base_url(base_url);
        JudgeClient::new(JudgeProvider::OpenAi, config, ModelParameters::new("gpt-4o-mini"))
            .unwrap()
    }

    fn azure_client(base_url: &str) -> JudgeClient {
        let config = ProviderConfig::new()
            .with_api_key("dummy_azure_key")
            .with_base_url(base_url)
            .with_api_version("dummy_version");
        JudgeClient::new(
            JudgeProvider::AzureOpenAi,
            config,
            ModelParameters::new("judge-deployment"),
        )
        .unwrap()
    }

    const OUTPUT_A: &str = "Tokyo is Japan's capital city.";
    const OUTPUT_B: &str = "New York is Japan's capital city.";
    const PROMPT: &str = "What is the capital of Japan?";
    const SOURCE: &str = "Capital of Japan = Tokyo";

    /// The five source/reference combinations of the judge prompt:
    /// no extras, reference only, source A only, both sources, and
    /// both sources plus the reference. "Response A" scores 0.
    #[tokio::test]
    async fn test_pairwise_comparison_input_combinations() {
        let cases: Vec<(Option<Vec<&str>>, Option<Vec<&str>>, Option<Vec<&str>>)> = vec![
            (None, None, None),
            (None, None, Some(vec!["Tokyo"])),
            (Some(vec![SOURCE]), None, None),
            (Some(vec![SOURCE]), Some(vec![SOURCE]), None),
            (Some(vec![SOURCE]), Some(vec![SOURCE]), Some(vec!["Tokyo"])),
        ];

        let mock_server = mock_judge("Response A").await;
        let client = openai_client(&mock_server.uri());

        for (sources_a, sources_b, references) in cases {
            let result = pairwise_comparison(
                &[OUTPUT_A],
                &[OUTPUT_B],
                &[PROMPT],
                sources_a.as_deref(),
                sources_b.as_deref(),
                references.as_deref(),
                &client,
            )
            .await
            .unwrap();
            assert_eq!(result.metric_values(), &[0.0]);
            assert_eq!(result.metric_name(), "pairwise_comparison");
        }
    }

    #[tokio::test]
    async fn test_pairwise_comparison_azure() {
        let mock_server = mock_judge("Response A").await;
        let client = azure_client(&mock_server.uri());

        let result = pairwise_comparison(
            &[OUTPUT_A],
            &[OUTPUT_B],
            &[PROMPT],
            None,
            None,
            None,
            &client,
        )
        .await
        .unwrap();
        assert_eq!(result.metric_values(), &[0.0]);
    }

    #[tokio::test]
    async fn test_pairwise_comparison_verdict_mapping() {
        for (verdict, expected) in [("Response A", 0.0), ("Tie", 0.5), ("Response B", 1.0)] {
            let mock_server = mock_judge(verdict).await;
            let client = openai_client(&mock_server.uri());
            let result = pairwise_comparison(
                &[OUTPUT_A],
                &[OUTPUT_B],
                &[PROMPT],
                None,
                None,
                None,
                &client,
            )
            .await
            .unwrap();
            assert_eq!(result.metric_values(), &[expected]);
        }
    }

    #[tokio::test]
    async fn test_pairwise_comparison_container_shape() {
        let mock_server = mock_judge("Tie").await;
        let client = openai_client(&mock_server.uri());
        let result = pairwise_comparison(
            &[OUTPUT_A],
            &[OUTPUT_B],
            &[PROMPT],
            None,
            None,
            None,
            &client,
        )
        .await
        .unwrap();

        assert_eq!(result.generated_outputs(), &[OUTPUT_A.to_string()]);
        assert_eq!(result.reference_outputs(), Some(&[OUTPUT_B.to_string()][..]));
        assert_eq!(result.prompts(), Some(&[PROMPT.to_string()][..]));
    }

    #[tokio::test]
    async fn test_pairwise_comparison_length_mismatch() {
        let mock_server = mock_judge("Tie").await;
        let client = openai_client(&mock_server.uri());
        let result = pairwise_comparison(
            &[OUTPUT_A, OUTPUT_B],
            &[OUTPUT_B],
            &[PROMPT],
            None,
            None,
            None,
            &client,
        )
        .await;
        assert!(matches!(result, Err(EvalError::InvalidInput(_))));
    }
}

//! Integration tests for the judge client with a mock server

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::llm::client::JudgeClient;
    use crate::llm::messages::{FunctionSpec, JudgeMessage};
    use crate::llm::provider::{JudgeProvider, ModelParameters, ProviderConfig};

    fn openai_client(base_url: &str) -> JudgeClient {
        let config = ProviderConfig::new()
            .with_api_key("test-api-key")
            .with_base_url(base_url);
        JudgeClient::new(JudgeProvider::OpenAi, config, ModelParameters::new("gpt-4o-mini"))
            .expect("failed to create judge client")
    }

    fn chat_response_with_tool_call(arguments: &str) -> serde_json::Value {
        json!({
            "id": "chatcmpl-test123",
            "object": "chat.completion",
            "model": "gpt-4o-mini",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_abc",
                        "type": "function",
                        "function": {
                            "name": "save_sentiment_assessment",
                            "arguments": arguments
                        }
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        })
    }

    #[tokio::test]
    async fn test_chat_with_forced_function_call() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer test-api-key"))
            .and(body_partial_json(json!({"model": "gpt-4o-mini"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                chat_response_with_tool_call("{\"sentiment\": \"Positive\"}"),
            ))
            .mount(&mock_server)
            .await;

        let client = openai_client(&mock_server.uri());
        let spec = FunctionSpec::new(
            "save_sentiment_assessment",
            "Save the sentiment assessment",
            "sentiment",
            vec!["Positive".to_string(), "Neutral".to_string(), "Negative".to_string()],
        );
        let messages = vec![JudgeMessage::user("Assess the sentiment of: great job")];

        let response = client.chat(&messages, Some(&spec)).await.unwrap();
        assert_eq!(response.function_argument("sentiment"), Some("Positive"));
    }

    #[tokio::test]
    async fn test_chat_api_error_propagates() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&mock_server)
            .await;

        let client = openai_client(&mock_server.uri());
        let messages = vec![JudgeMessage::user("hello")];

        let result = client.chat(&messages, None).await;
        let err = result.unwrap_err().to_string();
        assert!(err.contains("429"), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn test_embed_returns_one_vector_per_input() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "list",
                "model": "text-embedding-3-small",
                "data": [
                    { "index": 0, "embedding": [1.0, 0.0] },
                    { "index": 1, "embedding": [0.0, 1.0] }
                ]
            })))
            .mount(&mock_server)
            .await;

        let client = openai_client(&mock_server.uri());
        let vectors = client
            .embed(&["first".to_string(), "second".to_string()])
            .await
            .unwrap();
        assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    }

    #[tokio::test]
    async fn test_azure_deployment_url_and_auth_header() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/openai/deployments/judge-deployment/chat/completions"))
            .and(header("api-key", "azure-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{
                    "message": { "role": "assistant", "content": "ok" },
                    "finish_reason": "stop"
                }]
            })))
            .mount(&mock_server)
            .await;

        let config = ProviderConfig::new()
            .with_api_key("azure-key")
            .with_base_url(mock_server.uri())
            .with_api_version("2024-02-01");
        let client = JudgeClient::new(
            JudgeProvider::AzureOpenAi,
            config,
            ModelParameters::new("judge-deployment"),
        )
        .unwrap();

        let response = client.chat(&[JudgeMessage::user("hello")], None).await.unwrap();
        assert_eq!(response.content, "ok");
    }
}

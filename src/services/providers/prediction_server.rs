/// Client for a model-serving endpoint wrapping the pre-trained model
///
/// `GET {predictor_url}/predict?uid=<user>&iid=<item>` returns one prediction
/// record. Impossible predictions (unknown user or item) still carry the model's
/// fallback estimate and are passed through unchanged.
use crate::{
    error::{AppError, AppResult},
    models::{ItemId, Prediction, UserId},
    services::providers::Predictor,
};
use reqwest::Client as HttpClient;

#[derive(Clone)]
pub struct PredictionServerClient {
    http_client: HttpClient,
    api_url: String,
}

impl PredictionServerClient {
    pub fn new(api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait::async_trait]
impl Predictor for PredictionServerClient {
    async fn predict(&self, user: &UserId, item: ItemId) -> AppResult<Prediction> {
        let url = format!("{}/predict", self.api_url);
        let item_param = item.to_string();

        let response = self
            .http_client
            .get(&url)
            .query(&[("uid", user.as_str()), ("iid", item_param.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Prediction(format!(
                "Prediction server returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        let prediction: Prediction = serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                response = %response_text,
                "Failed to deserialize prediction"
            );
            AppError::Prediction(format!("Failed to parse prediction: {}", e))
        })?;

        if prediction.details.was_impossible {
            tracing::debug!(
                user = %user,
                item = item,
                reason = prediction.details.reason.as_deref().unwrap_or("unknown"),
                "Model fell back to default estimate"
            );
        }

        Ok(prediction)
    }

    fn name(&self) -> &'static str {
        "prediction_server"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_predict_reads_record() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/predict"))
            .and(query_param("uid", "Xinil"))
            .and(query_param("iid", "5114"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                "Xinil",
                5114,
                null,
                9.31,
                {"was_impossible": false}
            ])))
            .mount(&server)
            .await;

        let client = PredictionServerClient::new(server.uri());
        let prediction = client.predict(&UserId::from("Xinil"), 5114).await.unwrap();

        assert_eq!(prediction.iid, 5114);
        assert_eq!(prediction.est, 9.31);
    }

    #[tokio::test]
    async fn test_predict_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/predict"))
            .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
            .mount(&server)
            .await;

        let client = PredictionServerClient::new(server.uri());
        let result = client.predict(&UserId::from("Xinil"), 1).await;

        assert!(matches!(result, Err(AppError::Prediction(_))));
    }

    #[tokio::test]
    async fn test_predict_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/predict"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "score": "high" })))
            .mount(&server)
            .await;

        let client = PredictionServerClient::new(server.uri());
        let result = client.predict(&UserId::from("Xinil"), 1).await;

        match result {
            Err(AppError::Prediction(msg)) => assert!(msg.contains("Failed to parse prediction")),
            other => panic!("expected Prediction error, got {:?}", other),
        }
    }
}

use crate::errors::ApiError;
use crate::models::{
    Contact, ContactPayload, DailyPlan, Envelope, PlanPayload, Task, TasksPayload, TimeDebt,
    TimeDebtPayload,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Outcome of a request that reached the backend and returned an envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Data(T),
    /// `success` was false or missing, or the payload was absent.
    Declined,
}

impl<T> Fetched<T> {
    fn from_envelope(success: bool, payload: Option<T>) -> Self {
        match payload {
            Some(data) if success => Fetched::Data(data),
            _ => Fetched::Declined,
        }
    }
}

pub type FetchResult<T> = Result<Fetched<T>, ApiError>;

#[async_trait]
pub trait Backend: Send + Sync {
    async fn fetch_tasks(&self) -> FetchResult<Vec<Task>>;
    async fn fetch_contact(&self, email: &str) -> FetchResult<Contact>;
    async fn fetch_daily_plan(&self) -> FetchResult<DailyPlan>;
    async fn fetch_time_debt(&self) -> FetchResult<TimeDebt>;
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    base: Url,
    client: Client,
}

impl HttpBackend {
    pub fn new(base: Url, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { base, client })
    }

    /// Appends `segments` to the base path, escaping each one as a single segment.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_envelope<P: DeserializeOwned>(&self, url: Url) -> Result<Envelope<P>, ApiError> {
        debug!(%url, "backend request");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        match serde_json::from_slice::<Envelope<P>>(&body) {
            Ok(envelope) => Ok(envelope),
            Err(_) if !status.is_success() => Err(ApiError::Status {
                status: status.as_u16(),
            }),
            Err(err) => Err(ApiError::Decode(err)),
        }
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn fetch_tasks(&self) -> FetchResult<Vec<Task>> {
        let envelope: Envelope<TasksPayload> = self.get_envelope(self.endpoint(&["tasks"])?).await?;
        Ok(Fetched::from_envelope(envelope.success, envelope.payload.tasks))
    }

    async fn fetch_contact(&self, email: &str) -> FetchResult<Contact> {
        let envelope: Envelope<ContactPayload> =
            self.get_envelope(self.endpoint(&["crm", email])?).await?;
        Ok(Fetched::from_envelope(envelope.success, envelope.payload.contact))
    }

    async fn fetch_daily_plan(&self) -> FetchResult<DailyPlan> {
        let envelope: Envelope<PlanPayload> =
            self.get_envelope(self.endpoint(&["ai", "plan-day"])?).await?;
        Ok(Fetched::from_envelope(envelope.success, envelope.payload.plan))
    }

    async fn fetch_time_debt(&self) -> FetchResult<TimeDebt> {
        let envelope: Envelope<TimeDebtPayload> =
            self.get_envelope(self.endpoint(&["ai", "time-debt"])?).await?;
        Ok(Fetched::from_envelope(envelope.success, envelope.payload.time_debt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(base: &str) -> HttpBackend {
        HttpBackend::new(Url::parse(base).unwrap(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn endpoint_escapes_email_as_one_segment() {
        let url = backend("https://api.example.com")
            .endpoint(&["crm", "a b/c@example.com"])
            .unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/crm/a%20b%2Fc@example.com");
    }

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let url = backend("http://localhost:3000/v1/")
            .endpoint(&["ai", "plan-day"])
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/v1/ai/plan-day");
    }

    #[test]
    fn falsy_or_empty_envelopes_are_declined() {
        assert_eq!(Fetched::from_envelope(true, Some(3)), Fetched::Data(3));
        assert_eq!(Fetched::<u8>::from_envelope(true, None), Fetched::Declined);
        assert_eq!(Fetched::from_envelope(false, Some(3)), Fetched::Declined);
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        let result = backend("http://127.0.0.1:1").fetch_tasks().await;
        assert!(matches!(result, Err(ApiError::Transport(_))));
    }

    #[tokio::test]
    async fn silent_backend_times_out() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut open = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                open.push(socket);
            }
        });

        let backend = HttpBackend::new(
            Url::parse(&format!("http://{addr}")).unwrap(),
            Duration::from_millis(200),
        )
        .unwrap();
        let result = backend.fetch_daily_plan().await;

        assert!(matches!(result, Err(ApiError::Transport(err)) if err.is_timeout()));
    }
}

// ABOUTME: Garmin Connect API client implementing the FitnessApi seam over HTTPS
// ABOUTME: Maps ApiCall variants onto connectapi endpoints with bearer auth, 429 backoff, and status classification
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use garmin_core::constants::providers;
use garmin_core::errors::ProviderError;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::{OnceCell, RwLock};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::api::{ApiCall, ChallengeKind, FitnessApi};
use crate::http_client::{build_http_client, HttpSettings};
use crate::tokens::{AccessToken, TokenSource};

/// Default Garmin Connect API host
pub const DEFAULT_API_BASE_URL: &str = "https://connectapi.garmin.com";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Goals fetched per request
const GOALS_PAGE_SIZE: u32 = 30;

/// `metricId` of resting heart rate in the user stats service
const RESTING_HEART_RATE_METRIC: u32 = 60;

/// Backoff policy for throttled requests
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Attempts before a 429 is surfaced as a rate limit error
    pub max_retries: u32,
    /// Delay before the first retry, doubled on each attempt
    pub initial_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 1000,
        }
    }
}

impl RetryConfig {
    /// Delay before retry `attempt`, counting from 1
    ///
    /// Saturates at `u64::MAX` milliseconds rather than overflowing.
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2_u64
            .checked_pow(attempt.saturating_sub(1))
            .unwrap_or(u64::MAX);
        Duration::from_millis(self.initial_backoff_ms.saturating_mul(factor))
    }
}

/// Connection settings for [`GarminConnectClient`]
#[derive(Debug, Clone)]
pub struct GarminClientConfig {
    /// API host, without a trailing slash
    pub api_base_url: String,
    /// Where the bearer token is loaded from
    pub token_source: TokenSource,
    /// Throttling backoff
    pub retry: RetryConfig,
    /// Timeouts and user agent for the HTTP client
    pub http: HttpSettings,
}

/// Account identifiers several endpoints embed in their path
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Public display name, used as a path segment
    pub display_name: String,
    /// Numeric profile key
    #[serde(default)]
    pub profile_id: Option<u64>,
}

/// Resolved request target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Path relative to the API host, starting with `/`
    pub path: String,
    /// Query string pairs in order
    pub query: Vec<(&'static str, String)>,
}

impl Endpoint {
    fn path(path: String) -> Self {
        Self {
            path,
            query: Vec::new(),
        }
    }

    fn with_query(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }
}

fn date(value: NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}

/// Whether resolving `call` needs the account's [`Identity`]
#[must_use]
pub const fn requires_identity(call: &ApiCall) -> bool {
    matches!(
        call,
        ApiCall::UserSummary(_)
            | ApiCall::SleepData(_)
            | ApiCall::HeartRates(_)
            | ApiCall::RestingHeartRate(_)
            | ApiCall::PersonalRecords
            | ApiCall::RacePredictions
            | ApiCall::Gear
            | ApiCall::GearDefaults
    )
}

/// Map a call onto its Garmin Connect endpoint
///
/// # Errors
///
/// Returns `ProviderError::InvalidResponse` when the call needs an identity
/// field that the social profile did not provide
pub fn build_endpoint(
    call: &ApiCall,
    identity: Option<&Identity>,
) -> Result<Endpoint, ProviderError> {
    let display_name = || {
        identity
            .map(|id| id.display_name.clone())
            .ok_or_else(|| missing_identity("display name"))
    };
    let profile_id = || {
        identity
            .and_then(|id| id.profile_id)
            .ok_or_else(|| missing_identity("profile id"))
    };

    let endpoint = match call {
        ApiCall::SearchActivities {
            start,
            limit,
            activity_type,
            start_date,
            end_date,
        } => {
            let mut endpoint =
                Endpoint::path("/activitylist-service/activities/search/activities".to_owned())
                    .with_query("start", start)
                    .with_query("limit", limit);
            if let Some(kind) = activity_type {
                endpoint = endpoint.with_query("activityType", kind);
            }
            if let Some(start) = start_date {
                endpoint = endpoint.with_query("startDate", date(*start));
            }
            if let Some(end) = end_date {
                endpoint = endpoint.with_query("endDate", date(*end));
            }
            endpoint
        }
        ApiCall::Activity(id) => Endpoint::path(format!("/activity-service/activity/{id}")),
        ApiCall::ActivitySplits(id) => {
            Endpoint::path(format!("/activity-service/activity/{id}/splits"))
        }
        ApiCall::ActivityTypedSplits(id) => {
            Endpoint::path(format!("/activity-service/activity/{id}/typedsplits"))
        }
        ApiCall::ActivitySplitSummaries(id) => {
            Endpoint::path(format!("/activity-service/activity/{id}/split_summaries"))
        }
        ApiCall::ActivityWeather(id) => {
            Endpoint::path(format!("/activity-service/activity/{id}/weather"))
        }
        ApiCall::ActivityHrZones(id) => {
            Endpoint::path(format!("/activity-service/activity/{id}/hrTimeInZones"))
        }
        ApiCall::ActivityExerciseSets(id) => {
            Endpoint::path(format!("/activity-service/activity/{id}/exerciseSets"))
        }
        ApiCall::ActivityGear(id) => {
            Endpoint::path("/gear-service/gear/filterGear".to_owned()).with_query("activityId", id)
        }
        ApiCall::UserSummary(day) => Endpoint::path(format!(
            "/usersummary-service/usersummary/daily/{}",
            display_name()?
        ))
        .with_query("calendarDate", date(*day)),
        ApiCall::SleepData(day) => Endpoint::path(format!(
            "/wellness-service/wellness/dailySleepData/{}",
            display_name()?
        ))
        .with_query("date", date(*day))
        .with_query("nonSleepBufferMinutes", 60),
        ApiCall::StressData(day) => Endpoint::path(format!(
            "/wellness-service/wellness/dailyStress/{}",
            date(*day)
        )),
        ApiCall::HeartRates(day) => Endpoint::path(format!(
            "/wellness-service/wellness/dailyHeartRate/{}",
            display_name()?
        ))
        .with_query("date", date(*day)),
        ApiCall::BodyBattery { start, end } => {
            Endpoint::path("/wellness-service/wellness/bodyBattery/reports/daily".to_owned())
                .with_query("startDate", date(*start))
                .with_query("endDate", date(*end))
        }
        ApiCall::DailySteps { start, end } => Endpoint::path(format!(
            "/usersummary-service/stats/steps/daily/{}/{}",
            date(*start),
            date(*end)
        )),
        ApiCall::HrvData(day) => Endpoint::path(format!("/hrv-service/hrv/{}", date(*day))),
        ApiCall::Respiration(day) => Endpoint::path(format!(
            "/wellness-service/wellness/daily/respiration/{}",
            date(*day)
        )),
        ApiCall::Spo2(day) => Endpoint::path(format!(
            "/wellness-service/wellness/daily/spo2/{}",
            date(*day)
        )),
        ApiCall::Hydration(day) => Endpoint::path(format!(
            "/usersummary-service/usersummary/hydration/daily/{}",
            date(*day)
        )),
        ApiCall::Floors(day) => Endpoint::path(format!(
            "/wellness-service/wellness/floorsChartData/daily/{}",
            date(*day)
        )),
        ApiCall::RestingHeartRate(day) => Endpoint::path(format!(
            "/userstats-service/wellness/daily/{}",
            display_name()?
        ))
        .with_query("fromDate", date(*day))
        .with_query("untilDate", date(*day))
        .with_query("metricId", RESTING_HEART_RATE_METRIC),
        ApiCall::BodyBatteryEvents(day) => Endpoint::path(format!(
            "/wellness-service/wellness/bodyBattery/events/{}",
            date(*day)
        )),
        ApiCall::AllDayEvents(day) => {
            Endpoint::path("/wellness-service/wellness/dailyEvents".to_owned())
                .with_query("calendarDate", date(*day))
        }
        ApiCall::BloodPressure { start, end } => Endpoint::path(format!(
            "/bloodpressure-service/bloodpressure/range/{}/{}",
            date(*start),
            date(*end)
        ))
        .with_query("includeAll", true),
        ApiCall::BodyComposition { start, end } => {
            Endpoint::path("/weight-service/weight/dateRange".to_owned())
                .with_query("startDate", date(*start))
                .with_query("endDate", date(*end))
        }
        ApiCall::MenstrualDay(day) => Endpoint::path(format!(
            "/periodichealth-service/menstrualcycle/dayview/{}",
            date(*day)
        )),
        ApiCall::MenstrualCalendar { start, end } => Endpoint::path(format!(
            "/periodichealth-service/menstrualcycle/calendar/{}/{}",
            date(*start),
            date(*end)
        )),
        ApiCall::PregnancySummary => Endpoint::path(
            "/periodichealth-service/menstrualcycle/pregnancysnapshot".to_owned(),
        ),
        ApiCall::TrainingReadiness(day) => Endpoint::path(format!(
            "/metrics-service/metrics/trainingreadiness/{}",
            date(*day)
        )),
        ApiCall::TrainingStatus(day) => Endpoint::path(format!(
            "/metrics-service/metrics/trainingstatus/aggregated/{}",
            date(*day)
        )),
        ApiCall::MaxMetrics(day) => Endpoint::path(format!(
            "/metrics-service/metrics/maxmet/daily/{0}/{0}",
            date(*day)
        )),
        ApiCall::FitnessAge(day) => Endpoint::path(format!(
            "/fitnessage-service/fitnessage/{}",
            date(*day)
        )),
        ApiCall::HillScore { start, end } => {
            Endpoint::path("/metrics-service/metrics/hillscore/stats".to_owned())
                .with_query("startDate", date(*start))
                .with_query("endDate", date(*end))
                .with_query("aggregation", "daily")
        }
        ApiCall::EnduranceScore { start, end } => {
            Endpoint::path("/metrics-service/metrics/endurancescore/stats".to_owned())
                .with_query("startDate", date(*start))
                .with_query("endDate", date(*end))
                .with_query("aggregation", "weekly")
        }
        ApiCall::ProgressSummary { start, end, metric } => {
            Endpoint::path("/fitnessstats-service/activity".to_owned())
                .with_query("aggregation", "lifetime")
                .with_query("groupByParentActivityType", true)
                .with_query("startDate", date(*start))
                .with_query("endDate", date(*end))
                .with_query("metric", metric)
        }
        ApiCall::WeighIns { start, end } => Endpoint::path(format!(
            "/weight-service/weight/range/{}/{}",
            date(*start),
            date(*end)
        ))
        .with_query("includeAll", true),
        ApiCall::Workouts { start, limit } => {
            Endpoint::path("/workout-service/workouts".to_owned())
                .with_query("start", start)
                .with_query("limit", limit)
        }
        ApiCall::Workout(id) => Endpoint::path(format!("/workout-service/workout/{id}")),
        ApiCall::Devices => {
            Endpoint::path("/device-service/deviceregistration/devices".to_owned())
        }
        ApiCall::DeviceLastUsed => {
            Endpoint::path("/device-service/deviceservice/mylastused".to_owned())
        }
        ApiCall::PrimaryTrainingDevice => {
            Endpoint::path("/web-gateway/device-info/primary-training-device".to_owned())
        }
        ApiCall::DeviceSettings(device_id) => Endpoint::path(format!(
            "/device-service/deviceservice/device-info/settings/{device_id}"
        )),
        ApiCall::DeviceSolar {
            device_id,
            start,
            end,
        } => Endpoint::path(format!(
            "/web-gateway/solar/{device_id}/{}/{}",
            date(*start),
            date(*end)
        ))
        .with_query("singleDayView", start == end),
        ApiCall::SocialProfile => {
            Endpoint::path("/userprofile-service/socialProfile".to_owned())
        }
        ApiCall::PersonalRecords => Endpoint::path(format!(
            "/personalrecord-service/personalrecord/prs/{}",
            display_name()?
        )),
        ApiCall::RacePredictions => Endpoint::path(format!(
            "/metrics-service/metrics/racepredictions/latest/{}",
            display_name()?
        )),
        ApiCall::Goals { status } => Endpoint::path("/goal-service/goal/goals".to_owned())
            .with_query("status", status)
            .with_query("start", 1)
            .with_query("limit", GOALS_PAGE_SIZE),
        ApiCall::Gear => Endpoint::path("/gear-service/gear/filterGear".to_owned())
            .with_query("userProfilePk", profile_id()?),
        ApiCall::GearStats(uuid) => Endpoint::path(format!("/gear-service/gear/stats/{uuid}")),
        ApiCall::GearDefaults => Endpoint::path(format!(
            "/gear-service/gear/user/{}/activityTypes",
            profile_id()?
        )),
        ApiCall::EarnedBadges => Endpoint::path("/badge-service/badge/earned".to_owned()),
        ApiCall::Challenges { kind, start, limit } => {
            Endpoint::path(challenge_path(*kind).to_owned())
                .with_query("start", start)
                .with_query("limit", limit)
        }
    };
    Ok(endpoint)
}

const fn challenge_path(kind: ChallengeKind) -> &'static str {
    match kind {
        ChallengeKind::Adhoc => "/adhocchallenge-service/adHocChallenge/historical",
        ChallengeKind::AvailableBadge => "/badgechallenge-service/badgeChallenge/available",
        ChallengeKind::Badge => "/badgechallenge-service/badgeChallenge/completed",
        ChallengeKind::NonCompletedBadge => "/badgechallenge-service/badgeChallenge/non-completed",
        ChallengeKind::InProgressVirtual => "/badgechallenge-service/virtualChallenge/inProgress",
    }
}

fn missing_identity(field: &str) -> ProviderError {
    ProviderError::InvalidResponse {
        provider: providers::GARMIN.to_owned(),
        message: format!("social profile did not include a {field}"),
    }
}

/// Garmin Connect client over its own pooled HTTP client
pub struct GarminConnectClient {
    config: GarminClientConfig,
    client: Client,
    token: RwLock<Option<AccessToken>>,
    identity: OnceCell<Identity>,
}

impl GarminConnectClient {
    /// Create a client; the token is loaded on first use
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Network` if the HTTP client cannot be built
    pub fn new(config: GarminClientConfig) -> Result<Self, ProviderError> {
        let client = build_http_client(&config.http)?;
        Ok(Self::with_http_client(config, client))
    }

    /// Create a client over an already configured `reqwest::Client`
    #[must_use]
    pub fn with_http_client(config: GarminClientConfig, client: Client) -> Self {
        Self {
            config,
            client,
            token: RwLock::new(None),
            identity: OnceCell::new(),
        }
    }

    /// Verify a usable token can be loaded without calling the API
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Authentication` if the token is missing or expired
    pub fn check_token(&self) -> Result<(), ProviderError> {
        self.config.token_source.load(Utc::now()).map(|_| ())
    }

    async fn access_token(&self) -> Result<String, ProviderError> {
        let now = Utc::now();
        {
            let guard = self.token.read().await;
            if let Some(token) = guard.as_ref().filter(|t| !t.is_expired_at(now)) {
                return Ok(token.secret().to_owned());
            }
        }

        let token = self.config.token_source.load(now)?;
        let secret = token.secret().to_owned();
        *self.token.write().await = Some(token);
        Ok(secret)
    }

    async fn identity(&self) -> Result<&Identity, ProviderError> {
        self.identity
            .get_or_try_init(|| async {
                let raw = self.get(&ApiCall::SocialProfile, None).await?;
                let identity: Identity =
                    serde_json::from_value(raw).map_err(|e| ProviderError::InvalidResponse {
                        provider: providers::GARMIN.to_owned(),
                        message: format!("unexpected social profile shape: {e}"),
                    })?;
                info!("Resolved Garmin display name {}", identity.display_name);
                Ok::<_, ProviderError>(identity)
            })
            .await
    }

    async fn get(&self, call: &ApiCall, identity: Option<&Identity>) -> Result<Value, ProviderError> {
        let endpoint = build_endpoint(call, identity)?;
        let url = format!(
            "{}/{}",
            self.config.api_base_url.trim_end_matches('/'),
            endpoint.path.trim_start_matches('/')
        );
        let token = self.access_token().await?;
        let method = call.method_name();

        let mut attempt = 0;
        loop {
            debug!("Garmin API request {method}: {url}");
            let response = self
                .client
                .get(&url)
                .bearer_auth(&token)
                .query(&endpoint.query)
                .send()
                .await?;

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS {
                attempt += 1;
                if attempt >= self.config.retry.max_retries {
                    warn!("Garmin rate limit on {method}: giving up after {attempt} attempts");
                    return Err(ProviderError::RateLimit {
                        provider: providers::GARMIN.to_owned(),
                        retry_after_secs: retry_after(&response),
                    });
                }
                let backoff = self.config.retry.backoff(attempt);
                warn!(
                    "Garmin rate limit on {method}: retry {attempt} after {}ms",
                    backoff.as_millis()
                );
                sleep(backoff).await;
                continue;
            }

            return decode_response(call, response).await;
        }
    }
}

fn retry_after(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}

async fn decode_response(call: &ApiCall, response: Response) -> Result<Value, ProviderError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        warn!(
            "Garmin API {} failed with status {status}",
            call.method_name()
        );
        return Err(ProviderError::from_status(
            providers::GARMIN,
            status.as_u16(),
            &call.resource_label(),
            body,
        ));
    }

    if status == StatusCode::NO_CONTENT || body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&body).map_err(|e| ProviderError::InvalidResponse {
        provider: providers::GARMIN.to_owned(),
        message: format!("{} returned invalid JSON: {e}", call.method_name()),
    })
}

#[async_trait]
impl FitnessApi for GarminConnectClient {
    async fn invoke(&self, call: ApiCall) -> Result<Value, ProviderError> {
        if requires_identity(&call) {
            let identity = self.identity().await?;
            self.get(&call, Some(identity)).await
        } else {
            self.get(&call, None).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Identity {
        Identity {
            display_name: "runner42".to_owned(),
            profile_id: Some(12345),
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_search_activities_query_order() {
        let endpoint = build_endpoint(
            &ApiCall::SearchActivities {
                start: 10,
                limit: 11,
                activity_type: Some("running".to_owned()),
                start_date: Some(day(1)),
                end_date: None,
            },
            None,
        )
        .unwrap();
        assert_eq!(
            endpoint.path,
            "/activitylist-service/activities/search/activities"
        );
        assert_eq!(
            endpoint.query,
            vec![
                ("start", "10".to_owned()),
                ("limit", "11".to_owned()),
                ("activityType", "running".to_owned()),
                ("startDate", "2024-01-01".to_owned()),
            ]
        );
    }

    #[test]
    fn test_display_name_endpoints() {
        let endpoint = build_endpoint(&ApiCall::SleepData(day(15)), Some(&identity())).unwrap();
        assert_eq!(
            endpoint.path,
            "/wellness-service/wellness/dailySleepData/runner42"
        );
        assert!(requires_identity(&ApiCall::PersonalRecords));
        assert!(build_endpoint(&ApiCall::PersonalRecords, None).is_err());
    }

    #[test]
    fn test_backoff_doubles_then_saturates() {
        let retry = RetryConfig::default();
        assert_eq!(retry.backoff(1), Duration::from_millis(1000));
        assert_eq!(retry.backoff(3), Duration::from_millis(4000));
        assert_eq!(retry.backoff(64), Duration::from_millis(u64::MAX));
        assert_eq!(retry.backoff(u32::MAX), Duration::from_millis(u64::MAX));
    }

    #[test]
    fn test_client_uses_configured_http_settings() {
        let config = GarminClientConfig {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            token_source: TokenSource::Static("token".to_owned()),
            retry: RetryConfig::default(),
            http: HttpSettings {
                timeout_secs: 3,
                connect_timeout_secs: 1,
                ..HttpSettings::default()
            },
        };
        let client = GarminConnectClient::new(config).unwrap();
        assert_eq!(client.config.http.timeout_secs, 3);
        assert!(client.check_token().is_ok());
    }

    #[test]
    fn test_gear_uses_profile_id() {
        let endpoint = build_endpoint(&ApiCall::Gear, Some(&identity())).unwrap();
        assert_eq!(endpoint.query, vec![("userProfilePk", "12345".to_owned())]);

        let defaults = build_endpoint(&ApiCall::GearDefaults, Some(&identity())).unwrap();
        assert_eq!(defaults.path, "/gear-service/gear/user/12345/activityTypes");
        assert!(requires_identity(&ApiCall::GearDefaults));
    }

    #[test]
    fn test_resting_heart_rate_uses_display_name() {
        let call = ApiCall::RestingHeartRate(day(15));
        assert!(requires_identity(&call));
        let endpoint = build_endpoint(&call, Some(&identity())).unwrap();
        assert_eq!(endpoint.path, "/userstats-service/wellness/daily/runner42");
        assert_eq!(
            endpoint.query,
            vec![
                ("fromDate", "2024-01-15".to_owned()),
                ("untilDate", "2024-01-15".to_owned()),
                ("metricId", "60".to_owned()),
            ]
        );
    }

    #[test]
    fn test_challenge_and_device_endpoints() {
        let challenges = build_endpoint(
            &ApiCall::Challenges {
                kind: ChallengeKind::NonCompletedBadge,
                start: 1,
                limit: 20,
            },
            None,
        )
        .unwrap();
        assert_eq!(
            challenges.path,
            "/badgechallenge-service/badgeChallenge/non-completed"
        );
        assert_eq!(
            challenges.query,
            vec![("start", "1".to_owned()), ("limit", "20".to_owned())]
        );

        let solar = build_endpoint(
            &ApiCall::DeviceSolar {
                device_id: 99,
                start: day(15),
                end: day(15),
            },
            None,
        )
        .unwrap();
        assert_eq!(solar.path, "/web-gateway/solar/99/2024-01-15/2024-01-15");
        assert_eq!(solar.query, vec![("singleDayView", "true".to_owned())]);
    }
}

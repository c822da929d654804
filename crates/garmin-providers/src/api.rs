// ABOUTME: The single seam between tool logic and the Garmin Connect API
// ABOUTME: FitnessApi::invoke dispatches a typed ApiCall and returns raw JSON or a ProviderError
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Fitness API Seam
//!
//! Tools never talk HTTP. They describe what they want as an [`ApiCall`] and
//! hand it to a [`FitnessApi`]. The production implementation is
//! [`crate::GarminConnectClient`]; tests substitute a scripted double.

use async_trait::async_trait;
use chrono::NaiveDate;
use garmin_core::constants::providers;
use garmin_core::errors::ProviderError;
use serde_json::Value;

/// Challenge lists Garmin serves from separate endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeKind {
    /// Ad-hoc challenges against connections
    Adhoc,
    /// Badge challenges the user can still join
    AvailableBadge,
    /// Completed badge challenges
    Badge,
    /// Joined badge challenges not yet completed
    NonCompletedBadge,
    /// Virtual challenges in progress
    InProgressVirtual,
}

impl ChallengeKind {
    /// Every kind, in output order
    pub const ALL: [Self; 5] = [
        Self::Adhoc,
        Self::AvailableBadge,
        Self::Badge,
        Self::NonCompletedBadge,
        Self::InProgressVirtual,
    ];

    /// Snake-case key used in tool arguments and output
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Adhoc => "adhoc_challenges",
            Self::AvailableBadge => "available_badge_challenges",
            Self::Badge => "badge_challenges",
            Self::NonCompletedBadge => "non_completed_badge_challenges",
            Self::InProgressVirtual => "in_progress_virtual_challenges",
        }
    }

    const fn method_name(self) -> &'static str {
        match self {
            Self::Adhoc => "get_adhoc_challenges",
            Self::AvailableBadge => "get_available_badge_challenges",
            Self::Badge => "get_badge_challenges",
            Self::NonCompletedBadge => "get_non_completed_badge_challenges",
            Self::InProgressVirtual => "get_inprogress_virtual_challenges",
        }
    }
}

/// One logical Garmin Connect operation and its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    /// Activity list search; `start` is a zero-based offset
    SearchActivities {
        /// Offset into the newest-first activity list
        start: u32,
        /// Maximum number of activities to return
        limit: u32,
        /// Garmin activity type key filter, e.g. `running`
        activity_type: Option<String>,
        /// Inclusive lower date bound
        start_date: Option<NaiveDate>,
        /// Inclusive upper date bound
        end_date: Option<NaiveDate>,
    },
    /// Activity summary
    Activity(u64),
    /// Lap splits
    ActivitySplits(u64),
    /// Typed splits (run/walk/idle segments)
    ActivityTypedSplits(u64),
    /// Split summaries
    ActivitySplitSummaries(u64),
    /// Weather recorded for an activity
    ActivityWeather(u64),
    /// Time spent in each heart rate zone
    ActivityHrZones(u64),
    /// Gear used for an activity
    ActivityGear(u64),
    /// Strength training sets
    ActivityExerciseSets(u64),
    /// Daily summary (steps, calories, stress, body battery)
    UserSummary(NaiveDate),
    /// Sleep data for the night ending on a date
    SleepData(NaiveDate),
    /// All-day stress
    StressData(NaiveDate),
    /// Resting and intraday heart rate
    HeartRates(NaiveDate),
    /// Body battery reports
    BodyBattery {
        /// First day
        start: NaiveDate,
        /// Last day
        end: NaiveDate,
    },
    /// Daily step totals
    DailySteps {
        /// First day
        start: NaiveDate,
        /// Last day
        end: NaiveDate,
    },
    /// Heart rate variability
    HrvData(NaiveDate),
    /// Breathing rate while awake and asleep
    Respiration(NaiveDate),
    /// Blood oxygen saturation
    Spo2(NaiveDate),
    /// Logged water intake against the hydration goal
    Hydration(NaiveDate),
    /// Floors climbed and descended
    Floors(NaiveDate),
    /// Resting heart rate statistic
    RestingHeartRate(NaiveDate),
    /// Events that charged or drained body battery
    BodyBatteryEvents(NaiveDate),
    /// Auto-detected events such as sleep and moves
    AllDayEvents(NaiveDate),
    /// Blood pressure readings
    BloodPressure {
        /// First day
        start: NaiveDate,
        /// Last day
        end: NaiveDate,
    },
    /// Body composition (weight, fat, water, muscle, bone)
    BodyComposition {
        /// First day
        start: NaiveDate,
        /// Last day
        end: NaiveDate,
    },
    /// Menstrual cycle day view
    MenstrualDay(NaiveDate),
    /// Menstrual cycles overlapping a range
    MenstrualCalendar {
        /// First day
        start: NaiveDate,
        /// Last day
        end: NaiveDate,
    },
    /// Pregnancy snapshot
    PregnancySummary,
    /// Training readiness
    TrainingReadiness(NaiveDate),
    /// Training status and load
    TrainingStatus(NaiveDate),
    /// VO2 max and related maximum metrics
    MaxMetrics(NaiveDate),
    /// Fitness age
    FitnessAge(NaiveDate),
    /// Hill score over a range
    HillScore {
        /// First day
        start: NaiveDate,
        /// Last day
        end: NaiveDate,
    },
    /// Endurance score over a range
    EnduranceScore {
        /// First day
        start: NaiveDate,
        /// Last day
        end: NaiveDate,
    },
    /// Aggregated progress for one metric over a range
    ProgressSummary {
        /// First day
        start: NaiveDate,
        /// Last day
        end: NaiveDate,
        /// Metric name, e.g. `distance`
        metric: String,
    },
    /// Weigh-ins over a range
    WeighIns {
        /// First day
        start: NaiveDate,
        /// Last day
        end: NaiveDate,
    },
    /// Saved workouts
    Workouts {
        /// Zero-based offset
        start: u32,
        /// Maximum number of workouts
        limit: u32,
    },
    /// One saved workout with its steps
    Workout(u64),
    /// Registered devices
    Devices,
    /// Device that synced most recently
    DeviceLastUsed,
    /// Device flagged as the primary training device
    PrimaryTrainingDevice,
    /// Settings of one device, alarms included
    DeviceSettings(u64),
    /// Solar charging input of one device
    DeviceSolar {
        /// Garmin device id
        device_id: u64,
        /// First day
        start: NaiveDate,
        /// Last day
        end: NaiveDate,
    },
    /// Social profile (display name, full name, location)
    SocialProfile,
    /// Personal records
    PersonalRecords,
    /// Latest race time predictions
    RacePredictions,
    /// Goals filtered by status (`active`, `future`, `past`)
    Goals {
        /// Goal status filter
        status: String,
    },
    /// All gear owned by the user
    Gear,
    /// Usage statistics for one piece of gear
    GearStats(String),
    /// Default gear per activity type
    GearDefaults,
    /// Badges the user has earned
    EarnedBadges,
    /// One page of a challenge list; Garmin's `start` is 1-based
    Challenges {
        /// Which list
        kind: ChallengeKind,
        /// First entry, counting from 1
        start: u32,
        /// Maximum number of entries
        limit: u32,
    },
}

impl ApiCall {
    /// Stable operation name used in logs and by test doubles
    #[must_use]
    pub const fn method_name(&self) -> &'static str {
        match self {
            Self::SearchActivities { .. } => "get_activities",
            Self::Activity(_) => "get_activity",
            Self::ActivitySplits(_) => "get_activity_splits",
            Self::ActivityTypedSplits(_) => "get_activity_typed_splits",
            Self::ActivitySplitSummaries(_) => "get_activity_split_summaries",
            Self::ActivityWeather(_) => "get_activity_weather",
            Self::ActivityHrZones(_) => "get_activity_hr_in_timezones",
            Self::ActivityGear(_) => "get_activity_gear",
            Self::ActivityExerciseSets(_) => "get_activity_exercise_sets",
            Self::UserSummary(_) => "get_user_summary",
            Self::SleepData(_) => "get_sleep_data",
            Self::StressData(_) => "get_stress_data",
            Self::HeartRates(_) => "get_heart_rates",
            Self::BodyBattery { .. } => "get_body_battery",
            Self::DailySteps { .. } => "get_daily_steps",
            Self::HrvData(_) => "get_hrv_data",
            Self::Respiration(_) => "get_respiration_data",
            Self::Spo2(_) => "get_spo2_data",
            Self::Hydration(_) => "get_hydration_data",
            Self::Floors(_) => "get_floors",
            Self::RestingHeartRate(_) => "get_rhr_day",
            Self::BodyBatteryEvents(_) => "get_body_battery_events",
            Self::AllDayEvents(_) => "get_all_day_events",
            Self::BloodPressure { .. } => "get_blood_pressure",
            Self::BodyComposition { .. } => "get_body_composition",
            Self::MenstrualDay(_) => "get_menstrual_data_for_date",
            Self::MenstrualCalendar { .. } => "get_menstrual_calendar_data",
            Self::PregnancySummary => "get_pregnancy_summary",
            Self::TrainingReadiness(_) => "get_training_readiness",
            Self::TrainingStatus(_) => "get_training_status",
            Self::MaxMetrics(_) => "get_max_metrics",
            Self::FitnessAge(_) => "get_fitness_age",
            Self::HillScore { .. } => "get_hill_score",
            Self::EnduranceScore { .. } => "get_endurance_score",
            Self::ProgressSummary { .. } => "get_progress_summary_between_dates",
            Self::WeighIns { .. } => "get_weigh_ins",
            Self::Workouts { .. } => "get_workouts",
            Self::Workout(_) => "get_workout_by_id",
            Self::Devices => "get_devices",
            Self::DeviceLastUsed => "get_device_last_used",
            Self::PrimaryTrainingDevice => "get_primary_training_device",
            Self::DeviceSettings(_) => "get_device_settings",
            Self::DeviceSolar { .. } => "get_device_solar_data",
            Self::SocialProfile => "get_social_profile",
            Self::PersonalRecords => "get_personal_record",
            Self::RacePredictions => "get_race_predictions",
            Self::Goals { .. } => "get_goals",
            Self::Gear => "get_gear",
            Self::GearStats(_) => "get_gear_stats",
            Self::GearDefaults => "get_gear_defaults",
            Self::EarnedBadges => "get_earned_badges",
            Self::Challenges { kind, .. } => kind.method_name(),
        }
    }

    /// Human-readable name of the resource, used in not-found errors
    #[must_use]
    pub fn resource_label(&self) -> String {
        match self {
            Self::Activity(id)
            | Self::ActivitySplits(id)
            | Self::ActivityTypedSplits(id)
            | Self::ActivitySplitSummaries(id)
            | Self::ActivityWeather(id)
            | Self::ActivityHrZones(id)
            | Self::ActivityGear(id)
            | Self::ActivityExerciseSets(id) => format!("Activity {id}"),
            Self::GearStats(uuid) => format!("Gear {uuid}"),
            Self::Workout(id) => format!("Workout {id}"),
            Self::DeviceSettings(device_id) | Self::DeviceSolar { device_id, .. } => {
                format!("Device {device_id}")
            }
            Self::UserSummary(date)
            | Self::SleepData(date)
            | Self::StressData(date)
            | Self::HeartRates(date)
            | Self::HrvData(date)
            | Self::TrainingReadiness(date)
            | Self::TrainingStatus(date)
            | Self::MaxMetrics(date)
            | Self::FitnessAge(date)
            | Self::Respiration(date)
            | Self::Spo2(date)
            | Self::Hydration(date)
            | Self::Floors(date)
            | Self::RestingHeartRate(date)
            | Self::BodyBatteryEvents(date)
            | Self::AllDayEvents(date)
            | Self::MenstrualDay(date) => format!("{} for {date}", self.method_name()),
            _ => self.method_name().to_owned(),
        }
    }
}

/// Remote fitness data source
///
/// Implementations own authentication, transport, and retry behavior. A
/// failure is terminal for the call that produced it.
#[async_trait]
pub trait FitnessApi: Send + Sync {
    /// Execute one API operation and return its raw JSON payload
    ///
    /// An empty upstream body is reported as `Value::Null`.
    async fn invoke(&self, call: ApiCall) -> Result<Value, ProviderError>;

    /// Provider name used in log fields and error messages
    fn provider_name(&self) -> &'static str {
        providers::GARMIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_challenge_kinds_have_distinct_methods() {
        let mut methods: Vec<&str> = ChallengeKind::ALL
            .iter()
            .map(|kind| {
                ApiCall::Challenges {
                    kind: *kind,
                    start: 1,
                    limit: 10,
                }
                .method_name()
            })
            .collect();
        methods.sort_unstable();
        methods.dedup();
        assert_eq!(methods.len(), ChallengeKind::ALL.len());
    }

    #[test]
    fn test_resource_labels_name_the_entity() {
        assert_eq!(ApiCall::Workout(7).resource_label(), "Workout 7");
        assert_eq!(ApiCall::DeviceSettings(42).resource_label(), "Device 42");
        let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(
            ApiCall::Spo2(day).resource_label(),
            "get_spo2_data for 2024-01-15"
        );
    }
}

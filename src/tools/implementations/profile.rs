// ABOUTME: Profile tools: user profile, devices with settings and solar data, and gear with stats and defaults
// ABOUTME: Thin wrappers that reshape Garmin payloads into compact snake_case objects
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashMap;

use async_trait::async_trait;
use garmin_core::envelope::ResponseEnvelope;
use garmin_core::units::{format_distance, UnitSystem};
use garmin_providers::ApiCall;
use serde_json::{json, Map, Value};

use crate::errors::AppResult;
use crate::intelligence::activity::number;
use crate::intelligence::wellness::copy_fields;
use crate::mcp::schema::{JsonSchema, PropertySchema};
use crate::tools::context::ToolExecutionContext;
use crate::tools::params::{date_or_today, optional_bool, optional_u64, unit_system};
use crate::tools::result::ToolResult;
use crate::tools::traits::{McpTool, ToolCapabilities};

use super::into_list;

const PROFILE_FIELDS: [(&str, &str); 7] = [
    ("displayName", "display_name"),
    ("fullName", "full_name"),
    ("userName", "user_name"),
    ("location", "location"),
    ("bio", "bio"),
    ("profileImageUrlMedium", "profile_image_url"),
    ("userLevel", "user_level"),
];

const DEVICE_FIELDS: [(&str, &str); 6] = [
    ("deviceId", "device_id"),
    ("productDisplayName", "name"),
    ("displayName", "display_name"),
    ("deviceTypePk", "device_type"),
    ("currentFirmwareVersion", "firmware_version"),
    ("lastSyncTime", "last_sync_time"),
];

const ALARM_FIELDS: [(&str, &str); 5] = [
    ("alarmId", "alarm_id"),
    ("alarmTime", "minutes_after_midnight"),
    ("alarmDays", "days"),
    ("alarmMode", "mode"),
    ("alarmLabel", "label"),
];

const GEAR_DEFAULT_FIELDS: [(&str, &str); 3] = [
    ("uuid", "gear_uuid"),
    ("activityTypePk", "activity_type_id"),
    ("defaultGear", "is_default"),
];

const GEAR_FIELDS: [(&str, &str); 7] = [
    ("uuid", "uuid"),
    ("displayName", "display_name"),
    ("customMakeModel", "make_model"),
    ("gearTypeName", "type"),
    ("gearStatusName", "status"),
    ("dateBegin", "in_use_since"),
    ("maximumMeters", "maximum_meters"),
];

/// Compact profile object; `null` when Garmin returned nothing
#[must_use]
pub fn summarize_profile(raw: &Value) -> Value {
    if raw.is_null() {
        return Value::Null;
    }
    Value::Object(copy_fields(raw, &PROFILE_FIELDS))
}

// ============================================================================
// GetUserProfileTool
// ============================================================================

/// Tool for the user's social profile.
pub struct GetUserProfileTool;

#[async_trait]
impl McpTool for GetUserProfileTool {
    fn name(&self) -> &'static str {
        "get_user_profile"
    }

    fn description(&self) -> &'static str {
        "Get the Garmin Connect user profile: display name, full name, location"
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::object(HashMap::new())
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::REQUIRES_PROVIDER | ToolCapabilities::READS_DATA
    }

    async fn execute(&self, _args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let raw = ctx.call(ApiCall::SocialProfile).await?;
        Ok(ctx.render(ResponseEnvelope::new(json!({"profile": summarize_profile(&raw)}))))
    }
}

// ============================================================================
// GetDevicesTool
// ============================================================================

/// Tool for devices registered to the account.
pub struct GetDevicesTool;

fn summarize_device(raw: &Value) -> Value {
    if raw.is_null() {
        return Value::Null;
    }
    Value::Object(copy_fields(raw, &DEVICE_FIELDS))
}

/// Alarms kept in a device's settings payload
fn device_alarms(settings: &Value) -> Value {
    settings
        .get("alarms")
        .and_then(Value::as_array)
        .map_or(Value::Null, |alarms| {
            Value::Array(
                alarms
                    .iter()
                    .map(|alarm| Value::Object(copy_fields(alarm, &ALARM_FIELDS)))
                    .collect(),
            )
        })
}

/// Solar input per day from the solar endpoint
///
/// Garmin wraps the per-device payload in a `deviceSolarInput` list.
fn summarize_solar(raw: &Value) -> Value {
    let device = raw
        .get("deviceSolarInput")
        .and_then(Value::as_array)
        .and_then(|inputs| inputs.first())
        .unwrap_or(raw);
    let Some(days) = device.get("solarDailyDataDTOs").and_then(Value::as_array) else {
        return Value::Null;
    };
    let entries: Vec<Value> = days
        .iter()
        .map(|day| {
            json!({
                "date": day.get("calendarDate"),
                "readings": day
                    .get("solarInputReadings")
                    .and_then(Value::as_array)
                    .map_or(0, Vec::len),
            })
        })
        .collect();
    json!({"days": entries})
}

#[async_trait]
impl McpTool for GetDevicesTool {
    fn name(&self) -> &'static str {
        "get_devices"
    }

    fn description(&self) -> &'static str {
        "List Garmin devices registered to the account with the last used and primary training \
         device. With device_id, optionally add its settings, alarms, and solar charging data"
    }

    fn input_schema(&self) -> JsonSchema {
        let mut properties = HashMap::new();
        properties.insert(
            "device_id".to_owned(),
            PropertySchema::new("integer", "Device for the settings, alarms, and solar sections"),
        );
        properties.insert(
            "include_last_used".to_owned(),
            PropertySchema::new("boolean", "Include the most recently synced device. Default: true"),
        );
        properties.insert(
            "include_primary".to_owned(),
            PropertySchema::new("boolean", "Include the primary training device. Default: true"),
        );
        properties.insert(
            "include_settings".to_owned(),
            PropertySchema::new("boolean", "Include device settings (needs device_id). Default: false"),
        );
        properties.insert(
            "include_alarms".to_owned(),
            PropertySchema::new("boolean", "Include device alarms (needs device_id). Default: false"),
        );
        properties.insert(
            "include_solar".to_owned(),
            PropertySchema::new("boolean", "Include solar charging data (needs device_id). Default: false"),
        );
        properties.insert(
            "date".to_owned(),
            PropertySchema::new("string", "Day for solar data: 'today', 'yesterday' or YYYY-MM-DD"),
        );
        JsonSchema::object(properties)
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::REQUIRES_PROVIDER | ToolCapabilities::READS_DATA
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let device_id = optional_u64(&args, "device_id")?;
        let solar_date = date_or_today(&args, ctx.today())?;

        let devices: Vec<Value> = into_list(ctx.call(ApiCall::Devices).await?)
            .iter()
            .map(summarize_device)
            .collect();
        let count = devices.len();
        let mut data = Map::new();
        data.insert("devices".to_owned(), Value::Array(devices));
        data.insert("count".to_owned(), json!(count));
        let mut insights = vec![format!("{count} registered devices")];

        if optional_bool(&args, "include_last_used", true) {
            let raw = ctx
                .call_optional(self.name(), "last_used", ApiCall::DeviceLastUsed)
                .await;
            data.insert("last_used".to_owned(), raw);
        }
        if optional_bool(&args, "include_primary", true) {
            let raw = ctx
                .call_optional(self.name(), "primary", ApiCall::PrimaryTrainingDevice)
                .await;
            if !raw.is_null() {
                insights.push("Primary training device identified".to_owned());
            }
            data.insert("primary_device".to_owned(), raw);
        }

        if let Some(device_id) = device_id {
            let want_settings = optional_bool(&args, "include_settings", false);
            let want_alarms = optional_bool(&args, "include_alarms", false);
            if want_settings || want_alarms {
                let settings = ctx
                    .call_optional(self.name(), "settings", ApiCall::DeviceSettings(device_id))
                    .await;
                if want_alarms {
                    data.insert("alarms".to_owned(), device_alarms(&settings));
                }
                if want_settings {
                    data.insert("settings".to_owned(), settings);
                }
            }
            if optional_bool(&args, "include_solar", false) {
                let call = ApiCall::DeviceSolar {
                    device_id,
                    start: solar_date,
                    end: solar_date,
                };
                let solar = summarize_solar(&ctx.call_optional(self.name(), "solar", call).await);
                if !solar.is_null() {
                    insights.push("Solar charging data available".to_owned());
                }
                data.insert("solar".to_owned(), solar);
            }
        }

        let mut envelope = ResponseEnvelope::new(Value::Object(data)).with_insights(insights);
        if let Some(device_id) = device_id {
            envelope = envelope.with_metadata("device_id", device_id);
        }
        Ok(ctx.render(envelope))
    }
}

// ============================================================================
// GetGearTool
// ============================================================================

/// Tool for gear (shoes, bikes) with optional usage statistics.
pub struct GetGearTool;

fn gear_stats(stats: &Value, unit: UnitSystem) -> Value {
    if stats.is_null() {
        return Value::Null;
    }
    let distance = number(stats, "totalDistance");
    json!({
        "total_activities": stats.get("totalActivities"),
        "total_distance_meters": distance,
        "total_distance": format_distance(distance, unit),
    })
}

#[async_trait]
impl McpTool for GetGearTool {
    fn name(&self) -> &'static str {
        "get_gear"
    }

    fn description(&self) -> &'static str {
        "List gear such as shoes and bikes, optionally with distance and activity totals and the \
         default gear per activity type"
    }

    fn input_schema(&self) -> JsonSchema {
        let mut properties = HashMap::new();
        properties.insert(
            "include_stats".to_owned(),
            PropertySchema::new("boolean", "Fetch usage statistics per item. Default: false"),
        );
        properties.insert(
            "include_defaults".to_owned(),
            PropertySchema::new("boolean", "Include default gear per activity type. Default: false"),
        );
        properties.insert(
            "unit".to_owned(),
            PropertySchema::one_of("Unit system", &["metric", "imperial"]),
        );
        JsonSchema::object(properties)
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::REQUIRES_PROVIDER | ToolCapabilities::READS_DATA
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let unit = unit_system(&args, &ctx.config)?;
        let include_stats = optional_bool(&args, "include_stats", false);
        let include_defaults = optional_bool(&args, "include_defaults", false);

        let mut gear = Vec::new();
        for item in into_list(ctx.call(ApiCall::Gear).await?) {
            let mut entry = copy_fields(&item, &GEAR_FIELDS);
            if include_stats {
                if let Some(uuid) = item.get("uuid").and_then(Value::as_str) {
                    let stats = ctx
                        .call_optional(self.name(), "gear_stats", ApiCall::GearStats(uuid.to_owned()))
                        .await;
                    entry.insert("stats".to_owned(), gear_stats(&stats, unit));
                }
            }
            gear.push(Value::Object(entry));
        }

        let active = gear
            .iter()
            .filter(|g| g.get("status").and_then(Value::as_str) == Some("active"))
            .count();
        let count = gear.len();
        let mut data = Map::new();
        data.insert("gear".to_owned(), Value::Array(gear));
        data.insert("count".to_owned(), json!(count));
        if include_defaults {
            let raw = ctx
                .call_optional(self.name(), "gear_defaults", ApiCall::GearDefaults)
                .await;
            let defaults = if raw.is_null() {
                Value::Null
            } else {
                into_list(raw)
                    .iter()
                    .filter(|entry| entry.get("defaultGear").and_then(Value::as_bool) != Some(false))
                    .map(|entry| Value::Object(copy_fields(entry, &GEAR_DEFAULT_FIELDS)))
                    .collect()
            };
            data.insert("defaults".to_owned(), defaults);
        }

        Ok(ctx.render(
            ResponseEnvelope::new(Value::Object(data))
                .with_insights(vec![format!("{count} gear items, {active} active")])
                .with_metadata("include_stats", include_stats)
                .with_metadata("include_defaults", include_defaults)
                .with_metadata("unit", unit.as_str()),
        ))
    }
}

// ============================================================================
// Tool factory
// ============================================================================

/// Create all profile tools for registration
#[must_use]
pub fn create_profile_tools() -> Vec<Box<dyn McpTool>> {
    vec![
        Box::new(GetUserProfileTool),
        Box::new(GetDevicesTool),
        Box::new(GetGearTool),
    ]
}

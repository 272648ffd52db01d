//! Calendar tools backed by the main server.
//!
//! Structured results are JSON envelopes (`{"tool", "data"}` or
//! `{"tool", "error"}`) that the client renders directly. Create, update and
//! delete failures are plain sentences so the agent can relay them.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};
use kseb_core::{
    BackendPort, ChatContext, EventChanges, NewEvent, ScheduleScope, Tool, ToolDefinition,
    ToolError, find_available_slots, parse_datetime,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::output;

/// Colour the client uses to highlight a freshly created event.
const CREATED_THEME_COLOR: &str = "#22c55e";

const DATE_FORMAT: &str = "%Y-%m-%d";

const GROUP_ID_DESCRIPTION: &str = "schedule_type이 'group'일 경우의 그룹 ID.";

const EVENT_ID_HINT: &str =
    "이 ID를 모를 경우, 먼저 일정을 조회하여 ID를 알아내야 한다고 사용자에게 안내해야 합니다.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScopeError {
    MissingGroup,
    UnknownType,
}

/// Resolve `schedule_type` plus an optional group id into a scope.
fn parse_scope(schedule_type: &str, group_id: Option<i64>) -> Result<ScheduleScope, ScopeError> {
    match schedule_type.trim() {
        "personal" => Ok(ScheduleScope::Personal),
        "group" => match group_id {
            Some(id) if id != 0 => Ok(ScheduleScope::Group(id)),
            _ => Err(ScopeError::MissingGroup),
        },
        _ => Err(ScopeError::UnknownType),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

// ============================================================================
// get_schedule
// ============================================================================

#[derive(Debug, Deserialize)]
struct GetScheduleArgs {
    schedule_type: String,
    #[serde(default)]
    group_id: Option<i64>,
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    end_date: Option<String>,
}

/// Whole-day range from `start` to `end` (defaults to `start`).
fn day_range(start: &str, end: Option<&str>) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let first = NaiveDate::parse_from_str(start.trim(), DATE_FORMAT).ok()?;
    let last = match end {
        Some(end) => NaiveDate::parse_from_str(end.trim(), DATE_FORMAT).ok()?,
        None => first,
    };
    let end_of_day = NaiveTime::from_hms_opt(23, 59, 59)?;
    Some((first.and_time(NaiveTime::MIN), last.and_time(end_of_day)))
}

/// Lists personal or group events, optionally for a date range.
pub struct GetScheduleTool {
    backend: Arc<dyn BackendPort>,
}

impl GetScheduleTool {
    pub const NAME: &'static str = "get_schedule";

    pub fn new(backend: Arc<dyn BackendPort>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Tool for GetScheduleTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            Self::NAME,
            "개인 또는 그룹 일정을 기간으로 필터링하여 가져옴.",
            json!({
                "type": "object",
                "properties": {
                    "schedule_type": {
                        "type": "string",
                        "enum": ["personal", "group"],
                        "description": "가져올 일정의 종류. 'personal' 또는 'group'이어야 합니다."
                    },
                    "group_id": { "type": "integer", "description": GROUP_ID_DESCRIPTION },
                    "start_date": {
                        "type": "string",
                        "description": "조회 시작 날짜 (YYYY-MM-DD 형식). 지정하지 않으면 모든 일정을 가져옵니다."
                    },
                    "end_date": {
                        "type": "string",
                        "description": "조회 종료 날짜 (YYYY-MM-DD 형식). start_date와 함께 사용되어야 합니다."
                    }
                },
                "required": ["schedule_type"]
            }),
        )
    }

    async fn call(&self, args: Value, ctx: &ChatContext) -> Result<String, ToolError> {
        let args: GetScheduleArgs = ToolError::parse_args(args)?;

        let range = match non_empty(args.start_date) {
            Some(start) => {
                let end = non_empty(args.end_date);
                match day_range(&start, end.as_deref()) {
                    Some(range) => Some(range),
                    None => {
                        return Ok(output::error(
                            Self::NAME,
                            "날짜 형식이 잘못되었습니다. 'YYYY-MM-DD' 형식을 사용해야 합니다.",
                        ));
                    }
                }
            }
            None => None,
        };

        let scope = match parse_scope(&args.schedule_type, args.group_id) {
            Ok(scope) => scope,
            Err(ScopeError::MissingGroup) => {
                return Ok(output::error(
                    Self::NAME,
                    "그룹 일정을 조회하려면 group_id가 필요합니다.",
                ));
            }
            Err(ScopeError::UnknownType) => {
                return Ok(output::error(
                    Self::NAME,
                    "schedule_type은 'personal' 또는 'group'이어야 합니다.",
                ));
            }
        };

        let data = match self.backend.list_events(scope, range, &ctx.jwt_token).await {
            Ok(events) => events,
            Err(e) => {
                tracing::warn!(error = %e, "Event listing failed");
                json!({ "error": e.to_string() })
            }
        };
        Ok(output::data(Self::NAME, data))
    }
}

// ============================================================================
// create_schedule
// ============================================================================

fn default_schedule_type() -> String {
    "personal".to_string()
}

#[derive(Debug, Deserialize)]
struct CreateScheduleArgs {
    title: String,
    start_time: String,
    end_time: String,
    #[serde(default = "default_schedule_type")]
    schedule_type: String,
    #[serde(default)]
    group_id: Option<i64>,
}

/// Creates a personal or group event.
pub struct CreateScheduleTool {
    backend: Arc<dyn BackendPort>,
}

impl CreateScheduleTool {
    pub const NAME: &'static str = "create_schedule";

    pub fn new(backend: Arc<dyn BackendPort>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Tool for CreateScheduleTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            Self::NAME,
            "새로운 개인 또는 그룹 일정을 생성함.",
            json!({
                "type": "object",
                "properties": {
                    "title": { "type": "string", "description": "생성할 일정의 제목." },
                    "start_time": {
                        "type": "string",
                        "description": "일정 시작 시간 (ISO 8601 형식, 예: '2025-08-02T15:00:00')."
                    },
                    "end_time": {
                        "type": "string",
                        "description": "일정 종료 시간 (ISO 8601 형식, 예: '2025-08-02T16:00:00')."
                    },
                    "schedule_type": {
                        "type": "string",
                        "enum": ["personal", "group"],
                        "default": "personal",
                        "description": "생성할 일정의 종류. 'personal' 또는 'group'."
                    },
                    "group_id": { "type": "integer", "description": GROUP_ID_DESCRIPTION }
                },
                "required": ["title", "start_time", "end_time"]
            }),
        )
    }

    async fn call(&self, args: Value, ctx: &ChatContext) -> Result<String, ToolError> {
        let args: CreateScheduleArgs = ToolError::parse_args(args)?;

        let scope = match parse_scope(&args.schedule_type, args.group_id) {
            Ok(scope) => scope,
            Err(ScopeError::MissingGroup) => {
                return Ok("오류: 그룹 일정을 생성하려면 group_id가 필요합니다.".to_string());
            }
            Err(ScopeError::UnknownType) => {
                return Ok("오류: schedule_type은 'personal' 또는 'group'이어야 합니다.".to_string());
            }
        };

        let event = NewEvent::timed(&args.title, &args.start_time, &args.end_time);
        let created = match self.backend.create_event(scope, &event, &ctx.jwt_token).await {
            Ok(created) => created,
            Err(e) => return Ok(format!("일정 생성에 실패했습니다: {e}")),
        };

        let event_id = created
            .get("data")
            .and_then(|d| d.get("eventId"))
            .cloned()
            .unwrap_or(Value::Null);

        tracing::info!(scope = ?scope, event_id = %event_id, "Event created");
        Ok(output::data(
            Self::NAME,
            json!({
                "message": format!("'{}' 일정이 성공적으로 생성되었습니다.", args.title),
                "created_event_details": {
                    "eventId": event_id,
                    "title": args.title,
                    "start": args.start_time,
                    "end": args.end_time,
                    "ownerType": scope.owner_type(),
                    "ownerId": scope.group_id(),
                    "themeColor": CREATED_THEME_COLOR,
                }
            }),
        ))
    }
}

// ============================================================================
// update_schedule
// ============================================================================

#[derive(Debug, Deserialize)]
struct UpdateScheduleArgs {
    event_id: i64,
    #[serde(default)]
    current_title: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    start_time: Option<String>,
    #[serde(default)]
    end_time: Option<String>,
    #[serde(default)]
    group_id: Option<i64>,
}

/// Changes the title or times of an existing event.
pub struct UpdateScheduleTool {
    backend: Arc<dyn BackendPort>,
}

impl UpdateScheduleTool {
    pub const NAME: &'static str = "update_schedule";

    pub fn new(backend: Arc<dyn BackendPort>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Tool for UpdateScheduleTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            Self::NAME,
            "ID로 기존 일정의 제목, 시작 시간 또는 종료 시간을 수정함.",
            json!({
                "type": "object",
                "properties": {
                    "event_id": {
                        "type": "integer",
                        "description": format!("수정할 일정의 ID. {EVENT_ID_HINT}")
                    },
                    "current_title": {
                        "type": "string",
                        "description": "수정할 일정의 현재 제목. AI가 알고 있는 경우, 응답에 활용하기 위해 전달합니다."
                    },
                    "title": { "type": "string", "description": "새로운 일정 제목." },
                    "start_time": { "type": "string", "description": "새로운 시작 시간 (ISO 8601 형식)." },
                    "end_time": { "type": "string", "description": "새로운 종료 시간 (ISO 8601 형식)." },
                    "group_id": {
                        "type": "integer",
                        "description": "수정할 일정이 그룹 일정일 경우의 그룹 ID."
                    }
                },
                "required": ["event_id"]
            }),
        )
    }

    async fn call(&self, args: Value, ctx: &ChatContext) -> Result<String, ToolError> {
        let args: UpdateScheduleArgs = ToolError::parse_args(args)?;

        let changes = EventChanges {
            title: non_empty(args.title),
            start_datetime: non_empty(args.start_time),
            end_datetime: non_empty(args.end_time),
        };
        if changes.is_empty() {
            return Ok("오류: 수정할 정보가 없습니다.".to_string());
        }

        let scope = ScheduleScope::from_group(args.group_id);
        if let Err(e) = self
            .backend
            .update_event(scope, args.event_id, &changes, &ctx.jwt_token)
            .await
        {
            return Ok(format!("일정 수정에 실패했습니다: {e}"));
        }

        let display_title = changes
            .title
            .clone()
            .or_else(|| non_empty(args.current_title))
            .unwrap_or_else(|| format!("일정(ID: {})", args.event_id));

        Ok(output::data(
            Self::NAME,
            json!({
                "message": format!("'{display_title}' 일정이 성공적으로 수정되었습니다."),
                "updated_event_details": {
                    "eventId": args.event_id,
                    "updated_fields": changes,
                }
            }),
        ))
    }
}

// ============================================================================
// delete_schedule
// ============================================================================

#[derive(Debug, Deserialize)]
struct DeleteScheduleArgs {
    event_id: i64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    group_id: Option<i64>,
}

/// Deletes an event by id.
pub struct DeleteScheduleTool {
    backend: Arc<dyn BackendPort>,
}

impl DeleteScheduleTool {
    pub const NAME: &'static str = "delete_schedule";

    pub fn new(backend: Arc<dyn BackendPort>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Tool for DeleteScheduleTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            Self::NAME,
            "ID를 사용하여 기존 일정을 삭제함.",
            json!({
                "type": "object",
                "properties": {
                    "event_id": {
                        "type": "integer",
                        "description": format!("삭제할 일정의 ID. {EVENT_ID_HINT}")
                    },
                    "title": {
                        "type": "string",
                        "description": "삭제할 일정의 제목. AI가 알고 있는 경우, 응답에 활용하기 위해 전달합니다."
                    },
                    "group_id": {
                        "type": "integer",
                        "description": "삭제할 일정이 그룹 일정일 경우의 그룹 ID."
                    }
                },
                "required": ["event_id"]
            }),
        )
    }

    async fn call(&self, args: Value, ctx: &ChatContext) -> Result<String, ToolError> {
        let args: DeleteScheduleArgs = ToolError::parse_args(args)?;

        let scope = ScheduleScope::from_group(args.group_id);
        if let Err(e) = self
            .backend
            .delete_event(scope, args.event_id, &ctx.jwt_token)
            .await
        {
            return Ok(format!("일정 삭제에 실패했습니다: {e}"));
        }

        let title = non_empty(args.title).unwrap_or_else(|| format!("ID: {}", args.event_id));
        Ok(output::data(
            Self::NAME,
            json!({
                "message": format!("'{title}' 일정이 성공적으로 삭제되었습니다."),
                "deleted_event_details": {
                    "eventId": args.event_id,
                    "title": title,
                }
            }),
        ))
    }
}

// ============================================================================
// recommend_meeting_time
// ============================================================================

const fn default_duration() -> i64 {
    60
}

const fn default_search_days() -> i64 {
    7
}

/// Longest search window, in days.
const MAX_SEARCH_DAYS: i64 = 31;

/// Longest meeting, in minutes.
const MAX_MEETING_MINUTES: i64 = 24 * 60;

#[derive(Debug, Deserialize)]
struct RecommendArgs {
    group_id: i64,
    #[serde(default = "default_duration")]
    duration_minutes: i64,
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default = "default_search_days")]
    search_days: i64,
}

/// Finds slots every member of a group can attend.
pub struct RecommendMeetingTimeTool {
    backend: Arc<dyn BackendPort>,
}

impl RecommendMeetingTimeTool {
    pub const NAME: &'static str = "recommend_meeting_time";

    pub fn new(backend: Arc<dyn BackendPort>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Tool for RecommendMeetingTimeTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            Self::NAME,
            "그룹 멤버들의 일정을 분석하여 회의 시간을 추천. '다음 주'와 같은 시간 표현은 start_date로 변환하여 사용.",
            json!({
                "type": "object",
                "properties": {
                    "group_id": { "type": "integer", "description": "회의 시간을 추천받을 그룹의 ID." },
                    "duration_minutes": {
                        "type": "integer",
                        "default": 60,
                        "minimum": 1,
                        "maximum": MAX_MEETING_MINUTES,
                        "description": "원하는 회의 시간(분 단위)."
                    },
                    "start_date": {
                        "type": "string",
                        "description": "검색을 시작할 날짜 (YYYY-MM-DD 형식). 지정하지 않으면 오늘부터 검색합니다. '다음 주' 같은 요청이 있으면, 오늘 날짜를 기준으로 다음 주 월요일 날짜를 계산하여 이 필드에 넣어야 합니다."
                    },
                    "search_days": {
                        "type": "integer",
                        "default": 7,
                        "minimum": 1,
                        "maximum": MAX_SEARCH_DAYS,
                        "description": "지정된 start_date로부터 며칠까지 가능한 시간을 검색할지 여부."
                    }
                },
                "required": ["group_id"]
            }),
        )
    }

    async fn call(&self, args: Value, ctx: &ChatContext) -> Result<String, ToolError> {
        let args: RecommendArgs = ToolError::parse_args(args)?;

        if !(1..=MAX_SEARCH_DAYS).contains(&args.search_days) {
            return Ok(output::error(
                Self::NAME,
                format!("search_days는 1에서 {MAX_SEARCH_DAYS} 사이여야 합니다."),
            ));
        }
        if !(1..=MAX_MEETING_MINUTES).contains(&args.duration_minutes) {
            return Ok(output::error(
                Self::NAME,
                format!("duration_minutes는 1에서 {MAX_MEETING_MINUTES} 사이여야 합니다."),
            ));
        }

        let start = match non_empty(args.start_date) {
            Some(raw) => match parse_datetime(&raw) {
                Some(start) => start,
                None => {
                    return Ok(output::error(
                        Self::NAME,
                        "잘못된 날짜 형식입니다. YYYY-MM-DD 형식을 사용해주세요.",
                    ));
                }
            },
            None => Local::now().naive_local(),
        };

        let search_start = start.date().and_time(NaiveTime::MIN);
        let Some(search_end) = Duration::try_days(args.search_days)
            .and_then(|days| search_start.checked_add_signed(days))
        else {
            return Ok(output::error(Self::NAME, "검색 기간이 너무 깁니다."));
        };

        let bundle = match self
            .backend
            .group_schedules(args.group_id, search_start, search_end, &ctx.jwt_token)
            .await
        {
            Ok(bundle) => bundle,
            Err(e) => return Ok(output::error(Self::NAME, e.to_string())),
        };

        let slots = find_available_slots(&bundle, search_start, search_end, args.duration_minutes);
        tracing::info!(
            group_id = args.group_id,
            found = slots.len(),
            "Meeting slots computed"
        );

        if slots.is_empty() {
            return Ok(output::data(
                Self::NAME,
                json!({ "message": "모든 멤버가 참여 가능한 시간을 찾지 못했습니다." }),
            ));
        }
        Ok(output::data(
            Self::NAME,
            json!({ "recommendations": slots, "group_id": args.group_id }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scope() {
        assert_eq!(parse_scope("personal", Some(3)), Ok(ScheduleScope::Personal));
        assert_eq!(parse_scope("group", Some(3)), Ok(ScheduleScope::Group(3)));
        assert_eq!(parse_scope("group", None), Err(ScopeError::MissingGroup));
        assert_eq!(parse_scope("group", Some(0)), Err(ScopeError::MissingGroup));
        assert_eq!(parse_scope("team", Some(3)), Err(ScopeError::UnknownType));
    }

    #[test]
    fn test_day_range() {
        let (start, end) = day_range("2025-08-04", None).unwrap();
        assert_eq!(start.to_string(), "2025-08-04 00:00:00");
        assert_eq!(end.to_string(), "2025-08-04 23:59:59");

        let (_, end) = day_range("2025-08-04", Some("2025-08-10")).unwrap();
        assert_eq!(end.to_string(), "2025-08-10 23:59:59");

        assert!(day_range("08/04/2025", None).is_none());
        assert!(day_range("2025-08-04", Some("next week")).is_none());
    }
}

//! Wire encoding for the message endpoints.

use serde::Serialize;
use time::macros::format_description;
use time::{Date, PrimitiveDateTime};

use crate::domain::{
    AddSchedule, ApiRequest, CallClass, InboxFilter, MessageListFilter, RepeatInterval,
    SendToContact, SendToGroups, ValidationError,
};

pub const SEND_TO_CONTACT_PATH: &str = "messages/send_to_contact";
pub const SEND_TO_GROUPS_PATH: &str = "messages/send";
pub const LIST_PATH: &str = "messages";
pub const INBOX_PATH: &str = "messages/inbox";
pub const SCHEDULED_PATH: &str = "messages/scheduled";

#[derive(Debug, Serialize)]
struct SendToContactBody<'a> {
    msisdn: &'a str,
    message: &'a str,
    id: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct SendToGroupsBody<'a> {
    groups: Vec<&'a str>,
    message: &'a str,
    id: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct AddScheduleBody<'a> {
    start_date: String,
    end_date: String,
    name: &'a str,
    message: &'a str,
    time: &'a str,
    frequency: RepeatInterval,
    groups: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
struct RemoveScheduleBody<'a> {
    message_id: &'a str,
}

pub fn encode_send_to_contact(request: &SendToContact) -> Result<ApiRequest, ValidationError> {
    let body = SendToContactBody {
        msisdn: request.msisdn().as_str(),
        message: request.message().as_str(),
        id: request.id().map(|id| id.as_str()),
    };
    ApiRequest::post(SEND_TO_CONTACT_PATH)?.json(&body)
}

pub fn encode_send_to_groups(request: &SendToGroups) -> Result<ApiRequest, ValidationError> {
    let body = SendToGroupsBody {
        groups: request.groups().iter().map(|group| group.as_str()).collect(),
        message: request.message().as_str(),
        id: request.id().map(|id| id.as_str()),
    };
    ApiRequest::post(SEND_TO_GROUPS_PATH)?.json(&body)
}

pub fn encode_message_list(filter: &MessageListFilter) -> Result<ApiRequest, ValidationError> {
    let mut request = ApiRequest::get(LIST_PATH)?
        .append_query_to_url(true)
        .call_class(CallClass::Query);

    if let Some(start_date) = filter.start_date {
        request = request.param("start_date", format_date_time(start_date));
    }
    if let Some(end_date) = filter.end_date {
        request = request.param("end_date", format_date_time(end_date));
    }
    if let Some(start) = filter.start {
        request = request.param("start", start.to_string());
    }
    if let Some(limit) = filter.limit {
        request = request.param("limit", limit.to_string());
    }
    if let Some(msisdn) = filter.msisdn.as_ref() {
        request = request.param("msisdn", msisdn.as_str());
    }
    if let Some(short_name) = filter.short_name.as_ref() {
        request = request.param("short_name", short_name.as_str());
    }
    if let Some(username) = filter.username.as_deref().filter(|name| !name.trim().is_empty()) {
        request = request.param("user", username);
    }

    Ok(request
        .param("direction", filter.direction.as_str())
        .param("include_recipients", filter.include_recipients.to_string()))
}

pub fn encode_inbox(filter: &InboxFilter) -> Result<ApiRequest, ValidationError> {
    let mut request = ApiRequest::get(INBOX_PATH)?
        .append_query_to_url(true)
        .call_class(CallClass::Query);

    if let Some(start_date) = filter.start_date {
        request = request.param("start_date", format_date_time(start_date));
    }
    if let Some(end_date) = filter.end_date {
        request = request.param("end_date", format_date_time(end_date));
    }
    if let Some(start) = filter.start {
        request = request.param("start", start.to_string());
    }
    if let Some(limit) = filter.limit {
        request = request.param("limit", limit.to_string());
    }
    if let Some(msisdn) = filter.msisdn.as_ref() {
        request = request.param("msisdn", msisdn.as_str());
    }
    if let Some(status) = filter.status {
        request = request.param("status", status.to_string());
    }

    Ok(request)
}

pub fn encode_scheduled() -> Result<ApiRequest, ValidationError> {
    ApiRequest::get(SCHEDULED_PATH)
}

pub fn encode_add_schedule(request: &AddSchedule) -> Result<ApiRequest, ValidationError> {
    request.validate()?;
    let body = AddScheduleBody {
        start_date: format_date(request.start_date),
        end_date: format_date(request.end_date),
        name: request.name.trim(),
        message: request.message.as_str(),
        time: request.time.trim(),
        frequency: request.frequency,
        groups: request.groups.iter().map(|group| group.as_str()).collect(),
    };
    ApiRequest::post(SCHEDULED_PATH)?.json(&body)
}

pub fn encode_remove_schedule(message_id: &str) -> Result<ApiRequest, ValidationError> {
    let message_id = message_id.trim();
    if message_id.is_empty() {
        return Err(ValidationError::Empty {
            field: "message_id",
        });
    }
    ApiRequest::delete(SCHEDULED_PATH)?.json(&RemoveScheduleBody { message_id })
}

fn format_date_time(value: PrimitiveDateTime) -> String {
    value
        .format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ))
        .unwrap_or_default()
}

fn format_date(value: Date) -> String {
    value
        .format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use reqwest::Method;
    use serde_json::json;
    use time::macros::{date, datetime};

    use crate::domain::{ClientMessageId, GroupShortName, MessageDirection, MessageText, Msisdn};

    use super::*;

    fn query_of(request: &ApiRequest) -> Vec<(&str, &str)> {
        request
            .query()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    #[test]
    fn send_to_contact_posts_body_without_query() {
        let request = SendToContact::new(
            Msisdn::new("50212345678").unwrap(),
            MessageText::new("hola").unwrap(),
        );
        let api = encode_send_to_contact(&request).unwrap();

        assert_eq!(api.method(), &Method::POST);
        assert_eq!(api.path(), SEND_TO_CONTACT_PATH);
        assert!(api.query().is_empty());
        assert!(!api.appends_query());
        assert_eq!(
            api.body(),
            Some(&json!({ "msisdn": "50212345678", "message": "hola", "id": null }))
        );
    }

    #[test]
    fn send_to_groups_includes_optional_id() {
        let request = SendToGroups::new(
            vec![
                GroupShortName::new("vip").unwrap(),
                GroupShortName::new("staff").unwrap(),
            ],
            MessageText::new("hola").unwrap(),
        )
        .unwrap()
        .with_id(ClientMessageId::new("campaign-1").unwrap());
        let api = encode_send_to_groups(&request).unwrap();

        assert_eq!(api.path(), SEND_TO_GROUPS_PATH);
        assert_eq!(
            api.body(),
            Some(&json!({ "groups": ["vip", "staff"], "message": "hola", "id": "campaign-1" }))
        );
    }

    #[test]
    fn message_list_always_sends_direction_and_recipients_flag() {
        let api = encode_message_list(&MessageListFilter::default()).unwrap();

        assert_eq!(api.method(), &Method::GET);
        assert!(api.appends_query());
        assert_eq!(api.class(), CallClass::Query);
        assert_eq!(
            query_of(&api),
            vec![("direction", "MT"), ("include_recipients", "false")]
        );
    }

    #[test]
    fn message_list_formats_dates_and_optional_filters() {
        let filter = MessageListFilter {
            start_date: Some(datetime!(2026-10-01 00:00:00)),
            end_date: Some(datetime!(2026-10-19 23:59:59)),
            start: Some(0),
            limit: Some(50),
            msisdn: Some(Msisdn::new("50212345678").unwrap()),
            short_name: None,
            include_recipients: true,
            direction: MessageDirection::Mo,
            username: Some("  ".to_owned()),
        };
        let api = encode_message_list(&filter).unwrap();

        assert_eq!(
            query_of(&api),
            vec![
                ("direction", "MO"),
                ("end_date", "2026-10-19 23:59:59"),
                ("include_recipients", "true"),
                ("limit", "50"),
                ("msisdn", "50212345678"),
                ("start", "0"),
                ("start_date", "2026-10-01 00:00:00"),
            ]
        );
    }

    #[test]
    fn inbox_only_sends_set_filters() {
        let filter = InboxFilter {
            status: Some(1),
            limit: Some(10),
            ..Default::default()
        };
        let api = encode_inbox(&filter).unwrap();

        assert_eq!(api.path(), INBOX_PATH);
        assert_eq!(query_of(&api), vec![("limit", "10"), ("status", "1")]);
    }

    #[test]
    fn add_schedule_formats_dates_and_frequency() {
        let request = AddSchedule {
            start_date: date!(2026 - 10 - 19),
            end_date: date!(2026 - 12 - 31),
            name: "Weekly promo".to_owned(),
            message: MessageText::new("Ofertas").unwrap(),
            time: "08:30".to_owned(),
            frequency: RepeatInterval::Weekly,
            groups: vec![GroupShortName::new("vip").unwrap()],
        };
        let api = encode_add_schedule(&request).unwrap();

        assert_eq!(api.method(), &Method::POST);
        assert_eq!(
            api.body(),
            Some(&json!({
                "start_date": "2026-10-19",
                "end_date": "2026-12-31",
                "name": "Weekly promo",
                "message": "Ofertas",
                "time": "08:30",
                "frequency": "WEEKLY",
                "groups": ["vip"],
            }))
        );
    }

    #[test]
    fn add_schedule_rejects_missing_groups() {
        let request = AddSchedule {
            start_date: date!(2026 - 10 - 19),
            end_date: date!(2026 - 12 - 31),
            name: "Weekly promo".to_owned(),
            message: MessageText::new("Ofertas").unwrap(),
            time: "08:30".to_owned(),
            frequency: RepeatInterval::Weekly,
            groups: Vec::new(),
        };
        assert!(matches!(
            encode_add_schedule(&request),
            Err(ValidationError::Empty { field: "groups" })
        ));
    }

    #[test]
    fn remove_schedule_uses_delete_with_body() {
        let api = encode_remove_schedule(" 123 ").unwrap();

        assert_eq!(api.method(), &Method::DELETE);
        assert_eq!(api.path(), SCHEDULED_PATH);
        assert_eq!(api.body(), Some(&json!({ "message_id": "123" })));
        assert!(encode_remove_schedule("").is_err());
    }
}

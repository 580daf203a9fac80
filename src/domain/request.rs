use std::collections::BTreeMap;

use reqwest::Method;
use serde::Serialize;
use time::{Date, PrimitiveDateTime};

use crate::domain::response::{MessageDirection, RepeatInterval, ShortlinkStatus};
use crate::domain::validation::ValidationError;
use crate::domain::value::{
    ClientMessageId, GroupShortName, LongUrl, MessageText, Msisdn, ShortlinkId,
};

/// Timeout class of a call. Large list/query operations get a longer budget than sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallClass {
    #[default]
    Standard,
    Query,
}

#[derive(Debug, Clone, PartialEq)]
/// One logical API operation: method, path, parameters and optional JSON body.
///
/// Parameters are always part of the signed canonical string. They are appended to the URL
/// only when [`ApiRequest::append_query_to_url`] is set.
pub struct ApiRequest {
    method: Method,
    path: String,
    query: BTreeMap<String, String>,
    body: Option<serde_json::Value>,
    append_query: bool,
    call_class: CallClass,
}

impl ApiRequest {
    /// Field name reported when the path is blank.
    pub const PATH_FIELD: &'static str = "path";

    /// Create a request for `path` relative to the configured API base URL.
    pub fn new(method: Method, path: impl Into<String>) -> Result<Self, ValidationError> {
        let path = path.into();
        if path.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: Self::PATH_FIELD,
            });
        }
        Ok(Self {
            method,
            path: path.trim().to_owned(),
            query: BTreeMap::new(),
            body: None,
            append_query: false,
            call_class: CallClass::Standard,
        })
    }

    /// A `GET` for `path`.
    pub fn get(path: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(Method::GET, path)
    }

    /// A `POST` for `path`.
    pub fn post(path: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(Method::POST, path)
    }

    /// A `PUT` for `path`.
    pub fn put(path: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(Method::PUT, path)
    }

    /// A `DELETE` for `path`.
    pub fn delete(path: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(Method::DELETE, path)
    }

    /// Add (or replace) one parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Add (or replace) several parameters.
    pub fn params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Whether the canonical query string is appended to the URL.
    pub fn append_query_to_url(mut self, append: bool) -> Self {
        self.append_query = append;
        self
    }

    /// Attach a JSON body.
    pub fn json<B>(mut self, body: &B) -> Result<Self, ValidationError>
    where
        B: Serialize + ?Sized,
    {
        let value = serde_json::to_value(body).map_err(|err| ValidationError::Serialization {
            message: err.to_string(),
        })?;
        self.body = Some(value);
        Ok(self)
    }

    pub fn call_class(mut self, call_class: CallClass) -> Self {
        self.call_class = call_class;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &BTreeMap<String, String> {
        &self.query
    }

    pub fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }

    pub fn appends_query(&self) -> bool {
        self.append_query
    }

    pub fn class(&self) -> CallClass {
        self.call_class
    }
}

#[derive(Debug, Clone)]
/// Send one message to a single contact.
pub struct SendToContact {
    msisdn: Msisdn,
    message: MessageText,
    id: Option<ClientMessageId>,
}

impl SendToContact {
    pub fn new(msisdn: Msisdn, message: MessageText) -> Self {
        Self {
            msisdn,
            message,
            id: None,
        }
    }

    /// Tag the message with a caller-chosen id.
    pub fn with_id(mut self, id: ClientMessageId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn msisdn(&self) -> &Msisdn {
        &self.msisdn
    }

    pub fn message(&self) -> &MessageText {
        &self.message
    }

    pub fn id(&self) -> Option<&ClientMessageId> {
        self.id.as_ref()
    }
}

#[derive(Debug, Clone)]
/// Send one message to every member of the given groups.
pub struct SendToGroups {
    groups: Vec<GroupShortName>,
    message: MessageText,
    id: Option<ClientMessageId>,
}

impl SendToGroups {
    pub const GROUPS_FIELD: &'static str = "groups";

    pub fn new(groups: Vec<GroupShortName>, message: MessageText) -> Result<Self, ValidationError> {
        if groups.is_empty() {
            return Err(ValidationError::Empty {
                field: Self::GROUPS_FIELD,
            });
        }
        Ok(Self {
            groups,
            message,
            id: None,
        })
    }

    pub fn with_id(mut self, id: ClientMessageId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn groups(&self) -> &[GroupShortName] {
        &self.groups
    }

    pub fn message(&self) -> &MessageText {
        &self.message
    }

    pub fn id(&self) -> Option<&ClientMessageId> {
        self.id.as_ref()
    }
}

#[derive(Debug, Clone, Default)]
/// Filters for the sent-messages listing. Unset fields are not sent.
pub struct MessageListFilter {
    pub start_date: Option<PrimitiveDateTime>,
    pub end_date: Option<PrimitiveDateTime>,
    pub start: Option<u32>,
    pub limit: Option<u32>,
    pub msisdn: Option<Msisdn>,
    pub short_name: Option<GroupShortName>,
    pub include_recipients: bool,
    pub direction: MessageDirection,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default)]
/// Filters for the inbox listing. Unset fields are not sent.
pub struct InboxFilter {
    pub start_date: Option<PrimitiveDateTime>,
    pub end_date: Option<PrimitiveDateTime>,
    pub start: Option<u32>,
    pub limit: Option<u32>,
    pub msisdn: Option<Msisdn>,
    pub status: Option<i32>,
}

#[derive(Debug, Clone)]
/// Create a recurring message for a set of groups.
pub struct AddSchedule {
    pub start_date: Date,
    pub end_date: Date,
    pub name: String,
    pub message: MessageText,
    /// Time of day as expected by the API, e.g. `08:30`.
    pub time: String,
    pub frequency: RepeatInterval,
    pub groups: Vec<GroupShortName>,
}

impl AddSchedule {
    pub const NAME_FIELD: &'static str = "name";
    pub const TIME_FIELD: &'static str = "time";

    /// Check the fields the API rejects when blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: Self::NAME_FIELD,
            });
        }
        if self.time.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: Self::TIME_FIELD,
            });
        }
        if self.groups.is_empty() {
            return Err(ValidationError::Empty {
                field: SendToGroups::GROUPS_FIELD,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CreateShortlink {
    pub long_url: LongUrl,
    pub name: Option<String>,
    pub status: ShortlinkStatus,
}

impl CreateShortlink {
    pub fn new(long_url: LongUrl) -> Self {
        Self {
            long_url,
            name: None,
            status: ShortlinkStatus::Active,
        }
    }
}

#[derive(Debug, Clone, Default)]
/// Filters for the shortlink listing. An `id` filter supersedes every other field.
pub struct ShortlinkListFilter {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub id: Option<ShortlinkId>,
}

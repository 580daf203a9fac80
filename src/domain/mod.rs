//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::{
    AddSchedule, ApiRequest, CallClass, CreateShortlink, InboxFilter, MessageListFilter,
    SendToContact, SendToGroups, ShortlinkListFilter,
};
pub use response::{
    ActionMessageResponse, ApiFailure, ApiResponse, InboxMessageResponse, MessageDirection,
    MessageGroup, MessageResponse, MessageSentFrom, MessageStatus, RecipientResponse,
    RepeatInterval, SERVER_ERROR_CODE, SUCCESS_CODE, ScheduleMessageResponse, ShortlinkResponse,
    ShortlinkStatus, TRANSPORT_FAILURE_CODE,
};
pub use validation::ValidationError;
pub use value::{
    ApiKey, ApiUrl, ClientMessageId, GroupShortName, LongUrl, MessageText, Msisdn, PhoneNumber,
    SecretKey, ShortlinkId,
};

use std::io;

use contactosms::{
    CancellationToken, ClientMessageId, ClientOptions, ContactoSmsClient, MessageText, Msisdn,
    SendToContact,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let msisdn = std::env::var("CONTACTOSMS_MSISDN").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "CONTACTOSMS_MSISDN environment variable is required",
        )
    })?;
    let message = std::env::var("CONTACTOSMS_MESSAGE")
        .unwrap_or_else(|_| "Hello from the contactosms demo.".to_owned());

    let client = ContactoSmsClient::from_options(&ClientOptions::from_env()?)?;
    let mut request = SendToContact::new(Msisdn::new(msisdn)?, MessageText::new(message)?);
    if let Ok(id) = std::env::var("CONTACTOSMS_MESSAGE_ID") {
        request = request.with_id(ClientMessageId::new(id)?);
    }

    let response = client
        .messages()
        .send_to_contact(&request, &CancellationToken::new())
        .await?;

    match response.into_result()? {
        Some(message) => println!(
            "message_id: {}, status: {:?}, msisdn: {}",
            message.message_id, message.status, message.msisdn
        ),
        None => println!("sent, no message returned"),
    }

    Ok(())
}

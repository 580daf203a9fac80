use contactosms::{
    CancellationToken, ClientOptions, ContactoSmsClient, MessageDirection, MessageListFilter,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let limit = std::env::var("CONTACTOSMS_LIMIT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(10);
    let direction = match std::env::var("CONTACTOSMS_DIRECTION").as_deref() {
        Ok("MO") => MessageDirection::Mo,
        _ => MessageDirection::Mt,
    };

    let client = ContactoSmsClient::from_options(&ClientOptions::from_env()?)?;
    let filter = MessageListFilter {
        limit: Some(limit),
        direction,
        include_recipients: true,
        ..Default::default()
    };

    // Ctrl-C cancels the in-flight request.
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal.cancel();
        }
    });

    let response = client.messages().list(&filter, &cancel).await?;
    if !response.is_ok() {
        eprintln!(
            "error {} (HTTP {}): {}",
            response.error_code, response.http_code, response.error_description
        );
        return Ok(());
    }

    for message in response.data.unwrap_or_default() {
        println!(
            "{} [{:?}] {} -> {} recipient(s): {}",
            message.message_id,
            message.status,
            message.created_on,
            message.recipients.len(),
            message.message
        );
    }

    Ok(())
}

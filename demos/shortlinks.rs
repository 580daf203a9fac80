use std::io;

use contactosms::{
    CancellationToken, ClientOptions, ContactoSmsClient, CreateShortlink, LongUrl,
    ShortlinkListFilter, ShortlinkStatus,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let long_url = std::env::var("CONTACTOSMS_LONG_URL").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "CONTACTOSMS_LONG_URL environment variable is required",
        )
    })?;

    let client = ContactoSmsClient::from_options(&ClientOptions::from_env()?)?;
    let shortlinks = client.shortlinks();
    let cancel = CancellationToken::new();

    let mut request = CreateShortlink::new(LongUrl::new(long_url)?);
    request.name = std::env::var("CONTACTOSMS_SHORTLINK_NAME").ok();
    let created = shortlinks.create(&request, &cancel).await?;
    let Some(created) = created.into_result()? else {
        println!("created, no shortlink returned");
        return Ok(());
    };
    println!("created {} -> {}", created.short_url, created.long_url);

    let id = contactosms::ShortlinkId::new(created.url_id)?;
    let updated = shortlinks
        .update_status(&id, ShortlinkStatus::Inactive, &cancel)
        .await?;
    println!("status update ok: {}", updated.is_ok());

    let listed = shortlinks
        .list(
            &ShortlinkListFilter {
                limit: Some(5),
                ..Default::default()
            },
            &cancel,
        )
        .await?;
    for shortlink in listed.data.unwrap_or_default() {
        println!("{} {:?} {}", shortlink.url_id, shortlink.status, shortlink.short_url);
    }

    Ok(())
}
